//! Position-preserving list operations
//!
//! Every function takes a list whose positions are `1..=N`, returns a new
//! list, and renumbers it before returning. The input is never modified, so
//! a failed operation leaves the caller's list exactly as it was.

use crate::error::EditError;

/// An entry carrying a 1-based position
pub trait Positioned {
    fn position(&self) -> u32;
    fn set_position(&mut self, position: u32);
}

/// Direction of an adjacent move
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
}

/// Assign positions `1..=N` in list order
pub fn renumber<T: Positioned>(mut items: Vec<T>) -> Vec<T> {
    for (index, item) in items.iter_mut().enumerate() {
        item.set_position(index as u32 + 1);
    }
    items
}

/// Whether positions are exactly `1..=N` in list order
pub fn is_contiguous<T: Positioned>(items: &[T]) -> bool {
    items
        .iter()
        .enumerate()
        .all(|(index, item)| item.position() == index as u32 + 1)
}

fn index_of(position: u32, len: usize) -> Result<usize, EditError> {
    if position == 0 || position as usize > len {
        return Err(EditError::PositionOutOfRange { position, len });
    }
    Ok(position as usize - 1)
}

/// Move the entry at `from` so it ends up at `to`, shifting the entries in
/// between. Moving to the current position returns the list unchanged.
pub fn move_to<T: Positioned + Clone>(items: &[T], from: u32, to: u32) -> Result<Vec<T>, EditError> {
    let from_index = index_of(from, items.len())?;
    let to_index = index_of(to, items.len())?;

    let mut moved = items.to_vec();
    if from_index != to_index {
        let item = moved.remove(from_index);
        moved.insert(to_index, item);
    }
    Ok(renumber(moved))
}

/// Remove the entry at `position` and close the gap
pub fn remove<T: Positioned + Clone>(items: &[T], position: u32) -> Result<Vec<T>, EditError> {
    let index = index_of(position, items.len())?;

    let mut remaining = items.to_vec();
    remaining.remove(index);
    Ok(renumber(remaining))
}

/// Swap the entry at `position` with its neighbour. A move past either end
/// returns the list unchanged.
pub fn move_adjacent<T: Positioned + Clone>(
    items: &[T],
    position: u32,
    direction: Direction,
) -> Result<Vec<T>, EditError> {
    let index = index_of(position, items.len())?;

    let target = match direction {
        Direction::Up => index.checked_sub(1),
        Direction::Down => Some(index + 1).filter(|target| *target < items.len()),
    };

    let mut swapped = items.to_vec();
    if let Some(target) = target {
        swapped.swap(index, target);
    }
    Ok(renumber(swapped))
}

/// Replace the entry at `position` with the result of `edit`
pub fn update<T, F>(items: &[T], position: u32, edit: F) -> Result<Vec<T>, EditError>
where
    T: Positioned + Clone,
    F: FnOnce(T) -> Result<T, EditError>,
{
    let index = index_of(position, items.len())?;

    let mut updated = items.to_vec();
    let edited = edit(updated[index].clone())?;
    updated[index] = edited;
    Ok(renumber(updated))
}
