//! Integration tests for the infrastructure components
//!
//! These tests need a reachable PostgreSQL instance (`DATABASE_URL`) and
//! are ignored by default.

use common::database::{DatabaseConfig, health_check, init_pool, run_migrations};
use sqlx::Row;

/// PostgreSQL is reachable and the migrations create the documents table
#[tokio::test]
#[ignore = "requires a running PostgreSQL"]
async fn test_database_and_migrations() -> Result<(), Box<dyn std::error::Error>> {
    let config = DatabaseConfig::from_env()?;
    let pool = init_pool(&config).await?;

    assert!(health_check(&pool).await?, "Database health check failed");

    run_migrations(&pool).await?;
    // Applying twice is a no-op
    run_migrations(&pool).await?;

    let row = sqlx::query(
        "SELECT COUNT(*) AS columns FROM information_schema.columns WHERE table_name = 'user_documents'",
    )
    .fetch_one(&pool)
    .await?;

    let columns: i64 = row.get("columns");
    assert_eq!(columns, 11, "user_documents should have eleven columns");

    Ok(())
}
