//! Publish and report notifications over the Resend HTTP API
//!
//! Delivery is best effort: failures are logged and reported as
//! `sent: false`, never as an error to the caller.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::models::ReportKind;

const RESEND_ENDPOINT: &str = "https://api.resend.com/emails";

/// Details of a freshly published document
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishNotice {
    pub project_id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub item_count: u32,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub user_email: Option<String>,
}

/// A viewer's report against a document
#[derive(Debug, Clone)]
pub struct ContentReport {
    pub document_id: Uuid,
    pub creator_id: Uuid,
    pub creator_email: Option<String>,
    pub title: String,
    pub kind: ReportKind,
    pub explanation: Option<String>,
    /// Page the viewer reported from, when the client sent one
    pub viewer_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotifyOutcome {
    pub success: bool,
    pub sent: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_email_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SendResponse {
    id: String,
}

/// Escape text for interpolation into HTML
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[derive(Clone)]
pub struct Mailer {
    http: reqwest::Client,
    api_key: Option<String>,
    from: String,
    admin_email: String,
    public_view_base: String,
    dashboard_url: String,
}

impl Mailer {
    pub fn new(
        http: reqwest::Client,
        api_key: Option<String>,
        from: String,
        admin_email: String,
        public_view_base: String,
        dashboard_url: String,
    ) -> Self {
        Self {
            http,
            api_key,
            from,
            admin_email,
            public_view_base: public_view_base.trim_end_matches('/').to_string(),
            dashboard_url,
        }
    }

    fn public_url(&self, project_id: &str) -> String {
        format!("{}/{}", self.public_view_base, project_id)
    }

    /// Notify the admin, and the author when an address is given
    pub async fn notify_publish(&self, notice: &PublishNotice) -> NotifyOutcome {
        let Some(api_key) = self.api_key.as_deref() else {
            warn!("Resend API key not configured, skipping publish notification");
            return NotifyOutcome {
                success: true,
                ..NotifyOutcome::default()
            };
        };

        let published_at = Utc::now();
        let admin = self
            .send(
                api_key,
                &self.admin_email,
                &format!("New Project Published: {}", notice.title),
                &self.admin_html(notice, published_at),
            )
            .await;

        let admin_email_id = match admin {
            Ok(id) => {
                info!("Admin notification sent: {}", id);
                Some(id)
            }
            Err(e) => {
                error!("Failed to send admin notification: {}", e);
                None
            }
        };

        if let Some(user_email) = notice.user_email.as_deref().filter(|email| !email.is_empty()) {
            match self
                .send(
                    api_key,
                    user_email,
                    &format!("Your Project \"{}\" is Now Published!", notice.title),
                    &self.author_html(notice),
                )
                .await
            {
                Ok(id) => info!("Author confirmation sent: {}", id),
                Err(e) => error!("Failed to send author confirmation: {}", e),
            }
        }

        NotifyOutcome {
            success: true,
            sent: admin_email_id.is_some(),
            admin_email_id,
        }
    }

    /// Alert the admin about a report, and tell the creator when their
    /// address is known
    pub async fn notify_report(&self, report: &ContentReport) -> NotifyOutcome {
        let Some(api_key) = self.api_key.as_deref() else {
            warn!("Resend API key not configured, skipping report notification");
            return NotifyOutcome {
                success: true,
                ..NotifyOutcome::default()
            };
        };

        let admin_email_id = match self
            .send(
                api_key,
                &self.admin_email,
                "[URGENT] Content Report - Recursive Creator",
                &self.report_admin_html(report, Utc::now()),
            )
            .await
        {
            Ok(id) => {
                info!("Report notification sent: {}", id);
                Some(id)
            }
            Err(e) => {
                error!("Failed to send report notification: {}", e);
                None
            }
        };

        if let Some(creator_email) = report.creator_email.as_deref().filter(|email| !email.is_empty()) {
            let subject = match report.kind {
                ReportKind::Unpublish => "Content Unpublished - Recursive Creator",
                ReportKind::Notify => "Content Report Notification - Recursive Creator",
            };
            match self
                .send(api_key, creator_email, subject, &self.report_creator_html(report))
                .await
            {
                Ok(id) => info!("Creator report notice sent: {}", id),
                Err(e) => error!("Failed to send creator report notice: {}", e),
            }
        }

        NotifyOutcome {
            success: true,
            sent: admin_email_id.is_some(),
            admin_email_id,
        }
    }

    async fn send(&self, api_key: &str, to: &str, subject: &str, html: &str) -> reqwest::Result<String> {
        let response: SendResponse = self
            .http
            .post(RESEND_ENDPOINT)
            .bearer_auth(api_key)
            .json(&json!({
                "from": self.from,
                "to": [to],
                "subject": subject,
                "html": html,
            }))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(response.id)
    }

    fn admin_html(&self, notice: &PublishNotice, published_at: DateTime<Utc>) -> String {
        let url = self.public_url(&notice.project_id);
        let description = notice
            .description
            .as_deref()
            .filter(|d| !d.is_empty())
            .map(|d| format!("<p><strong>Description:</strong> {}</p>", escape_html(d)))
            .unwrap_or_default();

        format!(
            r#"<div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto; padding: 20px;">
<h1 style="color: #1e40af;">New Project Published</h1>
<p>Someone just published a project on Recursive Creator.</p>
<p><strong>Title:</strong> {title}</p>
{description}
<p><strong>Items:</strong> {items}</p>
<p><strong>Project ID:</strong> <code>{id}</code></p>
<p><a href="{url}">View Project</a> | <a href="{dashboard}">Go to Dashboard</a></p>
<p style="color: #64748b; font-size: 12px;">Published: {published}<br>User ID: {user}</p>
</div>"#,
            title = escape_html(&notice.title),
            items = notice.item_count,
            id = escape_html(&notice.project_id),
            url = escape_html(&url),
            dashboard = escape_html(&self.dashboard_url),
            published = published_at.format("%Y-%m-%d %H:%M UTC"),
            user = escape_html(notice.user_id.as_deref().unwrap_or("Unknown")),
        )
    }

    fn author_html(&self, notice: &PublishNotice) -> String {
        let url = self.public_url(&notice.project_id);
        let description = notice
            .description
            .as_deref()
            .filter(|d| !d.is_empty())
            .map(|d| format!("<p style=\"color: #64748b;\">{}</p>", escape_html(d)))
            .unwrap_or_default();

        format!(
            r#"<div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto; padding: 20px;">
<h1 style="color: #16a34a;">Success! Your Project is Live</h1>
<p style="font-weight: bold;">{title}</p>
{description}
<p><strong>Items:</strong> {items}</p>
<p>Your public URL: <a href="{url}">{url}</a></p>
<p style="font-size: 12px;">This link is public. Anyone with it can view your project.</p>
<p><a href="{dashboard}">Back to Dashboard</a></p>
</div>"#,
            title = escape_html(&notice.title),
            items = notice.item_count,
            url = escape_html(&url),
            dashboard = escape_html(&self.dashboard_url),
        )
    }

    fn report_url(&self, report: &ContentReport) -> String {
        report
            .viewer_url
            .clone()
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| self.public_url(&report.document_id.to_string()))
    }

    fn report_admin_html(&self, report: &ContentReport, reported_at: DateTime<Utc>) -> String {
        let action = match report.kind {
            ReportKind::Unpublish => "Unpublished by Reporter",
            ReportKind::Notify => "Notification Only",
        };
        let explanation = report
            .explanation
            .as_deref()
            .filter(|text| !text.trim().is_empty())
            .unwrap_or("No explanation provided");

        format!(
            r#"<div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto; padding: 20px;">
<h2 style="color: #b91c1c;">Content Report</h2>
<p><strong>Document ID:</strong> <code>{id}</code></p>
<p><strong>Report Type:</strong> {action}</p>
<p><strong>Timestamp:</strong> {reported}</p>
<p><strong>Viewer URL:</strong> {url}</p>
<p><strong>Title:</strong> {title}</p>
<p><strong>Creator:</strong> {email} ({creator})</p>
<h3>User Explanation:</h3>
<p>{explanation}</p>
<hr>
<p><strong>Action Needed:</strong> Review content immediately</p>
</div>"#,
            id = report.document_id,
            reported = reported_at.to_rfc3339(),
            url = escape_html(&self.report_url(report)),
            title = escape_html(&report.title),
            email = escape_html(report.creator_email.as_deref().unwrap_or("Unknown")),
            creator = report.creator_id,
            explanation = escape_html(explanation),
        )
    }

    fn report_creator_html(&self, report: &ContentReport) -> String {
        let url = escape_html(&self.report_url(report));
        let title = escape_html(&report.title);
        let admin = escape_html(&self.admin_email);

        match report.kind {
            ReportKind::Unpublish => format!(
                r#"<div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto; padding: 20px;">
<h2>Content Unpublished</h2>
<p>Your published project has been unpublished due to a content report.</p>
<p><strong>Project:</strong> {title}</p>
<p><strong>View URL:</strong> {url} (now private)</p>
<p>This content is under review. If you believe this was done in error, you can appeal to {admin}.</p>
</div>"#
            ),
            ReportKind::Notify => format!(
                r#"<div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto; padding: 20px;">
<h2>Content Report Notification</h2>
<p>Your published project has been reported by a viewer for review.</p>
<p><strong>Project:</strong> {title}</p>
<p><strong>View URL:</strong> {url}</p>
<p>It will be unpublished if it is found inappropriate. Anything to add? Write to {admin}.</p>
</div>"#
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mailer(api_key: Option<&str>) -> Mailer {
        Mailer::new(
            reqwest::Client::new(),
            api_key.map(str::to_string),
            "Recursive Creator <noreply@example.com>".to_string(),
            "admin@example.com".to_string(),
            "https://recursive.eco/view/".to_string(),
            "https://creator.recursive.eco/dashboard".to_string(),
        )
    }

    fn notice() -> PublishNotice {
        PublishNotice {
            project_id: "0b6f".to_string(),
            title: "<script>alert(1)</script>".to_string(),
            description: Some("Tom & Jerry".to_string()),
            item_count: 3,
            user_id: None,
            user_email: None,
        }
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#39;Jerry&#39;&lt;/a&gt;"
        );
    }

    #[test]
    fn test_templates_escape_user_text() {
        let mailer = mailer(None);
        let html = mailer.admin_html(&notice(), Utc::now());

        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("Tom &amp; Jerry"));
        assert!(html.contains("https://recursive.eco/view/0b6f"));
        assert!(html.contains("User ID: Unknown"));

        let html = mailer.author_html(&notice());
        assert!(!html.contains("<script>"));
    }

    #[tokio::test]
    async fn test_missing_key_reports_not_sent() {
        let outcome = mailer(None).notify_publish(&notice()).await;
        assert_eq!(
            outcome,
            NotifyOutcome {
                success: true,
                sent: false,
                admin_email_id: None,
            }
        );
    }

    fn report(kind: ReportKind) -> ContentReport {
        ContentReport {
            document_id: Uuid::nil(),
            creator_id: Uuid::nil(),
            creator_email: Some("maker@example.com".to_string()),
            title: "Songs & <b>more</b>".to_string(),
            kind,
            explanation: Some("<img src=x onerror=alert(1)>".to_string()),
            viewer_url: None,
        }
    }

    #[test]
    fn test_report_templates() {
        let mailer = mailer(None);

        let html = mailer.report_admin_html(&report(ReportKind::Unpublish), Utc::now());
        assert!(html.contains("Unpublished by Reporter"));
        assert!(html.contains("&lt;img src=x onerror=alert(1)&gt;"));
        assert!(html.contains("Songs &amp; &lt;b&gt;more&lt;/b&gt;"));
        assert!(html.contains(&format!("https://recursive.eco/view/{}", Uuid::nil())));

        let html = mailer.report_creator_html(&report(ReportKind::Unpublish));
        assert!(html.contains("(now private)"));

        let mut notify = report(ReportKind::Notify);
        notify.viewer_url = Some("https://recursive.eco/view/shared".to_string());
        let html = mailer.report_creator_html(&notify);
        assert!(html.contains("reported by a viewer"));
        assert!(html.contains("https://recursive.eco/view/shared"));
    }

    #[tokio::test]
    async fn test_report_without_key_is_not_sent() {
        let outcome = mailer(None).notify_report(&report(ReportKind::Notify)).await;
        assert!(outcome.success);
        assert!(!outcome.sent);
    }

    #[test]
    fn test_notice_uses_camel_case() {
        let notice: PublishNotice = serde_json::from_value(serde_json::json!({
            "projectId": "p1",
            "title": "T",
            "itemCount": 4,
            "userEmail": "me@example.com"
        }))
        .unwrap();
        assert_eq!(notice.item_count, 4);
        assert_eq!(notice.user_email.as_deref(), Some("me@example.com"));
    }
}
