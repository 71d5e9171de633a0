//! Outgoing merchant email.

use crate::provisioning::AdapterError;
use async_trait::async_trait;
use serde::Serialize;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Email {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub html: String,
}

impl Email {
    /// The message sent once a store is provisioned.
    pub fn store_ready(
        from: &str,
        to: &str,
        store_name: &str,
        dashboard_url: &str,
        website_url: &str,
    ) -> Self {
        let name = escape_html(store_name);
        Self {
            from: from.to_string(),
            to: to.to_string(),
            subject: format!("{store_name} is live"),
            html: format!(
                "<h1>{name} is ready</h1>\
                 <p>Your dashboard: <a href=\"{dashboard}\">{dashboard}</a></p>\
                 <p>Your storefront: <a href=\"https://{website}\">{website}</a></p>",
                dashboard = escape_html(dashboard_url),
                website = escape_html(website_url),
            ),
        }
    }
}

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send_email(&self, email: Email) -> Result<(), AdapterError>;
}

/// Writes emails to the log instead of delivering them.
#[derive(Debug, Default, Clone)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send_email(&self, email: Email) -> Result<(), AdapterError> {
        info!(to = %email.to, subject = %email.subject, "Email sent");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_ready_email_escapes_store_name() {
        let email = Email::store_ready(
            "no-reply@storefront.local",
            "ann@acme.test",
            "Tom & Jerry <Shop>",
            "https://dash/m1",
            "acme.storefront.local",
        );
        assert_eq!(email.subject, "Tom & Jerry <Shop> is live");
        assert!(email.html.contains("Tom &amp; Jerry &lt;Shop&gt;"));
        assert!(email.html.contains("https://dash/m1"));
        assert!(email.html.contains("acme.storefront.local"));
    }
}
