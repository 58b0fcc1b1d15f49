//! Webhook egress.
//!
//! Two stream types: `command` for operator alerts about backend failures
//! and `day_statistic` for the daily analytics post (with the event log
//! and per-command histogram as text attachments). Webhook URLs are
//! optional configuration; a missing URL turns the corresponding post
//! into a no-op so development instances run without operator plumbing.

use reqwest::multipart::{Form, Part};
use reqwest::Client;
use tracing::warn;

use crate::error::AppError;

/// Posts operator and analytics messages to configured webhook URLs.
#[derive(Clone)]
pub struct WebhookSink {
    http: Client,
    command_url: Option<String>,
    day_statistic_url: Option<String>,
}

impl WebhookSink {
    pub fn new(
        http: Client,
        command_url: Option<String>,
        day_statistic_url: Option<String>,
    ) -> Self {
        Self {
            http,
            command_url,
            day_statistic_url,
        }
    }

    /// Sends an operator alert to the `command` stream.
    ///
    /// Failures are logged and swallowed; a broken webhook must never
    /// take down the loop that reported the original problem.
    pub async fn command_alert(&self, content: &str) {
        let Some(url) = &self.command_url else {
            return;
        };

        let result = self
            .http
            .post(url)
            .json(&serde_json::json!({ "content": content }))
            .send()
            .await;

        if let Err(e) = result {
            warn!("command webhook post failed: {e}");
        }
    }

    /// Posts the daily analytics message with two text attachments:
    /// the event log and the per-command usage histogram.
    pub async fn day_statistic(
        &self,
        content: &str,
        event_log: String,
        command_histogram: String,
    ) -> Result<(), AppError> {
        let Some(url) = &self.day_statistic_url else {
            return Ok(());
        };

        let form = Form::new()
            .text("content", content.to_string())
            .part(
                "files[0]",
                Part::text(event_log).file_name("events.txt").mime_str("text/plain")?,
            )
            .part(
                "files[1]",
                Part::text(command_histogram)
                    .file_name("commands.txt")
                    .mime_str("text/plain")?,
            );

        self.http.post(url).multipart(form).send().await?.error_for_status()?;

        Ok(())
    }
}
