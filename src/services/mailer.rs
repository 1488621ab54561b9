use crate::config::MailSettings;
use crate::models::Recommendation;
use askama::Template;
use chrono::{DateTime, Local};
use reqwest::Client;
use serde::Serialize;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use validator::ValidateEmail;

/// Errors that can occur when building or sending an email
#[derive(Debug, Error)]
pub enum MailError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("Mail API returned error: {0}")]
    ApiError(String),

    #[error("Template rendering failed: {0}")]
    TemplateError(#[from] askama::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Outgoing HTML message
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MailMessage {
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub html: String,
}

/// Something that can deliver a [`MailMessage`]
pub trait MailTransport: Send + Sync {
    fn send(&self, message: &MailMessage) -> impl Future<Output = Result<(), MailError>> + Send;
}

/// Transport posting messages as JSON to an HTTP mail API
pub struct HttpMailTransport {
    api_url: String,
    api_key: String,
    client: Client,
}

impl HttpMailTransport {
    pub fn new(api_url: String, api_key: String, timeout: Duration) -> Result<Self, MailError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            api_url,
            api_key,
            client,
        })
    }

    pub fn from_settings(settings: &MailSettings) -> Result<Self, MailError> {
        Self::new(
            settings.api_url.clone(),
            settings.api_key.clone(),
            Duration::from_secs(settings.timeout_secs),
        )
    }
}

impl MailTransport for HttpMailTransport {
    async fn send(&self, message: &MailMessage) -> Result<(), MailError> {
        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(message)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(MailError::ApiError(format!(
                "Failed to send email: {}",
                response.status()
            )));
        }

        Ok(())
    }
}

struct EmailRow<'a> {
    rank: usize,
    title: &'a str,
    company: &'a str,
    location: &'a str,
    score: String,
    url: &'a str,
}

#[derive(Template)]
#[template(path = "recommendations_email.html")]
struct RecommendationsEmail<'a> {
    name: &'a str,
    rows: Vec<EmailRow<'a>>,
    sent_at: String,
}

/// Score as a percentage with one decimal, e.g. `0.875` -> `87.5%`
pub fn format_score(score: f64) -> String {
    format!("{:.1}%", score * 100.0)
}

/// Subject line for the daily recommendations email
pub fn email_subject(now: DateTime<Local>) -> String {
    format!("Vos recommandations d'emploi - {}", now.format("%d/%m/%Y"))
}

/// Render the HTML body listing ranked recommendations
pub fn render_recommendations_email(
    profile_name: &str,
    recommendations: &[Recommendation],
    now: DateTime<Local>,
) -> Result<String, MailError> {
    let rows = recommendations
        .iter()
        .enumerate()
        .map(|(i, rec)| EmailRow {
            rank: i + 1,
            title: &rec.job_title,
            company: &rec.company,
            location: &rec.location,
            score: format_score(rec.score),
            url: &rec.url,
        })
        .collect();

    let email = RecommendationsEmail {
        name: profile_name,
        rows,
        sent_at: now.format("%d/%m/%Y à %H:%M").to_string(),
    };

    Ok(email.render()?)
}

/// Sends recommendation emails; failures are logged, never propagated
pub struct EmailService<T: MailTransport> {
    transport: T,
    sender: String,
}

impl<T: MailTransport> EmailService<T> {
    pub fn new(transport: T, sender: String) -> Self {
        Self { transport, sender }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Send the recommendations to a profile; returns whether it was sent
    ///
    /// Nothing is sent when there are no recommendations.
    pub async fn send_recommendations(
        &self,
        profile_name: &str,
        profile_email: &str,
        recommendations: &[Recommendation],
    ) -> bool {
        if recommendations.is_empty() {
            return false;
        }

        match self.try_send(profile_name, profile_email, recommendations).await {
            Ok(()) => {
                tracing::info!(
                    "Sent {} recommendations to {}",
                    recommendations.len(),
                    profile_email
                );
                true
            }
            Err(e) => {
                tracing::error!("Failed to send recommendations to {}: {}", profile_email, e);
                false
            }
        }
    }

    async fn try_send(
        &self,
        profile_name: &str,
        profile_email: &str,
        recommendations: &[Recommendation],
    ) -> Result<(), MailError> {
        if !profile_email.to_owned().validate_email() {
            return Err(MailError::InvalidInput(format!(
                "invalid recipient address '{}'",
                profile_email
            )));
        }

        let now = Local::now();
        let message = MailMessage {
            from: self.sender.clone(),
            to: vec![profile_email.to_string()],
            subject: email_subject(now),
            html: render_recommendations_email(profile_name, recommendations, now)?,
        };

        self.transport.send(&message).await
    }
}
