//! SendGrid v3 mail-send client.

use async_trait::async_trait;
use serde::Serialize;
use url::Url;

use crate::alerts::{AlertClient, AlertError, AlertMessage};

/// Default SendGrid mail-send endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://api.sendgrid.com/v3/mail/send";

/// Alert client posting to the SendGrid mail-send API.
#[derive(Clone)]
pub struct SendGridClient {
    http: reqwest::Client,
    endpoint: Url,
    api_key: String,
}

impl SendGridClient {
    pub fn new(endpoint: Url, api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint,
            api_key: api_key.into(),
        }
    }
}

impl std::fmt::Debug for SendGridClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SendGridClient")
            .field("endpoint", &self.endpoint.as_str())
            .finish_non_exhaustive()
    }
}

#[derive(Serialize)]
struct MailSend<'a> {
    personalizations: [Personalization<'a>; 1],
    from: EmailAddress<'a>,
    subject: &'a str,
    content: [Content<'a>; 2],
}

#[derive(Serialize)]
struct Personalization<'a> {
    to: [EmailAddress<'a>; 1],
}

#[derive(Serialize)]
struct EmailAddress<'a> {
    email: &'a str,
}

#[derive(Serialize)]
struct Content<'a> {
    #[serde(rename = "type")]
    kind: &'a str,
    value: &'a str,
}

impl<'a> From<&'a AlertMessage> for MailSend<'a> {
    fn from(message: &'a AlertMessage) -> Self {
        Self {
            personalizations: [Personalization {
                to: [EmailAddress { email: &message.to }],
            }],
            from: EmailAddress {
                email: &message.from,
            },
            subject: &message.subject,
            content: [
                Content {
                    kind: "text/plain",
                    value: &message.text,
                },
                Content {
                    kind: "text/html",
                    value: &message.html,
                },
            ],
        }
    }
}

#[async_trait]
impl AlertClient for SendGridClient {
    async fn send(&self, message: &AlertMessage) -> Result<(), AlertError> {
        let response = self
            .http
            .post(self.endpoint.clone())
            .bearer_auth(&self.api_key)
            .json(&MailSend::from(message))
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(AlertError::Rejected {
            status: status.as_u16(),
            body,
        })
    }
}
