use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{PushChannel, PushMessage, SEND_TIMEOUT_SECS};
use crate::{Error, Result};

const SUCCESS_CODE: i64 = 200;

#[derive(Serialize)]
struct PushPlusRequest<'a> {
    token: &'a str,
    title: &'a str,
    content: String,
    template: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    channel: Option<&'a str>,
}

#[derive(Deserialize)]
struct PushPlusResponse {
    code: Option<i64>,
    msg: Option<String>,
}

/// PushPlus webhook: a single token-authenticated POST
pub struct PushPlusChannel {
    client: Client,
    endpoint: String,
    token: String,
    channel: Option<String>,
}

impl PushPlusChannel {
    pub fn new(endpoint: &str, token: &str, channel: Option<&str>) -> Result<Self> {
        let client = Client::builder().build()?;

        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
            token: token.to_string(),
            channel: channel.map(str::to_string),
        })
    }
}

#[async_trait::async_trait]
impl PushChannel for PushPlusChannel {
    fn name(&self) -> &str {
        "pushplus"
    }

    async fn send(&self, message: &PushMessage) -> Result<()> {
        let request = PushPlusRequest {
            token: &self.token,
            title: &message.title,
            content: message.markdown_content(),
            template: "markdown",
            channel: self.channel.as_deref(),
        };

        let response = self
            .client
            .post(&self.endpoint)
            .timeout(Duration::from_secs(SEND_TIMEOUT_SECS))
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::Push(format!("PushPlus request failed: {}", e.without_url())))?;

        let status = response.status();
        let result: PushPlusResponse = response.json().await.map_err(|e| {
            Error::Push(format!(
                "Failed to parse PushPlus response (HTTP {}): {}",
                status,
                e.without_url()
            ))
        })?;

        check_response(result)
    }
}

fn check_response(response: PushPlusResponse) -> Result<()> {
    match response.code {
        Some(SUCCESS_CODE) => Ok(()),
        code => Err(Error::Push(format!(
            "PushPlus rejected message (code {}): {}",
            code.map_or_else(|| "missing".to_string(), |c| c.to_string()),
            response.msg.as_deref().unwrap_or("no message")
        ))),
    }
}
