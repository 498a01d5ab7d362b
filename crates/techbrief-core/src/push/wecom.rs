use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{PushChannel, PushMessage, SEND_TIMEOUT_SECS, TOKEN_TIMEOUT_SECS};
use crate::{Error, Result};

#[derive(Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    errcode: Option<i64>,
    errmsg: Option<String>,
}

#[derive(Serialize)]
struct MarkdownMessage<'a> {
    touser: &'a str,
    msgtype: &'static str,
    agentid: i64,
    markdown: MarkdownContent,
}

#[derive(Serialize)]
struct MarkdownContent {
    content: String,
}

#[derive(Deserialize)]
struct SendResponse {
    errcode: Option<i64>,
    errmsg: Option<String>,
}

/// WeCom (enterprise WeChat) application message gateway.
/// Exchanges corp id and secret for an access token, then sends a markdown message.
pub struct WeComChannel {
    client: Client,
    api_base: String,
    corp_id: String,
    corp_secret: String,
    agent_id: i64,
    to_user: String,
}

impl WeComChannel {
    pub fn new(
        api_base: &str,
        corp_id: &str,
        corp_secret: &str,
        agent_id: i64,
        to_user: &str,
    ) -> Result<Self> {
        let client = Client::builder().build()?;

        Ok(Self {
            client,
            api_base: api_base.trim_end_matches('/').to_string(),
            corp_id: corp_id.to_string(),
            corp_secret: corp_secret.to_string(),
            agent_id,
            to_user: to_user.to_string(),
        })
    }

    async fn access_token(&self) -> Result<String> {
        let response = self
            .client
            .get(format!("{}/cgi-bin/gettoken", self.api_base))
            .query(&[("corpid", &self.corp_id), ("corpsecret", &self.corp_secret)])
            .timeout(Duration::from_secs(TOKEN_TIMEOUT_SECS))
            .send()
            .await
            .map_err(|e| Error::Push(format!("WeCom token request failed: {}", e.without_url())))?;

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| {
                Error::Push(format!("Failed to parse WeCom token response: {}", e.without_url()))
            })?;

        match token.access_token.filter(|t| !t.is_empty()) {
            Some(access_token) => Ok(access_token),
            None => Err(Error::Push(format!(
                "WeCom returned no access token (errcode {}): {}",
                token.errcode.map_or_else(|| "missing".to_string(), |c| c.to_string()),
                token.errmsg.as_deref().unwrap_or("no message")
            ))),
        }
    }
}

#[async_trait::async_trait]
impl PushChannel for WeComChannel {
    fn name(&self) -> &str {
        "wecom"
    }

    async fn send(&self, message: &PushMessage) -> Result<()> {
        let access_token = self.access_token().await?;
        tracing::debug!("WeCom access token acquired");

        let payload = MarkdownMessage {
            touser: &self.to_user,
            msgtype: "markdown",
            agentid: self.agent_id,
            markdown: MarkdownContent {
                content: message.markdown_content(),
            },
        };

        let response = self
            .client
            .post(format!("{}/cgi-bin/message/send", self.api_base))
            .query(&[("access_token", &access_token)])
            .timeout(Duration::from_secs(SEND_TIMEOUT_SECS))
            .json(&payload)
            .send()
            .await
            .map_err(|e| Error::Push(format!("WeCom send request failed: {}", e.without_url())))?;

        let result: SendResponse = response
            .json()
            .await
            .map_err(|e| {
                Error::Push(format!("Failed to parse WeCom send response: {}", e.without_url()))
            })?;

        match result.errcode {
            Some(0) => Ok(()),
            code => Err(Error::Push(format!(
                "WeCom rejected message (errcode {}): {}",
                code.map_or_else(|| "missing".to_string(), |c| c.to_string()),
                result.errmsg.as_deref().unwrap_or("no message")
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{MockServer, Route};

    const TOKEN_PATH: &str = "/cgi-bin/gettoken";
    const SEND_PATH: &str = "/cgi-bin/message/send";

    fn channel(server: &MockServer) -> WeComChannel {
        WeComChannel::new(server.base_url(), "ww-corp", "s3cret", 1000002, "@all").unwrap()
    }

    fn message() -> PushMessage {
        PushMessage::new("Daily", "body text")
    }

    #[tokio::test]
    async fn test_token_then_send() {
        let server = MockServer::start(vec![
            Route::new(
                TOKEN_PATH,
                200,
                r#"{"errcode":0,"errmsg":"ok","access_token":"AT-1","expires_in":7200}"#,
            ),
            Route::new(SEND_PATH, 200, r#"{"errcode":0,"errmsg":"ok"}"#),
        ])
        .await;

        channel(&server).send(&message()).await.unwrap();

        let requests = server.requests();
        assert_eq!(requests.len(), 2);

        assert_eq!(requests[0].method, "GET");
        assert_eq!(requests[0].path(), TOKEN_PATH);
        assert!(requests[0].target.contains("corpid=ww-corp"));
        assert!(requests[0].target.contains("corpsecret=s3cret"));

        assert_eq!(requests[1].method, "POST");
        assert_eq!(requests[1].path(), SEND_PATH);
        assert!(requests[1].target.contains("access_token=AT-1"));

        let body: serde_json::Value = serde_json::from_str(&requests[1].body).unwrap();
        assert_eq!(body["touser"], "@all");
        assert_eq!(body["msgtype"], "markdown");
        assert_eq!(body["agentid"], 1000002);
        assert_eq!(body["markdown"]["content"], "# Daily\n\nbody text");
    }

    #[tokio::test]
    async fn test_missing_access_token_skips_send() {
        let server = MockServer::start(vec![
            Route::new(TOKEN_PATH, 200, r#"{"errcode":40013,"errmsg":"invalid corpid"}"#),
            Route::new(SEND_PATH, 200, r#"{"errcode":0,"errmsg":"ok"}"#),
        ])
        .await;

        let err = channel(&server).send(&message()).await.unwrap_err();
        assert!(err.to_string().contains("invalid corpid"));

        let requests = server.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].path(), TOKEN_PATH);
    }

    #[tokio::test]
    async fn test_nonzero_errcode_is_failure() {
        let server = MockServer::start(vec![
            Route::new(TOKEN_PATH, 200, r#"{"errcode":0,"access_token":"AT-2"}"#),
            Route::new(SEND_PATH, 200, r#"{"errcode":81013,"errmsg":"user invalid"}"#),
        ])
        .await;

        let err = channel(&server).send(&message()).await.unwrap_err();
        assert!(err.to_string().contains("81013"));
    }

    #[tokio::test]
    async fn test_unreachable_gateway_is_failure() {
        let channel = WeComChannel::new("http://127.0.0.1:9", "c", "s", 1, "@all").unwrap();
        assert!(matches!(channel.send(&message()).await, Err(Error::Push(_))));
    }

    #[tokio::test]
    async fn test_errors_do_not_expose_corp_secret() {
        let channel =
            WeComChannel::new("http://127.0.0.1:9", "corp", "TOPSECRET", 1, "@all").unwrap();
        let err = channel.send(&message()).await.unwrap_err().to_string();
        assert!(err.contains("WeCom token request failed"));
        assert!(!err.contains("TOPSECRET"));
        assert!(!err.contains("corpsecret"));
    }

    #[tokio::test]
    async fn test_send_errors_do_not_expose_access_token() {
        let server = MockServer::start(vec![Route::new(
            TOKEN_PATH,
            200,
            r#"{"errcode":0,"access_token":"AT-SECRET"}"#,
        )])
        .await;

        // The send path has no route, so the 404 body fails to parse as JSON
        let err = channel(&server).send(&message()).await.unwrap_err().to_string();
        assert!(err.contains("Failed to parse WeCom send response"));
        assert!(!err.contains("AT-SECRET"));
    }
}
