mod dispatcher;
mod pushplus;
mod wecom;

pub use dispatcher::Dispatcher;
pub use pushplus::PushPlusChannel;
pub use wecom::WeComChannel;

use crate::Result;

/// Total budget for a message send request
pub const SEND_TIMEOUT_SECS: u64 = 30;
/// Budget for the WeCom access-token exchange
pub const TOKEN_TIMEOUT_SECS: u64 = 10;

/// A rendered digest ready for delivery
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushMessage {
    pub title: String,
    pub body: String,
}

impl PushMessage {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
        }
    }

    /// Body prefixed with a level-1 heading repeating the title
    pub fn markdown_content(&self) -> String {
        format!("# {}\n\n{}", self.title, self.body)
    }
}

/// A notification backend that can deliver one message
#[async_trait::async_trait]
pub trait PushChannel: Send + Sync {
    /// Short identifier used in log lines
    fn name(&self) -> &str;

    /// Deliver the message. Any transport failure or non-success backend code is an error.
    async fn send(&self, message: &PushMessage) -> Result<()>;
}
