use super::{PushChannel, PushMessage, PushPlusChannel, WeComChannel};
use crate::config::{PushConfig, PushCredentials};
use crate::Result;

/// Delivers a message through the configured channel and reports success as a bool
pub struct Dispatcher {
    channel: Box<dyn PushChannel>,
}

impl Dispatcher {
    /// Build the channel matching the validated credentials
    pub fn from_credentials(credentials: &PushCredentials, config: &PushConfig) -> Result<Self> {
        let channel: Box<dyn PushChannel> = match credentials {
            PushCredentials::PushPlus { token, channel } => Box::new(PushPlusChannel::new(
                &config.pushplus.endpoint,
                token,
                channel.as_deref(),
            )?),
            PushCredentials::WeCom {
                corp_id,
                corp_secret,
                agent_id,
                to_user,
            } => Box::new(WeComChannel::new(
                &config.wecom.api_base,
                corp_id,
                corp_secret,
                *agent_id,
                to_user,
            )?),
        };

        Ok(Self::new(channel))
    }

    pub fn new(channel: Box<dyn PushChannel>) -> Self {
        Self { channel }
    }

    pub fn channel_name(&self) -> &str {
        self.channel.name()
    }

    /// Single delivery attempt. Errors are logged, never returned.
    pub async fn dispatch(&self, message: &PushMessage) -> bool {
        tracing::info!("Pushing '{}' via {}", message.title, self.channel.name());

        match self.channel.send(message).await {
            Ok(()) => {
                tracing::info!("Push succeeded");
                true
            }
            Err(e) => {
                tracing::error!("Push via {} failed: {}", self.channel.name(), e);
                false
            }
        }
    }
}
