use chrono::{FixedOffset, Offset, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub digest: DigestConfig,
    #[serde(default)]
    pub sync: SyncConfig,
    #[serde(default)]
    pub rsshub: RsshubConfig,
    #[serde(default)]
    pub translate: TranslateConfig,
    #[serde(default)]
    pub push: PushConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Log level used when RUST_LOG is not set
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// UTC offset (hours) used for timestamps and the digest title
    #[serde(default)]
    pub utc_offset_hours: i32,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            utc_offset_hours: 0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DigestConfig {
    /// Trailing window in hours; older articles are dropped
    #[serde(default = "default_recency_hours")]
    pub recency_hours: u32,
    /// Raw entries considered per feed
    #[serde(default = "default_max_entries_per_feed")]
    pub max_entries_per_feed: usize,
    /// Articles rendered per source
    #[serde(default = "default_max_articles_per_source")]
    pub max_articles_per_source: usize,
}

impl Default for DigestConfig {
    fn default() -> Self {
        Self {
            recency_hours: default_recency_hours(),
            max_entries_per_feed: default_max_entries_per_feed(),
            max_articles_per_source: default_max_articles_per_source(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub request_timeout_secs: u64,
    /// HTTP proxy URL for feed fetching (e.g., "http://127.0.0.1:7890" or "socks5://127.0.0.1:1080")
    #[serde(default)]
    pub proxy_url: Option<String>,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: default_timeout(),
            proxy_url: None,
            user_agent: default_user_agent(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RsshubConfig {
    /// RSSHub base URL
    #[serde(default = "default_rsshub_base_url")]
    pub base_url: String,
    /// RSSHub access key (for protected instances)
    #[serde(default)]
    pub access_key: Option<String>,
}

impl Default for RsshubConfig {
    fn default() -> Self {
        Self {
            base_url: default_rsshub_base_url(),
            access_key: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslateConfig {
    /// Translate titles and summaries before rendering
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_source_lang")]
    pub source_lang: String,
    #[serde(default = "default_target_lang")]
    pub target_lang: String,
    /// Translation endpoint (Google `translate_a/single` compatible)
    #[serde(default = "default_translate_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_translate_timeout")]
    pub timeout_secs: u64,
}

impl Default for TranslateConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            source_lang: default_source_lang(),
            target_lang: default_target_lang(),
            endpoint: default_translate_endpoint(),
            timeout_secs: default_translate_timeout(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PushConfig {
    /// Push backend: "pushplus" or "wecom"
    #[serde(default = "default_push_provider")]
    pub provider: String,
    #[serde(default)]
    pub pushplus: PushPlusConfig,
    #[serde(default)]
    pub wecom: WeComConfig,
}

impl Default for PushConfig {
    fn default() -> Self {
        Self {
            provider: default_push_provider(),
            pushplus: PushPlusConfig::default(),
            wecom: WeComConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PushPlusConfig {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default = "default_pushplus_endpoint")]
    pub endpoint: String,
    /// Delivery channel, e.g. "wechat"; omitted from the request when unset
    #[serde(default)]
    pub channel: Option<String>,
}

impl Default for PushPlusConfig {
    fn default() -> Self {
        Self {
            token: None,
            endpoint: default_pushplus_endpoint(),
            channel: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeComConfig {
    #[serde(default)]
    pub corp_id: Option<String>,
    #[serde(default)]
    pub corp_secret: Option<String>,
    /// Application id; must be numeric
    #[serde(default)]
    pub agent_id: Option<String>,
    #[serde(default = "default_wecom_to_user")]
    pub to_user: String,
    #[serde(default = "default_wecom_api_base")]
    pub api_base: String,
}

impl Default for WeComConfig {
    fn default() -> Self {
        Self {
            corp_id: None,
            corp_secret: None,
            agent_id: None,
            to_user: default_wecom_to_user(),
            api_base: default_wecom_api_base(),
        }
    }
}

/// Validated credentials for the selected push backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PushCredentials {
    PushPlus {
        token: String,
        channel: Option<String>,
    },
    WeCom {
        corp_id: String,
        corp_secret: String,
        agent_id: i64,
        to_user: String,
    },
}

impl PushConfig {
    /// Check that the selected provider has everything it needs.
    pub fn credentials(&self) -> crate::Result<PushCredentials> {
        match self.provider.trim().to_ascii_lowercase().as_str() {
            "pushplus" => {
                let token = required(&self.pushplus.token, "PUSHPLUS_TOKEN")?;
                Ok(PushCredentials::PushPlus {
                    token,
                    channel: self.pushplus.channel.clone(),
                })
            }
            "wecom" => {
                let corp_id = required(&self.wecom.corp_id, "WECOM_CORP_ID")?;
                let corp_secret = required(&self.wecom.corp_secret, "WECOM_CORP_SECRET")?;
                let agent_id = required(&self.wecom.agent_id, "WECOM_AGENT_ID")?;
                let agent_id = agent_id.trim().parse::<i64>().map_err(|_| {
                    crate::Error::Config(format!("WECOM_AGENT_ID must be numeric, got '{}'", agent_id))
                })?;
                Ok(PushCredentials::WeCom {
                    corp_id,
                    corp_secret,
                    agent_id,
                    to_user: self.wecom.to_user.clone(),
                })
            }
            other => Err(crate::Error::Config(format!(
                "Unknown push provider '{}' (expected \"pushplus\" or \"wecom\")",
                other
            ))),
        }
    }
}

fn required(value: &Option<String>, name: &str) -> crate::Result<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .ok_or_else(|| crate::Error::Config(format!("{} is not set", name)))
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_recency_hours() -> u32 {
    24
}

fn default_max_entries_per_feed() -> usize {
    20
}

fn default_max_articles_per_source() -> usize {
    10
}

fn default_timeout() -> u64 {
    30
}

fn default_user_agent() -> String {
    concat!("techbrief/", env!("CARGO_PKG_VERSION")).to_string()
}

fn default_rsshub_base_url() -> String {
    "https://rsshub.app".to_string()
}

fn default_source_lang() -> String {
    "auto".to_string()
}

fn default_target_lang() -> String {
    "zh-CN".to_string()
}

fn default_translate_endpoint() -> String {
    "https://translate.googleapis.com/translate_a/single".to_string()
}

fn default_translate_timeout() -> u64 {
    10
}

fn default_push_provider() -> String {
    "pushplus".to_string()
}

fn default_pushplus_endpoint() -> String {
    "http://www.pushplus.plus/send".to_string()
}

fn default_wecom_to_user() -> String {
    "@all".to_string()
}

fn default_wecom_api_base() -> String {
    "https://qyapi.weixin.qq.com".to_string()
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

impl AppConfig {
    /// Load configuration from file. Environment overrides are applied separately
    /// with [`AppConfig::apply_env`].
    /// An explicit path must exist; a missing default file means defaults.
    pub fn load_file(path: Option<&Path>) -> crate::Result<Self> {
        let config_path = match path {
            Some(p) => p.to_path_buf(),
            None => {
                let default_path = Self::config_path();
                if !default_path.exists() {
                    return Ok(Self::default());
                }
                default_path
            }
        };

        let content = std::fs::read_to_string(&config_path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> crate::Result<Self> {
        toml::from_str(content).map_err(|e| crate::Error::Config(e.to_string()))
    }

    /// Get the configuration file path
    /// Always uses ~/.config/techbrief/config.toml on all platforms
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("techbrief")
            .join("config.toml")
    }

    /// Override credentials and switches from the process environment
    pub fn apply_env(&mut self) {
        self.apply_env_with(|key| std::env::var(key).ok());
    }

    /// Override from an arbitrary lookup. Empty values count as unset.
    pub fn apply_env_with<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(provider) = get("PUSH_PROVIDER") {
            self.push.provider = provider;
        }
        if let Some(token) = get("PUSHPLUS_TOKEN") {
            self.push.pushplus.token = Some(token);
        }
        if let Some(channel) = get("PUSHPLUS_CHANNEL") {
            self.push.pushplus.channel = Some(channel);
        }
        if let Some(corp_id) = get("WECOM_CORP_ID") {
            self.push.wecom.corp_id = Some(corp_id);
        }
        if let Some(secret) = get("WECOM_CORP_SECRET") {
            self.push.wecom.corp_secret = Some(secret);
        }
        if let Some(agent_id) = get("WECOM_AGENT_ID") {
            self.push.wecom.agent_id = Some(agent_id);
        }
        if let Some(to_user) = get("WECOM_TO_USER") {
            self.push.wecom.to_user = to_user;
        }
        if let Some(base_url) = get("RSSHUB_BASE_URL") {
            self.rsshub.base_url = base_url;
        }
        if let Some(raw) = get("TRANSLATE_ENABLED") {
            match parse_bool(&raw) {
                Some(enabled) => self.translate.enabled = enabled,
                None => tracing::warn!("Ignoring unrecognized TRANSLATE_ENABLED value: {}", raw),
            }
        }
    }

    /// Offset used when displaying times
    pub fn display_offset(&self) -> FixedOffset {
        self.general
            .utc_offset_hours
            .checked_mul(3600)
            .and_then(FixedOffset::east_opt)
            .unwrap_or_else(|| {
                tracing::warn!(
                    "utc_offset_hours {} out of range, using UTC",
                    self.general.utc_offset_hours
                );
                Utc.fix()
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.digest.recency_hours, 24);
        assert_eq!(config.digest.max_entries_per_feed, 20);
        assert_eq!(config.digest.max_articles_per_source, 10);
        assert_eq!(config.push.provider, "pushplus");
        assert_eq!(config.translate.target_lang, "zh-CN");
        assert!(!config.translate.enabled);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = AppConfig::from_toml_str(
            r#"
            [digest]
            recency_hours = 12

            [push]
            provider = "wecom"

            [push.wecom]
            corp_id = "ww123"
            "#,
        )
        .unwrap();

        assert_eq!(config.digest.recency_hours, 12);
        assert_eq!(config.digest.max_entries_per_feed, 20);
        assert_eq!(config.push.provider, "wecom");
        assert_eq!(config.push.wecom.corp_id.as_deref(), Some("ww123"));
        assert_eq!(config.push.wecom.to_user, "@all");
    }

    #[test]
    fn test_malformed_toml_is_config_error() {
        let err = AppConfig::from_toml_str("[digest\nrecency_hours = ").unwrap_err();
        assert!(matches!(err, crate::Error::Config(_)));
    }

    #[test]
    fn test_missing_token_is_fatal() {
        let config = AppConfig::default();
        let err = config.push.credentials().unwrap_err();
        assert!(err.to_string().contains("PUSHPLUS_TOKEN"));
    }

    #[test]
    fn test_env_overlay_pushplus() {
        let vars = env(&[("PUSHPLUS_TOKEN", "abc"), ("PUSHPLUS_CHANNEL", "wechat")]);
        let mut config = AppConfig::default();
        config.apply_env_with(|k| vars.get(k).cloned());

        assert_eq!(
            config.push.credentials().unwrap(),
            PushCredentials::PushPlus {
                token: "abc".to_string(),
                channel: Some("wechat".to_string()),
            }
        );
    }

    #[test]
    fn test_empty_env_value_counts_as_unset() {
        let vars = env(&[("PUSHPLUS_TOKEN", "  ")]);
        let mut config = AppConfig::default();
        config.apply_env_with(|k| vars.get(k).cloned());
        assert!(config.push.credentials().is_err());
    }

    #[test]
    fn test_wecom_requires_all_fields() {
        let vars = env(&[
            ("PUSH_PROVIDER", "WeCom"),
            ("WECOM_CORP_ID", "ww1"),
            ("WECOM_CORP_SECRET", "s3cret"),
        ]);
        let mut config = AppConfig::default();
        config.apply_env_with(|k| vars.get(k).cloned());

        let err = config.push.credentials().unwrap_err();
        assert!(err.to_string().contains("WECOM_AGENT_ID"));
    }

    #[test]
    fn test_wecom_credentials() {
        let vars = env(&[
            ("PUSH_PROVIDER", "wecom"),
            ("WECOM_CORP_ID", "ww1"),
            ("WECOM_CORP_SECRET", "s3cret"),
            ("WECOM_AGENT_ID", "1000002"),
            ("WECOM_TO_USER", "alice|bob"),
        ]);
        let mut config = AppConfig::default();
        config.apply_env_with(|k| vars.get(k).cloned());

        assert_eq!(
            config.push.credentials().unwrap(),
            PushCredentials::WeCom {
                corp_id: "ww1".to_string(),
                corp_secret: "s3cret".to_string(),
                agent_id: 1000002,
                to_user: "alice|bob".to_string(),
            }
        );
    }

    #[test]
    fn test_wecom_agent_id_must_be_numeric() {
        let mut config = AppConfig::default();
        config.push.provider = "wecom".to_string();
        config.push.wecom.corp_id = Some("ww1".to_string());
        config.push.wecom.corp_secret = Some("s".to_string());
        config.push.wecom.agent_id = Some("abc".to_string());
        assert!(matches!(config.push.credentials(), Err(crate::Error::Config(_))));
    }

    #[test]
    fn test_translate_enabled_from_env() {
        let vars = env(&[("TRANSLATE_ENABLED", "true")]);
        let mut config = AppConfig::default();
        config.apply_env_with(|k| vars.get(k).cloned());
        assert!(config.translate.enabled);

        let vars = env(&[("TRANSLATE_ENABLED", "maybe")]);
        config.apply_env_with(|k| vars.get(k).cloned());
        assert!(config.translate.enabled);
    }

    #[test]
    fn test_display_offset() {
        let mut config = AppConfig::default();
        assert_eq!(config.display_offset().local_minus_utc(), 0);

        config.general.utc_offset_hours = 8;
        assert_eq!(config.display_offset().local_minus_utc(), 8 * 3600);

        config.general.utc_offset_hours = 99;
        assert_eq!(config.display_offset().local_minus_utc(), 0);
    }

    #[test]
    fn test_display_offset_huge_value_falls_back_to_utc() {
        let mut config = AppConfig::default();
        config.general.utc_offset_hours = 1_000_000;
        assert_eq!(config.display_offset().local_minus_utc(), 0);

        config.general.utc_offset_hours = i32::MIN;
        assert_eq!(config.display_offset().local_minus_utc(), 0);
    }
}
