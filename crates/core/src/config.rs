use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct ProbeConfig {
    pub mailbox: MailboxConfig,
    #[serde(default)]
    pub detection: DetectionConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct MailboxConfig {
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    pub api_key: String,
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_poll_interval")]
    pub poll_interval_seconds: u64,
    #[serde(default = "default_attempt_deadline")]
    pub attempt_deadline_seconds: u64,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DetectionConfig {
    #[serde(default = "default_wait_timeout")]
    pub wait_timeout_seconds: u64,
    #[serde(default = "default_detection_poll_ms")]
    pub poll_interval_ms: u64,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            wait_timeout_seconds: default_wait_timeout(),
            poll_interval_ms: default_detection_poll_ms(),
        }
    }
}

fn default_api_base_url() -> String { "https://api.mailslurp.com".to_string() }
fn default_max_attempts() -> u32 { 20 }
fn default_poll_interval() -> u64 { 5 }
fn default_attempt_deadline() -> u64 { 30 }
fn default_request_timeout() -> u64 { 30 }
fn default_wait_timeout() -> u64 { 5 }
fn default_detection_poll_ms() -> u64 { 250 }
