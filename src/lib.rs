//! Signup-flow verification helpers: disposable-mailbox OTP retrieval and
//! DOM validation-signal detection.
//!
//! The two components are independent. An outer automation script supplies a
//! mailbox id to [`OtpRetriever`] and a [`DocumentSource`] handle to
//! [`ValidationDetector`]; neither owns the browser session or the inbox
//! lifecycle.

use std::path::Path;

use anyhow::{Context, Result};

pub use formsentry_core::{DetectionConfig, MailboxConfig, ProbeConfig, ProbeError};
pub use formsentry_detection::{
    DocumentSource, MismatchCheck, ValidationDetector, ValidationResult, ValidationSignal,
};
pub use formsentry_mailbox::{
    extract_code, Email, EmailSummary, ExtractedCode, Inbox, MailboxApi, MailslurpClient,
    OtpRetriever, PollPolicy,
};

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<ProbeConfig> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    let config: ProbeConfig =
        toml::from_str(&raw).with_context(|| format!("parsing config {}", path.display()))?;
    Ok(config)
}
