/// OTP retrieval - polls the mailbox until a 6-digit passcode arrives
use std::time::Duration;

use formsentry_core::{MailboxConfig, ProbeError};
use regex::Regex;
use tokio::time::{sleep, timeout, Instant};
use tracing::{debug, info, warn};

use crate::client::MailboxApi;

/// A 6-digit passcode pulled out of a message body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedCode(String);

impl ExtractedCode {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl std::fmt::Display for ExtractedCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// First contiguous run of exactly six digits, bounded by non-digits on both
/// sides. A longer run never matches; the first occurrence wins, which can
/// false-positive on unrelated numeric content later in the body.
pub fn extract_code(body: &str) -> Option<ExtractedCode> {
    let re = Regex::new(r"\b\d{6}\b").unwrap();
    re.find(body).map(|m| ExtractedCode(m.as_str().to_string()))
}

#[derive(Debug, Clone)]
pub struct PollPolicy {
    pub max_attempts: u32,
    pub poll_interval: Duration,
    pub attempt_deadline: Duration,
}

impl Default for PollPolicy {
    fn default() -> Self {
        // 20 x 5s covers typical delivery latency for verification emails
        Self {
            max_attempts: 20,
            poll_interval: Duration::from_secs(5),
            attempt_deadline: Duration::from_secs(30),
        }
    }
}

impl From<&MailboxConfig> for PollPolicy {
    fn from(config: &MailboxConfig) -> Self {
        Self {
            max_attempts: config.max_attempts,
            poll_interval: Duration::from_secs(config.poll_interval_seconds),
            attempt_deadline: Duration::from_secs(config.attempt_deadline_seconds),
        }
    }
}

enum PollOutcome {
    Code(ExtractedCode),
    /// Inbox still empty
    NotYet,
    /// A message arrived but carried no 6-digit run; a later one still may
    Malformed,
}

pub struct OtpRetriever<A: MailboxApi> {
    api: A,
    policy: PollPolicy,
}

impl<A: MailboxApi> OtpRetriever<A> {
    pub fn new(api: A, policy: PollPolicy) -> Self {
        Self { api, policy }
    }

    /// Poll the inbox until the most recent message yields a passcode.
    ///
    /// Bounded retry with a fixed delay: delivery latency is not
    /// load-dependent from the caller's side, so there is no backoff. The
    /// terminal outcomes are the code or `ProbeError::OtpTimeout`; re-invoke
    /// for a fresh attempt budget.
    pub async fn retrieve_otp(&self, inbox_id: &str) -> Result<ExtractedCode, ProbeError> {
        let started = Instant::now();

        for attempt in 1..=self.policy.max_attempts {
            if attempt > 1 {
                sleep(self.policy.poll_interval).await;
            }

            debug!(
                "checking inbox {} (attempt {}/{})",
                inbox_id, attempt, self.policy.max_attempts
            );

            match timeout(self.policy.attempt_deadline, self.poll_once(inbox_id)).await {
                Ok(Ok(PollOutcome::Code(code))) => {
                    info!("passcode extracted after {} attempt(s)", attempt);
                    return Ok(code);
                }
                Ok(Ok(PollOutcome::NotYet)) => debug!("inbox still empty"),
                Ok(Ok(PollOutcome::Malformed)) => debug!("message present but no passcode in body"),
                // Transient: the mailbox service is eventually consistent,
                // a failed check counts against the budget and we move on
                Ok(Err(e)) => warn!("inbox check failed: {}", e),
                Err(_) => warn!(
                    "inbox check exceeded {:?} deadline",
                    self.policy.attempt_deadline
                ),
            }
        }

        warn!("no passcode after {} attempts", self.policy.max_attempts);

        Err(ProbeError::OtpTimeout {
            attempts: self.policy.max_attempts,
            elapsed_ms: started.elapsed().as_millis(),
        })
    }

    async fn poll_once(&self, inbox_id: &str) -> Result<PollOutcome, ProbeError> {
        let summaries = self.api.list_emails(inbox_id).await?;

        // Newest first per provider order; only the most recent message matters
        let Some(latest) = summaries.first() else {
            return Ok(PollOutcome::NotYet);
        };

        let email = self.api.fetch_email(&latest.id).await?;
        let body = email.body.unwrap_or_default();

        match extract_code(&body) {
            Some(code) => Ok(PollOutcome::Code(code)),
            None => Ok(PollOutcome::Malformed),
        }
    }
}
