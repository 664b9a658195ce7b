use std::time::Duration;

use formsentry_core::{DetectionConfig, ProbeError};
use scraper::Html;
use tokio::time::{sleep, Instant};
use tracing::{debug, info};

use crate::document::DocumentSource;
use crate::signals::{
    AriaInvalidCheck, ErrorBorderCheck, ErrorMessageCheck, SignalCheck, ValidationResult,
};

/// Watches a document for form-validation feedback.
///
/// One ordered list of independent checks; the first poll where any check
/// fires triggers an exhaustive aggregation pass over that snapshot. There
/// are no fixed sleeps anywhere, only predicate polling against a bounded
/// timeout.
pub struct ValidationDetector {
    checks: Vec<Box<dyn SignalCheck>>,
    poll_interval: Duration,
    wait_timeout: Duration,
}

impl Default for ValidationDetector {
    fn default() -> Self {
        Self {
            checks: vec![
                Box::new(AriaInvalidCheck),
                Box::new(ErrorBorderCheck),
                Box::new(ErrorMessageCheck),
            ],
            poll_interval: Duration::from_millis(250),
            wait_timeout: Duration::from_secs(5),
        }
    }
}

impl ValidationDetector {
    pub fn new(poll_interval: Duration) -> Self {
        Self {
            poll_interval,
            ..Self::default()
        }
    }

    pub fn from_config(config: &DetectionConfig) -> Self {
        Self {
            poll_interval: Duration::from_millis(config.poll_interval_ms),
            wait_timeout: Duration::from_secs(config.wait_timeout_seconds),
            ..Self::default()
        }
    }

    /// Configured wait budget; pass this to `check_validation` when the
    /// caller has no scenario-specific one
    pub fn wait_timeout(&self) -> Duration {
        self.wait_timeout
    }

    /// Wait up to `timeout` for any validation marker to surface, then report
    /// every signal on the page, ordered and deduplicated.
    ///
    /// Timing out is a legitimate "no validation surfaced" outcome, not an
    /// error; the full timeout is always waited before concluding that.
    pub async fn check_validation(
        &self,
        doc: &dyn DocumentSource,
        timeout: Duration,
    ) -> Result<ValidationResult, ProbeError> {
        match self.wait_for_signal(doc, timeout).await? {
            Some(html) => {
                let snapshot = Html::parse_document(&html);
                let result = self.aggregate(&snapshot);
                info!("validation detected: {} signal(s)", result.signals.len());
                Ok(result)
            }
            None => {
                debug!("no validation markers within {:?}", timeout);
                Ok(ValidationResult::none())
            }
        }
    }

    /// Poll snapshots until a check fires or the deadline passes; returns the
    /// triggering snapshot so callers classify exactly what fired.
    pub(crate) async fn wait_for_signal(
        &self,
        doc: &dyn DocumentSource,
        timeout: Duration,
    ) -> Result<Option<String>, ProbeError> {
        self.wait_until(doc, timeout, |snapshot| {
            self.checks
                .iter()
                .any(|check| !check.scan(snapshot).is_empty())
        })
        .await
    }

    /// Poll snapshots until `predicate` holds or the deadline passes.
    pub(crate) async fn wait_until<F>(
        &self,
        doc: &dyn DocumentSource,
        timeout: Duration,
        predicate: F,
    ) -> Result<Option<String>, ProbeError>
    where
        F: Fn(&Html) -> bool + Send + Sync,
    {
        let deadline = Instant::now() + timeout;

        loop {
            let html = doc.html().await?;

            let holds = {
                let snapshot = Html::parse_document(&html);
                predicate(&snapshot)
            };

            if holds {
                return Ok(Some(html));
            }

            let now = Instant::now();
            if now >= deadline {
                return Ok(None);
            }
            sleep(self.poll_interval.min(deadline - now)).await;
        }
    }

    fn aggregate(&self, snapshot: &Html) -> ValidationResult {
        let mut result = ValidationResult::none();

        for check in &self.checks {
            for signal in check.scan(snapshot) {
                debug!("{}: {:?}", check.name(), signal);
                result.push(signal);
            }
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::fakes::{PageSequence, StaticPage};
    use crate::signals::ValidationSignal;

    const CLEAN_FORM: &str = r#"<form><div><input name="email" type="email"/></div></form>"#;

    fn fast_detector() -> ValidationDetector {
        ValidationDetector::new(Duration::from_millis(5))
    }

    #[tokio::test]
    async fn clean_document_waits_the_full_timeout() {
        let doc = StaticPage(CLEAN_FORM.to_string());
        let timeout = Duration::from_millis(40);

        let started = std::time::Instant::now();
        let result = fast_detector().check_validation(&doc, timeout).await.unwrap();

        assert!(!result.found);
        assert!(result.signals.is_empty());
        assert!(started.elapsed() >= timeout);
    }

    #[tokio::test]
    async fn aria_and_border_on_same_field_yield_one_signal() {
        let html = r#"<form>
            <input name="email" aria-invalid="true" class="w-full border-destructive"/>
        </form>"#;
        let doc = StaticPage(html.to_string());

        let result = fast_detector()
            .check_validation(&doc, Duration::from_millis(40))
            .await
            .unwrap();

        assert!(result.found);
        assert_eq!(
            result.signals,
            vec![ValidationSignal::AriaInvalid {
                field: "email".to_string()
            }]
        );
    }

    #[test]
    fn from_config_wires_both_knobs() {
        let config = DetectionConfig {
            wait_timeout_seconds: 2,
            poll_interval_ms: 50,
        };

        let detector = ValidationDetector::from_config(&config);
        assert_eq!(detector.wait_timeout(), Duration::from_secs(2));
        assert_eq!(detector.poll_interval, Duration::from_millis(50));
    }

    #[tokio::test]
    async fn picks_up_signals_that_surface_later() {
        let doc = PageSequence::new(vec![
            CLEAN_FORM,
            r#"<form>
                <div><input name="email" aria-invalid="true"/></div>
                <p class="text-destructive">Email is required</p>
            </form>"#,
        ]);

        let result = fast_detector()
            .check_validation(&doc, Duration::from_millis(500))
            .await
            .unwrap();

        assert!(result.found);
        assert_eq!(
            result.signals,
            vec![
                ValidationSignal::AriaInvalid {
                    field: "email".to_string()
                },
                ValidationSignal::ErrorMessage {
                    text: "Email is required".to_string(),
                    field: "email".to_string(),
                },
            ]
        );
    }
}
