/// Specialized probe for the password/confirmPassword mismatch case
use std::time::Duration;

use formsentry_core::ProbeError;
use scraper::{Html, Selector};
use tracing::info;

use crate::detector::ValidationDetector;
use crate::document::DocumentSource;

/// Fields the signup form carries besides the password pair; used to tell a
/// clean mismatch from a broader validation failure
const TRACKED_FIELDS: [&str; 4] = ["firstName", "lastName", "email", "phoneNumber"];

/// Outcome of the password-mismatch probe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MismatchCheck {
    /// Exactly the password pair is flagged invalid
    Isolated,
    /// The pair is flagged, but unrelated fields are too - detected, not
    /// isolated, which points at a broader validation failure
    WithOtherFields,
    NotDetected,
}

impl MismatchCheck {
    pub fn detected(&self) -> bool {
        !matches!(self, MismatchCheck::NotDetected)
    }
}

impl ValidationDetector {
    /// Narrow the general detector to the password pair: succeeds only when
    /// both `password` and `confirmPassword` are flagged invalid.
    ///
    /// The wait predicate is the narrowed one, so an unrelated marker that
    /// renders a poll or two before the pair's `aria-invalid` propagates does
    /// not end the wait early; the full timeout is spent before concluding
    /// `NotDetected`.
    pub async fn check_password_mismatch(
        &self,
        doc: &dyn DocumentSource,
        timeout: Duration,
    ) -> Result<MismatchCheck, ProbeError> {
        let pair_invalid = |snapshot: &Html| {
            field_invalid(snapshot, "password") && field_invalid(snapshot, "confirmPassword")
        };

        let Some(html) = self.wait_until(doc, timeout, pair_invalid).await? else {
            return Ok(MismatchCheck::NotDetected);
        };

        let snapshot = Html::parse_document(&html);

        if TRACKED_FIELDS.iter().any(|f| field_invalid(&snapshot, f)) {
            info!("password pair invalid, but other fields are too");
            Ok(MismatchCheck::WithOtherFields)
        } else {
            info!("password mismatch isolated to the password pair");
            Ok(MismatchCheck::Isolated)
        }
    }
}

fn field_invalid(snapshot: &Html, field: &str) -> bool {
    let selector =
        Selector::parse(&format!(r#"input[name="{}"][aria-invalid="true"]"#, field)).unwrap();
    snapshot.select(&selector).next().is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::fakes::{PageSequence, StaticPage};

    const TIMEOUT: Duration = Duration::from_millis(40);

    fn detector() -> ValidationDetector {
        ValidationDetector::new(Duration::from_millis(5))
    }

    fn signup_form(pwd: bool, confirm: bool, email: bool) -> String {
        let flag = |on: bool| if on { r#" aria-invalid="true""# } else { "" };
        format!(
            r#"<form>
                <input name="firstName"/>
                <input name="lastName"/>
                <input name="email"{}/>
                <input name="phoneNumber"/>
                <input name="password"{}/>
                <input name="confirmPassword"{}/>
            </form>"#,
            flag(email),
            flag(pwd),
            flag(confirm)
        )
    }

    #[tokio::test]
    async fn isolated_mismatch() {
        let doc = StaticPage(signup_form(true, true, false));

        let outcome = detector().check_password_mismatch(&doc, TIMEOUT).await.unwrap();
        assert_eq!(outcome, MismatchCheck::Isolated);
        assert!(outcome.detected());
    }

    #[tokio::test]
    async fn mismatch_with_unrelated_fields_flagged() {
        let doc = StaticPage(signup_form(true, true, true));

        let outcome = detector().check_password_mismatch(&doc, TIMEOUT).await.unwrap();
        assert_eq!(outcome, MismatchCheck::WithOtherFields);
        assert!(outcome.detected());
    }

    #[tokio::test]
    async fn other_validation_without_the_pair_is_not_a_mismatch() {
        let doc = StaticPage(signup_form(false, false, true));

        let outcome = detector().check_password_mismatch(&doc, TIMEOUT).await.unwrap();
        assert_eq!(outcome, MismatchCheck::NotDetected);
        assert!(!outcome.detected());
    }

    #[tokio::test]
    async fn pair_flagged_after_unrelated_noise_is_still_detected() {
        // An unrelated field goes invalid one frame before the pair does;
        // the narrowed wait must not classify that early frame
        let doc = PageSequence::new(vec![
            &signup_form(false, false, true),
            &signup_form(true, true, false),
        ]);

        let outcome = detector()
            .check_password_mismatch(&doc, Duration::from_millis(500))
            .await
            .unwrap();
        assert_eq!(outcome, MismatchCheck::Isolated);
    }

    #[tokio::test]
    async fn clean_form_times_out_to_not_detected() {
        let doc = StaticPage(signup_form(false, false, false));

        let outcome = detector().check_password_mismatch(&doc, TIMEOUT).await.unwrap();
        assert_eq!(outcome, MismatchCheck::NotDetected);
    }
}
