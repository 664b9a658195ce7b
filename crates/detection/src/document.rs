use async_trait::async_trait;
use formsentry_core::ProbeError;

/// Read-only view onto the live document under test.
///
/// Implementations snapshot the current DOM as HTML (a webdriver page source,
/// a CDP DOM dump). The detector re-parses a fresh snapshot on every poll, so
/// mutation between polls is expected. The handle is singly owned; one
/// logical thread of control drives it at a time.
#[async_trait]
pub trait DocumentSource: Send + Sync {
    async fn html(&self) -> Result<String, ProbeError>;
}
