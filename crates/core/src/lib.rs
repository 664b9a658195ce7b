pub mod config;
pub mod error;

pub use config::{DetectionConfig, MailboxConfig, ProbeConfig};
pub use error::ProbeError;
