use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("mailbox API error: {0}")]
    Mailbox(String),

    #[error("no passcode after {attempts} attempts ({elapsed_ms}ms)")]
    OtpTimeout { attempts: u32, elapsed_ms: u128 },

    #[error("document error: {0}")]
    Document(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}
