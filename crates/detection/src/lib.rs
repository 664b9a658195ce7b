pub mod detector;
pub mod document;
pub mod password;
pub mod signals;

pub use detector::ValidationDetector;
pub use document::DocumentSource;
pub use password::MismatchCheck;
pub use signals::{SignalCheck, ValidationResult, ValidationSignal};
