pub mod client;
pub mod otp;

pub use client::{Email, EmailSummary, Inbox, MailboxApi, MailslurpClient};
pub use otp::{extract_code, ExtractedCode, OtpRetriever, PollPolicy};
