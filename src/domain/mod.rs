pub mod calendar;
pub mod email_address;
pub mod identity;

pub use email_address::EmailAddress;
pub use identity::{ConnectAccountId, ExternalIdentity};

/// Rejects empty or whitespace-only free-text fields and returns the trimmed value.
pub fn required_text<'a>(field: &str, value: &'a str) -> Result<&'a str, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(format!("{field} cannot be empty"))
    } else {
        Ok(trimmed)
    }
}
