//! Input validation for lookups

/// Message shown when a lookup is attempted without an id
pub const BLANK_BATCH_ID: &str = "Please enter a batch ID";

/// Reject blank lookup ids; non-blank ids are used verbatim
pub fn validate_batch_id(batch_id: &str) -> Result<(), &'static str> {
    if batch_id.trim().is_empty() {
        return Err(BLANK_BATCH_ID);
    }
    Ok(())
}
