//! Review form validation.

use serde::{Deserialize, Serialize};

use super::{MSG_REQUIRED, too_long};
use crate::validator::{FieldErrors, Validator, max_chars, not_blank};

/// Longest accepted review, in characters.
pub const COMMENT_MAX: usize = 500;

/// Raw review form fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReviewInput {
    pub comment: String,
}

/// Validate a review form, returning the comment to store.
///
/// # Errors
///
/// Returns the field errors when any check fails.
pub fn validate_review(input: &ReviewInput) -> Result<String, FieldErrors> {
    let mut v = Validator::new();
    v.check(not_blank(&input.comment), "comment", MSG_REQUIRED);
    v.check(max_chars(&input.comment, COMMENT_MAX), "comment", &too_long(COMMENT_MAX));
    v.finish()?;
    Ok(input.comment.clone())
}
