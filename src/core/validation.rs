//! Input checks that run before anything reaches the network.

use std::fmt;

use crate::api::ReviewDraft;

pub const MIN_REVIEW_RATING: u8 = 1;
pub const MAX_REVIEW_RATING: u8 = 5;
pub const MIN_COMMENT_LENGTH: usize = 50;
pub const MAX_COMMENT_LENGTH: usize = 300;

pub const EMPTY_PASSWORD_MESSAGE: &str = "Password cannot be empty or contain only spaces";

/// A password made of whitespace only is rejected.
pub fn validate_password(password: &str) -> bool {
    !password.trim().is_empty()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewError {
    RatingOutOfRange(u8),
    CommentTooShort(usize),
    CommentTooLong(usize),
}

impl fmt::Display for ReviewError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReviewError::RatingOutOfRange(r) => write!(
                f,
                "rating must be between {MIN_REVIEW_RATING} and {MAX_REVIEW_RATING}, got {r}"
            ),
            ReviewError::CommentTooShort(n) => write!(
                f,
                "review must be at least {MIN_COMMENT_LENGTH} characters, got {n}"
            ),
            ReviewError::CommentTooLong(n) => write!(
                f,
                "review must be at most {MAX_COMMENT_LENGTH} characters, got {n}"
            ),
        }
    }
}

impl std::error::Error for ReviewError {}

impl ReviewDraft {
    /// Comment length is counted in characters, not bytes.
    pub fn validate(&self) -> Result<(), ReviewError> {
        if !(MIN_REVIEW_RATING..=MAX_REVIEW_RATING).contains(&self.rating) {
            return Err(ReviewError::RatingOutOfRange(self.rating));
        }
        let len = self.comment.chars().count();
        if len < MIN_COMMENT_LENGTH {
            return Err(ReviewError::CommentTooShort(len));
        }
        if len > MAX_COMMENT_LENGTH {
            return Err(ReviewError::CommentTooLong(len));
        }
        Ok(())
    }
}
