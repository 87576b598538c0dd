pub mod client;
pub mod token;
pub mod types;

pub use client::{ApiClient, ApiError, UnauthorizedHandler};
pub use token::{FileTokenStore, MemoryTokenStore, TokenStore};
pub use types::{City, Credentials, Host, Location, Offer, Review, ReviewDraft, User};
