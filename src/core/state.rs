//! # Application State
//!
//! Everything the views read, split into three independently reduced slices.
//!
//! ```text
//! RootState
//! ├── app: AppState
//! │   └── selected_city: String          // one of CITIES
//! ├── offers: OffersState
//! │   ├── offers: Arc<Vec<Offer>>        // server order, unique ids
//! │   ├── is_loading: bool
//! │   ├── error: Option<String>
//! │   ├── reviews: Arc<Vec<Review>>      // reviews of the offer on screen
//! │   └── is_reviews_loading: bool
//! └── user: UserState
//!     ├── auth_status: AuthStatus
//!     └── user: Option<User>
//! ```
//!
//! State changes only happen through `update(state, action)` in action.rs.
//! Collections sit behind `Arc` and are swapped, never mutated in place, so
//! selectors can tell "changed" from "unchanged" by pointer.

use std::sync::Arc;

use crate::api::{Offer, Review, User};

/// Cities the marketplace operates in, in tab order.
pub const CITIES: [&str; 6] = [
    "Paris",
    "Cologne",
    "Brussels",
    "Amsterdam",
    "Hamburg",
    "Dusseldorf",
];

pub const DEFAULT_CITY: &str = "Paris";

pub fn is_known_city(name: &str) -> bool {
    CITIES.contains(&name)
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppState {
    pub selected_city: String,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            selected_city: DEFAULT_CITY.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct OffersState {
    pub offers: Arc<Vec<Offer>>,
    pub is_loading: bool,
    pub error: Option<String>,
    pub reviews: Arc<Vec<Review>>,
    pub is_reviews_loading: bool,
}

/// Tri-state session resolution.
///
/// `Unknown` only exists until the first session check settles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AuthStatus {
    #[default]
    Unknown,
    Authenticated,
    NotAuthenticated,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserState {
    pub auth_status: AuthStatus,
    pub user: Option<User>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RootState {
    pub app: AppState,
    pub offers: OffersState,
    pub user: UserState,
}
