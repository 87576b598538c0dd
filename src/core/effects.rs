//! # Effects
//!
//! The asynchronous side of the store: each function calls the API and
//! dispatches the resulting actions. Callers may run them in background
//! tasks and ignore the outcome; only the operations that return a
//! `Result` expect the caller to react to a failure.
//!
//! ```text
//! view ─► effect ─► ApiClient ─► server
//!            │
//!            └──► store.dispatch(Action) ─► update() ─► subscribers
//! ```
//!
//! Concurrent calls are not fenced: whichever response settles last wins.

use std::fmt;

use log::{debug, info, warn};

use crate::api::{ApiError, Credentials, Offer, Review, ReviewDraft, User};
use crate::core::action::Action;
use crate::core::selectors::find_offer;
use crate::core::state::AuthStatus;
use crate::core::store::{LoadingFlag, LoadingGuard, Store};
use crate::core::validation::{EMPTY_PASSWORD_MESSAGE, validate_password};

/// Loads the full offers list, replacing whatever is in the store.
///
/// Failures land in `offers.error`. A 401 signs the session out instead
/// and leaves the error empty.
pub async fn fetch_offers(store: &Store) {
    let _loading = LoadingGuard::acquire(store, LoadingFlag::Offers);
    store.dispatch(Action::SetOffersError(None));

    match store.api().fetch_offers().await {
        Ok(offers) => {
            info!("Loaded {} offers", offers.len());
            store.dispatch(Action::LoadOffers(offers));
        }
        Err(ApiError::Unauthorized) => {
            debug!("Offers request rejected the session");
        }
        Err(e) => {
            warn!("Failed to load offers: {}", e);
            store.dispatch(Action::SetOffersError(Some(e.to_string())));
        }
    }
}

/// Resolves the session at startup. Never fails from the caller's view.
pub async fn check_auth(store: &Store) {
    match store.api().check_login().await {
        Ok(user) => {
            info!("Session active for {}", user.email);
            store.dispatch(Action::RequireAuthorization(AuthStatus::Authenticated));
            store.dispatch(Action::SetUser(Some(user)));
        }
        Err(e) => {
            debug!("No active session: {}", e);
            store.dispatch(Action::RequireAuthorization(AuthStatus::NotAuthenticated));
            store.dispatch(Action::SetUser(None));
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LoginError {
    /// Rejected locally, no request was sent.
    EmptyPassword,
    Api(ApiError),
}

impl LoginError {
    /// Text to show next to the sign-in form.
    pub fn user_message(&self) -> String {
        match self {
            LoginError::EmptyPassword => EMPTY_PASSWORD_MESSAGE.to_string(),
            LoginError::Api(ApiError::Api {
                status: 400,
                message,
            }) if !message.is_empty() => message.clone(),
            LoginError::Api(ApiError::Api { status: 400, .. })
            | LoginError::Api(ApiError::Unauthorized) => "Invalid email or password".to_string(),
            LoginError::Api(_) => "Failed to login. Please try again.".to_string(),
        }
    }
}

impl fmt::Display for LoginError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoginError::EmptyPassword => write!(f, "{EMPTY_PASSWORD_MESSAGE}"),
            LoginError::Api(e) => write!(f, "login failed: {e}"),
        }
    }
}

impl std::error::Error for LoginError {}

/// Signs in and persists the returned token.
///
/// A failed attempt drops any previous session, stored token included.
pub async fn login(store: &Store, email: &str, password: &str) -> Result<User, LoginError> {
    if !validate_password(password) {
        return Err(LoginError::EmptyPassword);
    }

    let credentials = Credentials {
        email: email.to_string(),
        password: password.to_string(),
    };

    match store.api().login(&credentials).await {
        Ok(user) => {
            info!("Signed in as {}", user.email);
            store.api().tokens().save(&user.token);
            store.dispatch(Action::RequireAuthorization(AuthStatus::Authenticated));
            store.dispatch(Action::SetUser(Some(user.clone())));
            Ok(user)
        }
        Err(e) => {
            warn!("Sign in failed: {}", e);
            store.api().tokens().clear();
            store.dispatch(Action::RequireAuthorization(AuthStatus::NotAuthenticated));
            store.dispatch(Action::SetUser(None));
            Err(LoginError::Api(e))
        }
    }
}

/// Signs out locally. The server keeps no session to tear down.
pub fn logout(store: &Store) {
    info!("Signing out");
    store.dispatch(Action::Logout);
}

/// Sets the favorite flag on the server and stores the record it returns.
pub async fn toggle_favorite(store: &Store, id: &str, is_favorite: bool) -> Result<Offer, ApiError> {
    let offer = store.api().set_favorite(id, is_favorite).await?;
    info!("Offer {} favorite={}", offer.id, offer.is_favorite);
    store.dispatch(Action::UpdateOffer(offer.clone()));
    Ok(offer)
}

/// Pulls the server favorite set and merges it into the offers list.
/// Leaves the store untouched on failure.
pub async fn fetch_favorite_offers(store: &Store) -> Result<(), ApiError> {
    let favorites = store.api().fetch_favorites().await.inspect_err(|e| {
        warn!("Failed to load favorites: {}", e);
    })?;
    info!("Loaded {} favorites", favorites.len());
    store.dispatch(Action::MergeFavorites(favorites));
    Ok(())
}

/// Loads one offer with its detail fields and patches it into the list.
///
/// When signed in, the favorite flag is taken from the server favorite set;
/// if that lookup fails the flag already in the store is kept. Any failure
/// of the offer request itself is logged and dropped.
pub async fn fetch_offer(store: &Store, id: &str) {
    let mut offer = match store.api().fetch_offer(id).await {
        Ok(offer) => offer,
        Err(e) => {
            warn!("Failed to load offer {}: {}", id, e);
            return;
        }
    };

    if store.auth_status() == AuthStatus::Authenticated {
        offer.is_favorite = match store.api().fetch_favorites().await {
            Ok(favorites) => favorites.iter().any(|f| f.id == offer.id),
            Err(e) => {
                debug!("Favorite lookup for {} failed, keeping local flag: {}", id, e);
                let state = store.state();
                find_offer(&state.offers.offers, id)
                    .map(|o| o.is_favorite)
                    .unwrap_or(offer.is_favorite)
            }
        };
    }

    store.dispatch(Action::UpdateOffer(offer));
}

/// Loads the reviews of one offer. A failure shows as an empty list.
pub async fn fetch_reviews(store: &Store, id: &str) {
    let _loading = LoadingGuard::acquire(store, LoadingFlag::Reviews);

    let reviews = store.api().fetch_reviews(id).await.unwrap_or_else(|e| {
        warn!("Failed to load reviews for {}: {}", id, e);
        Vec::new()
    });
    store.dispatch(Action::LoadReviews(reviews));
}

/// Publishes a review, then reloads the offer's reviews.
///
/// The draft is expected to be validated by the caller
/// (see `ReviewDraft::validate`).
pub async fn post_review(store: &Store, id: &str, draft: &ReviewDraft) -> Result<Review, ApiError> {
    let review = store.api().post_review(id, draft).await?;
    info!("Posted review {} for offer {}", review.id, id);
    fetch_reviews(store, id).await;
    Ok(review)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api_error(status: u16, message: &str) -> LoginError {
        LoginError::Api(ApiError::Api {
            status,
            message: message.to_string(),
        })
    }

    #[test]
    fn test_login_message_bad_request_uses_server_text() {
        assert_eq!(
            api_error(400, "email must be an email").user_message(),
            "email must be an email"
        );
    }

    #[test]
    fn test_login_message_bad_request_without_text() {
        assert_eq!(api_error(400, "").user_message(), "Invalid email or password");
    }

    #[test]
    fn test_login_message_unauthorized() {
        assert_eq!(
            LoginError::Api(ApiError::Unauthorized).user_message(),
            "Invalid email or password"
        );
    }

    #[test]
    fn test_login_message_other_failures_are_generic() {
        assert_eq!(
            api_error(500, "oops").user_message(),
            "Failed to login. Please try again."
        );
        assert_eq!(
            LoginError::Api(ApiError::Timeout).user_message(),
            "Failed to login. Please try again."
        );
    }

    #[test]
    fn test_login_message_empty_password() {
        assert_eq!(
            LoginError::EmptyPassword.user_message(),
            "Password cannot be empty or contain only spaces"
        );
    }
}
