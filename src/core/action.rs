//! # Actions
//!
//! Every state change in the client is an `Action`.
//! User picks a city? That's `Action::ChangeCity(name)`.
//! Server answers `GET /offers`? That's `Action::LoadOffers(list)`.
//!
//! The `update()` function takes the current state and an action and
//! rewrites the state. No I/O here. When an action needs something done
//! outside the state (forgetting the stored token on logout), `update()`
//! returns an `Effect` and the store carries it out.
//!
//! ```text
//! State + Action  →  update()  →  New State (+ Effect)
//! ```
//!
//! Each slice has its own reducer and ignores actions it does not own.

use std::sync::Arc;

use crate::api::{Offer, Review, User};
use crate::core::state::{AppState, AuthStatus, OffersState, RootState, UserState};

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    // App slice
    ChangeCity(String),

    // Offers slice
    LoadOffers(Vec<Offer>),
    SetOffersLoading(bool),
    SetOffersError(Option<String>),
    UpdateOfferFavorite { id: String, is_favorite: bool },
    UpdateOffer(Offer),
    /// Server favorite set: union by id, flags follow the server.
    MergeFavorites(Vec<Offer>),
    SetReviewsLoading(bool),
    LoadReviews(Vec<Review>),

    // User slice
    RequireAuthorization(AuthStatus),
    SetUser(Option<User>),
    Logout,
}

impl Action {
    /// Short name for logging (payloads can be large).
    pub fn name(&self) -> &'static str {
        match self {
            Action::ChangeCity(_) => "app/changeCity",
            Action::LoadOffers(_) => "offers/loadOffers",
            Action::SetOffersLoading(_) => "offers/setLoading",
            Action::SetOffersError(_) => "offers/setError",
            Action::UpdateOfferFavorite { .. } => "offers/updateOfferFavorite",
            Action::UpdateOffer(_) => "offers/updateOffer",
            Action::MergeFavorites(_) => "offers/mergeFavorites",
            Action::SetReviewsLoading(_) => "offers/setReviewsLoading",
            Action::LoadReviews(_) => "offers/loadReviews",
            Action::RequireAuthorization(_) => "user/requireAuthorization",
            Action::SetUser(_) => "user/setUser",
            Action::Logout => "user/logout",
        }
    }
}

/// Side effects requested by `update()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    None,
    /// Forget the persisted session token.
    ClearToken,
}

/// Root reducer: hands the action to every slice.
pub fn update(state: &mut RootState, action: Action) -> Effect {
    reduce_app(&mut state.app, &action);
    reduce_user(&mut state.user, &action);
    let effect = match action {
        Action::Logout => Effect::ClearToken,
        _ => Effect::None,
    };
    reduce_offers(&mut state.offers, action);
    effect
}

pub fn reduce_app(state: &mut AppState, action: &Action) {
    if let Action::ChangeCity(city) = action {
        state.selected_city = city.clone();
    }
}

pub fn reduce_offers(state: &mut OffersState, action: Action) {
    match action {
        Action::LoadOffers(offers) => {
            state.offers = Arc::new(offers);
        }
        Action::SetOffersLoading(is_loading) => {
            state.is_loading = is_loading;
        }
        Action::SetOffersError(error) => {
            state.error = error;
        }
        Action::UpdateOfferFavorite { id, is_favorite } => {
            let Some(pos) = state.offers.iter().position(|o| o.id == id) else {
                return;
            };
            let mut offers = state.offers.as_ref().clone();
            offers[pos].is_favorite = is_favorite;
            state.offers = Arc::new(offers);
        }
        Action::UpdateOffer(offer) => {
            let mut offers = state.offers.as_ref().clone();
            match offers.iter_mut().find(|o| o.id == offer.id) {
                Some(existing) => *existing = offer,
                None => offers.push(offer),
            }
            state.offers = Arc::new(offers);
        }
        Action::MergeFavorites(favorites) => {
            let mut offers = state.offers.as_ref().clone();
            // Anything the server no longer lists is not a favorite anymore
            for offer in offers.iter_mut() {
                if !favorites.iter().any(|f| f.id == offer.id) {
                    offer.is_favorite = false;
                }
            }
            for mut favorite in favorites {
                favorite.is_favorite = true;
                match offers.iter_mut().find(|o| o.id == favorite.id) {
                    Some(existing) => existing.overlay(favorite),
                    None => offers.push(favorite),
                }
            }
            state.offers = Arc::new(offers);
        }
        Action::SetReviewsLoading(is_loading) => {
            state.is_reviews_loading = is_loading;
        }
        Action::LoadReviews(reviews) => {
            state.reviews = Arc::new(reviews);
        }
        Action::ChangeCity(_)
        | Action::RequireAuthorization(_)
        | Action::SetUser(_)
        | Action::Logout => {}
    }
}

pub fn reduce_user(state: &mut UserState, action: &Action) {
    match action {
        Action::RequireAuthorization(status) => {
            state.auth_status = *status;
        }
        Action::SetUser(user) => {
            state.user = user.clone();
        }
        Action::Logout => {
            state.auth_status = AuthStatus::NotAuthenticated;
            state.user = None;
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{offer, user};
    use std::collections::HashSet;

    fn offers_state(offers: Vec<Offer>) -> OffersState {
        OffersState {
            offers: Arc::new(offers),
            ..Default::default()
        }
    }

    // ------------------------------------------------------------------
    // App slice
    // ------------------------------------------------------------------

    #[test]
    fn test_change_city() {
        let mut state = RootState::default();
        let effect = update(&mut state, Action::ChangeCity("Amsterdam".to_string()));
        assert_eq!(effect, Effect::None);
        assert_eq!(state.app, AppState {
            selected_city: "Amsterdam".to_string()
        });
    }

    #[test]
    fn test_change_city_leaves_other_slices_alone() {
        let mut state = RootState::default();
        state.offers = offers_state(vec![offer("1", "Paris", false)]);
        let before = state.offers.offers.clone();
        update(&mut state, Action::ChangeCity("Hamburg".to_string()));
        assert!(Arc::ptr_eq(&before, &state.offers.offers));
        assert_eq!(state.user, UserState::default());
    }

    // ------------------------------------------------------------------
    // Offers slice
    // ------------------------------------------------------------------

    #[test]
    fn test_load_offers() {
        let mut state = OffersState::default();
        let offers = vec![offer("1", "Paris", false), offer("2", "Amsterdam", true)];
        reduce_offers(&mut state, Action::LoadOffers(offers.clone()));
        assert_eq!(*state.offers, offers);
    }

    #[test]
    fn test_load_offers_replaces_existing() {
        let mut state = offers_state(vec![offer("1", "Paris", false)]);
        let replacement = vec![offer("2", "Amsterdam", true)];
        reduce_offers(&mut state, Action::LoadOffers(replacement.clone()));
        assert_eq!(*state.offers, replacement);
        assert_eq!(state.offers[0].id, "2");
    }

    #[test]
    fn test_set_loading_and_error() {
        let mut state = OffersState::default();
        reduce_offers(&mut state, Action::SetOffersLoading(true));
        assert!(state.is_loading);
        reduce_offers(&mut state, Action::SetOffersError(Some("boom".to_string())));
        assert_eq!(state.error.as_deref(), Some("boom"));
        reduce_offers(&mut state, Action::SetOffersLoading(false));
        reduce_offers(&mut state, Action::SetOffersError(None));
        assert!(!state.is_loading);
        assert!(state.error.is_none());
    }

    #[test]
    fn test_update_offer_favorite_existing() {
        let mut state = offers_state(vec![offer("1", "Paris", false)]);
        reduce_offers(
            &mut state,
            Action::UpdateOfferFavorite {
                id: "1".to_string(),
                is_favorite: true,
            },
        );
        assert!(state.offers[0].is_favorite);
    }

    #[test]
    fn test_update_offer_favorite_missing_is_noop() {
        let mut state = offers_state(vec![offer("1", "Paris", false)]);
        let before = state.offers.clone();
        reduce_offers(
            &mut state,
            Action::UpdateOfferFavorite {
                id: "999".to_string(),
                is_favorite: true,
            },
        );
        assert!(Arc::ptr_eq(&before, &state.offers));
        assert!(!state.offers[0].is_favorite);
    }

    #[test]
    fn test_update_offer_replaces_existing() {
        let mut state = offers_state(vec![offer("1", "Paris", false)]);
        let mut changed = offer("1", "Paris", false);
        changed.title = "Updated Title".to_string();
        changed.price = 150;
        reduce_offers(&mut state, Action::UpdateOffer(changed));
        assert_eq!(state.offers.len(), 1);
        assert_eq!(state.offers[0].title, "Updated Title");
        assert_eq!(state.offers[0].price, 150);
    }

    #[test]
    fn test_update_offer_appends_new() {
        let mut state = offers_state(vec![offer("1", "Paris", false)]);
        let new_offer = offer("2", "Amsterdam", true);
        reduce_offers(&mut state, Action::UpdateOffer(new_offer.clone()));
        assert_eq!(state.offers.len(), 2);
        assert_eq!(state.offers.iter().find(|o| o.id == "2"), Some(&new_offer));
    }

    #[test]
    fn test_upserts_keep_ids_unique() {
        let mut state = OffersState::default();
        let ids = ["1", "2", "1", "3", "2", "1"];
        for (i, id) in ids.iter().enumerate() {
            reduce_offers(&mut state, Action::UpdateOffer(offer(id, "Paris", i % 2 == 0)));
            reduce_offers(
                &mut state,
                Action::UpdateOfferFavorite {
                    id: id.to_string(),
                    is_favorite: i % 3 == 0,
                },
            );
        }
        let unique: HashSet<_> = state.offers.iter().map(|o| o.id.as_str()).collect();
        assert_eq!(unique.len(), state.offers.len());
        assert_eq!(state.offers.len(), 3);
    }

    #[test]
    fn test_merge_favorites_overlays_and_appends() {
        let mut detailed = offer("1", "Paris", false);
        detailed.bedrooms = Some(2);
        let mut state = offers_state(vec![detailed, offer("2", "Paris", false)]);

        let mut fav1 = offer("1", "Paris", false);
        fav1.price = 321;
        let fav3 = offer("3", "Cologne", true);
        reduce_offers(&mut state, Action::MergeFavorites(vec![fav1, fav3]));

        assert_eq!(state.offers.len(), 3);
        let first = &state.offers[0];
        assert!(first.is_favorite);
        assert_eq!(first.price, 321);
        assert_eq!(first.bedrooms, Some(2));
        assert!(!state.offers[1].is_favorite);
        assert_eq!(state.offers[2].id, "3");
        assert!(state.offers[2].is_favorite);
    }

    #[test]
    fn test_merge_favorites_clears_stale_flags() {
        let mut state = offers_state(vec![offer("1", "Paris", true), offer("2", "Paris", true)]);
        reduce_offers(
            &mut state,
            Action::MergeFavorites(vec![offer("2", "Paris", true)]),
        );
        assert!(!state.offers[0].is_favorite);
        assert!(state.offers[1].is_favorite);
    }

    #[test]
    fn test_reviews_loading_and_load() {
        let mut state = OffersState::default();
        reduce_offers(&mut state, Action::SetReviewsLoading(true));
        assert!(state.is_reviews_loading);
        reduce_offers(&mut state, Action::LoadReviews(Vec::new()));
        reduce_offers(&mut state, Action::SetReviewsLoading(false));
        assert!(!state.is_reviews_loading);
        assert!(state.reviews.is_empty());
    }

    // ------------------------------------------------------------------
    // User slice
    // ------------------------------------------------------------------

    #[test]
    fn test_require_authorization() {
        let mut state = UserState::default();
        reduce_user(&mut state, &Action::RequireAuthorization(AuthStatus::Authenticated));
        assert_eq!(state.auth_status, AuthStatus::Authenticated);
        reduce_user(&mut state, &Action::RequireAuthorization(AuthStatus::NotAuthenticated));
        assert_eq!(state.auth_status, AuthStatus::NotAuthenticated);
    }

    #[test]
    fn test_set_user() {
        let mut state = UserState::default();
        reduce_user(&mut state, &Action::SetUser(Some(user())));
        assert_eq!(state.user, Some(user()));
        reduce_user(&mut state, &Action::SetUser(None));
        assert!(state.user.is_none());
    }

    #[test]
    fn test_logout_from_any_status() {
        for status in [
            AuthStatus::Unknown,
            AuthStatus::Authenticated,
            AuthStatus::NotAuthenticated,
        ] {
            let mut state = RootState::default();
            state.user = UserState {
                auth_status: status,
                user: Some(user()),
            };
            let effect = update(&mut state, Action::Logout);
            assert_eq!(effect, Effect::ClearToken);
            assert_eq!(state.user, UserState {
                auth_status: AuthStatus::NotAuthenticated,
                user: None,
            });
        }
    }

    #[test]
    fn test_action_names_are_namespaced_by_slice() {
        assert_eq!(Action::ChangeCity("Paris".into()).name(), "app/changeCity");
        assert_eq!(Action::LoadOffers(vec![]).name(), "offers/loadOffers");
        assert_eq!(Action::Logout.name(), "user/logout");
    }
}
