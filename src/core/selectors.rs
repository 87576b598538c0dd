//! # Selectors
//!
//! Derived reads over `RootState`. The free functions are the plain
//! derivations; `Selectors` caches the two the views hit on every render and
//! recomputes them only when their inputs change by identity (the offers
//! `Arc` pointer, the selected city).

use std::sync::{Arc, Mutex, PoisonError};

use crate::api::Offer;
use crate::core::state::{AuthStatus, RootState};

/// How many neighbours an offer page shows.
pub const NEAR_OFFERS_LIMIT: usize = 3;

pub fn filtered_offers(offers: &[Offer], city: &str) -> Vec<Offer> {
    offers
        .iter()
        .filter(|o| o.city.name == city)
        .cloned()
        .collect()
}

pub fn favorite_count(offers: &[Offer]) -> usize {
    offers.iter().filter(|o| o.is_favorite).count()
}

pub fn find_offer<'a>(offers: &'a [Offer], id: &str) -> Option<&'a Offer> {
    offers.iter().find(|o| o.id == id)
}

/// Other offers in the same city, in collection order, at most
/// `NEAR_OFFERS_LIMIT`. Empty when `id` is unknown.
pub fn near_offers(offers: &[Offer], id: &str) -> Vec<Offer> {
    let Some(current) = find_offer(offers, id) else {
        return Vec::new();
    };
    offers
        .iter()
        .filter(|o| o.city.name == current.city.name && o.id != current.id)
        .take(NEAR_OFFERS_LIMIT)
        .cloned()
        .collect()
}

/// Favorites grouped by city name, cities in first-seen order.
pub fn favorites_by_city(offers: &[Offer]) -> Vec<(String, Vec<Offer>)> {
    let mut groups: Vec<(String, Vec<Offer>)> = Vec::new();
    for offer in offers.iter().filter(|o| o.is_favorite) {
        match groups.iter_mut().find(|(city, _)| *city == offer.city.name) {
            Some((_, list)) => list.push(offer.clone()),
            None => groups.push((offer.city.name.clone(), vec![offer.clone()])),
        }
    }
    groups
}

/// Private pages (favorites) are only reachable once the session is
/// confirmed. `Unknown` is denied just like `NotAuthenticated`.
pub fn can_access_private(state: &RootState) -> bool {
    state.user.auth_status == AuthStatus::Authenticated
}

struct FilteredEntry {
    offers: Arc<Vec<Offer>>,
    city: String,
    result: Arc<Vec<Offer>>,
}

struct CountEntry {
    offers: Arc<Vec<Offer>>,
    count: usize,
}

/// Memoized selectors, one instance per store.
#[derive(Default)]
pub struct Selectors {
    filtered: Mutex<Option<FilteredEntry>>,
    favorites: Mutex<Option<CountEntry>>,
}

impl Selectors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Offers in the selected city. Returns the same `Arc` as the previous
    /// call while neither the offers collection nor the city changed.
    pub fn filtered_offers(&self, state: &RootState) -> Arc<Vec<Offer>> {
        let mut cache = self
            .filtered
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        if let Some(entry) = cache.as_ref()
            && Arc::ptr_eq(&entry.offers, &state.offers.offers)
            && entry.city == state.app.selected_city
        {
            return entry.result.clone();
        }

        let result = Arc::new(filtered_offers(
            &state.offers.offers,
            &state.app.selected_city,
        ));
        *cache = Some(FilteredEntry {
            offers: state.offers.offers.clone(),
            city: state.app.selected_city.clone(),
            result: result.clone(),
        });
        result
    }

    pub fn favorite_count(&self, state: &RootState) -> usize {
        let mut cache = self
            .favorites
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        if let Some(entry) = cache.as_ref()
            && Arc::ptr_eq(&entry.offers, &state.offers.offers)
        {
            return entry.count;
        }

        let count = favorite_count(&state.offers.offers);
        *cache = Some(CountEntry {
            offers: state.offers.offers.clone(),
            count,
        });
        count
    }
}
