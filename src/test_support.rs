//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::sync::Arc;

use crate::api::client::DEFAULT_TIMEOUT;
use crate::api::{ApiClient, City, Location, MemoryTokenStore, Offer, User};
use crate::core::store::Store;

fn location(city: &str) -> Location {
    match city {
        "Amsterdam" => Location {
            latitude: 52.370216,
            longitude: 4.895168,
            zoom: 10,
        },
        _ => Location {
            latitude: 48.85661,
            longitude: 2.351499,
            zoom: 10,
        },
    }
}

/// A summary-shaped offer in `city`.
pub fn offer(id: &str, city: &str, is_favorite: bool) -> Offer {
    Offer {
        id: id.to_string(),
        title: format!("Test Offer {id}"),
        kind: "apartment".to_string(),
        price: 100,
        rating: 4.5,
        preview_image: "test.jpg".to_string(),
        is_premium: false,
        is_favorite,
        city: City {
            name: city.to_string(),
            location: location(city),
        },
        location: location(city),
        images: None,
        bedrooms: None,
        max_adults: None,
        goods: None,
        host: None,
        description: None,
    }
}

pub fn user() -> User {
    User {
        email: "test@example.com".to_string(),
        token: "test-token".to_string(),
        name: "Test User".to_string(),
        avatar_url: "avatar.jpg".to_string(),
        is_pro: false,
    }
}

/// A store whose client points at an unroutable address. Fine for tests
/// that only dispatch.
pub fn test_store(token: Option<&str>) -> Store {
    let tokens = match token {
        Some(t) => MemoryTokenStore::with_token(t),
        None => MemoryTokenStore::new(),
    };
    let api = ApiClient::new("http://127.0.0.1:9", DEFAULT_TIMEOUT, Arc::new(tokens))
        .expect("client builds");
    Store::new(api)
}
