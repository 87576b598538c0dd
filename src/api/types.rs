use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Map coordinates as the server sends them.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
    pub zoom: u8,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct City {
    pub name: String,
    pub location: Location,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Host {
    pub name: String,
    pub avatar_url: String,
    pub is_pro: bool,
}

/// A rental listing.
///
/// List endpoints return only the summary fields; `GET /offers/{id}` also
/// fills in the detail fields (`images`, `bedrooms`, `host`, ...).
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Offer {
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub price: u32,
    pub rating: f64,
    pub preview_image: String,
    pub is_premium: bool,
    pub is_favorite: bool,
    pub city: City,
    pub location: Location,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bedrooms: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_adults: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goods: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<Host>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Offer {
    /// Star bar width in percent: `rating * 20`, rounded and clamped to 0..=100.
    pub fn rating_percent(&self) -> u8 {
        (self.rating * 20.0).round().clamp(0.0, 100.0) as u8
    }

    /// Overlays a (possibly sparse) server record onto this one.
    ///
    /// Summary fields always come from `other`; detail fields are only
    /// replaced when `other` actually carries them.
    pub fn overlay(&mut self, other: Offer) {
        let Offer {
            id,
            title,
            kind,
            price,
            rating,
            preview_image,
            is_premium,
            is_favorite,
            city,
            location,
            images,
            bedrooms,
            max_adults,
            goods,
            host,
            description,
        } = other;

        self.id = id;
        self.title = title;
        self.kind = kind;
        self.price = price;
        self.rating = rating;
        self.preview_image = preview_image;
        self.is_premium = is_premium;
        self.is_favorite = is_favorite;
        self.city = city;
        self.location = location;
        if images.is_some() {
            self.images = images;
        }
        if bedrooms.is_some() {
            self.bedrooms = bedrooms;
        }
        if max_adults.is_some() {
            self.max_adults = max_adults;
        }
        if goods.is_some() {
            self.goods = goods;
        }
        if host.is_some() {
            self.host = host;
        }
        if description.is_some() {
            self.description = description;
        }
    }
}

/// The signed-in user, as returned by `GET /login` and `POST /login`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub email: String,
    pub token: String,
    pub name: String,
    pub avatar_url: String,
    pub is_pro: bool,
}

/// Body of `POST /login`.
#[derive(Serialize, Debug, Clone)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Review author. Same shape as an offer host.
pub type Author = Host;

/// A published review of one offer.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Review {
    pub id: String,
    pub date: DateTime<Utc>,
    pub user: Author,
    pub comment: String,
    pub rating: f64,
}

/// Body of `POST /comments/{id}`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ReviewDraft {
    pub rating: u8,
    pub comment: String,
}

/// Error body the server attaches to 4xx responses.
#[derive(Deserialize, Debug)]
pub(crate) struct ErrorBody {
    pub message: String,
}
