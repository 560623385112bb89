//! Normalization of raw place records into tab view models.
//!
//! A record first goes through a single defaulting pass that resolves every
//! absent field to its display default. The tab builders then only reshape
//! already-resolved values.

use crate::catalog::SERVICE_CATALOG;
use crate::error::Result;
use crate::export::ExportRecord;
use crate::format::{
    format_business_status, format_category, format_price_level, format_rating_stars,
    group_thousands, PRICE_NOT_SPECIFIED,
};
use crate::types::PlaceRecord;
use crate::view::{
    HoursView, Listing, OpenStatus, OverviewView, PhoneView, PhotoView, PhotosView, PlaceDetails,
    RatingSummary, ReviewView, ReviewsView, ServiceEntry, ServicesView,
};
use serde_json::Value;

/// Name shown for places without one.
pub const UNNAMED_PLACE: &str = "Unnamed Place";

/// Status line shown when the record has no business status.
pub const STATUS_NOT_AVAILABLE: &str = "Status not available";

/// Author shown for reviews without one.
pub const ANONYMOUS_AUTHOR: &str = "Anonymous";

pub const HOURS_PLACEHOLDER: &str = "Opening hours not available";
pub const SERVICES_PLACEHOLDER: &str = "Service information not available";
pub const REVIEWS_PLACEHOLDER: &str = "No reviews available";
pub const PHOTOS_PLACEHOLDER: &str = "No photos available";

/// Builds the detail view models and the export record for a place.
#[derive(Debug, Clone, Default)]
pub struct Normalizer;

impl Normalizer {
    /// Create a new normalizer.
    pub fn new() -> Self {
        Self
    }

    /// Normalize a decoded record. This cannot fail: every absent field has a
    /// default.
    pub fn normalize(&self, record: &PlaceRecord) -> PlaceDetails {
        let resolved = Resolved::from_record(record);

        log::debug!(
            "Normalizing place '{}': {} reviews, {} photos, {} service flags",
            resolved.name,
            record.reviews.len(),
            record.photo_urls.len(),
            record.service_flags.len()
        );

        PlaceDetails {
            overview: self.overview(record, &resolved),
            hours: self.hours(record),
            services: self.services(record),
            reviews: self.reviews(record),
            photos: self.photos(record, &resolved),
            export: ExportRecord::from_record(record),
        }
    }

    /// Decode and normalize a JSON value.
    ///
    /// Fails with [`crate::Error::InvalidRecord`] when the value is not an object.
    pub fn normalize_value(&self, value: &Value) -> Result<PlaceDetails> {
        let record = PlaceRecord::from_value(value)?;
        Ok(self.normalize(&record))
    }

    fn overview(&self, record: &PlaceRecord, resolved: &Resolved) -> OverviewView {
        OverviewView {
            name: resolved.name.clone(),
            rating: resolved.rating.clone(),
            status: resolved.status.clone(),
            price: resolved.price.clone(),
            address: record.formatted_address.clone(),
            phone: record.phone.as_ref().map(|phone| PhoneView {
                display: phone.clone(),
                href: format!("tel:{}", phone),
            }),
            website: record.website.clone(),
            maps_url: record.maps_url.clone(),
            coordinates: record
                .coordinates
                .map(|c| format!("{:.6}, {:.6}", c.lat, c.lng)),
            plus_code: record
                .plus_code
                .as_ref()
                .and_then(|code| code.global_code.clone()),
            categories: record.types.iter().map(|t| format_category(t)).collect(),
            about: record
                .editorial_summary
                .as_ref()
                .and_then(|summary| summary.overview.clone()),
        }
    }

    fn hours(&self, record: &PlaceRecord) -> HoursView {
        let primary = record.opening_hours.as_ref();

        HoursView {
            open_status: primary
                .and_then(|hours| hours.open_now)
                .map(OpenStatus::from_open_now),
            weekdays: Listing::from_items(
                primary
                    .map(|hours| hours.weekday_text.clone())
                    .unwrap_or_default(),
                HOURS_PLACEHOLDER,
            ),
            secondary: record
                .secondary_opening_hours
                .as_ref()
                .map(|hours| hours.weekday_text.clone()),
        }
    }

    fn services(&self, record: &PlaceRecord) -> ServicesView {
        let entries = SERVICE_CATALOG
            .iter()
            .filter_map(|descriptor| {
                record
                    .service_flags
                    .get(descriptor.service)
                    .map(|available| ServiceEntry {
                        service: descriptor.service,
                        label: descriptor.label,
                        available,
                    })
            })
            .collect();

        ServicesView {
            entries: Listing::from_items(entries, SERVICES_PLACEHOLDER),
        }
    }

    fn reviews(&self, record: &PlaceRecord) -> ReviewsView {
        let reviews = record
            .reviews
            .iter()
            .map(|review| ReviewView {
                author: review
                    .author_name
                    .clone()
                    .unwrap_or_else(|| ANONYMOUS_AUTHOR.to_string()),
                stars: format_rating_stars(review.rating),
                relative_time: review.relative_time_description.clone().unwrap_or_default(),
                text: review.text.clone().unwrap_or_default(),
            })
            .collect();

        ReviewsView {
            reviews: Listing::from_items(reviews, REVIEWS_PLACEHOLDER),
        }
    }

    fn photos(&self, record: &PlaceRecord, resolved: &Resolved) -> PhotosView {
        let photos = record
            .photo_urls
            .iter()
            .enumerate()
            .map(|(idx, url)| PhotoView {
                url: url.clone(),
                alt: format!("{} photo {}", resolved.name, idx + 1),
            })
            .collect();

        PhotosView {
            photos: Listing::from_items(photos, PHOTOS_PLACEHOLDER),
        }
    }
}

/// Fields whose display value depends on a default or on a formatter that
/// may reject the input.
struct Resolved {
    name: String,
    rating: Option<RatingSummary>,
    status: String,
    price: Option<String>,
}

impl Resolved {
    fn from_record(record: &PlaceRecord) -> Self {
        let name = record
            .name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(UNNAMED_PLACE)
            .to_string();

        let rating = record.rating.and_then(|rating| {
            format_rating_stars(Some(rating)).map(|stars| RatingSummary {
                stars,
                score: format!("{:.1}", rating),
                total_ratings: group_thousands(record.user_ratings_total.unwrap_or(0)),
            })
        });

        let status = format_business_status(record.business_status.as_deref())
            .unwrap_or_else(|| STATUS_NOT_AVAILABLE.to_string());

        // A bad price level must not sink the rest of the record.
        let price = record
            .price_level
            .map(|level| match format_price_level(Some(level)) {
                Ok(text) => text,
                Err(e) => {
                    log::warn!("Substituting default price line: {}", e);
                    PRICE_NOT_SPECIFIED.to_string()
                }
            });

        Self {
            name,
            rating,
            status,
            price,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Service;
    use crate::format::RatingStars;
    use crate::types::{
        Coordinates, EditorialSummary, OpeningHours, PlusCode, Review, ServiceFlags,
    };
    use serde_json::json;

    fn full_record() -> PlaceRecord {
        PlaceRecord {
            place_id: Some("abc123".to_string()),
            name: Some("Cafe Uno".to_string()),
            formatted_address: Some("1 Main St".to_string()),
            phone: Some("(555) 010-0000".to_string()),
            website: Some("https://cafe.example".to_string()),
            maps_url: Some("https://maps.example/?cid=1".to_string()),
            rating: Some(4.56),
            user_ratings_total: Some(1234),
            price_level: Some(1),
            business_status: Some("CLOSED_TEMPORARILY".to_string()),
            coordinates: Some(Coordinates {
                lat: 40.712_776_4,
                lng: -74.005_974_1,
            }),
            plus_code: Some(PlusCode {
                global_code: Some("87G7PX7V+4H".to_string()),
            }),
            types: vec!["fine_dining".to_string(), "cafe".to_string()],
            editorial_summary: Some(EditorialSummary {
                overview: Some("Cozy spot.".to_string()),
            }),
            opening_hours: Some(OpeningHours {
                open_now: Some(false),
                weekday_text: vec![
                    "Monday: 9 AM - 5 PM".to_string(),
                    "Tuesday: Closed".to_string(),
                ],
            }),
            secondary_opening_hours: Some(OpeningHours {
                open_now: None,
                weekday_text: vec!["Monday: Delivery 11 AM - 2 PM".to_string()],
            }),
            reviews: vec![
                Review {
                    author_name: Some("Ann".to_string()),
                    rating: Some(5.0),
                    text: Some("Great".to_string()),
                    formatted_time: Some("2024-03-01".to_string()),
                    relative_time_description: Some("a month ago".to_string()),
                },
                Review {
                    author_name: None,
                    rating: Some(2.4),
                    text: None,
                    formatted_time: None,
                    relative_time_description: None,
                },
            ],
            photo_urls: vec![
                "https://img.example/1.jpg".to_string(),
                "https://img.example/2.jpg".to_string(),
            ],
            service_flags: ServiceFlags::new()
                .with(Service::Delivery, true)
                .with(Service::DineIn, false),
        }
    }

    #[test]
    fn test_overview_full_record() {
        let details = Normalizer::new().normalize(&full_record());
        let overview = &details.overview;

        assert_eq!(overview.name, "Cafe Uno");
        let rating = overview.rating.as_ref().unwrap();
        assert_eq!(rating.stars, RatingStars { filled: 4, empty: 1 });
        assert_eq!(rating.score, "4.6");
        assert_eq!(rating.total_ratings, "1,234");
        assert_eq!(overview.status, "Temporarily Closed");
        assert_eq!(overview.price.as_deref(), Some("$$ (Inexpensive)"));
        assert_eq!(overview.address.as_deref(), Some("1 Main St"));
        assert_eq!(
            overview.phone,
            Some(PhoneView {
                display: "(555) 010-0000".to_string(),
                href: "tel:(555) 010-0000".to_string(),
            })
        );
        assert_eq!(overview.coordinates.as_deref(), Some("40.712776, -74.005974"));
        assert_eq!(overview.plus_code.as_deref(), Some("87G7PX7V+4H"));
        assert_eq!(overview.categories, vec!["Fine Dining", "Cafe"]);
        assert_eq!(overview.about.as_deref(), Some("Cozy spot."));
    }

    #[test]
    fn test_name_only_record_uses_placeholders() {
        let details = Normalizer::new().normalize(&PlaceRecord::named("Lonely Diner"));

        let overview = &details.overview;
        assert_eq!(overview.name, "Lonely Diner");
        assert_eq!(overview.rating, None);
        assert_eq!(overview.status, STATUS_NOT_AVAILABLE);
        assert_eq!(overview.price, None);
        assert_eq!(overview.address, None);
        assert_eq!(overview.phone, None);
        assert_eq!(overview.website, None);
        assert_eq!(overview.maps_url, None);
        assert_eq!(overview.coordinates, None);
        assert_eq!(overview.plus_code, None);
        assert!(overview.categories.is_empty());
        assert_eq!(overview.about, None);

        assert_eq!(details.hours.open_status, None);
        assert_eq!(details.hours.weekdays.placeholder(), Some(HOURS_PLACEHOLDER));
        assert_eq!(details.hours.secondary, None);
        assert_eq!(
            details.services.entries.placeholder(),
            Some(SERVICES_PLACEHOLDER)
        );
        assert_eq!(
            details.reviews.reviews.placeholder(),
            Some(REVIEWS_PLACEHOLDER)
        );
        assert_eq!(details.photos.photos.placeholder(), Some(PHOTOS_PLACEHOLDER));
    }

    #[test]
    fn test_missing_name_defaults() {
        let details = Normalizer::new().normalize(&PlaceRecord::default());
        assert_eq!(details.overview.name, UNNAMED_PLACE);

        let details = Normalizer::new().normalize(&PlaceRecord::named("  "));
        assert_eq!(details.overview.name, UNNAMED_PLACE);
    }

    #[test]
    fn test_rating_without_total_defaults_to_zero() {
        let mut record = PlaceRecord::named("Cafe");
        record.rating = Some(3.0);

        let rating = Normalizer::new().normalize(&record).overview.rating.unwrap();
        assert_eq!(rating.total_ratings, "0");
        assert_eq!(rating.score, "3.0");
    }

    #[test]
    fn test_zero_rating_still_shows_block() {
        let mut record = PlaceRecord::named("Cafe");
        record.rating = Some(0.0);

        let rating = Normalizer::new().normalize(&record).overview.rating.unwrap();
        assert_eq!(rating.stars, RatingStars { filled: 0, empty: 5 });
    }

    #[test]
    fn test_unknown_status_passes_through() {
        let mut record = PlaceRecord::named("Cafe");
        record.business_status = Some("UNKNOWN_X".to_string());

        assert_eq!(Normalizer::new().normalize(&record).overview.status, "UNKNOWN_X");
    }

    #[test]
    fn test_out_of_range_price_does_not_abort() {
        let mut record = PlaceRecord::named("Cafe");
        record.price_level = Some(9);
        record.website = Some("https://cafe.example".to_string());

        let details = Normalizer::new().normalize(&record);

        assert_eq!(details.overview.price.as_deref(), Some(PRICE_NOT_SPECIFIED));
        assert_eq!(
            details.overview.website.as_deref(),
            Some("https://cafe.example")
        );
        assert_eq!(details.export.basic_info.price_level, Some(9));
    }

    #[test]
    fn test_hours_view() {
        let hours = Normalizer::new().normalize(&full_record()).hours;

        assert_eq!(hours.open_status, Some(OpenStatus::ClosedNow));
        assert_eq!(
            hours.weekdays.items(),
            &["Monday: 9 AM - 5 PM".to_string(), "Tuesday: Closed".to_string()]
        );
        assert_eq!(
            hours.secondary,
            Some(vec!["Monday: Delivery 11 AM - 2 PM".to_string()])
        );
    }

    #[test]
    fn test_hours_open_now_without_lines() {
        let mut record = PlaceRecord::named("Cafe");
        record.opening_hours = Some(OpeningHours {
            open_now: Some(true),
            weekday_text: Vec::new(),
        });

        let hours = Normalizer::new().normalize(&record).hours;
        assert_eq!(hours.open_status, Some(OpenStatus::OpenNow));
        assert!(hours.weekdays.is_placeholder());
    }

    #[test]
    fn test_services_only_present_flags() {
        let mut record = PlaceRecord::named("Cafe");
        record.service_flags = ServiceFlags::new().with(Service::Delivery, true);

        let services = Normalizer::new().normalize(&record).services;

        assert_eq!(
            services.entries.items(),
            &[ServiceEntry {
                service: Service::Delivery,
                label: "Delivery",
                available: true,
            }]
        );
    }

    #[test]
    fn test_services_keep_false_and_catalog_order() {
        let mut record = PlaceRecord::named("Cafe");
        record.service_flags = ServiceFlags::new()
            .with(Service::ServesVegetarianFood, true)
            .with(Service::WheelchairAccessibleEntrance, false);

        let services = Normalizer::new().normalize(&record).services;
        let entries = services.entries.items();

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].service, Service::WheelchairAccessibleEntrance);
        assert!(!entries[0].available);
        assert_eq!(entries[1].service, Service::ServesVegetarianFood);
        assert!(entries[1].available);
    }

    #[test]
    fn test_reviews_view() {
        let reviews = Normalizer::new().normalize(&full_record()).reviews;
        let items = reviews.reviews.items();

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].author, "Ann");
        assert_eq!(items[0].stars, Some(RatingStars { filled: 5, empty: 0 }));
        assert_eq!(items[0].relative_time, "a month ago");
        assert_eq!(items[0].text, "Great");
        assert_eq!(items[1].author, ANONYMOUS_AUTHOR);
        assert_eq!(items[1].stars, Some(RatingStars { filled: 2, empty: 3 }));
        assert_eq!(items[1].text, "");
    }

    #[test]
    fn test_photos_view() {
        let photos = Normalizer::new().normalize(&full_record()).photos;
        let items = photos.photos.items();

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].url, "https://img.example/1.jpg");
        assert_eq!(items[0].alt, "Cafe Uno photo 1");
        assert_eq!(items[1].alt, "Cafe Uno photo 2");
    }

    #[test]
    fn test_export_built_from_raw_record() {
        let mut record = full_record();
        record.name = None;

        let details = Normalizer::new().normalize(&record);

        assert_eq!(details.overview.name, UNNAMED_PLACE);
        assert_eq!(details.export.basic_info.name, None);
        assert_eq!(details.export.categories, vec!["fine_dining", "cafe"]);
        assert_eq!(details.export.reviews.len(), 2);
        assert_eq!(details.export.reviews[1].author, None);
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let normalizer = Normalizer::new();
        let record = full_record();

        assert_eq!(normalizer.normalize(&record), normalizer.normalize(&record));
    }

    #[test]
    fn test_normalize_value_rejects_non_object() {
        let err = Normalizer::new().normalize_value(&json!(null)).unwrap_err();
        assert!(matches!(err, crate::Error::InvalidRecord(_)));
    }

    #[test]
    fn test_normalize_value() {
        let details = Normalizer::new()
            .normalize_value(&json!({ "name": "Cafe", "delivery": true }))
            .unwrap();

        assert_eq!(details.overview.name, "Cafe");
        assert_eq!(details.services.entries.items().len(), 1);
    }
}
