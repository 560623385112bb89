//! Display-ready view models, one per detail tab.
//!
//! Optional sections are `Option`s (render the section only when `Some`) and
//! list sections are a [`Listing`], which carries either items or the
//! placeholder text to show instead.

use crate::catalog::Service;
use crate::export::ExportRecord;
use crate::format::RatingStars;
use serde::Serialize;

/// Everything the detail view needs for one opened record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaceDetails {
    pub overview: OverviewView,
    pub hours: HoursView,
    pub services: ServicesView,
    pub reviews: ReviewsView,
    pub photos: PhotosView,
    /// Flat record for spreadsheet export, built from the raw record.
    pub export: ExportRecord,
}

/// A non-empty list of items, or the placeholder shown when there are none.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Listing<T> {
    Items(Vec<T>),
    Placeholder(String),
}

impl<T> Listing<T> {
    /// Wrap `items`, falling back to `placeholder` when the list is empty.
    pub fn from_items(items: Vec<T>, placeholder: &str) -> Self {
        if items.is_empty() {
            Self::Placeholder(placeholder.to_string())
        } else {
            Self::Items(items)
        }
    }

    /// The items, or an empty slice for a placeholder.
    pub fn items(&self) -> &[T] {
        match self {
            Self::Items(items) => items,
            Self::Placeholder(_) => &[],
        }
    }

    pub fn placeholder(&self) -> Option<&str> {
        match self {
            Self::Items(_) => None,
            Self::Placeholder(text) => Some(text),
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, Self::Placeholder(_))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverviewView {
    pub name: String,
    /// Present only when the record has a rating.
    pub rating: Option<RatingSummary>,
    pub status: String,
    /// Present only when the record has a price level.
    pub price: Option<String>,
    pub address: Option<String>,
    pub phone: Option<PhoneView>,
    pub website: Option<String>,
    pub maps_url: Option<String>,
    /// `"lat, lng"` with six decimals.
    pub coordinates: Option<String>,
    pub plus_code: Option<String>,
    /// Category labels in source order; empty means no categories section.
    pub categories: Vec<String>,
    /// Editorial overview text.
    pub about: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RatingSummary {
    pub stars: RatingStars,
    /// Rating with one decimal, e.g. `"4.5"`.
    pub score: String,
    /// Number of ratings with thousands grouping, e.g. `"1,234"`.
    pub total_ratings: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PhoneView {
    pub display: String,
    /// `tel:` link target.
    pub href: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OpenStatus {
    OpenNow,
    ClosedNow,
}

impl OpenStatus {
    pub fn from_open_now(open_now: bool) -> Self {
        if open_now {
            Self::OpenNow
        } else {
            Self::ClosedNow
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::OpenNow => "Open Now",
            Self::ClosedNow => "Closed Now",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HoursView {
    /// Banner shown only when the source says whether the place is open.
    pub open_status: Option<OpenStatus>,
    pub weekdays: Listing<String>,
    /// Special hours, present when the record has secondary hours.
    pub secondary: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServicesView {
    pub entries: Listing<ServiceEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServiceEntry {
    pub service: Service,
    pub label: &'static str,
    pub available: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReviewsView {
    pub reviews: Listing<ReviewView>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReviewView {
    pub author: String,
    pub stars: Option<RatingStars>,
    pub relative_time: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PhotosView {
    pub photos: Listing<PhotoView>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PhotoView {
    pub url: String,
    pub alt: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listing_from_empty_items() {
        let listing: Listing<String> = Listing::from_items(Vec::new(), "Nothing here");
        assert!(listing.is_placeholder());
        assert_eq!(listing.placeholder(), Some("Nothing here"));
        assert!(listing.items().is_empty());
    }

    #[test]
    fn test_listing_from_items() {
        let listing = Listing::from_items(vec![1, 2, 3], "Nothing here");
        assert!(!listing.is_placeholder());
        assert_eq!(listing.items(), &[1, 2, 3]);
        assert_eq!(listing.placeholder(), None);
    }

    #[test]
    fn test_listing_serializes_tagged() {
        let listing: Listing<String> = Listing::from_items(Vec::new(), "No photos available");
        let json = serde_json::to_value(&listing).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "kind": "placeholder", "value": "No photos available" })
        );
    }

    #[test]
    fn test_open_status_labels() {
        assert_eq!(OpenStatus::from_open_now(true).label(), "Open Now");
        assert_eq!(OpenStatus::from_open_now(false).label(), "Closed Now");
    }
}
