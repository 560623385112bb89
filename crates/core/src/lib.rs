//! Core place record types, display formatting, tab view models and
//! export records for the place detail view.

pub mod catalog;
pub mod error;
pub mod export;
pub mod format;
pub mod normalize;
pub mod tabs;
pub mod types;
pub mod view;

pub use catalog::{Service, ServiceDescriptor, SERVICE_CATALOG};
pub use error::{Error, Result};
pub use export::{
    export_filename, CellValue, Column, ExportRecord, ExportReview, ExportServices,
    EXPORT_MIME_TYPE,
};
pub use format::{format_business_status, format_price_level, format_rating_stars, RatingStars};
pub use normalize::Normalizer;
pub use tabs::{DetailSession, Tab, TabContent, TabSelector};
pub use types::{Coordinates, OpeningHours, PlaceRecord, Review, ServiceFlags};
pub use view::{
    HoursView, Listing, OpenStatus, OverviewView, PhotosView, PlaceDetails, ReviewsView,
    ServicesView,
};
