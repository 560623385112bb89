//! Flat export record for spreadsheet output.
//!
//! The export keeps absent source values absent (empty cells) rather than
//! substituting display placeholders, and always has the same column set.

use crate::catalog::SERVICE_CATALOG;
use crate::types::{Coordinates, PlaceRecord};
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use unicode_normalization::UnicodeNormalization;

/// MIME type handed to the host together with the exported bytes.
pub const EXPORT_MIME_TYPE: &str = "application/octet-stream";

/// Base filename used when the place has no usable name.
pub const DEFAULT_EXPORT_BASE: &str = "place";

/// Longest text a spreadsheet cell holds, in UTF-16 code units.
pub const MAX_CELL_LEN: usize = 32_767;

/// Characters that cannot appear in a file name on common platforms.
const FILENAME_RESERVED: &[char] = &['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

/// The exportable projection of a place record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportRecord {
    pub basic_info: BasicInfo,
    pub coordinates: Option<Coordinates>,
    /// Weekday lines of the primary opening hours, possibly empty.
    pub opening_hours: Vec<String>,
    /// Raw category slugs in source order.
    pub categories: Vec<String>,
    pub reviews: Vec<ExportReview>,
    pub services: ExportServices,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BasicInfo {
    pub name: Option<String>,
    pub place_id: Option<String>,
    pub formatted_address: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub rating: Option<f64>,
    pub total_ratings: Option<u64>,
    pub price_level: Option<i64>,
    pub business_status: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportReview {
    pub author: Option<String>,
    pub rating: Option<f64>,
    pub text: Option<String>,
    pub date: Option<String>,
    pub relative_time: Option<String>,
}

/// Every catalog service keyed by its export key, `None` when unknown.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportServices(Vec<(&'static str, Option<bool>)>);

impl ExportServices {
    pub fn get(&self, export_key: &str) -> Option<bool> {
        self.0
            .iter()
            .find(|(key, _)| *key == export_key)
            .and_then(|(_, value)| *value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, Option<bool>)> + '_ {
        self.0.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for ExportServices {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, value) in &self.0 {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl ExportRecord {
    /// Build the export record straight from the raw record.
    pub fn from_record(record: &PlaceRecord) -> Self {
        let basic_info = BasicInfo {
            name: record.name.clone(),
            place_id: record.place_id.clone(),
            formatted_address: record.formatted_address.clone(),
            phone: record.phone.clone(),
            website: record.website.clone(),
            rating: record.rating,
            total_ratings: record.user_ratings_total,
            price_level: record.price_level,
            business_status: record.business_status.clone(),
        };

        let reviews = record
            .reviews
            .iter()
            .map(|review| ExportReview {
                author: review.author_name.clone(),
                rating: review.rating,
                text: review.text.clone(),
                date: review.formatted_time.clone(),
                relative_time: review.relative_time_description.clone(),
            })
            .collect();

        let services = ExportServices(
            SERVICE_CATALOG
                .iter()
                .map(|d| (d.export_key, record.service_flags.get(d.service)))
                .collect(),
        );

        Self {
            basic_info,
            coordinates: record.coordinates,
            opening_hours: record
                .opening_hours
                .as_ref()
                .map(|hours| hours.weekday_text.clone())
                .unwrap_or_default(),
            categories: record.types.clone(),
            reviews,
            services,
        }
    }

    /// Flatten into spreadsheet columns, one per field path, in a fixed order.
    ///
    /// List fields become a single cell holding a JSON array so the column
    /// set does not depend on how many reviews or categories a place has.
    pub fn columns(&self) -> Vec<Column> {
        let info = &self.basic_info;
        let mut columns = vec![
            Column::new("basic_info.name", CellValue::text(&info.name)),
            Column::new("basic_info.place_id", CellValue::text(&info.place_id)),
            Column::new(
                "basic_info.formatted_address",
                CellValue::text(&info.formatted_address),
            ),
            Column::new("basic_info.phone", CellValue::text(&info.phone)),
            Column::new("basic_info.website", CellValue::text(&info.website)),
            Column::new("basic_info.rating", CellValue::number(info.rating)),
            Column::new(
                "basic_info.total_ratings",
                CellValue::number(info.total_ratings.map(|n| n as f64)),
            ),
            Column::new(
                "basic_info.price_level",
                CellValue::number(info.price_level.map(|n| n as f64)),
            ),
            Column::new(
                "basic_info.business_status",
                CellValue::text(&info.business_status),
            ),
            Column::new(
                "coordinates.lat",
                CellValue::number(self.coordinates.map(|c| c.lat)),
            ),
            Column::new(
                "coordinates.lng",
                CellValue::number(self.coordinates.map(|c| c.lng)),
            ),
            Column::new(
                "opening_hours",
                CellValue::json_list("opening_hours", &self.opening_hours),
            ),
            Column::new(
                "categories",
                CellValue::json_list("categories", &self.categories),
            ),
            Column::new("reviews", reviews_cell(&self.reviews)),
        ];

        columns.extend(self.services.iter().map(|(key, value)| {
            Column::new(
                format!("services.{}", key),
                value.map(CellValue::Bool).unwrap_or(CellValue::Empty),
            )
        }));

        columns
    }
}

/// One spreadsheet column: its header path and the single data cell.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub path: String,
    pub value: CellValue,
}

impl Column {
    pub fn new(path: impl Into<String>, value: CellValue) -> Self {
        Self {
            path: path.into(),
            value,
        }
    }
}

/// A typed spreadsheet cell.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
}

impl CellValue {
    fn text(value: &Option<String>) -> Self {
        value.clone().map(Self::Text).unwrap_or(Self::Empty)
    }

    fn number(value: Option<f64>) -> Self {
        match value {
            Some(n) if n.is_finite() => Self::Number(n),
            _ => Self::Empty,
        }
    }

    /// Encode a list as a JSON array that fits in one cell, dropping
    /// trailing items until it does.
    fn json_list<T: Serialize>(path: &str, items: &[T]) -> Self {
        for keep in (0..=items.len()).rev() {
            let Some(text) = encode_json(&items[..keep]) else {
                return Self::Empty;
            };
            if fits_in_cell(&text) {
                if keep < items.len() {
                    log::warn!(
                        "Dropped {} trailing {} entries to fit the export cell",
                        items.len() - keep,
                        path
                    );
                }
                return Self::Text(text);
            }
        }
        Self::Empty
    }
}

/// Encode reviews for the `reviews` cell. Review texts are shortened first so
/// that every review keeps its row; trailing reviews are only dropped when
/// even empty texts do not fit.
fn reviews_cell(reviews: &[ExportReview]) -> CellValue {
    let Some(text) = encode_json(reviews) else {
        return CellValue::Empty;
    };
    if fits_in_cell(&text) {
        return CellValue::Text(text);
    }

    let mut cap = reviews
        .iter()
        .filter_map(|r| r.text.as_deref())
        .map(|t| t.encode_utf16().count())
        .max()
        .unwrap_or(0);
    let mut shortened = reviews.to_vec();

    while cap > 0 {
        cap = cap * 3 / 4;
        for review in &mut shortened {
            if let Some(text) = review.text.as_mut() {
                *text = truncate_utf16(text, cap);
            }
        }

        let Some(text) = encode_json(&shortened) else {
            return CellValue::Empty;
        };
        if fits_in_cell(&text) {
            log::warn!(
                "Shortened review texts to {} units to fit the export cell",
                cap
            );
            return CellValue::Text(text);
        }
    }

    CellValue::json_list("reviews", &shortened)
}

fn encode_json<T: Serialize + ?Sized>(value: &T) -> Option<String> {
    match serde_json::to_string(value) {
        Ok(text) => Some(text),
        Err(e) => {
            log::warn!("Failed to encode export cell as JSON: {}", e);
            None
        }
    }
}

fn fits_in_cell(text: &str) -> bool {
    text.encode_utf16().count() <= MAX_CELL_LEN
}

/// Cut `text` to at most `max` UTF-16 code units without splitting a character.
pub fn truncate_utf16(text: &str, max: usize) -> String {
    let mut used = 0;
    text.chars()
        .take_while(|c| {
            used += c.len_utf16();
            used <= max
        })
        .collect()
}

/// Filename for an export: `"{base}_details.xlsx"`.
///
/// The base is the NFC-normalized place name with reserved and control
/// characters replaced by `_`, or [`DEFAULT_EXPORT_BASE`] when the name is
/// absent or blank.
pub fn export_filename(name: Option<&str>) -> String {
    let base: String = name
        .map(str::trim)
        .unwrap_or_default()
        .nfc()
        .map(|c| {
            if c.is_control() || FILENAME_RESERVED.contains(&c) {
                '_'
            } else {
                c
            }
        })
        .collect();

    let base = if base.is_empty() {
        DEFAULT_EXPORT_BASE
    } else {
        base.as_str()
    };

    format!("{}_details.xlsx", base)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Service;
    use crate::types::{OpeningHours, Review, ServiceFlags};

    fn review(author: &str, rating: f64) -> Review {
        Review {
            author_name: Some(author.to_string()),
            rating: Some(rating),
            text: Some(format!("Review by {}", author)),
            formatted_time: Some("2024-01-01".to_string()),
            relative_time_description: Some("a year ago".to_string()),
        }
    }

    #[test]
    fn test_reviews_preserved_in_order() {
        let mut record = PlaceRecord::named("Cafe");
        record.reviews = vec![review("Ann", 5.0), review("Bob", 3.0), review("Cy", 1.0)];

        let export = ExportRecord::from_record(&record);

        assert_eq!(export.reviews.len(), 3);
        let authors: Vec<_> = export
            .reviews
            .iter()
            .map(|r| r.author.as_deref().unwrap())
            .collect();
        assert_eq!(authors, vec!["Ann", "Bob", "Cy"]);

        let second = &export.reviews[1];
        assert_eq!(second.rating, Some(3.0));
        assert_eq!(second.text.as_deref(), Some("Review by Bob"));
        assert_eq!(second.date.as_deref(), Some("2024-01-01"));
        assert_eq!(second.relative_time.as_deref(), Some("a year ago"));
    }

    #[test]
    fn test_empty_record_keeps_shape() {
        let export = ExportRecord::from_record(&PlaceRecord::default());

        assert_eq!(export.basic_info.name, None);
        assert!(export.opening_hours.is_empty());
        assert!(export.categories.is_empty());
        assert!(export.reviews.is_empty());
        assert_eq!(export.services.len(), 12);
        assert!(export.services.iter().all(|(_, value)| value.is_none()));
    }

    #[test]
    fn test_column_set_is_stable() {
        let sparse = ExportRecord::from_record(&PlaceRecord::default());

        let mut full = PlaceRecord::named("Full");
        full.rating = Some(4.2);
        full.coordinates = Some(Coordinates { lat: 1.0, lng: 2.0 });
        full.reviews = vec![review("Ann", 5.0)];
        full.types = vec!["cafe".to_string()];
        full.service_flags = ServiceFlags::new().with(Service::Delivery, true);
        let full = ExportRecord::from_record(&full);

        let sparse_paths: Vec<_> = sparse.columns().into_iter().map(|c| c.path).collect();
        let full_paths: Vec<_> = full.columns().into_iter().map(|c| c.path).collect();

        assert_eq!(sparse_paths, full_paths);
        assert_eq!(sparse_paths.len(), 26);
        assert_eq!(sparse_paths[0], "basic_info.name");
        assert_eq!(sparse_paths[14], "services.wheelchair_accessible");
    }

    #[test]
    fn test_column_values() {
        let mut record = PlaceRecord::named("Cafe");
        record.user_ratings_total = Some(10);
        record.opening_hours = Some(OpeningHours {
            open_now: Some(true),
            weekday_text: vec!["Monday: Closed".to_string()],
        });
        record.service_flags = ServiceFlags::new().with(Service::Takeout, false);

        let columns = ExportRecord::from_record(&record).columns();
        let find = |path: &str| {
            columns
                .iter()
                .find(|c| c.path == path)
                .map(|c| c.value.clone())
                .unwrap()
        };

        assert_eq!(find("basic_info.name"), CellValue::Text("Cafe".to_string()));
        assert_eq!(find("basic_info.total_ratings"), CellValue::Number(10.0));
        assert_eq!(find("basic_info.website"), CellValue::Empty);
        assert_eq!(find("coordinates.lat"), CellValue::Empty);
        assert_eq!(
            find("opening_hours"),
            CellValue::Text(r#"["Monday: Closed"]"#.to_string())
        );
        assert_eq!(find("categories"), CellValue::Text("[]".to_string()));
        assert_eq!(find("services.takeout"), CellValue::Bool(false));
        assert_eq!(find("services.delivery"), CellValue::Empty);
    }

    #[test]
    fn test_long_reviews_stay_valid_json() {
        let mut record = PlaceRecord::named("Cafe");
        record.reviews = (0..5)
            .map(|i| Review {
                text: Some("x".repeat(7_000)),
                ..review(&format!("Author {}", i), 4.0)
            })
            .collect();

        let columns = ExportRecord::from_record(&record).columns();
        let cell = columns.iter().find(|c| c.path == "reviews").unwrap();
        let CellValue::Text(text) = &cell.value else {
            panic!("reviews cell is empty");
        };

        assert!(text.encode_utf16().count() <= MAX_CELL_LEN);
        let parsed: Vec<serde_json::Value> = serde_json::from_str(text).unwrap();
        assert_eq!(parsed.len(), 5);
        for (i, entry) in parsed.iter().enumerate() {
            assert_eq!(entry["author"], format!("Author {}", i).as_str());
            assert_eq!(entry["date"], "2024-01-01");
            assert_eq!(entry["relative_time"], "a year ago");
            assert!(entry["text"].as_str().unwrap().starts_with("xxx"));
        }
    }

    #[test]
    fn test_short_reviews_are_not_touched() {
        let mut record = PlaceRecord::named("Cafe");
        record.reviews = vec![review("Ann", 5.0)];

        let columns = ExportRecord::from_record(&record).columns();
        let cell = columns.iter().find(|c| c.path == "reviews").unwrap();
        assert_eq!(
            cell.value,
            CellValue::Text(serde_json::to_string(&ExportRecord::from_record(&record).reviews).unwrap())
        );
    }

    #[test]
    fn test_oversized_list_drops_trailing_items() {
        let mut record = PlaceRecord::named("Cafe");
        record.types = (0..10).map(|i| format!("{}{}", i, "t".repeat(5_000))).collect();

        let columns = ExportRecord::from_record(&record).columns();
        let cell = columns.iter().find(|c| c.path == "categories").unwrap();
        let CellValue::Text(text) = &cell.value else {
            panic!("categories cell is empty");
        };

        let parsed: Vec<String> = serde_json::from_str(text).unwrap();
        assert_eq!(parsed.len(), 6);
        assert!(parsed[0].starts_with('0'));
        assert!(parsed[5].starts_with('5'));
    }

    #[test]
    fn test_truncate_utf16() {
        assert_eq!(truncate_utf16("hello", 3), "hel");
        assert_eq!(truncate_utf16("hi", 10), "hi");
        // an emoji is two UTF-16 units and is never split
        assert_eq!(truncate_utf16("a\u{1F600}b", 2), "a");
        assert_eq!(truncate_utf16("a\u{1F600}b", 3), "a\u{1F600}");
    }

    #[test]
    fn test_export_serializes_services_as_map() {
        let mut record = PlaceRecord::named("Cafe");
        record.service_flags = ServiceFlags::new().with(Service::DineIn, true);

        let json = serde_json::to_value(ExportRecord::from_record(&record)).unwrap();

        assert_eq!(json["services"]["dine_in"], serde_json::json!(true));
        assert_eq!(json["services"]["delivery"], serde_json::Value::Null);
        assert_eq!(json["basic_info"]["name"], serde_json::json!("Cafe"));
    }

    #[test]
    fn test_export_filename() {
        assert_eq!(export_filename(Some("Cafe Uno")), "Cafe Uno_details.xlsx");
        assert_eq!(export_filename(None), "place_details.xlsx");
        assert_eq!(export_filename(Some("   ")), "place_details.xlsx");
        assert_eq!(export_filename(Some("A/B: C")), "A_B_ C_details.xlsx");
    }

    #[test]
    fn test_export_filename_composes_unicode() {
        // "e" followed by a combining acute accent
        assert_eq!(export_filename(Some("Cafe\u{301}")), "Caf\u{e9}_details.xlsx");
    }
}
