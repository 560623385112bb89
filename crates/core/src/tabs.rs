//! Tab selection for the place detail view.

use crate::error::Result;
use crate::normalize::Normalizer;
use crate::types::PlaceRecord;
use crate::view::{HoursView, OverviewView, PhotosView, PlaceDetails, ReviewsView, ServicesView};
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// The five detail tabs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tab {
    #[default]
    Overview,
    Hours,
    Services,
    Reviews,
    Photos,
}

impl Tab {
    /// All tabs in display order.
    pub const ALL: [Tab; 5] = [
        Tab::Overview,
        Tab::Hours,
        Tab::Services,
        Tab::Reviews,
        Tab::Photos,
    ];

    /// Stable identifier, as used by hosts and on the command line.
    pub fn id(self) -> &'static str {
        match self {
            Tab::Overview => "overview",
            Tab::Hours => "hours",
            Tab::Services => "services",
            Tab::Reviews => "reviews",
            Tab::Photos => "photos",
        }
    }

    /// Tab caption.
    pub fn label(self) -> &'static str {
        match self {
            Tab::Overview => "Overview",
            Tab::Hours => "Hours",
            Tab::Services => "Services",
            Tab::Reviews => "Reviews",
            Tab::Photos => "Photos",
        }
    }
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Tab {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Tab::ALL
            .into_iter()
            .find(|tab| tab.id() == wanted)
            .ok_or_else(|| format!("unknown tab '{}'", s))
    }
}

/// Which tab is showing. Any tab can be selected from any other tab.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TabSelector {
    active: Tab,
}

impl TabSelector {
    /// Start on the overview tab.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> Tab {
        self.active
    }

    pub fn select(&mut self, tab: Tab) {
        self.active = tab;
    }

    /// Back to the overview tab, as when the view is opened again.
    pub fn reset(&mut self) {
        self.active = Tab::Overview;
    }
}

/// The view model of one tab.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "tab", content = "view", rename_all = "snake_case")]
pub enum TabContent<'a> {
    Overview(&'a OverviewView),
    Hours(&'a HoursView),
    Services(&'a ServicesView),
    Reviews(&'a ReviewsView),
    Photos(&'a PhotosView),
}

impl<'a> TabContent<'a> {
    /// Pick the view model for `tab` out of `details`.
    pub fn of(details: &'a PlaceDetails, tab: Tab) -> Self {
        match tab {
            Tab::Overview => TabContent::Overview(&details.overview),
            Tab::Hours => TabContent::Hours(&details.hours),
            Tab::Services => TabContent::Services(&details.services),
            Tab::Reviews => TabContent::Reviews(&details.reviews),
            Tab::Photos => TabContent::Photos(&details.photos),
        }
    }

    pub fn tab(&self) -> Tab {
        match self {
            TabContent::Overview(_) => Tab::Overview,
            TabContent::Hours(_) => Tab::Hours,
            TabContent::Services(_) => Tab::Services,
            TabContent::Reviews(_) => Tab::Reviews,
            TabContent::Photos(_) => Tab::Photos,
        }
    }
}

/// One open detail view: the record is normalized once on open, and tab
/// switches only pick a different view model out of the cached result.
#[derive(Debug, Clone)]
pub struct DetailSession {
    details: PlaceDetails,
    selector: TabSelector,
}

impl DetailSession {
    /// Open the detail view for a record, starting on the overview tab.
    pub fn open(record: &PlaceRecord) -> Self {
        Self {
            details: Normalizer::new().normalize(record),
            selector: TabSelector::new(),
        }
    }

    /// Open the detail view for a JSON record.
    pub fn open_value(value: &Value) -> Result<Self> {
        Ok(Self {
            details: Normalizer::new().normalize_value(value)?,
            selector: TabSelector::new(),
        })
    }

    pub fn active_tab(&self) -> Tab {
        self.selector.active()
    }

    /// Switch tabs and return the newly visible content.
    pub fn select(&mut self, tab: Tab) -> TabContent<'_> {
        log::debug!("Switching tab {} -> {}", self.selector.active(), tab);
        self.selector.select(tab);
        self.current()
    }

    /// The content of the active tab.
    pub fn current(&self) -> TabContent<'_> {
        TabContent::of(&self.details, self.selector.active())
    }

    pub fn details(&self) -> &PlaceDetails {
        &self.details
    }
}
