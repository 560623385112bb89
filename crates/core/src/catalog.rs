//! Static lookup table of the service capabilities a place can advertise.
//!
//! Adding a capability means adding a variant and a row to [`SERVICE_CATALOG`];
//! the normalizer, the export record and the record decoder all walk this table.

use serde::Serialize;

/// A boolean capability reported by the places source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Service {
    WheelchairAccessibleEntrance,
    Delivery,
    DineIn,
    Takeout,
    Reservable,
    ServesBeer,
    ServesWine,
    ServesBreakfast,
    ServesBrunch,
    ServesLunch,
    ServesDinner,
    ServesVegetarianFood,
}

/// How a service is keyed in the source record, in exports, and on screen.
#[derive(Debug, Clone, Copy)]
pub struct ServiceDescriptor {
    pub service: Service,
    /// Key of the flag in the source record.
    pub source_key: &'static str,
    /// Column key under `services` in the export record.
    pub export_key: &'static str,
    /// Human readable label.
    pub label: &'static str,
}

/// All known services, in display order.
pub const SERVICE_CATALOG: [ServiceDescriptor; 12] = [
    ServiceDescriptor {
        service: Service::WheelchairAccessibleEntrance,
        source_key: "wheelchair_accessible_entrance",
        export_key: "wheelchair_accessible",
        label: "Wheelchair Accessible",
    },
    ServiceDescriptor {
        service: Service::Delivery,
        source_key: "delivery",
        export_key: "delivery",
        label: "Delivery",
    },
    ServiceDescriptor {
        service: Service::DineIn,
        source_key: "dine_in",
        export_key: "dine_in",
        label: "Dine In",
    },
    ServiceDescriptor {
        service: Service::Takeout,
        source_key: "takeout",
        export_key: "takeout",
        label: "Takeout",
    },
    ServiceDescriptor {
        service: Service::Reservable,
        source_key: "reservable",
        export_key: "reservable",
        label: "Reservations",
    },
    ServiceDescriptor {
        service: Service::ServesBeer,
        source_key: "serves_beer",
        export_key: "serves_beer",
        label: "Serves Beer",
    },
    ServiceDescriptor {
        service: Service::ServesWine,
        source_key: "serves_wine",
        export_key: "serves_wine",
        label: "Serves Wine",
    },
    ServiceDescriptor {
        service: Service::ServesBreakfast,
        source_key: "serves_breakfast",
        export_key: "serves_breakfast",
        label: "Breakfast",
    },
    ServiceDescriptor {
        service: Service::ServesBrunch,
        source_key: "serves_brunch",
        export_key: "serves_brunch",
        label: "Brunch",
    },
    ServiceDescriptor {
        service: Service::ServesLunch,
        source_key: "serves_lunch",
        export_key: "serves_lunch",
        label: "Lunch",
    },
    ServiceDescriptor {
        service: Service::ServesDinner,
        source_key: "serves_dinner",
        export_key: "serves_dinner",
        label: "Dinner",
    },
    ServiceDescriptor {
        service: Service::ServesVegetarianFood,
        source_key: "serves_vegetarian_food",
        export_key: "serves_vegetarian_food",
        label: "Vegetarian Options",
    },
];

impl Service {
    /// Look up the catalog row for this service.
    ///
    /// Variants are declared in catalog order, so the discriminant is the row index.
    pub fn descriptor(self) -> &'static ServiceDescriptor {
        &SERVICE_CATALOG[self as usize]
    }

    /// Human readable label.
    pub fn label(self) -> &'static str {
        self.descriptor().label
    }
}
