//! Static fuel-tanker inspection checklist.
//!
//! The order of [`CATALOG`] is the traversal order of an inspection session.
//! Item ids are persisted inside every inspection's `items` column, so an id
//! must never be renamed once shipped.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Categories
// ---------------------------------------------------------------------------

pub const CATEGORY_DOCUMENTS: &str = "Documents";
pub const CATEGORY_CAB: &str = "Cab";
pub const CATEGORY_TYRES: &str = "Tyres & Wheels";
pub const CATEGORY_BRAKES: &str = "Brakes";
pub const CATEGORY_LIGHTS: &str = "Lights";
pub const CATEGORY_TANK: &str = "Tank & Valves";
pub const CATEGORY_SAFETY: &str = "Safety Equipment";

// ---------------------------------------------------------------------------
// Items
// ---------------------------------------------------------------------------

/// One fixed inspection point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistItem {
    pub id: String,
    pub category: String,
    pub title: String,
    pub description: String,
}

impl ChecklistItem {
    pub fn new(id: &str, category: &str, title: &str, description: &str) -> Self {
        Self {
            id: id.to_string(),
            category: category.to_string(),
            title: title.to_string(),
            description: description.to_string(),
        }
    }
}

/// `(id, category, title, description)` in traversal order.
const CATALOG: &[(&str, &str, &str, &str)] = &[
    (
        "licence_disc",
        CATEGORY_DOCUMENTS,
        "Licence Disc",
        "Vehicle licence disc is valid and displayed on the windscreen.",
    ),
    (
        "hazchem_placards",
        CATEGORY_DOCUMENTS,
        "Hazchem Placards",
        "Hazchem and UN placards are fitted, legible and match the product.",
    ),
    (
        "driver_permit",
        CATEGORY_DOCUMENTS,
        "Driver Permit",
        "Driver holds a valid licence and dangerous goods permit.",
    ),
    (
        "windscreen_wipers",
        CATEGORY_CAB,
        "Windscreen & Wipers",
        "Windscreen free of cracks in the driver's view; wipers and washers work.",
    ),
    (
        "mirrors",
        CATEGORY_CAB,
        "Mirrors",
        "All mirrors present, secure and undamaged.",
    ),
    (
        "horn_seatbelts",
        CATEGORY_CAB,
        "Horn & Seatbelts",
        "Horn sounds; seatbelts latch and retract.",
    ),
    (
        "tyre_tread",
        CATEGORY_TYRES,
        "Tyre Tread",
        "Tread depth above legal minimum on every tyre, no cuts or bulges.",
    ),
    (
        "wheel_nuts",
        CATEGORY_TYRES,
        "Wheel Nuts",
        "No missing or loose wheel nuts; indicators aligned.",
    ),
    (
        "service_brakes",
        CATEGORY_BRAKES,
        "Service Brakes",
        "Service brake holds and releases; no air leaks audible.",
    ),
    (
        "park_brake",
        CATEGORY_BRAKES,
        "Park Brake",
        "Park brake holds the loaded vehicle on an incline.",
    ),
    (
        "head_tail_lights",
        CATEGORY_LIGHTS,
        "Head & Tail Lights",
        "Head, tail and brake lights all function.",
    ),
    (
        "indicators_hazards",
        CATEGORY_LIGHTS,
        "Indicators & Hazards",
        "Indicators and hazard lights flash on both sides.",
    ),
    (
        "tank_shell",
        CATEGORY_TANK,
        "Tank Shell",
        "No leaks, dents or corrosion on the tank barrel.",
    ),
    (
        "manlids",
        CATEGORY_TANK,
        "Manlids",
        "Manlid seals intact and lids close securely.",
    ),
    (
        "bottom_valves",
        CATEGORY_TANK,
        "Bottom Valves",
        "Bottom-loading valves closed, capped and not weeping.",
    ),
    (
        "emergency_shutoff",
        CATEGORY_TANK,
        "Emergency Shut-off",
        "Emergency shut-off closes all valves when activated.",
    ),
    (
        "earthing_cable",
        CATEGORY_SAFETY,
        "Earthing Cable",
        "Static earthing cable and clamp are present and undamaged.",
    ),
    (
        "fire_extinguishers",
        CATEGORY_SAFETY,
        "Fire Extinguishers",
        "Extinguishers charged, sealed and within service date.",
    ),
    (
        "spill_kit",
        CATEGORY_SAFETY,
        "Spill Kit",
        "Spill kit complete and accessible.",
    ),
    (
        "wheel_chocks_triangles",
        CATEGORY_SAFETY,
        "Chocks & Triangles",
        "Two wheel chocks and two warning triangles on board.",
    ),
];

/// The full checklist in traversal order.
pub fn catalog() -> Vec<ChecklistItem> {
    CATALOG
        .iter()
        .map(|(id, category, title, description)| {
            ChecklistItem::new(id, category, title, description)
        })
        .collect()
}

/// Look up a single item by id.
pub fn find(id: &str) -> Option<ChecklistItem> {
    CATALOG
        .iter()
        .find(|(item_id, ..)| *item_id == id)
        .map(|(id, category, title, description)| {
            ChecklistItem::new(id, category, title, description)
        })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn catalog_is_not_empty() {
        assert!(!catalog().is_empty());
    }

    #[test]
    fn item_ids_are_unique_and_non_empty() {
        let items = catalog();
        let ids: HashSet<&str> = items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids.len(), items.len());
        assert!(items.iter().all(|i| !i.id.is_empty() && !i.title.is_empty()));
    }

    #[test]
    fn categories_are_contiguous() {
        // Each category appears as a single run so the UI can group headers.
        let items = catalog();
        let mut seen: Vec<&str> = Vec::new();
        for item in &items {
            if seen.last() != Some(&item.category.as_str()) {
                assert!(
                    !seen.contains(&item.category.as_str()),
                    "category '{}' is split",
                    item.category
                );
                seen.push(&item.category);
            }
        }
    }

    #[test]
    fn find_known_item() {
        let item = find("bottom_valves").expect("item should exist");
        assert_eq!(item.category, CATEGORY_TANK);
    }

    #[test]
    fn find_unknown_item() {
        assert!(find("flux_capacitor").is_none());
    }
}
