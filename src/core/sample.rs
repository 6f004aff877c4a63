//! Built-in demo dataset
//!
//! When the remote returns an empty wing or unit list and demo data is
//! enabled, listings fall back to this fixed dataset so the console stays
//! populated for demonstrations. The records are embedded at build time and
//! re-parented onto whatever project or wing was being viewed. Never cached,
//! never written back.

use rust_embed::RustEmbed;

use crate::entities::{Unit, Wing};

#[derive(RustEmbed)]
#[folder = "assets/sample/"]
struct SampleAssets;

fn load<T: serde::de::DeserializeOwned>(file: &str) -> Vec<T> {
    // The assets are compiled in; a parse failure is a build defect, so an
    // empty fallback here can only hide one. Parse strictly.
    let raw = SampleAssets::get(file).expect("embedded sample asset");
    serde_json::from_slice(raw.data.as_ref()).expect("valid embedded sample JSON")
}

/// The three demo wings, re-parented onto the given project
pub fn wings(project_id: &str) -> Vec<Wing> {
    let mut wings: Vec<Wing> = load("wings.json");
    for wing in &mut wings {
        wing.project_id = project_id.to_string();
    }
    wings
}

/// The demo unit mix, re-parented onto the given wing
pub fn units(wing_id: &str) -> Vec<Unit> {
    let mut units: Vec<Unit> = load("units.json");
    for unit in &mut units {
        unit.wing_id = wing_id.to_string();
    }
    units
}

/// Whether a listing should fall back to demo data: only a legitimately
/// empty result qualifies, and only when demo data is enabled. Failed
/// fetches never reach this point; they surface as errors.
pub fn should_fall_back<T>(items: &[T], demo_enabled: bool) -> bool {
    demo_enabled && items.is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::UnitStatus;

    #[test]
    fn test_exactly_three_fixed_wings() {
        let wings = wings("p1");
        let names: Vec<_> = wings.iter().map(|w| w.name.as_str()).collect();
        assert_eq!(names, vec!["Wing A", "Wing B", "Tower C"]);

        assert_eq!(wings[0].total_floors, 12);
        assert_eq!(wings[1].total_floors, 10);
        assert_eq!(wings[2].total_floors, 22);
        assert!(wings.iter().all(|w| w.project_id == "p1"));
    }

    #[test]
    fn test_units_reparented_and_statuses_valid() {
        let units = units("w1");
        assert!(!units.is_empty());
        assert!(units.iter().all(|u| u.wing_id == "w1"));
        // Hold units carry a holder, sold units a buyer.
        for unit in &units {
            match unit.status {
                UnitStatus::Hold => assert!(unit.held_by.is_some()),
                UnitStatus::Sold => assert!(unit.sold_by.is_some()),
                UnitStatus::Available => {}
            }
        }
    }

    #[test]
    fn test_fallback_only_on_empty_with_demo_enabled() {
        let empty: Vec<Wing> = Vec::new();
        let some = wings("p1");
        assert!(should_fall_back(&empty, true));
        assert!(!should_fall_back(&empty, false));
        assert!(!should_fall_back(&some, true));
    }
}
