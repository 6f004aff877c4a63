//! Unit record - a sellable space within a wing
//!
//! Units carry a three-state sale status. Quick transitions may move a unit
//! from any state to any other in one step; a transition never clears the
//! party field left over from a previous state (the remote system stores
//! whatever it was last sent, and listings only read the field matching the
//! current status).

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Sale status of a unit
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum UnitStatus {
    #[default]
    Available,
    Hold,
    Sold,
}

impl std::fmt::Display for UnitStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnitStatus::Available => write!(f, "available"),
            UnitStatus::Hold => write!(f, "hold"),
            UnitStatus::Sold => write!(f, "sold"),
        }
    }
}

impl std::str::FromStr for UnitStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "available" => Ok(UnitStatus::Available),
            "hold" => Ok(UnitStatus::Hold),
            "sold" => Ok(UnitStatus::Sold),
            _ => Err(format!("Unknown unit status: {}", s)),
        }
    }
}

/// Unit configuration type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum, Default)]
pub enum UnitType {
    #[serde(rename = "studio")]
    Studio,
    #[serde(rename = "1bhk")]
    #[value(name = "1bhk")]
    OneBhk,
    #[serde(rename = "2bhk")]
    #[value(name = "2bhk")]
    #[default]
    TwoBhk,
    #[serde(rename = "3bhk")]
    #[value(name = "3bhk")]
    ThreeBhk,
    #[serde(rename = "4bhk")]
    #[value(name = "4bhk")]
    FourBhk,
    #[serde(rename = "penthouse")]
    Penthouse,
    #[serde(rename = "shop")]
    Shop,
    #[serde(rename = "office")]
    Office,
}

impl std::fmt::Display for UnitType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            UnitType::Studio => "studio",
            UnitType::OneBhk => "1bhk",
            UnitType::TwoBhk => "2bhk",
            UnitType::ThreeBhk => "3bhk",
            UnitType::FourBhk => "4bhk",
            UnitType::Penthouse => "penthouse",
            UnitType::Shop => "shop",
            UnitType::Office => "office",
        };
        write!(f, "{}", s)
    }
}

/// A sellable or leasable space belonging to exactly one wing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Unit {
    #[serde(alias = "_id")]
    pub id: String,

    /// Unit number or name, e.g. "A-1204"
    pub name: String,

    #[serde(rename = "type", default)]
    pub unit_type: UnitType,

    /// Floor label. Usually numeric; "G" and friends mean ground level.
    pub floor: String,

    /// Carpet area in sq.ft
    #[serde(default)]
    pub carpet_area: f64,

    /// Saleable area in sq.ft
    #[serde(default)]
    pub saleable_area: f64,

    /// Facing direction, e.g. "East", "Lake"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facing: Option<String>,

    #[serde(default)]
    pub price: f64,

    #[serde(default)]
    pub status: UnitStatus,

    /// Prospect holding the unit; meaningful only while status is Hold
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub held_by: Option<String>,

    /// Buyer or agent; meaningful only once status is Sold
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sold_by: Option<String>,

    #[serde(rename = "isActive", default = "default_active")]
    pub active: bool,

    /// Owning wing
    pub wing_id: String,
}

fn default_active() -> bool {
    true
}

impl Unit {
    /// Carpet-to-saleable efficiency ratio, when saleable area is known
    pub fn efficiency(&self) -> Option<f64> {
        (self.saleable_area > 0.0).then(|| self.carpet_area / self.saleable_area)
    }

    /// Case-insensitive substring search over unit name and facing
    pub fn matches_search(&self, query: &str) -> bool {
        let q = query.to_lowercase();
        self.name.to_lowercase().contains(&q)
            || self
                .facing
                .as_deref()
                .is_some_and(|f| f.to_lowercase().contains(&q))
    }

    /// Place the unit on hold for a prospect. Does not touch `sold_by`.
    pub fn hold(&self, by: &str) -> Self {
        let mut next = self.clone();
        next.status = UnitStatus::Hold;
        next.held_by = Some(by.to_string());
        next
    }

    /// Mark the unit sold. Does not touch `held_by`.
    pub fn sell(&self, to: &str) -> Self {
        let mut next = self.clone();
        next.status = UnitStatus::Sold;
        next.sold_by = Some(to.to_string());
        next
    }

    /// Return the unit to the open market. Party fields stay as-is.
    pub fn release(&self) -> Self {
        let mut next = self.clone();
        next.status = UnitStatus::Available;
        next
    }
}

/// Numeric rank of a floor label. Non-numeric labels ("G", "Ground", "UG")
/// rank as ground level, below every positive floor; negative labels
/// (basement parking) stay beneath ground.
pub fn floor_rank(label: &str) -> i64 {
    label.trim().parse::<i64>().unwrap_or(0)
}

/// Group units by floor label, groups ordered strictly descending by floor
/// rank, units within a floor ordered by name.
pub fn group_by_floor(units: &[Unit]) -> Vec<(String, Vec<&Unit>)> {
    let mut groups: Vec<(String, Vec<&Unit>)> = Vec::new();

    for unit in units {
        match groups.iter_mut().find(|(label, _)| *label == unit.floor) {
            Some((_, members)) => members.push(unit),
            None => groups.push((unit.floor.clone(), vec![unit])),
        }
    }

    for (_, members) in &mut groups {
        members.sort_by(|a, b| a.name.cmp(&b.name));
    }
    groups.sort_by(|a, b| floor_rank(&b.0).cmp(&floor_rank(&a.0)));
    groups
}
