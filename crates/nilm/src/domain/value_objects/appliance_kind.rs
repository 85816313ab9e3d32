//! ApplianceKind - The fixed appliance vocabulary of the dashboard

use serde::{Deserialize, Serialize};

/// Appliance monitored by the NILM sensors
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ApplianceKind {
    Refrigerator,
    WasherDryer,
    Microwave,
    DishWasher,
}

impl ApplianceKind {
    /// All kinds, in dashboard display order
    pub const ALL: [ApplianceKind; 4] = [
        ApplianceKind::Refrigerator,
        ApplianceKind::WasherDryer,
        ApplianceKind::Microwave,
        ApplianceKind::DishWasher,
    ];

    /// Stored name (`washer_dryer`)
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplianceKind::Refrigerator => "refrigerator",
            ApplianceKind::WasherDryer => "washer_dryer",
            ApplianceKind::Microwave => "microwave",
            ApplianceKind::DishWasher => "dish_washer",
        }
    }

    /// Human label (`washer dryer`)
    pub fn label(&self) -> String {
        self.as_str().replacen('_', " ", 1)
    }
}

impl std::fmt::Display for ApplianceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ApplianceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "refrigerator" => Ok(ApplianceKind::Refrigerator),
            "washer_dryer" => Ok(ApplianceKind::WasherDryer),
            "microwave" => Ok(ApplianceKind::Microwave),
            "dish_washer" => Ok(ApplianceKind::DishWasher),
            _ => Err(format!("Unknown appliance: {}", s)),
        }
    }
}

/// Houses selectable on the dashboard
pub const HOUSES: [&str; 6] = ["1", "2", "3", "4", "5", "6"];

/// Filter value meaning "every appliance"
pub const ALL_APPLIANCES: &str = "all";
