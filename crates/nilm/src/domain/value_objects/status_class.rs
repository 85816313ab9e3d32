//! StatusClass - Display classification of an appliance status string

use serde::{Deserialize, Serialize};

/// Coarse, case-insensitive classification of the free-form status field.
///
/// Aggregations never use this; they compare the raw status exactly.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StatusClass {
    Active,
    Standby,
    Off,
    Unknown,
}

impl StatusClass {
    pub fn classify(status: &str) -> Self {
        match status.to_lowercase().as_str() {
            "active" => StatusClass::Active,
            "standby" => StatusClass::Standby,
            "off" => StatusClass::Off,
            _ => StatusClass::Unknown,
        }
    }
}

impl std::fmt::Display for StatusClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StatusClass::Active => write!(f, "active"),
            StatusClass::Standby => write!(f, "standby"),
            StatusClass::Off => write!(f, "off"),
            StatusClass::Unknown => write!(f, "unknown"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_folds_case() {
        assert_eq!(StatusClass::classify("ACTIVE"), StatusClass::Active);
        assert_eq!(StatusClass::classify("Standby"), StatusClass::Standby);
        assert_eq!(StatusClass::classify("off"), StatusClass::Off);
        assert_eq!(StatusClass::classify("broken"), StatusClass::Unknown);
        assert_eq!(StatusClass::classify(""), StatusClass::Unknown);
    }
}
