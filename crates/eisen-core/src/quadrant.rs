//! Quadrant Keys
//!
//! The four urgent/important combinations of the Eisenhower matrix.

use serde::{Deserialize, Serialize};

/// One of the four matrix quadrants.
///
/// Wire names match the JSON API (`urgentImportant`, ...). An active task
/// belongs to exactly one quadrant at all times.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum QuadrantKey {
    UrgentImportant,
    NotUrgentImportant,
    UrgentNotImportant,
    NotUrgentNotImportant,
}

impl QuadrantKey {
    /// All quadrants in display order (left-to-right, top-to-bottom).
    pub const ALL: [QuadrantKey; 4] = [
        QuadrantKey::UrgentImportant,
        QuadrantKey::NotUrgentImportant,
        QuadrantKey::UrgentNotImportant,
        QuadrantKey::NotUrgentNotImportant,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            QuadrantKey::UrgentImportant => "urgentImportant",
            QuadrantKey::NotUrgentImportant => "notUrgentImportant",
            QuadrantKey::UrgentNotImportant => "urgentNotImportant",
            QuadrantKey::NotUrgentNotImportant => "notUrgentNotImportant",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "urgentImportant" => Some(QuadrantKey::UrgentImportant),
            "notUrgentImportant" => Some(QuadrantKey::NotUrgentImportant),
            "urgentNotImportant" => Some(QuadrantKey::UrgentNotImportant),
            "notUrgentNotImportant" => Some(QuadrantKey::NotUrgentNotImportant),
            _ => None,
        }
    }
}

impl std::fmt::Display for QuadrantKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_wire_names() {
        for key in QuadrantKey::ALL {
            assert_eq!(QuadrantKey::from_str(key.as_str()), Some(key));
        }
    }

    #[test]
    fn rejects_unknown_names() {
        assert_eq!(QuadrantKey::from_str("UrgentImportant"), None);
        assert_eq!(QuadrantKey::from_str(""), None);
    }
}
