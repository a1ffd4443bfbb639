use serde::{Deserialize, Serialize};

/// The eight architectural zones of the map.
///
/// Declaration order is the canonical order used for zone summaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Zone {
    Core,
    Api,
    Data,
    Ui,
    Lib,
    Entry,
    Test,
    Infra,
}

impl Zone {
    pub const ALL: [Zone; 8] = [
        Zone::Core,
        Zone::Api,
        Zone::Data,
        Zone::Ui,
        Zone::Lib,
        Zone::Entry,
        Zone::Test,
        Zone::Infra,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Zone::Core => "core",
            Zone::Api => "api",
            Zone::Data => "data",
            Zone::Ui => "ui",
            Zone::Lib => "lib",
            Zone::Entry => "entry",
            Zone::Test => "test",
            Zone::Infra => "infra",
        }
    }

    pub const fn display_name(self) -> &'static str {
        match self {
            Zone::Core => "Core Logic",
            Zone::Api => "API Layer",
            Zone::Data => "Data Layer",
            Zone::Ui => "User Interface",
            Zone::Lib => "Libraries & Utilities",
            Zone::Entry => "Entry Points",
            Zone::Test => "Tests",
            Zone::Infra => "Infrastructure",
        }
    }

    pub const fn color(self) -> &'static str {
        match self {
            Zone::Core => "#4a90d9",
            Zone::Api => "#e67e22",
            Zone::Data => "#27ae60",
            Zone::Ui => "#9b59b6",
            Zone::Lib => "#7f8c8d",
            Zone::Entry => "#f1c40f",
            Zone::Test => "#e74c3c",
            Zone::Infra => "#16a085",
        }
    }

    /// Cell on the 3x3 conceptual grid as `(column, row)`, each in `-1..=1`.
    ///
    /// Entry points sit above the core with the API beside them, data beside
    /// the core, tests and infrastructure along the bottom. `(0, 1)` is unused.
    pub const fn grid_cell(self) -> (i8, i8) {
        match self {
            Zone::Ui => (-1, -1),
            Zone::Entry => (0, -1),
            Zone::Api => (1, -1),
            Zone::Lib => (-1, 0),
            Zone::Core => (0, 0),
            Zone::Data => (1, 0),
            Zone::Test => (-1, 1),
            Zone::Infra => (1, 1),
        }
    }

    pub const fn index(self) -> usize {
        self as usize
    }
}

impl std::fmt::Display for Zone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for Zone {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Zone::ALL
            .into_iter()
            .find(|zone| zone.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| crate::Error::Config(format!("Unknown zone: '{s}'")))
    }
}

/// A point on the layout plane
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub z: f64,
}

impl Position {
    pub const fn new(x: f64, z: f64) -> Self {
        Self { x, z }
    }
}

/// Bounding box and population of one zone after a layout pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneSummary {
    pub name: String,
    pub display_name: String,
    pub min_x: f64,
    pub max_x: f64,
    pub min_z: f64,
    pub max_z: f64,
    pub file_count: usize,
    pub color: String,
    pub center_x: f64,
    pub center_z: f64,
    pub radius: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_grid_cells_are_distinct() {
        let cells: HashSet<_> = Zone::ALL.iter().map(|z| z.grid_cell()).collect();
        assert_eq!(cells.len(), 8);
        assert_eq!(Zone::Core.grid_cell(), (0, 0));
    }

    #[test]
    fn test_zone_name_round_trip() {
        for zone in Zone::ALL {
            assert_eq!(zone.name().parse::<Zone>().unwrap(), zone);
        }
        assert!("frontend".parse::<Zone>().is_err());
    }

    #[test]
    fn test_index_matches_canonical_order() {
        for (i, zone) in Zone::ALL.iter().enumerate() {
            assert_eq!(zone.index(), i);
        }
    }
}
