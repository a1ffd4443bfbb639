//! Read-only access to manual file positions.
//!
//! The store that owns these positions lives outside the core; layout only
//! asks whether a given file id has been pinned.

use crate::models::Position;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

/// Synchronous lookup of a manual position by file id
pub trait OverrideLookup: Send + Sync {
    fn get_override(&self, file_id: &str) -> Option<Position>;
}

/// Lookup with no pinned files
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOverrides;

impl OverrideLookup for NoOverrides {
    fn get_override(&self, _file_id: &str) -> Option<Position> {
        None
    }
}

impl OverrideLookup for HashMap<String, Position> {
    fn get_override(&self, file_id: &str) -> Option<Position> {
        self.get(file_id).copied()
    }
}

impl OverrideLookup for BTreeMap<String, Position> {
    fn get_override(&self, file_id: &str) -> Option<Position> {
        self.get(file_id).copied()
    }
}

impl<T: OverrideLookup + ?Sized> OverrideLookup for Arc<T> {
    fn get_override(&self, file_id: &str) -> Option<Position> {
        (**self).get_override(file_id)
    }
}

/// Round a coordinate to the three decimals override stores keep
pub fn round_coordinate(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_lookup() {
        let mut map = HashMap::new();
        map.insert("src_a_ts".to_string(), Position::new(1.5, -2.0));

        assert_eq!(map.get_override("src_a_ts"), Some(Position::new(1.5, -2.0)));
        assert_eq!(map.get_override("src_b_ts"), None);
        assert_eq!(NoOverrides.get_override("src_a_ts"), None);
    }

    #[test]
    fn test_arc_lookup_delegates() {
        let mut map = BTreeMap::new();
        map.insert("x".to_string(), Position::new(0.0, 1.0));
        let shared: Arc<dyn OverrideLookup> = Arc::new(map);
        assert_eq!(shared.get_override("x"), Some(Position::new(0.0, 1.0)));
    }

    #[test]
    fn test_round_coordinate() {
        assert!((round_coordinate(1.23456) - 1.235).abs() < 1e-12);
        assert!((round_coordinate(-0.0004) - 0.0).abs() < 1e-12);
        assert!((round_coordinate(12.0) - 12.0).abs() < 1e-12);
    }
}
