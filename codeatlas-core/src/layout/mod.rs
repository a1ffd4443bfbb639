//! Spatial layout engine
//!
//! Files are bucketed by zone, each zone is sized from its population, zones
//! are placed on a 3x3 grid around `core` with gaps wide enough that they can
//! never overlap, and every file gets a cell on its zone's square spiral.
//! Pinned files keep their override position and do not consume a cell.

pub mod spiral;

pub use spiral::{ring_for_index, spiral_offset, zone_radius, zone_rings};

use crate::instrumentation::{self, Instrumentation, Timer};
use crate::models::{CodeFile, Position, Zone, ZoneSummary};
use crate::overrides::{NoOverrides, OverrideLookup};
use crate::zones::ZoneClassifier;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Zone sizing and spacing settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LayoutConfig {
    /// Clear space kept between the reserved squares of neighbouring zones
    pub pathway_gap: f64,
    /// Distance between neighbouring cells in zones without their own spacing
    pub default_spacing: f64,
    /// Per-zone cell spacing
    pub zone_spacing: BTreeMap<Zone, f64>,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            pathway_gap: 6.0,
            default_spacing: 3.0,
            zone_spacing: BTreeMap::new(),
        }
    }
}

impl LayoutConfig {
    pub fn spacing_for(&self, zone: Zone) -> f64 {
        self.zone_spacing
            .get(&zone)
            .copied()
            .unwrap_or(self.default_spacing)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.pathway_gap.is_finite() || self.pathway_gap < 0.0 {
            return Err(Error::Config(format!(
                "layout.pathway_gap must be a non-negative number, got {}",
                self.pathway_gap
            )));
        }
        for zone in Zone::ALL {
            let spacing = self.spacing_for(zone);
            if !spacing.is_finite() || spacing <= 0.0 {
                return Err(Error::Config(format!(
                    "spacing for zone '{}' must be positive, got {}",
                    zone, spacing
                )));
            }
        }
        Ok(())
    }
}

/// Output of one layout pass
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    positions: BTreeMap<String, Position>,
    assignments: BTreeMap<String, Zone>,
    zones: Vec<ZoneSummary>,
}

impl Layout {
    /// Position of every file, keyed by file id
    pub fn positions(&self) -> &BTreeMap<String, Position> {
        &self.positions
    }

    pub fn position(&self, file_id: &str) -> Option<Position> {
        self.positions.get(file_id).copied()
    }

    pub fn zone_of(&self, file_id: &str) -> Option<Zone> {
        self.assignments.get(file_id).copied()
    }

    /// Summaries of the zones that received files, in canonical zone order
    pub fn zone_bounds(&self) -> &[ZoneSummary] {
        &self.zones
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn into_parts(self) -> (BTreeMap<String, Position>, Vec<ZoneSummary>) {
        (self.positions, self.zones)
    }
}

/// Running state of one zone during a single layout pass
#[derive(Debug, Clone)]
struct ZoneState {
    zone: Zone,
    center: Position,
    spacing: f64,
    radius: f64,
    bounds: Option<(f64, f64, f64, f64)>,
    file_count: usize,
    next_index: usize,
}

impl ZoneState {
    fn place(&mut self, position: Position) {
        self.bounds = Some(match self.bounds {
            None => (position.x, position.x, position.z, position.z),
            Some((min_x, max_x, min_z, max_z)) => (
                min_x.min(position.x),
                max_x.max(position.x),
                min_z.min(position.z),
                max_z.max(position.z),
            ),
        });
        self.file_count += 1;
    }

    fn next_procedural(&mut self) -> Position {
        debug_assert!(self.spacing > 0.0, "zone {} has non-positive spacing", self.zone);
        let (dx, dz) = spiral_offset(self.next_index);
        self.next_index += 1;
        Position::new(
            self.center.x + dx as f64 * self.spacing,
            self.center.z + dz as f64 * self.spacing,
        )
    }

    fn summary(&self) -> Option<ZoneSummary> {
        let (min_x, max_x, min_z, max_z) = self.bounds?;
        Some(ZoneSummary {
            name: self.zone.name().to_string(),
            display_name: self.zone.display_name().to_string(),
            min_x,
            max_x,
            min_z,
            max_z,
            file_count: self.file_count,
            color: self.zone.color().to_string(),
            center_x: self.center.x,
            center_z: self.center.z,
            radius: self.radius,
        })
    }
}

/// Zone centers for the given radii: each grid column (row) is as wide as its
/// largest zone, and neighbouring columns (rows) sit `r_a + r_b + gap` apart.
fn zone_centers(radii: &[f64; 8], gap: f64) -> [Position; 8] {
    let mut column_radius = [0.0_f64; 3];
    let mut row_radius = [0.0_f64; 3];
    for zone in Zone::ALL {
        let (column, row) = zone.grid_cell();
        let radius = radii[zone.index()];
        let c = (column + 1) as usize;
        let r = (row + 1) as usize;
        column_radius[c] = column_radius[c].max(radius);
        row_radius[r] = row_radius[r].max(radius);
    }

    let band_offset = |bands: &[f64; 3], cell: i8| match cell {
        -1 => -(bands[1] + bands[0] + gap),
        1 => bands[1] + bands[2] + gap,
        _ => 0.0,
    };

    let mut centers = [Position::default(); 8];
    for zone in Zone::ALL {
        let (column, row) = zone.grid_cell();
        centers[zone.index()] = Position::new(
            band_offset(&column_radius, column),
            band_offset(&row_radius, row),
        );
    }
    centers
}

/// Computes file positions; holds no per-layout state, so one engine can
/// serve any number of passes.
pub struct LayoutEngine {
    config: LayoutConfig,
    classifier: ZoneClassifier,
    overrides: Arc<dyn OverrideLookup>,
    instrumentation: Arc<dyn Instrumentation>,
}

impl LayoutEngine {
    pub fn new(
        config: LayoutConfig,
        overrides: Arc<dyn OverrideLookup>,
        instrumentation: Arc<dyn Instrumentation>,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            classifier: ZoneClassifier::new(),
            overrides,
            instrumentation,
        })
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    pub fn classifier(&self) -> &ZoneClassifier {
        &self.classifier
    }

    /// Place every file. Deterministic for a fixed file order and override
    /// lookup; input order decides spiral order within a zone.
    pub fn compute_positions(&self, files: &[CodeFile]) -> Layout {
        let timer = Timer::start(self.instrumentation.as_ref(), "layout.compute_positions");

        let mut buckets: [Vec<&CodeFile>; 8] = Default::default();
        for file in files {
            buckets[self.classifier.zone_for(file).index()].push(file);
        }

        let mut radii = [0.0_f64; 8];
        for zone in Zone::ALL {
            radii[zone.index()] = zone_radius(buckets[zone.index()].len(), self.config.spacing_for(zone));
        }
        let centers = zone_centers(&radii, self.config.pathway_gap);

        let mut arena: Vec<ZoneState> = Zone::ALL
            .iter()
            .map(|&zone| ZoneState {
                zone,
                center: centers[zone.index()],
                spacing: self.config.spacing_for(zone),
                radius: radii[zone.index()],
                bounds: None,
                file_count: 0,
                next_index: 0,
            })
            .collect();

        let mut layout = Layout::default();
        for zone in Zone::ALL {
            let bucket = &buckets[zone.index()];
            if bucket.is_empty() {
                continue;
            }
            let state = &mut arena[zone.index()];
            for file in bucket {
                let position = match self.overrides.get_override(&file.id) {
                    Some(pinned) => pinned,
                    None => state.next_procedural(),
                };
                state.place(position);
                layout.positions.insert(file.id.clone(), position);
                layout.assignments.insert(file.id.clone(), zone);
            }
            tracing::trace!(
                "Zone {} holds {} files (radius {:.1})",
                zone,
                state.file_count,
                state.radius
            );
        }

        layout.zones = arena.iter().filter_map(ZoneState::summary).collect();
        timer.finish(files.len());
        layout
    }
}

impl Default for LayoutEngine {
    fn default() -> Self {
        Self {
            config: LayoutConfig::default(),
            classifier: ZoneClassifier::new(),
            overrides: Arc::new(NoOverrides),
            instrumentation: instrumentation::noop(),
        }
    }
}
