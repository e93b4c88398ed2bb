//! # Worksheet
//!
//! The `Worksheet` holds everything a take-off needs: the six element
//! tables, the land survey, the active calculators and the settings.
//! Worksheets serialize to human-readable JSON.
//!
//! ## Structure
//!
//! ```text
//! Worksheet
//! ├── meta: WorksheetMetadata (version, id, name, client, timestamps)
//! ├── settings: EstimateSettings (empirical constants)
//! ├── active: set of CalculatorKind
//! ├── footings / beams / columns / slabs / masonry / plaster: RowSet<…>
//! └── land: RowSet<Vertex>
//! ```
//!
//! [`Worksheet::estimate`] runs the whole pipeline: floor filter, each active
//! calculator, consolidation, land area. It never mutates the worksheet.
//!
//! ## Example
//!
//! ```rust
//! use takeoff_core::floor::FloorFilter;
//! use takeoff_core::worksheet::Worksheet;
//!
//! let sheet = Worksheet::new("Casa Silva", "João Silva");
//! let estimate = sheet.estimate(&FloorFilter::All);
//!
//! assert!(estimate.footings.is_some());
//! assert_eq!(estimate.land.area_m2, Some(200.0));
//! ```

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use log::debug;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::calculations::polygon::{self, PolygonProjection, Vertex, Viewport};
use crate::calculations::{
    beam, column, footing, masonry, plaster, slab, BeamRow, CalculatorKind, CalculatorTotals,
    ColumnRow, ComputedBeam, ComputedColumn, ComputedFooting, ComputedMasonry, ComputedPlaster,
    ComputedSlab, FootingRow, FootingTotals, FramingTotals, MasonryRow, MasonryTotals, PlasterRow,
    PlasterTotals, SlabRow, SlabTotals,
};
use crate::consolidation::{consolidate, ConsolidatedTotals};
use crate::floor::{self, filter_rows, FloorFilter};
use crate::rows::RowSet;
use crate::settings::{EstimateSettings, DEFAULT_SETTINGS};

/// Current schema version for worksheet files
pub const SCHEMA_VERSION: &str = "0.1.0";

/// Root worksheet container.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Worksheet {
    pub meta: WorksheetMetadata,

    #[serde(default)]
    pub settings: EstimateSettings,

    /// Calculators included in the estimate
    #[serde(default = "all_calculators")]
    pub active: BTreeSet<CalculatorKind>,

    #[serde(default)]
    pub footings: RowSet<FootingRow>,
    #[serde(default)]
    pub beams: RowSet<BeamRow>,
    #[serde(default)]
    pub columns: RowSet<ColumnRow>,
    #[serde(default)]
    pub slabs: RowSet<SlabRow>,
    #[serde(default)]
    pub masonry: RowSet<MasonryRow>,
    #[serde(default)]
    pub plaster: RowSet<PlasterRow>,

    /// Land parcel survey ring
    #[serde(default)]
    pub land: RowSet<Vertex>,
}

fn all_calculators() -> BTreeSet<CalculatorKind> {
    CalculatorKind::ALL.into_iter().collect()
}

impl Worksheet {
    /// Create a worksheet with one placeholder row per table and every
    /// calculator active.
    ///
    /// # Example
    ///
    /// ```rust
    /// use takeoff_core::worksheet::Worksheet;
    ///
    /// let sheet = Worksheet::new("Casa Silva", "João Silva");
    /// assert_eq!(sheet.meta.name, "Casa Silva");
    /// assert_eq!(sheet.footings.len(), 1);
    /// assert_eq!(sheet.land.len(), 4);
    /// ```
    pub fn new(name: impl Into<String>, client: impl Into<String>) -> Self {
        let now = Utc::now();
        Worksheet {
            meta: WorksheetMetadata {
                version: SCHEMA_VERSION.to_string(),
                id: Uuid::new_v4(),
                name: name.into(),
                client: client.into(),
                created: now,
                modified: now,
            },
            settings: DEFAULT_SETTINGS.clone(),
            active: all_calculators(),
            footings: RowSet::default(),
            beams: RowSet::default(),
            columns: RowSet::default(),
            slabs: RowSet::default(),
            masonry: RowSet::default(),
            plaster: RowSet::default(),
            land: RowSet::default(),
        }
    }

    /// Update the modified timestamp.
    pub fn touch(&mut self) {
        self.meta.modified = Utc::now();
    }

    pub fn is_active(&self, kind: CalculatorKind) -> bool {
        self.active.contains(&kind)
    }

    /// Switch a calculator on or off.
    pub fn set_active(&mut self, kind: CalculatorKind, active: bool) {
        let changed = if active {
            self.active.insert(kind)
        } else {
            self.active.remove(&kind)
        };
        if changed {
            self.touch();
        }
    }

    /// Every floor named on any element table, in first-seen order.
    pub fn floors(&self) -> Vec<String> {
        let mut names = floor::floors(&self.footings);
        for more in [
            floor::floors(&self.beams),
            floor::floors(&self.columns),
            floor::floors(&self.slabs),
            floor::floors(&self.masonry),
            floor::floors(&self.plaster),
        ] {
            for name in more {
                if !names.contains(&name) {
                    names.push(name);
                }
            }
        }
        names
    }

    /// Run the take-off for a floor selection.
    pub fn estimate(&self, filter: &FloorFilter) -> Estimate {
        self.estimate_with_viewport(filter, Viewport::default())
    }

    /// Run the take-off, projecting the land survey onto `viewport`.
    pub fn estimate_with_viewport(&self, filter: &FloorFilter, viewport: Viewport) -> Estimate {
        let settings = &self.settings;

        let footings = self.is_active(CalculatorKind::Footing).then(|| {
            let rows = footing::compute_rows(&filter_rows(self.footings.rows(), filter), settings);
            let totals = footing::totals(&rows);
            Section { rows, totals }
        });
        let beams = self.is_active(CalculatorKind::Beam).then(|| {
            let rows = beam::compute_rows(&filter_rows(self.beams.rows(), filter), settings);
            let totals = beam::totals(&rows);
            Section { rows, totals }
        });
        let columns = self.is_active(CalculatorKind::Column).then(|| {
            let rows = column::compute_rows(&filter_rows(self.columns.rows(), filter), settings);
            let totals = column::totals(&rows);
            Section { rows, totals }
        });
        let slabs = self.is_active(CalculatorKind::Slab).then(|| {
            let rows = slab::compute_rows(&filter_rows(self.slabs.rows(), filter), settings);
            let totals = slab::totals(&rows);
            Section { rows, totals }
        });
        let masonry = self.is_active(CalculatorKind::Masonry).then(|| {
            let rows = masonry::compute_rows(&filter_rows(self.masonry.rows(), filter), settings);
            let totals = masonry::totals(&rows);
            Section { rows, totals }
        });
        let plaster = self.is_active(CalculatorKind::Plaster).then(|| {
            let rows = plaster::compute_rows(&filter_rows(self.plaster.rows(), filter), settings);
            let totals = plaster::totals(&rows);
            Section { rows, totals }
        });

        let mut active_totals = Vec::with_capacity(self.active.len());
        if let Some(s) = &footings {
            active_totals.push(CalculatorTotals::Footing(s.totals.clone()));
        }
        if let Some(s) = &beams {
            active_totals.push(CalculatorTotals::Beam(s.totals.clone()));
        }
        if let Some(s) = &columns {
            active_totals.push(CalculatorTotals::Column(s.totals.clone()));
        }
        if let Some(s) = &slabs {
            active_totals.push(CalculatorTotals::Slab(s.totals.clone()));
        }
        if let Some(s) = &masonry {
            active_totals.push(CalculatorTotals::Masonry(s.totals.clone()));
        }
        if let Some(s) = &plaster {
            active_totals.push(CalculatorTotals::Plaster(s.totals.clone()));
        }

        debug!(
            "estimate for {}: {} active calculators",
            filter.display_name(),
            active_totals.len()
        );

        let land = LandSurvey {
            area_m2: polygon::polygon_area(self.land.rows()),
            projection: polygon::project(self.land.rows(), viewport),
        };

        Estimate {
            filter: filter.clone(),
            consolidated: consolidate(&active_totals),
            footings,
            beams,
            columns,
            slabs,
            masonry,
            plaster,
            land,
        }
    }
}

impl Default for Worksheet {
    fn default() -> Self {
        Worksheet::new("", "")
    }
}

/// Worksheet metadata stored in the file header.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorksheetMetadata {
    /// Schema version (for migration compatibility)
    pub version: String,

    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,

    /// Job or building name
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub client: String,

    pub created: DateTime<Utc>,

    pub modified: DateTime<Utc>,
}

/// Computed rows and totals of one calculator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section<C, T> {
    pub rows: Vec<C>,
    pub totals: T,
}

/// Land parcel results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LandSurvey {
    /// `None` when the ring is incomplete
    pub area_m2: Option<f64>,
    /// `None` when the ring is incomplete or flat
    pub projection: Option<PolygonProjection>,
}

/// Everything a report needs. Inactive calculators are `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Estimate {
    pub filter: FloorFilter,
    pub footings: Option<Section<ComputedFooting, FootingTotals>>,
    pub beams: Option<Section<ComputedBeam, FramingTotals>>,
    pub columns: Option<Section<ComputedColumn, FramingTotals>>,
    pub slabs: Option<Section<ComputedSlab, SlabTotals>>,
    pub masonry: Option<Section<ComputedMasonry, MasonryTotals>>,
    pub plaster: Option<Section<ComputedPlaster, PlasterTotals>>,
    /// Land area is not floor dependent
    pub land: LandSurvey,
    pub consolidated: ConsolidatedTotals,
}
