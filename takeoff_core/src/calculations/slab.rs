//! # Slab and Subfloor (Laje / Contrapiso) Take-off
//!
//! Concrete spread over an area at a given thickness. Slabs and subfloors use
//! the leaner 1:4:5 trace ([`ConcreteMix::SLAB`](crate::settings::ConcreteMix::SLAB)).
//!
//! Only rows typed [`SlabKind::Slab`] count toward the slab area total; a
//! subfloor sits on the ground and is not structural floor area.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};
use crate::floor::OnFloor;
use crate::parsing::parse_quantity;
use crate::rows::{unknown_field, ElementRow};
use crate::settings::EstimateSettings;
use crate::units::{Centimeters, CubicMeters, Meters, SquareMeters};

/// Slab or subfloor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SlabKind {
    #[default]
    Slab,
    Subfloor,
}

impl SlabKind {
    pub const ALL: [SlabKind; 2] = [SlabKind::Slab, SlabKind::Subfloor];

    pub fn display_name(&self) -> &'static str {
        match self {
            SlabKind::Slab => "Slab",
            SlabKind::Subfloor => "Subfloor",
        }
    }
}

impl fmt::Display for SlabKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for SlabKind {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "slab" | "laje" => Ok(SlabKind::Slab),
            "subfloor" | "contrapiso" => Ok(SlabKind::Subfloor),
            _ => Err(CalcError::invalid_input("kind", s, "Expected Slab or Subfloor")),
        }
    }
}

/// One line of the slab table.
///
/// ## JSON Example
///
/// ```json
/// {
///   "floor": "Térreo",
///   "label": "L1",
///   "kind": "Slab",
///   "thickness_cm": "10",
///   "area_m2": "42.5"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlabRow {
    pub floor: String,
    pub label: String,
    pub kind: SlabKind,
    /// Concrete thickness (cm)
    pub thickness_cm: String,
    pub area_m2: String,
}

impl Default for SlabRow {
    fn default() -> Self {
        SlabRow {
            floor: "Térreo".to_string(),
            label: "L1".to_string(),
            kind: SlabKind::Slab,
            thickness_cm: "10".to_string(),
            area_m2: "10".to_string(),
        }
    }
}

impl OnFloor for SlabRow {
    fn floor(&self) -> &str {
        &self.floor
    }
}

impl ElementRow for SlabRow {
    const FIELDS: &'static [&'static str] = &["floor", "label", "kind", "thickness_cm", "area_m2"];

    fn field(&self, name: &str) -> Option<String> {
        match name {
            "floor" => Some(self.floor.clone()),
            "label" => Some(self.label.clone()),
            "kind" => Some(self.kind.to_string()),
            "thickness_cm" => Some(self.thickness_cm.clone()),
            "area_m2" => Some(self.area_m2.clone()),
            _ => None,
        }
    }

    fn set_field(&mut self, name: &str, value: &str) -> CalcResult<()> {
        match name {
            "floor" => self.floor = value.to_string(),
            "label" => self.label = value.to_string(),
            "kind" => self.kind = value.parse()?,
            "thickness_cm" => self.thickness_cm = value.to_string(),
            "area_m2" => self.area_m2 = value.to_string(),
            _ => return Err(unknown_field(name)),
        }
        Ok(())
    }
}

/// A slab row with its quantities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComputedSlab {
    #[serde(flatten)]
    pub row: SlabRow,
    pub volume_m3: f64,
    pub cement_bags: f64,
    pub sand_m3: f64,
    pub gravel_m3: f64,
}

/// Slab totals.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SlabTotals {
    pub volume_m3: f64,
    pub cement_bags: f64,
    pub sand_m3: f64,
    pub gravel_m3: f64,
    /// Area of rows typed Slab only (m²)
    pub slab_area_m2: f64,
    /// Area of every row (m²)
    pub total_area_m2: f64,
}

/// Compute quantities for one slab row.
pub fn compute_row(row: &SlabRow, settings: &EstimateSettings) -> ComputedSlab {
    let thickness: Meters = Centimeters(parse_quantity(&row.thickness_cm)).into();
    let area = SquareMeters(parse_quantity(&row.area_m2));
    let volume: CubicMeters = area * thickness;

    let mix = &settings.slab_concrete;
    let cement_bags = mix.cement_bags(volume);

    ComputedSlab {
        row: row.clone(),
        volume_m3: volume.0,
        cement_bags,
        sand_m3: mix.sand(cement_bags).0,
        gravel_m3: mix.gravel(cement_bags).0,
    }
}

/// Compute every row, preserving order.
pub fn compute_rows(rows: &[SlabRow], settings: &EstimateSettings) -> Vec<ComputedSlab> {
    rows.iter().map(|row| compute_row(row, settings)).collect()
}

/// Sum computed rows.
pub fn totals(computed: &[ComputedSlab]) -> SlabTotals {
    computed.iter().fold(SlabTotals::default(), |mut acc, c| {
        acc.volume_m3 += c.volume_m3;
        acc.cement_bags += c.cement_bags;
        acc.sand_m3 += c.sand_m3;
        acc.gravel_m3 += c.gravel_m3;

        let area = parse_quantity(&c.row.area_m2);
        acc.total_area_m2 += area;
        if c.row.kind == SlabKind::Slab {
            acc.slab_area_m2 += area;
        }
        acc
    })
}
