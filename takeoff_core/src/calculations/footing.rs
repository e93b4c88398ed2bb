//! # Footing (Sapata) Take-off
//!
//! Isolated pad footings: a reinforced concrete block with a mesh of bars in
//! both directions.
//!
//! ## Method
//!
//! - Volume: width × length × height, times the number of identical footings
//! - Bars: each bar spans the footing dimension minus a 20 cm clearance
//!   (10 cm cover at each end). Bars running along the length are the
//!   "vertical" stirrups, bars along the width the "horizontal" ones.
//! - Cement, sand, gravel: structural 1:5:6 trace
//!   (see [`ConcreteMix::STRUCTURAL`](crate::settings::ConcreteMix::STRUCTURAL))
//!
//! ## Example
//!
//! ```rust
//! use takeoff_core::calculations::footing::{compute_row, FootingRow};
//! use takeoff_core::settings::EstimateSettings;
//!
//! let row = FootingRow {
//!     width_cm: "100".to_string(),
//!     length_cm: "100".to_string(),
//!     height_cm: "40".to_string(),
//!     ..FootingRow::default()
//! };
//!
//! let computed = compute_row(&row, &EstimateSettings::default());
//! assert!((computed.volume_m3 - 0.4).abs() < 1e-9);
//! assert!((computed.cement_bags - 2.5).abs() < 1e-9);
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::CalcResult;
use crate::floor::OnFloor;
use crate::parsing::parse_quantity;
use crate::rebar::{bars_for_length, deserialize_main, BarCounts, BarGauge};
use crate::rows::{unknown_field, ElementRow};
use crate::settings::EstimateSettings;
use crate::units::{Centimeters, CubicMeters, Meters};

/// One line of the footing table.
///
/// ## JSON Example
///
/// ```json
/// {
///   "floor": "Térreo",
///   "label": "S1",
///   "count": "4",
///   "width_cm": "80",
///   "length_cm": "120",
///   "height_cm": "40",
///   "horizontal_stirrups": "6",
///   "vertical_stirrups": "5",
///   "diameter": "3/8"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FootingRow {
    /// Building floor this footing belongs to
    pub floor: String,
    /// Element tag (e.g., "S1")
    pub label: String,
    /// Number of identical footings
    pub count: String,
    pub width_cm: String,
    pub length_cm: String,
    pub height_cm: String,
    /// Bars laid along the width
    pub horizontal_stirrups: String,
    /// Bars laid along the length
    pub vertical_stirrups: String,
    /// Bar diameter class for the mesh
    #[serde(deserialize_with = "deserialize_main")]
    pub diameter: BarGauge,
}

impl Default for FootingRow {
    fn default() -> Self {
        FootingRow {
            floor: "Térreo".to_string(),
            label: "S1".to_string(),
            count: "1".to_string(),
            width_cm: "100".to_string(),
            length_cm: "100".to_string(),
            height_cm: "40".to_string(),
            horizontal_stirrups: "5".to_string(),
            vertical_stirrups: "5".to_string(),
            diameter: BarGauge::ThreeEighths,
        }
    }
}

impl OnFloor for FootingRow {
    fn floor(&self) -> &str {
        &self.floor
    }
}

impl ElementRow for FootingRow {
    const FIELDS: &'static [&'static str] = &[
        "floor",
        "label",
        "count",
        "width_cm",
        "length_cm",
        "height_cm",
        "horizontal_stirrups",
        "vertical_stirrups",
        "diameter",
    ];

    fn field(&self, name: &str) -> Option<String> {
        let value = match name {
            "floor" => &self.floor,
            "label" => &self.label,
            "count" => &self.count,
            "width_cm" => &self.width_cm,
            "length_cm" => &self.length_cm,
            "height_cm" => &self.height_cm,
            "horizontal_stirrups" => &self.horizontal_stirrups,
            "vertical_stirrups" => &self.vertical_stirrups,
            "diameter" => return Some(self.diameter.label().to_string()),
            _ => return None,
        };
        Some(value.clone())
    }

    fn set_field(&mut self, name: &str, value: &str) -> CalcResult<()> {
        let target = match name {
            "floor" => &mut self.floor,
            "label" => &mut self.label,
            "count" => &mut self.count,
            "width_cm" => &mut self.width_cm,
            "length_cm" => &mut self.length_cm,
            "height_cm" => &mut self.height_cm,
            "horizontal_stirrups" => &mut self.horizontal_stirrups,
            "vertical_stirrups" => &mut self.vertical_stirrups,
            "diameter" => {
                self.diameter = value.parse()?;
                return Ok(());
            }
            _ => return Err(unknown_field(name)),
        };
        *target = value.to_string();
        Ok(())
    }
}

/// A footing row with its quantities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComputedFooting {
    #[serde(flatten)]
    pub row: FootingRow,
    /// Volume of a single footing (m³)
    pub unit_volume_m3: f64,
    /// Volume of all footings on this row (m³)
    pub volume_m3: f64,
    /// Length of one bar along the width (m)
    pub horizontal_bar_m: f64,
    /// Length of one bar along the length (m)
    pub vertical_bar_m: f64,
    /// Total reinforcement for the row (m)
    pub linear_length_m: f64,
    /// Commercial bars, unrounded
    pub bars: f64,
    pub cement_bags: f64,
    pub sand_m3: f64,
    pub gravel_m3: f64,
}

/// Footing totals.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FootingTotals {
    pub volume_m3: f64,
    pub linear_length_m: f64,
    pub cement_bags: f64,
    pub sand_m3: f64,
    pub gravel_m3: f64,
    /// Bars per diameter class
    pub bars: BarCounts,
}

/// Length of one mesh bar across a footing dimension, 0 when the dimension
/// does not exceed the clearance.
fn mesh_bar_length(dimension: Centimeters, cover: Centimeters) -> Meters {
    if dimension > cover {
        (dimension - cover).into()
    } else {
        Meters(0.0)
    }
}

/// Compute quantities for one footing row.
pub fn compute_row(row: &FootingRow, settings: &EstimateSettings) -> ComputedFooting {
    let width = Centimeters(parse_quantity(&row.width_cm));
    let length = Centimeters(parse_quantity(&row.length_cm));
    let height = Centimeters(parse_quantity(&row.height_cm));
    // A footing missing any dimension contributes nothing, bars included
    let count = if width.0 > 0.0 && length.0 > 0.0 && height.0 > 0.0 {
        parse_quantity(&row.count)
    } else {
        0.0
    };
    let horizontal_stirrups = parse_quantity(&row.horizontal_stirrups);
    let vertical_stirrups = parse_quantity(&row.vertical_stirrups);

    let unit_volume: CubicMeters =
        Meters::from(width) * Meters::from(length) * Meters::from(height);
    let volume = unit_volume * count;

    let cover = Centimeters(settings.footing_cover_cm);
    let horizontal_bar = mesh_bar_length(width, cover);
    let vertical_bar = mesh_bar_length(length, cover);
    let linear = (horizontal_bar * horizontal_stirrups + vertical_bar * vertical_stirrups) * count;

    let mix = &settings.structural_concrete;
    let cement_bags = mix.cement_bags(volume);

    ComputedFooting {
        row: row.clone(),
        unit_volume_m3: unit_volume.0,
        volume_m3: volume.0,
        horizontal_bar_m: horizontal_bar.0,
        vertical_bar_m: vertical_bar.0,
        linear_length_m: linear.0,
        bars: bars_for_length(linear.0, settings.standard_bar_length_m),
        cement_bags,
        sand_m3: mix.sand(cement_bags).0,
        gravel_m3: mix.gravel(cement_bags).0,
    }
}

/// Compute every row, preserving order.
pub fn compute_rows(rows: &[FootingRow], settings: &EstimateSettings) -> Vec<ComputedFooting> {
    rows.iter().map(|row| compute_row(row, settings)).collect()
}

/// Sum computed rows.
pub fn totals(computed: &[ComputedFooting]) -> FootingTotals {
    computed.iter().fold(FootingTotals::default(), |mut acc, c| {
        acc.volume_m3 += c.volume_m3;
        acc.linear_length_m += c.linear_length_m;
        acc.cement_bags += c.cement_bags;
        acc.sand_m3 += c.sand_m3;
        acc.gravel_m3 += c.gravel_m3;
        if c.bars > 0.0 {
            acc.bars.add(c.row.diameter, c.bars);
        }
        acc
    })
}
