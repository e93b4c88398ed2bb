//! # Beam (Vigamento) Take-off
//!
//! Reinforced concrete beams, including ground beams (baldrames) and
//! lintels. Quantities follow the shared framing method, see
//! [`framing`](super::framing).
//!
//! ## Example
//!
//! ```rust
//! use takeoff_core::calculations::beam::{compute_rows, totals, BeamRow};
//! use takeoff_core::settings::EstimateSettings;
//!
//! let rows = vec![BeamRow {
//!     length_m: "4".to_string(),
//!     width_cm: "15".to_string(),
//!     height_cm: "30".to_string(),
//!     bar_quantity: "4".to_string(),
//!     ..BeamRow::default()
//! }];
//!
//! let computed = compute_rows(&rows, &EstimateSettings::default());
//! let t = totals(&computed);
//! assert!((t.volume_m3 - 0.18).abs() < 1e-9);
//! ```

use serde::{Deserialize, Serialize};

use crate::calculations::framing::{self, ComputedMember, FramingGeometry, FramingMember, FramingTotals};
use crate::errors::CalcResult;
use crate::floor::OnFloor;
use crate::rebar::{deserialize_main, BarGauge};
use crate::rows::{unknown_field, ElementRow};
use crate::settings::EstimateSettings;

/// One line of the beam table.
///
/// ## JSON Example
///
/// ```json
/// {
///   "floor": "Térreo",
///   "label": "V1",
///   "count": "2",
///   "length_m": "4.5",
///   "width_cm": "15",
///   "height_cm": "30",
///   "bar_quantity": "4",
///   "diameter": "3/8"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BeamRow {
    pub floor: String,
    /// Element tag (e.g., "V1")
    pub label: String,
    pub count: String,
    pub length_m: String,
    pub width_cm: String,
    pub height_cm: String,
    /// Longitudinal bars in the section
    pub bar_quantity: String,
    #[serde(deserialize_with = "deserialize_main")]
    pub diameter: BarGauge,
}

impl Default for BeamRow {
    fn default() -> Self {
        BeamRow {
            floor: "Térreo".to_string(),
            label: "V1".to_string(),
            count: "1".to_string(),
            length_m: "3".to_string(),
            width_cm: "15".to_string(),
            height_cm: "30".to_string(),
            bar_quantity: "4".to_string(),
            diameter: BarGauge::ThreeEighths,
        }
    }
}

impl OnFloor for BeamRow {
    fn floor(&self) -> &str {
        &self.floor
    }
}

impl FramingMember for BeamRow {
    fn geometry(&self) -> FramingGeometry {
        FramingGeometry::parse(&self.count, &self.length_m, &self.width_cm, &self.height_cm, &self.bar_quantity)
    }

    fn diameter(&self) -> BarGauge {
        self.diameter
    }
}

impl ElementRow for BeamRow {
    const FIELDS: &'static [&'static str] = &[
        "floor",
        "label",
        "count",
        "length_m",
        "width_cm",
        "height_cm",
        "bar_quantity",
        "diameter",
    ];

    fn field(&self, name: &str) -> Option<String> {
        let value = match name {
            "floor" => &self.floor,
            "label" => &self.label,
            "count" => &self.count,
            "length_m" => &self.length_m,
            "width_cm" => &self.width_cm,
            "height_cm" => &self.height_cm,
            "bar_quantity" => &self.bar_quantity,
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
            "length_m" => &mut self.length_m,
            "width_cm" => &mut self.width_cm,
            "height_cm" => &mut self.height_cm,
            "bar_quantity" => &mut self.bar_quantity,
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

pub type ComputedBeam = ComputedMember<BeamRow>;

/// Compute every beam row, preserving order.
pub fn compute_rows(rows: &[BeamRow], settings: &EstimateSettings) -> Vec<ComputedBeam> {
    framing::compute_members(rows, settings)
}

/// Sum computed beam rows.
pub fn totals(computed: &[ComputedBeam]) -> FramingTotals {
    framing::member_totals(computed)
}
