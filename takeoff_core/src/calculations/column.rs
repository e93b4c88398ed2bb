//! # Column (Pilar) Take-off
//!
//! Reinforced concrete columns. The length is the column height between
//! floors; everything else follows the shared framing method in
//! [`framing`](super::framing).

use serde::{Deserialize, Serialize};

use crate::calculations::framing::{self, ComputedMember, FramingGeometry, FramingMember, FramingTotals};
use crate::errors::CalcResult;
use crate::floor::OnFloor;
use crate::rebar::{deserialize_main, BarGauge};
use crate::rows::{unknown_field, ElementRow};
use crate::settings::EstimateSettings;

/// One line of the column table.
///
/// ## JSON Example
///
/// ```json
/// {
///   "floor": "Pav1",
///   "label": "P3",
///   "count": "6",
///   "length_m": "2.8",
///   "width_cm": "20",
///   "height_cm": "20",
///   "bar_quantity": "4",
///   "diameter": "1/2"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnRow {
    pub floor: String,
    /// Element tag (e.g., "P1")
    pub label: String,
    pub count: String,
    /// Column height (m)
    pub length_m: String,
    pub width_cm: String,
    /// Section depth (cm)
    pub height_cm: String,
    pub bar_quantity: String,
    #[serde(deserialize_with = "deserialize_main")]
    pub diameter: BarGauge,
}

impl Default for ColumnRow {
    fn default() -> Self {
        ColumnRow {
            floor: "Térreo".to_string(),
            label: "P1".to_string(),
            count: "1".to_string(),
            length_m: "2.8".to_string(),
            width_cm: "20".to_string(),
            height_cm: "20".to_string(),
            bar_quantity: "4".to_string(),
            diameter: BarGauge::ThreeEighths,
        }
    }
}

impl OnFloor for ColumnRow {
    fn floor(&self) -> &str {
        &self.floor
    }
}

impl FramingMember for ColumnRow {
    fn geometry(&self) -> FramingGeometry {
        FramingGeometry::parse(&self.count, &self.length_m, &self.width_cm, &self.height_cm, &self.bar_quantity)
    }

    fn diameter(&self) -> BarGauge {
        self.diameter
    }
}

impl ElementRow for ColumnRow {
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

pub type ComputedColumn = ComputedMember<ColumnRow>;

/// Compute every column row, preserving order.
pub fn compute_rows(rows: &[ColumnRow], settings: &EstimateSettings) -> Vec<ComputedColumn> {
    framing::compute_members(rows, settings)
}

/// Sum computed column rows.
pub fn totals(computed: &[ComputedColumn]) -> FramingTotals {
    framing::member_totals(computed)
}
