//! # Plaster (Reboco) Take-off
//!
//! Mortar coat over wall faces, on one side or both. Uses the richer 1:4
//! plaster mortar ([`MortarMix::PLASTER`](crate::settings::MortarMix::PLASTER)).

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};
use crate::floor::OnFloor;
use crate::parsing::parse_quantity;
use crate::rows::{unknown_field, ElementRow};
use crate::settings::EstimateSettings;
use crate::units::{Centimeters, CubicMeters, Meters, SquareMeters};

/// Wall faces that receive plaster. Serializes as the number 1 or 2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Sides {
    #[default]
    One,
    Two,
}

impl Sides {
    pub fn multiplier(&self) -> f64 {
        match self {
            Sides::One => 1.0,
            Sides::Two => 2.0,
        }
    }
}

impl TryFrom<u8> for Sides {
    type Error = CalcError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Sides::One),
            2 => Ok(Sides::Two),
            other => Err(CalcError::invalid_input("sides", other.to_string(), "Expected 1 or 2")),
        }
    }
}

impl From<Sides> for u8 {
    fn from(sides: Sides) -> u8 {
        match sides {
            Sides::One => 1,
            Sides::Two => 2,
        }
    }
}

/// One wall on the plaster table.
///
/// ## JSON Example
///
/// ```json
/// {
///   "floor": "Pav1",
///   "label": "Bedroom walls",
///   "area_m2": "36",
///   "thickness_cm": "2",
///   "sides": 2
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlasterRow {
    pub floor: String,
    pub label: String,
    /// Wall area, one face (m²)
    pub area_m2: String,
    /// Coat thickness (cm)
    pub thickness_cm: String,
    pub sides: Sides,
}

impl Default for PlasterRow {
    fn default() -> Self {
        PlasterRow {
            floor: "Térreo".to_string(),
            label: "R1".to_string(),
            area_m2: "10".to_string(),
            thickness_cm: "2".to_string(),
            sides: Sides::One,
        }
    }
}

impl OnFloor for PlasterRow {
    fn floor(&self) -> &str {
        &self.floor
    }
}

impl ElementRow for PlasterRow {
    const FIELDS: &'static [&'static str] = &["floor", "label", "area_m2", "thickness_cm", "sides"];

    fn field(&self, name: &str) -> Option<String> {
        match name {
            "floor" => Some(self.floor.clone()),
            "label" => Some(self.label.clone()),
            "area_m2" => Some(self.area_m2.clone()),
            "thickness_cm" => Some(self.thickness_cm.clone()),
            "sides" => Some(u8::from(self.sides).to_string()),
            _ => None,
        }
    }

    fn set_field(&mut self, name: &str, value: &str) -> CalcResult<()> {
        match name {
            "floor" => self.floor = value.to_string(),
            "label" => self.label = value.to_string(),
            "area_m2" => self.area_m2 = value.to_string(),
            "thickness_cm" => self.thickness_cm = value.to_string(),
            "sides" => {
                let count: u8 = value
                    .trim()
                    .parse()
                    .map_err(|_| CalcError::invalid_input("sides", value, "Expected 1 or 2"))?;
                self.sides = Sides::try_from(count)?;
            }
            _ => return Err(unknown_field(name)),
        }
        Ok(())
    }
}

/// A plastered wall with its quantities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComputedPlaster {
    #[serde(flatten)]
    pub row: PlasterRow,
    /// Wall area times sides (m²)
    pub effective_area_m2: f64,
    pub mortar_m3: f64,
    pub cement_bags: f64,
    pub sand_m3: f64,
}

/// Plaster totals.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlasterTotals {
    pub effective_area_m2: f64,
    pub mortar_m3: f64,
    pub cement_bags: f64,
    pub sand_m3: f64,
}

/// Compute quantities for one wall.
pub fn compute_row(row: &PlasterRow, settings: &EstimateSettings) -> ComputedPlaster {
    let effective_area = SquareMeters(parse_quantity(&row.area_m2)) * row.sides.multiplier();
    let thickness: Meters = Centimeters(parse_quantity(&row.thickness_cm)).into();

    let mix = &settings.plaster_mortar;
    let mortar: CubicMeters = effective_area * thickness * mix.loss_factor;

    ComputedPlaster {
        row: row.clone(),
        effective_area_m2: effective_area.0,
        mortar_m3: mortar.0,
        cement_bags: mix.cement_bags(mortar),
        sand_m3: mix.sand(mortar).0,
    }
}

/// Compute every wall, preserving order.
pub fn compute_rows(rows: &[PlasterRow], settings: &EstimateSettings) -> Vec<ComputedPlaster> {
    rows.iter().map(|row| compute_row(row, settings)).collect()
}

/// Sum computed walls.
pub fn totals(computed: &[ComputedPlaster]) -> PlasterTotals {
    computed.iter().fold(PlasterTotals::default(), |mut acc, c| {
        acc.effective_area_m2 += c.effective_area_m2;
        acc.mortar_m3 += c.mortar_m3;
        acc.cement_bags += c.cement_bags;
        acc.sand_m3 += c.sand_m3;
        acc
    })
}
