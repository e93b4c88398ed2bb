//! # Masonry (Alvenaria) Take-off
//!
//! Block walls: how many blocks cover a wall area, and how much laying
//! mortar the joints take.
//!
//! ## Method
//!
//! - Block footprint with joint: (width + joint) × (height + joint)
//! - Blocks: wall area ÷ footprint, plus 5% breakage
//! - Mortar: wall area × joint thickness, plus 10% waste
//! - Cement: 216 kg per m³ of mortar in 50 kg bags; sand 1.08 m³ per m³

use serde::{Deserialize, Serialize};

use crate::errors::CalcResult;
use crate::floor::OnFloor;
use crate::parsing::parse_quantity;
use crate::rows::{unknown_field, ElementRow};
use crate::settings::EstimateSettings;
use crate::units::{Centimeters, CubicMeters, Meters, SquareMeters};

/// One wall on the masonry table.
///
/// ## JSON Example
///
/// ```json
/// {
///   "floor": "Térreo",
///   "label": "Front wall",
///   "area_m2": "24",
///   "block_width_cm": "39",
///   "block_height_cm": "19",
///   "joint_cm": "1"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MasonryRow {
    pub floor: String,
    pub label: String,
    /// Wall area (m²)
    pub area_m2: String,
    /// Block face width (cm)
    pub block_width_cm: String,
    /// Block face height (cm)
    pub block_height_cm: String,
    /// Mortar joint thickness (cm)
    pub joint_cm: String,
}

impl Default for MasonryRow {
    fn default() -> Self {
        MasonryRow {
            floor: "Térreo".to_string(),
            label: "W1".to_string(),
            area_m2: "10".to_string(),
            block_width_cm: "39".to_string(),
            block_height_cm: "19".to_string(),
            joint_cm: "1".to_string(),
        }
    }
}

impl OnFloor for MasonryRow {
    fn floor(&self) -> &str {
        &self.floor
    }
}

impl ElementRow for MasonryRow {
    const FIELDS: &'static [&'static str] = &[
        "floor",
        "label",
        "area_m2",
        "block_width_cm",
        "block_height_cm",
        "joint_cm",
    ];

    fn field(&self, name: &str) -> Option<String> {
        let value = match name {
            "floor" => &self.floor,
            "label" => &self.label,
            "area_m2" => &self.area_m2,
            "block_width_cm" => &self.block_width_cm,
            "block_height_cm" => &self.block_height_cm,
            "joint_cm" => &self.joint_cm,
            _ => return None,
        };
        Some(value.clone())
    }

    fn set_field(&mut self, name: &str, value: &str) -> CalcResult<()> {
        let target = match name {
            "floor" => &mut self.floor,
            "label" => &mut self.label,
            "area_m2" => &mut self.area_m2,
            "block_width_cm" => &mut self.block_width_cm,
            "block_height_cm" => &mut self.block_height_cm,
            "joint_cm" => &mut self.joint_cm,
            _ => return Err(unknown_field(name)),
        };
        *target = value.to_string();
        Ok(())
    }
}

/// A wall with its quantities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComputedMasonry {
    #[serde(flatten)]
    pub row: MasonryRow,
    /// Face area of one block including its joint (m²)
    pub block_footprint_m2: f64,
    /// Blocks including breakage, unrounded
    pub blocks: f64,
    pub mortar_m3: f64,
    pub cement_bags: f64,
    pub sand_m3: f64,
}

/// Masonry totals.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MasonryTotals {
    pub area_m2: f64,
    pub blocks: f64,
    pub mortar_m3: f64,
    pub cement_bags: f64,
    pub sand_m3: f64,
}

/// Compute quantities for one wall.
pub fn compute_row(row: &MasonryRow, settings: &EstimateSettings) -> ComputedMasonry {
    let area = SquareMeters(parse_quantity(&row.area_m2));
    let block_width = Centimeters(parse_quantity(&row.block_width_cm));
    let block_height = Centimeters(parse_quantity(&row.block_height_cm));
    let joint = Centimeters(parse_quantity(&row.joint_cm));

    let footprint: SquareMeters = Meters::from(block_width + joint) * Meters::from(block_height + joint);

    // A block with no face cannot be laid; the wall contributes nothing
    let valid = block_width.0 > 0.0 && block_height.0 > 0.0 && area.0 > 0.0;
    if !valid {
        return ComputedMasonry {
            row: row.clone(),
            block_footprint_m2: footprint.0,
            blocks: 0.0,
            mortar_m3: 0.0,
            cement_bags: 0.0,
            sand_m3: 0.0,
        };
    }

    let blocks = area.0 / footprint.0 * settings.block_loss_factor;

    let mix = &settings.masonry_mortar;
    let mortar: CubicMeters = area * Meters::from(joint) * mix.loss_factor;

    ComputedMasonry {
        row: row.clone(),
        block_footprint_m2: footprint.0,
        blocks,
        mortar_m3: mortar.0,
        cement_bags: mix.cement_bags(mortar),
        sand_m3: mix.sand(mortar).0,
    }
}

/// Compute every wall, preserving order.
pub fn compute_rows(rows: &[MasonryRow], settings: &EstimateSettings) -> Vec<ComputedMasonry> {
    rows.iter().map(|row| compute_row(row, settings)).collect()
}

/// Sum computed walls.
pub fn totals(computed: &[ComputedMasonry]) -> MasonryTotals {
    computed.iter().fold(MasonryTotals::default(), |mut acc, c| {
        if c.blocks > 0.0 {
            acc.area_m2 += parse_quantity(&c.row.area_m2);
        }
        acc.blocks += c.blocks;
        acc.mortar_m3 += c.mortar_m3;
        acc.cement_bags += c.cement_bags;
        acc.sand_m3 += c.sand_m3;
        acc
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_wall() {
        let c = compute_row(&MasonryRow::default(), &EstimateSettings::default());

        // (0.39 + 0.01) × (0.19 + 0.01) = 0.08 m²
        assert!((c.block_footprint_m2 - 0.08).abs() < 1e-9);
        // 10 / 0.08 × 1.05 = 131.25 blocks
        assert!((c.blocks - 131.25).abs() < 1e-9);
        // 10 × 0.01 × 1.10 = 0.11 m³
        assert!((c.mortar_m3 - 0.11).abs() < 1e-9);
        // 0.11 × 216 / 50 = 0.4752 bags
        assert!((c.cement_bags - 0.4752).abs() < 1e-9);
        // 0.11 × 1.08 = 0.1188 m³
        assert!((c.sand_m3 - 0.1188).abs() < 1e-9);
    }

    #[test]
    fn test_zero_joint_has_no_mortar() {
        let row = MasonryRow {
            joint_cm: "0".to_string(),
            ..MasonryRow::default()
        };
        let c = compute_row(&row, &EstimateSettings::default());
        // 10 / (0.39 × 0.19) × 1.05
        assert!((c.blocks - 10.0 / (0.39 * 0.19) * 1.05).abs() < 1e-6);
        assert_eq!(c.mortar_m3, 0.0);
        assert_eq!(c.cement_bags, 0.0);
    }

    #[test]
    fn test_missing_block_size_yields_zero() {
        let row = MasonryRow {
            block_width_cm: "".to_string(),
            ..MasonryRow::default()
        };
        let c = compute_row(&row, &EstimateSettings::default());
        assert_eq!(c.blocks, 0.0);
        assert_eq!(c.mortar_m3, 0.0);
        assert!(c.blocks.is_finite());
    }

    #[test]
    fn test_totals() {
        let rows = vec![
            MasonryRow::default(),
            MasonryRow {
                area_m2: "30".to_string(),
                ..MasonryRow::default()
            },
        ];
        let t = totals(&compute_rows(&rows, &EstimateSettings::default()));
        assert!((t.area_m2 - 40.0).abs() < 1e-9);
        assert!((t.blocks - 525.0).abs() < 1e-9);
        assert!((t.mortar_m3 - 0.44).abs() < 1e-9);
    }
}
