//! # Estimate Settings
//!
//! Every empirical constant the calculators rely on, grouped by concern.
//! The defaults reproduce the figures used on Brazilian site take-off sheets;
//! none of them come from a design code, so a worksheet may override any of
//! them.
//!
//! Settings are stored in the worksheet file. Missing fields fall back to the
//! defaults, so `{}` is a valid settings object.
//!
//! ```json
//! {
//!   "standard_bar_length_m": 12.0,
//!   "structural_concrete": { "m3_per_bag": 0.16, "sand_parts": 5.0, "gravel_parts": 6.0, "part_volume_l": 18.0 },
//!   "masonry_mortar": { "cement_kg_per_m3": 216.0, "sand_m3_per_m3": 1.08, "loss_factor": 1.10 }
//! }
//! ```

use once_cell::sync::Lazy;
use serde::{Deserialize, Deserializer, Serialize};

use crate::rebar::STANDARD_BAR_LENGTH_M;
use crate::units::{CubicMeters, Liters};

/// Process-wide default settings
pub static DEFAULT_SETTINGS: Lazy<EstimateSettings> = Lazy::new(EstimateSettings::default);

/// Concrete trace measured in bags of cement plus boxes of aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConcreteMix {
    /// Concrete volume yielded per bag of cement (m³)
    pub m3_per_bag: f64,
    /// Sand boxes per bag of cement
    pub sand_parts: f64,
    /// Gravel boxes per bag of cement
    pub gravel_parts: f64,
    /// Volume of one measuring box (liters)
    pub part_volume_l: f64,
}

impl ConcreteMix {
    /// 1:5:6 trace for footings, beams and columns
    pub const STRUCTURAL: ConcreteMix = ConcreteMix {
        m3_per_bag: 0.16,
        sand_parts: 5.0,
        gravel_parts: 6.0,
        part_volume_l: 18.0,
    };

    /// Leaner 1:4:5 trace for slabs and subfloors
    pub const SLAB: ConcreteMix = ConcreteMix {
        m3_per_bag: 0.14,
        sand_parts: 4.0,
        gravel_parts: 5.0,
        part_volume_l: 18.0,
    };

    /// Bags of cement for a concrete volume
    pub fn cement_bags(&self, volume: CubicMeters) -> f64 {
        if volume.0 > 0.0 && self.m3_per_bag > 0.0 {
            volume.0 / self.m3_per_bag
        } else {
            0.0
        }
    }

    /// Sand volume for a number of cement bags
    pub fn sand(&self, cement_bags: f64) -> CubicMeters {
        Liters(cement_bags * self.sand_parts * self.part_volume_l).into()
    }

    /// Gravel volume for a number of cement bags
    pub fn gravel(&self, cement_bags: f64) -> CubicMeters {
        Liters(cement_bags * self.gravel_parts * self.part_volume_l).into()
    }
}

impl Default for ConcreteMix {
    fn default() -> Self {
        ConcreteMix::STRUCTURAL
    }
}

/// Mortar described by consumption per cubic meter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MortarMix {
    /// Cement per m³ of mortar (kg)
    pub cement_kg_per_m3: f64,
    /// Weight of one cement bag (kg)
    pub bag_kg: f64,
    /// Sand per m³ of mortar (m³)
    pub sand_m3_per_m3: f64,
    /// Multiplier applied to the net mortar volume for waste
    pub loss_factor: f64,
}

impl MortarMix {
    /// 1:8 laying mortar for block walls
    pub const MASONRY: MortarMix = MortarMix {
        cement_kg_per_m3: 216.0,
        bag_kg: 50.0,
        sand_m3_per_m3: 1.08,
        loss_factor: 1.10,
    };

    /// Richer 1:4 plaster mortar
    pub const PLASTER: MortarMix = MortarMix {
        cement_kg_per_m3: 324.0,
        bag_kg: 50.0,
        sand_m3_per_m3: 1.3,
        loss_factor: 1.10,
    };

    /// Bags of cement for a mortar volume
    pub fn cement_bags(&self, mortar: CubicMeters) -> f64 {
        if self.bag_kg > 0.0 {
            mortar.0 * self.cement_kg_per_m3 / self.bag_kg
        } else {
            0.0
        }
    }

    /// Sand for a mortar volume
    pub fn sand(&self, mortar: CubicMeters) -> CubicMeters {
        mortar * self.sand_m3_per_m3
    }
}

impl Default for MortarMix {
    fn default() -> Self {
        MortarMix::MASONRY
    }
}

/// All constants used by the element calculators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EstimateSettings {
    /// Commercial bar length (m)
    pub standard_bar_length_m: f64,

    /// Clearance deducted from each footing bar (cm)
    pub footing_cover_cm: f64,

    /// Lap splice added to every beam/column longitudinal bar (m)
    pub splice_allowance_m: f64,

    /// Stirrup spacing along beams and columns (m)
    pub stirrup_spacing_m: f64,

    /// Extra length added to the stirrup perimeter half (cm)
    pub stirrup_cover_sum_cm: f64,

    /// Multiplier on the net block count for breakage
    pub block_loss_factor: f64,

    /// Trace for footings, beams and columns
    #[serde(deserialize_with = "structural_concrete")]
    pub structural_concrete: ConcreteMix,

    /// Trace for slabs and subfloors
    #[serde(deserialize_with = "slab_concrete")]
    pub slab_concrete: ConcreteMix,

    /// Block laying mortar
    #[serde(deserialize_with = "masonry_mortar")]
    pub masonry_mortar: MortarMix,

    /// Plaster mortar
    #[serde(deserialize_with = "plaster_mortar")]
    pub plaster_mortar: MortarMix,
}

/// A concrete mix as written in a file; absent fields keep the base mix.
#[derive(Debug, Default, Deserialize)]
struct ConcreteMixOverride {
    m3_per_bag: Option<f64>,
    sand_parts: Option<f64>,
    gravel_parts: Option<f64>,
    part_volume_l: Option<f64>,
}

impl ConcreteMixOverride {
    fn over(self, base: ConcreteMix) -> ConcreteMix {
        ConcreteMix {
            m3_per_bag: self.m3_per_bag.unwrap_or(base.m3_per_bag),
            sand_parts: self.sand_parts.unwrap_or(base.sand_parts),
            gravel_parts: self.gravel_parts.unwrap_or(base.gravel_parts),
            part_volume_l: self.part_volume_l.unwrap_or(base.part_volume_l),
        }
    }
}

/// A mortar mix as written in a file; absent fields keep the base mix.
#[derive(Debug, Default, Deserialize)]
struct MortarMixOverride {
    cement_kg_per_m3: Option<f64>,
    bag_kg: Option<f64>,
    sand_m3_per_m3: Option<f64>,
    loss_factor: Option<f64>,
}

impl MortarMixOverride {
    fn over(self, base: MortarMix) -> MortarMix {
        MortarMix {
            cement_kg_per_m3: self.cement_kg_per_m3.unwrap_or(base.cement_kg_per_m3),
            bag_kg: self.bag_kg.unwrap_or(base.bag_kg),
            sand_m3_per_m3: self.sand_m3_per_m3.unwrap_or(base.sand_m3_per_m3),
            loss_factor: self.loss_factor.unwrap_or(base.loss_factor),
        }
    }
}

fn structural_concrete<'de, D: Deserializer<'de>>(d: D) -> Result<ConcreteMix, D::Error> {
    ConcreteMixOverride::deserialize(d).map(|o| o.over(ConcreteMix::STRUCTURAL))
}

fn slab_concrete<'de, D: Deserializer<'de>>(d: D) -> Result<ConcreteMix, D::Error> {
    ConcreteMixOverride::deserialize(d).map(|o| o.over(ConcreteMix::SLAB))
}

fn masonry_mortar<'de, D: Deserializer<'de>>(d: D) -> Result<MortarMix, D::Error> {
    MortarMixOverride::deserialize(d).map(|o| o.over(MortarMix::MASONRY))
}

fn plaster_mortar<'de, D: Deserializer<'de>>(d: D) -> Result<MortarMix, D::Error> {
    MortarMixOverride::deserialize(d).map(|o| o.over(MortarMix::PLASTER))
}

impl Default for EstimateSettings {
    fn default() -> Self {
        EstimateSettings {
            standard_bar_length_m: STANDARD_BAR_LENGTH_M,
            footing_cover_cm: 20.0,
            splice_allowance_m: 0.5,
            stirrup_spacing_m: 0.15,
            stirrup_cover_sum_cm: 4.0,
            block_loss_factor: 1.05,
            structural_concrete: ConcreteMix::STRUCTURAL,
            slab_concrete: ConcreteMix::SLAB,
            masonry_mortar: MortarMix::MASONRY,
            plaster_mortar: MortarMix::PLASTER,
        }
    }
}
