//! # Framing Members (Beams and Columns)
//!
//! Beams and columns share the same take-off: a rectangular section swept
//! along a length, with longitudinal bars and closed stirrups.
//!
//! ## Method
//!
//! - Volume: (width/100) × (height/100) × length × count
//! - Longitudinal bars: (length + 0.5 m splice) × bar quantity × count
//! - Stirrups (3/16" class, whatever the main diameter):
//!   (length ÷ 0.15 m spacing) × 2 × (width + height + 4 cm) / 100 × count
//! - Cement, sand, gravel: structural 1:5:6 trace
//!
//! The splice, spacing and cover figures are site rules of thumb and are
//! read from [`EstimateSettings`].
//!
//! Row types live in [`beam`](super::beam) and [`column`](super::column);
//! both implement [`FramingMember`].

use serde::{Deserialize, Serialize};

use crate::parsing::parse_quantity;
use crate::rebar::{bars_for_length, BarCounts, BarGauge};
use crate::settings::EstimateSettings;
use crate::units::{Centimeters, CubicMeters, Meters};

/// Numeric geometry of a framing row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FramingGeometry {
    pub count: f64,
    pub length: Meters,
    pub width: Centimeters,
    pub height: Centimeters,
    /// Longitudinal bars in the section
    pub bar_quantity: f64,
}

impl FramingGeometry {
    /// Parse the text fields of a row
    pub fn parse(count: &str, length_m: &str, width_cm: &str, height_cm: &str, bar_quantity: &str) -> Self {
        FramingGeometry {
            count: parse_quantity(count),
            length: Meters(parse_quantity(length_m)),
            width: Centimeters(parse_quantity(width_cm)),
            height: Centimeters(parse_quantity(height_cm)),
            bar_quantity: parse_quantity(bar_quantity),
        }
    }

    /// All three dimensions are positive
    pub fn is_valid(&self) -> bool {
        self.length.0 > 0.0 && self.width.0 > 0.0 && self.height.0 > 0.0
    }
}

/// A beam or column row.
pub trait FramingMember: Clone {
    fn geometry(&self) -> FramingGeometry;
    fn diameter(&self) -> BarGauge;
}

/// Derived quantities of one framing row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FramingQuantities {
    pub volume_m3: f64,
    /// Longitudinal reinforcement (m)
    pub linear_length_m: f64,
    /// Longitudinal bars in the row's diameter class, unrounded
    pub bars: f64,
    /// Stirrup steel (m)
    pub stirrup_length_m: f64,
    /// 3/16" stirrup bars, unrounded
    pub stirrup_bars: f64,
    pub cement_bags: f64,
    pub sand_m3: f64,
    pub gravel_m3: f64,
}

/// A row with its quantities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComputedMember<R> {
    #[serde(flatten)]
    pub row: R,
    #[serde(flatten)]
    pub quantities: FramingQuantities,
}

/// Totals for a beam or column table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FramingTotals {
    pub volume_m3: f64,
    pub linear_length_m: f64,
    pub cement_bags: f64,
    pub sand_m3: f64,
    pub gravel_m3: f64,
    /// Longitudinal bars per diameter class
    pub bars: BarCounts,
    pub stirrup_length_m: f64,
    /// 3/16" stirrup bars
    pub stirrup_bars: f64,
}

/// Quantities for one member geometry.
pub fn quantities(geometry: &FramingGeometry, settings: &EstimateSettings) -> FramingQuantities {
    if !geometry.is_valid() || geometry.count <= 0.0 {
        return FramingQuantities::default();
    }

    let count = geometry.count;
    let length = geometry.length;
    let width = Meters::from(geometry.width);
    let height = Meters::from(geometry.height);

    let volume: CubicMeters = width * height * length * count;

    let linear = (length + Meters(settings.splice_allowance_m)) * geometry.bar_quantity * count;

    let stirrups_per_member = if settings.stirrup_spacing_m > 0.0 {
        length.0 / settings.stirrup_spacing_m
    } else {
        0.0
    };
    let stirrup_perimeter: Meters =
        (Centimeters(geometry.width.0 + geometry.height.0 + settings.stirrup_cover_sum_cm) * 2.0).into();
    let stirrup_length = stirrup_perimeter * stirrups_per_member * count;

    let mix = &settings.structural_concrete;
    let cement_bags = mix.cement_bags(volume);

    FramingQuantities {
        volume_m3: volume.0,
        linear_length_m: linear.0,
        bars: bars_for_length(linear.0, settings.standard_bar_length_m),
        stirrup_length_m: stirrup_length.0,
        stirrup_bars: bars_for_length(stirrup_length.0, settings.standard_bar_length_m),
        cement_bags,
        sand_m3: mix.sand(cement_bags).0,
        gravel_m3: mix.gravel(cement_bags).0,
    }
}

/// Compute every member row, preserving order.
pub fn compute_members<R: FramingMember>(rows: &[R], settings: &EstimateSettings) -> Vec<ComputedMember<R>> {
    rows.iter()
        .map(|row| ComputedMember {
            row: row.clone(),
            quantities: quantities(&row.geometry(), settings),
        })
        .collect()
}

/// Sum computed member rows.
pub fn member_totals<R: FramingMember>(computed: &[ComputedMember<R>]) -> FramingTotals {
    computed.iter().fold(FramingTotals::default(), |mut acc, c| {
        let q = &c.quantities;
        acc.volume_m3 += q.volume_m3;
        acc.linear_length_m += q.linear_length_m;
        acc.cement_bags += q.cement_bags;
        acc.sand_m3 += q.sand_m3;
        acc.gravel_m3 += q.gravel_m3;
        acc.stirrup_length_m += q.stirrup_length_m;
        acc.stirrup_bars += q.stirrup_bars;
        if q.bars > 0.0 {
            acc.bars.add(c.row.diameter(), q.bars);
        }
        acc
    })
}
