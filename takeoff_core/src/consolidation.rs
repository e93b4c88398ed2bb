//! # Consolidation
//!
//! Merges the totals of every active calculator into one material list.
//! Entries with the same item add up across calculators: cement from
//! footings, beams and plaster lands on a single "Cement (50 kg bags)" line,
//! and 3/8" bars from footings and beams on a single "Iron 3/8 (bars)" line.
//!
//! Quantities are kept unrounded. [`Precision`] describes how each item is
//! shown (bars and blocks rounded up to whole units, bags to 2 decimals,
//! volumes to 3) and is applied only when displaying.
//!
//! ## Example
//!
//! ```rust
//! use takeoff_core::calculations::{CalculatorTotals, FootingTotals, FramingTotals};
//! use takeoff_core::consolidation::{consolidate, MaterialItem};
//! use takeoff_core::rebar::BarGauge;
//!
//! let mut footing = FootingTotals::default();
//! footing.cement_bags = 2.0;
//! footing.bars.add(BarGauge::ThreeEighths, 1.0);
//!
//! let mut beam = FramingTotals::default();
//! beam.cement_bags = 3.0;
//! beam.bars.add(BarGauge::ThreeEighths, 2.0);
//!
//! let summary = consolidate(&[CalculatorTotals::Footing(footing), CalculatorTotals::Beam(beam)]);
//! assert_eq!(summary.get(MaterialItem::Cement), 5.0);
//! assert_eq!(summary.get_named("Iron 3/8 (bars)"), Some(3.0));
//! ```

use std::collections::BTreeMap;
use std::fmt;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::calculations::{CalculatorKind, CalculatorTotals, FramingTotals};
use crate::rebar::{BarCounts, BarGauge};

/// Canonical purchase items.
///
/// Declaration order is the display order of the summary table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MaterialItem {
    /// Concrete volume (m³)
    Concrete,
    /// Mortar volume (m³)
    Mortar,
    /// Cement in 50 kg bags
    Cement,
    /// Sand (m³)
    Sand,
    /// Gravel (m³)
    Gravel,
    /// Masonry blocks (units)
    Blocks,
    /// Reinforcement bars of one diameter class (12 m bars)
    Iron(BarGauge),
}

impl MaterialItem {
    /// Canonical name, e.g. "Iron 3/8 (bars)"
    pub fn display_name(&self) -> String {
        match self {
            MaterialItem::Concrete => "Concrete (m³)".to_string(),
            MaterialItem::Mortar => "Mortar (m³)".to_string(),
            MaterialItem::Cement => "Cement (50 kg bags)".to_string(),
            MaterialItem::Sand => "Sand (m³)".to_string(),
            MaterialItem::Gravel => "Gravel (m³)".to_string(),
            MaterialItem::Blocks => "Blocks (units)".to_string(),
            MaterialItem::Iron(gauge) => format!("Iron {} (bars)", gauge.label()),
        }
    }

    pub fn unit(&self) -> &'static str {
        match self {
            MaterialItem::Concrete
            | MaterialItem::Mortar
            | MaterialItem::Sand
            | MaterialItem::Gravel => "m³",
            MaterialItem::Cement => "bags",
            MaterialItem::Blocks => "units",
            MaterialItem::Iron(_) => "bars",
        }
    }

    pub fn precision(&self) -> Precision {
        match self {
            MaterialItem::Blocks | MaterialItem::Iron(_) => Precision::WholeUnits,
            MaterialItem::Cement => Precision::Hundredths,
            MaterialItem::Concrete
            | MaterialItem::Mortar
            | MaterialItem::Sand
            | MaterialItem::Gravel => Precision::Thousandths,
        }
    }
}

impl fmt::Display for MaterialItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// How a quantity is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Precision {
    /// Rounded up: a partial bar or block must still be bought
    WholeUnits,
    /// Two decimals
    Hundredths,
    /// Three decimals
    Thousandths,
}

impl Precision {
    pub fn decimals(&self) -> usize {
        match self {
            Precision::WholeUnits => 0,
            Precision::Hundredths => 2,
            Precision::Thousandths => 3,
        }
    }

    /// Value as it should be displayed.
    pub fn apply(&self, value: f64) -> f64 {
        match self {
            // Absorb float noise so 3.0000000000000004 bars is 3, not 4
            Precision::WholeUnits => (value - 1e-9).ceil().max(0.0),
            Precision::Hundredths => (value * 100.0).round() / 100.0,
            Precision::Thousandths => (value * 1000.0).round() / 1000.0,
        }
    }
}

/// One item with its quantity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MaterialEntry {
    pub item: MaterialItem,
    pub quantity: f64,
}

impl MaterialEntry {
    pub fn display_quantity(&self) -> f64 {
        self.item.precision().apply(self.quantity)
    }
}

/// The nonzero entries one calculator contributes, in display order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySummary {
    pub calculator: CalculatorKind,
    pub entries: Vec<MaterialEntry>,
}

/// Materials across all active calculators.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConsolidatedTotals {
    /// Grand total per item, in display order
    pub entries: Vec<MaterialEntry>,
    /// Contribution of each calculator, in the order they were given
    pub by_category: Vec<CategorySummary>,
    /// Structural slab area (m²), Subfloor rows excluded
    pub slab_area_m2: f64,
}

impl ConsolidatedTotals {
    /// Grand total for an item, 0 if no calculator reported it
    pub fn get(&self, item: MaterialItem) -> f64 {
        self.entries
            .iter()
            .find(|e| e.item == item)
            .map(|e| e.quantity)
            .unwrap_or(0.0)
    }

    /// Look up a grand total by canonical name
    pub fn get_named(&self, name: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|e| e.item.display_name() == name)
            .map(|e| e.quantity)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl CalculatorTotals {
    /// Nonzero material entries of these totals.
    pub fn material_entries(&self) -> Vec<MaterialEntry> {
        let mut raw: Vec<(MaterialItem, f64)> = Vec::new();
        match self {
            CalculatorTotals::Footing(t) => {
                raw.push((MaterialItem::Concrete, t.volume_m3));
                raw.push((MaterialItem::Cement, t.cement_bags));
                raw.push((MaterialItem::Sand, t.sand_m3));
                raw.push((MaterialItem::Gravel, t.gravel_m3));
                push_bars(&mut raw, &t.bars);
            }
            CalculatorTotals::Beam(t) | CalculatorTotals::Column(t) => {
                push_framing(&mut raw, t);
            }
            CalculatorTotals::Slab(t) => {
                raw.push((MaterialItem::Concrete, t.volume_m3));
                raw.push((MaterialItem::Cement, t.cement_bags));
                raw.push((MaterialItem::Sand, t.sand_m3));
                raw.push((MaterialItem::Gravel, t.gravel_m3));
            }
            CalculatorTotals::Masonry(t) => {
                raw.push((MaterialItem::Blocks, t.blocks));
                raw.push((MaterialItem::Mortar, t.mortar_m3));
                raw.push((MaterialItem::Cement, t.cement_bags));
                raw.push((MaterialItem::Sand, t.sand_m3));
            }
            CalculatorTotals::Plaster(t) => {
                raw.push((MaterialItem::Mortar, t.mortar_m3));
                raw.push((MaterialItem::Cement, t.cement_bags));
                raw.push((MaterialItem::Sand, t.sand_m3));
            }
        }

        let mut entries: Vec<MaterialEntry> = raw
            .into_iter()
            .filter(|(_, quantity)| *quantity != 0.0)
            .map(|(item, quantity)| MaterialEntry { item, quantity })
            .collect();
        entries.sort_by_key(|e| e.item);
        entries
    }

    /// Slab area carried into the consolidated totals
    fn slab_area_m2(&self) -> f64 {
        match self {
            CalculatorTotals::Slab(t) => t.slab_area_m2,
            _ => 0.0,
        }
    }
}

fn push_bars(raw: &mut Vec<(MaterialItem, f64)>, bars: &BarCounts) {
    for (gauge, count) in bars.iter() {
        raw.push((MaterialItem::Iron(gauge), count));
    }
}

fn push_framing(raw: &mut Vec<(MaterialItem, f64)>, t: &FramingTotals) {
    raw.push((MaterialItem::Concrete, t.volume_m3));
    raw.push((MaterialItem::Cement, t.cement_bags));
    raw.push((MaterialItem::Sand, t.sand_m3));
    raw.push((MaterialItem::Gravel, t.gravel_m3));
    push_bars(raw, &t.bars);
    raw.push((MaterialItem::Iron(BarGauge::STIRRUP), t.stirrup_bars));
}

/// Fold the totals of the active calculators into one summary.
///
/// Pass only the calculators that are switched on; an inactive calculator
/// is left out, not zeroed. The result depends only on the input, so it must
/// be recomputed whenever rows or the active set change.
pub fn consolidate(active: &[CalculatorTotals]) -> ConsolidatedTotals {
    let mut grand: BTreeMap<MaterialItem, f64> = BTreeMap::new();
    let mut by_category = Vec::with_capacity(active.len());
    let mut slab_area_m2 = 0.0;

    for totals in active {
        let entries = totals.material_entries();
        for entry in &entries {
            *grand.entry(entry.item).or_insert(0.0) += entry.quantity;
        }
        slab_area_m2 += totals.slab_area_m2();
        by_category.push(CategorySummary {
            calculator: totals.kind(),
            entries,
        });
    }

    debug!(
        "consolidated {} calculators into {} material lines",
        active.len(),
        grand.len()
    );

    ConsolidatedTotals {
        entries: grand
            .into_iter()
            .map(|(item, quantity)| MaterialEntry { item, quantity })
            .collect(),
        by_category,
        slab_area_m2,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculations::{FootingTotals, MasonryTotals, PlasterTotals, SlabTotals};

    fn footing_totals(cement: f64, iron_3_8: f64) -> CalculatorTotals {
        let mut t = FootingTotals {
            cement_bags: cement,
            ..FootingTotals::default()
        };
        t.bars.add(BarGauge::ThreeEighths, iron_3_8);
        CalculatorTotals::Footing(t)
    }

    fn beam_totals(cement: f64, iron_3_8: f64) -> CalculatorTotals {
        let mut t = FramingTotals {
            cement_bags: cement,
            ..FramingTotals::default()
        };
        t.bars.add(BarGauge::ThreeEighths, iron_3_8);
        CalculatorTotals::Beam(t)
    }

    #[test]
    fn test_footing_plus_beam() {
        let summary = consolidate(&[footing_totals(2.0, 1.0), beam_totals(3.0, 2.0)]);
        assert_eq!(summary.get(MaterialItem::Cement), 5.0);
        assert_eq!(summary.get(MaterialItem::Iron(BarGauge::ThreeEighths)), 3.0);
        assert_eq!(summary.get_named("Cement (50 kg bags)"), Some(5.0));
        assert_eq!(summary.get_named("Iron 3/8 (bars)"), Some(3.0));
        // Nothing else was reported
        assert_eq!(summary.entries.len(), 2);
    }

    #[test]
    fn test_inactive_calculators_are_absent() {
        let summary = consolidate(&[]);
        assert!(summary.is_empty());
        assert!(summary.by_category.is_empty());

        let only_beam = consolidate(&[beam_totals(3.0, 2.0)]);
        assert_eq!(only_beam.by_category.len(), 1);
        assert_eq!(only_beam.by_category[0].calculator, CalculatorKind::Beam);
    }

    #[test]
    fn test_stirrups_booked_as_three_sixteenths() {
        let t = FramingTotals {
            stirrup_bars: 4.5,
            ..FramingTotals::default()
        };
        let summary = consolidate(&[CalculatorTotals::Column(t)]);
        assert_eq!(summary.get_named("Iron 3/16 (bars)"), Some(4.5));
    }

    #[test]
    fn test_mortar_sources_merge() {
        let masonry = CalculatorTotals::Masonry(MasonryTotals {
            area_m2: 10.0,
            blocks: 131.25,
            mortar_m3: 0.11,
            cement_bags: 0.4752,
            sand_m3: 0.1188,
        });
        let plaster = CalculatorTotals::Plaster(PlasterTotals {
            effective_area_m2: 10.0,
            mortar_m3: 0.22,
            cement_bags: 1.4256,
            sand_m3: 0.286,
        });
        let summary = consolidate(&[masonry, plaster]);
        assert!((summary.get(MaterialItem::Mortar) - 0.33).abs() < 1e-9);
        assert!((summary.get(MaterialItem::Cement) - 1.9008).abs() < 1e-9);
        assert_eq!(summary.get(MaterialItem::Blocks), 131.25);
        assert_eq!(summary.get(MaterialItem::Gravel), 0.0);
    }

    #[test]
    fn test_slab_area_carried() {
        let slab = CalculatorTotals::Slab(SlabTotals {
            volume_m3: 2.0,
            slab_area_m2: 20.0,
            total_area_m2: 50.0,
            ..SlabTotals::default()
        });
        let summary = consolidate(&[slab]);
        assert_eq!(summary.slab_area_m2, 20.0);
        assert_eq!(summary.get(MaterialItem::Concrete), 2.0);
    }

    #[test]
    fn test_entries_in_display_order() {
        let summary = consolidate(&[beam_totals(3.0, 2.0), footing_totals(2.0, 1.0)]);
        let items: Vec<MaterialItem> = summary.entries.iter().map(|e| e.item).collect();
        let mut sorted = items.clone();
        sorted.sort();
        assert_eq!(items, sorted);
    }

    #[test]
    fn test_presentation_rounding() {
        assert_eq!(Precision::WholeUnits.apply(2.01), 3.0);
        assert_eq!(Precision::WholeUnits.apply(3.0), 3.0);
        assert_eq!(Precision::WholeUnits.apply(3.0000000000000004), 3.0);
        assert_eq!(Precision::WholeUnits.apply(0.0), 0.0);
        assert_eq!(Precision::Hundredths.apply(2.456), 2.46);
        assert_eq!(Precision::Thousandths.apply(0.22549), 0.225);

        let entry = MaterialEntry {
            item: MaterialItem::Blocks,
            quantity: 131.25,
        };
        assert_eq!(entry.display_quantity(), 132.0);
        // Stored value is untouched
        assert_eq!(entry.quantity, 131.25);
    }

    #[test]
    fn test_item_names() {
        assert_eq!(MaterialItem::Iron(BarGauge::FiveEighths).display_name(), "Iron 5/8 (bars)");
        assert_eq!(MaterialItem::Blocks.to_string(), "Blocks (units)");
        assert_eq!(MaterialItem::Sand.unit(), "m³");
        assert_eq!(MaterialItem::Cement.precision().decimals(), 2);
    }
}
