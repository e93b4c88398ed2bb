//! # Take-off Calculators
//!
//! One module per element table. Each calculator follows the pattern:
//!
//! - `*Row` - one line of the table, numeric fields kept as typed text
//! - `Computed*` - the row plus its derived quantities
//! - `*Totals` - fixed record summed over computed rows
//! - `compute_rows(rows, settings) -> Vec<Computed*>` - pure, order preserving
//! - `totals(computed) -> *Totals` - pure fold
//!
//! The land parcel ([`polygon`]) is the exception: it yields an area and a
//! drawing instead of material totals.
//!
//! ## Available Calculators
//!
//! - [`footing`] - Pad footings (sapatas)
//! - [`beam`] - Beams (vigamento)
//! - [`column`] - Columns (pilares)
//! - [`slab`] - Slabs and subfloors (lajes / contrapiso)
//! - [`masonry`] - Block walls (alvenaria)
//! - [`plaster`] - Wall plaster (reboco)
//! - [`polygon`] - Irregular land parcel area

pub mod beam;
pub mod column;
pub mod footing;
pub mod framing;
pub mod masonry;
pub mod plaster;
pub mod polygon;
pub mod slab;

use std::fmt;

use serde::{Deserialize, Serialize};

// Re-export commonly used types
pub use beam::{BeamRow, ComputedBeam};
pub use column::{ColumnRow, ComputedColumn};
pub use footing::{ComputedFooting, FootingRow, FootingTotals};
pub use framing::FramingTotals;
pub use masonry::{ComputedMasonry, MasonryRow, MasonryTotals};
pub use plaster::{ComputedPlaster, PlasterRow, PlasterTotals, Sides};
pub use polygon::{PolygonProjection, Vertex, Viewport};
pub use slab::{ComputedSlab, SlabKind, SlabRow, SlabTotals};

/// The six element calculators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CalculatorKind {
    Footing,
    Beam,
    Column,
    Slab,
    Masonry,
    Plaster,
}

impl CalculatorKind {
    pub const ALL: [CalculatorKind; 6] = [
        CalculatorKind::Footing,
        CalculatorKind::Beam,
        CalculatorKind::Column,
        CalculatorKind::Slab,
        CalculatorKind::Masonry,
        CalculatorKind::Plaster,
    ];

    /// Human-readable name
    pub fn display_name(&self) -> &'static str {
        match self {
            CalculatorKind::Footing => "Footings",
            CalculatorKind::Beam => "Beams",
            CalculatorKind::Column => "Columns",
            CalculatorKind::Slab => "Slabs",
            CalculatorKind::Masonry => "Masonry",
            CalculatorKind::Plaster => "Plaster",
        }
    }

    /// Whether the calculator reports reinforcement
    pub fn has_reinforcement(&self) -> bool {
        matches!(self, CalculatorKind::Footing | CalculatorKind::Beam | CalculatorKind::Column)
    }
}

impl fmt::Display for CalculatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Totals of one calculator, tagged with the calculator that produced them.
///
/// This is what the consolidation step consumes; see
/// [`consolidate`](crate::consolidation::consolidate).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "calculator", content = "totals")]
pub enum CalculatorTotals {
    Footing(FootingTotals),
    Beam(FramingTotals),
    Column(FramingTotals),
    Slab(SlabTotals),
    Masonry(MasonryTotals),
    Plaster(PlasterTotals),
}

impl CalculatorTotals {
    pub fn kind(&self) -> CalculatorKind {
        match self {
            CalculatorTotals::Footing(_) => CalculatorKind::Footing,
            CalculatorTotals::Beam(_) => CalculatorKind::Beam,
            CalculatorTotals::Column(_) => CalculatorKind::Column,
            CalculatorTotals::Slab(_) => CalculatorKind::Slab,
            CalculatorTotals::Masonry(_) => CalculatorKind::Masonry,
            CalculatorTotals::Plaster(_) => CalculatorKind::Plaster,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_of_totals() {
        let t = CalculatorTotals::Column(FramingTotals::default());
        assert_eq!(t.kind(), CalculatorKind::Column);
        assert!(t.kind().has_reinforcement());
        assert!(!CalculatorKind::Plaster.has_reinforcement());
    }

    #[test]
    fn test_totals_serialization() {
        let t = CalculatorTotals::Slab(SlabTotals {
            slab_area_m2: 12.0,
            ..SlabTotals::default()
        });
        let json = serde_json::to_value(&t).unwrap();
        assert_eq!(json["calculator"], "Slab");
        assert_eq!(json["totals"]["slab_area_m2"], 12.0);
    }
}
