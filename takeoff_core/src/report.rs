//! # Report Formatting
//!
//! Text rendering of an [`Estimate`]: quantities rounded to each material's
//! precision, printed with a point or comma decimal separator.
//!
//! ```rust
//! use takeoff_core::consolidation::Precision;
//! use takeoff_core::report::{format_quantity, DecimalSeparator};
//!
//! assert_eq!(format_quantity(2.456, Precision::Hundredths, DecimalSeparator::Comma), "2,46");
//! assert_eq!(format_quantity(4.2, Precision::WholeUnits, DecimalSeparator::Point), "5");
//! ```

use std::fmt::Write;

use serde::{Deserialize, Serialize};

use crate::calculations::CalculatorKind;
use crate::consolidation::{ConsolidatedTotals, MaterialEntry, Precision};
use crate::worksheet::Estimate;

/// Decimal separator used for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DecimalSeparator {
    #[default]
    Point,
    Comma,
}

impl DecimalSeparator {
    pub fn as_char(&self) -> char {
        match self {
            DecimalSeparator::Point => '.',
            DecimalSeparator::Comma => ',',
        }
    }
}

/// Round `value` to `precision` and print it with `separator`.
pub fn format_quantity(value: f64, precision: Precision, separator: DecimalSeparator) -> String {
    let rounded = precision.apply(value);
    // -0.0 prints as "-0"
    let rounded = if rounded == 0.0 { 0.0 } else { rounded };
    let text = format!("{:.*}", precision.decimals(), rounded);
    match separator {
        DecimalSeparator::Point => text,
        DecimalSeparator::Comma => text.replace('.', ","),
    }
}

/// One line of the material list, e.g. `Cement (50 kg bags): 5`.
pub fn format_entry(entry: &MaterialEntry, separator: DecimalSeparator) -> String {
    format!(
        "{}: {}",
        entry.item.display_name(),
        format_quantity(entry.quantity, entry.item.precision(), separator)
    )
}

/// Consolidated material list, one entry per line.
pub fn render_consolidated(totals: &ConsolidatedTotals, separator: DecimalSeparator) -> String {
    let mut out = String::new();
    if totals.is_empty() {
        out.push_str("  (no materials)\n");
        return out;
    }
    for entry in &totals.entries {
        let _ = writeln!(out, "  {}", format_entry(entry, separator));
    }
    if totals.slab_area_m2 > 0.0 {
        let _ = writeln!(
            out,
            "  Slab area (m²): {}",
            format_quantity(totals.slab_area_m2, Precision::Hundredths, separator)
        );
    }
    out
}

/// Full plain-text report: per-calculator subtotals, consolidated list and
/// land area.
pub fn render_text(estimate: &Estimate, separator: DecimalSeparator) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Floor: {}", estimate.filter.display_name());
    let _ = writeln!(out);

    for kind in CalculatorKind::ALL {
        let Some(summary) = estimate
            .consolidated
            .by_category
            .iter()
            .find(|c| c.calculator == kind)
        else {
            continue;
        };
        let _ = writeln!(out, "{} ({} rows)", kind, section_len(estimate, kind));
        for entry in &summary.entries {
            let _ = writeln!(out, "  {}", format_entry(entry, separator));
        }
        let _ = writeln!(out);
    }

    let _ = writeln!(out, "Consolidated");
    out.push_str(&render_consolidated(&estimate.consolidated, separator));
    let _ = writeln!(out);

    match estimate.land.area_m2 {
        Some(area) => {
            let _ = writeln!(
                out,
                "Land area (m²): {}",
                format_quantity(area, Precision::Hundredths, separator)
            );
        }
        None => {
            let _ = writeln!(out, "Land area (m²): incomplete survey");
        }
    }
    out
}

fn section_len(estimate: &Estimate, kind: CalculatorKind) -> usize {
    match kind {
        CalculatorKind::Footing => estimate.footings.as_ref().map_or(0, |s| s.rows.len()),
        CalculatorKind::Beam => estimate.beams.as_ref().map_or(0, |s| s.rows.len()),
        CalculatorKind::Column => estimate.columns.as_ref().map_or(0, |s| s.rows.len()),
        CalculatorKind::Slab => estimate.slabs.as_ref().map_or(0, |s| s.rows.len()),
        CalculatorKind::Masonry => estimate.masonry.as_ref().map_or(0, |s| s.rows.len()),
        CalculatorKind::Plaster => estimate.plaster.as_ref().map_or(0, |s| s.rows.len()),
    }
}

/// SVG drawing of the land parcel, or `None` when the survey is incomplete.
pub fn render_svg(estimate: &Estimate, separator: DecimalSeparator) -> Option<String> {
    let projection = estimate.land.projection.as_ref()?;
    Some(projection.to_svg(|meters| {
        format!("{} m", format_quantity(meters, Precision::Hundredths, separator))
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consolidation::MaterialItem;
    use crate::floor::FloorFilter;
    use crate::rebar::BarGauge;
    use crate::worksheet::Worksheet;

    #[test]
    fn test_format_quantity() {
        assert_eq!(format_quantity(0.225, Precision::Thousandths, DecimalSeparator::Point), "0.225");
        assert_eq!(format_quantity(0.225, Precision::Thousandths, DecimalSeparator::Comma), "0,225");
        assert_eq!(format_quantity(2.5, Precision::Hundredths, DecimalSeparator::Point), "2.50");
        assert_eq!(format_quantity(0.4, Precision::WholeUnits, DecimalSeparator::Point), "1");
        assert_eq!(format_quantity(0.0, Precision::WholeUnits, DecimalSeparator::Comma), "0");
    }

    #[test]
    fn test_whole_units_not_bumped_by_noise() {
        assert_eq!(
            format_quantity(3.0000000000000004, Precision::WholeUnits, DecimalSeparator::Point),
            "3"
        );
    }

    #[test]
    fn test_format_entry() {
        let entry = MaterialEntry {
            item: MaterialItem::Iron(BarGauge::ThreeEighths),
            quantity: 0.27,
        };
        assert_eq!(format_entry(&entry, DecimalSeparator::Point), "Iron 3/8 (bars): 1");
    }

    #[test]
    fn test_render_text_mentions_active_sections() {
        let mut sheet = Worksheet::new("A", "B");
        sheet.set_active(CalculatorKind::Plaster, false);
        let text = render_text(&sheet.estimate(&FloorFilter::All), DecimalSeparator::Comma);

        assert!(text.contains("Floor: All floors"));
        assert!(text.contains("Footings (1 rows)"));
        assert!(!text.contains("Plaster ("));
        assert!(text.contains("Consolidated"));
        assert!(text.contains("Land area (m²): 200,00"));
    }

    #[test]
    fn test_render_svg() {
        let sheet = Worksheet::new("A", "B");
        let estimate = sheet.estimate(&FloorFilter::All);
        let svg = render_svg(&estimate, DecimalSeparator::Comma).unwrap();
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains("20,00 m"));

        let mut broken = sheet.clone();
        broken.land = broken.land.with_field(0, "y", "").unwrap();
        assert!(render_svg(&broken.estimate(&FloorFilter::All), DecimalSeparator::Point).is_none());
    }
}
