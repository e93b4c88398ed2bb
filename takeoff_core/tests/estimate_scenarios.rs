//! End-to-end take-off scenarios through the public API.

use approx::assert_relative_eq;

use takeoff_core::calculations::{
    footing, CalculatorKind, CalculatorTotals, FootingRow, FootingTotals, FramingTotals, Vertex,
};
use takeoff_core::consolidation::{consolidate, MaterialItem};
use takeoff_core::floor::{filter_rows, FloorFilter};
use takeoff_core::rebar::{BarCounts, BarGauge};
use takeoff_core::rows::RowSet;
use takeoff_core::settings::EstimateSettings;
use takeoff_core::worksheet::Worksheet;

fn footing_row(floor: &str, width: &str, length: &str, height: &str) -> FootingRow {
    FootingRow {
        floor: floor.to_string(),
        width_cm: width.to_string(),
        length_cm: length.to_string(),
        height_cm: height.to_string(),
        ..FootingRow::default()
    }
}

#[test]
fn reference_footing_quantities() {
    let rows = vec![footing_row("Térreo", "100", "100", "40")];
    let computed = footing::compute_rows(&rows, &EstimateSettings::default());
    let totals = footing::totals(&computed);

    assert_relative_eq!(computed[0].unit_volume_m3, 0.4, epsilon = 1e-12);
    assert_relative_eq!(totals.cement_bags, 2.5, epsilon = 1e-12);
    assert_relative_eq!(totals.sand_m3, 0.225, epsilon = 1e-12);
    assert_relative_eq!(totals.gravel_m3, 0.27, epsilon = 1e-12);
}

#[test]
fn footing_and_beam_iron_combine() {
    let mut footing_bars = BarCounts::default();
    footing_bars.add(BarGauge::ThreeEighths, 1.0);
    let mut beam_bars = BarCounts::default();
    beam_bars.add(BarGauge::ThreeEighths, 2.0);

    let summary = consolidate(&[
        CalculatorTotals::Footing(FootingTotals {
            cement_bags: 2.0,
            bars: footing_bars,
            ..FootingTotals::default()
        }),
        CalculatorTotals::Beam(FramingTotals {
            cement_bags: 3.0,
            bars: beam_bars,
            ..FramingTotals::default()
        }),
    ]);

    assert_relative_eq!(summary.get(MaterialItem::Cement), 5.0);
    assert_eq!(summary.get_named("Cement (50 kg bags)"), Some(5.0));
    assert_eq!(summary.get_named("Iron 3/8 (bars)"), Some(3.0));
    assert_eq!(summary.by_category.len(), 2);
}

#[test]
fn floor_filter_keeps_only_selected_floor() {
    let rows = vec![
        footing_row("Térreo", "100", "100", "40"),
        footing_row("Pav1", "80", "80", "30"),
    ];
    let settings = EstimateSettings::default();

    let upper = filter_rows(&rows, &FloorFilter::from_selection("Pav1"));
    let upper_totals = footing::totals(&footing::compute_rows(&upper, &settings));
    let pav1_alone = footing::compute_row(&rows[1], &settings);

    assert_eq!(upper.len(), 1);
    assert_relative_eq!(upper_totals.volume_m3, pav1_alone.volume_m3, epsilon = 1e-12);
    assert_relative_eq!(upper_totals.volume_m3, 0.192, epsilon = 1e-12);
}

#[test]
fn worksheet_estimate_by_floor() {
    let mut sheet = Worksheet::new("Two storeys", "Client");
    sheet.footings = RowSet::from_rows(vec![
        footing_row("Térreo", "100", "100", "40"),
        footing_row("Pav1", "80", "80", "30"),
    ]);

    let all = sheet.estimate(&FloorFilter::All);
    let ground = sheet.estimate(&FloorFilter::from_selection("Térreo"));
    let upper = sheet.estimate(&FloorFilter::from_selection("Pav1"));

    let footing_volume = |e: &takeoff_core::Estimate| e.footings.as_ref().map(|s| s.totals.volume_m3);
    assert_relative_eq!(footing_volume(&all).unwrap(), 0.592, epsilon = 1e-12);
    assert_relative_eq!(footing_volume(&ground).unwrap(), 0.4, epsilon = 1e-12);
    assert_relative_eq!(footing_volume(&upper).unwrap(), 0.192, epsilon = 1e-12);

    // Land area does not depend on the floor
    assert_eq!(all.land.area_m2, upper.land.area_m2);
}

#[test]
fn inactive_calculator_is_excluded_not_zeroed() {
    let mut sheet = Worksheet::new("A", "B");
    for kind in CalculatorKind::ALL {
        sheet.set_active(kind, kind == CalculatorKind::Footing);
    }
    let estimate = sheet.estimate(&FloorFilter::All);

    assert!(estimate.beams.is_none());
    assert!(estimate.slabs.is_none());
    assert_eq!(estimate.consolidated.by_category.len(), 1);
    assert_eq!(estimate.consolidated.by_category[0].calculator, CalculatorKind::Footing);
    assert_eq!(estimate.consolidated.get(MaterialItem::Blocks), 0.0);
    assert_eq!(estimate.consolidated.slab_area_m2, 0.0);
}

#[test]
fn irregular_land_parcel() {
    let mut sheet = Worksheet::new("Lot 7", "");
    sheet.land = RowSet::from_rows(vec![
        Vertex::new("0", "0"),
        Vertex::new("30,5", "0"),
        Vertex::new("28", "15"),
        Vertex::new("2", "18"),
    ]);
    let estimate = sheet.estimate(&FloorFilter::All);

    // Shoelace: |0 + 30.5×15 + (28×18 − 2×15) + 0| / 2
    let expected = (30.5 * 15.0 + (28.0 * 18.0 - 2.0 * 15.0)) / 2.0;
    assert_relative_eq!(estimate.land.area_m2.unwrap(), expected, epsilon = 1e-9);
    assert_eq!(estimate.land.projection.unwrap().points.len(), 4);
}

#[test]
fn removing_below_minimum_is_a_no_op() {
    let sheet = Worksheet::new("A", "B");
    assert_eq!(sheet.footings.without(0).len(), 1);
    assert_eq!(sheet.land.without(0).len(), 3);
    assert_eq!(sheet.land.without(0).without(0).len(), 3);
}

#[test]
fn estimate_serializes_to_json() {
    let sheet = Worksheet::new("A", "B");
    let estimate = sheet.estimate(&FloorFilter::All);
    let json = serde_json::to_value(&estimate).unwrap();

    assert!(json["footings"]["rows"].is_array());
    assert!(json["masonry"]["totals"]["blocks"].is_number());
    assert_eq!(json["land"]["area_m2"], 200.0);
}
