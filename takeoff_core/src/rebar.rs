//! # Reinforcement Bars
//!
//! Diameter classes for reinforcing steel and the conversion from linear
//! demand (meters) to commercial bars.
//!
//! Bars are sold in a standard length of 12 m. A calculator reports the exact
//! fraction (`linear_m / 12.0`); rounding up to whole bars happens only when
//! the consolidated summary is displayed.
//!
//! ## Example
//!
//! ```rust
//! use takeoff_core::rebar::{bars_for_length, BarCounts, BarGauge, STANDARD_BAR_LENGTH_M};
//!
//! let bars = bars_for_length(30.0, STANDARD_BAR_LENGTH_M);
//! assert_eq!(bars, 2.5);
//!
//! let mut counts = BarCounts::default();
//! counts.add(BarGauge::ThreeEighths, bars);
//! assert_eq!(counts.get(BarGauge::ThreeEighths), 2.5);
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{de, Deserialize, Deserializer, Serialize};

use crate::errors::CalcError;

/// Commercial reinforcement bar length in meters
pub const STANDARD_BAR_LENGTH_M: f64 = 12.0;

/// Nominal bar diameter class, in inches.
///
/// Ordered from thinnest to thickest so bar tables list naturally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub enum BarGauge {
    /// 3/16" (≈5 mm), used for stirrups only
    #[serde(rename = "3/16")]
    ThreeSixteenths,
    /// 1/4" (6.3 mm)
    #[serde(rename = "1/4")]
    Quarter,
    /// 5/16" (8 mm)
    #[serde(rename = "5/16")]
    FiveSixteenths,
    /// 3/8" (10 mm)
    #[default]
    #[serde(rename = "3/8")]
    ThreeEighths,
    /// 1/2" (12.5 mm)
    #[serde(rename = "1/2")]
    Half,
    /// 5/8" (16 mm)
    #[serde(rename = "5/8")]
    FiveEighths,
}

impl BarGauge {
    /// Classes a user may pick for main reinforcement
    pub const SELECTABLE: [BarGauge; 5] = [
        BarGauge::Quarter,
        BarGauge::FiveSixteenths,
        BarGauge::ThreeEighths,
        BarGauge::Half,
        BarGauge::FiveEighths,
    ];

    /// Fixed class used for beam and column stirrups
    pub const STIRRUP: BarGauge = BarGauge::ThreeSixteenths;

    /// Fractional-inch label ("3/8")
    pub fn label(&self) -> &'static str {
        match self {
            BarGauge::ThreeSixteenths => "3/16",
            BarGauge::Quarter => "1/4",
            BarGauge::FiveSixteenths => "5/16",
            BarGauge::ThreeEighths => "3/8",
            BarGauge::Half => "1/2",
            BarGauge::FiveEighths => "5/8",
        }
    }

    /// Nominal diameter in millimeters
    pub fn nominal_mm(&self) -> f64 {
        match self {
            BarGauge::ThreeSixteenths => 5.0,
            BarGauge::Quarter => 6.3,
            BarGauge::FiveSixteenths => 8.0,
            BarGauge::ThreeEighths => 10.0,
            BarGauge::Half => 12.5,
            BarGauge::FiveEighths => 16.0,
        }
    }
}

impl fmt::Display for BarGauge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Parses a main reinforcement class. The stirrup class is not selectable.
impl FromStr for BarGauge {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim().trim_end_matches('"');
        BarGauge::SELECTABLE
            .iter()
            .find(|g| g.label() == trimmed)
            .copied()
            .ok_or_else(|| {
                CalcError::invalid_input("diameter", s, "Expected one of 1/4, 5/16, 3/8, 1/2, 5/8")
            })
    }
}

/// Deserialize a row's main bar class, rejecting the stirrup class.
///
/// Use with `#[serde(deserialize_with = "deserialize_main")]`. Bar count
/// maps keep the plain derive so stirrup totals still load.
pub fn deserialize_main<'de, D>(deserializer: D) -> Result<BarGauge, D::Error>
where
    D: Deserializer<'de>,
{
    let gauge = BarGauge::deserialize(deserializer)?;
    if BarGauge::SELECTABLE.contains(&gauge) {
        Ok(gauge)
    } else {
        Err(de::Error::custom(format!(
            "{} is not a main bar class; expected one of 1/4, 5/16, 3/8, 1/2, 5/8",
            gauge.label()
        )))
    }
}

/// Convert a linear reinforcement demand into (fractional) commercial bars.
///
/// Returns 0 when either length is not positive.
pub fn bars_for_length(linear_m: f64, bar_length_m: f64) -> f64 {
    if linear_m > 0.0 && bar_length_m > 0.0 {
        linear_m / bar_length_m
    } else {
        0.0
    }
}

/// Bar counts accumulated per diameter class.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BarCounts(BTreeMap<BarGauge, f64>);

impl BarCounts {
    /// Add bars to a class
    pub fn add(&mut self, gauge: BarGauge, bars: f64) {
        *self.0.entry(gauge).or_insert(0.0) += bars;
    }

    /// Bars recorded for a class, 0 when absent
    pub fn get(&self, gauge: BarGauge) -> f64 {
        self.0.get(&gauge).copied().unwrap_or(0.0)
    }

    /// Fold another set of counts into this one
    pub fn merge(&mut self, other: &BarCounts) {
        for (gauge, bars) in other.iter() {
            self.add(gauge, bars);
        }
    }

    /// Iterate classes thinnest first
    pub fn iter(&self) -> impl Iterator<Item = (BarGauge, f64)> + '_ {
        self.0.iter().map(|(g, b)| (*g, *b))
    }

    pub fn total(&self) -> f64 {
        self.0.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.0.values().all(|b| *b == 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bars_for_length() {
        assert_eq!(bars_for_length(24.0, STANDARD_BAR_LENGTH_M), 2.0);
        assert_eq!(bars_for_length(0.0, STANDARD_BAR_LENGTH_M), 0.0);
        assert_eq!(bars_for_length(-5.0, STANDARD_BAR_LENGTH_M), 0.0);
        assert_eq!(bars_for_length(5.0, 0.0), 0.0);
    }

    #[test]
    fn test_gauge_labels_roundtrip() {
        for gauge in BarGauge::SELECTABLE {
            assert_eq!(gauge.label().parse::<BarGauge>().unwrap(), gauge);
        }
        assert!("3/16".parse::<BarGauge>().is_err());
        assert_eq!("1/2\"".parse::<BarGauge>().unwrap(), BarGauge::Half);
        assert!("7/8".parse::<BarGauge>().is_err());
    }

    #[test]
    fn test_gauge_serializes_as_label() {
        let json = serde_json::to_string(&BarGauge::FiveSixteenths).unwrap();
        assert_eq!(json, "\"5/16\"");
    }

    #[test]
    fn test_main_class_rejects_stirrup() {
        #[derive(Deserialize)]
        struct Row {
            #[serde(deserialize_with = "deserialize_main")]
            diameter: BarGauge,
        }
        let row: Row = serde_json::from_str(r#"{ "diameter": "1/2" }"#).unwrap();
        assert_eq!(row.diameter, BarGauge::Half);
        assert!(serde_json::from_str::<Row>(r#"{ "diameter": "3/16" }"#).is_err());

        // Stirrup totals still load as a bar count key
        let counts: BarCounts = serde_json::from_str(r#"{ "3/16": 2.0 }"#).unwrap();
        assert_eq!(counts.get(BarGauge::STIRRUP), 2.0);
    }

    #[test]
    fn test_bar_counts_merge() {
        let mut a = BarCounts::default();
        a.add(BarGauge::ThreeEighths, 1.0);
        let mut b = BarCounts::default();
        b.add(BarGauge::ThreeEighths, 2.0);
        b.add(BarGauge::Half, 0.5);
        a.merge(&b);
        assert_eq!(a.get(BarGauge::ThreeEighths), 3.0);
        assert_eq!(a.get(BarGauge::Half), 0.5);
        assert_eq!(a.get(BarGauge::Quarter), 0.0);
        assert_eq!(a.total(), 3.5);

        let json = serde_json::to_string(&a).unwrap();
        assert_eq!(json, "{\"3/8\":3.0,\"1/2\":0.5}");
    }
}
