//! # Floor Filter
//!
//! Rows carry the floor (level) they belong to, e.g. "Térreo" or "Pav1".
//! A take-off can be run for one floor or for the whole building; filtering
//! happens before rows reach a calculator.

use serde::{Deserialize, Serialize};

/// Rows that belong to a building floor
pub trait OnFloor {
    fn floor(&self) -> &str;
}

/// Floor selection applied before computing.
///
/// ```json
/// "All"
/// { "Floor": "Pav1" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FloorFilter {
    /// Every floor
    #[default]
    All,
    /// Only rows whose floor matches exactly
    Floor(String),
}

impl FloorFilter {
    /// Interpret a selection string. Blank text and "all" (any case) select
    /// every floor.
    ///
    /// ```rust
    /// use takeoff_core::floor::FloorFilter;
    ///
    /// assert_eq!(FloorFilter::from_selection(""), FloorFilter::All);
    /// assert_eq!(FloorFilter::from_selection("ALL"), FloorFilter::All);
    /// assert_eq!(FloorFilter::from_selection("Pav1"), FloorFilter::Floor("Pav1".to_string()));
    /// ```
    pub fn from_selection(selection: &str) -> Self {
        let trimmed = selection.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("all") {
            FloorFilter::All
        } else {
            FloorFilter::Floor(trimmed.to_string())
        }
    }

    pub fn matches(&self, floor: &str) -> bool {
        match self {
            FloorFilter::All => true,
            FloorFilter::Floor(selected) => selected.trim() == floor.trim(),
        }
    }

    pub fn display_name(&self) -> &str {
        match self {
            FloorFilter::All => "All floors",
            FloorFilter::Floor(name) => name,
        }
    }
}

/// Keep the rows on the selected floor, preserving order.
pub fn filter_rows<T: OnFloor + Clone>(rows: &[T], filter: &FloorFilter) -> Vec<T> {
    rows.iter()
        .filter(|row| filter.matches(row.floor()))
        .cloned()
        .collect()
}

/// Distinct floor names in first-seen order. Blank floors are skipped.
pub fn floors<'a, T: OnFloor + 'a>(rows: impl IntoIterator<Item = &'a T>) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for row in rows {
        let floor = row.floor().trim();
        if !floor.is_empty() && !names.iter().any(|n| n == floor) {
            names.push(floor.to_string());
        }
    }
    names
}
