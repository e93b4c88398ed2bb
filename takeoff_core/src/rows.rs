//! # Row Collections
//!
//! Each calculator reads an ordered list of rows typed by the user. A
//! [`RowSet`] owns that list and keeps its minimum size: element tables never
//! drop below one row and the land polygon never drops below three vertices.
//!
//! Every edit returns a new set and leaves the original untouched, so a caller
//! can keep the previous state for undo or diffing.
//!
//! ## Example
//!
//! ```rust
//! use takeoff_core::calculations::footing::FootingRow;
//! use takeoff_core::rows::RowSet;
//!
//! let rows: RowSet<FootingRow> = RowSet::default();
//! let edited = rows.with_field(0, "width_cm", "120").unwrap();
//!
//! assert_eq!(edited.rows()[0].width_cm, "120");
//! assert_eq!(rows.rows()[0].width_cm, "100");
//!
//! // The last row cannot be removed
//! assert_eq!(edited.without(0).len(), 1);
//! ```

use log::warn;
use serde::{Deserialize, Deserializer, Serialize};

use crate::errors::{CalcError, CalcResult};

/// A row that can be edited field by field through text.
pub trait ElementRow: Clone + Default {
    /// Editable field names, in display order
    const FIELDS: &'static [&'static str];

    /// Smallest number of rows a collection may hold
    const MIN_ROWS: usize = 1;

    /// Current text of a field, `None` for an unknown name
    fn field(&self, name: &str) -> Option<String>;

    /// Replace the text of a field.
    ///
    /// Numeric fields accept any text (invalid text is read as zero later).
    /// Selection fields (diameter, slab type, sides) reject unknown options.
    fn set_field(&mut self, name: &str, value: &str) -> CalcResult<()>;

    /// Rows a fresh or reset collection starts with
    fn default_rows() -> Vec<Self> {
        vec![Self::default()]
    }
}

/// Ordered rows for one calculator, never shorter than `T::MIN_ROWS`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RowSet<T> {
    rows: Vec<T>,
}

impl<T: ElementRow> RowSet<T> {
    /// Build a set from existing rows, padding with default rows if too short.
    pub fn from_rows(mut rows: Vec<T>) -> Self {
        if rows.is_empty() {
            rows = T::default_rows();
        }
        while rows.len() < T::MIN_ROWS {
            rows.push(T::default());
        }
        RowSet { rows }
    }

    pub fn rows(&self) -> &[T] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.rows.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.rows.iter()
    }

    /// Append a row.
    pub fn with_added(&self, row: T) -> Self {
        let mut rows = self.rows.clone();
        rows.push(row);
        RowSet { rows }
    }

    /// Append a row holding the placeholder values.
    pub fn with_default_added(&self) -> Self {
        self.with_added(T::default())
    }

    /// Replace one field of one row.
    ///
    /// # Errors
    ///
    /// * `CalcError::InvalidInput` - index out of range, unknown field, or
    ///   an option the field does not accept
    pub fn with_field(&self, index: usize, field: &str, value: &str) -> CalcResult<Self> {
        let mut rows = self.rows.clone();
        let row = rows.get_mut(index).ok_or_else(|| {
            CalcError::invalid_input(
                "index",
                index.to_string(),
                format!("Row index out of range (len {})", self.rows.len()),
            )
        })?;
        row.set_field(field, value)?;
        Ok(RowSet { rows })
    }

    /// Replace a whole row.
    pub fn with_row(&self, index: usize, row: T) -> CalcResult<Self> {
        if index >= self.rows.len() {
            return Err(CalcError::invalid_input(
                "index",
                index.to_string(),
                format!("Row index out of range (len {})", self.rows.len()),
            ));
        }
        let mut rows = self.rows.clone();
        rows[index] = row;
        Ok(RowSet { rows })
    }

    /// Remove a row. At the minimum size, or for a bad index, the set is
    /// returned unchanged.
    pub fn without(&self, index: usize) -> Self {
        if self.rows.len() <= T::MIN_ROWS || index >= self.rows.len() {
            warn!(
                "ignoring removal of row {} (len {}, minimum {})",
                index,
                self.rows.len(),
                T::MIN_ROWS
            );
            return self.clone();
        }
        let mut rows = self.rows.clone();
        rows.remove(index);
        RowSet { rows }
    }

    /// Back to the default rows.
    pub fn reset(&self) -> Self {
        RowSet::from_rows(T::default_rows())
    }
}

impl<T: ElementRow> Default for RowSet<T> {
    fn default() -> Self {
        RowSet::from_rows(T::default_rows())
    }
}

impl<'a, T> IntoIterator for &'a RowSet<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

impl<'de, T> Deserialize<'de> for RowSet<T>
where
    T: ElementRow + Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let rows = Vec::<T>::deserialize(deserializer)?;
        Ok(RowSet::from_rows(rows))
    }
}

/// Reject a field name the row type does not know.
pub(crate) fn unknown_field(name: &str) -> CalcError {
    CalcError::invalid_input("field", name, "Unknown field")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculations::footing::FootingRow;
    use crate::calculations::polygon::Vertex;

    #[test]
    fn test_default_set_has_one_row() {
        let rows: RowSet<FootingRow> = RowSet::default();
        assert_eq!(rows.len(), 1);
        assert!(!rows.is_empty());
    }

    #[test]
    fn test_edit_is_pure() {
        let rows: RowSet<FootingRow> = RowSet::default();
        let edited = rows.with_field(0, "count", "4").unwrap();
        assert_eq!(edited.rows()[0].count, "4");
        assert_eq!(rows.rows()[0].count, "1");
    }

    #[test]
    fn test_edit_errors() {
        let rows: RowSet<FootingRow> = RowSet::default();
        assert!(rows.with_field(3, "count", "4").is_err());
        assert!(rows.with_field(0, "colour", "red").is_err());
        assert!(rows.with_field(0, "diameter", "7/8").is_err());
    }

    #[test]
    fn test_remove_respects_minimum() {
        let rows: RowSet<FootingRow> = RowSet::default();
        assert_eq!(rows.without(0), rows);

        let two = rows.with_default_added();
        assert_eq!(two.len(), 2);
        assert_eq!(two.without(1).len(), 1);
        assert_eq!(two.without(9).len(), 2);
    }

    #[test]
    fn test_polygon_minimum_is_three() {
        let ring: RowSet<Vertex> = RowSet::default();
        assert!(ring.len() >= 3);

        let triangle = RowSet::from_rows(ring.rows()[..3].to_vec());
        assert_eq!(triangle.without(0).len(), 3);
    }

    #[test]
    fn test_reset() {
        let rows: RowSet<FootingRow> = RowSet::default()
            .with_default_added()
            .with_default_added()
            .with_field(2, "label", "S9")
            .unwrap();
        let reset = rows.reset();
        assert_eq!(reset, RowSet::default());
    }

    #[test]
    fn test_deserialize_pads_short_sets() {
        let empty: RowSet<FootingRow> = serde_json::from_str("[]").unwrap();
        assert_eq!(empty.len(), 1);

        let json = r#"[{ "x": "0", "y": "0" }]"#;
        let ring: RowSet<Vertex> = serde_json::from_str(json).unwrap();
        assert_eq!(ring.len(), 3);
        assert_eq!(ring.rows()[1], Vertex::default());
    }
}
