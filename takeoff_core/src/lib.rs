//! # takeoff_core - Construction Quantity Take-off Engine
//!
//! `takeoff_core` turns element tables (footings, beams, columns, slabs,
//! masonry and plaster) into material quantities: concrete, cement bags,
//! sand, gravel, blocks and reinforcing bars by gauge. It also measures an
//! irregular land parcel from its surveyed vertices.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: Calculators are pure functions from rows to quantities
//! - **Forgiving input**: Row fields are typed text; anything unparseable counts as zero
//! - **JSON-First**: Every row, result and worksheet implements Serialize/Deserialize
//! - **Tunable**: Empirical constants live in [`settings::EstimateSettings`]
//!
//! ## Quick Start
//!
//! ```rust
//! use takeoff_core::consolidation::MaterialItem;
//! use takeoff_core::floor::FloorFilter;
//! use takeoff_core::worksheet::Worksheet;
//!
//! let mut sheet = Worksheet::new("Casa Silva", "João Silva");
//! sheet.footings = sheet.footings.with_field(0, "count", "4").unwrap();
//!
//! let estimate = sheet.estimate(&FloorFilter::All);
//! let cement = estimate.consolidated.get(MaterialItem::Cement);
//! assert!(cement > 0.0);
//! ```
//!
//! ## Modules
//!
//! - [`worksheet`] - Worksheet container and the estimate pipeline
//! - [`calculations`] - One calculator per element table, plus land area
//! - [`consolidation`] - Material totals across calculators
//! - [`report`] - Text and SVG output
//! - [`rows`] - Editable row tables
//! - [`floor`] - Floor filter
//! - [`parsing`] - Lenient number parsing
//! - [`rebar`] - Bar gauges and the standard bar length
//! - [`settings`] - Mix ratios and allowances
//! - [`units`] - Type-safe unit wrappers
//! - [`errors`] - Structured error types
//! - [`file_io`] - Worksheet files with atomic saves

pub mod calculations;
pub mod consolidation;
pub mod errors;
pub mod file_io;
pub mod floor;
pub mod parsing;
pub mod rebar;
pub mod report;
pub mod rows;
pub mod settings;
pub mod units;
pub mod worksheet;

// Re-export commonly used types at crate root for convenience
pub use consolidation::{consolidate, ConsolidatedTotals, MaterialItem};
pub use errors::{CalcError, CalcResult};
pub use file_io::{load_worksheet, save_worksheet};
pub use floor::FloorFilter;
pub use rebar::{BarGauge, STANDARD_BAR_LENGTH_M};
pub use settings::EstimateSettings;
pub use worksheet::{Estimate, Worksheet};
