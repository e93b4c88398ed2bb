//! # Unit Types
//!
//! Type-safe wrappers for the metric units used on a take-off sheet. They are
//! plain `f64` newtypes, serialized as bare numbers.
//!
//! Field crews enter element sections in centimeters and lengths, areas and
//! volumes in meters. Mixing the two is the most common take-off mistake, so
//! every conversion goes through a `From` impl here.
//!
//! ## Example
//!
//! ```rust
//! use takeoff_core::units::{Centimeters, Meters};
//!
//! let width = Centimeters(40.0);
//! let width_m: Meters = width.into();
//! assert!((width_m.0 - 0.4).abs() < 1e-12);
//! ```

use serde::{Deserialize, Serialize};
use std::ops::{Add, Div, Mul, Sub};

// ============================================================================
// Length Units
// ============================================================================

/// Length in centimeters
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Centimeters(pub f64);

/// Length in meters
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Meters(pub f64);

impl From<Centimeters> for Meters {
    fn from(cm: Centimeters) -> Self {
        Meters(cm.0 / 100.0)
    }
}

impl From<Meters> for Centimeters {
    fn from(m: Meters) -> Self {
        Centimeters(m.0 * 100.0)
    }
}

// ============================================================================
// Area and Volume Units
// ============================================================================

/// Area in square meters
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SquareMeters(pub f64);

/// Volume in cubic meters
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CubicMeters(pub f64);

/// Volume in liters
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Liters(pub f64);

impl From<Liters> for CubicMeters {
    fn from(l: Liters) -> Self {
        CubicMeters(l.0 / 1000.0)
    }
}

impl From<CubicMeters> for Liters {
    fn from(m3: CubicMeters) -> Self {
        Liters(m3.0 * 1000.0)
    }
}

impl Mul<Meters> for Meters {
    type Output = SquareMeters;
    fn mul(self, rhs: Meters) -> SquareMeters {
        SquareMeters(self.0 * rhs.0)
    }
}

impl Mul<Meters> for SquareMeters {
    type Output = CubicMeters;
    fn mul(self, rhs: Meters) -> CubicMeters {
        CubicMeters(self.0 * rhs.0)
    }
}

// ============================================================================
// Arithmetic Implementations (macro to reduce boilerplate)
// ============================================================================

macro_rules! impl_arithmetic {
    ($type:ty) => {
        impl Add for $type {
            type Output = Self;
            fn add(self, rhs: Self) -> Self::Output {
                Self(self.0 + rhs.0)
            }
        }

        impl Sub for $type {
            type Output = Self;
            fn sub(self, rhs: Self) -> Self::Output {
                Self(self.0 - rhs.0)
            }
        }

        impl Mul<f64> for $type {
            type Output = Self;
            fn mul(self, rhs: f64) -> Self::Output {
                Self(self.0 * rhs)
            }
        }

        impl Div<f64> for $type {
            type Output = Self;
            fn div(self, rhs: f64) -> Self::Output {
                Self(self.0 / rhs)
            }
        }

        impl $type {
            /// Get the raw f64 value
            pub fn value(self) -> f64 {
                self.0
            }

            /// Create from raw f64 value
            pub fn new(value: f64) -> Self {
                Self(value)
            }
        }
    };
}

impl_arithmetic!(Centimeters);
impl_arithmetic!(Meters);
impl_arithmetic!(SquareMeters);
impl_arithmetic!(CubicMeters);
impl_arithmetic!(Liters);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centimeters_to_meters() {
        let m: Meters = Centimeters(250.0).into();
        assert_eq!(m.0, 2.5);
        let back: Centimeters = m.into();
        assert_eq!(back.0, 250.0);
    }

    #[test]
    fn test_liters_to_cubic_meters() {
        let m3: CubicMeters = Liters(18.0).into();
        assert!((m3.0 - 0.018).abs() < 1e-12);
    }

    #[test]
    fn test_dimensional_products() {
        let area = Meters(2.0) * Meters(3.0);
        assert_eq!(area, SquareMeters(6.0));
        let volume = area * Meters(0.1);
        assert!((volume.0 - 0.6).abs() < 1e-12);
    }

    #[test]
    fn test_arithmetic() {
        let a = Meters(10.0);
        let b = Meters(5.0);
        assert_eq!((a + b).0, 15.0);
        assert_eq!((a - b).0, 5.0);
        assert_eq!((a * 2.0).0, 20.0);
        assert_eq!((a / 2.0).0, 5.0);
    }

    #[test]
    fn test_serialization() {
        let json = serde_json::to_string(&CubicMeters(0.4)).unwrap();
        assert_eq!(json, "0.4");
    }
}
