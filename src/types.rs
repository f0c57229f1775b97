//! Common types for 3D box dimensions.
//!
//! All linear measures are centimeters, all reported volumes are cubic meters
//! and all weights are kilograms.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Cubic centimeters per cubic meter.
///
/// Exact conversion constant between the input unit (cm) and the reported
/// volume unit (m³).
pub const CM3_PER_M3: f64 = 1_000_000.0;

/// Interior of a 20 ft shipping container (length, width, height) in cm.
pub const DEFAULT_CONTAINER: Dimensions = Dimensions::new(589.0, 235.0, 239.0);

/// Euro pallet footprint with a single layer height (length, width, height) in cm.
pub const DEFAULT_ITEM: Dimensions = Dimensions::new(120.0, 80.0, 15.0);

/// An ordered (length, width, height) triple in centimeters.
///
/// Used both for the container interior and for the repeated item.
///
/// # Examples
/// ```
/// use pallet_fit::types::Dimensions;
///
/// let pallet = Dimensions::new(120.0, 80.0, 15.0);
/// assert_eq!(pallet.volume(), 144_000.0);
/// assert_eq!(pallet.to_string(), "120x80x15");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "(f64, f64, f64)", into = "(f64, f64, f64)")]
pub struct Dimensions {
    pub length: f64,
    pub width: f64,
    pub height: f64,
}

impl Dimensions {
    /// Creates a new triple.
    ///
    /// # Parameters
    /// * `length` - extent along the container's X axis
    /// * `width` - extent along the container's Y axis
    /// * `height` - extent along the container's Z axis
    #[inline]
    pub const fn new(length: f64, width: f64, height: f64) -> Self {
        Self {
            length,
            width,
            height,
        }
    }

    /// Converts to tuple format for API compatibility.
    #[inline]
    pub const fn as_tuple(&self) -> (f64, f64, f64) {
        (self.length, self.width, self.height)
    }

    /// Creates from tuple format.
    #[inline]
    pub const fn from_tuple(tuple: (f64, f64, f64)) -> Self {
        Self::new(tuple.0, tuple.1, tuple.2)
    }

    /// Returns the three components as an array, indexable by axis.
    #[inline]
    pub const fn as_array(&self) -> [f64; 3] {
        [self.length, self.width, self.height]
    }

    /// Volume in cubic centimeters.
    #[inline]
    pub fn volume(&self) -> f64 {
        self.length * self.width * self.height
    }

    /// Volume in cubic meters.
    #[inline]
    pub fn volume_m3(&self) -> f64 {
        self.volume() / CM3_PER_M3
    }

    /// Checks if all components are positive and finite.
    #[inline]
    pub fn is_valid_dimension(&self) -> bool {
        self.as_array()
            .iter()
            .all(|value| *value > 0.0 && value.is_finite())
    }

    /// Shrinks length and width by `margin` on both sides. Height is untouched.
    #[inline]
    pub fn shrink_footprint(&self, margin: f64) -> Self {
        Self::new(
            self.length - 2.0 * margin,
            self.width - 2.0 * margin,
            self.height,
        )
    }
}

impl From<(f64, f64, f64)> for Dimensions {
    #[inline]
    fn from(tuple: (f64, f64, f64)) -> Self {
        Self::from_tuple(tuple)
    }
}

impl From<Dimensions> for (f64, f64, f64) {
    #[inline]
    fn from(dims: Dimensions) -> Self {
        dims.as_tuple()
    }
}

/// Renders as `LxWxH`, the format used in exported reports.
impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}x{}", self.length, self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_volume_and_unit_conversion() {
        let dims = Dimensions::new(100.0, 100.0, 100.0);
        assert_eq!(dims.volume(), 1_000_000.0);
        assert_eq!(dims.volume_m3(), 1.0);

        let container = Dimensions::new(120.0, 80.0, 150.0);
        assert!((container.volume_m3() - 1.44).abs() < 1e-12);
    }

    #[test]
    fn test_is_valid_dimension() {
        assert!(Dimensions::new(1.0, 2.0, 3.0).is_valid_dimension());
        assert!(!Dimensions::new(0.0, 2.0, 3.0).is_valid_dimension());
        assert!(!Dimensions::new(1.0, -2.0, 3.0).is_valid_dimension());
        assert!(!Dimensions::new(1.0, 2.0, f64::NAN).is_valid_dimension());
        assert!(!Dimensions::new(f64::INFINITY, 2.0, 3.0).is_valid_dimension());
    }

    #[test]
    fn test_shrink_footprint_keeps_height() {
        let shrunk = DEFAULT_CONTAINER.shrink_footprint(5.0);
        assert_eq!(shrunk, Dimensions::new(579.0, 225.0, 239.0));
    }

    #[test]
    fn test_display_and_serde_use_triples() {
        let dims = Dimensions::new(30.0, 20.5, 15.0);
        assert_eq!(dims.to_string(), "30x20.5x15");

        let json = serde_json::to_string(&dims).unwrap();
        assert_eq!(json, "[30.0,20.5,15.0]");
        let back: Dimensions = serde_json::from_str("[30, 20.5, 15]").unwrap();
        assert_eq!(back, dims);
    }
}
