use crate::error::ConfigError;

use super::Point3;

/// Number of decimal digits kept when quantizing a position.
///
/// A precision of `p` multiplies each coordinate by `10^p` before truncating
/// it to an integer. Lower precisions intentionally admit more false
/// positives: positions that differ below the kept digits are treated as the
/// same position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Precision(u8);

impl Precision {
    /// Smallest accepted number of digits.
    pub const MIN: u8 = 1;
    /// Largest accepted number of digits.
    pub const MAX: u8 = 6;

    /// Creates a precision of `digits` decimal places.
    ///
    /// # Errors
    ///
    /// Returns an error if `digits` is outside `[1, 6]`.
    pub fn new(digits: u8) -> Result<Self, ConfigError> {
        if (Self::MIN..=Self::MAX).contains(&digits) {
            Ok(Self(digits))
        } else {
            Err(ConfigError::PrecisionOutOfRange {
                digits,
                min: Self::MIN,
                max: Self::MAX,
            })
        }
    }

    /// Returns the number of decimal digits.
    #[must_use]
    pub fn digits(self) -> u8 {
        self.0
    }

    /// Returns the multiplication factor `10^digits`.
    #[must_use]
    pub fn factor(self) -> f64 {
        10f64.powi(i32::from(self.0))
    }
}

impl Default for Precision {
    fn default() -> Self {
        Self(Self::MAX)
    }
}

/// Integer key of a quantized 3D position.
///
/// Two positions are coincident iff their keys, computed at the same
/// [`Precision`], are equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PositionKey {
    pub x: i64,
    pub y: i64,
    pub z: i64,
}

impl PositionKey {
    /// Quantizes `point` by scaling each coordinate and truncating toward zero.
    ///
    /// Non-finite coordinates saturate (NaN maps to 0).
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn from_point(point: &Point3, precision: Precision) -> Self {
        let factor = precision.factor();
        Self {
            x: (point.x * factor) as i64,
            y: (point.y * factor) as i64,
            z: (point.z * factor) as i64,
        }
    }
}
