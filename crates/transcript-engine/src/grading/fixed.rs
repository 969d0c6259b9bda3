//! Exact fixed-point decimals for quality points, GPA and CGPA.

use serde::{Serialize, Serializer};
use std::fmt;
use std::ops::Add;

/// A non-negative decimal stored as `units / 10^scale`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Fixed {
    units: u64,
    scale: u32,
}

impl Fixed {
    pub const fn new(units: u64, scale: u32) -> Self {
        Self { units, scale }
    }

    pub const fn zero(scale: u32) -> Self {
        Self { units: 0, scale }
    }

    /// `numerator / denominator` rounded half-up to `scale` places.
    ///
    /// A zero denominator yields zero.
    pub fn from_ratio(numerator: u64, denominator: u64, scale: u32) -> Self {
        if denominator == 0 {
            return Self::zero(scale);
        }
        let scaled = u128::from(numerator) * u128::from(10u64.pow(scale));
        let den = u128::from(denominator);
        let mut quotient = scaled / den;
        if (scaled % den) * 2 >= den {
            quotient += 1;
        }
        Self {
            units: quotient as u64,
            scale,
        }
    }

    pub fn units(self) -> u64 {
        self.units
    }

    pub fn scale(self) -> u32 {
        self.scale
    }

    pub fn is_zero(self) -> bool {
        self.units == 0
    }

    pub fn to_f64(self) -> f64 {
        self.units as f64 / 10f64.powi(self.scale as i32)
    }
}

impl Add for Fixed {
    type Output = Fixed;

    fn add(self, rhs: Fixed) -> Fixed {
        debug_assert_eq!(self.scale, rhs.scale, "adding decimals of different scale");
        Fixed {
            units: self.units + rhs.units,
            scale: self.scale,
        }
    }
}

impl fmt::Display for Fixed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.scale == 0 {
            return write!(f, "{}", self.units);
        }
        let factor = 10u64.pow(self.scale);
        write!(
            f,
            "{}.{:0width$}",
            self.units / factor,
            self.units % factor,
            width = self.scale as usize
        )
    }
}

impl Serialize for Fixed {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.to_f64())
    }
}
