//! Quality points for a single course.
//!
//! Percentage is `marks / (credit_hours * 20) * 100`, i.e. `5 * marks /
//! credit_hours`. Per credit hour the scale is:
//!
//! | percentage | quality points per credit hour |
//! |------------|--------------------------------|
//! | < 40       | 0                              |
//! | [40, 50)   | 1.0 + (pct - 40) * 0.1         |
//! | [50, 80)   | 2.0 + (pct - 50) * 2 / 30      |
//! | >= 80      | 4.0                            |
//!
//! Multiplying out by the credit hours gives closed forms with a
//! denominator of 2 or 3, so everything below stays in integers.

use super::fixed::Fixed;

/// Decimal places kept for a course's quality points.
pub const QUALITY_POINT_SCALE: u32 = 2;

/// Total quality points earned on one course, rounded half-up to 2 places.
pub fn quality_points(obtained_marks: u32, credit_hours: u32) -> Fixed {
    if credit_hours == 0 {
        return Fixed::zero(QUALITY_POINT_SCALE);
    }
    let marks = u64::from(obtained_marks);
    let ch = u64::from(credit_hours);

    if marks < 8 * ch {
        // below 40%
        Fixed::zero(QUALITY_POINT_SCALE)
    } else if marks < 10 * ch {
        // ch * (1 + (5m/ch - 40) / 10) == (m - 6ch) / 2
        Fixed::from_ratio(marks - 6 * ch, 2, QUALITY_POINT_SCALE)
    } else if marks < 16 * ch {
        // ch * (2 + (5m/ch - 50) / 15) == (m - 4ch) / 3
        Fixed::from_ratio(marks - 4 * ch, 3, QUALITY_POINT_SCALE)
    } else {
        Fixed::new(400 * ch, QUALITY_POINT_SCALE)
    }
}

/// Quality points per credit hour, rounded half-up to 4 places.
pub fn quality_points_per_credit_hour(obtained_marks: u32, credit_hours: u32) -> Fixed {
    if credit_hours == 0 {
        return Fixed::zero(4);
    }
    let marks = u64::from(obtained_marks);
    let ch = u64::from(credit_hours);

    if marks < 8 * ch {
        Fixed::zero(4)
    } else if marks < 10 * ch {
        Fixed::from_ratio(marks - 6 * ch, 2 * ch, 4)
    } else if marks < 16 * ch {
        Fixed::from_ratio(marks - 4 * ch, 3 * ch, 4)
    } else {
        Fixed::new(40_000, 4)
    }
}
