// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Degree-based trigonometry and range wrapping.
//!
//! Forward functions take degrees, inverse functions return degrees. The
//! conversions route through [`qtty`] angular quantities so the unit is
//! carried by the type rather than by a scattered `PI / 180` factor.
//!
//! Inverse results are **raw**: `arccos`, `arcsin` and `arctan2` are not
//! wrapped into `[0, 360)` unless the caller passes them through
//! [`fix_angle`] or [`fix_hour`]. Out-of-domain inputs yield `NaN`
//! exactly as the `f64` intrinsics do.

use qtty::{Degree, Degrees, Radians};

#[inline]
fn degrees(rad: f64) -> f64 {
    Radians::new(rad).to::<Degree>().value()
}

/// Sine of an angle in degrees.
#[inline]
pub fn sin(d: f64) -> f64 {
    Degrees::new(d).sin()
}

/// Cosine of an angle in degrees.
#[inline]
pub fn cos(d: f64) -> f64 {
    Degrees::new(d).cos()
}

/// Tangent of an angle in degrees.
#[inline]
pub fn tan(d: f64) -> f64 {
    Degrees::new(d).tan()
}

#[inline]
pub fn arcsin(x: f64) -> f64 {
    degrees(x.asin())
}

#[inline]
pub fn arccos(x: f64) -> f64 {
    degrees(x.acos())
}

#[inline]
pub fn arctan(x: f64) -> f64 {
    degrees(x.atan())
}

/// `atan(1/x)` in degrees.
#[inline]
pub fn arccot(x: f64) -> f64 {
    degrees((1.0 / x).atan())
}

/// Four-quadrant arctangent of `y / x`, in degrees within `(-180, 180]`.
#[inline]
pub fn arctan2(y: f64, x: f64) -> f64 {
    degrees(y.atan2(x))
}

/// Wraps `a` into `[0, b)`.
///
/// `a - b*floor(a/b)`, lifted by `b` when negative. A result that rounds to
/// exactly `b` (tiny negative inputs) folds back to zero.
#[inline]
pub fn fix(a: f64, b: f64) -> f64 {
    let r = a - b * (a / b).floor();
    let r = if r < 0.0 { r + b } else { r };
    if r >= b {
        r - b
    } else {
        r
    }
}

/// Wraps an angle into `[0, 360)`.
#[inline]
pub fn fix_angle(a: f64) -> f64 {
    fix(a, 360.0)
}

/// Wraps an hour value into `[0, 24)`.
#[inline]
pub fn fix_hour(a: f64) -> f64 {
    fix(a, 24.0)
}
