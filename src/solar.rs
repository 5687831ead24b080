// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! # Low-precision solar position
//!
//! Declination and equation of time from the USNO "approximate solar
//! coordinates" algorithm, accurate to roughly one arc-minute within two
//! centuries of J2000.0. Prayer times are rounded to the minute, so nothing
//! better is needed here.
//!
//! ## References
//! * USNO, *Approximate Solar Coordinates*, aa.usno.navy.mil/faq/docs/SunApprox
//! * Meeus, *Astronomical Algorithms*, ch. 25

use crate::angle::{arcsin, arctan2, cos, fix_angle, fix_hour, sin};
use crate::julian::JulianDate;

/// Apparent solar coordinates needed for time solving.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SolarPosition {
    /// Declination in degrees.
    pub declination: f64,
    /// Equation of time in hours (apparent minus mean solar time).
    pub equation: f64,
    /// Sun–Earth distance in AU. Informational; unused by the solver.
    pub distance: f64,
}

/// Sun position at a Julian Day.
///
/// `equation` is `q/15 - fix_hour(RA)` with no further wrapping. For a few
/// days around the March equinox the ecliptic longitude has already wrapped
/// past 0° while the mean longitude has not, and the value reads close to 24 h
/// instead of close to zero. Consumers must wrap `12 - equation` before use.
pub fn sun_position(jd: JulianDate) -> SolarPosition {
    let d = jd.days_since_j2000().value();

    let g = fix_angle(357.529 + 0.985_600_28 * d);
    let q = fix_angle(280.459 + 0.985_647_36 * d);
    let l = fix_angle(q + 1.915 * sin(g) + 0.020 * sin(2.0 * g));

    let r = 1.000_14 - 0.016_71 * cos(g) - 0.000_14 * cos(2.0 * g);
    let e = 23.439 - 0.000_000_36 * d;

    let ra = arctan2(cos(e) * sin(l), cos(l)) / 15.0;
    let eqt = q / 15.0 - fix_hour(ra);
    let decl = arcsin(sin(e) * sin(l));

    SolarPosition {
        declination: decl,
        equation: eqt,
        distance: r,
    }
}
