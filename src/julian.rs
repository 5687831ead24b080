// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Julian Date instant and Gregorian → Julian Day conversion.
//!
//! [`JulianDate`] stores a single [`Days`] quantity counted from the Julian
//! Period epoch. Adding or subtracting [`Days`] shifts the instant;
//! subtracting two instants yields [`Days`].
//!
//! [`CivilDate`] is the loose `(year, month, day)` form accepted by the
//! engine. It rolls overflowing months and days into their neighbours.

use chrono::{Datelike, Months, NaiveDate, TimeDelta};
use qtty::*;
use std::ops::{Add, Sub};

/// A point on the Julian Day axis.
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd)]
pub struct JulianDate {
    quantity: Days,
}

impl JulianDate {
    /// J2000.0 epoch: 2000-01-01T12:00:00 (JD 2 451 545.0).
    pub const J2000: Self = Self::new(2_451_545.0);

    /// Create from a raw scalar (days since the Julian Period epoch).
    #[inline]
    pub const fn new(value: f64) -> Self {
        Self {
            quantity: Days::new(value),
        }
    }

    /// Create from a [`Days`] quantity.
    #[inline]
    pub const fn from_days(days: Days) -> Self {
        Self { quantity: days }
    }

    /// The underlying quantity in days.
    #[inline]
    pub const fn quantity(&self) -> Days {
        self.quantity
    }

    /// The underlying scalar value in days.
    #[inline]
    pub const fn value(&self) -> f64 {
        self.quantity.value()
    }

    /// Julian Day at 0h of a proleptic Gregorian calendar date (Meeus, ch. 7).
    ///
    /// January and February count as months 13 and 14 of the previous year.
    /// No range check is made: dates before 1582 give the proleptic value.
    pub fn from_gregorian(year: i32, month: u32, day: u32) -> Self {
        let (mut y, mut m) = (year as f64, month as f64);
        if month <= 2 {
            y -= 1.0;
            m += 12.0;
        }
        let a = (y / 100.0).floor();
        let b = 2.0 - a + (a / 4.0).floor();
        let jd = (365.25 * (y + 4716.0)).floor() + (30.6001 * (m + 1.0)).floor() + day as f64 + b
            - 1524.5;
        Self::new(jd)
    }

    /// Days elapsed since J2000.0.
    #[inline]
    pub fn days_since_j2000(&self) -> Days {
        *self - Self::J2000
    }
}

impl From<NaiveDate> for JulianDate {
    fn from(date: NaiveDate) -> Self {
        Self::from_gregorian(date.year(), date.month(), date.day())
    }
}

impl std::fmt::Display for JulianDate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Julian Day: {}", self.quantity)
    }
}

// ── Arithmetic ────────────────────────────────────────────────────────────

impl Add<Days> for JulianDate {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Days) -> Self::Output {
        Self::from_days(self.quantity + rhs)
    }
}

impl Sub<Days> for JulianDate {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Days) -> Self::Output {
        Self::from_days(self.quantity - rhs)
    }
}

impl Sub for JulianDate {
    type Output = Days;
    #[inline]
    fn sub(self, rhs: Self) -> Self::Output {
        self.quantity - rhs.quantity
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// CivilDate
// ═══════════════════════════════════════════════════════════════════════════

/// A Gregorian date given by its components.
///
/// Components are not range-checked on construction. Month 13 is January of
/// the next year, day 0 is the last day of the previous month, and
/// `2024-02-30` is March 1.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct CivilDate {
    pub year: i32,
    pub month: i32,
    pub day: i32,
}

impl CivilDate {
    pub const fn new(year: i32, month: i32, day: i32) -> Self {
        Self { year, month, day }
    }

    /// The calendar date after rollover, or `None` outside chrono's range.
    pub fn normalize(self) -> Option<NaiveDate> {
        let january = NaiveDate::from_ymd_opt(self.year, 1, 1)?;
        let months = i64::from(self.month) - 1;
        let shifted = if months >= 0 {
            january.checked_add_months(Months::new(u32::try_from(months).ok()?))
        } else {
            january.checked_sub_months(Months::new(u32::try_from(-months).ok()?))
        }?;
        shifted.checked_add_signed(TimeDelta::try_days(i64::from(self.day) - 1)?)
    }
}

impl From<NaiveDate> for CivilDate {
    fn from(date: NaiveDate) -> Self {
        // Both components are at most 31.
        Self::new(date.year(), date.month() as i32, date.day() as i32)
    }
}

impl From<(i32, u32, u32)> for CivilDate {
    fn from((year, month, day): (i32, u32, u32)) -> Self {
        let clamp = |v: u32| i32::try_from(v).unwrap_or(i32::MAX);
        Self::new(year, clamp(month), clamp(day))
    }
}

impl From<[i32; 3]> for CivilDate {
    fn from([year, month, day]: [i32; 3]) -> Self {
        Self::new(year, month, day)
    }
}
