// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! UTC offset and daylight-saving inference from two annual samples.
//!
//! No timezone rule database is consulted. The standard offset of a year is
//! taken as the smaller of the offsets observed at local noon on January 1
//! and July 1, and a date is in DST when its own noon offset differs from
//! that minimum.
//!
//! The heuristic assumes DST only ever *increases* the offset. It gives the
//! wrong standard offset for a zone whose summer offset is smaller than its
//! winter one, and that behaviour is kept as is.
//!
//! Every function is generic over [`chrono::TimeZone`]; the engine samples
//! [`chrono::Local`], the host's zone.

use chrono::{Datelike, NaiveDate, NaiveTime, Offset, TimeZone};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

const SECONDS_PER_HOUR: f64 = 3_600.0;

/// Timezone argument of a computation.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TimeZoneSpec {
    /// Infer the standard offset from the host zone.
    #[default]
    Auto,
    /// Fixed standard offset in hours east of UTC (fractions allowed).
    Hours(f64),
}

/// Daylight-saving argument of a computation.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum DstSpec {
    /// Infer DST from the host zone.
    #[default]
    Auto,
    /// Force DST on or off.
    Active(bool),
}

impl From<f64> for TimeZoneSpec {
    fn from(hours: f64) -> Self {
        Self::Hours(hours)
    }
}

impl From<bool> for DstSpec {
    fn from(active: bool) -> Self {
        Self::Active(active)
    }
}

/// Offset of `tz` from UTC at local civil noon of `date`, in hours.
///
/// An ambiguous noon resolves to its earliest mapping; a noon that falls in a
/// transition gap reads the offset in force at the same wall-clock instant
/// taken as UTC.
pub fn gmt_offset<Tz: TimeZone>(tz: &Tz, date: NaiveDate) -> f64 {
    let noon = date.and_time(NaiveTime::from_hms_opt(12, 0, 0).unwrap_or(NaiveTime::MIN));
    let seconds = match tz.from_local_datetime(&noon).earliest() {
        Some(local) => local.offset().fix().local_minus_utc(),
        None => tz.offset_from_utc_datetime(&noon).fix().local_minus_utc(),
    };
    seconds as f64 / SECONDS_PER_HOUR
}

/// Standard (non-DST) offset of `tz` for the year of `date`, in hours.
pub fn standard_offset<Tz: TimeZone>(tz: &Tz, date: NaiveDate) -> f64 {
    let january = gmt_offset(tz, first_of(date, 1));
    let july = gmt_offset(tz, first_of(date, 7));
    january.min(july)
}

/// Whether `date` observes daylight saving in `tz`.
pub fn is_dst<Tz: TimeZone>(tz: &Tz, date: NaiveDate) -> bool {
    gmt_offset(tz, date) != standard_offset(tz, date)
}

/// Effective offset in hours: the standard offset plus one hour under DST.
pub fn utc_offset<Tz: TimeZone>(
    tz: &Tz,
    date: NaiveDate,
    zone: TimeZoneSpec,
    dst: DstSpec,
) -> f64 {
    let standard = match zone {
        TimeZoneSpec::Auto => standard_offset(tz, date),
        TimeZoneSpec::Hours(hours) => hours,
    };
    let dst = match dst {
        DstSpec::Auto => is_dst(tz, date),
        DstSpec::Active(active) => active,
    };
    standard + if dst { 1.0 } else { 0.0 }
}

// January and July both have 31 days, so the month change cannot fail.
fn first_of(date: NaiveDate, month: u32) -> NaiveDate {
    date.with_day(1)
        .and_then(|d| d.with_month(month))
        .unwrap_or(date)
}
