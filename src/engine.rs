// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! # Prayer time engine
//!
//! [`PrayerTimes`] owns a convention ([`Method`]), the active [`Settings`]
//! and per-time minute offsets. Each call to [`PrayerTimes::times`] runs the
//! same pipeline:
//!
//! 1. resolve the UTC offset (fixed or inferred from the zone);
//! 2. solve every time from the sun's position, refining from fixed seeds
//!    for a small number of rounds;
//! 3. shift from local solar time to civil time and apply the high-latitude
//!    rule and minute-based settings;
//! 4. derive Midnight, add offsets, render.
//!
//! A time whose sun angle is never reached is `None` from the solver onward
//! and renders as [`FormattedTime::Invalid`].
//!
//! ```rust
//! use chrono::NaiveDate;
//! use miqat::{DstSpec, Method, PrayerTimes, TimeFormat, TimeZoneSpec};
//!
//! let engine = PrayerTimes::new(Method::MWL);
//! let date = NaiveDate::from_ymd_opt(2024, 3, 20).unwrap();
//! let times = engine.times(
//!     date,
//!     [9.072264, 7.491302].into(),
//!     TimeZoneSpec::Hours(1.0),
//!     DstSpec::Active(false),
//!     Some(TimeFormat::Hours24),
//! );
//! assert!(times.dhuhr.is_valid());
//! ```

use chrono::{Local, NaiveDate, TimeZone};
use log::{debug, trace, warn};
use qtty::Days;

use crate::angle::{arccos, arccot, cos, fix_hour, sin, tan};
use crate::julian::{CivilDate, JulianDate};
use crate::method::{
    registry, AngleSpec, CalculationMethod, HighLatRule, Method, Rule, Settings, SettingsPatch,
};
use crate::solar::{sun_position, SolarPosition};
use crate::times::{format_time, FormattedTime, Labels, TimeFormat, Times};
use crate::timezone::{utc_offset, DstSpec, TimeZoneSpec};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Partial update of the per-time minute offsets.
pub type OffsetsPatch = Times<Option<f64>>;

/// Seed hours for the first solving round. Midnight is never solved; its
/// seed only keeps the table complete until it is derived.
const SEEDS: Times<f64> = Times {
    imsak: 5.0,
    fajr: 5.0,
    sunrise: 6.0,
    dhuhr: 12.0,
    asr: 13.0,
    sunset: 18.0,
    maghrib: 18.0,
    isha: 18.0,
    midnight: 24.0,
};

// ═══════════════════════════════════════════════════════════════════════════
// Observer
// ═══════════════════════════════════════════════════════════════════════════

/// Observer position. Longitude is east-positive, elevation in meters.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub elevation: f64,
}

impl Coordinates {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            elevation: 0.0,
        }
    }

    pub const fn with_elevation(mut self, elevation: f64) -> Self {
        self.elevation = elevation;
        self
    }
}

impl From<[f64; 2]> for Coordinates {
    fn from([lat, lng]: [f64; 2]) -> Self {
        Self::new(lat, lng)
    }
}

impl From<[f64; 3]> for Coordinates {
    fn from([lat, lng, elv]: [f64; 3]) -> Self {
        Self::new(lat, lng).with_elevation(elv)
    }
}

impl From<(f64, f64)> for Coordinates {
    fn from((lat, lng): (f64, f64)) -> Self {
        Self::new(lat, lng)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Direction {
    /// Before solar noon.
    Ccw,
    /// After solar noon.
    Cw,
}

/// Per-call solving context: where, when, and in which zone.
#[derive(Debug, Copy, Clone)]
struct Observer {
    coords: Coordinates,
    time_zone: f64,
    /// Julian Day of local midnight, shifted by longitude.
    jdate: JulianDate,
}

impl Observer {
    fn new(date: NaiveDate, coords: Coordinates, time_zone: f64) -> Self {
        let jdate = JulianDate::from(date) - Days::new(coords.longitude / (15.0 * 24.0));
        Self {
            coords,
            time_zone,
            jdate,
        }
    }

    #[inline]
    fn sun(&self, hours: f64) -> SolarPosition {
        sun_position(self.jdate + Days::new(hours / 24.0))
    }

    /// Solar noon in local solar hours.
    fn mid_day(&self, hours: Option<f64>) -> Option<f64> {
        hours.map(|h| fix_hour(12.0 - self.sun(h).equation))
    }

    /// Time at which the sun is `angle` degrees below the horizon.
    fn sun_angle_time(
        &self,
        angle: Option<f64>,
        hours: Option<f64>,
        direction: Direction,
    ) -> Option<f64> {
        let (angle, hours) = (angle?, hours?);
        let lat = self.coords.latitude;
        let decl = self.sun(hours).declination;
        let noon = self.mid_day(Some(hours))?;

        let cos_h = (-sin(angle) - sin(decl) * sin(lat)) / (cos(decl) * cos(lat));
        if !(-1.0..=1.0).contains(&cos_h) {
            return None;
        }
        let t = arccos(cos_h) / 15.0;
        Some(match direction {
            Direction::Ccw => noon - t,
            Direction::Cw => noon + t,
        })
    }

    /// Time at which an object's shadow is `factor` times its length plus
    /// the noon shadow.
    fn asr_time(&self, factor: Option<f64>, hours: Option<f64>) -> Option<f64> {
        let (factor, h) = (factor?, hours?);
        let decl = self.sun(h).declination;
        let angle = -arccot(factor + tan((self.coords.latitude - decl).abs()));
        self.sun_angle_time(Some(angle), hours, Direction::Cw)
    }

    /// Sunrise/sunset depression: refraction plus horizon dip at elevation.
    fn rise_set_angle(&self) -> f64 {
        0.833 + 0.0347 * self.coords.elevation.sqrt()
    }
}

/// Hours from `from` forward to `to`, wrapped into one day.
#[inline]
fn time_diff(from: Option<f64>, to: Option<f64>) -> Option<f64> {
    Some(fix_hour(to? - from?))
}

// ═══════════════════════════════════════════════════════════════════════════
// PrayerTimes
// ═══════════════════════════════════════════════════════════════════════════

/// The prayer time calculator.
///
/// Configuration changes take `&mut self`; computing takes `&self` and keeps
/// no per-call state on the instance.
#[derive(Debug, Clone)]
pub struct PrayerTimes {
    method: Method,
    settings: Settings,
    offsets: Times<f64>,
    time_format: TimeFormat,
    labels: Labels,
    iterations: u32,
}

impl Default for PrayerTimes {
    fn default() -> Self {
        Self::new(Method::default())
    }
}

impl PrayerTimes {
    pub fn new(method: Method) -> Self {
        let mut settings = Settings::default();
        settings.apply(method.params());
        Self {
            method,
            settings,
            offsets: Times::default(),
            time_format: TimeFormat::default(),
            labels: Labels::default(),
            iterations: 1,
        }
    }

    /// Builds an engine from a method id, falling back to the default
    /// convention when the id is unknown.
    pub fn from_name(name: &str) -> Self {
        match name.parse() {
            Ok(method) => Self::new(method),
            Err(err) => {
                warn!("{err}; using {}", Method::default());
                Self::default()
            }
        }
    }

    // ── configuration ─────────────────────────────────────────────────

    /// Applies a convention over the current settings.
    ///
    /// Fields the convention does not define keep their current value.
    pub fn set_method(&mut self, method: Method) {
        self.adjust(*method.params());
        self.method = method;
    }

    /// Like [`set_method`](Self::set_method); unknown ids are ignored.
    pub fn set_method_by_name(&mut self, name: &str) {
        match name.parse() {
            Ok(method) => self.set_method(method),
            Err(err) => warn!("{err}; keeping {}", self.method),
        }
    }

    pub fn adjust(&mut self, patch: SettingsPatch) {
        self.settings.apply(&patch);
    }

    /// Overwrites the minute offsets present in `patch`.
    pub fn tune(&mut self, patch: OffsetsPatch) {
        for (name, offset) in patch.iter() {
            if let Some(minutes) = offset {
                *self.offsets.get_mut(name) = *minutes;
            }
        }
    }

    /// Number of refinement rounds. One round is within a minute almost
    /// everywhere outside the polar circles.
    pub fn set_iterations(&mut self, rounds: u32) {
        self.iterations = rounds;
    }

    /// Format used when a call passes no explicit format.
    pub fn set_time_format(&mut self, format: TimeFormat) {
        self.time_format = format;
    }

    pub fn set_suffixes(&mut self, am: impl Into<String>, pm: impl Into<String>) {
        self.labels.am = am.into();
        self.labels.pm = pm.into();
    }

    pub fn set_invalid_marker(&mut self, marker: impl Into<String>) {
        self.labels.invalid = marker.into();
    }

    // ── accessors ─────────────────────────────────────────────────────

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn offsets(&self) -> &Times<f64> {
        &self.offsets
    }

    pub fn time_format(&self) -> TimeFormat {
        self.time_format
    }

    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    /// The full convention table.
    pub fn defaults(&self) -> &'static [CalculationMethod] {
        registry()
    }

    // ── computation ───────────────────────────────────────────────────

    /// Prayer times for `date`, resolving `Auto` zone arguments against the
    /// host timezone.
    ///
    /// `date` is a [`NaiveDate`], a `(year, month, day)` tuple or a
    /// `[year, month, day]` array. Overflowing components roll over as in
    /// [`CivilDate`]; a date chrono cannot represent yields no times at all.
    pub fn times(
        &self,
        date: impl Into<CivilDate>,
        coords: Coordinates,
        zone: TimeZoneSpec,
        dst: DstSpec,
        format: Option<TimeFormat>,
    ) -> Times<FormattedTime> {
        self.times_in(&Local, date, coords, zone, dst, format)
    }

    /// Prayer times for `date`, resolving `Auto` zone arguments against `tz`.
    pub fn times_in<Tz: TimeZone>(
        &self,
        tz: &Tz,
        date: impl Into<CivilDate>,
        coords: Coordinates,
        zone: TimeZoneSpec,
        dst: DstSpec,
        format: Option<TimeFormat>,
    ) -> Times<FormattedTime> {
        let format = format.unwrap_or(self.time_format);
        self.hours_in(tz, date, coords, zone, dst)
            .map(|_, time| self.formatted_time(*time, format))
    }

    /// Unformatted hours since local midnight; `None` where the sun never
    /// reaches the required angle.
    pub fn hours_in<Tz: TimeZone>(
        &self,
        tz: &Tz,
        date: impl Into<CivilDate>,
        coords: Coordinates,
        zone: TimeZoneSpec,
        dst: DstSpec,
    ) -> Times<Option<f64>> {
        let civil = date.into();
        let Some(date) = civil.normalize() else {
            warn!("{civil:?} is outside the supported calendar range");
            return Times::default();
        };
        let time_zone = utc_offset(tz, date, zone, dst);
        let observer = Observer::new(date, coords, time_zone);
        debug!(
            "{date} at ({}, {}): UTC{time_zone:+}, {}, method {}",
            coords.latitude, coords.longitude, observer.jdate, self.method
        );
        self.compute_times(&observer)
    }

    /// Renders one hour value with this engine's labels.
    pub fn formatted_time(&self, time: Option<f64>, format: TimeFormat) -> FormattedTime {
        format_time(time, format, &self.labels)
    }

    fn compute_times(&self, observer: &Observer) -> Times<Option<f64>> {
        let mut times = SEEDS.map(|_, h| Some(*h));
        for round in 1..=self.iterations {
            times = self.compute_prayer_times(observer, &times);
            trace!("round {round}: {times:?}");
        }

        let mut times = self.adjust_times(observer, times);
        times.midnight = self.midnight(&times);
        self.tune_times(times)
    }

    /// One solving round, seeded by the previous round's hours.
    fn compute_prayer_times(&self, obs: &Observer, seeds: &Times<Option<f64>>) -> Times<Option<f64>> {
        let s = &self.settings;
        let rise_set = Some(obs.rise_set_angle());
        Times {
            imsak: obs.sun_angle_time(s.imsak.value(), seeds.imsak, Direction::Ccw),
            fajr: obs.sun_angle_time(s.fajr.value(), seeds.fajr, Direction::Ccw),
            sunrise: obs.sun_angle_time(rise_set, seeds.sunrise, Direction::Ccw),
            dhuhr: obs.mid_day(seeds.dhuhr),
            asr: obs.asr_time(s.asr.asr_factor(), seeds.asr),
            sunset: obs.sun_angle_time(rise_set, seeds.sunset, Direction::Cw),
            maghrib: obs.sun_angle_time(s.maghrib.value(), seeds.maghrib, Direction::Cw),
            isha: obs.sun_angle_time(s.isha.value(), seeds.isha, Direction::Cw),
            midnight: seeds.midnight,
        }
    }

    /// Local solar time → civil time, then high-latitude and minute rules.
    fn adjust_times(&self, obs: &Observer, times: Times<Option<f64>>) -> Times<Option<f64>> {
        let s = &self.settings;
        let shift = obs.time_zone - obs.coords.longitude / 15.0;
        let mut times = times.map(|_, t| t.map(|h| h + shift));

        if s.high_lats != HighLatRule::None {
            times = self.adjust_high_lats(times);
        }

        if let AngleSpec::Minutes(m) = s.imsak {
            times.imsak = times.fajr.map(|t| t - m / 60.0);
        }
        if let AngleSpec::Minutes(m) = s.maghrib {
            times.maghrib = times.sunset.map(|t| t + m / 60.0);
        }
        if let AngleSpec::Minutes(m) = s.isha {
            times.isha = times.maghrib.map(|t| t + m / 60.0);
        }
        times.dhuhr = times
            .dhuhr
            .zip(s.dhuhr.value())
            .map(|(t, m)| t + m / 60.0);

        times
    }

    /// Bounds the twilight times by a portion of the night.
    fn adjust_high_lats(&self, mut times: Times<Option<f64>>) -> Times<Option<f64>> {
        let s = &self.settings;
        let night = time_diff(times.sunset, times.sunrise);

        times.imsak =
            self.adjust_hl_time(times.imsak, times.sunrise, s.imsak.value(), night, Direction::Ccw);
        times.fajr =
            self.adjust_hl_time(times.fajr, times.sunrise, s.fajr.value(), night, Direction::Ccw);
        times.isha =
            self.adjust_hl_time(times.isha, times.sunset, s.isha.value(), night, Direction::Cw);
        times.maghrib = self.adjust_hl_time(
            times.maghrib,
            times.sunset,
            s.maghrib.value(),
            night,
            Direction::Cw,
        );
        times
    }

    fn adjust_hl_time(
        &self,
        time: Option<f64>,
        base: Option<f64>,
        angle: Option<f64>,
        night: Option<f64>,
        direction: Direction,
    ) -> Option<f64> {
        let portion = self
            .settings
            .high_lats
            .night_fraction(angle)
            .zip(night)
            .map(|(fraction, night)| fraction * night);
        let diff = match direction {
            Direction::Ccw => time_diff(time, base),
            Direction::Cw => time_diff(base, time),
        };
        let too_far = matches!((diff, portion), (Some(d), Some(p)) if d > p);

        if time.is_some() && !too_far {
            return time;
        }
        let (base, portion) = (base?, portion?);
        Some(match direction {
            Direction::Ccw => base - portion,
            Direction::Cw => base + portion,
        })
    }

    /// Halfway from sunset to sunrise, or to Fajr for the Jafari rule.
    fn midnight(&self, times: &Times<Option<f64>>) -> Option<f64> {
        let until = match self.settings.midnight {
            AngleSpec::Named(Rule::Jafari) => times.fajr,
            _ => times.sunrise,
        };
        let sunset = times.sunset?;
        time_diff(Some(sunset), until).map(|span| sunset + span / 2.0)
    }

    fn tune_times(&self, times: Times<Option<f64>>) -> Times<Option<f64>> {
        times.map(|name, t| t.map(|h| h + self.offsets.get(name) / 60.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::times::TimeName;
    use chrono::FixedOffset;

    const ABUJA: Coordinates = Coordinates::new(9.072264, 7.491302);

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn utc() -> FixedOffset {
        FixedOffset::east_opt(0).unwrap()
    }

    fn hours(engine: &PrayerTimes, date: NaiveDate, coords: Coordinates, zone: f64) -> Times<Option<f64>> {
        engine.hours_in(&utc(), date, coords, TimeZoneSpec::Hours(zone), DstSpec::Active(false))
    }

    fn all(times: &Times<Option<f64>>) -> Times<f64> {
        times.map(|name, t| t.unwrap_or_else(|| panic!("{name} unreachable")))
    }

    #[test]
    fn constructor_applies_method_over_base_settings() {
        let engine = PrayerTimes::new(Method::Makkah);
        assert_eq!(engine.method(), Method::Makkah);
        assert_eq!(engine.settings().fajr, AngleSpec::Degrees(18.5));
        assert_eq!(engine.settings().isha, AngleSpec::Minutes(90.0));
        assert_eq!(engine.settings().imsak, AngleSpec::Minutes(10.0));
        assert_eq!(engine.settings().high_lats, HighLatRule::NightMiddle);
        assert_eq!(*engine.offsets(), Times::default());
    }

    #[test]
    fn from_name_falls_back_to_default() {
        assert_eq!(PrayerTimes::from_name("ISNA").method(), Method::ISNA);
        assert_eq!(PrayerTimes::from_name("Atlantis").method(), Method::Egypt);
    }

    #[test]
    fn unknown_method_name_is_a_no_op() {
        let mut engine = PrayerTimes::new(Method::Karachi);
        engine.adjust(SettingsPatch::new().asr(Rule::Hanafi));
        let before = *engine.settings();
        engine.set_method_by_name("Atlantis");
        assert_eq!(engine.method(), Method::Karachi);
        assert_eq!(*engine.settings(), before);
    }

    #[test]
    fn set_method_overwrites_without_reset() {
        let mut engine = PrayerTimes::new(Method::Jafari);
        engine.adjust(SettingsPatch::new().imsak(AngleSpec::Minutes(15.0)));
        engine.set_method(Method::MWL);
        assert_eq!(engine.method(), Method::MWL);
        assert_eq!(engine.settings().imsak, AngleSpec::Minutes(15.0));
        assert_eq!(engine.settings().maghrib, AngleSpec::Minutes(0.0));
        assert_eq!(engine.settings().midnight, AngleSpec::Named(Rule::Standard));
    }

    #[test]
    fn tune_overwrites_only_given_keys() {
        let mut engine = PrayerTimes::default();
        engine.tune(OffsetsPatch {
            fajr: Some(2.0),
            isha: Some(-3.0),
            ..Default::default()
        });
        engine.tune(OffsetsPatch {
            isha: Some(1.0),
            ..Default::default()
        });
        assert_eq!(engine.offsets().fajr, 2.0);
        assert_eq!(engine.offsets().isha, 1.0);
        assert_eq!(engine.offsets().asr, 0.0);
    }

    #[test]
    fn abuja_times_are_ordered() {
        let engine = PrayerTimes::new(Method::MWL);
        let t = all(&hours(&engine, ymd(2024, 3, 20), ABUJA, 1.0));
        let order = [
            t.imsak, t.fajr, t.sunrise, t.dhuhr, t.asr, t.sunset, t.maghrib, t.isha,
        ];
        assert!(order.windows(2).all(|w| w[0] <= w[1]), "{t:?}");
        // Local noon in WAT sits about 37 minutes after 12:00.
        assert!((12.5..12.75).contains(&t.dhuhr), "dhuhr = {}", t.dhuhr);
        assert!((t.imsak - (t.fajr - 10.0 / 60.0)).abs() < 1e-12);
        assert_eq!(t.maghrib, t.sunset);
    }

    #[test]
    fn dhuhr_is_method_independent_on_the_equator() {
        let date = ymd(2024, 3, 20);
        let coords = Coordinates::new(0.0, 0.0);
        let dhuhr: Vec<f64> = Method::ALL
            .into_iter()
            .map(|m| all(&hours(&PrayerTimes::new(m), date, coords, 0.0)).dhuhr)
            .collect();
        assert!(dhuhr.windows(2).all(|w| w[0] == w[1]));

        let observer = Observer::new(date, coords, 0.0);
        let expected = fix_hour(12.0 - observer.sun(12.0).equation);
        assert!((dhuhr[0] - expected).abs() < 1e-9);
    }

    #[test]
    fn sunrise_and_sunset_are_method_independent() {
        let date = ymd(2024, 10, 1);
        let a = all(&hours(&PrayerTimes::new(Method::ISNA), date, ABUJA, 1.0));
        let b = all(&hours(&PrayerTimes::new(Method::Tehran), date, ABUJA, 1.0));
        assert_eq!(a.sunrise, b.sunrise);
        assert_eq!(a.sunset, b.sunset);
    }

    #[test]
    fn hanafi_only_moves_asr() {
        let date = ymd(2024, 8, 10);
        let coords = Coordinates::new(33.7, 73.0);
        let standard = PrayerTimes::new(Method::Karachi);
        let mut hanafi = standard.clone();
        hanafi.adjust(SettingsPatch::new().asr(Rule::Hanafi));

        let a = all(&hours(&standard, date, coords, 5.0));
        let b = all(&hours(&hanafi, date, coords, 5.0));
        for name in TimeName::ALL {
            if name == TimeName::Asr {
                assert!(b.asr > a.asr + 0.5);
            } else {
                assert_eq!(a.get(name), b.get(name), "{name} moved");
            }
        }
    }

    #[test]
    fn fajr_unreachable_at_high_latitude_is_clamped_to_half_night() {
        let date = ymd(2024, 5, 15);
        let coords = Coordinates::new(66.0, 25.0);
        let engine = PrayerTimes::new(Method::MWL);

        let observer = Observer::new(date, coords, 2.0);
        let raw = engine.compute_prayer_times(&observer, &SEEDS.map(|_, h| Some(*h)));
        assert_eq!(raw.fajr, None);
        assert_eq!(raw.isha, None);

        let t = all(&hours(&engine, date, coords, 2.0));
        let night = fix_hour(t.sunrise - t.sunset);
        assert!((t.fajr - (t.sunrise - night / 2.0)).abs() < 1e-9);
        assert!((t.isha - (t.sunset + night / 2.0)).abs() < 1e-9);
        assert!(t.fajr < t.sunrise);
    }

    #[test]
    fn without_high_lat_rule_unreachable_times_are_invalid() {
        let date = ymd(2024, 5, 15);
        let coords = Coordinates::new(66.0, 25.0);
        let mut engine = PrayerTimes::new(Method::MWL);
        engine.adjust(SettingsPatch::new().high_lats(HighLatRule::None));

        let t = engine.times_in(
            &utc(),
            date,
            coords,
            TimeZoneSpec::Hours(2.0),
            DstSpec::Active(false),
            Some(TimeFormat::Hours24),
        );
        assert_eq!(t.fajr, FormattedTime::Invalid("-----".into()));
        assert_eq!(t.imsak.to_string(), "-----");
        assert_eq!(t.isha.to_string(), "-----");
        assert!(t.sunrise.is_valid());
        assert!(t.dhuhr.is_valid());
    }

    #[test]
    fn one_seventh_rule_is_tighter_than_night_middle() {
        let date = ymd(2024, 5, 15);
        let coords = Coordinates::new(66.0, 25.0);
        let mut engine = PrayerTimes::new(Method::MWL);
        engine.adjust(SettingsPatch::new().high_lats(HighLatRule::OneSeventh));

        let t = all(&hours(&engine, date, coords, 2.0));
        let night = fix_hour(t.sunrise - t.sunset);
        assert!((t.fajr - (t.sunrise - night / 7.0)).abs() < 1e-9);
    }

    #[test]
    fn angle_based_rule_uses_the_fajr_angle() {
        let date = ymd(2024, 5, 15);
        let coords = Coordinates::new(66.0, 25.0);
        let mut engine = PrayerTimes::new(Method::MWL);
        engine.adjust(SettingsPatch::new().high_lats(HighLatRule::AngleBased));

        let t = all(&hours(&engine, date, coords, 2.0));
        let night = fix_hour(t.sunrise - t.sunset);
        assert!((t.fajr - (t.sunrise - 18.0 / 60.0 * night)).abs() < 1e-9);
        assert!((t.isha - (t.sunset + 17.0 / 60.0 * night)).abs() < 1e-9);
    }

    #[test]
    fn minute_based_isha_follows_maghrib() {
        let engine = PrayerTimes::new(Method::Makkah);
        let t = all(&hours(&engine, ymd(2024, 6, 1), Coordinates::new(21.42, 39.83), 3.0));
        assert!((t.isha - (t.maghrib + 1.5)).abs() < 1e-12);
    }

    #[test]
    fn angle_based_maghrib_comes_after_sunset() {
        let engine = PrayerTimes::new(Method::Tehran);
        let t = all(&hours(&engine, ymd(2024, 6, 1), Coordinates::new(35.69, 51.42), 3.5));
        assert!(t.maghrib > t.sunset + 0.2);
        assert!(t.isha > t.maghrib);
    }

    #[test]
    fn jafari_midnight_is_halfway_to_fajr() {
        let date = ymd(2024, 1, 10);
        let coords = Coordinates::new(34.64, 50.88);
        let jafari = all(&hours(&PrayerTimes::new(Method::Jafari), date, coords, 3.5));
        let expected = jafari.sunset + fix_hour(jafari.fajr - jafari.sunset) / 2.0;
        assert!((jafari.midnight - expected).abs() < 1e-12);

        let mut standard = PrayerTimes::new(Method::Jafari);
        standard.adjust(SettingsPatch::new().midnight(Rule::Standard));
        let t = all(&hours(&standard, date, coords, 3.5));
        let expected = t.sunset + fix_hour(t.sunrise - t.sunset) / 2.0;
        assert!((t.midnight - expected).abs() < 1e-12);
        assert!(t.midnight > jafari.midnight);
    }

    #[test]
    fn offsets_shift_single_times() {
        let date = ymd(2024, 3, 20);
        let plain = all(&hours(&PrayerTimes::new(Method::MWL), date, ABUJA, 1.0));
        let mut engine = PrayerTimes::new(Method::MWL);
        engine.tune(OffsetsPatch {
            dhuhr: Some(3.0),
            midnight: Some(-6.0),
            ..Default::default()
        });
        let tuned = all(&hours(&engine, date, ABUJA, 1.0));
        assert!((tuned.dhuhr - plain.dhuhr - 0.05).abs() < 1e-12);
        assert!((tuned.midnight - plain.midnight + 0.1).abs() < 1e-12);
        assert_eq!(tuned.asr, plain.asr);
    }

    #[test]
    fn dhuhr_minutes_setting_is_added() {
        let date = ymd(2024, 3, 20);
        let plain = all(&hours(&PrayerTimes::new(Method::MWL), date, ABUJA, 1.0));
        let mut engine = PrayerTimes::new(Method::MWL);
        engine.adjust(SettingsPatch::new().dhuhr(AngleSpec::Minutes(1.0)));
        let t = all(&hours(&engine, date, ABUJA, 1.0));
        assert!((t.dhuhr - plain.dhuhr - 1.0 / 60.0).abs() < 1e-12);
    }

    #[test]
    fn named_spec_in_a_numeric_field_poisons_that_time() {
        let mut engine = PrayerTimes::new(Method::MWL);
        engine.adjust(
            SettingsPatch::new()
                .fajr(Rule::Hanafi)
                .high_lats(HighLatRule::None),
        );
        let t = hours(&engine, ymd(2024, 3, 20), ABUJA, 1.0);
        assert_eq!(t.fajr, None);
        // Imsak is anchored to Fajr.
        assert_eq!(t.imsak, None);
        assert!(t.isha.is_some());
    }

    #[test]
    fn non_finite_minutes_render_invalid() {
        let mut engine = PrayerTimes::new(Method::MWL);
        engine.adjust(SettingsPatch::new().isha(AngleSpec::Minutes(f64::NAN)));
        let t = engine.times_in(
            &utc(),
            ymd(2024, 3, 20),
            ABUJA,
            TimeZoneSpec::Hours(1.0),
            DstSpec::Active(false),
            Some(TimeFormat::Hours24),
        );
        assert_eq!(t.isha, FormattedTime::Invalid("-----".into()));
        assert!(t.maghrib.is_valid());
        assert!(t.midnight.is_valid());
    }

    #[test]
    fn reachable_but_distant_times_are_clamped() {
        let date = ymd(2024, 6, 21);
        let coords = Coordinates::new(50.0, 0.0);
        let mut engine = PrayerTimes::new(Method::ISNA);
        engine.adjust(SettingsPatch::new().high_lats(HighLatRule::None));
        let raw = all(&hours(&engine, date, coords, 0.0));
        engine.adjust(SettingsPatch::new().high_lats(HighLatRule::OneSeventh));
        let t = all(&hours(&engine, date, coords, 0.0));

        let night = fix_hour(t.sunrise - t.sunset);
        assert!(raw.fajr < t.fajr, "raw {} clamped {}", raw.fajr, t.fajr);
        assert!((t.fajr - (t.sunrise - night / 7.0)).abs() < 1e-9);
        assert!(raw.isha > t.isha);
        assert!((t.isha - (t.sunset + night / 7.0)).abs() < 1e-9);
        assert_eq!(raw.sunrise, t.sunrise);
        assert_eq!(raw.sunset, t.sunset);
    }

    #[test]
    fn times_within_the_night_portion_are_kept() {
        let date = ymd(2024, 12, 21);
        let coords = Coordinates::new(55.0, 0.0);
        let corrected = all(&hours(&PrayerTimes::new(Method::MWL), date, coords, 0.0));
        let mut engine = PrayerTimes::new(Method::MWL);
        engine.adjust(SettingsPatch::new().high_lats(HighLatRule::None));
        let raw = all(&hours(&engine, date, coords, 0.0));
        assert_eq!(corrected, raw);
    }

    #[test]
    fn dates_accept_components_and_roll_over() {
        let engine = PrayerTimes::new(Method::MWL);
        let zone = TimeZoneSpec::Hours(1.0);
        let dst = DstSpec::Active(false);
        let from_naive = hours(&engine, ymd(2024, 3, 1), ABUJA, 1.0);
        assert_eq!(engine.hours_in(&utc(), (2024, 3, 1), ABUJA, zone, dst), from_naive);
        assert_eq!(engine.hours_in(&utc(), [2024, 2, 30], ABUJA, zone, dst), from_naive);
    }

    #[test]
    fn unrepresentable_date_yields_no_times() {
        let engine = PrayerTimes::new(Method::MWL);
        let t = engine.hours_in(
            &utc(),
            [i32::MAX, 1, 1],
            ABUJA,
            TimeZoneSpec::Hours(0.0),
            DstSpec::Active(false),
        );
        assert_eq!(t, Times::default());
    }

    #[test]
    fn extra_rounds_move_times_by_seconds() {
        let date = ymd(2024, 12, 1);
        let coords = Coordinates::new(51.5, -0.13);
        let once = all(&hours(&PrayerTimes::new(Method::MWL), date, coords, 0.0));
        let mut engine = PrayerTimes::new(Method::MWL);
        engine.set_iterations(3);
        let thrice = all(&hours(&engine, date, coords, 0.0));
        for name in TimeName::ALL {
            let delta = (once.get(name) - thrice.get(name)).abs() * 60.0;
            assert!(delta < 1.0, "{name} moved {delta} min");
        }
    }

    #[test]
    fn elevation_widens_the_day() {
        let date = ymd(2024, 3, 20);
        let engine = PrayerTimes::new(Method::MWL);
        let low = all(&hours(&engine, date, ABUJA, 1.0));
        let high = all(&hours(&engine, date, ABUJA.with_elevation(1_000.0), 1.0));
        assert!(high.sunrise < low.sunrise);
        assert!(high.sunset > low.sunset);
        assert_eq!(high.fajr, low.fajr);
    }

    #[test]
    fn auto_zone_uses_the_given_timezone() {
        let engine = PrayerTimes::new(Method::MWL);
        let wat = FixedOffset::east_opt(3600).unwrap();
        let date = ymd(2024, 3, 20);
        let auto = engine.hours_in(&wat, date, ABUJA, TimeZoneSpec::Auto, DstSpec::Auto);
        let fixed = hours(&engine, date, ABUJA, 1.0);
        assert_eq!(auto, fixed);
    }

    #[test]
    fn explicit_format_does_not_change_the_default() {
        let mut engine = PrayerTimes::new(Method::MWL);
        let date = ymd(2024, 3, 20);
        let zone = TimeZoneSpec::Hours(1.0);
        let dst = DstSpec::Active(false);

        let t = engine.times_in(&utc(), date, ABUJA, zone, dst, None);
        assert!(t.asr.to_string().ends_with(" pm"));
        let t = engine.times_in(&utc(), date, ABUJA, zone, dst, Some(TimeFormat::Float));
        assert!(t.asr.as_float().is_some());
        assert_eq!(engine.time_format(), TimeFormat::Hours12);

        engine.set_time_format(TimeFormat::Hours24);
        engine.set_suffixes("AM", "PM");
        let t = engine.times_in(&utc(), date, ABUJA, zone, dst, None);
        assert!(!t.asr.to_string().contains('M'));
        let t = engine.times_in(&utc(), date, ABUJA, zone, dst, Some(TimeFormat::Hours12));
        assert!(t.asr.to_string().ends_with(" PM"));
    }

    #[test]
    fn custom_invalid_marker() {
        let mut engine = PrayerTimes::new(Method::MWL);
        engine.set_invalid_marker("n/a");
        assert_eq!(
            engine.formatted_time(None, TimeFormat::Hours24).to_string(),
            "n/a"
        );
    }

    #[test]
    fn defaults_expose_the_registry() {
        let engine = PrayerTimes::default();
        let names: Vec<_> = engine.defaults().iter().map(|m| m.name).collect();
        assert_eq!(names.len(), 7);
        assert!(names.contains(&"Muslim World League"));
    }
}
