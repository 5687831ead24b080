// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! The nine daily time markers and their output representations.
//!
//! [`Times<T>`] is a fixed record with one field per [`TimeName`]. Iteration
//! always follows [`TimeName::ALL`], which is also the output order.

use crate::angle::fix_hour;
use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

// ═══════════════════════════════════════════════════════════════════════════
// TimeName
// ═══════════════════════════════════════════════════════════════════════════

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TimeName {
    Imsak,
    Fajr,
    Sunrise,
    Dhuhr,
    Asr,
    Sunset,
    Maghrib,
    Isha,
    Midnight,
}

impl TimeName {
    /// Output order.
    pub const ALL: [TimeName; 9] = [
        TimeName::Imsak,
        TimeName::Fajr,
        TimeName::Sunrise,
        TimeName::Dhuhr,
        TimeName::Asr,
        TimeName::Sunset,
        TimeName::Maghrib,
        TimeName::Isha,
        TimeName::Midnight,
    ];

    /// Lower-case key, as used in configuration files.
    pub const fn key(self) -> &'static str {
        match self {
            TimeName::Imsak => "imsak",
            TimeName::Fajr => "fajr",
            TimeName::Sunrise => "sunrise",
            TimeName::Dhuhr => "dhuhr",
            TimeName::Asr => "asr",
            TimeName::Sunset => "sunset",
            TimeName::Maghrib => "maghrib",
            TimeName::Isha => "isha",
            TimeName::Midnight => "midnight",
        }
    }

    /// Display label.
    pub const fn label(self) -> &'static str {
        match self {
            TimeName::Imsak => "Imsak",
            TimeName::Fajr => "Fajr",
            TimeName::Sunrise => "Sunrise",
            TimeName::Dhuhr => "Dhuhr",
            TimeName::Asr => "Asr",
            TimeName::Sunset => "Sunset",
            TimeName::Maghrib => "Maghrib",
            TimeName::Isha => "Isha",
            TimeName::Midnight => "Midnight",
        }
    }
}

impl fmt::Display for TimeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for TimeName {
    type Err = Error;

    /// Accepts the key or the label.
    fn from_str(s: &str) -> Result<Self> {
        TimeName::ALL
            .into_iter()
            .find(|n| n.key() == s || n.label() == s)
            .ok_or_else(|| Error::UnknownTimeName(s.to_string()))
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Times<T>
// ═══════════════════════════════════════════════════════════════════════════

/// One value per time marker.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Times<T> {
    pub imsak: T,
    pub fajr: T,
    pub sunrise: T,
    pub dhuhr: T,
    pub asr: T,
    pub sunset: T,
    pub maghrib: T,
    pub isha: T,
    pub midnight: T,
}

impl<T> Times<T> {
    /// Builds a table by evaluating `f` for each name in output order.
    pub fn from_fn(mut f: impl FnMut(TimeName) -> T) -> Self {
        Self {
            imsak: f(TimeName::Imsak),
            fajr: f(TimeName::Fajr),
            sunrise: f(TimeName::Sunrise),
            dhuhr: f(TimeName::Dhuhr),
            asr: f(TimeName::Asr),
            sunset: f(TimeName::Sunset),
            maghrib: f(TimeName::Maghrib),
            isha: f(TimeName::Isha),
            midnight: f(TimeName::Midnight),
        }
    }

    pub fn get(&self, name: TimeName) -> &T {
        match name {
            TimeName::Imsak => &self.imsak,
            TimeName::Fajr => &self.fajr,
            TimeName::Sunrise => &self.sunrise,
            TimeName::Dhuhr => &self.dhuhr,
            TimeName::Asr => &self.asr,
            TimeName::Sunset => &self.sunset,
            TimeName::Maghrib => &self.maghrib,
            TimeName::Isha => &self.isha,
            TimeName::Midnight => &self.midnight,
        }
    }

    pub fn get_mut(&mut self, name: TimeName) -> &mut T {
        match name {
            TimeName::Imsak => &mut self.imsak,
            TimeName::Fajr => &mut self.fajr,
            TimeName::Sunrise => &mut self.sunrise,
            TimeName::Dhuhr => &mut self.dhuhr,
            TimeName::Asr => &mut self.asr,
            TimeName::Sunset => &mut self.sunset,
            TimeName::Maghrib => &mut self.maghrib,
            TimeName::Isha => &mut self.isha,
            TimeName::Midnight => &mut self.midnight,
        }
    }

    /// `(name, value)` pairs in output order.
    pub fn iter(&self) -> impl Iterator<Item = (TimeName, &T)> + '_ {
        TimeName::ALL.into_iter().map(move |name| (name, self.get(name)))
    }

    pub fn map<U>(&self, mut f: impl FnMut(TimeName, &T) -> U) -> Times<U> {
        Times::from_fn(|name| f(name, self.get(name)))
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Output formats
// ═══════════════════════════════════════════════════════════════════════════

/// Output representation of a computed time.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TimeFormat {
    /// `HH:MM`, zero padded.
    #[cfg_attr(feature = "serde", serde(rename = "24h"))]
    Hours24,
    /// `h:MM am|pm`.
    #[default]
    #[cfg_attr(feature = "serde", serde(rename = "12h"))]
    Hours12,
    /// `h:MM` without suffix.
    #[cfg_attr(feature = "serde", serde(rename = "12hNS"))]
    Hours12NoSuffix,
    /// Hours since local midnight as a float.
    Float,
}

impl FromStr for TimeFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "24h" => Ok(TimeFormat::Hours24),
            "12h" => Ok(TimeFormat::Hours12),
            "12hNS" => Ok(TimeFormat::Hours12NoSuffix),
            "Float" => Ok(TimeFormat::Float),
            other => Err(Error::UnknownTimeFormat(other.to_string())),
        }
    }
}

/// Default marker for a time the sun never reaches.
pub const INVALID_TIME: &str = "-----";

/// A formatted time.
#[derive(Debug, Clone, PartialEq)]
pub enum FormattedTime {
    Clock(String),
    Float(f64),
    /// The sun never reaches the required angle; displays as the engine's
    /// invalid marker.
    Invalid(String),
}

impl FormattedTime {
    pub fn is_valid(&self) -> bool {
        !matches!(self, FormattedTime::Invalid(_))
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            FormattedTime::Float(v) => Some(*v),
            _ => None,
        }
    }
}

impl fmt::Display for FormattedTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormattedTime::Clock(s) | FormattedTime::Invalid(s) => f.write_str(s),
            FormattedTime::Float(v) => write!(f, "{v}"),
        }
    }
}

/// Clock suffixes and invalid marker used when rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Labels {
    pub am: String,
    pub pm: String,
    pub invalid: String,
}

impl Default for Labels {
    fn default() -> Self {
        Self {
            am: "am".to_string(),
            pm: "pm".to_string(),
            invalid: INVALID_TIME.to_string(),
        }
    }
}

/// Renders an hour value in `format`.
///
/// Clock formats round to the nearest minute and wrap into one day; `Float`
/// passes the value through untouched. Non-finite hours count as unreachable.
pub fn format_time(time: Option<f64>, format: TimeFormat, labels: &Labels) -> FormattedTime {
    let Some(time) = time.filter(|t| t.is_finite()) else {
        return FormattedTime::Invalid(labels.invalid.clone());
    };
    if format == TimeFormat::Float {
        return FormattedTime::Float(time);
    }

    let time = fix_hour(time + 0.5 / 60.0);
    let hours = time.floor() as u32;
    let minutes = ((time - hours as f64) * 60.0).floor() as u32;

    FormattedTime::Clock(match format {
        TimeFormat::Hours24 => format!("{hours:02}:{minutes:02}"),
        TimeFormat::Hours12 => {
            let suffix = if hours < 12 { &labels.am } else { &labels.pm };
            format!("{}:{minutes:02} {suffix}", twelve_hour(hours))
        }
        _ => format!("{}:{minutes:02}", twelve_hour(hours)),
    })
}

#[inline]
fn twelve_hour(hours: u32) -> u32 {
    (hours + 12 - 1) % 12 + 1
}
