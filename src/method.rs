// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Calculation conventions and the settings they produce.
//!
//! A convention fixes the sun depression angles (or minute offsets) used for
//! Fajr and Isha, plus a few per-school choices for Maghrib and Midnight.
//! The registry is built once: each raw entry is merged with
//! [`DEFAULT_PARAMS`] and the result is never mutated afterwards.
//!
//! | Id | Fajr | Isha | Maghrib | Midnight |
//! |----|------|------|---------|----------|
//! | [`Method::MWL`] | 18° | 17° | 0 min | Standard |
//! | [`Method::ISNA`] | 15° | 15° | 0 min | Standard |
//! | [`Method::Egypt`] | 19.5° | 17.5° | 0 min | Standard |
//! | [`Method::Makkah`] | 18.5° | 90 min | 0 min | Standard |
//! | [`Method::Karachi`] | 18° | 18° | 0 min | Standard |
//! | [`Method::Tehran`] | 17.7° | 14° | 4.5° | Jafari |
//! | [`Method::Jafari`] | 16° | 14° | 4° | Jafari |

use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

// ═══════════════════════════════════════════════════════════════════════════
// AngleSpec
// ═══════════════════════════════════════════════════════════════════════════

/// Symbolic policy names accepted in place of a number.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Rule {
    Jafari,
    Standard,
    Hanafi,
}

impl Rule {
    const ALL: [Rule; 3] = [Rule::Jafari, Rule::Standard, Rule::Hanafi];

    pub const fn as_str(self) -> &'static str {
        match self {
            Rule::Jafari => "Jafari",
            Rule::Standard => "Standard",
            Rule::Hanafi => "Hanafi",
        }
    }
}

/// The value of one time setting.
///
/// * `Degrees`: sun depression angle below the horizon (for Asr, the shadow
///   factor itself).
/// * `Minutes`: fixed interval from the anchoring time.
/// * `Named`: a symbolic rule. It has no numeric value, so a time that needs
///   one becomes unreachable.
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum AngleSpec {
    Degrees(f64),
    Minutes(f64),
    Named(Rule),
}

impl AngleSpec {
    /// Numeric reading of the setting, `None` for symbolic rules.
    #[inline]
    pub fn value(&self) -> Option<f64> {
        match *self {
            AngleSpec::Degrees(v) | AngleSpec::Minutes(v) => Some(v),
            AngleSpec::Named(_) => None,
        }
    }

    /// Shadow-length factor when this setting is used for Asr.
    pub fn asr_factor(&self) -> Option<f64> {
        match self {
            AngleSpec::Named(Rule::Standard) => Some(1.0),
            AngleSpec::Named(Rule::Hanafi) => Some(2.0),
            other => other.value(),
        }
    }
}

impl From<f64> for AngleSpec {
    fn from(degrees: f64) -> Self {
        AngleSpec::Degrees(degrees)
    }
}

impl From<Rule> for AngleSpec {
    fn from(rule: Rule) -> Self {
        AngleSpec::Named(rule)
    }
}

impl FromStr for AngleSpec {
    type Err = Error;

    /// Accepts `"18"`, `"19.5"`, `"90 min"`, `"10min"` or a rule name.
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if let Some(rule) = Rule::ALL.iter().find(|r| r.as_str() == s) {
            return Ok(AngleSpec::Named(*rule));
        }
        let number = |text: &str| {
            text.trim()
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| Error::InvalidAngleSpec(s.to_string()))
        };
        match s.strip_suffix("min") {
            Some(num) => number(num).map(AngleSpec::Minutes),
            None => number(s).map(AngleSpec::Degrees),
        }
    }
}

impl fmt::Display for AngleSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AngleSpec::Degrees(v) => write!(f, "{v}"),
            AngleSpec::Minutes(v) => write!(f, "{v} min"),
            AngleSpec::Named(rule) => f.write_str(rule.as_str()),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// High-latitude rule
// ═══════════════════════════════════════════════════════════════════════════

/// How Imsak, Fajr, Maghrib and Isha are bounded where the sun stays shallow.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum HighLatRule {
    /// No correction.
    None,
    /// `angle / 60` of the night.
    AngleBased,
    /// One seventh of the night.
    OneSeventh,
    /// Half of the night.
    #[default]
    NightMiddle,
}

impl HighLatRule {
    /// Fraction of the night allowed between the anchor and the time.
    pub fn night_fraction(self, angle: Option<f64>) -> Option<f64> {
        match self {
            HighLatRule::AngleBased => angle.map(|a| a / 60.0),
            HighLatRule::OneSeventh => Some(1.0 / 7.0),
            HighLatRule::NightMiddle | HighLatRule::None => Some(0.5),
        }
    }
}

impl FromStr for HighLatRule {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "None" => Ok(HighLatRule::None),
            "AngleBased" => Ok(HighLatRule::AngleBased),
            "OneSeventh" => Ok(HighLatRule::OneSeventh),
            "NightMiddle" => Ok(HighLatRule::NightMiddle),
            other => Err(Error::UnknownHighLatRule(other.to_string())),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Settings
// ═══════════════════════════════════════════════════════════════════════════

/// Active parameters of an engine.
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Settings {
    pub imsak: AngleSpec,
    pub fajr: AngleSpec,
    pub dhuhr: AngleSpec,
    pub asr: AngleSpec,
    pub maghrib: AngleSpec,
    pub isha: AngleSpec,
    pub midnight: AngleSpec,
    pub high_lats: HighLatRule,
}

impl Settings {
    /// Overwrites every field present in `patch`; the rest keep their value.
    pub fn apply(&mut self, patch: &SettingsPatch) {
        let SettingsPatch {
            imsak,
            fajr,
            dhuhr,
            asr,
            maghrib,
            isha,
            midnight,
            high_lats,
        } = *patch;
        if let Some(v) = imsak {
            self.imsak = v;
        }
        if let Some(v) = fajr {
            self.fajr = v;
        }
        if let Some(v) = dhuhr {
            self.dhuhr = v;
        }
        if let Some(v) = asr {
            self.asr = v;
        }
        if let Some(v) = maghrib {
            self.maghrib = v;
        }
        if let Some(v) = isha {
            self.isha = v;
        }
        if let Some(v) = midnight {
            self.midnight = v;
        }
        if let Some(v) = high_lats {
            self.high_lats = v;
        }
    }
}

impl Default for Settings {
    /// Base settings before any convention is applied.
    fn default() -> Self {
        Self {
            imsak: AngleSpec::Minutes(10.0),
            fajr: AngleSpec::Named(Rule::Standard),
            dhuhr: AngleSpec::Minutes(0.0),
            asr: AngleSpec::Named(Rule::Standard),
            maghrib: AngleSpec::Named(Rule::Standard),
            isha: AngleSpec::Named(Rule::Standard),
            midnight: AngleSpec::Named(Rule::Standard),
            high_lats: HighLatRule::NightMiddle,
        }
    }
}

/// A partial [`Settings`] update. Unset fields are left untouched.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SettingsPatch {
    pub imsak: Option<AngleSpec>,
    pub fajr: Option<AngleSpec>,
    pub dhuhr: Option<AngleSpec>,
    pub asr: Option<AngleSpec>,
    pub maghrib: Option<AngleSpec>,
    pub isha: Option<AngleSpec>,
    pub midnight: Option<AngleSpec>,
    pub high_lats: Option<HighLatRule>,
}

impl SettingsPatch {
    pub const fn new() -> Self {
        Self {
            imsak: None,
            fajr: None,
            dhuhr: None,
            asr: None,
            maghrib: None,
            isha: None,
            midnight: None,
            high_lats: None,
        }
    }

    pub fn imsak(mut self, v: impl Into<AngleSpec>) -> Self {
        self.imsak = Some(v.into());
        self
    }

    pub fn fajr(mut self, v: impl Into<AngleSpec>) -> Self {
        self.fajr = Some(v.into());
        self
    }

    pub fn dhuhr(mut self, v: impl Into<AngleSpec>) -> Self {
        self.dhuhr = Some(v.into());
        self
    }

    pub fn asr(mut self, v: impl Into<AngleSpec>) -> Self {
        self.asr = Some(v.into());
        self
    }

    pub fn maghrib(mut self, v: impl Into<AngleSpec>) -> Self {
        self.maghrib = Some(v.into());
        self
    }

    pub fn isha(mut self, v: impl Into<AngleSpec>) -> Self {
        self.isha = Some(v.into());
        self
    }

    pub fn midnight(mut self, v: impl Into<AngleSpec>) -> Self {
        self.midnight = Some(v.into());
        self
    }

    pub fn high_lats(mut self, rule: HighLatRule) -> Self {
        self.high_lats = Some(rule);
        self
    }

    /// Fills every unset field from `defaults`.
    const fn or(self, defaults: SettingsPatch) -> Self {
        Self {
            imsak: or(self.imsak, defaults.imsak),
            fajr: or(self.fajr, defaults.fajr),
            dhuhr: or(self.dhuhr, defaults.dhuhr),
            asr: or(self.asr, defaults.asr),
            maghrib: or(self.maghrib, defaults.maghrib),
            isha: or(self.isha, defaults.isha),
            midnight: or(self.midnight, defaults.midnight),
            high_lats: match self.high_lats {
                Some(v) => Some(v),
                None => defaults.high_lats,
            },
        }
    }
}

const fn or(a: Option<AngleSpec>, b: Option<AngleSpec>) -> Option<AngleSpec> {
    match a {
        Some(v) => Some(v),
        None => b,
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Method registry
// ═══════════════════════════════════════════════════════════════════════════

/// Identifier of a calculation convention.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Method {
    MWL,
    ISNA,
    #[default]
    Egypt,
    Makkah,
    Karachi,
    Tehran,
    Jafari,
}

impl Method {
    pub const ALL: [Method; 7] = [
        Method::MWL,
        Method::ISNA,
        Method::Egypt,
        Method::Makkah,
        Method::Karachi,
        Method::Tehran,
        Method::Jafari,
    ];

    pub const fn id(self) -> &'static str {
        match self {
            Method::MWL => "MWL",
            Method::ISNA => "ISNA",
            Method::Egypt => "Egypt",
            Method::Makkah => "Makkah",
            Method::Karachi => "Karachi",
            Method::Tehran => "Tehran",
            Method::Jafari => "Jafari",
        }
    }

    /// Registry entry of this convention, defaults already merged.
    pub fn definition(self) -> &'static CalculationMethod {
        // Registry order follows `Method::ALL`.
        &registry()[self as usize]
    }

    /// Merged parameters of this convention.
    pub fn params(self) -> &'static SettingsPatch {
        &self.definition().params
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Method {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Method::ALL
            .into_iter()
            .find(|m| m.id() == s)
            .ok_or_else(|| Error::UnknownMethod(s.to_string()))
    }
}

/// One registry entry.
#[derive(Debug, Clone, PartialEq)]
pub struct CalculationMethod {
    pub id: Method,
    pub name: &'static str,
    pub params: SettingsPatch,
}

/// Parameters every convention inherits unless it sets them itself.
pub const DEFAULT_PARAMS: SettingsPatch = SettingsPatch {
    maghrib: Some(AngleSpec::Minutes(0.0)),
    midnight: Some(AngleSpec::Named(Rule::Standard)),
    ..SettingsPatch::new()
};

const fn raw(fajr: f64, isha: AngleSpec) -> SettingsPatch {
    SettingsPatch {
        fajr: Some(AngleSpec::Degrees(fajr)),
        isha: Some(isha),
        ..SettingsPatch::new()
    }
}

const fn shia(fajr: f64, isha: f64, maghrib: f64) -> SettingsPatch {
    SettingsPatch {
        maghrib: Some(AngleSpec::Degrees(maghrib)),
        midnight: Some(AngleSpec::Named(Rule::Jafari)),
        ..raw(fajr, AngleSpec::Degrees(isha))
    }
}

const RAW_METHODS: [(Method, &str, SettingsPatch); 7] = [
    (
        Method::MWL,
        "Muslim World League",
        raw(18.0, AngleSpec::Degrees(17.0)),
    ),
    (
        Method::ISNA,
        "Islamic Society of North America (ISNA)",
        raw(15.0, AngleSpec::Degrees(15.0)),
    ),
    (
        Method::Egypt,
        "Egyptian General Authority of Survey",
        raw(19.5, AngleSpec::Degrees(17.5)),
    ),
    // Fajr was 19° before 1430 AH.
    (
        Method::Makkah,
        "Umm Al-Qura University, Makkah",
        raw(18.5, AngleSpec::Minutes(90.0)),
    ),
    (
        Method::Karachi,
        "University of Islamic Sciences, Karachi",
        raw(18.0, AngleSpec::Degrees(18.0)),
    ),
    // Isha is not explicitly specified by this institute.
    (
        Method::Tehran,
        "Institute of Geophysics, University of Tehran",
        shia(17.7, 14.0, 4.5),
    ),
    (
        Method::Jafari,
        "Shia Ithna-Ashari, Leva Institute, Qum",
        shia(16.0, 14.0, 4.0),
    ),
];

/// The full convention table, in [`Method::ALL`] order.
pub fn registry() -> &'static [CalculationMethod] {
    static REGISTRY: OnceLock<Vec<CalculationMethod>> = OnceLock::new();
    REGISTRY.get_or_init(|| {
        RAW_METHODS
            .iter()
            .map(|&(id, name, params)| CalculationMethod {
                id,
                name,
                params: params.or(DEFAULT_PARAMS),
            })
            .collect()
    })
}
