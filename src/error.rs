// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Errors raised at the configuration boundary.
//!
//! The numeric path never fails: unreachable sun angles surface as `None`
//! and are rendered as [`FormattedTime::Invalid`](crate::FormattedTime::Invalid).
//! Only string parsing of settings and identifiers can produce an [`Error`].

use thiserror::Error;

/// Parse failures for settings, method identifiers and format names.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("invalid angle spec `{0}`: expected degrees, `<n> min`, or a rule name")]
    InvalidAngleSpec(String),

    #[error("unknown calculation method `{0}`")]
    UnknownMethod(String),

    #[error("unknown time format `{0}`: expected `24h`, `12h`, `12hNS` or `Float`")]
    UnknownTimeFormat(String),

    #[error("unknown high-latitude rule `{0}`")]
    UnknownHighLatRule(String),

    #[error("unknown time name `{0}`")]
    UnknownTimeName(String),
}

pub type Result<T> = std::result::Result<T, Error>;
