// Copyright 2025 the Chartloom Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Configuration errors.

extern crate alloc;

use alloc::string::String;
use core::fmt;

/// A programmer error detected while configuring a chart.
///
/// Runtime data problems (duplicate keys, missing sizes) are logged and degraded instead.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// No chart type is registered under this name.
    UnsupportedChartType(String),
    /// A chart type was registered twice.
    DuplicateChartType(String),
    /// A toolbar control name is not one of the registered controls.
    UnknownToolbarControl(String),
    /// A curve name is not one of the supported interpolations.
    UnknownCurve(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedChartType(name) => write!(f, "unsupported chart type `{name}`"),
            Self::DuplicateChartType(name) => {
                write!(f, "chart type `{name}` is already registered")
            }
            Self::UnknownToolbarControl(name) => write!(f, "unknown toolbar control `{name}`"),
            Self::UnknownCurve(name) => write!(f, "unknown curve `{name}`"),
        }
    }
}

impl core::error::Error for ConfigError {}
