//! # Tide Draft Core Library
//!
//! This library turns a precomputed tidal forecast into predicted water depth
//! ("draft") at a set of seabed reference points. Every public operation is a
//! plain function of its inputs: a caller parses a file once, then asks for
//! drafts at a timestamp or over a time window as often as it likes.
//!
//! ## Data Flow
//! 1. **Parse**: raw forecast text → [`TideSeries`] ([`tide_data::parse`])
//! 2. **Select**: exact timestamp ([`draft::compute_at`]) or closed window
//!    ([`range::select_range`])
//! 3. **Derive**: sample + [`ReferencePoint`] → [`DraftResult`]
//!    ([`draft::compute_drafts`], [`draft::compute_draft_series`])
//! 4. **Present**: the caller formats the numbers (see [`renderer`])
//!
//! ## Vertical Datum
//! Water levels and point elevations are both meters relative to LAT (Lowest
//! Astronomical Tide). Seabed points sit below datum and carry negative
//! elevations, so the draft at such a point is larger than the tide level.
//!
//! ## Core Types
//! - [`TideSample`]: one forecast row
//! - [`TideSeries`]: all rows of one forecast file, in file order
//! - [`ReferencePoint`]: a named elevation
//! - [`DraftResult`]: the four draft scenarios for one sample and one point

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

pub mod config;
pub mod draft;
pub mod error;
pub mod points;
pub mod range;
pub mod renderer;
pub mod tide_data;

pub use error::DraftError;

/// One row of the tidal forecast.
///
/// `water_level_meteo` is stored as read. It is usually close to
/// `water_level_astro + surge` but nothing here relies on that.
///
/// # Example
/// ```
/// use chrono::NaiveDate;
/// use tide_draft_lib::TideSample;
///
/// let sample = TideSample {
///     timestamp: NaiveDate::from_ymd_opt(2024, 1, 1)
///         .unwrap()
///         .and_hms_opt(0, 0, 0)
///         .unwrap(),
///     water_level_astro: 2.0,
///     water_level_meteo: 2.1,
///     surge: 0.1,
///     depth_averaged_velocity: 1.0,
///     current_direction: 90.0,
/// };
/// assert_eq!(sample.surge, 0.1);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TideSample {
    /// Forecast instant, as written in the file (no time zone)
    pub timestamp: NaiveDateTime,
    /// Astronomical tide level in meters above LAT
    pub water_level_astro: f64,
    /// Meteorological tide level in meters above LAT
    pub water_level_meteo: f64,
    /// Meteorological deviation from the astronomical tide in meters
    pub surge: f64,
    /// Depth averaged current speed in knots (display only)
    pub depth_averaged_velocity: f64,
    /// Current direction in degrees (display only)
    pub current_direction: f64,
}

/// All samples of one forecast file, in file order.
///
/// Timestamps are expected to be unique and increasing, as the forecast
/// files are, but neither property is enforced. Lookups take the first
/// match and range selection filters rather than bisects.
///
/// # Example
/// ```
/// use tide_draft_lib::TideSeries;
///
/// let series = TideSeries::default();
/// assert!(series.is_empty());
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TideSeries {
    pub samples: Vec<TideSample>,
}

impl TideSeries {
    pub fn new(samples: Vec<TideSample>) -> Self {
        Self { samples }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TideSample> {
        self.samples.iter()
    }

    /// Distinct calendar dates, in file order.
    pub fn dates(&self) -> Vec<NaiveDate> {
        let mut dates: Vec<NaiveDate> = Vec::new();
        for date in self.iter().map(|s| s.timestamp.date()) {
            if !dates.contains(&date) {
                dates.push(date);
            }
        }
        dates
    }

    /// Distinct times of day sampled on `date`, in file order.
    ///
    /// Every returned time combined with `date` is a timestamp that
    /// [`draft::compute_at`] will find.
    pub fn times_on(&self, date: NaiveDate) -> Vec<NaiveTime> {
        let mut times: Vec<NaiveTime> = Vec::new();
        for sample in self.iter().filter(|s| s.timestamp.date() == date) {
            let time = sample.timestamp.time();
            if !times.contains(&time) {
                times.push(time);
            }
        }
        times
    }
}

impl<'a> IntoIterator for &'a TideSeries {
    type Item = &'a TideSample;
    type IntoIter = std::slice::Iter<'a, TideSample>;

    fn into_iter(self) -> Self::IntoIter {
        self.samples.iter()
    }
}

/// A named seabed location with its elevation in meters relative to LAT.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReferencePoint {
    pub name: String,
    /// Negative values lie below chart datum
    pub elevation: f64,
}

impl ReferencePoint {
    pub fn new(name: impl Into<String>, elevation: f64) -> Self {
        Self {
            name: name.into(),
            elevation,
        }
    }
}

/// Predicted water depth at one point for one sample, per tide scenario.
///
/// Values are unrounded meters. Rounding belongs to whoever displays them.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DraftResult {
    /// Astronomical tide only
    pub astro: f64,
    /// Astronomical tide plus surge
    pub astro_surge: f64,
    /// Meteorological tide only
    pub meteo: f64,
    /// Meteorological tide plus surge
    pub meteo_surge: f64,
}

impl DraftResult {
    /// Value for a single scenario.
    pub fn get(&self, scenario: Scenario) -> f64 {
        match scenario {
            Scenario::Astro => self.astro,
            Scenario::AstroSurge => self.astro_surge,
            Scenario::Meteo => self.meteo,
            Scenario::MeteoSurge => self.meteo_surge,
        }
    }
}

/// The four ways tide level and surge are combined into a draft.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scenario {
    Astro,
    AstroSurge,
    Meteo,
    MeteoSurge,
}

impl Scenario {
    /// All scenarios in display order.
    pub const ALL: [Scenario; 4] = [
        Scenario::Astro,
        Scenario::AstroSurge,
        Scenario::Meteo,
        Scenario::MeteoSurge,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Scenario::Astro => "Tide astro",
            Scenario::AstroSurge => "Tide astro + surge",
            Scenario::Meteo => "Tide meteo",
            Scenario::MeteoSurge => "Tide meteo + surge",
        }
    }

    /// Single character used to plot this scenario's curve.
    pub fn marker(self) -> char {
        match self {
            Scenario::Astro => 'a',
            Scenario::AstroSurge => 'A',
            Scenario::Meteo => 'm',
            Scenario::MeteoSurge => 'M',
        }
    }
}
