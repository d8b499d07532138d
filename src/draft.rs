//! # Draft Calculation
//!
//! Combines forecast samples with reference points. Draft is the tide level
//! minus the point's elevation, both relative to LAT:
//!
//! ```text
//! astro       = water_level_astro                 - elevation
//! astro_surge = water_level_astro + surge         - elevation
//! meteo       = water_level_meteo                 - elevation
//! meteo_surge = water_level_meteo + surge         - elevation
//! ```
//!
//! Nothing is rounded here. Chained computations keep full precision and the
//! presentation layer rounds once.

use crate::{DraftError, DraftResult, ReferencePoint, TideSample, TideSeries};
use chrono::NaiveDateTime;

/// Find the sample with exactly this timestamp.
///
/// There is no interpolation; callers should offer only timestamps that
/// exist in the series. With duplicate timestamps the first one in file
/// order wins.
pub fn compute_at(
    series: &TideSeries,
    timestamp: NaiveDateTime,
) -> Result<&TideSample, DraftError> {
    series
        .iter()
        .find(|sample| sample.timestamp == timestamp)
        .ok_or(DraftError::NotFound(timestamp))
}

/// Drafts for one sample at one point.
///
/// # Example
/// ```
/// use chrono::NaiveDate;
/// use tide_draft_lib::{draft::compute_drafts, ReferencePoint, TideSample};
///
/// let sample = TideSample {
///     timestamp: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap(),
///     water_level_astro: 2.0,
///     water_level_meteo: 2.1,
///     surge: 0.1,
///     depth_averaged_velocity: 1.0,
///     current_direction: 90.0,
/// };
/// let drafts = compute_drafts(&sample, &ReferencePoint::new("Bar", -1.4));
/// assert!((drafts.astro - 3.4).abs() < 1e-9);
/// ```
pub fn compute_drafts(sample: &TideSample, point: &ReferencePoint) -> DraftResult {
    let astro = sample.water_level_astro;
    let meteo = sample.water_level_meteo;
    let surge = sample.surge;

    DraftResult {
        astro: astro - point.elevation,
        astro_surge: astro + surge - point.elevation,
        meteo: meteo - point.elevation,
        meteo_surge: meteo + surge - point.elevation,
    }
}

/// Drafts for each sample at one point, in sample order.
pub fn compute_draft_series<'a, I>(samples: I, point: &ReferencePoint) -> Vec<DraftResult>
where
    I: IntoIterator<Item = &'a TideSample>,
{
    samples
        .into_iter()
        .map(|sample| compute_drafts(sample, point))
        .collect()
}

/// Drafts for one sample at every point, in point order.
pub fn compute_all<'p>(
    sample: &TideSample,
    points: &'p [ReferencePoint],
) -> Vec<(&'p ReferencePoint, DraftResult)> {
    points
        .iter()
        .map(|point| (point, compute_drafts(sample, point)))
        .collect()
}
