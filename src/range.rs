//! # Time Range Selection
//!
//! Picks the part of a series shown on the draft charts. Ranges are closed on
//! both ends. A range that misses every sample is not an error: it yields an
//! empty series and the caller simply draws no curves.

use crate::{DraftError, TideSeries};
use chrono::{Duration, NaiveDateTime};
use tracing::debug;

/// Default chart window length in hours.
pub const DEFAULT_WINDOW_HOURS: i64 = 24;

/// Samples with `start <= timestamp <= end`, in series order.
///
/// Fails with [`DraftError::InvalidRange`] when `start > end`, whatever the
/// series holds.
pub fn select_range(
    series: &TideSeries,
    start: NaiveDateTime,
    end: NaiveDateTime,
) -> Result<TideSeries, DraftError> {
    if start > end {
        return Err(DraftError::InvalidRange { start, end });
    }

    let samples: Vec<_> = series
        .iter()
        .filter(|sample| start <= sample.timestamp && sample.timestamp <= end)
        .copied()
        .collect();

    debug!(%start, %end, selected = samples.len(), total = series.len(), "selected range");
    Ok(TideSeries { samples })
}

/// Earliest and latest timestamp in the series.
pub fn bounds(series: &TideSeries) -> Result<(NaiveDateTime, NaiveDateTime), DraftError> {
    let mut timestamps = series.iter().map(|sample| sample.timestamp);
    let first = timestamps.next().ok_or(DraftError::EmptyInput)?;

    Ok(timestamps.fold((first, first), |(min, max), t| (min.min(t), max.max(t))))
}

/// Initial viewing window: from the first timestamp, `hours` long, clipped to
/// the last timestamp.
pub fn default_window(
    series: &TideSeries,
    hours: i64,
) -> Result<(NaiveDateTime, NaiveDateTime), DraftError> {
    let (first, _) = bounds(series)?;
    window_starting(series, first, hours)
}

/// Window of `hours` from `start`, clipped to the last timestamp.
///
/// Never inverted: a `start` past the end of the series gives a zero-length
/// window at `start`.
pub fn window_starting(
    series: &TideSeries,
    start: NaiveDateTime,
    hours: i64,
) -> Result<(NaiveDateTime, NaiveDateTime), DraftError> {
    let (_, last) = bounds(series)?;
    let end = Duration::try_hours(hours.max(0))
        .and_then(|d| start.checked_add_signed(d))
        .map_or(last, |t| t.min(last))
        .max(start);
    Ok((start, end))
}

/// Window of `hours` up to `end`, clipped to the first timestamp.
///
/// Never inverted: an `end` before the series gives a zero-length window at
/// `end`.
pub fn window_ending(
    series: &TideSeries,
    end: NaiveDateTime,
    hours: i64,
) -> Result<(NaiveDateTime, NaiveDateTime), DraftError> {
    let (first, _) = bounds(series)?;
    let start = Duration::try_hours(hours.max(0))
        .and_then(|d| end.checked_sub_signed(d))
        .map_or(first, |t| t.max(first))
        .min(end);
    Ok((start, end))
}
