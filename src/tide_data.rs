//! # Tidal Forecast Parsing
//!
//! This module reads the comma-separated forecast files produced by the tidal
//! model and turns them into a [`TideSeries`].
//!
//! ## File Layout
//! ```text
//! <preamble line 1, ignored>
//! <preamble line 2, ignored>
//! 05-Jan-2024 13:00:00,2.00,2.10,0.10,1.0,90
//! 05-Jan-2024 14:00:00,2.35,2.41,0.06,0.8,95
//! ```
//!
//! Data columns, in order: datetime, astronomical level, meteorological level,
//! surge, depth averaged velocity, current direction. There is no header row
//! in the data section.
//!
//! ## Error Handling
//! - **Bad datetime**: anything not matching `DD-Mon-YYYY HH:MM:SS`
//! - **Bad number**: any of the five numeric fields fails to parse
//! - **Bad shape**: a row without exactly six fields
//! - **No rows**: the data section is empty
//!
//! The first failing row stops the parse. Line numbers in errors are 1-based
//! and count the preamble.

use crate::{DraftError, TideSample, TideSeries};
use chrono::NaiveDateTime;
use std::{fs, path::Path};
use tracing::debug;

/// Datetime layout of the first column, e.g. `05-Jan-2024 13:00:00`.
pub const DATETIME_FORMAT: &str = "%d-%b-%Y %H:%M:%S";

/// Lines of preamble before the data section.
const PREAMBLE_LINES: usize = 2;

/// Fields in every data row.
const FIELDS: usize = 6;

/// Parse raw forecast bytes.
///
/// The input must be UTF-8. See [`parse_str`] for the row rules.
///
/// # Example
/// ```
/// use tide_draft_lib::tide_data::parse;
///
/// let raw = b"Tidal Forecast\nunits: m LAT\n01-Jan-2024 00:00:00,2.00,2.10,0.10,1.0,90\n";
/// let series = parse(raw).unwrap();
/// assert_eq!(series.len(), 1);
/// ```
pub fn parse(raw: &[u8]) -> Result<TideSeries, DraftError> {
    let text = std::str::from_utf8(raw).map_err(|err| {
        let line = raw[..err.valid_up_to()]
            .iter()
            .filter(|&&b| b == b'\n')
            .count()
            + 1;
        DraftError::format(line, "input is not valid UTF-8")
    })?;
    parse_str(text)
}

/// Parse forecast text.
///
/// The first two lines are skipped whatever they contain. Blank lines in the
/// data section are ignored; every other line becomes one sample, in file
/// order.
pub fn parse_str(text: &str) -> Result<TideSeries, DraftError> {
    let mut samples = Vec::new();

    for (index, line) in text.lines().enumerate().skip(PREAMBLE_LINES) {
        if line.trim().is_empty() {
            continue;
        }
        samples.push(parse_row(index + 1, line)?);
    }

    if samples.is_empty() {
        return Err(DraftError::EmptyInput);
    }

    debug!(rows = samples.len(), "parsed tidal forecast");
    Ok(TideSeries { samples })
}

/// Read and parse a forecast file from disk.
pub fn load<P: AsRef<Path>>(path: P) -> Result<TideSeries, DraftError> {
    let raw = fs::read(path.as_ref())?;
    debug!(path = %path.as_ref().display(), bytes = raw.len(), "read forecast file");
    parse(&raw)
}

/// Parse a datetime in the forecast file layout.
pub fn parse_timestamp(field: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(field.trim(), DATETIME_FORMAT).ok()
}

// -- Private Implementation --

fn parse_row(line_no: usize, line: &str) -> Result<TideSample, DraftError> {
    let fields: Vec<&str> = line.split(',').map(str::trim).collect();
    if fields.len() != FIELDS {
        return Err(DraftError::format(
            line_no,
            format!("expected {FIELDS} fields, found {}", fields.len()),
        ));
    }

    let timestamp = parse_timestamp(fields[0]).ok_or_else(|| {
        DraftError::format(
            line_no,
            format!("datetime {:?} does not match DD-Mon-YYYY HH:MM:SS", fields[0]),
        )
    })?;

    let number = |column: usize, name: &str| -> Result<f64, DraftError> {
        fields[column].parse::<f64>().map_err(|_| {
            DraftError::format(
                line_no,
                format!("{name} {:?} is not a number", fields[column]),
            )
        })
    };

    Ok(TideSample {
        timestamp,
        water_level_astro: number(1, "water_level_astro")?,
        water_level_meteo: number(2, "water_level_meteo")?,
        surge: number(3, "surge")?,
        depth_averaged_velocity: number(4, "depth_averaged_velocity")?,
        current_direction: number(5, "current_direction")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const FORECAST: &str = "\
Tidal Forecast - Station NKT
Time,Astro,Meteo,Surge,Velocity,Direction
01-Jan-2024 00:00:00,2.00,2.10,0.10,1.0,90
01-Jan-2024 01:00:00,2.25,2.30,0.05,1.2,95
01-Jan-2024 02:00:00,2.40,2.38,-0.02,0.9,100
";

    fn at(h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_parse_preserves_rows_in_order() {
        let series = parse_str(FORECAST).unwrap();
        assert_eq!(series.len(), 3);

        let timestamps: Vec<_> = series.iter().map(|s| s.timestamp).collect();
        assert_eq!(timestamps, vec![at(0), at(1), at(2)]);

        let last = &series.samples[2];
        assert_eq!(last.water_level_astro, 2.40);
        assert_eq!(last.water_level_meteo, 2.38);
        assert_eq!(last.surge, -0.02);
        assert_eq!(last.depth_averaged_velocity, 0.9);
        assert_eq!(last.current_direction, 100.0);
    }

    #[test]
    fn test_preamble_is_skipped_even_if_it_looks_like_data() {
        let text = "01-Jan-2024 00:00:00,9,9,9,9,9\n01-Jan-2024 00:00:00,9,9,9,9,9\n01-Jan-2024 01:00:00,2.25,2.30,0.05,1.2,95\n";
        let series = parse_str(text).unwrap();
        assert_eq!(series.len(), 1);
        assert_eq!(series.samples[0].timestamp, at(1));
    }

    #[test]
    fn test_whitespace_and_crlf_are_tolerated() {
        let text = "a\r\nb\r\n01-Jan-2024 00:00:00, 2.00, 2.10, 0.10, 1.0, 90\r\n\r\n";
        let series = parse_str(text).unwrap();
        assert_eq!(series.len(), 1);
        assert_eq!(series.samples[0].surge, 0.10);
    }

    #[test]
    fn test_wrong_datetime_format_is_rejected() {
        let text = "a\nb\n2024-01-05 13:00:00,2.00,2.10,0.10,1.0,90\n";
        match parse_str(text) {
            Err(DraftError::Format { line, .. }) => assert_eq!(line, 3),
            other => panic!("expected format error, got {other:?}"),
        }
    }

    #[test]
    fn test_full_month_name_is_rejected() {
        let text = "a\nb\n05-January-2024 13:00:00,2.00,2.10,0.10,1.0,90\n";
        assert!(matches!(
            parse_str(text),
            Err(DraftError::Format { line: 3, .. })
        ));
        assert!(parse_timestamp("05-Jan-2024 13:00:00").is_some());
        assert!(parse_timestamp("05-January-2024 13:00:00").is_none());
    }

    #[test]
    fn test_non_numeric_field_is_rejected() {
        let text = "a\nb\n01-Jan-2024 00:00:00,2.00,2.10,0.10,1.0,90\n01-Jan-2024 01:00:00,2.00,n/a,0.10,1.0,90\n";
        match parse_str(text) {
            Err(DraftError::Format { line, reason }) => {
                assert_eq!(line, 4);
                assert!(reason.contains("water_level_meteo"), "reason: {reason}");
            }
            other => panic!("expected format error, got {other:?}"),
        }
    }

    #[test]
    fn test_wrong_field_count_is_rejected() {
        let text = "a\nb\n01-Jan-2024 00:00:00,2.00,2.10,0.10,1.0\n";
        assert!(matches!(
            parse_str(text),
            Err(DraftError::Format { line: 3, .. })
        ));
    }

    #[test]
    fn test_empty_data_section() {
        assert!(matches!(parse_str(""), Err(DraftError::EmptyInput)));
        assert!(matches!(
            parse_str("header\nunits\n"),
            Err(DraftError::EmptyInput)
        ));
        assert!(matches!(
            parse_str("header\nunits\n\n   \n"),
            Err(DraftError::EmptyInput)
        ));
    }

    #[test]
    fn test_invalid_utf8_is_a_format_error() {
        let raw = b"a\nb\n01-Jan-2024 00:00:00,2.00,\xff,0.10,1.0,90\n";
        assert!(matches!(parse(raw), Err(DraftError::Format { line: 3, .. })));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(FORECAST.as_bytes()).unwrap();

        let series = load(file.path()).unwrap();
        assert_eq!(series.len(), 3);
    }

    #[test]
    fn test_load_missing_file() {
        assert!(matches!(
            load("/nonexistent/forecast.csv"),
            Err(DraftError::Io(_))
        ));
    }
}
