//! # Draft Report Rendering
//!
//! This module is the presentation boundary. It gathers everything a viewer
//! shows for one request into a [`Report`] and renders it either as plain
//! text (tables plus ASCII draft curves) or as JSON.
//!
//! Values are rounded to two decimals here and only here.

use crate::draft::{compute_all, compute_at, compute_draft_series};
use crate::range::select_range;
use crate::{DraftError, DraftResult, ReferencePoint, Scenario, TideSample, TideSeries};
use chrono::NaiveDateTime;
use serde::Serialize;
use std::fmt::Write;

/// Timestamp layout used in headings and tables
const DISPLAY_TIME: &str = "%Y-%m-%d %H:%M";

/// Chart height in text rows
const ROWS: usize = 16;
/// Space for Y-axis labels
const Y_AXIS_WIDTH: usize = 8;
/// Widest plot area before samples are thinned out
const MAX_COLUMNS: usize = 96;

/// Drafts at the selected timestamp for one point
#[derive(Debug, Clone, Serialize)]
pub struct DraftRow {
    pub point: ReferencePoint,
    pub drafts: DraftResult,
}

/// Draft curves over the selected window for one point
#[derive(Debug, Clone, Serialize)]
pub struct DraftCurve {
    pub point: ReferencePoint,
    pub timestamps: Vec<NaiveDateTime>,
    pub drafts: Vec<DraftResult>,
}

/// Everything shown for one (timestamp, window, points, threshold) request
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub timestamp: NaiveDateTime,
    pub prediction: TideSample,
    pub min_draft: f64,
    pub window: (NaiveDateTime, NaiveDateTime),
    pub drafts: Vec<DraftRow>,
    pub curves: Vec<DraftCurve>,
}

impl Report {
    /// Build a report from a parsed series.
    ///
    /// Fails if `timestamp` is not in the series or the window is inverted.
    /// A window without samples produces curves with no points.
    pub fn build(
        series: &TideSeries,
        points: &[ReferencePoint],
        timestamp: NaiveDateTime,
        window: (NaiveDateTime, NaiveDateTime),
        min_draft: f64,
    ) -> Result<Self, DraftError> {
        let prediction = *compute_at(series, timestamp)?;
        let in_window = select_range(series, window.0, window.1)?;

        let drafts = compute_all(&prediction, points)
            .into_iter()
            .map(|(point, drafts)| DraftRow {
                point: point.clone(),
                drafts,
            })
            .collect();

        let timestamps: Vec<_> = in_window.iter().map(|s| s.timestamp).collect();
        let curves = points
            .iter()
            .map(|point| DraftCurve {
                point: point.clone(),
                timestamps: timestamps.clone(),
                drafts: compute_draft_series(&in_window, point),
            })
            .collect();

        Ok(Report {
            timestamp,
            prediction,
            min_draft,
            window,
            drafts,
            curves,
        })
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Full text rendering: prediction table, draft table, one chart per point
    pub fn to_text(&self) -> String {
        let mut out = prediction_table(&self.prediction);
        out.push('\n');
        out.push_str(&draft_table(self.timestamp, &self.drafts));
        for curve in &self.curves {
            out.push('\n');
            out.push_str(&draft_chart(curve, self.min_draft));
        }
        out
    }
}

/// Selectable timestamps, one line per date with that day's sampled times
pub fn timestamp_listing(series: &TideSeries) -> String {
    let mut out = String::from("Available timestamps:\n");
    for date in series.dates() {
        let times: Vec<String> = series
            .times_on(date)
            .iter()
            .map(|t| t.format("%H:%M").to_string())
            .collect();
        let _ = writeln!(out, "  {}  {}", date.format("%Y-%m-%d"), times.join(" "));
    }
    out
}

/// Round to two decimals for display
pub fn format_value(value: f64) -> String {
    format!("{value:.2}")
}

/// Forecast values at the selected timestamp
pub fn prediction_table(sample: &TideSample) -> String {
    let rows = [
        ("Time", sample.timestamp.format(DISPLAY_TIME).to_string()),
        ("Tide level (astro) [m + LAT]", format_value(sample.water_level_astro)),
        ("Tide level (meteo) [m + LAT]", format_value(sample.water_level_meteo)),
        ("Surge [m]", format_value(sample.surge)),
        ("Mean velocity [knots]", format_value(sample.depth_averaged_velocity)),
        ("Current direction [°]", format_value(sample.current_direction)),
    ];

    let label_width = rows.iter().map(|(l, _)| l.chars().count()).max().unwrap_or(0);
    let mut out = String::from("Forecast values:\n");
    for (label, value) in rows {
        let pad = label_width - label.chars().count();
        let _ = writeln!(out, "  {label}{}  {value:>16}", " ".repeat(pad));
    }
    out
}

/// One row per point with the four draft scenarios
pub fn draft_table(timestamp: NaiveDateTime, rows: &[DraftRow]) -> String {
    let mut out = format!(
        "Predicted drafts [m LAT] ({})\n",
        timestamp.format(DISPLAY_TIME)
    );

    let name_width = rows
        .iter()
        .map(|r| r.point.name.chars().count())
        .chain(std::iter::once("Point".len()))
        .max()
        .unwrap_or(0);

    let _ = write!(out, "  {:<name_width$}", "Point");
    for scenario in Scenario::ALL {
        let _ = write!(out, "  {:>18}", scenario.label());
    }
    out.push('\n');

    for row in rows {
        let _ = write!(out, "  {:<name_width$}", row.point.name);
        for scenario in Scenario::ALL {
            let _ = write!(out, "  {:>18}", format_value(row.drafts.get(scenario)));
        }
        out.push('\n');
    }
    out
}

/// ASCII chart of the four draft curves with the minimum draft as a dashed row.
pub fn draft_chart(curve: &DraftCurve, min_draft: f64) -> String {
    let mut out = format!("### {}\n", curve.point.name);

    if curve.drafts.is_empty() {
        out.push_str("  (no samples in the selected time range)\n");
        return out;
    }

    // Thin out long windows so the chart stays terminal-sized
    let stride = curve.drafts.len().div_ceil(MAX_COLUMNS);
    let columns: Vec<&DraftResult> = curve.drafts.iter().step_by(stride).collect();

    let (min_value, max_value) = columns
        .iter()
        .flat_map(|d| Scenario::ALL.map(|s| d.get(s)))
        .chain(std::iter::once(min_draft))
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), v| {
            (min.min(v), max.max(v))
        });
    let span = (max_value - min_value).max(f64::EPSILON);

    let value_to_row = |value: f64| {
        let normalized = (value - min_value) / span;
        ((1.0 - normalized) * (ROWS as f64 - 1.0)).round() as usize
    };

    let mut grid = vec![vec![' '; columns.len()]; ROWS];

    let threshold_row = value_to_row(min_draft);
    for cell in grid[threshold_row].iter_mut() {
        *cell = '-';
    }

    for (column, drafts) in columns.iter().enumerate() {
        for scenario in Scenario::ALL {
            let row = value_to_row(drafts.get(scenario));
            grid[row][column] = scenario.marker();
        }
    }

    let labelled = [
        (0, max_value),
        (threshold_row, min_draft),
        (ROWS - 1, min_value),
    ];
    for (index, row) in grid.into_iter().enumerate() {
        let label = labelled
            .iter()
            .find(|(r, _)| *r == index)
            .map(|(_, v)| format_value(*v))
            .unwrap_or_default();
        let line: String = row.into_iter().collect();
        let _ = writeln!(out, "{label:>width$}│{line}", width = Y_AXIS_WIDTH - 1);
    }

    // Time labels under the chart
    let first = curve.timestamps.first().map(|t| t.format(DISPLAY_TIME).to_string());
    let last = curve.timestamps.last().map(|t| t.format(DISPLAY_TIME).to_string());
    if let (Some(first), Some(last)) = (first, last) {
        let padding = " ".repeat(Y_AXIS_WIDTH);
        let gap = columns.len().saturating_sub(first.len() + last.len()).max(1);
        let _ = writeln!(out, "{padding}{first}{}{last}", " ".repeat(gap));
    }

    let legend: Vec<String> = Scenario::ALL
        .iter()
        .map(|s| format!("{} {}", s.marker(), s.label()))
        .collect();
    let _ = writeln!(
        out,
        "{}{}   - minimum draft {} m",
        " ".repeat(Y_AXIS_WIDTH),
        legend.join("   "),
        format_value(min_draft)
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tide_data::parse_str;
    use chrono::NaiveDate;

    const FORECAST: &str = "\
Tidal Forecast
m LAT
01-Jan-2024 00:00:00,2.00,2.10,0.10,1.0,90
01-Jan-2024 01:00:00,2.50,2.55,0.05,1.2,95
01-Jan-2024 02:00:00,1.80,1.90,0.10,0.8,100
";

    fn at(h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    fn points() -> Vec<ReferencePoint> {
        vec![
            ReferencePoint::new("Barra de Arena (-1.40 m LAT)", -1.40),
            ReferencePoint::new("CPT-NS-01 (-3.20 m LAT)", -3.20),
        ]
    }

    #[test]
    fn test_timestamp_listing() {
        let text = "h\nu\n01-Jan-2024 22:00:00,1,1,0,0,0\n01-Jan-2024 23:00:00,1,1,0,0,0\n02-Jan-2024 00:00:00,1,1,0,0,0\n";
        let listing = timestamp_listing(&parse_str(text).unwrap());

        let lines: Vec<&str> = listing.lines().collect();
        assert_eq!(
            lines,
            vec![
                "Available timestamps:",
                "  2024-01-01  22:00 23:00",
                "  2024-01-02  00:00",
            ]
        );
    }

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(3.4), "3.40");
        assert_eq!(format_value(3.456), "3.46");
        assert_eq!(format_value(-1.0), "-1.00");
    }

    #[test]
    fn test_report_contents() {
        let series = parse_str(FORECAST).unwrap();
        let report = Report::build(&series, &points(), at(0), (at(0), at(1)), 2.85).unwrap();

        assert_eq!(report.prediction.water_level_astro, 2.00);
        assert_eq!(report.drafts.len(), 2);
        assert!((report.drafts[0].drafts.meteo_surge - 3.60).abs() < 1e-9);

        assert_eq!(report.curves.len(), 2);
        assert_eq!(report.curves[1].timestamps, vec![at(0), at(1)]);
        assert_eq!(report.curves[1].drafts.len(), 2);
    }

    #[test]
    fn test_report_errors() {
        let series = parse_str(FORECAST).unwrap();
        let missing = at(0) + chrono::Duration::minutes(30);
        assert!(matches!(
            Report::build(&series, &points(), missing, (at(0), at(2)), 2.85),
            Err(DraftError::NotFound(_))
        ));
        assert!(matches!(
            Report::build(&series, &points(), at(0), (at(2), at(0)), 2.85),
            Err(DraftError::InvalidRange { .. })
        ));
    }

    #[test]
    fn test_text_rendering() {
        let series = parse_str(FORECAST).unwrap();
        let report = Report::build(&series, &points(), at(0), (at(0), at(2)), 2.85).unwrap();
        let text = report.to_text();

        assert!(text.contains("Predicted drafts [m LAT] (2024-01-01 00:00)"));
        assert!(text.contains("3.40"));
        assert!(text.contains("3.60"));
        assert!(text.contains("### CPT-NS-01 (-3.20 m LAT)"));
        assert!(text.contains("minimum draft 2.85 m"));
    }

    #[test]
    fn test_empty_window_renders_notice() {
        let series = parse_str(FORECAST).unwrap();
        let later = at(5);
        let report = Report::build(&series, &points(), at(0), (later, later), 2.85).unwrap();

        assert!(report.curves.iter().all(|c| c.drafts.is_empty()));
        assert!(report.to_text().contains("no samples in the selected time range"));
    }

    #[test]
    fn test_chart_draws_threshold_and_curves() {
        let curve = DraftCurve {
            point: ReferencePoint::new("P", -1.0),
            timestamps: vec![at(0), at(1)],
            drafts: vec![
                DraftResult {
                    astro: 1.0,
                    astro_surge: 1.5,
                    meteo: 2.0,
                    meteo_surge: 2.5,
                },
                DraftResult {
                    astro: 3.0,
                    astro_surge: 3.5,
                    meteo: 4.0,
                    meteo_surge: 4.5,
                },
            ],
        };

        let chart = draft_chart(&curve, 2.85);
        for marker in ['a', 'A', 'm', 'M', '-'] {
            assert!(chart.contains(marker), "missing {marker} in\n{chart}");
        }
        assert!(chart.contains("4.50"));
        assert!(chart.contains("1.00"));
    }

    #[test]
    fn test_json_rendering() {
        let series = parse_str(FORECAST).unwrap();
        let report = Report::build(&series, &points(), at(1), (at(0), at(2)), 2.85).unwrap();
        let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();

        assert_eq!(json["min_draft"], 2.85);
        assert_eq!(json["drafts"][0]["point"]["elevation"], -1.4);
        assert_eq!(json["curves"][0]["drafts"].as_array().unwrap().len(), 3);
    }
}
