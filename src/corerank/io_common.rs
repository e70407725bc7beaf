use log::info;
use serde_json::json;
use serde_json::Value as JSValue;
use snafu::prelude::*;

use std::fs;
use std::path::{Path, PathBuf};

use crate::corerank::*;

pub const CSV_FILE_NAME: &str = "core_course_ranking.csv";
pub const CHART_FILE_NAME: &str = "rank_order.png";

/// The CSV and chart paths inside the output directory.
pub fn output_paths(output_dir: &Path) -> (PathBuf, PathBuf) {
    (output_dir.join(CSV_FILE_NAME), output_dir.join(CHART_FILE_NAME))
}

pub fn build_summary_js(settings: &RunSettings, report: &RunReport) -> JSValue {
    let rankings: Vec<JSValue> = report
        .outcome
        .rankings
        .iter()
        .map(|r| {
            json!({
                "course": r.course,
                "avgRank": r.avg_rank,
                "nResponses": r.n_responses,
            })
        })
        .collect();
    json!({
        "input": settings.input_path.display().to_string(),
        "worksheet": settings.worksheet_name,
        "matchedColumns": report.outcome.matched_columns,
        "rowsProcessed": report.outcome.rows_processed,
        "observationsKept": report.outcome.observations_kept,
        "observationsDropped": report.outcome.observations_dropped,
        "outputs": {
            "csv": report.csv_path.display().to_string(),
            "figure": report.chart_path.display().to_string(),
        },
        "rankings": rankings,
    })
}

/// Writes the summary to a file, or to the standard output for "stdout".
pub fn write_summary(dest: &str, js: &JSValue) -> CoreRankResult<()> {
    let pretty_js = serde_json::to_string_pretty(js).context(SerializingSummarySnafu {})?;
    if dest == "stdout" {
        println!("{}", pretty_js);
    } else {
        fs::write(dest, pretty_js).context(WritingOutputSnafu { path: dest })?;
        info!("Summary written to {}", dest);
    }
    Ok(())
}
