use log::{debug, info};

use course_ranking::*;
use snafu::{prelude::*, Snafu};

use std::fs;
use std::path::{Path, PathBuf};

use crate::args::Args;

mod chart;
mod io_common;
mod io_csv;
mod io_excel;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum CoreRankError {
    #[snafu(display(
        "Expected dataset at '{path}'. Ensure the Excel file is committed to the repository at this path."
    ))]
    MissingInput { path: String },
    #[snafu(display("{source}"))]
    NoMatchingColumns { source: RankingErrors },
    #[snafu(display("Error opening file {path}"))]
    OpeningExcel {
        source: calamine::XlsxError,
        path: String,
    },
    #[snafu(display("The workbook {path} has no worksheet or no header row"))]
    EmptyExcel { path: String },
    #[snafu(display("Cannot find worksheet {name:?}"))]
    MissingWorksheet { name: String },
    #[snafu(display("Error serializing the ranking as CSV"))]
    SerializingCsv { source: csv::Error },
    #[snafu(display("Error flushing the ranking CSV"))]
    BufferingCsv { source: std::io::Error },
    #[snafu(display("Error creating the output directory {path}"))]
    CreatingOutputDir {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error writing {path}"))]
    WritingOutput {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error rendering the chart {path}: {message}"))]
    RenderingChart { path: String, message: String },
    #[snafu(display("Error reading the reference ranking {path}"))]
    ReadingReference {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Difference detected between the ranking and the reference {path}"))]
    ReferenceMismatch { path: String },
    #[snafu(display("Error serializing the run summary"))]
    SerializingSummary { source: serde_json::Error },
}

pub type CoreRankResult<T> = Result<T, CoreRankError>;

/// Where a run reads from and writes to.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct RunSettings {
    pub input_path: PathBuf,
    pub output_dir: PathBuf,
    pub worksheet_name: Option<String>,
    pub reference_path: Option<PathBuf>,
    /// A file path, or "stdout".
    pub summary_out: Option<String>,
}

impl RunSettings {
    pub fn from_args(args: &Args) -> RunSettings {
        RunSettings {
            input_path: PathBuf::from(&args.input),
            output_dir: PathBuf::from(&args.output_dir),
            worksheet_name: args.excel_worksheet_name.clone(),
            reference_path: args.reference.as_ref().map(PathBuf::from),
            summary_out: args.summary.clone().filter(|s| !s.is_empty()),
        }
    }
}

/// What a successful run produced.
#[derive(PartialEq, Debug, Clone)]
pub struct RunReport {
    pub outcome: RankingOutcome,
    pub csv_path: PathBuf,
    pub chart_path: PathBuf,
}

impl RunReport {
    pub fn console_lines(&self) -> Vec<String> {
        vec![
            format!("Columns found: {}", self.outcome.matched_columns.len()),
            format!("Rows processed: {}", self.outcome.rows_processed),
            format!(
                "Observations dropped: {}",
                self.outcome.observations_dropped
            ),
            format!("CSV output: {}", self.csv_path.display()),
            format!("Figure output: {}", self.chart_path.display()),
        ]
    }
}

/// Loads the survey and computes the ranking. Nothing is written.
pub fn compute_ranking(settings: &RunSettings) -> CoreRankResult<RankingOutcome> {
    let table = io_excel::read_survey(&settings.input_path, settings.worksheet_name.as_deref())?;
    match rank_courses(&table) {
        Ok(outcome) => Ok(outcome),
        Err(RankingErrors::EmptyTable) => EmptyExcelSnafu {
            path: settings.input_path.display().to_string(),
        }
        .fail(),
        Err(e) => Err(e).context(NoMatchingColumnsSnafu {}),
    }
}

/// Runs the whole pipeline: load, select, rank, then write the CSV and the chart.
///
/// All the failures that depend on the input happen before the output directory
/// is touched.
pub fn run_rankings(settings: &RunSettings) -> CoreRankResult<RunReport> {
    info!("Attempting to read survey file {:?}", settings.input_path);
    let outcome = compute_ranking(settings)?;
    debug!("run_rankings: matched columns: {:?}", outcome.matched_columns);

    let (csv_path, chart_path) = io_common::output_paths(&settings.output_dir);
    let csv_bytes = io_csv::ranking_csv(&outcome.rankings)?;
    // Read before writing: the reference may be the CSV this run replaces.
    let reference = match settings.reference_path.as_deref() {
        Some(path) => Some((path, io_csv::read_reference(path)?)),
        None => None,
    };

    fs::create_dir_all(&settings.output_dir).context(CreatingOutputDirSnafu {
        path: settings.output_dir.display().to_string(),
    })?;
    write_file(&csv_path, &csv_bytes)?;
    chart::draw_ranking_chart(&chart_path, &outcome.rankings)?;

    let report = RunReport {
        outcome,
        csv_path,
        chart_path,
    };
    for line in report.console_lines() {
        println!("{}", line);
    }

    if let Some(dest) = settings.summary_out.as_deref() {
        let js = io_common::build_summary_js(settings, &report);
        io_common::write_summary(dest, &js)?;
    }

    if let Some((path, expected)) = reference {
        io_csv::check_reference(path, &expected, &csv_bytes)?;
    }
    Ok(report)
}

fn write_file(path: &Path, contents: &[u8]) -> CoreRankResult<()> {
    if path.exists() {
        debug!("write_file: replacing {}", path.display());
    }
    fs::write(path, contents).context(WritingOutputSnafu {
        path: path.display().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    pub(crate) fn fixture(name: &str) -> PathBuf {
        [env!("CARGO_MANIFEST_DIR"), "tests", "data", name]
            .iter()
            .collect()
    }

    fn settings(input: PathBuf, output_dir: &Path) -> RunSettings {
        RunSettings {
            input_path: input,
            output_dir: output_dir.to_path_buf(),
            worksheet_name: None,
            reference_path: None,
            summary_out: None,
        }
    }

    #[test]
    fn missing_input_aborts_before_writing() {
        let tmp = tempfile::tempdir().unwrap();
        let out = tmp.path().join("outputs");
        let res = run_rankings(&settings(fixture("does_not_exist.xlsx"), &out));
        match res {
            Err(e @ CoreRankError::MissingInput { .. }) => {
                assert!(e.to_string().contains("does_not_exist.xlsx"));
            }
            x => panic!("unexpected result {:?}", x),
        }
        assert!(!out.exists());
    }

    #[test]
    fn no_matching_columns_aborts_before_writing() {
        let tmp = tempfile::tempdir().unwrap();
        let out = tmp.path().join("outputs");
        let res = run_rankings(&settings(fixture("no_core_columns.xlsx"), &out));
        match res {
            Err(e @ CoreRankError::NoMatchingColumns { .. }) => {
                assert!(e.to_string().contains("'Most Beneficial'"));
            }
            x => panic!("unexpected result {:?}", x),
        }
        assert!(!out.exists());
    }

    #[test]
    fn compute_ranking_on_survey() {
        let tmp = tempfile::tempdir().unwrap();
        let outcome = compute_ranking(&settings(fixture("exit_survey.xlsx"), tmp.path())).unwrap();
        assert_eq!(outcome.matched_columns.len(), 3);
        assert_eq!(outcome.rows_processed, 5);
        assert_eq!(outcome.observations_kept, 13);
        assert_eq!(outcome.observations_dropped, 2);
        let names: Vec<&str> = outcome.rankings.iter().map(|r| r.course.as_str()).collect();
        assert_eq!(names, vec!["601", "Tax", "Auditing"]);
    }

    #[test]
    fn console_lines_report_counts_and_paths() {
        let tmp = tempfile::tempdir().unwrap();
        let outcome = compute_ranking(&settings(fixture("exit_survey.xlsx"), tmp.path())).unwrap();
        let (csv_path, chart_path) = io_common::output_paths(Path::new("outputs"));
        let report = RunReport {
            outcome,
            csv_path,
            chart_path,
        };
        let lines = report.console_lines();
        assert_eq!(lines[0], "Columns found: 3");
        assert_eq!(lines[1], "Rows processed: 5");
        assert_eq!(lines[2], "Observations dropped: 2");
        assert!(lines[3].ends_with("core_course_ranking.csv"));
        assert!(lines[4].ends_with("rank_order.png"));
    }

    const EXPECTED_CSV: &str =
        "course,avg_rank,n_responses\n601,1.75,4\nTax,1.80,5\nAuditing,2.25,4\n";

    #[test]
    fn survey_csv_is_exact_and_stable() {
        let tmp = tempfile::tempdir().unwrap();
        let s = settings(fixture("exit_survey.xlsx"), tmp.path());
        let first = io_csv::ranking_csv(&compute_ranking(&s).unwrap().rankings).unwrap();
        let second = io_csv::ranking_csv(&compute_ranking(&s).unwrap().rankings).unwrap();
        assert_eq!(String::from_utf8(first.clone()).unwrap(), EXPECTED_CSV);
        assert_eq!(first, second);
    }

    #[test]
    fn full_run_is_reproducible() {
        let tmp = tempfile::tempdir().unwrap();
        let out = tmp.path().join("outputs");
        let mut s = settings(fixture("exit_survey.xlsx"), &out);
        s.summary_out = Some(tmp.path().join("summary.json").display().to_string());
        let report = run_rankings(&s).unwrap();
        assert!(report.chart_path.exists());
        let first = fs::read(&report.csv_path).unwrap();
        assert_eq!(String::from_utf8(first.clone()).unwrap(), EXPECTED_CSV);

        let summary_str = fs::read_to_string(tmp.path().join("summary.json")).unwrap();
        let summary: serde_json::Value = serde_json::from_str(&summary_str).unwrap();
        assert_eq!(summary["rowsProcessed"], 5);

        // Second run, checked against a copy of the first output.
        let reference = tmp.path().join("reference.csv");
        fs::copy(&report.csv_path, &reference).unwrap();
        s.reference_path = Some(reference);
        let second = run_rankings(&s).unwrap();
        assert_eq!(fs::read(&second.csv_path).unwrap(), first);
    }

    #[test]
    fn stale_reference_at_output_path_is_caught() {
        let tmp = tempfile::tempdir().unwrap();
        let out = tmp.path().join("outputs");
        fs::create_dir_all(&out).unwrap();
        let (csv_path, _) = io_common::output_paths(&out);
        fs::write(&csv_path, "course,avg_rank,n_responses\nStale,9.99,1\n").unwrap();

        let mut s = settings(fixture("exit_survey.xlsx"), &out);
        s.reference_path = Some(csv_path.clone());
        let res = run_rankings(&s);
        assert!(matches!(res, Err(CoreRankError::ReferenceMismatch { .. })));
        // The new ranking still replaces the stale file.
        assert_eq!(fs::read_to_string(&csv_path).unwrap(), EXPECTED_CSV);
    }

    #[test]
    fn missing_reference_aborts_before_writing() {
        let tmp = tempfile::tempdir().unwrap();
        let out = tmp.path().join("outputs");
        let mut s = settings(fixture("exit_survey.xlsx"), &out);
        s.reference_path = Some(tmp.path().join("nowhere.csv"));
        let res = run_rankings(&s);
        assert!(matches!(res, Err(CoreRankError::ReadingReference { .. })));
        assert!(!out.exists());
    }

    #[test]
    fn failed_csv_write_leaves_no_chart() {
        let tmp = tempfile::tempdir().unwrap();
        let out = tmp.path().join("outputs");
        let (csv_path, chart_path) = io_common::output_paths(&out);
        // A directory where the CSV should go makes the write fail.
        fs::create_dir_all(&csv_path).unwrap();
        let res = run_rankings(&settings(fixture("exit_survey.xlsx"), &out));
        assert!(matches!(res, Err(CoreRankError::WritingOutput { .. })));
        assert!(!chart_path.exists());
    }

    #[test]
    fn successful_run_writes_both_outputs() {
        let tmp = tempfile::tempdir().unwrap();
        let out = tmp.path().join("outputs");
        let report = run_rankings(&settings(fixture("exit_survey.xlsx"), &out)).unwrap();
        let mut names: Vec<String> = fs::read_dir(&out)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
            .collect();
        names.sort();
        assert_eq!(names, vec!["core_course_ranking.csv", "rank_order.png"]);
        assert!(fs::metadata(&report.chart_path).unwrap().len() > 0);
    }
}
