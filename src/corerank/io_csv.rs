// Primitives for writing the ranking as CSV.

use course_ranking::RankingRow;
use log::{info, warn};
use serde::Serialize;
use snafu::prelude::*;
use text_diff::print_diff;

use std::fs;
use std::path::Path;

use crate::corerank::*;

pub const CSV_HEADER: [&str; 3] = ["course", "avg_rank", "n_responses"];

#[derive(Debug, Serialize)]
struct CsvRankingRow<'a> {
    course: &'a str,
    avg_rank: String,
    n_responses: u64,
}

/// Renders the ranking as CSV, in the given order.
///
/// The header is always written, even when there is no row.
pub fn ranking_csv(rankings: &[RankingRow]) -> CoreRankResult<Vec<u8>> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(vec![]);
    wtr.write_record(&CSV_HEADER)
        .context(SerializingCsvSnafu {})?;
    for r in rankings {
        wtr.serialize(CsvRankingRow {
            course: &r.course,
            avg_rank: format!("{:.2}", r.avg_rank),
            n_responses: r.n_responses,
        })
        .context(SerializingCsvSnafu {})?;
    }
    wtr.into_inner()
        .map_err(|e| e.into_error())
        .context(BufferingCsvSnafu {})
}

/// Reads a reference CSV file.
pub fn read_reference(reference: &Path) -> CoreRankResult<String> {
    let path = reference.display().to_string();
    fs::read_to_string(reference).context(ReadingReferenceSnafu { path })
}

/// Compares a generated ranking with the content of a reference CSV file.
///
/// Prints a line diff and fails if they are not identical.
pub fn check_reference(
    reference: &Path,
    expected: &str,
    generated: &[u8],
) -> CoreRankResult<()> {
    let path = reference.display().to_string();
    let generated = String::from_utf8_lossy(generated);
    if expected != generated {
        warn!("Found differences with the reference ranking {}", path);
        print_diff(expected, &generated, "\n");
        return ReferenceMismatchSnafu { path }.fail();
    }
    info!("The ranking matches the reference {}", path);
    Ok(())
}
