// ********* Input data structures ***********

use std::error::Error;
use std::fmt::Display;

/// The content of one cell of a survey export.
///
/// Readers are expected to map their native cell types onto this enumeration.
/// Only `Number` and `Text` may carry a rank; everything else is dropped during
/// the aggregation.
#[derive(PartialEq, Debug, Clone)]
pub enum Cell {
    /// A blank cell (skipped question).
    Empty,
    /// A numeric cell, as stored by the spreadsheet.
    Number(f64),
    /// A textual cell. It may still hold a number written out as text.
    Text(String),
    /// Booleans, dates, spreadsheet errors and other cell kinds.
    /// They are kept for debugging but never count as a rank.
    Other(String),
}

static EMPTY_CELL: Cell = Cell::Empty;

/// A survey export: one header row and the data rows below it.
///
/// Rows may be shorter than the header. The missing trailing cells are
/// treated as blank.
#[derive(PartialEq, Debug, Clone, Default)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl RawTable {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<Cell>>) -> RawTable {
        RawTable { headers, rows }
    }

    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    /// The cell at the given position, or a blank cell when the row is too short.
    pub fn cell(&self, row: usize, col: usize) -> &Cell {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&EMPTY_CELL)
    }
}

// ******** Output data structures *********

/// One aggregated course.
#[derive(PartialEq, Debug, Clone)]
pub struct RankingRow {
    pub course: String,
    /// Average rank, rounded half to even at `AVG_RANK_DECIMALS` decimals.
    pub avg_rank: f64,
    pub n_responses: u64,
}

/// Number of decimals kept for the average rank.
pub const AVG_RANK_DECIMALS: i32 = 2;

/// The result of ranking a survey.
#[derive(PartialEq, Debug, Clone)]
pub struct RankingOutcome {
    /// The raw headers of the columns that were used, in table order.
    pub matched_columns: Vec<String>,
    /// Number of data rows in the source table.
    pub rows_processed: usize,
    /// Observations that carried a numeric rank.
    pub observations_kept: u64,
    /// Observations that were blank or not numeric.
    pub observations_dropped: u64,
    /// Sorted by average rank, then number of responses (descending), then name.
    pub rankings: Vec<RankingRow>,
}

/// Errors that prevent the ranking from completing.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum RankingErrors {
    /// No header satisfies the core / most beneficial predicate.
    NoMatchingColumns,
    /// The table does not even have a header row.
    EmptyTable,
}

impl Error for RankingErrors {}

impl Display for RankingErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RankingErrors::NoMatchingColumns => write!(
                f,
                "No matching columns found for MAcc CORE + Most Beneficial. \
                 Searched headers case-insensitively for all terms: 'MAcc', 'CORE', and 'Most Beneficial'."
            ),
            RankingErrors::EmptyTable => write!(f, "The survey table has no header row"),
        }
    }
}
