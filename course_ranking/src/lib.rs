mod config;
mod naming;
use log::{debug, info};

use std::{
    cmp::Ordering,
    collections::HashMap,
    ops::{Add, AddAssign},
};

pub mod builder;
pub mod manual;

pub use crate::config::*;
pub use crate::naming::{
    collapse_whitespace, course_label, is_core_most_beneficial, normalize_header, MATCH_TERMS,
};

use crate::builder::Builder;

// **** Private structures ****

#[derive(Eq, PartialEq, Debug, Clone, Copy, PartialOrd, Ord, Hash, Default)]
pub(crate) struct ResponseCount(pub(crate) u64);

impl ResponseCount {
    pub(crate) const EMPTY: ResponseCount = ResponseCount(0);
    pub(crate) const ONE: ResponseCount = ResponseCount(1);
}

impl AddAssign for ResponseCount {
    fn add_assign(&mut self, rhs: ResponseCount) {
        self.0 += rhs.0;
    }
}

impl Add for ResponseCount {
    type Output = ResponseCount;
    fn add(self: ResponseCount, rhs: ResponseCount) -> ResponseCount {
        ResponseCount(self.0 + rhs.0)
    }
}

/// The running total of the ranks given to one course.
// Invariant: count is the number of values folded into sum.
#[derive(PartialEq, Debug, Clone, Default)]
pub(crate) struct RankAccumulator {
    sum: f64,
    count: ResponseCount,
}

impl RankAccumulator {
    pub(crate) fn push(&mut self, rank: f64) {
        self.sum += rank;
        self.count += ResponseCount::ONE;
    }

    fn mean(&self) -> Option<f64> {
        if self.count == ResponseCount::EMPTY {
            None
        } else {
            Some(self.sum / self.count.0 as f64)
        }
    }
}

// **** Public functions ****

/// Finds the columns that hold a "most beneficial core course" question.
///
/// Returns the indices of the matching headers, in table order.
pub fn select_columns(headers: &[String]) -> Result<Vec<usize>, RankingErrors> {
    let selected: Vec<usize> = headers
        .iter()
        .enumerate()
        .filter(|(_, h)| is_core_most_beneficial(h))
        .map(|(idx, _)| idx)
        .collect();
    debug!(
        "select_columns: {} of {} headers selected: {:?}",
        selected.len(),
        headers.len(),
        selected
    );
    if selected.is_empty() {
        return Err(RankingErrors::NoMatchingColumns);
    }
    Ok(selected)
}

/// Reads a cell as a rank.
///
/// Numbers are accepted as-is, text is accepted if it parses as a decimal number.
/// Blanks, booleans, dates and non-finite values are not ranks.
pub fn coerce_rank(cell: &Cell) -> Option<f64> {
    let value = match cell {
        Cell::Number(x) => Some(*x),
        Cell::Text(s) => s.trim().parse::<f64>().ok(),
        Cell::Empty | Cell::Other(_) => None,
    };
    value.filter(|x| x.is_finite())
}

/// Rounds to the given number of decimals, ties going to the even neighbour.
///
/// The rounding applies to the binary value: 2.675 is stored slightly below and
/// rounds to 2.67.
pub fn round_half_even(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round_ties_even() / factor
}

/// Runs the full ranking over a survey table.
///
/// Selects the matching columns, melts them into (course, rank) observations,
/// drops the cells that are not numbers, and averages the ranks per course.
pub fn rank_courses(table: &RawTable) -> Result<RankingOutcome, RankingErrors> {
    if table.headers.is_empty() {
        return Err(RankingErrors::EmptyTable);
    }
    let selected = select_columns(&table.headers)?;
    info!(
        "Processing {} rows over {} matched columns",
        table.num_rows(),
        selected.len()
    );

    let mut builder = Builder::new().rows_processed(table.num_rows());
    for col in selected {
        let cells = (0..table.num_rows()).map(|row| table.cell(row, col));
        builder.add_column(&table.headers[col], cells);
    }
    builder.build()
}

// **** Private functions ****

/// Orders the rows: lowest average first, then most responses, then by name.
fn compare_rows(a: &RankingRow, b: &RankingRow) -> Ordering {
    a.avg_rank
        .total_cmp(&b.avg_rank)
        .then_with(|| b.n_responses.cmp(&a.n_responses))
        .then_with(|| a.course.cmp(&b.course))
}

/// Turns the per-course accumulators into sorted ranking rows.
///
/// The sort uses the rounded averages so the emitted values are ordered.
pub(crate) fn sorted_rankings(courses: &HashMap<String, RankAccumulator>) -> Vec<RankingRow> {
    let mut rows: Vec<RankingRow> = courses
        .iter()
        .filter_map(|(course, acc)| {
            acc.mean().map(|mean| RankingRow {
                course: course.clone(),
                avg_rank: round_half_even(mean, AVG_RANK_DECIMALS),
                n_responses: acc.count.0,
            })
        })
        .collect();
    rows.sort_by(compare_rows);
    debug!("sorted_rankings: {:?}", rows);
    rows
}
