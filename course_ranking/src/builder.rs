use log::{debug, warn};
use std::collections::HashMap;

pub use crate::config::*;
use crate::{coerce_rank, course_label, is_core_most_beneficial, sorted_rankings, RankAccumulator};

/// A builder for feeding survey answers one column (or one cell) at a time.
///
/// It is useful when the answers do not come as a full table, for example when
/// streaming them out of another reader.
///
/// ```
/// use course_ranking::builder::Builder;
/// # use course_ranking::{Cell, RankingErrors};
///
/// let mut builder = Builder::new();
/// builder.add_column(
///     "MAcc CORE Tax - Most Beneficial",
///     &[Cell::Number(1.0), Cell::Empty, Cell::Number(2.0)],
/// );
/// // Not a core course question: ignored.
/// builder.add_column("Comments", &[Cell::Text("great".to_string())]);
///
/// let outcome = builder.build()?;
/// assert_eq!(outcome.rankings[0].course, "Tax");
/// assert_eq!(outcome.rankings[0].avg_rank, 1.5);
/// assert_eq!(outcome.observations_dropped, 1);
///
/// # Ok::<(), RankingErrors>(())
/// ```
#[derive(Debug, Default)]
pub struct Builder {
    pub(crate) _matched_columns: Vec<String>,
    pub(crate) _rows_processed: Option<usize>,
    pub(crate) _courses: HashMap<String, RankAccumulator>,
    pub(crate) _kept: u64,
    pub(crate) _dropped: u64,
}

impl Builder {
    pub fn new() -> Builder {
        Builder::default()
    }

    /// Sets the number of respondents (data rows) behind the answers.
    ///
    /// If not set, the length of the longest column that was added is used.
    pub fn rows_processed(self, rows: usize) -> Builder {
        Builder {
            _rows_processed: Some(rows),
            ..self
        }
    }

    /// Adds all the answers of one column.
    ///
    /// Returns false (and ignores the column) if the header is not a
    /// "most beneficial core course" question.
    pub fn add_column<'a, I>(&mut self, header: &str, cells: I) -> bool
    where
        I: IntoIterator<Item = &'a Cell>,
    {
        if !is_core_most_beneficial(header) {
            debug!("add_column: skipping header {:?}", header);
            return false;
        }
        let label = course_label(header);
        debug!("add_column: header {:?} -> course {:?}", header, label);
        self._matched_columns.push(header.to_string());
        let mut num_cells: usize = 0;
        for cell in cells {
            self.record(&label, cell);
            num_cells += 1;
        }
        self.observe_rows(num_cells);
        true
    }

    /// Adds a single answer.
    ///
    /// The header is registered as a matched column the first time it is seen.
    /// Returns false if the header is not a "most beneficial core course" question.
    pub fn add_observation(&mut self, header: &str, cell: &Cell) -> bool {
        if !is_core_most_beneficial(header) {
            return false;
        }
        if !self._matched_columns.iter().any(|h| h == header) {
            self._matched_columns.push(header.to_string());
        }
        let label = course_label(header);
        self.record(&label, cell);
        true
    }

    pub fn build(self) -> Result<RankingOutcome, RankingErrors> {
        if self._matched_columns.is_empty() {
            return Err(RankingErrors::NoMatchingColumns);
        }
        if self._dropped > 0 {
            warn!(
                "build: dropped {} blank or non-numeric answers ({} kept)",
                self._dropped, self._kept
            );
        }
        let rankings = sorted_rankings(&self._courses);
        if rankings.is_empty() {
            warn!("build: no numeric answer found in the matched columns");
        }
        Ok(RankingOutcome {
            matched_columns: self._matched_columns,
            rows_processed: self._rows_processed.unwrap_or(0),
            observations_kept: self._kept,
            observations_dropped: self._dropped,
            rankings,
        })
    }

    fn record(&mut self, label: &str, cell: &Cell) {
        match coerce_rank(cell) {
            Some(rank) => {
                self._courses
                    .entry(label.to_string())
                    .or_default()
                    .push(rank);
                self._kept += 1;
            }
            None => {
                debug!("record: course {:?}: dropping cell {:?}", label, cell);
                self._dropped += 1;
            }
        }
    }

    fn observe_rows(&mut self, num_cells: usize) {
        if let Some(rows) = self._rows_processed {
            if rows >= num_cells {
                return;
            }
        }
        self._rows_processed = Some(num_cells);
    }
}
