// Primitives for reading Excel survey exports.

use calamine::{open_workbook, DataType, Range, Reader, Xlsx};
use course_ranking::{Cell, RawTable};
use log::{debug, info};
use snafu::prelude::*;

use std::path::Path;

use crate::corerank::*;

/// Reads the survey table from a workbook.
///
/// The first row of the worksheet is the header. When no worksheet name is given,
/// the first worksheet is used.
pub fn read_survey(path: &Path, worksheet_name: Option<&str>) -> CoreRankResult<RawTable> {
    let path_s = path.display().to_string();
    ensure!(path.exists(), MissingInputSnafu { path: &path_s });

    let wrange = get_range(path, worksheet_name)?;
    let mut rows = wrange.rows();
    let header = rows.next().context(EmptyExcelSnafu { path: path_s.clone() })?;
    let headers: Vec<String> = header.iter().map(read_header).collect();
    debug!("read_survey: headers: {:?}", headers);

    let data: Vec<Vec<Cell>> = rows
        .map(|row| row.iter().map(read_cell).collect())
        .collect();
    info!(
        "Read {} rows and {} columns from {}",
        data.len(),
        headers.len(),
        path_s
    );
    Ok(RawTable::new(headers, data))
}

fn get_range(path: &Path, worksheet_name: Option<&str>) -> CoreRankResult<Range<DataType>> {
    let path_s = path.display().to_string();
    let mut workbook: Xlsx<_> = open_workbook(path).context(OpeningExcelSnafu {
        path: path_s.clone(),
    })?;

    // A worksheet name was provided, use it.
    if let Some(name) = worksheet_name {
        debug!("get_range: path: {:?} worksheet: {:?}", path_s, name);
        workbook
            .worksheet_range(name)
            .context(MissingWorksheetSnafu { name })?
            .context(OpeningExcelSnafu { path: path_s })
    } else {
        workbook
            .worksheet_range_at(0)
            .context(EmptyExcelSnafu {
                path: path_s.clone(),
            })?
            .context(OpeningExcelSnafu { path: path_s })
    }
}

fn read_header(cell: &DataType) -> String {
    match cell {
        DataType::String(s) => s.clone(),
        DataType::Empty => String::new(),
        DataType::Float(f) => f.to_string(),
        DataType::Int(i) => i.to_string(),
        other => format!("{:?}", other),
    }
}

fn read_cell(cell: &DataType) -> Cell {
    match cell {
        DataType::Empty => Cell::Empty,
        DataType::Float(f) => Cell::Number(*f),
        DataType::Int(i) => Cell::Number(*i as f64),
        DataType::String(s) => Cell::Text(s.clone()),
        other => Cell::Other(format!("{:?}", other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corerank::tests::fixture;

    #[test]
    fn reads_headers_and_cells() {
        let table = read_survey(&fixture("exit_survey.xlsx"), None).unwrap();
        assert_eq!(table.headers.len(), 6);
        assert_eq!(table.headers[0], "Respondent ID");
        assert_eq!(table.headers[2], "MAcc  Core  Tax | most beneficial");
        assert_eq!(table.num_rows(), 5);
        assert_eq!(table.cell(0, 1), &Cell::Number(1.0));
        assert_eq!(table.cell(1, 3), &Cell::Text("N/A".to_string()));
        assert_eq!(table.cell(2, 1), &Cell::Empty);
        assert_eq!(table.cell(3, 2), &Cell::Text("2".to_string()));
    }

    #[test]
    fn reads_named_worksheet() {
        let table = read_survey(&fixture("exit_survey.xlsx"), Some("Notes")).unwrap();
        assert_eq!(table.headers, vec!["Prepared by".to_string()]);
        assert_eq!(table.num_rows(), 1);
    }

    #[test]
    fn unknown_worksheet() {
        let res = read_survey(&fixture("exit_survey.xlsx"), Some("Form2"));
        assert!(matches!(res, Err(CoreRankError::MissingWorksheet { .. })));
    }

    #[test]
    fn missing_file_names_the_path() {
        let res = read_survey(Path::new("data/nowhere.xlsx"), None);
        match res {
            Err(e @ CoreRankError::MissingInput { .. }) => {
                assert!(e.to_string().contains("'data/nowhere.xlsx'"));
            }
            x => panic!("unexpected result {:?}", x),
        }
    }

    #[test]
    fn cell_mapping() {
        assert_eq!(read_cell(&DataType::Int(3)), Cell::Number(3.0));
        assert_eq!(read_cell(&DataType::Bool(true)), Cell::Other("Bool(true)".to_string()));
        assert_eq!(read_header(&DataType::Float(601.0)), "601");
    }
}
