use calamine::{open_workbook, DataType, Reader, Xlsx};

use crate::chart::{
    io_common::{column_indexes, parse_count},
    *,
};

pub fn read_excel_ratings(
    path: &str,
    src: &InputSource,
    taxonomy: &Taxonomy,
) -> BiasResult<Vec<RawRow>> {
    let wrange = get_range(path, src)?;

    let mut iter = wrange.rows();
    let header: Vec<String> = iter
        .next()
        .context(EmptyExcelSnafu { path })?
        .iter()
        .map(|c| read_cell_string(c, 1))
        .collect::<BiasResult<Vec<String>>>()?;
    debug!("read_excel_ratings: header: {:?}", header);
    let (speaker_idx, ruling_idx, count_idx) = column_indexes(&header, src, path)?;

    let mut res: Vec<RawRow> = Vec::new();
    for (idx, row) in iter.enumerate() {
        // The header is the first line, like in the spreadsheet.
        let lineno = idx + 2;
        if row.iter().all(|c| matches!(c, DataType::Empty)) {
            continue;
        }
        let cell = |i: usize| -> DataType { row.get(i).cloned().unwrap_or(DataType::Empty) };
        let ruling = read_cell_string(&cell(ruling_idx), lineno)?;
        let ruling = ruling.trim();
        if taxonomy.label(ruling).is_none() {
            debug!("read_excel_ratings: lineno: {:?} skipping ruling {:?}", lineno, ruling);
            continue;
        }
        let speaker = read_cell_string(&cell(speaker_idx), lineno)?;
        let count = read_cell_count(&cell(count_idx), lineno, path)?;
        let pb = RawRow {
            speaker: speaker.trim().to_string(),
            ruling: ruling.to_string(),
            count,
        };
        debug!("read_excel_ratings: lineno: {:?} row: {:?}", lineno, &pb);
        res.push(pb);
    }
    Ok(res)
}

fn read_cell_string(cell: &DataType, lineno: usize) -> BiasResult<String> {
    match cell {
        DataType::String(s) => Ok(s.clone()),
        DataType::Int(i) => Ok(i.to_string()),
        DataType::Float(f) => Ok(f.to_string()),
        DataType::Bool(b) => Ok(b.to_string()),
        DataType::Empty => Ok("".to_string()),
        _ => ExcelWrongCellTypeSnafu {
            lineno,
            content: format!("{:?}", cell),
        }
        .fail(),
    }
}

fn read_cell_count(cell: &DataType, lineno: usize, path: &str) -> BiasResult<f64> {
    match cell {
        DataType::Float(f) => parse_count(&f.to_string(), lineno, path),
        DataType::Int(i) => parse_count(&i.to_string(), lineno, path),
        DataType::String(s) => parse_count(s, lineno, path),
        DataType::Empty => Ok(0.0),
        _ => ExcelWrongCellTypeSnafu {
            lineno,
            content: format!("{:?}", cell),
        }
        .fail(),
    }
}

fn get_range(path: &str, src: &InputSource) -> BiasResult<calamine::Range<DataType>> {
    let worksheet_name_o = src.excel_worksheet_name.clone();
    debug!(
        "read_excel_ratings: path: {:?} worksheet: {:?}",
        &path, &worksheet_name_o
    );
    let mut workbook: Xlsx<_> = open_workbook(path).context(OpeningExcelSnafu { path })?;

    // A worksheet name was provided, use it.
    if let Some(worksheet_name) = worksheet_name_o {
        let wrange = workbook
            .worksheet_range(&worksheet_name)
            .context(EmptyExcelSnafu { path })?
            .context(OpeningExcelSnafu { path })?;
        Ok(wrange)
    } else {
        let wrange = workbook
            .worksheet_range_at(0)
            .context(EmptyExcelSnafu { path })?
            .context(OpeningExcelSnafu { path })?;
        Ok(wrange)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture() -> String {
        std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("tests")
            .join("data")
            .join("ratings.xlsx")
            .display()
            .to_string()
    }

    #[test]
    fn cell_strings() {
        assert_eq!(
            read_cell_string(&DataType::String("Ann".to_string()), 2).unwrap(),
            "Ann"
        );
        assert_eq!(read_cell_string(&DataType::Int(3), 2).unwrap(), "3");
        assert_eq!(read_cell_string(&DataType::Empty, 2).unwrap(), "");
        assert!(matches!(
            read_cell_string(&DataType::Error(calamine::CellErrorType::NA), 4),
            Err(BiasError::ExcelWrongCellType { lineno: 4, .. })
        ));
    }

    #[test]
    fn cell_counts() {
        assert_eq!(read_cell_count(&DataType::Float(4.0), 2, "x.xlsx").unwrap(), 4.0);
        assert_eq!(read_cell_count(&DataType::Int(7), 2, "x.xlsx").unwrap(), 7.0);
        assert_eq!(
            read_cell_count(&DataType::String(" 5 ".to_string()), 2, "x.xlsx").unwrap(),
            5.0
        );
        assert_eq!(read_cell_count(&DataType::Empty, 2, "x.xlsx").unwrap(), 0.0);
        assert!(matches!(
            read_cell_count(&DataType::Bool(true), 9, "x.xlsx"),
            Err(BiasError::ExcelWrongCellType { lineno: 9, .. })
        ));
        assert!(read_cell_count(&DataType::Int(-2), 2, "x.xlsx").is_err());
    }

    #[test]
    fn missing_workbook() {
        let src = InputSource::default();
        assert!(matches!(
            read_excel_ratings("does/not/exist.xlsx", &src, &Taxonomy::politifact()),
            Err(BiasError::OpeningExcel { .. })
        ));
    }

    #[test]
    fn reads_fixture() {
        let rows =
            read_excel_ratings(&fixture(), &InputSource::default(), &Taxonomy::politifact())
                .unwrap();
        // The full-flop row has no valid count but is skipped anyway.
        let rulings: Vec<&str> = rows.iter().map(|r| r.ruling.as_str()).collect();
        assert_eq!(rulings, vec!["false", "true", "barely-true", "half-true"]);
        assert_eq!(rows[0].speaker, "Speaker A");
        assert_eq!(rows[0].count, 3.0);
        assert_eq!(rows[3].count, 4.0);
    }

    #[test]
    fn reads_named_worksheet() {
        let src = InputSource {
            excel_worksheet_name: Some("extra".to_string()),
            ..InputSource::default()
        };
        let rows = read_excel_ratings(&fixture(), &src, &Taxonomy::politifact()).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].speaker, "Speaker C");
        assert_eq!(rows[0].ruling, "pants-fire");
        assert_eq!(rows[0].count, 5.0);
    }
}
