// Primitives for reading CSV files.

use std::io::Read;

use crate::chart::{
    io_common::{column_indexes, parse_count, simplify_file_name},
    *,
};

pub fn read_csv_ratings(
    path: &str,
    src: &InputSource,
    taxonomy: &Taxonomy,
) -> BiasResult<Vec<RawRow>> {
    let rdr = reader_builder()
        .from_path(path)
        .context(OpeningCsvSnafu { path })?;
    read_records(rdr, src, taxonomy, path)
}

fn reader_builder() -> csv::ReaderBuilder {
    let mut builder = csv::ReaderBuilder::new();
    // Short lines are reported with their line number instead of failing in the reader.
    builder
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All);
    builder
}

fn read_records<R: Read>(
    mut rdr: csv::Reader<R>,
    src: &InputSource,
    taxonomy: &Taxonomy,
    path: &str,
) -> BiasResult<Vec<RawRow>> {
    let header: Vec<String> = rdr
        .headers()
        .context(CsvLineParseSnafu { path })?
        .iter()
        .map(|s| s.to_string())
        .collect();
    let (speaker_idx, ruling_idx, count_idx) = column_indexes(&header, src, path)?;

    let mut res: Vec<RawRow> = Vec::new();
    for (idx, line_r) in rdr.records().enumerate() {
        let line = line_r.context(CsvLineParseSnafu { path })?;
        // The header is line 1.
        let lineno = line
            .position()
            .map(|p| p.line() as usize)
            .unwrap_or(idx + 2);
        if line.iter().all(|s| s.is_empty()) {
            continue;
        }
        // Rows with an unknown ruling are dropped before looking at the other cells.
        let ruling = line.get(ruling_idx).unwrap_or_default();
        if taxonomy.label(ruling).is_none() {
            debug!("read_csv_ratings: lineno: {:?} skipping ruling {:?}", lineno, ruling);
            continue;
        }
        let row = RawRow {
            speaker: field(&line, speaker_idx, lineno, path)?.to_string(),
            ruling: ruling.to_string(),
            count: parse_count(field(&line, count_idx, lineno, path)?, lineno, path)?,
        };
        debug!("read_csv_ratings: lineno: {:?} row: {:?}", lineno, &row);
        res.push(row);
    }
    info!(
        "read_csv_ratings: {:?} rows in {:?}",
        res.len(),
        simplify_file_name(path)
    );
    Ok(res)
}

fn field<'a>(
    line: &'a csv::StringRecord,
    idx: usize,
    lineno: usize,
    path: &str,
) -> BiasResult<&'a str> {
    line.get(idx).context(CsvLineTooShortSnafu { lineno, path })
}
