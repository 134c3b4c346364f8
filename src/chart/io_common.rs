use std::path::Path;

use crate::chart::*;

pub fn simplify_file_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or(path)
        .to_string()
}

/// The column indexes of the speaker, the ruling and the count, looked up by name in the header.
pub fn column_indexes(
    header: &[String],
    src: &InputSource,
    path: &str,
) -> BiasResult<(usize, usize, usize)> {
    let find = |name: &str| -> BiasResult<usize> {
        header
            .iter()
            .position(|h| h.trim() == name)
            .context(MissingColumnSnafu { column: name, path })
    };
    let res = (
        find(src.speaker_column())?,
        find(src.ruling_column())?,
        find(src.count_column())?,
    );
    debug!("column_indexes: {:?} in {:?}", res, simplify_file_name(path));
    Ok(res)
}

/// Parses a count. An empty cell counts as zero.
pub fn parse_count(content: &str, lineno: usize, path: &str) -> BiasResult<f64> {
    let s = content.trim();
    if s.is_empty() {
        return Ok(0.0);
    }
    match s.parse::<f64>() {
        Ok(x) if x.is_finite() && x >= 0.0 => Ok(x),
        _ => InvalidCountSnafu {
            lineno,
            content: s,
            path,
        }
        .fail(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(cols: &[&str]) -> Vec<String> {
        cols.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn finds_columns_by_name() {
        let src = InputSource::default();
        let h = header(&["count", "extra", "speaker", " ruling "]);
        assert_eq!(column_indexes(&h, &src, "x.csv").unwrap(), (2, 3, 0));

        let h = header(&["speaker", "ruling"]);
        match column_indexes(&h, &src, "x.csv") {
            Err(BiasError::MissingColumn { column, .. }) => assert_eq!(column, "count"),
            x => panic!("unexpected {:?}", x),
        }
    }

    #[test]
    fn counts() {
        assert_eq!(parse_count(" 12 ", 2, "x.csv").unwrap(), 12.0);
        assert_eq!(parse_count("", 2, "x.csv").unwrap(), 0.0);
        assert_eq!(parse_count("2.5", 2, "x.csv").unwrap(), 2.5);
        assert!(matches!(
            parse_count("many", 7, "x.csv"),
            Err(BiasError::InvalidCount { lineno: 7, .. })
        ));
        assert!(parse_count("-1", 2, "x.csv").is_err());
        assert!(parse_count("NaN", 2, "x.csv").is_err());
    }

    #[test]
    fn file_names() {
        assert_eq!(simplify_file_name("a/b/ratings.csv"), "ratings.csv");
        assert_eq!(simplify_file_name("ratings.csv"), "ratings.csv");
    }
}
