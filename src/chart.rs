use log::{debug, info, warn};

use diverging_stack::layout::{compute_layout, ChartDimensions};
use diverging_stack::*;
use snafu::{prelude::*, Snafu};

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::json;
use serde_json::Value as JSValue;
use text_diff::print_diff;

use crate::args::Args;
use crate::chart::config_reader::*;

mod config_reader;
mod io_common;
mod io_csv;
mod io_excel;
mod svg;

#[derive(Debug, Snafu)]
pub enum BiasError {
    #[snafu(display("Error opening file {path}"))]
    OpeningExcel {
        source: calamine::XlsxError,
        path: String,
    },
    #[snafu(display("No worksheet found in {path}"))]
    EmptyExcel { path: String },
    #[snafu(display("Unexpected cell at line {lineno}: {content}"))]
    ExcelWrongCellType { lineno: usize, content: String },
    #[snafu(display("Error opening file {path}"))]
    OpeningCsv { source: csv::Error, path: String },
    #[snafu(display("Error reading a line of {path}"))]
    CsvLineParse { source: csv::Error, path: String },
    #[snafu(display("Line {lineno} of {path} is too short"))]
    CsvLineTooShort { lineno: usize, path: String },
    #[snafu(display("Column {column:?} not found in the header of {path}"))]
    MissingColumn { column: String, path: String },
    #[snafu(display("Line {lineno} of {path}: {content:?} is not a valid count"))]
    InvalidCount {
        lineno: usize,
        content: String,
        path: String,
    },
    #[snafu(display("Error opening file {path}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error opening reference chart {path}"))]
    OpeningReference {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing JSON"))]
    ParsingJson { source: serde_json::Error },
    #[snafu(display("Error writing file {path}"))]
    WritingOutput {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Cannot find the directory of {path}"))]
    MissingParentDir { path: String },
    #[snafu(display("Cannot build the chart"))]
    Chart { source: ChartErrors },

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type BiasResult<T> = Result<T, BiasError>;

const STDOUT: &str = "stdout";

/// Reads the rows of one input source. Rows with an unknown ruling are skipped.
fn read_ratings(
    root_path: &Path,
    src: &InputSource,
    taxonomy: &Taxonomy,
) -> BiasResult<Vec<RawRow>> {
    let p: PathBuf = root_path.join(&src.file_path);
    let p2 = p.as_path().display().to_string();
    info!("Attempting to read ratings file {:?}", p2);
    match src.provider.as_str() {
        "csv" => io_csv::read_csv_ratings(&p2, src, taxonomy),
        "xlsx" | "excel" => io_excel::read_excel_ratings(&p2, src, taxonomy),
        x => whatever!("Provider not implemented {:?}", x),
    }
}

fn infer_provider(path: &str) -> String {
    let ext = Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase());
    match ext.as_deref() {
        Some("xlsx") | Some("xlsm") => "xlsx".to_string(),
        _ => "csv".to_string(),
    }
}

/// The input sources and the directory their paths are relative to.
/// An input given on the command line replaces the sources of the configuration.
fn input_sources(args: &Args, config: &ChartConfig, root: &Path) -> Vec<(PathBuf, InputSource)> {
    if let Some(input) = args.input.clone() {
        let provider = args
            .input_type
            .clone()
            .unwrap_or_else(|| infer_provider(&input));
        let src = InputSource {
            provider,
            file_path: input,
            excel_worksheet_name: args.excel_worksheet_name.clone(),
            ..InputSource::default()
        };
        vec![(PathBuf::new(), src)]
    } else {
        config
            .input_sources
            .iter()
            .map(|src| (root.to_path_buf(), src.clone()))
            .collect()
    }
}

fn dimensions(args: &Args, config: &ChartConfig) -> ChartDimensions {
    let settings = &config.output_settings;
    let mut dims = ChartDimensions::DEFAULT;
    if let Some(w) = args.width.map(|w| w as f64).or(settings.width) {
        dims.width = w;
    }
    if let Some(h) = settings.row_height {
        dims.row_height = h;
    }
    dims.legend = args.legend || settings.show_legend.unwrap_or(false);
    dims
}

fn color_scale(taxonomy: &Taxonomy, config: &ChartConfig) -> scale::OrdinalScale {
    let mut color = scale::OrdinalScale::spectral(taxonomy.color_domain());
    for (label, c) in config.colors() {
        debug!("color_scale: {} -> {}", label, c);
        color.set_color(&label, &c);
    }
    color
}

/// The summary of the chart: for every speaker in display order, the bias and the share of
/// each category.
fn build_summary_js(config: &ChartConfig, taxonomy: &Taxonomy, data: &ChartData) -> JSValue {
    let speakers: Vec<JSValue> = data
        .bias
        .iter()
        .map(|b| {
            let shares: Vec<JSValue> = taxonomy
                .color_domain()
                .iter()
                .filter_map(|category| {
                    data.records
                        .iter()
                        .find(|r| r.name == b.name && r.category == *category)
                        .map(|r| json!({"category": category, "share": r.value}))
                })
                .collect();
            json!({"name": b.name, "bias": b.bias, "shares": shares})
        })
        .collect();
    json!({
        "config": {
            "title": config.output_settings.chart_title,
            "negatives": taxonomy.negatives,
            "positives": taxonomy.positives,
        },
        "speakers": speakers
    })
}

fn write_output(path: &str, content: &str) -> BiasResult<()> {
    if path == STDOUT {
        println!("{}", content);
        Ok(())
    } else {
        info!("Writing {:?}", path);
        fs::write(path, content).context(WritingOutputSnafu { path })
    }
}

/// Resolves an output path of the configuration file against its directory.
fn config_relative(root: &Path, path: &str) -> String {
    if path == STDOUT {
        path.to_string()
    } else {
        root.join(path).display().to_string()
    }
}

pub fn run_chart(args: &Args) -> BiasResult<()> {
    let (config, root) = match args.config.clone() {
        Some(config_path) => {
            let config = read_config(&config_path)?;
            let root = Path::new(config_path.as_str())
                .parent()
                .context(MissingParentDirSnafu { path: config_path.clone() })?
                .to_path_buf();
            (config, root)
        }
        None => (ChartConfig::default(), PathBuf::new()),
    };
    info!("config: {:?}", config);

    let taxonomy = config.taxonomy();
    taxonomy.validate().context(ChartSnafu {})?;

    let sources = input_sources(args, &config, &root);
    if sources.is_empty() {
        whatever!("No input: pass --input or list inputSources in the configuration");
    }

    let mut rows: Vec<RawRow> = Vec::new();
    for (src_root, src) in sources.iter() {
        let mut file_rows = read_ratings(src_root, src, &taxonomy)?;
        rows.append(&mut file_rows);
    }
    info!("Read {:?} rows", rows.len());

    let data = run_chart_stats(&rows, &taxonomy).context(ChartSnafu {})?;

    let dims = dimensions(args, &config);
    let color = color_scale(&taxonomy, &config);
    let layout = compute_layout(&data, &taxonomy, &dims, &color);
    let chart_svg = svg::render_svg(
        &layout,
        &svg::SvgOptions {
            title: config.output_settings.chart_title.clone(),
        },
    );

    let out_path = match (&args.out, &config.output_settings.output_path) {
        (Some(p), _) => p.clone(),
        (None, Some(p)) => config_relative(&root, p),
        (None, None) => STDOUT.to_string(),
    };
    write_output(&out_path, &chart_svg)?;

    let summary_path = match (&args.summary, &config.output_settings.summary_path) {
        (Some(p), _) => Some(p.clone()),
        (None, Some(p)) => Some(config_relative(&root, p)),
        (None, None) => None,
    };
    if let Some(p) = summary_path {
        let summary_js = build_summary_js(&config, &taxonomy, &data);
        let pretty = serde_json::to_string_pretty(&summary_js).context(ParsingJsonSnafu {})?;
        write_output(&p, &pretty)?;
    }

    // The reference chart, if provided for comparison
    if let Some(reference_p) = args.reference.clone() {
        let reference = read_reference(&reference_p)?;
        if reference.trim_end() != chart_svg.trim_end() {
            warn!("Found differences with the reference chart");
            print_diff(reference.trim_end(), chart_svg.trim_end(), "\n");
            whatever!("Difference detected between the rendered chart and the reference chart")
        }
        info!("Chart matches the reference {:?}", reference_p);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_dir() -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join("data")
    }

    fn tmp_path(name: &str) -> String {
        std::env::temp_dir()
            .join(format!("biaschart-{}-{}", std::process::id(), name))
            .display()
            .to_string()
    }

    fn base_args() -> Args {
        Args {
            config: None,
            reference: None,
            out: None,
            summary: None,
            input: None,
            input_type: None,
            width: None,
            legend: false,
            excel_worksheet_name: None,
            verbose: false,
        }
    }

    #[test]
    fn infers_provider() {
        assert_eq!(infer_provider("a/b/ratings.XLSX"), "xlsx");
        assert_eq!(infer_provider("ratings.csv"), "csv");
        assert_eq!(infer_provider("ratings"), "csv");
    }

    #[test]
    fn renders_from_input() {
        let out = tmp_path("input.svg");
        let summary = tmp_path("input.json");
        let args = Args {
            input: Some(test_dir().join("ratings.csv").display().to_string()),
            out: Some(out.clone()),
            summary: Some(summary.clone()),
            ..base_args()
        };
        run_chart(&args).unwrap();

        let chart = fs::read_to_string(&out).unwrap();
        assert!(chart.starts_with("<svg"));
        // Four speakers, 33 pixels each, plus the top margin.
        assert!(chart.contains(r#"height="172""#));

        let js: JSValue = serde_json::from_str(&fs::read_to_string(&summary).unwrap()).unwrap();
        let speakers = js["speakers"].as_array().unwrap();
        assert_eq!(speakers.len(), 4);
        let biases: Vec<f64> = speakers
            .iter()
            .map(|s| s["bias"].as_f64().unwrap())
            .collect();
        assert!(biases.windows(2).all(|w| w[0] <= w[1]));
        for s in speakers {
            let total: f64 = s["shares"]
                .as_array()
                .unwrap()
                .iter()
                .map(|x| x["share"].as_f64().unwrap())
                .sum();
            assert!((total - 1.0).abs() < 1e-9);
        }
        let _ = fs::remove_file(out);
        let _ = fs::remove_file(summary);
    }

    #[test]
    fn renders_from_config() {
        let out = tmp_path("config.svg");
        let args = Args {
            config: Some(test_dir().join("chart_config.json").display().to_string()),
            out: Some(out.clone()),
            ..base_args()
        };
        run_chart(&args).unwrap();
        let chart = fs::read_to_string(&out).unwrap();
        // Width and colors come from the configuration.
        assert!(chart.contains(r#"width="640""#));
        assert!(chart.contains(r##"fill="#111111""##));
        assert!(chart.contains("<title>Fixture ratings</title>"));
        // The legend adds a strip above the chart.
        assert!(chart.contains(r#"class="legend""#));

        // Rendering again gives the same chart.
        let again = Args {
            reference: Some(out.clone()),
            out: Some(tmp_path("config-again.svg")),
            ..args.clone()
        };
        run_chart(&again).unwrap();
        let _ = fs::remove_file(out);
        let _ = fs::remove_file(tmp_path("config-again.svg"));
    }

    #[test]
    fn reference_mismatch_is_an_error() {
        let args = Args {
            input: Some(test_dir().join("ratings.csv").display().to_string()),
            out: Some(tmp_path("mismatch.svg")),
            reference: Some(test_dir().join("not_a_chart.svg").display().to_string()),
            ..base_args()
        };
        let res = run_chart(&args);
        assert!(matches!(res, Err(BiasError::Whatever { .. })));
        let _ = fs::remove_file(tmp_path("mismatch.svg"));
    }

    #[test]
    fn missing_input_is_an_error() {
        let res = run_chart(&base_args());
        assert!(matches!(res, Err(BiasError::Whatever { .. })));

        let args = Args {
            input: Some(test_dir().join("does_not_exist.csv").display().to_string()),
            ..base_args()
        };
        assert!(matches!(
            run_chart(&args),
            Err(BiasError::OpeningCsv { .. })
        ));
    }

    #[test]
    fn renders_from_excel() {
        let out = tmp_path("excel.svg");
        let args = Args {
            input: Some(test_dir().join("ratings.xlsx").display().to_string()),
            out: Some(out.clone()),
            ..base_args()
        };
        run_chart(&args).unwrap();
        let chart = fs::read_to_string(&out).unwrap();
        // Two speakers, 33 pixels each, plus the top margin.
        assert!(chart.contains(r#"height="106""#));
        assert!(chart.contains("Speaker B"));
        let _ = fs::remove_file(out);
    }

    #[test]
    fn missing_reference_is_an_error() {
        let args = Args {
            input: Some(test_dir().join("ratings.csv").display().to_string()),
            out: Some(tmp_path("no-reference.svg")),
            reference: Some(test_dir().join("does_not_exist.svg").display().to_string()),
            ..base_args()
        };
        assert!(matches!(
            run_chart(&args),
            Err(BiasError::OpeningReference { .. })
        ));
        let _ = fs::remove_file(tmp_path("no-reference.svg"));
    }

    #[test]
    fn only_unknown_rulings_is_an_error() {
        let args = Args {
            input: Some(test_dir().join("unknown_rulings.csv").display().to_string()),
            out: Some(tmp_path("unknown.svg")),
            ..base_args()
        };
        assert!(matches!(
            run_chart(&args),
            Err(BiasError::Chart {
                source: ChartErrors::EmptyChart
            })
        ));
    }
}
