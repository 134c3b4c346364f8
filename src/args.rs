use clap::Parser;

/// This is a program that draws the truthfulness ratings of speakers as a diverging bar chart.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, optional) The JSON file describing the inputs, the categories and the output of the chart.
    /// For more information about the file format, read the documentation of the `manual` module.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,
    /// (file path) A reference SVG file. If provided, biaschart will check that the rendered chart
    /// matches the reference.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    /// (file path, 'stdout' or empty) If specified, the chart will be written in SVG format to the given
    /// location. Setting this option overrides the path that may be specified with the --config option.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (file path, 'stdout' or empty) If specified, the shares and the bias of every speaker will be written
    /// in JSON format to the given location.
    #[clap(short, long, value_parser)]
    pub summary: Option<String>,

    /// (file path or empty) The file with the ratings. Setting this option overrides the input sources
    /// of the --config option.
    #[clap(short, long, value_parser)]
    pub input: Option<String>,

    /// (default csv) The type of the input: csv or xlsx.
    #[clap(long, value_parser)]
    pub input_type: Option<String>,

    /// (pixels, default 928) The width of the chart.
    #[clap(long, value_parser)]
    pub width: Option<u32>,

    /// If passed as an argument, a legend with the color of every category is drawn above the chart.
    #[clap(long, takes_value = false)]
    pub legend: bool,

    /// (default: the first worksheet) When using an Excel file, indicates the name of the worksheet to use.
    #[clap(long, value_parser)]
    pub excel_worksheet_name: Option<String>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
