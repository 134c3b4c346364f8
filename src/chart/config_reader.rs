use crate::chart::*;

use diverging_stack::Taxonomy;
use serde::{Deserialize, Serialize};

#[derive(PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputSettings {
    #[serde(rename = "outputPath")]
    pub output_path: Option<String>,
    #[serde(rename = "summaryPath")]
    pub summary_path: Option<String>,
    #[serde(rename = "chartTitle")]
    pub chart_title: Option<String>,
    pub width: Option<f64>,
    #[serde(rename = "rowHeight")]
    pub row_height: Option<f64>,
    #[serde(rename = "showLegend")]
    pub show_legend: Option<bool>,
}

#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct InputSource {
    pub provider: String,
    #[serde(rename = "filePath")]
    pub file_path: String,
    #[serde(rename = "speakerColumn")]
    pub speaker_column: Option<String>,
    #[serde(rename = "rulingColumn")]
    pub ruling_column: Option<String>,
    #[serde(rename = "countColumn")]
    pub count_column: Option<String>,
    #[serde(rename = "excelWorksheetName")]
    pub excel_worksheet_name: Option<String>,
}

impl InputSource {
    pub fn speaker_column(&self) -> &str {
        self.speaker_column.as_deref().unwrap_or("speaker")
    }

    pub fn ruling_column(&self) -> &str {
        self.ruling_column.as_deref().unwrap_or("ruling")
    }

    pub fn count_column(&self) -> &str {
        self.count_column.as_deref().unwrap_or("count")
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct RulingConfig {
    pub ruling: String,
    pub label: String,
    pub color: Option<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct CategoriesConfig {
    pub rulings: Vec<RulingConfig>,
    pub negatives: Vec<String>,
    pub positives: Vec<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct LabelsConfig {
    pub negative: Option<String>,
    pub positive: Option<String>,
}

#[derive(PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChartConfig {
    #[serde(rename = "outputSettings", default)]
    pub output_settings: OutputSettings,
    #[serde(rename = "inputSources", default)]
    pub input_sources: Vec<InputSource>,
    #[serde(default)]
    pub categories: Option<CategoriesConfig>,
    #[serde(default)]
    pub labels: Option<LabelsConfig>,
}

impl ChartConfig {
    /// The taxonomy described by the configuration, the PolitiFact one if none is given.
    /// It still needs to be validated.
    pub fn taxonomy(&self) -> Taxonomy {
        let mut tax = Taxonomy::politifact();
        if let Some(cats) = &self.categories {
            tax.rulings = cats
                .rulings
                .iter()
                .map(|r| (r.ruling.clone(), r.label.clone()))
                .collect();
            tax.negatives = cats.negatives.clone();
            tax.positives = cats.positives.clone();
        }
        if let Some(labels) = &self.labels {
            if let Some(n) = &labels.negative {
                tax.negative_caption = n.clone();
            }
            if let Some(p) = &labels.positive {
                tax.positive_caption = p.clone();
            }
        }
        tax
    }

    /// (label, color) pairs overriding the default palette.
    pub fn colors(&self) -> Vec<(String, String)> {
        match &self.categories {
            Some(cats) => cats
                .rulings
                .iter()
                .filter_map(|r| r.color.clone().map(|c| (r.label.clone(), c)))
                .collect(),
            None => Vec::new(),
        }
    }
}

pub fn read_config(path: &str) -> BiasResult<ChartConfig> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let config: ChartConfig = serde_json::from_str(&contents).context(ParsingJsonSnafu {})?;
    Ok(config)
}

pub fn read_reference(path: &str) -> BiasResult<String> {
    let contents = fs::read_to_string(path).context(OpeningReferenceSnafu { path })?;
    debug!("read_reference: {:?} bytes", contents.len());
    Ok(contents)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_is_politifact() {
        let config: ChartConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, ChartConfig::default());
        assert_eq!(config.taxonomy(), Taxonomy::politifact());
        assert!(config.colors().is_empty());
    }

    #[test]
    fn custom_categories() {
        let js = r##"{
            "outputSettings": {"width": 500, "showLegend": true},
            "inputSources": [{"provider": "csv", "filePath": "r.csv", "countColumn": "n"}],
            "categories": {
                "rulings": [
                    {"ruling": "lie", "label": "Lie", "color": "#ff0000"},
                    {"ruling": "fib", "label": "Lie"},
                    {"ruling": "fact", "label": "Fact"}
                ],
                "negatives": ["Lie"],
                "positives": ["Fact"]
            },
            "labels": {"positive": "Facts"}
        }"##;
        let config: ChartConfig = serde_json::from_str(js).unwrap();
        assert_eq!(config.output_settings.width, Some(500.0));
        let src = &config.input_sources[0];
        assert_eq!(src.count_column(), "n");
        assert_eq!(src.speaker_column(), "speaker");

        let tax = config.taxonomy();
        assert_eq!(tax.label("fib"), Some("Lie"));
        assert_eq!(tax.label("pants-fire"), None);
        assert_eq!(tax.positive_caption, "Facts");
        assert_eq!(tax.negative_caption, "← More falsehoods");
        assert!(tax.validate().is_ok());
        assert_eq!(
            config.colors(),
            vec![("Lie".to_string(), "#ff0000".to_string())]
        );
    }

    #[test]
    fn reads_fixture() {
        let p = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("tests")
            .join("data")
            .join("chart_config.json");
        let config = read_config(&p.display().to_string()).unwrap();
        assert_eq!(config.input_sources.len(), 1);
        assert!(read_config("does/not/exist.json").is_err());
    }

    #[test]
    fn missing_reference() {
        assert!(matches!(
            read_reference("does/not/exist.svg"),
            Err(BiasError::OpeningReference { .. })
        ));
    }
}
