// ********* Input data structures ***********

use std::error::Error;
use std::fmt::Display;

/// A row as read from the input table, before the taxonomy is applied.
#[derive(PartialEq, Debug, Clone)]
pub struct RawRow {
    pub speaker: String,
    /// The ruling key, for instance `pants-fire`.
    pub ruling: String,
    pub count: f64,
}

/// A rating of one speaker in one category.
///
/// Before normalization `value` is a raw count. After normalization it is the share of
/// this category among all the ratings of the speaker.
#[derive(PartialEq, Debug, Clone)]
pub struct Record {
    pub name: String,
    pub category: String,
    pub value: f64,
}

/// The side of the zero line a category is drawn on.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum Polarity {
    Negative,
    Positive,
}

impl Polarity {
    pub fn sign(&self) -> f64 {
        match self {
            Polarity::Negative => -1.0,
            Polarity::Positive => 1.0,
        }
    }
}

// ******** Output data structures *********

#[derive(PartialEq, Debug, Clone)]
pub struct BiasEntry {
    pub name: String,
    pub bias: f64,
}

/// The band of one speaker within a series.
/// `lower <= upper` always holds; `value` is the signed share.
#[derive(PartialEq, Debug, Clone)]
pub struct SeriesPoint {
    pub name: String,
    pub lower: f64,
    pub upper: f64,
    pub value: f64,
}

/// All the bands of one category, one point per speaker.
#[derive(PartialEq, Debug, Clone)]
pub struct Series {
    pub key: String,
    pub polarity: Polarity,
    pub points: Vec<SeriesPoint>,
}

#[derive(PartialEq, Debug, Clone)]
pub struct ChartData {
    /// Normalized records.
    pub records: Vec<Record>,
    /// Speakers in display order (ascending bias).
    pub bias: Vec<BiasEntry>,
    /// Series in stacking order: negatives from the zero line outwards, then positives.
    pub series: Vec<Series>,
}

/// Errors that prevent the chart data from being computed.
#[derive(PartialEq, Debug, Clone)]
pub enum ChartErrors {
    /// No row survived the category filter.
    EmptyChart,
    InvalidTaxonomy(String),
    InvalidCount { speaker: String, count: f64 },
}

impl Error for ChartErrors {}

impl Display for ChartErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChartErrors::EmptyChart => write!(f, "no rating left to chart"),
            ChartErrors::InvalidTaxonomy(msg) => write!(f, "invalid taxonomy: {}", msg),
            ChartErrors::InvalidCount { speaker, count } => {
                write!(f, "invalid count {} for speaker {:?}", count, speaker)
            }
        }
    }
}

// ********* Taxonomy **********

/// The category taxonomy: which ruling keys are kept, how they are labeled and on
/// which side of the chart each label goes.
///
/// Several ruling keys may share a label. Their counts are then merged.
#[derive(PartialEq, Debug, Clone)]
pub struct Taxonomy {
    /// (ruling key, label), in declaration order.
    pub rulings: Vec<(String, String)>,
    /// Negative labels, from the most to the least severe.
    pub negatives: Vec<String>,
    /// Positive labels, from the least to the most truthful.
    pub positives: Vec<String>,
    pub negative_caption: String,
    pub positive_caption: String,
}

impl Taxonomy {
    /// The PolitiFact Truth-O-Meter. `barely-true` was renamed `mostly-false`
    /// and both end up in the same category.
    pub fn politifact() -> Taxonomy {
        let rulings = [
            ("pants-fire", "Pants on fire!"),
            ("false", "False"),
            ("mostly-false", "Mostly false"),
            ("barely-true", "Mostly false"),
            ("half-true", "Half true"),
            ("mostly-true", "Mostly true"),
            ("true", "True"),
        ];
        Taxonomy {
            rulings: rulings
                .iter()
                .map(|(k, l)| (k.to_string(), l.to_string()))
                .collect(),
            negatives: vec![
                "Pants on fire!".to_string(),
                "False".to_string(),
                "Mostly false".to_string(),
            ],
            positives: vec![
                "Half true".to_string(),
                "Mostly true".to_string(),
                "True".to_string(),
            ],
            negative_caption: "← More falsehoods".to_string(),
            positive_caption: "More truths →".to_string(),
        }
    }

    pub fn label(&self, ruling: &str) -> Option<&str> {
        self.rulings
            .iter()
            .find(|(k, _)| k == ruling)
            .map(|(_, l)| l.as_str())
    }

    pub fn polarity(&self, label: &str) -> Option<Polarity> {
        if self.negatives.iter().any(|l| l == label) {
            Some(Polarity::Negative)
        } else if self.positives.iter().any(|l| l == label) {
            Some(Polarity::Positive)
        } else {
            None
        }
    }

    /// The order in which the series are stacked, starting from the zero line on each side.
    pub fn stack_keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.negatives.iter().rev().cloned().collect();
        keys.extend(self.positives.iter().cloned());
        keys
    }

    /// The order of the color domain: negatives then positives, left to right.
    pub fn color_domain(&self) -> Vec<String> {
        let mut keys = self.negatives.clone();
        keys.extend(self.positives.iter().cloned());
        keys
    }

    pub fn validate(&self) -> Result<(), ChartErrors> {
        if self.negatives.is_empty() && self.positives.is_empty() {
            return Err(ChartErrors::InvalidTaxonomy("no category".to_string()));
        }
        let all = self.color_domain();
        for (idx, label) in all.iter().enumerate() {
            if all[..idx].contains(label) {
                return Err(ChartErrors::InvalidTaxonomy(format!(
                    "category {:?} is listed more than once",
                    label
                )));
            }
            if !self.rulings.iter().any(|(_, l)| l == label) {
                return Err(ChartErrors::InvalidTaxonomy(format!(
                    "no ruling maps to category {:?}",
                    label
                )));
            }
        }
        for (key, label) in self.rulings.iter() {
            if self.polarity(label).is_none() {
                return Err(ChartErrors::InvalidTaxonomy(format!(
                    "ruling {:?} maps to {:?}, which is neither negative nor positive",
                    key, label
                )));
            }
        }
        Ok(())
    }
}
