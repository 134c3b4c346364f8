mod config;
pub mod builder;
pub mod layout;
pub mod manual;
pub mod scale;

use log::{debug, info, warn};

use std::collections::{HashMap, HashSet};

pub use crate::config::*;

// **** Private structures ****

// Speakers in first-appearance order, with their categories in first-appearance order.
struct SpeakerGroups {
    names: Vec<String>,
    categories: HashMap<String, Vec<(String, f64)>>,
}

impl SpeakerGroups {
    fn from_records(records: &[Record]) -> SpeakerGroups {
        let mut names: Vec<String> = Vec::new();
        let mut categories: HashMap<String, Vec<(String, f64)>> = HashMap::new();
        for r in records.iter() {
            let entry = categories.entry(r.name.clone()).or_insert_with(|| {
                names.push(r.name.clone());
                Vec::new()
            });
            if let Some(slot) = entry.iter_mut().find(|(c, _)| *c == r.category) {
                slot.1 += r.value;
            } else {
                entry.push((r.category.clone(), r.value));
            }
        }
        SpeakerGroups { names, categories }
    }

    fn iter(&self) -> impl Iterator<Item = (&String, &Vec<(String, f64)>)> {
        self.names
            .iter()
            .filter_map(|n| self.categories.get(n).map(|cs| (n, cs)))
    }
}

/// Applies the taxonomy to the raw rows.
///
/// Rows with an unknown ruling are dropped. The others get their display label
/// as category and keep their raw count as value.
pub fn categorize(rows: &[RawRow], taxonomy: &Taxonomy) -> Vec<Record> {
    let mut dropped: HashSet<&str> = HashSet::new();
    let res: Vec<Record> = rows
        .iter()
        .filter_map(|row| match taxonomy.label(row.ruling.as_str()) {
            Some(label) => Some(Record {
                name: row.speaker.clone(),
                category: label.to_string(),
                value: row.count,
            }),
            None => {
                dropped.insert(row.ruling.as_str());
                None
            }
        })
        .collect();
    if !dropped.is_empty() {
        debug!("categorize: dropped unknown rulings {:?}", dropped);
    }
    res
}

/// Turns counts into shares, per speaker.
///
/// Records of the same speaker and category are merged first. Speakers with no rating
/// at all are dropped, since their shares are undefined.
pub fn normalize(records: &[Record]) -> Vec<Record> {
    let groups = SpeakerGroups::from_records(records);
    let mut res: Vec<Record> = Vec::with_capacity(records.len());
    for (name, cats) in groups.iter() {
        let total: f64 = cats.iter().map(|(_, v)| *v).sum();
        if !(total > 0.0) {
            warn!("normalize: speaker {:?} has no rating, skipping", name);
            continue;
        }
        for (category, v) in cats.iter() {
            res.push(Record {
                name: name.clone(),
                category: category.clone(),
                value: v / total,
            });
        }
    }
    res
}

/// The bias of each speaker: minus the share of negative categories.
///
/// The result is sorted in ascending order, so that the speakers with the most falsehoods
/// come first. Ties keep the order of first appearance.
pub fn compute_bias(records: &[Record], taxonomy: &Taxonomy) -> Vec<BiasEntry> {
    let groups = SpeakerGroups::from_records(records);
    let mut res: Vec<BiasEntry> = groups
        .iter()
        .map(|(name, cats)| {
            let bias: f64 = cats
                .iter()
                .map(|(c, v)| {
                    let sign = taxonomy.polarity(c).map(|p| p.sign()).unwrap_or(0.0);
                    v * sign.min(0.0)
                })
                .sum();
            BiasEntry {
                name: name.clone(),
                bias,
            }
        })
        .collect();
    // Stable sort
    res.sort_by(|a, b| a.bias.total_cmp(&b.bias));
    res
}

/// Stacks the shares on both sides of zero.
///
/// Series follow `Taxonomy::stack_keys`. Within a speaker, positive values pile up to the
/// right of zero and negative values to the left, each new band starting where the
/// previous one on the same side ended. A missing category yields an empty band at zero.
pub fn stack_diverging(records: &[Record], taxonomy: &Taxonomy) -> Vec<Series> {
    let groups = SpeakerGroups::from_records(records);
    let keys = taxonomy.stack_keys();
    let mut series: Vec<Series> = keys
        .iter()
        .map(|k| Series {
            key: k.clone(),
            polarity: taxonomy.polarity(k).unwrap_or(Polarity::Positive),
            points: Vec::new(),
        })
        .collect();

    for (name, cats) in groups.iter() {
        let mut pos = 0.0;
        let mut neg = 0.0;
        for s in series.iter_mut() {
            let share = cats
                .iter()
                .find(|(c, _)| *c == s.key)
                .map(|(_, v)| *v)
                .unwrap_or(0.0);
            let value = s.polarity.sign() * share;
            let (lower, upper) = if value > 0.0 {
                let band = (pos, pos + value);
                pos += value;
                band
            } else if value < 0.0 {
                let band = (neg + value, neg);
                neg += value;
                band
            } else {
                (0.0, 0.0)
            };
            s.points.push(SeriesPoint {
                name: name.clone(),
                lower,
                upper,
                value,
            });
        }
    }
    series
}

/// Runs the complete pipeline on the raw rows.
///
/// Arguments:
/// * `rows` the rows as read from the input
/// * `taxonomy` the categories to keep and how to display them
pub fn run_chart_stats(rows: &[RawRow], taxonomy: &Taxonomy) -> Result<ChartData, ChartErrors> {
    info!("Processing {:?} rows", rows.len());
    taxonomy.validate()?;

    let categorized = categorize(rows, taxonomy);
    // Only the counts of kept rows matter.
    if let Some(r) = categorized
        .iter()
        .find(|r| !r.value.is_finite() || r.value < 0.0)
    {
        return Err(ChartErrors::InvalidCount {
            speaker: r.name.clone(),
            count: r.value,
        });
    }
    debug!(
        "run_chart_stats: {:?} rows kept out of {:?}",
        categorized.len(),
        rows.len()
    );
    let records = normalize(&categorized);
    if records.is_empty() {
        return Err(ChartErrors::EmptyChart);
    }

    let bias = compute_bias(&records, taxonomy);
    for b in bias.iter() {
        debug!("Speaker: {}: bias {:.4}", b.name, b.bias);
    }
    let series = stack_diverging(&records, taxonomy);
    info!(
        "Processed {:?} speakers into {:?} series",
        bias.len(),
        series.len()
    );

    Ok(ChartData {
        records,
        bias,
        series,
    })
}
