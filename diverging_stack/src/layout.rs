use log::debug;

use crate::config::*;
use crate::scale::*;

/// Height of the legend strip drawn above the chart, when enabled.
pub const LEGEND_HEIGHT: f64 = 24.0;

const LEGEND_SWATCH: f64 = 15.0;

/// The fixed dimensions of the chart. The height is derived from the number of speakers.
#[derive(PartialEq, Debug, Clone)]
pub struct ChartDimensions {
    pub width: f64,
    pub row_height: f64,
    pub margin_top: f64,
    pub margin_right: f64,
    pub margin_bottom: f64,
    pub margin_left: f64,
    /// Padding between bands (and at both ends), as a fraction of the row height.
    pub band_padding: f64,
    pub legend: bool,
}

impl ChartDimensions {
    pub const DEFAULT: ChartDimensions = ChartDimensions {
        width: 928.0,
        row_height: 33.0,
        margin_top: 40.0,
        margin_right: 30.0,
        margin_bottom: 0.0,
        margin_left: 80.0,
        band_padding: 2.0 / 33.0,
        legend: false,
    };

    /// One tick every 80 pixels or so.
    pub fn tick_count(&self) -> f64 {
        self.width / 80.0
    }
}

impl Default for ChartDimensions {
    fn default() -> Self {
        ChartDimensions::DEFAULT
    }
}

#[derive(PartialEq, Debug, Clone)]
pub struct BarLayout {
    pub name: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Tooltip text.
    pub title: String,
}

#[derive(PartialEq, Debug, Clone)]
pub struct SeriesLayout {
    pub key: String,
    pub fill: String,
    pub bars: Vec<BarLayout>,
}

#[derive(PartialEq, Debug, Clone)]
pub struct TickLayout {
    pub x: f64,
    pub label: String,
}

/// A speaker name on the left axis, anchored at the left end of its bar.
#[derive(PartialEq, Debug, Clone)]
pub struct SpeakerLabelLayout {
    pub name: String,
    pub x: f64,
    pub y: f64,
}

#[derive(PartialEq, Debug, Clone)]
pub struct CaptionLayout {
    pub text: String,
    pub x: f64,
    pub y: f64,
}

#[derive(PartialEq, Debug, Clone)]
pub struct LegendItemLayout {
    pub label: String,
    pub fill: String,
    pub x: f64,
    pub y: f64,
    pub size: f64,
}

#[derive(PartialEq, Debug, Clone)]
pub struct ChartLayout {
    pub width: f64,
    pub height: f64,
    /// Vertical position of the top axis.
    pub axis_top: f64,
    /// Horizontal position of the zero line.
    pub zero_x: f64,
    /// Vertical extent of the left axis line.
    pub axis_range: (f64, f64),
    pub series: Vec<SeriesLayout>,
    pub x_ticks: Vec<TickLayout>,
    /// Captions are relative to the top axis.
    pub negative_caption: CaptionLayout,
    pub positive_caption: CaptionLayout,
    pub speaker_labels: Vec<SpeakerLabelLayout>,
    pub legend: Vec<LegendItemLayout>,
}

/// Places every element of the chart in pixel coordinates.
pub fn compute_layout(
    data: &ChartData,
    taxonomy: &Taxonomy,
    dims: &ChartDimensions,
    color: &OrdinalScale,
) -> ChartLayout {
    let legend_height = if dims.legend { LEGEND_HEIGHT } else { 0.0 };
    let margin_top = dims.margin_top + legend_height;
    let height = (data.bias.len() as f64) * dims.row_height + margin_top + dims.margin_bottom;

    let (lo, hi) = data
        .series
        .iter()
        .flat_map(|s| s.points.iter())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
            (lo.min(p.lower), hi.max(p.upper))
        });
    let extent = if lo.is_finite() && hi.is_finite() {
        (lo, hi)
    } else {
        (0.0, 0.0)
    };
    debug!("compute_layout: x extent {:?}, height {:?}", extent, height);

    let x = LinearScale::range_round(extent, (dims.margin_left, dims.width - dims.margin_right));
    let y = BandScale::range_round(
        data.bias.iter().map(|b| b.name.clone()).collect(),
        (margin_top, height - dims.margin_bottom),
        dims.band_padding,
    );

    let series: Vec<SeriesLayout> = data
        .series
        .iter()
        .map(|s| {
            let bars = s
                .points
                .iter()
                // Absent categories would only produce empty rectangles.
                .filter(|p| p.value != 0.0)
                .filter_map(|p| {
                    let top = y.position(p.name.as_str())?;
                    let x0 = x.apply(p.lower);
                    Some(BarLayout {
                        name: p.name.clone(),
                        x: x0,
                        y: top,
                        width: x.apply(p.upper) - x0,
                        height: y.bandwidth(),
                        title: format!("{} {} {}", p.name, format_percent(p.value), s.key),
                    })
                })
                .collect();
            SeriesLayout {
                key: s.key.clone(),
                fill: color.color(s.key.as_str()).unwrap_or("currentColor").to_string(),
                bars,
            }
        })
        .collect();

    let x_ticks = x
        .ticks(dims.tick_count())
        .into_iter()
        .map(|t| TickLayout {
            x: x.apply(t),
            label: format_percent(t),
        })
        .collect();

    let zero_x = x.apply(0.0);
    let speaker_labels = data
        .bias
        .iter()
        .filter_map(|b| {
            let top = y.position(b.name.as_str())?;
            Some(SpeakerLabelLayout {
                name: b.name.clone(),
                x: x.apply(b.bias),
                y: top + y.bandwidth() / 2.0,
            })
        })
        .collect();

    let legend = if dims.legend {
        legend_layout(taxonomy, color, dims)
    } else {
        Vec::new()
    };

    ChartLayout {
        width: dims.width,
        height,
        axis_top: margin_top,
        zero_x,
        axis_range: (margin_top, height - dims.margin_bottom),
        series,
        x_ticks,
        negative_caption: CaptionLayout {
            text: taxonomy.negative_caption.clone(),
            x: zero_x - 20.0,
            y: -24.0,
        },
        positive_caption: CaptionLayout {
            text: taxonomy.positive_caption.clone(),
            x: zero_x + 20.0,
            y: -24.0,
        },
        speaker_labels,
        legend,
    }
}

// Swatches on one line, left to right. Text is not measured, an average glyph width is assumed.
fn legend_layout(
    taxonomy: &Taxonomy,
    color: &OrdinalScale,
    dims: &ChartDimensions,
) -> Vec<LegendItemLayout> {
    const GLYPH_WIDTH: f64 = 6.0;
    let mut cur_x = dims.margin_left;
    taxonomy
        .color_domain()
        .into_iter()
        .map(|label| {
            let item = LegendItemLayout {
                fill: color.color(label.as_str()).unwrap_or("currentColor").to_string(),
                x: cur_x,
                y: 4.0,
                size: LEGEND_SWATCH,
                label,
            };
            cur_x += LEGEND_SWATCH + 6.0 + GLYPH_WIDTH * (item.label.chars().count() as f64) + 12.0;
            item
        })
        .collect()
}
