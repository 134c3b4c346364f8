//! Scales mapping data values to pixels and categories to colors.
//!
//! They follow the conventions of the usual web charting libraries (linear scale with
//! 1-2-5 ticks, padded band scale, ordinal color scale), so that the resulting layout
//! lines up with what a reader of such charts expects.

/// Rounds half-way cases up, towards positive infinity.
pub fn round_half_up(v: f64) -> f64 {
    (v + 0.5).floor()
}

#[derive(PartialEq, Debug, Clone)]
pub struct LinearScale {
    pub domain: (f64, f64),
    pub range: (f64, f64),
    pub round: bool,
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> LinearScale {
        LinearScale {
            domain,
            range,
            round: false,
        }
    }

    /// A scale whose output is rounded to whole pixels.
    pub fn range_round(domain: (f64, f64), range: (f64, f64)) -> LinearScale {
        LinearScale {
            domain,
            range,
            round: true,
        }
    }

    pub fn apply(&self, v: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        // A degenerate domain maps everything to the middle of the range.
        let t = if d0 == d1 { 0.5 } else { (v - d0) / (d1 - d0) };
        let out = r0 * (1.0 - t) + r1 * t;
        if self.round {
            round_half_up(out)
        } else {
            out
        }
    }

    pub fn ticks(&self, count: f64) -> Vec<f64> {
        ticks(self.domain.0, self.domain.1, count)
    }
}

/// Approximately `count` evenly spaced values between `start` and `stop` (both included
/// when they fall on a tick), with a step of 1, 2 or 5 times a power of ten.
pub fn ticks(start: f64, stop: f64, count: f64) -> Vec<f64> {
    fn tick_spec(start: f64, stop: f64, count: f64) -> Option<(i64, i64, f64)> {
        let step = (stop - start) / count.max(0.0);
        if !step.is_finite() || step == 0.0 {
            return None;
        }
        let power = step.log10().floor();
        let error = step / 10f64.powf(power);
        let factor = if error >= 50f64.sqrt() {
            10.0
        } else if error >= 10f64.sqrt() {
            5.0
        } else if error >= 2f64.sqrt() {
            2.0
        } else {
            1.0
        };

        let (i1, i2, inc) = if power < 0.0 {
            let inc = 10f64.powf(-power) / factor;
            let mut i1 = round_half_up(start * inc) as i64;
            let mut i2 = round_half_up(stop * inc) as i64;
            if (i1 as f64) / inc < start {
                i1 += 1;
            }
            if (i2 as f64) / inc > stop {
                i2 -= 1;
            }
            (i1, i2, -inc)
        } else {
            let inc = 10f64.powf(power) * factor;
            let mut i1 = round_half_up(start / inc) as i64;
            let mut i2 = round_half_up(stop / inc) as i64;
            if (i1 as f64) * inc < start {
                i1 += 1;
            }
            if (i2 as f64) * inc > stop {
                i2 -= 1;
            }
            (i1, i2, inc)
        };

        if i2 < i1 && (0.5..2.0).contains(&count) {
            return tick_spec(start, stop, count * 2.0);
        }
        if !inc.is_finite() || inc == 0.0 {
            return None;
        }
        Some((i1, i2, inc))
    }

    if !start.is_finite() || !stop.is_finite() || !(count > 0.0) {
        return Vec::new();
    }
    if start == stop {
        return vec![start];
    }

    let reverse = stop < start;
    let (a, b) = if reverse {
        (stop, start)
    } else {
        (start, stop)
    };
    let Some((i1, i2, inc)) = tick_spec(a, b, count) else {
        return Vec::new();
    };
    if i2 < i1 {
        return Vec::new();
    }

    let mut out: Vec<f64> = (i1..=i2)
        .map(|i| {
            if inc < 0.0 {
                (i as f64) / -inc
            } else {
                (i as f64) * inc
            }
        })
        .collect();
    if reverse {
        out.reverse();
    }
    out
}

/// A band scale: the range is split into equally spaced bands, one per domain value.
///
/// The same padding is used between bands and at both ends. Positions and band
/// width are rounded to whole pixels.
#[derive(PartialEq, Debug, Clone)]
pub struct BandScale {
    domain: Vec<String>,
    start: f64,
    step: f64,
    bandwidth: f64,
}

impl BandScale {
    pub fn range_round(domain: Vec<String>, range: (f64, f64), padding: f64) -> BandScale {
        let n = domain.len() as f64;
        let (start, stop) = if range.1 < range.0 {
            (range.1, range.0)
        } else {
            range
        };
        let step = ((stop - start) / (n - padding + padding * 2.0).max(1.0)).floor();
        let start = round_half_up(start + (stop - start - step * (n - padding)) * 0.5);
        let bandwidth = round_half_up(step * (1.0 - padding));
        BandScale {
            domain,
            start,
            step,
            bandwidth,
        }
    }

    /// The top of the band of the given value, if it belongs to the domain.
    pub fn position(&self, name: &str) -> Option<f64> {
        self.domain
            .iter()
            .position(|d| d == name)
            .map(|idx| self.start + self.step * (idx as f64))
    }

    pub fn bandwidth(&self) -> f64 {
        self.bandwidth
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    pub fn domain(&self) -> &[String] {
        &self.domain
    }
}

/// Maps each category to a color, cycling through the palette.
#[derive(PartialEq, Debug, Clone)]
pub struct OrdinalScale {
    domain: Vec<String>,
    palette: Vec<String>,
}

impl OrdinalScale {
    pub fn new(domain: Vec<String>, palette: Vec<String>) -> OrdinalScale {
        OrdinalScale { domain, palette }
    }

    /// The Spectral palette sized to the domain.
    pub fn spectral(domain: Vec<String>) -> OrdinalScale {
        let palette = scheme_spectral(domain.len())
            .iter()
            .map(|c| c.to_string())
            .collect();
        OrdinalScale { domain, palette }
    }

    pub fn color(&self, key: &str) -> Option<&str> {
        if self.palette.is_empty() {
            return None;
        }
        self.domain
            .iter()
            .position(|d| d == key)
            .map(|idx| self.palette[idx % self.palette.len()].as_str())
    }

    pub fn domain(&self) -> &[String] {
        &self.domain
    }

    /// Replaces the color of one category.
    pub fn set_color(&mut self, key: &str, color: &str) {
        let Some(idx) = self.domain.iter().position(|d| d == key) else {
            return;
        };
        // Expand the palette so that the override does not leak to other categories.
        let base = self.palette.clone();
        self.palette = (0..self.domain.len().max(base.len()))
            .map(|i| base[i % base.len()].clone())
            .collect();
        self.palette[idx] = color.to_string();
    }
}

const SPECTRAL: [&[&str]; 9] = [
    &["#fc8d59", "#ffffbf", "#99d594"],
    &["#d7191c", "#fdae61", "#abdda4", "#2b83ba"],
    &["#d7191c", "#fdae61", "#ffffbf", "#abdda4", "#2b83ba"],
    &["#d53e4f", "#fc8d59", "#fee08b", "#e6f598", "#99d594", "#3288bd"],
    &[
        "#d53e4f", "#fc8d59", "#fee08b", "#ffffbf", "#e6f598", "#99d594", "#3288bd",
    ],
    &[
        "#d53e4f", "#f46d43", "#fdae61", "#fee08b", "#e6f598", "#abdda4", "#66c2a5", "#3288bd",
    ],
    &[
        "#d53e4f", "#f46d43", "#fdae61", "#fee08b", "#ffffbf", "#e6f598", "#abdda4", "#66c2a5",
        "#3288bd",
    ],
    &[
        "#9e0142", "#d53e4f", "#f46d43", "#fdae61", "#fee08b", "#e6f598", "#abdda4", "#66c2a5",
        "#3288bd", "#5e4fa2",
    ],
    &[
        "#9e0142", "#d53e4f", "#f46d43", "#fdae61", "#fee08b", "#ffffbf", "#e6f598", "#abdda4",
        "#66c2a5", "#3288bd", "#5e4fa2",
    ],
];

/// The diverging red-yellow-blue "Spectral" color scheme with `k` colors.
///
/// The scheme is defined for 3 to 11 colors. Smaller sizes take the first colors of the
/// 3-color scheme, larger sizes get the 11-color scheme (the ordinal scale cycles).
pub fn scheme_spectral(k: usize) -> Vec<&'static str> {
    match k {
        0..=2 => SPECTRAL[0][..k].to_vec(),
        3..=11 => SPECTRAL[k - 3].to_vec(),
        _ => SPECTRAL[8].to_vec(),
    }
}

/// Formats the magnitude of a share as a whole percentage: `-0.4` gives `40%`.
pub fn format_percent(v: f64) -> String {
    let pct = round_half_up(v.abs() * 100.0);
    if !pct.is_finite() {
        return "0%".to_string();
    }
    format!("{}%", pct as i64)
}
