// SVG serialization of the chart layout.

use diverging_stack::layout::ChartLayout;
use std::fmt::Write as _;

#[derive(Debug, Clone, Default)]
pub struct SvgOptions {
    pub title: Option<String>,
}

const AXIS_ATTRS: &str = r#"fill="none" font-size="10" font-family="sans-serif""#;
const TICK_SIZE: f64 = 6.0;
const TICK_PADDING: f64 = 3.0;
// Half-pixel offset so that one pixel wide lines are crisp.
const OFFSET: f64 = 0.5;

pub fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

/// Formats a coordinate without float noise or negative zero.
pub fn fmt(v: f64) -> String {
    if !v.is_finite() {
        return "0".to_string();
    }
    let mut v = if v.abs() < 1e-9 { 0.0 } else { v };
    let nearest = v.round();
    if (v - nearest).abs() < 1e-6 {
        v = nearest;
    }
    if v == 0.0 {
        v = 0.0;
    }
    format!("{}", v)
}

pub fn render_svg(layout: &ChartLayout, options: &SvgOptions) -> String {
    let mut out = String::new();
    let _ = write!(
        &mut out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" style="max-width: 100%; height: auto; font: 10px sans-serif;">"#,
        w = fmt(layout.width),
        h = fmt(layout.height)
    );
    out.push('\n');

    if let Some(t) = options.title.as_deref() {
        let _ = writeln!(&mut out, "<title>{}</title>", escape_xml(t));
    }

    if !layout.legend.is_empty() {
        let _ = writeln!(&mut out, r#"<g class="legend" font-size="10" font-family="sans-serif">"#);
        for item in layout.legend.iter() {
            let _ = writeln!(
                &mut out,
                r#"<rect x="{x}" y="{y}" width="{s}" height="{s}" fill="{fill}"/><text x="{tx}" y="{ty}" dy="0.35em" fill="currentColor">{label}</text>"#,
                x = fmt(item.x),
                y = fmt(item.y),
                s = fmt(item.size),
                fill = escape_xml(&item.fill),
                tx = fmt(item.x + item.size + 6.0),
                ty = fmt(item.y + item.size / 2.0),
                label = escape_xml(&item.label)
            );
        }
        out.push_str("</g>\n");
    }

    // Bars, one group per category.
    out.push_str("<g>\n");
    for s in layout.series.iter() {
        let _ = writeln!(
            &mut out,
            r#"<g fill="{fill}" data-category="{key}">"#,
            fill = escape_xml(&s.fill),
            key = escape_xml(&s.key)
        );
        for b in s.bars.iter() {
            let _ = writeln!(
                &mut out,
                r#"<rect x="{x}" y="{y}" width="{w}" height="{h}"><title>{title}</title></rect>"#,
                x = fmt(b.x),
                y = fmt(b.y),
                w = fmt(b.width),
                h = fmt(b.height),
                title = escape_xml(&b.title)
            );
        }
        out.push_str("</g>\n");
    }
    out.push_str("</g>\n");

    // Top axis, without domain line.
    let _ = writeln!(
        &mut out,
        r#"<g transform="translate(0,{y})" {attrs} text-anchor="middle">"#,
        y = fmt(layout.axis_top),
        attrs = AXIS_ATTRS
    );
    for t in layout.x_ticks.iter() {
        let _ = writeln!(
            &mut out,
            r#"<g class="tick" opacity="1" transform="translate({x},0)"><line stroke="currentColor" y2="{y2}"/><text fill="currentColor" y="{ty}" dy="0em">{label}</text></g>"#,
            x = fmt(t.x + OFFSET),
            y2 = fmt(-TICK_SIZE),
            ty = fmt(-(TICK_SIZE + TICK_PADDING)),
            label = escape_xml(&t.label)
        );
    }
    for (caption, anchor) in [
        (&layout.positive_caption, "start"),
        (&layout.negative_caption, "end"),
    ] {
        let _ = writeln!(
            &mut out,
            r#"<text x="{x}" y="{y}" fill="currentColor" text-anchor="{anchor}">{text}</text>"#,
            x = fmt(caption.x),
            y = fmt(caption.y),
            anchor = anchor,
            text = escape_xml(&caption.text)
        );
    }
    out.push_str("</g>\n");

    // Left axis: the line sits on zero, the names at the left end of the bars.
    let _ = writeln!(&mut out, r#"<g {attrs} text-anchor="end">"#, attrs = AXIS_ATTRS);
    let _ = writeln!(
        &mut out,
        r#"<path class="domain" stroke="currentColor" transform="translate({x},0)" d="M{o},{y0}V{y1}"/>"#,
        x = fmt(layout.zero_x),
        o = fmt(OFFSET),
        y0 = fmt(layout.axis_range.0),
        y1 = fmt(layout.axis_range.1)
    );
    for l in layout.speaker_labels.iter() {
        let _ = writeln!(
            &mut out,
            r#"<g class="tick" opacity="1" transform="translate({x},{y})"><line stroke="currentColor" x2="{x2}"/><text fill="currentColor" x="{tx}" dy="0.32em">{name}</text></g>"#,
            x = fmt(l.x),
            y = fmt(l.y),
            x2 = fmt(-TICK_SIZE),
            tx = fmt(-(TICK_SIZE + TICK_PADDING)),
            name = escape_xml(&l.name)
        );
    }
    out.push_str("</g>\n");

    out.push_str("</svg>\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use diverging_stack::layout::{compute_layout, ChartDimensions};
    use diverging_stack::scale::OrdinalScale;
    use diverging_stack::{run_chart_stats, RawRow, Taxonomy};

    fn rendered(dims: &ChartDimensions) -> String {
        let tax = Taxonomy::politifact();
        let rows: Vec<RawRow> = [
            ("Ann & Co", "false", 1.0),
            ("Ann & Co", "true", 3.0),
            ("<Bob>", "pants-fire", 1.0),
        ]
        .iter()
        .map(|(s, r, c)| RawRow {
            speaker: s.to_string(),
            ruling: r.to_string(),
            count: *c,
        })
        .collect();
        let data = run_chart_stats(&rows, &tax).unwrap();
        let color = OrdinalScale::spectral(tax.color_domain());
        let layout = compute_layout(&data, &tax, dims, &color);
        render_svg(
            &layout,
            &SvgOptions {
                title: Some("Ratings".to_string()),
            },
        )
    }

    #[test]
    fn numbers() {
        assert_eq!(fmt(12.0), "12");
        assert_eq!(fmt(-0.0), "0");
        assert_eq!(fmt(0.5), "0.5");
        assert_eq!(fmt(2.9999999999), "3");
        assert_eq!(fmt(f64::NAN), "0");
    }

    #[test]
    fn escapes() {
        assert_eq!(escape_xml(r#"a<b>&"c'"#), "a&lt;b&gt;&amp;&quot;c&#39;");
        assert_eq!(escape_xml("Pants on fire!"), "Pants on fire!");
    }

    #[test]
    fn document() {
        let svg = rendered(&ChartDimensions::DEFAULT);
        assert!(svg.starts_with(r#"<svg xmlns="http://www.w3.org/2000/svg" width="928" height="106""#));
        assert!(svg.trim_end().ends_with("</svg>"));
        assert!(svg.contains("<title>Ratings</title>"));
        assert!(svg.contains("&lt;Bob&gt;"));
        assert!(svg.contains("Ann &amp; Co 75% True"));
        assert!(svg.contains("← More falsehoods"));
        assert!(!svg.contains(r#"class="legend""#));
        // Three non-empty bands.
        assert_eq!(svg.matches("<rect").count(), 3);
        assert_eq!(svg.matches("<svg").count(), svg.matches("</svg>").count());
        assert_eq!(svg.matches("<g").count(), svg.matches("</g>").count());
    }

    #[test]
    fn legend() {
        let svg = rendered(&ChartDimensions {
            legend: true,
            ..ChartDimensions::DEFAULT
        });
        assert!(svg.contains(r#"class="legend""#));
        assert!(svg.contains(r##"fill="#3288bd""##));
        assert_eq!(svg.matches("<rect").count(), 3 + 6);
    }
}
