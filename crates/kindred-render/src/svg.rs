use crate::elbow::placeholder_origin_cross;
use crate::geometry::{Bounds, TextAnchor, TextMetrics};
use crate::hierarchy::Fold;
use crate::model::{ChartLayout, LayoutNode, LinkKind};
use crate::text::{TextMeasurer, TextStyle, truncate_to_width};
use crate::thumbnail::ThumbnailLoader;
use kindred_core::{ChartOptions, PersonRecord};
use std::fmt::Write as _;

const TOGGLE_RADIUS: f64 = 8.0;

#[derive(Debug, Clone)]
pub struct SvgRenderOptions {
    /// Adds extra space around the computed viewBox.
    pub viewbox_padding: f64,
    /// Root `<svg id>`; also prefixes clip path ids.
    pub diagram_id: Option<String>,
    pub font_family: String,
    pub include_thumbnails: bool,
    /// Draws a +/− marker on every node that has children.
    pub include_collapse_toggles: bool,
}

impl Default for SvgRenderOptions {
    fn default() -> Self {
        Self {
            viewbox_padding: 20.0,
            diagram_id: None,
            font_family: "ui-sans-serif, system-ui, sans-serif".to_string(),
            include_thumbnails: true,
            include_collapse_toggles: true,
        }
    }
}

pub fn render_chart_svg(
    layout: &ChartLayout,
    chart: &ChartOptions,
    options: &SvgRenderOptions,
    measurer: &dyn TextMeasurer,
    thumbnails: &dyn ThumbnailLoader,
) -> String {
    let bounds = layout.bounds.clone().unwrap_or(Bounds {
        min_x: 0.0,
        min_y: 0.0,
        max_x: 0.0,
        max_y: 0.0,
    });
    let pad = options.viewbox_padding.max(0.0);
    let vb_min_x = bounds.min_x - pad;
    let vb_min_y = bounds.min_y - pad;
    let vb_w = (bounds.width() + pad * 2.0).max(1.0);
    let vb_h = (bounds.height() + pad * 2.0).max(1.0);
    let diagram_id = options.diagram_id.as_deref().unwrap_or("descendants-chart");

    let mut out = String::new();
    let _ = write!(
        &mut out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" id="{}" class="descendants-chart layout-{}" width="{}" height="{}" viewBox="{} {} {} {}""#,
        escape_attr(diagram_id),
        chart.layout,
        fmt(vb_w),
        fmt(vb_h),
        fmt(vb_min_x),
        fmt(vb_min_y),
        fmt(vb_w),
        fmt(vb_h)
    );
    if chart.rtl {
        out.push_str(r#" direction="rtl""#);
    }
    out.push_str(">\n");
    let _ = write!(
        &mut out,
        r#"<style>
.box {{ fill: #f8fafc; stroke: #64748b; stroke-width: 1; }}
.person-male .box {{ fill: #dbeafe; }}
.person-female .box {{ fill: #fce7f3; }}
.image-empty {{ fill: #e2e8f0; }}
text {{ font-family: {}; fill: #0f172a; }}
.name {{ font-weight: bold; }}
.alt-name, .timespan {{ fill: #475569; }}
.link {{ fill: none; stroke: #64748b; stroke-width: 1.5; }}
.toggle circle {{ fill: #ffffff; stroke: #64748b; }}
.toggle text {{ text-anchor: middle; dominant-baseline: central; }}
</style>
"#,
        options.font_family
    );

    out.push_str(r#"<g class="links">"#);
    for link in &layout.links {
        if link.d.is_empty() {
            continue;
        }
        let class = match link.kind {
            LinkKind::Child => "link link-child",
            LinkKind::Spouse => "link link-spouse",
        };
        let _ = write!(
            &mut out,
            r#"<path class="{class}" data-source="{}" d="{}"/>"#,
            link.record.source,
            link.d
        );
    }
    out.push_str("</g>\n");

    out.push_str(r#"<g class="persons">"#);
    for node in &layout.nodes {
        let Some(person) = &node.person else {
            continue;
        };
        render_person(
            &mut out,
            layout,
            node,
            person,
            chart,
            options,
            diagram_id,
            measurer,
            thumbnails,
        );
    }
    out.push_str("</g>\n");

    if options.include_collapse_toggles {
        out.push_str(r#"<g class="toggles">"#);
        for node in layout.nodes.iter().filter(|n| n.has_children) {
            render_toggle(&mut out, layout, node);
        }
        out.push_str("</g>\n");
    }

    out.push_str("</svg>\n");
    out
}

#[allow(clippy::too_many_arguments)]
fn render_person(
    out: &mut String,
    layout: &ChartLayout,
    node: &LayoutNode,
    person: &PersonRecord,
    chart: &ChartOptions,
    options: &SvgRenderOptions,
    diagram_id: &str,
    measurer: &dyn TextMeasurer,
    thumbnails: &dyn ThumbnailLoader,
) {
    let _ = write!(
        out,
        r#"<g class="person person-{}" data-id="{}" data-xref="{}" transform="translate({},{})">"#,
        person.sex.as_class(),
        node.id,
        escape_attr(&person.xref),
        fmt(node.x),
        fmt(node.y)
    );

    let href = chart.individual_href(&person.xref);
    if let Some(href) = &href {
        let _ = write!(out, r#"<a href="{}""#, escape_attr(href));
        if chart.open_new_tab_on_click {
            out.push_str(r#" target="_blank" rel="noopener""#);
        }
        out.push('>');
    }

    let b = &layout.box_metrics;
    let _ = write!(
        out,
        r#"<rect class="box" x="{}" y="{}" width="{}" height="{}" rx="{}" ry="{}"/>"#,
        fmt(-b.half_width()),
        fmt(-b.half_height()),
        fmt(b.width),
        fmt(b.height),
        fmt(b.corner_radius),
        fmt(b.corner_radius)
    );

    let img = &layout.image;
    let thumbnail = if options.include_thumbnails && !person.thumbnail.trim().is_empty() {
        match thumbnails.load(&person.thumbnail) {
            Ok(href) => Some(href),
            Err(err) => {
                tracing::warn!(xref = %person.xref, error = %err, "skipping thumbnail");
                None
            }
        }
    } else {
        None
    };
    match thumbnail {
        Some(href) => {
            let clip_id = format!("{diagram_id}-clip-{}", node.id);
            let _ = write!(
                out,
                r#"<clipPath id="{}"><rect x="{}" y="{}" width="{}" height="{}" rx="{}"/></clipPath><image href="{}" x="{}" y="{}" width="{}" height="{}" clip-path="url(#{})" preserveAspectRatio="xMidYMid slice"/>"#,
                escape_attr(&clip_id),
                fmt(img.x),
                fmt(img.y),
                fmt(img.width),
                fmt(img.height),
                fmt(img.corner_radius),
                escape_attr(&href),
                fmt(img.x),
                fmt(img.y),
                fmt(img.width),
                fmt(img.height),
                escape_attr(&clip_id)
            );
        }
        None => {
            let _ = write!(
                out,
                r#"<rect class="image-empty" x="{}" y="{}" width="{}" height="{}" rx="{}"/>"#,
                fmt(img.x),
                fmt(img.y),
                fmt(img.width),
                fmt(img.height),
                fmt(img.corner_radius)
            );
        }
    }

    let text = &layout.text;
    let mut line_y = text.y;
    for line in text_lines(person, layout.orientation.split_names(), chart) {
        let style = match line.class {
            "name" => TextStyle::with_size(text.font_size).bold(),
            _ => TextStyle::with_size(text.font_size),
        };
        let content = truncate_to_width(measurer, &line.text, &style, text.max_width);
        let (x, anchor) = text_anchor(text, line.rtl || chart.rtl);
        let _ = write!(
            out,
            r#"<text class="{}" x="{}" y="{}" font-size="{}" text-anchor="{}""#,
            line.class,
            fmt(x),
            fmt(line_y),
            fmt(text.font_size),
            anchor.as_str()
        );
        if line.rtl {
            out.push_str(r#" direction="rtl""#);
        }
        let _ = write!(out, ">{}</text>", escape_xml(&content));
        line_y += text.line_height;
    }

    if href.is_some() {
        out.push_str("</a>");
    }
    out.push_str("</g>");
}

fn render_toggle(out: &mut String, layout: &ChartLayout, node: &LayoutNode) {
    let o = &layout.orientation;
    let edge = layout.direction * (o.box_depth() / 2.0 + TOGGLE_RADIUS);
    let mut cross = o.cross(node.position());
    // Placeholder slots draw no box; sit on their family's connector origin instead.
    if node.is_placeholder() {
        let partner = node.spouse.and_then(|id| layout.node(id));
        cross = placeholder_origin_cross(
            cross,
            partner.map(|p| o.cross(p.position())),
            o.box_cross(),
            o.cross_offset(),
        );
    }
    let at = o.point(cross, o.depth(node.position()) + edge);
    let symbol = match node.fold {
        Fold::Collapsed => "+",
        Fold::Expanded => "\u{2212}",
    };
    let _ = write!(
        out,
        r#"<g class="toggle" data-node="{}" transform="translate({},{})"><circle r="{}"/><text>{}</text></g>"#,
        node.id,
        fmt(at.x),
        fmt(at.y),
        fmt(TOGGLE_RADIUS),
        symbol
    );
}

struct TextLine {
    class: &'static str,
    text: String,
    rtl: bool,
}

fn text_lines(person: &PersonRecord, split_names: bool, chart: &ChartOptions) -> Vec<TextLine> {
    let first = person.first_names.join(" ");
    let last = person.last_names.join(" ");
    let mut lines = Vec::with_capacity(4);
    let name_line = |text: String| TextLine {
        class: "name",
        text,
        rtl: person.is_name_rtl,
    };
    if first.is_empty() && last.is_empty() {
        lines.push(name_line(person.name.clone()));
    } else if split_names {
        lines.push(name_line(first));
        lines.push(name_line(last));
    } else {
        lines.push(name_line(format!("{first} {last}").trim().to_string()));
    }
    if chart.show_alternative_name && person.has_alternative_name() {
        lines.push(TextLine {
            class: "alt-name",
            text: person.alternative_name.clone(),
            rtl: person.is_alt_rtl,
        });
    }
    if !person.timespan.is_empty() {
        lines.push(TextLine {
            class: "timespan",
            text: person.timespan.clone(),
            rtl: false,
        });
    }
    lines
}

/// Start-anchored text flips to the far edge of its column when written right to left.
fn text_anchor(text: &TextMetrics, rtl: bool) -> (f64, TextAnchor) {
    match text.anchor {
        TextAnchor::Start if rtl => (text.x + text.max_width, TextAnchor::Start.mirrored()),
        anchor => (text.x, anchor),
    }
}

pub(crate) fn fmt(v: f64) -> String {
    // Avoid `-0` and tiny float noise from the layout arithmetic.
    if !v.is_finite() {
        return "0".to_string();
    }

    let mut v = if v.abs() < 1e-9 { 0.0 } else { v };
    let nearest = v.round();
    if (v - nearest).abs() < 1e-6 {
        v = nearest;
    }
    let s = v.to_string();
    if s == "-0" { "0".to_string() } else { s }
}

fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

fn escape_attr(text: &str) -> String {
    escape_xml(text)
}
