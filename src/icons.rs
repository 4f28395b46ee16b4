//! Topic icons and the brand mark. Icons are flat 24-unit glyphs picked
//! by an ordered category table; fragments are emitted pre-positioned
//! for the compositor's overlay document.

use kurbo::Shape;

use crate::background::leaf_path_data;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TopicIcon {
    Arrow,
    StackedRects,
    Magnifier,
    Nodes,
    Leaf,
}

/// Ordered (needles, icon) table; the first row with a case-insensitive
/// substring hit wins, so earlier rows deliberately shadow later ones.
const TOPIC_TABLE: &[(&[&str], TopicIcon)] = &[
    (&["index", "performance"], TopicIcon::Arrow),
    (&["schema", "model", "data"], TopicIcon::StackedRects),
    (&["search", "query"], TopicIcon::Magnifier),
    (
        &["aggregation", "pipeline", "cluster", "vector"],
        TopicIcon::Nodes,
    ),
];

pub fn topic_icon(category: &str) -> TopicIcon {
    let lower = category.to_lowercase();
    for (needles, icon) in TOPIC_TABLE {
        if needles.iter().any(|needle| lower.contains(needle)) {
            return *icon;
        }
    }
    TopicIcon::Leaf
}

/// One icon as an SVG `<g>` fragment at `(x, y)`, scaled from the
/// 24-unit design box to `size`.
pub fn icon_fragment(
    icon: TopicIcon,
    x: f32,
    y: f32,
    size: f32,
    color: &str,
    opacity: f32,
) -> String {
    let scale = size / 24.0;
    let body = match icon {
        TopicIcon::Arrow => arrow_body(color),
        TopicIcon::StackedRects => stacked_rects_body(color),
        TopicIcon::Magnifier => magnifier_body(color),
        TopicIcon::Nodes => nodes_body(color),
        TopicIcon::Leaf => format!(r##"<path d="{}" fill="{color}"/>"##, leaf_path_data()),
    };
    format!(
        r##"<g transform="translate({x} {y}) scale({scale})" opacity="{opacity}">{body}</g>"##,
    )
}

fn polyline(points: &[(f64, f64)]) -> String {
    let mut path = kurbo::BezPath::new();
    if let Some((first, rest)) = points.split_first() {
        path.move_to(*first);
        for p in rest {
            path.line_to(*p);
        }
    }
    path.to_svg()
}

fn arrow_body(color: &str) -> String {
    let trend = polyline(&[(2.0, 18.0), (9.0, 11.0), (13.0, 15.0), (22.0, 6.0)]);
    let head = polyline(&[(15.0, 6.0), (22.0, 6.0), (22.0, 13.0)]);
    format!(
        r##"<path d="{trend}" fill="none" stroke="{color}" stroke-width="2.4" stroke-linecap="round" stroke-linejoin="round"/>
<path d="{head}" fill="none" stroke="{color}" stroke-width="2.4" stroke-linecap="round" stroke-linejoin="round"/>"##,
    )
}

fn stacked_rects_body(color: &str) -> String {
    let mut out = String::new();
    for (i, y) in [3.0_f64, 10.0, 17.0].iter().enumerate() {
        let rect = kurbo::RoundedRect::new(3.0, *y, 21.0, y + 4.5, 1.6)
            .to_path(0.1)
            .to_svg();
        let fill_opacity = 1.0 - 0.18 * i as f64;
        out.push_str(&format!(
            r##"<path d="{rect}" fill="{color}" fill-opacity="{fill_opacity:.2}"/>"##,
        ));
    }
    out
}

fn magnifier_body(color: &str) -> String {
    let lens = kurbo::Circle::new((10.5, 10.5), 6.5).to_path(0.1).to_svg();
    format!(
        r##"<path d="{lens}" fill="none" stroke="{color}" stroke-width="2.4"/>
<line x1="15.4" y1="15.4" x2="21.2" y2="21.2" stroke="{color}" stroke-width="2.4" stroke-linecap="round"/>"##,
    )
}

fn nodes_body(color: &str) -> String {
    let centers = [(5.0, 19.0), (12.0, 5.0), (19.0, 19.0)];
    let mut out = format!(
        r##"<path d="{}" fill="none" stroke="{color}" stroke-width="1.8"/>"##,
        polyline(&[centers[0], centers[1], centers[2], centers[0]]),
    );
    for (cx, cy) in centers {
        out.push_str(&format!(
            r##"<circle cx="{cx}" cy="{cy}" r="2.7" fill="{color}"/>"##,
        ));
    }
    out
}

/// Stopwatch-with-leaf identity mark, emitted pre-positioned like
/// [`icon_fragment`].
pub fn brand_mark_fragment(x: f32, y: f32, size: f32, face: &str, accent: &str) -> String {
    let scale = size / 24.0;
    let dial = kurbo::Circle::new((12.0, 13.5), 8.5).to_path(0.1).to_svg();
    let leaf = leaf_path_data();
    format!(
        r##"<g transform="translate({x} {y}) scale({scale})">
<path d="{dial}" fill="none" stroke="{face}" stroke-width="2"/>
<rect x="10" y="0.5" width="4" height="3" rx="1" fill="{face}"/>
<path d="{leaf}" transform="translate(7.2 8.7) scale(0.4)" fill="{accent}"/>
</g>"##,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_table_maps_expected_icons() {
        assert_eq!(topic_icon("Indexing"), TopicIcon::Arrow);
        assert_eq!(topic_icon("performance tuning"), TopicIcon::Arrow);
        assert_eq!(topic_icon("Data Modeling"), TopicIcon::StackedRects);
        assert_eq!(topic_icon("Atlas Search"), TopicIcon::Magnifier);
        assert_eq!(topic_icon("Aggregation Pipelines"), TopicIcon::Nodes);
        assert_eq!(topic_icon("Career Advice"), TopicIcon::Leaf);
    }

    #[test]
    fn earlier_rows_shadow_later_ones() {
        // "index" sits in the first row, so a mixed category resolves
        // to the arrow even though "search" also matches.
        assert_eq!(topic_icon("Search Index Tuning"), TopicIcon::Arrow);
    }

    #[test]
    fn fragments_parse_inside_a_document() {
        let mut body = String::new();
        for icon in [
            TopicIcon::Arrow,
            TopicIcon::StackedRects,
            TopicIcon::Magnifier,
            TopicIcon::Nodes,
            TopicIcon::Leaf,
        ] {
            body.push_str(&icon_fragment(icon, 100.0, 100.0, 140.0, "#ffffff", 0.9));
        }
        body.push_str(&brand_mark_fragment(1100.0, 620.0, 72.0, "#ffffff", "#00ed64"));
        let svg = format!(
            r##"<svg xmlns="http://www.w3.org/2000/svg" width="1280" height="720">{body}</svg>"##
        );
        let opts = usvg::Options::default();
        usvg::Tree::from_str(&svg, &opts).unwrap();
    }

    #[test]
    fn fragment_positions_are_literal() {
        let fragment = icon_fragment(TopicIcon::Arrow, 1070.0, 180.0, 140.0, "#ffffff", 0.9);
        assert!(fragment.contains("translate(1070 180)"));
    }
}
