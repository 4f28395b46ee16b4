//! Fixed background templates. Each is an SVG document parameterized
//! only by the theme palette; the accent is constant across themes.

use kurbo::Shape;

use crate::brand::{self, ACCENT, MAIN_HEIGHT, MAIN_WIDTH};
use crate::config::{BackgroundId, Theme};

/// Curve tolerance for kurbo shape flattening in emitted path data.
const PATH_TOLERANCE: f64 = 0.1;

/// Builds the bottom layer for the requested template and theme.
pub fn background_svg(background: BackgroundId, theme: Theme) -> String {
    let pal = brand::palette(theme);
    let top = brand::hex(pal.gradient_top);
    let bottom = brand::hex(pal.gradient_bottom);
    let motif = brand::hex(pal.motif);
    let accent = brand::hex(ACCENT);

    let (defs, body) = match background {
        BackgroundId::Default => (String::new(), String::new()),
        BackgroundId::TechGrid => tech_grid(&motif, &accent),
        BackgroundId::Brutalist => (String::new(), brutalist(&motif, &accent)),
        BackgroundId::LeafPattern => leaf_pattern(&motif),
        BackgroundId::Geometric => (String::new(), geometric(&accent)),
    };

    format!(
        r##"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">
<defs>
<linearGradient id="base" x1="0" y1="0" x2="1" y2="1">
<stop offset="0" stop-color="{top}"/>
<stop offset="1" stop-color="{bottom}"/>
</linearGradient>
{defs}
</defs>
<rect width="{w}" height="{h}" fill="url(#base)"/>
{body}
</svg>"##,
        w = MAIN_WIDTH,
        h = MAIN_HEIGHT,
    )
}

fn tech_grid(motif: &str, accent: &str) -> (String, String) {
    let defs = format!(
        r##"<pattern id="grid" width="64" height="64" patternUnits="userSpaceOnUse" patternTransform="rotate(45)">
<path d="M0 0H64M0 0V64" stroke="{motif}" stroke-opacity="0.10" stroke-width="1"/>
</pattern>
<radialGradient id="grid-glow" cx="0.72" cy="0.30" r="0.65">
<stop offset="0" stop-color="{accent}" stop-opacity="0.16"/>
<stop offset="1" stop-color="{accent}" stop-opacity="0"/>
</radialGradient>"##,
    );
    let body = format!(
        r##"<rect width="{w}" height="{h}" fill="url(#grid)"/>
<rect width="{w}" height="{h}" fill="url(#grid-glow)"/>"##,
        w = MAIN_WIDTH,
        h = MAIN_HEIGHT,
    );
    (defs, body)
}

fn brutalist(motif: &str, accent: &str) -> String {
    format!(
        r##"<rect x="880" y="-40" width="360" height="430" fill="{motif}" fill-opacity="0.06"/>
<rect x="1010" y="310" width="420" height="300" fill="{motif}" fill-opacity="0.05"/>
<rect x="820" y="470" width="300" height="320" fill="{accent}" fill-opacity="0.07"/>
<rect x="912" y="64" width="236" height="236" fill="none" stroke="{accent}" stroke-opacity="0.35" stroke-width="3"/>"##,
    )
}

fn leaf_pattern(motif: &str) -> (String, String) {
    let leaf = leaf_path_data();
    let defs = format!(
        r##"<pattern id="leaves" width="96" height="96" patternUnits="userSpaceOnUse">
<path d="{leaf}" transform="translate(12 12) scale(1.4)" fill="{motif}" fill-opacity="0.05"/>
<path d="{leaf}" transform="translate(74 70) scale(0.9) rotate(180 12 12)" fill="{motif}" fill-opacity="0.04"/>
</pattern>"##,
    );
    let body = format!(
        r##"<rect width="{w}" height="{h}" fill="url(#leaves)"/>"##,
        w = MAIN_WIDTH,
        h = MAIN_HEIGHT,
    );
    (defs, body)
}

fn geometric(accent: &str) -> String {
    // Motifs stay in the right two thirds; the left stays clean for a
    // portrait.
    let ring = kurbo::Circle::new((1040.0, 230.0), 150.0)
        .to_path(PATH_TOLERANCE)
        .to_svg();
    let arc = kurbo::Circle::new((720.0, 780.0), 240.0)
        .to_path(PATH_TOLERANCE)
        .to_svg();
    format!(
        r##"<path d="{ring}" fill="none" stroke="{accent}" stroke-opacity="0.30" stroke-width="3"/>
<path d="{arc}" fill="none" stroke="{accent}" stroke-opacity="0.18" stroke-width="2"/>
<line x1="560" y1="96" x2="1280" y2="96" stroke="{accent}" stroke-opacity="0.22" stroke-width="2"/>
<line x1="640" y1="640" x2="1280" y2="640" stroke="{accent}" stroke-opacity="0.22" stroke-width="2"/>
<circle cx="1180" cy="560" r="7" fill="{accent}" fill-opacity="0.55"/>"##,
    )
}

/// Leaf silhouette used by the pattern template and the brand mark.
pub fn leaf_path_data() -> String {
    let mut p = kurbo::BezPath::new();
    p.move_to((0.0, 24.0));
    p.curve_to((0.0, 10.0), (10.0, 0.0), (24.0, 0.0));
    p.curve_to((24.0, 14.0), (14.0, 24.0), (0.0, 24.0));
    p.close_path();
    p.to_svg()
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [BackgroundId; 5] = [
        BackgroundId::Default,
        BackgroundId::TechGrid,
        BackgroundId::Brutalist,
        BackgroundId::LeafPattern,
        BackgroundId::Geometric,
    ];

    #[test]
    fn every_template_parses_in_both_themes() {
        for background in ALL {
            for theme in [Theme::Dark, Theme::Light] {
                let svg = background_svg(background, theme);
                let opts = usvg::Options::default();
                usvg::Tree::from_str(&svg, &opts).unwrap();
            }
        }
    }

    #[test]
    fn templates_carry_their_motifs() {
        let grid = background_svg(BackgroundId::TechGrid, Theme::Dark);
        assert!(grid.contains("id=\"grid\""));
        assert!(grid.contains("rotate(45)"));

        let leaves = background_svg(BackgroundId::LeafPattern, Theme::Light);
        assert!(leaves.contains("id=\"leaves\""));

        let plain = background_svg(BackgroundId::Default, Theme::Dark);
        assert!(!plain.contains("<pattern"));
    }

    #[test]
    fn themes_share_the_accent() {
        let dark = background_svg(BackgroundId::Geometric, Theme::Dark);
        let light = background_svg(BackgroundId::Geometric, Theme::Light);
        assert!(dark.contains("#00ed64"));
        assert!(light.contains("#00ed64"));
        assert_ne!(dark, light);
    }

    #[test]
    fn leaf_path_is_closed() {
        let d = leaf_path_data();
        assert!(d.starts_with('M'));
        assert!(d.ends_with('Z'));
    }
}
