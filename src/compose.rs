//! Layer assembly. Stacking order is fixed: background, title text,
//! category badge, portrait (with its halo), topic icon, brand mark.

use std::sync::Arc;

use kurbo::Shape;

use crate::background::background_svg;
use crate::blend;
use crate::brand::{self, ACCENT, FONT_STACK, MAIN_HEIGHT, MAIN_WIDTH};
use crate::config::ThumbnailConfig;
use crate::error::{ThumbError, ThumbResult};
use crate::icons;
use crate::portrait::{self, PortraitLayer};
use crate::title::{self, TitleLayout};

const TEXT_LEFT_WITH_PORTRAIT: f32 = 450.0;
const TEXT_LEFT_PLAIN: f32 = 90.0;
const TEXT_RIGHT_MARGIN: f32 = 70.0;
/// Baseline offset from the line top, in em.
const BASELINE_EM: f32 = 0.85;
const SHADOW_OFFSET_Y: f32 = 3.0;

pub(crate) const PORTRAIT_SIZE: u32 = 360;
const PORTRAIT_X: i32 = 64;
const HALO_SCALE: f32 = 1.35;

const BADGE_X: f32 = 70.0;
const BADGE_Y: f32 = 64.0;
const BADGE_HEIGHT: f32 = 52.0;
const BADGE_FONT_SIZE: f32 = 26.0;
const BADGE_PAD_X: f32 = 24.0;
const BADGE_CHAR_EM: f32 = 0.62;
const BADGE_LETTER_SPACING: f32 = 1.5;

const ICON_X: f32 = 1060.0;
const ICON_Y: f32 = 120.0;
const ICON_SIZE: f32 = 140.0;

const BRAND_SIZE: f32 = 72.0;
const BRAND_MARGIN: f32 = 36.0;

/// Width available to title lines; the compositor and the layout search
/// must agree on it.
pub fn text_box_width(has_portrait: bool) -> f32 {
    let left = if has_portrait {
        TEXT_LEFT_WITH_PORTRAIT
    } else {
        TEXT_LEFT_PLAIN
    };
    MAIN_WIDTH as f32 - left - TEXT_RIGHT_MARGIN
}

/// Renders the full stack into a straight-alpha RGBA canvas.
pub fn compose(
    config: &ThumbnailConfig,
    title: &TitleLayout,
    portrait: Option<&PortraitLayer>,
    fontdb: &Arc<usvg::fontdb::Database>,
) -> ThumbResult<image::RgbaImage> {
    let mut canvas = crate::svg_raster::rasterize(
        &background_svg(config.background_id, config.theme),
        MAIN_WIDTH,
        MAIN_HEIGHT,
        fontdb,
    )?;

    if let Some(svg) = text_and_badge_svg(config, title, portrait.is_some()) {
        let overlay = crate::svg_raster::rasterize(&svg, MAIN_WIDTH, MAIN_HEIGHT, fontdb)?;
        blend::over_in_place(&mut canvas, &overlay, 1.0)?;
    }

    if let Some(layer) = portrait {
        blit_portrait(&mut canvas, layer)?;
    }

    if let Some(svg) = icon_and_brand_svg(config) {
        let overlay = crate::svg_raster::rasterize(&svg, MAIN_WIDTH, MAIN_HEIGHT, fontdb)?;
        blend::over_in_place(&mut canvas, &overlay, 1.0)?;
    }

    blend::unpremultiply_in_place(&mut canvas);
    image::RgbaImage::from_raw(MAIN_WIDTH, MAIN_HEIGHT, canvas)
        .ok_or_else(|| ThumbError::render("composed canvas has wrong buffer size"))
}

fn blit_portrait(canvas: &mut [u8], layer: &PortraitLayer) -> ThumbResult<()> {
    let cy = (MAIN_HEIGHT / 2) as i32;
    let y = cy - (layer.size / 2) as i32;

    let halo_d = ((layer.size as f32) * HALO_SCALE).round() as u32;
    let halo = portrait::glow_halo(halo_d);
    let shift = ((halo_d - layer.size) / 2) as i32;
    blend::blit_over(
        canvas,
        MAIN_WIDTH,
        MAIN_HEIGHT,
        &halo,
        halo_d,
        halo_d,
        PORTRAIT_X - shift,
        y - shift,
    )?;
    blend::blit_over(
        canvas,
        MAIN_WIDTH,
        MAIN_HEIGHT,
        &layer.premul,
        layer.size,
        layer.size,
        PORTRAIT_X,
        y,
    )
}

/// Title runs plus the category badge, one transparent document.
/// Returns `None` when the document would be empty.
pub(crate) fn text_and_badge_svg(
    config: &ThumbnailConfig,
    title: &TitleLayout,
    has_portrait: bool,
) -> Option<String> {
    let pal = brand::palette(config.theme);
    let mut body = String::new();

    if !title.lines.is_empty() {
        body.push_str(&title_runs(title, has_portrait, &pal));
    }
    if config.show_category_badge {
        if let Some(category) = config.category.as_deref() {
            body.push_str(&badge_fragment(category, &pal));
        }
    }
    if body.is_empty() {
        return None;
    }
    Some(wrap_overlay(body))
}

fn title_runs(title: &TitleLayout, has_portrait: bool, pal: &brand::ThemePalette) -> String {
    let size = title.font_size;
    let left = if has_portrait {
        TEXT_LEFT_WITH_PORTRAIT
    } else {
        TEXT_LEFT_PLAIN
    };
    let line_height = size * title::LINE_HEIGHT_EM;
    let block_top = (MAIN_HEIGHT as f32 - line_height * title.lines.len() as f32) / 2.0;
    let foreground = brand::hex(pal.foreground);
    let accent = brand::hex(ACCENT);

    // shadow pass first so every glyph sits above its own shadow
    let mut shadows = String::new();
    let mut fills = String::new();
    for (row, line) in title.lines.iter().enumerate() {
        let baseline = block_top + row as f32 * line_height + size * BASELINE_EM;
        let mut x = left;
        for word in line {
            let text = escape_xml(&word.text);
            shadows.push_str(&format!(
                r##"<text x="{x}" y="{sy}" font-family="{FONT_STACK}" font-size="{size}" font-weight="800" fill="#000000" fill-opacity="{op}">{text}</text>"##,
                sy = baseline + SHADOW_OFFSET_Y,
                op = pal.shadow_opacity,
            ));
            let fill = if word.emphasized { &accent } else { &foreground };
            fills.push_str(&format!(
                r##"<text x="{x}" y="{baseline}" font-family="{FONT_STACK}" font-size="{size}" font-weight="800" fill="{fill}">{text}</text>"##,
            ));
            x += title::word_width(size, &word.text) + title::space_width(size);
        }
    }
    shadows + &fills
}

fn badge_fragment(category: &str, pal: &brand::ThemePalette) -> String {
    let label = category.to_uppercase();
    let glyphs = label.chars().count() as f32;
    let text_width = glyphs * (BADGE_FONT_SIZE * BADGE_CHAR_EM + BADGE_LETTER_SPACING);
    let width = text_width + 2.0 * BADGE_PAD_X;

    let pill = kurbo::RoundedRect::new(
        f64::from(BADGE_X),
        f64::from(BADGE_Y),
        f64::from(BADGE_X + width),
        f64::from(BADGE_Y + BADGE_HEIGHT),
        f64::from(BADGE_HEIGHT / 2.0),
    )
    .to_path(0.1)
    .to_svg();

    let text_x = BADGE_X + BADGE_PAD_X;
    let text_y = BADGE_Y + BADGE_HEIGHT / 2.0 + BADGE_FONT_SIZE * 0.35;
    let fill = brand::hex(pal.badge_fill);
    let accent = brand::hex(ACCENT);
    format!(
        r##"<path d="{pill}" fill="{fill}" fill-opacity="0.92" stroke="{accent}" stroke-opacity="0.9" stroke-width="1.5"/>
<text x="{text_x}" y="{text_y}" font-family="{FONT_STACK}" font-size="{BADGE_FONT_SIZE}" font-weight="700" letter-spacing="{BADGE_LETTER_SPACING}" fill="{accent}">{label}</text>"##,
        label = escape_xml(&label),
    )
}

/// Topic icon and brand mark, one transparent document above the
/// portrait. Returns `None` when both are disabled.
pub(crate) fn icon_and_brand_svg(config: &ThumbnailConfig) -> Option<String> {
    let pal = brand::palette(config.theme);
    let foreground = brand::hex(pal.foreground);
    let accent = brand::hex(ACCENT);
    let mut body = String::new();

    if config.show_topic_graphic {
        if let Some(category) = config.category.as_deref() {
            let icon = icons::topic_icon(category);
            body.push_str(&icons::icon_fragment(
                icon, ICON_X, ICON_Y, ICON_SIZE, &foreground, 0.85,
            ));
        }
    }
    if config.show_branding {
        let x = MAIN_WIDTH as f32 - BRAND_SIZE - BRAND_MARGIN;
        let y = MAIN_HEIGHT as f32 - BRAND_SIZE - BRAND_MARGIN;
        body.push_str(&icons::brand_mark_fragment(x, y, BRAND_SIZE, &foreground, &accent));
    }
    if body.is_empty() {
        return None;
    }
    Some(wrap_overlay(body))
}

fn wrap_overlay(body: String) -> String {
    format!(
        r##"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">{body}</svg>"##,
        w = MAIN_WIDTH,
        h = MAIN_HEIGHT,
    )
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
