//! SVG parsing and rasterization for the generated layer documents.

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;

use crate::error::{ThumbError, ThumbResult};

/// Builds the font database the text layers resolve against: system
/// fonts (unless disabled) plus any `.ttf`/`.otf`/`.ttc` files in the
/// configured fonts directory.
pub fn build_fontdb(
    fonts_dir: Option<&Path>,
    load_system_fonts: bool,
) -> Arc<usvg::fontdb::Database> {
    let mut db = usvg::fontdb::Database::new();
    if load_system_fonts {
        db.load_system_fonts();
    }
    if let Some(dir) = fonts_dir {
        load_fonts_from_dir(&mut db, dir);
    }
    Arc::new(db)
}

fn load_fonts_from_dir(db: &mut usvg::fontdb::Database, dir: &Path) {
    let Ok(rd) = std::fs::read_dir(dir) else {
        return;
    };

    for entry in rd.flatten() {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(ext) = path.extension().and_then(|s| s.to_str()) else {
            continue;
        };
        let ext = ext.to_ascii_lowercase();
        if ext != "ttf" && ext != "otf" && ext != "ttc" {
            continue;
        }
        let _ = db.load_font_file(&path);
    }
}

/// Resolver for the overlay documents. They only ever request normal
/// style and stretch, so the query maps families and weight and then
/// falls back to any installed face rather than failing the text node.
fn overlay_font_resolver() -> usvg::FontResolver<'static> {
    use usvg::FontResolver;

    FontResolver {
        select_font: Box::new(|font, fontdb| {
            let mut families = Vec::<usvg::fontdb::Family<'_>>::new();
            for family in font.families() {
                families.push(match family {
                    usvg::FontFamily::Serif => usvg::fontdb::Family::Serif,
                    usvg::FontFamily::SansSerif => usvg::fontdb::Family::SansSerif,
                    usvg::FontFamily::Cursive => usvg::fontdb::Family::Cursive,
                    usvg::FontFamily::Fantasy => usvg::fontdb::Family::Fantasy,
                    usvg::FontFamily::Monospace => usvg::fontdb::Family::Monospace,
                    usvg::FontFamily::Named(s) => usvg::fontdb::Family::Name(s),
                });
            }
            families.push(usvg::fontdb::Family::SansSerif);

            let query = usvg::fontdb::Query {
                families: &families,
                weight: usvg::fontdb::Weight(font.weight()),
                stretch: usvg::fontdb::Stretch::Normal,
                style: usvg::fontdb::Style::Normal,
            };
            if let Some(id) = fontdb.query(&query) {
                return Some(id);
            }
            fontdb.faces().next().map(|f| f.id)
        }),
        select_fallback: FontResolver::default_fallback_selector(),
    }
}

/// Rasterizes one SVG document into premultiplied RGBA8 at the exact
/// target size. The documents declare their own size; the transform
/// only corrects rounding between the declared and requested pixels.
pub fn rasterize(
    svg: &str,
    width: u32,
    height: u32,
    fontdb: &Arc<usvg::fontdb::Database>,
) -> ThumbResult<Vec<u8>> {
    let opts = usvg::Options {
        fontdb: fontdb.clone(),
        font_resolver: overlay_font_resolver(),
        ..Default::default()
    };
    let tree = usvg::Tree::from_str(svg, &opts).context("parse layer svg")?;

    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| ThumbError::render("failed to allocate layer pixmap"))?;

    let sx = (width as f32) / tree.size().width();
    let sy = (height as f32) / tree.size().height();
    let xform = resvg::tiny_skia::Transform::from_scale(sx, sy);

    resvg::render(&tree, xform, &mut pixmap.as_mut());
    Ok(pixmap.data().to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opaque_rect_fills_exact_pixels() {
        let svg = r##"<svg xmlns="http://www.w3.org/2000/svg" width="4" height="4"><rect width="4" height="4" fill="#ff0000"/></svg>"##;
        let db = build_fontdb(None, false);
        let data = rasterize(svg, 4, 4, &db).unwrap();
        assert_eq!(data.len(), 4 * 4 * 4);
        assert_eq!(&data[0..4], &[255, 0, 0, 255]);
    }

    #[test]
    fn output_is_premultiplied() {
        let svg = r##"<svg xmlns="http://www.w3.org/2000/svg" width="2" height="2"><rect width="2" height="2" fill="#ff0000" fill-opacity="0.5"/></svg>"##;
        let db = build_fontdb(None, false);
        let data = rasterize(svg, 2, 2, &db).unwrap();
        let (r, a) = (data[0], data[3]);
        assert!(a < 255);
        // premultiplied red: channel equals coverage
        assert_eq!(r, a);
    }

    #[test]
    fn shape_documents_need_no_fonts() {
        let svg = r##"<svg xmlns="http://www.w3.org/2000/svg" width="8" height="8"><circle cx="4" cy="4" r="3" fill="#00ed64"/></svg>"##;
        let db = build_fontdb(None, false);
        assert!(rasterize(svg, 8, 8, &db).is_ok());
    }

    #[test]
    fn malformed_documents_error() {
        let db = build_fontdb(None, false);
        assert!(rasterize("<svg", 4, 4, &db).is_err());
    }
}
