//! The end-to-end engine: fetch the photo, lay out the title, compose
//! the layers, encode under the ceiling, optionally publish.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::brand::DEFAULT_CEILING_BYTES;
use crate::compose;
use crate::config::ThumbnailConfig;
use crate::encode::{self, OutputFormat};
use crate::error::{ThumbError, ThumbResult};
use crate::fetch::{PhotoFetcher, PhotoSource};
use crate::fingerprint::fingerprint_config;
use crate::highlight;
use crate::portrait;
use crate::storage::ObjectStore;
use crate::svg_raster;
use crate::title;

#[derive(Clone, Debug)]
pub struct EngineOptions {
    /// Byte ceiling for the main rendition.
    pub ceiling_bytes: usize,
    pub fetch_timeout: Duration,
    /// Photos larger than this are treated as fetch failures.
    pub photo_max_bytes: usize,
    /// Extra font files loaded next to system fonts.
    pub fonts_dir: Option<PathBuf>,
    pub load_system_fonts: bool,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            ceiling_bytes: DEFAULT_CEILING_BYTES,
            fetch_timeout: Duration::from_secs(5),
            photo_max_bytes: 8 * 1024 * 1024,
            fonts_dir: None,
            load_system_fonts: true,
        }
    }
}

impl EngineOptions {
    pub fn validate(&self) -> ThumbResult<()> {
        if self.ceiling_bytes == 0 {
            return Err(ThumbError::config("ceiling_bytes must be > 0"));
        }
        if self.photo_max_bytes == 0 {
            return Err(ThumbError::config("photo_max_bytes must be > 0"));
        }
        if self.fetch_timeout.is_zero() {
            return Err(ThumbError::config("fetch_timeout must be > 0"));
        }
        Ok(())
    }
}

/// Both renditions, ready for storage.
#[derive(Clone, Debug)]
pub struct RenderedThumbnail {
    /// 1280x720; PNG unless the ceiling forced JPEG.
    pub main: Vec<u8>,
    pub main_format: OutputFormat,
    /// 640x360, always PNG.
    pub small: Vec<u8>,
}

#[derive(Clone, Debug)]
pub struct PublishedThumbnail {
    pub main_url: String,
    pub small_url: String,
    pub main_format: OutputFormat,
}

/// Stateless once built; safe to share across threads and calls.
pub struct ThumbnailEngine {
    options: EngineOptions,
    fontdb: Arc<usvg::fontdb::Database>,
    fetcher: PhotoFetcher,
}

impl ThumbnailEngine {
    pub fn new(options: EngineOptions) -> ThumbResult<Self> {
        options.validate()?;
        let fontdb =
            svg_raster::build_fontdb(options.fonts_dir.as_deref(), options.load_system_fonts);
        let fetcher = PhotoFetcher::new(options.fetch_timeout, options.photo_max_bytes)?;
        Ok(Self {
            options,
            fontdb,
            fetcher,
        })
    }

    pub fn with_defaults() -> ThumbResult<Self> {
        Self::new(EngineOptions::default())
    }

    /// Renders one thumbnail, resolving the configured photo reference.
    /// Photo problems degrade to a portrait-less render; everything
    /// else propagates.
    #[tracing::instrument(skip(self, config), fields(title = %config.title_text))]
    pub fn render(&self, config: &ThumbnailConfig) -> ThumbResult<RenderedThumbnail> {
        config.validate()?;
        let photo = config
            .face_asset_url
            .as_deref()
            .map(PhotoSource::from_reference)
            .and_then(|source| self.fetcher.fetch(&source));
        self.render_stages(config, photo.as_deref())
    }

    /// Render over caller-held photo bytes, bypassing any I/O. Given
    /// identical config and bytes the output is byte-identical.
    pub fn render_with_photo(
        &self,
        config: &ThumbnailConfig,
        photo: Option<&[u8]>,
    ) -> ThumbResult<RenderedThumbnail> {
        config.validate()?;
        let photo = photo.and_then(|bytes| self.fetcher.fetch(&PhotoSource::Bytes(bytes.to_vec())));
        self.render_stages(config, photo.as_deref())
    }

    fn render_stages(
        &self,
        config: &ThumbnailConfig,
        photo: Option<&[u8]>,
    ) -> ThumbResult<RenderedThumbnail> {
        let portrait = photo.and_then(|bytes| {
            match portrait::process(bytes, compose::PORTRAIT_SIZE) {
                Ok(layer) => Some(layer),
                Err(err) => {
                    tracing::warn!(error = %err, "portrait processing failed, rendering without portrait");
                    None
                }
            }
        });

        let words = title::styled_words(
            &config.title_text,
            highlight::emphasis_word(&config.title_text),
        );
        let layout = title::layout_title(&words, compose::text_box_width(portrait.is_some()));

        let canvas = compose::compose(config, &layout, portrait.as_ref(), &self.fontdb)?;
        let main = encode::encode_main(&canvas, self.options.ceiling_bytes)?;
        let small = encode::small_from_main(&main.bytes)?;
        Ok(RenderedThumbnail {
            main: main.bytes,
            main_format: main.format,
            small,
        })
    }

    /// Renders and uploads both renditions under fingerprint-stable
    /// hints. Storage failures propagate.
    pub fn publish(
        &self,
        config: &ThumbnailConfig,
        store: &dyn ObjectStore,
    ) -> ThumbResult<PublishedThumbnail> {
        let rendered = self.render(config)?;
        self.publish_rendered(config, &rendered, store)
    }

    pub fn publish_rendered(
        &self,
        config: &ThumbnailConfig,
        rendered: &RenderedThumbnail,
        store: &dyn ObjectStore,
    ) -> ThumbResult<PublishedThumbnail> {
        let hex = fingerprint_config(config).to_hex();
        let main_hint = format!(
            "thumbnails/{hex}-main.{}",
            rendered.main_format.extension()
        );
        let small_hint = format!("thumbnails/{hex}-small.png");

        let main = store.put(&main_hint, &rendered.main, rendered.main_format.content_type())?;
        let small = store.put(&small_hint, &rendered.small, "image/png")?;
        Ok(PublishedThumbnail {
            main_url: main.url,
            small_url: small.url,
            main_format: rendered.main_format,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BackgroundId, LayoutHint, Theme};
    use crate::storage::MemoryObjectStore;
    use std::io::Cursor;

    fn test_engine() -> ThumbnailEngine {
        // font-less engine: text layers depend on installed fonts, the
        // rest of the stack does not
        ThumbnailEngine::new(EngineOptions {
            load_system_fonts: false,
            ..EngineOptions::default()
        })
        .unwrap()
    }

    fn base_config() -> ThumbnailConfig {
        ThumbnailConfig {
            title_text: "Why Your Compound Index Isn't Being Used".to_string(),
            layout: LayoutHint::FaceLeft,
            theme: Theme::Dark,
            background_id: BackgroundId::TechGrid,
            face_asset_url: None,
            category: Some("Indexing".to_string()),
            show_category_badge: true,
            show_branding: true,
            show_topic_graphic: false,
        }
    }

    fn test_photo() -> Vec<u8> {
        let img = image::RgbaImage::from_fn(240, 320, |x, y| {
            image::Rgba([(x % 256) as u8, (y % 256) as u8, 90, 255])
        });
        let mut bytes = Cursor::new(Vec::new());
        image::DynamicImage::ImageRgba8(img)
            .write_to(&mut bytes, image::ImageFormat::Png)
            .unwrap();
        bytes.into_inner()
    }

    #[test]
    fn render_meets_dimension_and_size_contracts() {
        let engine = test_engine();
        let out = engine.render(&base_config()).unwrap();
        assert!(out.main.len() <= DEFAULT_CEILING_BYTES);

        let main = image::load_from_memory(&out.main).unwrap();
        assert_eq!((main.width(), main.height()), (1280, 720));
        let small = image::load_from_memory(&out.small).unwrap();
        assert_eq!((small.width(), small.height()), (640, 360));
        assert_eq!(&out.small[..4], b"\x89PNG");
    }

    #[test]
    fn identical_inputs_render_identical_bytes() {
        let engine = test_engine();
        let photo = test_photo();
        let a = engine
            .render_with_photo(&base_config(), Some(&photo))
            .unwrap();
        let b = engine
            .render_with_photo(&base_config(), Some(&photo))
            .unwrap();
        assert_eq!(a.main, b.main);
        assert_eq!(a.small, b.small);
    }

    #[test]
    fn invalid_photo_bytes_degrade_to_portrait_less_render() {
        let engine = test_engine();
        let with_garbage = engine
            .render_with_photo(&base_config(), Some(b"not an image"))
            .unwrap();
        let without = engine.render_with_photo(&base_config(), None).unwrap();
        assert_eq!(with_garbage.main, without.main);
    }

    #[test]
    fn photo_changes_the_composition() {
        let engine = test_engine();
        let photo = test_photo();
        let with_photo = engine
            .render_with_photo(&base_config(), Some(&photo))
            .unwrap();
        let without = engine.render_with_photo(&base_config(), None).unwrap();
        assert_ne!(with_photo.main, without.main);
    }

    #[test]
    fn publish_uses_fingerprint_stable_hints() {
        let engine = test_engine();
        let store = MemoryObjectStore::new();
        let config = base_config();
        let published = engine.publish(&config, &store).unwrap();

        let hex = fingerprint_config(&config).to_hex();
        let main_hint = format!("thumbnails/{hex}-main.png");
        let small_hint = format!("thumbnails/{hex}-small.png");
        assert_eq!(published.main_url, format!("mem://{main_hint}"));
        assert_eq!(published.small_url, format!("mem://{small_hint}"));

        let (main_type, _) = store.get(&main_hint).unwrap();
        assert_eq!(main_type, "image/png");
        let (small_type, _) = store.get(&small_hint).unwrap();
        assert_eq!(small_type, "image/png");

        // republishing overwrites the same objects
        engine.publish(&config, &store).unwrap();
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn options_validation_rejects_zeroes() {
        assert!(
            ThumbnailEngine::new(EngineOptions {
                ceiling_bytes: 0,
                ..EngineOptions::default()
            })
            .is_err()
        );
        assert!(
            EngineOptions {
                fetch_timeout: Duration::ZERO,
                ..EngineOptions::default()
            }
            .validate()
            .is_err()
        );
    }
}
