use std::io::Cursor;

use thumbforge::{
    BackgroundId, EngineOptions, LayoutHint, OutputFormat, Theme, ThumbnailConfig, ThumbnailEngine,
};
use tiny_http::{Response, Server};

fn mix64(mut z: u64) -> u64 {
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

fn digest_u64(bytes: &[u8]) -> u64 {
    let mut state = 0x9E37_79B9_7F4A_7C15u64;
    for chunk in bytes.chunks(8) {
        let mut v = 0u64;
        for (i, &b) in chunk.iter().enumerate() {
            v |= (b as u64) << (i * 8);
        }
        state = mix64(state ^ v);
    }
    state
}

// no system fonts so results do not depend on the host
fn engine() -> ThumbnailEngine {
    engine_with(EngineOptions::default())
}

fn engine_with(mut options: EngineOptions) -> ThumbnailEngine {
    options.load_system_fonts = false;
    ThumbnailEngine::new(options).unwrap()
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

fn photo_png() -> Vec<u8> {
    let img = image::RgbaImage::from_fn(200, 260, |x, y| {
        image::Rgba([(40 + x) as u8, (90 + y % 120) as u8, 160, 255])
    });
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

/// One-shot HTTP fixture answering every request with the same body.
fn serve(status: u16, body: Vec<u8>) -> String {
    let server = Server::http("127.0.0.1:0").unwrap();
    let port = server.server_addr().to_ip().unwrap().port();
    std::thread::spawn(move || {
        for request in server.incoming_requests() {
            let _ = request.respond(Response::from_data(body.clone()).with_status_code(status));
        }
    });
    format!("http://127.0.0.1:{port}/staff/ada.png")
}

#[test]
fn render_is_deterministic_across_engines() {
    let config = base_config();
    let a = engine().render(&config).unwrap();
    let b = engine().render(&config).unwrap();
    assert_eq!(digest_u64(&a.main), digest_u64(&b.main));
    assert_eq!(digest_u64(&a.small), digest_u64(&b.small));
}

#[test]
fn renditions_meet_the_published_contract() {
    let out = engine().render(&base_config()).unwrap();

    assert_eq!(out.main_format, OutputFormat::Png);
    assert!(out.main.len() <= 2 * 1024 * 1024);
    assert_eq!(&out.main[..8], b"\x89PNG\r\n\x1a\n");
    let main = image::load_from_memory(&out.main).unwrap();
    assert_eq!((main.width(), main.height()), (1280, 720));

    assert_eq!(&out.small[..8], b"\x89PNG\r\n\x1a\n");
    let small = image::load_from_memory(&out.small).unwrap();
    assert_eq!((small.width(), small.height()), (640, 360));
}

#[test]
fn remote_photo_flows_into_the_composition() {
    let mut with_photo = base_config();
    with_photo.face_asset_url = Some(serve(200, photo_png()));

    let a = engine().render(&with_photo).unwrap();
    let b = engine().render(&base_config()).unwrap();
    assert_ne!(digest_u64(&a.main), digest_u64(&b.main));
}

#[test]
fn missing_remote_photo_degrades_to_portrait_less_render() {
    let mut gone = base_config();
    gone.face_asset_url = Some(serve(404, b"gone".to_vec()));

    let a = engine().render(&gone).unwrap();
    let b = engine().render(&base_config()).unwrap();
    assert_eq!(digest_u64(&a.main), digest_u64(&b.main));
}

#[test]
fn unreachable_photo_host_degrades_to_portrait_less_render() {
    let mut refused = base_config();
    refused.face_asset_url = Some("http://127.0.0.1:1/ada.png".to_string());

    let a = engine().render(&refused).unwrap();
    let b = engine().render(&base_config()).unwrap();
    assert_eq!(digest_u64(&a.main), digest_u64(&b.main));
}

#[test]
fn local_photo_path_is_read_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("host.png");
    std::fs::write(&path, photo_png()).unwrap();

    let mut with_photo = base_config();
    with_photo.face_asset_url = Some(path.display().to_string());

    let a = engine().render(&with_photo).unwrap();
    let b = engine().render(&base_config()).unwrap();
    assert_ne!(digest_u64(&a.main), digest_u64(&b.main));
}

#[test]
fn surface_toggles_change_the_output() {
    let base = engine().render(&base_config()).unwrap();

    let mut no_badge = base_config();
    no_badge.show_category_badge = false;
    assert_ne!(
        digest_u64(&engine().render(&no_badge).unwrap().main),
        digest_u64(&base.main)
    );

    let mut with_icon = base_config();
    with_icon.show_topic_graphic = true;
    assert_ne!(
        digest_u64(&engine().render(&with_icon).unwrap().main),
        digest_u64(&base.main)
    );

    let mut no_brand = base_config();
    no_brand.show_branding = false;
    assert_ne!(
        digest_u64(&engine().render(&no_brand).unwrap().main),
        digest_u64(&base.main)
    );

    let mut light = base_config();
    light.theme = Theme::Light;
    assert_ne!(
        digest_u64(&engine().render(&light).unwrap().main),
        digest_u64(&base.main)
    );

    let mut other_background = base_config();
    other_background.background_id = BackgroundId::Brutalist;
    assert_ne!(
        digest_u64(&engine().render(&other_background).unwrap().main),
        digest_u64(&base.main)
    );
}

#[test]
fn tiny_ceiling_forces_floor_jpeg() {
    let engine = engine_with(EngineOptions {
        ceiling_bytes: 200,
        ..EngineOptions::default()
    });
    let out = engine.render(&base_config()).unwrap();

    // no real 1280x720 encodes under 200 bytes, so the floor attempt
    // ships over the ceiling
    assert_eq!(out.main_format, OutputFormat::Jpeg);
    assert_eq!(&out.main[..3], b"\xFF\xD8\xFF");
    assert!(out.main.len() > 200);

    // the small rendition stays PNG regardless
    assert_eq!(&out.small[..8], b"\x89PNG\r\n\x1a\n");
    let small = image::load_from_memory(&out.small).unwrap();
    assert_eq!((small.width(), small.height()), (640, 360));
}

#[test]
fn empty_title_still_renders_both_renditions() {
    let mut untitled = base_config();
    untitled.title_text = String::new();
    untitled.category = None;
    untitled.show_category_badge = false;

    let out = engine().render(&untitled).unwrap();
    let main = image::load_from_memory(&out.main).unwrap();
    assert_eq!((main.width(), main.height()), (1280, 720));
}
