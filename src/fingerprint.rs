//! Deterministic config fingerprint. Publish paths derive from it, so
//! re-rendering an unchanged episode overwrites its own objects.

use crate::config::{BackgroundId, LayoutHint, Theme, ThumbnailConfig};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ConfigFingerprint {
    pub hi: u64,
    pub lo: u64,
}

impl ConfigFingerprint {
    /// 32 lowercase hex chars, stable across runs and platforms.
    pub fn to_hex(self) -> String {
        format!("{:016x}{:016x}", self.hi, self.lo)
    }
}

/// Hashes every render-relevant config field. The photo is represented
/// by its source reference, not its bytes; a CDN re-upload under the
/// same URL intentionally maps to the same objects.
pub fn fingerprint_config(config: &ThumbnailConfig) -> ConfigFingerprint {
    let mut a = Fnv1a64::new(0xcbf29ce484222325);
    let mut b = Fnv1a64::new(0x9ae16a3b2f90404f);

    write_str_pair(&mut a, &mut b, &config.title_text);
    write_u8_pair(
        &mut a,
        &mut b,
        match config.layout {
            LayoutHint::FaceLeft => 0,
            LayoutHint::FaceRight => 1,
            LayoutHint::Centered => 2,
        },
    );
    write_u8_pair(
        &mut a,
        &mut b,
        match config.theme {
            Theme::Dark => 0,
            Theme::Light => 1,
        },
    );
    write_u8_pair(
        &mut a,
        &mut b,
        match config.background_id {
            BackgroundId::Default => 0,
            BackgroundId::TechGrid => 1,
            BackgroundId::Brutalist => 2,
            BackgroundId::LeafPattern => 3,
            BackgroundId::Geometric => 4,
        },
    );
    write_opt_str_pair(&mut a, &mut b, config.face_asset_url.as_deref());
    write_opt_str_pair(&mut a, &mut b, config.category.as_deref());
    write_u8_pair(&mut a, &mut b, u8::from(config.show_category_badge));
    write_u8_pair(&mut a, &mut b, u8::from(config.show_branding));
    write_u8_pair(&mut a, &mut b, u8::from(config.show_topic_graphic));

    ConfigFingerprint {
        hi: a.finish(),
        lo: b.finish(),
    }
}

fn write_opt_str_pair(a: &mut Fnv1a64, b: &mut Fnv1a64, s: Option<&str>) {
    match s {
        Some(s) => {
            write_u8_pair(a, b, 1);
            write_str_pair(a, b, s);
        }
        None => write_u8_pair(a, b, 0),
    }
}

fn write_u8_pair(a: &mut Fnv1a64, b: &mut Fnv1a64, v: u8) {
    a.write_u8(v);
    b.write_u8(v);
}

fn write_str_pair(a: &mut Fnv1a64, b: &mut Fnv1a64, s: &str) {
    a.write_u64(s.len() as u64);
    b.write_u64(s.len() as u64);
    a.write_bytes(s.as_bytes());
    b.write_bytes(s.as_bytes());
}

#[derive(Clone, Copy)]
struct Fnv1a64(u64);

impl Fnv1a64 {
    fn new(seed: u64) -> Self {
        Self(seed)
    }

    fn write_u8(&mut self, v: u8) {
        self.write_bytes(&[v]);
    }

    fn write_u64(&mut self, v: u64) {
        self.write_bytes(&v.to_le_bytes());
    }

    fn write_bytes(&mut self, bytes: &[u8]) {
        let mut h = self.0;
        for &b in bytes {
            h ^= b as u64;
            h = h.wrapping_mul(0x100000001b3);
        }
        self.0 = h;
    }

    fn finish(self) -> u64 {
        self.0
    }
}
