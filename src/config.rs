use crate::error::{ThumbError, ThumbResult};

/// Requested thumbnail, as submitted by the CMS layer. Wire form is the
/// camelCase JSON the episode editor emits.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThumbnailConfig {
    pub title_text: String,
    pub layout: LayoutHint,
    pub theme: Theme,
    pub background_id: BackgroundId,
    /// HTTP(S) URL or a path relative to the working directory. `None`
    /// renders without a portrait.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub face_asset_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default = "default_true")]
    pub show_category_badge: bool,
    #[serde(default = "default_true")]
    pub show_branding: bool,
    #[serde(default)]
    pub show_topic_graphic: bool,
}

fn default_true() -> bool {
    true
}

/// Placement hint. Only `FaceLeft` changes composition today; the other
/// values are accepted and carried so stored configs stay forward
/// compatible.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LayoutHint {
    FaceLeft,
    FaceRight,
    Centered,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Theme {
    Dark,
    Light,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BackgroundId {
    Default,
    TechGrid,
    Brutalist,
    LeafPattern,
    Geometric,
}

impl ThumbnailConfig {
    /// Rejects fields that are present but blank. An empty title is
    /// allowed (it lays out as zero lines); a `Some("")` URL or
    /// category is always an upstream bug.
    pub fn validate(&self) -> ThumbResult<()> {
        if let Some(url) = &self.face_asset_url {
            if url.trim().is_empty() {
                return Err(ThumbError::config("faceAssetUrl must be non-empty when set"));
            }
        }
        if let Some(category) = &self.category {
            if category.trim().is_empty() {
                return Err(ThumbError::config("category must be non-empty when set"));
            }
        }
        Ok(())
    }
}
