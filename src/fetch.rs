//! Photo acquisition. Every failure here is absorbed by design: the
//! pipeline renders without a portrait rather than failing the episode.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;

use crate::error::ThumbResult;

/// Where the portrait photo comes from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PhotoSource {
    /// Caller-supplied bytes, exercised directly by the pure render
    /// entry point.
    Bytes(Vec<u8>),
    Url(String),
    Path(PathBuf),
}

impl PhotoSource {
    /// Classifies a config reference: anything with an HTTP(S) scheme
    /// fetches remotely, everything else reads as a local path.
    pub fn from_reference(reference: &str) -> Self {
        let lower = reference.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            PhotoSource::Url(reference.to_string())
        } else {
            PhotoSource::Path(PathBuf::from(reference))
        }
    }
}

/// Blocking fetcher with a request timeout and a byte cap.
pub struct PhotoFetcher {
    client: reqwest::blocking::Client,
    max_bytes: usize,
}

impl PhotoFetcher {
    pub fn new(timeout: Duration, max_bytes: usize) -> ThumbResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .context("build photo http client")?;
        Ok(Self { client, max_bytes })
    }

    /// Returns the photo bytes, or `None` after logging why the
    /// portrait is being skipped.
    pub fn fetch(&self, source: &PhotoSource) -> Option<Vec<u8>> {
        match source {
            PhotoSource::Bytes(bytes) => {
                if bytes.len() > self.max_bytes {
                    tracing::warn!(
                        len = bytes.len(),
                        max = self.max_bytes,
                        "photo bytes over cap, rendering without portrait"
                    );
                    return None;
                }
                Some(bytes.clone())
            }
            PhotoSource::Url(url) => self.fetch_url(url),
            PhotoSource::Path(path) => {
                let bytes = match std::fs::read(path) {
                    Ok(bytes) => bytes,
                    Err(err) => {
                        tracing::warn!(
                            path = %path.display(),
                            error = %err,
                            "photo read failed, rendering without portrait"
                        );
                        return None;
                    }
                };
                if bytes.len() > self.max_bytes {
                    tracing::warn!(
                        path = %path.display(),
                        len = bytes.len(),
                        max = self.max_bytes,
                        "photo file over cap, rendering without portrait"
                    );
                    return None;
                }
                Some(bytes)
            }
        }
    }

    fn fetch_url(&self, url: &str) -> Option<Vec<u8>> {
        let response = match self.client.get(url).send() {
            Ok(response) => response,
            Err(err) => {
                tracing::warn!(url, error = %err, "photo fetch failed, rendering without portrait");
                return None;
            }
        };
        if !response.status().is_success() {
            tracing::warn!(
                url,
                status = %response.status(),
                "photo fetch non-success, rendering without portrait"
            );
            return None;
        }
        if let Some(len) = response.content_length() {
            if len as usize > self.max_bytes {
                tracing::warn!(
                    url,
                    len,
                    max = self.max_bytes,
                    "photo over cap, rendering without portrait"
                );
                return None;
            }
        }
        let bytes = match response.bytes() {
            Ok(bytes) => bytes,
            Err(err) => {
                tracing::warn!(
                    url,
                    error = %err,
                    "photo body read failed, rendering without portrait"
                );
                return None;
            }
        };
        if bytes.len() > self.max_bytes {
            tracing::warn!(
                url,
                len = bytes.len(),
                max = self.max_bytes,
                "photo over cap, rendering without portrait"
            );
            return None;
        }
        Some(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn fetcher(max_bytes: usize) -> PhotoFetcher {
        PhotoFetcher::new(Duration::from_millis(500), max_bytes).unwrap()
    }

    #[test]
    fn references_classify_by_scheme() {
        assert!(matches!(
            PhotoSource::from_reference("https://cdn.example/face.png"),
            PhotoSource::Url(_)
        ));
        assert!(matches!(
            PhotoSource::from_reference("HTTP://cdn.example/face.png"),
            PhotoSource::Url(_)
        ));
        assert!(matches!(
            PhotoSource::from_reference("photos/face.png"),
            PhotoSource::Path(_)
        ));
    }

    #[test]
    fn local_path_reads_and_missing_absorbs() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"png-ish bytes").unwrap();

        let fetched = fetcher(1024).fetch(&PhotoSource::Path(file.path().to_path_buf()));
        assert_eq!(fetched.as_deref(), Some(b"png-ish bytes".as_slice()));

        let missing = fetcher(1024).fetch(&PhotoSource::Path(PathBuf::from(
            "definitely/not/here.png",
        )));
        assert!(missing.is_none());
    }

    #[test]
    fn byte_cap_applies_to_every_source() {
        let big = vec![0u8; 64];
        assert!(fetcher(16).fetch(&PhotoSource::Bytes(big.clone())).is_none());

        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&big).unwrap();
        assert!(
            fetcher(16)
                .fetch(&PhotoSource::Path(file.path().to_path_buf()))
                .is_none()
        );
    }

    #[test]
    fn inline_bytes_pass_through() {
        let bytes = vec![1u8, 2, 3];
        assert_eq!(
            fetcher(16).fetch(&PhotoSource::Bytes(bytes.clone())),
            Some(bytes)
        );
    }
}
