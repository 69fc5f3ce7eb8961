//! Provider embed URL resolution.
//!
//! Vimeo and Dailymotion entries already store a directly embeddable
//! URL and pass through unchanged. Google Drive entries store the
//! share link; the file identifier is lifted out of the path and
//! rewritten into the inline preview form. A drive URL that does not
//! match the share-link shape falls back to the raw URL unchanged.

use url::Url;

use cineflux_model::VideoSource;

/// Resolve the URL to hand to the embedded player.
pub fn embed_url(source: VideoSource, raw: &str) -> String {
    match source {
        VideoSource::Vimeo | VideoSource::Dailymotion => raw.to_string(),
        VideoSource::GoogleDrive => {
            drive_preview_url(raw).unwrap_or_else(|| raw.to_string())
        }
    }
}

/// Rewrite `…/file/d/{id}/…` share links to the preview form.
fn drive_preview_url(raw: &str) -> Option<String> {
    let parsed = Url::parse(raw).ok()?;
    let segments: Vec<&str> = parsed.path_segments()?.collect();

    match segments.as_slice() {
        ["file", "d", id, ..] if !id.is_empty() => {
            Some(format!("https://drive.google.com/file/d/{id}/preview"))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drive_share_link_becomes_preview() {
        let raw = "https://drive.google.com/file/d/ABC123/view?usp=sharing";
        assert_eq!(
            embed_url(VideoSource::GoogleDrive, raw),
            "https://drive.google.com/file/d/ABC123/preview"
        );
    }

    #[test]
    fn unmatched_drive_url_passes_through() {
        let raw = "https://drive.google.com/open?id=ABC123";
        assert_eq!(embed_url(VideoSource::GoogleDrive, raw), raw);

        let garbage = "not a url";
        assert_eq!(embed_url(VideoSource::GoogleDrive, garbage), garbage);
    }

    #[test]
    fn other_providers_pass_through() {
        let vimeo = "https://player.vimeo.com/video/76979871";
        assert_eq!(embed_url(VideoSource::Vimeo, vimeo), vimeo);

        let dailymotion = "https://www.dailymotion.com/embed/video/x8abc12";
        assert_eq!(embed_url(VideoSource::Dailymotion, dailymotion), dailymotion);
    }
}
