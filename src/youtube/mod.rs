pub mod transcript;

use once_cell::sync::Lazy;
use regex::Regex;

// Recognized link shapes: watch?v=, youtu.be/, embed/, shorts/.
static VIDEO_ID_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"(?:youtube\.com/watch\?v=|youtu\.be/|youtube\.com/embed/)([^&\n?#]+)")
            .expect("valid video id regex"),
        Regex::new(r"youtube\.com/shorts/([^&\n?#]+)").expect("valid shorts regex"),
    ]
});

/// Pulls the video id out of a YouTube URL. The first matching pattern
/// wins; `None` means the caller must treat the URL as invalid input.
pub fn resolve_video_id(url: &str) -> Option<String> {
    VIDEO_ID_PATTERNS.iter().find_map(|pattern| {
        pattern
            .captures(url)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_watch_urls() {
        assert_eq!(
            resolve_video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ".to_string())
        );
        assert_eq!(
            resolve_video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=42s"),
            Some("dQw4w9WgXcQ".to_string())
        );
    }

    #[test]
    fn resolves_short_links() {
        assert_eq!(
            resolve_video_id("https://youtu.be/dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ".to_string())
        );
        assert_eq!(
            resolve_video_id("https://youtu.be/dQw4w9WgXcQ?si=xyz"),
            Some("dQw4w9WgXcQ".to_string())
        );
    }

    #[test]
    fn resolves_embed_and_shorts_paths() {
        assert_eq!(
            resolve_video_id("https://www.youtube.com/embed/dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ".to_string())
        );
        assert_eq!(
            resolve_video_id("https://www.youtube.com/shorts/abc123XYZ_-"),
            Some("abc123XYZ_-".to_string())
        );
    }

    #[test]
    fn unrecognized_urls_resolve_to_none() {
        assert_eq!(resolve_video_id("https://example.com/watch?v=abc"), None);
        assert_eq!(resolve_video_id("https://vimeo.com/12345"), None);
        assert_eq!(resolve_video_id("not a url"), None);
    }
}
