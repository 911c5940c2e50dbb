use anyhow::{anyhow, Context};
use once_cell::sync::Lazy;
use rand::seq::SliceRandom;
use regex::Regex;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

// Rotating User Agents
static USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) Edge/120.0.0.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.2.1 Safari/605.1.15",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:122.0) Gecko/20100101 Firefox/122.0",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
];

// HTTP client
static HTTP_CLIENT: Lazy<Client> = Lazy::new(|| {
    Client::builder()
        .timeout(Duration::from_secs(30))
        .build()
        .expect("Failed to create HTTP client")
});

// The watch page embeds caption metadata as a JSON island in minified
// player config; the array has no nested brackets, so a lazy match is safe.
static CAPTION_TRACKS_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""captionTracks":(\[.*?\])"#).expect("valid captionTracks regex"));

static TEXT_ENTRY_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<text[^>]*>(.*?)</text>").expect("valid timedtext regex"));

/// Single failure surface for transcript retrieval. No partial results:
/// whatever goes wrong (no captions, network, malformed track) ends here.
#[derive(Error, Debug)]
#[error("Failed to get YouTube transcript: {0}")]
pub struct TranscriptError(String);

#[derive(Debug, Deserialize)]
struct CaptionTrack {
    #[serde(rename = "baseUrl")]
    base_url: String,
}

fn get_random_user_agent() -> &'static str {
    let mut rng = rand::thread_rng();
    USER_AGENTS.choose(&mut rng).unwrap_or(&USER_AGENTS[0])
}

/// Retrieves the caption track of a video as flat text, entries space-joined
/// in original order.
pub async fn fetch_transcript(video_id: &str) -> Result<String, TranscriptError> {
    fetch_transcript_inner(video_id)
        .await
        .map_err(|e| TranscriptError(e.to_string()))
}

async fn fetch_transcript_inner(video_id: &str) -> anyhow::Result<String> {
    let watch_url = Url::parse_with_params("https://www.youtube.com/watch", [("v", video_id)])
        .context("invalid video id")?;
    debug!("Fetching watch page: {}", watch_url);

    let page = HTTP_CLIENT
        .get(watch_url)
        .header("user-agent", get_random_user_agent())
        .header("accept-language", "en-US,en;q=0.9")
        .send()
        .await?
        .error_for_status()?
        .text()
        .await?;

    let tracks_json = CAPTION_TRACKS_REGEX
        .captures(&page)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .ok_or_else(|| anyhow!("captions are disabled or unavailable for this video"))?;

    let tracks: Vec<CaptionTrack> =
        serde_json::from_str(tracks_json).context("unexpected captionTracks payload")?;
    let track = tracks
        .first()
        .ok_or_else(|| anyhow!("no caption tracks listed for this video"))?;

    // baseUrl arrives JS-escaped inside the page source.
    let track_url = track.base_url.replace("\\u0026", "&");
    debug!("Fetching caption track: {}", track_url);

    let timedtext = HTTP_CLIENT
        .get(&track_url)
        .header("user-agent", get_random_user_agent())
        .send()
        .await?
        .error_for_status()?
        .text()
        .await?;

    let transcript = parse_timedtext(&timedtext);
    if transcript.is_empty() {
        warn!("Caption track for {} contained no text entries", video_id);
    }
    Ok(transcript)
}

/// Flattens a timedtext XML document into space-joined caption text,
/// preserving entry order. Empty entries contribute nothing.
fn parse_timedtext(xml: &str) -> String {
    let mut entries = Vec::new();

    for caps in TEXT_ENTRY_REGEX.captures_iter(xml) {
        let raw = caps.get(1).map(|m| m.as_str()).unwrap_or("");
        let text = decode_entities(raw);
        let text = text.trim();
        if !text.is_empty() {
            entries.push(text.to_string());
        }
    }

    entries.join(" ")
}

/// timedtext bodies are XML-escaped and YouTube escapes the ampersands a
/// second time (`&amp;#39;` for an apostrophe), so the set runs twice.
fn decode_entities(s: &str) -> String {
    fn pass(s: &str) -> String {
        s.replace("&lt;", "<")
            .replace("&gt;", ">")
            .replace("&quot;", "\"")
            .replace("&#39;", "'")
            .replace("&nbsp;", " ")
            .replace("&amp;", "&")
    }

    pass(&pass(s))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_entries_in_order_with_spaces() {
        let xml = r#"<?xml version="1.0" encoding="utf-8"?>
<transcript>
  <text start="0.0" dur="1.5">Welcome back</text>
  <text start="1.5" dur="2.0">to the channel</text>
  <text start="3.5" dur="1.0">everyone</text>
</transcript>"#;
        assert_eq!(parse_timedtext(xml), "Welcome back to the channel everyone");
    }

    #[test]
    fn skips_empty_entries() {
        let xml = r#"<transcript><text start="0" dur="1"></text><text start="1" dur="1">hi</text><text start="2" dur="1">  </text></transcript>"#;
        assert_eq!(parse_timedtext(xml), "hi");
    }

    #[test]
    fn decodes_escaped_entities() {
        let xml = r#"<transcript><text start="0" dur="1">it&amp;#39;s A &amp;amp; B &lt;live&gt;</text></transcript>"#;
        assert_eq!(parse_timedtext(xml), "it's A & B <live>");
    }

    #[test]
    fn no_entries_means_empty_transcript() {
        assert_eq!(parse_timedtext("<transcript></transcript>"), "");
        assert_eq!(parse_timedtext(""), "");
    }

    #[test]
    fn caption_tracks_island_is_extracted() {
        let page = r#"...;"captions":{"playerCaptionsTracklistRenderer":{"captionTracks":[{"baseUrl":"https://www.youtube.com/api/timedtext?v=abc&lang=en","name":{"simpleText":"English"},"languageCode":"en"}]}},"videoDetails":..."#;
        let caps = CAPTION_TRACKS_REGEX.captures(page).expect("island found");
        let tracks: Vec<CaptionTrack> = serde_json::from_str(caps.get(1).unwrap().as_str())
            .expect("track json parses");
        assert_eq!(tracks.len(), 1);
        assert!(tracks[0].base_url.contains("timedtext"));
    }
}
