//! YouTube video id extraction

use url::Url;

const ID_LEN: usize = 11;

fn is_video_id(s: &str) -> bool {
    s.len() == ID_LEN
        && s.chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Extract the video id from a bare id or a known YouTube URL form.
///
/// Returns `None` when the input is neither; callers can then ask `yt-dlp`.
///
/// ```
/// use webintel::youtube::parse_video_id;
///
/// assert_eq!(parse_video_id("dQw4w9WgXcQ").as_deref(), Some("dQw4w9WgXcQ"));
/// assert_eq!(
///     parse_video_id("https://youtu.be/dQw4w9WgXcQ?t=42").as_deref(),
///     Some("dQw4w9WgXcQ")
/// );
/// assert_eq!(parse_video_id("not a video"), None);
/// ```
pub fn parse_video_id(input: &str) -> Option<String> {
    let input = input.trim();
    if is_video_id(input) {
        return Some(input.to_string());
    }

    let url = if input.contains("://") {
        Url::parse(input).ok()?
    } else {
        Url::parse(&format!("https://{}", input)).ok()?
    };

    let host = url.host_str()?.trim_start_matches("www.").trim_start_matches("m.");

    if let Some((_, v)) = url.query_pairs().find(|(k, _)| k == "v") {
        if is_video_id(&v) {
            return Some(v.into_owned());
        }
    }

    let mut segments = url.path_segments()?.filter(|s| !s.is_empty());
    let candidate = match host {
        "youtu.be" => segments.next(),
        h if h.ends_with("youtube.com") || h.ends_with("youtube-nocookie.com") => {
            match segments.next() {
                Some("shorts") | Some("embed") | Some("live") | Some("v") => segments.next(),
                _ => None,
            }
        }
        _ => None,
    }?;

    is_video_id(candidate).then(|| candidate.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_id() {
        assert_eq!(parse_video_id("  abc-DEF_123 ").as_deref(), Some("abc-DEF_123"));
        assert_eq!(parse_video_id("abc"), None);
        assert_eq!(parse_video_id("abc-DEF_1234"), None);
    }

    #[test]
    fn test_url_forms() {
        let id = Some("dQw4w9WgXcQ".to_string());
        for input in [
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
            "https://m.youtube.com/watch?feature=share&v=dQw4w9WgXcQ",
            "youtube.com/watch?v=dQw4w9WgXcQ&list=PL123",
            "https://youtu.be/dQw4w9WgXcQ",
            "https://www.youtube.com/shorts/dQw4w9WgXcQ",
            "https://www.youtube.com/embed/dQw4w9WgXcQ?autoplay=1",
            "https://www.youtube.com/live/dQw4w9WgXcQ",
            "https://www.youtube-nocookie.com/embed/dQw4w9WgXcQ",
        ] {
            assert_eq!(parse_video_id(input), id, "input: {}", input);
        }
    }

    #[test]
    fn test_unrecognized() {
        assert_eq!(parse_video_id("https://vimeo.com/123456789"), None);
        assert_eq!(parse_video_id("https://www.youtube.com/channel/UCabcdefghijk"), None);
        assert_eq!(parse_video_id("https://www.youtube.com/watch?v=short"), None);
        assert_eq!(parse_video_id(""), None);
    }
}
