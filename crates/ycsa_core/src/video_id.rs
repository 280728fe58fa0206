use url::Url;

const MAX_ID_LEN: usize = 64;

/// Extracts a video id from a watch URL, a short/live/embed URL, or a bare id.
///
/// A `v=` query parameter wins over the path. Returns `None` for empty or
/// malformed input; ids are limited to `[A-Za-z0-9_-]`.
pub fn parse_video_id(input: &str) -> Option<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }

    let candidate = match Url::parse(trimmed) {
        Ok(url) => from_url(&url)?,
        Err(_) => from_loose(trimmed)?,
    };

    is_valid_id(&candidate).then_some(candidate)
}

fn from_url(url: &Url) -> Option<String> {
    if let Some((_, value)) = url.query_pairs().find(|(key, _)| key == "v") {
        return Some(value.into_owned());
    }
    url.path_segments()?
        .filter(|segment| !segment.is_empty())
        .last()
        .filter(|segment| *segment != "watch")
        .map(str::to_string)
}

/// Handles scheme-less input such as `youtube.com/watch?v=...` or a bare id.
fn from_loose(input: &str) -> Option<String> {
    if let Some((_, rest)) = input.split_once("v=") {
        return rest.split('&').next().map(str::to_string);
    }
    let last = input.trim_end_matches('/').rsplit('/').next()?;
    let last = last.split(['?', '#']).next()?;
    (last != "watch").then(|| last.to_string())
}

fn is_valid_id(id: &str) -> bool {
    !id.is_empty()
        && id.len() <= MAX_ID_LEN
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

#[cfg(test)]
mod tests {
    use super::parse_video_id;

    #[test]
    fn watch_url_with_extra_params() {
        assert_eq!(
            parse_video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ&list=PLrAXtmRdnEQy"),
            Some("dQw4w9WgXcQ".to_string())
        );
    }

    #[test]
    fn short_and_live_urls_use_last_segment() {
        assert_eq!(
            parse_video_id("https://youtu.be/dQw4w9WgXcQ?t=30"),
            Some("dQw4w9WgXcQ".to_string())
        );
        assert_eq!(
            parse_video_id("https://www.youtube.com/live/jfKfPfyJRdk?si=abc"),
            Some("jfKfPfyJRdk".to_string())
        );
        assert_eq!(
            parse_video_id("https://www.youtube.com/shorts/abc123def45/"),
            Some("abc123def45".to_string())
        );
    }

    #[test]
    fn scheme_less_and_bare_ids() {
        assert_eq!(
            parse_video_id("youtube.com/watch?v=abc_DEF-123"),
            Some("abc_DEF-123".to_string())
        );
        assert_eq!(parse_video_id("  dQw4w9WgXcQ \n"), Some("dQw4w9WgXcQ".to_string()));
    }

    #[test]
    fn rejects_empty_and_malformed() {
        assert_eq!(parse_video_id(""), None);
        assert_eq!(parse_video_id("   "), None);
        assert_eq!(parse_video_id("https://www.youtube.com/"), None);
        assert_eq!(parse_video_id("https://www.youtube.com/watch"), None);
        assert_eq!(parse_video_id("not a video id"), None);
        assert_eq!(parse_video_id("https://www.youtube.com/watch?v="), None);
    }
}
