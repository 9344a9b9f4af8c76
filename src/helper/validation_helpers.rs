use regex::Regex;
use std::sync::OnceLock;
use url::Url;

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9.\-]+\.[A-Za-z]{2,}$").expect("email pattern is valid")
    })
}

fn phone_regex() -> &'static Regex {
    static PHONE: OnceLock<Regex> = OnceLock::new();
    PHONE.get_or_init(|| Regex::new(r"^[0-9+\-() ]{7,20}$").expect("phone pattern is valid"))
}

fn youtube_id_regex() -> &'static Regex {
    static YOUTUBE_ID: OnceLock<Regex> = OnceLock::new();
    YOUTUBE_ID.get_or_init(|| Regex::new(r"^[A-Za-z0-9_-]{11}$").expect("youtube id pattern is valid"))
}

/// Length in characters of the trimmed value.
pub fn char_length(value: &str) -> usize {
    value.trim().chars().count()
}

pub fn is_valid_email(value: &str) -> bool {
    email_regex().is_match(value.trim())
}

pub fn is_valid_phone(value: &str) -> bool {
    let value = value.trim();
    phone_regex().is_match(value) && value.chars().filter(|c| c.is_ascii_digit()).count() >= 7
}

pub fn is_http_url(value: &str) -> bool {
    Url::parse(value.trim())
        .map(|url| matches!(url.scheme(), "http" | "https") && url.host_str().is_some())
        .unwrap_or(false)
}

/// Pulls the 11 character video ID out of the usual YouTube link shapes:
/// `watch?v=`, `youtu.be/`, `/embed/`, `/shorts/` and `/live/`.
pub fn extract_youtube_id(value: &str) -> Option<String> {
    let url = Url::parse(value.trim()).ok()?;
    let host = url.host_str()?.trim_start_matches("www.").trim_start_matches("m.");

    let candidate = match host {
        "youtu.be" => url.path_segments()?.next().map(str::to_string),
        "youtube.com" | "youtube-nocookie.com" | "music.youtube.com" => {
            let segments: Vec<&str> = url.path_segments().map(|s| s.collect()).unwrap_or_default();
            match segments.as_slice() {
                ["watch"] => url
                    .query_pairs()
                    .find(|(key, _)| key == "v")
                    .map(|(_, v)| v.into_owned()),
                ["embed", id, ..] | ["shorts", id, ..] | ["live", id, ..] | ["v", id, ..] => Some(id.to_string()),
                _ => None,
            }
        }
        _ => None,
    }?;

    youtube_id_regex().is_match(&candidate).then_some(candidate)
}

pub fn is_youtube_url(value: &str) -> bool {
    extract_youtube_id(value).is_some()
}

pub fn youtube_embed_url(video_id: &str) -> String {
    format!("https://www.youtube.com/embed/{}", video_id)
}

/// Collects human-readable validation failures for one form submission.
#[derive(Debug, Default)]
pub struct Validator {
    errors: Vec<String>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn min_length(&mut self, label: &str, value: &str, min: usize) -> &mut Self {
        if char_length(value) == 0 {
            self.errors.push(format!("{} is required.", label));
        } else if char_length(value) < min {
            self.errors.push(format!("{} must be at least {} characters.", label, min));
        }
        self
    }

    pub fn check(&mut self, ok: bool, message: &str) -> &mut Self {
        if !ok {
            self.errors.push(message.to_string());
        }
        self
    }

    pub fn finish(&mut self) -> Result<(), Vec<String>> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(std::mem::take(&mut self.errors))
        }
    }
}
