//! Pulling the session token out of an `auth.getToken` response body.
//!
//! The body is never parsed as a document; each format has one narrow
//! pattern for the token field.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::types::ResponseFormat;

static JSON_TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#""token":\{"\$t":"(.*?)"\}"#).expect("JSON token regex must be valid")
});

static XML_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<token>(.*?)</token>").expect("XML token regex must be valid"));

/// Finds a token in a raw response body.
pub trait TokenExtractor {
    /// The first token in `body`, or `None` if the field is missing.
    /// An empty field yields `Some("")`.
    fn extract_token(&self, body: &str) -> Option<String>;
}

/// Matches `"token":{"$t":"..."}`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonTokenExtractor;

impl TokenExtractor for JsonTokenExtractor {
    fn extract_token(&self, body: &str) -> Option<String> {
        capture(&JSON_TOKEN, body)
    }
}

/// Matches `<token>...</token>`.
#[derive(Debug, Clone, Copy, Default)]
pub struct XmlTokenExtractor;

impl TokenExtractor for XmlTokenExtractor {
    fn extract_token(&self, body: &str) -> Option<String> {
        capture(&XML_TOKEN, body)
    }
}

fn capture(pattern: &Regex, body: &str) -> Option<String> {
    pattern
        .captures(body)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

impl ResponseFormat {
    /// The extractor matching bodies of this format.
    pub fn token_extractor(self) -> &'static dyn TokenExtractor {
        match self {
            ResponseFormat::Json => &JsonTokenExtractor,
            ResponseFormat::Xml => &XmlTokenExtractor,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_token_found() {
        let body = r#"{"petfinder":{"header":{"status":{"code":{"$t":"100"}}},"auth":{"token":{"$t":"abc123"},"expires":{"$t":"1300000000"}}}}"#;
        assert_eq!(JsonTokenExtractor.extract_token(body).as_deref(), Some("abc123"));
    }

    #[test]
    fn json_token_missing() {
        let body = r#"{"petfinder":{"header":{"status":{"code":{"$t":"300"}}}}}"#;
        assert_eq!(JsonTokenExtractor.extract_token(body), None);
    }

    #[test]
    fn json_token_with_whitespace_is_not_matched() {
        let body = r#"{"token": {"$t": "abc123"}}"#;
        assert_eq!(JsonTokenExtractor.extract_token(body), None);
    }

    #[test]
    fn xml_token_found() {
        let body = "<?xml version=\"1.0\"?><petfinder><auth><token>tok-9</token><expires>1</expires></auth></petfinder>";
        assert_eq!(XmlTokenExtractor.extract_token(body).as_deref(), Some("tok-9"));
    }

    #[test]
    fn xml_token_takes_first_match() {
        let body = "<token>first</token><token>second</token>";
        assert_eq!(XmlTokenExtractor.extract_token(body).as_deref(), Some("first"));
    }

    #[test]
    fn xml_empty_token_is_some_empty() {
        assert_eq!(XmlTokenExtractor.extract_token("<token></token>").as_deref(), Some(""));
    }

    #[test]
    fn xml_extractor_ignores_json_bodies() {
        let body = r#"{"token":{"$t":"abc123"}}"#;
        assert_eq!(XmlTokenExtractor.extract_token(body), None);
    }

    #[test]
    fn format_selects_matching_extractor() {
        let json = r#"{"token":{"$t":"j"}}"#;
        let xml = "<token>x</token>";
        assert_eq!(ResponseFormat::Json.token_extractor().extract_token(json).as_deref(), Some("j"));
        assert_eq!(ResponseFormat::Json.token_extractor().extract_token(xml), None);
        assert_eq!(ResponseFormat::Xml.token_extractor().extract_token(xml).as_deref(), Some("x"));
    }
}
