//! Fetching posts to classify.
//!
//! Sources return the JSON shape the scraper exposes:
//! `{"tweets": [{"text": "..."}, ...]}`. Anything going wrong here is reported
//! to the user as "no results" and never reaches the classifier.

use std::{fs, path::PathBuf};

use anyhow::{Context, Result, anyhow, bail};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Posts fetched per user unless overridden.
pub const DEFAULT_POST_COUNT: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PostsResponse {
    #[serde(default)]
    tweets: Option<Vec<Post>>,
}

pub trait PostSource {
    /// Up to `count` of the user's most recent posts.
    fn fetch(&self, username: &str, count: usize) -> Result<Vec<Post>>;
}

/// Strip a leading `@` and reject empty or path-like usernames.
fn clean_username(username: &str) -> Result<&str> {
    let username = username.trim().trim_start_matches('@');
    if username.is_empty() {
        bail!("username is empty");
    }
    if username.contains(['/', '?', '#']) || username.contains(char::is_whitespace) {
        bail!("username '{username}' contains invalid characters");
    }
    Ok(username)
}

fn parse_posts(body: &str, count: usize) -> Result<Vec<Post>> {
    let response: PostsResponse =
        serde_json::from_str(body).context("Failed to parse posts response")?;
    let mut posts = response
        .tweets
        .ok_or_else(|| anyhow!("response has no 'tweets' field"))?;
    posts.truncate(count);
    Ok(posts)
}

/// Fetches posts over HTTP from `{base_url}/{username}?count={count}`.
#[derive(Debug, Clone)]
pub struct HttpPostSource {
    base_url: String,
}

impl HttpPostSource {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    fn url(&self, username: &str) -> String {
        format!("{}/{username}", self.base_url.trim_end_matches('/'))
    }
}

impl PostSource for HttpPostSource {
    fn fetch(&self, username: &str, count: usize) -> Result<Vec<Post>> {
        let url = self.url(clean_username(username)?);
        debug!(%url, count, "Fetching posts");

        let body = ureq::get(&url)
            .query("count", count.to_string())
            .call()
            .with_context(|| format!("Failed to fetch posts from {url}"))?
            .into_body()
            .read_to_string()
            .with_context(|| format!("Failed to read posts response from {url}"))?;
        parse_posts(&body, count)
    }
}

/// Reads posts from a local JSON file, ignoring the username.
#[derive(Debug, Clone)]
pub struct JsonFilePostSource {
    path: PathBuf,
}

impl JsonFilePostSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl PostSource for JsonFilePostSource {
    fn fetch(&self, username: &str, count: usize) -> Result<Vec<Post>> {
        clean_username(username)?;
        let body = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read posts file: {}", self.path.display()))?;
        parse_posts(&body, count)
    }
}

/// Fetch posts, turning any failure into an empty result.
pub fn fetch_or_empty(source: &dyn PostSource, username: &str, count: usize) -> Vec<Post> {
    match source.fetch(username, count) {
        Ok(posts) => {
            debug!(num_posts = posts.len(), username, "Fetched posts");
            posts
        }
        Err(err) => {
            warn!(username, error = %format!("{err:#}"), "Fetching posts failed");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    struct FailingSource;

    impl PostSource for FailingSource {
        fn fetch(&self, _username: &str, _count: usize) -> Result<Vec<Post>> {
            bail!("scraper offline")
        }
    }

    fn posts_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_parse_posts_truncates() {
        let body = r#"{"tweets": [{"text": "one"}, {"text": "two", "link": "x"}, {"text": "three"}]}"#;
        let posts = parse_posts(body, 2).unwrap();
        assert_eq!(posts.len(), 2);
        assert_eq!(posts[0].text, "one");
        assert_eq!(posts[1].link.as_deref(), Some("x"));
    }

    #[test]
    fn test_parse_posts_without_tweets_field() {
        assert!(parse_posts(r#"{"error": "not found"}"#, 5).is_err());
        assert!(parse_posts("not json", 5).is_err());
        assert!(parse_posts(r#"{"tweets": []}"#, 5).unwrap().is_empty());
    }

    #[test]
    fn test_clean_username() {
        assert_eq!(clean_username("@someone").unwrap(), "someone");
        assert_eq!(clean_username("  someone ").unwrap(), "someone");
        assert!(clean_username("@").is_err());
        assert!(clean_username("a/b").is_err());
        assert!(clean_username("a b").is_err());
    }

    #[test]
    fn test_http_url() {
        let source = HttpPostSource::new("http://localhost:8080/tweets/");
        assert_eq!(source.url("someone"), "http://localhost:8080/tweets/someone");
    }

    #[test]
    fn test_json_file_source() {
        let file = posts_file(r#"{"tweets": [{"text": "not bad"}, {"text": "never again"}]}"#);
        let source = JsonFilePostSource::new(file.path());
        let posts = source.fetch("someone", DEFAULT_POST_COUNT).unwrap();
        assert_eq!(posts.len(), 2);
        assert_eq!(posts[1].text, "never again");
    }

    #[test]
    fn test_fetch_or_empty_swallows_failures() {
        assert!(fetch_or_empty(&FailingSource, "someone", 5).is_empty());

        let missing = JsonFilePostSource::new("/no/such/posts.json");
        assert!(fetch_or_empty(&missing, "someone", 5).is_empty());

        let no_tweets = posts_file(r#"{"error": "rate limited"}"#);
        let source = JsonFilePostSource::new(no_tweets.path());
        assert!(fetch_or_empty(&source, "someone", 5).is_empty());
    }

    #[test]
    #[ignore = "needs nothing listening on 127.0.0.1:9"]
    fn test_http_source_unreachable() {
        let source = HttpPostSource::new("http://127.0.0.1:9");
        assert!(fetch_or_empty(&source, "someone", 5).is_empty());
    }
}
