//! The Content Fetcher external collaborator (spec §6): grounds the
//! Researcher (C3) in a supplied `source` instead of inventing facts, by
//! reading a local file or performing a GET against an `http(s)://` URL.
//! Deliberately thin per spec §1 ("not where the engineering challenge
//! lives"): no auth, no paywall handling, no JS rendering.

pub mod error;

use async_trait::async_trait;
use podforge_core::traits::ContentFetcher;
use podforge_core::Result;

pub use error::FetchError;

/// Reads `source` from the local filesystem when it isn't an `http(s)://`
/// URL, otherwise performs a plain GET. Returns `(title, body)`.
pub struct LocalOrHttpFetcher {
    client: reqwest::Client,
}

impl Default for LocalOrHttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl LocalOrHttpFetcher {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(std::time::Duration::from_secs(20))
                .build()
                .expect("reqwest client builds with a fixed, valid config"),
        }
    }

    async fn fetch_local(&self, path: &str) -> Result<(String, String)> {
        let body = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| FetchError::Io {
                path: path.to_string(),
                source,
            })?;
        let title = title_from_markdown(&body).unwrap_or_else(|| {
            std::path::Path::new(path)
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("Untitled source")
                .to_string()
        });
        Ok((title, body))
    }

    async fn fetch_http(&self, url: &str) -> Result<(String, String)> {
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;
        if !resp.status().is_success() {
            return Err(FetchError::Network(format!("{}: {}", url, resp.status())).into());
        }
        let is_html = resp
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.contains("html"));
        let raw = resp.text().await.map_err(|e| FetchError::Network(e.to_string()))?;
        if is_html {
            let title = extract_html_title(&raw).unwrap_or_else(|| url.to_string());
            Ok((title, strip_html_tags(&raw)))
        } else {
            let title = title_from_markdown(&raw).unwrap_or_else(|| url.to_string());
            Ok((title, raw))
        }
    }
}

#[async_trait]
impl ContentFetcher for LocalOrHttpFetcher {
    async fn fetch(&self, source: &str) -> Result<(String, String)> {
        if source.starts_with("http://") || source.starts_with("https://") {
            self.fetch_http(source).await
        } else if std::path::Path::new(source).exists() {
            self.fetch_local(source).await
        } else {
            Err(FetchError::NotFound(source.to_string()).into())
        }
    }
}

/// Word count of a fetched body, used by the Researcher (C3) to decide
/// whether the fetched source is substantial enough to ground on (spec §4.3:
/// "at least 50 words").
pub fn word_count(body: &str) -> usize {
    body.split_whitespace().count()
}

fn title_from_markdown(body: &str) -> Option<String> {
    body.lines()
        .find(|line| line.trim_start().starts_with('#'))
        .map(|line| line.trim_start_matches('#').trim().to_string())
        .filter(|t| !t.is_empty())
}

fn extract_html_title(html: &str) -> Option<String> {
    let lower = html.to_ascii_lowercase();
    let start = lower.find("<title>")? + "<title>".len();
    let end = lower[start..].find("</title>")? + start;
    Some(html[start..end].trim().to_string())
}

/// Naive tag stripper: good enough to turn a simple article page into
/// readable body text without pulling in a full HTML parser for a
/// deliberately thin collaborator (spec §1).
fn strip_html_tags(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut in_tag = false;
    let mut in_script = false;
    let lower = html.to_ascii_lowercase();
    let mut chars = html.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        if !in_tag && lower[i..].starts_with("<script") {
            in_script = true;
        }
        if in_script && lower[i..].starts_with("</script>") {
            in_script = false;
        }
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag && !in_script => out.push(c),
            _ => {}
        }
    }
    out.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::AsyncWriteExt;

    #[tokio::test]
    async fn fetch_local_reads_file_and_derives_title_from_heading() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.md");
        let mut file = tokio::fs::File::create(&path).await.unwrap();
        file.write_all(b"# The Wheel\n\nBody text about wheels.")
            .await
            .unwrap();

        let fetcher = LocalOrHttpFetcher::new();
        let (title, body) = fetcher.fetch(path.to_str().unwrap()).await.unwrap();
        assert_eq!(title, "The Wheel");
        assert!(body.contains("Body text about wheels."));
    }

    #[tokio::test]
    async fn fetch_local_falls_back_to_filename_without_heading() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bicycles.txt");
        tokio::fs::write(&path, "Just plain text, no heading.").await.unwrap();

        let fetcher = LocalOrHttpFetcher::new();
        let (title, _) = fetcher.fetch(path.to_str().unwrap()).await.unwrap();
        assert_eq!(title, "bicycles");
    }

    #[tokio::test]
    async fn missing_source_is_not_found() {
        let fetcher = LocalOrHttpFetcher::new();
        let err = fetcher.fetch("/no/such/file.md").await.unwrap_err();
        assert_eq!(err.kind, podforge_core::ErrorKind::Internal);
    }

    #[test]
    fn strip_html_tags_drops_markup_and_scripts() {
        let html = "<html><head><script>evil()</script></head><body><p>Hello <b>world</b></p></body></html>";
        assert_eq!(strip_html_tags(html), "Hello world");
    }

    #[test]
    fn extract_html_title_reads_title_tag() {
        let html = "<html><head><title>My Article</title></head></html>";
        assert_eq!(extract_html_title(html), Some("My Article".to_string()));
    }

    #[test]
    fn word_count_counts_whitespace_separated_tokens() {
        assert_eq!(word_count("one two three"), 3);
    }
}
