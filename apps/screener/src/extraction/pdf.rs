use async_trait::async_trait;
use bytes::Bytes;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, warn};

static URL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"https?://[^\s<>'"\)\]]+"#).expect("URL pattern is valid")
});

/// Produces best-effort plain text from raw document bytes.
/// Implementations never fail: any internal error yields an empty string.
#[async_trait]
pub trait TextSource: Send + Sync {
    async fn extract_text(&self, document: &Bytes) -> String;
}

/// `pdf-extract` backed text source.
///
/// Link annotations are not part of a PDF's text layer, so hyperlink targets
/// found in the raw bytes are appended after the page text.
pub struct PdfTextSource;

#[async_trait]
impl TextSource for PdfTextSource {
    async fn extract_text(&self, document: &Bytes) -> String {
        let data = document.clone();
        // pdf-extract is CPU-bound and can panic on malformed input; a panic
        // surfaces here as a JoinError.
        let outcome = tokio::task::spawn_blocking(move || extract_with_links(&data)).await;

        match outcome {
            Ok(Ok(text)) => text,
            Ok(Err(e)) => {
                warn!("Error extracting text from PDF: {e}");
                String::new()
            }
            Err(e) => {
                warn!("PDF extraction aborted: {e}");
                String::new()
            }
        }
    }
}

fn extract_with_links(data: &[u8]) -> anyhow::Result<String> {
    let mut text = pdf_extract::extract_text_from_mem(data)?;
    if text.trim().is_empty() {
        // Image-only PDFs still carry link annotations, but without a text
        // layer there is nothing to screen.
        return Ok(String::new());
    }

    let links = extract_hyperlinks(data);
    debug!("Extracted {} chars and {} links from PDF", text.len(), links.len());
    if !links.is_empty() {
        text.push('\n');
        text.push_str(&links.join("\n"));
    }
    Ok(text)
}

/// Unique (case-insensitive) http(s) URLs appearing in the raw bytes, in order.
fn extract_hyperlinks(data: &[u8]) -> Vec<String> {
    let raw = String::from_utf8_lossy(data);
    let mut links: Vec<String> = Vec::new();
    for m in URL_RE.find_iter(&raw) {
        let value = m.as_str().to_string();
        if !links
            .iter()
            .any(|existing: &String| existing.eq_ignore_ascii_case(&value))
        {
            links.push(value);
        }
    }

    links
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_hyperlinks_dedups_case_insensitively() {
        let raw = b"<< /URI (https://github.com/janedoe) >> << /URI (https://GitHub.com/janedoe) >> https://example.com/x";
        let links = extract_hyperlinks(raw);
        assert_eq!(
            links,
            vec![
                "https://github.com/janedoe".to_string(),
                "https://example.com/x".to_string()
            ]
        );
    }

    #[test]
    fn test_extract_hyperlinks_none() {
        assert!(extract_hyperlinks(b"no links in here").is_empty());
    }

    #[tokio::test]
    async fn test_garbage_bytes_yield_empty_text() {
        let text = PdfTextSource
            .extract_text(&Bytes::from_static(b"definitely not a pdf"))
            .await;
        assert_eq!(text, "");
    }

    #[tokio::test]
    async fn test_empty_document_yields_empty_text() {
        let text = PdfTextSource.extract_text(&Bytes::new()).await;
        assert_eq!(text, "");
    }
}
