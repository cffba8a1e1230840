//! Extraction of frontmatter and HTML from a model's markdown answer.
//!
//! The parser is tolerant of incomplete input so it can be re-run on every
//! delta while a response is streaming: an unclosed frontmatter block yields
//! no body yet, and an unterminated ```` ```html ```` fence yields the HTML
//! received so far.

use crate::accumulator::StreamObserver;
use openui_core::{UiGenError, UiGenResult};
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::LazyLock;
use tracing::warn;

static CHAPTER: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"---\r?\nprompt:.+\r?\n---").ok());
static BODY: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?is)<body[^>]*>(.*?)(?:</body>|$)").ok());
static DOC_WRAPPER: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"(?is)<!DOCTYPE[^>]*>|<head[^>]*>.*?</head>|</?html[^>]*>").ok()
});
static SCRIPT_SRC: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r#"(?is)<script\b[^>]*?\bsrc\s*=\s*["']([^"']*)["'][^>]*>\s*</script>"#).ok()
});
static COMMENT: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->").ok());

/// The YAML header of a response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Frontmatter {
    /// Short description of the component.
    #[serde(default)]
    pub name: Option<String>,
    /// Single emoji for the component.
    #[serde(default)]
    pub emoji: Option<String>,
    /// Any other keys the model added.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_yaml_ng::Value>,
}

/// Parses the text between the `---` fences.
pub fn parse_frontmatter(yaml: &str) -> UiGenResult<Frontmatter> {
    if yaml.trim().is_empty() {
        return Ok(Frontmatter::default());
    }
    serde_yaml_ng::from_str(yaml).map_err(|e| UiGenError::Markdown(format!("frontmatter: {e}")))
}

/// What could be extracted from a (possibly partial) response.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedMarkdown {
    /// Present once the closing `---` has arrived and the YAML parsed.
    pub frontmatter: Option<Frontmatter>,
    /// Sanitized body HTML, if any markup was found.
    pub html: Option<String>,
}

impl ParsedMarkdown {
    /// Frontmatter `name`.
    pub fn name(&self) -> Option<&str> {
        self.frontmatter.as_ref()?.name.as_deref()
    }

    /// Frontmatter `emoji`.
    pub fn emoji(&self) -> Option<&str> {
        self.frontmatter.as_ref()?.emoji.as_deref()
    }
}

enum Split<'a> {
    None(&'a str),
    Open,
    Closed { yaml: &'a str, body: &'a str },
}

fn split_frontmatter(text: &str) -> Split<'_> {
    let trimmed = text.trim_start();
    let Some(after_open) = trimmed.strip_prefix("---") else {
        return Split::None(text);
    };
    let after_open = match after_open
        .strip_prefix('\n')
        .or_else(|| after_open.strip_prefix("\r\n"))
    {
        Some(rest) => rest,
        None if after_open.trim().is_empty() => return Split::Open,
        None => return Split::None(text),
    };

    let mut offset = 0;
    for line in after_open.split_inclusive('\n') {
        if line.trim_end() == "---" {
            return Split::Closed {
                yaml: &after_open[..offset],
                body: &after_open[offset + line.len()..],
            };
        }
        offset += line.len();
    }
    Split::Open
}

/// Parses a whole markdown transcript.
///
/// Frontmatter is read from the first chapter; HTML from the last one.
/// Chapters are separated by the headers [`new_chapter`] produces.
pub fn parse_markdown(markdown: &str) -> ParsedMarkdown {
    let (first, last) = match CHAPTER.as_ref() {
        Some(re) => {
            let mut parts = re.split(markdown);
            let first = parts.next().unwrap_or(markdown);
            (first, parts.last())
        }
        None => (markdown, None),
    };

    let (frontmatter, first_body) = match split_frontmatter(first) {
        Split::None(body) => (None, Some(body)),
        Split::Open => (None, None),
        Split::Closed { yaml, body } => match parse_frontmatter(yaml) {
            Ok(fm) => (Some(fm), Some(body)),
            Err(e) => {
                warn!(error = %e, "Ignoring malformed frontmatter");
                (None, Some(body))
            }
        },
    };

    let body = last.or(first_body);
    let html = body
        .and_then(extract_html)
        .map(|html| sanitize(&unwrap_document(&html)))
        .filter(|html| !html.is_empty());

    ParsedMarkdown { frontmatter, html }
}

/// Raw markup of the response body: the first ```` ```html ```` block,
/// otherwise the whole body when it starts with a tag.
fn extract_html(body: &str) -> Option<String> {
    if let Some(start) = body.find("```html") {
        let after = &body[start + "```html".len()..];
        let content = after.find('\n').map_or("", |i| &after[i + 1..]);
        let end = content.find("```").unwrap_or(content.len());
        return Some(content[..end].to_string());
    }
    let trimmed = body.trim();
    trimmed.starts_with('<').then(|| trimmed.to_string())
}

/// Reduces a full document to the contents of its `<body>`.
pub fn unwrap_document(html: &str) -> String {
    if let Some(inner) = BODY
        .as_ref()
        .and_then(|re| re.captures(html))
        .and_then(|caps| caps.get(1))
    {
        return inner.as_str().trim().to_string();
    }
    match DOC_WRAPPER.as_ref() {
        Some(re) => re.replace_all(html, "").trim().to_string(),
        None => html.trim().to_string(),
    }
}

/// Removes `<script src=...>` tags that do not load over `https://`.
pub fn sanitize(html: &str) -> String {
    let Some(re) = SCRIPT_SRC.as_ref() else {
        return html.to_string();
    };
    re.replace_all(html, |caps: &Captures<'_>| {
        let src = caps.get(1).map_or("", |m| m.as_str());
        if src.starts_with("https://") {
            caps[0].to_string()
        } else {
            warn!(src, "Removing script with non-https source");
            String::new()
        }
    })
    .trim()
    .to_string()
}

/// Cosmetic fixes applied before display: `gray` palette to `zinc`,
/// placeholder host, and no HTML comments.
pub fn fix_html(html: &str) -> String {
    let fixed = html
        .replace("-gray-", "-zinc-")
        .replace("via.placeholder.com", "placehold.co");
    match COMMENT.as_ref() {
        Some(re) => re.replace_all(&fixed, "").into_owned(),
        None => fixed,
    }
}

/// Separator appended to a transcript before the answer to a follow-up prompt.
pub fn new_chapter(prompt: &str) -> String {
    format!("\n\n---\nprompt: {prompt}\n---\n\n")
}

/// Re-parses the transcript as text deltas arrive.
#[derive(Debug, Default)]
pub struct MarkdownParser {
    markdown: String,
    latest: ParsedMarkdown,
}

impl MarkdownParser {
    /// Parser with an empty transcript.
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from an existing transcript, e.g. when refining.
    pub fn with_transcript(markdown: impl Into<String>) -> Self {
        let markdown = markdown.into();
        let latest = parse_markdown(&markdown);
        Self { markdown, latest }
    }

    /// Appends a delta and returns the refreshed parse.
    pub fn push(&mut self, delta: &str) -> &ParsedMarkdown {
        self.markdown.push_str(delta);
        self.latest = parse_markdown(&self.markdown);
        &self.latest
    }

    /// The transcript so far.
    pub fn markdown(&self) -> &str {
        &self.markdown
    }

    /// Latest parse of the transcript.
    pub fn parsed(&self) -> &ParsedMarkdown {
        &self.latest
    }
}

impl StreamObserver for MarkdownParser {
    fn on_text_delta(&mut self, delta: &str) {
        self.push(delta);
    }
}
