//! Markdown article rendering.
//!
//! Turns one markdown file into one self-contained HTML page: extract the
//! title from the first level-1 heading (falling back to the file stem),
//! render the body with GitHub-flavored extensions, and wrap the fragment in
//! a fixed template with inline CSS so the page looks the same wherever it
//! is hosted. Output is deterministic: the same input bytes always produce
//! the same output bytes.

use anyhow::{Context, Result};
use pulldown_cmark::{html, Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use std::path::{Path, PathBuf};

/// Result of a conversion: the extracted title plus where the page landed.
#[derive(Debug, Clone)]
pub struct RenderedArticle {
    pub title: String,
    pub output_path: PathBuf,
}

/// Render `input` and write the page to `output` (default: same path with an
/// `.html` extension), overwriting any existing file.
pub fn convert_file(input: &Path, output: Option<&Path>) -> Result<RenderedArticle> {
    let markdown = std::fs::read_to_string(input)
        .with_context(|| format!("Failed to read markdown file: {}", input.display()))?;

    let title = extract_title(&markdown).unwrap_or_else(|| file_stem(input));
    let body = render_body(&markdown);
    let page = render_page(&title, &body);

    let output_path = match output {
        Some(path) => path.to_path_buf(),
        None => default_output_path(input),
    };

    std::fs::write(&output_path, page)
        .with_context(|| format!("Failed to write HTML file: {}", output_path.display()))?;

    Ok(RenderedArticle { title, output_path })
}

/// Sibling path with the extension swapped for `.html`.
pub fn default_output_path(input: &Path) -> PathBuf {
    input.with_extension("html")
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

fn parser_options() -> Options {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_FOOTNOTES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);
    options
}

/// Text of the first level-1 heading, taken from the parser event stream
/// rather than by matching on raw markup. Returns `None` when the document
/// has no H1.
pub fn extract_title(markdown: &str) -> Option<String> {
    let mut in_h1 = false;
    let mut title = String::new();

    for event in Parser::new_ext(markdown, parser_options()) {
        match event {
            Event::Start(Tag::Heading {
                level: HeadingLevel::H1,
                ..
            }) => in_h1 = true,
            Event::End(TagEnd::Heading(HeadingLevel::H1)) => {
                return Some(title.trim().to_string());
            }
            Event::Text(text) | Event::Code(text) if in_h1 => title.push_str(&text),
            Event::SoftBreak | Event::HardBreak if in_h1 => title.push(' '),
            _ => {}
        }
    }

    None
}

/// Render the markdown body to an HTML fragment.
pub fn render_body(markdown: &str) -> String {
    let parser = Parser::new_ext(markdown, parser_options());
    let mut fragment = String::new();
    html::push_html(&mut fragment, parser);
    fragment
}

/// Wrap an HTML fragment in the fixed page shell. The title lands in
/// `<title>` escaped; the fragment is trusted output from the renderer.
pub fn render_page(title: &str, body: &str) -> String {
    PAGE_TEMPLATE
        .replace("{{title}}", &escape_html(title))
        .replace("{{content}}", body)
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// Self-contained page shell. Inline CSS only, so the file renders the same
/// from a static host, a raw-file URL, or a local open.
const PAGE_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{{title}}</title>
<style>
body {
  font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, "Helvetica Neue", Arial, sans-serif;
  line-height: 1.6;
  color: #1a1a1a;
  max-width: 720px;
  margin: 0 auto;
  padding: 2rem 1rem 4rem;
}
h1, h2, h3, h4 { line-height: 1.25; margin-top: 2rem; }
a { color: #0b5394; }
pre {
  background: #f6f8fa;
  border-radius: 6px;
  padding: 1rem;
  overflow-x: auto;
}
code {
  font-family: "SFMono-Regular", Consolas, "Liberation Mono", Menlo, monospace;
  font-size: 0.9em;
  background: #f6f8fa;
  padding: 0.1em 0.3em;
  border-radius: 3px;
}
pre code { background: none; padding: 0; }
blockquote {
  margin: 0;
  padding-left: 1rem;
  border-left: 4px solid #d0d7de;
  color: #57606a;
}
table { border-collapse: collapse; }
th, td { border: 1px solid #d0d7de; padding: 0.4em 0.8em; }
th { background: #f6f8fa; }
img { max-width: 100%; }
hr { border: none; border-top: 1px solid #d0d7de; margin: 2rem 0; }
</style>
</head>
<body>
<article>
{{content}}</article>
</body>
</html>
"#;
