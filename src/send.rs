//! The direct HTML sender.
//!
//! Alternate entry point for pages that are small enough to ship inline:
//! instead of waiting for the static host, the file's markup goes straight
//! into the save payload with a raw VCS URL standing in as the document's
//! address. Independent of the publish pipeline by design; the two paths
//! have never shared defaults.

use crate::config::Config;
use crate::reader;
use anyhow::{bail, Context, Result};
use quick_xml::events::Event as XmlEvent;
use quick_xml::Reader;
use std::path::Path;

/// Read `file` and POST its markup inline to the reader API.
pub async fn run_send(
    config: &Config,
    file: &Path,
    title: Option<&str>,
    tags: Option<&str>,
    notes: Option<&str>,
) -> Result<()> {
    if !file.exists() {
        bail!("HTML file not found: {}", file.display());
    }
    let token = reader::resolve_token(&config.reader)?;

    if config.site.raw_base_url.is_empty() {
        bail!("site.raw_base_url must be set in the config file to send");
    }

    let html = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read HTML file: {}", file.display()))?;

    let title = match title {
        Some(t) => t.to_string(),
        None => extract_html_title(&html).unwrap_or_else(|| file_stem(file)),
    };

    let url = raw_file_url(&config.site.raw_base_url, file);
    let tags = reader::parse_tags(tags, &config.reader.default_tags);

    println!("send {}", file.display());
    println!("  title: {}", title);

    let request = reader::SaveRequest {
        url,
        title: Some(title),
        location: config.reader.location.clone(),
        tags,
        notes: notes.map(|n| n.to_string()),
        html: Some(html),
        should_clean_html: Some(true),
    };

    let client = reader::client(&config.reader)?;
    let saved = reader::save(&client, &config.reader, &token, &request).await?;
    match saved.url {
        Some(url) => println!("  bookmarked: {}", url),
        None => println!("  bookmarked"),
    }
    println!("ok");

    Ok(())
}

/// Raw VCS address for the file: raw base plus the basename.
pub fn raw_file_url(raw_base_url: &str, file: &Path) -> String {
    let basename = file
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    format!("{}/{}", raw_base_url.trim_end_matches('/'), basename)
}

/// Text of the document's `<title>` element, scanned with a lenient markup
/// reader rather than a regex. Malformed or title-less documents yield
/// `None`; the caller falls back to the filename.
pub fn extract_html_title(html: &str) -> Option<String> {
    let mut xml = Reader::from_str(html);
    xml.config_mut().check_end_names = false;

    let mut in_title = false;
    let mut title = String::new();

    loop {
        match xml.read_event() {
            Ok(XmlEvent::Start(e)) if e.name().as_ref().eq_ignore_ascii_case(b"title") => {
                in_title = true;
            }
            Ok(XmlEvent::End(e)) if e.name().as_ref().eq_ignore_ascii_case(b"title") => break,
            Ok(XmlEvent::Text(text)) if in_title => {
                if let Ok(text) = text.unescape() {
                    title.push_str(&text);
                }
            }
            Ok(XmlEvent::Eof) => break,
            // Tag soup the reader cannot make sense of; give up on the scan.
            Err(_) => break,
            _ => {}
        }
    }

    let title = title.trim().to_string();
    if title.is_empty() {
        None
    } else {
        Some(title)
    }
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}
