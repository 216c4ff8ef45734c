//! The publish orchestrator: render, commit, push, wait, notify.
//!
//! Steps run strictly in order with no cancellation path. The push is
//! irreversible; a later notification failure leaves the page live with no
//! bookmark, and the remedy is to re-send, not to revert. That best-effort
//! ordering is deliberate (see DESIGN.md): the notification body needs the
//! public URL, which only exists once the host has the files.

use crate::config::Config;
use crate::{deploy, git, reader, render};
use anyhow::{bail, Result};
use std::path::Path;

/// Render `file`, commit and push the pair, wait for deploy, and bookmark
/// the public URL. Preconditions (file exists, token present) are checked
/// before any side effect.
pub async fn run_publish(
    config: &Config,
    file: &Path,
    title: &str,
    tags: Option<&str>,
    notes: Option<&str>,
    dry_run: bool,
) -> Result<()> {
    if !file.exists() {
        bail!("Markdown file not found: {}", file.display());
    }
    if config.site.base_url.is_empty() {
        bail!("site.base_url must be set in the config file to publish");
    }

    // Fail fast on a missing credential, before the commit becomes public.
    let token = if dry_run {
        String::new()
    } else {
        reader::resolve_token(&config.reader)?
    };

    let tags = reader::parse_tags(tags, &config.reader.default_tags);

    println!("publish {}", file.display());

    let article = render::convert_file(file, None)?;
    println!("  rendered: {}", article.output_path.display());

    let public_url = compute_public_url(&config.site.base_url, &article.output_path);
    let message = format!("Publish: {}", title);

    if dry_run {
        println!("  would commit: {}", message);
        println!(
            "  would push: {} {}",
            config.site.remote, config.site.branch
        );
        println!("  would bookmark: {}", public_url);
        println!("  tags: {}", tags.join(", "));
        println!("ok (dry-run)");
        return Ok(());
    }

    let dir = working_dir(file);
    git::add(dir, &[file, article.output_path.as_path()])?;
    git::commit(dir, &message)?;
    git::push(dir, &config.site.remote, &config.site.branch)?;
    println!(
        "  pushed to {} {}: {}",
        config.site.remote, config.site.branch, message
    );

    let deploy_client = deploy::client()?;

    if deploy::wait_for_deploy(&deploy_client, &public_url, &config.deploy).await? {
        println!("  deployed: {}", public_url);
    } else {
        // Soft failure: the host may just be slow. The bookmark still goes
        // out; the reader service will fetch the page once it is up.
        eprintln!(
            "warning: {} did not return 200 after {} attempts; continuing",
            public_url, config.deploy.attempts
        );
    }

    let request = reader::SaveRequest {
        url: public_url,
        title: Some(title.to_string()),
        location: config.reader.location.clone(),
        tags,
        notes: notes.map(|n| n.to_string()),
        html: None,
        should_clean_html: None,
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

/// Public URL for a rendered page: hosting base plus the HTML basename.
pub fn compute_public_url(base_url: &str, html_path: &Path) -> String {
    let basename = html_path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    format!("{}/{}", base_url.trim_end_matches('/'), basename)
}

fn working_dir(file: &Path) -> &Path {
    match file.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}
