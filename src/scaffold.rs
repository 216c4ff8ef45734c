//! Scaffolding for new articles and for the config file.

use crate::config::DEFAULT_CONFIG_TOML;
use anyhow::{bail, Result};
use std::path::{Path, PathBuf};

/// Create a date-stamped article skeleton: `<dir>/YYYY-MM-DD-<slug>.md`
/// containing a level-1 heading. Refuses to overwrite an existing file.
pub fn new_article(slug: &str, title: Option<&str>, dir: &Path) -> Result<PathBuf> {
    if slug.is_empty() || slug.contains(['/', '\\']) {
        bail!("Invalid slug: '{}'", slug);
    }

    std::fs::create_dir_all(dir)?;

    let date = chrono::Local::now().format("%Y-%m-%d");
    let filename = format!("{}-{}.md", date, slug);
    let path = dir.join(&filename);

    if path.exists() {
        bail!("Article already exists: {}", path.display());
    }

    let title = match title {
        Some(t) => t.to_string(),
        None => unslug(slug),
    };

    std::fs::write(&path, format!("# {}\n\n", title))?;
    println!("Created {}", path.display());

    Ok(path)
}

/// Write the commented default `quill.toml`. Refuses to overwrite.
pub fn init_config(path: &Path) -> Result<()> {
    if path.exists() {
        bail!("Config file already exists: {}", path.display());
    }

    std::fs::write(path, DEFAULT_CONFIG_TOML)?;
    println!("Created {}", path.display());
    println!("Edit [site] to point at your repository and static host.");

    Ok(())
}

/// `why-rust-is-nice` -> `Why rust is nice`.
fn unslug(slug: &str) -> String {
    let words = slug.replace(['-', '_'], " ");
    let mut chars = words.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => words,
    }
}
