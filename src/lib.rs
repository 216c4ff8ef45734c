//! # quillpost
//!
//! A small publishing pipeline for a personal markdown blog. One command
//! takes an article from a markdown file on disk to a bookmarked entry in a
//! read-later service:
//!
//! ```text
//! article.md ──render──▶ article.html ──git──▶ static host ──POST──▶ reader
//!                                        │          ▲
//!                                        └── poll ──┘
//! ```
//!
//! The pipeline is fully sequential. The only waiting is the bounded deploy
//! poll, and the only state is files on disk plus the git history — both
//! owned by external tooling.
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing and validation |
//! | [`render`] | Markdown to self-contained HTML pages |
//! | [`git`] | Stage, commit, and push via the git CLI |
//! | [`deploy`] | Waiting for the static host after a push |
//! | [`reader`] | Read-later API client |
//! | [`publish`] | The render → push → wait → notify orchestrator |
//! | [`send`] | Direct inline-HTML sender |
//! | [`scaffold`] | New-article and config-file templates |

pub mod config;
pub mod deploy;
pub mod git;
pub mod publish;
pub mod reader;
pub mod render;
pub mod scaffold;
pub mod send;
