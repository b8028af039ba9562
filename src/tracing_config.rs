//! Tracing subscriber setup for debugging the analysis.
//!
//! Output format is chosen by `GOJS_LOG_FORMAT`:
//!
//! - `text` (default): flat `tracing-subscriber` lines
//! - `tree`: indented span hierarchy via `tracing-tree`
//! - `json`: one JSON object per event
//!
//! ```bash
//! # Which declarations were indexed, nested under each package
//! GOJS_LOG=gojs_index=trace GOJS_LOG_FORMAT=tree gojs-build ./cmd/app
//!
//! # Reachability summary only
//! GOJS_LOG="gojs_index::reachability=debug" gojs-build ./cmd/app
//! ```
//!
//! Nothing is installed unless `GOJS_LOG` or `RUST_LOG` is set.

use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Registry, fmt};

pub const LOG_ENV: &str = "GOJS_LOG";
pub const LOG_FORMAT_ENV: &str = "GOJS_LOG_FORMAT";

/// Tracing output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Tree,
    Json,
}

impl LogFormat {
    /// Case-insensitive; anything unrecognised is `Text`.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "tree" => Self::Tree,
            "json" => Self::Json,
            _ => Self::Text,
        }
    }

    fn from_env() -> Self {
        std::env::var(LOG_FORMAT_ENV)
            .map(|value| Self::parse(&value))
            .unwrap_or_default()
    }
}

/// Filter directives to install, `GOJS_LOG` taking precedence over
/// `RUST_LOG`. `None` means tracing stays off.
pub fn filter_directives(gojs_log: Option<String>, rust_log: Option<String>) -> Option<String> {
    gojs_log.or(rust_log)
}

/// Install the global subscriber, writing to stderr.
///
/// Returns `false` when neither variable is set or a global subscriber was
/// already installed.
pub fn init_tracing() -> bool {
    let Some(directives) =
        filter_directives(std::env::var(LOG_ENV).ok(), std::env::var("RUST_LOG").ok())
    else {
        return false;
    };
    let filter = EnvFilter::builder().parse_lossy(directives);

    let installed = match LogFormat::from_env() {
        LogFormat::Tree => {
            let tree_layer = tracing_tree::HierarchicalLayer::default()
                .with_indent_amount(2)
                .with_indent_lines(true)
                .with_deferred_spans(true)
                .with_span_retrace(true)
                .with_targets(true);
            Registry::default().with(filter).with(tree_layer).try_init()
        }
        LogFormat::Json => {
            let json_layer = fmt::layer().json().with_writer(std::io::stderr);
            Registry::default().with(filter).with(json_layer).try_init()
        }
        LogFormat::Text => {
            let text_layer = fmt::layer().with_writer(std::io::stderr);
            Registry::default().with(filter).with(text_layer).try_init()
        }
    };
    installed.is_ok()
}
