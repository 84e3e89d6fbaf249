//! Runtime settings shared by the CLI and the HTTP server.
//!
//! Every field can come from a command line flag or a `GITAX_*` environment
//! variable. Log verbosity is not part of this; it follows `RUST_LOG`.

use std::path::PathBuf;

use clap::{Args, ValueEnum};
use serde::{Deserialize, Serialize};

/// How folder sync discovers the files it reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnumerationStrategy {
    /// Walk the tip commit's tree, i.e. exactly what was checked out
    #[default]
    Tree,
    /// Walk the working directory on disk
    Workdir,
}

#[derive(Debug, Clone, Args, Serialize, Deserialize)]
pub struct Settings {
    /// Directory for materialized file versions [default: system temp dir]
    #[arg(long, env = "GITAX_ARTIFACT_DIR", global = true)]
    pub artifact_dir: Option<PathBuf>,

    /// Extension of the files reported by folder sync
    #[arg(long, env = "GITAX_EXTENSION", default_value = "xpo", global = true)]
    pub extension: String,

    /// Where folder sync looks for files after checkout
    #[arg(
        long,
        env = "GITAX_ENUMERATION",
        value_enum,
        default_value_t = EnumerationStrategy::Tree,
        global = true
    )]
    pub enumeration: EnumerationStrategy,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            artifact_dir: None,
            extension: "xpo".to_string(),
            enumeration: EnumerationStrategy::default(),
        }
    }
}

impl Settings {
    pub fn artifact_dir(&self) -> PathBuf {
        self.artifact_dir
            .clone()
            .unwrap_or_else(std::env::temp_dir)
    }

    /// Configured extension without a leading dot.
    pub fn extension(&self) -> &str {
        self.extension.trim_start_matches('.')
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_temp_dir_and_xpo() {
        let settings = Settings::default();
        assert_eq!(settings.artifact_dir(), std::env::temp_dir());
        assert_eq!(settings.extension(), "xpo");
        assert_eq!(settings.enumeration, EnumerationStrategy::Tree);
    }

    #[test]
    fn leading_dot_is_ignored() {
        let settings = Settings {
            extension: ".XPO".to_string(),
            ..Settings::default()
        };
        assert_eq!(settings.extension(), "XPO");
    }
}
