//! Selection toggles.
//!
//! There are no configuration files: the binary fills [`Options`] from its flags and
//! the environment (`IFS` for the description separators, `PICK_LOG` for the log path),
//! then calls [`Options::normalize`] to resolve interactions between toggles.

use std::ffi::OsString;
use std::path::PathBuf;

use core_text::MatchMode;
use tracing::info;

/// Separator set used when `IFS` is unset.
pub const DEFAULT_FIELD_SEPARATORS: &str = " ";
pub const LOG_PATH_ENV: &str = "PICK_LOG";
pub const FIELD_SEPARATORS_ENV: &str = "IFS";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    /// Split a description off each input line.
    pub descriptions: bool,
    /// Print the description after the committed text. Needs `descriptions`.
    pub output_description: bool,
    /// Rank matches by score. When off, matches keep input order.
    pub sort: bool,
    pub initial_query: String,
    pub alternate_screen: bool,
    pub match_mode: MatchMode,
    pub field_separators: String,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            descriptions: false,
            output_description: false,
            sort: true,
            initial_query: String::new(),
            alternate_screen: true,
            match_mode: MatchMode::Standard,
            field_separators: DEFAULT_FIELD_SEPARATORS.to_owned(),
        }
    }
}

impl Options {
    /// Take the separator set from an `IFS` value. A set but empty value disables
    /// splitting; an unset one keeps the default.
    pub fn with_separators_from(mut self, ifs: Option<OsString>) -> Self {
        if let Some(value) = ifs {
            self.field_separators = value.to_string_lossy().into_owned();
        }
        self
    }

    /// Resolve dependent toggles and log the result.
    pub fn normalize(mut self) -> Self {
        if self.output_description && !self.descriptions {
            info!(target: "config", "output_description_requires_descriptions");
            self.output_description = false;
        }
        info!(
            target: "config",
            descriptions = self.descriptions,
            output_description = self.output_description,
            sort = self.sort,
            alternate_screen = self.alternate_screen,
            match_mode = self.match_mode.as_str(),
            initial_query_len = self.initial_query.chars().count(),
            separators = self.field_separators.chars().count(),
            "options_resolved"
        );
        self
    }
}

/// Log file path: an explicit flag wins over the environment.
pub fn log_path(flag: Option<PathBuf>, env: Option<OsString>) -> Option<PathBuf> {
    flag.or_else(|| env.filter(|v| !v.is_empty()).map(PathBuf::from))
}
