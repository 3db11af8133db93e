//! Theme configuration file.
//!
//! `<config_dir>/keyprompt/theme.toml` may override any render role:
//!
//! ```toml
//! [marker]
//! color = "yellow"
//! bold = true
//!
//! [error]
//! color = "red"
//! underline = true
//! ```
//!
//! Roles left out keep their default style.

use crate::error::{PromptError, Result};
use crate::render::{Color, Style, Theme};
use log::debug;
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ThemeFile {
    marker: Option<StyleEntry>,
    success: Option<StyleEntry>,
    error: Option<StyleEntry>,
    message: Option<StyleEntry>,
    hint: Option<StyleEntry>,
    value: Option<StyleEntry>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct StyleEntry {
    color: Option<String>,
    bold: bool,
    underline: bool,
}

impl StyleEntry {
    fn resolve(&self) -> Result<Style> {
        let color = match &self.color {
            Some(name) => Some(
                Color::from_name(name)
                    .ok_or_else(|| PromptError::config(format!("unknown color '{name}'")))?,
            ),
            None => None,
        };
        Ok(Style {
            color,
            bold: self.bold,
            underline: self.underline,
        })
    }
}

fn override_style(slot: &mut Style, entry: Option<&StyleEntry>) -> Result<()> {
    if let Some(entry) = entry {
        *slot = entry.resolve()?;
    }
    Ok(())
}

/// Default location of the theme file, if the platform has a config directory.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("keyprompt").join("theme.toml"))
}

impl Theme {
    /// Parse a theme from TOML, starting from [`Theme::default`].
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let file: ThemeFile = toml::from_str(source)
            .map_err(|err| PromptError::config(format!("invalid theme file: {err}")))?;

        let mut theme = Theme::default();
        override_style(&mut theme.marker, file.marker.as_ref())?;
        override_style(&mut theme.success, file.success.as_ref())?;
        override_style(&mut theme.error, file.error.as_ref())?;
        override_style(&mut theme.message, file.message.as_ref())?;
        override_style(&mut theme.hint, file.hint.as_ref())?;
        override_style(&mut theme.value, file.value.as_ref())?;
        Ok(theme)
    }

    /// Read a theme file; a missing file yields the default theme.
    pub fn load_from(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(source) => {
                debug!("loading theme from {}", path.display());
                Self::from_toml_str(&source)
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Theme::default()),
            Err(err) => Err(PromptError::config(format!(
                "cannot read {}: {err}",
                path.display()
            ))),
        }
    }

    /// Load the user's theme from [`config_path`], falling back to the default.
    pub fn load() -> Result<Self> {
        match config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Theme::default()),
        }
    }
}
