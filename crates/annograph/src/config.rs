//! Configuration types for Annograph rendering.
//!
//! This module provides configuration structures that control lemmatization,
//! node styling, term merging and output. All types implement
//! [`serde::Deserialize`] for loading from external sources.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining all sections.
//! - [`LemmatizerConfig`] - Which morphological analyzer computes lemma keys.
//! - [`StyleConfig`] - Node fill colors and the graph size hint.
//! - [`MappingConfig`] - How conflicting entity labels are merged.
//! - [`OutputConfig`] - Image format, input file pattern and failure handling.
//!
//! # Example
//!
//! ```
//! # use annograph::config::{AppConfig, OutputFormat};
//! let config = AppConfig::default();
//! assert_eq!(config.output().format(), OutputFormat::Png);
//! assert_eq!(config.output().pattern(), "*.json");
//! ```

use std::fmt;

use serde::Deserialize;

use annograph_core::{color::Color, term::MergePolicy};

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Lemmatizer configuration section.
    #[serde(default)]
    lemmatizer: LemmatizerConfig,

    /// Style configuration section.
    #[serde(default)]
    style: StyleConfig,

    /// Term mapping configuration section.
    #[serde(default)]
    mapping: MappingConfig,

    /// Output configuration section.
    #[serde(default)]
    output: OutputConfig,
}

impl AppConfig {
    pub fn lemmatizer(&self) -> &LemmatizerConfig {
        &self.lemmatizer
    }

    pub fn lemmatizer_mut(&mut self) -> &mut LemmatizerConfig {
        &mut self.lemmatizer
    }

    pub fn style(&self) -> &StyleConfig {
        &self.style
    }

    pub fn mapping(&self) -> &MappingConfig {
        &self.mapping
    }

    pub fn output(&self) -> &OutputConfig {
        &self.output
    }

    pub fn output_mut(&mut self) -> &mut OutputConfig {
        &mut self.output
    }
}

/// Morphological analyzer used to compute lemma keys.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LemmatizerEngine {
    /// Yandex `mystem`, run as a long-lived child process.
    #[default]
    Mystem,
    /// Lowercase and split on whitespace; no analyzer required.
    Plain,
}

/// Lemmatizer configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LemmatizerConfig {
    engine: LemmatizerEngine,

    /// Program name or path of the `mystem` binary.
    mystem_path: String,
}

impl Default for LemmatizerConfig {
    fn default() -> Self {
        Self {
            engine: LemmatizerEngine::default(),
            mystem_path: "mystem".to_string(),
        }
    }
}

impl LemmatizerConfig {
    pub fn engine(&self) -> LemmatizerEngine {
        self.engine
    }

    pub fn set_engine(&mut self, engine: LemmatizerEngine) {
        self.engine = engine;
    }

    pub fn mystem_path(&self) -> &str {
        &self.mystem_path
    }
}

/// Visual styling configuration.
///
/// Colors are CSS color strings; unset fields fall back to the built-in
/// palette.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StyleConfig {
    #[serde(default)]
    system_color: Option<String>,

    #[serde(default)]
    component_color: Option<String>,

    #[serde(default)]
    attribute_color: Option<String>,

    /// Graphviz `size` hint for the whole drawing.
    #[serde(default)]
    size: Option<String>,
}

impl StyleConfig {
    /// Fill [`Color`] of `SYSTEM` nodes.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured color string cannot be parsed.
    pub fn system_color(&self) -> Result<Color, String> {
        parse_color(self.system_color.as_deref(), default_system_color(), "system_color")
    }

    /// Fill [`Color`] of `COMPONENT` nodes and the default node fill.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured color string cannot be parsed.
    pub fn component_color(&self) -> Result<Color, String> {
        parse_color(self.component_color.as_deref(), default_component_color(), "component_color")
    }

    /// Fill [`Color`] of `ATTRIBUTE` nodes.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured color string cannot be parsed.
    pub fn attribute_color(&self) -> Result<Color, String> {
        parse_color(self.attribute_color.as_deref(), default_attribute_color(), "attribute_color")
    }

    pub fn size(&self) -> &str {
        self.size.as_deref().unwrap_or(DEFAULT_SIZE)
    }
}

/// Graphviz `size` hint used when none is configured.
pub(crate) const DEFAULT_SIZE: &str = "18";

pub(crate) fn default_system_color() -> Color {
    Color::from_rgb8(0x66, 0xB2, 0xFF)
}

pub(crate) fn default_component_color() -> Color {
    Color::from_rgb8(0xFF, 0xFF, 0xCC)
}

pub(crate) fn default_attribute_color() -> Color {
    Color::from_rgb8(0xE0, 0xE0, 0xE0)
}

fn parse_color(value: Option<&str>, default: Color, field: &str) -> Result<Color, String> {
    match value {
        Some(value) => Color::new(value).map_err(|err| format!("Invalid {field} in config: {err}")),
        None => Ok(default),
    }
}

/// Term mapping configuration.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct MappingConfig {
    /// Policy for tokens sharing a lemma key but not an entity label.
    #[serde(default)]
    type_conflict: MergePolicy,
}

impl MappingConfig {
    pub fn type_conflict(&self) -> MergePolicy {
        self.type_conflict
    }
}

/// Image format produced by the renderer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Png,
    Svg,
}

impl OutputFormat {
    /// File extension appended to output names.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Svg => "svg",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Output and batch behavior configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    format: OutputFormat,

    /// Glob pattern selecting input files inside the input directory.
    pattern: String,

    /// Also write the generated DOT source next to each image.
    emit_dot: bool,

    /// Abort the batch on the first failing document.
    fail_fast: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            pattern: "*.json".to_string(),
            emit_dot: false,
            fail_fast: false,
        }
    }
}

impl OutputConfig {
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    pub fn set_format(&mut self, format: OutputFormat) {
        self.format = format;
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn set_pattern(&mut self, pattern: impl Into<String>) {
        self.pattern = pattern.into();
    }

    pub fn emit_dot(&self) -> bool {
        self.emit_dot
    }

    pub fn set_emit_dot(&mut self, emit_dot: bool) {
        self.emit_dot = emit_dot;
    }

    pub fn fail_fast(&self) -> bool {
        self.fail_fast
    }

    pub fn set_fail_fast(&mut self, fail_fast: bool) {
        self.fail_fast = fail_fast;
    }
}
