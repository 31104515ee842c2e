//! Configuration file support for the md2gmi CLI
//!
//! Loads settings from a `_md2gmi.toml` configuration file.

use anyhow::{Context, Result};
use clap::ValueEnum;
use md2gmi_core::{
    CodeSpanMode, EmphasisMode, HeadingLink, HeadingSpace, LinkKind, LinkReplacer, ParagraphLink,
    RenderOptions, StrikethroughMode,
};
use regex::Regex;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default configuration file name
pub const CONFIG_FILE_NAME: &str = "_md2gmi.toml";

/// Schema URL for the configuration file
pub const SCHEMA_URL: &str =
    "https://raw.githubusercontent.com/md2gmi/md2gmi/main/crates/md2gmi-cli/schema/md2gmi.schema.json";

/// Root configuration structure
#[derive(Debug, Default, Clone, Deserialize, Serialize, JsonSchema)]
#[serde(default)]
pub struct Config {
    /// Rendering configuration
    #[serde(skip_serializing_if = "RenderConfig::is_empty")]
    pub render: RenderConfig,
}

/// Rendering configuration
#[derive(Debug, Default, Clone, Deserialize, Serialize, JsonSchema)]
#[serde(default)]
pub struct RenderConfig {
    /// How link-only headings are rendered: "off", "below" or "auto" (default: "auto")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heading_link: Option<HeadingLinkChoice>,
    /// Blank space after a heading: "single" or "double" (default: "double")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heading_space: Option<HeadingSpaceChoice>,
    /// Where paragraph links are surfaced: "off", "below" or "curly-below" (default: "below")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paragraph_link: Option<ParagraphLinkChoice>,
    /// Representation of emphasis: "off", "markdown" or "unicode" (default: "off")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emphasis: Option<EmphasisChoice>,
    /// Representation of strikethrough: "off", "markdown" or "unicode" (default: "off")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strikethrough: Option<StrikethroughChoice>,
    /// Representation of inline code: "off" or "markdown" (default: "off")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code_span: Option<CodeSpanChoice>,
    /// Literal text emitted for thematic breaks (default: an 80 column dashed line)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub horizontal_rule: Option<String>,
    /// Link destination rewrite rules, applied in order
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub link_replacers: Vec<ReplacerConfig>,
}

impl RenderConfig {
    fn is_empty(&self) -> bool {
        self.heading_link.is_none()
            && self.heading_space.is_none()
            && self.paragraph_link.is_none()
            && self.emphasis.is_none()
            && self.strikethrough.is_none()
            && self.code_span.is_none()
            && self.horizontal_rule.is_none()
            && self.link_replacers.is_empty()
    }

    /// Build render options from this configuration, compiling replacer
    /// patterns.
    pub fn to_render_options(&self) -> Result<RenderOptions> {
        let mut options = RenderOptions::default();
        if let Some(v) = self.heading_link {
            options.heading_link = v.into();
        }
        if let Some(v) = self.heading_space {
            options.heading_space = v.into();
        }
        if let Some(v) = self.paragraph_link {
            options.paragraph_link = v.into();
        }
        if let Some(v) = self.emphasis {
            options.emphasis = v.into();
        }
        if let Some(v) = self.strikethrough {
            options.strikethrough = v.into();
        }
        if let Some(v) = self.code_span {
            options.code_span = v.into();
        }
        if let Some(rule) = &self.horizontal_rule {
            options.horizontal_rule = rule.clone();
        }
        for replacer in &self.link_replacers {
            options.link_replacers.push(replacer.compile()?);
        }
        Ok(options)
    }
}

/// A destination rewrite rule
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct ReplacerConfig {
    /// Which links the rule applies to: "markdown", "wiki", "auto" or "image"
    pub kind: LinkKindChoice,
    /// Regular expression matched against the destination
    pub pattern: String,
    /// Replacement text; capture groups are available as $1, $2, ...
    pub replacement: String,
}

impl ReplacerConfig {
    pub fn compile(&self) -> Result<LinkReplacer> {
        let pattern = Regex::new(&self.pattern)
            .with_context(|| format!("Invalid link replacer pattern: {}", self.pattern))?;
        Ok(LinkReplacer::new(
            self.kind.into(),
            pattern,
            self.replacement.clone(),
        ))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, JsonSchema, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum HeadingLinkChoice {
    Off,
    Below,
    Auto,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, JsonSchema, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum HeadingSpaceChoice {
    Single,
    Double,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, JsonSchema, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum ParagraphLinkChoice {
    Off,
    Below,
    CurlyBelow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, JsonSchema, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum EmphasisChoice {
    Off,
    Markdown,
    Unicode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, JsonSchema, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum StrikethroughChoice {
    Off,
    Markdown,
    Unicode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, JsonSchema, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum CodeSpanChoice {
    Off,
    Markdown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, JsonSchema, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum LinkKindChoice {
    Markdown,
    Wiki,
    Auto,
    Image,
}

impl From<HeadingLinkChoice> for HeadingLink {
    fn from(choice: HeadingLinkChoice) -> Self {
        match choice {
            HeadingLinkChoice::Off => HeadingLink::Off,
            HeadingLinkChoice::Below => HeadingLink::Below,
            HeadingLinkChoice::Auto => HeadingLink::Auto,
        }
    }
}

impl From<HeadingSpaceChoice> for HeadingSpace {
    fn from(choice: HeadingSpaceChoice) -> Self {
        match choice {
            HeadingSpaceChoice::Single => HeadingSpace::Single,
            HeadingSpaceChoice::Double => HeadingSpace::Double,
        }
    }
}

impl From<ParagraphLinkChoice> for ParagraphLink {
    fn from(choice: ParagraphLinkChoice) -> Self {
        match choice {
            ParagraphLinkChoice::Off => ParagraphLink::Off,
            ParagraphLinkChoice::Below => ParagraphLink::Below,
            ParagraphLinkChoice::CurlyBelow => ParagraphLink::CurlyBelow,
        }
    }
}

impl From<EmphasisChoice> for EmphasisMode {
    fn from(choice: EmphasisChoice) -> Self {
        match choice {
            EmphasisChoice::Off => EmphasisMode::Off,
            EmphasisChoice::Markdown => EmphasisMode::Markdown,
            EmphasisChoice::Unicode => EmphasisMode::Unicode,
        }
    }
}

impl From<StrikethroughChoice> for StrikethroughMode {
    fn from(choice: StrikethroughChoice) -> Self {
        match choice {
            StrikethroughChoice::Off => StrikethroughMode::Off,
            StrikethroughChoice::Markdown => StrikethroughMode::Markdown,
            StrikethroughChoice::Unicode => StrikethroughMode::Unicode,
        }
    }
}

impl From<CodeSpanChoice> for CodeSpanMode {
    fn from(choice: CodeSpanChoice) -> Self {
        match choice {
            CodeSpanChoice::Off => CodeSpanMode::Off,
            CodeSpanChoice::Markdown => CodeSpanMode::Markdown,
        }
    }
}

impl From<LinkKindChoice> for LinkKind {
    fn from(choice: LinkKindChoice) -> Self {
        match choice {
            LinkKindChoice::Markdown => LinkKind::Markdown,
            LinkKindChoice::Wiki => LinkKind::Wiki,
            LinkKindChoice::Auto => LinkKind::Auto,
            LinkKindChoice::Image => LinkKind::Image,
        }
    }
}

impl Config {
    /// Load configuration from a specific file path
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Try to load configuration from a directory (looks for `_md2gmi.toml`)
    ///
    /// Returns `Ok(None)` if the config file doesn't exist.
    pub fn load_from_dir(dir: &Path) -> Result<Option<Self>> {
        let config_path = dir.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            Ok(Some(Self::load(&config_path)?))
        } else {
            Ok(None)
        }
    }

    /// Generate JSON schema for the configuration
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Config)
    }

    /// Generate JSON schema as a string
    pub fn json_schema_string() -> Result<String> {
        let schema = Self::json_schema();
        serde_json::to_string_pretty(&schema).context("Failed to serialize JSON schema")
    }

    /// Serialize configuration to TOML string with schema directive
    pub fn to_toml_with_schema(&self) -> Result<String> {
        let toml_content =
            toml::to_string_pretty(self).context("Failed to serialize config to TOML")?;

        Ok(format!("#:schema {}\n\n{}", SCHEMA_URL, toml_content))
    }

    /// Create a sample configuration for the init command
    pub fn sample() -> Self {
        Config {
            render: RenderConfig {
                heading_link: Some(HeadingLinkChoice::Auto),
                heading_space: Some(HeadingSpaceChoice::Double),
                paragraph_link: Some(ParagraphLinkChoice::Below),
                emphasis: Some(EmphasisChoice::Off),
                strikethrough: Some(StrikethroughChoice::Off),
                code_span: Some(CodeSpanChoice::Off),
                horizontal_rule: None, // use the built-in rule
                link_replacers: vec![ReplacerConfig {
                    kind: LinkKindChoice::Markdown,
                    pattern: r"\.md$".to_string(),
                    replacement: ".gmi".to_string(),
                }],
            },
        }
    }
}
