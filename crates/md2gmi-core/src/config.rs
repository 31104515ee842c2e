//! Render options
//!
//! An immutable set of choices for the reductions Gemtext forces.
//! Options are built once before rendering and passed by reference into
//! every render call; a render call never changes them, so one value
//! can back any number of independent renders.

use regex::Regex;

/// Default horizontal rule text: an 80 column dashed line.
pub const HORIZONTAL_RULE: &str =
    "--------------------------------------------------------------------------------";

/// How headings that contain only links are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HeadingLink {
    /// Render the link labels as plain heading text.
    Off,
    /// Render labels as heading text, then emit each link below the heading.
    Below,
    /// Replace the whole heading with its first link line.
    #[default]
    Auto,
}

/// Blank space emitted after a heading line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HeadingSpace {
    /// A single newline.
    Single,
    /// A blank line.
    #[default]
    Double,
}

/// Where links found inside prose paragraphs are surfaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParagraphLink {
    /// Links are not surfaced; only their labels remain in the prose.
    Off,
    /// A list of link lines follows the paragraph.
    #[default]
    Below,
    /// Like Below, with labels wrapped in curly braces.
    CurlyBelow,
}

/// Representation of emphasis spans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmphasisMode {
    /// Strip the markers, keep the text.
    #[default]
    Off,
    /// Keep Markdown `_`/`**` delimiters.
    Markdown,
    /// Re-spell the span in Unicode sans-serif italic/bold glyphs.
    Unicode,
}

/// Representation of strikethrough spans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StrikethroughMode {
    #[default]
    Off,
    /// Keep Markdown `~~` delimiters.
    Markdown,
    /// Overlay the span with combining strokes.
    Unicode,
}

/// Representation of inline code spans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CodeSpanMode {
    /// Strip the backticks.
    #[default]
    Off,
    /// Keep the backticks.
    Markdown,
}

/// Which family of link syntax produced a link node. Selects the
/// replacer rules that apply to its destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
    Markdown,
    Wiki,
    Auto,
    Image,
}

/// A destination-rewrite rule. All non-overlapping matches of `pattern`
/// in a destination of matching kind are replaced with `replacement`.
#[derive(Debug, Clone)]
pub struct LinkReplacer {
    pub kind: LinkKind,
    pub pattern: Regex,
    pub replacement: String,
}

impl LinkReplacer {
    pub fn new(kind: LinkKind, pattern: Regex, replacement: impl Into<String>) -> Self {
        Self {
            kind,
            pattern,
            replacement: replacement.into(),
        }
    }
}

/// Options for the Gemtext renderer
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// How link-only headings are rendered
    pub heading_link: HeadingLink,
    /// Spacing after a heading
    pub heading_space: HeadingSpace,
    /// Where inline links in prose are surfaced
    pub paragraph_link: ParagraphLink,
    /// Representation of emphasis spans
    pub emphasis: EmphasisMode,
    /// Representation of strikethrough spans
    pub strikethrough: StrikethroughMode,
    /// Representation of inline code
    pub code_span: CodeSpanMode,
    /// Literal text emitted for a thematic break
    pub horizontal_rule: String,
    /// Destination-rewrite rules, applied in list order
    pub link_replacers: Vec<LinkReplacer>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            heading_link: HeadingLink::default(),
            heading_space: HeadingSpace::default(),
            paragraph_link: ParagraphLink::default(),
            emphasis: EmphasisMode::default(),
            strikethrough: StrikethroughMode::default(),
            code_span: CodeSpanMode::default(),
            horizontal_rule: HORIZONTAL_RULE.to_string(),
            link_replacers: Vec::new(),
        }
    }
}
