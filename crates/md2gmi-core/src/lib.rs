//! md2gmi-core: Core library for converting Markdown to Gemtext
//!
//! This crate provides:
//! - The Gemtext renderer over md2gmi-tree document trees
//! - Render options parameterizing the lossy reductions
//! - A pulldown-cmark adapter that builds document trees
//! - Unicode glyph substitution for emphasis without markup
//!
//! Gemtext is a line-oriented markup with a dedicated link-line syntax
//! and no inline formatting, so conversion from Markdown is inherently
//! lossy; the options choose deterministic reductions rather than
//! preserving fidelity.
//!
//! ## Example
//!
//! ```rust
//! use md2gmi_core::{RenderOptions, markdown_to_gemtext};
//!
//! let gmi = markdown_to_gemtext("# Hello\n\nWorld.\n", &RenderOptions::default());
//! assert_eq!(gmi, "# Hello\n\nWorld.\n\n");
//! ```

pub mod config;
pub mod convert;
pub mod glyph;
pub mod link;
pub mod render;

pub use config::{
    CodeSpanMode, EmphasisMode, HORIZONTAL_RULE, HeadingLink, HeadingSpace, LinkKind,
    LinkReplacer, ParagraphLink, RenderOptions, StrikethroughMode,
};
pub use convert::{markdown_to_gemtext, markdown_to_tree};
pub use link::{link_only, rewrite_destination};
pub use md2gmi_tree::{Node, Root};
pub use render::{RenderError, RenderResult, render, to_gemtext};
