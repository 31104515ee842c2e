//! md2gmi-tree: document tree types for md2gmi
//!
//! This crate provides:
//! - The parsed-document tree (a subset of Markdown structure that
//!   Gemtext output can be derived from)
//! - Serialization of trees to/from JSON
//!
//! ## Example
//!
//! ```rust
//! use md2gmi_tree::{Node, Root};
//!
//! let doc = Root::new(vec![
//!     Node::heading(1, vec![Node::text("Hello")]),
//!     Node::paragraph(vec![Node::text("World")]),
//! ]);
//!
//! assert_eq!(doc.children.len(), 2);
//! ```

pub mod tree;

pub use tree::{
    AutoLink, Blockquote, CodeBlock, CodeSpan, Emphasis, FencedCodeBlock, Heading, HtmlBlock,
    Image, Link, List, ListItem, Node, Paragraph, RawHtml, Root, Str, Strikethrough, Text,
    TextBlock, WikiLink, plain_text,
};
