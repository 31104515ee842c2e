//! Document tree types
//!
//! An immutable tree of owned nodes describing an already-parsed
//! lightweight-markup document. The renderer in md2gmi-core walks this
//! tree; it never mutates it.

use serde::{Deserialize, Serialize};

/// Root node of a document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Root {
    pub children: Vec<Node>,
}

/// A document node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Node {
    // Block nodes
    Heading(Heading),
    Paragraph(Paragraph),
    Blockquote(Blockquote),
    List(List),
    ListItem(ListItem),
    CodeBlock(CodeBlock),
    FencedCodeBlock(FencedCodeBlock),
    HtmlBlock(HtmlBlock),
    TextBlock(TextBlock),
    ThematicBreak,

    // Inline nodes
    Text(Text),
    Str(Str),
    Emphasis(Emphasis),
    Strikethrough(Strikethrough),
    CodeSpan(CodeSpan),
    Link(Link),
    AutoLink(AutoLink),
    WikiLink(WikiLink),
    Image(Image),
    RawHtml(RawHtml),
}

/// Heading node. Levels above 3 still carry their real depth; the
/// renderer collapses them to Gemtext's third rank.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Heading {
    pub level: u8,
    pub children: Vec<Node>,
}

/// Paragraph node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paragraph {
    pub children: Vec<Node>,
}

/// Blockquote node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Blockquote {
    pub children: Vec<Node>,
}

/// List node. `start` is `Some` for ordered lists; Gemtext has no
/// ordered-item syntax so rendering only reads `tight`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct List {
    pub tight: bool,
    pub start: Option<u64>,
    pub children: Vec<Node>,
}

/// List item node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListItem {
    pub children: Vec<Node>,
}

/// Indented code block node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodeBlock {
    pub value: String,
}

/// Fenced code block node, with its optional info string
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FencedCodeBlock {
    pub info: Option<String>,
    pub value: String,
}

/// Block-level raw HTML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HtmlBlock {
    pub value: String,
}

/// A run of inline content that is not a paragraph (bare content of a
/// tight list item)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextBlock {
    pub children: Vec<Node>,
}

/// Text segment with its line-break flags
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Text {
    pub value: String,
    #[serde(default, skip_serializing_if = "is_false")]
    pub soft_break: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub hard_break: bool,
}

/// Literal string node (entity replacements and other synthesized text)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Str {
    pub value: String,
}

/// Emphasis node: level 1 for emphasis, 2 for strong
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Emphasis {
    pub level: u8,
    pub children: Vec<Node>,
}

/// Strikethrough node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Strikethrough {
    pub children: Vec<Node>,
}

/// Inline code span node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodeSpan {
    pub children: Vec<Node>,
}

/// Link node; children hold the label markup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub url: String,
    pub children: Vec<Node>,
}

/// Autolink node; the label is the destination itself
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutoLink {
    pub url: String,
}

/// Wiki-style link node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WikiLink {
    pub url: String,
    pub children: Vec<Node>,
}

/// Image node; children hold the alt text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Image {
    pub url: String,
    pub children: Vec<Node>,
}

/// Inline raw HTML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawHtml {
    pub value: String,
}

fn is_false(v: &bool) -> bool {
    !*v
}

/// Flatten nodes to their literal text, dropping all markup.
pub fn plain_text(nodes: &[Node]) -> String {
    let mut out = String::new();
    for node in nodes {
        node.collect_text(&mut out);
    }
    out
}

impl Node {
    /// Flatten this subtree to its literal text.
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            Node::Text(t) => out.push_str(&t.value),
            Node::Str(s) => out.push_str(&s.value),
            Node::AutoLink(a) => out.push_str(&a.url),
            Node::CodeBlock(c) => out.push_str(&c.value),
            Node::FencedCodeBlock(c) => out.push_str(&c.value),
            Node::Heading(Heading { children, .. })
            | Node::Paragraph(Paragraph { children })
            | Node::Blockquote(Blockquote { children })
            | Node::List(List { children, .. })
            | Node::ListItem(ListItem { children })
            | Node::TextBlock(TextBlock { children })
            | Node::Emphasis(Emphasis { children, .. })
            | Node::Strikethrough(Strikethrough { children })
            | Node::CodeSpan(CodeSpan { children })
            | Node::Link(Link { children, .. })
            | Node::WikiLink(WikiLink { children, .. })
            | Node::Image(Image { children, .. }) => {
                for child in children {
                    child.collect_text(out);
                }
            }
            Node::HtmlBlock(_) | Node::RawHtml(_) | Node::ThematicBreak => {}
        }
    }
}

// Convenience constructors
impl Node {
    pub fn text(s: impl Into<String>) -> Self {
        Node::Text(Text {
            value: s.into(),
            soft_break: false,
            hard_break: false,
        })
    }

    pub fn text_with_breaks(s: impl Into<String>, soft_break: bool, hard_break: bool) -> Self {
        Node::Text(Text {
            value: s.into(),
            soft_break,
            hard_break,
        })
    }

    pub fn str(s: impl Into<String>) -> Self {
        Node::Str(Str { value: s.into() })
    }

    pub fn heading(level: u8, children: Vec<Node>) -> Self {
        Node::Heading(Heading { level, children })
    }

    pub fn paragraph(children: Vec<Node>) -> Self {
        Node::Paragraph(Paragraph { children })
    }

    pub fn blockquote(children: Vec<Node>) -> Self {
        Node::Blockquote(Blockquote { children })
    }

    pub fn list(tight: bool, children: Vec<Node>) -> Self {
        Node::List(List {
            tight,
            start: None,
            children,
        })
    }

    pub fn ordered_list(tight: bool, start: u64, children: Vec<Node>) -> Self {
        Node::List(List {
            tight,
            start: Some(start),
            children,
        })
    }

    pub fn list_item(children: Vec<Node>) -> Self {
        Node::ListItem(ListItem { children })
    }

    pub fn code_block(value: impl Into<String>) -> Self {
        Node::CodeBlock(CodeBlock {
            value: value.into(),
        })
    }

    pub fn fenced_code_block(info: Option<String>, value: impl Into<String>) -> Self {
        Node::FencedCodeBlock(FencedCodeBlock {
            info,
            value: value.into(),
        })
    }

    pub fn html_block(value: impl Into<String>) -> Self {
        Node::HtmlBlock(HtmlBlock {
            value: value.into(),
        })
    }

    pub fn text_block(children: Vec<Node>) -> Self {
        Node::TextBlock(TextBlock { children })
    }

    pub fn thematic_break() -> Self {
        Node::ThematicBreak
    }

    pub fn emphasis(children: Vec<Node>) -> Self {
        Node::Emphasis(Emphasis { level: 1, children })
    }

    pub fn strong(children: Vec<Node>) -> Self {
        Node::Emphasis(Emphasis { level: 2, children })
    }

    pub fn strikethrough(children: Vec<Node>) -> Self {
        Node::Strikethrough(Strikethrough { children })
    }

    pub fn code_span(children: Vec<Node>) -> Self {
        Node::CodeSpan(CodeSpan { children })
    }

    pub fn link(url: impl Into<String>, children: Vec<Node>) -> Self {
        Node::Link(Link {
            url: url.into(),
            children,
        })
    }

    pub fn auto_link(url: impl Into<String>) -> Self {
        Node::AutoLink(AutoLink { url: url.into() })
    }

    pub fn wiki_link(url: impl Into<String>, children: Vec<Node>) -> Self {
        Node::WikiLink(WikiLink {
            url: url.into(),
            children,
        })
    }

    pub fn image(url: impl Into<String>, children: Vec<Node>) -> Self {
        Node::Image(Image {
            url: url.into(),
            children,
        })
    }

    pub fn raw_html(value: impl Into<String>) -> Self {
        Node::RawHtml(RawHtml {
            value: value.into(),
        })
    }
}

impl Root {
    pub fn new(children: Vec<Node>) -> Self {
        Self { children }
    }
}
