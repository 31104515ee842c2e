//! Markdown to document tree conversion
//!
//! Parsing Markdown is not this crate's job: pulldown-cmark does it.
//! This module only folds the parser's event stream into the
//! md2gmi-tree document tree the renderer consumes. Strikethrough and
//! wiki links are enabled; tables, footnotes and task lists are not,
//! since Gemtext has no rendering for them.

use md2gmi_tree::{Node, Root, plain_text};
use pulldown_cmark::{CodeBlockKind, Event, LinkType, Options, Parser, Tag};

use crate::config::RenderOptions;
use crate::render::to_gemtext;

/// Parse Markdown source and build a document tree.
pub fn markdown_to_tree(source: &str) -> Root {
    let options = Options::ENABLE_STRIKETHROUGH | Options::ENABLE_WIKILINKS;
    let mut builder = TreeBuilder::new();
    for event in Parser::new_ext(source, options) {
        builder.event(event);
    }
    builder.finish()
}

/// Convert Markdown source straight to Gemtext.
pub fn markdown_to_gemtext(source: &str, options: &RenderOptions) -> String {
    to_gemtext(&markdown_to_tree(source), options)
}

/// An open container on the build stack.
struct Frame {
    container: Container,
    children: Vec<Node>,
    /// Literal accumulator for code and HTML blocks.
    text: String,
}

enum Container {
    Root,
    Heading(u8),
    Paragraph,
    Blockquote,
    List(Option<u64>),
    Item,
    CodeBlock { fenced: bool, info: Option<String> },
    HtmlBlock,
    Emphasis(u8),
    Strikethrough,
    Link { link_type: LinkType, url: String },
    Image { url: String },
    /// Containers without a tree counterpart; their children splice
    /// into the parent.
    Other,
}

impl Frame {
    fn new(container: Container) -> Self {
        Self {
            container,
            children: Vec::new(),
            text: String::new(),
        }
    }

    fn collects_literal(&self) -> bool {
        matches!(
            self.container,
            Container::CodeBlock { .. } | Container::HtmlBlock
        )
    }
}

struct TreeBuilder {
    stack: Vec<Frame>,
}

impl TreeBuilder {
    fn new() -> Self {
        Self {
            stack: vec![Frame::new(Container::Root)],
        }
    }

    fn event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(_) => self.close_top(),
            Event::Text(s) => self.text(&s),
            Event::Code(s) => self.push(Node::code_span(vec![Node::text(s.into_string())])),
            Event::Html(s) => self.html(&s),
            Event::InlineHtml(s) => self.push(Node::raw_html(s.into_string())),
            Event::SoftBreak => self.line_break(false),
            Event::HardBreak => self.line_break(true),
            Event::Rule => self.push(Node::thematic_break()),
            _ => {}
        }
    }

    fn start(&mut self, tag: Tag<'_>) {
        let container = match tag {
            Tag::Paragraph => Container::Paragraph,
            Tag::Heading { level, .. } => Container::Heading(level as u8),
            Tag::BlockQuote(_) => Container::Blockquote,
            Tag::CodeBlock(CodeBlockKind::Fenced(info)) => Container::CodeBlock {
                fenced: true,
                info: if info.is_empty() {
                    None
                } else {
                    Some(info.into_string())
                },
            },
            Tag::CodeBlock(CodeBlockKind::Indented) => Container::CodeBlock {
                fenced: false,
                info: None,
            },
            Tag::HtmlBlock => Container::HtmlBlock,
            Tag::List(start) => Container::List(start),
            Tag::Item => Container::Item,
            Tag::Emphasis => Container::Emphasis(1),
            Tag::Strong => Container::Emphasis(2),
            Tag::Strikethrough => Container::Strikethrough,
            Tag::Link {
                link_type,
                dest_url,
                ..
            } => Container::Link {
                link_type,
                url: dest_url.into_string(),
            },
            Tag::Image { dest_url, .. } => Container::Image {
                url: dest_url.into_string(),
            },
            _ => Container::Other,
        };
        self.stack.push(Frame::new(container));
    }

    fn close_top(&mut self) {
        if self.stack.len() < 2 {
            return;
        }
        let Some(frame) = self.stack.pop() else { return };
        let node = match frame.container {
            Container::Root => return,
            Container::Paragraph => Node::paragraph(frame.children),
            Container::Heading(level) => Node::heading(level, frame.children),
            Container::Blockquote => Node::blockquote(frame.children),
            Container::List(start) => finish_list(start, frame.children),
            Container::Item => Node::list_item(wrap_inline_runs(frame.children)),
            Container::CodeBlock { fenced: true, info } => {
                Node::fenced_code_block(info, frame.text)
            }
            Container::CodeBlock { fenced: false, .. } => Node::code_block(frame.text),
            Container::HtmlBlock => Node::html_block(frame.text),
            Container::Emphasis(1) => Node::emphasis(frame.children),
            Container::Emphasis(_) => Node::strong(frame.children),
            Container::Strikethrough => Node::strikethrough(frame.children),
            Container::Link { link_type, url } => build_link(link_type, url, frame.children),
            Container::Image { url } => Node::image(url, frame.children),
            Container::Other => {
                for child in frame.children {
                    self.push(child);
                }
                return;
            }
        };
        self.push(node);
    }

    fn text(&mut self, s: &str) {
        if let Some(frame) = self.stack.last_mut() {
            if frame.collects_literal() {
                frame.text.push_str(s);
                return;
            }
        }
        self.push(Node::text(s));
    }

    fn html(&mut self, s: &str) {
        if let Some(frame) = self.stack.last_mut() {
            if frame.collects_literal() {
                frame.text.push_str(s);
                return;
            }
        }
        self.push(Node::html_block(s));
    }

    /// Breaks attach to the preceding text segment when it has none
    /// yet; otherwise they become an empty text node carrying the flag.
    fn line_break(&mut self, hard: bool) {
        if let Some(frame) = self.stack.last_mut() {
            if let Some(Node::Text(t)) = frame.children.last_mut() {
                if !t.soft_break && !t.hard_break {
                    if hard {
                        t.hard_break = true;
                    } else {
                        t.soft_break = true;
                    }
                    return;
                }
            }
            frame
                .children
                .push(Node::text_with_breaks("", !hard, hard));
        }
    }

    fn push(&mut self, node: Node) {
        if let Some(frame) = self.stack.last_mut() {
            frame.children.push(node);
        }
    }

    fn finish(mut self) -> Root {
        while self.stack.len() > 1 {
            self.close_top();
        }
        let children = match self.stack.pop() {
            Some(frame) => frame.children,
            None => Vec::new(),
        };
        Root::new(children)
    }
}

fn build_link(link_type: LinkType, url: String, children: Vec<Node>) -> Node {
    match link_type {
        LinkType::Autolink | LinkType::Email => {
            // An autolink's label is its destination.
            let label = plain_text(&children);
            Node::auto_link(if label.is_empty() { url } else { label })
        }
        LinkType::WikiLink { .. } => Node::wiki_link(url, children),
        _ => Node::link(url, children),
    }
}

/// A list is tight when no item holds a paragraph.
fn finish_list(start: Option<u64>, children: Vec<Node>) -> Node {
    let tight = !children.iter().any(|item| {
        matches!(item, Node::ListItem(li)
            if li.children.iter().any(|c| matches!(c, Node::Paragraph(_))))
    });
    match start {
        Some(start) => Node::ordered_list(tight, start, children),
        None => Node::list(tight, children),
    }
}

/// Wrap runs of bare inline content (tight list items) in text blocks
/// so block spacing rules apply between them and sibling blocks.
fn wrap_inline_runs(children: Vec<Node>) -> Vec<Node> {
    let mut out = Vec::new();
    let mut run = Vec::new();
    for child in children {
        if is_inline(&child) {
            run.push(child);
        } else {
            if !run.is_empty() {
                out.push(Node::text_block(std::mem::take(&mut run)));
            }
            out.push(child);
        }
    }
    if !run.is_empty() {
        out.push(Node::text_block(run));
    }
    out
}

fn is_inline(node: &Node) -> bool {
    matches!(
        node,
        Node::Text(_)
            | Node::Str(_)
            | Node::Emphasis(_)
            | Node::Strikethrough(_)
            | Node::CodeSpan(_)
            | Node::Link(_)
            | Node::AutoLink(_)
            | Node::WikiLink(_)
            | Node::Image(_)
            | Node::RawHtml(_)
    )
}
