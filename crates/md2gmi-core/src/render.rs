//! Gemtext renderer
//!
//! Walks a document tree depth-first and writes Gemtext to an output
//! sink. Rendering is parameterized by [`RenderOptions`] and is
//! deterministic: the same tree and options always yield byte-identical
//! output, because every rule reads only the node at hand, read-only
//! sibling lookahead and the options.
//!
//! Blockquotes, list items and link labels are rendered by recursively
//! instantiating the renderer against a private buffer, so the subtree
//! text can be trimmed and re-prefixed before insertion into the main
//! output.

use std::io::Write;

use md2gmi_tree::{
    Blockquote, CodeSpan, Emphasis, Heading, Image, List, Node, Paragraph, Root, Strikethrough,
    Text, TextBlock, WikiLink, plain_text,
};
use thiserror::Error;

use crate::config::{
    CodeSpanMode, EmphasisMode, HeadingLink, HeadingSpace, LinkKind, ParagraphLink, RenderOptions,
    StrikethroughMode,
};
use crate::glyph;
use crate::link::{link_only, rewrite_destination};

/// Render errors
///
/// The only fatal condition is a sink write failure; the walk aborts at
/// the first one and output written so far stands. Callers that need
/// atomicity should render into a buffer and publish on success.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to write gemtext output: {0}")]
    Write(#[from] std::io::Error),
}

/// Render result type
pub type RenderResult<T> = Result<T, RenderError>;

/// Render a document tree as Gemtext into a sink.
pub fn render<W: Write>(w: W, root: &Root, options: &RenderOptions) -> RenderResult<()> {
    let mut renderer = Renderer { options, w };
    renderer.render_nodes(&root.children)
}

/// Render a document tree as a Gemtext string.
pub fn to_gemtext(root: &Root, options: &RenderOptions) -> String {
    let mut buf = Vec::new();
    // Writing into a Vec cannot fail.
    let _ = render(&mut buf, root, options);
    String::from_utf8_lossy(&buf).into_owned()
}

/// Renderer state: the options and the sink. Sub-renders borrow the
/// same options against a fresh buffer.
struct Renderer<'a, W: Write> {
    options: &'a RenderOptions,
    w: W,
}

impl<W: Write> Renderer<'_, W> {
    fn render_nodes(&mut self, nodes: &[Node]) -> RenderResult<()> {
        for (i, node) in nodes.iter().enumerate() {
            self.render_node(node, nodes.get(i + 1))?;
        }
        Ok(())
    }

    fn render_node(&mut self, node: &Node, next: Option<&Node>) -> RenderResult<()> {
        match node {
            Node::Heading(h) => self.render_heading(h),
            Node::Paragraph(p) => self.render_paragraph(p),
            Node::Blockquote(b) => self.render_blockquote(b),
            Node::List(l) => self.render_list(l),
            // List items are normally consumed by their list; a bare
            // item still renders its content.
            Node::ListItem(li) => self.render_nodes(&li.children),
            Node::CodeBlock(c) => self.render_code_block(None, &c.value),
            Node::FencedCodeBlock(c) => self.render_code_block(c.info.as_deref(), &c.value),
            Node::TextBlock(t) => self.render_text_block(t, next),
            Node::ThematicBreak => self.render_thematic_break(),
            Node::Text(t) => self.render_text(t, next),
            Node::Str(s) => {
                write!(self.w, "{}", s.value)?;
                Ok(())
            }
            Node::Emphasis(e) => self.render_emphasis(e),
            Node::Strikethrough(s) => self.render_strikethrough(s),
            Node::CodeSpan(c) => self.render_code_span(c),
            // Link markup contributes no delimiters; the label flows as
            // ordinary inline text. Link-only parents never reach here.
            Node::Link(l) => self.render_nodes(&l.children),
            Node::AutoLink(a) => {
                write!(self.w, "{}", a.url)?;
                Ok(())
            }
            Node::WikiLink(wl) => self.render_wiki_link(wl),
            Node::Image(img) => self.render_image(img, next),
            // Gemini clients cannot render HTML.
            Node::HtmlBlock(_) | Node::RawHtml(_) => Ok(()),
        }
    }

    fn render_heading(&mut self, h: &Heading) -> RenderResult<()> {
        let is_link_only = link_only(&h.children);

        if self.options.heading_link == HeadingLink::Auto && is_link_only {
            // A link-only heading becomes its first link line.
            for child in &h.children {
                if self.print_link(child, false)? {
                    return self.close_heading(h);
                }
            }
        }

        // Gemtext only distinguishes three heading ranks.
        match h.level {
            1 => write!(self.w, "# ")?,
            2 => write!(self.w, "## ")?,
            _ => write!(self.w, "### ")?,
        }

        if is_link_only {
            if matches!(
                self.options.heading_link,
                HeadingLink::Off | HeadingLink::Below
            ) {
                // No inline link syntax exists, so the heading shows the
                // link labels as plain text.
                for child in &h.children {
                    match child {
                        Node::Link(l) => write!(self.w, "{}", plain_text(&l.children))?,
                        Node::WikiLink(wl) => write!(self.w, "{}", plain_text(&wl.children))?,
                        Node::AutoLink(a) => write!(self.w, "{}", a.url)?,
                        _ => {}
                    }
                }
            }
        } else {
            self.render_nodes(&h.children)?;
        }

        self.close_heading(h)
    }

    fn close_heading(&mut self, h: &Heading) -> RenderResult<()> {
        match self.options.heading_space {
            HeadingSpace::Single => writeln!(self.w)?,
            HeadingSpace::Double => write!(self.w, "\n\n")?,
        }
        if self.options.heading_link == HeadingLink::Below {
            let mut has_link = false;
            for child in &h.children {
                if self.print_link(child, false)? {
                    writeln!(self.w)?;
                    has_link = true;
                }
            }
            if has_link {
                writeln!(self.w)?;
            }
        }
        Ok(())
    }

    fn render_paragraph(&mut self, p: &Paragraph) -> RenderResult<()> {
        match self.options.paragraph_link {
            ParagraphLink::Off => self.render_paragraph_link_off(p),
            ParagraphLink::Below | ParagraphLink::CurlyBelow => {
                self.render_paragraph_link_below(p)
            }
        }
    }

    /// A paragraph holding links and no prose is really a list of
    /// links; render it as one link line per link child.
    fn render_paragraph_link_only(&mut self, p: &Paragraph) -> RenderResult<()> {
        for child in &p.children {
            if self.print_link(child, false)? {
                writeln!(self.w)?;
            }
        }
        writeln!(self.w)?;
        Ok(())
    }

    fn render_paragraph_link_off(&mut self, p: &Paragraph) -> RenderResult<()> {
        if link_only(&p.children) {
            return self.render_paragraph_link_only(p);
        }
        self.render_nodes(&p.children)?;
        write!(self.w, "\n\n")?;
        Ok(())
    }

    fn render_paragraph_link_below(&mut self, p: &Paragraph) -> RenderResult<()> {
        if link_only(&p.children) {
            return self.render_paragraph_link_only(p);
        }
        let curly = self.options.paragraph_link == ParagraphLink::CurlyBelow;
        self.render_nodes(&p.children)?;
        let mut first = true;
        for child in &p.children {
            if matches!(child, Node::Link(_) | Node::AutoLink(_) | Node::WikiLink(_)) {
                if first {
                    write!(self.w, "\n\n")?;
                } else {
                    writeln!(self.w)?;
                }
                if self.print_link(child, curly)? {
                    first = false;
                }
            }
        }
        write!(self.w, "\n\n")?;
        Ok(())
    }

    fn render_blockquote(&mut self, b: &Blockquote) -> RenderResult<()> {
        let text = self.sub_render(&b.children)?;
        let text = text.trim();
        if text.is_empty() {
            write!(self.w, ">")?;
        }
        for line in text.split_inclusive('\n') {
            write!(self.w, ">")?;
            // One space after the marker, except before a nested quote
            // marker or on an empty line.
            if !line.starts_with('>') && !line.starts_with('\n') {
                write!(self.w, " ")?;
            }
            write!(self.w, "{line}")?;
        }
        write!(self.w, "\n\n")?;
        Ok(())
    }

    fn render_list(&mut self, l: &List) -> RenderResult<()> {
        for item in &l.children {
            let Node::ListItem(li) = item else { continue };
            let text = self.sub_render(&li.children)?;
            write!(self.w, "* ")?;
            for (i, line) in text.trim().split_inclusive('\n').enumerate() {
                if i > 0 && !line.starts_with('\n') {
                    // Gemtext lists are flat; continuation lines get a
                    // fixed two-space indent.
                    write!(self.w, "  ")?;
                }
                write!(self.w, "{line}")?;
            }
            writeln!(self.w)?;
            if !l.tight {
                writeln!(self.w)?;
            }
        }
        if l.tight {
            writeln!(self.w)?;
        }
        Ok(())
    }

    fn render_code_block(&mut self, info: Option<&str>, value: &str) -> RenderResult<()> {
        write!(self.w, "```")?;
        if let Some(info) = info {
            write!(self.w, "{info}")?;
        }
        writeln!(self.w)?;
        write!(self.w, "{value}")?;
        if !value.is_empty() && !value.ends_with('\n') {
            writeln!(self.w)?;
        }
        write!(self.w, "```\n\n")?;
        Ok(())
    }

    fn render_text_block(&mut self, t: &TextBlock, next: Option<&Node>) -> RenderResult<()> {
        self.render_nodes(&t.children)?;
        if next.is_some() && !t.children.is_empty() {
            writeln!(self.w)?;
        }
        Ok(())
    }

    fn render_thematic_break(&mut self) -> RenderResult<()> {
        write!(self.w, "{}\n\n", self.options.horizontal_rule)?;
        Ok(())
    }

    fn render_text(&mut self, t: &Text, next: Option<&Node>) -> RenderResult<()> {
        write!(self.w, "{}", t.value)?;
        if t.soft_break && !matches!(next, Some(Node::Image(_))) {
            write!(self.w, " ")?;
        }
        if t.hard_break {
            writeln!(self.w)?;
        }
        Ok(())
    }

    fn render_emphasis(&mut self, e: &Emphasis) -> RenderResult<()> {
        match self.options.emphasis {
            EmphasisMode::Off => self.render_nodes(&e.children),
            EmphasisMode::Markdown => {
                let delim = if e.level == 1 { "_" } else { "**" };
                write!(self.w, "{delim}")?;
                self.render_nodes(&e.children)?;
                write!(self.w, "{delim}")?;
                Ok(())
            }
            EmphasisMode::Unicode => {
                let text = plain_text(&e.children);
                if e.level == 1 {
                    write!(self.w, "{}", glyph::italic(&text))?;
                } else {
                    write!(self.w, "{}", glyph::bold(&text))?;
                }
                Ok(())
            }
        }
    }

    fn render_strikethrough(&mut self, s: &Strikethrough) -> RenderResult<()> {
        match self.options.strikethrough {
            StrikethroughMode::Off => self.render_nodes(&s.children),
            StrikethroughMode::Markdown => {
                write!(self.w, "~~")?;
                self.render_nodes(&s.children)?;
                write!(self.w, "~~")?;
                Ok(())
            }
            StrikethroughMode::Unicode => {
                write!(self.w, "{}", glyph::strike(&plain_text(&s.children)))?;
                Ok(())
            }
        }
    }

    fn render_code_span(&mut self, c: &CodeSpan) -> RenderResult<()> {
        if self.options.code_span == CodeSpanMode::Markdown {
            write!(self.w, "`")?;
            self.render_nodes(&c.children)?;
            write!(self.w, "`")?;
        } else {
            self.render_nodes(&c.children)?;
        }
        Ok(())
    }

    fn render_wiki_link(&mut self, wl: &WikiLink) -> RenderResult<()> {
        let curly = self.options.paragraph_link == ParagraphLink::CurlyBelow;
        if curly {
            write!(self.w, "{{")?;
        }
        self.render_nodes(&wl.children)?;
        if curly {
            write!(self.w, "}}")?;
        }
        Ok(())
    }

    fn render_image(&mut self, img: &Image, next: Option<&Node>) -> RenderResult<()> {
        let dest = rewrite_destination(&img.url, LinkKind::Image, &self.options.link_replacers);
        write!(self.w, "=> {dest} ")?;
        self.render_nodes(&img.children)?;
        if next.is_some() && !img.children.is_empty() {
            writeln!(self.w)?;
        }
        Ok(())
    }

    /// Emit one `=> destination label` line for a link-kind node.
    /// Returns whether anything was written, so callers never print
    /// spacing around nodes that emitted nothing.
    fn print_link(&mut self, node: &Node, curly: bool) -> RenderResult<bool> {
        match node {
            Node::Link(l) => {
                let dest =
                    rewrite_destination(&l.url, LinkKind::Markdown, &self.options.link_replacers);
                let label = self.sub_render(&l.children)?;
                self.write_link_line(&dest, label.trim(), curly)?;
                Ok(true)
            }
            Node::WikiLink(wl) => {
                let dest =
                    rewrite_destination(&wl.url, LinkKind::Wiki, &self.options.link_replacers);
                let label = self.sub_render(&wl.children)?;
                self.write_link_line(&dest, label.trim(), curly)?;
                Ok(true)
            }
            Node::AutoLink(a) => {
                // The label of an autolink is its destination; emit the
                // bare line form.
                let dest =
                    rewrite_destination(&a.url, LinkKind::Auto, &self.options.link_replacers);
                write!(self.w, "=> {dest}")?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    fn write_link_line(&mut self, dest: &str, label: &str, curly: bool) -> RenderResult<()> {
        if label.is_empty() {
            write!(self.w, "=> {dest}")?;
        } else if curly {
            write!(self.w, "=> {dest} {{{label}}}")?;
        } else {
            write!(self.w, "=> {dest} {label}")?;
        }
        Ok(())
    }

    /// Render nodes in isolation into a private buffer. Labels and
    /// nested blocks reduce under the same options as the main render.
    fn sub_render(&self, nodes: &[Node]) -> RenderResult<String> {
        let mut buf = Vec::new();
        Renderer {
            options: self.options,
            w: &mut buf,
        }
        .render_nodes(nodes)?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LinkReplacer;
    use regex::Regex;

    fn doc(children: Vec<Node>) -> Root {
        Root::new(children)
    }

    fn gmi(root: &Root) -> String {
        to_gemtext(root, &RenderOptions::default())
    }

    fn gmi_with(root: &Root, options: &RenderOptions) -> String {
        to_gemtext(root, options)
    }

    fn twitter_heading() -> Root {
        doc(vec![Node::heading(
            1,
            vec![Node::link("https://twitter.com", vec![Node::text("twitter")])],
        )])
    }

    #[test]
    fn test_heading_link_auto_replaces_link_only_heading() {
        assert_eq!(gmi(&twitter_heading()), "=> https://twitter.com twitter\n\n");
    }

    #[test]
    fn test_heading_link_off_keeps_label_as_text() {
        let options = RenderOptions {
            heading_link: HeadingLink::Off,
            ..RenderOptions::default()
        };
        assert_eq!(gmi_with(&twitter_heading(), &options), "# twitter\n\n");
    }

    #[test]
    fn test_heading_link_below_emits_heading_then_links() {
        let options = RenderOptions {
            heading_link: HeadingLink::Below,
            ..RenderOptions::default()
        };
        assert_eq!(
            gmi_with(&twitter_heading(), &options),
            "# twitter\n\n=> https://twitter.com twitter\n\n"
        );
    }

    #[test]
    fn test_heading_link_below_applies_to_mixed_headings() {
        let options = RenderOptions {
            heading_link: HeadingLink::Below,
            ..RenderOptions::default()
        };
        let root = doc(vec![Node::heading(
            2,
            vec![
                Node::text("About "),
                Node::link("https://x.example/", vec![Node::text("x")]),
            ],
        )]);
        assert_eq!(
            gmi_with(&root, &options),
            "## About x\n\n=> https://x.example/ x\n\n"
        );
    }

    #[test]
    fn test_heading_auto_keeps_first_link_only() {
        let root = doc(vec![Node::heading(
            1,
            vec![
                Node::link("https://a.example/", vec![Node::text("a")]),
                Node::link("https://b.example/", vec![Node::text("b")]),
            ],
        )]);
        assert_eq!(gmi(&root), "=> https://a.example/ a\n\n");
    }

    #[test]
    fn test_heading_space_single() {
        let options = RenderOptions {
            heading_space: HeadingSpace::Single,
            ..RenderOptions::default()
        };
        let root = doc(vec![Node::heading(1, vec![Node::text("Title")])]);
        assert_eq!(gmi_with(&root, &options), "# Title\n");
    }

    #[test]
    fn test_heading_levels_collapse_to_three_ranks() {
        let root = doc(vec![
            Node::heading(1, vec![Node::text("a")]),
            Node::heading(2, vec![Node::text("b")]),
            Node::heading(3, vec![Node::text("c")]),
            Node::heading(6, vec![Node::text("d")]),
        ]);
        assert_eq!(gmi(&root), "# a\n\n## b\n\n### c\n\n### d\n\n");
    }

    #[test]
    fn test_paragraph_link_below_default() {
        let root = doc(vec![Node::paragraph(vec![
            Node::text("This is a "),
            Node::link("http://x/", vec![Node::text("link")]),
            Node::text(" here."),
        ])]);
        assert_eq!(gmi(&root), "This is a link here.\n\n=> http://x/ link\n\n");
    }

    #[test]
    fn test_paragraph_link_below_multiple_links() {
        let root = doc(vec![Node::paragraph(vec![
            Node::text("a "),
            Node::link("https://one/", vec![Node::text("one")]),
            Node::text(" b "),
            Node::link("https://two/", vec![Node::text("two")]),
            Node::text(" c."),
        ])]);
        assert_eq!(
            gmi(&root),
            "a one b two c.\n\n=> https://one/ one\n=> https://two/ two\n\n"
        );
    }

    #[test]
    fn test_paragraph_link_off_drops_link_lines() {
        let options = RenderOptions {
            paragraph_link: ParagraphLink::Off,
            ..RenderOptions::default()
        };
        let root = doc(vec![Node::paragraph(vec![
            Node::text("This is a "),
            Node::link("http://x/", vec![Node::text("link")]),
            Node::text(" here."),
        ])]);
        assert_eq!(gmi_with(&root, &options), "This is a link here.\n\n");
    }

    #[test]
    fn test_paragraph_link_curly_below() {
        let options = RenderOptions {
            paragraph_link: ParagraphLink::CurlyBelow,
            ..RenderOptions::default()
        };
        let root = doc(vec![Node::paragraph(vec![
            Node::text("This is a "),
            Node::link("http://x/", vec![Node::text("link")]),
            Node::text(" here."),
        ])]);
        assert_eq!(
            gmi_with(&root, &options),
            "This is a link here.\n\n=> http://x/ {link}\n\n"
        );
    }

    #[test]
    fn test_link_only_paragraph_becomes_link_list() {
        let root = doc(vec![Node::paragraph(vec![
            Node::link("https://one/", vec![Node::text("one")]),
            Node::text_with_breaks("", false, true),
            Node::link("https://two/", vec![Node::text("two")]),
        ])]);
        assert_eq!(gmi(&root), "=> https://one/ one\n=> https://two/ two\n\n");
    }

    #[test]
    fn test_link_only_paragraph_same_under_off() {
        let options = RenderOptions {
            paragraph_link: ParagraphLink::Off,
            ..RenderOptions::default()
        };
        let root = doc(vec![Node::paragraph(vec![Node::link(
            "https://one/",
            vec![Node::text("one")],
        )])]);
        assert_eq!(gmi_with(&root, &options), "=> https://one/ one\n\n");
    }

    #[test]
    fn test_autolink_in_link_only_paragraph() {
        let root = doc(vec![Node::paragraph(vec![Node::auto_link(
            "https://x.example/",
        )])]);
        assert_eq!(gmi(&root), "=> https://x.example/\n\n");
    }

    #[test]
    fn test_autolink_flows_and_lists_below_in_prose() {
        let root = doc(vec![Node::paragraph(vec![
            Node::text("see "),
            Node::auto_link("https://x.example/"),
            Node::text(" please."),
        ])]);
        assert_eq!(
            gmi(&root),
            "see https://x.example/ please.\n\n=> https://x.example/\n\n"
        );
    }

    #[test]
    fn test_empty_link_label_omits_trailing_space() {
        let root = doc(vec![Node::paragraph(vec![Node::link(
            "https://x.example/",
            vec![],
        )])]);
        assert_eq!(gmi(&root), "=> https://x.example/\n\n");
    }

    #[test]
    fn test_link_label_is_sub_rendered_and_trimmed() {
        let root = doc(vec![Node::paragraph(vec![Node::link(
            "https://x.example/",
            vec![
                Node::text(" some "),
                Node::emphasis(vec![Node::text("label")]),
                Node::text(" "),
            ],
        )])]);
        assert_eq!(gmi(&root), "=> https://x.example/ some label\n\n");
    }

    #[test]
    fn test_emphasis_markdown() {
        let options = RenderOptions {
            emphasis: EmphasisMode::Markdown,
            ..RenderOptions::default()
        };
        let root = doc(vec![Node::paragraph(vec![
            Node::emphasis(vec![Node::text("word")]),
            Node::text(" and "),
            Node::strong(vec![Node::text("loud")]),
        ])]);
        assert_eq!(gmi_with(&root, &options), "_word_ and **loud**\n\n");
    }

    #[test]
    fn test_emphasis_unicode() {
        let options = RenderOptions {
            emphasis: EmphasisMode::Unicode,
            ..RenderOptions::default()
        };
        let root = doc(vec![Node::paragraph(vec![
            Node::emphasis(vec![Node::text("word")]),
            Node::text(" "),
            Node::strong(vec![Node::text("loud")]),
        ])]);
        let expected = format!("{} {}\n\n", glyph::italic("word"), glyph::bold("loud"));
        let rendered = gmi_with(&root, &options);
        assert_eq!(rendered, expected);
        assert!(!rendered.contains('_'));
        assert!(!rendered.contains("**"));
    }

    #[test]
    fn test_emphasis_off_strips_markers() {
        let root = doc(vec![Node::paragraph(vec![Node::emphasis(vec![
            Node::text("word"),
        ])])]);
        assert_eq!(gmi(&root), "word\n\n");
    }

    #[test]
    fn test_strikethrough_modes() {
        let root = doc(vec![Node::paragraph(vec![Node::strikethrough(vec![
            Node::text("gone"),
        ])])]);
        assert_eq!(gmi(&root), "gone\n\n");

        let markdown = RenderOptions {
            strikethrough: StrikethroughMode::Markdown,
            ..RenderOptions::default()
        };
        assert_eq!(gmi_with(&root, &markdown), "~~gone~~\n\n");

        let unicode = RenderOptions {
            strikethrough: StrikethroughMode::Unicode,
            ..RenderOptions::default()
        };
        assert_eq!(
            gmi_with(&root, &unicode),
            format!("{}\n\n", glyph::strike("gone"))
        );
    }

    #[test]
    fn test_code_span_modes() {
        let root = doc(vec![Node::paragraph(vec![
            Node::text("run "),
            Node::code_span(vec![Node::text("make all")]),
        ])]);
        assert_eq!(gmi(&root), "run make all\n\n");

        let markdown = RenderOptions {
            code_span: CodeSpanMode::Markdown,
            ..RenderOptions::default()
        };
        assert_eq!(gmi_with(&root, &markdown), "run `make all`\n\n");
    }

    #[test]
    fn test_blockquote_prefixes_every_line() {
        let root = doc(vec![Node::blockquote(vec![Node::paragraph(vec![
            Node::text_with_breaks("first line", false, true),
            Node::text("second line"),
        ])])]);
        assert_eq!(gmi(&root), "> first line\n> second line\n\n");
    }

    #[test]
    fn test_blockquote_blank_line_between_paragraphs() {
        let root = doc(vec![Node::blockquote(vec![
            Node::paragraph(vec![Node::text("a")]),
            Node::paragraph(vec![Node::text("b")]),
        ])]);
        assert_eq!(gmi(&root), "> a\n>\n> b\n\n");
    }

    #[test]
    fn test_nested_blockquote_has_no_double_space() {
        let root = doc(vec![Node::blockquote(vec![Node::blockquote(vec![
            Node::paragraph(vec![Node::text("deep")]),
        ])])]);
        assert_eq!(gmi(&root), ">> deep\n\n");
    }

    #[test]
    fn test_tight_list() {
        let root = doc(vec![Node::list(
            true,
            vec![
                Node::list_item(vec![Node::text("a")]),
                Node::list_item(vec![Node::text("b")]),
            ],
        )]);
        assert_eq!(gmi(&root), "* a\n* b\n\n");
    }

    #[test]
    fn test_loose_list() {
        let root = doc(vec![Node::list(
            false,
            vec![
                Node::list_item(vec![Node::paragraph(vec![Node::text("a")])]),
                Node::list_item(vec![Node::paragraph(vec![Node::text("b")])]),
            ],
        )]);
        assert_eq!(gmi(&root), "* a\n\n* b\n\n");
    }

    #[test]
    fn test_loose_item_with_two_paragraphs_indents_continuation() {
        let root = doc(vec![Node::list(
            false,
            vec![Node::list_item(vec![
                Node::paragraph(vec![Node::text("a")]),
                Node::paragraph(vec![Node::text("b")]),
            ])],
        )]);
        assert_eq!(gmi(&root), "* a\n\n  b\n\n");
    }

    #[test]
    fn test_nested_list_flattens_with_indent() {
        let root = doc(vec![Node::list(
            true,
            vec![Node::list_item(vec![
                Node::text_block(vec![Node::text("a")]),
                Node::list(true, vec![Node::list_item(vec![Node::text("b")])]),
            ])],
        )]);
        assert_eq!(gmi(&root), "* a\n  * b\n\n");
    }

    #[test]
    fn test_ordered_list_renders_flat_items() {
        let root = doc(vec![Node::ordered_list(
            true,
            3,
            vec![
                Node::list_item(vec![Node::text("three")]),
                Node::list_item(vec![Node::text("four")]),
            ],
        )]);
        assert_eq!(gmi(&root), "* three\n* four\n\n");
    }

    #[test]
    fn test_fenced_code_block_keeps_info_and_body() {
        let root = doc(vec![Node::fenced_code_block(
            Some("rust".to_string()),
            "fn main() {}\n",
        )]);
        assert_eq!(gmi(&root), "```rust\nfn main() {}\n```\n\n");
    }

    #[test]
    fn test_indented_code_block_has_no_info() {
        let root = doc(vec![Node::code_block("x = 1\ny = 2\n")]);
        assert_eq!(gmi(&root), "```\nx = 1\ny = 2\n```\n\n");
    }

    #[test]
    fn test_code_block_body_is_not_escaped() {
        let root = doc(vec![Node::fenced_code_block(
            None,
            "# not a heading\n=> not a link\n",
        )]);
        assert_eq!(gmi(&root), "```\n# not a heading\n=> not a link\n```\n\n");
    }

    #[test]
    fn test_code_block_final_newline_ensured() {
        let root = doc(vec![Node::code_block("no newline")]);
        assert_eq!(gmi(&root), "```\nno newline\n```\n\n");
    }

    #[test]
    fn test_thematic_break_default_rule() {
        let root = doc(vec![Node::thematic_break()]);
        assert_eq!(gmi(&root), format!("{}\n\n", crate::config::HORIZONTAL_RULE));
    }

    #[test]
    fn test_thematic_break_custom_rule() {
        let options = RenderOptions {
            horizontal_rule: "+++".to_string(),
            ..RenderOptions::default()
        };
        let root = doc(vec![Node::thematic_break()]);
        assert_eq!(gmi_with(&root, &options), "+++\n\n");
    }

    #[test]
    fn test_soft_break_becomes_space() {
        let root = doc(vec![Node::paragraph(vec![
            Node::text_with_breaks("one", true, false),
            Node::text("two"),
        ])]);
        assert_eq!(gmi(&root), "one two\n\n");
    }

    #[test]
    fn test_soft_break_before_image_emits_nothing() {
        let root = doc(vec![Node::paragraph(vec![
            Node::text_with_breaks("before", true, false),
            Node::image("pic.png", vec![Node::text("alt")]),
            Node::text("after"),
        ])]);
        assert_eq!(gmi(&root), "before=> pic.png alt\nafter\n\n");
    }

    #[test]
    fn test_hard_break_becomes_newline() {
        let root = doc(vec![Node::paragraph(vec![
            Node::text_with_breaks("one", false, true),
            Node::text("two"),
        ])]);
        assert_eq!(gmi(&root), "one\ntwo\n\n");
    }

    #[test]
    fn test_image_without_following_sibling_has_no_newline() {
        let root = doc(vec![Node::paragraph(vec![
            Node::text("see "),
            Node::image("pic.png", vec![Node::text("alt")]),
        ])]);
        assert_eq!(gmi(&root), "see => pic.png alt\n\n");
    }

    #[test]
    fn test_html_is_dropped() {
        let root = doc(vec![
            Node::html_block("<table><tr><td>x</td></tr></table>\n"),
            Node::paragraph(vec![
                Node::text("a"),
                Node::raw_html("<b>"),
                Node::text("b"),
                Node::raw_html("</b>"),
            ]),
        ]);
        assert_eq!(gmi(&root), "ab\n\n");
    }

    #[test]
    fn test_str_node_flows_but_is_not_prose_for_link_only() {
        let root = doc(vec![Node::paragraph(vec![
            Node::str("»"),
            Node::text(" quoted"),
        ])]);
        assert_eq!(gmi(&root), "» quoted\n\n");

        // A string node does not break the link-only classification.
        let links = doc(vec![Node::paragraph(vec![
            Node::link("https://x/", vec![Node::text("x")]),
            Node::str("·"),
        ])]);
        assert_eq!(gmi(&links), "=> https://x/ x\n\n");
    }

    #[test]
    fn test_text_block_newline_only_between_siblings() {
        let root = doc(vec![Node::list(
            true,
            vec![Node::list_item(vec![
                Node::text_block(vec![Node::text("a")]),
                Node::text_block(vec![Node::text("b")]),
            ])],
        )]);
        assert_eq!(gmi(&root), "* a\n  b\n\n");
    }

    #[test]
    fn test_link_replacers_by_kind() {
        let options = RenderOptions {
            link_replacers: vec![
                LinkReplacer::new(
                    LinkKind::Markdown,
                    Regex::new("https?").unwrap(),
                    "gemini",
                ),
                LinkReplacer::new(LinkKind::Auto, Regex::new("https?").unwrap(), "gopher"),
                LinkReplacer::new(LinkKind::Image, Regex::new(r"\.png$").unwrap(), ".jpg"),
            ],
            ..RenderOptions::default()
        };
        let root = doc(vec![
            Node::paragraph(vec![Node::link("https://x/", vec![Node::text("x")])]),
            Node::paragraph(vec![Node::auto_link("https://y/")]),
            Node::paragraph(vec![
                Node::text("pic "),
                Node::image("shot.png", vec![Node::text("shot")]),
            ]),
        ]);
        assert_eq!(
            gmi_with(&root, &options),
            "=> gemini://x/ x\n\n=> gopher://y/\n\npic => shot.jpg shot\n\n"
        );
    }

    #[test]
    fn test_wiki_link_replacer_and_flow() {
        let options = RenderOptions {
            link_replacers: vec![LinkReplacer::new(
                LinkKind::Wiki,
                Regex::new("nz").unwrap(),
                "org",
            )],
            ..RenderOptions::default()
        };
        let root = doc(vec![Node::paragraph(vec![Node::wiki_link(
            "kota.nz",
            vec![Node::text("kota")],
        )])]);
        assert_eq!(gmi_with(&root, &options), "=> kota.org kota\n\n");
    }

    #[test]
    fn test_wiki_link_curly_flow_in_prose() {
        let options = RenderOptions {
            paragraph_link: ParagraphLink::CurlyBelow,
            ..RenderOptions::default()
        };
        let root = doc(vec![Node::paragraph(vec![
            Node::text("see "),
            Node::wiki_link("page", vec![Node::text("page")]),
            Node::text(" link."),
        ])]);
        assert_eq!(
            gmi_with(&root, &options),
            "see {page} link.\n\n=> page {page}\n\n"
        );
    }

    #[test]
    fn test_link_inside_blockquote_renders_as_link_line() {
        let root = doc(vec![Node::blockquote(vec![Node::paragraph(vec![
            Node::link("https://x/", vec![Node::text("x")]),
        ])])]);
        assert_eq!(gmi(&root), "> => https://x/ x\n\n");
    }

    #[test]
    fn test_render_is_deterministic() {
        let root = doc(vec![
            Node::heading(1, vec![Node::link("https://x/", vec![Node::text("x")])]),
            Node::paragraph(vec![
                Node::text("prose "),
                Node::link("https://y/", vec![Node::text("y")]),
            ]),
            Node::list(
                true,
                vec![
                    Node::list_item(vec![Node::text("a")]),
                    Node::list_item(vec![Node::text("b")]),
                ],
            ),
        ]);
        let options = RenderOptions::default();
        assert_eq!(to_gemtext(&root, &options), to_gemtext(&root, &options));
    }

    #[test]
    fn test_write_failure_aborts() {
        struct FailingSink;
        impl Write for FailingSink {
            fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
                Err(std::io::Error::other("sink closed"))
            }
            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        let root = doc(vec![Node::paragraph(vec![Node::text("x")])]);
        let err = render(FailingSink, &root, &RenderOptions::default());
        assert!(matches!(err, Err(RenderError::Write(_))));
    }
}
