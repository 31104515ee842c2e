//! Link classification and destination rewriting
//!
//! Gemtext cannot express inline links; whether a heading or paragraph
//! is "really a list of links" decides its whole rendering, so the
//! predicate lives here as one shared routine and is applied to the
//! same child scan the emission loops use.

use md2gmi_tree::Node;

use crate::config::{LinkKind, LinkReplacer};

/// True when the node list holds at least one link-kind node and no
/// non-empty text.
pub fn link_only(children: &[Node]) -> bool {
    let mut has_link = false;
    let mut has_text = false;
    for child in children {
        match child {
            Node::Link(_) | Node::AutoLink(_) | Node::WikiLink(_) => has_link = true,
            Node::Text(t) if !t.value.is_empty() => has_text = true,
            _ => {}
        }
    }
    has_link && !has_text
}

/// Apply every replacer whose kind matches, in list order, replacing
/// all non-overlapping pattern matches in the destination.
pub fn rewrite_destination(url: &str, kind: LinkKind, replacers: &[LinkReplacer]) -> String {
    let mut dest = String::from(url);
    for replacer in replacers {
        if replacer.kind == kind {
            dest = replacer
                .pattern
                .replace_all(&dest, replacer.replacement.as_str())
                .into_owned();
        }
    }
    dest
}
