//! Content normalization: arbitrary HTML down to the allowed tag subset.
//!
//! Pasted or edited HTML carries presentation noise (wrapper `div`s,
//! `span`s with inline styles, office markup). Normalization keeps only
//! structurally meaningful tags and re-groups the loose inline content
//! into paragraphs.
//!
//! # Two-Step Flow
//!
//! 1. **Flatten**: rebuild the tree keeping allowed tags (with only their
//!    identity attributes) and dissolving everything else. Top-level
//!    content is collected into paragraph chunks; a dissolved block
//!    container or a blank line in loose text closes the current chunk.
//! 2. **Regroup**: serialize each chunk and wrap it in `<p>` (a single
//!    chunk is returned bare).
//!
//! Chunks are separate subtrees, so a paragraph boundary never falls
//! inside a tag.
//!
//! ```
//! use plume::normalize;
//!
//! assert_eq!(normalize("<div>hello</div>"), "hello");
//! assert_eq!(
//!     normalize(r#"<div style="color:red">a</div><div><span>b</span></div>"#),
//!     "<p>a</p><p>b</p>"
//! );
//! ```

use std::sync::LazyLock;

use html5ever::QualName;
use regex::Regex;

use crate::dom::predicates::{
    KEPT_ATTRIBUTES, KEPT_LINK_ATTRIBUTES, is_allowed_block, is_allowed_tag, is_block_tag,
    is_dropped_tag,
};
use crate::dom::{ArenaDom, ArenaNodeData, ArenaNodeId, Attribute, parse_fragment, serialize_children};

/// Paragraph boundary in loose text: a line break, optional blank space, another line break.
static PARAGRAPH_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n[^\S\n]*\n\s*").expect("valid paragraph regex"));

/// Blank-line whitespace inside an allowed element.
static BLANK_LINES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*\n[^\S\n]*\n\s*").expect("valid blank line regex"));

/// Normalize an HTML fragment.
///
/// Never fails: input without any usable content yields an empty string.
pub fn normalize(html: &str) -> String {
    let fragment = parse_fragment(html);
    normalize_tree(&fragment.dom, fragment.body)
}

/// Normalize the children of `root` in an existing tree.
pub fn normalize_tree(dom: &ArenaDom, root: ArenaNodeId) -> String {
    let mut flattener = Flattener {
        src: dom,
        out: ArenaDom::new(),
        chunks: Vec::new(),
        open: false,
    };
    for child in dom.children(root) {
        flattener.flatten(child, None);
    }

    let paragraphs: Vec<(String, bool)> = flattener
        .chunks
        .iter()
        .filter_map(|chunk| {
            let html = serialize_children(&flattener.out, chunk.node);
            let html = html.trim();
            (!html.is_empty()).then(|| (html.to_string(), chunk.block))
        })
        .collect();
    log::debug!("normalized into {} paragraph(s)", paragraphs.len());
    regroup(paragraphs)
}

/// One paragraph's worth of flattened content.
struct Chunk {
    node: ArenaNodeId,
    /// Holds a kept block element, emitted without a `<p>` wrapper.
    block: bool,
}

struct Flattener<'a> {
    src: &'a ArenaDom,
    out: ArenaDom,
    chunks: Vec<Chunk>,
    /// Whether the last chunk still accepts inline content.
    open: bool,
}

impl Flattener<'_> {
    /// Close the current chunk; the next inline content starts a new one.
    fn paragraph_break(&mut self) {
        self.open = false;
    }

    fn new_chunk(&mut self, block: bool) -> ArenaNodeId {
        let node = self.out.create_html_element("div");
        self.chunks.push(Chunk { node, block });
        self.open = !block;
        node
    }

    /// Container for top-level inline content.
    fn current(&mut self) -> ArenaNodeId {
        if self.open
            && let Some(chunk) = self.chunks.last()
        {
            return chunk.node;
        }
        self.new_chunk(false)
    }

    /// Copy `node` under `parent`, dissolving everything outside the allowed set.
    ///
    /// `parent` is `None` at the top level, outside any kept element.
    fn flatten(&mut self, node: ArenaNodeId, parent: Option<ArenaNodeId>) {
        let src = self.src;
        let Some(data) = src.get(node).map(|n| &n.data) else {
            return;
        };
        match data {
            ArenaNodeData::Text(text) => match parent {
                Some(parent) => {
                    let collapsed = BLANK_LINES.replace_all(text, " ");
                    self.out.append_text(parent, &collapsed);
                }
                None => {
                    for (i, piece) in PARAGRAPH_BREAK.split(text).enumerate() {
                        if i > 0 {
                            self.paragraph_break();
                        }
                        if !piece.is_empty() {
                            let chunk = self.current();
                            self.out.append_text(chunk, piece);
                        }
                    }
                }
            },
            ArenaNodeData::Element { name, attrs } => {
                let tag = name.local.as_ref();
                if is_dropped_tag(tag) {
                    return;
                }
                if is_allowed_tag(tag) {
                    self.keep(node, name, attrs, parent);
                } else if tag == "br" {
                    match parent {
                        Some(parent) => self.out.append_text(parent, " "),
                        None => {
                            let chunk = self.current();
                            self.out.append_text(chunk, "\n");
                        }
                    }
                } else if is_block_tag(tag) {
                    match parent {
                        Some(parent) => {
                            self.separate(parent);
                            for child in src.children(node) {
                                self.flatten(child, Some(parent));
                            }
                            self.out.append_text(parent, " ");
                        }
                        None => {
                            self.paragraph_break();
                            for child in src.children(node) {
                                self.flatten(child, None);
                            }
                            self.paragraph_break();
                        }
                    }
                } else {
                    for child in src.children(node) {
                        self.flatten(child, parent);
                    }
                }
            }
            ArenaNodeData::Document => {
                for child in src.children(node) {
                    self.flatten(child, parent);
                }
            }
            ArenaNodeData::Comment(_) => {}
        }
    }

    /// Space out a dissolved block from the content already in `parent`.
    fn separate(&mut self, parent: ArenaNodeId) {
        let needs_space = self.out.last_child(parent).is_some_and(|last| {
            self.out
                .text(last)
                .is_none_or(|text| !text.ends_with(char::is_whitespace))
        });
        if needs_space {
            self.out.append_text(parent, " ");
        }
    }

    fn keep(
        &mut self,
        node: ArenaNodeId,
        name: &QualName,
        attrs: &[Attribute],
        parent: Option<ArenaNodeId>,
    ) {
        let src = self.src;
        let tag = name.local.as_ref();
        let kept = attrs
            .iter()
            .filter(|a| keeps_attribute(tag, a))
            .cloned()
            .collect();
        let element = self.out.create_element(name.clone(), kept);

        let parent = match parent {
            Some(parent) => parent,
            // Top-level blocks, or inline wrappers around one, get a chunk of their own
            None if self.holds_block(node) => self.new_chunk(true),
            None => self.current(),
        };
        self.out.append(parent, element);
        for child in src.children(node) {
            self.flatten(child, Some(element));
        }
    }

    /// Check whether a kept element is, or contains, an allowed block.
    fn holds_block(&self, node: ArenaNodeId) -> bool {
        self.src
            .preorder(node)
            .into_iter()
            .filter_map(|id| self.src.local_name(id))
            .any(is_allowed_block)
    }
}

fn keeps_attribute(tag: &str, attr: &Attribute) -> bool {
    let name = attr.name.local.as_ref();
    if KEPT_ATTRIBUTES.contains(&name) {
        return true;
    }
    if tag != "a" || !KEPT_LINK_ATTRIBUTES.contains(&name) {
        return false;
    }
    // Script URLs never survive, whatever the source
    !(name == "href"
        && attr
            .value
            .trim_start()
            .to_ascii_lowercase()
            .starts_with("javascript:"))
}

/// Re-wrap paragraph chunks: none, one bare block, or N `<p>` blocks.
fn regroup(paragraphs: Vec<(String, bool)>) -> String {
    match paragraphs.len() {
        0 => String::new(),
        1 => paragraphs.into_iter().map(|(html, _)| html).collect(),
        _ => paragraphs
            .into_iter()
            .map(|(html, block)| if block { html } else { format!("<p>{html}</p>") })
            .collect(),
    }
}
