//! Arena-based DOM for editable content.
//!
//! This module provides an arena-allocated DOM tree that html5ever can parse
//! into and that the normalizer, the complex-word marker and the editing
//! primitives rewrite in place. Nodes are never freed: detaching a node only
//! unlinks it, so ids held by a selection stay valid (if orphaned) across
//! mutations.

use html5ever::{LocalName, QualName, ns};
use serde::Serialize;

use super::predicates::is_block_tag;

/// Unique identifier for a node in the arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ArenaNodeId(pub u32);

impl ArenaNodeId {
    /// Sentinel value for no node.
    pub const NONE: ArenaNodeId = ArenaNodeId(u32::MAX);

    /// Check if this is a valid node ID.
    pub fn is_some(&self) -> bool {
        self.0 != u32::MAX
    }

    /// Check if this is the sentinel value.
    pub fn is_none(&self) -> bool {
        self.0 == u32::MAX
    }

    fn option(self) -> Option<ArenaNodeId> {
        self.is_some().then_some(self)
    }
}

/// Node type in the arena DOM.
#[derive(Debug, Clone)]
pub enum ArenaNodeData {
    /// Document root.
    Document,
    /// Element with name and attributes.
    Element {
        name: QualName,
        attrs: Vec<Attribute>,
    },
    /// Text content.
    Text(String),
    /// Comment, kept so editor snapshots round-trip.
    Comment(String),
}

/// HTML attribute.
#[derive(Debug, Clone)]
pub struct Attribute {
    pub name: QualName,
    pub value: String,
}

impl Attribute {
    /// Create a no-namespace attribute, the kind HTML elements carry.
    pub fn new(name: &str, value: impl Into<String>) -> Self {
        Self {
            name: QualName::new(None, ns!(), LocalName::from(name)),
            value: value.into(),
        }
    }
}

/// Build the qualified name of an HTML element.
pub fn html_name(tag: &str) -> QualName {
    QualName::new(None, ns!(html), LocalName::from(tag))
}

/// A node in the arena DOM.
#[derive(Debug)]
pub struct ArenaNode {
    pub data: ArenaNodeData,
    pub parent: ArenaNodeId,
    pub first_child: ArenaNodeId,
    pub last_child: ArenaNodeId,
    pub prev_sibling: ArenaNodeId,
    pub next_sibling: ArenaNodeId,
}

impl ArenaNode {
    /// Create a new node with the given data.
    fn new(data: ArenaNodeData) -> Self {
        Self {
            data,
            parent: ArenaNodeId::NONE,
            first_child: ArenaNodeId::NONE,
            last_child: ArenaNodeId::NONE,
            prev_sibling: ArenaNodeId::NONE,
            next_sibling: ArenaNodeId::NONE,
        }
    }
}

/// Arena-based DOM tree.
///
/// All nodes are stored in a contiguous vector for cache-friendly traversal.
/// Parent/child/sibling links use indices into this vector.
#[derive(Debug)]
pub struct ArenaDom {
    /// All nodes in the arena.
    nodes: Vec<ArenaNode>,
    /// Document root ID.
    document: ArenaNodeId,
}

impl ArenaDom {
    /// Create a new empty DOM with a document root.
    pub fn new() -> Self {
        let mut dom = Self {
            nodes: Vec::new(),
            document: ArenaNodeId::NONE,
        };
        dom.document = dom.alloc(ArenaNode::new(ArenaNodeData::Document));
        dom
    }

    /// Allocate a new node in the arena.
    fn alloc(&mut self, node: ArenaNode) -> ArenaNodeId {
        let id = ArenaNodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Get the document root ID.
    pub fn document(&self) -> ArenaNodeId {
        self.document
    }

    /// Get a node by ID.
    pub fn get(&self, id: ArenaNodeId) -> Option<&ArenaNode> {
        if id.is_none() {
            return None;
        }
        self.nodes.get(id.0 as usize)
    }

    /// Get a mutable node by ID.
    pub fn get_mut(&mut self, id: ArenaNodeId) -> Option<&mut ArenaNode> {
        if id.is_none() {
            return None;
        }
        self.nodes.get_mut(id.0 as usize)
    }

    /// Create a new element node.
    pub fn create_element(&mut self, name: QualName, attrs: Vec<Attribute>) -> ArenaNodeId {
        self.alloc(ArenaNode::new(ArenaNodeData::Element { name, attrs }))
    }

    /// Create an HTML element by tag name, without attributes.
    pub fn create_html_element(&mut self, tag: &str) -> ArenaNodeId {
        self.create_element(html_name(tag), Vec::new())
    }

    /// Create a new text node.
    pub fn create_text(&mut self, text: String) -> ArenaNodeId {
        self.alloc(ArenaNode::new(ArenaNodeData::Text(text)))
    }

    /// Create a new comment node.
    pub fn create_comment(&mut self, text: String) -> ArenaNodeId {
        self.alloc(ArenaNode::new(ArenaNodeData::Comment(text)))
    }

    /// Append a child to a parent node.
    ///
    /// The child is detached from its current position first.
    pub fn append(&mut self, parent: ArenaNodeId, child: ArenaNodeId) {
        self.detach(child);

        let last_child = self
            .get(parent)
            .map(|n| n.last_child)
            .unwrap_or(ArenaNodeId::NONE);

        if let Some(child_node) = self.get_mut(child) {
            child_node.parent = parent;
            child_node.prev_sibling = last_child;
        }

        if last_child.is_some()
            && let Some(last_node) = self.get_mut(last_child)
        {
            last_node.next_sibling = child;
        }

        if let Some(parent_node) = self.get_mut(parent) {
            if parent_node.first_child.is_none() {
                parent_node.first_child = child;
            }
            parent_node.last_child = child;
        }
    }

    /// Insert a node before a sibling.
    ///
    /// The new node is detached from its current position first.
    pub fn insert_before(&mut self, sibling: ArenaNodeId, new_node: ArenaNodeId) {
        if sibling == new_node {
            return;
        }
        self.detach(new_node);

        let parent = self
            .get(sibling)
            .map(|n| n.parent)
            .unwrap_or(ArenaNodeId::NONE);
        let prev = self
            .get(sibling)
            .map(|n| n.prev_sibling)
            .unwrap_or(ArenaNodeId::NONE);

        if let Some(new) = self.get_mut(new_node) {
            new.parent = parent;
            new.prev_sibling = prev;
            new.next_sibling = sibling;
        }

        if let Some(sib) = self.get_mut(sibling) {
            sib.prev_sibling = new_node;
        }

        if prev.is_some() {
            if let Some(p) = self.get_mut(prev) {
                p.next_sibling = new_node;
            }
        } else if let Some(par) = self.get_mut(parent) {
            par.first_child = new_node;
        }
    }

    /// Insert a node right after a sibling.
    pub fn insert_after(&mut self, sibling: ArenaNodeId, new_node: ArenaNodeId) {
        if sibling == new_node {
            return;
        }
        match self.next_sibling(sibling) {
            Some(next) => self.insert_before(next, new_node),
            None => {
                if let Some(parent) = self.parent(sibling) {
                    self.append(parent, new_node);
                }
            }
        }
    }

    /// Append text to an existing text node, or create new if last child isn't text.
    pub fn append_text(&mut self, parent: ArenaNodeId, text: &str) {
        let last_child = self
            .get(parent)
            .map(|n| n.last_child)
            .unwrap_or(ArenaNodeId::NONE);

        if let Some(last) = self.get_mut(last_child)
            && let ArenaNodeData::Text(ref mut existing) = last.data
        {
            existing.push_str(text);
            return;
        }

        let text_node = self.create_text(text.to_string());
        self.append(parent, text_node);
    }

    /// Unlink a node from its parent and siblings.
    ///
    /// The node keeps its own children, so a detached subtree can be
    /// re-inserted elsewhere.
    pub fn detach(&mut self, target: ArenaNodeId) {
        let (parent, prev, next) = match self.get(target) {
            Some(n) => (n.parent, n.prev_sibling, n.next_sibling),
            None => return,
        };

        if prev.is_some() {
            if let Some(p) = self.get_mut(prev) {
                p.next_sibling = next;
            }
        } else if let Some(p) = self.get_mut(parent) {
            p.first_child = next;
        }

        if next.is_some() {
            if let Some(n) = self.get_mut(next) {
                n.prev_sibling = prev;
            }
        } else if let Some(p) = self.get_mut(parent) {
            p.last_child = prev;
        }

        if let Some(node) = self.get_mut(target) {
            node.parent = ArenaNodeId::NONE;
            node.prev_sibling = ArenaNodeId::NONE;
            node.next_sibling = ArenaNodeId::NONE;
        }
    }

    /// Dissolve an element: move its children into its place and detach it.
    ///
    /// Returns the moved children in order.
    pub fn replace_with_children(&mut self, node: ArenaNodeId) -> Vec<ArenaNodeId> {
        let children: Vec<_> = self.children(node).collect();
        if self.parent(node).is_none() {
            return children;
        }
        for &child in &children {
            self.insert_before(node, child);
        }
        self.detach(node);
        children
    }

    /// Put `node` inside `wrapper`, with the wrapper taking node's place.
    pub fn wrap(&mut self, node: ArenaNodeId, wrapper: ArenaNodeId) {
        self.insert_before(node, wrapper);
        self.append(wrapper, node);
    }

    /// Copy an element's name and attributes into a new, childless element.
    pub fn shallow_clone(&mut self, id: ArenaNodeId) -> Option<ArenaNodeId> {
        let ArenaNodeData::Element { name, attrs } = &self.get(id)?.data else {
            return None;
        };
        let (name, attrs) = (name.clone(), attrs.clone());
        Some(self.create_element(name, attrs))
    }

    /// Move every child of `from` to the end of `to`.
    pub fn move_children(&mut self, from: ArenaNodeId, to: ArenaNodeId) {
        let children: Vec<_> = self.children(from).collect();
        for child in children {
            self.append(to, child);
        }
    }

    /// Split a text node at a character offset.
    ///
    /// The original node keeps the left part; the right part becomes a new
    /// text node inserted right after it, whose id is returned. Returns
    /// `None` if `id` is not a text node.
    pub fn split_text(&mut self, id: ArenaNodeId, char_offset: usize) -> Option<ArenaNodeId> {
        let right = match self.get_mut(id).map(|n| &mut n.data) {
            Some(ArenaNodeData::Text(text)) => {
                let byte = byte_offset(text, char_offset);
                text.split_off(byte)
            }
            _ => return None,
        };
        let right_id = self.create_text(right);
        if self.parent(id).is_some() {
            self.insert_after(id, right_id);
        }
        Some(right_id)
    }

    /// Merge adjacent text nodes and drop empty ones in a subtree.
    pub fn merge_text(&mut self, parent: ArenaNodeId) {
        let mut cursor = self.first_child(parent);
        while let Some(current) = cursor {
            if self.is_text(current) {
                while let Some(next) = self.next_sibling(current).filter(|&n| self.is_text(n)) {
                    let tail = self.text(next).unwrap_or_default().to_string();
                    if let Some(ArenaNodeData::Text(text)) = self.get_mut(current).map(|n| &mut n.data)
                    {
                        text.push_str(&tail);
                    }
                    self.detach(next);
                }
                let next = self.next_sibling(current);
                if self.text(current).is_some_and(str::is_empty) {
                    self.detach(current);
                }
                cursor = next;
            } else {
                self.merge_text(current);
                cursor = self.next_sibling(current);
            }
        }
    }

    pub fn parent(&self, id: ArenaNodeId) -> Option<ArenaNodeId> {
        self.get(id).and_then(|n| n.parent.option())
    }

    pub fn first_child(&self, id: ArenaNodeId) -> Option<ArenaNodeId> {
        self.get(id).and_then(|n| n.first_child.option())
    }

    pub fn last_child(&self, id: ArenaNodeId) -> Option<ArenaNodeId> {
        self.get(id).and_then(|n| n.last_child.option())
    }

    pub fn next_sibling(&self, id: ArenaNodeId) -> Option<ArenaNodeId> {
        self.get(id).and_then(|n| n.next_sibling.option())
    }

    pub fn prev_sibling(&self, id: ArenaNodeId) -> Option<ArenaNodeId> {
        self.get(id).and_then(|n| n.prev_sibling.option())
    }

    /// Iterate over children of a node.
    pub fn children(&self, parent: ArenaNodeId) -> ChildrenIter<'_> {
        let first = self
            .get(parent)
            .map(|n| n.first_child)
            .unwrap_or(ArenaNodeId::NONE);
        ChildrenIter {
            dom: self,
            current: first,
        }
    }

    /// Iterate from a node's parent up to the document root.
    pub fn ancestors(&self, id: ArenaNodeId) -> AncestorsIter<'_> {
        AncestorsIter {
            dom: self,
            current: self.get(id).map(|n| n.parent).unwrap_or(ArenaNodeId::NONE),
        }
    }

    /// Position of a node among its siblings.
    pub fn child_index(&self, id: ArenaNodeId) -> Option<usize> {
        let parent = self.parent(id)?;
        self.children(parent).position(|c| c == id)
    }

    /// Check whether `node` is `root` or lies inside it.
    pub fn contains(&self, root: ArenaNodeId, node: ArenaNodeId) -> bool {
        node == root || self.ancestors(node).any(|a| a == root)
    }

    /// All nodes of a subtree in document order, the root included.
    pub fn preorder(&self, root: ArenaNodeId) -> Vec<ArenaNodeId> {
        let mut out = Vec::new();
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            if self.get(id).is_none() {
                continue;
            }
            out.push(id);
            let mut children: Vec<_> = self.children(id).collect();
            children.reverse();
            stack.extend(children);
        }
        out
    }

    /// First element with the given tag, in document order.
    pub fn find_by_tag(&self, tag: &str) -> Option<ArenaNodeId> {
        self.preorder(self.document)
            .into_iter()
            .find(|&id| self.is_tag(id, tag))
    }

    /// Nearest ancestor-or-self element whose tag is one of `tags`, stopping at `root`.
    pub fn closest(
        &self,
        from: ArenaNodeId,
        root: ArenaNodeId,
        tags: &[&str],
    ) -> Option<ArenaNodeId> {
        std::iter::once(from)
            .chain(self.ancestors(from))
            .take_while(|&id| id != root)
            .find(|&id| self.local_name(id).is_some_and(|n| tags.contains(&n)))
    }
}

impl Default for ArenaDom {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over children of a node.
pub struct ChildrenIter<'a> {
    dom: &'a ArenaDom,
    current: ArenaNodeId,
}

impl Iterator for ChildrenIter<'_> {
    type Item = ArenaNodeId;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current.is_none() {
            return None;
        }
        let id = self.current;
        self.current = self
            .dom
            .get(id)
            .map(|n| n.next_sibling)
            .unwrap_or(ArenaNodeId::NONE);
        Some(id)
    }
}

/// Iterator over the ancestors of a node, nearest first.
pub struct AncestorsIter<'a> {
    dom: &'a ArenaDom,
    current: ArenaNodeId,
}

impl Iterator for AncestorsIter<'_> {
    type Item = ArenaNodeId;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current.is_none() {
            return None;
        }
        let id = self.current;
        self.current = self
            .dom
            .get(id)
            .map(|n| n.parent)
            .unwrap_or(ArenaNodeId::NONE);
        Some(id)
    }
}

/// Convenience methods for element and text nodes.
impl ArenaDom {
    /// Tag name of an element.
    pub fn local_name(&self, id: ArenaNodeId) -> Option<&str> {
        match &self.get(id)?.data {
            ArenaNodeData::Element { name, .. } => Some(name.local.as_ref()),
            _ => None,
        }
    }

    /// Check if node is an element with the given tag.
    pub fn is_tag(&self, id: ArenaNodeId, tag: &str) -> bool {
        self.local_name(id) == Some(tag)
    }

    /// Element attributes, empty for non-elements.
    pub fn attrs(&self, id: ArenaNodeId) -> &[Attribute] {
        self.get(id)
            .and_then(|n| match &n.data {
                ArenaNodeData::Element { attrs, .. } => Some(attrs.as_slice()),
                _ => None,
            })
            .unwrap_or(&[])
    }

    /// Get an attribute value.
    pub fn get_attr(&self, id: ArenaNodeId, attr_name: &str) -> Option<&str> {
        self.attrs(id)
            .iter()
            .find(|a| a.name.local.as_ref() == attr_name)
            .map(|a| a.value.as_str())
    }

    /// Set (or replace) an attribute value.
    pub fn set_attr(&mut self, id: ArenaNodeId, attr: &str, value: impl Into<String>) {
        let value = value.into();
        if let Some(ArenaNodeData::Element { attrs, .. }) = self.get_mut(id).map(|n| &mut n.data) {
            match attrs.iter_mut().find(|a| a.name.local.as_ref() == attr) {
                Some(existing) => existing.value = value,
                None => attrs.push(Attribute::new(attr, value)),
            }
        }
    }

    /// Remove an attribute, returning its old value.
    pub fn remove_attr(&mut self, id: ArenaNodeId, attr: &str) -> Option<String> {
        if let Some(ArenaNodeData::Element { attrs, .. }) = self.get_mut(id).map(|n| &mut n.data) {
            let pos = attrs.iter().position(|a| a.name.local.as_ref() == attr)?;
            return Some(attrs.remove(pos).value);
        }
        None
    }

    /// Check whether an element carries a class.
    pub fn has_class(&self, id: ArenaNodeId, class: &str) -> bool {
        self.get_attr(id, "class")
            .is_some_and(|classes| classes.split_whitespace().any(|c| c == class))
    }

    /// Check if node is an element.
    pub fn is_element(&self, id: ArenaNodeId) -> bool {
        self.get(id)
            .is_some_and(|n| matches!(n.data, ArenaNodeData::Element { .. }))
    }

    /// Check if node is a text node.
    pub fn is_text(&self, id: ArenaNodeId) -> bool {
        self.get(id)
            .is_some_and(|n| matches!(n.data, ArenaNodeData::Text(_)))
    }

    /// Get the content of a text node.
    pub fn text(&self, id: ArenaNodeId) -> Option<&str> {
        self.get(id).and_then(|n| match &n.data {
            ArenaNodeData::Text(s) => Some(s.as_str()),
            _ => None,
        })
    }

    /// Replace the content of a text node.
    pub fn set_text(&mut self, id: ArenaNodeId, value: impl Into<String>) {
        if let Some(ArenaNodeData::Text(text)) = self.get_mut(id).map(|n| &mut n.data) {
            *text = value.into();
        }
    }

    /// Length of a node in selection units: chars for text, children otherwise.
    pub fn node_length(&self, id: ArenaNodeId) -> usize {
        match self.text(id) {
            Some(text) => text.chars().count(),
            None => self.children(id).count(),
        }
    }

    /// Concatenated text of every text node in a subtree.
    pub fn text_content(&self, id: ArenaNodeId) -> String {
        self.preorder(id)
            .into_iter()
            .filter_map(|n| self.text(n))
            .collect()
    }

    /// Text of a subtree with line breaks around block elements.
    ///
    /// Unlike [`text_content`](Self::text_content), words of adjacent
    /// paragraphs are never glued together.
    pub fn plain_text(&self, id: ArenaNodeId) -> String {
        let mut out = String::new();
        self.push_plain_text(id, &mut out);
        out
    }

    fn push_plain_text(&self, id: ArenaNodeId, out: &mut String) {
        if let Some(text) = self.text(id) {
            out.push_str(text);
            return;
        }
        let tag = self.local_name(id);
        if tag == Some("br") {
            out.push('\n');
            return;
        }
        let block = tag.is_some_and(is_block_tag);
        if block {
            out.push('\n');
        }
        for child in self.children(id) {
            self.push_plain_text(child, out);
        }
        if block {
            out.push('\n');
        }
    }
}

/// Byte index of the `char_offset`-th character, clamped to the string end.
pub(crate) fn byte_offset(text: &str, char_offset: usize) -> usize {
    text.char_indices()
        .nth(char_offset)
        .map(|(b, _)| b)
        .unwrap_or(text.len())
}
