//! Selection positions and ranges over the document tree.
//!
//! A [`Position`] is a boundary point the way an editing surface reports
//! it: a character offset when the node is text, a child index otherwise.
//! Positions are compared in document order through the chain of child
//! indices leading to them, so they stay comparable after the tree is
//! rewritten as long as the node they name is still attached.

use std::cmp::Ordering;

use serde::Serialize;

use crate::dom::{ArenaDom, ArenaNodeId, Attribute, html_name};

/// A boundary point inside the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Position {
    pub node: ArenaNodeId,
    pub offset: usize,
}

impl Position {
    pub fn new(node: ArenaNodeId, offset: usize) -> Self {
        Self { node, offset }
    }

    /// The boundary right before `node` in its parent.
    pub fn before(dom: &ArenaDom, node: ArenaNodeId) -> Option<Self> {
        Some(Self::new(dom.parent(node)?, dom.child_index(node)?))
    }

    /// The boundary right after `node` in its parent.
    pub fn after(dom: &ArenaDom, node: ArenaNodeId) -> Option<Self> {
        Some(Self::new(dom.parent(node)?, dom.child_index(node)? + 1))
    }

    /// The same position with the offset clamped to the node length.
    pub fn clamped(self, dom: &ArenaDom) -> Self {
        Self::new(self.node, self.offset.min(dom.node_length(self.node)))
    }

    /// The nearest element at or above this position.
    pub fn element(self, dom: &ArenaDom) -> Option<ArenaNodeId> {
        if dom.is_element(self.node) {
            Some(self.node)
        } else {
            dom.parent(self.node)
        }
    }

    /// Sort key: child indices from the document root, then the offset.
    fn key(self, dom: &ArenaDom) -> Vec<usize> {
        let mut key = Vec::new();
        let mut current = self.node;
        while let (Some(parent), Some(index)) = (dom.parent(current), dom.child_index(current)) {
            key.push(index);
            current = parent;
        }
        key.reverse();
        key.push(self.offset);
        key
    }
}

/// Compare two positions in document order.
pub fn compare(dom: &ArenaDom, a: Position, b: Position) -> Ordering {
    if a == b {
        return Ordering::Equal;
    }
    a.key(dom).cmp(&b.key(dom))
}

/// A selection: where the user started (`anchor`) and where they are (`focus`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SelectionRange {
    pub anchor: Position,
    pub focus: Position,
}

impl SelectionRange {
    pub fn new(anchor: Position, focus: Position) -> Self {
        Self { anchor, focus }
    }

    /// A caret.
    pub fn collapsed(at: Position) -> Self {
        Self::new(at, at)
    }

    /// Select `node` as a whole.
    pub fn around(dom: &ArenaDom, node: ArenaNodeId) -> Option<Self> {
        Some(Self::new(Position::before(dom, node)?, Position::after(dom, node)?))
    }

    /// Select the contents of `node`.
    pub fn contents(dom: &ArenaDom, node: ArenaNodeId) -> Self {
        Self::new(Position::new(node, 0), Position::new(node, dom.node_length(node)))
    }

    pub fn is_collapsed(&self) -> bool {
        self.anchor == self.focus
    }

    /// Start and end in document order.
    pub fn ordered(&self, dom: &ArenaDom) -> (Position, Position) {
        match compare(dom, self.anchor, self.focus) {
            Ordering::Greater => (self.focus, self.anchor),
            _ => (self.anchor, self.focus),
        }
    }

    pub fn start(&self, dom: &ArenaDom) -> Position {
        self.ordered(dom).0
    }

    pub fn end(&self, dom: &ArenaDom) -> Position {
        self.ordered(dom).1
    }
}

/// A covered slice of one text node, in chars.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextSlice {
    pub node: ArenaNodeId,
    pub start: usize,
    pub end: usize,
}

/// Text slices of `root` covered by `range`, in document order.
///
/// Empty slices are left out. The tree is not modified.
pub fn text_nodes_in_range(
    dom: &ArenaDom,
    root: ArenaNodeId,
    range: &SelectionRange,
) -> Vec<TextSlice> {
    let (start, end) = range.ordered(dom);
    let (start_key, end_key) = (start.key(dom), end.key(dom));

    dom.preorder(root)
        .into_iter()
        .filter_map(|node| {
            let len = dom.text(node)?.chars().count();
            if start_key >= Position::new(node, len).key(dom)
                || end_key <= Position::new(node, 0).key(dom)
            {
                return None;
            }
            let from = if start.node == node { start.offset.min(len) } else { 0 };
            let to = if end.node == node { end.offset.min(len) } else { len };
            (from < to).then_some(TextSlice {
                node,
                start: from,
                end: to,
            })
        })
        .collect()
}

/// The text covered by `range`.
pub fn selected_text(dom: &ArenaDom, root: ArenaNodeId, range: &SelectionRange) -> String {
    text_nodes_in_range(dom, root, range)
        .into_iter()
        .filter_map(|slice| {
            let text = dom.text(slice.node)?;
            Some(
                text.chars()
                    .skip(slice.start)
                    .take(slice.end - slice.start)
                    .collect::<String>(),
            )
        })
        .collect()
}

/// Split text nodes at the range boundaries.
///
/// Returns the text nodes now lying wholly inside the range.
pub fn split_range(dom: &mut ArenaDom, root: ArenaNodeId, range: &SelectionRange) -> Vec<ArenaNodeId> {
    let slices = text_nodes_in_range(dom, root, range);
    let mut covered = Vec::with_capacity(slices.len());
    for slice in slices {
        let len = dom.node_length(slice.node);
        if slice.end < len {
            dom.split_text(slice.node, slice.end);
        }
        let node = if slice.start > 0 {
            match dom.split_text(slice.node, slice.start) {
                Some(right) => right,
                None => continue,
            }
        } else {
            slice.node
        };
        covered.push(node);
    }
    covered
}

/// Insert `node` at a boundary point, splitting a text node if needed.
pub fn insert_at(dom: &mut ArenaDom, at: Position, node: ArenaNodeId) {
    if let Some(text) = dom.text(at.node) {
        let len = text.chars().count();
        if at.offset == 0 {
            dom.insert_before(at.node, node);
        } else {
            if at.offset < len {
                dom.split_text(at.node, at.offset);
            }
            dom.insert_after(at.node, node);
        }
        return;
    }
    match dom.children(at.node).nth(at.offset) {
        Some(child) => dom.insert_before(child, node),
        None => dom.append(at.node, node),
    }
}

/// Attribute naming a caret bracket.
const BRACKET_ATTR: &str = "data-caret";

/// Transient markers around a selection, surviving tree rewrites.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Brackets {
    pub start: ArenaNodeId,
    pub end: ArenaNodeId,
}

impl Brackets {
    /// Insert empty marker elements at both ends of `range`.
    pub fn insert(dom: &mut ArenaDom, range: &SelectionRange) -> Self {
        let (start, end) = range.ordered(dom);
        let end_marker = marker(dom, "end");
        let start_marker = marker(dom, "start");
        if start == end {
            insert_at(dom, start, start_marker);
            dom.insert_after(start_marker, end_marker);
        } else {
            insert_at(dom, end, end_marker);
            insert_at(dom, start, start_marker);
        }
        Self {
            start: start_marker,
            end: end_marker,
        }
    }

    /// The range between the markers, or `None` if a marker was detached.
    pub fn inner_range(&self, dom: &ArenaDom) -> Option<SelectionRange> {
        Some(SelectionRange::new(
            Position::after(dom, self.start)?,
            Position::before(dom, self.end)?,
        ))
    }

    /// Remove the markers, returning a caret at the end one.
    ///
    /// The caret lands at the end of the deepest last text before the end
    /// marker, so it stays inside a formatting element that was just wrapped
    /// around the selection.
    pub fn remove(self, dom: &mut ArenaDom) -> Option<Position> {
        let caret = caret_before(dom, self.end);
        dom.detach(self.start);
        dom.detach(self.end);
        caret.map(|p| p.clamped(dom))
    }
}

fn marker(dom: &mut ArenaDom, which: &str) -> ArenaNodeId {
    dom.create_element(html_name("span"), vec![Attribute::new(BRACKET_ATTR, which)])
}

/// Check whether a node is a caret bracket.
pub fn is_bracket(dom: &ArenaDom, node: ArenaNodeId) -> bool {
    dom.get_attr(node, BRACKET_ATTR).is_some()
}

fn caret_before(dom: &ArenaDom, node: ArenaNodeId) -> Option<Position> {
    let mut current = dom.prev_sibling(node);
    while let Some(id) = current {
        if let Some(text) = dom.text(id) {
            return Some(Position::new(id, text.chars().count()));
        }
        if is_bracket(dom, id) || !dom.is_element(id) {
            break;
        }
        match dom.last_child(id) {
            Some(last) => current = Some(last),
            None => return Some(Position::new(id, 0)),
        }
    }
    let parent = dom.parent(node)?;
    let index = dom.child_index(node)?;
    // The marker itself is about to go away
    let skipped = dom
        .children(parent)
        .take(index)
        .filter(|&c| is_bracket(dom, c))
        .count();
    Some(Position::new(parent, index - skipped))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{parse_fragment, serialize_children};

    fn first_text(dom: &ArenaDom, root: ArenaNodeId, needle: &str) -> ArenaNodeId {
        dom.preorder(root)
            .into_iter()
            .find(|&id| dom.text(id).is_some_and(|t| t.contains(needle)))
            .unwrap()
    }

    #[test]
    fn test_document_order() {
        let f = parse_fragment("<p>un</p><p>deux</p>");
        let un = first_text(&f.dom, f.body, "un");
        let deux = first_text(&f.dom, f.body, "deux");

        assert_eq!(
            compare(&f.dom, Position::new(un, 2), Position::new(deux, 0)),
            Ordering::Less
        );
        assert_eq!(
            compare(&f.dom, Position::new(f.body, 1), Position::new(un, 1)),
            Ordering::Greater
        );
        assert_eq!(
            compare(&f.dom, Position::new(f.body, 0), Position::new(un, 0)),
            Ordering::Less
        );

        let backwards = SelectionRange::new(Position::new(deux, 1), Position::new(un, 1));
        assert_eq!(backwards.start(&f.dom), Position::new(un, 1));
    }

    #[test]
    fn test_text_nodes_in_range() {
        let f = parse_fragment("<p>alpha <b>beta</b> gamma</p>");
        let alpha = first_text(&f.dom, f.body, "alpha");
        let gamma = first_text(&f.dom, f.body, "gamma");
        let range = SelectionRange::new(Position::new(alpha, 2), Position::new(gamma, 3));

        let slices = text_nodes_in_range(&f.dom, f.body, &range);
        assert_eq!(slices.len(), 3);
        assert_eq!((slices[0].start, slices[0].end), (2, 6));
        assert_eq!((slices[2].start, slices[2].end), (0, 3));
        assert_eq!(selected_text(&f.dom, f.body, &range), "pha beta ga");
    }

    #[test]
    fn test_collapsed_range_covers_nothing() {
        let f = parse_fragment("<p>texte</p>");
        let text = first_text(&f.dom, f.body, "texte");
        let caret = SelectionRange::collapsed(Position::new(text, 2));
        assert!(text_nodes_in_range(&f.dom, f.body, &caret).is_empty());
    }

    #[test]
    fn test_split_range_isolates_selection() {
        let mut f = parse_fragment("<p>bonjour monde</p>");
        let text = first_text(&f.dom, f.body, "bonjour");
        let range = SelectionRange::new(Position::new(text, 3), Position::new(text, 7));

        let covered = split_range(&mut f.dom, f.body, &range);

        assert_eq!(covered.len(), 1);
        assert_eq!(f.dom.text(covered[0]), Some("jour"));
        assert_eq!(f.dom.text_content(f.body), "bonjour monde");
    }

    #[test]
    fn test_brackets_round_trip() {
        let mut f = parse_fragment("<p>bonjour monde</p>");
        let text = first_text(&f.dom, f.body, "bonjour");
        let range = SelectionRange::new(Position::new(text, 0), Position::new(text, 7));

        let brackets = Brackets::insert(&mut f.dom, &range);
        let inner = brackets.inner_range(&f.dom).unwrap();
        assert_eq!(selected_text(&f.dom, f.body, &inner), "bonjour");

        let caret = brackets.remove(&mut f.dom).unwrap();
        assert_eq!(serialize_children(&f.dom, f.body), "<p>bonjour monde</p>");
        assert_eq!(f.dom.text(caret.node), Some("bonjour"));
        assert_eq!(caret.offset, 7);
    }

    #[test]
    fn test_selection_serializes_node_ids() {
        let range = SelectionRange::new(
            Position::new(ArenaNodeId(3), 1),
            Position::new(ArenaNodeId(5), 0),
        );
        let json = serde_json::to_string(&range).unwrap();
        assert_eq!(
            json,
            r#"{"anchor":{"node":3,"offset":1},"focus":{"node":5,"offset":0}}"#
        );
    }
}
