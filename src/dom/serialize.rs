//! HTML serialization of arena subtrees through html5ever's serializer.

use std::io;

use html5ever::serialize::{Serialize, SerializeOpts, Serializer, TraversalScope, serialize};

use super::arena::{ArenaDom, ArenaNodeData, ArenaNodeId};

/// A borrowed view of one arena node that html5ever can serialize.
struct NodeRef<'a> {
    dom: &'a ArenaDom,
    id: ArenaNodeId,
}

impl Serialize for NodeRef<'_> {
    fn serialize<S>(&self, serializer: &mut S, traversal_scope: TraversalScope) -> io::Result<()>
    where
        S: Serializer,
    {
        let Some(node) = self.dom.get(self.id) else {
            return Ok(());
        };
        let include_self = matches!(traversal_scope, TraversalScope::IncludeNode);

        match &node.data {
            ArenaNodeData::Element { name, attrs } if include_self => {
                serializer.start_elem(
                    name.clone(),
                    attrs.iter().map(|a| (&a.name, a.value.as_str())),
                )?;
                self.serialize_children(serializer)?;
                serializer.end_elem(name.clone())
            }
            ArenaNodeData::Text(text) if include_self => serializer.write_text(text),
            ArenaNodeData::Comment(text) if include_self => serializer.write_comment(text),
            _ => self.serialize_children(serializer),
        }
    }
}

impl NodeRef<'_> {
    fn serialize_children<S: Serializer>(&self, serializer: &mut S) -> io::Result<()> {
        for child in self.dom.children(self.id) {
            NodeRef { dom: self.dom, id: child }.serialize(serializer, TraversalScope::IncludeNode)?;
        }
        Ok(())
    }
}

fn to_string(dom: &ArenaDom, id: ArenaNodeId, traversal_scope: TraversalScope) -> String {
    let mut bytes = Vec::new();
    let opts = SerializeOpts {
        traversal_scope,
        ..Default::default()
    };
    // Writing into a Vec cannot fail
    if serialize(&mut bytes, &NodeRef { dom, id }, opts).is_err() {
        return String::new();
    }
    String::from_utf8(bytes).unwrap_or_default()
}

/// Serialize a node and its subtree to an HTML string.
pub fn serialize_node(dom: &ArenaDom, id: ArenaNodeId) -> String {
    to_string(dom, id, TraversalScope::IncludeNode)
}

/// Serialize only the children of a node (its "inner HTML").
pub fn serialize_children(dom: &ArenaDom, id: ArenaNodeId) -> String {
    to_string(dom, id, TraversalScope::ChildrenOnly(None))
}
