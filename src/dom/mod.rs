//! Document tree: parsing, traversal, mutation and serialization.
//!
//! The editable surface, the normalizer and the complex-word marker all work
//! on the same arena-allocated tree. HTML enters through html5ever's tree
//! builder (so pasted markup is repaired exactly like a browser would) and
//! leaves through html5ever's serializer.
//!
//! # Example
//!
//! ```
//! use plume::dom::{parse_fragment, serialize_children};
//!
//! let fragment = parse_fragment("<p>Bonjour <b>monde</b></p>");
//! assert_eq!(
//!     serialize_children(&fragment.dom, fragment.body),
//!     "<p>Bonjour <b>monde</b></p>"
//! );
//! ```

mod arena;
pub mod predicates;
mod serialize;
mod tree_sink;

pub use arena::{ArenaDom, ArenaNode, ArenaNodeData, ArenaNodeId, Attribute, html_name};
pub(crate) use arena::byte_offset;
pub use serialize::{serialize_children, serialize_node};

use html5ever::driver::ParseOpts;
use html5ever::parse_document;
use html5ever::tendril::TendrilSink;

use tree_sink::ArenaSink;

/// A parsed HTML fragment: the owning tree plus the `<body>` that holds the content.
#[derive(Debug)]
pub struct Fragment {
    pub dom: ArenaDom,
    pub body: ArenaNodeId,
}

impl Fragment {
    /// Serialize the fragment content back to HTML.
    pub fn inner_html(&self) -> String {
        serialize_children(&self.dom, self.body)
    }
}

/// Parse a fragment of HTML (not a full document).
///
/// The fragment is wrapped in a minimal document so the tree builder puts
/// its content under `<body>`. If the parser produced no body (it always
/// does for HTML input), the document root stands in for it.
pub fn parse_fragment(html: &str) -> Fragment {
    let wrapped = format!("<!DOCTYPE html><html><head></head><body>{html}</body></html>");
    let sink = parse_document(ArenaSink::new(), ParseOpts::default())
        .from_utf8()
        .one(wrapped.as_bytes());
    if sink.parse_errors() > 0 {
        log::debug!("fragment needed {} markup repairs", sink.parse_errors());
    }
    let dom = sink.into_dom();
    let body = dom.find_by_tag("body").unwrap_or_else(|| dom.document());
    Fragment { dom, body }
}
