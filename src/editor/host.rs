//! The editing surface as seen by the state tracker.
//!
//! A host owns the document tree and the selection, and provides the native
//! formatting primitives. The tracker never edits formatting structure
//! itself: it calls [`EditingHost::exec_command`] and then repairs what the
//! primitives are known to get wrong (caret placement, block styling, link
//! attributes).

use std::fmt;

use serde::{Deserialize, Serialize};

use super::selection::SelectionRange;
use crate::dom::{ArenaDom, ArenaNodeId};

/// Inline formats with a native toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InlineFormat {
    Bold,
    Italic,
    Underline,
}

impl InlineFormat {
    /// Element created when the format is applied.
    pub fn tag(self) -> &'static str {
        match self {
            InlineFormat::Bold => "b",
            InlineFormat::Italic => "i",
            InlineFormat::Underline => "u",
        }
    }

    /// Every element that renders this format.
    pub fn tags(self) -> &'static [&'static str] {
        match self {
            InlineFormat::Bold => &["b", "strong"],
            InlineFormat::Italic => &["i", "em"],
            InlineFormat::Underline => &["u"],
        }
    }
}

/// Block types produced by the block-formatting primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockKind {
    Paragraph,
    Heading(u8),
}

impl BlockKind {
    pub fn tag(self) -> &'static str {
        match self {
            BlockKind::Paragraph => "p",
            BlockKind::Heading(level) => match level {
                0 | 1 => "h1",
                2 => "h2",
                3 => "h3",
                4 => "h4",
                5 => "h5",
                _ => "h6",
            },
        }
    }
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// List types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListKind {
    Unordered,
    Ordered,
}

impl ListKind {
    pub fn tag(self) -> &'static str {
        match self {
            ListKind::Unordered => "ul",
            ListKind::Ordered => "ol",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "ul" => Some(ListKind::Unordered),
            "ol" => Some(ListKind::Ordered),
            _ => None,
        }
    }
}

/// Native formatting primitives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Bold,
    Italic,
    Underline,
    FormatBlock(BlockKind),
    InsertList(ListKind),
    CreateLink(String),
    Unlink,
    InsertText(String),
    /// Insert an image with the given source and select it.
    InsertImage(String),
}

impl From<InlineFormat> for Command {
    fn from(format: InlineFormat) -> Self {
        match format {
            InlineFormat::Bold => Command::Bold,
            InlineFormat::Italic => Command::Italic,
            InlineFormat::Underline => Command::Underline,
        }
    }
}

/// An editable surface holding a document tree and a selection.
pub trait EditingHost {
    fn dom(&self) -> &ArenaDom;

    fn dom_mut(&mut self) -> &mut ArenaDom;

    /// The editable root element.
    fn root(&self) -> ArenaNodeId;

    fn has_focus(&self) -> bool;

    /// Ask for focus. The host may refuse.
    fn focus(&mut self);

    /// The current selection, wherever it lies.
    fn selection(&self) -> Option<SelectionRange>;

    fn set_selection(&mut self, range: Option<SelectionRange>);

    /// Whether an inline format applies at the selection.
    fn query_command_state(&self, format: InlineFormat) -> bool;

    /// Run a native primitive on the current selection.
    ///
    /// Returns `false` when the primitive did nothing.
    fn exec_command(&mut self, command: Command) -> bool;

    /// The selection, if its anchor lies inside the editable root.
    fn selection_in_root(&self) -> Option<SelectionRange> {
        self.selection()
            .filter(|range| self.dom().contains(self.root(), range.anchor.node))
    }
}
