//! Active-format tracking and formatting intents.
//!
//! [`EditingState`] wraps an [`EditingHost`] and keeps an
//! [`ActiveFormats`] snapshot in step with the selection. Every intent
//! refreshes the snapshot before returning, so it never lags behind the
//! last mutation.
//!
//! Intents silently do nothing when the surface cannot take focus or has
//! no selection inside the editable root.

use serde::Serialize;

use super::host::{BlockKind, Command, EditingHost, InlineFormat, ListKind};
use super::selection::{Brackets, Position, SelectionRange};
use super::styles::apply_block_style;
use crate::dom::ArenaNodeId;
use crate::dom::predicates::heading_level;

const HEADINGS: &[&str] = &["h1", "h2", "h3", "h4", "h5", "h6"];

/// Formats applying at the current selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ActiveFormats {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub h1: bool,
    pub h2: bool,
    pub h3: bool,
    pub paragraph: bool,
    pub unordered_list: bool,
    pub ordered_list: bool,
}

impl ActiveFormats {
    /// The tracked heading level (1 to 3), if any.
    pub fn heading(&self) -> Option<u8> {
        [self.h1, self.h2, self.h3]
            .iter()
            .position(|&on| on)
            .map(|i| i as u8 + 1)
    }

    pub fn inline(&self, format: InlineFormat) -> bool {
        match format {
            InlineFormat::Bold => self.bold,
            InlineFormat::Italic => self.italic,
            InlineFormat::Underline => self.underline,
        }
    }

    pub fn list(&self) -> Option<ListKind> {
        if self.unordered_list {
            Some(ListKind::Unordered)
        } else if self.ordered_list {
            Some(ListKind::Ordered)
        } else {
            None
        }
    }
}

/// Selection-aware editing state over a host surface.
#[derive(Debug)]
pub struct EditingState<H> {
    pub(super) host: H,
    formats: ActiveFormats,
    link_selected: bool,
    /// Selection captured before a dialog took focus away.
    pub(super) saved: Option<SelectionRange>,
}

impl<H: EditingHost> EditingState<H> {
    pub fn new(host: H) -> Self {
        let mut state = Self {
            host,
            formats: ActiveFormats::default(),
            link_selected: false,
            saved: None,
        };
        state.refresh();
        state
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    /// Mutable access to the surface, e.g. to move the selection.
    ///
    /// Call [`refresh`](Self::refresh) afterwards, as a host would on its
    /// selection-change event.
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn into_host(self) -> H {
        self.host
    }

    pub fn formats(&self) -> ActiveFormats {
        self.formats
    }

    pub fn is_link_selected(&self) -> bool {
        self.link_selected
    }

    /// Recompute the snapshot from the host selection.
    pub fn refresh(&mut self) {
        self.formats = ActiveFormats::default();
        self.link_selected = false;

        let Some(range) = self.host.selection_in_root() else {
            return;
        };
        let dom = self.host.dom();
        let root = self.host.root();
        let Some(element) = range.anchor.element(dom) else {
            return;
        };

        let heading = dom
            .closest(element, root, HEADINGS)
            .and_then(|h| dom.local_name(h))
            .and_then(heading_level);
        let list = dom
            .closest(element, root, &["ul", "ol"])
            .and_then(|l| dom.local_name(l));

        self.formats = ActiveFormats {
            bold: self.host.query_command_state(InlineFormat::Bold),
            italic: self.host.query_command_state(InlineFormat::Italic),
            underline: self.host.query_command_state(InlineFormat::Underline),
            h1: heading == Some(1),
            h2: heading == Some(2),
            h3: heading == Some(3),
            paragraph: heading.is_none(),
            unordered_list: list == Some("ul"),
            ordered_list: list == Some("ol"),
        };
        self.link_selected = dom.closest(element, root, &["a"]).is_some();
    }

    /// Focus the surface if needed; `false` if it refuses.
    pub(super) fn ensure_focus(&mut self) -> bool {
        if !self.host.has_focus() {
            self.host.focus();
        }
        self.host.has_focus()
    }

    /// Focus plus a selection inside the root, or `None`.
    pub(super) fn editable_selection(&mut self) -> Option<SelectionRange> {
        if !self.ensure_focus() {
            return None;
        }
        self.host.selection_in_root()
    }

    pub fn toggle_bold(&mut self) {
        self.toggle_inline(InlineFormat::Bold);
    }

    pub fn toggle_italic(&mut self) {
        self.toggle_inline(InlineFormat::Italic);
    }

    pub fn toggle_underline(&mut self) {
        self.toggle_inline(InlineFormat::Underline);
    }

    /// Toggle an inline format, leaving a caret at the end of the run.
    ///
    /// The selection is bracketed with marker nodes before the primitive
    /// runs; the caret is re-resolved from the end marker afterwards.
    pub fn toggle_inline(&mut self, format: InlineFormat) {
        let Some(range) = self.editable_selection() else {
            return;
        };
        if range.is_collapsed() {
            self.host.exec_command(format.into());
            self.refresh();
            return;
        }

        let brackets = Brackets::insert(self.host.dom_mut(), &range);
        let inner = brackets.inner_range(self.host.dom());
        self.host.set_selection(inner);
        self.host.exec_command(format.into());

        let caret = brackets.remove(self.host.dom_mut());
        self.host.set_selection(caret.map(SelectionRange::collapsed));
        self.refresh();
    }

    /// Switch to heading `level`; on an active heading of that level,
    /// switch back to a paragraph.
    pub fn toggle_heading(&mut self, level: u8) {
        self.refresh();
        let kind = if self.formats.heading() == Some(level) {
            BlockKind::Paragraph
        } else {
            BlockKind::Heading(level)
        };
        self.apply_block(kind);
    }

    pub fn set_paragraph(&mut self) {
        self.apply_block(BlockKind::Paragraph);
    }

    fn apply_block(&mut self, kind: BlockKind) {
        let Some(range) = self.editable_selection() else {
            return;
        };
        if self.host.exec_command(Command::FormatBlock(kind)) {
            if let Some(block) = self.enclosing(range.anchor, kind.tag()) {
                apply_block_style(self.host.dom_mut(), block);
            }
            log::debug!("block set to {kind}");
        }
        self.refresh();
    }

    /// Wrap the current block in a list of `kind`, switch list types, or
    /// unwrap the list when it already has that type.
    pub fn toggle_list(&mut self, kind: ListKind) {
        let Some(range) = self.editable_selection() else {
            return;
        };
        if self.host.exec_command(Command::InsertList(kind)) {
            // Unwrapping a list leaves paragraphs behind
            let block = self
                .enclosing(range.anchor, kind.tag())
                .or_else(|| self.enclosing(range.anchor, "p"));
            if let Some(block) = block {
                apply_block_style(self.host.dom_mut(), block);
            }
        }
        self.refresh();
    }

    /// Nearest `tag` element around the host selection (or `fallback`).
    fn enclosing(&self, fallback: Position, tag: &str) -> Option<ArenaNodeId> {
        let at = self.host.selection_in_root().map_or(fallback, |r| r.anchor);
        self.host.dom().closest(at.node, self.host.root(), &[tag])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::memory::MemoryHost;

    fn tracker(html: &str, select: &str) -> EditingState<MemoryHost> {
        let mut host = MemoryHost::from_html(html);
        host.focus();
        assert!(host.select_text(select));
        EditingState::new(host)
    }

    #[test]
    fn test_no_selection_means_no_formats() {
        let state = EditingState::new(MemoryHost::from_html("<h1><b>titre</b></h1>"));
        assert_eq!(state.formats(), ActiveFormats::default());
        assert!(!state.is_link_selected());
    }

    #[test]
    fn test_selection_outside_root_means_no_formats() {
        let mut host = MemoryHost::from_html("<p>texte</p>");
        let orphan = host.dom_mut().create_text("ailleurs".into());
        host.select(SelectionRange::collapsed(Position::new(orphan, 1)));

        let state = EditingState::new(host);
        assert_eq!(state.formats(), ActiveFormats::default());
    }

    #[test]
    fn test_refresh_reads_blocks_and_links() {
        let state = tracker(
            r#"<h2><b>le <a href="/x">titre</a></b></h2>"#,
            "titre",
        );
        let formats = state.formats();
        assert!(formats.bold && formats.h2);
        assert!(!formats.paragraph && !formats.h1 && !formats.italic);
        assert!(state.is_link_selected());

        let state = tracker("<ol><li>item</li></ol>", "item");
        assert!(state.formats().ordered_list && state.formats().paragraph);
        assert_eq!(state.formats().list(), Some(ListKind::Ordered));
    }

    #[test]
    fn test_toggle_bold_keeps_caret_in_run() {
        let mut state = tracker("<p>un deux trois</p>", "deux");
        state.toggle_bold();

        assert_eq!(state.host().html(), "<p>un <b>deux</b> trois</p>");
        let caret = state.host().selection().unwrap();
        assert!(caret.is_collapsed());
        assert_eq!(state.host().dom().text(caret.anchor.node), Some("deux"));
        assert_eq!(caret.anchor.offset, 4);
        assert!(state.formats().bold);

        state.host_mut().select_text("deux");
        state.refresh();
        state.toggle_bold();
        assert_eq!(state.host().html(), "<p>un deux trois</p>");
        assert!(!state.formats().bold);
    }

    #[test]
    fn test_heading_toggles_back_to_paragraph() {
        let mut state = tracker("<p>titre</p>", "titre");

        state.toggle_heading(1);
        assert!(state.host().html().starts_with("<h1 style="));
        assert!(state.formats().h1);

        state.toggle_heading(1);
        assert!(state.host().html().starts_with("<p style="));
        assert!(state.host().html().contains(">titre</p>"));
        assert!(state.formats().paragraph && !state.formats().h1);
    }

    #[test]
    fn test_heading_switches_level() {
        let mut state = tracker("<h1>titre</h1>", "titre");
        state.toggle_heading(2);
        assert!(state.formats().h2 && !state.formats().h1);
    }

    #[test]
    fn test_toggle_list_styles_list() {
        let mut state = tracker("<p>item</p>", "item");
        state.toggle_list(ListKind::Unordered);

        assert!(state.formats().unordered_list);
        assert!(state.host().html().starts_with(r#"<ul style="list-style-type: disc"#));

        state.toggle_list(ListKind::Unordered);
        assert!(!state.formats().unordered_list);
        assert!(state.host().html().starts_with("<p style="));
    }

    #[test]
    fn test_intents_without_focus_do_nothing() {
        let mut host = MemoryHost::from_html("<p>texte</p>");
        host.set_focusable(false);
        host.select_text("texte");
        let mut state = EditingState::new(host);

        state.toggle_bold();
        state.toggle_heading(1);
        state.toggle_list(ListKind::Ordered);
        assert_eq!(state.host().html(), "<p>texte</p>");
    }
}
