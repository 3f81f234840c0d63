//! Link dialog intents.
//!
//! Opening the link dialog moves focus away from the surface, so
//! [`begin_link`](EditingState::begin_link) captures the selection first
//! and [`confirm_link`](EditingState::confirm_link) restores it before
//! touching the tree.

use serde::{Deserialize, Serialize};

use super::host::{Command, EditingHost};
use super::selection::{Brackets, Position, SelectionRange, selected_text, text_nodes_in_range};
use super::state::EditingState;
use super::styles::{remove_style_properties, set_style_property};
use crate::dom::{ArenaDom, ArenaNodeId};

/// Attribute recording whether a link stays on the site.
pub const LINK_TYPE_ATTR: &str = "data-link-type";

/// `rel` for links opening in a new browsing context.
pub const EXTERNAL_REL: &str = "noopener noreferrer";

/// Inline styling given to links.
const LINK_COLOR: &str = "#1a0dab";

/// Style properties the link primitive leaves behind.
const LINK_STYLE_PROPERTIES: &[&str] = &["color", "text-decoration"];

/// Payload of a confirmed link dialog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkRequest {
    pub url: String,
    pub is_internal: bool,
    /// Text inserted and linked when nothing was selected.
    #[serde(default)]
    pub link_text: Option<String>,
}

/// Values to prefill the link dialog with.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkDraft {
    pub selected_text: String,
    /// Target of the link being edited, if the selection is in one.
    pub url: Option<String>,
    pub is_internal: bool,
}

/// Whether a link stays on the site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkKind {
    Internal,
    External,
}

impl LinkKind {
    pub fn as_str(self) -> &'static str {
        match self {
            LinkKind::Internal => "internal",
            LinkKind::External => "external",
        }
    }
}

impl<H: EditingHost> EditingState<H> {
    /// Capture the selection (or the caret) before the link dialog opens.
    ///
    /// Without any selection in the surface, the caret is taken to be the
    /// end of the content.
    pub fn begin_link(&mut self) -> LinkDraft {
        let range = self.capture_selection();
        let dom = self.host.dom();
        let root = self.host.root();

        let anchor = dom.closest(range.anchor.node, root, &["a"]);
        LinkDraft {
            selected_text: selected_text(dom, root, &range),
            url: anchor.and_then(|a| dom.get_attr(a, "href")).map(str::to_string),
            is_internal: anchor
                .and_then(|a| dom.get_attr(a, LINK_TYPE_ATTR))
                .is_some_and(|kind| kind == LinkKind::Internal.as_str()),
        }
    }

    /// Remember where the user was, for a dialog to act on later.
    pub(super) fn capture_selection(&mut self) -> SelectionRange {
        let range = self.host.selection_in_root().unwrap_or_else(|| {
            let root = self.host.root();
            SelectionRange::collapsed(Position::new(root, self.host.dom().node_length(root)))
        });
        self.saved = Some(range);
        range
    }

    /// Restore the captured selection and give the surface focus back.
    pub(super) fn restore_selection(&mut self) -> Option<SelectionRange> {
        let range = self.saved.take()?;
        if !self.ensure_focus() {
            return None;
        }
        let range = SelectionRange::new(
            range.anchor.clamped(self.host.dom()),
            range.focus.clamped(self.host.dom()),
        );
        self.host.set_selection(Some(range));
        self.host.selection_in_root()
    }

    /// Drop the captured selection after the dialog was dismissed.
    pub fn cancel_dialog(&mut self) {
        if let Some(range) = self.saved.take() {
            self.host.set_selection(Some(range));
        }
        self.refresh();
    }

    /// Create (or retarget) a link over the captured selection.
    ///
    /// Returns `false` when nothing was linked.
    pub fn confirm_link(&mut self, request: LinkRequest) -> bool {
        let url = request.url.trim();
        let Some(range) = self.restore_selection() else {
            return false;
        };
        if url.is_empty() {
            self.refresh();
            return false;
        }

        let text = request.link_text.as_deref().map(str::trim).filter(|t| !t.is_empty());
        if let (true, Some(text)) = (range.is_collapsed(), text) {
            let brackets = Brackets::insert(self.host.dom_mut(), &range);
            let inside = brackets.inner_range(self.host.dom());
            self.host.set_selection(inside);
            self.host.exec_command(Command::InsertText(text.to_string()));
            let inserted = brackets.inner_range(self.host.dom());
            self.host.set_selection(inserted);
            let linked = self.host.exec_command(Command::CreateLink(url.to_string()));
            let caret = brackets.remove(self.host.dom_mut());
            if linked {
                self.tag_selected_links(request.is_internal, caret);
            }
            self.host.set_selection(caret.map(SelectionRange::collapsed));
            self.refresh();
            return linked;
        }

        let linked = self.host.exec_command(Command::CreateLink(url.to_string()));
        if linked {
            let caret = self.host.selection_in_root().map(|r| r.anchor);
            self.tag_selected_links(request.is_internal, caret);
        }
        self.refresh();
        linked
    }

    /// Tag the anchors around the host selection (or `fallback`).
    fn tag_selected_links(&mut self, is_internal: bool, fallback: Option<Position>) {
        let anchors = self.selected_anchors(fallback);
        let kind = if is_internal {
            LinkKind::Internal
        } else {
            LinkKind::External
        };
        let dom = self.host.dom_mut();
        for anchor in anchors {
            tag_link(dom, anchor, kind);
        }
    }

    fn selected_anchors(&self, fallback: Option<Position>) -> Vec<ArenaNodeId> {
        let dom = self.host.dom();
        let root = self.host.root();
        let mut anchors = Vec::new();
        if let Some(range) = self.host.selection_in_root() {
            for slice in text_nodes_in_range(dom, root, &range) {
                anchors.extend(dom.closest(slice.node, root, &["a"]));
            }
            anchors.extend(dom.closest(range.anchor.node, root, &["a"]));
        }
        if let Some(at) = fallback {
            anchors.extend(dom.closest(at.node, root, &["a"]));
        }
        anchors.sort();
        anchors.dedup();
        anchors
    }

    /// Unlink the selection and clear the styling links leave behind.
    pub fn remove_link(&mut self) -> bool {
        let Some(range) = self.editable_selection() else {
            return false;
        };
        let anchors = self.selected_anchors(Some(range.anchor));
        let dom = self.host.dom();
        let surrounding: Vec<_> = anchors.iter().filter_map(|&a| dom.parent(a)).collect();
        let content: Vec<_> = anchors.iter().flat_map(|&a| dom.children(a)).collect();
        let texts: Vec<_> = content
            .iter()
            .flat_map(|&n| dom.preorder(n))
            .filter(|&n| dom.is_text(n))
            .collect();

        let removed = self.host.exec_command(Command::Unlink);
        if removed {
            let dom = self.host.dom_mut();
            // Only wrappers created by the unlink carry the former link styling
            let mut leftovers: Vec<_> = content
                .iter()
                .filter_map(|&n| dom.parent(n))
                .filter(|p| !surrounding.contains(p))
                .collect();
            leftovers.dedup();
            for wrapper in leftovers {
                clear_link_styling(dom, wrapper);
            }
            if let (Some(&first), Some(&last)) = (texts.first(), texts.last()) {
                let end = Position::new(last, dom.node_length(last));
                self.host
                    .set_selection(Some(SelectionRange::new(Position::new(first, 0), end)));
            }
        }
        self.refresh();
        removed
    }
}

/// Stamp the link kind, target and styling on an anchor.
pub fn tag_link(dom: &mut ArenaDom, anchor: ArenaNodeId, kind: LinkKind) {
    dom.set_attr(anchor, LINK_TYPE_ATTR, kind.as_str());
    match kind {
        LinkKind::External => {
            dom.set_attr(anchor, "target", "_blank");
            dom.set_attr(anchor, "rel", EXTERNAL_REL);
        }
        LinkKind::Internal => {
            dom.remove_attr(anchor, "target");
            dom.remove_attr(anchor, "rel");
        }
    }
    set_style_property(dom, anchor, "color", LINK_COLOR);
    set_style_property(dom, anchor, "text-decoration", "underline");
}

/// Remove the link styling an unlink left on `wrapper`.
///
/// A `span` or `font` left without attributes is dissolved.
pub fn clear_link_styling(dom: &mut ArenaDom, wrapper: ArenaNodeId) {
    dom.remove_attr(wrapper, LINK_TYPE_ATTR);
    remove_style_properties(dom, wrapper, LINK_STYLE_PROPERTIES);
    let bare = dom.attrs(wrapper).is_empty();
    if bare && dom.local_name(wrapper).is_some_and(|t| matches!(t, "span" | "font")) {
        dom.replace_with_children(wrapper);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::memory::MemoryHost;

    fn tracker(html: &str) -> EditingState<MemoryHost> {
        let mut host = MemoryHost::from_html(html);
        host.focus();
        EditingState::new(host)
    }

    fn external(url: &str) -> LinkRequest {
        LinkRequest {
            url: url.to_string(),
            is_internal: false,
            link_text: None,
        }
    }

    #[test]
    fn test_begin_link_prefills_from_existing_link() {
        let mut state = tracker(r#"<p><a href="/blog" data-link-type="internal">blog</a></p>"#);
        state.host_mut().select_text("blog");

        let draft = state.begin_link();
        assert_eq!(draft.selected_text, "blog");
        assert_eq!(draft.url.as_deref(), Some("/blog"));
        assert!(draft.is_internal);
    }

    #[test]
    fn test_external_link_opens_new_context() {
        let mut state = tracker("<p>voir le site</p>");
        state.host_mut().select_text("site");
        state.begin_link();
        state.host_mut().blur();

        assert!(state.confirm_link(external("https://exemple.fr")));

        let html = state.host().html();
        assert!(html.contains(r#"href="https://exemple.fr""#));
        assert!(html.contains(r#"data-link-type="external""#));
        assert!(html.contains(r#"target="_blank""#));
        assert!(html.contains(r#"rel="noopener noreferrer""#));
        assert!(state.is_link_selected());
    }

    #[test]
    fn test_internal_link_has_no_target() {
        let mut state = tracker("<p>voir le blog</p>");
        state.host_mut().select_text("blog");
        state.begin_link();

        let request = LinkRequest {
            url: "/blog".into(),
            is_internal: true,
            link_text: None,
        };
        assert!(state.confirm_link(request));

        let html = state.host().html();
        assert!(html.contains(r#"data-link-type="internal""#));
        assert!(!html.contains("target="));
    }

    #[test]
    fn test_link_text_inserted_at_caret() {
        let mut state = tracker("<p>Lire </p>");
        state.host_mut().place_caret_after("Lire ");
        let draft = state.begin_link();
        assert_eq!(draft.selected_text, "");

        let request = LinkRequest {
            url: "https://exemple.fr".into(),
            is_internal: false,
            link_text: Some("la suite".into()),
        };
        assert!(state.confirm_link(request));

        let host = state.host();
        assert_eq!(host.dom().text_content(host.root()), "Lire la suite");
        let link = host.dom().find_by_tag("a").unwrap();
        assert_eq!(host.dom().text_content(link), "la suite");
    }

    #[test]
    fn test_confirm_without_begin_does_nothing() {
        let mut state = tracker("<p>texte</p>");
        state.host_mut().select_text("texte");
        assert!(!state.confirm_link(external("https://exemple.fr")));
        assert_eq!(state.host().html(), "<p>texte</p>");
    }

    #[test]
    fn test_empty_url_is_rejected() {
        let mut state = tracker("<p>texte</p>");
        state.host_mut().select_text("texte");
        state.begin_link();
        assert!(!state.confirm_link(external("   ")));
        assert_eq!(state.host().html(), "<p>texte</p>");
    }

    #[test]
    fn test_remove_link_clears_styling() {
        let mut state = tracker("<p>voir le site</p>");
        state.host_mut().select_text("site");
        state.begin_link();
        state.confirm_link(external("https://exemple.fr"));

        state.host_mut().select_text("site");
        state.refresh();
        assert!(state.remove_link());

        let html = state.host().html();
        assert_eq!(html, "<p>voir le site</p>");
        assert!(!state.is_link_selected());
    }

    #[test]
    fn test_remove_link_keeps_other_styling() {
        let mut state = tracker(
            r#"<p><a href="/x" style="color: red; font-weight: bold"><u>mot</u></a></p>"#,
        );
        state.host_mut().select_text("mot");
        assert!(state.remove_link());
        assert_eq!(
            state.host().html(),
            r#"<p><span style="font-weight: bold"><u>mot</u></span></p>"#
        );
    }

    #[test]
    fn test_remove_link_keeps_surrounding_underline() {
        let mut state = tracker(
            r#"<p><u style="color: green">voir <a href="/x" style="color: red">site</a> ici</u></p>"#,
        );
        state.host_mut().select_text("site");
        assert!(state.remove_link());
        assert_eq!(
            state.host().html(),
            r#"<p><u style="color: green">voir site ici</u></p>"#
        );
    }

    #[test]
    fn test_cancel_restores_selection() {
        let mut state = tracker("<p>texte</p>");
        state.host_mut().select_text("tex");
        let saved = state.host().selection();
        state.begin_link();
        state.host_mut().set_selection(None);

        state.cancel_dialog();
        assert_eq!(state.host().selection(), saved);
        assert!(!state.confirm_link(external("https://exemple.fr")));
    }
}
