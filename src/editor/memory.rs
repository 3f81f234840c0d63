//! In-memory editing surface.
//!
//! [`MemoryHost`] implements the native primitives directly on an
//! [`ArenaDom`], the way a browser's editing commands behave on a
//! `contenteditable` region. It backs the tests and any embedding without a
//! real surface. Where browsers leave debris behind (an unlinked anchor that
//! carried inline styling becomes a styled `<span>`), the host does the same
//! so the tracker's cleanup is exercised.

use super::host::{BlockKind, Command, EditingHost, InlineFormat, ListKind};
use super::selection::{Position, SelectionRange, insert_at, split_range, text_nodes_in_range};
use crate::dom::predicates::is_block_tag;
use crate::dom::{ArenaDom, ArenaNodeId, Attribute, Fragment, html_name, parse_fragment, serialize_children};

/// Elements the block primitive converts in place.
const BLOCK_CONTAINERS: &[&str] = &["p", "div", "pre", "h1", "h2", "h3", "h4", "h5", "h6", "li"];

/// Blocks that become the item of a new list.
const LISTABLE_BLOCKS: &[&str] = &["p", "div", "pre", "h1", "h2", "h3", "h4", "h5", "h6"];

/// Containers whose direct inline content forms its own block run.
const RUN_CONTAINERS: &[&str] = &["blockquote", "td", "th"];

/// An editable surface living in memory.
#[derive(Debug)]
pub struct MemoryHost {
    dom: ArenaDom,
    root: ArenaNodeId,
    focused: bool,
    focusable: bool,
    selection: Option<SelectionRange>,
}

impl Default for MemoryHost {
    fn default() -> Self {
        Self::from_html("")
    }
}

impl MemoryHost {
    /// Create a surface holding `html`. It starts unfocused with no selection.
    pub fn from_html(html: &str) -> Self {
        let Fragment { dom, body } = parse_fragment(html);
        Self {
            dom,
            root: body,
            focused: false,
            focusable: true,
            selection: None,
        }
    }

    /// Serialize the surface content.
    pub fn html(&self) -> String {
        serialize_children(&self.dom, self.root)
    }

    /// Replace the content, dropping the selection.
    pub fn set_html(&mut self, html: &str) {
        let Fragment { dom, body } = parse_fragment(html);
        self.dom = dom;
        self.root = body;
        self.selection = None;
    }

    pub fn blur(&mut self) {
        self.focused = false;
    }

    /// Make [`focus`](EditingHost::focus) fail, like a hidden surface.
    pub fn set_focusable(&mut self, focusable: bool) {
        self.focusable = focusable;
        if !focusable {
            self.focused = false;
        }
    }

    pub fn select(&mut self, range: SelectionRange) {
        self.selection = Some(range);
    }

    /// Select the first occurrence of `needle` within a single text node.
    pub fn select_text(&mut self, needle: &str) -> bool {
        let Some((node, start)) = self.find_text(needle) else {
            return false;
        };
        let end = start + needle.chars().count();
        self.selection = Some(SelectionRange::new(
            Position::new(node, start),
            Position::new(node, end),
        ));
        true
    }

    /// Put a collapsed caret right after the first occurrence of `needle`.
    pub fn place_caret_after(&mut self, needle: &str) -> bool {
        let Some((node, start)) = self.find_text(needle) else {
            return false;
        };
        let at = Position::new(node, start + needle.chars().count());
        self.selection = Some(SelectionRange::collapsed(at));
        true
    }

    fn find_text(&self, needle: &str) -> Option<(ArenaNodeId, usize)> {
        self.dom.preorder(self.root).into_iter().find_map(|id| {
            let text = self.dom.text(id)?;
            let byte = text.find(needle)?;
            Some((id, text[..byte].chars().count()))
        })
    }

    /// Point selection ends that named `from` at `to` instead.
    fn remap(&mut self, from: ArenaNodeId, to: ArenaNodeId) {
        if let Some(range) = &mut self.selection {
            for pos in [&mut range.anchor, &mut range.focus] {
                if pos.node == from {
                    pos.node = to;
                }
            }
        }
    }

    fn select_nodes(&mut self, first: ArenaNodeId, last: ArenaNodeId) {
        let end = Position::new(last, self.dom.node_length(last));
        self.selection = Some(SelectionRange::new(Position::new(first, 0), end));
    }

    /// Merge each wrapper into an identical element right before it.
    fn merge_with_previous(&mut self, wrappers: &[ArenaNodeId]) {
        for &wrapper in wrappers {
            let Some(prev) = self.dom.prev_sibling(wrapper) else {
                continue;
            };
            if same_shape(&self.dom, prev, wrapper) {
                self.dom.move_children(wrapper, prev);
                self.dom.detach(wrapper);
            }
        }
    }

    /// Remove the selected text and return the caret where it was.
    fn delete_selection(&mut self, range: &SelectionRange) -> Position {
        let start = range.start(&self.dom);
        if range.is_collapsed() {
            return start;
        }
        let covered = split_range(&mut self.dom, self.root, range);
        let caret = covered
            .first()
            .and_then(|&first| Position::before(&self.dom, first))
            .unwrap_or(start);
        for node in covered {
            self.dom.detach(node);
        }
        caret
    }

    /// The inline nodes around `anchor` that would form one block.
    fn inline_run(&self, anchor: ArenaNodeId) -> Option<Vec<ArenaNodeId>> {
        let dom = &self.dom;
        let container = dom.closest(anchor, self.root, RUN_CONTAINERS).unwrap_or(self.root);
        let top = if anchor == container {
            let (first, last) = (dom.first_child(container), dom.last_child(container));
            self.selection
                .and_then(|r| dom.children(container).nth(r.start(dom).offset))
                .or(last)
                .or(first)?
        } else {
            std::iter::once(anchor)
                .chain(dom.ancestors(anchor))
                .find(|&n| dom.parent(n) == Some(container))?
        };
        if !is_inline(dom, top) {
            return None;
        }

        let mut run = vec![top];
        let mut prev = dom.prev_sibling(top);
        while let Some(p) = prev.filter(|&p| is_inline(dom, p)) {
            run.insert(0, p);
            prev = dom.prev_sibling(p);
        }
        let mut next = dom.next_sibling(top);
        while let Some(n) = next.filter(|&n| is_inline(dom, n)) {
            run.push(n);
            next = dom.next_sibling(n);
        }
        Some(run)
    }

    fn toggle_inline(&mut self, format: InlineFormat, range: SelectionRange) -> bool {
        let root = self.root;
        let tags = format.tags();

        if range.is_collapsed() {
            let caret = range.anchor;
            let caret = match self.dom.closest(caret.node, root, tags) {
                // Leaving the format: continue typing right after it
                Some(el) if self.dom.first_child(el).is_none() => {
                    let at = Position::before(&self.dom, el);
                    self.dom.detach(el);
                    at
                }
                Some(el) => Position::after(&self.dom, el),
                None => {
                    let el = self.dom.create_html_element(format.tag());
                    insert_at(&mut self.dom, caret, el);
                    Some(Position::new(el, 0))
                }
            };
            self.selection = caret.map(SelectionRange::collapsed);
            return true;
        }

        let covered = split_range(&mut self.dom, root, &range);
        let (Some(&first), Some(&last)) = (covered.first(), covered.last()) else {
            return false;
        };

        let active = covered
            .iter()
            .all(|&t| self.dom.closest(t, root, tags).is_some());
        if active {
            for &text in &covered {
                if let Some(el) = self.dom.closest(text, root, tags) {
                    isolate_branch(&mut self.dom, el, text);
                    self.dom.replace_with_children(el);
                }
            }
        } else {
            let mut wrappers = Vec::new();
            for &text in &covered {
                if self.dom.closest(text, root, tags).is_none() {
                    let wrapper = self.dom.create_html_element(format.tag());
                    self.dom.wrap(text, wrapper);
                    wrappers.push(wrapper);
                }
            }
            self.merge_with_previous(&wrappers);
        }
        self.select_nodes(first, last);
        true
    }

    fn format_block(&mut self, kind: BlockKind, range: SelectionRange) -> bool {
        let anchor = range.start(&self.dom).node;
        let block = self.dom.create_html_element(kind.tag());

        match self.dom.closest(anchor, self.root, BLOCK_CONTAINERS) {
            Some(li) if self.dom.is_tag(li, "li") => {
                self.dom.move_children(li, block);
                self.dom.append(li, block);
            }
            Some(old) => {
                self.dom.insert_before(old, block);
                self.dom.move_children(old, block);
                self.dom.detach(old);
                self.remap(old, block);
            }
            None if self.dom.first_child(self.root).is_none() => {
                self.dom.append(self.root, block);
                self.selection = Some(SelectionRange::collapsed(Position::new(block, 0)));
            }
            None => {
                let Some(run) = self.inline_run(anchor) else {
                    return false;
                };
                self.dom.insert_before(run[0], block);
                for node in run {
                    self.dom.append(block, node);
                }
            }
        }
        true
    }

    fn insert_list(&mut self, kind: ListKind, range: SelectionRange) -> bool {
        let anchor = range.start(&self.dom).node;

        if let Some(list) = self.dom.closest(anchor, self.root, &["ul", "ol"]) {
            let current = self.dom.local_name(list).and_then(ListKind::from_tag);
            if current == Some(kind) {
                self.unlist(list);
            } else {
                let renamed = self.dom.create_html_element(kind.tag());
                self.dom.insert_before(list, renamed);
                self.dom.move_children(list, renamed);
                self.dom.detach(list);
                self.remap(list, renamed);
            }
            return true;
        }

        let list = self.dom.create_html_element(kind.tag());
        let item = self.dom.create_html_element("li");
        self.dom.append(list, item);

        match self.dom.closest(anchor, self.root, LISTABLE_BLOCKS) {
            Some(block) => {
                self.dom.insert_before(block, list);
                self.dom.move_children(block, item);
                self.dom.detach(block);
                self.remap(block, item);
            }
            None => match self.inline_run(anchor) {
                Some(run) => {
                    self.dom.insert_before(run[0], list);
                    for node in run {
                        self.dom.append(item, node);
                    }
                }
                None => {
                    self.dom.append(self.root, list);
                    self.selection = Some(SelectionRange::collapsed(Position::new(item, 0)));
                }
            },
        }
        true
    }

    /// Turn every item of `list` into a paragraph.
    fn unlist(&mut self, list: ArenaNodeId) {
        let children: Vec<_> = self.dom.children(list).collect();
        let mut first_paragraph = None;
        for child in children {
            if self.dom.is_tag(child, "li") {
                let p = self.dom.create_html_element("p");
                self.dom.insert_before(list, p);
                self.dom.move_children(child, p);
                self.remap(child, p);
                first_paragraph.get_or_insert(p);
            } else {
                self.dom.insert_before(list, child);
            }
        }
        self.dom.detach(list);
        if let Some(p) = first_paragraph {
            self.remap(list, p);
        }
    }

    fn create_link(&mut self, url: &str, range: SelectionRange) -> bool {
        let root = self.root;

        if range.is_collapsed() {
            // Nothing selected: the URL itself becomes the link text
            let link = self.link_element(url);
            self.dom.append_text(link, url);
            insert_at(&mut self.dom, range.anchor, link);
            if let Some(text) = self.dom.first_child(link) {
                self.select_nodes(text, text);
            }
            return true;
        }

        let covered = split_range(&mut self.dom, root, &range);
        let (Some(&first), Some(&last)) = (covered.first(), covered.last()) else {
            return false;
        };
        let mut wrappers = Vec::new();
        for &text in &covered {
            match self.dom.closest(text, root, &["a"]) {
                Some(existing) => self.dom.set_attr(existing, "href", url),
                None => {
                    let link = self.link_element(url);
                    self.dom.wrap(text, link);
                    wrappers.push(link);
                }
            }
        }
        self.merge_with_previous(&wrappers);
        self.select_nodes(first, last);
        true
    }

    fn link_element(&mut self, url: &str) -> ArenaNodeId {
        self.dom
            .create_element(html_name("a"), vec![Attribute::new("href", url)])
    }

    fn unlink(&mut self, range: SelectionRange) -> bool {
        let root = self.root;
        let mut anchors = Vec::new();
        if range.is_collapsed() {
            anchors.extend(self.dom.closest(range.anchor.node, root, &["a"]));
        } else {
            for slice in text_nodes_in_range(&self.dom, root, &range) {
                if let Some(a) = self.dom.closest(slice.node, root, &["a"])
                    && !anchors.contains(&a)
                {
                    anchors.push(a);
                }
            }
        }
        if anchors.is_empty() {
            return false;
        }

        let mut content = Vec::new();
        for anchor in anchors {
            content.extend(self.dom.children(anchor));
            match self.dom.get_attr(anchor, "style").map(str::to_string) {
                // Browsers keep the link's inline styling on a span
                Some(style) => {
                    let span = self
                        .dom
                        .create_element(html_name("span"), vec![Attribute::new("style", style)]);
                    self.dom.insert_before(anchor, span);
                    self.dom.move_children(anchor, span);
                    self.dom.detach(anchor);
                    self.remap(anchor, span);
                }
                None => {
                    let parent = self.dom.parent(anchor);
                    self.dom.replace_with_children(anchor);
                    if let Some(parent) = parent {
                        self.remap(anchor, parent);
                    }
                }
            }
        }
        if let (Some(&first), Some(&last)) = (content.first(), content.last()) {
            let start = Position::before(&self.dom, first);
            let end = Position::after(&self.dom, last);
            if let (Some(start), Some(end)) = (start, end) {
                self.selection = Some(SelectionRange::new(start, end));
            }
        }
        true
    }

    fn insert_text(&mut self, text: &str, range: SelectionRange) -> bool {
        let caret = self.delete_selection(&range);
        let inserted = text.chars().count();

        if let Some(existing) = self.dom.text(caret.node) {
            let mut value = existing.to_string();
            let byte = crate::dom::byte_offset(&value, caret.offset);
            value.insert_str(byte, text);
            self.dom.set_text(caret.node, value);
            self.selection = Some(SelectionRange::collapsed(Position::new(
                caret.node,
                caret.offset + inserted,
            )));
        } else {
            let node = self.dom.create_text(text.to_string());
            insert_at(&mut self.dom, caret, node);
            self.selection = Some(SelectionRange::collapsed(Position::new(node, inserted)));
        }
        true
    }

    fn insert_image(&mut self, src: &str, range: SelectionRange) -> bool {
        let caret = self.delete_selection(&range);
        let img = self
            .dom
            .create_element(html_name("img"), vec![Attribute::new("src", src)]);
        insert_at(&mut self.dom, caret, img);
        self.selection = SelectionRange::around(&self.dom, img);
        true
    }
}

impl EditingHost for MemoryHost {
    fn dom(&self) -> &ArenaDom {
        &self.dom
    }

    fn dom_mut(&mut self) -> &mut ArenaDom {
        &mut self.dom
    }

    fn root(&self) -> ArenaNodeId {
        self.root
    }

    fn has_focus(&self) -> bool {
        self.focused
    }

    fn focus(&mut self) {
        self.focused = self.focusable;
    }

    fn selection(&self) -> Option<SelectionRange> {
        self.selection
    }

    fn set_selection(&mut self, range: Option<SelectionRange>) {
        self.selection = range;
    }

    fn query_command_state(&self, format: InlineFormat) -> bool {
        let Some(range) = self.selection_in_root() else {
            return false;
        };
        let node = if range.is_collapsed() {
            range.anchor.node
        } else {
            text_nodes_in_range(&self.dom, self.root, &range)
                .first()
                .map_or(range.start(&self.dom).node, |slice| slice.node)
        };
        self.dom.closest(node, self.root, format.tags()).is_some()
    }

    fn exec_command(&mut self, command: Command) -> bool {
        if !self.focused {
            return false;
        }
        let Some(range) = self.selection_in_root() else {
            return false;
        };
        log::trace!("exec {command:?}");
        match command {
            Command::Bold => self.toggle_inline(InlineFormat::Bold, range),
            Command::Italic => self.toggle_inline(InlineFormat::Italic, range),
            Command::Underline => self.toggle_inline(InlineFormat::Underline, range),
            Command::FormatBlock(kind) => self.format_block(kind, range),
            Command::InsertList(kind) => self.insert_list(kind, range),
            Command::CreateLink(url) => self.create_link(&url, range),
            Command::Unlink => self.unlink(range),
            Command::InsertText(text) => self.insert_text(&text, range),
            Command::InsertImage(src) => self.insert_image(&src, range),
        }
    }
}

fn is_inline(dom: &ArenaDom, node: ArenaNodeId) -> bool {
    match dom.local_name(node) {
        Some(tag) => tag != "br" && !is_block_tag(tag),
        None => dom.is_text(node),
    }
}

/// Same tag and same attributes.
fn same_shape(dom: &ArenaDom, a: ArenaNodeId, b: ArenaNodeId) -> bool {
    let (Some(ta), Some(tb)) = (dom.local_name(a), dom.local_name(b)) else {
        return false;
    };
    let (aa, ab) = (dom.attrs(a), dom.attrs(b));
    ta == tb
        && aa.len() == ab.len()
        && aa
            .iter()
            .all(|x| dom.get_attr(b, x.name.local.as_ref()) == Some(x.value.as_str()))
}

/// Split the elements from `node` up to `ancestor` so that `ancestor` only
/// holds the branch leading to `node`.
///
/// Siblings on either side move into shallow copies of their parent, which
/// keeps formatting on content outside the branch.
fn isolate_branch(dom: &mut ArenaDom, ancestor: ArenaNodeId, node: ArenaNodeId) {
    let mut child = node;
    while child != ancestor {
        let Some(parent) = dom.parent(child) else {
            return;
        };
        let before: Vec<_> = dom.children(parent).take_while(|&c| c != child).collect();
        let after: Vec<_> = dom
            .children(parent)
            .skip_while(|&c| c != child)
            .skip(1)
            .collect();
        if !before.is_empty()
            && let Some(copy) = dom.shallow_clone(parent)
        {
            dom.insert_before(parent, copy);
            for sibling in before {
                dom.append(copy, sibling);
            }
        }
        if !after.is_empty()
            && let Some(copy) = dom.shallow_clone(parent)
        {
            dom.insert_after(parent, copy);
            for sibling in after {
                dom.append(copy, sibling);
            }
        }
        child = parent;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn focused(html: &str) -> MemoryHost {
        let mut host = MemoryHost::from_html(html);
        host.focus();
        host
    }

    #[test]
    fn test_commands_need_focus_and_selection() {
        let mut host = MemoryHost::from_html("<p>texte</p>");
        assert!(host.select_text("texte"));
        assert!(!host.exec_command(Command::Bold));

        host.focus();
        host.set_selection(None);
        assert!(!host.exec_command(Command::Bold));
        assert_eq!(host.html(), "<p>texte</p>");
    }

    #[test]
    fn test_bold_wraps_and_unwraps() {
        let mut host = focused("<p>un deux trois</p>");
        host.select_text("deux");

        assert!(host.exec_command(Command::Bold));
        assert_eq!(host.html(), "<p>un <b>deux</b> trois</p>");
        assert!(host.query_command_state(InlineFormat::Bold));

        assert!(host.exec_command(Command::Bold));
        assert_eq!(host.html(), "<p>un deux trois</p>");
        assert!(!host.query_command_state(InlineFormat::Bold));
    }

    #[test]
    fn test_unbold_keeps_format_outside_selection() {
        let mut host = focused("<p><b>un deux trois</b></p>");
        host.select_text("deux");
        assert!(host.exec_command(Command::Bold));
        assert_eq!(host.html(), "<p><b>un </b>deux<b> trois</b></p>");

        let mut host = focused(r#"<p><b class="k">un <i>deux</i> trois</b></p>"#);
        host.select_text("deux");
        assert!(host.exec_command(Command::Bold));
        assert_eq!(
            host.html(),
            r#"<p><b class="k">un </b><i>deux</i><b class="k"> trois</b></p>"#
        );
    }

    #[test]
    fn test_strong_counts_as_bold() {
        let mut host = focused("<p><strong>fort</strong></p>");
        host.select_text("fort");
        assert!(host.query_command_state(InlineFormat::Bold));
        assert!(!host.query_command_state(InlineFormat::Italic));
    }

    #[test]
    fn test_collapsed_toggle_prepares_typing_style() {
        let mut host = focused("<p>abc</p>");
        host.place_caret_after("abc");

        host.exec_command(Command::Italic);
        host.exec_command(Command::InsertText("def".into()));

        assert_eq!(host.html(), "<p>abc<i>def</i></p>");
    }

    #[test]
    fn test_format_block_replaces_container() {
        let mut host = focused("<p>titre</p><p>corps</p>");
        host.place_caret_after("tit");

        host.exec_command(Command::FormatBlock(BlockKind::Heading(2)));
        assert_eq!(host.html(), "<h2>titre</h2><p>corps</p>");
    }

    #[test]
    fn test_format_block_wraps_loose_inline_run() {
        let mut host = focused("un <b>deux</b><p>trois</p>");
        host.place_caret_after("deu");

        host.exec_command(Command::FormatBlock(BlockKind::Paragraph));
        assert_eq!(host.html(), "<p>un <b>deux</b></p><p>trois</p>");
    }

    #[test]
    fn test_lists_toggle_and_switch() {
        let mut host = focused("<p>item</p>");
        host.place_caret_after("it");

        host.exec_command(Command::InsertList(ListKind::Unordered));
        assert_eq!(host.html(), "<ul><li>item</li></ul>");

        host.exec_command(Command::InsertList(ListKind::Ordered));
        assert_eq!(host.html(), "<ol><li>item</li></ol>");

        host.exec_command(Command::InsertList(ListKind::Ordered));
        assert_eq!(host.html(), "<p>item</p>");
    }

    #[test]
    fn test_create_link_on_selection_and_caret() {
        let mut host = focused("<p>voir le site</p>");
        host.select_text("site");
        host.exec_command(Command::CreateLink("https://exemple.fr".into()));
        assert_eq!(
            host.html(),
            r#"<p>voir le <a href="https://exemple.fr">site</a></p>"#
        );

        let mut host = focused("<p>lien : </p>");
        host.place_caret_after(": ");
        host.exec_command(Command::CreateLink("/blog".into()));
        assert_eq!(host.html(), r#"<p>lien : <a href="/blog">/blog</a></p>"#);
    }

    #[test]
    fn test_unlink_keeps_styled_span() {
        let mut host = focused(r#"<p><a href="/x" style="color: blue">ici</a> et <a href="/y">là</a></p>"#);
        host.select_text("ici");
        host.exec_command(Command::Unlink);
        assert_eq!(
            host.html(),
            r#"<p><span style="color: blue">ici</span> et <a href="/y">là</a></p>"#
        );

        host.select_text("là");
        host.exec_command(Command::Unlink);
        assert_eq!(host.html(), r#"<p><span style="color: blue">ici</span> et là</p>"#);
    }

    #[test]
    fn test_insert_text_replaces_selection() {
        let mut host = focused("<p>un deux trois</p>");
        host.select_text("deux");
        host.exec_command(Command::InsertText("2".into()));
        assert_eq!(host.dom().text_content(host.root()), "un 2 trois");
    }

    #[test]
    fn test_insert_image_selects_it() {
        let mut host = focused("<p>avant après</p>");
        host.place_caret_after("avant");
        host.exec_command(Command::InsertImage("data:image/png;base64,AA==".into()));

        let range = host.selection().unwrap();
        let img = host.dom().children(range.anchor.node).nth(range.anchor.offset).unwrap();
        assert!(host.dom().is_tag(img, "img"));
        assert_eq!(
            host.html(),
            r#"<p>avant<img src="data:image/png;base64,AA=="> après</p>"#
        );
    }
}
