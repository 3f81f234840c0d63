//! Complex-word marking over a document tree.
//!
//! Marking rewrites text nodes in place: each word the classifier flags is
//! wrapped in a `<span class="complex-word">`, every other run (whitespace
//! included) stays plain text. Existing marks are stripped first, so marking
//! twice gives the same tree as marking once.

use serde::Serialize;

use super::classifier::ComplexityClassifier;
use super::dictionary::DictionarySource;
use super::tokens::{Token, tokenize};
use crate::dom::{ArenaDom, ArenaNodeId, Attribute, html_name};

/// Tag of the complex-word wrapper.
pub const MARK_TAG: &str = "span";

/// Class identifying a complex-word wrapper.
pub const MARK_CLASS: &str = "complex-word";

/// Text under these elements is never marked.
const SKIPPED_ANCESTORS: &[&str] = &["a", "img"];

/// Statistics of one marking pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MarkReport {
    /// Words examined.
    pub words: usize,
    /// Words wrapped in a mark.
    pub marked: usize,
    /// Normalized form of every marked word, in document order.
    pub complex: Vec<String>,
}

/// Check whether a node is a complex-word mark.
pub fn is_mark(dom: &ArenaDom, id: ArenaNodeId) -> bool {
    dom.is_tag(id, MARK_TAG) && dom.has_class(id, MARK_CLASS)
}

/// Replace every mark under `root` by its plain text and merge text runs.
///
/// Returns the number of marks removed.
pub fn strip_marks(dom: &mut ArenaDom, root: ArenaNodeId) -> usize {
    let marks: Vec<_> = dom
        .preorder(root)
        .into_iter()
        .filter(|&id| id != root && is_mark(dom, id))
        .collect();

    for &mark in &marks {
        let text = dom.text_content(mark);
        let plain = dom.create_text(text);
        dom.insert_before(mark, plain);
        dom.detach(mark);
    }
    dom.merge_text(root);
    marks.len()
}

/// Text nodes eligible for marking, in document order.
fn collect_text_nodes(dom: &ArenaDom, root: ArenaNodeId) -> Vec<ArenaNodeId> {
    dom.preorder(root)
        .into_iter()
        .filter(|&id| dom.is_text(id))
        .filter(|&id| dom.closest(id, root, SKIPPED_ANCESTORS).is_none())
        .filter(|&id| {
            !dom.ancestors(id)
                .take_while(|&a| a != root)
                .any(|a| is_mark(dom, a))
        })
        .collect()
}

/// Mark complex words in every text node under `root`.
///
/// Words are classified one at a time so a cold dictionary is fetched at
/// most once and lookups never pile up. Nodes are rewritten in reverse
/// document order.
pub async fn mark_complex_words<S: DictionarySource>(
    dom: &mut ArenaDom,
    root: ArenaNodeId,
    classifier: &ComplexityClassifier<S>,
) -> MarkReport {
    let stripped = strip_marks(dom, root);
    let targets = collect_text_nodes(dom, root);

    let mut report = MarkReport::default();
    let mut per_node = Vec::new();

    for &node in targets.iter().rev() {
        let Some(text) = dom.text(node).map(str::to_string) else {
            continue;
        };
        let tokens = tokenize(&text);

        let mut flags = Vec::with_capacity(tokens.len());
        let mut complex = Vec::new();
        for token in &tokens {
            let flagged = match token {
                Token::Word(word) => {
                    report.words += 1;
                    let verdict = classifier.classify(word).await;
                    if verdict.complex {
                        complex.push(verdict.word);
                    }
                    verdict.complex
                }
                Token::Space(_) => false,
            };
            flags.push(flagged);
        }

        if complex.is_empty() {
            continue;
        }
        report.marked += complex.len();
        per_node.push(complex);
        replace_with_marks(dom, node, &tokens, &flags);
    }

    report.complex = per_node.into_iter().rev().flatten().collect();
    log::debug!(
        "marked {} of {} words ({} stale marks removed)",
        report.marked,
        report.words,
        stripped
    );
    report
}

/// Swap a text node for plain runs and mark elements.
fn replace_with_marks(dom: &mut ArenaDom, node: ArenaNodeId, tokens: &[Token<'_>], flags: &[bool]) {
    let mut plain = String::new();
    for (token, &flagged) in tokens.iter().zip(flags) {
        if !flagged {
            plain.push_str(token.as_str());
            continue;
        }
        if !plain.is_empty() {
            let run = dom.create_text(std::mem::take(&mut plain));
            dom.insert_before(node, run);
        }
        let mark = dom.create_element(html_name(MARK_TAG), vec![Attribute::new("class", MARK_CLASS)]);
        dom.append_text(mark, token.as_str());
        dom.insert_before(node, mark);
    }
    if !plain.is_empty() {
        let run = dom.create_text(plain);
        dom.insert_before(node, run);
    }
    dom.detach(node);
}
