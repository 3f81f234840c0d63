//! Shared tag predicates for the normalizer, the marker and the editor.

/// Tags the normalizer keeps. Everything else is dissolved.
pub const ALLOWED_TAGS: &[&str] = &[
    "b",
    "strong",
    "i",
    "em",
    "u",
    "s",
    "strike",
    "a",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "ul",
    "ol",
    "li",
    "blockquote",
];

/// Attributes kept on every allowed tag.
pub const KEPT_ATTRIBUTES: &[&str] = &["id", "class"];

/// Extra attributes kept on anchors so normalized links stay links.
pub const KEPT_LINK_ATTRIBUTES: &[&str] = &["href", "target", "rel", "data-link-type"];

/// Tags whose subtree is dropped outright, text included.
pub const DROPPED_TAGS: &[&str] = &[
    "script", "style", "template", "noscript", "head", "title", "iframe", "object", "svg",
];

/// Check if a tag survives normalization.
pub fn is_allowed_tag(tag: &str) -> bool {
    ALLOWED_TAGS.contains(&tag)
}

/// Check if a tag is removed together with its content.
pub fn is_dropped_tag(tag: &str) -> bool {
    DROPPED_TAGS.contains(&tag)
}

/// Check if a tag is block-level for text extraction and paragraph grouping.
///
/// Safe: paragraphs, sectioning wrappers, headings, lists, quotes, tables.
/// Unsafe: anything inline (`span`, `b`, `a`, ...), which must not
/// introduce breaks between words.
pub fn is_block_tag(tag: &str) -> bool {
    matches!(
        tag,
        "p" | "div"
            | "section"
            | "article"
            | "main"
            | "header"
            | "footer"
            | "aside"
            | "nav"
            | "figure"
            | "figcaption"
            | "address"
            | "pre"
            | "h1"
            | "h2"
            | "h3"
            | "h4"
            | "h5"
            | "h6"
            | "ul"
            | "ol"
            | "li"
            | "dl"
            | "dt"
            | "dd"
            | "blockquote"
            | "table"
            | "thead"
            | "tbody"
            | "tfoot"
            | "tr"
            | "td"
            | "th"
            | "hr"
            | "body"
            | "html"
    )
}

/// Check if an allowed tag is a block that must not be nested inside `<p>`.
pub fn is_allowed_block(tag: &str) -> bool {
    matches!(
        tag,
        "h1" | "h2" | "h3" | "h4" | "h5" | "h6" | "ul" | "ol" | "li" | "blockquote"
    )
}

/// Heading level of an `h1`-`h6` tag.
pub fn heading_level(tag: &str) -> Option<u8> {
    match tag {
        "h1" => Some(1),
        "h2" => Some(2),
        "h3" => Some(3),
        "h4" => Some(4),
        "h5" => Some(5),
        "h6" => Some(6),
        _ => None,
    }
}
