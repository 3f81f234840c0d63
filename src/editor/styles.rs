//! Inline `style` attribute handling.
//!
//! Block primitives produce bare elements whose look depends on the host's
//! default stylesheet, so block intents stamp explicit declarations from
//! [`block_style`] on the element they just created.

use cssparser::{
    AtRuleParser, DeclarationParser, ParseError, Parser, ParserInput, ParserState,
    QualifiedRuleParser, RuleBodyItemParser, RuleBodyParser,
};

use crate::dom::{ArenaDom, ArenaNodeId};

type Declaration = (String, String);

/// Declarations applied to a freshly created block element.
pub fn block_style(tag: &str) -> Option<&'static str> {
    Some(match tag {
        "h1" => "font-size: 2em; font-weight: bold; margin: 0.67em 0",
        "h2" => "font-size: 1.5em; font-weight: bold; margin: 0.83em 0",
        "h3" => "font-size: 1.17em; font-weight: bold; margin: 1em 0",
        "h4" => "font-size: 1em; font-weight: bold; margin: 1.33em 0",
        "h5" => "font-size: 0.83em; font-weight: bold; margin: 1.67em 0",
        "h6" => "font-size: 0.67em; font-weight: bold; margin: 2.33em 0",
        "p" => "font-size: 1em; font-weight: normal; margin: 1em 0",
        "ul" => "list-style-type: disc; padding-left: 40px; margin: 1em 0",
        "ol" => "list-style-type: decimal; padding-left: 40px; margin: 1em 0",
        "li" => "display: list-item",
        _ => return None,
    })
}

/// Stamp the block declarations for the element's tag, if it has any.
pub fn apply_block_style(dom: &mut ArenaDom, node: ArenaNodeId) {
    let Some(style) = dom.local_name(node).and_then(block_style) else {
        return;
    };
    dom.set_attr(node, "style", style);
}

/// Parse a `style` attribute into `(property, value)` pairs.
///
/// Values are kept verbatim (quoted strings, `url(...)`, `!important`);
/// property names are lowercased. Malformed declarations are skipped.
pub fn parse_style(style: &str) -> Vec<Declaration> {
    let mut input = ParserInput::new(style);
    let mut parser = Parser::new(&mut input);
    let mut decl_parser = InlineStyleParser;
    RuleBodyParser::new(&mut parser, &mut decl_parser)
        .filter_map(Result::ok)
        .collect()
}

/// Declaration-list parser for inline styles; nested rules are rejected.
struct InlineStyleParser;

impl<'i> DeclarationParser<'i> for InlineStyleParser {
    type Declaration = Declaration;
    type Error = ();

    fn parse_value<'t>(
        &mut self,
        name: cssparser::CowRcStr<'i>,
        input: &mut Parser<'i, 't>,
        _start: &ParserState,
    ) -> Result<Self::Declaration, ParseError<'i, Self::Error>> {
        let start = input.position();
        while input.next().is_ok() {}
        let value = input.slice_from(start).trim();
        if value.is_empty() {
            return Err(input.new_custom_error(()));
        }
        Ok((name.to_ascii_lowercase(), value.to_string()))
    }
}

impl<'i> AtRuleParser<'i> for InlineStyleParser {
    type Prelude = ();
    type AtRule = Declaration;
    type Error = ();
}

impl<'i> QualifiedRuleParser<'i> for InlineStyleParser {
    type Prelude = ();
    type QualifiedRule = Declaration;
    type Error = ();
}

impl<'i> RuleBodyItemParser<'i, Declaration, ()> for InlineStyleParser {
    fn parse_declarations(&self) -> bool {
        true
    }
    fn parse_qualified(&self) -> bool {
        false
    }
}

fn write_style(dom: &mut ArenaDom, node: ArenaNodeId, decls: &[Declaration]) {
    if decls.is_empty() {
        dom.remove_attr(node, "style");
        return;
    }
    let style = decls
        .iter()
        .map(|(p, v)| format!("{p}: {v}"))
        .collect::<Vec<_>>()
        .join("; ");
    dom.set_attr(node, "style", style);
}

/// Read one style property of an element.
pub fn style_property(dom: &ArenaDom, node: ArenaNodeId, prop: &str) -> Option<String> {
    parse_style(dom.get_attr(node, "style")?)
        .into_iter()
        .find(|(p, _)| p == prop)
        .map(|(_, v)| v)
}

/// Set one style property, keeping the others.
pub fn set_style_property(dom: &mut ArenaDom, node: ArenaNodeId, prop: &str, value: &str) {
    let mut decls = parse_style(dom.get_attr(node, "style").unwrap_or_default());
    match decls.iter_mut().find(|(p, _)| p == prop) {
        Some((_, v)) => *v = value.to_string(),
        None => decls.push((prop.to_string(), value.to_string())),
    }
    write_style(dom, node, &decls);
}

/// Remove style properties; the attribute goes away once empty.
///
/// Returns whether anything was removed.
pub fn remove_style_properties(dom: &mut ArenaDom, node: ArenaNodeId, props: &[&str]) -> bool {
    let Some(style) = dom.get_attr(node, "style") else {
        return false;
    };
    let mut decls = parse_style(style);
    let before = decls.len();
    decls.retain(|(p, _)| !props.contains(&p.as_str()));
    let changed = decls.len() != before;
    if changed || decls.is_empty() {
        write_style(dom, node, &decls);
    }
    changed
}

#[cfg(test)]
mod tests {
    use super::*;

    fn element(dom: &mut ArenaDom, style: &str) -> ArenaNodeId {
        let node = dom.create_html_element("span");
        dom.set_attr(node, "style", style);
        node
    }

    #[test]
    fn test_parse_style() {
        assert_eq!(
            parse_style(" Color : red;;text-decoration:underline; bogus"),
            vec![
                ("color".to_string(), "red".to_string()),
                ("text-decoration".to_string(), "underline".to_string()),
            ]
        );
    }

    #[test]
    fn test_semicolons_inside_values_survive() {
        let mut dom = ArenaDom::new();
        let node = element(
            &mut dom,
            r#"background-image: url("data:image/png;base64,AAAA"); color: red !important"#,
        );
        assert_eq!(
            style_property(&dom, node, "color").as_deref(),
            Some("red !important")
        );

        set_style_property(&mut dom, node, "color", "blue");
        assert_eq!(
            dom.get_attr(node, "style"),
            Some(r#"background-image: url("data:image/png;base64,AAAA"); color: blue"#)
        );
    }

    #[test]
    fn test_set_and_remove_properties() {
        let mut dom = ArenaDom::new();
        let node = element(&mut dom, "color: red");

        set_style_property(&mut dom, node, "width", "10px");
        set_style_property(&mut dom, node, "color", "blue");
        assert_eq!(dom.get_attr(node, "style"), Some("color: blue; width: 10px"));
        assert_eq!(style_property(&dom, node, "width").as_deref(), Some("10px"));

        assert!(remove_style_properties(&mut dom, node, &["color", "width"]));
        assert_eq!(dom.get_attr(node, "style"), None);
        assert!(!remove_style_properties(&mut dom, node, &["color"]));
    }

    #[test]
    fn test_block_style_table() {
        let mut dom = ArenaDom::new();
        let h2 = dom.create_html_element("h2");
        let span = dom.create_html_element("span");
        apply_block_style(&mut dom, h2);
        apply_block_style(&mut dom, span);

        assert!(dom.get_attr(h2, "style").unwrap().contains("font-size: 1.5em"));
        assert_eq!(dom.get_attr(span, "style"), None);
    }
}
