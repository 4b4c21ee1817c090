//! Factory-call code generator.
//!
//! These free functions are the default bodies of the [`Stringifier`]
//! methods. Each takes the stringifier so that recursive calls go back
//! through the trait and reach any overridden method.

use crate::attributes::is_boolean_attribute;
use crate::config::Config;
use crate::node::{
    AttrValue, Attributes, Component, Element, Node, Piece, RawBlock, TextSegment,
};
use crate::text::{is_identifier_part, is_identifier_start};
use crate::traits::{DefaultStringifier, Stringifier};

/// Longest literal text that may sit on its parent's line.
pub const INLINE_TEXT_LIMIT: usize = 60;

/// Render `node` with the default stringifier.
pub fn render(node: &Node, config: &Config) -> String {
    DefaultStringifier.node(node, 0, config)
}

pub fn node<S: Stringifier + ?Sized>(s: &S, node: &Node, depth: usize, config: &Config) -> String {
    match node {
        Node::Element(element) => s.element(element, depth, config),
        Node::Component(component) => s.component(component, depth, config),
        Node::Text(text) => text
            .segments
            .iter()
            .map(|segment| s.text(segment, config))
            .collect::<Vec<_>>()
            .join(", "),
        Node::RawBlock(block) => s.raw_block(block, depth, config),
    }
}

pub fn element<S: Stringifier + ?Sized>(
    s: &S,
    element: &Element,
    depth: usize,
    config: &Config,
) -> String {
    format!(
        "{}({}, {}{})",
        config.element,
        quote(&element.tag_name),
        s.props(&element.attributes, depth, config),
        s.children(&element.children, depth, config),
    )
}

pub fn component<S: Stringifier + ?Sized>(
    s: &S,
    component: &Component,
    depth: usize,
    config: &Config,
) -> String {
    format!(
        "{}({}, {}{})",
        config.component,
        component.reference,
        s.props(&component.attributes, depth, config),
        s.children(&component.children, depth, config),
    )
}

pub fn text(segment: &TextSegment, config: &Config) -> String {
    let inner = match segment {
        TextSegment::Literal(literal) => quote(literal),
        TextSegment::Expression(expr) => expr.clone(),
    };

    match config.text_factory() {
        Some(factory) => format!("{factory}({inner})"),
        None => inner,
    }
}

pub fn props<S: Stringifier + ?Sized>(
    s: &S,
    attributes: &Attributes,
    depth: usize,
    config: &Config,
) -> String {
    if attributes.is_empty() {
        return "null".to_string();
    }

    let entries = attributes
        .iter()
        .map(|(name, value)| {
            let value = match value {
                AttrValue::StringLiteral(literal) => quote(literal),
                AttrValue::BooleanFlag if is_boolean_attribute(name) => "true".to_string(),
                AttrValue::BooleanFlag => "'true'".to_string(),
                AttrValue::RawExpression(expr) => expr.trim().to_string(),
                AttrValue::Nested(block) => s.raw_block(block, depth + 1, config),
            };
            format!("{}: {}", prop_key(name), value)
        })
        .collect::<Vec<_>>()
        .join(", ");

    format!("{{{entries}}}")
}

/// Children as trailing call arguments.
///
/// Nothing when there are none, `, child` when a single short child fits on
/// the parent's line, otherwise one child per line indented one level deeper
/// than the parent, with the parent's closing paren on its own line.
pub fn children<S: Stringifier + ?Sized>(
    s: &S,
    children: &[Node],
    depth: usize,
    config: &Config,
) -> String {
    let mut items = Vec::new();
    for child in children {
        match child {
            Node::Text(text) => {
                for segment in &text.segments {
                    items.push((s.text(segment, config), segment_fits_inline(segment)));
                }
            }
            other => items.push((s.node(other, depth + 1, config), node_fits_inline(other))),
        }
    }

    match items.as_slice() {
        [] => String::new(),
        [(item, true)] => format!(", {item}"),
        _ => {
            let pad = indent(config, depth + 1);
            let body = items
                .iter()
                .map(|(item, _)| format!("{pad}{item}"))
                .collect::<Vec<_>>()
                .join(",\n");
            format!(",\n{body}\n{}", indent(config, depth))
        }
    }
}

/// Code pieces verbatim, markup pieces rendered at `depth`.
pub fn raw_block<S: Stringifier + ?Sized>(
    s: &S,
    block: &RawBlock,
    depth: usize,
    config: &Config,
) -> String {
    block
        .pieces
        .iter()
        .map(|piece| match piece {
            Piece::Code(code) => code.clone(),
            Piece::Markup(node) => s.node(node, depth, config),
        })
        .collect()
}

fn segment_fits_inline(segment: &TextSegment) -> bool {
    match segment {
        TextSegment::Literal(literal) => {
            literal.chars().count() <= INLINE_TEXT_LIMIT && !literal.contains('\n')
        }
        TextSegment::Expression(_) => true,
    }
}

fn node_fits_inline(node: &Node) -> bool {
    match node {
        Node::Element(_) | Node::Component(_) => node.children().is_empty(),
        Node::Text(_) | Node::RawBlock(_) => true,
    }
}

/// Single-quoted JavaScript string literal.
pub fn quote(s: &str) -> String {
    let escaped = s
        .replace('\\', "\\\\")
        .replace('\'', "\\'")
        .replace('\n', "\\n")
        .replace('\r', "\\r");
    format!("'{escaped}'")
}

/// Object key for a prop, quoted unless it is a plain identifier.
fn prop_key(name: &str) -> String {
    let mut chars = name.chars();
    let plain = chars.next().is_some_and(is_identifier_start) && chars.all(is_identifier_part);
    if plain {
        name.to_string()
    } else {
        quote(name)
    }
}

fn indent(config: &Config, depth: usize) -> String {
    config.indent.repeat(depth)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_fragment;

    fn rendered(source: &str) -> String {
        render(&parse_fragment(source).unwrap(), &Config::default())
    }

    #[test]
    fn nested_element_with_children_uses_block_form() {
        assert_eq!(
            rendered("<div><div>text</div></div>"),
            "h('div', null,\n\th('div', null, 'text')\n)"
        );
    }

    #[test]
    fn childless_component_child_stays_inline() {
        assert_eq!(rendered(r#"<B key="b"><A /></B>"#), "h(B, {key: 'b'}, h(A, null))");
    }

    #[test]
    fn expression_with_markup_is_rendered_in_place() {
        assert_eq!(
            rendered("<div>{[<div></div>]}</div>"),
            "h('div', null, [h('div', null)])"
        );
    }

    #[test]
    fn renders_boolean_props() {
        assert_eq!(
            rendered(r#"<div class="oh" checked></div>"#),
            "h('div', {class: 'oh', checked: true})"
        );
        assert_eq!(
            rendered(r#"<input data-id="1" required foo>"#),
            "h('input', {'data-id': '1', required: true, foo: 'true'})"
        );
    }

    #[test]
    fn expression_props_are_verbatim() {
        assert_eq!(
            rendered("<p class={name}>hello world</p>"),
            "h('p', {class: name}, 'hello world')"
        );
    }

    #[test]
    fn indentation_follows_depth() {
        assert_eq!(
            rendered("<a><b><c>x</c></b></a>"),
            "h('a', null,\n\th('b', null,\n\t\th('c', null, 'x')\n\t)\n)"
        );
    }

    #[test]
    fn siblings_go_on_separate_lines() {
        assert_eq!(
            rendered("<ul><li>a</li><li>b</li></ul>"),
            "h('ul', null,\n\th('li', null, 'a'),\n\th('li', null, 'b')\n)"
        );
    }

    #[test]
    fn each_text_segment_is_a_child() {
        assert_eq!(
            rendered("<p>Hi {name}!</p>"),
            "h('p', null,\n\t'Hi ',\n\tname,\n\t'!'\n)"
        );
    }

    #[test]
    fn long_text_is_not_inlined() {
        let long = "a".repeat(INLINE_TEXT_LIMIT + 1);
        assert_eq!(
            rendered(&format!("<p>{long}</p>")),
            format!("h('p', null,\n\t'{long}'\n)")
        );

        let fits = "a".repeat(INLINE_TEXT_LIMIT);
        assert_eq!(
            rendered(&format!("<p>{fits}</p>")),
            format!("h('p', null, '{fits}')")
        );
    }

    #[test]
    fn escapes_string_literals() {
        assert_eq!(
            rendered(r#"<p title="it's">a\b</p>"#),
            r"h('p', {title: 'it\'s'}, 'a\\b')"
        );
    }

    #[test]
    fn nested_attribute_markup_is_rendered() {
        assert_eq!(
            rendered(r#"<Card icon={<Icon name="x" />} />"#),
            "h(Card, {icon: h(Icon, {name: 'x'})})"
        );
    }

    #[test]
    fn uses_configured_factories_and_indent() {
        let config = Config::default()
            .with_element("el")
            .with_component("React.createElement")
            .with_text("t")
            .with_indent("  ");
        let node = parse_fragment("<ul><Item>{label}</Item><li>x</li></ul>").unwrap();

        assert_eq!(
            render(&node, &config),
            "el('ul', null,\n  React.createElement(Item, null, t(label)),\n  el('li', null, t('x'))\n)"
        );
    }

    #[test]
    fn empty_text_factory_is_ignored() {
        let config = Config::default().with_text("");
        let node = parse_fragment("<b>x</b>").unwrap();

        assert_eq!(render(&node, &config), "h('b', null, 'x')");
    }

    #[test]
    fn dotted_component_is_unquoted() {
        assert_eq!(rendered("<Menu.Item />"), "h(Menu.Item, null)");
    }

    #[test]
    fn overridden_method_is_used_recursively() {
        struct Shouting;

        impl Stringifier for Shouting {
            fn text(&self, segment: &TextSegment, config: &Config) -> String {
                match segment {
                    TextSegment::Literal(literal) => quote(&literal.to_uppercase()),
                    other => text(other, config),
                }
            }
        }

        let node = parse_fragment("<div><p>hi</p></div>").unwrap();
        assert_eq!(
            Shouting.node(&node, 0, &Config::default()),
            "h('div', null,\n\th('p', null, 'HI')\n)"
        );
    }

    #[test]
    fn quote_escapes() {
        assert_eq!(quote("plain"), "'plain'");
        assert_eq!(quote("it's"), r"'it\'s'");
        assert_eq!(quote("a\nb"), r"'a\nb'");
    }
}
