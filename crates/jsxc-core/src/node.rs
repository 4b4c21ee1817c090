//! Node tree produced for one markup fragment.

/// A parsed markup node.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Lowercase tag such as `<div>`
    Element(Element),
    /// Uppercase or dotted tag such as `<Button>` or `<Menu.Item>`
    Component(Component),
    /// Literal text and `{expression}` runs between tags
    Text(Text),
    /// An `{expression}` child that itself contains markup
    RawBlock(RawBlock),
}

/// An intrinsic element, rendered with its tag name quoted.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub tag_name: String,
    pub attributes: Attributes,
    pub children: Vec<Node>,
    pub self_closing: bool,
}

/// A component reference, rendered unquoted.
#[derive(Debug, Clone, PartialEq)]
pub struct Component {
    pub reference: String,
    pub attributes: Attributes,
    pub children: Vec<Node>,
    pub self_closing: bool,
}

/// A run of text content.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Text {
    pub segments: Vec<TextSegment>,
}

/// Embedded code that contains nested fragments.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawBlock {
    /// The code exactly as written between the braces
    pub source_text: String,
    /// The same code split into verbatim code and parsed fragments
    pub pieces: Vec<Piece>,
}

/// A slice of host or embedded code after fragment location.
#[derive(Debug, Clone, PartialEq)]
pub enum Piece {
    /// Code copied through unchanged
    Code(String),
    /// A fragment to be replaced by its rendering
    Markup(Node),
}

/// One part of a [`Text`] node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextSegment {
    Literal(String),
    Expression(String),
}

/// An attribute value.
#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue {
    /// `name="value"`, `name='value'` or ``name=`value` ``
    StringLiteral(String),
    /// `name` with no value
    BooleanFlag,
    /// `name={expr}` with the braces stripped
    RawExpression(String),
    /// `name={expr}` where `expr` contains markup
    Nested(RawBlock),
}

/// Attributes in source order with unique names.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Attributes {
    entries: Vec<(String, AttrValue)>,
}

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an attribute. A repeated name keeps its first position and
    /// takes the new value.
    pub fn insert(&mut self, name: impl Into<String>, value: AttrValue) {
        let name = name.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&AttrValue> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttrValue)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = (&str, &mut AttrValue)> {
        self.entries.iter_mut().map(|(n, v)| (n.as_str(), v))
    }
}

impl FromIterator<(String, AttrValue)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (String, AttrValue)>>(iter: I) -> Self {
        let mut attributes = Self::new();
        for (name, value) in iter {
            attributes.insert(name, value);
        }
        attributes
    }
}

impl Element {
    pub fn new(tag_name: impl Into<String>) -> Self {
        Self {
            tag_name: tag_name.into(),
            attributes: Attributes::new(),
            children: Vec::new(),
            self_closing: false,
        }
    }
}

impl Component {
    pub fn new(reference: impl Into<String>) -> Self {
        Self {
            reference: reference.into(),
            attributes: Attributes::new(),
            children: Vec::new(),
            self_closing: false,
        }
    }
}

impl Node {
    /// Tag name or component reference.
    pub fn name(&self) -> Option<&str> {
        match self {
            Node::Element(e) => Some(&e.tag_name),
            Node::Component(c) => Some(&c.reference),
            Node::Text(_) | Node::RawBlock(_) => None,
        }
    }

    pub fn attributes(&self) -> Option<&Attributes> {
        match self {
            Node::Element(e) => Some(&e.attributes),
            Node::Component(c) => Some(&c.attributes),
            Node::Text(_) | Node::RawBlock(_) => None,
        }
    }

    pub fn children(&self) -> &[Node] {
        match self {
            Node::Element(e) => &e.children,
            Node::Component(c) => &c.children,
            Node::Text(_) | Node::RawBlock(_) => &[],
        }
    }

    /// Mutable child list, or `None` for nodes that cannot take children
    /// (text, raw blocks, self-closing and void tags).
    pub fn children_mut(&mut self) -> Option<&mut Vec<Node>> {
        match self {
            Node::Element(e) if !e.self_closing => Some(&mut e.children),
            Node::Component(c) if !c.self_closing => Some(&mut c.children),
            _ => None,
        }
    }

    pub fn is_self_closing(&self) -> bool {
        match self {
            Node::Element(e) => e.self_closing,
            Node::Component(c) => c.self_closing,
            Node::Text(_) | Node::RawBlock(_) => false,
        }
    }
}
