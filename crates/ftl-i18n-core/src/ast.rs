use alloc::boxed::Box;
use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;

/// A parsed entry. Entries whose value is plain text with no attributes take the
/// `Text` fast path; everything else is a `Node`.
#[derive(Debug, Clone, PartialEq)]
pub enum EntryValue {
    Text(String),
    Node(EntryNode),
}

#[derive(Debug, Clone, PartialEq)]
pub struct EntryNode {
    pub value: Option<Pattern>,
    pub attributes: Option<BTreeMap<String, Pattern>>,
}

impl EntryValue {
    pub fn value(&self) -> Option<&Pattern> {
        match self {
            EntryValue::Text(_) => None,
            EntryValue::Node(node) => node.value.as_ref(),
        }
    }

    pub fn attribute(&self, name: &str) -> Option<&Pattern> {
        match self {
            EntryValue::Text(_) => None,
            EntryValue::Node(node) => node.attributes.as_ref()?.get(name),
        }
    }

    pub fn attributes(&self) -> impl Iterator<Item = (&str, &Pattern)> {
        let attributes = match self {
            EntryValue::Text(_) => None,
            EntryValue::Node(node) => node.attributes.as_ref(),
        };
        attributes
            .into_iter()
            .flat_map(|map| map.iter().map(|(name, pattern)| (name.as_str(), pattern)))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Pattern {
    Text(String),
    Elements(Vec<PatternElement>),
}

impl Pattern {
    /// Returns the select expression when this pattern is a bare variant list,
    /// i.e. its first element is a select with no selector.
    pub fn variant_list(&self) -> Option<&SelectExpression> {
        match self {
            Pattern::Elements(elements) => match elements.first() {
                Some(PatternElement::Placeable(Expression::Select(select)))
                    if select.selector.is_none() =>
                {
                    Some(select)
                }
                _ => None,
            },
            Pattern::Text(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PatternElement {
    Text(String),
    Placeable(Expression),
}

#[derive(Debug, Clone, PartialEq)]
pub struct NumberLiteral {
    pub raw: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionReference {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Number(NumberLiteral),
    String(String),
    Variable {
        name: String,
    },
    Reference {
        name: String,
    },
    Attribute {
        id: String,
        name: String,
    },
    Variant {
        id: String,
        key: VariantKey,
    },
    Call {
        callee: FunctionReference,
        arguments: Vec<CallArgument>,
    },
    Select(SelectExpression),
}

#[derive(Debug, Clone, PartialEq)]
pub enum CallArgument {
    Positional(Expression),
    Named { name: String, value: Expression },
}

#[derive(Debug, Clone, PartialEq)]
pub enum VariantKey {
    Number(NumberLiteral),
    Keyword(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Variant {
    pub key: VariantKey,
    pub value: Pattern,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SelectExpression {
    pub selector: Option<Box<Expression>>,
    pub variants: Vec<Variant>,
    pub default: Option<usize>,
}

impl SelectExpression {
    pub fn default_variant(&self) -> Option<&Variant> {
        self.default.and_then(|index| self.variants.get(index))
    }
}
