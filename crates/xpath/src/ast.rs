//! Syntax tree for the supported XPath subset.

use smallvec::SmallVec;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Child,
    Descendant,
    DescendantOrSelf,
    SelfNode,
    Parent,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeTest {
    /// Element name, compared ASCII case-insensitively as in HTML documents.
    Name(String),
    /// `*`: any element.
    Wildcard,
    /// `node()`: the document node or any element.
    AnyNode,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    pub axis: Axis,
    pub test: NodeTest,
    pub predicates: SmallVec<[Expr; 2]>,
}

impl Step {
    pub fn new(axis: Axis, test: NodeTest) -> Self {
        Self {
            axis,
            test,
            predicates: SmallVec::new(),
        }
    }

    /// The expansion of `//`.
    pub fn descendant_or_self() -> Self {
        Self::new(Axis::DescendantOrSelf, NodeTest::AnyNode)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LocationPath {
    /// Absolute paths start at the document node, relative ones at the context node.
    pub absolute: bool,
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Function {
    Contains,
    StartsWith,
    Concat,
    Not,
    Position,
    Last,
    NormalizeSpace,
    String,
    True,
    False,
}

impl Function {
    pub fn lookup(name: &str) -> Option<Self> {
        Some(match name {
            "contains" => Self::Contains,
            "starts-with" => Self::StartsWith,
            "concat" => Self::Concat,
            "not" => Self::Not,
            "position" => Self::Position,
            "last" => Self::Last,
            "normalize-space" => Self::NormalizeSpace,
            "string" => Self::String,
            "true" => Self::True,
            "false" => Self::False,
            _ => return None,
        })
    }

    /// Accepted argument counts, inclusive.
    pub fn arity(self) -> (usize, usize) {
        match self {
            Self::Contains | Self::StartsWith => (2, 2),
            Self::Concat => (2, usize::MAX),
            Self::Not | Self::NormalizeSpace | Self::String => (1, 1),
            Self::Position | Self::Last | Self::True | Self::False => (0, 0),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Or(Box<Expr>, Box<Expr>),
    And(Box<Expr>, Box<Expr>),
    Compare {
        negated: bool,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Number(f64),
    Literal(String),
    /// `@name` on the context element.
    Attribute(String),
    Call { function: Function, args: Vec<Expr> },
}
