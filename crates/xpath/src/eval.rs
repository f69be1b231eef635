//! Node-set evaluation of a parsed [`LocationPath`] against a document.

use std::collections::{HashMap, HashSet};

use crate::ast::{Axis, Expr, Function, LocationPath, NodeTest, Step};
use selpath_html::{Document, NodeId};

/// Intermediate value of a predicate expression.
#[derive(Debug, Clone, PartialEq)]
enum Value {
    Boolean(bool),
    Number(f64),
    Text(String),
    /// An attribute lookup; `None` is the empty node-set.
    Attribute(Option<String>),
}

impl Value {
    fn truthy(&self) -> bool {
        match self {
            Self::Boolean(flag) => *flag,
            Self::Number(number) => *number != 0.0 && !number.is_nan(),
            Self::Text(text) => !text.is_empty(),
            Self::Attribute(attr) => attr.is_some(),
        }
    }

    fn into_text(self) -> String {
        match self {
            Self::Boolean(flag) => flag.to_string(),
            Self::Number(number) => format_number(number),
            Self::Text(text) => text,
            Self::Attribute(attr) => attr.unwrap_or_default(),
        }
    }

    fn as_number(&self) -> f64 {
        match self {
            Self::Boolean(flag) => f64::from(u8::from(*flag)),
            Self::Number(number) => *number,
            Self::Text(text) | Self::Attribute(Some(text)) => text.trim().parse().unwrap_or(f64::NAN),
            Self::Attribute(None) => f64::NAN,
        }
    }
}

fn format_number(number: f64) -> String {
    if number.fract() == 0.0 && number.is_finite() {
        format!("{number:.0}")
    } else {
        number.to_string()
    }
}

struct Focus {
    node: NodeId,
    position: usize,
    size: usize,
}

/// Evaluates location paths over one document.
pub struct Evaluator<'d> {
    document: &'d Document,
    order: HashMap<NodeId, usize>,
}

impl<'d> Evaluator<'d> {
    pub fn new(document: &'d Document) -> Self {
        let order = core::iter::once(document.root())
            .chain(document.elements())
            .enumerate()
            .map(|(index, node)| (node, index))
            .collect();
        Self { document, order }
    }

    /// Every node selected by `path`, deduplicated, in document order.
    pub fn select(&self, path: &LocationPath, context: NodeId) -> Vec<NodeId> {
        let start = if path.absolute { self.document.root() } else { context };
        let mut current = vec![start];
        for step in &path.steps {
            current = self.apply_step(step, &current);
            if current.is_empty() {
                break;
            }
        }
        current
    }

    fn apply_step(&self, step: &Step, inputs: &[NodeId]) -> Vec<NodeId> {
        let mut seen = HashSet::new();
        let mut output = Vec::new();
        for &input in inputs {
            let mut candidates: Vec<NodeId> = self
                .axis(step.axis, input)
                .into_iter()
                .filter(|node| self.passes_test(&step.test, *node))
                .collect();
            for predicate in &step.predicates {
                let size = candidates.len();
                candidates = candidates
                    .into_iter()
                    .enumerate()
                    .filter(|(index, node)| {
                        let focus = Focus {
                            node: *node,
                            position: index + 1,
                            size,
                        };
                        self.predicate_holds(predicate, &focus)
                    })
                    .map(|(_, node)| node)
                    .collect();
            }
            output.extend(candidates.into_iter().filter(|node| seen.insert(*node)));
        }
        output.sort_by_key(|node| self.order.get(node).copied().unwrap_or(usize::MAX));
        output
    }

    fn axis(&self, axis: Axis, node: NodeId) -> Vec<NodeId> {
        match axis {
            Axis::Child => self.document.element_children(node).collect(),
            Axis::Descendant => self.document.descendant_elements(node).collect(),
            Axis::DescendantOrSelf => core::iter::once(node)
                .chain(self.document.descendant_elements(node))
                .collect(),
            Axis::SelfNode => vec![node],
            Axis::Parent => self.document.parent(node).into_iter().collect(),
        }
    }

    fn passes_test(&self, test: &NodeTest, node: NodeId) -> bool {
        match test {
            NodeTest::AnyNode => node == self.document.root() || self.document.is_element(node),
            NodeTest::Wildcard => self.document.is_element(node),
            NodeTest::Name(name) => self
                .document
                .local_name(node)
                .is_some_and(|local| local.eq_ignore_ascii_case(name)),
        }
    }

    fn predicate_holds(&self, predicate: &Expr, focus: &Focus) -> bool {
        match self.eval(predicate, focus) {
            Value::Number(number) => number == focus.position as f64,
            other => other.truthy(),
        }
    }

    fn eval(&self, expr: &Expr, focus: &Focus) -> Value {
        match expr {
            Expr::Or(left, right) => {
                Value::Boolean(self.eval(left, focus).truthy() || self.eval(right, focus).truthy())
            }
            Expr::And(left, right) => {
                Value::Boolean(self.eval(left, focus).truthy() && self.eval(right, focus).truthy())
            }
            Expr::Compare { negated, left, right } => {
                let left = self.eval(left, focus);
                let right = self.eval(right, focus);
                Value::Boolean(compare(&left, &right, *negated))
            }
            Expr::Number(number) => Value::Number(*number),
            Expr::Literal(text) => Value::Text(text.clone()),
            Expr::Attribute(name) => {
                Value::Attribute(self.document.attribute(focus.node, name).map(str::to_owned))
            }
            Expr::Call { function, args } => self.call(*function, args, focus),
        }
    }

    fn text_arg(&self, args: &[Expr], index: usize, focus: &Focus) -> String {
        args.get(index)
            .map(|arg| self.eval(arg, focus).into_text())
            .unwrap_or_default()
    }

    fn call(&self, function: Function, args: &[Expr], focus: &Focus) -> Value {
        match function {
            Function::Contains => {
                let haystack = self.text_arg(args, 0, focus);
                Value::Boolean(haystack.contains(&self.text_arg(args, 1, focus)))
            }
            Function::StartsWith => {
                let haystack = self.text_arg(args, 0, focus);
                Value::Boolean(haystack.starts_with(&self.text_arg(args, 1, focus)))
            }
            Function::Concat => Value::Text(
                args.iter()
                    .map(|arg| self.eval(arg, focus).into_text())
                    .collect(),
            ),
            Function::Not => Value::Boolean(
                !args
                    .first()
                    .is_some_and(|arg| self.eval(arg, focus).truthy()),
            ),
            Function::Position => Value::Number(focus.position as f64),
            Function::Last => Value::Number(focus.size as f64),
            Function::NormalizeSpace => Value::Text(
                self.text_arg(args, 0, focus)
                    .split_ascii_whitespace()
                    .collect::<Vec<_>>()
                    .join(" "),
            ),
            Function::String => Value::Text(self.text_arg(args, 0, focus)),
            Function::True => Value::Boolean(true),
            Function::False => Value::Boolean(false),
        }
    }
}

/// `=` / `!=` with XPath 1.0 conversion rules; an empty node-set never compares.
fn compare(left: &Value, right: &Value, negated: bool) -> bool {
    if matches!(left, Value::Attribute(None)) || matches!(right, Value::Attribute(None)) {
        return false;
    }
    let equal = match (left, right) {
        (Value::Boolean(_), _) | (_, Value::Boolean(_)) => left.truthy() == right.truthy(),
        (Value::Number(_), _) | (_, Value::Number(_)) => left.as_number() == right.as_number(),
        _ => left.clone().into_text() == right.clone().into_text(),
    };
    equal != negated
}
