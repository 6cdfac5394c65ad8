//! Parsed query tree.
//!
//! Represents parsed queries before compilation to backend representations.
//! Trees are single-owner and immutable after construction; backends walk
//! them read-only, so any number of compilations may share one tree.

use std::fmt;

use crate::operator::{LogicalOperator, ProximityKind};

/// A parsed query: the root sibling sequence plus its validated source text.
///
/// The source text rides along so that later compilation errors can quote
/// the offending query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    /// Root clauses in source order.
    pub nodes: Vec<QueryNode>,
    /// The validated, normalized text the tree was parsed from.
    pub text: String,
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}

/// One clause of a query.
///
/// Each clause owns the operator joining it to its following sibling;
/// the final sibling carries the default `And`, which backends trim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryNode {
    /// A single unquoted search term.
    Literal {
        /// The term text.
        text: String,
        /// The clause was prefixed with `-`.
        exclude: bool,
        /// Join with the following sibling.
        operator: LogicalOperator,
    },

    /// A quoted multi-word phrase, quotes stripped.
    Phrase {
        /// The phrase text, without surrounding quotes.
        text: String,
        /// The clause was prefixed with `-`.
        exclude: bool,
        /// Join with the following sibling.
        operator: LogicalOperator,
    },

    /// A parenthesized sub-query; owns its children exclusively.
    Group {
        /// Child clauses in source order.
        children: Vec<QueryNode>,
        /// The clause was prefixed with `-`.
        exclude: bool,
        /// Join with the following sibling.
        operator: LogicalOperator,
    },

    /// A proximity relation between two adjacent clauses.
    ///
    /// The right operand's own trailing operator has been hoisted onto this
    /// node; both operands carry the default `And`.
    Proximity {
        /// Left operand; exactly one clause.
        left: Box<QueryNode>,
        /// Right operand; exactly one clause.
        right: Box<QueryNode>,
        /// The clause was prefixed with `-`.
        exclude: bool,
        /// Join with the following sibling.
        operator: LogicalOperator,
        /// Whether operand order matters.
        kind: ProximityKind,
        /// Maximum positions between the operands, in `1..=15`.
        distance: u8,
    },
}

impl QueryNode {
    /// The operator joining this clause to its following sibling.
    pub fn operator(&self) -> LogicalOperator {
        match self {
            Self::Literal { operator, .. }
            | Self::Phrase { operator, .. }
            | Self::Group { operator, .. }
            | Self::Proximity { operator, .. } => *operator,
        }
    }

    /// Whether this clause was prefixed with `-`.
    pub fn exclude(&self) -> bool {
        match self {
            Self::Literal { exclude, .. }
            | Self::Phrase { exclude, .. }
            | Self::Group { exclude, .. }
            | Self::Proximity { exclude, .. } => *exclude,
        }
    }

    /// Replaces the trailing operator. Used while assembling proximity
    /// nodes, whose operands give up their own operators.
    pub(crate) fn set_operator(&mut self, op: LogicalOperator) {
        match self {
            Self::Literal { operator, .. }
            | Self::Phrase { operator, .. }
            | Self::Group { operator, .. }
            | Self::Proximity { operator, .. } => *operator = op,
        }
    }
}

impl fmt::Display for QueryNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dash = if self.exclude() { "-" } else { "" };
        match self {
            Self::Literal { text, .. } => write!(f, "{dash}{text}"),
            Self::Phrase { text, .. } => write!(f, "{dash}\"{text}\""),
            Self::Group { children, .. } => {
                write!(f, "{dash}({})", render_siblings(children))
            }
            Self::Proximity {
                left,
                right,
                kind,
                distance,
                ..
            } => write!(f, "{left} {}{distance} {right}", kind.letter()),
        }
    }
}

/// Renders a sibling sequence back to human query syntax.
///
/// Lossy reconstruction: implicit `AND` joins become explicit. Used for
/// error messages that quote a sub-query.
pub fn render_siblings(nodes: &[QueryNode]) -> String {
    let mut out = String::new();
    for (i, node) in nodes.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        out.push_str(&node.to_string());
        if i + 1 < nodes.len() {
            out.push(' ');
            out.push_str(&node.operator().to_string());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn literal(text: &str, operator: LogicalOperator) -> QueryNode {
        QueryNode::Literal {
            text: text.into(),
            exclude: false,
            operator,
        }
    }

    #[test]
    fn literal_display() {
        let node = QueryNode::Literal {
            text: "sale".into(),
            exclude: true,
            operator: LogicalOperator::And,
        };
        assert_eq!(node.to_string(), "-sale");
    }

    #[test]
    fn phrase_display_restores_quotes() {
        let node = QueryNode::Phrase {
            text: "electric car".into(),
            exclude: false,
            operator: LogicalOperator::And,
        };
        assert_eq!(node.to_string(), "\"electric car\"");
    }

    #[test]
    fn group_display_joins_with_operators() {
        let node = QueryNode::Group {
            children: vec![
                literal("patrol", LogicalOperator::Or),
                literal("diesel", LogicalOperator::And),
            ],
            exclude: true,
            operator: LogicalOperator::And,
        };
        assert_eq!(node.to_string(), "-(patrol OR diesel)");
    }

    #[test]
    fn proximity_display() {
        let node = QueryNode::Proximity {
            left: Box::new(literal("Opel", LogicalOperator::And)),
            right: Box::new(literal("car", LogicalOperator::And)),
            exclude: false,
            operator: LogicalOperator::And,
            kind: ProximityKind::Near,
            distance: 5,
        };
        assert_eq!(node.to_string(), "Opel N5 car");
    }

    #[test]
    fn render_siblings_drops_trailing_operator() {
        let nodes = vec![
            literal("Opel", LogicalOperator::Or),
            literal("car", LogicalOperator::And),
        ];
        assert_eq!(render_siblings(&nodes), "Opel OR car");
    }
}
