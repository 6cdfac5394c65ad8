//! Query parser.
//!
//! Builds the query tree from validated text using recursive descent over
//! whitespace-split tokens.
//!
//! # Grammar
//!
//! ```text
//! query     → clause (operator clause)*
//! clause    → ['-'] ( WORD | '"' words '"' | '(' query ')' )
//! operator  → 'AND' | 'OR' | 'N'<1..15> | 'W'<1..15>
//! proximity → clause ('N'<k>|'W'<k>) clause
//! ```
//!
//! Each clause records the operator that follows it; a missing operator
//! defaults to `AND`. When the recorded operator is a proximity relation,
//! the following clause is consumed as well and both are folded into one
//! [`QueryNode::Proximity`].

use crate::{
    ast::{Query, QueryNode},
    error::SyntaxError,
    operator::{LogicalOperator, ProximityKind},
    validate::validate,
};

/// Validates `raw` and parses it into a query tree.
///
/// Empty input yields a query with no clauses.
pub fn parse(raw: &str) -> Result<Query, SyntaxError> {
    let text = validate(raw)?;
    let tokens: Vec<&str> = text.split(' ').filter(|t| !t.is_empty()).collect();
    let nodes = Parser { text: &text }.parse_siblings(&tokens)?;
    Ok(Query { nodes, text })
}

/// One parsed clause plus the token index just past its span.
struct Clause {
    /// The parsed node, its trailing operator already recorded.
    node: QueryNode,
    /// Index of the first token after the clause span.
    next: usize,
}

/// Recursive descent parser over validated tokens.
struct Parser<'a> {
    /// Validated query text, quoted in errors.
    text: &'a str,
}

impl Parser<'_> {
    /// Parses one sibling sequence (the whole query, or a group's interior).
    fn parse_siblings(&self, tokens: &[&str]) -> Result<Vec<QueryNode>, SyntaxError> {
        let mut nodes = Vec::new();
        let mut i = 0;
        while i < tokens.len() {
            if LogicalOperator::is_operator(tokens[i]) {
                // Operators are consumed while reading the preceding clause.
                i += 1;
                continue;
            }
            let clause = self.read_clause(tokens, i)?;
            let clause = match clause.node.operator() {
                LogicalOperator::Proximity { kind, distance } => {
                    self.fold_proximity(tokens, clause, kind, distance)?
                }
                _ => clause,
            };
            i = clause.next;
            nodes.push(clause.node);
        }
        Ok(nodes)
    }

    /// Reads one clause starting at `start`.
    fn read_clause(&self, tokens: &[&str], start: usize) -> Result<Clause, SyntaxError> {
        let mut token = tokens[start];
        let exclude = token.starts_with('-');
        if exclude {
            token = &token[1..];
        }
        if token.starts_with('(') {
            self.read_group(tokens, start, exclude)
        } else if token.starts_with('"') {
            Ok(self.read_phrase(tokens, start, exclude))
        } else {
            Ok(Clause {
                node: QueryNode::Literal {
                    text: token.to_string(),
                    exclude,
                    operator: trailing_operator(tokens, start),
                },
                next: start + 1,
            })
        }
    }

    /// Reads a parenthesized group, recursively parsing its interior.
    ///
    /// Scans forward tracking bracket depth: tokens starting with `(` or
    /// `-(` open a level, tokens ending in `)` close one. The span ends
    /// when depth returns to zero.
    fn read_group(&self, tokens: &[&str], start: usize, exclude: bool) -> Result<Clause, SyntaxError> {
        let mut depth = 0u32;
        let mut end = tokens.len() - 1;
        for (j, token) in tokens.iter().enumerate().skip(start) {
            if token.starts_with('(') || token.starts_with("-(") {
                depth += 1;
            }
            if token.ends_with(')') {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    end = j;
                    break;
                }
            }
        }

        let joined = tokens[start..=end].join(" ");
        let trimmed = joined.strip_prefix('-').unwrap_or(&joined);
        let inner = trimmed
            .strip_prefix('(')
            .and_then(|s| s.strip_suffix(')'))
            .unwrap_or(trimmed);
        let child_tokens: Vec<&str> = inner.split(' ').filter(|t| !t.is_empty()).collect();
        let children = self.parse_siblings(&child_tokens)?;

        Ok(Clause {
            node: QueryNode::Group {
                children,
                exclude,
                operator: trailing_operator(tokens, end),
            },
            next: end + 1,
        })
    }

    /// Reads a quoted phrase: the span runs until a token ends with `"`.
    fn read_phrase(&self, tokens: &[&str], start: usize, exclude: bool) -> Clause {
        let mut end = tokens.len() - 1;
        for (j, token) in tokens.iter().enumerate().skip(start) {
            if token.ends_with('"') {
                end = j;
                break;
            }
        }

        let joined = tokens[start..=end].join(" ");
        let trimmed = joined.strip_prefix('-').unwrap_or(&joined);
        let text = trimmed
            .strip_prefix('"')
            .and_then(|s| s.strip_suffix('"'))
            .unwrap_or(trimmed);

        Clause {
            node: QueryNode::Phrase {
                text: text.to_string(),
                exclude,
                operator: trailing_operator(tokens, end),
            },
            next: end + 1,
        }
    }

    /// Folds a clause whose trailing operator is a proximity relation
    /// together with the clause after it into one `Proximity` node.
    ///
    /// The node's own trailing operator is taken from the right operand,
    /// which gives its operator up; both operands revert to the default
    /// `And`.
    fn fold_proximity(
        &self,
        tokens: &[&str],
        left: Clause,
        kind: ProximityKind,
        distance: u8,
    ) -> Result<Clause, SyntaxError> {
        // left.next is the proximity operator token itself.
        let right_start = left.next + 1;
        if right_start >= tokens.len() {
            return Err(SyntaxError::ProximityArity {
                query: self.text.to_string(),
            });
        }
        let right = self.read_clause(tokens, right_start)?;

        let operator = right.node.operator();
        if operator.is_proximity() {
            // `a N2 b N3 c`: the middle clause cannot serve two relations.
            return Err(SyntaxError::ProximityArity {
                query: self.text.to_string(),
            });
        }

        let mut left_node = left.node;
        left_node.set_operator(LogicalOperator::And);
        let mut right_node = right.node;
        right_node.set_operator(LogicalOperator::And);

        Ok(Clause {
            node: QueryNode::Proximity {
                left: Box::new(left_node),
                right: Box::new(right_node),
                exclude: false,
                operator,
                kind,
                distance,
            },
            next: right.next,
        })
    }
}

/// The operator recorded for a clause ending at `span_end`: the next token
/// if it matches the operator grammar, else the default `And`.
fn trailing_operator(tokens: &[&str], span_end: usize) -> LogicalOperator {
    tokens
        .get(span_end + 1)
        .and_then(|t| LogicalOperator::parse(t))
        .unwrap_or_default()
}
