//! Flat boolean query-string compilation.
//!
//! Emits the document engine's native text syntax: literal `AND`/`OR`
//! keywords, `NOT` prefixes for excluded clauses, double-quoted phrases,
//! parenthesized groups, and slop-phrase expressions for proximity.

use hsq_parse::{Query, QueryNode};

use crate::error::CompileError;

/// Compiles query trees into flat boolean query strings.
#[derive(Debug, Clone, Copy, Default)]
pub struct FlatTextCompiler;

impl FlatTextCompiler {
    /// Creates a compiler.
    pub fn new() -> Self {
        Self
    }

    /// Compiles the query into a flat boolean query string.
    ///
    /// The finished string never ends in a dangling `AND`/`OR` keyword.
    pub fn compile(&self, query: &Query) -> Result<String, CompileError> {
        let body = self.compile_siblings(&query.nodes)?;
        Ok(trim_dangling_keywords(&body))
    }

    /// Compiles one sibling sequence; every clause leaves a trailing
    /// keyword for the next one.
    fn compile_siblings(&self, nodes: &[QueryNode]) -> Result<String, CompileError> {
        let mut out = String::new();
        for node in nodes {
            out.push_str(&self.compile_node(node)?);
        }
        Ok(out)
    }

    /// Compiles a single clause, trailing keyword included.
    fn compile_node(&self, node: &QueryNode) -> Result<String, CompileError> {
        match node {
            QueryNode::Literal {
                text,
                exclude,
                operator,
            } => Ok(format!(
                "{}{} {} ",
                not_prefix(*exclude),
                escape_colons(text),
                operator.keyword()
            )),
            QueryNode::Phrase {
                text,
                exclude,
                operator,
            } => Ok(format!(
                "{}\"{text}\" {} ",
                not_prefix(*exclude),
                operator.keyword()
            )),
            QueryNode::Group {
                children,
                exclude,
                operator,
            } => {
                let inner = self.compile_siblings(children)?;
                Ok(format!(
                    "{}({}) {} ",
                    not_prefix(*exclude),
                    trim_dangling_keywords(&inner),
                    operator.keyword()
                ))
            }
            QueryNode::Proximity {
                left,
                right,
                operator,
                distance,
                ..
            } => {
                // The flat syntax has no ordered/unordered distinction; both
                // kinds become the same slop-phrase expression.
                let l = operand_text(left)?;
                let r = operand_text(right)?;
                Ok(format!(
                    r#"("\"{l}\" \"{r}\""~{distance}) {} "#,
                    operator.keyword()
                ))
            }
        }
    }
}

/// Renders a proximity operand as flat query text without outer wrapping:
/// a literal's text, a phrase kept double-quoted, or a group's interior
/// joined flat. The `exclude` flag has no meaning inside a proximity
/// relation and is ignored.
pub(crate) fn operand_text(node: &QueryNode) -> Result<String, CompileError> {
    match node {
        QueryNode::Literal { text, .. } => Ok(escape_colons(text)),
        QueryNode::Phrase { text, .. } => Ok(format!("\"{text}\"")),
        QueryNode::Group { children, .. } => {
            let inner = FlatTextCompiler::new().compile_siblings(children)?;
            Ok(trim_dangling_keywords(&inner))
        }
        QueryNode::Proximity { .. } => Err(CompileError::InvalidApiUse {
            clause: node.to_string(),
        }),
    }
}

/// Escapes `:` so a term cannot be misread as field syntax.
pub(crate) fn escape_colons(text: &str) -> String {
    text.replace(':', "\\:")
}

/// The exclusion prefix.
pub(crate) fn not_prefix(exclude: bool) -> &'static str {
    if exclude { "NOT " } else { "" }
}

/// Trims trailing dangling `AND`/`OR` keywords and whitespace.
///
/// Only whole trailing keywords are removed; a term that merely ends in
/// `AND` (e.g. `BRAND`) is left alone.
fn trim_dangling_keywords(body: &str) -> String {
    let mut out = body.trim_end();
    loop {
        let stripped = out
            .strip_suffix("AND")
            .or_else(|| out.strip_suffix("OR"))
            .filter(|rest| rest.is_empty() || rest.ends_with(' '));
        match stripped {
            Some(rest) => out = rest.trim_end(),
            None => break,
        }
    }
    out.to_string()
}

#[cfg(test)]
mod tests {
    use hsq_parse::parse;

    use super::*;

    fn compile(input: &str) -> String {
        FlatTextCompiler::new().compile(&parse(input).unwrap()).unwrap()
    }

    #[test]
    fn literals_join_with_keywords() {
        assert_eq!(compile("Opel AND car"), "Opel AND car");
        assert_eq!(compile("Opel OR car"), "Opel OR car");
        assert_eq!(compile("Opel car"), "Opel AND car");
    }

    #[test]
    fn exclusion_prefixes_not() {
        assert_eq!(compile("Opel -sale"), "Opel AND NOT sale");
    }

    #[test]
    fn phrases_keep_quotes() {
        assert_eq!(
            compile("\"electric car\" OR diesel"),
            "\"electric car\" OR diesel"
        );
        assert_eq!(compile("-\"market report\""), "NOT \"market report\"");
    }

    #[test]
    fn groups_parenthesized() {
        assert_eq!(
            compile("Opel AND (patrol OR diesel) -sale"),
            "Opel AND (patrol OR diesel) AND NOT sale"
        );
    }

    #[test]
    fn excluded_group() {
        assert_eq!(compile("Opel -(auto car)"), "Opel AND NOT (auto AND car)");
    }

    #[test]
    fn colons_escaped() {
        assert_eq!(compile("intitle:Opel"), "intitle\\:Opel");
    }

    #[test]
    fn proximity_is_slop_phrase() {
        assert_eq!(
            compile("Opel N2 car AND sale"),
            "(\"\\\"Opel\\\" \\\"car\\\"\"~2) AND sale"
        );
    }

    #[test]
    fn ordered_proximity_same_syntax() {
        assert_eq!(compile("Opel W5 car"), "(\"\\\"Opel\\\" \\\"car\\\"\"~5)");
    }

    #[test]
    fn proximity_group_operands_join_flat() {
        assert_eq!(
            compile("(indigenous OR texas) W2 (\"debt financing\" OR lalala)"),
            "(\"\\\"indigenous OR texas\\\" \\\"\"debt financing\" OR lalala\\\"\"~2)"
        );
    }

    #[test]
    fn no_trailing_keyword() {
        for input in ["Opel", "Opel AND car", "(patrol OR diesel)", "Opel N1 car"] {
            let out = compile(input);
            assert!(!out.ends_with("AND") && !out.ends_with("OR"), "dangling: {out:?}");
        }
    }

    #[test]
    fn trailing_keyword_trim_spares_terms() {
        assert_eq!(trim_dangling_keywords("BRAND "), "BRAND");
        assert_eq!(trim_dangling_keywords("Opel AND "), "Opel");
        assert_eq!(trim_dangling_keywords("Opel OR"), "Opel");
    }
}
