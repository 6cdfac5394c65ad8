//! Lexeme-based boolean expression compilation.
//!
//! Emits the relational full-text engine's syntax: `&`/`|` joins, `!` for
//! exclusion, and `<d>` distance operators for proximity. Leaf text goes
//! through an injected lexeme-normalization callback, which stands in for
//! the engine's own text-analysis step (stemming, folding); without one,
//! leaf text passes through unchanged.

use hsq_parse::{ProximityKind, Query, QueryNode};

use crate::error::CompileError;

/// Lexeme-normalization callback: `(config, raw_text) -> lexeme form`.
///
/// `config` selects a language/analysis profile (e.g. `"english"`). The
/// callback may block (a round trip to a normalization service is typical);
/// making that safe under concurrency is the caller's contract. It is
/// invoked once per leaf per compilation - repeated identical leaf text is
/// not memoized.
pub type Normalizer<'a> = dyn Fn(&str, &str) -> String + 'a;

/// Compiles query trees into lexeme-based boolean expressions.
pub struct PlainTextCompiler<'a> {
    /// Injected normalization; identity pass-through when absent.
    normalizer: Option<&'a Normalizer<'a>>,
    /// Analysis profile handed to the normalizer.
    config: String,
}

impl<'a> PlainTextCompiler<'a> {
    /// Creates a compiler for the given analysis profile, without a
    /// normalizer. `"english"` is the conventional default profile.
    pub fn new(config: impl Into<String>) -> Self {
        Self {
            normalizer: None,
            config: config.into(),
        }
    }

    /// Sets the lexeme-normalization callback.
    pub fn with_normalizer(mut self, normalizer: &'a Normalizer<'a>) -> Self {
        self.normalizer = Some(normalizer);
        self
    }

    /// Compiles the query into a boolean lexeme expression.
    ///
    /// The finished expression never ends in a dangling operator, and any
    /// single-quote characters the normalizer produced around lexemes are
    /// stripped.
    pub fn compile(&self, query: &Query) -> Result<String, CompileError> {
        let body = self.compile_siblings(&query.nodes)?;
        Ok(trim_dangling(&body).replace('\'', ""))
    }

    /// Compiles one sibling sequence; every clause leaves a trailing
    /// operator for the next one.
    fn compile_siblings(&self, nodes: &[QueryNode]) -> Result<String, CompileError> {
        let mut out = String::new();
        for node in nodes {
            out.push_str(&self.compile_node(node)?);
        }
        Ok(out)
    }

    /// Compiles a single clause, trailing operator included.
    fn compile_node(&self, node: &QueryNode) -> Result<String, CompileError> {
        match node {
            QueryNode::Literal {
                text,
                exclude,
                operator,
            } => {
                let lexemes = self.normalize(text);
                if lexemes.is_empty() {
                    return Ok(String::new());
                }
                Ok(format!(
                    "{}{} {} ",
                    bang(*exclude),
                    lexemes,
                    operator.symbol()
                ))
            }
            QueryNode::Phrase {
                text,
                exclude,
                operator,
            } => {
                let lexemes = self.normalize(text);
                if lexemes.is_empty() {
                    return Ok(String::new());
                }
                Ok(format!(
                    "{}({}) {} ",
                    bang(*exclude),
                    lexemes,
                    operator.symbol()
                ))
            }
            QueryNode::Group {
                children,
                exclude,
                operator,
            } => {
                let inner = self.compile_siblings(children)?;
                let inner = trim_dangling(&inner);
                if inner.is_empty() {
                    return Ok(String::new());
                }
                Ok(format!(
                    "{}({inner}) {} ",
                    bang(*exclude),
                    operator.symbol()
                ))
            }
            QueryNode::Proximity {
                left,
                right,
                operator,
                kind,
                distance,
                ..
            } => {
                let l = self.operand(left)?;
                let r = self.operand(right)?;
                // A distance of k allows k-1 intervening words, which the
                // engine expresses as the distances 2..=k+1. `N` relations
                // hold in either direction, so each distance appears twice.
                let mut alternatives = Vec::new();
                for d in 2..=u16::from(*distance) + 1 {
                    alternatives.push(format!("({l} <{d}> {r})"));
                    if *kind == ProximityKind::Near {
                        alternatives.push(format!("({r} <{d}> {l})"));
                    }
                }
                Ok(format!(
                    "({}) {} ",
                    alternatives.join(" | "),
                    operator.symbol()
                ))
            }
        }
    }

    /// Renders a proximity operand: a literal's lexemes, a phrase's
    /// parenthesized lexemes, or a group's parenthesized interior.
    fn operand(&self, node: &QueryNode) -> Result<String, CompileError> {
        match node {
            QueryNode::Literal { text, .. } => Ok(self.normalize(text)),
            QueryNode::Phrase { text, .. } => Ok(format!("({})", self.normalize(text))),
            QueryNode::Group { children, .. } => {
                let inner = self.compile_siblings(children)?;
                Ok(format!("({})", trim_dangling(&inner)))
            }
            QueryNode::Proximity { .. } => Err(CompileError::InvalidApiUse {
                clause: node.to_string(),
            }),
        }
    }

    /// Applies the normalizer, or passes the text through unchanged.
    fn normalize(&self, text: &str) -> String {
        match self.normalizer {
            Some(normalize) => normalize(&self.config, text),
            None => text.to_string(),
        }
    }
}

impl Default for PlainTextCompiler<'_> {
    /// The conventional `"english"` analysis profile, no normalizer.
    fn default() -> Self {
        Self::new("english")
    }
}

/// The exclusion prefix.
fn bang(exclude: bool) -> &'static str {
    if exclude { "!" } else { "" }
}

/// Trims a trailing dangling operator symbol and surrounding spaces.
fn trim_dangling(body: &str) -> String {
    body.trim_end_matches([' ', '&', '|']).to_string()
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use hsq_parse::parse;

    use super::*;

    fn compile(input: &str) -> String {
        PlainTextCompiler::new("english")
            .compile(&parse(input).unwrap())
            .unwrap()
    }

    #[test]
    fn literal_joins_with_symbols() {
        assert_eq!(compile("Opel AND car"), "Opel & car");
        assert_eq!(compile("Opel OR car"), "Opel | car");
        assert_eq!(compile("Opel car"), "Opel & car");
    }

    #[test]
    fn exclusion_prefixes_bang() {
        assert_eq!(compile("Opel -sale"), "Opel & !sale");
    }

    #[test]
    fn phrase_is_parenthesized() {
        assert_eq!(compile("\"electric car\" OR diesel"), "(electric car) | diesel");
    }

    #[test]
    fn group_wraps_children() {
        assert_eq!(
            compile("Opel AND (patrol OR diesel) -sale"),
            "Opel & (patrol | diesel) & !sale"
        );
    }

    #[test]
    fn excluded_group() {
        assert_eq!(compile("Opel -(auto car)"), "Opel & !(auto & car)");
    }

    #[test]
    fn ordered_proximity_enumerates_ascending() {
        assert_eq!(compile("Opel W2 car"), "((Opel <2> car) | (Opel <3> car))");
    }

    #[test]
    fn near_proximity_enumerates_both_directions() {
        assert_eq!(
            compile("Opel N2 car"),
            "((Opel <2> car) | (car <2> Opel) | (Opel <3> car) | (car <3> Opel))"
        );
    }

    #[test]
    fn proximity_group_operands() {
        assert_eq!(
            compile("(indigenous OR texas) W2 (\"debt financing\" OR lalala)"),
            "(((indigenous | texas) <2> ((debt financing) | lalala)) | ((indigenous | texas) <3> ((debt financing) | lalala)))"
        );
    }

    #[test]
    fn no_trailing_operator() {
        for input in ["Opel", "Opel AND car", "(patrol OR diesel)", "Opel N1 car"] {
            let out = compile(input);
            assert!(!out.trim_end().ends_with(['&', '|']), "dangling: {out:?}");
        }
    }

    #[test]
    fn normalizer_receives_config_and_text() {
        let calls = Cell::new(0u32);
        let normalize = |config: &str, text: &str| {
            calls.set(calls.get() + 1);
            format!("'{config}:{}'", text.to_lowercase())
        };
        let query = parse("Opel AND \"Big Car\"").unwrap();
        let out = PlainTextCompiler::new("simple")
            .with_normalizer(&normalize)
            .compile(&query)
            .unwrap();
        // Quotes from the lexeme service are stripped at the end.
        assert_eq!(out, "simple:opel & (simple:big car)");
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn empty_lexemes_drop_the_clause() {
        let normalize = |_: &str, text: &str| {
            if text == "the" {
                String::new()
            } else {
                text.to_string()
            }
        };
        let query = parse("the Opel").unwrap();
        let out = PlainTextCompiler::new("english")
            .with_normalizer(&normalize)
            .compile(&query)
            .unwrap();
        assert_eq!(out, "Opel");
    }

    #[test]
    fn compile_is_pure() {
        let query = parse("Opel N3 car AND (patrol OR diesel)").unwrap();
        let compiler = PlainTextCompiler::new("english");
        assert_eq!(
            compiler.compile(&query).unwrap(),
            compiler.compile(&query).unwrap()
        );
    }
}
