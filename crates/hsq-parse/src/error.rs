//! Syntax errors reported by the validator and parser.

use thiserror::Error;

/// Errors raised while validating or parsing a query.
///
/// Every variant carries the offending query text for diagnostics. All
/// errors are terminal for that query: no partial tree is ever produced.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SyntaxError {
    /// A `)` without a matching `(`, or an unclosed `(`.
    #[error("unbalanced brackets in query: {query}")]
    UnbalancedBrackets {
        /// The offending query text.
        query: String,
    },

    /// An odd number of `"` characters.
    #[error("unbalanced quotes in query: {query}")]
    UnbalancedQuotes {
        /// The offending query text.
        query: String,
    },

    /// Two logical/proximity operator tokens directly adjacent, e.g.
    /// `Opel OR AND car` or `Opel N5 AND car`.
    #[error("invalid operator sequence in query: {query}")]
    OperatorSequence {
        /// The offending query text.
        query: String,
    },

    /// A proximity operator without exactly two single-clause operands:
    /// the right operand is missing, or a proximity chain makes one clause
    /// an operand of two relations at once.
    #[error("proximity operator is missing a valid operand in query: {query}")]
    ProximityArity {
        /// The offending query text.
        query: String,
    },
}
