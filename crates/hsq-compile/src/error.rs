//! Error types for query compilation.

use thiserror::Error;

/// Errors raised while compiling a query tree into a backend representation.
///
/// Detected eagerly; a failing compilation never returns partial output.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CompileError {
    /// Sibling clauses at one nesting level mix `AND` and `OR` without
    /// explicit grouping, so their intent is ambiguous.
    #[error(
        "the query does not contain a valid set of logical operators: {query}; use brackets to set priority"
    )]
    OperatorSequence {
        /// The offending (sub)query text.
        query: String,
    },

    /// A proximity operand is itself a proximity expression. The parser
    /// never produces such trees; this guards hand-constructed ones.
    #[error("proximity operands must be single clauses: {clause}")]
    InvalidApiUse {
        /// Rendition of the offending operand.
        clause: String,
    },
}
