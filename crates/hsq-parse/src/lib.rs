//! Human search-query parsing: validator, parser, and query tree.
//!
//! This crate turns a human-friendly boolean/proximity query string into an
//! operator tree that compilation backends can walk:
//!
//! - **Terms**: `Opel` - words that must appear
//! - **Phrases**: `"electric car"` - exact sequences, double-quoted
//! - **Exclusion**: `-sale` - clauses that must NOT match
//! - **AND / OR**: `Opel AND car`, `patrol OR diesel` (AND is implicit)
//! - **Grouping**: `(patrol OR diesel) AND sale` - precedence control
//! - **Proximity**: `Opel N5 car` (either order), `Opel W5 car` (in order) -
//!   two clauses within 5 positions of each other
//!
//! Operator keywords are case-insensitive. Proximity distances outside
//! `1..=15` are downgraded to plain `AND`, preserving the behavior of the
//! search products this grammar comes from.
//!
//! # Example
//!
//! ```
//! use hsq_parse::parse;
//!
//! let query = parse("Opel AND (patrol OR diesel) -sale").unwrap();
//! assert_eq!(query.nodes.len(), 3);
//! ```

#![warn(missing_docs)]

mod ast;
mod error;
mod operator;
mod parser;
mod validate;

pub use ast::{Query, QueryNode, render_siblings};
pub use error::SyntaxError;
pub use operator::{LogicalOperator, MAX_PROXIMITY, ProximityKind};
pub use parser::parse;
pub use validate::validate;
