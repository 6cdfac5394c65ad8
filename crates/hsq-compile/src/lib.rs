//! Query-tree compilation backends.
//!
//! Three backends walk the same [`hsq_parse::Query`] tree and emit one
//! machine representation each:
//!
//! - [`PlainTextCompiler`] - a lexeme-based boolean expression for a
//!   relational full-text engine, built through an injected
//!   lexeme-normalization callback.
//! - [`FlatTextCompiler`] - a flat boolean query string in the document
//!   engine's native syntax.
//! - [`CompoundCompiler`] - a nested structured boolean-query object,
//!   parameterized by the field lists to match against.
//!
//! Compilation is a pure function of the tree plus parameters: compiling
//! the same tree twice with the same parameters yields identical output,
//! and concurrent callers holding their own trees need no synchronization.
//!
//! # Example
//!
//! ```
//! use hsq_compile::{CompoundCompiler, FieldSet, FlatTextCompiler};
//! use hsq_parse::parse;
//!
//! let query = parse("Opel AND (patrol OR diesel) -sale").unwrap();
//!
//! let flat = FlatTextCompiler::new().compile(&query).unwrap();
//! assert_eq!(flat, "Opel AND (patrol OR diesel) AND NOT sale");
//!
//! let fields = FieldSet::new(vec!["title".into()]);
//! let compound = CompoundCompiler::new().compile(&query, &fields).unwrap();
//! assert!(compound["bool"]["must"].is_array());
//! ```

#![warn(missing_docs)]

mod compound;
mod error;
mod flat;
mod plain;

pub use compound::{CompoundCompiler, FieldSet};
pub use error::CompileError;
pub use flat::FlatTextCompiler;
pub use plain::{Normalizer, PlainTextCompiler};
