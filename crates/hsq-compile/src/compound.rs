//! Structured compound boolean-query compilation.
//!
//! Emits a nested `bool` query object: `query_string` clauses for leaves,
//! nested `bool` objects for groups, and `intervals` clauses for proximity
//! relations. Unlike the flat backends, this one insists that every nesting
//! level uses one consistent join operator, since a mixed level has no
//! faithful `must`/`should` rendition.

use hsq_parse::{LogicalOperator, Query, QueryNode, render_siblings};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use crate::{
    error::CompileError,
    flat::{escape_colons, not_prefix, operand_text},
};

/// The field lists leaf clauses are matched against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSet {
    /// Fields literal terms (and proximity relations) are matched against.
    pub literal: Vec<String>,
    /// Fields quoted phrases are matched against; falls back to `literal`
    /// when absent.
    #[serde(default)]
    pub phrase: Option<Vec<String>>,
}

impl FieldSet {
    /// Creates a field set matching every clause kind against `literal`.
    pub fn new(literal: Vec<String>) -> Self {
        Self {
            literal,
            phrase: None,
        }
    }

    /// Sets a separate field list for phrase clauses.
    pub fn with_phrase_fields(mut self, phrase: Vec<String>) -> Self {
        self.phrase = Some(phrase);
        self
    }

    /// The fields phrases match against.
    fn phrase_fields(&self) -> &[String] {
        self.phrase.as_deref().unwrap_or(&self.literal)
    }
}

/// Compiles query trees into nested structured boolean-query objects.
#[derive(Debug, Clone, Copy, Default)]
pub struct CompoundCompiler;

impl CompoundCompiler {
    /// Creates a compiler.
    pub fn new() -> Self {
        Self
    }

    /// Compiles the query into a compound `bool` query object.
    pub fn compile(&self, query: &Query, fields: &FieldSet) -> Result<Value, CompileError> {
        self.assemble(&query.nodes, &query.text, fields)
    }

    /// Builds one nesting level from a sibling sequence.
    ///
    /// Siblings are partitioned into included and excluded clauses. A level
    /// is OR-dominant when any sibling carries an `Or` join (the final
    /// sibling's default `And` never counts against that). OR-dominant
    /// levels with exclusions need a two-part `must` so the exclusions
    /// apply to the whole alternation rather than to one alternative.
    fn assemble(
        &self,
        nodes: &[QueryNode],
        source: &str,
        fields: &FieldSet,
    ) -> Result<Value, CompileError> {
        check_operator_consistency(nodes, source)?;

        let mut included = Vec::new();
        let mut excluded = Vec::new();
        let mut condition = "must";
        for node in nodes {
            let clause = self.compile_node(node, fields)?;
            if node.exclude() {
                excluded.push(clause);
            } else {
                included.push(clause);
            }
            if node.operator() == LogicalOperator::Or {
                condition = "should";
            }
        }

        if !excluded.is_empty() && condition == "should" {
            return Ok(json!({
                "bool": {
                    "must": [
                        { "bool": { "should": included } },
                        { "bool": { "must": excluded } },
                    ],
                }
            }));
        }

        included.append(&mut excluded);
        let mut level = Map::new();
        level.insert(condition.to_string(), Value::Array(included));
        Ok(json!({ "bool": level }))
    }

    /// Compiles a single clause into its query object.
    fn compile_node(&self, node: &QueryNode, fields: &FieldSet) -> Result<Value, CompileError> {
        match node {
            QueryNode::Literal { text, exclude, .. } => Ok(query_string(
                &fields.literal,
                &format!("{}{}", not_prefix(*exclude), escape_colons(text)),
            )),
            QueryNode::Phrase { text, exclude, .. } => Ok(query_string(
                fields.phrase_fields(),
                &format!("{}\"{text}\"", not_prefix(*exclude)),
            )),
            QueryNode::Group { children, .. } => {
                self.assemble(children, &render_siblings(children), fields)
            }
            QueryNode::Proximity {
                left,
                right,
                distance,
                ..
            } => self.compile_proximity(left, right, *distance, fields),
        }
    }

    /// Compiles a proximity relation into interval clauses, one per literal
    /// field; several fields are alternatives, so they combine under
    /// `should`. A single field needs no wrapping.
    fn compile_proximity(
        &self,
        left: &QueryNode,
        right: &QueryNode,
        distance: u8,
        fields: &FieldSet,
    ) -> Result<Value, CompileError> {
        let l = operand_text(left)?;
        let r = operand_text(right)?;

        let mut clauses: Vec<Value> = Vec::with_capacity(fields.literal.len());
        for field in &fields.literal {
            let body = json!({
                "all_of": {
                    "max_gaps": distance,
                    "intervals": [
                        { "match": { "query": l } },
                        { "match": { "query": r } },
                    ],
                }
            });
            let mut by_field = Map::new();
            by_field.insert(field.clone(), body);
            clauses.push(json!({ "intervals": by_field }));
        }

        if clauses.len() == 1 {
            Ok(clauses.remove(0))
        } else {
            Ok(json!({ "bool": { "should": clauses } }))
        }
    }
}

/// Builds a `query_string` leaf clause.
fn query_string(fields: &[String], query: &str) -> Value {
    json!({
        "query_string": {
            "fields": fields,
            "query": query,
        }
    })
}

/// Verifies that one nesting level carries a consistent operator set.
///
/// Walks the siblings comparing each operator against the previous one. A
/// differing operator is tolerated on the final sibling (the default `And`
/// tail) and on a sibling followed by an excluded clause. Once exclusions
/// start, every following sibling must be excluded too.
fn check_operator_consistency(nodes: &[QueryNode], source: &str) -> Result<(), CompileError> {
    let mut prev: Option<&'static str> = None;
    let mut excludes_started = false;
    let last = nodes.len().saturating_sub(1);

    for (num, node) in nodes.iter().enumerate() {
        let name = node.operator().name();
        let next_excluded = nodes.get(num + 1).is_some_and(|n| n.exclude());
        if let Some(prev_name) = prev
            && prev_name != name
            && num != last
            && !next_excluded
        {
            return Err(CompileError::OperatorSequence {
                query: source.to_string(),
            });
        }
        if excludes_started && !node.exclude() {
            return Err(CompileError::OperatorSequence {
                query: source.to_string(),
            });
        }
        if num != last && next_excluded {
            excludes_started = true;
        }
        prev = Some(name);
    }
    Ok(())
}
