//! Elasticsearch filter serialization for compiled ESL filters.
//!
//! Every [`Filter`] variant maps to one filter clause of the Elasticsearch
//! query DSL. The output is meant to be placed in the `filter` section of a
//! `bool` query.
//!
//! | Filter       | Clause                                              |
//! |--------------|-----------------------------------------------------|
//! | `TermsIn`    | `{"terms": {field: [values]}}`                      |
//! | `TermsNotIn` | `{"bool": {"must_not": [terms]}}`                   |
//! | `RangeIn`    | `{"range": {field: {"gte": from, "lte": to}}}`      |
//! | `RangeNotIn` | `{"bool": {"must_not": [range]}}`                   |
//! | `Group` and  | `{"bool": {"filter": [...]}}`                       |
//! | `Group` or   | `{"bool": {"should": [...], "minimum_should_match": 1}}` |
//!
//! Range bounds are inclusive at both ends.
//!
//! # Examples
//!
//! ```
//! use esl_search::compiler::compile;
//! use esl_search::output::to_json;
//!
//! let filter = compile("{ 'age' in ['18':] }", "").unwrap();
//! assert_eq!(to_json(&filter).to_string(), r#"{"range":{"age":{"gte":"18"}}}"#);
//! ```

use serde_json::{Map, Value, json};

use crate::ast::{BoolOp, Bounds, Filter};

fn terms_clause(field: &str, values: &[String]) -> Value {
    json!({ "terms": { field: values } })
}

fn range_clause(field: &str, bounds: &Bounds) -> Value {
    let mut limits = Map::new();
    if let Some(from) = &bounds.from {
        limits.insert("gte".to_string(), Value::String(from.clone()));
    }
    if let Some(to) = &bounds.to {
        limits.insert("lte".to_string(), Value::String(to.clone()));
    }
    json!({ "range": { field: limits } })
}

fn must_not(clause: Value) -> Value {
    json!({ "bool": { "must_not": [clause] } })
}

/// Converts a filter tree into an Elasticsearch filter clause.
pub fn to_json(filter: &Filter) -> Value {
    match filter {
        Filter::TermsIn { field, values } => terms_clause(field, values),
        Filter::TermsNotIn { field, values } => must_not(terms_clause(field, values)),
        Filter::RangeIn { field, bounds } => range_clause(field, bounds),
        Filter::RangeNotIn { field, bounds } => must_not(range_clause(field, bounds)),
        Filter::Group { op, children } => {
            let clauses: Vec<Value> = children.iter().map(to_json).collect();
            match op {
                BoolOp::And => json!({ "bool": { "filter": clauses } }),
                BoolOp::Or => json!({
                    "bool": { "should": clauses, "minimum_should_match": 1 }
                }),
            }
        }
    }
}
