use serde::Serialize;

use crate::ast::BoolOp;

/// Bounds of a range predicate. At least one side is always present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Bounds {
    pub from: Option<String>,
    pub to: Option<String>,
}

impl Bounds {
    /// Builds bounds, treating empty strings as absent. Returns `None` when
    /// neither side is left.
    pub fn new(from: Option<String>, to: Option<String>) -> Option<Self> {
        let from = from.filter(|s| !s.is_empty());
        let to = to.filter(|s| !s.is_empty());
        if from.is_none() && to.is_none() {
            return None;
        }
        Some(Bounds { from, to })
    }
}

/// Compiled filter tree.
///
/// This is the output of the ESL compiler and the only thing the query
/// executor needs to know about the caller's expression. Each variant maps to
/// one case of the backend filter serializer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Filter {
    /// Field value is one of `values`
    ///
    /// # Example
    /// ```text
    /// 'city' in ('paris', 'rome')
    /// ```
    TermsIn { field: String, values: Vec<String> },

    /// Field value is none of `values`
    ///
    /// # Example
    /// ```text
    /// 'city' not in ('paris')
    /// ```
    TermsNotIn { field: String, values: Vec<String> },

    /// Field value lies inside the bounds
    ///
    /// # Example
    /// ```text
    /// 'age' in ['18':'65']
    /// 'age' in ['18':]
    /// ```
    RangeIn { field: String, bounds: Bounds },

    /// Field value lies outside the bounds
    RangeNotIn { field: String, bounds: Bounds },

    /// Boolean composition of at least two children
    Group { op: BoolOp, children: Vec<Filter> },
}

impl Filter {
    /// Membership predicate. Duplicate values are dropped, first occurrence
    /// wins, so `values` behaves as an ordered set.
    pub fn terms(field: impl Into<String>, values: Vec<String>, negated: bool) -> Self {
        let mut unique: Vec<String> = Vec::with_capacity(values.len());
        for value in values {
            if !unique.contains(&value) {
                unique.push(value);
            }
        }
        let field = field.into();
        if negated {
            Filter::TermsNotIn {
                field,
                values: unique,
            }
        } else {
            Filter::TermsIn {
                field,
                values: unique,
            }
        }
    }

    pub fn range(field: impl Into<String>, bounds: Bounds, negated: bool) -> Self {
        let field = field.into();
        if negated {
            Filter::RangeNotIn { field, bounds }
        } else {
            Filter::RangeIn { field, bounds }
        }
    }

    /// Combines `children` with `op`, collapsing the degenerate cases: no
    /// children gives `None`, a single child is returned as is.
    pub fn group(op: BoolOp, mut children: Vec<Filter>) -> Option<Self> {
        match children.len() {
            0 => None,
            1 => children.pop(),
            _ => Some(Filter::Group { op, children }),
        }
    }

    pub fn and(children: Vec<Filter>) -> Option<Self> {
        Filter::group(BoolOp::And, children)
    }

    pub fn or(children: Vec<Filter>) -> Option<Self> {
        Filter::group(BoolOp::Or, children)
    }

    /// Number of leaf predicates in the tree.
    pub fn predicate_count(&self) -> usize {
        match self {
            Filter::Group { children, .. } => children.iter().map(Filter::predicate_count).sum(),
            _ => 1,
        }
    }
}
