use serde::Serialize;

/// Boolean composition operators for filter groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BoolOp {
    /// Every child must match (`;` between conditions, adjacent sections)
    And,
    /// At least one child must match (`or` keyword)
    Or,
}

impl BoolOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            BoolOp::And => "and",
            BoolOp::Or => "or",
        }
    }
}
