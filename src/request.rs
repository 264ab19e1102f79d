use serde::{Deserialize, Serialize};

use crate::value::ResultSet;

/// One search request.
///
/// Field names accept both the camelCase form and the short names used by
/// older clients (`Type`, `ESL`, `SysCond`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchSpec {
    /// Matched as a mandatory term filter; not authenticated.
    #[serde(alias = "Appkey")]
    pub app_key: String,

    /// Carried through for callers; does not affect the query.
    #[serde(alias = "Platform")]
    pub platform: String,

    #[serde(alias = "Index")]
    pub index: String,

    #[serde(alias = "Type")]
    pub doc_type: String,

    /// Fields to project. Empty means the whole stored document.
    #[serde(alias = "Fields")]
    pub fields: Vec<String>,

    #[serde(rename = "esl", alias = "ESL")]
    pub esl_text: String,

    /// Injected by the caller's host, ANDed with `esl_text`.
    #[serde(rename = "sysCond", alias = "SysCond")]
    pub system_condition: String,
}

impl SearchSpec {
    pub fn new(index: impl Into<String>, app_key: impl Into<String>, esl: impl Into<String>) -> Self {
        SearchSpec {
            index: index.into(),
            app_key: app_key.into(),
            esl_text: esl.into(),
            ..Default::default()
        }
    }

    pub fn with_doc_type(mut self, doc_type: impl Into<String>) -> Self {
        self.doc_type = doc_type.into();
        self
    }

    pub fn with_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_system_condition(mut self, condition: impl Into<String>) -> Self {
        self.system_condition = condition.into();
        self
    }
}

/// Reply handed back to a transport. Errors travel as data: when `error` is
/// set, `results` is empty and must not be used.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SearchReply {
    pub results: ResultSet,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SearchReply {
    pub fn ok(results: ResultSet) -> Self {
        SearchReply {
            results,
            error: None,
        }
    }

    pub fn failed(error: impl ToString) -> Self {
        SearchReply {
            results: ResultSet::new(),
            error: Some(error.to_string()),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}
