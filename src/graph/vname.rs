//! VName: the structured identity of a graph node

use serde::{Deserialize, Serialize};

/// Structured name of a node in the graph
///
/// Every field is optional; the empty string means the field is absent.
/// Two VNames name the same node iff all five fields are equal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VName {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub signature: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub corpus: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub root: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub path: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub language: String,
}

impl VName {
    pub fn new() -> Self {
        Self::default()
    }

    /// A VName carrying only a signature
    pub fn from_signature(signature: impl Into<String>) -> Self {
        Self {
            signature: signature.into(),
            ..Self::default()
        }
    }

    pub fn with_corpus(mut self, corpus: impl Into<String>) -> Self {
        self.corpus = corpus.into();
        self
    }

    pub fn with_root(mut self, root: impl Into<String>) -> Self {
        self.root = root.into();
        self
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Encode as a ticket (see [`crate::graph::ticket`])
    pub fn to_ticket(&self) -> String {
        super::ticket::encode(self)
    }
}

impl std::fmt::Display for VName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_ticket())
    }
}
