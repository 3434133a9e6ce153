use serde::{Deserialize, Serialize};

/// Whether a query belongs to the coach's domain
///
/// `Uncertain` exists for the audit log schema only; the oracle verdict
/// parser never produces it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContextLabel {
    InContext,
    OutOfContext,
    Uncertain,
}

impl ContextLabel {
    pub fn from_in_context(in_context: bool) -> Self {
        if in_context {
            Self::InContext
        } else {
            Self::OutOfContext
        }
    }

    pub fn is_in_context(&self) -> bool {
        matches!(self, Self::InContext)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InContext => "in_context",
            Self::OutOfContext => "out_of_context",
            Self::Uncertain => "uncertain",
        }
    }
}

impl std::fmt::Display for ContextLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
