use serde::{Deserialize, Serialize};

/// Raw, unvalidated form input. Every field may be missing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserForm {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// Request body for create and update; the id of an update comes from the path.
#[derive(Debug, Deserialize)]
pub struct UserBody {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

impl UserBody {
    pub fn into_form(self, id: Option<String>) -> UserForm {
        UserForm {
            id,
            name: self.name,
            email: self.email,
        }
    }
}

/// Machine-readable classification of a mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Created,
    Updated,
    Deleted,
    Invalid,
    Conflict,
    NotFound,
    Failed,
}

/// Uniform result of every mutation handler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MutationResult {
    pub success: bool,
    pub message: String,
    pub outcome: Outcome,
}

impl MutationResult {
    pub fn ok(outcome: Outcome, message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            outcome,
        }
    }

    pub fn fail(outcome: Outcome, message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            outcome,
        }
    }
}
