use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The signed-in identity performing admin operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub id: Uuid,
    #[serde(default)]
    pub email: Option<String>,
}

/// An authenticated session, passed explicitly to everything that needs it.
#[derive(Debug, Clone)]
pub struct Session {
    pub actor: Actor,
    pub access_token: String,
}

impl Session {
    pub fn new(actor: Actor, access_token: impl Into<String>) -> Self {
        Self {
            actor,
            access_token: access_token.into(),
        }
    }

    pub fn display_name(&self) -> &str {
        self.actor.email.as_deref().unwrap_or("admin")
    }
}
