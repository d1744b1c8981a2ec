use serde::Deserialize;
use uuid::Uuid;

/// The caller a request acts on behalf of. Authentication happens upstream;
/// the identity arrives already resolved.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Actor {
    #[serde(rename = "actor_id")]
    pub id: Uuid,
    #[serde(default)]
    pub is_admin: bool,
}

impl Actor {
    /// Admins see everything; everyone else only what they own.
    pub fn can_access(&self, owner_id: Option<Uuid>) -> bool {
        self.is_admin || owner_id == Some(self.id)
    }
}
