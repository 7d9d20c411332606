//! Local Store Session Repository
//!
//! One JSON record per session under `newsHubUser:<session id>`.

use std::sync::Arc;

use kernel::id::SessionId;
use platform::storage::LocalStore;

use crate::domain::repository::SessionRepository;
use crate::domain::session::SessionRecord;
use crate::error::AuthResult;

pub const SESSION_KEY_PREFIX: &str = "newsHubUser";

#[derive(Debug, Clone)]
pub struct LocalSessionStore {
    store: Arc<LocalStore>,
}

impl LocalSessionStore {
    pub fn new(store: Arc<LocalStore>) -> Self {
        Self { store }
    }

    pub fn key(session_id: SessionId) -> String {
        format!("{SESSION_KEY_PREFIX}:{session_id}")
    }
}

impl SessionRepository for LocalSessionStore {
    async fn save(&self, session_id: SessionId, record: &SessionRecord) -> AuthResult<()> {
        self.store.set_json(&Self::key(session_id), record)?;
        Ok(())
    }

    async fn find(&self, session_id: SessionId) -> AuthResult<Option<SessionRecord>> {
        Ok(self.store.get_json(&Self::key(session_id))?)
    }

    async fn delete(&self, session_id: SessionId) -> AuthResult<bool> {
        Ok(self.store.remove_item(&Self::key(session_id))?)
    }
}
