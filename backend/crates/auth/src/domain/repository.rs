//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.

use kernel::id::SessionId;

use crate::domain::session::SessionRecord;
use crate::error::AuthResult;

/// Session record repository trait
#[trait_variant::make(SessionRepository: Send)]
pub trait LocalSessionRepository {
    /// Store (or overwrite) the record for a session
    async fn save(&self, session_id: SessionId, record: &SessionRecord) -> AuthResult<()>;

    /// Find the record for a session
    ///
    /// A stored value that does not parse is an error, not `None`.
    async fn find(&self, session_id: SessionId) -> AuthResult<Option<SessionRecord>>;

    /// Delete a session, returning whether it existed
    async fn delete(&self, session_id: SessionId) -> AuthResult<bool>;
}
