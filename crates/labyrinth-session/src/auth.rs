//! Identity provider hook.
//!
//! The server never validates credentials itself. During the handshake it
//! hands the client's token to an [`Authenticator`] and gets back a
//! stable [`Identity`], or a refusal.

use labyrinth_protocol::PlayerId;

use crate::SessionError;

/// Who a connection belongs to once the handshake succeeds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    /// Stable across reconnects.
    pub player_id: PlayerId,
    /// Display name shown to other players.
    pub name: String,
}

impl Identity {
    pub fn new(player_id: PlayerId, name: impl Into<String>) -> Self {
        Self {
            player_id,
            name: name.into(),
        }
    }
}

/// Resolves a handshake token to an [`Identity`].
///
/// Shared by every connection task, hence `Send + Sync + 'static`.
///
/// # Example
///
/// ```rust
/// use labyrinth_protocol::PlayerId;
/// use labyrinth_session::{Authenticator, Identity, SessionError};
///
/// /// Accepts tokens of the form `"<id>:<name>"`. Development only.
/// struct DevAuthenticator;
///
/// impl Authenticator for DevAuthenticator {
///     async fn authenticate(&self, token: &str) -> Result<Identity, SessionError> {
///         let (id, name) = token
///             .split_once(':')
///             .ok_or_else(|| SessionError::AuthFailed("expected id:name".into()))?;
///         let id: u64 = id
///             .parse()
///             .map_err(|_| SessionError::AuthFailed("id must be a number".into()))?;
///         Ok(Identity::new(PlayerId(id), name))
///     }
/// }
/// ```
pub trait Authenticator: Send + Sync + 'static {
    /// Validates the token.
    ///
    /// # Errors
    /// `SessionError::AuthFailed` if the token is rejected.
    fn authenticate(
        &self,
        token: &str,
    ) -> impl std::future::Future<Output = Result<Identity, SessionError>> + Send;
}
