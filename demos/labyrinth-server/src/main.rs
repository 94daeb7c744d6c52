use labyrinth::prelude::*;

// ---------------------------------------------------------------------------
// Development identity provider
// ---------------------------------------------------------------------------

/// Trusts any token of the form `"<id>:<name>"`. For local play only.
struct DevAuthenticator;

impl Authenticator for DevAuthenticator {
    async fn authenticate(&self, token: &str) -> Result<Identity, SessionError> {
        let (id, name) = token
            .split_once(':')
            .ok_or_else(|| SessionError::AuthFailed("token must be <id>:<name>".into()))?;
        let id: u64 = id
            .parse()
            .map_err(|_| SessionError::AuthFailed(format!("bad player id {id:?}")))?;
        if name.trim().is_empty() {
            return Err(SessionError::AuthFailed("empty player name".into()));
        }
        Ok(Identity::new(PlayerId(id), name.trim()))
    }
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<(), LabyrinthError> {
    labyrinth::init_tracing();

    let bind = std::env::var("LABYRINTH_BIND").unwrap_or_else(|_| "127.0.0.1:8080".into());
    let mut builder = LabyrinthServerBuilder::new().bind(&bind);
    if let Ok(path) = std::env::var("LABYRINTH_BOARD") {
        tracing::info!(%path, "loading board layout");
        builder = builder.board(BoardConfig::from_json_file(&path)?);
    }

    let server = builder.build(DevAuthenticator).await?;
    tracing::info!(addr = %server.local_addr()?, "labyrinth server listening");

    tokio::select! {
        result = server.run() => result,
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("shutting down");
            Ok(())
        }
    }
}
