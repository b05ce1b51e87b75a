use scylla::client::{session::Session, session_builder::SessionBuilder};
use tracing::info;

use crate::error::Error;

/// Opens a session against the given contact points. No retries: if the
/// driver cannot reach any of them, the error is returned as is.
pub(crate) async fn connect(nodes: &[String]) -> Result<Session, Error> {
    info!(?nodes, "connecting");
    let session = SessionBuilder::new().known_nodes(nodes).build().await?;
    info!("connected");
    Ok(session)
}
