use scylla::client::session::Session;
use tracing::{debug, info};
use uuid::Uuid;

use crate::{error::Error, schema::Statements};

/// Reads every id `passes` times so the first measured strategy doesn't pay
/// for cold caches. Results are dropped undecoded.
pub(crate) async fn warm_up(
    session: &Session,
    statements: &Statements,
    ids: &[Uuid],
    passes: usize,
) -> Result<(), Error> {
    info!(passes, ids = ids.len(), "warming up");
    for pass in 0..passes {
        for id in ids {
            let _rows = session
                .execute_unpaged(&statements.select_by_id, (id,))
                .await?;
        }
        debug!(pass, "warmup pass done");
    }
    info!("warmup done");
    Ok(())
}
