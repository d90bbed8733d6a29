//! `fleetdesk delete` command.

use tracing::warn;

use super::{find_driver, report};
use crate::context::ServiceContext;
use crate::error::Result;
use crate::reconcile::Notice;

/// Execute the `delete` command.
///
/// Deleting a driver frees its truck and trailer; nothing else changes.
///
/// # Errors
///
/// Returns an error if the driver is unknown or the delete is rejected.
pub async fn run(ctx: &ServiceContext, driver: &str) -> Result<()> {
    let record = find_driver(ctx, driver).await?;
    let notice = match ctx.store.delete_driver(&record.id).await {
        Ok(()) => Notice::Success("Driver deleted successfully".into()),
        Err(e) => {
            warn!(driver_id = %record.id, error = %e, "driver delete failed");
            Notice::Error(format!("Error deleting driver: {e}"))
        }
    };
    report(notice)
}
