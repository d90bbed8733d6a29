//! `fleetdesk check` command.

use super::{find_driver, resolve_vehicle};
use crate::context::ServiceContext;
use crate::error::Result;
use crate::fleet::VehicleKind;
use crate::reconcile::Reconciler;

/// Execute the `check` command: report who else holds a vehicle.
///
/// # Errors
///
/// Returns an error if the driver is unknown or the lookup fails.
pub async fn run(
    ctx: &ServiceContext,
    kind: VehicleKind,
    vehicle: &str,
    driver: Option<&str>,
) -> Result<()> {
    let exclude = match driver {
        Some(key) => Some(find_driver(ctx, key).await?.id),
        None => None,
    };
    let vehicle_id = resolve_vehicle(ctx, kind, vehicle).await?;

    let reconciler = Reconciler::new(ctx.store.as_ref());
    match reconciler.check_conflict(kind, &vehicle_id, exclude.as_deref()).await? {
        Some(holder) => println!("The {kind} {vehicle} is assigned to {}", holder.label()),
        None => println!("The {kind} {vehicle} is free"),
    }
    Ok(())
}
