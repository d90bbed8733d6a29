//! `fleetdesk release` command.

use super::{find_driver, report};
use crate::context::ServiceContext;
use crate::error::Result;
use crate::fleet::VehicleKind;
use crate::reconcile::{release_vehicle, save_form, DriverForm};

/// Execute the `release` command: empty one of a driver's vehicle slots.
///
/// # Errors
///
/// Returns an error if the driver is unknown or the save is rejected.
pub async fn run(ctx: &ServiceContext, driver: &str, kind: VehicleKind) -> Result<()> {
    let record = find_driver(ctx, driver).await?;
    if record.link(kind).is_none() {
        println!("{} has no {kind}", record.label());
        return Ok(());
    }

    let mut form = DriverForm::edit(&record);
    let released = release_vehicle(ctx.store.as_ref(), &mut form, kind).await;
    for notice in released.notices {
        report(notice)?;
    }
    report(save_form(ctx.store.as_ref(), &mut form).await)
}
