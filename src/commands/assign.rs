//! `fleetdesk assign` command.

use super::{active_vehicle_id, find_driver, report};
use crate::context::ServiceContext;
use crate::error::{Error, ReconcileError, Result};
use crate::fleet::VehicleKind;
use crate::reconcile::{assign_vehicle, save_form, AssignmentOutcome, DriverForm};

/// Execute the `assign` command.
///
/// Opens the driver in a form, picks the vehicle (asking before taking it
/// from another driver) and saves the form.
///
/// # Errors
///
/// Returns an error if `vehicle` is blank, the driver or the vehicle is
/// unknown, the check or the release fails, or the save is rejected.
pub async fn run(ctx: &ServiceContext, driver: &str, kind: VehicleKind, vehicle: &str) -> Result<()> {
    if vehicle.trim().is_empty() {
        return Err(Error::Usage(format!(
            "no {kind} given; use `fleetdesk release {driver} {kind}` to remove one"
        )));
    }
    let record = find_driver(ctx, driver).await?;
    let vehicle_id = active_vehicle_id(ctx, kind, vehicle).await?;

    let mut form = DriverForm::edit(&record);
    let assignment =
        assign_vehicle(ctx.store.as_ref(), ctx.prompt.as_ref(), &mut form, kind, &vehicle_id).await;

    if let AssignmentOutcome::Failed(ReconcileError::PartialReassignment { cleared, .. }) =
        &assignment.outcome
    {
        if !cleared.is_empty() {
            eprintln!("Already released from: {}", cleared.join(", "));
        }
    }
    let changed = assignment.changed_draft();
    for notice in assignment.notices {
        report(notice)?;
    }
    if !changed {
        println!("{} keeps the current {kind}", record.label());
        return Ok(());
    }

    report(save_form(ctx.store.as_ref(), &mut form).await)
}
