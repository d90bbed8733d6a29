//! `fleetdesk vehicles` command.

use crate::context::ServiceContext;
use crate::error::Result;
use crate::fleet::{DriverRecord, Vehicle, VehicleKind};

/// Execute the `vehicles` command.
///
/// Lists active vehicles of one kind with their holders. A vehicle held by
/// more than one driver is flagged.
///
/// # Errors
///
/// Returns an error if the store cannot be read.
pub async fn run(ctx: &ServiceContext, kind: VehicleKind) -> Result<()> {
    let vehicles = ctx.store.list_vehicles(kind).await?;
    if vehicles.is_empty() {
        println!("No active {}s.", kind.noun());
        return Ok(());
    }
    let drivers = ctx.store.list_drivers().await?;
    for vehicle in &vehicles {
        println!("{}", line(kind, vehicle, &drivers));
    }
    Ok(())
}

fn line(kind: VehicleKind, vehicle: &Vehicle, drivers: &[DriverRecord]) -> String {
    let holders: Vec<String> = drivers
        .iter()
        .filter(|d| d.link(kind) == Some(vehicle.id.as_str()))
        .map(DriverRecord::label)
        .collect();
    match holders.as_slice() {
        [] => format!("{:<12} free", vehicle.number),
        [holder] => format!("{:<12} {holder}", vehicle.number),
        several => format!(
            "{:<12} {} (held by {} drivers)",
            vehicle.number,
            several.join(", "),
            several.len()
        ),
    }
}
