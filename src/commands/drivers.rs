//! `fleetdesk drivers` command.

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::context::ServiceContext;
use crate::error::Result;
use crate::fleet::{document_status, DriverRecord, VehicleKind};

/// Execute the `drivers` command.
///
/// Lists drivers newest first with their vehicle numbers and the status of
/// their gate pass and waqala.
///
/// # Errors
///
/// Returns an error if the store cannot be read.
pub async fn run(ctx: &ServiceContext) -> Result<()> {
    let drivers = ctx.store.list_drivers().await?;
    if drivers.is_empty() {
        println!("No drivers found.");
        return Ok(());
    }

    let trucks = numbers(ctx, VehicleKind::Truck).await?;
    let trailers = numbers(ctx, VehicleKind::Trailer).await?;
    let today = ctx.clock.now().date_naive();

    println!(
        "{:<8} {:<24} {:<10} {:<10} {:<10} {:<9} {:<9}",
        "CODE", "NAME", "STATUS", "TRUCK", "TRAILER", "GATEPASS", "WAQALA"
    );
    for driver in &drivers {
        println!("{}", row(driver, &trucks, &trailers, today));
    }
    Ok(())
}

/// Vehicle id to display number for one kind.
async fn numbers(ctx: &ServiceContext, kind: VehicleKind) -> Result<HashMap<String, String>> {
    let vehicles = ctx.store.list_vehicles(kind).await?;
    Ok(vehicles.into_iter().map(|v| (v.id, v.number)).collect())
}

fn row(
    driver: &DriverRecord,
    trucks: &HashMap<String, String>,
    trailers: &HashMap<String, String>,
    today: NaiveDate,
) -> String {
    // Vehicles missing from the active list show their raw id.
    let vehicle = |id: Option<&str>, numbers: &HashMap<String, String>| match id {
        Some(id) => numbers.get(id).cloned().unwrap_or_else(|| id.to_string()),
        None => "-".to_string(),
    };
    format!(
        "{:<8} {:<24} {:<10} {:<10} {:<10} {:<9} {:<9}",
        driver.code,
        driver.full_name,
        driver.status.as_str(),
        vehicle(driver.truck_id.as_deref(), trucks),
        vehicle(driver.trailer_id.as_deref(), trailers),
        document_status(driver.gatepass.as_deref(), today).to_string(),
        document_status(driver.waqala.as_deref(), today).to_string(),
    )
}
