//! Command dispatch and handlers.

pub mod assign;
pub mod check;
pub mod delete;
pub mod drivers;
pub mod release;
pub mod vehicles;

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info};

use crate::adapters::live::LiveClock;
use crate::adapters::memory::{FleetSnapshot, MemoryStore};
use crate::cassette::session::RecordingSession;
use crate::cli::{Cli, Command};
use crate::config::{self, StoreConfig};
use crate::context::{operator_prompt, ServiceContext};
use crate::error::{ConfigError, Error, Result, StoreError};
use crate::fleet::{DriverRecord, Vehicle, VehicleKind};
use crate::reconcile::Notice;

/// Dispatch a parsed command to its handler.
///
/// The ports come from `--cassette` (replay), `--fixture` (a YAML snapshot
/// that is written back afterwards) or the live backend. When
/// `FLEETDESK_RECORD` is set to a directory, every port interaction is
/// recorded to per-port cassette files below it.
///
/// # Errors
///
/// Returns an error if the ports cannot be set up or the command fails.
pub async fn dispatch(cli: &Cli) -> Result<()> {
    if let Some(path) = &cli.cassette {
        let ctx = ServiceContext::replaying(path)?;
        return run_command(&cli.command, &ctx).await;
    }

    let assume_yes = cli.command.assume_yes();
    let (ctx, source, fixture) = if let Some(path) = &cli.fixture {
        let memory = Arc::new(load_fixture(path)?);
        let ctx = ServiceContext::new(
            Box::new(Arc::clone(&memory)),
            operator_prompt(assume_yes),
            Box::new(LiveClock),
        );
        (ctx, path.display().to_string(), Some((path, memory)))
    } else {
        let store = StoreConfig::from_env()?;
        let source = store.url.clone();
        (ServiceContext::live(store, assume_yes), source, None)
    };

    let result = if let Some(dir) = config::record_dir() {
        let session = RecordingSession::new(&dir, &source)?;
        let ctx = ctx.recorded(&session);
        let result = run_command(&cli.command, &ctx).await;
        // Drop context first to release the recorder handles.
        drop(ctx);
        finish_recording(session)?;
        result
    } else {
        run_command(&cli.command, &ctx).await
    };

    if let Some((path, memory)) = fixture {
        save_fixture(path, &memory.snapshot())?;
    }
    result
}

/// Dispatch a command with the given service context.
///
/// # Errors
///
/// Returns the handler's error.
pub async fn run_command(command: &Command, ctx: &ServiceContext) -> Result<()> {
    match command {
        Command::Drivers => drivers::run(ctx).await,
        Command::Vehicles { kind } => vehicles::run(ctx, *kind).await,
        Command::Check { kind, vehicle, driver } => {
            check::run(ctx, *kind, vehicle, driver.as_deref()).await
        }
        Command::Assign { driver, kind, vehicle, .. } => {
            assign::run(ctx, driver, *kind, vehicle).await
        }
        Command::Release { driver, kind } => release::run(ctx, driver, *kind).await,
        Command::Delete { driver } => delete::run(ctx, driver).await,
    }
}

fn finish_recording(session: RecordingSession) -> Result<()> {
    let output_dir = session.finish()?;
    info!(dir = %output_dir.display(), "recording saved");
    eprintln!("Recording saved to: {}", output_dir.display());
    Ok(())
}

fn load_fixture(path: &Path) -> std::result::Result<MemoryStore, ConfigError> {
    let failed = |reason: String| ConfigError::Fixture { path: path.display().to_string(), reason };
    let content = std::fs::read_to_string(path).map_err(|e| failed(e.to_string()))?;
    let snapshot: FleetSnapshot =
        serde_yaml::from_str(&content).map_err(|e| failed(e.to_string()))?;
    debug!(path = %path.display(), drivers = snapshot.drivers.len(), "loaded fixture");
    Ok(MemoryStore::from_snapshot(snapshot))
}

fn save_fixture(path: &Path, snapshot: &FleetSnapshot) -> std::result::Result<(), ConfigError> {
    let failed = |reason: String| ConfigError::Fixture { path: path.display().to_string(), reason };
    let yaml = serde_yaml::to_string(snapshot).map_err(|e| failed(e.to_string()))?;
    std::fs::write(path, yaml).map_err(|e| failed(e.to_string()))
}

/// Find a driver by id, falling back to a case-insensitive code match.
///
/// A key the backend rejects as an id (400) is looked up by code instead.
async fn find_driver(ctx: &ServiceContext, key: &str) -> Result<DriverRecord> {
    match ctx.store.get_driver(key).await {
        Ok(Some(driver)) => return Ok(driver),
        Ok(None) => {}
        Err(StoreError::Status { status: 400, message }) => {
            debug!(key, %message, "key is not a driver id");
        }
        Err(e) => return Err(e.into()),
    }
    ctx.store
        .list_drivers()
        .await?
        .into_iter()
        .find(|d| d.code.eq_ignore_ascii_case(key))
        .ok_or_else(|| Error::UnknownDriver(key.to_string()))
}

/// The active vehicle whose id or number is `key`.
async fn find_vehicle(ctx: &ServiceContext, kind: VehicleKind, key: &str) -> Result<Option<Vehicle>> {
    let key = key.trim();
    let vehicles = ctx.store.list_vehicles(kind).await?;
    Ok(vehicles.into_iter().find(|v| v.id == key || v.number.eq_ignore_ascii_case(key)))
}

/// Vehicle id for an id-or-number argument.
///
/// A number matching an active vehicle resolves to that vehicle's id;
/// anything else is taken as an id.
async fn resolve_vehicle(ctx: &ServiceContext, kind: VehicleKind, key: &str) -> Result<String> {
    Ok(find_vehicle(ctx, kind, key).await?.map_or_else(|| key.trim().to_string(), |v| v.id))
}

/// Vehicle id for an id-or-number argument that must name an active vehicle.
async fn active_vehicle_id(ctx: &ServiceContext, kind: VehicleKind, key: &str) -> Result<String> {
    find_vehicle(ctx, kind, key)
        .await?
        .map(|v| v.id)
        .ok_or_else(|| Error::UnknownVehicle { kind, key: key.trim().to_string() })
}

/// Print a success notice, or turn an error notice into the command's error.
fn report(notice: Notice) -> Result<()> {
    match notice {
        Notice::Success(message) => {
            println!("{message}");
            Ok(())
        }
        Notice::Error(message) => Err(Error::Failed(message)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{FixedClock, ScriptedPrompt};
    use crate::fleet::{DriverStatus, VehicleStatus};
    use chrono::Utc;

    const A1: &str = "5f0c2f64-3b1e-4c55-9d36-0a7f4c1e2b10";

    fn context(store: MemoryStore) -> ServiceContext {
        let store = store
            .with_driver(DriverRecord {
                id: A1.into(),
                code: "D01".into(),
                full_name: "Amal Haddad".into(),
                phone: None,
                gatepass: None,
                waqala: None,
                truck_id: None,
                trailer_id: None,
                company_id: None,
                status: DriverStatus::Active,
            })
            .with_vehicle(
                VehicleKind::Truck,
                Vehicle { id: "t1".into(), number: "T-100".into(), status: VehicleStatus::Active },
            );
        ServiceContext::new(
            Box::new(store),
            Box::new(ScriptedPrompt::default()),
            Box::new(FixedClock(Utc::now())),
        )
    }

    #[tokio::test]
    async fn driver_code_is_found_when_ids_are_uuids() {
        let store = MemoryStore::new();
        store.require_uuid_ids(true);
        let ctx = context(store);

        assert_eq!(find_driver(&ctx, "d01").await.unwrap().id, A1);
        assert_eq!(find_driver(&ctx, A1).await.unwrap().code, "D01");
        assert!(matches!(find_driver(&ctx, "D99").await, Err(Error::UnknownDriver(_))));
    }

    #[tokio::test]
    async fn driver_lookup_failures_still_surface() {
        let store = MemoryStore::new();
        store.fail_reads(true);
        let ctx = context(store);
        assert!(matches!(find_driver(&ctx, "D01").await, Err(Error::Store(_))));
    }

    #[tokio::test]
    async fn vehicles_resolve_by_id_or_number() {
        let ctx = context(MemoryStore::new());
        assert_eq!(resolve_vehicle(&ctx, VehicleKind::Truck, " t-100 ").await.unwrap(), "t1");
        assert_eq!(resolve_vehicle(&ctx, VehicleKind::Truck, "t9").await.unwrap(), "t9");
        assert_eq!(active_vehicle_id(&ctx, VehicleKind::Truck, "t1").await.unwrap(), "t1");

        let err = active_vehicle_id(&ctx, VehicleKind::Truck, "T-999").await.unwrap_err();
        assert_eq!(err.to_string(), "no active truck matches T-999");
    }
}
