//! Vehicle assignment reconciliation.
//!
//! A truck or trailer should be linked to at most one driver. Nothing in the
//! backend enforces that, so every selection in the driver form goes through
//! [`Reconciler::check_conflict`] first. When another driver already holds
//! the vehicle the operator is asked, and on confirmation
//! [`Reconciler::resolve_conflict`] clears the other driver's link before the
//! edited driver's draft picks the vehicle up.
//!
//! The clear-then-set sequence is not atomic: clears run one at a time with
//! no rollback, and the new link only reaches storage when the form is
//! saved.

mod form;
mod selection;
mod workflow;

pub use form::{ConfirmOutcome, DriverForm, SaveOutcome, SelectOutcome};
pub use selection::{SelectionState, VehicleField};
pub use workflow::{assign_vehicle, release_vehicle, save_form, Assignment, AssignmentOutcome, Notice};

use tracing::{debug, info, warn};

use crate::error::ReconcileError;
use crate::fleet::{DriverPatch, DriverRecord, VehicleKind};
use crate::ports::RecordStore;

/// Result of [`Reconciler::resolve_conflict`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The operator declined; nothing was written.
    Declined,
    /// Every other holder was released.
    Reassigned {
        /// Ids of the drivers whose link was cleared, in clearing order.
        released: Vec<String>,
    },
}

/// Detects and resolves competing claims on a vehicle.
pub struct Reconciler<'a> {
    store: &'a dyn RecordStore,
}

impl<'a> Reconciler<'a> {
    /// Creates a reconciler over the given store.
    #[must_use]
    pub fn new(store: &'a dyn RecordStore) -> Self {
        Self { store }
    }

    /// Finds a driver other than `exclude_driver_id` that holds the vehicle.
    ///
    /// An empty `vehicle_id` means "no selection" and returns `None` without
    /// querying. When several drivers hold the vehicle (the invariant was
    /// already broken) the first in store order is reported.
    ///
    /// # Errors
    ///
    /// Returns [`ReconcileError::QueryFailure`] if the lookup fails.
    pub async fn check_conflict(
        &self,
        kind: VehicleKind,
        vehicle_id: &str,
        exclude_driver_id: Option<&str>,
    ) -> Result<Option<DriverRecord>, ReconcileError> {
        if vehicle_id.is_empty() {
            return Ok(None);
        }

        let holders = self.holders(kind, vehicle_id, exclude_driver_id).await?;
        if holders.len() > 1 {
            warn!(%kind, vehicle_id, count = holders.len(), "vehicle already held by several drivers");
        }
        let conflict = holders.into_iter().next();
        debug!(%kind, vehicle_id, holder = conflict.as_ref().map(|d| d.id.as_str()), "checked assignment");
        Ok(conflict)
    }

    /// Applies the operator's answer to a reported conflict.
    ///
    /// Declining writes nothing. Confirming re-reads the current holders
    /// (the earlier check may be stale) and clears each of their links in
    /// turn; see [`Self::release_holders`].
    ///
    /// # Errors
    ///
    /// Returns [`ReconcileError::QueryFailure`] if the re-read fails, or
    /// [`ReconcileError::PartialReassignment`] if a clear fails.
    pub async fn resolve_conflict(
        &self,
        kind: VehicleKind,
        vehicle_id: &str,
        exclude_driver_id: Option<&str>,
        confirmed: bool,
    ) -> Result<Resolution, ReconcileError> {
        if !confirmed {
            debug!(%kind, vehicle_id, "reassignment declined");
            return Ok(Resolution::Declined);
        }
        let released = self.release_holders(kind, vehicle_id, exclude_driver_id).await?;
        info!(%kind, vehicle_id, released = ?released, "vehicle released for reassignment");
        Ok(Resolution::Reassigned { released })
    }

    /// Clears the link on every driver except `exclude_driver_id` holding the vehicle.
    ///
    /// Updates are issued sequentially. The first failure stops the run and
    /// links cleared before it stay cleared. Running this again after it
    /// succeeded finds no holders and writes nothing.
    ///
    /// # Errors
    ///
    /// Returns [`ReconcileError::QueryFailure`] if the lookup fails, or
    /// [`ReconcileError::PartialReassignment`] naming the driver whose update failed.
    pub async fn release_holders(
        &self,
        kind: VehicleKind,
        vehicle_id: &str,
        exclude_driver_id: Option<&str>,
    ) -> Result<Vec<String>, ReconcileError> {
        if vehicle_id.is_empty() {
            return Ok(Vec::new());
        }

        let holders = self.holders(kind, vehicle_id, exclude_driver_id).await?;
        let patch = DriverPatch::clear_link(kind);
        let mut cleared = Vec::with_capacity(holders.len());
        for holder in holders {
            if let Err(source) = self.store.update_driver(&holder.id, &patch).await {
                warn!(%kind, vehicle_id, driver_id = %holder.id, error = %source, "failed to clear link");
                return Err(ReconcileError::PartialReassignment {
                    kind,
                    driver_id: holder.id,
                    cleared,
                    source,
                });
            }
            debug!(%kind, vehicle_id, driver_id = %holder.id, "cleared link");
            cleared.push(holder.id);
        }
        Ok(cleared)
    }

    async fn holders(
        &self,
        kind: VehicleKind,
        vehicle_id: &str,
        exclude_driver_id: Option<&str>,
    ) -> Result<Vec<DriverRecord>, ReconcileError> {
        let mut holders = self
            .store
            .find_holders(kind, vehicle_id, exclude_driver_id)
            .await
            .map_err(|source| {
                warn!(%kind, vehicle_id, error = %source, "holder lookup failed");
                ReconcileError::QueryFailure { kind, source }
            })?;
        holders.retain(|d| Some(d.id.as_str()) != exclude_driver_id);
        Ok(holders)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{MemoryStore, WriteCall};
    use crate::error::StoreError;
    use crate::fleet::DriverStatus;

    fn driver(id: &str, truck: Option<&str>) -> DriverRecord {
        DriverRecord {
            id: id.into(),
            code: format!("D-{id}"),
            full_name: format!("Driver {id}"),
            phone: None,
            gatepass: None,
            waqala: None,
            truck_id: truck.map(Into::into),
            trailer_id: None,
            company_id: None,
            status: DriverStatus::Active,
        }
    }

    #[tokio::test]
    async fn own_assignment_is_not_a_conflict() {
        let store = MemoryStore::new().with_driver(driver("a1", Some("t1")));
        let reconciler = Reconciler::new(&store);
        let conflict = reconciler.check_conflict(VehicleKind::Truck, "t1", Some("a1")).await;
        assert_eq!(conflict, Ok(None));
    }

    #[tokio::test]
    async fn empty_selection_skips_the_query() {
        let store = MemoryStore::new().with_driver(driver("a1", None));
        let reconciler = Reconciler::new(&store);
        assert_eq!(reconciler.check_conflict(VehicleKind::Truck, "", Some("b1")).await, Ok(None));
        assert_eq!(reconciler.release_holders(VehicleKind::Truck, "", None).await, Ok(vec![]));
        assert_eq!(store.reads(), 0);
    }

    #[tokio::test]
    async fn first_holder_in_store_order_is_reported() {
        let store = MemoryStore::new()
            .with_driver(driver("a1", Some("t1")))
            .with_driver(driver("c1", Some("t1")));
        let reconciler = Reconciler::new(&store);
        let holder = reconciler.check_conflict(VehicleKind::Truck, "t1", Some("b1")).await.unwrap();
        assert_eq!(holder.map(|d| d.id), Some("a1".to_string()));
    }

    #[tokio::test]
    async fn lookup_failure_is_a_query_failure() {
        let store = MemoryStore::new();
        store.fail_reads(true);
        let reconciler = Reconciler::new(&store);
        let err = reconciler.check_conflict(VehicleKind::Trailer, "r1", None).await.unwrap_err();
        assert_eq!(
            err,
            ReconcileError::QueryFailure {
                kind: VehicleKind::Trailer,
                source: StoreError::Request("connection reset".into()),
            }
        );
        assert!(store.writes().is_empty());
    }

    #[tokio::test]
    async fn declining_writes_nothing() {
        let store = MemoryStore::new().with_driver(driver("a1", Some("t1")));
        let reconciler = Reconciler::new(&store);
        let resolution =
            reconciler.resolve_conflict(VehicleKind::Truck, "t1", Some("b1"), false).await;
        assert_eq!(resolution, Ok(Resolution::Declined));
        assert!(store.writes().is_empty());
        assert_eq!(store.reads(), 0);
        assert_eq!(store.driver("a1").unwrap().truck_id.as_deref(), Some("t1"));
    }

    #[tokio::test]
    async fn confirming_releases_every_other_holder_in_order() {
        let store = MemoryStore::new()
            .with_driver(driver("a1", Some("t1")))
            .with_driver(driver("b1", Some("t1")))
            .with_driver(driver("c1", Some("t1")));
        let reconciler = Reconciler::new(&store);

        let resolution = reconciler.resolve_conflict(VehicleKind::Truck, "t1", Some("b1"), true).await;
        assert_eq!(
            resolution,
            Ok(Resolution::Reassigned { released: vec!["a1".into(), "c1".into()] })
        );
        assert_eq!(store.driver("a1").unwrap().truck_id, None);
        assert_eq!(store.driver("c1").unwrap().truck_id, None);
        assert_eq!(store.driver("b1").unwrap().truck_id.as_deref(), Some("t1"));

        let clear = DriverPatch::clear_link(VehicleKind::Truck);
        assert_eq!(
            store.writes(),
            vec![
                WriteCall::Update { id: "a1".into(), patch: clear.clone() },
                WriteCall::Update { id: "c1".into(), patch: clear },
            ]
        );
    }

    #[tokio::test]
    async fn failed_clear_stops_and_keeps_earlier_clears() {
        let store = MemoryStore::new()
            .with_driver(driver("a1", Some("t1")))
            .with_driver(driver("c1", Some("t1")))
            .with_driver(driver("e1", Some("t1")));
        store.fail_updates_for("c1");
        let reconciler = Reconciler::new(&store);

        let err = reconciler.release_holders(VehicleKind::Truck, "t1", None).await.unwrap_err();
        let ReconcileError::PartialReassignment { driver_id, cleared, .. } = err else {
            panic!("expected a partial reassignment, got {err:?}");
        };
        assert_eq!(driver_id, "c1");
        assert_eq!(cleared, ["a1"]);
        assert_eq!(store.driver("a1").unwrap().truck_id, None);
        assert_eq!(store.driver("c1").unwrap().truck_id.as_deref(), Some("t1"));
        assert_eq!(store.driver("e1").unwrap().truck_id.as_deref(), Some("t1"));
        assert_eq!(store.writes().len(), 2);
    }
}
