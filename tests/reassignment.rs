//! Reassignment behavior over the in-memory store.
//!
//! Every test seeds a small fleet, drives the reconciler or the driver form,
//! and inspects both the write log and the rows left behind.

use fleetdesk::adapters::memory::{MemoryStore, ScriptedPrompt, WriteCall};
use fleetdesk::error::ReconcileError;
use fleetdesk::fleet::{DriverPatch, DriverRecord, DriverStatus, Vehicle, VehicleKind, VehicleStatus};
use fleetdesk::reconcile::{
    assign_vehicle, save_form, AssignmentOutcome, ConfirmOutcome, DriverForm, Notice, Reconciler,
    Resolution, SelectOutcome,
};

const TRUCK: VehicleKind = VehicleKind::Truck;

fn driver(id: &str, code: &str, truck: Option<&str>) -> DriverRecord {
    DriverRecord {
        id: id.into(),
        code: code.into(),
        full_name: format!("Driver {code}"),
        phone: None,
        gatepass: None,
        waqala: None,
        truck_id: truck.map(Into::into),
        trailer_id: None,
        company_id: None,
        status: DriverStatus::Active,
    }
}

fn seeded() -> MemoryStore {
    MemoryStore::new()
        .with_driver(driver("a1", "D01", Some("t1")))
        .with_driver(driver("b1", "D02", None))
        .with_vehicle(
            TRUCK,
            Vehicle { id: "t1".into(), number: "T-100".into(), status: VehicleStatus::Active },
        )
}

fn holders_of(store: &MemoryStore, truck: &str) -> Vec<String> {
    store
        .snapshot()
        .drivers
        .into_iter()
        .filter(|d| d.truck_id.as_deref() == Some(truck))
        .map(|d| d.id)
        .collect()
}

#[tokio::test]
async fn editing_the_holder_is_never_a_conflict() {
    let store = seeded();
    let reconciler = Reconciler::new(&store);
    assert_eq!(reconciler.check_conflict(TRUCK, "t1", Some("a1")).await.unwrap(), None);
}

#[tokio::test]
async fn another_holder_is_reported() {
    let store = seeded();
    let reconciler = Reconciler::new(&store);
    let holder = reconciler.check_conflict(TRUCK, "t1", Some("b1")).await.unwrap().unwrap();
    assert_eq!(holder.id, "a1");
    assert_eq!(holder.code, "D01");
    assert_eq!(holder.full_name, "Driver D01");
}

#[tokio::test]
async fn empty_selection_issues_no_query() {
    let store = seeded();
    let reconciler = Reconciler::new(&store);
    assert_eq!(reconciler.check_conflict(TRUCK, "", Some("b1")).await.unwrap(), None);
    assert_eq!(reconciler.check_conflict(TRUCK, "", None).await.unwrap(), None);
    assert_eq!(store.reads(), 0);
}

#[tokio::test]
async fn confirmed_reassignment_clears_the_old_link() {
    let store = seeded();
    let reconciler = Reconciler::new(&store);
    let resolution = reconciler.resolve_conflict(TRUCK, "t1", Some("b1"), true).await.unwrap();
    assert_eq!(resolution, Resolution::Reassigned { released: vec!["a1".into()] });
    assert_eq!(store.driver("a1").unwrap().truck_id, None);
}

#[tokio::test]
async fn declined_reassignment_writes_nothing() {
    let store = seeded();
    let reconciler = Reconciler::new(&store);
    let resolution = reconciler.resolve_conflict(TRUCK, "t1", Some("b1"), false).await.unwrap();
    assert_eq!(resolution, Resolution::Declined);
    assert_eq!(store.driver("a1").unwrap().truck_id.as_deref(), Some("t1"));
    assert!(store.writes().is_empty());
}

#[tokio::test]
async fn releasing_twice_is_harmless() {
    let store = seeded();
    let reconciler = Reconciler::new(&store);
    reconciler.release_holders(TRUCK, "t1", Some("b1")).await.unwrap();
    let before = store.snapshot();

    let again = reconciler.release_holders(TRUCK, "t1", Some("b1")).await.unwrap();
    assert!(again.is_empty());
    assert_eq!(store.snapshot(), before);
    assert_eq!(store.writes().len(), 1);
}

#[tokio::test]
async fn taking_over_a_truck_leaves_exactly_one_holder() {
    let store = seeded();
    let reconciler = Reconciler::new(&store);
    let mut form = DriverForm::edit(&driver("b1", "D02", None));

    let outcome = form.select(&reconciler, TRUCK, "t1").await.unwrap();
    let SelectOutcome::NeedsConfirmation(holder) = outcome else {
        panic!("expected a conflict");
    };
    assert_eq!(holder.id, "a1");

    let confirmed = form.confirm(&reconciler, TRUCK, true).await.unwrap();
    assert_eq!(confirmed, ConfirmOutcome::Reassigned { released: vec!["a1".into()] });
    assert_eq!(
        store.writes(),
        [WriteCall::Update { id: "a1".into(), patch: DriverPatch::clear_link(TRUCK) }]
    );
    assert_eq!(form.draft().truck_id, "t1");
    assert_eq!(store.driver("b1").unwrap().truck_id, None);

    form.save(&store).await.unwrap();
    assert_eq!(store.driver("a1").unwrap().truck_id, None);
    assert_eq!(store.driver("b1").unwrap().truck_id.as_deref(), Some("t1"));
    assert_eq!(holders_of(&store, "t1"), ["b1"]);
}

#[tokio::test]
async fn taking_over_a_trailer_keeps_the_old_holders_truck() {
    const TRAILER: VehicleKind = VehicleKind::Trailer;
    let store = MemoryStore::new()
        .with_driver(DriverRecord { trailer_id: Some("r1".into()), ..driver("a1", "D01", Some("t1")) })
        .with_driver(driver("b1", "D02", None))
        .with_vehicle(
            TRAILER,
            Vehicle { id: "r1".into(), number: "TR-220".into(), status: VehicleStatus::Active },
        );
    let prompt = ScriptedPrompt::answering([true]);
    let mut form = DriverForm::edit(&driver("b1", "D02", None));

    let assignment = assign_vehicle(&store, &prompt, &mut form, TRAILER, "r1").await;
    assert_eq!(assignment.outcome, AssignmentOutcome::Reassigned { released: vec!["a1".into()] });
    assert_eq!(assignment.notices, [Notice::Success("Trailer reassigned successfully".into())]);
    assert_eq!(prompt.asked()[0].vehicle_label, "TR-220");
    assert_eq!(
        store.writes(),
        [WriteCall::Update { id: "a1".into(), patch: DriverPatch::clear_link(TRAILER) }]
    );
    assert_eq!(form.draft().trailer_id, "r1");

    save_form(&store, &mut form).await;
    let old = store.driver("a1").unwrap();
    assert_eq!(old.trailer_id, None);
    assert_eq!(old.truck_id.as_deref(), Some("t1"));
    assert_eq!(store.driver("b1").unwrap().trailer_id.as_deref(), Some("r1"));
    assert_eq!(holders_of(&store, "t1"), ["a1"]);
}

#[tokio::test]
async fn failed_clear_reports_what_was_already_released() {
    let store = seeded().with_driver(driver("c1", "D03", Some("t1")));
    store.fail_updates_for("c1");
    let prompt = ScriptedPrompt::answering([true]);
    let mut form = DriverForm::edit(&driver("b1", "D02", None));

    let assignment = assign_vehicle(&store, &prompt, &mut form, TRUCK, "t1").await;
    let AssignmentOutcome::Failed(ReconcileError::PartialReassignment { driver_id, cleared, .. }) =
        assignment.outcome
    else {
        panic!("expected a partial reassignment");
    };
    assert_eq!(driver_id, "c1");
    assert_eq!(cleared, ["a1"]);
    assert_eq!(holders_of(&store, "t1"), ["c1"]);
    assert!(form.field(TRUCK).pending().is_some());

    store.heal_updates_for("c1");
    let confirmed = form.confirm(&Reconciler::new(&store), TRUCK, true).await.unwrap();
    assert_eq!(confirmed, ConfirmOutcome::Reassigned { released: vec!["c1".into()] });
    assert_eq!(
        save_form(&store, &mut form).await,
        Notice::Success("Driver updated successfully".into())
    );
    assert_eq!(holders_of(&store, "t1"), ["b1"]);
}

#[tokio::test]
async fn a_new_selection_drops_the_unanswered_one() {
    let store = seeded()
        .with_driver(driver("c1", "D03", Some("t2")))
        .with_vehicle(
            TRUCK,
            Vehicle { id: "t2".into(), number: "T-200".into(), status: VehicleStatus::Active },
        );
    let reconciler = Reconciler::new(&store);
    let mut form = DriverForm::edit(&driver("b1", "D02", None));

    form.select(&reconciler, TRUCK, "t1").await.unwrap();
    form.select(&reconciler, TRUCK, "t2").await.unwrap();
    let (pending, holder) = form.field(TRUCK).pending().unwrap();
    assert_eq!(pending, "t2");
    assert_eq!(holder.id, "c1");

    form.confirm(&reconciler, TRUCK, true).await.unwrap();
    form.save(&store).await.unwrap();
    assert_eq!(holders_of(&store, "t1"), ["a1"]);
    assert_eq!(holders_of(&store, "t2"), ["b1"]);
}

#[tokio::test]
async fn abandoning_the_form_leaves_the_vehicle_unheld() {
    let store = seeded();
    let prompt = ScriptedPrompt::answering([true]);
    let mut form = DriverForm::edit(&driver("b1", "D02", None));

    let assignment = assign_vehicle(&store, &prompt, &mut form, TRUCK, "t1").await;
    assert!(assignment.changed_draft());
    drop(form);

    assert!(holders_of(&store, "t1").is_empty());
}
