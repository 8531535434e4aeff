mod common;
use common::{RecordingNotifier, add_product, add_staff, create_event, date, fields, mem_pool};
use gigstock::core::assignment::Assignment;
use gigstock::core::binding::Binding;
use gigstock::core::ledger::Ledger;
use gigstock::core::notify::{ChangeKind, EntityKind};
use gigstock::core::scheduler::Scheduler;
use gigstock::core::timesheet::Timesheet;
use gigstock::errors::AppError;
use gigstock::models::movement::MovementKind;
use gigstock::models::product::Category;
use gigstock::models::staff::Role;
use std::collections::BTreeMap;

#[test]
fn create_binds_products_and_assigns_crew() {
    let mut pool = mem_pool();
    let xlr = add_product(&pool, "XLR 10m", Category::Cabling);
    Ledger::record(&pool.conn, xlr, MovementKind::StockIn, 20, None).unwrap();
    let eva = add_staff(&mut pool, "eva", Role::Staff);

    let event = create_event(&mut pool, "2025-06-01", Some("18:00"), &[(xlr, 5)], &[eva, eva]);

    assert_eq!(Ledger::on_hand(&pool.conn, xlr).unwrap(), 15);
    let crew = Assignment::assigned_staff(&pool.conn, event.id).unwrap();
    assert_eq!(crew.len(), 1);
    assert!(Assignment::is_assigned(&pool.conn, event.id, eva).unwrap());
}

#[test]
fn update_reapplies_products_and_crew_in_full() {
    let mut pool = mem_pool();
    let xlr = add_product(&pool, "XLR 10m", Category::Cabling);
    let sub = add_product(&pool, "Sub 18", Category::Speakers);
    let eva = add_staff(&mut pool, "eva", Role::Staff);
    let jan = add_staff(&mut pool, "jan", Role::Staff);
    let event = create_event(&mut pool, "2025-06-01", None, &[(xlr, 5)], &[eva]);

    let notifier = RecordingNotifier::default();
    let mut f = fields("Gig renamed", "2025-06-02", Some("20:00"));
    f.note = "bring ladder".into();
    let updated = Scheduler::update(
        &mut pool,
        &notifier,
        event.id,
        &f,
        &BTreeMap::from([(sub, 2)]),
        &[jan],
    )
    .unwrap();

    assert_eq!(updated.name, "Gig renamed");
    assert_eq!(updated.date, date("2025-06-02"));
    assert_eq!(Ledger::on_hand(&pool.conn, xlr).unwrap(), 0);
    assert_eq!(Ledger::on_hand(&pool.conn, sub).unwrap(), -2);
    assert!(!Assignment::is_assigned(&pool.conn, event.id, eva).unwrap());
    assert!(Assignment::is_assigned(&pool.conn, event.id, jan).unwrap());

    let seen = notifier.seen.borrow();
    let kinds: Vec<(EntityKind, ChangeKind)> = seen.iter().map(|c| (c.entity, c.change)).collect();
    assert_eq!(
        kinds,
        vec![
            (EntityKind::Event, ChangeKind::Updated),
            (EntityKind::Binding, ChangeKind::Deleted),
            (EntityKind::Binding, ChangeKind::Created),
        ]
    );
    assert_eq!(seen[0].id, event.id);
    let new_binding = Binding::find(&pool.conn, event.id, sub).unwrap().unwrap();
    assert_eq!(seen[2].id, new_binding.id);
}

#[test]
fn delete_returns_equipment_and_drops_everything_else() {
    let mut pool = mem_pool();
    let xlr = add_product(&pool, "XLR 10m", Category::Cabling);
    Ledger::record(&pool.conn, xlr, MovementKind::StockIn, 10, None).unwrap();
    let eva = add_staff(&mut pool, "eva", Role::Staff);
    let event = create_event(&mut pool, "2025-06-01", Some("18:00"), &[(xlr, 4)], &[eva]);

    Timesheet::clock_in(&pool.conn, event.id, eva, common::at("2025-06-01 17:00")).unwrap();

    let binding_id = Binding::find(&pool.conn, event.id, xlr).unwrap().unwrap().id;
    let notifier = RecordingNotifier::default();
    Scheduler::delete(&mut pool, &notifier, event.id).unwrap();

    assert_eq!(Ledger::on_hand(&pool.conn, xlr).unwrap(), 10);
    assert_eq!(Ledger::event_net(&pool.conn, event.id).unwrap(), 0);
    assert!(Binding::bindings(&pool.conn, event.id).unwrap().is_empty());
    assert!(Assignment::assigned_staff(&pool.conn, event.id).unwrap().is_empty());
    assert!(Timesheet::entries_for_event(&pool.conn, event.id).unwrap().is_empty());
    assert_eq!(Scheduler::orphan_count(&pool.conn).unwrap(), 0);

    let err = Scheduler::get(&pool.conn, event.id).unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
    let seen = notifier.seen.borrow();
    assert_eq!(seen.len(), 2);
    assert_eq!((seen[0].entity, seen[0].change), (EntityKind::Event, ChangeKind::Deleted));
    assert_eq!((seen[1].entity, seen[1].id), (EntityKind::Binding, binding_id));
    assert_eq!(seen[1].change, ChangeKind::Deleted);
}

#[test]
fn create_announces_the_event_then_its_bindings() {
    let mut pool = mem_pool();
    let xlr = add_product(&pool, "XLR 10m", Category::Cabling);
    let dmx = add_product(&pool, "DMX 5m", Category::Cabling);

    let notifier = RecordingNotifier::default();
    let event = Scheduler::create(
        &mut pool,
        &notifier,
        &fields("Gig", "2025-06-01", Some("18:00")),
        &BTreeMap::from([(xlr, 2), (dmx, 0)]),
        &[],
    )
    .unwrap();

    let seen = notifier.seen.borrow();
    assert_eq!(seen.len(), 2);
    assert_eq!((seen[0].entity, seen[0].id), (EntityKind::Event, event.id));
    assert_eq!(seen[1].entity, EntityKind::Binding);
    assert!(seen.iter().all(|c| c.change == ChangeKind::Created));
}

#[test]
fn invalid_create_writes_nothing_and_notifies_nobody() {
    let mut pool = mem_pool();
    let xlr = add_product(&pool, "XLR 10m", Category::Cabling);
    let notifier = RecordingNotifier::default();

    let blank = fields("  ", "2025-06-01", None);
    let err = Scheduler::create(&mut pool, &notifier, &blank, &BTreeMap::new(), &[]).unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    let ok_fields = fields("Gig", "2025-06-01", None);
    let err = Scheduler::create(
        &mut pool,
        &notifier,
        &ok_fields,
        &BTreeMap::from([(xlr, 3)]),
        &[404],
    )
    .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    assert!(Scheduler::list(&pool.conn, None).unwrap().is_empty());
    assert!(Ledger::movements(&pool.conn, None).unwrap().is_empty());
    assert!(notifier.seen.borrow().is_empty());
}

#[test]
fn update_of_missing_event_is_not_found() {
    let mut pool = mem_pool();
    let notifier = RecordingNotifier::default();
    let err = Scheduler::update(
        &mut pool,
        &notifier,
        77,
        &fields("Gig", "2025-06-01", None),
        &BTreeMap::new(),
        &[],
    )
    .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[test]
fn list_filters_by_range_and_orders_by_date() {
    let mut pool = mem_pool();
    let late = create_event(&mut pool, "2025-07-10", None, &[], &[]);
    let early = create_event(&mut pool, "2025-06-01", None, &[], &[]);
    create_event(&mut pool, "2025-08-01", None, &[], &[]);

    let all: Vec<i64> = Scheduler::list(&pool.conn, None).unwrap().iter().map(|e| e.id).collect();
    assert_eq!(all.len(), 3);
    assert_eq!(all[0], early.id);

    let range = Some((date("2025-06-01"), date("2025-07-31")));
    let some: Vec<i64> = Scheduler::list(&pool.conn, range).unwrap().iter().map(|e| e.id).collect();
    assert_eq!(some, vec![early.id, late.id]);
}

#[test]
fn my_events_and_todays_events() {
    let mut pool = mem_pool();
    let eva = add_staff(&mut pool, "eva", Role::Staff);
    let today = create_event(&mut pool, "2025-06-01", Some("18:00"), &[], &[eva]);
    let later = create_event(&mut pool, "2025-06-05", None, &[], &[eva]);
    create_event(&mut pool, "2025-06-01", None, &[], &[]);

    let mine: Vec<i64> = Scheduler::list_for_staff(&pool.conn, eva)
        .unwrap()
        .iter()
        .map(|e| e.id)
        .collect();
    assert_eq!(mine, vec![today.id, later.id]);

    let day = Scheduler::list_for_day(&pool.conn, eva, date("2025-06-01")).unwrap();
    assert_eq!(day.len(), 1);
    assert_eq!(day[0].id, today.id);
}

#[test]
fn inactive_staff_may_still_be_assigned() {
    let mut pool = mem_pool();
    let eva = add_staff(&mut pool, "eva", Role::Staff);
    gigstock::core::staff::StaffLogic::set_active(&mut pool, eva, false).unwrap();

    let event = create_event(&mut pool, "2025-06-01", None, &[], &[eva]);
    assert!(Assignment::is_assigned(&pool.conn, event.id, eva).unwrap());
}
