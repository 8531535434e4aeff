mod common;
use common::{add_staff, at, create_event, mem_pool};
use gigstock::core::timesheet::{Timesheet, effective_start, round_up_half_hour};
use gigstock::errors::AppError;
use gigstock::models::staff::Role;

#[test]
fn rounding_goes_up_to_half_hours() {
    let cases = [(0, 0), (1, 30), (29, 30), (30, 30), (31, 60), (61, 90), (120, 120)];
    for (minutes, expected) in cases {
        assert_eq!(round_up_half_hour(minutes), expected, "{minutes} min");
    }
}

#[test]
fn early_clock_in_counts_from_the_scheduled_start() {
    let mut pool = mem_pool();
    let event = create_event(&mut pool, "2025-06-01", Some("18:00"), &[], &[]);

    assert_eq!(effective_start(&event, at("2025-06-01 16:40")), at("2025-06-01 18:00"));
    assert_eq!(effective_start(&event, at("2025-06-01 18:00")), at("2025-06-01 18:00"));
}

#[test]
fn late_clock_in_counts_from_the_next_half_hour() {
    let mut pool = mem_pool();
    let event = create_event(&mut pool, "2025-06-01", Some("18:00"), &[], &[]);

    assert_eq!(effective_start(&event, at("2025-06-01 18:10")), at("2025-06-01 18:30"));
    assert_eq!(effective_start(&event, at("2025-06-01 19:05")), at("2025-06-01 19:30"));
    assert_eq!(effective_start(&event, at("2025-06-01 18:30")), at("2025-06-01 19:00"));
    assert_eq!(effective_start(&event, at("2025-06-01 23:45")), at("2025-06-02 00:00"));
}

#[test]
fn without_start_time_the_clock_counts_from_now() {
    let mut pool = mem_pool();
    let event = create_event(&mut pool, "2025-06-01", None, &[], &[]);
    assert_eq!(effective_start(&event, at("2025-06-01 10:17")), at("2025-06-01 10:17"));
}

#[test]
fn full_shift_is_rounded_up() {
    let mut pool = mem_pool();
    let eva = add_staff(&mut pool, "eva", Role::Staff);
    let event = create_event(&mut pool, "2025-06-01", Some("18:00"), &[], &[eva]);

    let open = Timesheet::clock_in(&pool.conn, event.id, eva, at("2025-06-01 17:30")).unwrap();
    assert!(open.is_open());
    assert_eq!(open.start, Some(at("2025-06-01 18:00")));

    let closed = Timesheet::clock_out(&pool.conn, event.id, eva, at("2025-06-01 20:10")).unwrap();
    assert_eq!(closed.minutes, 150);
    assert_eq!(closed.end, Some(at("2025-06-01 20:30")));
    assert!(Timesheet::running_for(&pool.conn, eva).unwrap().is_none());
}

#[test]
fn clock_out_before_credited_start_gives_zero() {
    let mut pool = mem_pool();
    let eva = add_staff(&mut pool, "eva", Role::Staff);
    let event = create_event(&mut pool, "2025-06-01", Some("18:00"), &[], &[eva]);

    Timesheet::clock_in(&pool.conn, event.id, eva, at("2025-06-01 19:05")).unwrap();
    let closed = Timesheet::clock_out(&pool.conn, event.id, eva, at("2025-06-01 19:10")).unwrap();
    assert_eq!(closed.minutes, 0);
}

#[test]
fn clock_out_at_the_credited_start_gives_zero() {
    let mut pool = mem_pool();
    let eva = add_staff(&mut pool, "eva", Role::Staff);
    let event = create_event(&mut pool, "2025-06-01", Some("18:00"), &[], &[eva]);

    Timesheet::clock_in(&pool.conn, event.id, eva, at("2025-06-01 17:45")).unwrap();
    let closed = Timesheet::clock_out(&pool.conn, event.id, eva, at("2025-06-01 18:00")).unwrap();
    assert_eq!(closed.minutes, 0);
    assert_eq!(closed.end, Some(at("2025-06-01 18:00")));
    assert_eq!(closed.start, closed.end);
}

#[test]
fn seventeen_minutes_are_credited_as_half_an_hour() {
    let mut pool = mem_pool();
    let eva = add_staff(&mut pool, "eva", Role::Staff);
    let event = create_event(&mut pool, "2025-06-01", Some("18:00"), &[], &[eva]);

    Timesheet::clock_in(&pool.conn, event.id, eva, at("2025-06-01 18:00")).unwrap();
    let closed = Timesheet::clock_out(&pool.conn, event.id, eva, at("2025-06-01 18:17")).unwrap();
    assert_eq!(closed.minutes, 30);
    assert_eq!(closed.end, Some(at("2025-06-01 18:30")));
}

#[test]
fn unknown_staff_or_event_is_not_found() {
    let mut pool = mem_pool();
    let eva = add_staff(&mut pool, "eva", Role::Staff);
    let event = create_event(&mut pool, "2025-06-01", Some("18:00"), &[], &[eva]);

    let err = Timesheet::clock_in(&pool.conn, event.id, 999, at("2025-06-01 17:00")).unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)), "{err:?}");
    let err = Timesheet::clock_in(&pool.conn, 999, eva, at("2025-06-01 17:00")).unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)), "{err:?}");

    let err = Timesheet::clock_out(&pool.conn, 999, eva, at("2025-06-01 19:00")).unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)), "{err:?}");
    let err = Timesheet::clock_out(&pool.conn, event.id, 999, at("2025-06-01 19:00")).unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)), "{err:?}");

    assert!(Timesheet::entries_for_event(&pool.conn, event.id).unwrap().is_empty());
}

#[test]
fn clock_in_only_on_the_event_day() {
    let mut pool = mem_pool();
    let eva = add_staff(&mut pool, "eva", Role::Staff);
    let event = create_event(&mut pool, "2025-06-01", Some("18:00"), &[], &[eva]);

    let err = Timesheet::clock_in(&pool.conn, event.id, eva, at("2025-05-31 18:00")).unwrap_err();
    assert!(matches!(err, AppError::Policy(_)));
    assert!(Timesheet::entries_for_event(&pool.conn, event.id).unwrap().is_empty());
}

#[test]
fn one_open_entry_per_staff_and_event() {
    let mut pool = mem_pool();
    let eva = add_staff(&mut pool, "eva", Role::Staff);
    let event = create_event(&mut pool, "2025-06-01", Some("18:00"), &[], &[eva]);

    Timesheet::clock_in(&pool.conn, event.id, eva, at("2025-06-01 17:00")).unwrap();
    let err = Timesheet::clock_in(&pool.conn, event.id, eva, at("2025-06-01 17:10")).unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    // after clock-out a new shift may start
    Timesheet::clock_out(&pool.conn, event.id, eva, at("2025-06-01 19:00")).unwrap();
    Timesheet::clock_in(&pool.conn, event.id, eva, at("2025-06-01 21:00")).unwrap();
    assert_eq!(Timesheet::entries_for_event(&pool.conn, event.id).unwrap().len(), 2);
}

#[test]
fn clock_out_without_open_entry_is_a_conflict() {
    let mut pool = mem_pool();
    let eva = add_staff(&mut pool, "eva", Role::Staff);
    let event = create_event(&mut pool, "2025-06-01", Some("18:00"), &[], &[eva]);

    let err = Timesheet::clock_out(&pool.conn, event.id, eva, at("2025-06-01 20:00")).unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));
}

#[test]
fn summary_totals_only_closed_entries() {
    let mut pool = mem_pool();
    let eva = add_staff(&mut pool, "eva", Role::Staff);
    let jan = add_staff(&mut pool, "jan", Role::Staff);
    let first = create_event(&mut pool, "2025-06-01", Some("18:00"), &[], &[eva, jan]);
    let second = create_event(&mut pool, "2025-06-02", Some("10:00"), &[], &[eva]);

    Timesheet::clock_in(&pool.conn, first.id, eva, at("2025-06-01 18:00")).unwrap();
    Timesheet::clock_out(&pool.conn, first.id, eva, at("2025-06-01 21:00")).unwrap();
    Timesheet::clock_in(&pool.conn, second.id, eva, at("2025-06-02 09:00")).unwrap();
    Timesheet::clock_out(&pool.conn, second.id, eva, at("2025-06-02 10:20")).unwrap();
    Timesheet::clock_in(&pool.conn, first.id, jan, at("2025-06-01 18:00")).unwrap();

    let summary = Timesheet::summary(&pool.conn, None).unwrap();
    assert_eq!(summary.running.len(), 1);
    assert_eq!(summary.running[0].staff_id, jan);

    assert_eq!(summary.per_staff.len(), 1);
    let eva_totals = &summary.per_staff[0];
    assert_eq!(eva_totals.total_minutes, 180 + 30);
    assert_eq!(eva_totals.events.len(), 2);

    let per_event: Vec<(i64, i64)> = summary.per_event.iter().map(|e| (e.event_id, e.minutes)).collect();
    assert_eq!(per_event, vec![(first.id, 180), (second.id, 30)]);

    let only_jan = Timesheet::summary(&pool.conn, Some(jan)).unwrap();
    assert!(only_jan.per_staff.is_empty());
    assert_eq!(only_jan.running.len(), 1);
}

#[test]
fn reset_removes_only_the_chosen_event() {
    let mut pool = mem_pool();
    let eva = add_staff(&mut pool, "eva", Role::Staff);
    let first = create_event(&mut pool, "2025-06-01", Some("18:00"), &[], &[eva]);
    let second = create_event(&mut pool, "2025-06-02", Some("18:00"), &[], &[eva]);

    Timesheet::clock_in(&pool.conn, first.id, eva, at("2025-06-01 18:00")).unwrap();
    Timesheet::clock_in(&pool.conn, second.id, eva, at("2025-06-02 18:00")).unwrap();

    assert_eq!(Timesheet::reset(&pool.conn, Some(first.id)).unwrap(), 1);
    assert!(Timesheet::entries_for_event(&pool.conn, first.id).unwrap().is_empty());
    assert_eq!(Timesheet::entries_for_event(&pool.conn, second.id).unwrap().len(), 1);

    assert_eq!(Timesheet::reset(&pool.conn, None).unwrap(), 1);
    assert!(Timesheet::running_for(&pool.conn, eva).unwrap().is_none());
}
