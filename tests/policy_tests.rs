mod common;
use common::{add_staff, create_event, mem_pool};
use gigstock::core::policy::{AccessPolicy, Actor, ResetScope, require};
use gigstock::core::staff::StaffLogic;
use gigstock::errors::AppError;
use gigstock::models::staff::Role;

fn actor(pool: &gigstock::db::pool::DbPool, login: &str) -> Actor {
    Actor::resolve(&pool.conn, login).unwrap()
}

#[test]
fn role_matrix() {
    let mut pool = mem_pool();
    add_staff(&mut pool, "mona", Role::Manager);
    add_staff(&mut pool, "eva", Role::Staff);
    let policy = AccessPolicy::default();

    let admin = actor(&pool, "admin");
    let manager = actor(&pool, "mona");
    let staff = actor(&pool, "eva");

    assert!(policy.can_manage_events(&admin));
    assert!(policy.can_manage_events(&manager));
    assert!(!policy.can_manage_events(&staff));

    assert!(policy.can_manage_staff_credentials(&admin));
    assert!(!policy.can_manage_staff_credentials(&manager));

    assert!(policy.can_reset_hours(&manager, ResetScope::Event));
    assert!(!policy.can_reset_hours(&manager, ResetScope::All));
    assert!(policy.can_reset_hours(&admin, ResetScope::All));
    assert!(!policy.can_reset_hours(&staff, ResetScope::Event));
}

#[test]
fn inventory_follows_configured_roles_and_grants() {
    let mut pool = mem_pool();
    add_staff(&mut pool, "mona", Role::Manager);
    let eva = add_staff(&mut pool, "eva", Role::Staff);

    let admin_only = AccessPolicy::new(vec![Role::Admin]);
    assert!(admin_only.can_manage_inventory(&actor(&pool, "admin")));
    assert!(!admin_only.can_manage_inventory(&actor(&pool, "mona")));
    assert!(!admin_only.can_manage_inventory(&actor(&pool, "eva")));

    StaffLogic::set_inventory_grant(&mut pool, eva, true).unwrap();
    assert!(admin_only.can_manage_inventory(&actor(&pool, "eva")));
}

#[test]
fn staff_see_and_track_only_assigned_events() {
    let mut pool = mem_pool();
    let eva = add_staff(&mut pool, "eva", Role::Staff);
    add_staff(&mut pool, "mona", Role::Manager);
    let theirs = create_event(&mut pool, "2025-06-01", None, &[], &[eva]);
    let other = create_event(&mut pool, "2025-06-01", None, &[], &[]);
    let policy = AccessPolicy::default();

    let staff = actor(&pool, "eva");
    assert!(policy.can_view_event(&pool.conn, &staff, theirs.id).unwrap());
    assert!(!policy.can_view_event(&pool.conn, &staff, other.id).unwrap());
    assert!(!policy.can_track_time(&pool.conn, &staff, other.id).unwrap());

    let manager = actor(&pool, "mona");
    assert!(policy.can_view_event(&pool.conn, &manager, other.id).unwrap());
}

#[test]
fn unknown_and_inactive_logins_cannot_act() {
    let mut pool = mem_pool();
    let eva = add_staff(&mut pool, "eva", Role::Staff);
    StaffLogic::set_active(&mut pool, eva, false).unwrap();

    let err = Actor::resolve(&pool.conn, "nobody").unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    let err = Actor::resolve(&pool.conn, "eva").unwrap_err();
    assert!(matches!(err, AppError::Policy(_)));
}

#[test]
fn require_turns_denial_into_policy_error() {
    let mut pool = mem_pool();
    add_staff(&mut pool, "eva", Role::Staff);
    let staff = actor(&pool, "eva");

    assert!(require(true, &staff, "anything").is_ok());
    let err = require(false, &staff, "delete events").unwrap_err();
    assert!(matches!(err, AppError::Policy(ref m) if m.contains("delete events")));
}

#[test]
fn duplicate_login_is_a_conflict() {
    let mut pool = mem_pool();
    add_staff(&mut pool, "eva", Role::Staff);
    let err = StaffLogic::add(&mut pool, "eva", None, Role::Manager).unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    let eva = StaffLogic::get_by_login(&pool.conn, "eva").unwrap();
    assert_eq!(eva.role, Role::Staff);
    assert_eq!(StaffLogic::list(&pool.conn).unwrap()[0].login, "admin");
}

#[test]
fn role_change_takes_effect_on_next_resolve() {
    let mut pool = mem_pool();
    let eva = add_staff(&mut pool, "eva", Role::Staff);
    StaffLogic::set_role(&mut pool, eva, Role::Manager).unwrap();
    assert!(actor(&pool, "eva").is_privileged());
}
