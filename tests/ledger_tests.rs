mod common;
use common::{add_product, create_event, mem_pool};
use gigstock::core::ledger::Ledger;
use gigstock::core::products::{ProductFields, Products};
use gigstock::core::notify::NoopNotifier;
use gigstock::errors::AppError;
use gigstock::models::movement::MovementKind;
use gigstock::models::product::Category;

#[test]
fn on_hand_is_sum_of_ins_minus_outs() {
    let pool = mem_pool();
    let xlr = add_product(&pool, "XLR 10m", Category::Cabling);

    Ledger::record(&pool.conn, xlr, MovementKind::StockIn, 50, None).unwrap();
    Ledger::record(&pool.conn, xlr, MovementKind::StockOut, 8, None).unwrap();
    Ledger::record(&pool.conn, xlr, MovementKind::StockIn, 3, None).unwrap();

    assert_eq!(Ledger::on_hand(&pool.conn, xlr).unwrap(), 45);
}

#[test]
fn product_without_movements_has_zero() {
    let pool = mem_pool();
    let wedge = add_product(&pool, "Wedge 12\"", Category::Monitors);
    assert_eq!(Ledger::on_hand(&pool.conn, wedge).unwrap(), 0);
}

#[test]
fn non_positive_quantity_is_rejected_without_writing() {
    let pool = mem_pool();
    let xlr = add_product(&pool, "XLR 10m", Category::Cabling);

    for qty in [0, -5] {
        let err = Ledger::record(&pool.conn, xlr, MovementKind::StockIn, qty, None).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)), "{err}");
    }
    assert!(Ledger::movements(&pool.conn, Some(xlr)).unwrap().is_empty());
}

#[test]
fn unknown_product_or_event_is_not_found() {
    let pool = mem_pool();
    let xlr = add_product(&pool, "XLR 10m", Category::Cabling);

    let err = Ledger::record(&pool.conn, 999, MovementKind::StockIn, 1, None).unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    let err = Ledger::record(&pool.conn, xlr, MovementKind::StockOut, 1, Some(42)).unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[test]
fn overbooking_goes_negative() {
    let pool = mem_pool();
    let par = add_product(&pool, "PAR 64", Category::Lighting);

    Ledger::record(&pool.conn, par, MovementKind::StockIn, 2, None).unwrap();
    Ledger::record(&pool.conn, par, MovementKind::StockOut, 5, None).unwrap();

    assert_eq!(Ledger::on_hand(&pool.conn, par).unwrap(), -3);
}

#[test]
fn movements_are_listed_newest_first_with_signed_quantities() {
    let pool = mem_pool();
    let xlr = add_product(&pool, "XLR 10m", Category::Cabling);
    let jack = add_product(&pool, "Jack 3m", Category::Cabling);

    Ledger::record(&pool.conn, xlr, MovementKind::StockIn, 10, None).unwrap();
    Ledger::record(&pool.conn, jack, MovementKind::StockIn, 4, None).unwrap();
    Ledger::record(&pool.conn, xlr, MovementKind::StockOut, 2, None).unwrap();

    let xlr_moves = Ledger::movements(&pool.conn, Some(xlr)).unwrap();
    let signed: Vec<i64> = xlr_moves.iter().map(|m| m.signed_quantity()).collect();
    assert_eq!(signed, vec![-2, 10]);

    assert_eq!(Ledger::movements(&pool.conn, None).unwrap().len(), 3);
}

#[test]
fn stock_levels_group_by_category_then_name() {
    let pool = mem_pool();
    let sub = add_product(&pool, "Sub 18", Category::Speakers);
    let xlr = add_product(&pool, "XLR 10m", Category::Cabling);
    let dmx = add_product(&pool, "DMX 5m", Category::Cabling);
    Ledger::record(&pool.conn, sub, MovementKind::StockIn, 4, None).unwrap();

    let levels = Ledger::stock_levels(&pool.conn).unwrap();
    let order: Vec<i64> = levels.iter().map(|l| l.product.id).collect();
    assert_eq!(order, vec![dmx, xlr, sub]);
    assert_eq!(levels[2].on_hand, 4);
}

#[test]
fn manual_movement_can_carry_an_event_tag() {
    let mut pool = mem_pool();
    let xlr = add_product(&pool, "XLR 10m", Category::Cabling);
    let event = create_event(&mut pool, "2025-06-01", Some("18:00"), &[], &[]);

    let m = Ledger::record(&pool.conn, xlr, MovementKind::StockOut, 1, Some(event.id)).unwrap();
    assert_eq!(m.event_id, Some(event.id));
    assert_eq!(Ledger::event_net(&pool.conn, event.id).unwrap(), -1);
}

#[test]
fn products_in_use_cannot_be_deleted() {
    let mut pool = mem_pool();
    let fields = ProductFields {
        name: "Sub 18".into(),
        unit: "ks".into(),
        category: Category::Speakers,
    };
    let used = Products::create(&mut pool, &NoopNotifier, &fields).unwrap();
    let unused = Products::create(&mut pool, &NoopNotifier, &fields).unwrap();
    Ledger::record(&pool.conn, used.id, MovementKind::StockIn, 2, None).unwrap();

    let err = Products::delete(&mut pool, &NoopNotifier, used.id).unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    Products::delete(&mut pool, &NoopNotifier, unused.id).unwrap();
    assert_eq!(Products::list(&pool.conn).unwrap().len(), 1);
}

#[test]
fn product_name_must_not_be_blank() {
    let mut pool = mem_pool();
    let fields = ProductFields {
        name: "   ".into(),
        unit: "ks".into(),
        category: Category::Tools,
    };
    let err = Products::create(&mut pool, &NoopNotifier, &fields).unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
}
