//! Cart store tests

#[path = "../common/mod.rs"]
mod common;

use common::*;

#[test]
fn test_empty_cart_for_unknown_user() {
    let conn = setup_test_db();
    assert!(queries::get_cart(&conn, "42").unwrap().is_empty());
}

#[test]
fn test_add_accumulates_quantity() {
    let mut conn = setup_test_db();
    create_book(&conn);

    for _ in 0..3 {
        add_to_cart(&mut conn, "42", "BOOK1", 1);
    }
    let items = add_to_cart(&mut conn, "42", "BOOK1", 2);

    assert_eq!(items.get("BOOK1"), Some(&5));
    assert_eq!(queries::get_cart(&conn, "42").unwrap().get("BOOK1"), Some(&5));
}

#[test]
fn test_add_zero_quantity_rejected() {
    let mut conn = setup_test_db();
    let result = queries::add_to_cart(&mut conn, "42", "BOOK1", 0);
    assert!(matches!(result, Err(AppError::Validation(_))));
    assert!(queries::get_cart(&conn, "42").unwrap().is_empty());
}

#[test]
fn test_carts_are_per_user() {
    let mut conn = setup_test_db();
    add_to_cart(&mut conn, "42", "BOOK1", 1);
    add_to_cart(&mut conn, "43", "BOOK1", 4);

    assert_eq!(queries::get_cart(&conn, "42").unwrap().get("BOOK1"), Some(&1));
    assert_eq!(queries::get_cart(&conn, "43").unwrap().get("BOOK1"), Some(&4));
}

#[test]
fn test_save_replaces_and_drops_zero_quantities() {
    let conn = setup_test_db();
    let items = CartItems::from([("A".to_string(), 2), ("B".to_string(), 0)]);

    queries::save_cart(&conn, "42", &items).unwrap();

    let stored = queries::get_cart(&conn, "42").unwrap();
    assert_eq!(stored, CartItems::from([("A".to_string(), 2)]));
}

#[test]
fn test_save_empty_cart_deletes_row() {
    let conn = setup_test_db();
    queries::save_cart(&conn, "42", &CartItems::from([("A".to_string(), 1)])).unwrap();
    queries::save_cart(&conn, "42", &CartItems::new()).unwrap();

    let rows: i64 = conn
        .query_row("SELECT COUNT(*) FROM carts WHERE user_id = '42'", [], |r| r.get(0))
        .unwrap();
    assert_eq!(rows, 0);
}

#[test]
fn test_zero_quantities_filtered_on_read() {
    let conn = setup_test_db();
    conn.execute(
        "INSERT INTO carts (user_id, items_json) VALUES ('42', '{\"A\": 0, \"B\": 3}')",
        [],
    )
    .unwrap();

    let stored = queries::get_cart(&conn, "42").unwrap();
    assert_eq!(stored, CartItems::from([("B".to_string(), 3)]));
}

#[test]
fn test_clear_cart() {
    let mut conn = setup_test_db();
    add_to_cart(&mut conn, "42", "BOOK1", 2);

    queries::clear_cart(&conn, "42").unwrap();
    assert!(queries::get_cart(&conn, "42").unwrap().is_empty());

    // Clearing again is harmless
    queries::clear_cart(&conn, "42").unwrap();
}

#[test]
fn test_unreadable_stored_cart_is_internal_error() {
    let conn = setup_test_db();
    conn.execute(
        "INSERT INTO carts (user_id, items_json) VALUES ('42', 'not json')",
        [],
    )
    .unwrap();

    let result = queries::get_cart(&conn, "42");
    assert!(matches!(result, Err(AppError::Internal(_))));
}
