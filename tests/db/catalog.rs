//! Catalog store tests

#[path = "../common/mod.rs"]
mod common;

use common::*;
use vitrine::seed;

#[test]
fn test_upsert_and_get_product() {
    let conn = setup_test_db();
    let created = create_test_product(&conn, "BOOK1", "Livro", 1000);

    let fetched = queries::get_product(&conn, "BOOK1")
        .expect("Query failed")
        .expect("Product not found");

    assert_eq!(fetched, created, "fetched product should match what was saved");
    assert_eq!(fetched.category, "geral");
    assert_eq!(fetched.delivery_url, None);
}

#[test]
fn test_get_unknown_product_is_none() {
    let conn = setup_test_db();
    assert!(queries::get_product(&conn, "NOPE").unwrap().is_none());
}

#[test]
fn test_upsert_replaces_every_field() {
    let conn = setup_test_db();
    create_test_product(&conn, "BOOK1", "Livro", 1000);

    let replacement = Product {
        sku: "BOOK1".into(),
        name: "Livro (2ª edição)".into(),
        price_cents: 1500,
        description: "Revisado".into(),
        category: "livros".into(),
        delivery_url: Some("https://cdn.example/livro.pdf".into()),
    };
    queries::upsert_product(&conn, &replacement).unwrap();

    let fetched = queries::get_product(&conn, "BOOK1").unwrap().unwrap();
    assert_eq!(fetched, replacement);
    assert_eq!(queries::count_products(&conn).unwrap(), 1, "upsert must not duplicate");
}

#[test]
fn test_upsert_rejects_blank_sku() {
    let conn = setup_test_db();
    let product = Product {
        sku: "   ".into(),
        name: "Sem SKU".into(),
        price_cents: 100,
        description: String::new(),
        category: DEFAULT_CATEGORY.into(),
        delivery_url: None,
    };

    let result = queries::upsert_product(&conn, &product);
    assert!(matches!(result, Err(AppError::Validation(_))));
    assert_eq!(queries::count_products(&conn).unwrap(), 0);
}

#[test]
fn test_list_products_ordered_by_name() {
    let conn = setup_test_db();
    create_test_product(&conn, "C", "Curso", 3000);
    create_test_product(&conn, "A", "Apostila", 1000);
    create_test_product(&conn, "B", "Bônus", 500);

    let names: Vec<_> = queries::list_products(&conn)
        .unwrap()
        .into_iter()
        .map(|p| p.name)
        .collect();
    assert_eq!(names, ["Apostila", "Bônus", "Curso"]);
}

#[test]
fn test_set_delivery_url() {
    let conn = setup_test_db();
    create_book(&conn);

    let updated = queries::set_delivery_url(&conn, "BOOK1", "https://cdn.example/b.pdf").unwrap();
    assert_eq!(updated.delivery_url.as_deref(), Some("https://cdn.example/b.pdf"));
    assert_eq!(updated.price_cents, 1000, "other fields must be untouched");

    let fetched = queries::get_product(&conn, "BOOK1").unwrap().unwrap();
    assert_eq!(fetched.delivery_url.as_deref(), Some("https://cdn.example/b.pdf"));
}

#[test]
fn test_set_delivery_url_unknown_sku_is_not_found() {
    let conn = setup_test_db();
    let result = queries::set_delivery_url(&conn, "GHOST", "https://x");
    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[test]
fn test_seed_only_when_catalog_empty() {
    let conn = setup_test_db();

    assert!(seed::seed_catalog(&conn, "https://cdn.example/8ball.pdf").unwrap());
    let featured = queries::get_product(&conn, seed::FEATURED_SKU).unwrap().unwrap();
    assert_eq!(featured.name, "8 Ball Pool – Guia Pro (PDF)");
    assert_eq!(featured.price_cents, 2990);
    assert_eq!(featured.category, "jogos");
    assert_eq!(featured.delivery_url.as_deref(), Some("https://cdn.example/8ball.pdf"));

    assert!(!seed::seed_catalog(&conn, "https://other").unwrap());
    assert_eq!(queries::count_products(&conn).unwrap(), 1);
}

#[test]
fn test_seed_skipped_when_products_exist() {
    let conn = setup_test_db();
    create_book(&conn);

    assert!(!seed::seed_catalog(&conn, "https://cdn.example/8ball.pdf").unwrap());
    assert!(queries::get_product(&conn, seed::FEATURED_SKU).unwrap().is_none());
}
