//! # Product Resource
//!
//! SQL for the `products` table.
//!
//! Reads join `categories` so every product carries its `category_name`;
//! a product whose category was deleted reads back with both fields null.

use cashier_core::{Product, ProductDraft};

use super::crud::{Resource, SqliteQuery};

macro_rules! product_select {
    () => {
        "SELECT p.id, p.name, p.price, p.stock, p.category_id, c.name AS category_name \
         FROM products p \
         LEFT JOIN categories c ON c.id = p.category_id"
    };
}

impl Resource for Product {
    type Draft = ProductDraft;

    const ENTITY: &'static str = "Product";
    const TABLE: &'static str = "products";

    const SELECT_ALL: &'static str = concat!(product_select!(), " ORDER BY p.id");
    const SELECT_BY_ID: &'static str = concat!(product_select!(), " WHERE p.id = ?");

    const INSERT: &'static str =
        "INSERT INTO products (name, price, stock, category_id) VALUES (?, ?, ?, ?)";

    const UPDATE: &'static str = "UPDATE products \
         SET name = ?, price = ?, stock = ?, category_id = ?, \
             updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now') \
         WHERE id = ?";

    fn bind_draft<'q>(query: SqliteQuery<'q>, draft: &ProductDraft) -> SqliteQuery<'q> {
        query
            .bind(draft.name.trim().to_string())
            .bind(draft.price)
            .bind(draft.stock)
            .bind(draft.category_id)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use cashier_core::{CategoryDraft, ValidationError};

    use crate::error::DbError;
    use crate::pool::{Database, DbConfig};

    use super::*;

    async fn setup() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn draft(name: &str, price: i64, stock: i64, category_id: Option<i64>) -> ProductDraft {
        ProductDraft {
            name: name.to_string(),
            price,
            stock,
            category_id,
        }
    }

    #[tokio::test]
    async fn test_create_and_get_with_category_name() {
        let db = setup().await;
        let category = db
            .categories()
            .create(&CategoryDraft {
                name: "Makanan".to_string(),
                description: "Makanan instan".to_string(),
            })
            .await
            .unwrap();

        let created = db
            .products()
            .create(&draft("  Indomie Godog ", 3500, 10, Some(category.id)))
            .await
            .unwrap();

        assert_eq!(created.name, "Indomie Godog");
        assert_eq!(created.category_name.as_deref(), Some("Makanan"));

        let fetched = db.products().get(created.id).await.unwrap();
        assert_eq!(fetched, created);
        assert_eq!(db.products().count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_draft() {
        let db = setup().await;

        let err = db.products().create(&draft("Vit", 0, 1, None)).await.unwrap_err();
        assert!(matches!(
            err,
            DbError::Validation(ValidationError::MustBePositive { .. })
        ));

        let err = db.products().create(&draft("", 3000, 1, None)).await.unwrap_err();
        assert!(matches!(err, DbError::Validation(ValidationError::Required { .. })));

        assert_eq!(db.products().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_create_with_unknown_category_fails() {
        let db = setup().await;
        let err = db
            .products()
            .create(&draft("Kecap", 12000, 20, Some(99)))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::ForeignKeyViolation { .. }));
    }

    #[tokio::test]
    async fn test_update_replaces_fields() {
        let db = setup().await;
        let created = db.products().create(&draft("Vit", 3000, 40, None)).await.unwrap();

        let updated = db
            .products()
            .update(created.id, &draft("Vit 1000ml", 3200, 35, None))
            .await
            .unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.name, "Vit 1000ml");
        assert_eq!(updated.price, 3200);
        assert_eq!(updated.stock, 35);
    }

    #[tokio::test]
    async fn test_missing_product() {
        let db = setup().await;

        assert!(matches!(db.products().get(42).await, Err(DbError::NotFound { .. })));
        assert!(matches!(
            db.products().update(42, &draft("X", 1, 1, None)).await,
            Err(DbError::NotFound { .. })
        ));
        assert!(matches!(db.products().delete(42).await, Err(DbError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_list_is_ordered_by_id() {
        let db = setup().await;
        for name in ["Indomie Godog", "Vit 1000ml", "Kecap"] {
            db.products().create(&draft(name, 1000, 1, None)).await.unwrap();
        }

        let names: Vec<String> = db
            .products()
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec!["Indomie Godog", "Vit 1000ml", "Kecap"]);
    }
}
