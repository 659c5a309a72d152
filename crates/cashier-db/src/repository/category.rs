//! # Category Resource
//!
//! SQL for the `categories` table. Deleting a category detaches its
//! products (`ON DELETE SET NULL`); it never deletes them.

use cashier_core::{Category, CategoryDraft};

use super::crud::{Resource, SqliteQuery};

impl Resource for Category {
    type Draft = CategoryDraft;

    const ENTITY: &'static str = "Category";
    const TABLE: &'static str = "categories";

    const SELECT_ALL: &'static str =
        "SELECT id, name, description FROM categories ORDER BY id";
    const SELECT_BY_ID: &'static str =
        "SELECT id, name, description FROM categories WHERE id = ?";

    const INSERT: &'static str = "INSERT INTO categories (name, description) VALUES (?, ?)";

    const UPDATE: &'static str = "UPDATE categories \
         SET name = ?, description = ?, \
             updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now') \
         WHERE id = ?";

    fn bind_draft<'q>(query: SqliteQuery<'q>, draft: &CategoryDraft) -> SqliteQuery<'q> {
        query
            .bind(draft.name.trim().to_string())
            .bind(draft.description.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use cashier_core::ProductDraft;

    use crate::error::DbError;
    use crate::pool::{Database, DbConfig};

    use super::*;

    #[tokio::test]
    async fn test_category_crud() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.categories();

        let created = repo
            .create(&CategoryDraft {
                name: "Minuman".to_string(),
                description: String::new(),
            })
            .await
            .unwrap();
        assert_eq!(created.name, "Minuman");
        assert_eq!(created.description, "");

        let updated = repo
            .update(
                created.id,
                &CategoryDraft {
                    name: "Minuman".to_string(),
                    description: "Air mineral dan teh".to_string(),
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.description, "Air mineral dan teh");

        assert_eq!(repo.list().await.unwrap(), vec![updated]);

        repo.delete(created.id).await.unwrap();
        assert!(matches!(repo.get(created.id).await, Err(DbError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_delete_category_detaches_products() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let category = db
            .categories()
            .create(&CategoryDraft {
                name: "Bumbu".to_string(),
                description: String::new(),
            })
            .await
            .unwrap();

        let product = db
            .products()
            .create(&ProductDraft {
                name: "Kecap".to_string(),
                price: 12000,
                stock: 20,
                category_id: Some(category.id),
            })
            .await
            .unwrap();

        db.categories().delete(category.id).await.unwrap();

        let product = db.products().get(product.id).await.unwrap();
        assert_eq!(product.category_id, None);
        assert_eq!(product.category_name, None);
    }
}
