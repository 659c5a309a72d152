//! # Repository Module
//!
//! Catalogue repositories for the cashier database.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    One Repository, Many Resources                       │
//! │                                                                         │
//! │  HTTP handler                                                          │
//! │       │                                                                 │
//! │       │  db.products().create(&draft)                                  │
//! │       ▼                                                                 │
//! │  Repository<R: Resource>                                               │
//! │  ├── list()                                                            │
//! │  ├── get(id)                                                           │
//! │  ├── create(&draft)    validate → INSERT → re-read                     │
//! │  ├── update(id, &draft) validate → UPDATE → re-read                    │
//! │  ├── delete(id)                                                        │
//! │  └── count()                                                           │
//! │       │                                                                 │
//! │       │  SQL comes from R's constants                                  │
//! │       ▼                                                                 │
//! │  impl Resource for Product   (product.rs)                              │
//! │  impl Resource for Category  (category.rs)                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The sales ledger is not here: it is only written through a checkout
//! scope, see [`crate::store`].

pub mod category;
pub mod crud;
pub mod product;

pub use crud::{Repository, Resource};

use cashier_core::{Category, Product};

/// Repository for products (with category name joined in).
pub type ProductRepository = Repository<Product>;

/// Repository for categories.
pub type CategoryRepository = Repository<Category>;
