//! # crudx-sqlx — SQLx backend for the crudx data layer
//!
//! This crate provides the [SQLx](https://github.com/launchbadge/sqlx)-specific
//! half of crudx: a connection context over the runtime-polymorphic `Any`
//! driver, a transaction wrapper, and the generic CRUD operation set. It
//! depends on [`crudx`] for the abstract pieces: the `Entity` trait, the
//! `Convert` capability, pagination, and SQL assembly.
//!
//! # What's in this crate
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Db`] | Connection context: an `sqlx::AnyPool` plus the SQL dialect it speaks |
//! | [`Tx`] | Transaction wrapper exposing the same operations as `Db` |
//! | [`init`] / [`default_db`] | Process-wide default instance used by the [`crud`] module |
//! | [`crud`] | Module-level operations bound to the default instance |
//! | [`SqlxEntity`] | `Entity` + `FromRow<AnyRow>`, blanket-implemented |
//! | [`AnyErrorExt`] | Extension trait to convert `sqlx::Error` → `DataError` |
//! | [`DataResult<T>`] | Type alias for `Result<T, DataError>` |
//!
//! # Quick start
//!
//! ```ignore
//! use crudx::prelude::*;
//! use crudx_sqlx::{crud, Db};
//!
//! #[derive(Debug, sqlx::FromRow)]
//! struct User {
//!     id: i64,
//!     name: String,
//! }
//!
//! impl Entity for User {
//!     fn table_name() -> &'static str { "users" }
//!     fn columns() -> &'static [&'static str] { &["id", "name"] }
//!     fn values(&self) -> Vec<Value> {
//!         vec![self.id.into(), self.name.as_str().into()]
//!     }
//!     fn assign_generated_id(&mut self, id: i64) { self.id = id; }
//! }
//!
//! crudx_sqlx::init(Db::connect("sqlite://app.db").await?);
//!
//! let mut user = User { id: 0, name: "alice".into() };
//! crud::insert(&mut user).await?;
//! let found: User = crud::select_by_id::<User, _>(user.id).await?;
//! ```
//!
//! # Transactions
//!
//! [`Db::begin`] returns a [`Tx`] with the identical operation set; the
//! work commits on [`Tx::commit`] and rolls back when the `Tx` is dropped
//! without one:
//!
//! ```ignore
//! let mut tx = db.begin().await?;
//! tx.insert(&mut user).await?;
//! tx.updates_map::<User>(&[("name", "bob".into())], "id = ?", &args![user.id]).await?;
//! tx.commit().await?;
//! ```
//!
//! # Error bridging
//!
//! Due to Rust's orphan rules, `From<sqlx::Error> for DataError` can't be
//! implemented here. Raw SQLx calls alongside this crate can use the
//! [`AnyErrorExt`] trait:
//!
//! ```ignore
//! use crudx_sqlx::AnyErrorExt;
//!
//! sqlx::query("VACUUM")
//!     .execute(db.pool())
//!     .await
//!     .map_err(|e| e.into_data_error())?;
//! ```

pub mod crud;
pub mod db;
pub mod error;
mod exec;
pub mod tx;

pub use db::{default_db, init, Db};
pub use error::{AnyErrorExt, DataResult};
pub use exec::SqlxEntity;
pub use tx::Tx;

/// Re-exports of the most commonly used types from both `crudx` and this
/// crate.
pub mod prelude {
    pub use crate::{AnyErrorExt, Db, SqlxEntity, Tx};
    pub use crudx::prelude::*;
}
