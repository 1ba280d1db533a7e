//! Module-level CRUD operations bound to the default connection.
//!
//! These are thin forwards to the [`Db`](crate::Db) instance installed
//! with [`init`](crate::init), convenient where threading a handle
//! through every call site is not worth it:
//!
//! ```ignore
//! crudx_sqlx::init(Db::connect("postgres://localhost/app").await?);
//!
//! let user: User = crud::select_by_id::<User, _>(42).await?;
//! let admins = crud::select_list::<User>("id DESC", "role = $1", &args!["admin"]).await?;
//! ```
//!
//! Every function fails with `DataError::NotInitialized` until `init` has
//! been called.

use crudx::{Entity, Page, Pageable, Value};

use crate::db::default_db;
use crate::error::DataResult;
use crate::exec::SqlxEntity;

pub async fn select_by_id<T, V>(id: V) -> DataResult<T>
where
    T: SqlxEntity,
    V: Into<Value>,
{
    default_db()?.select_by_id::<T, V>(id).await
}

pub async fn select_by_ids<T, I>(ids: &[I]) -> DataResult<Vec<T>>
where
    T: SqlxEntity,
    I: Into<Value> + Clone,
{
    default_db()?.select_by_ids::<T, I>(ids).await
}

pub async fn select_one<T: SqlxEntity>(filter: &str, args: &[Value]) -> DataResult<T> {
    default_db()?.select_one::<T>(filter, args).await
}

pub async fn select_list<T: SqlxEntity>(
    order: &str,
    filter: &str,
    args: &[Value],
) -> DataResult<Vec<T>> {
    default_db()?.select_list::<T>(order, filter, args).await
}

pub async fn select_page<T: SqlxEntity>(
    pageable: &Pageable,
    order: &str,
    filter: &str,
    args: &[Value],
) -> DataResult<Page<T>> {
    default_db()?
        .select_page::<T>(pageable, order, filter, args)
        .await
}

pub async fn count<T: Entity>(filter: &str, args: &[Value]) -> DataResult<u64> {
    default_db()?.count::<T>(filter, args).await
}

pub async fn exist<T: Entity>(filter: &str, args: &[Value]) -> DataResult<bool> {
    default_db()?.exist::<T>(filter, args).await
}

pub async fn insert<T: Entity>(entity: &mut T) -> DataResult<u64> {
    default_db()?.insert(entity).await
}

pub async fn insert_batches<T: Entity>(entities: &[T]) -> DataResult<u64> {
    default_db()?.insert_batches(entities).await
}

pub async fn update<T: Entity>(entity: &T) -> DataResult<u64> {
    default_db()?.update(entity).await
}

pub async fn update_batches<T: Entity>(entities: &[T]) -> DataResult<u64> {
    default_db()?.update_batches(entities).await
}

pub async fn updates<T: Entity>(entity: &T, filter: &str, args: &[Value]) -> DataResult<u64> {
    default_db()?.updates(entity, filter, args).await
}

pub async fn updates_map<T: Entity>(
    fields: &[(&str, Value)],
    filter: &str,
    args: &[Value],
) -> DataResult<u64> {
    default_db()?.updates_map::<T>(fields, filter, args).await
}

pub async fn delete_by_id<T, V>(id: V) -> DataResult<u64>
where
    T: Entity,
    V: Into<Value>,
{
    default_db()?.delete_by_id::<T, V>(id).await
}

pub async fn delete_by_ids<T, I>(ids: &[I]) -> DataResult<u64>
where
    T: Entity,
    I: Into<Value> + Clone,
{
    default_db()?.delete_by_ids::<T, I>(ids).await
}

pub async fn delete<T: Entity>(filter: &str, args: &[Value]) -> DataResult<u64> {
    default_db()?.delete::<T>(filter, args).await
}

pub async fn select_convert_by_id<T, R, V>(id: V) -> DataResult<R>
where
    T: SqlxEntity,
    R: 'static,
    V: Into<Value>,
{
    default_db()?.select_convert_by_id::<T, R, V>(id).await
}

pub async fn select_convert_by_ids<T, R, I>(ids: &[I]) -> DataResult<Vec<R>>
where
    T: SqlxEntity,
    R: 'static,
    I: Into<Value> + Clone,
{
    default_db()?.select_convert_by_ids::<T, R, I>(ids).await
}

pub async fn select_one_convert<T, R>(filter: &str, args: &[Value]) -> DataResult<R>
where
    T: SqlxEntity,
    R: 'static,
{
    default_db()?.select_one_convert::<T, R>(filter, args).await
}

pub async fn select_list_convert<T, R>(
    order: &str,
    filter: &str,
    args: &[Value],
) -> DataResult<Vec<R>>
where
    T: SqlxEntity,
    R: 'static,
{
    default_db()?
        .select_list_convert::<T, R>(order, filter, args)
        .await
}

pub async fn select_page_convert<T, R>(
    pageable: &Pageable,
    order: &str,
    filter: &str,
    args: &[Value],
) -> DataResult<Page<R>>
where
    T: SqlxEntity,
    R: 'static,
{
    default_db()?
        .select_page_convert::<T, R>(pageable, order, filter, args)
        .await
}
