//! Connection context and the process-wide default instance.

use std::sync::{Once, RwLock};

use crudx::{DataError, Dialect, Entity, Page, Pageable, Value};
use sqlx::any::AnyPoolOptions;
use sqlx::pool::PoolConnection;
use sqlx::{Any, AnyPool};

use crate::error::{AnyErrorExt, DataResult};
use crate::exec::{self, SqlxEntity};
use crate::tx::Tx;

/// A database handle: a shared `AnyPool` plus the dialect its SQL is
/// written in.
///
/// `Db` is cheap to clone (the pool is reference-counted) and safe to use
/// from concurrent callers; synchronization is the pool's concern and
/// this layer adds no locking of its own.
#[derive(Clone)]
pub struct Db {
    pool: AnyPool,
    dialect: Dialect,
}

static DEFAULT: RwLock<Option<Db>> = RwLock::new(None);

/// Installs `db` as the process-wide default connection used by the
/// module-level operations in [`crud`](crate::crud).
///
/// Call once at startup. Calling again replaces the instance, which is
/// how tests swap in their own database.
pub fn init(db: Db) {
    let mut slot = DEFAULT.write().unwrap_or_else(|err| err.into_inner());
    *slot = Some(db);
}

/// The default connection installed by [`init`].
pub fn default_db() -> DataResult<Db> {
    DEFAULT
        .read()
        .unwrap_or_else(|err| err.into_inner())
        .clone()
        .ok_or(DataError::NotInitialized)
}

static INSTALL_DRIVERS: Once = Once::new();

impl Db {
    /// Connects a pool to `url` and infers the dialect from the URL
    /// scheme.
    pub async fn connect(url: &str) -> DataResult<Self> {
        Self::connect_with(AnyPoolOptions::new(), url).await
    }

    /// Like [`Db::connect`], with explicit pool options.
    pub async fn connect_with(options: AnyPoolOptions, url: &str) -> DataResult<Self> {
        INSTALL_DRIVERS.call_once(sqlx::any::install_default_drivers);
        let pool = options
            .connect(url)
            .await
            .map_err(AnyErrorExt::into_data_error)?;
        let db = Self::new(pool, Dialect::from_url(url));
        tracing::debug!(dialect = ?db.dialect, "database pool connected");
        Ok(db)
    }

    /// Wraps an externally built pool.
    pub fn new(pool: AnyPool, dialect: Dialect) -> Self {
        Self { pool, dialect }
    }

    /// The underlying pool.
    pub fn pool(&self) -> &AnyPool {
        &self.pool
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Begins a transaction scoping a unit of work. The returned [`Tx`]
    /// exposes the same operations as `Db`; dropping it without a commit
    /// rolls the work back.
    pub async fn begin(&self) -> DataResult<Tx<'static>> {
        let tx = self
            .pool
            .begin()
            .await
            .map_err(AnyErrorExt::into_data_error)?;
        Ok(Tx::new(tx, self.dialect))
    }

    async fn acquire(&self) -> DataResult<PoolConnection<Any>> {
        self.pool
            .acquire()
            .await
            .map_err(AnyErrorExt::into_data_error)
    }

    /// Single entity by id; the last matching row wins on duplicates.
    pub async fn select_by_id<T, V>(&self, id: V) -> DataResult<T>
    where
        T: SqlxEntity,
        V: Into<Value>,
    {
        let mut conn = self.acquire().await?;
        exec::select_by_id(&mut conn, self.dialect, id.into()).await
    }

    /// All entities whose id is in `ids`; an empty result is not an error.
    pub async fn select_by_ids<T, I>(&self, ids: &[I]) -> DataResult<Vec<T>>
    where
        T: SqlxEntity,
        I: Into<Value> + Clone,
    {
        let mut conn = self.acquire().await?;
        exec::select_by_ids(&mut conn, self.dialect, to_values(ids)).await
    }

    /// Last entity matching the filter.
    pub async fn select_one<T: SqlxEntity>(&self, filter: &str, args: &[Value]) -> DataResult<T> {
        let mut conn = self.acquire().await?;
        exec::select_one(&mut conn, self.dialect, filter, args).await
    }

    /// All entities matching the filter, sorted by `order` (empty order
    /// means store-natural).
    pub async fn select_list<T: SqlxEntity>(
        &self,
        order: &str,
        filter: &str,
        args: &[Value],
    ) -> DataResult<Vec<T>> {
        let mut conn = self.acquire().await?;
        exec::select_list(&mut conn, self.dialect, order, filter, args).await
    }

    /// One page of matching entities plus the total over the full
    /// matching set.
    pub async fn select_page<T: SqlxEntity>(
        &self,
        pageable: &Pageable,
        order: &str,
        filter: &str,
        args: &[Value],
    ) -> DataResult<Page<T>> {
        let mut conn = self.acquire().await?;
        exec::select_page(&mut conn, self.dialect, pageable, order, filter, args).await
    }

    pub async fn count<T: Entity>(&self, filter: &str, args: &[Value]) -> DataResult<u64> {
        let mut conn = self.acquire().await?;
        exec::count::<T>(&mut conn, self.dialect, filter, args).await
    }

    pub async fn exist<T: Entity>(&self, filter: &str, args: &[Value]) -> DataResult<bool> {
        let mut conn = self.acquire().await?;
        exec::exist::<T>(&mut conn, self.dialect, filter, args).await
    }

    /// Persists a new row. A store-generated integer key is written back
    /// through `Entity::assign_generated_id`.
    pub async fn insert<T: Entity>(&self, entity: &mut T) -> DataResult<u64> {
        let mut conn = self.acquire().await?;
        exec::insert(&mut conn, self.dialect, entity).await
    }

    /// Persists new rows with a single multi-row statement.
    pub async fn insert_batches<T: Entity>(&self, entities: &[T]) -> DataResult<u64> {
        let mut conn = self.acquire().await?;
        exec::insert_batches(&mut conn, self.dialect, entities).await
    }

    /// Full-row save by primary key; insert-if-absent is the store's
    /// decision.
    pub async fn update<T: Entity>(&self, entity: &T) -> DataResult<u64> {
        let mut conn = self.acquire().await?;
        exec::update(&mut conn, self.dialect, entity).await
    }

    pub async fn update_batches<T: Entity>(&self, entities: &[T]) -> DataResult<u64> {
        let mut conn = self.acquire().await?;
        exec::update_batches(&mut conn, self.dialect, entities).await
    }

    /// Partial update applying only the non-zero-valued fields of
    /// `entity` to the rows matching the filter.
    pub async fn updates<T: Entity>(
        &self,
        entity: &T,
        filter: &str,
        args: &[Value],
    ) -> DataResult<u64> {
        let mut conn = self.acquire().await?;
        exec::updates(&mut conn, self.dialect, entity, filter, args).await
    }

    /// Partial update from explicit `(column, value)` pairs, applied
    /// even when a value is zero.
    pub async fn updates_map<T: Entity>(
        &self,
        fields: &[(&str, Value)],
        filter: &str,
        args: &[Value],
    ) -> DataResult<u64> {
        let mut conn = self.acquire().await?;
        exec::updates_map::<T>(&mut conn, self.dialect, fields, filter, args).await
    }

    pub async fn delete_by_id<T, V>(&self, id: V) -> DataResult<u64>
    where
        T: Entity,
        V: Into<Value>,
    {
        let mut conn = self.acquire().await?;
        exec::delete_by_id::<T>(&mut conn, self.dialect, id.into()).await
    }

    pub async fn delete_by_ids<T, I>(&self, ids: &[I]) -> DataResult<u64>
    where
        T: Entity,
        I: Into<Value> + Clone,
    {
        let mut conn = self.acquire().await?;
        exec::delete_by_ids::<T>(&mut conn, self.dialect, to_values(ids)).await
    }

    pub async fn delete<T: Entity>(&self, filter: &str, args: &[Value]) -> DataResult<u64> {
        let mut conn = self.acquire().await?;
        exec::delete::<T>(&mut conn, self.dialect, filter, args).await
    }

    /// [`Db::select_by_id`] followed by the entity's conversion
    /// capability.
    pub async fn select_convert_by_id<T, R, V>(&self, id: V) -> DataResult<R>
    where
        T: SqlxEntity,
        R: 'static,
        V: Into<Value>,
    {
        let mut conn = self.acquire().await?;
        exec::select_convert_by_id::<T, R>(&mut conn, self.dialect, id.into()).await
    }

    pub async fn select_convert_by_ids<T, R, I>(&self, ids: &[I]) -> DataResult<Vec<R>>
    where
        T: SqlxEntity,
        R: 'static,
        I: Into<Value> + Clone,
    {
        let mut conn = self.acquire().await?;
        exec::select_convert_by_ids::<T, R>(&mut conn, self.dialect, to_values(ids)).await
    }

    pub async fn select_one_convert<T, R>(&self, filter: &str, args: &[Value]) -> DataResult<R>
    where
        T: SqlxEntity,
        R: 'static,
    {
        let mut conn = self.acquire().await?;
        exec::select_one_convert::<T, R>(&mut conn, self.dialect, filter, args).await
    }

    pub async fn select_list_convert<T, R>(
        &self,
        order: &str,
        filter: &str,
        args: &[Value],
    ) -> DataResult<Vec<R>>
    where
        T: SqlxEntity,
        R: 'static,
    {
        let mut conn = self.acquire().await?;
        exec::select_list_convert::<T, R>(&mut conn, self.dialect, order, filter, args).await
    }

    pub async fn select_page_convert<T, R>(
        &self,
        pageable: &Pageable,
        order: &str,
        filter: &str,
        args: &[Value],
    ) -> DataResult<Page<R>>
    where
        T: SqlxEntity,
        R: 'static,
    {
        let mut conn = self.acquire().await?;
        exec::select_page_convert::<T, R>(&mut conn, self.dialect, pageable, order, filter, args)
            .await
    }
}

pub(crate) fn to_values<I: Into<Value> + Clone>(ids: &[I]) -> Vec<Value> {
    ids.iter().cloned().map(Into::into).collect()
}
