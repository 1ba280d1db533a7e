//! Transaction wrapper exposing the full operation set.
//!
//! For every operation, the [`Tx`] method is semantically identical to
//! its [`Db`](crate::Db) counterpart; the only difference is the
//! connection the statement runs on. A `Tx` is assumed to be owned by one
//! caller for the duration of the unit of work; nothing here enforces
//! that.

use std::ops::{Deref, DerefMut};

use crudx::{Dialect, Entity, Page, Pageable, Value};
use sqlx::AnyConnection;
use sqlx::{Any, Transaction};

use crate::db::to_values;
use crate::error::{AnyErrorExt, DataResult};
use crate::exec::{self, SqlxEntity};

/// A database transaction, obtained from [`Db::begin`](crate::Db::begin).
///
/// Dropping a `Tx` without calling [`Tx::commit`] rolls the transaction
/// back.
pub struct Tx<'a> {
    tx: Transaction<'a, Any>,
    dialect: Dialect,
}

impl<'a> Deref for Tx<'a> {
    type Target = Transaction<'a, Any>;

    fn deref(&self) -> &Self::Target {
        &self.tx
    }
}

impl<'a> DerefMut for Tx<'a> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.tx
    }
}

impl<'a> Tx<'a> {
    pub(crate) fn new(tx: Transaction<'a, Any>, dialect: Dialect) -> Self {
        Self { tx, dialect }
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Unwraps into the inner SQLx transaction.
    pub fn into_inner(self) -> Transaction<'a, Any> {
        self.tx
    }

    /// Returns a mutable reference to the underlying connection, for raw
    /// SQLx statements inside the same unit of work.
    pub fn as_mut(&mut self) -> &mut AnyConnection {
        &mut *self.tx
    }

    pub async fn commit(self) -> DataResult<()> {
        self.tx.commit().await.map_err(AnyErrorExt::into_data_error)
    }

    pub async fn rollback(self) -> DataResult<()> {
        self.tx
            .rollback()
            .await
            .map_err(AnyErrorExt::into_data_error)
    }

    pub async fn select_by_id<T, V>(&mut self, id: V) -> DataResult<T>
    where
        T: SqlxEntity,
        V: Into<Value>,
    {
        let dialect = self.dialect;
        exec::select_by_id(self.as_mut(), dialect, id.into()).await
    }

    pub async fn select_by_ids<T, I>(&mut self, ids: &[I]) -> DataResult<Vec<T>>
    where
        T: SqlxEntity,
        I: Into<Value> + Clone,
    {
        let dialect = self.dialect;
        exec::select_by_ids(self.as_mut(), dialect, to_values(ids)).await
    }

    pub async fn select_one<T: SqlxEntity>(
        &mut self,
        filter: &str,
        args: &[Value],
    ) -> DataResult<T> {
        let dialect = self.dialect;
        exec::select_one(self.as_mut(), dialect, filter, args).await
    }

    pub async fn select_list<T: SqlxEntity>(
        &mut self,
        order: &str,
        filter: &str,
        args: &[Value],
    ) -> DataResult<Vec<T>> {
        let dialect = self.dialect;
        exec::select_list(self.as_mut(), dialect, order, filter, args).await
    }

    pub async fn select_page<T: SqlxEntity>(
        &mut self,
        pageable: &Pageable,
        order: &str,
        filter: &str,
        args: &[Value],
    ) -> DataResult<Page<T>> {
        let dialect = self.dialect;
        exec::select_page(self.as_mut(), dialect, pageable, order, filter, args).await
    }

    pub async fn count<T: Entity>(&mut self, filter: &str, args: &[Value]) -> DataResult<u64> {
        let dialect = self.dialect;
        exec::count::<T>(self.as_mut(), dialect, filter, args).await
    }

    pub async fn exist<T: Entity>(&mut self, filter: &str, args: &[Value]) -> DataResult<bool> {
        let dialect = self.dialect;
        exec::exist::<T>(self.as_mut(), dialect, filter, args).await
    }

    pub async fn insert<T: Entity>(&mut self, entity: &mut T) -> DataResult<u64> {
        let dialect = self.dialect;
        exec::insert(self.as_mut(), dialect, entity).await
    }

    pub async fn insert_batches<T: Entity>(&mut self, entities: &[T]) -> DataResult<u64> {
        let dialect = self.dialect;
        exec::insert_batches(self.as_mut(), dialect, entities).await
    }

    pub async fn update<T: Entity>(&mut self, entity: &T) -> DataResult<u64> {
        let dialect = self.dialect;
        exec::update(self.as_mut(), dialect, entity).await
    }

    pub async fn update_batches<T: Entity>(&mut self, entities: &[T]) -> DataResult<u64> {
        let dialect = self.dialect;
        exec::update_batches(self.as_mut(), dialect, entities).await
    }

    pub async fn updates<T: Entity>(
        &mut self,
        entity: &T,
        filter: &str,
        args: &[Value],
    ) -> DataResult<u64> {
        let dialect = self.dialect;
        exec::updates(self.as_mut(), dialect, entity, filter, args).await
    }

    pub async fn updates_map<T: Entity>(
        &mut self,
        fields: &[(&str, Value)],
        filter: &str,
        args: &[Value],
    ) -> DataResult<u64> {
        let dialect = self.dialect;
        exec::updates_map::<T>(self.as_mut(), dialect, fields, filter, args).await
    }

    pub async fn delete_by_id<T, V>(&mut self, id: V) -> DataResult<u64>
    where
        T: Entity,
        V: Into<Value>,
    {
        let dialect = self.dialect;
        exec::delete_by_id::<T>(self.as_mut(), dialect, id.into()).await
    }

    pub async fn delete_by_ids<T, I>(&mut self, ids: &[I]) -> DataResult<u64>
    where
        T: Entity,
        I: Into<Value> + Clone,
    {
        let dialect = self.dialect;
        exec::delete_by_ids::<T>(self.as_mut(), dialect, to_values(ids)).await
    }

    pub async fn delete<T: Entity>(&mut self, filter: &str, args: &[Value]) -> DataResult<u64> {
        let dialect = self.dialect;
        exec::delete::<T>(self.as_mut(), dialect, filter, args).await
    }

    pub async fn select_convert_by_id<T, R, V>(&mut self, id: V) -> DataResult<R>
    where
        T: SqlxEntity,
        R: 'static,
        V: Into<Value>,
    {
        let dialect = self.dialect;
        exec::select_convert_by_id::<T, R>(self.as_mut(), dialect, id.into()).await
    }

    pub async fn select_convert_by_ids<T, R, I>(&mut self, ids: &[I]) -> DataResult<Vec<R>>
    where
        T: SqlxEntity,
        R: 'static,
        I: Into<Value> + Clone,
    {
        let dialect = self.dialect;
        exec::select_convert_by_ids::<T, R>(self.as_mut(), dialect, to_values(ids)).await
    }

    pub async fn select_one_convert<T, R>(&mut self, filter: &str, args: &[Value]) -> DataResult<R>
    where
        T: SqlxEntity,
        R: 'static,
    {
        let dialect = self.dialect;
        exec::select_one_convert::<T, R>(self.as_mut(), dialect, filter, args).await
    }

    pub async fn select_list_convert<T, R>(
        &mut self,
        order: &str,
        filter: &str,
        args: &[Value],
    ) -> DataResult<Vec<R>>
    where
        T: SqlxEntity,
        R: 'static,
    {
        let dialect = self.dialect;
        exec::select_list_convert::<T, R>(self.as_mut(), dialect, order, filter, args).await
    }

    pub async fn select_page_convert<T, R>(
        &mut self,
        pageable: &Pageable,
        order: &str,
        filter: &str,
        args: &[Value],
    ) -> DataResult<Page<R>>
    where
        T: SqlxEntity,
        R: 'static,
    {
        let dialect = self.dialect;
        exec::select_page_convert::<T, R>(self.as_mut(), dialect, pageable, order, filter, args)
            .await
    }
}
