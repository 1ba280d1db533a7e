//! Statement execution against a single connection.
//!
//! Every public operation (on [`Db`](crate::Db), on [`Tx`](crate::Tx),
//! or module-level through the default instance) funnels into these
//! functions. One shared body per operation is what keeps the three
//! surfaces semantically identical.

use crudx::convert::{convert_all, convert_to};
use crudx::query::{id_eq, id_in};
use crudx::{DataError, Dialect, Entity, Page, Pageable, QueryBuilder, Value};
use sqlx::any::{AnyArguments, AnyRow};
use sqlx::AnyConnection;
use sqlx::{Any, Arguments, FromRow};

use crate::error::{AnyErrorExt, DataResult};

/// An [`Entity`] that can be decoded from a row of the SQLx `Any` driver.
///
/// Blanket-implemented; `#[derive(sqlx::FromRow)]` on the entity type is
/// enough.
pub trait SqlxEntity: Entity + for<'r> FromRow<'r, AnyRow> {}

impl<T> SqlxEntity for T where T: Entity + for<'r> FromRow<'r, AnyRow> {}

/// Translate a bind list into driver arguments.
fn arguments(params: &[Value]) -> DataResult<AnyArguments<'static>> {
    let mut out = AnyArguments::default();
    for value in params {
        let added = match value {
            Value::Null => out.add(Option::<String>::None),
            Value::Bool(v) => out.add(*v),
            Value::Int(v) => out.add(*v),
            Value::Float(v) => out.add(*v),
            Value::Text(v) => out.add(v.clone()),
        };
        added.map_err(DataError::Database)?;
    }
    Ok(out)
}

async fn fetch_all<T: SqlxEntity>(
    conn: &mut AnyConnection,
    sql: &str,
    params: &[Value],
) -> DataResult<Vec<T>> {
    sqlx::query_as_with::<Any, T, _>(sql, arguments(params)?)
        .fetch_all(&mut *conn)
        .await
        .map_err(AnyErrorExt::into_data_error)
}

async fn execute(conn: &mut AnyConnection, sql: &str, params: &[Value]) -> DataResult<u64> {
    let result = sqlx::query_with::<Any, _>(sql, arguments(params)?)
        .execute(&mut *conn)
        .await
        .map_err(AnyErrorExt::into_data_error)?;
    Ok(result.rows_affected())
}

pub(crate) async fn select_one<T: SqlxEntity>(
    conn: &mut AnyConnection,
    dialect: Dialect,
    filter: &str,
    args: &[Value],
) -> DataResult<T> {
    // Last matching row wins when the filter matches duplicates.
    let order = format!("{} DESC", T::id_column());
    let (sql, params) = QueryBuilder::new(T::table_name(), dialect)
        .filter(filter, args)
        .order(&order)
        .limit(1)
        .build_select(T::columns());
    let row = sqlx::query_as_with::<Any, T, _>(&sql, arguments(&params)?)
        .fetch_optional(&mut *conn)
        .await
        .map_err(AnyErrorExt::into_data_error)?;
    row.ok_or_else(|| DataError::NotFound(format!("no matching row in {}", T::table_name())))
}

pub(crate) async fn select_by_id<T: SqlxEntity>(
    conn: &mut AnyConnection,
    dialect: Dialect,
    id: Value,
) -> DataResult<T> {
    let filter = id_eq(dialect, T::id_column());
    select_one(conn, dialect, &filter, &[id]).await
}

pub(crate) async fn select_by_ids<T: SqlxEntity>(
    conn: &mut AnyConnection,
    dialect: Dialect,
    ids: Vec<Value>,
) -> DataResult<Vec<T>> {
    let filter = id_in(dialect, T::id_column(), ids.len());
    let (sql, params) = QueryBuilder::new(T::table_name(), dialect)
        .filter(&filter, &ids)
        .build_select(T::columns());
    fetch_all(conn, &sql, &params).await
}

pub(crate) async fn select_list<T: SqlxEntity>(
    conn: &mut AnyConnection,
    dialect: Dialect,
    order: &str,
    filter: &str,
    args: &[Value],
) -> DataResult<Vec<T>> {
    let (sql, params) = QueryBuilder::new(T::table_name(), dialect)
        .filter(filter, args)
        .order(order)
        .build_select(T::columns());
    fetch_all(conn, &sql, &params).await
}

pub(crate) async fn select_page<T: SqlxEntity>(
    conn: &mut AnyConnection,
    dialect: Dialect,
    pageable: &Pageable,
    order: &str,
    filter: &str,
    args: &[Value],
) -> DataResult<Page<T>> {
    let (sql, params) = QueryBuilder::new(T::table_name(), dialect)
        .filter(filter, args)
        .order(order)
        .limit(pageable.limit())
        .offset(pageable.offset())
        .build_select(T::columns());
    let content = fetch_all(conn, &sql, &params).await?;
    // The total reflects the full matching set, not the page.
    let total = count_where(conn, dialect, T::table_name(), filter, args).await?;
    Ok(Page::new(content, pageable, total))
}

async fn count_where(
    conn: &mut AnyConnection,
    dialect: Dialect,
    table: &'static str,
    filter: &str,
    args: &[Value],
) -> DataResult<u64> {
    let (sql, params) = QueryBuilder::new(table, dialect)
        .filter(filter, args)
        .build_count();
    let total: i64 = sqlx::query_scalar_with::<Any, i64, _>(&sql, arguments(&params)?)
        .fetch_one(&mut *conn)
        .await
        .map_err(AnyErrorExt::into_data_error)?;
    Ok(total.max(0) as u64)
}

pub(crate) async fn count<T: Entity>(
    conn: &mut AnyConnection,
    dialect: Dialect,
    filter: &str,
    args: &[Value],
) -> DataResult<u64> {
    count_where(conn, dialect, T::table_name(), filter, args).await
}

pub(crate) async fn exist<T: Entity>(
    conn: &mut AnyConnection,
    dialect: Dialect,
    filter: &str,
    args: &[Value],
) -> DataResult<bool> {
    Ok(count::<T>(conn, dialect, filter, args).await? > 0)
}

fn id_value<'v, T: Entity>(values: &'v [Value]) -> Option<&'v Value> {
    T::columns()
        .iter()
        .position(|column| *column == T::id_column())
        .and_then(|index| values.get(index))
}

fn non_id_columns<T: Entity>() -> Vec<&'static str> {
    T::columns()
        .iter()
        .copied()
        .filter(|column| *column != T::id_column())
        .collect()
}

fn non_id_values<T: Entity>(values: Vec<Value>) -> Vec<Value> {
    T::columns()
        .iter()
        .zip(values)
        .filter(|(column, _)| **column != T::id_column())
        .map(|(_, value)| value)
        .collect()
}

pub(crate) async fn insert<T: Entity>(
    conn: &mut AnyConnection,
    dialect: Dialect,
    entity: &mut T,
) -> DataResult<u64> {
    let values = entity.values();
    // A zero id means the store owns key generation; leave the column out
    // so auto-increment applies.
    let omit_id = id_value::<T>(&values).is_some_and(Value::is_zero);
    let (columns, row) = if omit_id {
        (non_id_columns::<T>(), non_id_values::<T>(values))
    } else {
        (T::columns().to_vec(), values)
    };
    let (sql, params) = QueryBuilder::new(T::table_name(), dialect).build_insert(&columns, &[row]);
    let result = sqlx::query_with::<Any, _>(&sql, arguments(&params)?)
        .execute(&mut *conn)
        .await
        .map_err(AnyErrorExt::into_data_error)?;
    if omit_id {
        if let Some(id) = result.last_insert_id() {
            entity.assign_generated_id(id);
        }
    }
    Ok(result.rows_affected())
}

pub(crate) async fn insert_batches<T: Entity>(
    conn: &mut AnyConnection,
    dialect: Dialect,
    entities: &[T],
) -> DataResult<u64> {
    if entities.is_empty() {
        return Ok(0);
    }
    let rows: Vec<Vec<Value>> = entities.iter().map(Entity::values).collect();
    let omit_id = rows
        .iter()
        .all(|row| id_value::<T>(row).is_some_and(Value::is_zero));
    let (columns, rows) = if omit_id {
        let rows = rows.into_iter().map(non_id_values::<T>).collect::<Vec<_>>();
        (non_id_columns::<T>(), rows)
    } else {
        (T::columns().to_vec(), rows)
    };
    let (sql, params) = QueryBuilder::new(T::table_name(), dialect).build_insert(&columns, &rows);
    execute(conn, &sql, &params).await
}

pub(crate) async fn update<T: Entity>(
    conn: &mut AnyConnection,
    dialect: Dialect,
    entity: &T,
) -> DataResult<u64> {
    let (sql, params) = QueryBuilder::new(T::table_name(), dialect).build_upsert(
        T::columns(),
        T::id_column(),
        &[entity.values()],
    );
    execute(conn, &sql, &params).await
}

pub(crate) async fn update_batches<T: Entity>(
    conn: &mut AnyConnection,
    dialect: Dialect,
    entities: &[T],
) -> DataResult<u64> {
    if entities.is_empty() {
        return Ok(0);
    }
    let rows: Vec<Vec<Value>> = entities.iter().map(Entity::values).collect();
    let (sql, params) =
        QueryBuilder::new(T::table_name(), dialect).build_upsert(T::columns(), T::id_column(), &rows);
    execute(conn, &sql, &params).await
}

pub(crate) async fn updates<T: Entity>(
    conn: &mut AnyConnection,
    dialect: Dialect,
    entity: &T,
    filter: &str,
    args: &[Value],
) -> DataResult<u64> {
    let values = entity.values();
    let assignments: Vec<(&str, Value)> = T::columns()
        .iter()
        .zip(values)
        .filter(|(column, value)| **column != T::id_column() && !value.is_zero())
        .map(|(column, value)| (*column, value))
        .collect();
    // An empty SET list is not valid SQL; an all-zero entity updates nothing.
    if assignments.is_empty() {
        return Ok(0);
    }
    apply_update::<T>(conn, dialect, &assignments, filter, args).await
}

pub(crate) async fn updates_map<T: Entity>(
    conn: &mut AnyConnection,
    dialect: Dialect,
    fields: &[(&str, Value)],
    filter: &str,
    args: &[Value],
) -> DataResult<u64> {
    if fields.is_empty() {
        return Ok(0);
    }
    apply_update::<T>(conn, dialect, fields, filter, args).await
}

async fn apply_update<T: Entity>(
    conn: &mut AnyConnection,
    dialect: Dialect,
    assignments: &[(&str, Value)],
    filter: &str,
    args: &[Value],
) -> DataResult<u64> {
    let (sql, params) = QueryBuilder::new(T::table_name(), dialect)
        .filter(filter, args)
        .build_update(assignments);
    execute(conn, &sql, &params).await
}

pub(crate) async fn delete_by_id<T: Entity>(
    conn: &mut AnyConnection,
    dialect: Dialect,
    id: Value,
) -> DataResult<u64> {
    let filter = id_eq(dialect, T::id_column());
    delete::<T>(conn, dialect, &filter, &[id]).await
}

pub(crate) async fn delete_by_ids<T: Entity>(
    conn: &mut AnyConnection,
    dialect: Dialect,
    ids: Vec<Value>,
) -> DataResult<u64> {
    let filter = id_in(dialect, T::id_column(), ids.len());
    delete::<T>(conn, dialect, &filter, &ids).await
}

pub(crate) async fn delete<T: Entity>(
    conn: &mut AnyConnection,
    dialect: Dialect,
    filter: &str,
    args: &[Value],
) -> DataResult<u64> {
    let (sql, params) = QueryBuilder::new(T::table_name(), dialect)
        .filter(filter, args)
        .build_delete();
    execute(conn, &sql, &params).await
}

pub(crate) async fn select_convert_by_id<T, R>(
    conn: &mut AnyConnection,
    dialect: Dialect,
    id: Value,
) -> DataResult<R>
where
    T: SqlxEntity,
    R: 'static,
{
    let entity: T = select_by_id(conn, dialect, id).await?;
    convert_to(&entity)
}

pub(crate) async fn select_convert_by_ids<T, R>(
    conn: &mut AnyConnection,
    dialect: Dialect,
    ids: Vec<Value>,
) -> DataResult<Vec<R>>
where
    T: SqlxEntity,
    R: 'static,
{
    let entities: Vec<T> = select_by_ids(conn, dialect, ids).await?;
    convert_all(&entities)
}

pub(crate) async fn select_one_convert<T, R>(
    conn: &mut AnyConnection,
    dialect: Dialect,
    filter: &str,
    args: &[Value],
) -> DataResult<R>
where
    T: SqlxEntity,
    R: 'static,
{
    let entity: T = select_one(conn, dialect, filter, args).await?;
    convert_to(&entity)
}

pub(crate) async fn select_list_convert<T, R>(
    conn: &mut AnyConnection,
    dialect: Dialect,
    order: &str,
    filter: &str,
    args: &[Value],
) -> DataResult<Vec<R>>
where
    T: SqlxEntity,
    R: 'static,
{
    let entities: Vec<T> = select_list(conn, dialect, order, filter, args).await?;
    convert_all(&entities)
}

pub(crate) async fn select_page_convert<T, R>(
    conn: &mut AnyConnection,
    dialect: Dialect,
    pageable: &Pageable,
    order: &str,
    filter: &str,
    args: &[Value],
) -> DataResult<Page<R>>
where
    T: SqlxEntity,
    R: 'static,
{
    let page: Page<T> = select_page(conn, dialect, pageable, order, filter, args).await?;
    let converted = convert_all(&page.content)?;
    Ok(page.with_content(converted))
}
