use crate::convert::Convert;
use crate::value::Value;

/// Trait describing how a record type maps to a database table.
///
/// Intended to be implemented manually per entity type.
///
/// # Example
///
/// ```ignore
/// impl Entity for User {
///     fn table_name() -> &'static str { "users" }
///     fn columns() -> &'static [&'static str] { &["id", "name", "email"] }
///     fn values(&self) -> Vec<Value> {
///         vec![self.id.into(), self.name.as_str().into(), self.email.as_str().into()]
///     }
///     fn assign_generated_id(&mut self, id: i64) { self.id = id; }
/// }
/// ```
pub trait Entity: Send + Sync + Unpin + 'static {
    fn table_name() -> &'static str;

    /// Name of the identifier column.
    fn id_column() -> &'static str {
        "id"
    }

    /// All mapped columns, including the identifier column.
    fn columns() -> &'static [&'static str];

    /// Current field values, aligned index-for-index with [`Entity::columns`].
    fn values(&self) -> Vec<Value>;

    /// Called after a single-row insert when the store generated the row's
    /// integer key. Entities with store-generated keys override this to
    /// write the key back; the default keeps the entity untouched.
    fn assign_generated_id(&mut self, _id: i64) {}

    /// Capability hook for the `*_convert` operations. Entities that
    /// implement [`Convert`] override this to return `Some(self)`.
    fn as_convert(&self) -> Option<&dyn Convert> {
        None
    }
}
