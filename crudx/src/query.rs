use crate::value::Value;

/// SQL dialect differences that matter for statement assembly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    /// SQLite-style `?` placeholders. Also the fallback for stores the
    /// URL scheme does not identify.
    Sqlite,
    /// MySQL-style `?` placeholders.
    MySql,
    /// Postgres-style `$1, $2, ...` placeholders.
    Postgres,
}

impl Dialect {
    /// Infer the dialect from a connection URL scheme.
    pub fn from_url(url: &str) -> Self {
        match url.split(':').next().unwrap_or("") {
            "postgres" | "postgresql" => Dialect::Postgres,
            "mysql" | "mariadb" => Dialect::MySql,
            _ => Dialect::Sqlite,
        }
    }

    fn placeholder(self, index: usize) -> String {
        match self {
            Dialect::Postgres => format!("${index}"),
            Dialect::Sqlite | Dialect::MySql => "?".to_string(),
        }
    }
}

/// `column = <placeholder>` lookup fragment for the given dialect.
pub fn id_eq(dialect: Dialect, column: &str) -> String {
    format!("{column} = {}", dialect.placeholder(1))
}

/// `column IN (...)` lookup fragment with `n` placeholders.
///
/// An empty id set yields a never-matching clause, so the query returns
/// no rows instead of failing on an empty `IN ()`.
pub fn id_in(dialect: Dialect, column: &str, n: usize) -> String {
    if n == 0 {
        return "1 = 0".to_string();
    }
    let placeholders: Vec<_> = (1..=n).map(|i| dialect.placeholder(i)).collect();
    format!("{column} IN ({})", placeholders.join(", "))
}

/// Assembles the SQL statements issued by the CRUD operations.
///
/// Filter and order fragments are forwarded verbatim: the caller writes
/// them in the syntax of the active store, placeholders included. The
/// builder only generates placeholders for values it introduces itself
/// (INSERT rows and UPDATE assignments).
///
/// # Example
///
/// ```ignore
/// let (sql, params) = QueryBuilder::new("users", Dialect::Sqlite)
///     .filter("age > ?", &args![18])
///     .order("id DESC")
///     .limit(10)
///     .build_select(&["id", "name", "age"]);
/// ```
#[derive(Debug, Clone)]
pub struct QueryBuilder {
    table: &'static str,
    dialect: Dialect,
    filter: Option<String>,
    args: Vec<Value>,
    order: Option<String>,
    limit: Option<i64>,
    offset: Option<i64>,
}

impl QueryBuilder {
    pub fn new(table: &'static str, dialect: Dialect) -> Self {
        Self {
            table,
            dialect,
            filter: None,
            args: Vec::new(),
            order: None,
            limit: None,
            offset: None,
        }
    }

    /// Raw WHERE fragment plus its positional arguments. An empty
    /// fragment is ignored.
    pub fn filter(mut self, fragment: &str, args: &[Value]) -> Self {
        if !fragment.is_empty() {
            self.filter = Some(fragment.to_string());
            self.args = args.to_vec();
        }
        self
    }

    /// Raw ORDER BY fragment (e.g. `"created_at DESC"`). An empty
    /// fragment means store-natural order.
    pub fn order(mut self, fragment: &str) -> Self {
        if !fragment.is_empty() {
            self.order = Some(fragment.to_string());
        }
        self
    }

    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: i64) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Build a SELECT returning `(sql, bind_values)`.
    pub fn build_select(&self, columns: &[&str]) -> (String, Vec<Value>) {
        let mut sql = format!("SELECT {} FROM {}", columns.join(", "), self.table);
        self.append_where(&mut sql);
        if let Some(order) = &self.order {
            sql.push_str(" ORDER BY ");
            sql.push_str(order);
        }
        if let Some(limit) = self.limit {
            sql.push_str(&format!(" LIMIT {limit}"));
        }
        if let Some(offset) = self.offset {
            sql.push_str(&format!(" OFFSET {offset}"));
        }
        (sql, self.args.clone())
    }

    /// Build a `SELECT COUNT(*)` over the full matching set; order,
    /// limit and offset do not apply.
    pub fn build_count(&self) -> (String, Vec<Value>) {
        let mut sql = format!("SELECT COUNT(*) FROM {}", self.table);
        self.append_where(&mut sql);
        (sql, self.args.clone())
    }

    /// Build a DELETE scoped by the filter.
    pub fn build_delete(&self) -> (String, Vec<Value>) {
        let mut sql = format!("DELETE FROM {}", self.table);
        self.append_where(&mut sql);
        (sql, self.args.clone())
    }

    /// Build a multi-row INSERT with generated placeholders.
    pub fn build_insert(&self, columns: &[&str], rows: &[Vec<Value>]) -> (String, Vec<Value>) {
        let sql = self.insert_head(columns, rows);
        let params = rows.iter().flatten().cloned().collect();
        (sql, params)
    }

    /// Build a full-row save by primary key: a multi-row INSERT carrying
    /// the store's conflict clause, so insert-if-absent stays the
    /// store's decision.
    pub fn build_upsert(
        &self,
        columns: &[&str],
        id_column: &str,
        rows: &[Vec<Value>],
    ) -> (String, Vec<Value>) {
        let mut sql = self.insert_head(columns, rows);
        sql.push_str(&self.upsert_clause(columns, id_column));
        let params = rows.iter().flatten().cloned().collect();
        (sql, params)
    }

    /// Build an UPDATE with explicit SET assignments plus the caller's
    /// filter.
    ///
    /// With `$n` placeholders the caller's fragment owns `$1..$k` for its
    /// own arguments, so generated SET placeholders start at `$k+1` and
    /// the returned bind list is ordered filter-args-then-assignments.
    /// With `?` placeholders binds follow textual order: assignments
    /// first, filter arguments after.
    pub fn build_update(&self, assignments: &[(&str, Value)]) -> (String, Vec<Value>) {
        let mut sql = format!("UPDATE {} SET ", self.table);
        let set: Vec<String> = match self.dialect {
            Dialect::Postgres => assignments
                .iter()
                .enumerate()
                .map(|(i, (column, _))| format!("{column} = ${}", self.args.len() + i + 1))
                .collect(),
            _ => assignments
                .iter()
                .map(|(column, _)| format!("{column} = ?"))
                .collect(),
        };
        sql.push_str(&set.join(", "));
        self.append_where(&mut sql);
        let values = assignments.iter().map(|(_, value)| value.clone());
        let params: Vec<Value> = match self.dialect {
            Dialect::Postgres => self.args.iter().cloned().chain(values).collect(),
            _ => values.chain(self.args.iter().cloned()).collect(),
        };
        (sql, params)
    }

    fn insert_head(&self, columns: &[&str], rows: &[Vec<Value>]) -> String {
        let mut sql = format!("INSERT INTO {} ({}) VALUES ", self.table, columns.join(", "));
        let mut index = 1usize;
        let mut groups = Vec::with_capacity(rows.len());
        for row in rows {
            let placeholders: Vec<_> = row
                .iter()
                .map(|_| {
                    let placeholder = self.dialect.placeholder(index);
                    index += 1;
                    placeholder
                })
                .collect();
            groups.push(format!("({})", placeholders.join(", ")));
        }
        sql.push_str(&groups.join(", "));
        sql
    }

    fn upsert_clause(&self, columns: &[&str], id_column: &str) -> String {
        let updates: Vec<String> = columns
            .iter()
            .filter(|column| **column != id_column)
            .map(|column| match self.dialect {
                Dialect::MySql => format!("{column} = VALUES({column})"),
                _ => format!("{column} = excluded.{column}"),
            })
            .collect();
        match self.dialect {
            Dialect::MySql => {
                if updates.is_empty() {
                    format!(" ON DUPLICATE KEY UPDATE {id_column} = {id_column}")
                } else {
                    format!(" ON DUPLICATE KEY UPDATE {}", updates.join(", "))
                }
            }
            _ => {
                if updates.is_empty() {
                    format!(" ON CONFLICT ({id_column}) DO NOTHING")
                } else {
                    format!(" ON CONFLICT ({id_column}) DO UPDATE SET {}", updates.join(", "))
                }
            }
        }
    }

    fn append_where(&self, sql: &mut String) {
        if let Some(filter) = &self.filter {
            sql.push_str(" WHERE ");
            sql.push_str(filter);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args;

    #[test]
    fn test_simple_select() {
        let (sql, params) = QueryBuilder::new("users", Dialect::Sqlite).build_select(&["id", "name"]);
        assert_eq!(sql, "SELECT id, name FROM users");
        assert!(params.is_empty());
    }

    #[test]
    fn test_select_with_filter_and_paging() {
        let (sql, params) = QueryBuilder::new("users", Dialect::Sqlite)
            .filter("age > ?", &args![18])
            .order("id DESC")
            .limit(10)
            .offset(20)
            .build_select(&["id", "name", "age"]);
        assert_eq!(
            sql,
            "SELECT id, name, age FROM users WHERE age > ? ORDER BY id DESC LIMIT 10 OFFSET 20"
        );
        assert_eq!(params, args![18]);
    }

    #[test]
    fn test_empty_fragments_ignored() {
        let (sql, _) = QueryBuilder::new("users", Dialect::Sqlite)
            .filter("", &args![])
            .order("")
            .build_select(&["id"]);
        assert_eq!(sql, "SELECT id FROM users");
    }

    #[test]
    fn test_count_ignores_paging() {
        let (sql, params) = QueryBuilder::new("users", Dialect::Sqlite)
            .filter("name = ?", &args!["bob"])
            .order("id DESC")
            .limit(5)
            .offset(10)
            .build_count();
        assert_eq!(sql, "SELECT COUNT(*) FROM users WHERE name = ?");
        assert_eq!(params, args!["bob"]);
    }

    #[test]
    fn test_delete() {
        let (sql, params) = QueryBuilder::new("users", Dialect::Sqlite)
            .filter("id = ?", &args![3])
            .build_delete();
        assert_eq!(sql, "DELETE FROM users WHERE id = ?");
        assert_eq!(params, args![3]);
    }

    #[test]
    fn test_insert_postgres_placeholders() {
        let rows = vec![vec![1.into(), "a".into()], vec![2.into(), "b".into()]];
        let (sql, params) =
            QueryBuilder::new("users", Dialect::Postgres).build_insert(&["id", "name"], &rows);
        assert_eq!(
            sql,
            "INSERT INTO users (id, name) VALUES ($1, $2), ($3, $4)"
        );
        assert_eq!(params, args![1, "a", 2, "b"]);
    }

    #[test]
    fn test_upsert_sqlite() {
        let rows = vec![vec![1.into(), "a".into()]];
        let (sql, _) =
            QueryBuilder::new("users", Dialect::Sqlite).build_upsert(&["id", "name"], "id", &rows);
        assert_eq!(
            sql,
            "INSERT INTO users (id, name) VALUES (?, ?) \
             ON CONFLICT (id) DO UPDATE SET name = excluded.name"
        );
    }

    #[test]
    fn test_upsert_mysql() {
        let rows = vec![vec![1.into(), "a".into()]];
        let (sql, _) =
            QueryBuilder::new("users", Dialect::MySql).build_upsert(&["id", "name"], "id", &rows);
        assert_eq!(
            sql,
            "INSERT INTO users (id, name) VALUES (?, ?) \
             ON DUPLICATE KEY UPDATE name = VALUES(name)"
        );
    }

    #[test]
    fn test_update_bind_order_sqlite() {
        let (sql, params) = QueryBuilder::new("users", Dialect::Sqlite)
            .filter("id = ?", &args![9])
            .build_update(&[("name", "a".into()), ("age", 30.into())]);
        assert_eq!(sql, "UPDATE users SET name = ?, age = ? WHERE id = ?");
        // ? binds follow textual order: assignments first, filter args last.
        assert_eq!(params, args!["a", 30, 9]);
    }

    #[test]
    fn test_update_bind_order_postgres() {
        let (sql, params) = QueryBuilder::new("users", Dialect::Postgres)
            .filter("id = $1", &args![9])
            .build_update(&[("name", "a".into()), ("age", 30.into())]);
        assert_eq!(sql, "UPDATE users SET name = $2, age = $3 WHERE id = $1");
        // $n binds are positional: the filter owns $1, assignments follow.
        assert_eq!(params, args![9, "a", 30]);
    }

    #[test]
    fn test_id_fragments() {
        assert_eq!(id_eq(Dialect::Sqlite, "id"), "id = ?");
        assert_eq!(id_eq(Dialect::Postgres, "id"), "id = $1");
        assert_eq!(id_in(Dialect::Sqlite, "id", 3), "id IN (?, ?, ?)");
        assert_eq!(id_in(Dialect::Postgres, "id", 2), "id IN ($1, $2)");
        assert_eq!(id_in(Dialect::Sqlite, "id", 0), "1 = 0");
    }

    #[test]
    fn test_dialect_from_url() {
        assert_eq!(Dialect::from_url("postgres://localhost/app"), Dialect::Postgres);
        assert_eq!(Dialect::from_url("postgresql://localhost/app"), Dialect::Postgres);
        assert_eq!(Dialect::from_url("mysql://localhost/app"), Dialect::MySql);
        assert_eq!(Dialect::from_url("sqlite::memory:"), Dialect::Sqlite);
        assert_eq!(Dialect::from_url("weird"), Dialect::Sqlite);
    }
}
