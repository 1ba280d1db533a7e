#![allow(dead_code)]

use std::any::Any;

use crudx::{Convert, Dialect, Entity, Value};
use crudx_sqlx::Db;
use sqlx::any::AnyPoolOptions;

#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub age: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UserView {
    pub id: i64,
    pub name: String,
}

impl Entity for User {
    fn table_name() -> &'static str {
        "users"
    }

    fn columns() -> &'static [&'static str] {
        &["id", "name", "age"]
    }

    fn values(&self) -> Vec<Value> {
        vec![self.id.into(), self.name.as_str().into(), self.age.into()]
    }

    fn assign_generated_id(&mut self, id: i64) {
        self.id = id;
    }

    fn as_convert(&self) -> Option<&dyn Convert> {
        Some(self)
    }
}

impl Convert for User {
    fn convert(&self) -> Box<dyn Any + Send> {
        Box::new(UserView {
            id: self.id,
            name: self.name.clone(),
        })
    }
}

/// Same table as `User`, without the conversion capability.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PlainUser {
    pub id: i64,
    pub name: String,
    pub age: i64,
}

impl Entity for PlainUser {
    fn table_name() -> &'static str {
        "users"
    }

    fn columns() -> &'static [&'static str] {
        &["id", "name", "age"]
    }

    fn values(&self) -> Vec<Value> {
        vec![self.id.into(), self.name.as_str().into(), self.age.into()]
    }
}

/// Fresh in-memory database. A single pooled connection keeps the
/// database alive and visible across operations.
pub async fn setup() -> Db {
    let db = Db::connect_with(AnyPoolOptions::new().max_connections(1), "sqlite::memory:")
        .await
        .expect("connect in-memory sqlite");
    assert_eq!(db.dialect(), Dialect::Sqlite);
    sqlx::query(
        "CREATE TABLE users (id INTEGER PRIMARY KEY AUTOINCREMENT, \
         name TEXT NOT NULL, age INTEGER NOT NULL)",
    )
    .execute(db.pool())
    .await
    .expect("create users table");
    db
}

pub fn user(name: &str, age: i64) -> User {
    User {
        id: 0,
        name: name.into(),
        age,
    }
}
