// Runs in its own binary: nothing here ever calls `init`, so the default
// instance is guaranteed to be absent.

use crudx::{args, DataError, Entity, Value};
use crudx_sqlx::crud;

struct Account {
    id: i64,
}

impl Entity for Account {
    fn table_name() -> &'static str {
        "accounts"
    }

    fn columns() -> &'static [&'static str] {
        &["id"]
    }

    fn values(&self) -> Vec<Value> {
        vec![self.id.into()]
    }
}

#[tokio::test]
async fn test_operations_fail_before_init() {
    let err = crud::count::<Account>("", &args![]).await.unwrap_err();
    assert!(matches!(err, DataError::NotInitialized));

    let mut account = Account { id: 1 };
    let err = crud::insert(&mut account).await.unwrap_err();
    assert!(matches!(err, DataError::NotInitialized));
}
