mod common;

use common::{setup, user, User, UserView};
use crudx::args;
use crudx_sqlx::{crud, init};
use serial_test::serial;

#[tokio::test]
#[serial]
async fn test_default_instance_serves_the_crud_module() {
    init(setup().await);

    let mut alice = user("alice", 30);
    assert_eq!(crud::insert(&mut alice).await.unwrap(), 1);
    assert!(alice.id > 0);

    let found: User = crud::select_by_id::<User, _>(alice.id).await.unwrap();
    assert_eq!(found, alice);

    let view: UserView = crud::select_convert_by_id::<User, _, _>(alice.id)
        .await
        .unwrap();
    assert_eq!(view.name, "alice");

    assert!(crud::exist::<User>("name = ?", &args!["alice"]).await.unwrap());
    assert_eq!(
        crud::updates_map::<User>(&[("age", 31.into())], "id = ?", &args![alice.id])
            .await
            .unwrap(),
        1
    );
    assert_eq!(crud::delete_by_id::<User, _>(alice.id).await.unwrap(), 1);
    assert_eq!(crud::count::<User>("", &args![]).await.unwrap(), 0);
}

#[tokio::test]
#[serial]
async fn test_init_replaces_the_default_instance() {
    init(setup().await);
    crud::insert(&mut user("old", 1)).await.unwrap();

    // A fresh instance swaps in cleanly; the old data is gone with it.
    init(setup().await);
    assert_eq!(crud::count::<User>("", &args![]).await.unwrap(), 0);
}
