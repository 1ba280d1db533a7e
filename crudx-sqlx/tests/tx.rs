mod common;

use common::{setup, user, User};
use crudx::args;

#[tokio::test]
async fn test_tx_commit_makes_work_visible() {
    let db = setup().await;

    let mut tx = db.begin().await.unwrap();
    let mut alice = user("alice", 30);
    tx.insert(&mut alice).await.unwrap();
    assert!(alice.id > 0);
    tx.commit().await.unwrap();

    let found: User = db.select_by_id::<User, _>(alice.id).await.unwrap();
    assert_eq!(found.name, "alice");
}

#[tokio::test]
async fn test_tx_rollback_discards_work() {
    let db = setup().await;

    let mut tx = db.begin().await.unwrap();
    tx.insert(&mut user("alice", 30)).await.unwrap();
    tx.rollback().await.unwrap();

    assert_eq!(db.count::<User>("", &args![]).await.unwrap(), 0);
}

#[tokio::test]
async fn test_tx_drop_rolls_back() {
    let db = setup().await;

    {
        let mut tx = db.begin().await.unwrap();
        tx.insert(&mut user("alice", 30)).await.unwrap();
        // Dropped without commit.
    }

    assert_eq!(db.count::<User>("", &args![]).await.unwrap(), 0);
}

#[tokio::test]
async fn test_tx_sees_its_own_writes() {
    let db = setup().await;

    let mut tx = db.begin().await.unwrap();
    let mut alice = user("alice", 30);
    tx.insert(&mut alice).await.unwrap();

    let found: User = tx.select_by_id::<User, _>(alice.id).await.unwrap();
    assert_eq!(found.name, "alice");
    assert_eq!(tx.count::<User>("", &args![]).await.unwrap(), 1);

    tx.updates_map::<User>(&[("age", 31.into())], "id = ?", &args![alice.id])
        .await
        .unwrap();
    let patched: User = tx.select_by_id::<User, _>(alice.id).await.unwrap();
    assert_eq!(patched.age, 31);

    tx.commit().await.unwrap();
    assert_eq!(db.count::<User>("", &args![]).await.unwrap(), 1);
}

#[tokio::test]
async fn test_tx_full_operation_set() {
    let db = setup().await;

    let mut tx = db.begin().await.unwrap();
    tx.insert_batches(&[user("a", 1), user("b", 2), user("c", 3)])
        .await
        .unwrap();

    let listed: Vec<User> = tx.select_list("age DESC", "", &args![]).await.unwrap();
    assert_eq!(listed.len(), 3);

    let page = tx
        .select_page::<User>(&crudx::Pageable::new(1, 2), "age", "", &args![])
        .await
        .unwrap();
    assert_eq!(page.content.len(), 2);
    assert_eq!(page.total_elements, 3);

    assert_eq!(tx.delete::<User>("age > ?", &args![1]).await.unwrap(), 2);
    tx.commit().await.unwrap();

    assert_eq!(db.count::<User>("", &args![]).await.unwrap(), 1);
}
