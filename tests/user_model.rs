// User model tests: persistence, relationships and authentication.
// Run with: cargo test --test user_model

mod common;

use common::{add_follow, hasher, insert_raw_user, signup_user, test_db, user_count};
use sea_orm::TransactionTrait;
use warbler::{
    entities::user::DEFAULT_IMAGE_URL,
    errors::StoreError,
    repository::{commit_or_rollback, MessageRepository, UserRepository},
    services::accounts,
};

#[actix_web::test]
async fn test_user_model() {
    let db = test_db().await;
    let repo = UserRepository::new(&db);

    let u = insert_raw_user(&db, "testuser", "test@test.com").await;

    // User should have no messages & no followers
    let relationships = repo.relationships(u.id).await.unwrap();
    assert_eq!(relationships.messages.len(), 0);
    assert_eq!(relationships.followers.len(), 0);
    assert_eq!(relationships.following.len(), 0);
    assert_eq!(relationships.likes.len(), 0);

    let found = repo.find_by_username("testuser").await.unwrap().unwrap();
    assert_eq!(found.id, u.id);
    assert_eq!(found.email, "test@test.com");
    assert_eq!(found.password, "testuserpw");
    assert_eq!(found.image_url.as_deref(), Some("www.testuser.com"));
    assert_eq!(found.header_image_url.as_deref(), Some("www.testuserheader.com"));
    assert_eq!(found.bio.as_deref(), Some("testuserbio"));
    assert_eq!(found.location.as_deref(), Some("testuserlocation"));
}

#[actix_web::test]
async fn test_display() {
    let db = test_db().await;
    let user = insert_raw_user(&db, "testuser", "abc@123.com").await;

    assert_eq!(
        user.to_string(),
        format!("<User #{}: testuser, abc@123.com>", user.id)
    );
}

#[actix_web::test]
async fn test_is_following() {
    let db = test_db().await;
    let repo = UserRepository::new(&db);
    let u1 = insert_raw_user(&db, "u1", "u1@u1.com").await;
    let u2 = insert_raw_user(&db, "u2", "u2@u2.com").await;

    assert_eq!(repo.followers(u2.id).await.unwrap().len(), 0);
    assert!(!repo.is_following(u1.id, u2.id).await.unwrap());

    add_follow(&db, &u1, &u2).await;

    assert_eq!(repo.followers(u2.id).await.unwrap().len(), 1);
    assert!(repo.is_following(u1.id, u2.id).await.unwrap());
    // direction matters
    assert!(!repo.is_following(u2.id, u1.id).await.unwrap());
}

#[actix_web::test]
async fn test_is_followed_by() {
    let db = test_db().await;
    let repo = UserRepository::new(&db);
    let u1 = insert_raw_user(&db, "u1", "u1@u1.com").await;
    let u2 = insert_raw_user(&db, "u2", "u2@u2.com").await;

    assert!(!repo.is_followed_by(u2.id, u1.id).await.unwrap());

    add_follow(&db, &u1, &u2).await;

    assert!(repo.is_followed_by(u2.id, u1.id).await.unwrap());
    assert!(!repo.is_followed_by(u1.id, u2.id).await.unwrap());

    let followers = repo.followers(u2.id).await.unwrap();
    assert_eq!(followers, vec![u1.clone()]);
    let following = repo.following(u1.id).await.unwrap();
    assert_eq!(following, vec![u2.clone()]);
    assert!(repo.following(u2.id).await.unwrap().is_empty());
}

#[actix_web::test]
async fn test_follow_and_unfollow() {
    let db = test_db().await;
    let repo = UserRepository::new(&db);
    let u1 = insert_raw_user(&db, "u1", "u1@u1.com").await;
    let u2 = insert_raw_user(&db, "u2", "u2@u2.com").await;

    assert!(repo.follow(u1.id, u2.id).await.unwrap());
    // a second follow does not duplicate the edge
    assert!(!repo.follow(u1.id, u2.id).await.unwrap());
    assert_eq!(repo.followers(u2.id).await.unwrap().len(), 1);

    assert!(repo.unfollow(u1.id, u2.id).await.unwrap());
    assert!(!repo.unfollow(u1.id, u2.id).await.unwrap());
    assert!(!repo.is_following(u1.id, u2.id).await.unwrap());
}

#[actix_web::test]
async fn test_follow_when_edge_already_stored() {
    let db = test_db().await;
    let repo = UserRepository::new(&db);
    let u1 = insert_raw_user(&db, "u1", "u1@u1.com").await;
    let u2 = insert_raw_user(&db, "u2", "u2@u2.com").await;

    // another request wrote the edge first
    add_follow(&db, &u1, &u2).await;

    assert!(!repo.follow(u1.id, u2.id).await.unwrap());
    assert_eq!(repo.followers(u2.id).await.unwrap(), vec![u1.clone()]);
}

#[actix_web::test]
async fn test_follow_missing_user_is_integrity_error() {
    let db = test_db().await;
    let repo = UserRepository::new(&db);
    let u1 = insert_raw_user(&db, "u1", "u1@u1.com").await;

    let result = repo.follow(u1.id, u1.id + 1000).await;

    assert!(matches!(result, Err(StoreError::Integrity(_))));
    assert!(repo.following(u1.id).await.unwrap().is_empty());
}

#[actix_web::test]
async fn test_user_signup() {
    let db = test_db().await;
    let repo = UserRepository::new(&db);

    let new_user = accounts::signup(
        "testusername",
        "test@gmail.com",
        Some("testpass"),
        Some("http://www.test.com"),
        &hasher(),
    )
    .unwrap();
    let created = repo.insert(new_user).await.unwrap();

    let user = repo.find_by_id(created.id).await.unwrap().unwrap();
    assert_eq!(user.username, "testusername");
    assert_eq!(user.email, "test@gmail.com");
    // Bcrypt strings should start with $2b$
    assert!(user.password.starts_with("$2b$"));
    assert!(!user.password.contains("testpass"));
    assert_eq!(user.image_url.as_deref(), Some("http://www.test.com"));
}

#[actix_web::test]
async fn test_signup_default_image() {
    let db = test_db().await;
    let user = signup_user(&db, "u1username", "u1email@u1.com", "u1password").await;

    assert_eq!(user.image_url.as_deref(), Some(DEFAULT_IMAGE_URL));
}

#[actix_web::test]
async fn test_duplicate_username_signup() {
    let db = test_db().await;
    signup_user(&db, "testusername", "test@gmail.com", "testpass").await;

    let duplicate =
        accounts::signup("testusername", "other@gmail.com", Some("testpass"), None, &hasher())
            .unwrap();
    let result = UserRepository::new(&db).insert(duplicate).await;

    assert!(matches!(result, Err(StoreError::Integrity(_))));
    assert_eq!(user_count(&db).await, 1);
}

#[actix_web::test]
async fn test_duplicate_email_signup() {
    let db = test_db().await;
    signup_user(&db, "testusername", "test@gmail.com", "testpass").await;

    let duplicate =
        accounts::signup("otherusername", "test@gmail.com", Some("testpass"), None, &hasher())
            .unwrap();
    let result = UserRepository::new(&db).insert(duplicate).await;

    assert!(matches!(result, Err(StoreError::Integrity(_))));
    assert_eq!(user_count(&db).await, 1);
}

#[actix_web::test]
async fn test_failed_commit_rolls_back() {
    let db = test_db().await;
    signup_user(&db, "taken", "taken@gmail.com", "testpass").await;

    let txn = db.begin().await.unwrap();
    let result = {
        let repo = UserRepository::new(&txn);
        let fresh = accounts::signup("fresh", "fresh@gmail.com", Some("pw"), None, &hasher()).unwrap();
        repo.insert(fresh).await.unwrap();

        let clash = accounts::signup("taken", "clash@gmail.com", Some("pw"), None, &hasher()).unwrap();
        repo.insert(clash).await
    };

    let result = commit_or_rollback(txn, result).await;
    assert!(matches!(result, Err(StoreError::Integrity(_))));

    let repo = UserRepository::new(&db);
    assert_eq!(user_count(&db).await, 1);
    assert!(repo.find_by_username("fresh").await.unwrap().is_none());
}

#[actix_web::test]
async fn test_user_authenticate() {
    let db = test_db().await;
    let repo = UserRepository::new(&db);
    let user = signup_user(&db, "testusername", "abc@123.com", "testingpassword").await;

    let found = accounts::authenticate(&repo, &hasher(), "testusername", "testingpassword")
        .await
        .unwrap();
    assert_eq!(found.map(|u| u.id), Some(user.id));

    let wrong_pass = accounts::authenticate(&repo, &hasher(), &user.username, "wrongpassword")
        .await
        .unwrap();
    assert!(wrong_pass.is_none());

    let wrong_username = accounts::authenticate(&repo, &hasher(), "wrongusername", &user.password)
        .await
        .unwrap();
    assert!(wrong_username.is_none());
}

#[actix_web::test]
async fn test_authenticate_against_unhashed_password() {
    let db = test_db().await;
    let repo = UserRepository::new(&db);
    let user = insert_raw_user(&db, "u1", "u1@u1.com").await;

    // "u1pw" is stored verbatim, which bcrypt cannot parse
    let result = accounts::authenticate(&repo, &hasher(), &user.username, "u1pw")
        .await
        .unwrap();
    assert!(result.is_none());
}

#[actix_web::test]
async fn test_likes_and_messages() {
    let db = test_db().await;
    let users = UserRepository::new(&db);
    let messages = MessageRepository::new(&db);
    let u1 = insert_raw_user(&db, "u1", "u1@u1.com").await;
    let u2 = insert_raw_user(&db, "u2", "u2@u2.com").await;

    let msg = messages.create(u1.id, "hello".to_string()).await.unwrap();
    assert_eq!(users.messages(u1.id).await.unwrap(), vec![msg.clone()]);

    assert!(messages.toggle_like(u2.id, msg.id).await.unwrap());
    assert_eq!(users.likes(u2.id).await.unwrap(), vec![msg.clone()]);
    assert!(users.liked_message_ids(u2.id).await.unwrap().contains(&msg.id));

    let liked = messages.liked_by(u2.id).await.unwrap();
    assert_eq!(liked.len(), 1);
    assert_eq!(liked[0].1.id, u1.id);

    assert!(!messages.toggle_like(u2.id, msg.id).await.unwrap());
    assert!(users.likes(u2.id).await.unwrap().is_empty());
}

#[actix_web::test]
async fn test_timeline_includes_followed_users_only() {
    let db = test_db().await;
    let users = UserRepository::new(&db);
    let messages = MessageRepository::new(&db);
    let u1 = insert_raw_user(&db, "u1", "u1@u1.com").await;
    let u2 = insert_raw_user(&db, "u2", "u2@u2.com").await;
    let u3 = insert_raw_user(&db, "u3", "u3@u3.com").await;

    users.follow(u1.id, u2.id).await.unwrap();
    let own = messages.create(u1.id, "mine".to_string()).await.unwrap();
    let followed = messages.create(u2.id, "followed".to_string()).await.unwrap();
    messages.create(u3.id, "stranger".to_string()).await.unwrap();

    let timeline = messages.timeline(u1.id, 100).await.unwrap();
    let mut ids: Vec<i32> = timeline.iter().map(|(m, _)| m.id).collect();
    ids.sort();
    assert_eq!(ids, vec![own.id, followed.id]);

    let limited = messages.timeline(u1.id, 1).await.unwrap();
    assert_eq!(limited.len(), 1);
}

#[actix_web::test]
async fn test_delete_cascades() {
    let db = test_db().await;
    let users = UserRepository::new(&db);
    let messages = MessageRepository::new(&db);
    let u1 = insert_raw_user(&db, "u1", "u1@u1.com").await;
    let u2 = insert_raw_user(&db, "u2", "u2@u2.com").await;

    add_follow(&db, &u1, &u2).await;
    add_follow(&db, &u2, &u1).await;
    let msg = messages.create(u1.id, "bye".to_string()).await.unwrap();
    messages.toggle_like(u2.id, msg.id).await.unwrap();

    assert!(users.delete(u1.id).await.unwrap());

    assert!(users.find_by_id(u1.id).await.unwrap().is_none());
    assert!(users.followers(u2.id).await.unwrap().is_empty());
    assert!(users.following(u2.id).await.unwrap().is_empty());
    assert!(users.likes(u2.id).await.unwrap().is_empty());
    assert!(messages.find(msg.id).await.unwrap().is_none());
}

#[actix_web::test]
async fn test_search_users() {
    let db = test_db().await;
    let repo = UserRepository::new(&db);
    insert_raw_user(&db, "alice", "alice@a.com").await;
    insert_raw_user(&db, "bob", "bob@b.com").await;

    assert_eq!(repo.list(None).await.unwrap().len(), 2);
    assert_eq!(repo.list(Some("  ")).await.unwrap().len(), 2);

    let found = repo.list(Some("ali")).await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].username, "alice");
}
