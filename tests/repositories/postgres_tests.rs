//! The SQL repositories against a real database. Each test gets a fresh
//! database with migrations applied.

use pretty_assertions::assert_eq;
use sqlx::PgPool;

use linkme::domain::{
    FollowRepository, LikeRepository, Notification, NotificationKey, NotificationKind,
    NotificationRepository, Post, PostRepository, User, UserRepository,
};
use linkme::infrastructure::repositories::{
    PgFollowRepository, PgLikeRepository, PgNotificationRepository, PgPostRepository,
    PgUserRepository,
};

async fn seed_user(pool: &PgPool, id: i64, name: &str) {
    PgUserRepository::new(pool.clone())
        .create(&User {
            id,
            email: format!("{name}@example.com"),
            name: name.to_string(),
            password_hash: "hash".into(),
            is_verified: true,
            ..User::default()
        })
        .await
        .unwrap();
}

fn key(kind: NotificationKind, post_id: Option<i64>) -> NotificationKey {
    NotificationKey {
        recipient_id: 2,
        actor_id: 1,
        kind,
        post_id,
    }
}

#[sqlx::test]
#[ignore = "requires Postgres via DATABASE_URL"]
async fn test_unread_notifications_are_deduplicated(pool: PgPool) {
    seed_user(&pool, 1, "ann").await;
    seed_user(&pool, 2, "bob").await;
    let repo = PgNotificationRepository::new(pool.clone());

    // follow notifications have no post; the index must still collide
    let first = repo
        .create_if_absent(&Notification::new(10, key(NotificationKind::Follow, None)))
        .await
        .unwrap();
    assert!(first.is_some());
    let duplicate = repo
        .create_if_absent(&Notification::new(11, key(NotificationKind::Follow, None)))
        .await
        .unwrap();
    assert!(duplicate.is_none());
    assert_eq!(repo.unread_count(2).await.unwrap(), 1);

    assert_eq!(repo.mark_all_read(2).await.unwrap(), 1);
    let after_read = repo
        .create_if_absent(&Notification::new(12, key(NotificationKind::Follow, None)))
        .await
        .unwrap();
    assert!(after_read.is_some());

    let stored = repo.find_by_recipient(2, 50).await.unwrap();
    let ids: Vec<i64> = stored.iter().map(|n| n.id).collect();
    assert_eq!(ids, vec![12, 10]);
    assert_eq!(repo.unread_count(2).await.unwrap(), 1);
}

#[sqlx::test]
#[ignore = "requires Postgres via DATABASE_URL"]
async fn test_post_notifications_dedup_per_post(pool: PgPool) {
    seed_user(&pool, 1, "ann").await;
    seed_user(&pool, 2, "bob").await;
    let posts = PgPostRepository::new(pool.clone());
    posts.create(&Post::new(100, 2, "one".into(), None)).await.unwrap();
    posts.create(&Post::new(101, 2, "two".into(), None)).await.unwrap();
    let repo = PgNotificationRepository::new(pool.clone());

    let on_first = Notification::new(20, key(NotificationKind::Like, Some(100)));
    let on_second = Notification::new(21, key(NotificationKind::Like, Some(101)));
    let again = Notification::new(22, key(NotificationKind::Like, Some(100)));
    let comment = Notification::new(23, key(NotificationKind::Comment, Some(100)));

    assert!(repo.create_if_absent(&on_first).await.unwrap().is_some());
    assert!(repo.create_if_absent(&on_second).await.unwrap().is_some());
    assert!(repo.create_if_absent(&again).await.unwrap().is_none());
    assert!(repo.create_if_absent(&comment).await.unwrap().is_some());
    assert_eq!(repo.unread_count(2).await.unwrap(), 3);
}

#[sqlx::test]
#[ignore = "requires Postgres via DATABASE_URL"]
async fn test_follow_toggle_round_trip(pool: PgPool) {
    seed_user(&pool, 1, "ann").await;
    seed_user(&pool, 2, "bob").await;
    let repo = PgFollowRepository::new(pool.clone());

    assert!(repo.toggle(1, 2).await.unwrap());
    assert!(repo.is_following(1, 2).await.unwrap());
    let counts = repo.counts(2).await.unwrap();
    assert_eq!((counts.followers, counts.following), (1, 0));
    assert_eq!(repo.followers(2).await.unwrap(), vec![1]);

    assert!(!repo.toggle(1, 2).await.unwrap());
    assert!(!repo.is_following(1, 2).await.unwrap());
    assert_eq!(repo.counts(2).await.unwrap().followers, 0);
}

#[sqlx::test]
#[ignore = "requires Postgres via DATABASE_URL"]
async fn test_like_toggle_keeps_counter_in_step(pool: PgPool) {
    seed_user(&pool, 1, "ann").await;
    seed_user(&pool, 2, "bob").await;
    let posts = PgPostRepository::new(pool.clone());
    posts.create(&Post::new(100, 1, "hello".into(), None)).await.unwrap();
    let likes = PgLikeRepository::new(pool.clone());

    let liked = likes.toggle(2, 100).await.unwrap();
    assert!(liked.liked);
    assert_eq!(liked.likes_count, 1);
    assert_eq!(likes.liked_among(2, &[100, 999]).await.unwrap(), vec![100]);
    assert_eq!(likes.likers(100).await.unwrap(), vec![2]);

    let unliked = likes.toggle(2, 100).await.unwrap();
    assert!(!unliked.liked);
    assert_eq!(unliked.likes_count, 0);
    assert_eq!(posts.find_by_id(100).await.unwrap().unwrap().likes_count, 0);
}
