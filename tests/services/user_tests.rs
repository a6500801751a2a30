//! Profiles, public profiles and user search

use pretty_assertions::assert_eq;

use linkme::application::dto::request::{UpdatePostRequest, UpdateProfileRequest};
use linkme::application::services::{
    FollowService, FollowServiceImpl, PostError, PostService, PostServiceImpl, UserError,
    UserService, UserServiceImpl,
};
use linkme::shared::error::AppError;

use crate::common::{MemoryStore, World};

fn users(world: &World) -> UserServiceImpl<MemoryStore, MemoryStore, MemoryStore> {
    UserServiceImpl::new(
        world.store.clone(),
        world.store.clone(),
        world.store.clone(),
        world.publisher(),
    )
}

fn follows(world: &World) -> FollowServiceImpl<MemoryStore, MemoryStore, MemoryStore> {
    FollowServiceImpl::new(world.store.clone(), world.store.clone(), world.notifier())
}

fn world() -> World {
    let world = World::new();
    world.store.seed_user(1, "ann");
    world.store.seed_user(2, "bob");
    world.store.seed_user(3, "cat");
    world
}

fn rename(name: &str) -> UpdateProfileRequest {
    UpdateProfileRequest {
        name: Some(name.into()),
        ..UpdateProfileRequest::default()
    }
}

#[tokio::test]
async fn test_update_profile_to_taken_name_conflicts() {
    let world = world();
    let err = users(&world)
        .update_profile(1, rename("bob"))
        .await
        .unwrap_err();

    assert!(matches!(err, UserError::NameTaken));
    assert!(matches!(AppError::from(err), AppError::Conflict(_)));
    assert_eq!(world.store.user_row(1).unwrap().name, "ann");
}

#[tokio::test]
async fn test_update_profile_keeps_own_name_and_sets_bio() {
    let world = world();
    let profile = users(&world)
        .update_profile(
            1,
            UpdateProfileRequest {
                name: Some(" ann ".into()),
                bio: Some("hello there".into()),
                photo_url: None,
            },
        )
        .await
        .unwrap();

    assert_eq!(profile.name, "ann");
    assert_eq!(profile.bio.as_deref(), Some("hello there"));
    assert!(world.publisher.topics().contains(&"search-index".to_string()));
}

#[tokio::test]
async fn test_update_profile_rejects_names_short_after_trimming() {
    let world = world();
    let service = users(&world);

    for name in ["   ", " a "] {
        let err = service.update_profile(1, rename(name)).await.unwrap_err();
        assert!(matches!(
            AppError::from(err),
            AppError::Validation { ref errors, .. } if errors[0].field == "name"
        ));
    }
    assert_eq!(world.store.user_row(1).unwrap().name, "ann");
}

#[tokio::test]
async fn test_public_profile_counts_and_follow_state() {
    let world = world();
    world.store.seed_post(100, 2, "first");
    world.store.seed_post(101, 2, "second");
    let graph = follows(&world);
    graph.toggle(1, 2).await.unwrap();
    graph.toggle(3, 2).await.unwrap();
    graph.toggle(2, 3).await.unwrap();

    let seen_by_ann = users(&world).get_public_profile(1, "2").await.unwrap();
    assert_eq!(seen_by_ann.name, "bob");
    assert_eq!(seen_by_ann.followers_count, 2);
    assert_eq!(seen_by_ann.following_count, 1);
    assert_eq!(seen_by_ann.posts_count, 2);
    assert!(seen_by_ann.is_following);
    assert!(!seen_by_ann.is_self);

    let seen_by_self = users(&world).get_public_profile(2, "2").await.unwrap();
    assert!(!seen_by_self.is_following);
    assert!(seen_by_self.is_self);
}

#[tokio::test]
async fn test_public_profile_by_name() {
    let world = world();
    let service = users(&world);

    let by_name = service.get_public_profile(1, "cat").await.unwrap();
    assert_eq!(by_name.id, 3);

    let missing = service.get_public_profile(1, "nobody").await.unwrap_err();
    assert!(matches!(missing, UserError::NotFound));
    let missing_id = service.get_public_profile(1, "999").await.unwrap_err();
    assert!(matches!(missing_id, UserError::NotFound));
}

#[tokio::test]
async fn test_numeric_name_resolves_when_no_id_matches() {
    let world = world();
    world.store.seed_user(4, "2024");
    let service = users(&world);

    assert_eq!(service.get_public_profile(1, "2024").await.unwrap().id, 4);
    // an existing id takes precedence over a same-looking name
    world.store.seed_user(5, "3");
    assert_eq!(service.get_public_profile(1, "3").await.unwrap().name, "cat");
}

#[tokio::test]
async fn test_blank_search_returns_nothing() {
    let world = world();
    let service = users(&world);

    assert!(service.search("").await.unwrap().is_empty());
    assert!(service.search("   ").await.unwrap().is_empty());

    let found: Vec<String> = service
        .search(" A ")
        .await
        .unwrap()
        .into_iter()
        .map(|u| u.name)
        .collect();
    assert_eq!(found, vec!["ann".to_string(), "cat".to_string()]);
}

#[tokio::test]
async fn test_only_owner_updates_post() {
    let world = world();
    world.store.seed_post(100, 1, "original");
    let posts = PostServiceImpl::new(
        world.store.clone(),
        world.store.clone(),
        world.store.clone(),
        world.store.clone(),
        world.notifier(),
        world.publisher(),
        world.ids.clone(),
    );
    let edit = || UpdatePostRequest {
        content: Some("edited".into()),
        media_url: None,
    };

    let err = posts.update(2, 100, edit()).await.unwrap_err();
    assert!(matches!(err, PostError::NotPostAuthor));
    assert!(matches!(AppError::from(err), AppError::Forbidden(_)));
    assert_eq!(world.store.post_row(100).unwrap().content, "original");

    let updated = posts.update(1, 100, edit()).await.unwrap();
    assert_eq!(updated.content, "edited");
}
