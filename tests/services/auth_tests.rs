//! Registration, verification, login and password reset flows

use pretty_assertions::assert_eq;

use linkme::application::services::{decode_token, AuthError, AuthService, AuthServiceImpl};
use linkme::domain::events::{IndexEvent, MailRequest};
use linkme::domain::DomainEvent;
use linkme::shared::error::AppError;

use crate::common::{test_settings, MemoryStore, World, TEST_JWT_SECRET};

fn auth(world: &World) -> AuthServiceImpl<MemoryStore> {
    AuthServiceImpl::new(
        world.store.clone(),
        world.publisher(),
        world.ids.clone(),
        test_settings().jwt,
    )
}

fn verification_token(world: &World) -> Option<String> {
    world.publisher.events().into_iter().find_map(|e| match e {
        DomainEvent::Mail(MailRequest::Verification { token, .. }) => Some(token),
        _ => None,
    })
}

fn reset_token(world: &World) -> Option<String> {
    world.publisher.events().into_iter().find_map(|e| match e {
        DomainEvent::Mail(MailRequest::PasswordReset { token, .. }) => Some(token),
        _ => None,
    })
}

#[tokio::test]
async fn test_register_verify_login() {
    let world = World::new();
    let service = auth(&world);

    let user = service
        .register("Ann@Example.com", "ann", "password123")
        .await
        .unwrap();
    assert_eq!(user.email, "ann@example.com");
    assert!(!user.is_verified);

    let err = service.login("ann@example.com", "password123").await.unwrap_err();
    assert!(matches!(err, AuthError::EmailNotVerified));

    let token = verification_token(&world).expect("verification mail published");
    let verified = service.verify_email(&token).await.unwrap();
    assert!(verified.is_verified);

    let jwt = service.login("ann@example.com", "password123").await.unwrap();
    assert_eq!(decode_token(&jwt, TEST_JWT_SECRET).unwrap(), user.id);

    assert!(world.publisher.events().iter().any(|e| matches!(
        e,
        DomainEvent::SearchIndex(IndexEvent::UpsertUser { name, .. }) if name == "ann"
    )));
}

#[tokio::test]
async fn test_duplicate_email_and_name() {
    let world = World::new();
    let service = auth(&world);
    service
        .register("ann@example.com", "ann", "password123")
        .await
        .unwrap();

    let email = service
        .register("ANN@example.com", "other", "password123")
        .await
        .unwrap_err();
    assert!(matches!(email, AuthError::EmailExists));

    let name = service
        .register("other@example.com", "ann", "password123")
        .await
        .unwrap_err();
    assert!(matches!(name, AuthError::NameExists));
}

#[tokio::test]
async fn test_wrong_password_rejected() {
    let world = World::new();
    let service = auth(&world);
    service
        .register("ann@example.com", "ann", "password123")
        .await
        .unwrap();

    let err = service.login("ann@example.com", "nope-nope").await.unwrap_err();
    assert!(matches!(err, AuthError::InvalidCredentials));

    let unknown = service.login("who@example.com", "password123").await.unwrap_err();
    assert!(matches!(unknown, AuthError::InvalidCredentials));
}

#[tokio::test]
async fn test_verification_token_is_single_use() {
    let world = World::new();
    let service = auth(&world);
    service
        .register("ann@example.com", "ann", "password123")
        .await
        .unwrap();
    let token = verification_token(&world).unwrap();

    service.verify_email(&token).await.unwrap();
    let err = service.verify_email(&token).await.unwrap_err();
    assert!(matches!(err, AuthError::InvalidVerificationToken));
}

#[tokio::test]
async fn test_password_reset_flow() {
    let world = World::new();
    let service = auth(&world);
    let user = service
        .register("ann@example.com", "ann", "password123")
        .await
        .unwrap();
    service
        .verify_email(&verification_token(&world).unwrap())
        .await
        .unwrap();

    service.forgot_password("ann@example.com").await.unwrap();
    let token = reset_token(&world).expect("reset mail published");

    // only the hash is stored
    let stored = world.store.user_row(user.id).unwrap();
    assert_ne!(stored.reset_password_token.as_deref(), Some(token.as_str()));

    service.reset_password(&token, "new-password-1").await.unwrap();
    assert!(service.login("ann@example.com", "new-password-1").await.is_ok());
    assert!(service.login("ann@example.com", "password123").await.is_err());

    let reuse = service.reset_password(&token, "another-one").await.unwrap_err();
    assert!(matches!(reuse, AuthError::InvalidResetToken));
}

#[tokio::test]
async fn test_forgot_password_for_unknown_email_is_silent() {
    let world = World::new();
    auth(&world).forgot_password("ghost@example.com").await.unwrap();
    assert!(reset_token(&world).is_none());
}

#[tokio::test]
async fn test_register_rejects_names_short_after_trimming() {
    let world = World::new();
    let service = auth(&world);

    for name in ["   ", " a "] {
        let err = service
            .register("ann@example.com", name, "password123")
            .await
            .unwrap_err();
        assert!(matches!(
            AppError::from(err),
            AppError::Validation { ref errors, .. } if errors[0].field == "name"
        ));
    }
    assert!(world.publisher.events().is_empty());

    let user = service
        .register("ann@example.com", "  ann  ", "password123")
        .await
        .unwrap();
    assert_eq!(world.store.user_row(user.id).unwrap().name, "ann");
}
