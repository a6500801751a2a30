//! API Client
//!
//! Thin typed wrapper over the REST API. Every request carries the bearer
//! token when one is set.

use reqwest::{Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::application::dto::request::{
    CreateCommentRequest, CreatePostRequest, ForgotPasswordRequest, LoginRequest, PageQuery,
    RegisterRequest, ResetPasswordRequest, SendMessageRequest, StartConversationRequest,
    UpdatePostRequest, UpdateProfileRequest, VerifyEmailRequest,
};
use crate::application::dto::response::{
    ChatMessageResponse, CommentResponse, ConversationResponse, CountResponse,
    FollowToggleResponse, LikeResponse, MarkAllReadResponse, MessageResponse,
    NotificationResponse, PostResponse, ProfileResponse, PublicProfileResponse,
    RegisterResponse, StickersResponse, TokenResponse,
};
use crate::domain::UserSummary;

/// Client-side errors
#[derive(Debug, Error)]
pub enum ClientError {
    /// The server answered with a non-success status
    #[error("{message}")]
    Api { status: StatusCode, message: String },

    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),
}

impl ClientError {
    /// HTTP status of an API error
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            ClientError::Http(e) => e.status(),
        }
    }

    /// Login was refused because the account is not verified yet
    pub fn is_email_not_verified(&self) -> bool {
        matches!(self, ClientError::Api { message, .. } if message.contains("verify your email"))
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// Message to surface for a failed response: the server's `message` field
/// when present, otherwise the status reason.
pub(crate) fn error_message(status: StatusCode, body: &[u8]) -> String {
    serde_json::from_slice::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("Request failed")
                .to_string()
        })
}

/// Typed client for the LinkMe API
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_http(reqwest::Client::new(), base_url)
    }

    /// Reuse an existing `reqwest::Client`
    pub fn with_http(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.http.request(method, format!("{}{}", self.base_url, path));
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn execute(builder: RequestBuilder) -> Result<reqwest::Response, ClientError> {
        let response = builder.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.bytes().await?;
        let message = error_message(status, &body);
        tracing::debug!(status = %status, message = %message, "API request failed");
        Err(ClientError::Api { status, message })
    }

    async fn fetch<T: DeserializeOwned>(builder: RequestBuilder) -> Result<T, ClientError> {
        Ok(Self::execute(builder).await?.json::<T>().await?)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        Self::fetch(self.request(Method::GET, path)).await
    }

    async fn send_json<B, T>(&self, method: Method, path: &str, body: &B) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        Self::fetch(self.request(method, path).json(body)).await
    }

    async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        Self::fetch(self.request(Method::POST, path)).await
    }

    async fn no_content(&self, method: Method, path: &str) -> Result<(), ClientError> {
        Self::execute(self.request(method, path)).await?;
        Ok(())
    }

    // Auth

    pub async fn register(&self, body: &RegisterRequest) -> Result<RegisterResponse, ClientError> {
        self.send_json(Method::POST, "/api/user/register", body).await
    }

    pub async fn verify_email(&self, token: &str) -> Result<MessageResponse, ClientError> {
        let body = VerifyEmailRequest {
            token: token.to_string(),
        };
        self.send_json(Method::POST, "/api/user/verify", &body).await
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<TokenResponse, ClientError> {
        let body = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        self.send_json(Method::POST, "/api/login_check", &body).await
    }

    pub async fn forgot_password(&self, email: &str) -> Result<MessageResponse, ClientError> {
        let body = ForgotPasswordRequest {
            email: email.to_string(),
        };
        self.send_json(Method::POST, "/api/user/forgot-password", &body)
            .await
    }

    pub async fn reset_password(
        &self,
        token: &str,
        password: &str,
    ) -> Result<MessageResponse, ClientError> {
        let body = ResetPasswordRequest {
            token: token.to_string(),
            password: password.to_string(),
        };
        self.send_json(Method::POST, "/api/user/reset-password", &body)
            .await
    }

    // Users

    pub async fn profile(&self) -> Result<ProfileResponse, ClientError> {
        self.get("/api/user/profile").await
    }

    pub async fn update_profile(
        &self,
        body: &UpdateProfileRequest,
    ) -> Result<ProfileResponse, ClientError> {
        self.send_json(Method::PUT, "/api/user/profile", body).await
    }

    pub async fn search_users(&self, query: &str) -> Result<Vec<UserSummary>, ClientError> {
        Self::fetch(
            self.request(Method::GET, "/api/users/search")
                .query(&[("q", query)]),
        )
        .await
    }

    /// `user` is either a numeric id or a display name.
    pub async fn public_profile(&self, user: &str) -> Result<PublicProfileResponse, ClientError> {
        self.get(&profile_path(user)).await
    }

    pub async fn toggle_follow(&self, user_id: i64) -> Result<FollowToggleResponse, ClientError> {
        self.post_empty(&format!("/api/users/{user_id}/follow")).await
    }

    pub async fn followers(&self, user_id: i64) -> Result<Vec<UserSummary>, ClientError> {
        self.get(&format!("/api/users/{user_id}/followers")).await
    }

    pub async fn following(&self, user_id: i64) -> Result<Vec<UserSummary>, ClientError> {
        self.get(&format!("/api/users/{user_id}/following")).await
    }

    pub async fn my_followings(&self) -> Result<Vec<UserSummary>, ClientError> {
        self.get("/api/user/followings").await
    }

    // Posts

    pub async fn feed(&self, page: &PageQuery) -> Result<Vec<PostResponse>, ClientError> {
        Self::fetch(self.request(Method::GET, "/api/posts").query(page)).await
    }

    pub async fn create_post(&self, body: &CreatePostRequest) -> Result<PostResponse, ClientError> {
        self.send_json(Method::POST, "/api/posts", body).await
    }

    pub async fn post(&self, post_id: i64) -> Result<PostResponse, ClientError> {
        self.get(&format!("/api/posts/{post_id}")).await
    }

    pub async fn update_post(
        &self,
        post_id: i64,
        body: &UpdatePostRequest,
    ) -> Result<PostResponse, ClientError> {
        self.send_json(Method::PUT, &format!("/api/posts/{post_id}"), body)
            .await
    }

    pub async fn delete_post(&self, post_id: i64) -> Result<(), ClientError> {
        self.no_content(Method::DELETE, &format!("/api/posts/{post_id}"))
            .await
    }

    pub async fn user_posts(&self, user_id: i64) -> Result<Vec<PostResponse>, ClientError> {
        self.get(&format!("/api/posts/user/{user_id}")).await
    }

    pub async fn toggle_like(&self, post_id: i64) -> Result<LikeResponse, ClientError> {
        self.post_empty(&format!("/api/posts/{post_id}/like")).await
    }

    pub async fn like_status(&self, post_id: i64) -> Result<LikeResponse, ClientError> {
        self.get(&format!("/api/posts/{post_id}/like")).await
    }

    pub async fn likers(&self, post_id: i64) -> Result<Vec<UserSummary>, ClientError> {
        self.get(&format!("/api/posts/{post_id}/likes")).await
    }

    pub async fn comments(&self, post_id: i64) -> Result<Vec<CommentResponse>, ClientError> {
        self.get(&format!("/api/posts/{post_id}/comments")).await
    }

    pub async fn create_comment(
        &self,
        post_id: i64,
        content: &str,
    ) -> Result<CommentResponse, ClientError> {
        let body = CreateCommentRequest {
            content: content.to_string(),
        };
        self.send_json(Method::POST, &format!("/api/posts/{post_id}/comments"), &body)
            .await
    }

    pub async fn delete_comment(&self, comment_id: i64) -> Result<(), ClientError> {
        self.no_content(Method::DELETE, &format!("/api/comments/{comment_id}"))
            .await
    }

    // Notifications

    pub async fn notifications(&self) -> Result<Vec<NotificationResponse>, ClientError> {
        self.get("/api/notifications").await
    }

    pub async fn unread_notifications(&self) -> Result<CountResponse, ClientError> {
        self.get("/api/notifications/unread-count").await
    }

    pub async fn mark_all_notifications_read(&self) -> Result<MarkAllReadResponse, ClientError> {
        self.post_empty("/api/notifications/mark-all-read").await
    }

    // Chat

    pub async fn conversations(&self) -> Result<Vec<ConversationResponse>, ClientError> {
        self.get("/api/chat/conversations").await
    }

    pub async fn start_conversation(
        &self,
        user_id: i64,
    ) -> Result<ConversationResponse, ClientError> {
        let body = StartConversationRequest { user_id };
        self.send_json(Method::POST, "/api/chat/conversations", &body)
            .await
    }

    pub async fn messages(
        &self,
        conversation_id: i64,
        page: &PageQuery,
    ) -> Result<Vec<ChatMessageResponse>, ClientError> {
        let path = format!("/api/chat/conversations/{conversation_id}/messages");
        Self::fetch(self.request(Method::GET, &path).query(page)).await
    }

    pub async fn send_message(
        &self,
        conversation_id: i64,
        body: &SendMessageRequest,
    ) -> Result<ChatMessageResponse, ClientError> {
        let path = format!("/api/chat/conversations/{conversation_id}/messages");
        self.send_json(Method::POST, &path, body).await
    }

    pub async fn mark_conversation_read(&self, conversation_id: i64) -> Result<(), ClientError> {
        let path = format!("/api/chat/conversations/{conversation_id}/read");
        self.no_content(Method::POST, &path).await
    }

    pub async fn chat_unread(&self) -> Result<CountResponse, ClientError> {
        self.get("/api/chat/unread-count").await
    }

    pub async fn stickers(&self) -> Result<StickersResponse, ClientError> {
        self.get("/api/chat/stickers").await
    }

    /// Presence heartbeat
    pub async fn update_online_status(&self) -> Result<(), ClientError> {
        self.no_content(Method::POST, "/api/chat/online-status")
            .await
    }
}

fn profile_path(user: &str) -> String {
    format!("/api/users/{}", urlencoding::encode(user))
}
