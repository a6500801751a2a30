//! Feed and per-user post lists, with like and comment bookkeeping.
//!
//! A post can appear in both lists at once; every mutation is applied to
//! each copy.

use super::api::{ApiClient, ClientError};
use crate::application::dto::request::{CreatePostRequest, PageQuery, UpdatePostRequest};
use crate::application::dto::response::{CommentResponse, LikeResponse, PostResponse};

#[derive(Debug, Clone, Default)]
pub struct PostsStore {
    pub posts: Vec<PostResponse>,
    pub user_posts: Vec<PostResponse>,
    pub is_loading: bool,
    pub error: Option<String>,
}

/// Like state before an optimistic toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LikeSnapshot {
    pub post_id: i64,
    pub liked: bool,
    pub likes_count: i32,
}

impl PostsStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn post(&self, post_id: i64) -> Option<&PostResponse> {
        self.posts.iter().find(|p| p.id == post_id)
    }

    pub fn user_post(&self, post_id: i64) -> Option<&PostResponse> {
        self.user_posts.iter().find(|p| p.id == post_id)
    }

    fn copies_mut(&mut self, post_id: i64) -> impl Iterator<Item = &mut PostResponse> {
        self.posts
            .iter_mut()
            .chain(self.user_posts.iter_mut())
            .filter(move |p| p.id == post_id)
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    fn fail(&mut self, error: &ClientError) {
        self.error = Some(error.to_string());
    }

    // Local mutations

    /// New post goes to the top of the feed.
    pub fn insert_post(&mut self, post: PostResponse) {
        self.posts.insert(0, post);
    }

    pub fn replace_post(&mut self, post: &PostResponse) {
        for existing in self.copies_mut(post.id) {
            *existing = post.clone();
        }
    }

    pub fn drop_post(&mut self, post_id: i64) {
        self.posts.retain(|p| p.id != post_id);
        self.user_posts.retain(|p| p.id != post_id);
    }

    pub fn set_like_state(&mut self, post_id: i64, liked: bool, likes_count: i32) {
        for post in self.copies_mut(post_id) {
            post.is_liked = liked;
            post.likes_count = likes_count;
        }
    }

    /// Flip the like locally and return the state to restore if the server
    /// rejects it. `None` when the post is not loaded.
    pub fn begin_like_toggle(&mut self, post_id: i64) -> Option<LikeSnapshot> {
        let current = self.post(post_id).or_else(|| self.user_post(post_id))?;
        let snapshot = LikeSnapshot {
            post_id,
            liked: current.is_liked,
            likes_count: current.likes_count,
        };

        let count = if snapshot.liked {
            (snapshot.likes_count - 1).max(0)
        } else {
            snapshot.likes_count + 1
        };
        self.set_like_state(post_id, !snapshot.liked, count);
        Some(snapshot)
    }

    /// Settle an optimistic toggle: keep the server's numbers, or put the
    /// snapshot back.
    pub fn finish_like_toggle(
        &mut self,
        snapshot: Option<LikeSnapshot>,
        post_id: i64,
        outcome: &Result<LikeResponse, ClientError>,
    ) {
        match (outcome, snapshot) {
            (Ok(response), _) => self.set_like_state(post_id, response.liked, response.likes_count),
            (Err(e), Some(previous)) => {
                self.set_like_state(previous.post_id, previous.liked, previous.likes_count);
                self.fail(e);
            }
            (Err(e), None) => self.fail(e),
        }
    }

    /// Adjust the comment counter of a post, never going below zero.
    pub fn adjust_comments(&mut self, post_id: i64, delta: i32) {
        for post in self.copies_mut(post_id) {
            post.comments_count = (post.comments_count + delta).max(0);
        }
    }

    // Actions

    pub async fn fetch_posts(&mut self, client: &ApiClient) {
        self.is_loading = true;
        self.error = None;
        match client.feed(&PageQuery::default()).await {
            Ok(posts) => self.posts = posts,
            Err(e) => {
                tracing::error!(error = %e, "Error fetching posts");
                self.fail(&e);
            }
        }
        self.is_loading = false;
    }

    /// Reload the feed without touching the loading flag or error.
    pub async fn refresh_posts(&mut self, client: &ApiClient) {
        match client.feed(&PageQuery::default()).await {
            Ok(posts) => self.posts = posts,
            Err(e) => tracing::warn!(error = %e, "Silent feed refresh failed"),
        }
    }

    pub async fn fetch_user_posts(&mut self, client: &ApiClient, user_id: i64) {
        self.is_loading = true;
        self.error = None;
        match client.user_posts(user_id).await {
            Ok(posts) => self.user_posts = posts,
            Err(e) => {
                tracing::error!(error = %e, user_id, "Error fetching user posts");
                self.fail(&e);
            }
        }
        self.is_loading = false;
    }

    pub async fn add_post(
        &mut self,
        client: &ApiClient,
        body: &CreatePostRequest,
    ) -> Result<PostResponse, ClientError> {
        match client.create_post(body).await {
            Ok(post) => {
                self.insert_post(post.clone());
                Ok(post)
            }
            Err(e) => {
                self.fail(&e);
                Err(e)
            }
        }
    }

    pub async fn update_post(
        &mut self,
        client: &ApiClient,
        post_id: i64,
        body: &UpdatePostRequest,
    ) -> Result<PostResponse, ClientError> {
        match client.update_post(post_id, body).await {
            Ok(post) => {
                self.replace_post(&post);
                Ok(post)
            }
            Err(e) => {
                self.fail(&e);
                Err(e)
            }
        }
    }

    pub async fn remove_post(&mut self, client: &ApiClient, post_id: i64) -> Result<(), ClientError> {
        match client.delete_post(post_id).await {
            Ok(()) => {
                self.drop_post(post_id);
                Ok(())
            }
            Err(e) => {
                self.fail(&e);
                Err(e)
            }
        }
    }

    /// Optimistic like toggle, reverted when the request fails.
    pub async fn toggle_like(
        &mut self,
        client: &ApiClient,
        post_id: i64,
    ) -> Result<LikeResponse, ClientError> {
        let snapshot = self.begin_like_toggle(post_id);
        let outcome = client.toggle_like(post_id).await;
        self.finish_like_toggle(snapshot, post_id, &outcome);
        outcome
    }

    pub async fn comments(
        &mut self,
        client: &ApiClient,
        post_id: i64,
    ) -> Result<Vec<CommentResponse>, ClientError> {
        client.comments(post_id).await.inspect_err(|e| self.fail(e))
    }

    pub async fn add_comment(
        &mut self,
        client: &ApiClient,
        post_id: i64,
        content: &str,
    ) -> Result<CommentResponse, ClientError> {
        let comment = client
            .create_comment(post_id, content)
            .await
            .inspect_err(|e| self.fail(e))?;
        self.adjust_comments(post_id, 1);
        Ok(comment)
    }

    pub async fn remove_comment(
        &mut self,
        client: &ApiClient,
        comment_id: i64,
        post_id: i64,
    ) -> Result<(), ClientError> {
        client
            .delete_comment(comment_id)
            .await
            .inspect_err(|e| self.fail(e))?;
        self.adjust_comments(post_id, -1);
        Ok(())
    }
}
