//! JSONPlaceholder client

use reqwest::header::CONTENT_TYPE;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;

use practice_qa_common::{
    ApiResponse, Comment, CreatePostRequest, Post, SuiteConfig, UpdatePostRequest, User,
};

use crate::api::validate;
use crate::error::{E2eError, E2eResult};

/// Content type for reads and deletes
pub const JSON: &str = "application/json";

/// Content type for requests carrying a body
pub const JSON_UTF8: &str = "application/json; charset=UTF-8";

/// Body of a successful delete, `{}` on JSONPlaceholder
pub type EmptyBody = serde_json::Map<String, Value>;

/// One method per endpoint of the resource API. Every call returns the
/// response whatever its status; callers assert on `status` and `body`.
#[derive(Debug, Clone)]
pub struct JsonPlaceholderApi {
    client: reqwest::Client,
    base_url: String,
}

impl JsonPlaceholderApi {
    /// Client for the public API with the default command timeout
    pub fn new() -> E2eResult<Self> {
        Self::from_config(&SuiteConfig::default())
    }

    pub fn from_config(config: &SuiteConfig) -> E2eResult<Self> {
        Self::with_base_url(&config.api_base_url, config.command_timeout())
    }

    pub fn with_base_url(base_url: &str, timeout: Duration) -> E2eResult<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET /posts
    pub async fn get_all_posts(&self) -> E2eResult<ApiResponse<Vec<Post>>> {
        self.send(Method::GET, "/posts", &[], None).await
    }

    /// GET /posts/{id}
    pub async fn get_post_by_id(&self, post_id: u64) -> E2eResult<ApiResponse<Post>> {
        self.send(Method::GET, &format!("/posts/{}", post_id), &[], None)
            .await
    }

    /// GET /posts/{id}/comments
    pub async fn get_post_comments(&self, post_id: u64) -> E2eResult<ApiResponse<Vec<Comment>>> {
        self.send(Method::GET, &format!("/posts/{}/comments", post_id), &[], None)
            .await
    }

    /// GET /comments?postId={id}
    pub async fn get_comments_by_post_id(
        &self,
        post_id: u64,
    ) -> E2eResult<ApiResponse<Vec<Comment>>> {
        self.send(
            Method::GET,
            "/comments",
            &[("postId", post_id.to_string())],
            None,
        )
        .await
    }

    /// GET /users/{id}
    pub async fn get_user_by_id(&self, user_id: u64) -> E2eResult<ApiResponse<User>> {
        self.send(Method::GET, &format!("/users/{}", user_id), &[], None)
            .await
    }

    /// POST /posts
    pub async fn create_post(&self, post: &CreatePostRequest) -> E2eResult<ApiResponse<Post>> {
        let body = serde_json::to_value(post)?;
        self.send(Method::POST, "/posts", &[], Some(body)).await
    }

    /// PUT /posts/{id}. The body's id is always the path id, whatever `post.id` holds.
    pub async fn update_post(
        &self,
        post_id: u64,
        post: &UpdatePostRequest,
    ) -> E2eResult<ApiResponse<Post>> {
        let post = UpdatePostRequest {
            id: Some(post_id),
            ..post.clone()
        };
        let body = serde_json::to_value(&post)?;
        self.send(Method::PUT, &format!("/posts/{}", post_id), &[], Some(body))
            .await
    }

    /// PATCH /posts/{id} with only the fields that are set
    pub async fn patch_post(
        &self,
        post_id: u64,
        changes: &UpdatePostRequest,
    ) -> E2eResult<ApiResponse<Post>> {
        let body = serde_json::to_value(changes)?;
        self.send(Method::PATCH, &format!("/posts/{}", post_id), &[], Some(body))
            .await
    }

    /// DELETE /posts/{id}
    pub async fn delete_post(&self, post_id: u64) -> E2eResult<ApiResponse<EmptyBody>> {
        self.send(Method::DELETE, &format!("/posts/{}", post_id), &[], None)
            .await
    }

    /// Check a post's required fields and their types
    pub fn verify_post_structure<T: Serialize>(&self, post: &T) -> E2eResult<()> {
        validate::verify_post_structure(&serde_json::to_value(post)?)
    }

    /// Check a comment's required fields, their types, and the email's `@`
    pub fn verify_comment_structure<T: Serialize>(&self, comment: &T) -> E2eResult<()> {
        validate::verify_comment_structure(&serde_json::to_value(comment)?)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<Value>,
    ) -> E2eResult<ApiResponse<T>> {
        let url = format!("{}{}", self.base_url, path);
        let content_type = if body.is_some() { JSON_UTF8 } else { JSON };

        let mut request = self
            .client
            .request(method.clone(), &url)
            .header(CONTENT_TYPE, content_type);
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(body) = &body {
            request = request.body(serde_json::to_vec(body)?);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                E2eError::RequestTimeout { url: url.clone() }
            } else {
                E2eError::Http(e)
            }
        })?;

        let status = response.status().as_u16();
        let mut headers: HashMap<String, String> = HashMap::new();
        for (name, value) in response.headers() {
            let Ok(value) = value.to_str() else {
                continue;
            };
            headers
                .entry(name.as_str().to_string())
                .and_modify(|joined| {
                    joined.push_str(", ");
                    joined.push_str(value);
                })
                .or_insert_with(|| value.to_string());
        }

        let text = response.text().await.map_err(|e| {
            if e.is_timeout() {
                E2eError::RequestTimeout { url: url.clone() }
            } else {
                E2eError::Http(e)
            }
        })?;
        let raw = if text.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text).unwrap_or(Value::String(text))
        };
        let body = serde_json::from_value::<T>(raw.clone()).ok();

        debug!(
            "{} {} -> {} ({})",
            method,
            url,
            status,
            if body.is_some() { "typed body" } else { "untyped body" }
        );

        Ok(ApiResponse {
            status,
            headers,
            body,
            raw,
        })
    }
}
