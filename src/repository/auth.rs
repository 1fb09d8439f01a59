//! Authentication endpoints

use async_trait::async_trait;
use reqwest::Method;

use crate::{
    error::AppResult,
    models::user::{LoginRequest, RegisterRequest, TokenResponse},
    repository::http::ApiClient,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthApi: Send + Sync {
    /// `POST /auth/login`
    async fn login(&self, credentials: &LoginRequest) -> AppResult<TokenResponse>;

    /// `POST /auth/register`
    async fn register(&self, registration: &RegisterRequest) -> AppResult<()>;
}

#[derive(Clone)]
pub struct AuthRepository {
    client: ApiClient,
}

impl AuthRepository {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl AuthApi for AuthRepository {
    async fn login(&self, credentials: &LoginRequest) -> AppResult<TokenResponse> {
        let request = self
            .client
            .request(Method::POST, &["auth", "login"])
            .json(credentials);
        self.client.send_json(request).await
    }

    async fn register(&self, registration: &RegisterRequest) -> AppResult<()> {
        let request = self
            .client
            .request(Method::POST, &["auth", "register"])
            .json(registration);
        self.client.send_empty(request).await
    }
}
