//! Authentication against the catalog service

use regex::Regex;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use tracing::{error, info};

use super::client::HttpCatalogClient;
use crate::error::{Error, Result, ValidationErrors};
use crate::session::Session;

/// Something before and after a single `@`, with a dot in the domain
pub fn is_valid_email(email: &str) -> bool {
    static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("invalid email pattern regex")
    });
    EMAIL_PATTERN.is_match(email)
}

#[derive(Debug, Serialize)]
pub(super) struct LoginRequest<'a> {
    pub email: &'a str,
    pub senha: &'a str,
}

/// Response of the login and register endpoints
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub email: String,
    /// Absent on some register responses
    #[serde(default)]
    pub token: Option<String>,
}

/// New user account
#[derive(Debug, Clone, Serialize)]
pub struct RegisterUser {
    pub nome: String,
    pub email: String,
    pub senha: String,
    pub cargo: String,
}

/// Login, registration and logout, updating the shared session
#[derive(Clone)]
pub struct AuthService {
    client: HttpCatalogClient,
}

impl RegisterUser {
    /// Field problems that stop the account from being sent
    pub fn validate(&self) -> std::result::Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if self.nome.trim().is_empty() {
            errors.add("nome", "name is required");
        }
        if self.email.trim().is_empty() {
            errors.add("email", "email is required");
        } else if !is_valid_email(self.email.trim()) {
            errors.add("email", "email is not a valid address");
        }
        if self.senha.is_empty() {
            errors.add("senha", "password is required");
        }
        errors.into_result()
    }
}

impl AuthService {
    pub fn new(client: HttpCatalogClient) -> Self {
        AuthService { client }
    }

    pub fn session(&self) -> &Session {
        self.client.session()
    }

    /// Log in and store the issued token in the session
    pub async fn login(&self, email: &str, senha: &str) -> Result<()> {
        let response = self.client.login(email, senha).await.map_err(|e| {
            error!("Login failed: {}", e);
            e
        })?;

        let token = response.token.ok_or_else(|| {
            error!("Login response for {} carried no token", response.email);
            Error::InvalidInput("login response carried no token".to_string())
        })?;

        self.session()
            .begin(response.email, SecretString::from(token))
            .await;
        Ok(())
    }

    /// Create an account. The caller logs in separately afterwards.
    pub async fn register(&self, user: &RegisterUser) -> Result<()> {
        user.validate()?;

        self.client.register(user).await.map_err(|e| {
            error!("Registration failed: {}", e);
            e
        })?;
        info!("Registered {}", user.email);
        Ok(())
    }

    pub async fn logout(&self) {
        self.session().clear().await;
    }
}
