//! Catalog service access
//!
//! - `CatalogService`: the operations the rest of the crate needs from the
//!   remote catalog
//! - `HttpCatalogClient`: reqwest implementation with bearer authorization
//! - `AuthService`: login, registration and logout against the same API

mod auth;
mod client;

pub use auth::{is_valid_email, AuthService, LoginResponse, RegisterUser};
pub use client::HttpCatalogClient;

use async_trait::async_trait;

use crate::catalog::{PhotoFile, Skill, SkillFields, SkillId};
use crate::error::Result;

/// Remote source of truth for skill records.
///
/// Failures are reported as `Error::Remote`, except `list_skills`, which
/// reports `Error::Fetch`.
#[async_trait]
pub trait CatalogService: Send + Sync {
    /// Every skill, in the order the service returns them
    async fn list_skills(&self) -> Result<Vec<Skill>>;

    /// Create a skill; the service assigns its identifier
    async fn create_skill(&self, fields: &SkillFields) -> Result<Skill>;

    /// Replace the editable fields of a skill.
    ///
    /// Returns `None` when the service acknowledges without a body.
    async fn update_skill(&self, id: SkillId, fields: &SkillFields) -> Result<Option<Skill>>;

    async fn delete_skill(&self, id: SkillId) -> Result<()>;

    /// Upload or replace a skill's photo, returning the updated record
    async fn upload_photo(&self, id: SkillId, photo: &PhotoFile) -> Result<Skill>;
}
