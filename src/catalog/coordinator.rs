//! Write-through mutations
//!
//! Every operation calls the catalog service first and touches the local
//! store only after the service confirmed the change.

use std::sync::Arc;
use tracing::{debug, info, warn};

use super::store::SkillStore;
use super::types::{PhotoFile, Skill, SkillDraft, SkillFields, SkillId};
use crate::api::CatalogService;
use crate::error::{Error, Result, ValidationErrors};

/// Runs create, edit, photo and delete requests and reconciles the store
#[derive(Clone)]
pub struct MutationCoordinator {
    service: Arc<dyn CatalogService>,
}

impl MutationCoordinator {
    pub fn new(service: Arc<dyn CatalogService>) -> Self {
        MutationCoordinator { service }
    }

    pub fn service(&self) -> &Arc<dyn CatalogService> {
        &self.service
    }

    /// Create a skill, then upload its photo if the draft has one.
    ///
    /// If the photo upload fails the created skill stays in the store
    /// without a photo and the upload error is returned.
    pub async fn create(&self, store: &mut SkillStore, draft: SkillDraft) -> Result<Skill> {
        draft.fields.validate()?;

        let created = self.service.create_skill(&draft.fields).await?;
        info!("Created skill {} ({})", created.id, created.name);
        store.upsert(created.clone());

        let Some(photo) = draft.photo else {
            return Ok(created);
        };

        match self.service.upload_photo(created.id, &photo).await {
            Ok(with_photo) => {
                store.upsert(with_photo.clone());
                Ok(with_photo)
            }
            Err(e) => {
                warn!(
                    "Skill {} was created but its photo upload failed: {}",
                    created.id, e
                );
                Err(e)
            }
        }
    }

    /// Replace the four editable fields of a skill
    pub async fn edit(
        &self,
        store: &mut SkillStore,
        id: SkillId,
        fields: SkillFields,
    ) -> Result<Skill> {
        let returned = self.service.update_skill(id, &fields).await?;

        let updated = match returned {
            Some(skill) => skill,
            None => {
                debug!("Update of skill {} returned no body, merging locally", id);
                match store.get(id) {
                    Some(existing) => existing.with_fields(fields),
                    None => Skill {
                        id,
                        name: fields.name,
                        description: fields.description,
                        technology: fields.technology,
                        level: fields.level,
                        photo: None,
                    },
                }
            }
        };

        store.upsert(updated.clone());
        info!("Updated skill {}", id);
        Ok(updated)
    }

    /// Upload a new photo for an existing skill
    pub async fn update_photo(
        &self,
        store: &mut SkillStore,
        id: Option<SkillId>,
        photo: PhotoFile,
    ) -> Result<Skill> {
        let id = match id {
            Some(id) if id != 0 => id,
            _ => {
                let mut errors = ValidationErrors::new();
                errors.add("id", "a skill id is required to upload a photo");
                return Err(Error::Validation(errors));
            }
        };

        let updated = self.service.upload_photo(id, &photo).await?;
        store.upsert(updated.clone());
        info!("Replaced photo of skill {}", id);
        Ok(updated)
    }

    /// Delete a skill; the local entry goes only after the service confirms
    pub async fn delete(&self, store: &mut SkillStore, id: SkillId) -> Result<()> {
        self.service.delete_skill(id).await?;
        store.remove(id);
        info!("Deleted skill {}", id);
        Ok(())
    }
}
