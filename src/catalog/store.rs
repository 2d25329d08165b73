//! In-memory skill collection for the current session

use tracing::{debug, error};

use super::types::{Skill, SkillId};
use crate::api::CatalogService;
use crate::error::Result;

/// Skills in the order the catalog service returned them.
///
/// Identifiers are unique within the store.
#[derive(Debug, Clone, Default)]
pub struct SkillStore {
    skills: Vec<Skill>,
}

impl SkillStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from a list, keeping the first entry for a repeated id
    pub fn from_skills(skills: Vec<Skill>) -> Self {
        let mut store = Self::new();
        store.replace_all(skills);
        store
    }

    /// Reload every skill from the service.
    ///
    /// On failure the current contents are kept and the error is logged and
    /// returned.
    pub async fn refresh(&mut self, service: &dyn CatalogService) -> Result<usize> {
        match service.list_skills().await {
            Ok(skills) => {
                self.replace_all(skills);
                debug!("Skill store refreshed with {} skills", self.skills.len());
                Ok(self.skills.len())
            }
            Err(e) => {
                error!("Failed to refresh skills: {}", e);
                Err(e)
            }
        }
    }

    /// Swap in a new collection wholesale
    pub fn replace_all(&mut self, skills: Vec<Skill>) {
        let mut unique: Vec<Skill> = Vec::with_capacity(skills.len());
        for skill in skills {
            if unique.iter().any(|s| s.id == skill.id) {
                debug!("Dropping duplicate skill id {} from listing", skill.id);
                continue;
            }
            unique.push(skill);
        }
        self.skills = unique;
    }

    /// Replace the entry with the same id in place, or append
    pub fn upsert(&mut self, skill: Skill) {
        match self.skills.iter_mut().find(|s| s.id == skill.id) {
            Some(existing) => *existing = skill,
            None => self.skills.push(skill),
        }
    }

    /// Remove the entry with this id. Returns it if it was present.
    pub fn remove(&mut self, id: SkillId) -> Option<Skill> {
        let index = self.skills.iter().position(|s| s.id == id)?;
        Some(self.skills.remove(index))
    }

    pub fn get(&self, id: SkillId) -> Option<&Skill> {
        self.skills.iter().find(|s| s.id == id)
    }

    pub fn contains(&self, id: SkillId) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.skills.len()
    }

    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
    }

    pub fn as_slice(&self) -> &[Skill] {
        &self.skills
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Skill> {
        self.skills.iter()
    }
}

impl<'a> IntoIterator for &'a SkillStore {
    type Item = &'a Skill;
    type IntoIter = std::slice::Iter<'a, Skill>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::api::CatalogService;
    use crate::catalog::{PhotoFile, SkillFields};
    use crate::error::{Error, Operation, RemoteError};
    use async_trait::async_trait;

    pub(crate) fn skill(id: SkillId, technology: &str) -> Skill {
        Skill {
            id,
            name: "Desenvolvedor Backend".to_string(),
            description: "Desenvolvedor API".to_string(),
            technology: technology.to_string(),
            level: "Básico".to_string(),
            photo: None,
        }
    }

    struct FixedListing(Option<Vec<Skill>>);

    #[async_trait]
    impl CatalogService for FixedListing {
        async fn list_skills(&self) -> Result<Vec<Skill>> {
            self.0
                .clone()
                .ok_or_else(|| RemoteError::status(Operation::ListSkills, 503, "down").into())
        }
        async fn create_skill(&self, _: &SkillFields) -> Result<Skill> {
            unreachable!()
        }
        async fn update_skill(&self, _: SkillId, _: &SkillFields) -> Result<Option<Skill>> {
            unreachable!()
        }
        async fn delete_skill(&self, _: SkillId) -> Result<()> {
            unreachable!()
        }
        async fn upload_photo(&self, _: SkillId, _: &PhotoFile) -> Result<Skill> {
            unreachable!()
        }
    }

    #[test]
    fn test_upsert_replaces_in_place() {
        let mut store = SkillStore::from_skills(vec![skill(1, "Java"), skill(2, "React")]);

        store.upsert(skill(1, "SQL"));
        assert_eq!(store.len(), 2);
        assert_eq!(store.as_slice()[0].technology, "SQL");
        assert_eq!(store.iter().filter(|s| s.id == 1).count(), 1);

        store.upsert(skill(3, "Node.js"));
        assert_eq!(store.len(), 3);
        assert_eq!(store.as_slice()[2].id, 3);
    }

    #[test]
    fn test_remove_is_idempotent() {
        let mut store = SkillStore::from_skills(vec![skill(1, "Java"), skill(5, "React")]);

        assert_eq!(store.remove(5).map(|s| s.id), Some(5));
        assert!(!store.contains(5));
        assert!(store.remove(5).is_none());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_listing_duplicates_are_dropped() {
        let store = SkillStore::from_skills(vec![skill(1, "Java"), skill(1, "React")]);
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(1).unwrap().technology, "Java");
    }

    #[tokio::test]
    async fn test_refresh_replaces_contents() {
        let mut store = SkillStore::from_skills(vec![skill(9, "Java")]);
        let service = FixedListing(Some(vec![skill(1, "React"), skill(2, "SQL")]));

        assert_eq!(store.refresh(&service).await.unwrap(), 2);
        assert!(!store.contains(9));
        assert_eq!(store.as_slice()[1].id, 2);
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_contents() {
        let mut store = SkillStore::from_skills(vec![skill(9, "Java")]);
        let err = store.refresh(&FixedListing(None)).await.unwrap_err();

        assert!(matches!(err, Error::Fetch(_)));
        assert_eq!(store.len(), 1);
        assert!(store.contains(9));
    }
}
