//! Presentation state for the skill list
//!
//! `SkillBoard` owns the store, the search query and the current page. Views
//! are derived on demand from those three. Remote failures are logged here
//! and reported as `false`; only validation problems reach the caller as
//! errors.

use tracing::{error, warn};

use super::coordinator::MutationCoordinator;
use super::filter;
use super::pagination::{self, DEFAULT_PAGE_SIZE};
use super::store::SkillStore;
use super::types::{PhotoFile, Skill, SkillDraft, SkillFields, SkillId};
use crate::error::{Error, ValidationErrors};

/// One rendered page of the board
#[derive(Debug, Clone, PartialEq)]
pub struct BoardView<'a> {
    /// Skills on the current page
    pub items: Vec<&'a Skill>,
    /// Current page, 1-based
    pub page: usize,
    /// Pages in the filtered view, 0 when nothing matches
    pub page_count: usize,
    /// Skills matching the query
    pub matched: usize,
    /// Skills in the store
    pub total: usize,
}

impl BoardView<'_> {
    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.page_count
    }
}

pub struct SkillBoard {
    store: SkillStore,
    coordinator: MutationCoordinator,
    query: String,
    page: usize,
    page_size: usize,
}

impl SkillBoard {
    pub fn new(coordinator: MutationCoordinator) -> Self {
        Self::with_page_size(coordinator, DEFAULT_PAGE_SIZE)
    }

    pub fn with_page_size(coordinator: MutationCoordinator, page_size: usize) -> Self {
        SkillBoard {
            store: SkillStore::new(),
            coordinator,
            query: String::new(),
            page: 1,
            page_size: page_size.max(1),
        }
    }

    pub fn store(&self) -> &SkillStore {
        &self.store
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Skills matching the current query
    pub fn filtered(&self) -> Vec<&Skill> {
        filter::apply(&self.query, &self.store)
    }

    pub fn page_count(&self) -> usize {
        pagination::page_count(self.filtered().len(), self.page_size)
    }

    /// Derive the current page
    pub fn view(&self) -> BoardView<'_> {
        let filtered = self.filtered();
        BoardView {
            items: pagination::page(&filtered, self.page, self.page_size).to_vec(),
            page: self.page,
            page_count: pagination::page_count(filtered.len(), self.page_size),
            matched: filtered.len(),
            total: self.store.len(),
        }
    }

    /// Load every skill from the service. Keeps the old list on failure.
    pub async fn load(&mut self) -> bool {
        let ok = self
            .store
            .refresh(self.coordinator.service().as_ref())
            .await
            .is_ok();
        self.clamp();
        ok
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
        self.clamp();
    }

    /// Jump to a page, clamped into range
    pub fn go_to(&mut self, page: usize) {
        self.page = pagination::clamp_page(page, self.page_count());
    }

    pub fn next_page(&mut self) -> bool {
        if self.page >= self.page_count() {
            return false;
        }
        self.page += 1;
        true
    }

    pub fn prev_page(&mut self) -> bool {
        if self.page <= 1 {
            return false;
        }
        self.page -= 1;
        true
    }

    /// Create a skill and move to the last page so it is in view.
    ///
    /// Invalid drafts are returned as errors without contacting the
    /// service; remote failures are logged and give `Ok(false)`.
    pub async fn submit_new(&mut self, draft: SkillDraft) -> Result<bool, ValidationErrors> {
        let before = self.store.len();
        let outcome = self.coordinator.create(&mut self.store, draft).await;
        // A failed photo upload still leaves a new skill behind
        if self.store.len() > before {
            self.go_to(self.page_count());
        }
        match outcome {
            Ok(_) => Ok(true),
            Err(Error::Validation(errors)) => Err(errors),
            Err(e) => {
                error!("Could not create skill: {}", e);
                Ok(false)
            }
        }
    }

    pub async fn submit_edit(&mut self, id: SkillId, fields: SkillFields) -> bool {
        let outcome = self.coordinator.edit(&mut self.store, id, fields).await;
        self.clamp();
        self.report("edit skill", outcome.map(|_| ()))
    }

    pub async fn replace_photo(&mut self, id: Option<SkillId>, photo: PhotoFile) -> bool {
        let outcome = self.coordinator.update_photo(&mut self.store, id, photo).await;
        self.report("replace photo", outcome.map(|_| ()))
    }

    pub async fn remove(&mut self, id: SkillId) -> bool {
        let outcome = self.coordinator.delete(&mut self.store, id).await;
        self.clamp();
        self.report("delete skill", outcome)
    }

    fn report(&self, action: &str, outcome: crate::Result<()>) -> bool {
        match outcome {
            Ok(()) => true,
            Err(Error::Validation(errors)) => {
                warn!("Could not {}: {}", action, errors);
                false
            }
            Err(e) => {
                error!("Could not {}: {}", action, e);
                false
            }
        }
    }

    fn clamp(&mut self) {
        self.page = pagination::clamp_page(self.page, self.page_count());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::coordinator::tests::{valid_fields, FakeCatalog};
    use crate::catalog::store::tests::skill;
    use crate::error::Operation;
    use std::sync::Arc;

    fn numbered(count: i64) -> Vec<Skill> {
        (1..=count)
            .map(|id| skill(id, if id % 2 == 0 { "React" } else { "Java" }))
            .collect()
    }

    async fn loaded(skills: Vec<Skill>) -> (Arc<FakeCatalog>, SkillBoard) {
        let fake = Arc::new(FakeCatalog::with_skills(skills));
        let mut board = SkillBoard::new(MutationCoordinator::new(fake.clone()));
        assert!(board.load().await);
        (fake, board)
    }

    fn ids(view: &BoardView<'_>) -> Vec<SkillId> {
        view.items.iter().map(|s| s.id).collect()
    }

    #[tokio::test]
    async fn test_nine_skills_first_page() {
        let (_fake, board) = loaded(numbered(9)).await;
        let view = board.view();
        assert_eq!(ids(&view), (1..=8).collect::<Vec<_>>());
        assert_eq!(view.page_count, 2);
        assert!(view.has_next());
        assert!(!view.has_prev());
    }

    #[tokio::test]
    async fn test_narrowing_query_clamps_page() {
        let (_fake, mut board) = loaded(numbered(20)).await;
        board.go_to(3);
        assert_eq!(board.page(), 3);

        // 10 React skills -> 2 pages
        board.set_query("react");
        assert_eq!(board.page(), 2);
        assert_eq!(board.view().matched, 10);

        board.set_query("python");
        let view = board.view();
        assert_eq!(view.page, 1);
        assert_eq!(view.page_count, 0);
        assert!(view.items.is_empty());
    }

    #[tokio::test]
    async fn test_navigation_stops_at_edges() {
        let (_fake, mut board) = loaded(numbered(9)).await;
        assert!(!board.prev_page());
        assert!(board.next_page());
        assert!(!board.next_page());
        assert_eq!(board.view().items.len(), 1);
        board.go_to(99);
        assert_eq!(board.page(), 2);
    }

    #[tokio::test]
    async fn test_failed_load_keeps_list() {
        let (fake, mut board) = loaded(numbered(3)).await;
        fake.fail(Operation::ListSkills);
        assert!(!board.load().await);
        assert_eq!(board.store().len(), 3);
    }

    #[tokio::test]
    async fn test_submit_new_moves_to_page_with_new_skill() {
        let (_fake, mut board) = loaded(numbered(8)).await;
        board.set_query("java");

        assert_eq!(board.submit_new(SkillDraft::new(valid_fields())).await, Ok(true));

        let view = board.view();
        assert!(view.items.iter().any(|s| s.id == 9));
        assert_eq!(view.page, view.page_count);
    }

    #[tokio::test]
    async fn test_submit_new_surfaces_validation() {
        let (fake, mut board) = loaded(numbered(2)).await;
        let mut fields = valid_fields();
        fields.name.clear();

        let errors = board.submit_new(SkillDraft::new(fields)).await.unwrap_err();
        assert!(errors.contains("nome"));
        assert_eq!(fake.calls(), vec![Operation::ListSkills]);
    }

    #[tokio::test]
    async fn test_remote_failures_become_false() {
        let (fake, mut board) = loaded(numbered(5)).await;
        fake.fail(Operation::DeleteSkill);
        fake.fail(Operation::CreateSkill);

        assert!(!board.remove(5).await);
        assert!(board.store().contains(5));
        assert_eq!(board.submit_new(SkillDraft::new(valid_fields())).await, Ok(false));
        assert!(!board.replace_photo(None, PhotoFile::new("a.png", vec![1])).await);
    }

    #[tokio::test]
    async fn test_delete_last_item_on_page_clamps() {
        let (_fake, mut board) = loaded(numbered(9)).await;
        board.go_to(2);
        assert!(board.remove(9).await);
        assert_eq!(board.page(), 1);
        assert_eq!(board.view().page_count, 1);
    }

    #[tokio::test]
    async fn test_edit_moves_skill_out_of_filter() {
        let (_fake, mut board) = loaded(numbered(3)).await;
        board.set_query("react");
        assert_eq!(board.view().matched, 1);

        assert!(board.submit_edit(2, valid_fields()).await);
        assert_eq!(board.view().matched, 0);
        assert_eq!(board.store().get(2).unwrap().technology, "Java");
    }
}
