//! Skill catalog state
//!
//! Data flows one way: the catalog service fills the `SkillStore`, `filter`
//! derives the matching subset, `pagination` slices it into pages. The
//! `MutationCoordinator` writes to the service before touching the store, and
//! `SkillBoard` ties all of it together for a front end.

pub mod board;
pub mod coordinator;
pub mod filter;
pub mod pagination;
pub mod store;
pub mod types;

pub use board::{BoardView, SkillBoard};
pub use coordinator::MutationCoordinator;
pub use pagination::DEFAULT_PAGE_SIZE;
pub use store::SkillStore;
pub use types::{
    PhotoFile, Skill, SkillDraft, SkillFields, SkillId, SKILL_DESCRIPTIONS, SKILL_LEVELS,
    SKILL_NAMES, SKILL_TECHNOLOGIES,
};
