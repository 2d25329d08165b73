//! Skill records and the payloads used to create and edit them

use base64::Engine;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Error, Result, ValidationErrors};

/// Skill names offered when creating or editing a skill
pub const SKILL_NAMES: &[&str] = &[
    "Desenvolvedor Backend",
    "Desenvolvedor FrontEnd",
    "Desenvolvedor FullStack",
];

/// Skill descriptions offered when creating or editing a skill
pub const SKILL_DESCRIPTIONS: &[&str] = &[
    "Desenvolvedor API",
    " Designer UI/UX",
    "Desing de Banco de Dados",
];

/// Technologies offered when creating or editing a skill
pub const SKILL_TECHNOLOGIES: &[&str] = &["Java", "React", "Node.js", "SQL"];

/// Levels offered when creating or editing a skill
pub const SKILL_LEVELS: &[&str] = &["Básico", "Intermediário", "Avançado"];

/// Identifier assigned by the catalog service
pub type SkillId = i64;

/// A skill record as held by the catalog service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Skill {
    pub id: SkillId,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "descricao")]
    pub description: String,
    #[serde(rename = "tecnologia")]
    pub technology: String,
    #[serde(rename = "nivel")]
    pub level: String,
    /// Base64-encoded image
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
}

impl Skill {
    /// The four editable fields of this skill
    pub fn fields(&self) -> SkillFields {
        SkillFields {
            name: self.name.clone(),
            description: self.description.clone(),
            technology: self.technology.clone(),
            level: self.level.clone(),
        }
    }

    /// Copy of this skill with its editable fields replaced
    pub fn with_fields(&self, fields: SkillFields) -> Skill {
        Skill {
            id: self.id,
            name: fields.name,
            description: fields.description,
            technology: fields.technology,
            level: fields.level,
            photo: self.photo.clone(),
        }
    }

    /// Decode the stored photo, if any
    pub fn photo_bytes(&self) -> Result<Option<Vec<u8>>> {
        match self.photo.as_deref() {
            None | Some("") => Ok(None),
            Some(encoded) => base64::engine::general_purpose::STANDARD
                .decode(encoded.trim())
                .map(Some)
                .map_err(|e| Error::InvalidInput(format!("photo is not valid base64: {}", e))),
        }
    }
}

/// The four editable fields, as sent to the catalog service
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillFields {
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "descricao")]
    pub description: String,
    #[serde(rename = "tecnologia")]
    pub technology: String,
    #[serde(rename = "nivel")]
    pub level: String,
}

impl SkillFields {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        technology: impl Into<String>,
        level: impl Into<String>,
    ) -> Self {
        SkillFields {
            name: name.into(),
            description: description.into(),
            technology: technology.into(),
            level: level.into(),
        }
    }

    /// Check that every required field is filled in.
    ///
    /// Errors are keyed by the service's field names (`nome`, `descricao`,
    /// `tecnologia`, `nivel`).
    pub fn validate(&self) -> std::result::Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if self.name.trim().is_empty() {
            errors.add("nome", "name is required");
        }
        if self.description.trim().is_empty() {
            errors.add("descricao", "description is required");
        }
        if self.technology.trim().is_empty() {
            errors.add("tecnologia", "technology is required");
        }
        if self.level.trim().is_empty() {
            errors.add("nivel", "level is required");
        }
        errors.into_result()
    }
}

/// Body of an update request: the editable fields plus the identifier
#[derive(Debug, Clone, Serialize)]
pub(crate) struct SkillUpdate<'a> {
    pub id: SkillId,
    #[serde(flatten)]
    pub fields: &'a SkillFields,
}

/// Image bytes to attach to a skill
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl PhotoFile {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let file_name = file_name.into();
        let content_type = content_type_for(&file_name).to_string();
        PhotoFile {
            file_name,
            content_type,
            bytes,
        }
    }

    /// Read an image from disk
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        if bytes.is_empty() {
            return Err(Error::InvalidInput(format!(
                "photo file {} is empty",
                path.display()
            )));
        }
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("photo")
            .to_string();
        Ok(PhotoFile::new(file_name, bytes))
    }
}

fn content_type_for(file_name: &str) -> &'static str {
    let ext = Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase());

    match ext.as_deref() {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("bmp") => "image/bmp",
        _ => "application/octet-stream",
    }
}

/// A skill to be created, with an optional photo uploaded afterwards
#[derive(Debug, Clone, Default)]
pub struct SkillDraft {
    pub fields: SkillFields,
    pub photo: Option<PhotoFile>,
}

impl SkillDraft {
    pub fn new(fields: SkillFields) -> Self {
        SkillDraft {
            fields,
            photo: None,
        }
    }

    pub fn with_photo(mut self, photo: PhotoFile) -> Self {
        self.photo = Some(photo);
        self
    }
}
