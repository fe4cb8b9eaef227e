// src/types/response.rs
//! Request and response shapes for the remote resume service.
//!
//! No server implements these yet, so every shape here is provisional.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::template_system::TemplateId;
use crate::types::resume::{
    EducationEntry, ExperienceEntry, PersonalInfo, ResumeDocument, SkillEntry,
};

// ===== Save to account =====

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateResumeRequest {
    pub name: String,
    pub personal_info: PersonalInfo,
    pub experience: Vec<ExperienceEntry>,
    pub education: Vec<EducationEntry>,
    pub skills: Vec<SkillEntry>,
    pub template: Option<TemplateId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CreateResumeRequest {
    pub fn from_document(document: &ResumeDocument, template: Option<TemplateId>) -> Self {
        let now = Utc::now();
        let name = if document.personal_info.name.trim().is_empty() {
            "Untitled resume".to_string()
        } else {
            format!("{} resume", document.personal_info.name.trim())
        };

        Self {
            name,
            personal_info: document.personal_info.clone(),
            experience: document.experience.clone(),
            education: document.education.clone(),
            skills: document.skills.clone(),
            template,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveResumeResponse {
    pub id: Option<String>,
    pub message: Option<String>,
}

// ===== Alternate-format generation =====

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    Docx,
}

impl DocumentFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Docx => "docx",
        }
    }

    pub fn label(&self) -> String {
        self.extension().to_uppercase()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateDocumentRequest {
    pub format: DocumentFormat,
    pub resume: ResumeDocument,
    pub template: Option<TemplateId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedDocument {
    pub filename: String,
    pub download_url: Option<String>,
    /// Raw bytes when the service returns the file inline
    #[serde(default)]
    pub content: Option<Vec<u8>>,
}
