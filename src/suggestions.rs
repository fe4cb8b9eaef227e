// src/suggestions.rs
//! Merging externally supplied suggestions into the resume

use tracing::debug;

use crate::editor::{self, ExperienceField, ListField, PersonalField};
use crate::error::EditError;
use crate::types::{ResumeDocument, SkillEntry};

/// A suggestion addressed to one part of the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Suggestion {
    Summary(String),
    NewSkill(String),
    ExperienceField {
        index: usize,
        field: ExperienceField,
        value: String,
    },
}

impl Suggestion {
    /// Decode the legacy `fieldPath` convention.
    ///
    /// Only `summary`, `newSkill` and `experience-<i>-description` are
    /// recognized. Everything else yields `None`.
    pub fn from_field_path(path: &str, value: &str) -> Option<Self> {
        match path {
            "summary" => Some(Self::Summary(value.to_string())),
            "newSkill" => Some(Self::NewSkill(value.to_string())),
            _ => {
                let rest = path.strip_prefix("experience-")?;
                let (index, field) = rest.split_once('-')?;
                if field != "description" {
                    return None;
                }
                let index = index.parse::<usize>().ok()?;
                Some(Self::ExperienceField {
                    index,
                    field: ExperienceField::Description,
                    value: value.to_string(),
                })
            }
        }
    }
}

/// Apply a suggestion, producing a new document.
pub fn apply_suggestion(
    doc: &ResumeDocument,
    suggestion: &Suggestion,
) -> Result<ResumeDocument, EditError> {
    match suggestion {
        Suggestion::Summary(text) => Ok(editor::set_personal_field(
            doc,
            PersonalField::Summary,
            text.clone(),
        )),
        Suggestion::NewSkill(name) => {
            let mut next = doc.clone();
            next.skills.push(SkillEntry::named(name.clone()));
            Ok(next)
        }
        Suggestion::ExperienceField {
            index,
            field,
            value,
        } => editor::set_list_field(doc, ListField::Experience(*field), *index, value.clone()),
    }
}

/// Apply a legacy field-path suggestion. Unrecognized paths and bad indices
/// leave the document as it was.
pub fn apply_field_path(doc: &ResumeDocument, path: &str, value: &str) -> ResumeDocument {
    let Some(suggestion) = Suggestion::from_field_path(path, value) else {
        debug!("Ignoring suggestion for unrecognized field path '{}'", path);
        return doc.clone();
    };

    match apply_suggestion(doc, &suggestion) {
        Ok(next) => next,
        Err(e) => {
            debug!("Ignoring suggestion for '{}': {}", path, e);
            doc.clone()
        }
    }
}
