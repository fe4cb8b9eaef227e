// src/types/resume.rs
//! Resume document model shared by the editor, the preview and the exporters

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use uuid::Uuid;

pub const DEFAULT_SKILL_LEVEL: &str = "80";

// ===== Identifiers =====

/// The three entry lists of a resume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListName {
    Experience,
    Education,
    Skills,
}

impl ListName {
    pub const ALL: [ListName; 3] = [ListName::Experience, ListName::Education, ListName::Skills];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Experience => "experience",
            Self::Education => "education",
            Self::Skills => "skills",
        }
    }

    /// Prefix used when minting entry identifiers for this list
    pub fn id_prefix(&self) -> &'static str {
        match self {
            Self::Experience => "exp",
            Self::Education => "edu",
            Self::Skills => "skill",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "experience" | "experiences" | "exp" => Some(Self::Experience),
            "education" | "edu" => Some(Self::Education),
            "skills" | "skill" => Some(Self::Skills),
            _ => None,
        }
    }
}

impl fmt::Display for ListName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Opaque entry identifier. Only ever compared, never interpreted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(String);

impl EntryId {
    /// Mint a fresh identifier for an entry of `list`.
    pub fn generate(list: ListName) -> Self {
        Self(format!("{}-{}", list.id_prefix(), Uuid::new_v4().simple()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl From<&str> for EntryId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ===== Document =====

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersonalInfo {
    pub name: String,
    pub title: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    pub summary: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperienceEntry {
    pub id: EntryId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub start_date: String,
    #[serde(default)]
    pub end_date: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EducationEntry {
    pub id: EntryId,
    #[serde(default)]
    pub degree: String,
    #[serde(default)]
    pub school: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub start_date: String,
    #[serde(default)]
    pub end_date: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillEntry {
    pub id: EntryId,
    #[serde(default)]
    pub name: String,
    #[serde(default = "default_skill_level")]
    pub level: String,
}

fn default_skill_level() -> String {
    DEFAULT_SKILL_LEVEL.to_string()
}

impl ExperienceEntry {
    pub fn blank() -> Self {
        Self {
            id: EntryId::generate(ListName::Experience),
            title: String::new(),
            company: String::new(),
            location: String::new(),
            start_date: String::new(),
            end_date: String::new(),
            description: String::new(),
        }
    }

    pub fn is_blank(&self) -> bool {
        [
            &self.title,
            &self.company,
            &self.location,
            &self.start_date,
            &self.end_date,
            &self.description,
        ]
        .iter()
        .all(|v| v.trim().is_empty())
    }
}

impl EducationEntry {
    pub fn blank() -> Self {
        Self {
            id: EntryId::generate(ListName::Education),
            degree: String::new(),
            school: String::new(),
            location: String::new(),
            start_date: String::new(),
            end_date: String::new(),
            description: String::new(),
        }
    }

    pub fn is_blank(&self) -> bool {
        [
            &self.degree,
            &self.school,
            &self.location,
            &self.start_date,
            &self.end_date,
            &self.description,
        ]
        .iter()
        .all(|v| v.trim().is_empty())
    }
}

impl SkillEntry {
    pub fn blank() -> Self {
        Self::named(String::new())
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self {
            id: EntryId::generate(ListName::Skills),
            name: name.into(),
            level: default_skill_level(),
        }
    }

    /// Level as a bar percentage. Unparsable values read as 0, large ones clamp to 100.
    pub fn level_percent(&self) -> u8 {
        self.level
            .trim()
            .parse::<i64>()
            .map(|v| v.clamp(0, 100) as u8)
            .unwrap_or(0)
    }
}

/// The complete resume. Always fully populated: every list holds at least one entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeDocument {
    #[serde(default)]
    pub personal_info: PersonalInfo,
    #[serde(default)]
    pub experience: Vec<ExperienceEntry>,
    #[serde(default)]
    pub education: Vec<EducationEntry>,
    #[serde(default)]
    pub skills: Vec<SkillEntry>,
}

/// Blank document satisfying every invariant.
pub fn default_document() -> ResumeDocument {
    ResumeDocument {
        personal_info: PersonalInfo::default(),
        experience: vec![ExperienceEntry::blank()],
        education: vec![EducationEntry::blank()],
        skills: vec![SkillEntry::blank()],
    }
}

impl Default for ResumeDocument {
    fn default() -> Self {
        default_document()
    }
}

impl ResumeDocument {
    pub fn list_len(&self, list: ListName) -> usize {
        match list {
            ListName::Experience => self.experience.len(),
            ListName::Education => self.education.len(),
            ListName::Skills => self.skills.len(),
        }
    }

    pub fn list_ids(&self, list: ListName) -> Vec<&EntryId> {
        match list {
            ListName::Experience => self.experience.iter().map(|e| &e.id).collect(),
            ListName::Education => self.education.iter().map(|e| &e.id).collect(),
            ListName::Skills => self.skills.iter().map(|e| &e.id).collect(),
        }
    }

    /// Repair a document that came from outside the editor (a file, a backend).
    ///
    /// Empty lists get one blank entry. Blank ids, and ids already used by an
    /// earlier entry of any list, are replaced with fresh ones.
    pub fn normalized(mut self) -> Self {
        if self.experience.is_empty() {
            self.experience.push(ExperienceEntry::blank());
        }
        if self.education.is_empty() {
            self.education.push(EducationEntry::blank());
        }
        if self.skills.is_empty() {
            self.skills.push(SkillEntry::blank());
        }

        let mut seen = HashSet::new();
        let mut repair = |id: &mut EntryId, list: ListName| {
            if id.is_blank() || seen.contains(&*id) {
                *id = EntryId::generate(list);
            }
            seen.insert(id.clone());
        };
        for entry in &mut self.experience {
            repair(&mut entry.id, ListName::Experience);
        }
        for entry in &mut self.education {
            repair(&mut entry.id, ListName::Education);
        }
        for entry in &mut self.skills {
            repair(&mut entry.id, ListName::Skills);
        }
        self
    }

    /// Check the document without touching it. An empty result means no issues.
    pub fn validate(&self) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();

        for list in ListName::ALL {
            if self.list_len(list) == 0 {
                issues.push(ValidationIssue::EmptyList(list));
            }
        }

        let mut seen = HashSet::new();
        for list in ListName::ALL {
            for id in self.list_ids(list) {
                if id.is_blank() {
                    issues.push(ValidationIssue::BlankId(list));
                } else if !seen.insert(id.as_str()) {
                    issues.push(ValidationIssue::DuplicateId(id.clone()));
                }
            }
        }

        let email = self.personal_info.email.trim();
        if !email.is_empty() && !looks_like_email(email) {
            issues.push(ValidationIssue::InvalidEmail(email.to_string()));
        }

        for (index, skill) in self.skills.iter().enumerate() {
            let valid = skill
                .level
                .trim()
                .parse::<i64>()
                .map(|v| (0..=100).contains(&v))
                .unwrap_or(false);
            if !valid {
                issues.push(ValidationIssue::InvalidSkillLevel {
                    index,
                    level: skill.level.clone(),
                });
            }
        }

        issues
    }
}

fn looks_like_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') || email.contains(char::is_whitespace) {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationIssue {
    EmptyList(ListName),
    BlankId(ListName),
    DuplicateId(EntryId),
    InvalidEmail(String),
    InvalidSkillLevel { index: usize, level: String },
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyList(list) => write!(f, "{} has no entries", list),
            Self::BlankId(list) => write!(f, "{} contains an entry without id", list),
            Self::DuplicateId(id) => write!(f, "duplicate entry id: {}", id),
            Self::InvalidEmail(email) => write!(f, "email does not look valid: {}", email),
            Self::InvalidSkillLevel { index, level } => {
                write!(f, "skill #{} level must be 0-100, got '{}'", index, level)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_document_is_complete() {
        let doc = default_document();
        assert_eq!(doc.experience.len(), 1);
        assert_eq!(doc.education.len(), 1);
        assert_eq!(doc.skills.len(), 1);
        assert_eq!(doc.skills[0].level, "80");
        assert!(doc.personal_info.name.is_empty());
        assert!(doc.validate().is_empty());
    }

    #[test]
    fn test_ids_carry_list_prefix() {
        let doc = default_document();
        assert!(doc.experience[0].id.as_str().starts_with("exp-"));
        assert!(doc.education[0].id.as_str().starts_with("edu-"));
        assert!(doc.skills[0].id.as_str().starts_with("skill-"));
    }

    #[test]
    fn test_serializes_camel_case() {
        let doc = default_document();
        let json = serde_json::to_value(&doc).unwrap();
        assert!(json.get("personalInfo").is_some());
        assert!(json["experience"][0].get("startDate").is_some());
        assert!(json["education"][0].get("endDate").is_some());
    }

    #[test]
    fn test_normalized_restores_minimum_entries() {
        let json = r#"{"personalInfo":{"name":"Jane"},"experience":[],"skills":[{"id":"","name":"Go"}]}"#;
        let doc: ResumeDocument = serde_json::from_str(json).unwrap();
        let doc = doc.normalized();

        assert_eq!(doc.personal_info.name, "Jane");
        assert_eq!(doc.experience.len(), 1);
        assert_eq!(doc.education.len(), 1);
        assert_eq!(doc.skills[0].name, "Go");
        assert_eq!(doc.skills[0].level, "80");
        assert!(!doc.skills[0].id.is_blank());
        assert!(doc.validate().is_empty());
    }

    #[test]
    fn test_normalized_remints_repeated_ids() {
        let json = r#"{
            "personalInfo": {"name": "Jane"},
            "experience": [{"id": "1", "title": "Lead"}, {"id": "1", "title": "Dev"}],
            "education": [{"id": "1"}],
            "skills": [{"id": "1", "name": "Go"}, {"id": "skill-a", "name": "Rust"}]
        }"#;
        let doc: ResumeDocument = serde_json::from_str(json).unwrap();
        assert!(!doc.validate().is_empty());

        let doc = doc.normalized();
        assert!(doc.validate().is_empty());
        assert_eq!(doc.experience[0].id.as_str(), "1");
        assert_eq!(doc.skills[1].id.as_str(), "skill-a");
        assert!(doc.experience[1].id.as_str().starts_with("exp-"));
        assert!(doc.education[0].id.as_str().starts_with("edu-"));
        assert_eq!(doc.experience[1].title, "Dev");

        let ids: HashSet<&str> = ListName::ALL
            .into_iter()
            .flat_map(|list| doc.list_ids(list))
            .map(EntryId::as_str)
            .collect();
        assert_eq!(ids.len(), 5);
    }

    #[test]
    fn test_validate_flags_bad_email_and_level() {
        let mut doc = default_document();
        doc.personal_info.email = "jane.example.com".to_string();
        doc.skills[0].level = "140".to_string();

        let issues = doc.validate();
        assert!(issues.contains(&ValidationIssue::InvalidEmail("jane.example.com".to_string())));
        assert!(issues.iter().any(|i| matches!(
            i,
            ValidationIssue::InvalidSkillLevel { index: 0, .. }
        )));
    }

    #[test]
    fn test_validate_flags_duplicate_ids() {
        let mut doc = default_document();
        let dup = doc.experience[0].clone();
        doc.experience.push(dup);
        assert!(doc
            .validate()
            .iter()
            .any(|i| matches!(i, ValidationIssue::DuplicateId(_))));
    }

    #[test]
    fn test_email_shape() {
        assert!(looks_like_email("jane@doe.dev"));
        assert!(!looks_like_email("jane@doe"));
        assert!(!looks_like_email("@doe.dev"));
        assert!(!looks_like_email("ja ne@doe.dev"));
    }

    #[test]
    fn test_level_percent() {
        let mut skill = SkillEntry::named("Rust");
        assert_eq!(skill.level_percent(), 80);
        skill.level = "250".to_string();
        assert_eq!(skill.level_percent(), 100);
        skill.level = "high".to_string();
        assert_eq!(skill.level_percent(), 0);
    }
}
