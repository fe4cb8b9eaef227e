// src/editor.rs
//! Whole-document editing operations.
//!
//! Every operation reads the current document and returns a new one. The
//! caller's value is never touched, so a failed edit simply has no effect.

use tracing::debug;

use crate::error::EditError;
use crate::store::DocumentStore;
use crate::types::{
    EducationEntry, ExperienceEntry, ListName, PersonalInfo, ResumeDocument, SkillEntry,
};

// ===== Field names =====

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersonalField {
    Name,
    Title,
    Email,
    Phone,
    Location,
    Summary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExperienceField {
    Title,
    Company,
    Location,
    StartDate,
    EndDate,
    Description,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EducationField {
    Degree,
    School,
    Location,
    StartDate,
    EndDate,
    Description,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkillField {
    Name,
    Level,
}

/// A field of a list entry. The variant names the list it lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListField {
    Experience(ExperienceField),
    Education(EducationField),
    Skill(SkillField),
}

fn normalize_field_name(name: &str) -> String {
    name.trim()
        .chars()
        .filter(|c| *c != '_' && *c != '-')
        .collect::<String>()
        .to_lowercase()
}

fn unknown_field(scope: &str, field: &str) -> EditError {
    EditError::UnknownField {
        scope: scope.to_string(),
        field: field.to_string(),
    }
}

impl PersonalField {
    /// Accepts `startDate`, `start_date` and `start-date` spellings alike.
    pub fn parse(name: &str) -> Result<Self, EditError> {
        match normalize_field_name(name).as_str() {
            "name" => Ok(Self::Name),
            "title" => Ok(Self::Title),
            "email" => Ok(Self::Email),
            "phone" => Ok(Self::Phone),
            "location" => Ok(Self::Location),
            "summary" => Ok(Self::Summary),
            _ => Err(unknown_field("personalInfo", name)),
        }
    }

    fn slot<'a>(&self, info: &'a mut PersonalInfo) -> &'a mut String {
        match self {
            Self::Name => &mut info.name,
            Self::Title => &mut info.title,
            Self::Email => &mut info.email,
            Self::Phone => &mut info.phone,
            Self::Location => &mut info.location,
            Self::Summary => &mut info.summary,
        }
    }
}

impl ExperienceField {
    pub fn parse(name: &str) -> Result<Self, EditError> {
        match normalize_field_name(name).as_str() {
            "title" => Ok(Self::Title),
            "company" => Ok(Self::Company),
            "location" => Ok(Self::Location),
            "startdate" => Ok(Self::StartDate),
            "enddate" => Ok(Self::EndDate),
            "description" => Ok(Self::Description),
            _ => Err(unknown_field("experience", name)),
        }
    }

    pub(crate) fn slot<'a>(&self, entry: &'a mut ExperienceEntry) -> &'a mut String {
        match self {
            Self::Title => &mut entry.title,
            Self::Company => &mut entry.company,
            Self::Location => &mut entry.location,
            Self::StartDate => &mut entry.start_date,
            Self::EndDate => &mut entry.end_date,
            Self::Description => &mut entry.description,
        }
    }
}

impl EducationField {
    pub fn parse(name: &str) -> Result<Self, EditError> {
        match normalize_field_name(name).as_str() {
            "degree" => Ok(Self::Degree),
            "school" => Ok(Self::School),
            "location" => Ok(Self::Location),
            "startdate" => Ok(Self::StartDate),
            "enddate" => Ok(Self::EndDate),
            "description" => Ok(Self::Description),
            _ => Err(unknown_field("education", name)),
        }
    }

    fn slot<'a>(&self, entry: &'a mut EducationEntry) -> &'a mut String {
        match self {
            Self::Degree => &mut entry.degree,
            Self::School => &mut entry.school,
            Self::Location => &mut entry.location,
            Self::StartDate => &mut entry.start_date,
            Self::EndDate => &mut entry.end_date,
            Self::Description => &mut entry.description,
        }
    }
}

impl SkillField {
    pub fn parse(name: &str) -> Result<Self, EditError> {
        match normalize_field_name(name).as_str() {
            "name" => Ok(Self::Name),
            "level" => Ok(Self::Level),
            _ => Err(unknown_field("skills", name)),
        }
    }

    fn slot<'a>(&self, entry: &'a mut SkillEntry) -> &'a mut String {
        match self {
            Self::Name => &mut entry.name,
            Self::Level => &mut entry.level,
        }
    }
}

impl ListField {
    pub fn list(&self) -> ListName {
        match self {
            Self::Experience(_) => ListName::Experience,
            Self::Education(_) => ListName::Education,
            Self::Skill(_) => ListName::Skills,
        }
    }

    pub fn parse(list: ListName, name: &str) -> Result<Self, EditError> {
        match list {
            ListName::Experience => ExperienceField::parse(name).map(Self::Experience),
            ListName::Education => EducationField::parse(name).map(Self::Education),
            ListName::Skills => SkillField::parse(name).map(Self::Skill),
        }
    }
}

pub fn parse_list(name: &str) -> Result<ListName, EditError> {
    ListName::parse(name).ok_or_else(|| EditError::UnknownList(name.to_string()))
}

// ===== Pure operations =====

fn check_index(list: ListName, index: usize, len: usize) -> Result<(), EditError> {
    if index >= len {
        return Err(EditError::IndexOutOfRange { list, index, len });
    }
    Ok(())
}

/// Replace one `personalInfo` field.
pub fn set_personal_field(
    doc: &ResumeDocument,
    field: PersonalField,
    value: impl Into<String>,
) -> ResumeDocument {
    let mut next = doc.clone();
    *field.slot(&mut next.personal_info) = value.into();
    next
}

/// Replace one field of the entry at `index` in the list `field` belongs to.
pub fn set_list_field(
    doc: &ResumeDocument,
    field: ListField,
    index: usize,
    value: impl Into<String>,
) -> Result<ResumeDocument, EditError> {
    let list = field.list();
    check_index(list, index, doc.list_len(list))?;

    let mut next = doc.clone();
    let value = value.into();
    match field {
        ListField::Experience(f) => *f.slot(&mut next.experience[index]) = value,
        ListField::Education(f) => *f.slot(&mut next.education[index]) = value,
        ListField::Skill(f) => *f.slot(&mut next.skills[index]) = value,
    }
    Ok(next)
}

/// Append a blank entry with a fresh identifier.
pub fn add_entry(doc: &ResumeDocument, list: ListName) -> ResumeDocument {
    let mut next = doc.clone();
    match list {
        ListName::Experience => next.experience.push(ExperienceEntry::blank()),
        ListName::Education => next.education.push(EducationEntry::blank()),
        ListName::Skills => next.skills.push(SkillEntry::blank()),
    }
    next
}

/// Remove the entry at `index`. The last remaining entry of a list stays.
pub fn remove_entry(
    doc: &ResumeDocument,
    list: ListName,
    index: usize,
) -> Result<ResumeDocument, EditError> {
    let len = doc.list_len(list);
    if len <= 1 {
        debug!("Refusing to remove the last {} entry", list);
        return Ok(doc.clone());
    }
    check_index(list, index, len)?;

    let mut next = doc.clone();
    match list {
        ListName::Experience => {
            next.experience.remove(index);
        }
        ListName::Education => {
            next.education.remove(index);
        }
        ListName::Skills => {
            next.skills.remove(index);
        }
    }
    Ok(next)
}

// ===== Owner-bound editor =====

/// Applies edits to the owning store, which publishes each result to all subscribers.
#[derive(Clone)]
pub struct FormEditor {
    store: DocumentStore,
}

impl FormEditor {
    pub fn new(store: DocumentStore) -> Self {
        Self { store }
    }

    pub fn set_personal_field(
        &self,
        field: PersonalField,
        value: impl Into<String>,
    ) -> ResumeDocument {
        let value = value.into();
        self.store.replace(set_personal_field(&self.store.current(), field, value))
    }

    pub fn set_list_field(
        &self,
        field: ListField,
        index: usize,
        value: impl Into<String>,
    ) -> Result<ResumeDocument, EditError> {
        let value = value.into();
        self.store.update(|doc| set_list_field(doc, field, index, value))
    }

    pub fn add_entry(&self, list: ListName) -> ResumeDocument {
        self.store.replace(add_entry(&self.store.current(), list))
    }

    pub fn remove_entry(&self, list: ListName, index: usize) -> Result<ResumeDocument, EditError> {
        self.store.update(|doc| remove_entry(doc, list, index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::default_document;
    use std::collections::HashSet;

    fn filled() -> ResumeDocument {
        let doc = default_document();
        let doc = add_entry(&doc, ListName::Experience);
        let title = ListField::Experience(ExperienceField::Title);
        let doc = set_list_field(&doc, title, 0, "Engineer").unwrap();
        set_list_field(&doc, ListField::Experience(ExperienceField::Company), 1, "Acme").unwrap()
    }

    #[test]
    fn test_set_personal_field_replaces_one_leaf() {
        let doc = default_document();
        let next = set_personal_field(&doc, PersonalField::Name, "Jane Doe");

        assert_eq!(next.personal_info.name, "Jane Doe");
        assert_eq!(next.personal_info.title, doc.personal_info.title);
        assert_eq!(next.experience, doc.experience);
        assert!(doc.personal_info.name.is_empty());
    }

    #[test]
    fn test_set_list_field_is_localized() {
        let doc = filled();
        let field = ListField::Experience(ExperienceField::Description);
        let next = set_list_field(&doc, field, 1, "Shipped things").unwrap();

        assert_eq!(next.experience[1].description, "Shipped things");
        assert_eq!(next.experience[1].company, "Acme");
        assert_eq!(next.experience[1].id, doc.experience[1].id);
        assert_eq!(next.experience[0], doc.experience[0]);
        assert_eq!(next.education, doc.education);
        assert_eq!(next.skills, doc.skills);
        assert_eq!(next.personal_info, doc.personal_info);
    }

    #[test]
    fn test_set_list_field_on_each_list() {
        let doc = default_document();
        let school = ListField::Education(EducationField::School);
        let doc = set_list_field(&doc, school, 0, "MIT").unwrap();
        let doc = set_list_field(&doc, ListField::Skill(SkillField::Level), 0, "65").unwrap();

        assert_eq!(doc.education[0].school, "MIT");
        assert_eq!(doc.skills[0].level, "65");
    }

    #[test]
    fn test_set_list_field_out_of_range_fails() {
        let doc = default_document();
        let err = set_list_field(&doc, ListField::Skill(SkillField::Name), 3, "Go").unwrap_err();
        assert_eq!(
            err,
            EditError::IndexOutOfRange {
                list: ListName::Skills,
                index: 3,
                len: 1
            }
        );
    }

    #[test]
    fn test_add_entry_grows_by_one_with_fresh_id() {
        let mut doc = default_document();
        for list in ListName::ALL {
            for _ in 0..3 {
                let before: HashSet<String> =
                    doc.list_ids(list).iter().map(|id| id.to_string()).collect();
                let next = add_entry(&doc, list);

                assert_eq!(next.list_len(list), doc.list_len(list) + 1);
                let new_id = next.list_ids(list).last().unwrap().to_string();
                assert!(!before.contains(&new_id));
                doc = next;
            }
        }
        assert!(doc.validate().is_empty());
    }

    #[test]
    fn test_new_skill_defaults_to_80() {
        let doc = add_entry(&default_document(), ListName::Skills);
        assert_eq!(doc.skills[1].level, "80");
        assert!(doc.skills[1].name.is_empty());
    }

    #[test]
    fn test_remove_last_entry_is_noop() {
        let doc = default_document();
        for list in ListName::ALL {
            for index in [0, 1, 7] {
                assert_eq!(remove_entry(&doc, list, index).unwrap(), doc);
            }
        }
    }

    #[test]
    fn test_remove_entry_keeps_other_ids() {
        let doc = filled();
        let keep = doc.experience[1].id.clone();
        let next = remove_entry(&doc, ListName::Experience, 0).unwrap();

        assert_eq!(next.experience.len(), 1);
        assert_eq!(next.experience[0].id, keep);
        assert!(remove_entry(&doc, ListName::Experience, 5).is_err());
    }

    #[test]
    fn test_field_name_spellings() {
        assert_eq!(ExperienceField::parse("startDate").unwrap(), ExperienceField::StartDate);
        assert_eq!(ExperienceField::parse("start_date").unwrap(), ExperienceField::StartDate);
        assert_eq!(EducationField::parse("End-Date").unwrap(), EducationField::EndDate);
        assert_eq!(PersonalField::parse("Summary").unwrap(), PersonalField::Summary);
        assert!(SkillField::parse("degree").is_err());
        assert!(ListField::parse(ListName::Education, "company").is_err());
        assert!(parse_list("projects").is_err());
    }

    #[test]
    fn test_form_editor_publishes() {
        let store = DocumentStore::new(default_document());
        let mut rx = store.subscribe();
        let editor = FormEditor::new(store.clone());

        editor.set_personal_field(PersonalField::Title, "Staff Engineer");
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().personal_info.title, "Staff Engineer");

        editor.remove_entry(ListName::Skills, 0).unwrap();
        assert!(!rx.has_changed().unwrap());

        assert!(editor
            .set_list_field(ListField::Skill(SkillField::Name), 4, "Go")
            .is_err());
        assert!(!rx.has_changed().unwrap());
        assert_eq!(store.current().personal_info.title, "Staff Engineer");
    }
}
