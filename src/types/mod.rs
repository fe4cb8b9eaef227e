pub mod response;
pub mod resume;

pub use resume::{
    default_document, EducationEntry, EntryId, ExperienceEntry, ListName, PersonalInfo,
    ResumeDocument, SkillEntry, ValidationIssue,
};
