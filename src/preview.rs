// src/preview.rs
//! Read-only projection of a resume into an ordered list of layout blocks.
//! The rasterizer paints these blocks and the CLI prints them.

use crate::template_system::TemplateId;
use crate::types::{EducationEntry, ExperienceEntry, ResumeDocument};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreviewBlock {
    Header { name: String, title: String },
    Contact(Vec<String>),
    Summary(String),
    SectionHeading(String),
    Entry {
        heading: String,
        subheading: String,
        location: String,
        dates: String,
        description: String,
    },
    Skill { name: String, level: u8 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewLayout {
    pub template: TemplateId,
    pub blocks: Vec<PreviewBlock>,
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn date_range(start: &str, end: &str) -> String {
    match (non_blank(start), non_blank(end)) {
        (Some(start), Some(end)) => format!("{} - {}", start, end),
        (Some(start), None) => format!("{} - Present", start),
        (None, Some(end)) => end,
        (None, None) => String::new(),
    }
}

impl From<&ExperienceEntry> for PreviewBlock {
    fn from(entry: &ExperienceEntry) -> Self {
        PreviewBlock::Entry {
            heading: entry.title.trim().to_string(),
            subheading: entry.company.trim().to_string(),
            location: entry.location.trim().to_string(),
            dates: date_range(&entry.start_date, &entry.end_date),
            description: entry.description.trim().to_string(),
        }
    }
}

impl From<&EducationEntry> for PreviewBlock {
    fn from(entry: &EducationEntry) -> Self {
        PreviewBlock::Entry {
            heading: entry.degree.trim().to_string(),
            subheading: entry.school.trim().to_string(),
            location: entry.location.trim().to_string(),
            dates: date_range(&entry.start_date, &entry.end_date),
            description: entry.description.trim().to_string(),
        }
    }
}

/// Project `doc` into the layout for `template`.
pub fn render_preview(doc: &ResumeDocument, template: TemplateId) -> PreviewLayout {
    let info = &doc.personal_info;
    let mut blocks = vec![PreviewBlock::Header {
        name: non_blank(&info.name).unwrap_or_else(|| "Your Name".to_string()),
        title: info.title.trim().to_string(),
    }];

    let contact: Vec<String> = [&info.email, &info.phone, &info.location]
        .into_iter()
        .filter_map(|v| non_blank(v))
        .collect();
    if !contact.is_empty() {
        blocks.push(PreviewBlock::Contact(contact));
    }

    if let Some(summary) = non_blank(&info.summary) {
        blocks.push(PreviewBlock::Summary(summary));
    }

    let experience: Vec<PreviewBlock> = doc
        .experience
        .iter()
        .filter(|e| !e.is_blank())
        .map(PreviewBlock::from)
        .collect();
    let education: Vec<PreviewBlock> = doc
        .education
        .iter()
        .filter(|e| !e.is_blank())
        .map(PreviewBlock::from)
        .collect();
    let skills: Vec<PreviewBlock> = doc
        .skills
        .iter()
        .filter(|s| !s.name.trim().is_empty())
        .map(|s| PreviewBlock::Skill {
            name: s.name.trim().to_string(),
            level: s.level_percent(),
        })
        .collect();

    for (heading, section) in [
        ("Experience", experience),
        ("Education", education),
        ("Skills", skills),
    ] {
        if !section.is_empty() {
            blocks.push(PreviewBlock::SectionHeading(heading.to_string()));
            blocks.extend(section);
        }
    }

    PreviewLayout { template, blocks }
}

impl PreviewLayout {
    /// Terminal rendition of the layout.
    pub fn to_plain_text(&self) -> String {
        let mut out = String::new();
        for block in &self.blocks {
            match block {
                PreviewBlock::Header { name, title } => {
                    out.push_str(&name.to_uppercase());
                    out.push('\n');
                    if !title.is_empty() {
                        out.push_str(title);
                        out.push('\n');
                    }
                }
                PreviewBlock::Contact(items) => {
                    out.push_str(&items.join(" | "));
                    out.push('\n');
                }
                PreviewBlock::Summary(text) => {
                    out.push('\n');
                    out.push_str(text);
                    out.push('\n');
                }
                PreviewBlock::SectionHeading(heading) => {
                    out.push_str(&format!("\n== {} ==\n", heading));
                }
                PreviewBlock::Entry {
                    heading,
                    subheading,
                    location,
                    dates,
                    description,
                } => {
                    let mut line = heading.clone();
                    if !subheading.is_empty() {
                        if !line.is_empty() {
                            line.push_str(" @ ");
                        }
                        line.push_str(subheading);
                    }
                    out.push_str(&format!("- {}\n", line));
                    let meta: Vec<&str> = [location.as_str(), dates.as_str()]
                        .into_iter()
                        .filter(|v| !v.is_empty())
                        .collect();
                    if !meta.is_empty() {
                        out.push_str(&format!("  {}\n", meta.join(", ")));
                    }
                    if !description.is_empty() {
                        out.push_str(&format!("  {}\n", description));
                    }
                }
                PreviewBlock::Skill { name, level } => {
                    let filled = usize::from((*level).min(100)) / 10;
                    out.push_str(&format!(
                        "- {:<20} [{}{}] {}%\n",
                        name,
                        "#".repeat(filled),
                        ".".repeat(10 - filled),
                        level
                    ));
                }
            }
        }
        out
    }
}
