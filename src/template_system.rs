// src/template_system.rs
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::info;

use crate::error::TemplateError;

/// Closed set of resume templates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateId {
    #[default]
    Modern,
    Classic,
    Minimalist,
    Creative,
}

impl TemplateId {
    pub const ALL: [TemplateId; 4] = [
        TemplateId::Modern,
        TemplateId::Classic,
        TemplateId::Minimalist,
        TemplateId::Creative,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Modern => "modern",
            Self::Classic => "classic",
            Self::Minimalist => "minimalist",
            Self::Creative => "creative",
        }
    }

    pub fn manifest(&self) -> TemplateManifest {
        match self {
            Self::Modern => TemplateManifest {
                name: "Modern",
                description: "A clean, contemporary design with a professional look",
                accent: [0x3B, 0x82, 0xF6],
                header_band: true,
            },
            Self::Classic => TemplateManifest {
                name: "Classic",
                description: "Traditional layout perfect for corporate environments",
                accent: [0x37, 0x41, 0x51],
                header_band: false,
            },
            Self::Minimalist => TemplateManifest {
                name: "Minimalist",
                description: "Simple, elegant design with focus on content",
                accent: [0x63, 0x66, 0xF1],
                header_band: false,
            },
            Self::Creative => TemplateManifest {
                name: "Creative",
                description: "Unique design for creative industries",
                accent: [0xA8, 0x55, 0xF7],
                header_band: true,
            },
        }
    }
}

impl fmt::Display for TemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TemplateId {
    type Err = TemplateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let requested = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == requested)
            .ok_or_else(|| TemplateError::Unknown { id: s.to_string() })
    }
}

/// Presentation details of a template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemplateManifest {
    pub name: &'static str,
    pub description: &'static str,
    /// RGB accent used for headings, bands and skill bars
    pub accent: [u8; 3],
    /// Whether the name sits on a filled accent band
    pub header_band: bool,
}

pub fn list_templates() -> Vec<(TemplateId, TemplateManifest)> {
    TemplateId::ALL.iter().map(|t| (*t, t.manifest())).collect()
}

/// Currently selected template. Selecting never touches the resume document.
#[derive(Debug, Clone, Default)]
pub struct TemplateSelector {
    selected: TemplateId,
}

impl TemplateSelector {
    pub fn new(selected: TemplateId) -> Self {
        Self { selected }
    }

    pub fn selected(&self) -> TemplateId {
        self.selected
    }

    pub fn select(&mut self, template: TemplateId) {
        if self.selected != template {
            info!("Template changed: {} -> {}", self.selected, template);
        }
        self.selected = template;
    }

    pub fn select_by_id(&mut self, id: &str) -> Result<TemplateId, TemplateError> {
        let template = id.parse()?;
        self.select(template);
        Ok(template)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_template_ids() {
        assert_eq!("modern".parse::<TemplateId>().unwrap(), TemplateId::Modern);
        assert_eq!(" Classic ".parse::<TemplateId>().unwrap(), TemplateId::Classic);
        assert_eq!("MINIMALIST".parse::<TemplateId>().unwrap(), TemplateId::Minimalist);
        assert!("executive".parse::<TemplateId>().is_err());
    }

    #[test]
    fn test_selector_defaults_to_modern() {
        let selector = TemplateSelector::default();
        assert_eq!(selector.selected(), TemplateId::Modern);
    }

    #[test]
    fn test_select_by_unknown_id_keeps_selection() {
        let mut selector = TemplateSelector::new(TemplateId::Creative);
        assert!(selector.select_by_id("fancy").is_err());
        assert_eq!(selector.selected(), TemplateId::Creative);

        selector.select_by_id("classic").unwrap();
        assert_eq!(selector.selected(), TemplateId::Classic);
    }

    #[test]
    fn test_catalog_lists_all() {
        let catalog = list_templates();
        assert_eq!(catalog.len(), 4);
        assert_eq!(catalog[0].1.name, "Modern");
    }
}
