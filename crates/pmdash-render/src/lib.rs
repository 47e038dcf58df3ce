//! # pmdash-render
//!
//! Renderers for dashboard documents.
//!
//! This crate provides:
//! - Plain-text statistics summary (`TextRenderer`)
//! - JSON output of the whole document or single sections (`JsonRenderer`)
//! - `Section`, the named parts of a document a renderer can be limited to
//!
//! ## Example
//!
//! ```rust,ignore
//! use pmdash_core::Renderer;
//! use pmdash_render::{Section, TextRenderer};
//!
//! let text = TextRenderer::new().section(Section::Overview).render(&document)?;
//! println!("{text}");
//! ```

pub mod json;
pub mod text;

pub use json::JsonRenderer;
pub use text::TextRenderer;

use std::str::FromStr;

use pmdash_core::RenderError;

/// A named part of the dashboard document
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Section {
    Overview,
    Phases,
    Support,
    Risks,
    Timeline,
}

impl Section {
    pub const ALL: [Section; 5] = [
        Section::Overview,
        Section::Phases,
        Section::Support,
        Section::Risks,
        Section::Timeline,
    ];

    /// Key of the section in the JSON document
    pub fn key(&self) -> &'static str {
        match self {
            Section::Overview => "overview",
            Section::Phases => "phases",
            Section::Support => "support",
            Section::Risks => "risks",
            Section::Timeline => "timeline",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Section::Overview => "Overview",
            Section::Phases => "Phases",
            Section::Support => "Operational Support",
            Section::Risks => "Risks and Challenges",
            Section::Timeline => "Timeline",
        }
    }
}

impl std::fmt::Display for Section {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

impl FromStr for Section {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|section| section.key() == wanted)
            .ok_or_else(|| RenderError::Format(format!("unknown section '{}'", s)))
    }
}

/// Sections to render; an empty selection means every section
fn selected(sections: &[Section]) -> Vec<Section> {
    if sections.is_empty() {
        Section::ALL.to_vec()
    } else {
        Section::ALL
            .into_iter()
            .filter(|s| sections.contains(s))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn section_from_str() {
        assert_eq!("overview".parse::<Section>().unwrap(), Section::Overview);
        assert_eq!(" Risks ".parse::<Section>().unwrap(), Section::Risks);
        assert!("gantt".parse::<Section>().is_err());
    }

    #[test]
    fn selection_keeps_document_order() {
        assert_eq!(selected(&[]), Section::ALL.to_vec());
        assert_eq!(
            selected(&[Section::Timeline, Section::Overview, Section::Timeline]),
            vec![Section::Overview, Section::Timeline]
        );
    }
}
