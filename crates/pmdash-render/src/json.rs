//! JSON output
//!
//! Renders the whole document, or an object holding only the selected
//! sections under their document keys.

use pmdash_core::{DashboardDocument, RenderError, Renderer};
use serde_json::{Map, Value};

use crate::{selected, Section};

#[derive(Clone, Debug, Default)]
pub struct JsonRenderer {
    pub pretty: bool,
    /// Sections to include; empty means the whole document
    pub sections: Vec<Section>,
}

impl JsonRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pretty(mut self) -> Self {
        self.pretty = true;
        self
    }

    pub fn section(mut self, section: Section) -> Self {
        self.sections.push(section);
        self
    }
}

fn section_value(document: &DashboardDocument, section: Section) -> Result<Value, serde_json::Error> {
    match section {
        Section::Overview => serde_json::to_value(&document.overview),
        Section::Phases => serde_json::to_value(&document.phases),
        Section::Support => serde_json::to_value(&document.support),
        Section::Risks => serde_json::to_value(&document.risks),
        Section::Timeline => serde_json::to_value(&document.timeline),
    }
}

impl Renderer for JsonRenderer {
    type Output = String;

    fn render(&self, document: &DashboardDocument) -> Result<String, RenderError> {
        let value = if self.sections.is_empty() {
            serde_json::to_value(document)
        } else {
            selected(&self.sections)
                .into_iter()
                .map(|section| Ok((section.key().to_string(), section_value(document, section)?)))
                .collect::<Result<Map<String, Value>, serde_json::Error>>()
                .map(Value::Object)
        };
        let value = value.map_err(|e| RenderError::Format(e.to_string()))?;

        let encoded = if self.pretty {
            serde_json::to_string_pretty(&value)
        } else {
            serde_json::to_string(&value)
        };
        encoded.map_err(|e| RenderError::Format(e.to_string()))
    }
}
