//! Prompt template catalog.
//!
//! The catalog maps a display label to the instruction text that is sent as a
//! leading system message. It is loaded once from a two-column CSV resource and
//! is read-only afterwards. A `"Default"` entry with no instruction is always
//! present and always first.

use crate::error::{Result, SydneError};
use reqwest::Client;
use tracing::{debug, info, warn};

pub const DEFAULT_TEMPLATE_LABEL: &str = "Default";

/// A named instruction for the assistant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    pub label: String,
    pub instruction: String,
}

impl PromptTemplate {
    pub fn new(label: impl Into<String>, instruction: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            instruction: instruction.into(),
        }
    }
}

/// Immutable, ordered label → instruction mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplateCatalog {
    entries: Vec<PromptTemplate>,
}

impl Default for PromptTemplateCatalog {
    fn default() -> Self {
        Self {
            entries: vec![PromptTemplate::new(DEFAULT_TEMPLATE_LABEL, "")],
        }
    }
}

impl PromptTemplateCatalog {
    /// Fetch the catalog from `url`.
    ///
    /// Never fails: when the resource cannot be fetched the catalog holds only
    /// the default entry.
    pub async fn load(client: &Client, url: &str) -> Self {
        match fetch(client, url).await {
            Ok(text) => {
                let catalog = Self::parse(&text);
                info!(url = url, templates = catalog.len(), "Loaded prompt templates");
                catalog
            }
            Err(e) => {
                warn!(url = url, error = %e, "Could not fetch prompt templates, using default only");
                Self::default()
            }
        }
    }

    /// Parse the CSV body: a header line, then `label","instruction` rows.
    pub fn parse(text: &str) -> Self {
        let mut catalog = Self::default();

        for (line_no, line) in text.lines().enumerate().skip(1) {
            let Some((label, instruction)) = line.split_once("\",\"") else {
                debug!(line = line_no + 1, "Skipping template row without separator");
                continue;
            };

            let label = label.replace('"', "");
            let label = label.trim();
            if label.is_empty() {
                debug!(line = line_no + 1, "Skipping template row with empty label");
                continue;
            }

            catalog.insert(PromptTemplate::new(label, instruction.replace('"', "")));
        }

        catalog
    }

    fn insert(&mut self, template: PromptTemplate) {
        if template.label == DEFAULT_TEMPLATE_LABEL {
            return;
        }
        match self.entries.iter_mut().find(|t| t.label == template.label) {
            Some(existing) => existing.instruction = template.instruction,
            None => self.entries.push(template),
        }
    }

    /// Labels in display order, default first.
    pub fn labels(&self) -> Vec<&str> {
        self.entries.iter().map(|t| t.label.as_str()).collect()
    }

    pub fn default_label(&self) -> &str {
        DEFAULT_TEMPLATE_LABEL
    }

    /// Instruction text for `label`, or `None` when the label is unknown.
    pub fn lookup(&self, label: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|t| t.label == label)
            .map(|t| t.instruction.as_str())
    }

    /// Text to show when `label` is selected.
    pub fn preview(&self, label: &str) -> Option<String> {
        self.lookup(label).map(String::from)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false: the default entry cannot be removed.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

async fn fetch(client: &Client, url: &str) -> Result<String> {
    let response = client.get(url).send().await?;

    if !response.status().is_success() {
        return Err(SydneError::CatalogError(format!(
            "template source returned {}",
            response.status()
        )));
    }

    Ok(response.text().await?)
}
