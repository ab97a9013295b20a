//! # EvType Templating Engine
//!
//! File: cli/src/core/templating.rs
//!
//! ## Overview
//!
//! Renders the chat page served by `evtype srv` with `tera`. The template is
//! compiled into the binary (`cli/templates/chat.html`), so the server has no
//! runtime file dependencies. Autoescaping is on: dataset names and titles come
//! from user-controlled config and uploads.
//!
//! ```rust
//! let page = ChatPage::new("EV Type Predictor", &dataset.summary());
//! let html = templating::render_chat_page(&page)?;
//! ```
//!
use crate::core::error::{EvError, Result};
use crate::predictor::DatasetSummary;
use anyhow::anyhow;
use serde::Serialize;
use tera::Tera;

const CHAT_PAGE_TEMPLATE: &str = include_str!("../../templates/chat.html");

/// Values available to the chat page template.
#[derive(Debug, Clone, Serialize)]
pub struct ChatPage {
    pub title: String,
    pub source: String,
    pub records: usize,
    /// Record count per type label, sorted by label.
    pub types: Vec<TypeCount>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TypeCount {
    pub label: String,
    pub count: usize,
}

impl ChatPage {
    pub fn new(title: &str, summary: &DatasetSummary) -> Self {
        Self {
            title: title.to_string(),
            source: summary.source.clone(),
            records: summary.records,
            types: summary
                .types
                .iter()
                .map(|(label, count)| TypeCount {
                    label: label.clone(),
                    count: *count,
                })
                .collect(),
        }
    }
}

/// Renders the embedded chat page template.
///
/// ## Errors
///
/// Returns `EvError::Template` if the context cannot be built or rendering fails.
pub fn render_chat_page(page: &ChatPage) -> Result<String> {
    let context = tera::Context::from_serialize(page).map_err(|e| {
        anyhow!(EvError::Template { source: e }).context("Failed to build chat page context")
    })?;
    Tera::one_off(CHAT_PAGE_TEMPLATE, &context, true).map_err(|e| {
        anyhow!(EvError::Template { source: e }).context("Failed to render chat page")
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn summary() -> DatasetSummary {
        let mut types = BTreeMap::new();
        types.insert("Battery Electric Vehicle (BEV)".to_string(), 2);
        types.insert("Plug-in Hybrid Electric Vehicle (PHEV)".to_string(), 1);
        DatasetSummary {
            source: "sample_vehicles.csv".into(),
            records: 3,
            types,
        }
    }

    #[test]
    fn test_render_chat_page() -> Result<()> {
        let html = render_chat_page(&ChatPage::new("EV Type Predictor", &summary()))?;
        assert!(html.contains("<title>EV Type Predictor</title>"));
        assert!(html.contains("sample_vehicles.csv"));
        assert!(html.contains("3 records"));
        assert!(html.contains("Plug-in Hybrid Electric Vehicle (PHEV): 1"));
        Ok(())
    }

    #[test]
    fn test_render_escapes_title() -> Result<()> {
        let html = render_chat_page(&ChatPage::new("<script>x</script>", &summary()))?;
        assert!(!html.contains("<script>x</script>"));
        assert!(html.contains("&lt;script&gt;"));
        Ok(())
    }
}
