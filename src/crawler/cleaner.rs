//! Document cleaning
//!
//! Detail pages carry a table of contents, edit-section links, scripts,
//! category boxes, footers and navigation chrome. All of it is detached from
//! the tree before text extraction.

use crate::config::CleanerConfig;
use crate::ConfigError;
use scraper::{Html, Selector};

/// Parsed set of selectors whose matches are removed from a document
#[derive(Debug, Clone)]
pub struct Cleaner {
    selectors: Vec<Selector>,
}

impl Cleaner {
    /// Compiles the configured selectors
    pub fn new(config: &CleanerConfig) -> Result<Self, ConfigError> {
        let selectors = config
            .selectors
            .iter()
            .map(|s| {
                Selector::parse(s)
                    .map_err(|e| ConfigError::InvalidSelector(format!("'{}': {:?}", s, e)))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { selectors })
    }

    /// Detaches every subtree matching a configured selector
    ///
    /// Selectors that match nothing are skipped, so cleaning an already
    /// cleaned document changes nothing. Returns the number of subtrees removed.
    pub fn clean(&self, document: &mut Html) -> usize {
        let mut removed = 0;

        for selector in &self.selectors {
            // Only the attached tree; Html::select would revisit detached nodes
            let ids: Vec<_> = document
                .root_element()
                .select(selector)
                .map(|el| el.id())
                .collect();

            for id in ids {
                if let Some(mut node) = document.tree.get_mut(id) {
                    node.detach();
                    removed += 1;
                }
            }
        }

        tracing::trace!("Removed {} non-content subtrees", removed);
        removed
    }
}

impl Default for Cleaner {
    fn default() -> Self {
        // The built-in selectors are literals known to parse
        Self::new(&CleanerConfig::default()).unwrap_or(Self {
            selectors: Vec::new(),
        })
    }
}
