//! Page sink collecting registered pages in memory.

use std::sync::{Mutex, PoisonError};

use vdocs_site::{Page, PageSink};

use crate::error::CliError;

/// Collects pages from both registration phases.
#[derive(Debug, Default)]
pub(crate) struct PageCollector {
    pages: Mutex<Vec<Page>>,
}

impl PageSink for PageCollector {
    fn create_page(&self, page: Page) {
        self.pages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(page);
    }
}

impl PageCollector {
    /// Pages sorted by path.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::DuplicatePath`] if two pages share a path.
    pub(crate) fn into_pages(self) -> Result<Vec<Page>, CliError> {
        let mut pages = self
            .pages
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner);
        pages.sort_by(|a, b| a.path.cmp(&b.path));

        if let Some(pair) = pages.windows(2).find(|pair| pair[0].path == pair[1].path) {
            return Err(CliError::DuplicatePath(pair[0].path.clone()));
        }
        Ok(pages)
    }
}
