//! Document lifecycle
//!
//! A document moves Loading -> Ready (or Error) and stays addressable by a
//! stable id throughout. Page sizes arrive with the load; the current page's
//! natural size is what the viewport fits against.

use std::collections::HashMap;

use viewer_core::Size;

use crate::boundary::{DocumentRenderer, LoadError};

/// Stable handle for an open document
pub type DocumentId = u64;

/// Where a document is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentState {
    Loading,
    Ready,
    Error,
    Closed,
}

/// An open plan document.
#[derive(Debug, Clone)]
pub struct Document {
    pub id: DocumentId,
    pub name: String,
    pub state: DocumentState,
    /// Natural size of each page, filled in when the load completes
    pub pages: Vec<Size>,
    pub current_page: u16,
}

impl Document {
    pub fn page_count(&self) -> u16 {
        self.pages.len() as u16
    }

    /// Natural size of a page, if loaded
    pub fn page_size(&self, page: u16) -> Option<Size> {
        self.pages.get(page as usize).copied()
    }

    /// Natural size of the current page; `None` until the document is ready
    pub fn content_size(&self) -> Option<Size> {
        if self.state != DocumentState::Ready {
            return None;
        }
        self.page_size(self.current_page)
    }

    pub fn is_first_page(&self) -> bool {
        self.current_page == 0
    }

    pub fn is_last_page(&self) -> bool {
        self.page_count() == 0 || self.current_page + 1 >= self.page_count()
    }

    /// Jump to a page, rejecting out-of-range indices
    pub fn set_current_page(&mut self, page: u16) -> DocumentResult<()> {
        if page >= self.page_count() {
            return Err(DocumentError::InvalidPageIndex {
                page,
                max: self.page_count().saturating_sub(1),
            });
        }
        self.current_page = page;
        Ok(())
    }

    /// Advance one page; saturates at the last page
    pub fn next_page(&mut self) -> bool {
        if self.is_last_page() {
            return false;
        }
        self.current_page += 1;
        true
    }

    /// Go back one page; saturates at the first page
    pub fn prev_page(&mut self) -> bool {
        if self.is_first_page() {
            return false;
        }
        self.current_page -= 1;
        true
    }
}

/// Errors from document bookkeeping and loading.
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("document {0} not found")]
    NotFound(DocumentId),

    #[error("document {0} is closed")]
    Closed(DocumentId),

    #[error("page {page} out of range (max {max})")]
    InvalidPageIndex { page: u16, max: u16 },

    #[error(transparent)]
    Load(#[from] LoadError),
}

pub type DocumentResult<T> = Result<T, DocumentError>;

/// Tracks open documents and their load lifecycles.
#[derive(Debug, Default)]
pub struct DocumentManager {
    documents: HashMap<DocumentId, Document>,
    next_id: DocumentId,
}

impl DocumentManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new document in the Loading state and return its id.
    pub fn open(&mut self, name: impl Into<String>) -> DocumentId {
        let id = self.next_id;
        self.next_id += 1;
        self.documents.insert(
            id,
            Document {
                id,
                name: name.into(),
                state: DocumentState::Loading,
                pages: Vec::new(),
                current_page: 0,
            },
        );
        id
    }

    /// Record a successful load with the natural size of every page.
    pub fn complete_load(&mut self, id: DocumentId, pages: Vec<Size>) -> DocumentResult<()> {
        let doc = self
            .documents
            .get_mut(&id)
            .ok_or(DocumentError::NotFound(id))?;
        doc.pages = pages;
        doc.state = DocumentState::Ready;
        doc.current_page = 0;
        Ok(())
    }

    /// Record a failed load; the document stays addressable in Error state.
    pub fn fail_load(&mut self, id: DocumentId) -> DocumentResult<()> {
        let doc = self
            .documents
            .get_mut(&id)
            .ok_or(DocumentError::NotFound(id))?;
        log::warn!("document '{}' failed to load", doc.name);
        doc.state = DocumentState::Error;
        Ok(())
    }

    /// Load `id` through the renderer: query the page count, render every
    /// page for its natural size, and mark the document ready. Any renderer
    /// failure marks the document Error and surfaces the cause.
    pub fn load_with<R: DocumentRenderer + ?Sized>(
        &mut self,
        id: DocumentId,
        renderer: &mut R,
    ) -> DocumentResult<()> {
        let resource = self
            .documents
            .get(&id)
            .ok_or(DocumentError::NotFound(id))?
            .name
            .clone();

        let result = (|| -> Result<Vec<Size>, LoadError> {
            let count = renderer.page_count(&resource)?;
            let mut pages = Vec::with_capacity(count as usize);
            for page in 0..count {
                pages.push(renderer.render_page(&resource, page)?.natural_size);
            }
            Ok(pages)
        })();

        match result {
            Ok(pages) => self.complete_load(id, pages),
            Err(err) => {
                self.fail_load(id)?;
                Err(err.into())
            }
        }
    }

    pub fn get(&self, id: DocumentId) -> Option<&Document> {
        self.documents.get(&id)
    }

    pub fn get_mut(&mut self, id: DocumentId) -> Option<&mut Document> {
        self.documents.get_mut(&id)
    }

    /// Close and forget a document
    pub fn close(&mut self, id: DocumentId) -> Option<Document> {
        self.documents.remove(&id).map(|mut doc| {
            doc.state = DocumentState::Closed;
            doc
        })
    }

    /// Whether any document is still loading
    pub fn is_busy(&self) -> bool {
        self.documents
            .values()
            .any(|d| d.state == DocumentState::Loading)
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}
