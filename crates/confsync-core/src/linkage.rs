//! Orchestration between local documents and remote pages.

use std::path::Path;

use tracing::{debug, info};

use confsync_confluence::RemoteApi;
use confsync_sdf::to_document_body;

use crate::engine::TraversalEngine;
use crate::error::SyncError;
use crate::properties::{PageProperties, PropertiesFile};
use crate::vault::{Document, Vault};

/// Drives the linkage state machine for individual documents.
///
/// A document is *unlinked* until its properties block carries a page id;
/// linking creates the remote page, annotates and saves the source, then
/// uploads the converted content. Once linked, lookups are a pure local
/// read.
pub struct LinkageOrchestrator<'a> {
    api: &'a dyn RemoteApi,
    vault: &'a dyn Vault,
    engine: &'a TraversalEngine<'a>,
    space_id: String,
}

impl<'a> LinkageOrchestrator<'a> {
    #[must_use]
    pub fn new(
        api: &'a dyn RemoteApi,
        vault: &'a dyn Vault,
        engine: &'a TraversalEngine<'a>,
        space_id: impl Into<String>,
    ) -> Self {
        Self {
            api,
            vault,
            engine,
            space_id: space_id.into(),
        }
    }

    /// Resolve a document path to its remote page URL, linking on demand.
    ///
    /// Returns `Ok(None)` when the path does not resolve to a document.
    /// For an already linked document this is a read-only fast path: no
    /// remote call and no write-back happens.
    pub fn get_remote_link(&self, path: &Path) -> Result<Option<String>, SyncError> {
        let Some(doc) = self.vault.load(path)? else {
            debug!(path = %path.display(), "no document at path");
            return Ok(None);
        };

        let file = PropertiesFile::parse(&doc.content)?;
        if let Some(url) = file.properties.confluence_url.clone() {
            debug!(path = %path.display(), url, "already linked");
            return Ok(Some(url));
        }

        self.link_and_upload(path, &doc, file).map(Some)
    }

    /// Re-upload a document's current content to its remote page.
    ///
    /// An unlinked document is linked first, which uploads as a side
    /// effect. Returns the page URL.
    pub fn publish(&self, path: &Path) -> Result<Option<String>, SyncError> {
        let Some(doc) = self.vault.load(path)? else {
            debug!(path = %path.display(), "no document at path");
            return Ok(None);
        };

        let file = PropertiesFile::parse(&doc.content)?;
        let properties = &file.properties;
        let (Some(page_id), Some(url)) = (
            properties.page_id.as_deref(),
            properties.confluence_url.clone(),
        ) else {
            return self.link_and_upload(path, &doc, file).map(Some);
        };

        self.upload(&doc, page_id, path)?;
        info!(path = %path.display(), page_id, "published");
        Ok(Some(url))
    }

    /// Transition an unlinked document to linked.
    ///
    /// The annotated source is saved before conversion starts, so the
    /// created page is never orphaned even if the upload fails, and diagram
    /// uploads during conversion can see the fresh page id.
    fn link_and_upload(
        &self,
        path: &Path,
        doc: &Document,
        mut file: PropertiesFile,
    ) -> Result<String, SyncError> {
        let created = self.api.create_page(&self.space_id, &doc.name)?;
        let url = created.url();
        info!(path = %path.display(), page_id = created.id, "created remote page");

        file.merge(PageProperties {
            page_id: Some(created.id.clone()),
            space_id: Some(created.space_id.clone()),
            confluence_url: Some(url.clone()),
        });
        let annotated = file.apply(&doc.content)?;
        self.vault.save(path, &annotated)?;

        let doc = Document {
            name: doc.name.clone(),
            content: annotated,
        };
        self.upload(&doc, &created.id, path)?;
        Ok(url)
    }

    fn upload(&self, doc: &Document, page_id: &str, path: &Path) -> Result<(), SyncError> {
        let elements = self.engine.convert(&doc.content, path)?;
        let body = to_document_body(&elements);
        self.api.update_page(page_id, &doc.name, &body)?;
        Ok(())
    }
}
