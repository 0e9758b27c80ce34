// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Document session — the ordered page list, the focused page, and the
// pending page waiting to be merged in.
//
// Every operation validates first and mutates second, so a failed call leaves
// the session exactly as it was. File cleanup is best-effort and never fails
// an operation.

use std::path::{Path, PathBuf};

use docscan_core::config::default_document_name;
use docscan_core::error::{Result, ScanError};
use docscan_core::types::{PageId, Quad, ScanAction};
use docscan_document::Page;
use docscan_document::store::remove_file_best_effort;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

/// Lifecycle of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    Active,
    /// User aborted, or the last page was deleted.
    Cancelled,
    /// Finalized; the result has been handed out.
    Finished,
}

/// What a finished session hands back: page files in document order and the
/// document name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalizedDocument {
    pub images: Vec<PathBuf>,
    pub name: String,
}

/// Pages of one scan-to-completion flow.
#[derive(Debug)]
pub struct DocumentSession {
    pages: Vec<Page>,
    focused: usize,
    pending: Option<Page>,
    pending_action: ScanAction,
    /// Page a replacing action was started against.
    pending_target: Option<PageId>,
    document_name: String,
    max_pages: usize,
    state: SessionState,
    /// Bumped on every mutation; background work compares it to detect
    /// results computed against an older session.
    revision: u64,
}

impl DocumentSession {
    pub fn new(max_pages: usize) -> Self {
        Self {
            pages: Vec::new(),
            focused: 0,
            pending: None,
            pending_action: ScanAction::None,
            pending_target: None,
            document_name: default_document_name(),
            max_pages,
            state: SessionState::Active,
            revision: 0,
        }
    }

    // -- Queries --------------------------------------------------------------

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn page(&self, index: usize) -> Result<&Page> {
        self.pages.get(index).ok_or(ScanError::IndexOutOfRange {
            index,
            len: self.pages.len(),
        })
    }

    /// Index of the focused page, or `None` while the session has no pages.
    pub fn focused_index(&self) -> Option<usize> {
        if self.pages.is_empty() {
            None
        } else {
            Some(self.focused)
        }
    }

    pub fn focused_page(&self) -> Option<&Page> {
        self.pages.get(self.focused)
    }

    pub fn pending_page(&self) -> Option<&Page> {
        self.pending.as_ref()
    }

    pub fn pending_action(&self) -> ScanAction {
        self.pending_action
    }

    pub fn document_name(&self) -> &str {
        &self.document_name
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state == SessionState::Active
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn max_pages(&self) -> usize {
        self.max_pages
    }

    /// Whether another page may be added.
    pub fn can_add_page(&self) -> bool {
        self.is_active() && self.pages.len() < self.max_pages
    }

    /// Whether a committed page refers to `path`.
    pub fn is_committed_file(&self, path: &Path) -> bool {
        self.pages.iter().any(|page| page.references(path))
    }

    // -- Acquisition ----------------------------------------------------------

    /// Start an acquisition or edit under `action`.
    ///
    /// Replacing actions remember the focused page as their target. `Edit`
    /// also seeds the pending page from it, since no new image is acquired.
    /// A pending page left over from an earlier acquisition is discarded.
    #[instrument(skip(self), fields(pages = self.pages.len()))]
    pub fn begin_acquire(&mut self, action: ScanAction) -> Result<()> {
        self.ensure_active()?;
        if action == ScanAction::None {
            return Err(ScanError::ActionUnavailable { action });
        }
        let target = if action.replaces_focused() {
            let focused = self.pages.get(self.focused).ok_or(ScanError::IndexOutOfRange {
                index: self.focused,
                len: self.pages.len(),
            })?;
            Some(focused.clone())
        } else {
            if self.pages.len() >= self.max_pages {
                return Err(ScanError::PageLimitReached {
                    max: self.max_pages,
                });
            }
            None
        };

        self.drop_pending();
        self.pending_action = action;
        self.pending_target = target.as_ref().map(|page| page.id);
        if action == ScanAction::Edit {
            self.pending = target;
        }
        self.revision += 1;
        info!(%action, "acquisition started");
        Ok(())
    }

    /// Make `page` the pending page for the acquisition in progress.
    pub fn set_pending(&mut self, page: Page) -> Result<()> {
        self.ensure_active()?;
        if self.pending_action == ScanAction::None {
            return Err(ScanError::NoPendingAction);
        }

        debug!(page = %page.id, "pending page set");
        if let Some(previous) = self.pending.replace(page) {
            self.release_files(&previous);
        }
        self.revision += 1;
        Ok(())
    }

    /// Move the pending page's corners (original-photo space).
    ///
    /// Malformed corners are rejected and the pending page keeps its old ones.
    pub fn update_pending_corners(&mut self, corners: Quad) -> Result<()> {
        self.ensure_active()?;
        let pending = self.pending.as_mut().ok_or(ScanError::NoPendingPage)?;
        *pending = pending.with_corners(corners)?;
        self.revision += 1;
        Ok(())
    }

    /// Drop the pending page and any files only it referenced.
    pub fn discard_pending(&mut self) -> Result<()> {
        self.ensure_active()?;
        self.drop_pending();
        self.revision += 1;
        Ok(())
    }

    // -- Page lifecycle -------------------------------------------------------

    /// Merge `page` into the page list according to the pending action.
    ///
    /// `Add` appends and focuses the new page. The replacing actions swap the
    /// focused page in place and delete the files of the page they replaced.
    /// The replaced page must still be the one the action was started
    /// against, otherwise the commit is rejected as stale. Returns the index
    /// of the committed page.
    #[instrument(skip(self, page), fields(page = %page.id, action = %self.pending_action))]
    pub fn commit_pending_page(&mut self, page: Page) -> Result<usize> {
        self.ensure_active()?;
        let action = self.pending_action;
        if let Some(pending) = &self.pending {
            if pending.id != page.id {
                return Err(ScanError::StalePage { page: page.id });
            }
        }

        let (index, replaced) = match action {
            ScanAction::None => return Err(ScanError::NoPendingAction),
            ScanAction::Add => {
                if self.pages.len() >= self.max_pages {
                    return Err(ScanError::PageLimitReached {
                        max: self.max_pages,
                    });
                }
                self.pages.push(page);
                self.focused = self.pages.len() - 1;
                (self.focused, None)
            }
            ScanAction::Retake | ScanAction::Reselect | ScanAction::Edit => {
                let target = self.pending_target.ok_or(ScanError::NoPendingAction)?;
                let index = self.focused;
                match self.pages.get(index) {
                    Some(current) if current.id == target => {}
                    _ => return Err(ScanError::StalePage { page: target }),
                }
                let old = std::mem::replace(&mut self.pages[index], page);
                (index, Some(old))
            }
        };

        let leftover = self.pending.take();
        self.pending_action = ScanAction::None;
        self.pending_target = None;
        if let Some(old) = replaced {
            self.release_files(&old);
        }
        if let Some(leftover) = leftover {
            self.release_files(&leftover);
        }
        self.revision += 1;
        info!(index, pages = self.pages.len(), "page committed");
        Ok(index)
    }

    /// Remove the page at `index` and delete its files.
    ///
    /// Focus follows the focused page when an earlier page goes away. When
    /// the focused page itself is deleted, the page that shifted into its
    /// slot takes focus, or the new last page. Deleting the last remaining
    /// page cancels the session.
    #[instrument(skip(self))]
    pub fn delete_page(&mut self, index: usize) -> Result<SessionState> {
        self.ensure_active()?;
        if index >= self.pages.len() {
            return Err(ScanError::IndexOutOfRange {
                index,
                len: self.pages.len(),
            });
        }

        let removed = self.pages.remove(index);
        if index < self.focused {
            self.focused -= 1;
        } else if self.focused >= self.pages.len() {
            self.focused = self.pages.len().saturating_sub(1);
        }

        let pending_on_removed = self.pending_target == Some(removed.id)
            || self.pending.as_ref().map(|p| p.id) == Some(removed.id);
        if pending_on_removed {
            debug!(page = %removed.id, "pending edit targeted the deleted page");
            self.drop_pending();
        }
        self.release_files(&removed);

        if self.pages.is_empty() {
            self.drop_pending();
            self.state = SessionState::Cancelled;
            info!("last page deleted; session cancelled");
        } else {
            info!(index, focused = self.focused, pages = self.pages.len(), "page deleted");
        }
        self.revision += 1;
        Ok(self.state)
    }

    /// Swap the committed page at `index` for an updated copy of itself.
    ///
    /// Used after an in-place edit such as rotation. Files the old copy
    /// referenced and the new one does not are deleted, and a pending edit of
    /// the page is dropped since it no longer matches.
    pub fn replace_page(&mut self, index: usize, page: Page) -> Result<()> {
        self.ensure_active()?;
        let current = self.page(index)?;
        if current.id != page.id {
            return Err(ScanError::StalePage { page: page.id });
        }

        let id = page.id;
        let old = std::mem::replace(&mut self.pages[index], page);
        if self.pending_target == Some(id) || self.pending.as_ref().map(|p| p.id) == Some(id) {
            self.drop_pending();
        }
        self.release_files(&old);
        self.revision += 1;
        Ok(())
    }

    pub fn focus_on(&mut self, index: usize) -> Result<()> {
        self.ensure_active()?;
        self.page(index)?;
        self.focused = index;
        Ok(())
    }

    /// Rename the document. Blank names are refused and the old one kept.
    pub fn rename(&mut self, name: &str) -> bool {
        let name = name.trim();
        if name.is_empty() || !self.is_active() {
            return false;
        }
        self.document_name = name.to_string();
        true
    }

    // -- Completion -----------------------------------------------------------

    /// Hand out the cropped files in page order and delete the originals.
    ///
    /// Fails with `IncompletePage` before touching anything if a page was
    /// never cropped. An empty session finalizes as cancelled.
    #[instrument(skip(self), fields(pages = self.pages.len()))]
    pub fn finalize(&mut self) -> Result<FinalizedDocument> {
        self.ensure_active()?;
        let mut images = Vec::with_capacity(self.pages.len());
        for (index, page) in self.pages.iter().enumerate() {
            match &page.cropped_photo_path {
                Some(cropped) => images.push(cropped.clone()),
                None => return Err(ScanError::IncompletePage { index }),
            }
        }

        self.drop_pending();
        for page in &self.pages {
            if page.cropped_photo_path.as_deref() != Some(page.original_photo_path.as_path()) {
                remove_file_best_effort(&page.original_photo_path);
            }
        }

        self.state = if images.is_empty() {
            SessionState::Cancelled
        } else {
            SessionState::Finished
        };
        self.revision += 1;
        info!(pages = images.len(), name = %self.document_name, "document finalized");
        Ok(FinalizedDocument {
            images,
            name: self.document_name.clone(),
        })
    }

    /// Finish with a single non-image file as the whole result.
    ///
    /// Committed pages are discarded along with their files, since they will
    /// never be returned.
    pub fn finish_with_passthrough(&mut self, path: PathBuf) -> Result<FinalizedDocument> {
        self.ensure_active()?;
        self.drop_pending();
        self.discard_all_pages();
        self.state = SessionState::Finished;
        self.revision += 1;
        info!(path = %path.display(), "non-image document passed through");
        Ok(FinalizedDocument {
            images: vec![path],
            name: self.document_name.clone(),
        })
    }

    /// Abort the session, deleting every scratch file it owns.
    ///
    /// Does nothing once the session has ended.
    pub fn cancel(&mut self) {
        if !self.is_active() {
            return;
        }
        self.drop_pending();
        self.discard_all_pages();
        self.state = SessionState::Cancelled;
        self.revision += 1;
        info!("session cancelled");
    }

    // -- Internals ------------------------------------------------------------

    pub(crate) fn ensure_active(&self) -> Result<()> {
        if self.is_active() {
            Ok(())
        } else {
            Err(ScanError::SessionClosed)
        }
    }

    fn drop_pending(&mut self) {
        self.pending_action = ScanAction::None;
        self.pending_target = None;
        if let Some(pending) = self.pending.take() {
            self.release_files(&pending);
        }
    }

    fn discard_all_pages(&mut self) {
        let pages = std::mem::take(&mut self.pages);
        self.focused = 0;
        for page in &pages {
            self.release_files(page);
        }
    }

    /// Delete the files of `page` that no committed or pending page still
    /// references.
    fn release_files(&self, page: &Page) {
        for path in page.owned_files() {
            let shared = self.is_committed_file(path)
                || self
                    .pending
                    .as_ref()
                    .is_some_and(|pending| pending.references(path));
            if shared {
                continue;
            }
            if !remove_file_best_effort(path) {
                warn!(page = %page.id, path = %path.display(), "page file left behind");
            }
        }
    }
}
