// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Capture coordinator — connects the camera, picker, and shared files to the
// document session.
//
// The presentation layer calls plain operations here and renders whatever
// the session reports back; it owns no scan state of its own.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use docscan_bridge::{PICKER_MIME_TYPES, ScannerBridge};
use docscan_core::config::ScanConfig;
use docscan_core::error::{Result, ScanError};
use docscan_core::types::{
    AcquisitionSource, PageId, Quad, RotationDirection, ScanAction, is_image_mime,
};
use docscan_document::store::{ScratchKind, remove_file_best_effort};
use docscan_document::{
    CornerDetector, Imaging, NoCornerDetection, Page, PreviewMapping, ProcessorImaging, ScratchDir,
    mime,
};
use tracing::{debug, info, instrument, warn};

use crate::session::{DocumentSession, FinalizedDocument, SessionState};
use crate::worker::{CropJob, CropOutcome, CropTicket};

/// How an acquisition ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AcquireOutcome {
    /// A pending page is ready for corner adjustment.
    Pending(PageId),
    /// The acquired file was not an image. The session finished with it as
    /// the only result.
    Passthrough(FinalizedDocument),
    /// The user backed out; the page list is unchanged.
    Resumed,
    /// The user backed out before any page existed; the session is over.
    Aborted,
}

/// A file handed over by the camera, the picker, or the share queue.
struct AcquiredFile {
    path: PathBuf,
    source: AcquisitionSource,
    dimensions: Option<(u32, u32)>,
    mime_type: Option<String>,
}

/// Drives one scan session against a host's native capabilities.
pub struct CaptureCoordinator {
    bridge: Arc<dyn ScannerBridge>,
    imaging: Arc<dyn Imaging>,
    detector: Arc<dyn CornerDetector>,
    store: ScratchDir,
    config: ScanConfig,
    shared_files: VecDeque<PathBuf>,
    session: DocumentSession,
    apply_in_flight: Option<CropTicket>,
}

impl CaptureCoordinator {
    /// Coordinator with the default imaging and no corner detection.
    pub fn new(config: ScanConfig, bridge: Arc<dyn ScannerBridge>) -> Result<Self> {
        Self::with_capabilities(
            config,
            bridge,
            Arc::new(ProcessorImaging),
            Arc::new(NoCornerDetection),
        )
    }

    pub fn with_capabilities(
        config: ScanConfig,
        bridge: Arc<dyn ScannerBridge>,
        imaging: Arc<dyn Imaging>,
        detector: Arc<dyn CornerDetector>,
    ) -> Result<Self> {
        config.validate()?;
        let store = ScratchDir::from_config(config.scratch_dir.as_deref())?;
        let session = DocumentSession::new(config.max_num_documents);
        info!(
            platform = bridge.platform_name(),
            max_pages = config.max_num_documents,
            gallery_mode = config.gallery_mode,
            "scan session opened"
        );
        Ok(Self {
            bridge,
            imaging,
            detector,
            store,
            config,
            shared_files: VecDeque::new(),
            session,
            apply_in_flight: None,
        })
    }

    /// Queue files the host shared into the scanner. Each one is consumed by
    /// an `Add` acquisition before interactive picking resumes.
    pub fn with_shared_files(mut self, files: impl IntoIterator<Item = PathBuf>) -> Self {
        self.shared_files.extend(files);
        self
    }

    pub fn session(&self) -> &DocumentSession {
        &self.session
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    pub fn store(&self) -> &ScratchDir {
        &self.store
    }

    pub fn is_apply_in_flight(&self) -> bool {
        self.apply_in_flight.is_some()
    }

    /// Whether the "add page" control should be shown.
    pub fn can_add_page(&self) -> bool {
        self.session.can_add_page()
    }

    /// Whether the UI should offer `action` right now.
    pub fn is_action_available(&self, action: ScanAction) -> bool {
        if !self.session.is_active() {
            return false;
        }
        let has_pages = !self.session.is_empty();
        match action {
            ScanAction::None => false,
            ScanAction::Add => self.session.can_add_page(),
            ScanAction::Retake => has_pages && !self.config.gallery_mode,
            ScanAction::Reselect => has_pages && self.config.picker_available(),
            ScanAction::Edit => has_pages,
        }
    }

    fn source_for(&self, action: ScanAction) -> AcquisitionSource {
        match action {
            ScanAction::Add if !self.shared_files.is_empty() => AcquisitionSource::SharedFile,
            ScanAction::Add if self.config.gallery_mode => AcquisitionSource::Picker,
            ScanAction::Reselect => AcquisitionSource::Picker,
            _ => AcquisitionSource::Camera,
        }
    }

    // -- Acquisition ----------------------------------------------------------

    /// Acquire an image for `action` and make it the pending page.
    ///
    /// `Edit` acquires nothing and goes straight to the focused page's
    /// corners. A non-image file ends the session as a passthrough. Failures
    /// of the camera, picker, or decoder leave the page list as it was and
    /// are reported as `ScanError::Acquisition`.
    #[instrument(skip(self))]
    pub fn acquire(&mut self, action: ScanAction) -> Result<AcquireOutcome> {
        self.ensure_idle()?;
        self.session.ensure_active()?;
        if !self.is_action_available(action) {
            if action == ScanAction::Add {
                return Err(ScanError::PageLimitReached {
                    max: self.session.max_pages(),
                });
            }
            return Err(ScanError::ActionUnavailable { action });
        }

        self.session.begin_acquire(action)?;
        if action == ScanAction::Edit {
            let id = self
                .session
                .pending_page()
                .map(|page| page.id)
                .ok_or(ScanError::NoPendingPage)?;
            return Ok(AcquireOutcome::Pending(id));
        }

        let source = self.source_for(action);
        let acquired = match self.acquire_file(source) {
            Ok(Some(acquired)) => acquired,
            Ok(None) => {
                debug!(?source, "acquisition cancelled by user");
                return self.cancel_acquisition();
            }
            Err(err) => {
                warn!(?source, error = %err, "acquisition failed");
                self.session.discard_pending()?;
                return Err(as_acquisition_error(err));
            }
        };

        if acquired.source != AcquisitionSource::Camera && !self.is_image(&acquired)? {
            let doc = self.session.finish_with_passthrough(acquired.path)?;
            return Ok(AcquireOutcome::Passthrough(doc));
        }

        let page = self.page_from(acquired)?;
        let id = page.id;
        self.session.set_pending(page)?;
        info!(page = %id, "page acquired");
        Ok(AcquireOutcome::Pending(id))
    }

    fn acquire_file(&mut self, source: AcquisitionSource) -> Result<Option<AcquiredFile>> {
        match source {
            AcquisitionSource::Camera => Ok(self.bridge.capture_photo()?.map(|photo| AcquiredFile {
                path: photo.path,
                source,
                dimensions: Some((photo.width, photo.height)),
                mime_type: None,
            })),
            AcquisitionSource::Picker => {
                Ok(self
                    .bridge
                    .pick_document(PICKER_MIME_TYPES)?
                    .map(|picked| AcquiredFile {
                        path: picked.path,
                        source,
                        dimensions: None,
                        mime_type: picked.mime_type,
                    }))
            }
            AcquisitionSource::SharedFile => Ok(self.shared_files.pop_front().map(|path| {
                debug!(path = %path.display(), "using shared file");
                AcquiredFile {
                    path,
                    source,
                    dimensions: None,
                    mime_type: None,
                }
            })),
        }
    }

    /// Decide between cropping and passthrough. The picker's MIME type wins;
    /// otherwise the file itself is inspected.
    fn is_image(&mut self, acquired: &AcquiredFile) -> Result<bool> {
        let mime_type = acquired
            .mime_type
            .clone()
            .or_else(|| self.bridge.mime_type_of(&acquired.path));
        if let Some(mime_type) = mime_type {
            return Ok(is_image_mime(&mime_type));
        }
        match mime::detect_document_type(&acquired.path) {
            Ok(doc) => Ok(doc.is_raster_image()),
            Err(err) => {
                self.session.discard_pending()?;
                Err(as_acquisition_error(err))
            }
        }
    }

    /// Bring an acquired image into the scratch dir and build its page.
    fn page_from(&mut self, acquired: AcquiredFile) -> Result<Page> {
        // Picked and shared files belong to the user; work on a copy.
        let photo = match acquired.source {
            AcquisitionSource::Camera => acquired.path,
            _ => match self.store.copy_to_fresh(&acquired.path, ScratchKind::Original) {
                Ok(copy) => copy,
                Err(err) => {
                    self.session.discard_pending()?;
                    return Err(as_acquisition_error(err));
                }
            },
        };

        let dimensions = match acquired.dimensions {
            Some(dimensions) => Ok(dimensions),
            None => self.imaging.dimensions(&photo),
        };
        let (width, height) = match dimensions {
            Ok(dimensions) => dimensions,
            Err(err) => {
                self.abandon_photo(&photo)?;
                return Err(as_acquisition_error(err));
            }
        };

        match Page::from_capture(
            &photo,
            width,
            height,
            self.detector.as_ref(),
            self.config.corner_fallback_margin,
        ) {
            Ok(page) => Ok(page),
            Err(err) => {
                self.abandon_photo(&photo)?;
                // A photo without a usable size cannot be previewed at all.
                if !err.is_recoverable() {
                    warn!(error = %err, "ending session");
                    self.cancel();
                }
                Err(err)
            }
        }
    }

    fn abandon_photo(&mut self, photo: &Path) -> Result<()> {
        remove_file_best_effort(photo);
        self.session.discard_pending()
    }

    /// Back out of the current acquisition or crop editor.
    ///
    /// With pages already committed the user returns to them unchanged;
    /// with none, the whole session is cancelled.
    pub fn cancel_acquisition(&mut self) -> Result<AcquireOutcome> {
        self.session.discard_pending()?;
        if self.session.is_empty() {
            self.cancel();
            return Ok(AcquireOutcome::Aborted);
        }
        Ok(AcquireOutcome::Resumed)
    }

    // -- Corner editing -------------------------------------------------------

    /// Preview placement of the pending page inside a container, with its
    /// corners in preview space.
    pub fn pending_preview(
        &self,
        container_width: f64,
        container_height: f64,
    ) -> Result<(PreviewMapping, Quad)> {
        let pending = self
            .session
            .pending_page()
            .ok_or(ScanError::NoPendingPage)?;
        let mapping = PreviewMapping::fit(
            pending.original_width,
            pending.original_height,
            container_width,
            container_height,
        )?;
        let corners = mapping.to_preview(&pending.corners);
        Ok((mapping, corners))
    }

    /// Store corners the user dragged in preview space.
    pub fn adjust_pending_corners(&mut self, preview: &Quad, mapping: &PreviewMapping) -> Result<()> {
        self.session
            .update_pending_corners(mapping.to_original(preview))
    }

    /// Quarter-turn the pending page.
    ///
    /// When the pending page still shares its photo with a committed page
    /// (an edit in progress), the photo is copied first so the committed
    /// page stays untouched until the edit is applied.
    #[instrument(skip(self))]
    pub fn rotate_pending(&mut self, direction: RotationDirection) -> Result<()> {
        self.ensure_idle()?;
        self.session.ensure_active()?;
        let pending = self
            .session
            .pending_page()
            .cloned()
            .ok_or(ScanError::NoPendingPage)?;

        let mut source = pending.clone();
        let mut copied = None;
        if self.session.is_committed_file(&pending.original_photo_path) {
            let copy = self
                .store
                .copy_to_fresh(&pending.original_photo_path, ScratchKind::Original)?;
            source.original_photo_path = copy.clone();
            source.cropped_photo_path = None;
            copied = Some(copy);
        }

        let rotated = match source.rotate90(
            self.imaging.as_ref(),
            direction,
            self.config.corner_fallback_margin,
        ) {
            Ok(rotated) => rotated,
            Err(err) => {
                if let Some(copy) = copied {
                    remove_file_best_effort(&copy);
                }
                return Err(err);
            }
        };
        self.session.set_pending(rotated)
    }

    // -- Apply ----------------------------------------------------------------

    /// Hand out the crop of the pending page as a job.
    ///
    /// Only one apply may be outstanding; a second request fails with
    /// `ApplyInFlight` until `finish_apply` or `abandon_apply`.
    pub fn begin_apply(&mut self) -> Result<CropJob> {
        self.ensure_idle()?;
        self.session.ensure_active()?;
        let page = self
            .session
            .pending_page()
            .cloned()
            .ok_or(ScanError::NoPendingPage)?;

        let ticket = CropTicket {
            page: page.id,
            revision: self.session.revision(),
        };
        self.apply_in_flight = Some(ticket);
        debug!(page = %ticket.page, revision = ticket.revision, "apply started");
        Ok(CropJob::new(
            ticket,
            page,
            Arc::clone(&self.imaging),
            self.store.clone(),
            self.config.cropped_image_quality,
        ))
    }

    /// Commit a finished crop, unless the session moved on while it ran.
    ///
    /// A stale result has its cropped file deleted and is reported as
    /// `StalePage`. A failed crop leaves the pending page in place.
    #[instrument(skip(self, outcome), fields(page = %outcome.ticket.page))]
    pub fn finish_apply(&mut self, outcome: CropOutcome) -> Result<usize> {
        let ticket = outcome.ticket;
        let expected = self.apply_in_flight == Some(ticket);
        if expected {
            self.apply_in_flight = None;
        }

        let page = outcome.result?;
        let current = self.session.pending_page().map(|pending| pending.id);
        let stale = !expected
            || !self.session.is_active()
            || self.session.revision() != ticket.revision
            || current != Some(ticket.page);
        if stale {
            warn!(revision = ticket.revision, "discarding crop of a page that changed");
            discard_crop(&page);
            return Err(ScanError::StalePage { page: ticket.page });
        }

        match self.session.commit_pending_page(page.clone()) {
            Ok(index) => Ok(index),
            Err(err) => {
                discard_crop(&page);
                Err(err)
            }
        }
    }

    /// Forget an outstanding apply whose job will never be finished.
    pub fn abandon_apply(&mut self) {
        if let Some(ticket) = self.apply_in_flight.take() {
            debug!(page = %ticket.page, "apply abandoned");
        }
    }

    /// Crop the pending page on the blocking pool and commit it.
    pub async fn apply_pending(&mut self) -> Result<usize> {
        let job = self.begin_apply()?;
        let outcome = job.run_in_background().await;
        self.finish_apply(outcome)
    }

    /// Crop the pending page on the current thread and commit it.
    pub fn apply_pending_blocking(&mut self) -> Result<usize> {
        let job = self.begin_apply()?;
        let outcome = job.run();
        self.finish_apply(outcome)
    }

    // -- Committed pages ------------------------------------------------------

    /// Quarter-turn a committed page and re-crop it against the new fallback
    /// corners. If the re-crop fails the photo is turned back and the page
    /// is left as it was.
    #[instrument(skip(self))]
    pub fn rotate_page(&mut self, index: usize, direction: RotationDirection) -> Result<()> {
        self.ensure_idle()?;
        self.session.ensure_active()?;
        let page = self.session.page(index)?.clone();
        let margin = self.config.corner_fallback_margin;

        let rotated = page.rotate90(self.imaging.as_ref(), direction, margin)?;
        let recropped = match rotated.apply_crop(
            self.imaging.as_ref(),
            &self.store,
            self.config.cropped_image_quality,
        ) {
            Ok(recropped) => recropped,
            Err(err) => {
                if let Err(undo) = rotated.rotate90(self.imaging.as_ref(), direction.reversed(), margin) {
                    warn!(error = %undo, "could not turn photo back after failed re-crop");
                }
                return Err(err);
            }
        };

        if let Err(err) = self.session.replace_page(index, recropped.clone()) {
            discard_crop(&recropped);
            return Err(err);
        }
        info!(index, ?direction, "page rotated");
        Ok(())
    }

    pub fn delete_page(&mut self, index: usize) -> Result<SessionState> {
        self.session.delete_page(index)
    }

    pub fn focus_on(&mut self, index: usize) -> Result<()> {
        self.session.focus_on(index)
    }

    pub fn rename(&mut self, name: &str) -> bool {
        self.session.rename(name)
    }

    // -- Completion -----------------------------------------------------------

    pub fn finish(&mut self) -> Result<FinalizedDocument> {
        self.ensure_idle()?;
        self.session.finalize()
    }

    /// Abort the session and delete its scratch files.
    pub fn cancel(&mut self) {
        self.apply_in_flight = None;
        self.shared_files.clear();
        self.session.cancel();
    }

    fn ensure_idle(&self) -> Result<()> {
        if self.apply_in_flight.is_some() {
            Err(ScanError::ApplyInFlight)
        } else {
            Ok(())
        }
    }
}

fn discard_crop(page: &Page) {
    if let Some(cropped) = &page.cropped_photo_path {
        remove_file_best_effort(cropped);
    }
}

/// Capability failures during acquisition are reported as one kind.
fn as_acquisition_error(err: ScanError) -> ScanError {
    match err {
        ScanError::Acquisition(_) => err,
        other => ScanError::Acquisition(other.to_string()),
    }
}
