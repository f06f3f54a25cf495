//! Editing session
//!
//! ```text
//! Viewing ──begin_edit / begin_create──► Editing ──submit──► Saving
//!    ▲                                     │  ▲                 │
//!    └──────────────discard────────────────┘  └────failure──────┤
//!    ▲                                                          │
//!    └──────────────────────success (cache replaced)────────────┘
//! ```
//!
//! The session lock is never held across an await. Decoding and the save
//! round trip run unlocked; their results are applied to whatever snapshot is
//! current when they settle, provided it belongs to the same draft. While
//! `Saving`, edits fail with [`EditorError::SaveInProgress`] and a second
//! submit is ignored.

use crate::cache::ProductCache;
use crate::draft::{DraftSource, ProductDraft, ProductField};
use crate::error::{EditBlocked, EditorError, EditorResult};
use crate::gallery::{
    AddImagesOutcome, FileDecoder, GallerySelection, RemoveImageOutcome, SelectedFile,
    decode_selection, merge_batch, remove_image,
};
use crate::id::TempIdAllocator;
use crate::persistence::ProductRepository;
use crate::variant::{self, SizeField};
use parking_lot::{Mutex, MutexGuard};
use serde::Serialize;
use shared::Product;
use std::sync::Arc;

/// Where the session is in the edit cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Viewing,
    Editing,
    Saving,
}

/// Result of a submit
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Server copy, now in the cache
    Saved(Product),
    /// A save was already in flight
    Ignored,
}

#[derive(Debug)]
struct SessionInner {
    state: SessionState,
    viewed: Option<Product>,
    draft: Option<ProductDraft>,
    selected_image: usize,
    /// Bumped whenever a draft is opened or closed
    generation: u64,
}

impl SessionInner {
    fn require_viewing(&self) -> EditorResult<()> {
        match self.state {
            SessionState::Viewing => Ok(()),
            SessionState::Editing => Err(EditorError::AlreadyEditing),
            SessionState::Saving => Err(EditorError::SaveInProgress),
        }
    }

    fn require_editing(&self) -> EditorResult<&ProductDraft> {
        match self.state {
            SessionState::Editing => self.draft.as_ref().ok_or(EditorError::NotEditing),
            SessionState::Saving => Err(EditorError::SaveInProgress),
            SessionState::Viewing => Err(EditorError::NotEditing),
        }
    }

    fn open(&mut self, draft: ProductDraft) -> ProductDraft {
        self.state = SessionState::Editing;
        self.selected_image = 0;
        self.generation = self.generation.wrapping_add(1);
        self.draft = Some(draft.clone());
        draft
    }

    fn close(&mut self) {
        self.state = SessionState::Viewing;
        self.draft = None;
        self.selected_image = 0;
        self.generation = self.generation.wrapping_add(1);
    }

    /// Swap in the next snapshot of the open draft
    ///
    /// The viewer selection is pulled back onto the last image if the gallery
    /// shrank underneath it.
    fn replace_draft(&mut self, next: ProductDraft) {
        let last = next.product().images.len().saturating_sub(1);
        self.selected_image = self.selected_image.min(last);
        self.draft = Some(next);
    }
}

/// Handle to one product editing session (clones share the session)
#[derive(Clone)]
pub struct EditSession {
    inner: Arc<Mutex<SessionInner>>,
    repository: Arc<dyn ProductRepository>,
    decoder: Arc<dyn FileDecoder>,
    cache: ProductCache,
    ids: Arc<TempIdAllocator>,
}

impl EditSession {
    pub fn new(
        repository: Arc<dyn ProductRepository>,
        decoder: Arc<dyn FileDecoder>,
        cache: ProductCache,
    ) -> Self {
        Self {
            inner: Arc::new(Mutex::new(SessionInner {
                state: SessionState::Viewing,
                viewed: None,
                draft: None,
                selected_image: 0,
                generation: 0,
            })),
            repository,
            decoder,
            cache,
            ids: Arc::new(TempIdAllocator::new()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, SessionInner> {
        self.inner.lock()
    }

    pub fn state(&self) -> SessionState {
        self.lock().state
    }

    /// Current draft, if one is open
    pub fn draft(&self) -> Option<ProductDraft> {
        self.lock().draft.clone()
    }

    /// Product on screen
    pub fn viewed(&self) -> Option<Product> {
        self.lock().viewed.clone()
    }

    /// Gallery viewer position
    pub fn selected_image(&self) -> usize {
        self.lock().selected_image
    }

    pub fn cache(&self) -> &ProductCache {
        &self.cache
    }

    // ========== Viewing ==========

    /// Show a product, from the cache when possible
    pub async fn view(&self, id: &str) -> EditorResult<Product> {
        self.lock().require_viewing()?;

        let product = match self.cache.get(id) {
            Some(product) => product,
            None => {
                let product = self.repository.fetch(id).await?;
                self.cache.insert(product.clone());
                product
            }
        };

        let mut inner = self.lock();
        inner.require_viewing()?;
        inner.viewed = Some(product.clone());
        tracing::debug!(product_id = %id, "Viewing product");
        Ok(product)
    }

    /// Open a draft of the viewed product
    pub fn begin_edit(&self) -> EditorResult<ProductDraft> {
        let mut inner = self.lock();
        inner.require_viewing()?;
        let product = inner.viewed.clone().ok_or(EditorError::NothingSelected)?;
        tracing::info!(product_id = %product.id, "Editing product");
        let draft = ProductDraft::open(DraftSource::Existing(product), &self.ids);
        Ok(inner.open(draft))
    }

    /// Open a draft for a new product
    pub fn begin_create(&self) -> EditorResult<ProductDraft> {
        let mut inner = self.lock();
        inner.require_viewing()?;
        tracing::info!("Creating product");
        let draft = ProductDraft::open(DraftSource::Template, &self.ids);
        Ok(inner.open(draft))
    }

    /// Drop the draft and go back to viewing
    pub fn discard(&self) -> EditorResult<()> {
        let mut inner = self.lock();
        let dirty = inner.require_editing()?.is_dirty();
        tracing::info!(dirty, "Draft discarded");
        inner.close();
        Ok(())
    }

    /// Delete the viewed product
    pub async fn delete(&self) -> EditorResult<()> {
        let id = {
            let inner = self.lock();
            inner.require_viewing()?;
            inner
                .viewed
                .as_ref()
                .map(|p| p.id.clone())
                .ok_or(EditorError::NothingSelected)?
        };

        if let Err(e) = self.repository.delete(&id).await {
            tracing::warn!(
                product_id = %id,
                error = %e,
                category = e.code.category().name(),
                "Delete failed"
            );
            return Err(e.into());
        }

        self.cache.remove(&id);
        let mut inner = self.lock();
        if inner.viewed.as_ref().is_some_and(|p| p.id == id) {
            inner.viewed = None;
        }
        tracing::info!(product_id = %id, "Product deleted");
        Ok(())
    }

    // ========== Editing ==========

    fn edit<F>(&self, f: F) -> EditorResult<ProductDraft>
    where
        F: FnOnce(&ProductDraft) -> EditorResult<ProductDraft>,
    {
        let mut inner = self.lock();
        let next = match f(inner.require_editing()?) {
            Ok(next) => next,
            Err(e) => {
                tracing::debug!(
                    error = %e,
                    category = e.code().category().name(),
                    "Edit refused"
                );
                return Err(e);
            }
        };
        inner.replace_draft(next.clone());
        Ok(next)
    }

    /// Revert every pending change, staying in the editor
    pub fn reset(&self) -> EditorResult<ProductDraft> {
        self.edit(|draft| Ok(draft.reset()))
    }

    pub fn set_field(&self, field: ProductField) -> EditorResult<ProductDraft> {
        self.edit(|draft| Ok(draft.apply_field_change(field)))
    }

    pub fn add_variant(&self) -> EditorResult<ProductDraft> {
        self.edit(|draft| {
            let variants = variant::add_variant(&draft.product().variants, &self.ids);
            Ok(draft.apply_variants_change(variants))
        })
    }

    pub fn remove_variant(&self, index: usize) -> EditorResult<ProductDraft> {
        self.edit(|draft| {
            let variants = variant::remove_variant(&draft.product().variants, index)?;
            Ok(draft.apply_variants_change(variants))
        })
    }

    pub fn set_variant_color(&self, index: usize, color: impl Into<String>) -> EditorResult<ProductDraft> {
        self.edit(|draft| {
            let variants = variant::update_variant_color(&draft.product().variants, index, color)?;
            Ok(draft.apply_variants_change(variants))
        })
    }

    pub fn add_size(&self, variant_index: usize) -> EditorResult<ProductDraft> {
        self.edit(|draft| {
            let variants = variant::add_size(&draft.product().variants, variant_index, &self.ids)?;
            Ok(draft.apply_variants_change(variants))
        })
    }

    pub fn remove_size(&self, variant_index: usize, size_index: usize) -> EditorResult<ProductDraft> {
        self.edit(|draft| {
            let variants = variant::remove_size(&draft.product().variants, variant_index, size_index)?;
            Ok(draft.apply_variants_change(variants))
        })
    }

    pub fn update_size(
        &self,
        variant_index: usize,
        size_index: usize,
        field: SizeField,
    ) -> EditorResult<ProductDraft> {
        self.edit(|draft| {
            let variants =
                variant::update_size(&draft.product().variants, variant_index, size_index, field)?;
            Ok(draft.apply_variants_change(variants))
        })
    }

    /// Decode `files` and append them to the gallery
    ///
    /// Decoding runs without the lock. The batch is merged into the draft
    /// current at completion, with room checked again at that point. If the
    /// draft was closed meanwhile, even if another one has been opened since,
    /// the batch is dropped and [`EditorError::NotEditing`] returned.
    pub async fn add_images(&self, files: &[SelectedFile]) -> EditorResult<AddImagesOutcome> {
        let (generation, current_len) = {
            let inner = self.lock();
            let len = inner.require_editing()?.product().images.len();
            (inner.generation, len)
        };

        let batch = decode_selection(current_len, files, self.decoder.as_ref()).await?;

        let mut inner = self.lock();
        if inner.generation != generation {
            tracing::debug!(
                decoded = batch.images.len(),
                "Draft closed while decoding, images dropped"
            );
            return Err(EditorError::NotEditing);
        }
        let draft = inner.require_editing()?;
        let outcome = merge_batch(&draft.product().images, batch)?;
        let next = draft.apply_images_change(outcome.images.clone());
        inner.replace_draft(next);
        tracing::debug!(
            accepted = outcome.accepted,
            rejected = outcome.rejected,
            failed = outcome.failures.len(),
            "Images added"
        );
        Ok(outcome)
    }

    /// Remove one image and move the gallery selection
    pub fn remove_image(&self, index: usize) -> EditorResult<RemoveImageOutcome> {
        let mut inner = self.lock();
        let selected = inner.selected_image;
        let draft = inner.require_editing()?;
        let outcome = remove_image(&draft.product().images, index, selected)?;
        let next = draft.apply_images_change(outcome.images.clone());
        inner.draft = Some(next);
        inner.selected_image = match outcome.selection {
            GallerySelection::Open(i) => i,
            GallerySelection::Closed => 0,
        };
        Ok(outcome)
    }

    /// Point the gallery viewer at `index`
    pub fn select_image(&self, index: usize) -> EditorResult<()> {
        let mut inner = self.lock();
        let len = inner.require_editing()?.product().images.len();
        if index >= len {
            return Err(EditBlocked::ImageOutOfRange { index }.into());
        }
        inner.selected_image = index;
        Ok(())
    }

    // ========== Saving ==========

    /// Validate and save the draft
    ///
    /// A validation failure keeps the session in `Editing`. A persistence
    /// failure returns to `Editing` with the draft untouched.
    pub async fn submit(&self) -> EditorResult<SubmitOutcome> {
        let (cleaned, target) = {
            let mut inner = self.lock();
            if inner.state == SessionState::Saving {
                tracing::debug!("Submit ignored, save in flight");
                return Ok(SubmitOutcome::Ignored);
            }
            let draft = inner.require_editing()?;
            let cleaned = match draft.prepare_for_submit() {
                Ok(cleaned) => cleaned,
                Err(e) => {
                    tracing::debug!(error = %e, field = e.field(), "Draft rejected");
                    return Err(e.into());
                }
            };
            let target = (!draft.is_new()).then(|| draft.product().id.clone());
            inner.state = SessionState::Saving;
            (cleaned, target)
        };

        tracing::info!(
            product_id = target.as_deref().unwrap_or("<new>"),
            removed_images = cleaned.removed_images.len(),
            "Saving product"
        );
        let result = match &target {
            Some(id) => {
                self.repository
                    .update(id, &cleaned.product, &cleaned.removed_images)
                    .await
            }
            None => self.repository.create(&cleaned.product).await,
        };

        let mut inner = self.lock();
        match result {
            Ok(saved) => {
                tracing::info!(product_id = %saved.id, "Product saved");
                self.cache.replace(saved.clone());
                inner.close();
                inner.viewed = Some(saved.clone());
                Ok(SubmitOutcome::Saved(saved))
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    code = %e.code,
                    category = e.code.category().name(),
                    "Save failed, draft kept"
                );
                inner.state = SessionState::Editing;
                Err(e.into())
            }
        }
    }
}
