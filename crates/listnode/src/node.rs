//! The list controller.
//!
//! [`ListNode`] owns the item sequence and keeps three things in step with
//! it: the [`CellCache`], the [`IndexResolver`] and the [`SectionMap`].
//! Everything runs on the thread that owns the node; collaborators are held
//! through [`Weak`] references and a dropped collaborator simply reads as an
//! unavailable capability.

use crate::cache::{CacheStats, CellCache, CellSlot, Completion};
use crate::renderer::{CellRenderer, CellTicket, Generation};
use crate::resolver::IndexResolver;
use crate::sections::SectionMap;
use crate::source::{ListDataSource, ListDelegate};
use crate::surface::ScrollSurface;
use listnode_core::{
    AppliedBatch, Batch, EdgeInsets, IndexPath, ListConfig, ListError, Result, ScrollPosition,
    ScrollTarget, VisibleRange,
};
use std::rc::{Rc, Weak};

/// Lifecycle phase of a list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListPhase {
    /// No items
    Empty,
    /// Items present, not mutating
    Populated,
    /// A batch is being applied.
    ///
    /// Only held while [`ListNode::perform_batch`] runs the batch, so
    /// [`ListNode::phase`] never reports it once the call returns.
    Mutating,
}

impl ListPhase {
    const fn for_len(len: usize) -> Self {
        if len == 0 {
            Self::Empty
        } else {
            Self::Populated
        }
    }
}

/// Virtualized list controller.
///
/// `T` is the caller's item type and `H` the renderer's cell handle.
pub struct ListNode<T, H> {
    config: ListConfig,
    items: Vec<T>,
    sections: SectionMap,
    cache: CellCache<H>,
    resolver: IndexResolver,
    phase: ListPhase,
    renderer: Option<Weak<dyn CellRenderer<T, H>>>,
    surface: Option<Weak<dyn ScrollSurface>>,
    data_source: Option<Weak<dyn ListDataSource<T>>>,
    delegate: Option<Weak<dyn ListDelegate>>,
    /// Last known geometry, used when no surface is attached
    content_offset: f32,
    viewport_extent: f32,
    visible: Option<VisibleRange>,
}

impl<T, H: Clone> Default for ListNode<T, H> {
    fn default() -> Self {
        Self::new(ListConfig::default())
    }
}

impl<T, H: Clone> ListNode<T, H> {
    pub fn new(config: ListConfig) -> Self {
        let config = config.sanitized();
        Self {
            resolver: IndexResolver::new(&config),
            config,
            items: Vec::new(),
            sections: SectionMap::default(),
            cache: CellCache::new(),
            phase: ListPhase::Empty,
            renderer: None,
            surface: None,
            data_source: None,
            delegate: None,
            content_offset: 0.0,
            viewport_extent: 0.0,
            visible: None,
        }
    }

    // === Collaborators ===

    pub fn set_renderer<R: CellRenderer<T, H> + 'static>(&mut self, renderer: &Rc<R>) {
        self.renderer = Some(Rc::downgrade(renderer) as Weak<dyn CellRenderer<T, H>>);
    }

    pub fn set_surface<S: ScrollSurface + 'static>(&mut self, surface: &Rc<S>) {
        self.surface = Some(Rc::downgrade(surface) as Weak<dyn ScrollSurface>);
    }

    pub fn set_data_source<D: ListDataSource<T> + 'static>(&mut self, source: &Rc<D>) {
        self.data_source = Some(Rc::downgrade(source) as Weak<dyn ListDataSource<T>>);
    }

    pub fn set_delegate<D: ListDelegate + 'static>(&mut self, delegate: &Rc<D>) {
        self.delegate = Some(Rc::downgrade(delegate) as Weak<dyn ListDelegate>);
    }

    fn renderer(&self) -> Option<Rc<dyn CellRenderer<T, H>>> {
        self.renderer.as_ref().and_then(Weak::upgrade)
    }

    fn surface(&self) -> Option<Rc<dyn ScrollSurface>> {
        self.surface.as_ref().and_then(Weak::upgrade)
    }

    fn data_source(&self) -> Option<Rc<dyn ListDataSource<T>>> {
        self.data_source.as_ref().and_then(Weak::upgrade)
    }

    fn delegate(&self) -> Option<Rc<dyn ListDelegate>> {
        self.delegate.as_ref().and_then(Weak::upgrade)
    }

    // === Queries ===

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn item(&self, index: usize) -> Result<&T> {
        self.items
            .get(index)
            .ok_or_else(|| ListError::out_of_bounds(index, self.items.len()))
    }

    /// Current phase; always [`ListPhase::Empty`] or [`ListPhase::Populated`]
    /// between calls.
    pub const fn phase(&self) -> ListPhase {
        self.phase
    }

    pub const fn config(&self) -> &ListConfig {
        &self.config
    }

    /// Visible range computed by the last reconciliation.
    pub const fn visible_range(&self) -> Option<&VisibleRange> {
        self.visible.as_ref()
    }

    pub const fn generation(&self) -> Generation {
        self.cache.generation()
    }

    pub const fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Number of materialized cells.
    pub fn cached_cell_count(&self) -> usize {
        self.cache.len()
    }

    /// Cached handle for `index`, without creating one.
    pub fn cached_cell(&self, index: usize) -> Option<H> {
        self.cache.get(index).cloned()
    }

    pub fn is_cell_pending(&self, index: usize) -> bool {
        self.cache.is_pending(index)
    }

    pub const fn content_offset(&self) -> f32 {
        self.content_offset
    }

    pub const fn viewport_extent(&self) -> f32 {
        self.viewport_extent
    }

    pub fn content_extent(&mut self) -> f32 {
        self.resolver.content_extent()
    }

    pub fn offset_for_index(&mut self, index: usize) -> Result<f32> {
        self.resolver.offset_for_index(index)
    }

    pub fn number_of_sections(&self) -> usize {
        self.sections.len()
    }

    pub fn number_of_items_in_section(&self, section: usize) -> Result<usize> {
        self.sections.count(section)
    }

    pub fn index_path_for_index(&self, index: usize) -> Result<IndexPath> {
        self.sections.path_for(index)
    }

    pub fn index_for_index_path(&self, path: IndexPath) -> Result<usize> {
        self.sections.flat_index(path)
    }

    // === Cells ===

    /// Cell for the item at `index`, created through the renderer if needed.
    pub fn cell_for_item_at_index(&mut self, index: usize) -> Result<CellSlot<H>> {
        let renderer = self.renderer();
        self.cache
            .cell_for_index(index, &self.items, renderer.as_deref())
    }

    /// Cell for the item at `path`.
    pub fn cell_for_item_at_index_path(&mut self, path: IndexPath) -> Result<CellSlot<H>> {
        let index = self.sections.flat_index(path)?;
        self.cell_for_item_at_index(index)
    }

    /// Deliver a handle for a deferred creation.
    ///
    /// Handles for tickets that went stale are released, not cached.
    pub fn complete_cell(&mut self, ticket: CellTicket, handle: H) -> Completion {
        let completion = self.cache.complete(ticket, handle);
        self.release_retired();
        completion
    }

    /// Record the measured extent of the cell at `index`.
    pub fn report_cell_extent(&mut self, index: usize, extent: f32) -> Result<()> {
        if self.resolver.set_measured_extent(index, extent)? {
            self.reconcile();
        }
        Ok(())
    }

    // === Mutation ===

    /// Apply a batch atomically.
    ///
    /// On failure the items, cells, geometry and sections are untouched and
    /// the error is returned.
    pub fn perform_batch(&mut self, batch: Batch<T>) -> Result<AppliedBatch> {
        let previous = self.phase;
        self.phase = ListPhase::Mutating;

        let result = {
            let mut target = (&mut self.cache, &mut self.resolver, &mut self.sections);
            batch.apply(&mut self.items, &mut target)
        };

        match result {
            Ok(applied) => {
                self.phase = ListPhase::for_len(self.items.len());
                tracing::debug!(
                    inserted = applied.inserted,
                    deleted = applied.deleted,
                    replaced = applied.replaced,
                    moved = applied.moved,
                    len = applied.final_len,
                    generation = %self.cache.generation(),
                    "performed batch"
                );
                self.reconcile();
                if let Some(delegate) = self.delegate() {
                    delegate.did_apply_batch(&applied);
                }
                Ok(applied)
            }
            Err(err) => {
                self.phase = previous;
                tracing::warn!(%err, "batch rejected");
                Err(err)
            }
        }
    }

    /// Build a batch with `build` and apply it.
    pub fn perform_batch_with<F>(&mut self, build: F) -> Result<AppliedBatch>
    where
        F: FnOnce(&mut Batch<T>),
    {
        let mut batch = Batch::new();
        build(&mut batch);
        self.perform_batch(batch)
    }

    // === Scrolling ===

    /// Scroll so the item at `index` sits at `position`.
    ///
    /// Returns the content offset handed to the scroll surface.
    pub fn scroll_to_item_at_index(
        &mut self,
        index: usize,
        position: ScrollPosition,
        animated: bool,
    ) -> Result<f32> {
        self.scroll_to(ScrollTarget::new(index, position).animated(animated))
    }

    pub fn scroll_to_item_at_index_path(
        &mut self,
        path: IndexPath,
        position: ScrollPosition,
        animated: bool,
    ) -> Result<f32> {
        let index = self.sections.flat_index(path)?;
        self.scroll_to_item_at_index(index, position, animated)
    }

    pub fn scroll_to(&mut self, target: ScrollTarget) -> Result<f32> {
        self.sync_geometry();
        let offset = self
            .resolver
            .target_offset(&target, self.viewport_extent)?;
        self.apply_offset(offset, target.animated);
        Ok(offset)
    }

    pub fn scroll_to_top(&mut self, animated: bool) -> f32 {
        self.apply_offset(0.0, animated);
        0.0
    }

    pub fn scroll_to_end(&mut self, animated: bool) -> f32 {
        self.sync_geometry();
        let offset = self.resolver.max_scroll_offset(self.viewport_extent);
        self.apply_offset(offset, animated);
        offset
    }

    /// Change the content insets and re-resolve the visible range.
    pub fn set_content_insets(&mut self, insets: EdgeInsets) {
        let insets = insets.sanitized();
        self.config.content_insets = insets;
        self.resolver.set_insets(insets);
        self.reconcile();
    }

    /// Geometry for hosts without a scroll surface.
    pub fn update_geometry(&mut self, content_offset: f32, viewport_extent: f32) {
        self.content_offset = finite_or_zero(content_offset);
        self.viewport_extent = finite_or_zero(viewport_extent).max(0.0);
        self.reconcile();
    }

    /// Scroll-surface layout notification.
    pub fn layout_pass(&mut self) {
        self.sync_geometry();
        self.reconcile();
    }

    fn apply_offset(&mut self, offset: f32, animated: bool) {
        match self.surface() {
            Some(surface) => surface.set_content_offset(offset, animated),
            None => {
                tracing::debug!(offset, "no scroll surface attached");
                self.content_offset = offset;
            }
        }
        self.sync_geometry();
        self.reconcile();
    }

    fn sync_geometry(&mut self) {
        if let Some(surface) = self.surface() {
            self.content_offset = finite_or_zero(surface.content_offset());
            self.viewport_extent = finite_or_zero(surface.viewport_extent()).max(0.0);
        }
    }

    /// Materialize the render window, evict beyond the retention margin and
    /// release retired handles.
    fn reconcile(&mut self) {
        let range = self.resolver.visible_range(
            self.content_offset,
            self.viewport_extent,
            self.config.overscan_count,
        );

        if let Some(range) = &range {
            let renderer = self.renderer();
            for index in range.render_range() {
                if let Err(err) = self
                    .cache
                    .cell_for_index(index, &self.items, renderer.as_deref())
                {
                    tracing::warn!(%err, index, "render window out of step with items");
                }
            }
            self.cache
                .evict_outside(range.render_range(), self.config.retention_margin);
        }
        self.release_retired();

        if range != self.visible {
            self.visible = range;
            if let (Some(delegate), Some(visible)) = (self.delegate(), &self.visible) {
                delegate.did_change_visible_range(visible);
            }
        }
    }

    fn release_retired(&mut self) {
        let retired = self.cache.drain_retired();
        if retired.is_empty() {
            return;
        }
        if let Some(renderer) = self.renderer() {
            for handle in &retired {
                renderer.cell_retired(handle);
            }
        }
    }

    /// Replace the whole sequence unconditionally.
    ///
    /// Every cached cell and measurement is dropped. Works for item types
    /// without equality; [`ListNode::set_items`] keeps cells when the new
    /// sequence matches the old one.
    pub fn replace_items(&mut self, items: Vec<T>) {
        let sections = SectionMap::single(items.len());
        self.sync_geometry();
        self.replace_all(items, sections);
    }

    /// Re-read the data source and replace the sequence unconditionally.
    ///
    /// Without a data source this behaves like [`ListNode::reload_data`].
    pub fn force_reload_data(&mut self) {
        let Some((items, sections)) = self.pull_from_source() else {
            tracing::debug!("reload without data source");
            self.layout_pass();
            return;
        };
        self.sync_geometry();
        self.replace_all(items, sections);
    }

    /// Read every section and item from the data source, if one is attached.
    fn pull_from_source(&self) -> Option<(Vec<T>, SectionMap)> {
        let source = self.data_source()?;
        let sections = source.number_of_sections().unwrap_or(1);
        let counts: Vec<usize> = (0..sections)
            .map(|section| source.number_of_items_in_section(section))
            .collect();
        let items: Vec<T> = counts
            .iter()
            .enumerate()
            .flat_map(|(section, &count)| (0..count).map(move |item| IndexPath::new(section, item)))
            .map(|path| source.item_at(path))
            .collect();
        Some((items, SectionMap::from_counts(counts)))
    }

    /// Swap in a new sequence, dropping every cell and measurement.
    fn replace_all(&mut self, items: Vec<T>, sections: SectionMap) {
        let len = items.len();
        self.items = items;
        self.sections = sections;
        let evicted = self.cache.invalidate_all();
        self.resolver.reset(len);
        self.phase = ListPhase::for_len(len);
        tracing::debug!(
            len,
            evicted,
            generation = %self.cache.generation(),
            "replaced item sequence"
        );
        self.reconcile();
        if let Some(delegate) = self.delegate() {
            delegate.did_reload(len);
        }
    }
}

impl<T: PartialEq, H: Clone> ListNode<T, H> {
    /// Builder form of [`ListNode::set_items`].
    #[must_use]
    pub fn with_items(mut self, items: Vec<T>) -> Self {
        self.set_items(items);
        self
    }

    /// Replace the whole sequence.
    ///
    /// An identical sequence keeps every cached cell and measurement.
    pub fn set_items(&mut self, items: Vec<T>) {
        let sections = SectionMap::single(items.len());
        self.replace_if_changed(items, sections);
    }

    /// Re-read the sequence from the data source.
    ///
    /// An unchanged sequence keeps its cells; use
    /// [`ListNode::force_reload_data`] to drop them regardless. Without a
    /// data source the current sequence is kept and only the
    /// visible range is reconciled.
    pub fn reload_data(&mut self) {
        let Some((items, sections)) = self.pull_from_source() else {
            tracing::debug!("reload without data source");
            self.layout_pass();
            return;
        };
        self.replace_if_changed(items, sections);
    }

    fn replace_if_changed(&mut self, items: Vec<T>, sections: SectionMap) {
        self.sync_geometry();
        if items == self.items && sections == self.sections {
            tracing::debug!(len = items.len(), "sequence unchanged, keeping cells");
            self.reconcile();
            if let Some(delegate) = self.delegate() {
                delegate.did_reload(self.items.len());
            }
            return;
        }
        self.replace_all(items, sections);
    }
}

fn finite_or_zero(value: f32) -> f32 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}
