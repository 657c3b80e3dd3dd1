use crate::catalog::Catalog;
use crate::config::CatalogIds;
use crate::dom::{Display, Dom, ReadyState};
use crate::error::SiteError;
use crate::filter::{CatalogState, TagIndex, compute_visible};
use crate::render::{render_cards_fragment, render_tag_bar_fragment};
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitOutcome {
    Ready,
    /// The document is still loading; call `document_ready` later.
    Deferred,
    AlreadyInitialized,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Phase {
    #[default]
    Idle,
    Pending,
    Ready,
}

/// Owns the state of one catalog widget and re-renders it on input.
pub struct CatalogController<'c> {
    catalog: &'c Catalog,
    tags: TagIndex,
    ids: CatalogIds,
    state: CatalogState,
    phase: Phase,
}

impl<'c> CatalogController<'c> {
    pub fn new<S: AsRef<str>>(
        catalog: &'c Catalog,
        ids: CatalogIds,
        excluded_tags: &[S],
    ) -> Self {
        Self {
            catalog,
            tags: TagIndex::build(catalog, excluded_tags),
            ids,
            state: CatalogState::default(),
            phase: Phase::Idle,
        }
    }

    pub fn state(&self) -> &CatalogState {
        &self.state
    }

    pub fn tag_index(&self) -> &TagIndex {
        &self.tags
    }

    pub fn is_initialized(&self) -> bool {
        self.phase == Phase::Ready
    }

    pub fn init<D: Dom>(&mut self, dom: &mut D) -> Result<InitOutcome, SiteError> {
        match self.phase {
            Phase::Ready => {
                debug!("catalog already initialized");
                return Ok(InitOutcome::AlreadyInitialized);
            }
            Phase::Pending => return Ok(InitOutcome::Deferred),
            Phase::Idle => {}
        }
        if dom.ready_state() == ReadyState::Loading {
            self.phase = Phase::Pending;
            debug!("document loading, deferring catalog init");
            return Ok(InitOutcome::Deferred);
        }
        self.start(dom)
    }

    /// The document-ready signal. Runs a deferred init, otherwise no-op.
    pub fn document_ready<D: Dom>(&mut self, dom: &mut D) -> Result<InitOutcome, SiteError> {
        match self.phase {
            Phase::Pending => self.start(dom),
            Phase::Ready => Ok(InitOutcome::AlreadyInitialized),
            Phase::Idle => Ok(InitOutcome::Deferred),
        }
    }

    fn start<D: Dom>(&mut self, dom: &mut D) -> Result<InitOutcome, SiteError> {
        self.phase = Phase::Ready;
        self.render_tag_filters(dom)?;
        self.render_cards(dom)?;
        info!(
            records = self.catalog.len(),
            tags = self.tags.as_slice().len(),
            "catalog initialized"
        );
        Ok(InitOutcome::Ready)
    }

    /// Search box input: updates the query and re-renders the grid only.
    pub fn search_input<D: Dom>(&mut self, dom: &mut D, value: &str) -> Result<(), SiteError> {
        if !self.is_initialized() {
            return Ok(());
        }
        self.state.search_query = value.to_string();
        self.render_cards(dom)
    }

    /// Click on a tag button: rebuilds both the tag bar and the grid.
    pub fn select_tag<D: Dom>(&mut self, dom: &mut D, tag: &str) -> Result<(), SiteError> {
        if !self.is_initialized() {
            return Ok(());
        }
        self.state.active_tag = tag.to_string();
        self.render_tag_filters(dom)?;
        self.render_cards(dom)
    }

    pub fn render_cards<D: Dom>(&self, dom: &mut D) -> Result<(), SiteError> {
        let Some(grid) = dom.element_by_id(&self.ids.grid) else {
            return Ok(());
        };
        let empty = dom.element_by_id(&self.ids.empty);
        let visible = compute_visible(&self.state, self.catalog);
        debug!(
            visible = visible.len(),
            tag = %self.state.active_tag,
            query = %self.state.search_query,
            "rendering cards"
        );

        if visible.is_empty() {
            dom.set_display(&grid, Display::None);
            if let Some(empty) = &empty {
                dom.set_display(empty, Display::Block);
            }
        } else {
            let html = render_cards_fragment(&visible)?;
            dom.set_display(&grid, Display::Unset);
            if let Some(empty) = &empty {
                dom.set_display(empty, Display::None);
            }
            dom.set_inner_html(&grid, &html);
        }
        Ok(())
    }

    pub fn render_tag_filters<D: Dom>(&self, dom: &mut D) -> Result<(), SiteError> {
        let Some(container) = dom.element_by_id(&self.ids.tags) else {
            return Ok(());
        };
        let html =
            render_tag_bar_fragment(&self.tags, &self.state.active_tag, &self.ids.tag_attribute)?;
        dom.set_inner_html(&container, &html);
        Ok(())
    }
}
