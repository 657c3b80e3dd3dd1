use crate::catalog::Catalog;
use crate::config::SiteConfig;
use crate::controller::{CatalogController, InitOutcome};
use crate::dom::{Dom, ReadyState};
use crate::error::SiteError;
use crate::posts::{KeyStroke, PostFilter};
use crate::theme::{PreferenceStore, SystemScheme, ThemeController};
use std::cell::Cell;
use tracing::info;

thread_local! {
    static PAGE_BOOTED: Cell<bool> = const { Cell::new(false) };
}

/// True exactly once per thread. Host bindings call it before wiring
/// listeners so a repeated boot cannot bind them twice.
pub fn claim_page_boot() -> bool {
    !PAGE_BOOTED.with(|booted| booted.replace(true))
}

/// Everything the page can tell the site scripts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SiteEvent {
    DocumentReady,
    ThemeToggleClicked,
    PostSearchInput(String),
    PostSearchCleared,
    PostTagClicked(String),
    CatalogSearchInput(String),
    CatalogTagClicked(String),
    KeyDown(KeyStroke),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventOutcome {
    Continue,
    PreventDefault,
}

/// The whole behavior layer for one page.
pub struct Site<'c, D: Dom, S> {
    config: SiteConfig,
    system: SystemScheme,
    theme: ThemeController<S>,
    posts: Option<PostFilter<D::Node>>,
    catalog: CatalogController<'c>,
}

impl<'c, D: Dom, S: PreferenceStore> Site<'c, D, S> {
    pub fn new(catalog: &'c Catalog, store: S, system: SystemScheme, config: SiteConfig) -> Self {
        let theme = ThemeController::new(store, config.theme.clone());
        let catalog = CatalogController::new(
            catalog,
            config.catalog.clone(),
            config.excluded_tags.as_slice(),
        );
        Self {
            config,
            system,
            theme,
            posts: None,
            catalog,
        }
    }

    pub fn theme(&self) -> &ThemeController<S> {
        &self.theme
    }

    pub fn posts(&self) -> Option<&PostFilter<D::Node>> {
        self.posts.as_ref()
    }

    pub fn catalog(&self) -> &CatalogController<'c> {
        &self.catalog
    }

    /// Page script entry point. Runs everything now when the document has
    /// finished parsing, otherwise waits for [`SiteEvent::DocumentReady`].
    pub fn boot(&mut self, dom: &mut D) -> Result<(), SiteError> {
        if dom.ready_state() == ReadyState::Loading {
            self.catalog.init(dom)?;
            return Ok(());
        }
        self.on_ready(dom)
    }

    fn on_ready(&mut self, dom: &mut D) -> Result<(), SiteError> {
        if self.posts.is_none() {
            self.theme.apply_initial_theme(dom, self.system);
            self.posts = Some(PostFilter::attach(dom, self.config.posts.clone()));
        }
        let outcome = match self.catalog.init(dom)? {
            InitOutcome::Deferred => self.catalog.document_ready(dom)?,
            other => other,
        };
        info!(catalog = ?outcome, "site ready");
        Ok(())
    }

    pub fn dispatch(&mut self, dom: &mut D, event: SiteEvent) -> Result<EventOutcome, SiteError> {
        match event {
            SiteEvent::DocumentReady => self.on_ready(dom)?,
            SiteEvent::ThemeToggleClicked => {
                self.theme.toggle_theme(dom);
            }
            SiteEvent::PostSearchInput(query) => {
                if let Some(posts) = self.posts.as_mut() {
                    posts.filter_posts_by_text(dom, &query);
                }
            }
            SiteEvent::PostSearchCleared => {
                if let Some(posts) = self.posts.as_mut() {
                    posts.clear_search(dom);
                }
            }
            SiteEvent::PostTagClicked(tag) => {
                if let Some(posts) = self.posts.as_mut() {
                    posts.filter_posts_by_tag(dom, &tag);
                }
            }
            SiteEvent::CatalogSearchInput(query) => self.catalog.search_input(dom, &query)?,
            SiteEvent::CatalogTagClicked(tag) => self.catalog.select_tag(dom, &tag)?,
            SiteEvent::KeyDown(stroke) => {
                let consumed = self
                    .posts
                    .as_mut()
                    .is_some_and(|posts| posts.handle_key(dom, &stroke));
                if consumed {
                    return Ok(EventOutcome::PreventDefault);
                }
            }
        }
        Ok(EventOutcome::Continue)
    }
}
