//! Search and tag filtering over the pre-rendered blog listing.

use crate::config::PostIds;
use crate::dom::{Display, Dom};
use crate::filter::ALL_TAG;
use tracing::debug;

/// A key-down as seen by the site shortcuts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyStroke {
    pub key: String,
    pub ctrl: bool,
    pub meta: bool,
}

impl KeyStroke {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ctrl: false,
            meta: false,
        }
    }

    pub fn with_ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }

    pub fn with_meta(mut self) -> Self {
        self.meta = true;
        self
    }

    /// Ctrl+K or Cmd+K.
    pub fn is_search_shortcut(&self) -> bool {
        (self.ctrl || self.meta) && self.key.eq_ignore_ascii_case("k")
    }
}

/// Search text and tag selection, always applied together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostFilterState {
    pub query: String,
    pub tag: String,
}

impl Default for PostFilterState {
    fn default() -> Self {
        Self {
            query: String::new(),
            tag: ALL_TAG.to_string(),
        }
    }
}

impl PostFilterState {
    /// `text` is the post's rendered text, `tags` its raw `data-tags` value.
    pub fn matches(&self, text: &str, tags: &str) -> bool {
        let query = self.query.trim().to_lowercase();
        let text_ok = query.is_empty() || text.to_lowercase().contains(&query);
        let tag = self.tag.to_lowercase();
        let tag_ok = tag == ALL_TAG || parse_tags(tags).any(|t| t == tag);
        text_ok && tag_ok
    }
}

fn parse_tags(raw: &str) -> impl Iterator<Item = String> + '_ {
    raw.split_whitespace().map(str::to_lowercase)
}

pub struct PostFilter<N> {
    ids: PostIds,
    state: PostFilterState,
    posts: Vec<N>,
    tag_buttons: Vec<N>,
    search: Option<N>,
}

impl<N: Clone> PostFilter<N> {
    /// Collects the listing elements. When an `all` tag button exists it is
    /// selected right away.
    pub fn attach<D: Dom<Node = N>>(dom: &mut D, ids: PostIds) -> Self {
        let posts = dom.elements_by_classes(&ids.post_classes);
        let tag_buttons = dom.elements_by_classes(std::slice::from_ref(&ids.tag_button_class));
        let search = dom.element_by_id(&ids.search);
        debug!(
            posts = posts.len(),
            tag_buttons = tag_buttons.len(),
            search = search.is_some(),
            "attached post filter"
        );
        let mut filter = Self {
            ids,
            state: PostFilterState::default(),
            posts,
            tag_buttons,
            search,
        };
        let has_all = filter
            .tag_buttons
            .iter()
            .any(|btn| dom.attribute(btn, &filter.ids.tag_attribute).as_deref() == Some(ALL_TAG));
        if has_all {
            filter.filter_posts_by_tag(dom, ALL_TAG);
        }
        filter
    }

    pub fn state(&self) -> &PostFilterState {
        &self.state
    }

    pub fn has_search(&self) -> bool {
        self.search.is_some()
    }

    pub fn filter_posts_by_text<D: Dom<Node = N>>(&mut self, dom: &mut D, query: &str) {
        if self.search.is_none() {
            return;
        }
        self.state.query = query.to_string();
        self.apply(dom);
    }

    pub fn filter_posts_by_tag<D: Dom<Node = N>>(&mut self, dom: &mut D, tag: &str) {
        if self.tag_buttons.is_empty() {
            return;
        }
        self.state.tag = tag.to_string();
        for button in &self.tag_buttons {
            let active = dom.attribute(button, &self.ids.tag_attribute).as_deref() == Some(tag);
            dom.set_class(button, "active", active);
        }
        self.apply(dom);
    }

    /// Empties the search box, focuses it, and re-filters.
    pub fn clear_search<D: Dom<Node = N>>(&mut self, dom: &mut D) {
        let Some(search) = self.search.clone() else {
            return;
        };
        dom.set_input_value(&search, "");
        dom.focus(&search);
        self.state.query.clear();
        self.apply(dom);
    }

    /// Returns true when the stroke was consumed and the browser default
    /// must be suppressed.
    pub fn handle_key<D: Dom<Node = N>>(&mut self, dom: &mut D, stroke: &KeyStroke) -> bool {
        match &self.search {
            Some(search) if stroke.is_search_shortcut() => {
                dom.focus(search);
                true
            }
            _ => false,
        }
    }

    fn apply<D: Dom<Node = N>>(&self, dom: &mut D) {
        let mut shown = 0usize;
        for post in &self.posts {
            let text = dom.text(post);
            let tags = dom
                .attribute(post, &self.ids.tags_attribute)
                .unwrap_or_default();
            let visible = self.state.matches(&text, &tags);
            if visible {
                shown += 1;
            }
            dom.set_display(post, if visible { Display::Unset } else { Display::None });
        }
        debug!(
            shown,
            total = self.posts.len(),
            query = %self.state.query,
            tag = %self.state.tag,
            "filtered posts"
        );
    }
}
