use eclipsesec_site::dom::NodeId;
use eclipsesec_site::{
    Catalog, Display, Dom, EventOutcome, KeyStroke, MemoryDocument, MemoryElement, MemoryStore,
    PreferenceStore, ReadyState, Site, SiteConfig, SiteEvent, SystemScheme,
};
use pretty_assertions::assert_eq;

const KEY: &str = "eclipsesec-theme";

struct Blog {
    doc: MemoryDocument,
    posts: Vec<NodeId>,
    buttons: Vec<NodeId>,
    search: NodeId,
    other_input: NodeId,
}

fn post(text: &str, tags: &str) -> MemoryElement {
    MemoryElement::new()
        .with_class("post")
        .with_attr("data-tags", tags)
        .with_text(text)
}

fn tag_button(tag: &str) -> MemoryElement {
    MemoryElement::new()
        .with_class("tag-btn")
        .with_attr("data-tag", tag)
}

fn blog(mut doc: MemoryDocument) -> Blog {
    let search = doc.push(MemoryElement::new().with_id("post-search"));
    doc.push(MemoryElement::new().with_id("clear-search"));
    let other_input = doc.push(MemoryElement::new().with_id("newsletter"));
    let buttons = ["all", "windows", "linux"]
        .into_iter()
        .map(|tag| doc.push(tag_button(tag)))
        .collect();
    let featured = doc.push(
        MemoryElement::new()
            .with_class("featured-post")
            .with_attr("data-tags", "Windows Kernel")
            .with_text("Abusing vulnerable kernel drivers for LSASS access"),
    );
    let posts = vec![
        featured,
        doc.push(post("ETW telemetry for RPC detection", "windows detection")),
        doc.push(post("Writing a Linux beacon in C", "linux tooling")),
        doc.push(post("Kernel callbacks on Linux", "LINUX kernel")),
    ];
    Blog {
        doc,
        posts,
        buttons,
        search,
        other_input,
    }
}

fn site(store: MemoryStore, system: SystemScheme) -> Site<'static, MemoryDocument, MemoryStore> {
    Site::new(Catalog::builtin(), store, system, SiteConfig::default())
}

fn visible(doc: &MemoryDocument, posts: &[NodeId]) -> Vec<bool> {
    posts
        .iter()
        .map(|node| doc.get(*node).display != Display::None)
        .collect()
}

#[test]
fn post_filters_compose_text_and_tag() {
    let mut page = blog(MemoryDocument::new());
    let mut site = site(MemoryStore::new(), SystemScheme::Light);
    site.boot(&mut page.doc).unwrap();
    assert_eq!(visible(&page.doc, &page.posts), vec![true, true, true, true]);
    assert!(page.doc.get(page.buttons[0]).has_class("active"));

    site.dispatch(&mut page.doc, SiteEvent::PostTagClicked("linux".to_string()))
        .unwrap();
    assert_eq!(visible(&page.doc, &page.posts), vec![false, false, true, true]);
    assert!(page.doc.get(page.buttons[2]).has_class("active"));
    assert!(!page.doc.get(page.buttons[0]).has_class("active"));

    // The text filter narrows the tag selection instead of replacing it.
    site.dispatch(&mut page.doc, SiteEvent::PostSearchInput("KERNEL".to_string()))
        .unwrap();
    assert_eq!(visible(&page.doc, &page.posts), vec![false, false, false, true]);

    site.dispatch(&mut page.doc, SiteEvent::PostTagClicked("all".to_string()))
        .unwrap();
    assert_eq!(visible(&page.doc, &page.posts), vec![true, false, false, true]);

    site.dispatch(&mut page.doc, SiteEvent::PostSearchCleared)
        .unwrap();
    assert_eq!(visible(&page.doc, &page.posts), vec![true, true, true, true]);
    assert_eq!(page.doc.focused(), Some(page.search));
    assert_eq!(page.doc.input_value(&page.search), "");
}

#[test]
fn featured_post_tags_are_matched_lowercased() {
    let mut page = blog(MemoryDocument::new());
    let mut site = site(MemoryStore::new(), SystemScheme::Light);
    site.boot(&mut page.doc).unwrap();
    site.dispatch(&mut page.doc, SiteEvent::PostTagClicked("windows".to_string()))
        .unwrap();
    assert_eq!(visible(&page.doc, &page.posts), vec![true, true, false, false]);
}

#[test]
fn ctrl_k_focuses_search_and_prevents_default() {
    let mut page = blog(MemoryDocument::new());
    let mut site = site(MemoryStore::new(), SystemScheme::Light);
    site.boot(&mut page.doc).unwrap();
    page.doc.focus(&page.other_input);

    let outcome = site
        .dispatch(&mut page.doc, SiteEvent::KeyDown(KeyStroke::new("k").with_ctrl()))
        .unwrap();
    assert_eq!(outcome, EventOutcome::PreventDefault);
    assert_eq!(page.doc.focused(), Some(page.search));

    page.doc.focus(&page.other_input);
    let outcome = site
        .dispatch(&mut page.doc, SiteEvent::KeyDown(KeyStroke::new("K").with_meta()))
        .unwrap();
    assert_eq!(outcome, EventOutcome::PreventDefault);
    assert_eq!(page.doc.focused(), Some(page.search));

    page.doc.focus(&page.other_input);
    let outcome = site
        .dispatch(&mut page.doc, SiteEvent::KeyDown(KeyStroke::new("k")))
        .unwrap();
    assert_eq!(outcome, EventOutcome::Continue);
    assert_eq!(page.doc.focused(), Some(page.other_input));
}

#[test]
fn shortcut_is_ignored_without_search_box() {
    let mut doc = MemoryDocument::new();
    let mut site = site(MemoryStore::new(), SystemScheme::Light);
    site.boot(&mut doc).unwrap();
    let outcome = site
        .dispatch(&mut doc, SiteEvent::KeyDown(KeyStroke::new("k").with_ctrl()))
        .unwrap();
    assert_eq!(outcome, EventOutcome::Continue);
    assert_eq!(doc.focused(), None);
    site.dispatch(&mut doc, SiteEvent::PostSearchInput("x".to_string()))
        .unwrap();
    site.dispatch(&mut doc, SiteEvent::CatalogTagClicked("Linux".to_string()))
        .unwrap();
}

#[test]
fn first_toggle_with_light_system_stores_dark() {
    let mut doc = MemoryDocument::new();
    let mut site = site(MemoryStore::new(), SystemScheme::Light);
    site.boot(&mut doc).unwrap();
    assert_eq!(doc.root_attribute("data-theme"), None);

    site.dispatch(&mut doc, SiteEvent::ThemeToggleClicked)
        .unwrap();
    assert_eq!(site.theme().store().get(KEY).as_deref(), Some("dark"));
    assert_eq!(doc.root_attribute("data-theme").as_deref(), Some("dark"));
}

#[test]
fn stored_preference_applies_on_boot() {
    let mut doc = MemoryDocument::new();
    let store = MemoryStore::new().with_value(KEY, "dark");
    let mut site = site(store, SystemScheme::Light);
    site.boot(&mut doc).unwrap();
    assert_eq!(doc.root_attribute("data-theme").as_deref(), Some("dark"));

    site.dispatch(&mut doc, SiteEvent::ThemeToggleClicked)
        .unwrap();
    assert_eq!(site.theme().store().get(KEY).as_deref(), Some("light"));
}

#[test]
fn catalog_widget_follows_tag_and_search_events() {
    let mut doc = MemoryDocument::new();
    let grid = doc.push(MemoryElement::new().with_id("tools-grid"));
    let empty = doc.push(MemoryElement::new().with_id("tools-empty"));
    let tags = doc.push(MemoryElement::new().with_id("tools-tags"));
    doc.push(MemoryElement::new().with_id("tools-search"));
    let mut site = site(MemoryStore::new(), SystemScheme::Light);
    site.boot(&mut doc).unwrap();
    assert_eq!(doc.get(grid).inner_html.matches("<article").count(), 6);

    site.dispatch(&mut doc, SiteEvent::CatalogTagClicked("Windows".to_string()))
        .unwrap();
    assert_eq!(doc.get(grid).inner_html.matches("<article").count(), 5);
    assert!(
        doc.get(tags)
            .inner_html
            .contains(r#"class="tools-tag-btn active" data-tag="Windows""#)
    );

    site.dispatch(&mut doc, SiteEvent::CatalogSearchInput("inline".to_string()))
        .unwrap();
    let html = &doc.get(grid).inner_html;
    assert_eq!(html.matches("<article").count(), 1);
    assert!(html.contains("Inline-EA"));

    site.dispatch(&mut doc, SiteEvent::CatalogTagClicked("Linux".to_string()))
        .unwrap();
    assert_eq!(doc.get(grid).display, Display::None);
    assert_eq!(doc.get(empty).display, Display::Block);
    assert_eq!(site.catalog().state().active_tag, "Linux");
    assert_eq!(site.catalog().state().search_query, "inline");
}

#[test]
fn loading_document_waits_for_ready_signal() {
    let mut page = blog(MemoryDocument::loading());
    let grid = page.doc.push(MemoryElement::new().with_id("tools-grid"));
    let mut site = site(MemoryStore::new(), SystemScheme::Dark);
    site.boot(&mut page.doc).unwrap();
    assert!(page.doc.get(grid).inner_html.is_empty());
    assert_eq!(page.doc.root_attribute("data-theme"), None);
    assert!(site.posts().is_none());

    page.doc.set_ready_state(ReadyState::Interactive);
    site.dispatch(&mut page.doc, SiteEvent::DocumentReady)
        .unwrap();
    assert_eq!(page.doc.get(grid).inner_html.matches("<article").count(), 6);
    assert_eq!(page.doc.root_attribute("data-theme").as_deref(), Some("dark"));
    assert!(site.posts().is_some_and(|posts| posts.has_search()));

    // A repeated ready signal does not re-attach or reset anything.
    site.dispatch(&mut page.doc, SiteEvent::PostTagClicked("linux".to_string()))
        .unwrap();
    site.dispatch(&mut page.doc, SiteEvent::DocumentReady)
        .unwrap();
    assert_eq!(site.posts().map(|p| p.state().tag.as_str()), Some("linux"));
    assert!(site.catalog().is_initialized());
}
