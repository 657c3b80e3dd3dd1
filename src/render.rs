//! HTML fragments for the tool catalog. Every interpolated value goes through
//! askama's HTML escaper.

use crate::catalog::ToolRecord;
use crate::filter::{ALL_TAG, TagIndex};
use askama::Template;

#[derive(Template)]
#[template(
    source = r#"
    <article class="tool-card">
      <div class="tool-card-content">
        <div class="tool-header">
          <h3 class="tool-name">{{ record.name }}</h3>
          {% match record.status_badge() %}{% when Some with (status) %}<span class="tool-status {{ status.css_class() }}">{{ status }}</span>{% when None %}{% endmatch %}
        </div>
        <p class="tool-tagline">{{ record.tagline }}</p>
        <div class="tool-tags">
          {% for tag in record.tags %}<span class="tool-tag">{{ tag }}</span>{% endfor %}
        </div>
        <p class="tool-description">{{ record.description }}</p>
      </div>
      <div class="tool-card-footer">
        {% match metadata %}{% when Some with (line) %}<div class="tool-meta">{{ line }}</div>{% when None %}{% endmatch %}
        <div class="tool-buttons">
          <a href="{{ record.github_url }}" class="tool-btn tool-btn-github" target="_blank" rel="noreferrer">
            <svg viewBox="0 0 24 24" width="16" height="16"><path fill="currentColor" d="M12 0.5a12 12 0 0 0-3.79 23.4c.6.11.82-.26.82-.58v-2.02c-3.34.73-4.04-1.61-4.04-1.61-.55-1.39-1.34-1.76-1.34-1.76-1.09-.74.08-.73.08-.73 1.21.09 1.85 1.24 1.85 1.24 1.07 1.84 2.8 1.31 3.49 1 .11-.78.42-1.31.76-1.61-2.66-.3-5.47-1.33-5.47-5.93 0-1.31.47-2.38 1.24-3.22-.12-.3-.54-1.52.12-3.16 0 0 1.01-.32 3.3 1.23a11.5 11.5 0 0 1 6 0c2.29-1.55 3.3-1.23 3.3-1.23.66 1.64.24 2.86.12 3.16.77.84 1.24 1.91 1.24 3.22 0 4.61-2.81 5.62-5.49 5.92.43.38.82 1.11.82 2.24v3.32c0 .32.22.69.82.58A12 12 0 0 0 12 0.5z"/></svg>
            GitHub
          </a>
          {% match record.docs_url %}{% when Some with (url) %}<a href="{{ url }}" class="tool-btn tool-btn-docs" target="_blank" rel="noreferrer">Docs</a>{% when None %}{% endmatch %}
        </div>
      </div>
    </article>
"#,
    ext = "html"
)]
struct ToolCardTemplate<'a> {
    record: &'a ToolRecord,
    metadata: Option<String>,
}

struct TagButton<'a> {
    tag: &'a str,
    label: &'a str,
    active: bool,
}

#[derive(Template)]
#[template(
    source = r#"{% for button in buttons %}<button class="tools-tag-btn{% if button.active %} active{% endif %}" {{ attribute }}="{{ button.tag }}">{{ button.label }}</button>{% endfor %}"#,
    ext = "html"
)]
struct TagBarTemplate<'a> {
    attribute: &'a str,
    buttons: Vec<TagButton<'a>>,
}

pub fn render_card(record: &ToolRecord) -> askama::Result<String> {
    ToolCardTemplate {
        record,
        metadata: record.metadata_line(),
    }
    .render()
}

/// Cards for `records`, concatenated in order.
pub fn render_cards_fragment(records: &[&ToolRecord]) -> askama::Result<String> {
    let mut html = String::new();
    for record in records {
        html.push_str(&render_card(record)?);
    }
    Ok(html)
}

/// One button per tag, each naming its tag in `attribute`.
pub fn render_tag_bar_fragment(
    index: &TagIndex,
    active_tag: &str,
    attribute: &str,
) -> askama::Result<String> {
    let buttons = index
        .into_iter()
        .map(String::as_str)
        .map(|tag| TagButton {
            tag,
            label: if tag == ALL_TAG { "All" } else { tag },
            active: tag == active_tag,
        })
        .collect();
    TagBarTemplate { attribute, buttons }.render()
}
