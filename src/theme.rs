use crate::config::ThemeConfig;
use crate::dom::Dom;
use crate::error::StoreError;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn flipped(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(format!("unknown theme {other:?}")),
        }
    }
}

/// What the host reports for `prefers-color-scheme`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SystemScheme {
    #[default]
    Light,
    Dark,
}

/// Key-value preference storage, e.g. `localStorage`.
pub trait PreferenceStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
    read_only: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose writes are always refused, like a quota-exceeded
    /// `localStorage`.
    pub fn read_only() -> Self {
        Self {
            values: HashMap::new(),
            read_only: true,
        }
    }

    pub fn with_value(mut self, key: &str, value: &str) -> Self {
        self.values.insert(key.to_string(), value.to_string());
        self
    }
}

impl PreferenceStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        if self.read_only {
            return Err(StoreError::Unavailable("store is read-only".to_string()));
        }
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// JSON object on disk, rewritten on every `set`.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn load(&self) -> Result<BTreeMap<String, String>, StoreError> {
        match fs::read_to_string(&self.path) {
            Ok(body) if body.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(body) => Ok(serde_json::from_str(&body)?),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(err) => Err(err.into()),
        }
    }
}

impl PreferenceStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        match self.load() {
            Ok(mut values) => values.remove(key),
            Err(err) => {
                warn!(error = %err, path = %self.path.display(), "failed to read preference file");
                None
            }
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        // An unreadable file is left alone rather than replaced.
        let mut values = self.load()?;
        values.insert(key.to_string(), value.to_string());
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let body = serde_json::to_vec_pretty(&values)?;
        fs::write(&self.path, body)?;
        Ok(())
    }
}

/// Applies, flips, and persists the light/dark preference.
pub struct ThemeController<S> {
    store: S,
    config: ThemeConfig,
}

impl<S: PreferenceStore> ThemeController<S> {
    pub fn new(store: S, config: ThemeConfig) -> Self {
        Self { store, config }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn stored(&self) -> Option<Theme> {
        let raw = self.store.get(&self.config.storage_key)?;
        match raw.parse() {
            Ok(theme) => Some(theme),
            Err(err) => {
                debug!(%err, "ignoring stored theme");
                None
            }
        }
    }

    /// Theme currently applied to the document; no attribute means light.
    pub fn current<D: Dom>(&self, dom: &D) -> Theme {
        match dom.root_attribute(&self.config.attribute).as_deref() {
            Some("dark") => Theme::Dark,
            _ => Theme::Light,
        }
    }

    /// Stored preference first, then the system scheme. Returns the theme
    /// written to the root, or `None` when the document is left on its
    /// default.
    pub fn apply_initial_theme<D: Dom>(&self, dom: &mut D, system: SystemScheme) -> Option<Theme> {
        let theme = match (self.stored(), system) {
            (Some(theme), _) => theme,
            (None, SystemScheme::Dark) => Theme::Dark,
            (None, SystemScheme::Light) => return None,
        };
        dom.set_root_attribute(&self.config.attribute, theme.as_str());
        debug!(theme = %theme, "applied initial theme");
        Some(theme)
    }

    pub fn toggle_theme<D: Dom>(&mut self, dom: &mut D) -> Theme {
        let next = self.current(dom).flipped();
        dom.set_root_attribute(&self.config.attribute, next.as_str());
        if let Err(err) = self.store.set(&self.config.storage_key, next.as_str()) {
            warn!(error = %err, "failed to persist theme preference");
        }
        debug!(theme = %next, "toggled theme");
        next
    }
}
