use thiserror::Error;

/// Reasons a catalog is rejected at load time.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("record #{index} ({name:?}) is missing required field `{field}`")]
    MissingField {
        index: usize,
        name: String,
        field: &'static str,
    },
    #[error("record #{index} ({name:?}) has no tags")]
    EmptyTags { index: usize, name: String },
    #[error("record #{index} reuses the name {name:?}")]
    DuplicateName { index: usize, name: String },
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("preference store io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("preference store is not valid JSON: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("preference store unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Error)]
pub enum SiteError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error("failed to render fragment: {0}")]
    Render(#[from] askama::Error),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
