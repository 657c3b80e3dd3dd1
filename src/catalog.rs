use crate::error::CatalogError;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

static BUILTIN_JSON: &str = include_str!("../data/tools.json");

static BUILTIN: Lazy<Catalog> =
    Lazy::new(|| Catalog::from_json(BUILTIN_JSON).expect("embedded tool catalog is valid"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
pub enum Status {
    #[default]
    Active,
    #[serde(rename = "WIP")]
    Wip,
    Archived,
}

impl Status {
    pub fn label(&self) -> &'static str {
        match self {
            Status::Active => "Active",
            Status::Wip => "WIP",
            Status::Archived => "Archived",
        }
    }

    /// CSS modifier used by the card badge, e.g. `status-wip`.
    pub fn css_class(&self) -> &'static str {
        match self {
            Status::Active => "status-active",
            Status::Wip => "status-wip",
            Status::Archived => "status-archived",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One catalog entry describing an external tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolRecord {
    pub name: String,
    pub tagline: String,
    pub description: String,
    pub tags: Vec<String>,
    pub github_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub docs_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
    pub status: Status,
}

impl ToolRecord {
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// `language · platform`, joining whichever of the two are present.
    pub fn metadata_line(&self) -> Option<String> {
        let parts: Vec<&str> = [self.language.as_deref(), self.platform.as_deref()]
            .into_iter()
            .flatten()
            .filter(|part| !part.is_empty())
            .collect();
        if parts.is_empty() {
            None
        } else {
            Some(parts.join(" · "))
        }
    }

    /// First blank required field, if any.
    fn check_required(&self, index: usize) -> Result<(), CatalogError> {
        let fields: [(&'static str, &str); 4] = [
            ("name", &self.name),
            ("tagline", &self.tagline),
            ("description", &self.description),
            ("githubUrl", &self.github_url),
        ];
        match fields.into_iter().find(|(_, value)| value.trim().is_empty()) {
            Some((field, _)) => Err(CatalogError::MissingField {
                index,
                name: self.name.clone(),
                field,
            }),
            None => Ok(()),
        }
    }

    /// Badge label for non-default statuses.
    pub fn status_badge(&self) -> Option<Status> {
        match self.status {
            Status::Active => None,
            other => Some(other),
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawToolRecord {
    name: Option<String>,
    tagline: Option<String>,
    description: Option<String>,
    tags: Option<Vec<String>>,
    github_url: Option<String>,
    docs_url: Option<String>,
    language: Option<String>,
    platform: Option<String>,
    status: Option<Status>,
}

impl RawToolRecord {
    fn validate(self, index: usize) -> Result<ToolRecord, CatalogError> {
        let name = non_empty(self.name).ok_or_else(|| CatalogError::MissingField {
            index,
            name: String::new(),
            field: "name",
        })?;
        let missing = |field: &'static str| CatalogError::MissingField {
            index,
            name: name.clone(),
            field,
        };
        let tagline = non_empty(self.tagline).ok_or_else(|| missing("tagline"))?;
        let description = non_empty(self.description).ok_or_else(|| missing("description"))?;
        let github_url = non_empty(self.github_url).ok_or_else(|| missing("githubUrl"))?;
        let tags: Vec<String> = self
            .tags
            .ok_or_else(|| missing("tags"))?
            .into_iter()
            .filter(|tag| !tag.trim().is_empty())
            .collect();
        if tags.is_empty() {
            return Err(CatalogError::EmptyTags { index, name });
        }
        Ok(ToolRecord {
            name,
            tagline,
            description,
            tags,
            github_url,
            docs_url: non_empty(self.docs_url),
            language: non_empty(self.language),
            platform: non_empty(self.platform),
            status: self.status.unwrap_or_default(),
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Ordered, immutable sequence of tool records.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    records: Vec<ToolRecord>,
}

impl Catalog {
    /// The EclipseSec tool list embedded at build time.
    pub fn builtin() -> &'static Catalog {
        &BUILTIN
    }

    /// Parses and validates a JSON array of records. One bad record rejects
    /// the whole catalog.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let raw: Vec<RawToolRecord> = serde_json::from_str(json)?;
        let records = raw
            .into_iter()
            .enumerate()
            .map(|(index, record)| record.validate(index))
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_records(records)
    }

    pub fn from_records(records: Vec<ToolRecord>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::new();
        for (index, record) in records.iter().enumerate() {
            record.check_required(index)?;
            if !seen.insert(record.name.as_str()) {
                return Err(CatalogError::DuplicateName {
                    index,
                    name: record.name.clone(),
                });
            }
            if record.tags.is_empty() {
                return Err(CatalogError::EmptyTags {
                    index,
                    name: record.name.clone(),
                });
            }
        }
        Ok(Self { records })
    }

    pub fn records(&self) -> &[ToolRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ToolRecord> {
        self.records.iter()
    }

    /// Case-insensitive lookup by display name.
    pub fn find(&self, name: &str) -> Option<&ToolRecord> {
        self.records
            .iter()
            .find(|record| record.name.eq_ignore_ascii_case(name))
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a ToolRecord;
    type IntoIter = std::slice::Iter<'a, ToolRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_catalog_loads_six_tools() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.len(), 6);
        assert_eq!(catalog.records()[0].name, "Cobalt Strike Linux Beacon");
        assert_eq!(catalog.records()[5].name, "Inline-EA");
        assert!(catalog.iter().all(|r| r.status == Status::Active));
    }

    #[test]
    fn optional_fields_default_when_absent() {
        let json = r#"[{
            "name": "Probe",
            "tagline": "t",
            "description": "d",
            "tags": ["Linux"],
            "githubUrl": "https://github.com/example/probe"
        }]"#;
        let catalog = Catalog::from_json(json).unwrap();
        let record = &catalog.records()[0];
        assert_eq!(record.status, Status::Active);
        assert_eq!(record.docs_url, None);
        assert_eq!(record.metadata_line(), None);
        assert_eq!(record.status_badge(), None);
    }

    #[test]
    fn wip_status_parses_from_uppercase_literal() {
        let json = r#"[{
            "name": "Probe", "tagline": "t", "description": "d",
            "tags": ["Linux"], "githubUrl": "u", "status": "WIP"
        }]"#;
        let catalog = Catalog::from_json(json).unwrap();
        assert_eq!(catalog.records()[0].status_badge(), Some(Status::Wip));
        assert_eq!(Status::Wip.css_class(), "status-wip");
    }

    #[test]
    fn missing_required_field_rejects_catalog() {
        let json = r#"[
            {"name": "Ok", "tagline": "t", "description": "d", "tags": ["a"], "githubUrl": "u"},
            {"name": "Broken", "tagline": "t", "tags": ["a"], "githubUrl": "u"}
        ]"#;
        match Catalog::from_json(json) {
            Err(CatalogError::MissingField { index, name, field }) => {
                assert_eq!(index, 1);
                assert_eq!(name, "Broken");
                assert_eq!(field, "description");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn blank_tags_and_duplicates_are_rejected() {
        let blank = r#"[{"name": "A", "tagline": "t", "description": "d", "tags": [" "], "githubUrl": "u"}]"#;
        assert!(matches!(
            Catalog::from_json(blank),
            Err(CatalogError::EmptyTags { index: 0, .. })
        ));

        let dup = r#"[
            {"name": "A", "tagline": "t", "description": "d", "tags": ["x"], "githubUrl": "u"},
            {"name": "A", "tagline": "t", "description": "d", "tags": ["y"], "githubUrl": "u"}
        ]"#;
        assert!(matches!(
            Catalog::from_json(dup),
            Err(CatalogError::DuplicateName { index: 1, .. })
        ));
    }

    #[test]
    fn from_records_rejects_blank_required_fields() {
        let good = Catalog::builtin().records()[0].clone();
        let mut blank_name = good.clone();
        blank_name.name = String::new();
        assert!(matches!(
            Catalog::from_records(vec![good.clone(), blank_name]),
            Err(CatalogError::MissingField { index: 1, field: "name", .. })
        ));

        let mut blank_url = good.clone();
        blank_url.github_url = "  ".to_string();
        match Catalog::from_records(vec![blank_url]) {
            Err(CatalogError::MissingField { index, name, field }) => {
                assert_eq!(index, 0);
                assert_eq!(name, "Cobalt Strike Linux Beacon");
                assert_eq!(field, "githubUrl");
            }
            other => panic!("unexpected result: {other:?}"),
        }

        let mut blank_tags = good;
        blank_tags.tags.clear();
        assert!(matches!(
            Catalog::from_records(vec![blank_tags]),
            Err(CatalogError::EmptyTags { index: 0, .. })
        ));
    }

    #[test]
    fn metadata_line_joins_present_fields() {
        let mut record = Catalog::builtin().records()[2].clone();
        assert_eq!(record.metadata_line().as_deref(), Some("C++ · Windows"));
        record.language = None;
        assert_eq!(record.metadata_line().as_deref(), Some("Windows"));
    }

    #[test]
    fn find_ignores_case() {
        assert!(Catalog::builtin().find("ghostkatz").is_some());
        assert!(Catalog::builtin().find("nope").is_none());
    }
}
