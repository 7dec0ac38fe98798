//! Wire model of the descendants tree handed over by the host application.
//!
//! The tree is rooted at one synthetic node whose `children` are the top-level nodes. An
//! individual and the spouse slots of their families are siblings; the children of a family
//! hang below that family's spouse slot:
//!
//! ```text
//! root
//! ├── A            { data: A, spouses: [B.id] }
//! └── B            { data: B, spouse: A.id, family: 0 }
//!     ├── C        { data: C }
//!     └── D        { data: D }
//! ```

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Host-side person identifier (`PersonRecord::id`).
pub type PersonId = i64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Sex {
    Male,
    Female,
    #[default]
    Unknown,
}

impl From<String> for Sex {
    fn from(value: String) -> Self {
        match value.as_str() {
            "M" => Self::Male,
            "F" => Self::Female,
            _ => Self::Unknown,
        }
    }
}

impl From<Sex> for String {
    fn from(value: Sex) -> Self {
        match value {
            Sex::Male => "M",
            Sex::Female => "F",
            Sex::Unknown => "U",
        }
        .to_string()
    }
}

impl Sex {
    /// CSS class suffix used by the renderer.
    pub fn as_class(self) -> &'static str {
        match self {
            Sex::Male => "male",
            Sex::Female => "female",
            Sex::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonRecord {
    pub id: PersonId,
    #[serde(default)]
    pub xref: String,
    #[serde(default)]
    pub sex: Sex,
    #[serde(default)]
    pub birth: String,
    #[serde(default)]
    pub death: String,
    /// Preformatted lifetime description, e.g. `1901–1978`.
    #[serde(default)]
    pub timespan: String,
    /// Thumbnail URL (or local path); empty when the person has no image.
    #[serde(default)]
    pub thumbnail: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub preferred_name: String,
    #[serde(default)]
    pub first_names: Vec<String>,
    #[serde(default)]
    pub last_names: Vec<String>,
    #[serde(default)]
    pub alternative_name: String,
    #[serde(default)]
    pub is_alt_rtl: bool,
    #[serde(default)]
    pub is_name_rtl: bool,
}

impl PersonRecord {
    pub fn new(id: PersonId, name: impl Into<String>) -> Self {
        let name = name.into();
        let mut parts: Vec<String> = name.split_whitespace().map(str::to_string).collect();
        let last = parts.pop().into_iter().collect::<Vec<_>>();
        Self {
            id,
            xref: format!("I{id}"),
            name,
            preferred_name: parts.first().cloned().unwrap_or_default(),
            first_names: parts,
            last_names: last,
            ..Default::default()
        }
    }

    pub fn with_alternative_name(mut self, name: impl Into<String>) -> Self {
        self.alternative_name = name.into();
        self
    }

    pub fn with_timespan(mut self, timespan: impl Into<String>) -> Self {
        self.timespan = timespan.into();
        self
    }

    pub fn has_alternative_name(&self) -> bool {
        !self.alternative_name.trim().is_empty()
    }
}

/// One node of the host tree.
///
/// `spouse` and `spouses` are mutually exclusive: an individual lists the person ids of their
/// recorded spouses, a spouse slot names its partner. A slot with `data: null` is a placeholder
/// for an unknown or hidden spouse.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FamilyTreeNode {
    #[serde(default)]
    pub data: Option<PersonRecord>,
    #[serde(default)]
    pub family: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spouse: Option<PersonId>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<FamilyTreeNode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spouses: Option<Vec<PersonId>>,
}

impl FamilyTreeNode {
    pub fn individual(person: PersonRecord) -> Self {
        Self {
            data: Some(person),
            ..Default::default()
        }
    }

    /// A spouse slot for `partner`'s family number `family`; `person: None` is a placeholder.
    pub fn spouse_slot(partner: PersonId, family: usize, person: Option<PersonRecord>) -> Self {
        Self {
            data: person,
            family,
            spouse: Some(partner),
            ..Default::default()
        }
    }

    pub fn with_spouses(mut self, spouses: Vec<PersonId>) -> Self {
        self.spouses = Some(spouses);
        self
    }

    pub fn with_children(mut self, children: Vec<FamilyTreeNode>) -> Self {
        self.children = children;
        self
    }

    pub fn person_id(&self) -> Option<PersonId> {
        self.data.as_ref().map(|p| p.id)
    }

    pub fn is_spouse_slot(&self) -> bool {
        self.spouse.is_some()
    }
}

/// The whole host tree: a synthetic root and its top-level nodes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FamilyTree {
    #[serde(default)]
    pub children: Vec<FamilyTreeNode>,
}

impl FamilyTree {
    pub fn new(children: Vec<FamilyTreeNode>) -> Self {
        Self { children }
    }

    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(Error::TreeJson)
    }

    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        serde_json::from_value(value).map_err(Error::TreeJson)
    }

    /// Number of nodes below the synthetic root (individuals and spouse slots).
    pub fn node_count(&self) -> usize {
        fn count(nodes: &[FamilyTreeNode]) -> usize {
            nodes.iter().map(|n| 1 + count(&n.children)).sum()
        }
        count(&self.children)
    }
}
