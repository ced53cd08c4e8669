use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::core::value::FieldType;
use crate::error::{ChartError, ChartResult};

/// Semantic role a raw field plays in a chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Group,
    #[serde(alias = "color")]
    Subgroup,
    Value,
    X,
    Y,
    Source,
    Target,
}

impl Role {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Group => "group",
            Self::Subgroup => "subgroup",
            Self::Value => "value",
            Self::X => "x",
            Self::Y => "y",
            Self::Source => "source",
            Self::Target => "target",
        }
    }
}

/// Raw field key, declared type and optional display label for one role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Accessor {
    pub key: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default)]
    pub name: Option<String>,
}

impl Accessor {
    #[must_use]
    pub fn new(key: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            key: key.into(),
            field_type,
            name: None,
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Display label, falling back to the raw key.
    #[must_use]
    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.key)
    }
}

/// Role-to-accessor mapping declared by a chart configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccessorSpec {
    accessors: IndexMap<Role, Accessor>,
}

impl AccessorSpec {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, role: Role, accessor: Accessor) -> Self {
        self.accessors.insert(role, accessor);
        self
    }

    #[must_use]
    pub fn get(&self, role: Role) -> Option<&Accessor> {
        self.accessors.get(&role)
    }

    pub fn require(&self, family: &'static str, role: Role) -> ChartResult<&Accessor> {
        self.get(role).ok_or(ChartError::MissingAccessor {
            family,
            role: role.as_str(),
        })
    }

    /// Fails with the first role in `roles` that is not declared.
    pub fn require_all(&self, family: &'static str, roles: &[Role]) -> ChartResult<()> {
        for &role in roles {
            self.require(family, role)?;
        }
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = (Role, &Accessor)> {
        self.accessors.iter().map(|(role, accessor)| (*role, accessor))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.accessors.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.accessors.is_empty()
    }
}
