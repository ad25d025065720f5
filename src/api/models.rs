//! Wire models for the Contentful Content Management API

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Locale code to value, e.g. `{"en-US": "Hello"}`
pub type LocalizedValues = BTreeMap<String, Value>;

/// Field id to its localized values
pub type Fields = BTreeMap<String, LocalizedValues>;

/// Locale preferred when picking a display value
pub const DEFAULT_LOCALE: &str = "en-US";

/// A content entry as returned by the CMA
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub sys: EntrySys,
    #[serde(default)]
    pub fields: Fields,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntrySys {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_version: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<Link>,
}

impl Entry {
    pub fn id(&self) -> &str {
        &self.sys.id
    }

    pub fn content_type_id(&self) -> Option<&str> {
        self.sys.content_type.as_ref().map(|link| link.sys.id.as_str())
    }

    /// An entry counts as published once it has a published version
    pub fn is_published(&self) -> bool {
        self.sys.published_version.is_some()
    }

    /// Human readable name: the first configured name field present on the entry
    pub fn display_name(&self, name_fields: &[String]) -> Option<String> {
        name_fields
            .iter()
            .find_map(|field| self.fields.get(field))
            .and_then(|values| {
                values
                    .get(DEFAULT_LOCALE)
                    .or_else(|| values.values().next())
            })
            .and_then(|value| value.as_str())
            .map(str::to_string)
    }
}

/// Kind of resource a link points at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LinkType {
    Entry,
    Asset,
    ContentType,
    Environment,
    Space,
    #[serde(other)]
    Other,
}

impl LinkType {
    fn parse(raw: &str) -> Self {
        match raw {
            "Entry" => Self::Entry,
            "Asset" => Self::Asset,
            "ContentType" => Self::ContentType,
            "Environment" => Self::Environment,
            "Space" => Self::Space,
            _ => Self::Other,
        }
    }
}

/// `{"sys": {"type": "Link", "linkType": ..., "id": ...}}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub sys: LinkSys,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkSys {
    #[serde(rename = "type")]
    pub kind: String,
    pub link_type: LinkType,
    pub id: String,
}

impl Link {
    pub fn new(link_type: LinkType, id: impl Into<String>) -> Self {
        Self {
            sys: LinkSys {
                kind: "Link".to_string(),
                link_type,
                id: id.into(),
            },
        }
    }

    pub fn entry(id: impl Into<String>) -> Self {
        Self::new(LinkType::Entry, id)
    }

    pub fn asset(id: impl Into<String>) -> Self {
        Self::new(LinkType::Asset, id)
    }

    /// Read a link out of an untyped field value, if it is one
    pub fn from_value(value: &Value) -> Option<Self> {
        let sys = value.get("sys")?;
        if sys.get("type")?.as_str()? != "Link" {
            return None;
        }
        let link_type = LinkType::parse(sys.get("linkType")?.as_str()?);
        let id = sys.get("id")?.as_str()?;
        Some(Self::new(link_type, id))
    }

    pub fn is_entry(&self) -> bool {
        self.sys.link_type == LinkType::Entry
    }

    pub fn is_asset(&self) -> bool {
        self.sys.link_type == LinkType::Asset
    }
}

/// Minimal `sys` block shared by content types, assets and environments
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceSys {
    pub id: String,
}

/// Schema of an entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentType {
    pub sys: ResourceSys,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub fields: Vec<ContentTypeField>,
}

impl ContentType {
    pub fn id(&self) -> &str {
        &self.sys.id
    }

    /// Fields that must reference an existing asset for the entry to be publishable
    pub fn required_asset_fields(&self) -> impl Iterator<Item = &ContentTypeField> {
        self.fields
            .iter()
            .filter(|field| field.required && field.links_to_assets())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentTypeField {
    pub id: String,
    #[serde(rename = "type", default)]
    pub field_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link_type: Option<LinkType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<FieldItems>,
    #[serde(default)]
    pub required: bool,
}

impl ContentTypeField {
    /// Single asset link, or an array of asset links
    pub fn links_to_assets(&self) -> bool {
        self.link_type == Some(LinkType::Asset)
            || self
                .items
                .as_ref()
                .is_some_and(|items| items.link_type == Some(LinkType::Asset))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldItems {
    #[serde(rename = "type", default)]
    pub item_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link_type: Option<LinkType>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    pub sys: ResourceSys,
    #[serde(default)]
    pub fields: BTreeMap<String, LocalizedValues>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentInfo {
    pub sys: ResourceSys,
    #[serde(default)]
    pub name: String,
}

/// Paged list envelope
#[derive(Debug, Clone, Deserialize)]
pub struct Collection<T> {
    pub items: Vec<T>,
    #[serde(default)]
    pub total: Option<u64>,
}

/// Connection settings for one side (source or target) of a duplication
#[derive(Debug, Clone)]
pub struct Environment {
    pub base_url: String,
    pub space_id: String,
    pub environment_id: String,
    pub access_token: String,
}
