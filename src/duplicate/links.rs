//! Typed addressing of link values inside an entry's field map

use crate::api::models::{Fields, Link};
use serde_json::Value;
use std::fmt;

/// Location of one link inside an entry: field, locale and, for array
/// values, the position within the array.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldPath {
    pub field: String,
    pub locale: String,
    pub index: Option<usize>,
}

impl FieldPath {
    pub fn new(field: impl Into<String>, locale: impl Into<String>, index: Option<usize>) -> Self {
        Self {
            field: field.into(),
            locale: locale.into(),
            index,
        }
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.index {
            Some(index) => write!(f, "{}.{}[{}]", self.field, self.locale, index),
            None => write!(f, "{}.{}", self.field, self.locale),
        }
    }
}

/// A link together with where it was found
#[derive(Debug, Clone, PartialEq)]
pub struct LinkSlot {
    pub path: FieldPath,
    pub link: Link,
}

/// Links held by one localized value: the value itself, or the items of an array
pub fn links_in_value(field: &str, locale: &str, value: &Value) -> Vec<LinkSlot> {
    match value {
        Value::Array(items) => items
            .iter()
            .enumerate()
            .filter_map(|(index, item)| {
                Link::from_value(item).map(|link| LinkSlot {
                    path: FieldPath::new(field, locale, Some(index)),
                    link,
                })
            })
            .collect(),
        other => Link::from_value(other)
            .map(|link| LinkSlot {
                path: FieldPath::new(field, locale, None),
                link,
            })
            .into_iter()
            .collect(),
    }
}

/// Every entry link in the field map, in field, locale, position order
pub fn entry_links(fields: &Fields) -> Vec<LinkSlot> {
    fields
        .iter()
        .flat_map(|(field, locales)| {
            locales
                .iter()
                .flat_map(move |(locale, value)| links_in_value(field, locale, value))
        })
        .filter(|slot| slot.link.is_entry())
        .collect()
}

fn value_at<'f>(fields: &'f Fields, path: &FieldPath) -> Option<&'f Value> {
    let value = fields.get(&path.field)?.get(&path.locale)?;
    match path.index {
        Some(index) => value.as_array()?.get(index),
        None => Some(value),
    }
}

fn value_at_mut<'f>(fields: &'f mut Fields, path: &FieldPath) -> Option<&'f mut Value> {
    let value = fields.get_mut(&path.field)?.get_mut(&path.locale)?;
    match path.index {
        Some(index) => value.as_array_mut()?.get_mut(index),
        None => Some(value),
    }
}

/// The link stored at `path`, if that value is a link
pub fn link_at(fields: &Fields, path: &FieldPath) -> Option<Link> {
    value_at(fields, path).and_then(Link::from_value)
}

/// Point the link at `path` to `target_id`. Returns false when no link lives there.
pub fn set_link_target(fields: &mut Fields, path: &FieldPath, target_id: &str) -> bool {
    let Some(value) = value_at_mut(fields, path) else {
        return false;
    };
    if Link::from_value(value).is_none() {
        return false;
    }
    match value.get_mut("sys").and_then(|sys| sys.get_mut("id")) {
        Some(id) => {
            *id = Value::String(target_id.to_string());
            true
        }
        None => false,
    }
}
