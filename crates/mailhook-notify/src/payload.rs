//! Notification payload: an insertion-ordered key/value record.

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// The opaque payload delivered with one mailbox notification.
///
/// The adaptor never interprets the fields; it forwards them to the
/// subscriber's handler as received. Field order is preserved exactly as the
/// transport produced it, so the payload is stored as ordered pairs rather
/// than a sorted map.
///
/// # Example
///
/// ```
/// use mailhook_notify::Notification;
/// use serde_json::json;
///
/// let notification = Notification::new()
///     .with_field("historyId", json!("12345"))
///     .with_field("messageId", json!("m-1"));
/// assert_eq!(notification.get("historyId"), Some(&json!("12345")));
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Notification {
    fields: Vec<(String, Value)>,
}

impl Notification {
    /// Creates an empty payload.
    #[must_use]
    pub const fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Adds a field, consuming and returning the payload.
    #[must_use]
    pub fn with_field(mut self, key: impl Into<String>, value: Value) -> Self {
        self.insert(key, value);
        self
    }

    /// Inserts a field.
    ///
    /// A repeated key replaces the earlier value in place, keeping the
    /// original position.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        let key = key.into();
        if let Some(existing) = self.fields.iter_mut().find(|(k, _)| *k == key) {
            existing.1 = value;
        } else {
            self.fields.push((key, value));
        }
    }

    /// Returns the value for a key, if present.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Iterates over the fields in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if the payload has no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl FromIterator<(String, Value)> for Notification {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        let mut notification = Self::new();
        for (key, value) in iter {
            notification.insert(key, value);
        }
        notification
    }
}

impl IntoIterator for Notification {
    type Item = (String, Value);
    type IntoIter = std::vec::IntoIter<(String, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.into_iter()
    }
}

impl Serialize for Notification {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (key, value) in &self.fields {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

struct NotificationVisitor;

impl<'de> Visitor<'de> for NotificationVisitor {
    type Value = Notification;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("a notification payload map")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut notification = Notification::new();
        while let Some((key, value)) = access.next_entry::<String, Value>()? {
            notification.insert(key, value);
        }
        Ok(notification)
    }
}

impl<'de> Deserialize<'de> for Notification {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(NotificationVisitor)
    }
}
