//! Browsing event record model.

use serde::{Deserialize, Serialize};

/// A single parsed field of a browsing log line.
///
/// Each parse task extracts one field, so a stored event carries exactly one
/// non-empty field and the others stay at their defaults.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrowsingEvent {
    /// Device MAC address.
    pub device: String,
    /// Visited URL.
    pub url: String,
    /// Seconds since the UNIX epoch when the visit took place.
    pub timestamp: String,
}

/// Selector for which field a parse task extracts from a log line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventField {
    Url,
    Device,
    Timestamp,
}

impl EventField {
    /// Every field, in the order tasks are submitted per line.
    pub const ALL: [EventField; 3] = [EventField::Url, EventField::Device, EventField::Timestamp];

    /// The key this field uses in the `key: value` log format.
    pub fn key(self) -> &'static str {
        match self {
            EventField::Url => "url",
            EventField::Device => "device",
            EventField::Timestamp => "timestamp",
        }
    }

    /// Builds an event carrying only this field.
    pub(crate) fn into_event(self, value: String) -> BrowsingEvent {
        let mut event = BrowsingEvent::default();
        match self {
            EventField::Url => event.url = value,
            EventField::Device => event.device = value,
            EventField::Timestamp => event.timestamp = value,
        }
        event
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_keys() {
        assert_eq!(EventField::Url.key(), "url");
        assert_eq!(EventField::Device.key(), "device");
        assert_eq!(EventField::Timestamp.key(), "timestamp");
    }

    #[test]
    fn test_into_event_sets_only_one_field() {
        let event = EventField::Url.into_event("http://example.com".to_owned());
        assert_eq!(event.url, "http://example.com");
        assert!(event.device.is_empty());
        assert!(event.timestamp.is_empty());
    }
}
