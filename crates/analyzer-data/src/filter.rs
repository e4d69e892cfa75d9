//! Inclusive date-range filtering over a message collection.

use analyzer_core::models::Message;
use chrono::NaiveDateTime;
use serde::Serialize;

/// An optional inclusive `[start, end]` window over message timestamps.
///
/// Bounds compare against the full timestamp, so `end = 2024-01-31T00:00:00`
/// excludes messages posted later that day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start: Option<NaiveDateTime>,
    pub end: Option<NaiveDateTime>,
}

impl DateRange {
    pub fn new(start: Option<NaiveDateTime>, end: Option<NaiveDateTime>) -> Self {
        Self { start, end }
    }

    /// A range with neither bound set.
    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    /// Returns `true` when `ts` satisfies every bound that is present.
    pub fn contains(&self, ts: NaiveDateTime) -> bool {
        self.start.map_or(true, |start| ts >= start) && self.end.map_or(true, |end| ts <= end)
    }

    /// Messages within the range, in their original order.
    ///
    /// Always returns a new collection; the input is never modified.
    pub fn apply(&self, messages: &[Message]) -> Vec<Message> {
        if self.is_unbounded() {
            return messages.to_vec();
        }
        messages
            .iter()
            .filter(|m| self.contains(m.timestamp()))
            .cloned()
            .collect()
    }
}

/// Convenience wrapper around [`DateRange::apply`].
pub fn filter_messages(
    messages: &[Message],
    start: Option<NaiveDateTime>,
    end: Option<NaiveDateTime>,
) -> Vec<Message> {
    DateRange::new(start, end).apply(messages)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S").unwrap()
    }

    fn make_messages() -> Vec<Message> {
        vec![
            Message::new(1, ts("2024-01-10T08:00:00"), 1),
            Message::new(2, ts("2024-01-15T00:00:00"), 2),
            Message::new(3, ts("2024-01-15T12:30:00"), 1),
            Message::new(4, ts("2024-01-20T23:59:59"), 3),
            Message::new(5, ts("2024-01-21T00:00:00"), 2),
        ]
    }

    fn ids(messages: &[Message]) -> Vec<i64> {
        messages.iter().map(Message::id).collect()
    }

    #[test]
    fn test_unbounded_returns_equal_collection() {
        let messages = make_messages();
        let filtered = filter_messages(&messages, None, None);
        assert_eq!(filtered, messages);
    }

    #[test]
    fn test_bounds_are_inclusive() {
        let messages = make_messages();
        let filtered = filter_messages(
            &messages,
            Some(ts("2024-01-15T00:00:00")),
            Some(ts("2024-01-20T23:59:59")),
        );
        assert_eq!(ids(&filtered), vec![2, 3, 4]);
    }

    #[test]
    fn test_start_only() {
        let messages = make_messages();
        let filtered = filter_messages(&messages, Some(ts("2024-01-15T12:30:00")), None);
        assert_eq!(ids(&filtered), vec![3, 4, 5]);
    }

    #[test]
    fn test_end_only() {
        let messages = make_messages();
        let filtered = filter_messages(&messages, None, Some(ts("2024-01-15T00:00:00")));
        assert_eq!(ids(&filtered), vec![1, 2]);
    }

    #[test]
    fn test_sub_day_precision_at_boundary() {
        let messages = make_messages();
        // One second short of 12:30 excludes the 12:30 message on the same date.
        let filtered = filter_messages(&messages, None, Some(ts("2024-01-15T12:29:59")));
        assert_eq!(ids(&filtered), vec![1, 2]);
    }

    #[test]
    fn test_empty_result_is_valid() {
        let messages = make_messages();
        let filtered = filter_messages(&messages, Some(ts("2025-01-01T00:00:00")), None);
        assert!(filtered.is_empty());
    }

    #[test]
    fn test_inverted_range_is_empty() {
        let messages = make_messages();
        let range = DateRange::new(Some(ts("2024-01-20T00:00:00")), Some(ts("2024-01-10T00:00:00")));
        assert!(range.apply(&messages).is_empty());
    }

    #[test]
    fn test_filter_is_idempotent() {
        let messages = make_messages();
        let range = DateRange::new(Some(ts("2024-01-12T00:00:00")), Some(ts("2024-01-20T23:59:59")));
        let once = range.apply(&messages);
        let twice = range.apply(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_input_not_modified() {
        let messages = make_messages();
        let before = messages.clone();
        let _ = filter_messages(&messages, Some(ts("2024-01-15T00:00:00")), None);
        assert_eq!(messages, before);
    }
}
