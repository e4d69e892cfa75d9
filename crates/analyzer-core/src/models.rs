use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike, Weekday};
use serde::{Serialize, Serializer};

/// Weekdays in display order, Monday first.
pub const WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Number of hour buckets in a day.
pub const HOURS_PER_DAY: usize = 24;

/// Full English name of a weekday, e.g. `"Monday"`.
pub fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Serialize a [`Weekday`] using its full English name.
pub fn serialize_weekday<S: Serializer>(weekday: &Weekday, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(weekday_name(*weekday))
}

/// Calendar fields derived from a message timestamp.
///
/// Computed once when the [`Message`] is built. The timestamp is naive local
/// time exactly as written in the export; no timezone conversion happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CalendarFields {
    pub date: NaiveDate,
    pub year: i32,
    pub month: u32,
    /// Hour of day, 0–23.
    pub hour: u32,
    #[serde(serialize_with = "serialize_weekday")]
    pub weekday: Weekday,
}

impl CalendarFields {
    fn from_timestamp(ts: NaiveDateTime) -> Self {
        Self {
            date: ts.date(),
            year: ts.year(),
            month: ts.month(),
            hour: ts.hour(),
            weekday: ts.weekday(),
        }
    }
}

/// One retained `"message"` entry from an export.
///
/// Fields are read-only after construction so the derived calendar fields
/// always agree with `timestamp`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Message {
    /// Message identifier, unique within its channel.
    id: i64,
    /// Posting time as written in the export.
    timestamp: NaiveDateTime,
    /// Flattened text content; may be empty.
    text: String,
    /// Sender display name at the time of posting, absent for deleted accounts.
    username: Option<String>,
    /// Numeric sender identity.
    user_id: i64,
    /// Media tag such as `"sticker"` or `"voice_message"`, passed through as-is.
    media_type: Option<String>,
    /// Edit timestamp as written in the export, if the message was edited.
    edited: Option<String>,
    calendar: CalendarFields,
}

impl Message {
    /// Build a message, deriving its calendar fields from `timestamp`.
    pub fn new(id: i64, timestamp: NaiveDateTime, user_id: i64) -> Self {
        Self {
            id,
            timestamp,
            text: String::new(),
            username: None,
            user_id,
            media_type: None,
            edited: None,
            calendar: CalendarFields::from_timestamp(timestamp),
        }
    }

    pub fn with_username(mut self, username: Option<String>) -> Self {
        self.username = username;
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn with_media_type(mut self, media_type: Option<String>) -> Self {
        self.media_type = media_type;
        self
    }

    pub fn with_edited(mut self, edited: Option<String>) -> Self {
        self.edited = edited;
        self
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn timestamp(&self) -> NaiveDateTime {
        self.timestamp
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    pub fn user_id(&self) -> i64 {
        self.user_id
    }

    pub fn media_type(&self) -> Option<&str> {
        self.media_type.as_deref()
    }

    pub fn edited(&self) -> Option<&str> {
        self.edited.as_deref()
    }

    pub fn calendar(&self) -> &CalendarFields {
        &self.calendar
    }

    pub fn date(&self) -> NaiveDate {
        self.calendar.date
    }

    pub fn hour(&self) -> u32 {
        self.calendar.hour
    }

    pub fn weekday(&self) -> Weekday {
        self.calendar.weekday
    }

    pub fn is_edited(&self) -> bool {
        self.edited.is_some()
    }
}

/// Channel-level metadata. Every field is optional because bare message-list
/// exports carry none of it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ChannelInfo {
    pub name: Option<String>,
    pub id: Option<i64>,
    /// Chat kind as written by the exporter, e.g. `"public_channel"`.
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

impl ChannelInfo {
    /// Human-readable channel label, falling back to `"Unnamed chat"`.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("Unnamed chat")
    }
}

/// An ingested export: channel metadata plus its messages in export order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Channel {
    #[serde(flatten)]
    pub info: ChannelInfo,
    pub messages: Vec<Message>,
}

impl Channel {
    pub fn new(info: ChannelInfo, messages: Vec<Message>) -> Self {
        Self { info, messages }
    }

    pub fn display_name(&self) -> &str {
        self.info.display_name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S").unwrap()
    }

    #[test]
    fn test_message_derives_calendar_fields() {
        // 2024-03-17 is a Sunday.
        let msg = Message::new(1, ts("2024-03-17T23:45:10"), 7);
        let cal = msg.calendar();
        assert_eq!(cal.date, NaiveDate::from_ymd_opt(2024, 3, 17).unwrap());
        assert_eq!(cal.year, 2024);
        assert_eq!(cal.month, 3);
        assert_eq!(cal.hour, 23);
        assert_eq!(cal.weekday, Weekday::Sun);
    }

    #[test]
    fn test_message_builders() {
        let msg = Message::new(5, ts("2024-01-01T08:00:00"), 99)
            .with_username(Some("Alice".to_string()))
            .with_text("hello")
            .with_media_type(Some("sticker".to_string()))
            .with_edited(Some("2024-01-01T08:05:00".to_string()));

        assert_eq!(msg.username(), Some("Alice"));
        assert_eq!(msg.text(), "hello");
        assert_eq!(msg.media_type(), Some("sticker"));
        assert_eq!(msg.edited(), Some("2024-01-01T08:05:00"));
        assert!(msg.is_edited());
        assert_eq!(msg.hour(), 8);
    }

    #[test]
    fn test_message_calendar_matches_timestamp_after_builders() {
        // Builders never touch the timestamp, so the derived fields stay in step.
        let msg = Message::new(9, ts("2024-02-29T13:05:00"), 4)
            .with_username(Some("Leap".to_string()))
            .with_text("late")
            .with_edited(Some("2024-03-01T00:00:00".to_string()));

        assert_eq!(msg.timestamp(), ts("2024-02-29T13:05:00"));
        assert_eq!(msg.date(), msg.timestamp().date());
        assert_eq!(msg.hour(), msg.timestamp().hour());
        assert_eq!(msg.weekday(), msg.timestamp().weekday());
        assert_eq!(msg.weekday(), Weekday::Thu);
        assert_eq!(msg.id(), 9);
        assert_eq!(msg.user_id(), 4);
    }

    #[test]
    fn test_message_serializes_every_field() {
        let msg = Message::new(3, ts("2024-01-01T10:00:00"), 8).with_text("hi");
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["id"], 3);
        assert_eq!(json["user_id"], 8);
        assert_eq!(json["text"], "hi");
        assert_eq!(json["calendar"]["hour"], 10);
    }

    #[test]
    fn test_weekdays_order_and_names() {
        let names: Vec<&str> = WEEKDAYS.iter().map(|d| weekday_name(*d)).collect();
        assert_eq!(
            names,
            vec![
                "Monday",
                "Tuesday",
                "Wednesday",
                "Thursday",
                "Friday",
                "Saturday",
                "Sunday"
            ]
        );
    }

    #[test]
    fn test_calendar_weekday_serializes_full_name() {
        let msg = Message::new(1, ts("2024-01-01T00:00:00"), 1);
        let json = serde_json::to_value(msg.calendar()).unwrap();
        assert_eq!(json["weekday"], "Monday");
        assert_eq!(json["date"], "2024-01-01");
    }

    #[test]
    fn test_channel_display_name_fallback() {
        let channel = Channel::default();
        assert_eq!(channel.display_name(), "Unnamed chat");

        let named = Channel::new(
            ChannelInfo {
                name: Some("Rust Lovers".to_string()),
                id: Some(1),
                kind: Some("public_supergroup".to_string()),
            },
            vec![],
        );
        assert_eq!(named.display_name(), "Rust Lovers");
    }

    #[test]
    fn test_channel_info_serializes_type_key() {
        let info = ChannelInfo {
            name: None,
            id: Some(3),
            kind: Some("personal_chat".to_string()),
        };
        let json = serde_json::to_value(&info).unwrap();
        assert_eq!(json["type"], "personal_chat");
        assert!(json.get("kind").is_none());
    }
}
