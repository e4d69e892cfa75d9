//! Export discovery, loading and normalisation.
//!
//! Turns a chat export JSON document into a [`Channel`] of typed
//! [`Message`]s. All field renaming and type coercion happens here; nothing
//! downstream ever sees the raw JSON.

use std::path::{Path, PathBuf};

use analyzer_core::error::{AnalyzerError, Result};
use analyzer_core::models::{Channel, ChannelInfo, Message};
use analyzer_core::time_utils::TimestampParser;
use serde_json::{Map, Value};
use tracing::{debug, warn};

/// File name desktop clients give the JSON document inside an export folder.
pub const EXPORT_FILE_NAME: &str = "result.json";

/// Entry type kept by ingestion; everything else is a service notice.
const MESSAGE_TYPE: &str = "message";

/// Peer prefixes exporters put in front of numeric sender ids.
const PEER_PREFIXES: &[&str] = &["user", "channel", "chat"];

// ── Public API ────────────────────────────────────────────────────────────────

/// Resolve `path` to an export document.
///
/// A file path is returned unchanged. For a directory, `result.json` is
/// searched at most two levels deep and the first match in path order wins.
pub fn resolve_export_path(path: &Path) -> Result<PathBuf> {
    if !path.is_dir() {
        return Ok(path.to_path_buf());
    }

    let mut candidates: Vec<PathBuf> = walkdir::WalkDir::new(path)
        .max_depth(2)
        .follow_links(true)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file() && entry.file_name() == EXPORT_FILE_NAME)
        .map(|entry| entry.into_path())
        .collect();

    candidates.sort();
    match candidates.into_iter().next() {
        Some(found) => {
            debug!("Using export document {}", found.display());
            Ok(found)
        }
        None => Err(AnalyzerError::ExportNotFound(path.to_path_buf())),
    }
}

/// Read and normalise the export at `path` (file or export directory).
pub fn load_export(path: &Path) -> Result<Channel> {
    let file_path = resolve_export_path(path)?;
    let bytes = std::fs::read(&file_path).map_err(|source| AnalyzerError::FileRead {
        path: file_path.clone(),
        source,
    })?;
    parse_export(&bytes)
}

/// Parse raw export bytes into a [`Channel`].
///
/// Fails with [`AnalyzerError::MalformedInput`] when the bytes are not JSON
/// or carry no `messages` array, and with [`AnalyzerError::InvalidRecord`] on
/// the first message whose required fields cannot be coerced.
pub fn parse_export(bytes: &[u8]) -> Result<Channel> {
    let document: Value = serde_json::from_slice(bytes)?;

    let (info, entries) = match &document {
        Value::Object(root) => {
            let entries = root
                .get("messages")
                .and_then(Value::as_array)
                .ok_or_else(|| {
                    AnalyzerError::MalformedInput(
                        "export has no `messages` array".to_string(),
                    )
                })?;
            (extract_channel_info(root), entries)
        }
        // Bare message-list export.
        Value::Array(entries) => (ChannelInfo::default(), entries),
        _ => {
            return Err(AnalyzerError::MalformedInput(
                "export must be a JSON object or array".to_string(),
            ))
        }
    };

    let mut messages = Vec::with_capacity(entries.len());
    let mut dropped = 0usize;

    for (index, entry) in entries.iter().enumerate() {
        if !is_message_entry(entry) {
            dropped += 1;
            continue;
        }
        messages.push(normalize_message(entry, index)?);
    }

    debug!(
        "Export: {} entries read, {} messages kept, {} non-message entries dropped",
        entries.len(),
        messages.len(),
        dropped,
    );

    Ok(Channel::new(info, messages))
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Channel-level `name`, `id` and `type`, each optional.
fn extract_channel_info(root: &Map<String, Value>) -> ChannelInfo {
    let id = match root.get("id") {
        None | Some(Value::Null) => None,
        Some(value) => {
            let coerced = coerce_integer(value);
            if coerced.is_none() {
                warn!("Ignoring non-integer channel id {}", value);
            }
            coerced
        }
    };

    ChannelInfo {
        name: root.get("name").and_then(Value::as_str).map(str::to_string),
        id,
        kind: root.get("type").and_then(Value::as_str).map(str::to_string),
    }
}

/// Returns `true` when the entry's `type` field is `"message"`.
fn is_message_entry(entry: &Value) -> bool {
    entry.get("type").and_then(Value::as_str) == Some(MESSAGE_TYPE)
}

/// Map one `"message"` entry onto a [`Message`].
fn normalize_message(entry: &Value, index: usize) -> Result<Message> {
    let raw_id = entry.get("id");
    let id = raw_id.and_then(coerce_integer);
    // Errors name the message id when it is usable, else the entry position.
    let label = match (id, raw_id) {
        (Some(id), _) => id.to_string(),
        (None, Some(raw)) if !raw.is_null() => raw.to_string(),
        _ => format!("entry #{}", index),
    };

    let id = id.ok_or_else(|| {
        AnalyzerError::invalid_record(&label, "missing or non-integer `id`")
    })?;

    let date = entry
        .get("date")
        .ok_or_else(|| AnalyzerError::invalid_record(&label, "missing `date`"))?;
    let timestamp = TimestampParser::parse(date).ok_or_else(|| {
        AnalyzerError::invalid_record(&label, format!("unparsable `date` {}", date))
    })?;

    let from_id = entry
        .get("from_id")
        .filter(|v| !v.is_null())
        .ok_or_else(|| AnalyzerError::invalid_record(&label, "missing `from_id`"))?;
    let user_id = coerce_sender_id(from_id).ok_or_else(|| {
        AnalyzerError::invalid_record(&label, format!("`from_id` {} is not an integer", from_id))
    })?;

    let username = entry.get("from").and_then(Value::as_str).map(str::to_string);
    let media_type = entry
        .get("media_type")
        .and_then(Value::as_str)
        .map(str::to_string);
    let edited = entry.get("edited").and_then(|v| match v {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    });

    Ok(Message::new(id, timestamp, user_id)
        .with_username(username)
        .with_text(flatten_text(entry.get("text")))
        .with_media_type(media_type)
        .with_edited(edited))
}

/// Coerce a JSON number or numeric string to `i64`.
fn coerce_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
                .map(|f| f as i64)
        }),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

/// Coerce a sender identifier, also accepting peer-prefixed forms such as
/// `"user123456"`.
fn coerce_sender_id(value: &Value) -> Option<i64> {
    if let Some(id) = coerce_integer(value) {
        return Some(id);
    }
    let s = value.as_str()?.trim();
    PEER_PREFIXES.iter().find_map(|prefix| {
        let digits = s.strip_prefix(prefix)?;
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        digits.parse::<i64>().ok()
    })
}

/// Flatten the `text` field.
///
/// Rich text is exported as an array mixing plain strings and
/// `{ "type": ..., "text": ... }` fragments; the pieces are concatenated.
fn flatten_text(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Array(parts)) => parts
            .iter()
            .filter_map(|part| match part {
                Value::String(s) => Some(s.as_str()),
                Value::Object(obj) => obj.get("text").and_then(Value::as_str),
                _ => None,
            })
            .collect(),
        _ => String::new(),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Weekday};
    use serde_json::json;
    use tempfile::TempDir;

    // ── Helpers ───────────────────────────────────────────────────────────────

    fn message(id: i64, date: &str, from: Option<&str>, from_id: Value) -> Value {
        json!({
            "id": id,
            "type": "message",
            "date": date,
            "from": from,
            "from_id": from_id,
            "text": "hi",
        })
    }

    fn service(id: i64, date: &str) -> Value {
        json!({
            "id": id,
            "type": "service",
            "date": date,
            "actor": "Alice",
            "actor_id": "user1",
            "action": "pin_message",
            "text": "",
        })
    }

    fn export(messages: Vec<Value>) -> Vec<u8> {
        serde_json::to_vec(&json!({
            "name": "Rustaceans",
            "type": "public_supergroup",
            "id": 1234567,
            "messages": messages,
        }))
        .unwrap()
    }

    fn expect_invalid_record(result: Result<Channel>) -> (String, String) {
        match result {
            Err(AnalyzerError::InvalidRecord { message_id, reason }) => (message_id, reason),
            other => panic!("expected InvalidRecord, got {:?}", other),
        }
    }

    // ── parse_export ──────────────────────────────────────────────────────────

    #[test]
    fn test_parse_export_basic() {
        let bytes = export(vec![message(
            1,
            "2024-01-15T09:30:00",
            Some("Alice"),
            json!(42),
        )]);
        let channel = parse_export(&bytes).unwrap();

        assert_eq!(channel.info.name.as_deref(), Some("Rustaceans"));
        assert_eq!(channel.info.kind.as_deref(), Some("public_supergroup"));
        assert_eq!(channel.info.id, Some(1234567));
        assert_eq!(channel.messages.len(), 1);

        let msg = &channel.messages[0];
        assert_eq!(msg.id(), 1);
        assert_eq!(msg.user_id(), 42);
        assert_eq!(msg.username(), Some("Alice"));
        assert_eq!(msg.text(), "hi");
        assert_eq!(msg.hour(), 9);
        assert_eq!(msg.weekday(), Weekday::Mon);
        assert_eq!(msg.date(), NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
    }

    #[test]
    fn test_parse_export_drops_service_entries() {
        let bytes = export(vec![
            message(1, "2024-01-15T09:00:00", Some("Alice"), json!(1)),
            service(2, "2024-01-15T09:01:00"),
            message(3, "2024-01-15T09:02:00", Some("Bob"), json!(2)),
        ]);
        let channel = parse_export(&bytes).unwrap();

        let ids: Vec<i64> = channel.messages.iter().map(Message::id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn test_parse_export_entry_without_type_dropped() {
        let bytes = export(vec![json!({"id": 9, "date": "2024-01-15T09:00:00", "from_id": 1})]);
        let channel = parse_export(&bytes).unwrap();
        assert!(channel.messages.is_empty());
    }

    #[test]
    fn test_parse_export_service_entry_with_bad_fields_ignored() {
        // Service entries are dropped before any coercion happens.
        let bytes = export(vec![json!({"id": "x", "type": "service", "date": "never"})]);
        assert!(parse_export(&bytes).unwrap().messages.is_empty());
    }

    #[test]
    fn test_parse_export_bare_message_list() {
        let bytes = serde_json::to_vec(&json!([
            message(1, "2024-01-15T09:00:00", None, json!("7")),
        ]))
        .unwrap();
        let channel = parse_export(&bytes).unwrap();

        assert_eq!(channel.info, ChannelInfo::default());
        assert_eq!(channel.messages.len(), 1);
        assert_eq!(channel.messages[0].user_id(), 7);
    }

    #[test]
    fn test_parse_export_object_without_channel_metadata() {
        let bytes = serde_json::to_vec(&json!({"messages": []})).unwrap();
        let channel = parse_export(&bytes).unwrap();
        assert!(channel.info.name.is_none());
        assert!(channel.info.id.is_none());
        assert!(channel.info.kind.is_none());
        assert!(channel.messages.is_empty());
    }

    #[test]
    fn test_parse_export_invalid_json() {
        let result = parse_export(b"{not json");
        assert!(matches!(result, Err(AnalyzerError::MalformedInput(_))));
    }

    #[test]
    fn test_parse_export_missing_messages_field() {
        let bytes = serde_json::to_vec(&json!({"name": "x"})).unwrap();
        assert!(matches!(
            parse_export(&bytes),
            Err(AnalyzerError::MalformedInput(_))
        ));
    }

    #[test]
    fn test_parse_export_messages_not_array() {
        let bytes = serde_json::to_vec(&json!({"messages": {"id": 1}})).unwrap();
        assert!(matches!(
            parse_export(&bytes),
            Err(AnalyzerError::MalformedInput(_))
        ));
    }

    #[test]
    fn test_parse_export_scalar_document() {
        assert!(matches!(
            parse_export(b"42"),
            Err(AnalyzerError::MalformedInput(_))
        ));
    }

    #[test]
    fn test_parse_export_non_numeric_from_id_fails_naming_message() {
        let bytes = export(vec![
            message(1, "2024-01-15T09:00:00", Some("Alice"), json!(1)),
            message(77, "2024-01-15T09:01:00", Some("Mallory"), json!("abc")),
        ]);
        let (message_id, reason) = expect_invalid_record(parse_export(&bytes));
        assert_eq!(message_id, "77");
        assert!(reason.contains("from_id"));
    }

    #[test]
    fn test_parse_export_missing_from_id_fails() {
        let bytes = export(vec![json!({
            "id": 5,
            "type": "message",
            "date": "2024-01-15T09:00:00",
            "from": "Ghost",
        })]);
        let (message_id, reason) = expect_invalid_record(parse_export(&bytes));
        assert_eq!(message_id, "5");
        assert!(reason.contains("from_id"));
    }

    #[test]
    fn test_parse_export_unparsable_date_fails() {
        let bytes = export(vec![message(8, "sometime", Some("Alice"), json!(1))]);
        let (message_id, reason) = expect_invalid_record(parse_export(&bytes));
        assert_eq!(message_id, "8");
        assert!(reason.contains("date"));
    }

    #[test]
    fn test_parse_export_missing_id_names_entry_index() {
        let bytes = export(vec![
            service(1, "2024-01-15T09:00:00"),
            json!({"type": "message", "date": "2024-01-15T09:00:00", "from_id": 1}),
        ]);
        let (message_id, _) = expect_invalid_record(parse_export(&bytes));
        assert_eq!(message_id, "entry #1");
    }

    #[test]
    fn test_parse_export_fails_fast_on_first_bad_record() {
        let bytes = export(vec![
            message(10, "bad-date", Some("A"), json!(1)),
            message(11, "2024-01-15T09:00:00", Some("B"), json!("also-bad")),
        ]);
        let (message_id, _) = expect_invalid_record(parse_export(&bytes));
        assert_eq!(message_id, "10");
    }

    #[test]
    fn test_parse_export_null_username_is_missing_not_error() {
        let bytes = export(vec![message(1, "2024-01-15T09:00:00", None, json!(3))]);
        let channel = parse_export(&bytes).unwrap();
        assert!(channel.messages[0].username().is_none());
    }

    #[test]
    fn test_parse_export_passes_through_media_and_edit() {
        let bytes = export(vec![json!({
            "id": 1,
            "type": "message",
            "date": "2024-01-15T09:00:00",
            "from": "Alice",
            "from_id": "user12",
            "media_type": "voice_message",
            "edited": "2024-01-15T09:10:00",
            "text": "",
        })]);
        let msg = &parse_export(&bytes).unwrap().messages[0];
        assert_eq!(msg.user_id(), 12);
        assert_eq!(msg.media_type(), Some("voice_message"));
        assert_eq!(msg.edited(), Some("2024-01-15T09:10:00"));
        assert!(msg.text().is_empty());
    }

    #[test]
    fn test_parse_export_channel_id_non_integer_ignored() {
        let bytes = serde_json::to_vec(&json!({"id": "not-a-number", "messages": []})).unwrap();
        assert!(parse_export(&bytes).unwrap().info.id.is_none());
    }

    // ── coercion helpers ──────────────────────────────────────────────────────

    #[test]
    fn test_coerce_sender_id_variants() {
        assert_eq!(coerce_sender_id(&json!(5)), Some(5));
        assert_eq!(coerce_sender_id(&json!("  17 ")), Some(17));
        assert_eq!(coerce_sender_id(&json!(12.0)), Some(12));
        assert_eq!(coerce_sender_id(&json!("user123")), Some(123));
        assert_eq!(coerce_sender_id(&json!("channel1001")), Some(1001));
        assert_eq!(coerce_sender_id(&json!(1.5)), None);
        assert_eq!(coerce_sender_id(&json!("abc")), None);
        assert_eq!(coerce_sender_id(&json!("user")), None);
        assert_eq!(coerce_sender_id(&json!("user12x")), None);
        assert_eq!(coerce_sender_id(&json!(true)), None);
    }

    #[test]
    fn test_flatten_text_rich_entities() {
        let text = json!([
            "See ",
            {"type": "link", "text": "https://example.org"},
            " and ",
            {"type": "bold", "text": "this"},
        ]);
        assert_eq!(flatten_text(Some(&text)), "See https://example.org and this");
        assert_eq!(flatten_text(None), "");
        assert_eq!(flatten_text(Some(&json!(null))), "");
    }

    // ── load_export / resolve_export_path ─────────────────────────────────────

    #[test]
    fn test_load_export_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("chat.json");
        std::fs::write(
            &path,
            export(vec![message(1, "2024-01-15T09:00:00", Some("A"), json!(1))]),
        )
        .unwrap();

        let channel = load_export(&path).unwrap();
        assert_eq!(channel.messages.len(), 1);
    }

    #[test]
    fn test_load_export_from_directory() {
        let dir = TempDir::new().unwrap();
        let sub = dir.path().join("ChatExport_2024-02-01");
        std::fs::create_dir_all(&sub).unwrap();
        std::fs::write(sub.join(EXPORT_FILE_NAME), export(vec![])).unwrap();

        let resolved = resolve_export_path(dir.path()).unwrap();
        assert_eq!(resolved, sub.join(EXPORT_FILE_NAME));

        let channel = load_export(dir.path()).unwrap();
        assert_eq!(channel.display_name(), "Rustaceans");
    }

    #[test]
    fn test_resolve_export_path_empty_directory() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            resolve_export_path(dir.path()),
            Err(AnalyzerError::ExportNotFound(_))
        ));
    }

    #[test]
    fn test_load_export_missing_file() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope.json");
        match load_export(&missing) {
            Err(AnalyzerError::FileRead { path, .. }) => assert_eq!(path, missing),
            other => panic!("expected FileRead, got {:?}", other),
        }
    }
}
