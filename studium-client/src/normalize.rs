//! The one place where backend comment records of any shape are turned into
//! canonical [`Comment`]s. Nothing past this module looks at raw field names.

use chrono::{NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde_json::Value;

use crate::api::{Comment, CommentId, CommentKey, Time};

pub const DEFAULT_AUTHOR: &str = "User";

const AUTHOR_FIELDS: &[&str] = &["authorName", "user.name", "author.name", "username"];
const CONTENT_FIELDS: &[&str] = &["content", "text", "body", "message"];
const IMAGE_FIELDS: &[&str] = &["imageUrl", "image", "attachmentUrl"];
const AVATAR_FIELDS: &[&str] = &[
    "authorAvatar",
    "user.avatarUrl",
    "author.avatarUrl",
    "avatarUrl",
];
const TIME_FIELDS: &[&str] = &["createdAt", "created_at", "createdDate", "timestamp"];
const LIKE_FIELDS: &[&str] = &["likeCount", "likes", "reactionCount"];
const PARENT_FIELDS: &[&str] = &["parentId", "parent_id", "parentCommentId", "parent.id"];
const WRAPPER_FIELDS: &[&str] = &["comments", "content", "data"];

/// Returns the list of records a comment listing payload carries
///
/// Accepts a bare array or an object wrapping it. Anything else yields no records.
pub fn comment_records(payload: &Value) -> &[Value] {
    match payload {
        Value::Array(records) => records,
        Value::Object(o) => WRAPPER_FIELDS
            .iter()
            .find_map(|k| o.get(*k).and_then(Value::as_array))
            .map(|a| a.as_slice())
            .unwrap_or(&[]),
        _ => &[],
    }
}

/// Whether the backend pre-grouped this record's replies
pub fn carries_replies(record: &Value) -> bool {
    record.get("replies").is_some()
}

/// Raw reply records of a pre-grouped record
pub fn reply_records(record: &Value) -> &[Value] {
    record
        .get("replies")
        .and_then(Value::as_array)
        .map(|a| a.as_slice())
        .unwrap_or(&[])
}

fn lookup<'a>(record: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.')
        .try_fold(record, |v, k| v.get(k))
        .filter(|v| !v.is_null())
}

fn first<'a>(record: &'a Value, paths: &[&str]) -> Option<&'a Value> {
    paths.iter().find_map(|p| lookup(record, p).filter(|v| is_set(v)))
}

/// Empty strings count as absent, so the next candidate field gets a chance
fn is_set(v: &Value) -> bool {
    match v {
        Value::String(s) => !s.is_empty(),
        Value::Bool(b) => *b,
        _ => true,
    }
}

fn first_string(record: &Value, paths: &[&str]) -> Option<String> {
    paths
        .iter()
        .find_map(|p| lookup(record, p).and_then(Value::as_str).filter(|s| !s.is_empty()))
        .map(String::from)
}

pub fn parse_id(v: &Value) -> Option<CommentId> {
    match v {
        Value::Number(n) => n.as_i64().map(CommentId),
        Value::String(s) => s.trim().parse().ok().map(CommentId),
        _ => None,
    }
}

/// Parses the timestamp shapes seen from the backend
pub fn parse_time(v: &Value) -> Option<Time> {
    match v {
        Value::String(s) => parse_time_str(s.trim()),
        Value::Number(n) => Utc.timestamp_millis_opt(n.as_i64()?).single(),
        // [year, month, day, hour, minute, second, nanos], trailing items optional
        Value::Array(parts) => {
            let parts = parts
                .iter()
                .map(|p| p.as_i64())
                .collect::<Option<Vec<_>>>()?;
            let get = |i: usize| parts.get(i).copied().unwrap_or(0);
            let date = NaiveDate::from_ymd_opt(
                i32::try_from(get(0)).ok()?,
                u32::try_from(get(1)).ok()?,
                u32::try_from(get(2)).ok()?,
            )?;
            let time = date.and_hms_nano_opt(
                u32::try_from(get(3)).ok()?,
                u32::try_from(get(4)).ok()?,
                u32::try_from(get(5)).ok()?,
                u32::try_from(get(6)).ok()?,
            )?;
            Some(Utc.from_utc_datetime(&time))
        }
        _ => None,
    }
}

fn parse_time_str(s: &str) -> Option<Time> {
    if let Ok(t) = chrono::DateTime::parse_from_rfc3339(s) {
        return Some(t.with_timezone(&Utc));
    }
    const NAIVE_FORMATS: &[&str] = &[
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M",
    ];
    for fmt in NAIVE_FORMATS {
        if let Ok(t) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(Utc.from_utc_datetime(&t));
        }
    }
    let date = NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()?;
    Some(Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0)?))
}

fn like_count(v: &Value) -> u64 {
    match v {
        Value::Number(n) => n.as_u64().unwrap_or(0),
        Value::Array(a) => a.len() as u64,
        Value::String(s) => s.trim().parse().unwrap_or(0),
        _ => 0,
    }
}

/// Converts one backend record into a canonical comment, without its replies
///
/// Returns `None` when the record has no usable id. Missing timestamps
/// default to `now`.
pub fn normalize_comment(record: &Value, now: Time) -> Option<Comment> {
    if !record.is_object() {
        tracing::debug!(?record, "ignoring non-object comment record");
        return None;
    }
    let id = match lookup(record, "id").and_then(parse_id) {
        Some(id) => id,
        None => {
            tracing::debug!(?record, "ignoring comment record without an id");
            return None;
        }
    };
    Some(Comment {
        key: CommentKey::Saved(id),
        parent_id: first(record, PARENT_FIELDS).and_then(parse_id),
        content: first_string(record, CONTENT_FIELDS).unwrap_or_default(),
        author_name: first_string(record, AUTHOR_FIELDS)
            .unwrap_or_else(|| String::from(DEFAULT_AUTHOR)),
        author_avatar: first_string(record, AVATAR_FIELDS),
        image_url: first_string(record, IMAGE_FIELDS),
        created_at: first(record, TIME_FIELDS)
            .and_then(parse_time)
            .unwrap_or(now),
        like_count: first(record, LIKE_FIELDS).map(like_count).unwrap_or(0),
        replies: Vec::new(),
    })
}

/// Whether `user` wrote `comment`
///
/// Comments only carry a display name, so nobody owns one whose author
/// resolved to the placeholder, and an unknown user owns nothing.
pub fn is_authored_by(comment: &Comment, user: Option<&str>) -> bool {
    match user {
        Some(user) if user != DEFAULT_AUTHOR => comment.author_name == user,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn now() -> Time {
        Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn unwraps_known_wrappers() {
        for key in ["comments", "content", "data"] {
            let payload = json!({ key: [{ "id": 1 }] });
            assert_eq!(comment_records(&payload).len(), 1, "wrapper {key}");
        }
        assert!(comment_records(&json!({ "total": 3 })).is_empty());
        assert!(comment_records(&json!("nope")).is_empty());
        assert!(comment_records(&Value::Null).is_empty());
    }

    #[test]
    fn author_priority() {
        let c = normalize_comment(
            &json!({ "id": 1, "user": { "name": "Lan" }, "username": "lan99" }),
            now(),
        )
        .unwrap();
        assert_eq!(c.author_name, "Lan");

        let c = normalize_comment(
            &json!({ "id": 1, "authorName": "", "author": { "name": "Minh" } }),
            now(),
        )
        .unwrap();
        assert_eq!(c.author_name, "Minh");
    }

    #[test]
    fn defaults() {
        let c = normalize_comment(&json!({ "id": "12" }), now()).unwrap();
        assert_eq!(c.key, CommentKey::Saved(CommentId(12)));
        assert_eq!(c.author_name, DEFAULT_AUTHOR);
        assert_eq!(c.content, "");
        assert_eq!(c.image_url, None);
        assert_eq!(c.created_at, now());
        assert_eq!(c.like_count, 0);
        assert_eq!(c.parent_id, None);
    }

    #[test]
    fn alternate_fields() {
        let c = normalize_comment(
            &json!({
                "id": 5,
                "text": "hi",
                "image": "https://img/x.png",
                "created_at": 1700000000000i64,
                "likes": [1, 2, 3],
                "parent": { "id": 2 },
                "user": { "avatarUrl": "https://img/a.png" },
            }),
            now(),
        )
        .unwrap();
        assert_eq!(c.content, "hi");
        assert_eq!(c.image_url.as_deref(), Some("https://img/x.png"));
        assert_eq!(c.created_at, Utc.timestamp_millis_opt(1700000000000).unwrap());
        assert_eq!(c.like_count, 3);
        assert_eq!(c.parent_id, Some(CommentId(2)));
        assert_eq!(c.author_avatar.as_deref(), Some("https://img/a.png"));
    }

    #[test]
    fn null_parent_is_top_level() {
        let c = normalize_comment(&json!({ "id": 1, "parentId": null }), now()).unwrap();
        assert_eq!(c.parent_id, None);
    }

    #[test]
    fn missing_id_is_dropped() {
        assert_eq!(normalize_comment(&json!({ "content": "x" }), now()), None);
        assert_eq!(normalize_comment(&json!({ "id": "abc" }), now()), None);
        assert_eq!(normalize_comment(&json!(3), now()), None);
    }

    #[test]
    fn time_shapes() {
        let expect = Utc.with_ymd_and_hms(2024, 1, 2, 1, 0, 0).unwrap();
        for v in [
            json!("2024-01-02T01:00"),
            json!("2024-01-02T01:00:00"),
            json!("2024-01-02T01:00:00.000"),
            json!("2024-01-02 01:00:00"),
            json!("2024-01-02T01:00:00Z"),
            json!("2024-01-02T08:00:00+07:00"),
            json!([2024, 1, 2, 1, 0]),
        ] {
            assert_eq!(parse_time(&v), Some(expect), "parsing {v}");
        }
        assert_eq!(
            parse_time(&json!("2024-01-02")),
            Some(Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap())
        );
        assert_eq!(parse_time(&json!("yesterday")), None);
        assert_eq!(parse_time(&json!([2024, 13, 1])), None);
    }

    #[test]
    fn placeholder_author_is_nobody() {
        let anonymous = normalize_comment(&json!({ "id": 1 }), now()).unwrap();
        let named = normalize_comment(&json!({ "id": 2, "username": "an" }), now()).unwrap();
        assert!(!is_authored_by(&anonymous, None));
        assert!(!is_authored_by(&anonymous, Some(DEFAULT_AUTHOR)));
        assert!(!is_authored_by(&named, None));
        assert!(!is_authored_by(&named, Some("chi")));
        assert!(is_authored_by(&named, Some("an")));
    }
}
