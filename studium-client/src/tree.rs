use std::collections::HashMap;

use serde_json::Value;

use crate::{
    api::{Comment, CommentId, Time},
    normalize,
};

/// Reconstructs the two-level comment display structure from a listing payload
///
/// Top-level comments come out newest first, replies oldest first. If any record
/// carries a `replies` field the backend grouping is trusted, otherwise the
/// grouping is derived from `parentId`.
pub fn build_tree(payload: &Value, now: Time) -> Vec<Comment> {
    let records = normalize::comment_records(payload);
    let mut res = match records.iter().any(normalize::carries_replies) {
        true => from_grouped(records, now),
        false => from_flat(records, now),
    };
    sort_threads(&mut res);
    res
}

pub fn sort_threads(threads: &mut [Comment]) {
    threads.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    for t in threads.iter_mut() {
        t.replies.sort_by_key(|r| r.created_at);
    }
}

fn from_grouped(records: &[Value], now: Time) -> Vec<Comment> {
    let mut res = Vec::with_capacity(records.len());
    for record in records {
        let mut parent = match normalize::normalize_comment(record, now) {
            Some(c) => c,
            None => continue,
        };
        if parent.is_reply() {
            tracing::debug!(id = ?parent.key, "dropping reply listed at top level");
            continue;
        }
        let parent_id = parent.id();
        parent.replies = normalize::reply_records(record)
            .iter()
            .filter_map(|r| normalize::normalize_comment(r, now))
            .map(|mut r| {
                r.parent_id = parent_id;
                r
            })
            .collect();
        res.push(parent);
    }
    res
}

fn from_flat(records: &[Value], now: Time) -> Vec<Comment> {
    let comments = records
        .iter()
        .filter_map(|r| normalize::normalize_comment(r, now))
        .collect::<Vec<_>>();

    // reply id -> the id it answers, to walk reply-to-reply chains up to their root
    let answers: HashMap<CommentId, CommentId> = comments
        .iter()
        .filter_map(|c| Some((c.id()?, c.parent_id?)))
        .collect();

    let (mut roots, replies): (Vec<Comment>, Vec<Comment>) =
        comments.into_iter().partition(|c| !c.is_reply());
    let root_index: HashMap<CommentId, usize> = roots
        .iter()
        .enumerate()
        .filter_map(|(i, c)| Some((c.id()?, i)))
        .collect();

    'replies: for mut reply in replies {
        let mut target = match reply.parent_id {
            Some(p) => p,
            None => continue,
        };
        let mut hops = 0;
        while !root_index.contains_key(&target) {
            match answers.get(&target) {
                Some(up) if hops < answers.len() => {
                    target = *up;
                    hops += 1;
                }
                _ => {
                    tracing::debug!(id = ?reply.key, parent = ?reply.parent_id, "dropping orphan reply");
                    continue 'replies;
                }
            }
        }
        reply.parent_id = Some(target);
        roots[root_index[&target]].replies.push(reply);
    }
    roots
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::CommentKey;
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    fn now() -> Time {
        Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap()
    }

    fn ids(comments: &[Comment]) -> Vec<i64> {
        comments.iter().map(|c| c.id().unwrap().0).collect()
    }

    #[test]
    fn flat_listing() {
        let payload = json!([
            { "id": 1, "createdAt": "2024-01-02", "parentId": null },
            { "id": 2, "createdAt": "2024-01-03", "parentId": null },
            { "id": 3, "createdAt": "2024-01-02T01:00", "parentId": 1 },
        ]);
        let tree = build_tree(&payload, now());
        assert_eq!(ids(&tree), vec![2, 1]);
        assert_eq!(ids(&tree[1].replies), vec![3]);
        assert!(tree[0].replies.is_empty());
    }

    #[test]
    fn replies_oldest_first() {
        let payload = json!({ "comments": [
            { "id": 1, "createdAt": "2024-01-01" },
            { "id": 4, "createdAt": "2024-01-05", "parentId": 1 },
            { "id": 3, "createdAt": "2024-01-03", "parentId": 1 },
        ] });
        let tree = build_tree(&payload, now());
        assert_eq!(ids(&tree[0].replies), vec![3, 4]);
    }

    #[test]
    fn grouped_listing_is_trusted() {
        let payload = json!({ "content": [
            { "id": 1, "createdAt": "2024-01-01", "replies": [
                { "id": 7, "createdAt": "2024-01-04" },
                { "id": 6, "createdAt": "2024-01-02", "replies": [{ "id": 99 }] },
            ] },
            { "id": 2, "createdAt": "2024-01-02", "replies": [] },
            { "id": 6, "createdAt": "2024-01-02", "parentId": 1 },
        ] });
        let tree = build_tree(&payload, now());
        assert_eq!(ids(&tree), vec![2, 1]);
        assert_eq!(ids(&tree[1].replies), vec![6, 7]);
        assert!(tree[1].replies.iter().all(|r| r.parent_id == Some(CommentId(1))));
        assert!(tree[1].replies.iter().all(|r| r.replies.is_empty()));
    }

    #[test]
    fn reply_to_reply_goes_to_root() {
        let payload = json!([
            { "id": 1, "createdAt": "2024-01-01" },
            { "id": 2, "createdAt": "2024-01-02", "parentId": 1 },
            { "id": 3, "createdAt": "2024-01-03", "parentId": 2 },
        ]);
        let tree = build_tree(&payload, now());
        assert_eq!(ids(&tree), vec![1]);
        assert_eq!(ids(&tree[0].replies), vec![2, 3]);
        assert_eq!(tree[0].replies[1].parent_id, Some(CommentId(1)));
    }

    #[test]
    fn orphans_and_cycles_are_dropped() {
        let payload = json!([
            { "id": 1, "createdAt": "2024-01-01" },
            { "id": 2, "parentId": 50 },
            { "id": 3, "parentId": 4 },
            { "id": 4, "parentId": 3 },
        ]);
        let tree = build_tree(&payload, now());
        assert_eq!(ids(&tree), vec![1]);
        assert!(tree[0].replies.is_empty());
    }

    #[test]
    fn non_array_is_empty() {
        assert!(build_tree(&json!({ "message": "ok" }), now()).is_empty());
        assert!(build_tree(&json!(42), now()).is_empty());
    }

    #[test]
    fn equal_timestamps_keep_input_order() {
        let payload = json!([
            { "id": 1, "createdAt": "2024-01-01" },
            { "id": 2, "createdAt": "2024-01-01" },
        ]);
        let tree = build_tree(&payload, now());
        assert_eq!(ids(&tree), vec![1, 2]);
        assert!(tree.iter().all(|c| matches!(c.key, CommentKey::Saved(_))));
    }

    #[derive(Debug, bolero::generator::TypeGenerator)]
    struct Record {
        id: u8,
        day: u8,
        hour: u8,
        parent: Option<u8>,
        pre_grouped: bool,
    }

    fn payload_of(records: &[Record]) -> Value {
        let grouped = records.first().map(|r| r.pre_grouped).unwrap_or(false);
        Value::Array(
            records
                .iter()
                .map(|r| {
                    let mut v = json!({
                        "id": r.id % 16,
                        "createdAt": format!("2024-01-{:02}T{:02}:00", r.day % 28 + 1, r.hour % 24),
                        "parentId": r.parent.map(|p| p % 16),
                    });
                    if grouped && r.parent.is_none() {
                        v["replies"] = json!([
                            { "id": 100 + r.id as i64, "createdAt": format!("2024-02-{:02}", r.hour % 28 + 1) },
                            { "id": 200 + r.id as i64, "createdAt": format!("2024-02-{:02}", r.day % 28 + 1) },
                        ]);
                    }
                    v
                })
                .collect(),
        )
    }

    #[test]
    fn ordering_properties() {
        bolero::check!()
            .with_type::<Vec<Record>>()
            .for_each(|records: &Vec<Record>| {
                let tree = build_tree(&payload_of(records), now());
                assert!(tree.windows(2).all(|w| w[0].created_at >= w[1].created_at));
                for t in &tree {
                    assert!(t.parent_id.is_none());
                    assert!(t.replies.windows(2).all(|w| w[0].created_at <= w[1].created_at));
                    assert!(t.replies.iter().all(|r| r.parent_id == t.id()));
                    assert!(t.replies.iter().all(|r| r.replies.is_empty()));
                }
            });
    }

    #[test]
    fn non_arrays_never_yield_comments() {
        bolero::check!()
            .with_type::<(Option<u64>, String)>()
            .for_each(|(n, s): &(Option<u64>, String)| {
                assert!(build_tree(&json!(n), now()).is_empty());
                assert!(build_tree(&json!(s), now()).is_empty());
                assert!(build_tree(&json!({ "value": s }), now()).is_empty());
            });
    }
}
