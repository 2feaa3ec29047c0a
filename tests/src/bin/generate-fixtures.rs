use chrono::{Datelike, Duration, NaiveDateTime, TimeZone, Timelike, Utc};
use rand::{seq::SliceRandom, Rng};
use serde_json::{json, Value};
use structopt::StructOpt;
use studium_api::EntityRef;

const NUM_AUTHORS: usize = 5;
const COMMENT_WORD_COUNT: usize = 12;
const REPLY_CHANCE: f64 = 0.35;

#[derive(Debug, StructOpt)]
#[structopt(about = "Prints a comment listing in one of the backend response shapes")]
struct Opt {
    /// One of flat, grouped, paged, legacy
    #[structopt(long, default_value = "flat")]
    shape: String,

    /// Entity the comments are attached to, as `kind:id`
    #[structopt(long, default_value = "blog:1")]
    entity: EntityRef,

    #[structopt(long, default_value = "20")]
    count: usize,

    /// Adds records the client must drop: missing ids, replies to unknown parents
    #[structopt(long)]
    noisy: bool,
}

struct Record {
    id: i64,
    parent: Option<i64>,
    author: String,
    content: String,
    at: NaiveDateTime,
    likes: u64,
}

fn gen_records(count: usize) -> Vec<Record> {
    let mut rng = rand::thread_rng();
    let authors = (0..NUM_AUTHORS)
        .map(|_| lipsum::lipsum_words_with_rng(&mut rng, 2))
        .collect::<Vec<_>>();
    let mut at = Utc::now().naive_utc() - Duration::days(30);
    let mut roots = Vec::new();
    let mut records = Vec::new();
    for i in 0..count {
        let id = i as i64 + 1;
        at += Duration::minutes(rng.gen_range(1..600));
        let parent = match roots.choose(&mut rng) {
            Some(p) if rng.gen_bool(REPLY_CHANCE) => Some(*p),
            _ => None,
        };
        if parent.is_none() {
            roots.push(id);
        }
        records.push(Record {
            id,
            parent,
            author: authors.choose(&mut rng).cloned().unwrap_or_default(),
            content: lipsum::lipsum_words_with_rng(&mut rng, COMMENT_WORD_COUNT),
            at,
            likes: rng.gen_range(0..20),
        });
    }
    records
}

fn render(shape: &str, r: &Record) -> Value {
    match shape {
        "paged" => json!({
            "id": r.id.to_string(),
            "parent": r.parent.map(|p| json!({ "id": p })),
            "user": { "name": r.author },
            "content": r.content,
            "created_at": Utc.from_utc_datetime(&r.at).timestamp_millis(),
            "likes": vec![json!({}); r.likes as usize],
        }),
        "legacy" => json!({
            "id": r.id,
            "parentCommentId": r.parent,
            "username": r.author,
            "text": r.content,
            "timestamp": [
                r.at.year(),
                r.at.month(),
                r.at.day(),
                r.at.hour(),
                r.at.minute(),
                r.at.second(),
            ],
            "likeCount": r.likes.to_string(),
        }),
        _ => json!({
            "id": r.id,
            "parentId": r.parent,
            "authorName": r.author,
            "content": r.content,
            "createdAt": r.at.format("%Y-%m-%dT%H:%M:%S").to_string(),
            "likeCount": r.likes,
        }),
    }
}

fn main() -> anyhow::Result<()> {
    let opt = Opt::from_args();
    let records = gen_records(opt.count);
    let mut rendered = match opt.shape.as_str() {
        "grouped" => records
            .iter()
            .filter(|r| r.parent.is_none())
            .map(|t| {
                let mut v = render("flat", t);
                v["replies"] = records
                    .iter()
                    .filter(|r| r.parent == Some(t.id))
                    .map(|r| render("flat", r))
                    .collect();
                v
            })
            .collect::<Vec<_>>(),
        "flat" | "paged" | "legacy" => records.iter().map(|r| render(&opt.shape, r)).collect(),
        s => anyhow::bail!("unknown shape {s:?}"),
    };
    if opt.noisy {
        rendered.push(json!({ "content": "no id" }));
        rendered.push(json!({ "id": 9_999, "parentId": 8_888, "content": "orphan" }));
        rendered.push(json!({ "id": "not a number", "content": "bad id" }));
    }
    let payload = match opt.shape.as_str() {
        "grouped" => json!({ "comments": rendered }),
        "paged" => json!({ "content": rendered, "totalPages": 1, "number": 0 }),
        _ => Value::Array(rendered),
    };
    println!(
        "{}",
        serde_json::to_string_pretty(&json!({
            "entity": opt.entity.path(),
            "payload": payload,
        }))?
    );
    Ok(())
}
