use std::{
    collections::{BTreeMap, HashMap, VecDeque},
    sync::Arc,
};

use async_trait::async_trait;
use chrono::{Duration, TimeZone, Utc};
use serde_json::{json, Value};
use studium_client::{
    api::{
        AuthToken, CommentEdit, CommentId, EntityRef, Error, NewAccount, NewComment, NewRating,
        NewSession, Rating, RatingSummary, Time, Uuid,
    },
    InteractionsApi,
};
use tokio::sync::Mutex;

/// 2024-01-01, whole seconds so every shape renders timestamps losslessly
const EPOCH: i64 = 1_704_067_200;

/// How listings are rendered, mimicking the response shapes the clients must cope with
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Shape {
    /// Bare array of flat records, `authorName` / `createdAt` / `parentId`
    Flat,
    /// `{comments: [...]}` with replies nested under their parent
    Grouped,
    /// `{content: [...]}` flat, `user.name` / epoch-millis `created_at` / `parent.id`
    Paged,
    /// Bare array, `username` / `text` / `timestamp` arrays; creation answers without the comment
    Legacy,
}

#[derive(Clone, Debug)]
struct StoredComment {
    id: CommentId,
    entity: EntityRef,
    parent: Option<CommentId>,
    author: String,
    content: String,
    image_url: Option<String>,
    created_at: Time,
}

#[derive(Debug)]
struct DbUser {
    name: String,
    email: String,
    password: String,
    sessions: Vec<AuthToken>,
    ratings: HashMap<EntityRef, u8>,
}

#[derive(Debug)]
struct State {
    shape: Shape,
    users: BTreeMap<String, DbUser>, // by email
    comments: Vec<StoredComment>,
    next_comment_id: i64,
    failures: VecDeque<Error>,
    clock: Time,
    requests: usize,
}

/// In-memory stand-in for the interactions backend
#[derive(Clone, Debug)]
pub struct MockServer(Arc<Mutex<State>>);

impl MockServer {
    pub fn new(shape: Shape) -> MockServer {
        MockServer(Arc::new(Mutex::new(State {
            shape,
            users: BTreeMap::new(),
            comments: Vec::new(),
            next_comment_id: 1,
            failures: VecDeque::new(),
            clock: Utc.timestamp_opt(EPOCH, 0).earliest().unwrap_or_default(),
            requests: 0,
        })))
    }

    pub async fn set_shape(&self, shape: Shape) {
        self.0.lock().await.shape = shape;
    }

    pub async fn create_user(&self, account: NewAccount) -> Result<(), Error> {
        account.validate()?;
        let mut s = self.0.lock().await;
        if s.users.contains_key(&account.email) {
            return Err(Error::Rejected {
                status: 409,
                message: Some(String::from("Email đã được sử dụng")),
            });
        }
        s.users.insert(
            account.email.clone(),
            DbUser {
                name: account.username,
                email: account.email,
                password: account.password,
                sessions: Vec::new(),
                ratings: HashMap::new(),
            },
        );
        Ok(())
    }

    pub async fn auth(&self, session: NewSession) -> Result<AuthToken, Error> {
        session.validate()?;
        let mut s = self.0.lock().await;
        match s.users.get_mut(&session.email) {
            Some(u) if u.password == session.password => {
                let tok = AuthToken(Uuid::new_v4().to_string());
                u.sessions.push(tok.clone());
                Ok(tok)
            }
            _ => Err(Error::Unauthorized),
        }
    }

    /// A client acting with `token`, as the bearer-authenticated HTTP client would
    pub fn client(&self, token: Option<AuthToken>) -> MockClient {
        MockClient {
            server: self.clone(),
            token,
        }
    }

    /// Makes the next requests fail with these errors, in order
    pub async fn fail_next(&self, errors: impl IntoIterator<Item = Error>) {
        self.0.lock().await.failures.extend(errors);
    }

    pub async fn clear_failures(&self) {
        self.0.lock().await.failures.clear();
    }

    /// Number of requests that reached the server
    pub async fn requests(&self) -> usize {
        self.0.lock().await.requests
    }

    /// Adds a comment directly, as another user would have
    pub async fn seed_comment(
        &self,
        entity: EntityRef,
        author: &str,
        content: &str,
        parent: Option<CommentId>,
    ) -> CommentId {
        let mut s = self.0.lock().await;
        s.insert_comment(entity, parent, String::from(author), String::from(content), None)
    }

    pub async fn comment_count(&self, entity: EntityRef) -> usize {
        let s = self.0.lock().await;
        s.comments.iter().filter(|c| c.entity == entity).count()
    }

    pub async fn comment_content(&self, id: CommentId) -> Option<String> {
        let s = self.0.lock().await;
        s.comments
            .iter()
            .find(|c| c.id == id)
            .map(|c| c.content.clone())
    }
}

impl State {
    fn insert_comment(
        &mut self,
        entity: EntityRef,
        parent: Option<CommentId>,
        author: String,
        content: String,
        image_url: Option<String>,
    ) -> CommentId {
        let id = CommentId(self.next_comment_id);
        self.next_comment_id += 1;
        // strictly increasing timestamps keep orderings deterministic
        self.clock = self.clock + Duration::minutes(1);
        self.comments.push(StoredComment {
            id,
            entity,
            parent,
            author,
            content,
            image_url,
            created_at: self.clock,
        });
        id
    }

    /// Common prologue of every request: injected failure, then authentication
    fn enter(&mut self, token: &Option<AuthToken>) -> Result<String, Error> {
        self.requests += 1;
        if let Some(e) = self.failures.pop_front() {
            return Err(e);
        }
        let token = token.as_ref().ok_or(Error::Unauthorized)?;
        self.users
            .values()
            .find(|u| u.sessions.contains(token))
            .map(|u| u.email.clone())
            .ok_or(Error::Unauthorized)
    }

    fn user_mut(&mut self, email: &str) -> Result<&mut DbUser, Error> {
        self.users.get_mut(email).ok_or(Error::Unauthorized)
    }

    fn render(&self, c: &StoredComment) -> Value {
        match self.shape {
            Shape::Flat | Shape::Grouped => json!({
                "id": c.id.0,
                "parentId": c.parent.map(|p| p.0),
                "authorName": c.author,
                "content": c.content,
                "imageUrl": c.image_url,
                "createdAt": c.created_at.to_rfc3339(),
            }),
            Shape::Paged => json!({
                "id": c.id.0.to_string(),
                "parent": c.parent.map(|p| json!({ "id": p.0 })),
                "user": { "name": c.author },
                "content": c.content,
                "image": c.image_url,
                "created_at": c.created_at.timestamp_millis(),
                "likes": [],
            }),
            Shape::Legacy => {
                let t = c.created_at.naive_utc();
                json!({
                    "id": c.id.0,
                    "parentCommentId": c.parent.map(|p| p.0),
                    "username": c.author,
                    "text": c.content,
                    "timestamp": [
                        chrono::Datelike::year(&t),
                        chrono::Datelike::month(&t),
                        chrono::Datelike::day(&t),
                        chrono::Timelike::hour(&t),
                        chrono::Timelike::minute(&t),
                        chrono::Timelike::second(&t),
                    ],
                })
            }
        }
    }

    fn listing(&self, entity: EntityRef) -> Value {
        let of_entity = self
            .comments
            .iter()
            .filter(|c| c.entity == entity)
            .collect::<Vec<_>>();
        match self.shape {
            Shape::Flat | Shape::Legacy => {
                Value::Array(of_entity.iter().map(|c| self.render(c)).collect())
            }
            Shape::Paged => {
                json!({ "content": of_entity.iter().map(|c| self.render(c)).collect::<Vec<_>>() })
            }
            Shape::Grouped => {
                let threads = of_entity
                    .iter()
                    .filter(|c| c.parent.is_none())
                    .map(|t| {
                        let mut v = self.render(t);
                        v["replies"] = Value::Array(
                            of_entity
                                .iter()
                                .filter(|r| r.parent == Some(t.id))
                                .map(|r| self.render(r))
                                .collect(),
                        );
                        v
                    })
                    .collect::<Vec<_>>();
                json!({ "comments": threads })
            }
        }
    }
}

pub struct MockClient {
    server: MockServer,
    token: Option<AuthToken>,
}

#[async_trait(?Send)]
impl InteractionsApi for MockClient {
    async fn list_comments(&self, entity: EntityRef) -> Result<Value, Error> {
        let mut s = self.server.0.lock().await;
        s.enter(&self.token)?;
        Ok(s.listing(entity))
    }

    async fn post_comment(&self, entity: EntityRef, comment: &NewComment) -> Result<Value, Error> {
        let mut s = self.server.0.lock().await;
        let email = s.enter(&self.token)?;
        comment.validate()?;
        if let Some(p) = comment.parent_id {
            let parent = s.comments.iter().find(|c| c.id == p && c.entity == entity);
            match parent {
                None => return Err(Error::NotFound),
                Some(c) if c.parent.is_some() => {
                    return Err(Error::Rejected {
                        status: 400,
                        message: Some(String::from("Không thể trả lời một phản hồi")),
                    })
                }
                Some(_) => (),
            }
        }
        let author = s.user_mut(&email)?.name.clone();
        let id = s.insert_comment(
            entity,
            comment.parent_id,
            author,
            comment.content.clone(),
            comment.image_url.clone(),
        );
        if s.shape == Shape::Legacy {
            return Ok(json!({ "message": "Bình luận thành công" }));
        }
        let saved = s
            .comments
            .iter()
            .find(|c| c.id == id)
            .ok_or(Error::NotFound)?;
        Ok(s.render(saved))
    }

    async fn edit_comment(&self, id: CommentId, edit: &CommentEdit) -> Result<(), Error> {
        let mut s = self.server.0.lock().await;
        let email = s.enter(&self.token)?;
        let author = s.user_mut(&email)?.name.clone();
        let c = s
            .comments
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(Error::NotFound)?;
        if c.author != author {
            return Err(forbidden());
        }
        c.content = edit.content.clone();
        Ok(())
    }

    async fn delete_comment(&self, id: CommentId) -> Result<(), Error> {
        let mut s = self.server.0.lock().await;
        let email = s.enter(&self.token)?;
        let author = s.user_mut(&email)?.name.clone();
        let c = s
            .comments
            .iter()
            .find(|c| c.id == id)
            .ok_or(Error::NotFound)?;
        if c.author != author {
            return Err(forbidden());
        }
        s.comments.retain(|c| c.id != id && c.parent != Some(id));
        Ok(())
    }

    async fn rating_summary(&self, entity: EntityRef) -> Result<RatingSummary, Error> {
        let mut s = self.server.0.lock().await;
        s.enter(&self.token)?;
        let values = s
            .users
            .values()
            .filter_map(|u| u.ratings.get(&entity))
            .map(|v| *v as f64)
            .collect::<Vec<_>>();
        Ok(RatingSummary {
            average: match values.len() {
                0 => 0.0,
                n => values.iter().sum::<f64>() / n as f64,
            },
            count: values.len() as u64,
        })
    }

    async fn my_rating(&self, entity: EntityRef) -> Result<Option<Rating>, Error> {
        let mut s = self.server.0.lock().await;
        let email = s.enter(&self.token)?;
        Ok(s
            .user_mut(&email)?
            .ratings
            .get(&entity)
            .map(|v| Rating { rating_value: *v }))
    }

    async fn create_rating(&self, entity: EntityRef, rating: NewRating) -> Result<(), Error> {
        let mut s = self.server.0.lock().await;
        let email = s.enter(&self.token)?;
        let u = s.user_mut(&email)?;
        if u.ratings.contains_key(&entity) {
            return Err(Error::Rejected {
                status: 409,
                message: Some(String::from("Bạn đã đánh giá nội dung này")),
            });
        }
        u.ratings.insert(entity, rating.rating_value);
        Ok(())
    }

    async fn update_rating(&self, entity: EntityRef, rating: NewRating) -> Result<(), Error> {
        let mut s = self.server.0.lock().await;
        let email = s.enter(&self.token)?;
        let slot = s
            .user_mut(&email)?
            .ratings
            .get_mut(&entity)
            .ok_or(Error::NotFound)?;
        *slot = rating.rating_value;
        Ok(())
    }

    async fn delete_rating(&self, entity: EntityRef) -> Result<(), Error> {
        let mut s = self.server.0.lock().await;
        let email = s.enter(&self.token)?;
        s.user_mut(&email)?
            .ratings
            .remove(&entity)
            .map(|_| ())
            .ok_or(Error::NotFound)
    }
}

fn forbidden() -> Error {
    Error::Rejected {
        status: 403,
        message: Some(String::from("Bạn không có quyền thực hiện thao tác này")),
    }
}
