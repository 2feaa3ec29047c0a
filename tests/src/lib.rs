#![cfg(test)]

use std::panic::AssertUnwindSafe;

use studium_client::{
    api::{
        AuthToken, CommentKey, EntityRef, EntityType, Error, NewAccount, NewComment, NewSession,
    },
    apply_rating, CommentSection, InteractionsApi, Notice, RatingWidget,
};
use studium_mock_server::{MockClient, MockServer, Shape};

const SHAPES: [Shape; 4] = [Shape::Flat, Shape::Grouped, Shape::Paged, Shape::Legacy];

macro_rules! do_tokio_test {
    ( $name:ident, $typ:ty, $fn:expr ) => {
        #[test]
        fn $name() {
            let runtime = AssertUnwindSafe(
                tokio::runtime::Builder::new_current_thread()
                    .enable_all()
                    .build()
                    .expect("failed initializing tokio runtime"),
            );
            bolero::check!()
                .with_type::<$typ>()
                .cloned()
                .for_each(move |v| {
                    let () = runtime.block_on($fn(v));
                })
        }
    };
}

fn blog() -> EntityRef {
    EntityRef::new(EntityType::Blog, 1)
}

/// Logs in as `name`, registering it first if needed
async fn login(server: &MockServer, name: &str) -> AuthToken {
    let email = format!("{name}@example.org");
    let _ = server
        .create_user(NewAccount {
            username: String::from(name),
            email: email.clone(),
            password: String::from("hunter22"),
        })
        .await;
    server
        .auth(NewSession {
            email,
            password: String::from("hunter22"),
        })
        .await
        .expect("logging in")
}

async fn section(server: &MockServer, name: &str) -> CommentSection<MockClient> {
    let token = login(server, name).await;
    let mut s = CommentSection::new(server.client(Some(token)), blog());
    s.refresh().await.expect("initial refresh");
    s
}

fn text(content: &str) -> NewComment {
    NewComment {
        content: String::from(content),
        image_url: None,
        parent_id: None,
    }
}

/// What a freshly loaded page would show
async fn reloaded(server: &MockServer) -> Vec<studium_client::api::Comment> {
    let mut s = CommentSection::new(server.client(Some(login(server, "observer").await)), blog());
    s.refresh().await.expect("reloading comments");
    s.feed().threads().to_vec()
}

#[tokio::test]
async fn listings_of_every_shape_reconstruct_the_same_tree() {
    for shape in SHAPES {
        let server = MockServer::new(shape);
        let first = server.seed_comment(blog(), "an", "first", None).await;
        let second = server.seed_comment(blog(), "bình", "second", None).await;
        server.seed_comment(blog(), "chi", "reply a", Some(first)).await;
        server.seed_comment(blog(), "an", "reply b", Some(first)).await;

        let s = section(&server, "me").await;
        let threads = s.feed().threads();
        assert_eq!(threads.len(), 2, "{shape:?}");
        assert_eq!(threads[0].id(), Some(second), "{shape:?}: newest first");
        assert_eq!(threads[1].author_name, "an", "{shape:?}");
        let replies = threads[1]
            .replies
            .iter()
            .map(|r| r.content.as_str())
            .collect::<Vec<_>>();
        assert_eq!(replies, ["reply a", "reply b"], "{shape:?}: oldest reply first");
        assert!(threads[1].replies.iter().all(|r| r.parent_id == Some(first)));
    }
}

#[tokio::test]
async fn submitted_comments_are_confirmed_in_place() {
    for shape in SHAPES {
        let server = MockServer::new(shape);
        let root = server.seed_comment(blog(), "an", "hello", None).await;
        let mut s = section(&server, "me").await;

        s.submit(text("top level"), "me").await.expect("submitting");
        let mut reply = text("an answer");
        reply.parent_id = Some(root);
        s.submit(reply, "me").await.expect("replying");

        let threads = s.feed().threads();
        assert_eq!(threads[0].content, "top level", "{shape:?}");
        assert!(!threads[0].key.is_pending(), "{shape:?}");
        assert_eq!(threads[1].replies.len(), 1, "{shape:?}");
        assert!(!threads[1].replies[0].key.is_pending(), "{shape:?}");
        assert_eq!(s.feed().threads(), reloaded(&server).await, "{shape:?}");
    }
}

#[tokio::test]
async fn failed_submission_leaves_nothing_behind() {
    let server = MockServer::new(Shape::Flat);
    for i in 0..10 {
        server.seed_comment(blog(), "an", &format!("old {i}"), None).await;
    }
    let mut s = section(&server, "me").await;
    let before = s.feed().clone();
    assert_eq!(before.visible().len(), 6);

    for _ in 0..3 {
        server
            .fail_next([Error::Network(String::from("connection reset"))])
            .await;
        let notice = s.submit(text("lost"), "me").await.unwrap_err();
        assert!(!notice.0.is_empty());
        assert_eq!(s.feed(), &before);
        assert_eq!(s.feed().visible().len(), 6);
    }
    assert!(!s.is_submitting());
    assert_eq!(server.comment_count(blog()).await, 10);

    s.feed_mut().show_more();
    assert_eq!(s.feed().visible().len(), 10);
}

#[tokio::test]
async fn replying_to_a_missing_parent_sends_nothing() {
    let server = MockServer::new(Shape::Grouped);
    let mut s = section(&server, "me").await;
    let before = server.requests().await;
    let mut reply = text("to nobody");
    reply.parent_id = Some(studium_client::api::CommentId(404));
    assert!(s.submit(reply, "me").await.is_err());
    assert_eq!(server.requests().await, before);
}

#[tokio::test]
async fn refused_delete_is_rolled_back() {
    let server = MockServer::new(Shape::Paged);
    let theirs = server.seed_comment(blog(), "an", "not yours", None).await;
    server.seed_comment(blog(), "chi", "reply", Some(theirs)).await;
    let mut s = section(&server, "me").await;
    let before = s.feed().threads().to_vec();

    let notice = s.delete(CommentKey::Saved(theirs)).await.unwrap_err();
    assert!(notice.0.contains("quyền"));
    assert_eq!(s.feed().threads(), before);
}

#[tokio::test]
async fn own_thread_deletion_removes_its_replies() {
    let server = MockServer::new(Shape::Flat);
    let mut s = section(&server, "me").await;
    s.submit(text("mine"), "me").await.unwrap();
    let key = s.feed().threads()[0].key;
    let mut reply = text("reply");
    reply.parent_id = key.saved();
    s.submit(reply, "me").await.unwrap();

    s.delete(key).await.unwrap();
    assert!(s.feed().threads().is_empty());
    assert_eq!(server.comment_count(blog()).await, 0);
}

#[tokio::test]
async fn failed_edit_restores_previous_content() {
    let server = MockServer::new(Shape::Flat);
    let mut s = section(&server, "me").await;
    s.submit(text("draft"), "me").await.unwrap();
    let key = s.feed().threads()[0].key;

    s.edit(key, String::from("final")).await.unwrap();
    assert_eq!(s.feed().threads()[0].content, "final");
    assert_eq!(
        server.comment_content(key.saved().unwrap()).await.as_deref(),
        Some("final")
    );

    server.fail_next([Error::NotFound]).await;
    assert!(s.edit(key, String::from("lost")).await.is_err());
    assert_eq!(s.feed().threads()[0].content, "final");
}

#[tokio::test]
async fn pending_comments_cannot_be_edited_or_deleted() {
    let server = MockServer::new(Shape::Flat);
    let mut s = section(&server, "me").await;
    let pending = s
        .feed_mut()
        .add_pending(&text("in flight"), "me", chrono::Utc::now())
        .unwrap();
    let before = server.requests().await;
    assert!(s.delete(pending).await.is_err());
    assert!(s.edit(pending, String::from("x")).await.is_err());
    assert_eq!(server.requests().await, before);
    assert_eq!(s.feed().total(), 1);
}

#[tokio::test]
async fn unauthenticated_requests_are_refused() {
    let server = MockServer::new(Shape::Flat);
    let mut s = CommentSection::new(server.client(None), blog());
    let notice = s.refresh().await.unwrap_err();
    assert_eq!(notice, Notice::from(Error::Unauthorized));

    let forged = server.client(Some(AuthToken(String::from("forged"))));
    assert_eq!(
        forged.list_comments(blog()).await.unwrap_err(),
        Error::Unauthorized
    );
}

#[tokio::test]
async fn rating_lifecycle() {
    let server = MockServer::new(Shape::Flat);
    let api = server.client(Some(login(&server, "me").await));
    let other = server.client(Some(login(&server, "an").await));

    let mut widget = RatingWidget::new(api.my_rating(blog()).await.unwrap().map(|r| r.rating_value));
    let change = widget.select(4).unwrap();
    widget.settle(apply_rating(&api, blog(), change).await.is_ok());
    assert_eq!(widget.shown(), Some(4));

    let change = widget.select(2).unwrap();
    widget.settle(apply_rating(&api, blog(), change).await.is_ok());
    let mut theirs = RatingWidget::new(None);
    let change = theirs.select(5).unwrap();
    theirs.settle(apply_rating(&other, blog(), change).await.is_ok());

    let summary = api.rating_summary(blog()).await.unwrap();
    assert_eq!(summary.count, 2);
    assert_eq!(summary.average, 3.5);

    server.fail_next([Error::Network(String::from("timeout"))]).await;
    let change = widget.clear().unwrap();
    widget.settle(apply_rating(&api, blog(), change).await.is_ok());
    assert_eq!(widget.shown(), Some(2), "rolled back");

    let change = widget.clear().unwrap();
    widget.settle(apply_rating(&api, blog(), change).await.is_ok());
    assert_eq!(widget.shown(), None);
    assert_eq!(api.my_rating(blog()).await.unwrap(), None);
}

#[tokio::test]
async fn stale_rating_state_is_reported() {
    let server = MockServer::new(Shape::Flat);
    let api = server.client(Some(login(&server, "me").await));
    let mut widget = RatingWidget::new(None);
    let change = widget.select(3).unwrap();
    apply_rating(&api, blog(), change).await.unwrap();

    // a second tab still believes nothing was rated
    let mut stale = RatingWidget::new(None);
    let change = stale.select(1).unwrap();
    let err = apply_rating(&api, blog(), change).await.unwrap_err();
    assert!(matches!(err, Error::Rejected { status: 409, .. }));
    stale.settle(false);
    assert_eq!(stale.shown(), None);
}

mod fuzz {
    use super::*;

    const WORDS: [&str; 4] = ["xin chào", "hay quá", "cảm ơn", "?"];

    #[derive(Clone, Debug, bolero::generator::TypeGenerator)]
    enum Action {
        Submit { word: u8, reply_to: Option<u8> },
        Edit { target: u8, word: u8 },
        Delete { target: u8 },
        Seed { reply_to: Option<u8> },
        Refresh,
    }

    #[derive(Clone, Debug, bolero::generator::TypeGenerator)]
    struct Step {
        shape: u8,
        action: Action,
        fail: bool,
    }

    fn keys(s: &CommentSection<MockClient>) -> Vec<CommentKey> {
        s.feed()
            .threads()
            .iter()
            .flat_map(|t| std::iter::once(t.key).chain(t.replies.iter().map(|r| r.key)))
            .collect()
    }

    fn pick(keys: &[CommentKey], i: u8) -> Option<CommentKey> {
        match keys.len() {
            0 => None,
            n => Some(keys[i as usize % n]),
        }
    }

    async fn run(steps: Vec<Step>) {
        let server = MockServer::new(Shape::Flat);
        let mut s = section(&server, "me").await;
        for step in steps {
            server
                .set_shape(SHAPES[step.shape as usize % SHAPES.len()])
                .await;
            if step.fail {
                server
                    .fail_next([Error::Rejected {
                        status: 500,
                        message: None,
                    }])
                    .await;
            }
            let keys = keys(&s);
            match step.action {
                Action::Submit { word, reply_to } => {
                    let mut new = text(WORDS[word as usize % WORDS.len()]);
                    new.parent_id = reply_to.and_then(|i| pick(&keys, i)).and_then(|k| k.saved());
                    let _ = s.submit(new, "me").await;
                }
                Action::Edit { target, word } => {
                    if let Some(k) = pick(&keys, target) {
                        let _ = s.edit(k, String::from(WORDS[word as usize % WORDS.len()])).await;
                    }
                }
                Action::Delete { target } => {
                    if let Some(k) = pick(&keys, target) {
                        let _ = s.delete(k).await;
                    }
                }
                Action::Seed { reply_to } => {
                    // someone else comments meanwhile; invisible until the next refresh
                    let parent = reply_to
                        .and_then(|i| pick(&keys, i))
                        .and_then(|k| s.feed().find(k))
                        .filter(|c| !c.is_reply())
                        .and_then(|c| c.id());
                    server.seed_comment(blog(), "an", "meanwhile", parent).await;
                    server.clear_failures().await;
                    s.refresh().await.expect("refreshing");
                }
                Action::Refresh => {
                    let _ = s.refresh().await;
                }
            }
            server.clear_failures().await;
            assert!(!s.is_submitting());
            assert!(keys_of_feed_are_saved(&s));
            assert_eq!(s.feed().threads(), reloaded(&server).await);
        }
    }

    fn keys_of_feed_are_saved(s: &CommentSection<MockClient>) -> bool {
        keys(s).iter().all(|k| !k.is_pending())
    }

    do_tokio_test!(section_mirrors_server, Vec<Step>, run);
}
