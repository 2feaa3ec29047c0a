use chrono::Utc;

use crate::{
    api::{CommentEdit, CommentKey, EntityRef, NewComment},
    feed::{Settled, BUSY_MESSAGE},
    CommentFeed, InteractionsApi, Notice,
};

/// The comment list of one entity, kept in sync with the server
///
/// Every operation that fails leaves the list as it was before the call.
pub struct CommentSection<A> {
    api: A,
    entity: EntityRef,
    feed: CommentFeed,
    is_submitting: bool,
}

impl<A: InteractionsApi> CommentSection<A> {
    pub fn new(api: A, entity: EntityRef) -> CommentSection<A> {
        CommentSection {
            api,
            entity,
            feed: CommentFeed::default(),
            is_submitting: false,
        }
    }

    pub fn entity(&self) -> EntityRef {
        self.entity
    }

    pub fn feed(&self) -> &CommentFeed {
        &self.feed
    }

    pub fn feed_mut(&mut self) -> &mut CommentFeed {
        &mut self.feed
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn is_submitting(&self) -> bool {
        self.is_submitting
    }

    pub async fn refresh(&mut self) -> Result<(), Notice> {
        match self.api.list_comments(self.entity).await {
            Ok(payload) => {
                self.feed.replace(&payload, Utc::now());
                Ok(())
            }
            Err(e) => {
                tracing::warn!(entity = %self.entity, err = %e, "failed fetching comments");
                Err(e.into())
            }
        }
    }

    /// Submits a comment, showing it immediately and confirming it once saved
    pub async fn submit(&mut self, new: NewComment, author: &str) -> Result<(), Notice> {
        if self.is_submitting {
            return Err(Notice(String::from(BUSY_MESSAGE)));
        }
        let pending = self.feed.begin_submit(&new, author, Utc::now())?;

        self.is_submitting = true;
        let res = self.api.post_comment(self.entity, &new).await;
        self.is_submitting = false;

        match self.feed.settle_submit(pending, res, Utc::now())? {
            Settled::Confirmed => Ok(()),
            Settled::NeedsRefresh => self.refresh().await,
        }
    }

    pub async fn edit(&mut self, key: CommentKey, content: String) -> Result<(), Notice> {
        let edit = CommentEdit {
            content: content.clone(),
        };
        let (id, previous) = self.feed.begin_edit(key, content)?;
        let res = self.api.edit_comment(id, &edit).await;
        self.feed.settle_edit(key, previous, res)
    }

    /// Removes a comment locally right away, putting it back if the server refuses
    pub async fn delete(&mut self, key: CommentKey) -> Result<(), Notice> {
        let (id, removal) = self.feed.begin_delete(key)?;
        let res = self.api.delete_comment(id).await;
        self.feed.settle_delete(removal, res)
    }
}
