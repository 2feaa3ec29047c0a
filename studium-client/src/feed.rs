use serde_json::Value;
use uuid::Uuid;

use crate::{
    api::{Comment, CommentId, CommentKey, Error, NewComment, Time},
    normalize, tree, Notice, Pager,
};

pub const BUSY_MESSAGE: &str = "Đang gửi bình luận, vui lòng đợi";
const PENDING_MESSAGE: &str = "Bình luận đang được gửi";
const MISSING_MESSAGE: &str = "Bình luận không còn tồn tại";

/// Where a removed comment used to be, so the removal can be rolled back
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Removal {
    Thread {
        index: usize,
        comment: Comment,
        /// The thread was inserted locally and counted in the reveal state
        inserted: bool,
    },
    Reply {
        parent: CommentKey,
        index: usize,
        comment: Comment,
    },
}

impl Removal {
    pub fn comment(&self) -> &Comment {
        match self {
            Removal::Thread { comment, .. } | Removal::Reply { comment, .. } => comment,
        }
    }
}

/// What happened to a pending comment once the server answered
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Settled {
    Confirmed,
    /// Saved, but the answer was unreadable: the list must be fetched again
    NeedsRefresh,
}

/// The reconstructed comment list of one entity, with its reveal state
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct CommentFeed {
    threads: Vec<Comment>,
    pager: Pager,
    // top-level threads added since the last refresh, each counted once in `pager`
    inserted: Vec<CommentKey>,
}

impl CommentFeed {
    pub fn new(pager: Pager) -> CommentFeed {
        CommentFeed {
            threads: Vec::new(),
            pager,
            inserted: Vec::new(),
        }
    }

    /// Replaces the whole list with a freshly fetched payload
    pub fn replace(&mut self, payload: &Value, now: Time) {
        self.threads = tree::build_tree(payload, now);
        self.pager.reset();
        self.inserted.clear();
    }

    pub fn threads(&self) -> &[Comment] {
        &self.threads
    }

    pub fn visible(&self) -> &[Comment] {
        &self.threads[..self.pager.visible(self.threads.len())]
    }

    pub fn total(&self) -> usize {
        self.threads.len()
    }

    pub fn has_more(&self) -> bool {
        self.pager.has_more(self.threads.len())
    }

    pub fn show_more(&mut self) {
        self.pager.show_more(self.threads.len());
    }

    pub fn find(&self, key: CommentKey) -> Option<&Comment> {
        self.threads.iter().find_map(|t| {
            if t.key == key {
                Some(t)
            } else {
                t.replies.iter().find(|r| r.key == key)
            }
        })
    }

    fn find_mut(&mut self, key: CommentKey) -> Option<&mut Comment> {
        for t in self.threads.iter_mut() {
            if t.key == key {
                return Some(t);
            }
            if let Some(r) = t.replies.iter_mut().find(|r| r.key == key) {
                return Some(r);
            }
        }
        None
    }

    /// Inserts an optimistic entry for a comment being submitted
    ///
    /// Returns `None` if the comment answers a parent that is not in the list.
    pub fn add_pending(&mut self, new: &NewComment, author: &str, now: Time) -> Option<CommentKey> {
        let key = CommentKey::Pending(Uuid::new_v4());
        let comment = Comment {
            key,
            parent_id: new.parent_id,
            content: new.content.clone(),
            author_name: String::from(author),
            author_avatar: None,
            image_url: new.image_url.clone(),
            created_at: now,
            like_count: 0,
            replies: Vec::new(),
        };
        match new.parent_id {
            None => {
                self.threads.insert(0, comment);
                self.pager.grow(1);
                self.inserted.push(key);
            }
            Some(parent) => {
                let parent = self
                    .threads
                    .iter_mut()
                    .find(|t| t.id() == Some(parent))?;
                parent.replies.push(comment);
            }
        }
        Some(key)
    }

    /// Swaps a pending entry for the comment the server saved
    pub fn confirm(&mut self, pending: CommentKey, mut saved: Comment) -> bool {
        let key = saved.key;
        match self.find_mut(pending) {
            Some(c) => {
                saved.parent_id = c.parent_id;
                saved.replies = std::mem::take(&mut c.replies);
                *c = saved;
            }
            None => return false,
        }
        if let Some(k) = self.inserted.iter_mut().find(|k| **k == pending) {
            *k = key;
        }
        true
    }

    /// Drops a pending entry whose submission failed
    pub fn discard(&mut self, pending: CommentKey) -> bool {
        debug_assert!(pending.is_pending());
        self.remove(pending).is_some()
    }

    /// Removes a comment (and its replies) from the list
    pub fn remove(&mut self, key: CommentKey) -> Option<Removal> {
        if let Some(index) = self.threads.iter().position(|t| t.key == key) {
            let comment = self.threads.remove(index);
            let inserted = match self.inserted.iter().position(|k| *k == key) {
                Some(i) => {
                    self.inserted.remove(i);
                    self.pager.shrink(1);
                    true
                }
                None => false,
            };
            return Some(Removal::Thread {
                index,
                comment,
                inserted,
            });
        }
        for t in self.threads.iter_mut() {
            if let Some(index) = t.replies.iter().position(|r| r.key == key) {
                let comment = t.replies.remove(index);
                return Some(Removal::Reply {
                    parent: t.key,
                    index,
                    comment,
                });
            }
        }
        None
    }

    /// Puts a removed comment back where it was
    pub fn restore(&mut self, removal: Removal) {
        match removal {
            Removal::Thread {
                index,
                comment,
                inserted,
            } => {
                if inserted {
                    self.pager.grow(1);
                    self.inserted.push(comment.key);
                }
                let index = index.min(self.threads.len());
                self.threads.insert(index, comment);
            }
            Removal::Reply {
                parent,
                index,
                comment,
            } => match self.threads.iter_mut().find(|t| t.key == parent) {
                Some(t) => {
                    let index = index.min(t.replies.len());
                    t.replies.insert(index, comment);
                }
                None => tracing::warn!(?parent, "cannot restore reply, parent is gone"),
            },
        }
    }

    /// Changes a comment's content, returning the previous one
    pub fn edit(&mut self, key: CommentKey, content: String) -> Option<String> {
        self.find_mut(key)
            .map(|c| std::mem::replace(&mut c.content, content))
    }

    /// Validates a new comment and shows it right away
    pub fn begin_submit(
        &mut self,
        new: &NewComment,
        author: &str,
        now: Time,
    ) -> Result<CommentKey, Notice> {
        new.validate()?;
        self.add_pending(new, author, now)
            .ok_or_else(|| Notice(String::from(MISSING_MESSAGE)))
    }

    /// Applies the server's answer to a submission started with `begin_submit`
    pub fn settle_submit(
        &mut self,
        pending: CommentKey,
        res: Result<Value, Error>,
        now: Time,
    ) -> Result<Settled, Notice> {
        match res {
            Ok(saved) => match normalize::normalize_comment(&saved, now) {
                Some(saved) => {
                    self.confirm(pending, saved);
                    Ok(Settled::Confirmed)
                }
                None => {
                    tracing::debug!(?saved, "resyncing after unreadable comment creation response");
                    self.discard(pending);
                    Ok(Settled::NeedsRefresh)
                }
            },
            Err(e) => {
                tracing::warn!(err = %e, "failed submitting comment");
                self.discard(pending);
                Err(e.into())
            }
        }
    }

    /// Edits a saved comment locally, returning its id and previous content
    pub fn begin_edit(
        &mut self,
        key: CommentKey,
        content: String,
    ) -> Result<(CommentId, String), Notice> {
        let id = key
            .saved()
            .ok_or_else(|| Notice(String::from(PENDING_MESSAGE)))?;
        let previous = self
            .edit(key, content)
            .ok_or_else(|| Notice(String::from(MISSING_MESSAGE)))?;
        Ok((id, previous))
    }

    pub fn settle_edit(
        &mut self,
        key: CommentKey,
        previous: String,
        res: Result<(), Error>,
    ) -> Result<(), Notice> {
        res.map_err(|e| {
            tracing::warn!(?key, err = %e, "failed editing comment");
            self.edit(key, previous);
            Notice::from(e)
        })
    }

    /// Removes a saved comment locally, returning what is needed to undo it
    pub fn begin_delete(&mut self, key: CommentKey) -> Result<(CommentId, Removal), Notice> {
        let id = key
            .saved()
            .ok_or_else(|| Notice(String::from(PENDING_MESSAGE)))?;
        let removal = self
            .remove(key)
            .ok_or_else(|| Notice(String::from(MISSING_MESSAGE)))?;
        Ok((id, removal))
    }

    pub fn settle_delete(&mut self, removal: Removal, res: Result<(), Error>) -> Result<(), Notice> {
        res.map_err(|e| {
            tracing::warn!(key = ?removal.comment().key, err = %e, "failed deleting comment");
            self.restore(removal);
            Notice::from(e)
        })
    }
}
