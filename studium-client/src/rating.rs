use crate::{
    api::{EntityRef, Error, NewRating, MAX_RATING},
    InteractionsApi,
};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RatingChange {
    Create(NewRating),
    Update(NewRating),
    Delete,
}

/// Star rating that shows the user's choice before the server agrees with it
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct RatingWidget {
    saved: Option<u8>,
    shown: Option<u8>,
    is_saving: bool,
}

impl RatingWidget {
    pub fn new(saved: Option<u8>) -> RatingWidget {
        RatingWidget {
            saved,
            shown: saved,
            is_saving: false,
        }
    }

    pub fn shown(&self) -> Option<u8> {
        self.shown
    }

    pub fn is_saving(&self) -> bool {
        self.is_saving
    }

    pub fn stars(&self) -> impl Iterator<Item = (u8, bool)> {
        let shown = self.shown.unwrap_or(0);
        (1..=MAX_RATING).map(move |s| (s, s <= shown))
    }

    /// Picks a value, returning the request to send if anything changed
    pub fn select(&mut self, value: u8) -> Option<RatingChange> {
        if self.is_saving || self.shown == Some(value) {
            return None;
        }
        let rating = NewRating::new(value).ok()?;
        self.shown = Some(value);
        self.is_saving = true;
        Some(match self.saved {
            None => RatingChange::Create(rating),
            Some(_) => RatingChange::Update(rating),
        })
    }

    pub fn clear(&mut self) -> Option<RatingChange> {
        if self.is_saving || self.saved.is_none() {
            return None;
        }
        self.shown = None;
        self.is_saving = true;
        Some(RatingChange::Delete)
    }

    /// Records the outcome of the request, rolling back on failure
    pub fn settle(&mut self, succeeded: bool) {
        match succeeded {
            true => self.saved = self.shown,
            false => self.shown = self.saved,
        }
        self.is_saving = false;
    }
}

pub async fn apply_rating<A: InteractionsApi + ?Sized>(
    api: &A,
    entity: EntityRef,
    change: RatingChange,
) -> Result<(), Error> {
    match change {
        RatingChange::Create(r) => api.create_rating(entity, r).await,
        RatingChange::Update(r) => api.update_rating(entity, r).await,
        RatingChange::Delete => api.delete_rating(entity).await,
    }
}
