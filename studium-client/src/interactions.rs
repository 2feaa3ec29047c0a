use async_trait::async_trait;
use serde_json::Value;

use crate::api::{
    CommentEdit, CommentId, EntityRef, Error, NewComment, NewRating, Rating, RatingSummary,
};

/// Comment and rating endpoints shared by every entity type
///
/// Listing and creation hand back the raw payload: turning it into canonical
/// comments is the job of [`crate::normalize`], not of the transport.
#[async_trait(?Send)]
pub trait InteractionsApi {
    async fn list_comments(&self, entity: EntityRef) -> Result<Value, Error>;
    async fn post_comment(&self, entity: EntityRef, comment: &NewComment) -> Result<Value, Error>;
    async fn edit_comment(&self, id: CommentId, edit: &CommentEdit) -> Result<(), Error>;
    async fn delete_comment(&self, id: CommentId) -> Result<(), Error>;

    async fn rating_summary(&self, entity: EntityRef) -> Result<RatingSummary, Error>;
    async fn my_rating(&self, entity: EntityRef) -> Result<Option<Rating>, Error>;
    async fn create_rating(&self, entity: EntityRef, rating: NewRating) -> Result<(), Error>;
    async fn update_rating(&self, entity: EntityRef, rating: NewRating) -> Result<(), Error>;
    async fn delete_rating(&self, entity: EntityRef) -> Result<(), Error>;
}
