use chrono::Utc;

pub use uuid::Uuid;
pub type Time = chrono::DateTime<Utc>;

mod auth;
pub use auth::{AuthToken, NewAccount, NewSession, OtpRequest, OtpVerification, PasswordReset};

mod comment;
pub use comment::{Comment, CommentEdit, CommentId, CommentKey, NewComment};

mod entity;
pub use entity::{EntityRef, EntityType};

mod error;
pub use error::Error;

mod page;
pub use page::{ListQuery, Page, SortOrder, DEFAULT_PAGE_SIZE};

mod rating;
pub use rating::{NewRating, Rating, RatingSummary, MAX_RATING};

mod study;
pub use study::{Answer, BlogPost, Flashcard, FlashcardSet, Question, QuizSet, Resource, StudySet};

mod upload;
pub use upload::UploadedImage;

pub fn validate_string(s: &str) -> Result<(), Error> {
    if s.contains('\0') {
        return Err(Error::Invalid(String::from("null byte in string")));
    }
    Ok(())
}
