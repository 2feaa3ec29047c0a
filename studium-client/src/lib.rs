mod countdown;
pub use countdown::{Countdown, CountdownState, OTP_RESEND_SECS};

mod feed;
pub use feed::{CommentFeed, Removal, Settled, BUSY_MESSAGE};

mod http;
pub use http::{ApiClient, ImageHost};

mod interactions;
pub use interactions::InteractionsApi;

pub mod normalize;

mod otp;
pub use otp::{OtpInput, OTP_LENGTH};

mod pager;
pub use pager::{Pager, COMMENT_PAGE_SIZE};

mod quiz;
pub use quiz::{QuizAttempt, Score};

mod rating;
pub use rating::{apply_rating, RatingChange, RatingWidget};

mod scope;
pub use scope::RequestScope;

mod section;
pub use section::CommentSection;

mod settings;
pub use settings::{KvStore, MemoryStore, Settings};

mod toast;
pub use toast::{Notice, Toast, ToastKind, Toasts, TOAST_LIFETIME_SECS};

mod tree;
pub use tree::{build_tree, sort_threads};

mod wizard;
pub use wizard::{
    Attachment, GenerationInput, GenerationRequest, GenerationSource, SourceTab, MAX_IMAGES,
    MAX_ITEM_COUNT,
};

pub mod api {
    pub use studium_api::*;
}
