use std::future::Future;

use studium_client::RequestScope;
use yew::prelude::*;

mod app;
pub use app::{services, App, AppMsg, Services, View};

mod comment_section;
pub use comment_section::CommentSection;

mod detail;
pub use detail::Detail;

mod flashcard_deck;
pub use flashcard_deck::FlashcardDeck;

mod generation_wizard;
pub use generation_wizard::GenerationWizard;

mod login;
pub use login::Login;

mod otp_form;
pub use otp_form::{OtpForm, OtpPurpose};

mod quiz_player;
pub use quiz_player::QuizPlayer;

mod rating_stars;
pub use rating_stars::RatingStars;

mod set_list;
pub use set_list::SetList;

mod toast_area;
pub use toast_area::ToastArea;

/// Runs `fut` and delivers its message, unless `scope` was dropped in the meantime
pub fn spawn_scoped<C, F>(ctx: &Context<C>, scope: &mut RequestScope, fut: F)
where
    C: Component,
    F: Future<Output = C::Message> + 'static,
{
    let fut = scope.wrap(fut);
    ctx.link()
        .send_future_batch(async move { fut.await.into_iter().collect::<Vec<_>>() });
}
