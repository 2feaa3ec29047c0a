use studium_client::api::Flashcard;
use yew::prelude::*;

#[derive(Clone, PartialEq, Properties)]
pub struct FlashcardDeckProps {
    pub cards: Vec<Flashcard>,
}

#[function_component(FlashcardDeck)]
pub fn flashcard_deck(p: &FlashcardDeckProps) -> Html {
    let index = use_state(|| 0usize);
    let flipped = use_state(|| false);
    let card = match p.cards.get(*index) {
        Some(c) => c,
        None => return html! { <p class="text-muted">{ "Bộ thẻ này chưa có thẻ nào" }</p> },
    };
    let go = |to: usize| {
        let index = index.clone();
        let flipped = flipped.clone();
        Callback::from(move |_| {
            index.set(to);
            flipped.set(false);
        })
    };
    let flip = {
        let flipped = flipped.clone();
        Callback::from(move |_| flipped.set(!*flipped))
    };
    html! {
        <div class="flashcard-deck my-3">
            <div class="card text-center flashcard" role="button" onclick={ flip }>
                <div class="card-body fs-4 py-5">
                    { if *flipped { &card.back } else { &card.front } }
                </div>
            </div>
            <div class="d-flex justify-content-between align-items-center mt-2">
                <button class="btn btn-outline-secondary" disabled={ *index == 0 }
                    onclick={ go(index.saturating_sub(1)) }>
                    { "Trước" }
                </button>
                <span>{ format!("{}/{}", *index + 1, p.cards.len()) }</span>
                <button class="btn btn-outline-secondary" disabled={ *index + 1 >= p.cards.len() }
                    onclick={ go((*index + 1).min(p.cards.len() - 1)) }>
                    { "Sau" }
                </button>
            </div>
        </div>
    }
}
