use studium_client::{
    api::{BlogPost, EntityRef, EntityType, Error, FlashcardSet, QuizSet},
    RequestScope,
};
use yew::prelude::*;

use crate::ui;

#[derive(Clone, PartialEq, Properties)]
pub struct DetailProps {
    pub entity: EntityRef,
}

pub enum Loaded {
    Blog(BlogPost),
    Flashcards(FlashcardSet),
    Quiz(QuizSet),
}

pub enum DetailMsg {
    Loaded(Result<Loaded, Error>),
}

/// One blog post, flashcard set or quiz, with its rating and comments
pub struct Detail {
    loaded: Option<Loaded>,
    failed: bool,
    scope: RequestScope,
}

impl Detail {
    fn load(&mut self, ctx: &Context<Self>) {
        self.scope.cancel_all();
        self.loaded = None;
        self.failed = false;
        let client = ui::services(ctx).client;
        let entity = ctx.props().entity;
        ui::spawn_scoped(ctx, &mut self.scope, async move {
            DetailMsg::Loaded(match entity.kind {
                EntityType::Blog => client.get(entity.id).await.map(Loaded::Blog),
                EntityType::FlashcardSet => client.get(entity.id).await.map(Loaded::Flashcards),
                EntityType::QuizSet => client.get(entity.id).await.map(Loaded::Quiz),
            })
        });
    }
}

impl Component for Detail {
    type Message = DetailMsg;
    type Properties = DetailProps;

    fn create(ctx: &Context<Self>) -> Self {
        let mut this = Self {
            loaded: None,
            failed: false,
            scope: RequestScope::new(),
        };
        this.load(ctx);
        this
    }

    fn changed(&mut self, ctx: &Context<Self>, old_props: &Self::Properties) -> bool {
        if ctx.props().entity != old_props.entity {
            self.load(ctx);
        }
        true
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            DetailMsg::Loaded(Ok(l)) => self.loaded = Some(l),
            DetailMsg::Loaded(Err(e)) => {
                tracing::warn!(entity = %ctx.props().entity, err = %e, "failed loading entity");
                self.failed = true;
                ui::services(ctx).error(e.into());
            }
        }
        true
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let entity = ctx.props().entity;
        let content = match &self.loaded {
            None if self.failed => return html! {
                <p class="text-muted my-4">{ "Không tải được nội dung" }</p>
            },
            None => return html! { <div class="spinner-border my-4" role="status"></div> },
            Some(Loaded::Blog(b)) => html! {<>
                <h1>{ &b.title }</h1>
                if let Some(author) = &b.author_name {
                    <p class="text-muted">{ author }</p>
                }
                <div class="blog-content">{ &b.content }</div>
            </>},
            Some(Loaded::Flashcards(set)) => html! {<>
                <h1>{ &set.title }</h1>
                <p class="text-muted">{ &set.description }</p>
                <ui::FlashcardDeck cards={ set.cards.clone() } />
            </>},
            Some(Loaded::Quiz(quiz)) => html! {<>
                <h1>{ &quiz.title }</h1>
                <p class="text-muted">{ &quiz.description }</p>
                <ui::QuizPlayer quiz={ quiz.clone() } />
            </>},
        };
        html! {
            <article class="my-3">
                { content }
                <ui::RatingStars { entity } />
                <ui::CommentSection { entity } />
            </article>
        }
    }
}
