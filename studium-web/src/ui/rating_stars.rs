use studium_client::{
    api::{EntityRef, Error, Rating, RatingSummary},
    apply_rating, InteractionsApi, RatingChange, RatingWidget, RequestScope,
};
use yew::prelude::*;

use crate::ui;

#[derive(Clone, PartialEq, Properties)]
pub struct RatingStarsProps {
    pub entity: EntityRef,
}

pub enum RatingMsg {
    Loaded(Result<(RatingSummary, Option<Rating>), Error>),
    SummaryLoaded(Result<RatingSummary, Error>),
    Select(u8),
    Clear,
    Settled(Result<(), Error>),
}

pub struct RatingStars {
    widget: RatingWidget,
    summary: Option<RatingSummary>,
    scope: RequestScope,
}

impl RatingStars {
    fn send(&mut self, ctx: &Context<Self>, change: RatingChange) {
        let client = ui::services(ctx).client;
        let entity = ctx.props().entity;
        ui::spawn_scoped(ctx, &mut self.scope, async move {
            RatingMsg::Settled(apply_rating(&client, entity, change).await)
        });
    }
}

impl Component for RatingStars {
    type Message = RatingMsg;
    type Properties = RatingStarsProps;

    fn create(ctx: &Context<Self>) -> Self {
        let mut this = Self {
            widget: RatingWidget::new(None),
            summary: None,
            scope: RequestScope::new(),
        };
        let client = ui::services(ctx).client;
        let entity = ctx.props().entity;
        ui::spawn_scoped(ctx, &mut this.scope, async move {
            let res = async {
                let summary = client.rating_summary(entity).await?;
                let mine = client.my_rating(entity).await?;
                Ok::<_, Error>((summary, mine))
            };
            RatingMsg::Loaded(res.await)
        });
        this
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            RatingMsg::Loaded(Ok((summary, mine))) => {
                self.summary = Some(summary);
                self.widget = RatingWidget::new(mine.map(|r| r.rating_value));
            }
            RatingMsg::Loaded(Err(e)) | RatingMsg::SummaryLoaded(Err(e)) => {
                tracing::warn!(entity = %ctx.props().entity, err = %e, "failed fetching rating");
                ui::services(ctx).error(e.into());
                return false;
            }
            RatingMsg::SummaryLoaded(Ok(summary)) => self.summary = Some(summary),
            RatingMsg::Select(value) => match self.widget.select(value) {
                Some(change) => self.send(ctx, change),
                None => return false,
            },
            RatingMsg::Clear => match self.widget.clear() {
                Some(change) => self.send(ctx, change),
                None => return false,
            },
            RatingMsg::Settled(res) => {
                self.widget.settle(res.is_ok());
                match res {
                    Ok(()) => {
                        let client = ui::services(ctx).client;
                        let entity = ctx.props().entity;
                        ui::spawn_scoped(ctx, &mut self.scope, async move {
                            RatingMsg::SummaryLoaded(client.rating_summary(entity).await)
                        });
                    }
                    Err(e) => {
                        tracing::warn!(entity = %ctx.props().entity, err = %e, "failed saving rating");
                        ui::services(ctx).error(e.into());
                    }
                }
            }
        }
        true
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let stars = self.widget.stars().map(|(value, lit)| {
            let icon = match lit {
                true => "bi-star-fill",
                false => "bi-star",
            };
            html! {
                <button
                    type="button"
                    class={ classes!("btn", "btn-link", "p-0", "me-1", "text-warning", icon) }
                    aria-label={ format!("{value} sao") }
                    disabled={ self.widget.is_saving() }
                    onclick={ ctx.link().callback(move |_| RatingMsg::Select(value)) }
                >
                </button>
            }
        });
        html! {
            <div class="rating-stars d-flex align-items-center my-2">
                { for stars }
                if self.widget.shown().is_some() {
                    <button
                        type="button"
                        class="btn btn-link btn-sm"
                        disabled={ self.widget.is_saving() }
                        onclick={ ctx.link().callback(|_| RatingMsg::Clear) }
                    >
                        { "Bỏ đánh giá" }
                    </button>
                }
                if let Some(s) = &self.summary {
                    <span class="small text-muted ms-2">
                        { format!("{:.1} / 5 ({} lượt)", s.average, s.count) }
                    </span>
                }
            </div>
        }
    }
}
