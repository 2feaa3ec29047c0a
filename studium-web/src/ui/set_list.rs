use studium_client::{
    api::{BlogPost, EntityType, Error, FlashcardSet, ListQuery, Page, QuizSet, Resource},
    ApiClient, RequestScope,
};
use yew::prelude::*;

use crate::ui;

type Listing = Page<(Option<i64>, String)>;

async fn fetch<T: Resource>(client: &ApiClient, query: &ListQuery) -> Result<Listing, Error> {
    let page = client.list::<T>(query).await?;
    Ok(Page {
        content: page
            .content
            .iter()
            .map(|t| (t.id(), String::from(t.title())))
            .collect(),
        total_pages: page.total_pages,
        total_elements: page.total_elements,
        number: page.number,
    })
}

#[derive(Clone, PartialEq, Properties)]
pub struct SetListProps {
    pub kind: EntityType,
    pub on_open: Callback<i64>,
}

pub enum SetListMsg {
    Loaded(Result<Listing, Error>),
    SearchChanged(String),
    GoToPage(u32),
}

pub struct SetList {
    query: ListQuery,
    listing: Option<Listing>,
    is_loading: bool,
    scope: RequestScope,
}

impl SetList {
    fn reload(&mut self, ctx: &Context<Self>) {
        // a newer query supersedes whatever is still loading
        self.scope.cancel_all();
        self.is_loading = true;
        let client = ui::services(ctx).client;
        let query = self.query.clone();
        let kind = ctx.props().kind;
        ui::spawn_scoped(ctx, &mut self.scope, async move {
            SetListMsg::Loaded(match kind {
                EntityType::Blog => fetch::<BlogPost>(&client, &query).await,
                EntityType::FlashcardSet => fetch::<FlashcardSet>(&client, &query).await,
                EntityType::QuizSet => fetch::<QuizSet>(&client, &query).await,
            })
        });
    }
}

impl Component for SetList {
    type Message = SetListMsg;
    type Properties = SetListProps;

    fn create(ctx: &Context<Self>) -> Self {
        let mut this = Self {
            query: ListQuery::default(),
            listing: None,
            is_loading: false,
            scope: RequestScope::new(),
        };
        this.reload(ctx);
        this
    }

    fn changed(&mut self, ctx: &Context<Self>, old_props: &Self::Properties) -> bool {
        if ctx.props().kind != old_props.kind {
            self.query = ListQuery::default();
            self.listing = None;
            self.reload(ctx);
        }
        true
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            SetListMsg::Loaded(res) => {
                self.is_loading = false;
                match res {
                    Ok(l) => self.listing = Some(l),
                    Err(e) => {
                        tracing::warn!(kind = ?ctx.props().kind, err = %e, "failed listing sets");
                        ui::services(ctx).error(e.into());
                    }
                }
            }
            SetListMsg::SearchChanged(s) => {
                self.query = self.query.with_search(&s);
                self.reload(ctx);
            }
            SetListMsg::GoToPage(p) => {
                self.query = self.query.with_page(p);
                self.reload(ctx);
            }
        }
        true
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let title = match ctx.props().kind {
            EntityType::Blog => "Blog",
            EntityType::FlashcardSet => "Bộ thẻ ghi nhớ",
            EntityType::QuizSet => "Bài kiểm tra",
        };
        let items = self.listing.iter().flat_map(|l| l.content.iter()).map(|(id, title)| {
            let onclick = id.map(|id| ctx.props().on_open.reform(move |_: MouseEvent| id));
            html! {
                <li class="list-group-item list-group-item-action" role="button" { onclick }>
                    { title }
                </li>
            }
        });
        let pagination = self.listing.as_ref().filter(|l| l.total_pages > 1).map(|l| {
            let number = l.number;
            html! {
                <nav class="mt-3">
                    <ul class="pagination">
                        <li class={ classes!("page-item", (!l.has_prev()).then(|| "disabled")) }>
                            <button class="page-link" disabled={ !l.has_prev() }
                                onclick={ ctx.link().callback(move |_| SetListMsg::GoToPage(number.saturating_sub(1))) }>
                                { "«" }
                            </button>
                        </li>
                        <li class="page-item active">
                            <span class="page-link">{ format!("{}/{}", number + 1, l.total_pages) }</span>
                        </li>
                        <li class={ classes!("page-item", (!l.has_next()).then(|| "disabled")) }>
                            <button class="page-link" disabled={ !l.has_next() }
                                onclick={ ctx.link().callback(move |_| SetListMsg::GoToPage(number + 1)) }>
                                { "»" }
                            </button>
                        </li>
                    </ul>
                </nav>
            }
        });
        html! {<>
            <div class="d-flex align-items-center my-3">
                <h2 class="flex-fill">{ title }</h2>
                if self.is_loading {
                    <div class="spinner-border spinner-border-sm" role="status"></div>
                }
            </div>
            <input
                type="search"
                class="form-control mb-3"
                placeholder="Tìm kiếm..."
                value={ self.query.search.clone().unwrap_or_default() }
                onchange={ ctx.link().callback(|e: web_sys::Event| {
                    let input: web_sys::HtmlInputElement = e.target_unchecked_into();
                    SetListMsg::SearchChanged(input.value())
                }) }
            />
            <ul class="list-group">
                { for items }
            </ul>
            if self.listing.as_ref().map(|l| l.content.is_empty()).unwrap_or(false) {
                <p class="text-muted mt-3">{ "Không có kết quả" }</p>
            }
            { for pagination }
        </>}
    }
}
