use std::rc::Rc;

use chrono::Utc;
use studium_client::{
    api::{AuthToken, EntityRef, EntityType},
    normalize, ApiClient, ImageHost, Notice, RequestScope, ToastKind, Toasts,
};
use yew::prelude::*;

use crate::{config, storage, storage::AppSettings, ui, util};

/// What every view needs, handed down through a context
#[derive(Clone)]
pub struct Services {
    pub client: ApiClient,
    pub settings: AppSettings,
    pub images: Rc<ImageHost>,
    pub notify: Callback<(ToastKind, String)>,
}

impl PartialEq for Services {
    fn eq(&self, other: &Services) -> bool {
        self.client.token() == other.client.token()
            && Rc::ptr_eq(&self.images, &other.images)
            && self.notify == other.notify
    }
}

impl Services {
    /// Name to show on the user's own comments before the server echoes them back
    pub fn author(&self) -> String {
        self.settings
            .username()
            .unwrap_or_else(|| String::from(normalize::DEFAULT_AUTHOR))
    }

    pub fn error(&self, notice: Notice) {
        self.notify.emit((ToastKind::Error, notice.0));
    }

    pub fn success(&self, message: &str) {
        self.notify.emit((ToastKind::Success, String::from(message)));
    }
}

pub fn services<C: Component>(ctx: &Context<C>) -> Services {
    ctx.link()
        .context::<Services>(Callback::noop())
        .expect("component rendered outside of the App services context")
        .0
}

#[derive(Clone, Debug, PartialEq)]
pub enum View {
    Auth,
    Verify {
        email: String,
        purpose: ui::OtpPurpose,
    },
    Sets(EntityType),
    Detail(EntityRef),
    Generate(EntityType),
}

pub enum AppMsg {
    LoggedIn { token: AuthToken, name: String },
    Logout,
    Show(View),
    Notify(ToastKind, String),
    DismissToast(u64),
    ExpireToasts,
    TourDone,
}

pub struct App {
    services: Services,
    view: View,
    toasts: Toasts,
    scope: RequestScope,
}

impl Component for App {
    type Message = AppMsg;
    type Properties = ();

    fn create(ctx: &Context<Self>) -> Self {
        let settings = storage::settings();
        let token = settings.token();
        let view = match token {
            Some(_) => View::Sets(EntityType::FlashcardSet),
            None => View::Auth,
        };
        App {
            services: Services {
                client: ApiClient::new(config::api_url()).with_token(token),
                settings,
                images: Rc::new(config::image_host()),
                notify: ctx.link().callback(|(k, m)| AppMsg::Notify(k, m)),
            },
            view,
            toasts: Toasts::default(),
            scope: RequestScope::new(),
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            AppMsg::LoggedIn { token, name } => {
                tracing::info!(user = %name, "logged in");
                self.services.settings.set_token(&token);
                self.services.settings.set_username(&name);
                self.services.client.set_token(Some(token));
                self.view = View::Sets(EntityType::FlashcardSet);
            }
            AppMsg::Logout => {
                tracing::info!("logged out");
                self.services.settings.clear_session();
                self.services.client.set_token(None);
                self.view = View::Auth;
            }
            AppMsg::Show(view) => self.view = view,
            AppMsg::Notify(kind, message) => {
                self.toasts.push(kind, message, Utc::now());
                let lifetime = self
                    .toasts
                    .lifetime()
                    .to_std()
                    .unwrap_or(std::time::Duration::from_secs(3));
                ui::spawn_scoped(ctx, &mut self.scope, async move {
                    util::sleep(lifetime).await;
                    AppMsg::ExpireToasts
                });
            }
            AppMsg::DismissToast(id) => self.toasts.dismiss(id),
            AppMsg::ExpireToasts => return self.toasts.expire(Utc::now()),
            AppMsg::TourDone => self.services.settings.set_tour_completed(true),
        }
        true
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let show = |view: View| ctx.link().callback(move |_| AppMsg::Show(view.clone()));
        let body = match &self.view {
            View::Auth => html! {
                <ui::Login
                    on_logged_in={ ctx.link().callback(|(token, name)| AppMsg::LoggedIn { token, name }) }
                    on_needs_otp={ ctx.link().callback(|(email, purpose)| {
                        AppMsg::Show(View::Verify { email, purpose })
                    }) }
                />
            },
            View::Verify { email, purpose } => html! {
                <ui::OtpForm
                    email={ email.clone() }
                    purpose={ *purpose }
                    on_done={ ctx.link().callback(|_| AppMsg::Show(View::Auth)) }
                />
            },
            View::Sets(kind) => {
                let kind = *kind;
                html! {
                    <ui::SetList
                        { kind }
                        on_open={ ctx.link().callback(move |id| {
                            AppMsg::Show(View::Detail(EntityRef::new(kind, id)))
                        }) }
                    />
                }
            }
            View::Detail(entity) => html! { <ui::Detail entity={ *entity } /> },
            View::Generate(kind) => {
                let kind = *kind;
                html! {
                    <ui::GenerationWizard
                        { kind }
                        on_generated={ ctx.link().callback(move |id| {
                            AppMsg::Show(View::Detail(EntityRef::new(kind, id)))
                        }) }
                    />
                }
            }
        };
        let logged_in = self.services.client.token().is_some();
        let tour = (logged_in && !self.services.settings.tour_completed()).then(|| html! {
            <div class="alert alert-info d-flex align-items-center">
                <div class="flex-fill">
                    { "Chào mừng! Chọn một bộ thẻ hoặc bài kiểm tra để bắt đầu, hoặc tạo bộ mới từ tài liệu của bạn." }
                </div>
                <button
                    type="button"
                    class="btn btn-sm btn-outline-primary"
                    onclick={ ctx.link().callback(|_| AppMsg::TourDone) }
                >
                    { "Đã hiểu" }
                </button>
            </div>
        });
        let nav = logged_in.then(|| html! {
            <nav class="navbar navbar-expand navbar-light bg-light px-3 mb-3">
                <ul class="navbar-nav flex-fill">
                    <li class="nav-item">
                        <a class="nav-link" href="#" onclick={ show(View::Sets(EntityType::FlashcardSet)) }>{ "Thẻ ghi nhớ" }</a>
                    </li>
                    <li class="nav-item">
                        <a class="nav-link" href="#" onclick={ show(View::Sets(EntityType::QuizSet)) }>{ "Bài kiểm tra" }</a>
                    </li>
                    <li class="nav-item">
                        <a class="nav-link" href="#" onclick={ show(View::Sets(EntityType::Blog)) }>{ "Blog" }</a>
                    </li>
                    <li class="nav-item">
                        <a class="nav-link" href="#" onclick={ show(View::Generate(EntityType::FlashcardSet)) }>{ "Tạo thẻ" }</a>
                    </li>
                    <li class="nav-item">
                        <a class="nav-link" href="#" onclick={ show(View::Generate(EntityType::QuizSet)) }>{ "Tạo bài kiểm tra" }</a>
                    </li>
                </ul>
                <span class="navbar-text me-3">{ self.services.author() }</span>
                <button
                    type="button"
                    class="btn btn-outline-secondary btn-sm"
                    onclick={ ctx.link().callback(|_| AppMsg::Logout) }
                >
                    { "Đăng xuất" }
                </button>
            </nav>
        });
        html! {
            <ContextProvider<Services> context={ self.services.clone() }>
                { for nav }
                <div class="container">
                    { for tour }
                    { body }
                </div>
                <ui::ToastArea
                    toasts={ self.toasts.shown().cloned().collect::<Vec<_>>() }
                    on_dismiss={ ctx.link().callback(AppMsg::DismissToast) }
                />
            </ContextProvider<Services>>
        }
    }
}
