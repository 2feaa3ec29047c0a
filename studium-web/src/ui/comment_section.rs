use chrono::Utc;
use serde_json::Value;
use studium_client::{
    api::{
        Comment, CommentEdit, CommentId, CommentKey, EntityRef, Error, NewComment, UploadedImage,
    },
    normalize, Attachment, CommentFeed, InteractionsApi, Notice, Removal, RequestScope, Settled,
    BUSY_MESSAGE,
};
use yew::prelude::*;

use crate::{ui, util};

const DELETE_CONFIRMATION: &str = "Bạn có chắc muốn xóa bình luận này?";

#[derive(Clone, PartialEq, Properties)]
pub struct CommentSectionProps {
    pub entity: EntityRef,
}

pub enum CommentMsg {
    Loaded(Result<Value, Error>),
    ShowMore,

    DraftChanged(String),
    ImagePicked(Vec<web_sys::File>),
    ImageRead(Option<Attachment>),
    ImageCleared,
    StartReply(CommentId),
    ReplyChanged(String),
    CancelReply,
    Submit { reply: bool },
    ImageUploaded(NewComment, Result<UploadedImage, Error>),
    Posted(CommentKey, Result<Value, Error>),

    StartEdit(CommentKey),
    EditChanged(String),
    CancelEdit,
    SaveEdit,
    Edited(CommentKey, String, Result<(), Error>),

    Delete(CommentKey),
    Deleted(Removal, Result<(), Error>),
}

pub struct CommentSection {
    feed: CommentFeed,
    is_loading: bool,
    draft: String,
    image: Option<Attachment>,
    reply_to: Option<CommentId>,
    reply_draft: String,
    editing: Option<(CommentKey, String)>,
    is_submitting: bool,
    scope: RequestScope,
}

impl CommentSection {
    fn reload(&mut self, ctx: &Context<Self>) {
        let client = ui::services(ctx).client;
        let entity = ctx.props().entity;
        self.is_loading = true;
        ui::spawn_scoped(ctx, &mut self.scope, async move {
            CommentMsg::Loaded(client.list_comments(entity).await)
        });
    }

    fn post(&mut self, ctx: &Context<Self>, new: NewComment) {
        let services = ui::services(ctx);
        let pending = match self.feed.begin_submit(&new, &services.author(), Utc::now()) {
            Ok(k) => k,
            Err(notice) => {
                services.error(notice);
                self.is_submitting = false;
                return;
            }
        };
        let client = services.client;
        let entity = ctx.props().entity;
        ui::spawn_scoped(ctx, &mut self.scope, async move {
            CommentMsg::Posted(pending, client.post_comment(entity, &new).await)
        });
    }

    fn view_comment(&self, ctx: &Context<Self>, c: &Comment, own_name: Option<&str>) -> Html {
        let key = c.key;
        let is_own = normalize::is_authored_by(c, own_name);
        let body = match &self.editing {
            Some((k, text)) if *k == key => html! {
                <div class="input-group">
                    <input
                        type="text"
                        class="form-control"
                        value={ text.clone() }
                        onchange={ ctx.link().callback(|e: web_sys::Event| {
                            let input: web_sys::HtmlInputElement = e.target_unchecked_into();
                            CommentMsg::EditChanged(input.value())
                        }) }
                    />
                    <button class="btn btn-primary" onclick={ ctx.link().callback(|_| CommentMsg::SaveEdit) }>
                        { "Lưu" }
                    </button>
                    <button class="btn btn-outline-secondary" onclick={ ctx.link().callback(|_| CommentMsg::CancelEdit) }>
                        { "Hủy" }
                    </button>
                </div>
            },
            _ => html! { <p class="mb-1">{ &c.content }</p> },
        };
        let reply_box = match (c.id(), self.reply_to) {
            (Some(id), Some(r)) if id == r => html! {
                <div class="input-group mt-2">
                    <input
                        type="text"
                        class="form-control"
                        placeholder="Viết phản hồi..."
                        value={ self.reply_draft.clone() }
                        onchange={ ctx.link().callback(|e: web_sys::Event| {
                            let input: web_sys::HtmlInputElement = e.target_unchecked_into();
                            CommentMsg::ReplyChanged(input.value())
                        }) }
                    />
                    <button
                        class="btn btn-primary"
                        disabled={ self.is_submitting }
                        onclick={ ctx.link().callback(|_| CommentMsg::Submit { reply: true }) }
                    >
                        { "Gửi" }
                    </button>
                    <button class="btn btn-outline-secondary" onclick={ ctx.link().callback(|_| CommentMsg::CancelReply) }>
                        { "Hủy" }
                    </button>
                </div>
            },
            _ => html! {},
        };
        html! {
            <li class="list-group-item" key={ format!("{key:?}") }>
                <div class="d-flex align-items-start">
                    if let Some(avatar) = &c.author_avatar {
                        <img src={ avatar.clone() } class="rounded-circle me-2 comment-avatar" alt="" />
                    }
                    <div class="flex-fill">
                        <div class="small text-muted">
                            <strong>{ &c.author_name }</strong>
                            { " · " }
                            { c.created_at.format("%d/%m/%Y %H:%M").to_string() }
                            if c.key.is_pending() {
                                <span class="badge text-bg-light ms-2">{ "Đang gửi..." }</span>
                            }
                            if c.like_count > 0 {
                                <span class="ms-2 bi-heart">{ format!(" {}", c.like_count) }</span>
                            }
                        </div>
                        { body }
                        if let Some(url) = &c.image_url {
                            <img src={ url.clone() } class="img-fluid rounded comment-image mb-1" alt="" />
                        }
                        if !c.key.is_pending() {
                            <div class="small">
                                if let (false, Some(id)) = (c.is_reply(), c.id()) {
                                    <button class="btn btn-link btn-sm p-0 me-2" onclick={ ctx.link().callback(move |_| CommentMsg::StartReply(id)) }>
                                        { "Phản hồi" }
                                    </button>
                                }
                                if is_own {<>
                                    <button class="btn btn-link btn-sm p-0 me-2" onclick={ ctx.link().callback(move |_| CommentMsg::StartEdit(key)) }>
                                        { "Sửa" }
                                    </button>
                                    <button class="btn btn-link btn-sm p-0 text-danger" onclick={ ctx.link().callback(move |_| CommentMsg::Delete(key)) }>
                                        { "Xóa" }
                                    </button>
                                </>}
                            </div>
                        }
                        { reply_box }
                        if !c.replies.is_empty() {
                            <ul class="list-group list-group-flush ms-4 mt-2">
                                { for c.replies.iter().map(|r| self.view_comment(ctx, r, own_name)) }
                            </ul>
                        }
                    </div>
                </div>
            </li>
        }
    }
}

impl Component for CommentSection {
    type Message = CommentMsg;
    type Properties = CommentSectionProps;

    fn create(ctx: &Context<Self>) -> Self {
        let mut this = Self {
            feed: CommentFeed::default(),
            is_loading: false,
            draft: String::new(),
            image: None,
            reply_to: None,
            reply_draft: String::new(),
            editing: None,
            is_submitting: false,
            scope: RequestScope::new(),
        };
        this.reload(ctx);
        this
    }

    fn changed(&mut self, ctx: &Context<Self>, old_props: &Self::Properties) -> bool {
        if ctx.props().entity != old_props.entity {
            self.scope.cancel_all();
            self.feed = CommentFeed::default();
            self.is_submitting = false;
            self.reload(ctx);
        }
        true
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            CommentMsg::Loaded(res) => {
                self.is_loading = false;
                match res {
                    Ok(payload) => self.feed.replace(&payload, Utc::now()),
                    Err(e) => {
                        // keep showing what was there
                        tracing::warn!(entity = %ctx.props().entity, err = %e, "failed fetching comments");
                        ui::services(ctx).error(e.into());
                    }
                }
            }
            CommentMsg::ShowMore => self.feed.show_more(),

            CommentMsg::DraftChanged(d) => self.draft = d,
            CommentMsg::ImagePicked(files) => {
                let file = match files.into_iter().next() {
                    Some(f) => f,
                    None => return false,
                };
                ui::spawn_scoped(ctx, &mut self.scope, async move {
                    CommentMsg::ImageRead(util::read_file(file).await)
                });
            }
            CommentMsg::ImageRead(image) => {
                match image {
                    Some(i) if !i.mime.starts_with("image/") => {
                        ui::services(ctx).error(Notice(String::from("Chỉ chấp nhận tệp hình ảnh")));
                    }
                    image => self.image = image,
                }
            }
            CommentMsg::ImageCleared => self.image = None,
            CommentMsg::StartReply(id) => {
                self.reply_to = Some(id);
                self.reply_draft = String::new();
            }
            CommentMsg::ReplyChanged(d) => self.reply_draft = d,
            CommentMsg::CancelReply => self.reply_to = None,
            CommentMsg::Submit { reply } => {
                let services = ui::services(ctx);
                if self.is_submitting {
                    services.error(Notice(String::from(BUSY_MESSAGE)));
                    return false;
                }
                let new = match reply {
                    false => NewComment {
                        content: self.draft.trim().to_string(),
                        image_url: None,
                        parent_id: None,
                    },
                    true => NewComment {
                        content: self.reply_draft.trim().to_string(),
                        image_url: None,
                        parent_id: self.reply_to,
                    },
                };
                let image = match reply {
                    false => self.image.clone(),
                    true => None,
                };
                if image.is_none() {
                    if let Err(e) = new.validate() {
                        services.error(e.into());
                        return false;
                    }
                }
                self.is_submitting = true;
                match reply {
                    false => {
                        self.draft = String::new();
                        self.image = None;
                    }
                    true => {
                        self.reply_draft = String::new();
                        self.reply_to = None;
                    }
                }
                match image {
                    None => self.post(ctx, new),
                    Some(image) => {
                        let client = services.client;
                        let host = services.images;
                        ui::spawn_scoped(ctx, &mut self.scope, async move {
                            let res = client.upload_image(&host, &image).await;
                            CommentMsg::ImageUploaded(new, res)
                        });
                    }
                }
            }
            CommentMsg::ImageUploaded(mut new, res) => match res {
                Ok(uploaded) => {
                    new.image_url = Some(uploaded.secure_url);
                    self.post(ctx, new);
                }
                Err(e) => {
                    tracing::warn!(err = %e, "failed uploading comment image");
                    self.is_submitting = false;
                    ui::services(ctx).error(e.into());
                }
            },
            CommentMsg::Posted(pending, res) => {
                self.is_submitting = false;
                match self.feed.settle_submit(pending, res, Utc::now()) {
                    Ok(Settled::Confirmed) => (),
                    Ok(Settled::NeedsRefresh) => self.reload(ctx),
                    Err(notice) => ui::services(ctx).error(notice),
                }
            }

            CommentMsg::StartEdit(key) => {
                if let Some(c) = self.feed.find(key) {
                    self.editing = Some((key, c.content.clone()));
                }
            }
            CommentMsg::EditChanged(text) => {
                if let Some((_, t)) = &mut self.editing {
                    *t = text;
                }
            }
            CommentMsg::CancelEdit => self.editing = None,
            CommentMsg::SaveEdit => {
                let (key, content) = match self.editing.take() {
                    Some(e) => e,
                    None => return false,
                };
                let (id, previous) = match self.feed.begin_edit(key, content.clone()) {
                    Ok(r) => r,
                    Err(notice) => {
                        ui::services(ctx).error(notice);
                        return true;
                    }
                };
                let client = ui::services(ctx).client;
                ui::spawn_scoped(ctx, &mut self.scope, async move {
                    let res = client.edit_comment(id, &CommentEdit { content }).await;
                    CommentMsg::Edited(key, previous, res)
                });
            }
            CommentMsg::Edited(key, previous, res) => {
                if let Err(notice) = self.feed.settle_edit(key, previous, res) {
                    ui::services(ctx).error(notice);
                }
            }

            CommentMsg::Delete(key) => {
                if key.is_pending() || !util::confirm(DELETE_CONFIRMATION) {
                    return false;
                }
                let (id, removal) = match self.feed.begin_delete(key) {
                    Ok(r) => r,
                    Err(notice) => {
                        ui::services(ctx).error(notice);
                        return true;
                    }
                };
                let client = ui::services(ctx).client;
                ui::spawn_scoped(ctx, &mut self.scope, async move {
                    CommentMsg::Deleted(removal, client.delete_comment(id).await)
                });
            }
            CommentMsg::Deleted(removal, res) => {
                if let Err(notice) = self.feed.settle_delete(removal, res) {
                    ui::services(ctx).error(notice);
                }
            }
        }
        true
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let own_name = ui::services(ctx).settings.username();
        html! {
            <section class="comment-section mt-4">
                <h4>{ format!("Bình luận ({})", self.feed.total()) }</h4>
                <form class="mb-3" onsubmit={ ctx.link().callback(|e: SubmitEvent| {
                    e.prevent_default();
                    CommentMsg::Submit { reply: false }
                }) }>
                    <textarea
                        class="form-control mb-2"
                        rows="2"
                        placeholder="Viết bình luận..."
                        value={ self.draft.clone() }
                        onchange={ ctx.link().callback(|e: web_sys::Event| {
                            let input: web_sys::HtmlTextAreaElement = e.target_unchecked_into();
                            CommentMsg::DraftChanged(input.value())
                        }) }
                    />
                    <div class="d-flex align-items-center">
                        <input
                            type="file"
                            accept="image/*"
                            class="form-control form-control-sm me-2"
                            onchange={ ctx.link().callback(|e: web_sys::Event| {
                                CommentMsg::ImagePicked(util::picked_files(&e))
                            }) }
                        />
                        if let Some(image) = &self.image {<>
                            <span class="small me-2">{ &image.name }</span>
                            <button type="button" class="btn-close me-2" aria-label="Remove"
                                onclick={ ctx.link().callback(|_| CommentMsg::ImageCleared) }>
                            </button>
                        </>}
                        <button type="submit" class="btn btn-primary" disabled={ self.is_submitting }>
                            if self.is_submitting {
                                <span class="spinner-border spinner-border-sm me-2" role="status"></span>
                            }
                            { "Gửi" }
                        </button>
                    </div>
                </form>
                if self.is_loading && self.feed.total() == 0 {
                    <div class="spinner-border" role="status"></div>
                }
                <ul class="list-group">
                    { for self.feed.visible().iter().map(|c| self.view_comment(ctx, c, own_name.as_deref())) }
                </ul>
                if self.feed.has_more() {
                    <button class="btn btn-outline-primary mt-2" onclick={ ctx.link().callback(|_| CommentMsg::ShowMore) }>
                        { format!("Xem thêm ({} còn lại)", self.feed.total() - self.feed.visible().len()) }
                    </button>
                }
            </section>
        }
    }
}
