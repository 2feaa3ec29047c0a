use studium_client::{
    api::{EntityType, Error, FlashcardSet, QuizSet, Resource, StudySet},
    ApiClient, Attachment, GenerationInput, GenerationRequest, RequestScope, SourceTab,
    MAX_IMAGES, MAX_ITEM_COUNT,
};
use yew::prelude::*;

use crate::{ui, util};

/// Generates a set, then saves it unless the server already did
async fn generate_and_save<T: StudySet>(
    client: &ApiClient,
    request: &GenerationRequest,
) -> Result<Option<i64>, Error> {
    let set: T = client.generate(request).await?;
    tracing::debug!(title = %set.title(), items = set.item_count(), "set generated");
    if set.id().is_some() {
        return Ok(set.id());
    }
    set.validate()?;
    Ok(client.create_set(&set, &[]).await?.id())
}

#[derive(Clone, PartialEq, Properties)]
pub struct GenerationWizardProps {
    pub kind: EntityType,
    pub on_generated: Callback<i64>,
}

pub enum WizardMsg {
    Tab(SourceTab),
    TextChanged(String),
    CountChanged(String),
    DocumentPicked(Vec<web_sys::File>),
    ImagesPicked(Vec<web_sys::File>),
    DocumentRead(Vec<Attachment>),
    ImagesRead(Vec<Attachment>),
    RemoveImage(usize),
    Submit,
    Generated(Result<Option<i64>, Error>),
}

pub struct GenerationWizard {
    input: GenerationInput,
    is_generating: bool,
    scope: RequestScope,
}

impl Component for GenerationWizard {
    type Message = WizardMsg;
    type Properties = GenerationWizardProps;

    fn create(_ctx: &Context<Self>) -> Self {
        Self {
            input: GenerationInput::default(),
            is_generating: false,
            scope: RequestScope::new(),
        }
    }

    fn changed(&mut self, ctx: &Context<Self>, old_props: &Self::Properties) -> bool {
        if ctx.props().kind != old_props.kind {
            self.scope.cancel_all();
            self.input = GenerationInput::default();
            self.is_generating = false;
        }
        true
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            WizardMsg::Tab(t) => self.input.switch_tab(t),
            WizardMsg::TextChanged(t) => self.input.set_text(t),
            WizardMsg::CountChanged(c) => match c.trim().parse() {
                Ok(c) => self.input.set_item_count(c),
                Err(_) => return true,
            },
            WizardMsg::DocumentPicked(files) => {
                ui::spawn_scoped(ctx, &mut self.scope, async move {
                    WizardMsg::DocumentRead(util::read_files(files).await)
                });
                return false;
            }
            WizardMsg::ImagesPicked(files) => {
                ui::spawn_scoped(ctx, &mut self.scope, async move {
                    WizardMsg::ImagesRead(util::read_files(files).await)
                });
                return false;
            }
            WizardMsg::DocumentRead(docs) => {
                if let Some(doc) = docs.into_iter().next() {
                    if let Err(e) = self.input.set_document(doc) {
                        ui::services(ctx).error(e.into());
                    }
                }
            }
            WizardMsg::ImagesRead(images) => {
                for image in images {
                    if let Err(e) = self.input.add_image(image) {
                        ui::services(ctx).error(e.into());
                        break;
                    }
                }
            }
            WizardMsg::RemoveImage(i) => self.input.remove_image(i),
            WizardMsg::Submit => {
                if self.is_generating {
                    return false;
                }
                let request = match self.input.request() {
                    Ok(r) => r,
                    Err(e) => {
                        ui::services(ctx).error(e.into());
                        return false;
                    }
                };
                self.is_generating = true;
                let client = ui::services(ctx).client;
                let kind = ctx.props().kind;
                ui::spawn_scoped(ctx, &mut self.scope, async move {
                    WizardMsg::Generated(match kind {
                        EntityType::QuizSet => generate_and_save::<QuizSet>(&client, &request).await,
                        _ => generate_and_save::<FlashcardSet>(&client, &request).await,
                    })
                });
            }
            WizardMsg::Generated(res) => {
                self.is_generating = false;
                let services = ui::services(ctx);
                match res {
                    Ok(Some(id)) => {
                        services.success("Tạo bộ học liệu thành công");
                        self.input = GenerationInput::default();
                        ctx.props().on_generated.emit(id);
                    }
                    Ok(None) => {
                        tracing::warn!("saved set came back without an id");
                        services.success("Tạo bộ học liệu thành công");
                    }
                    Err(e) => {
                        tracing::warn!(err = %e, "generation failed");
                        services.error(e.into());
                    }
                }
            }
        }
        true
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let tab = self.input.tab();
        let tabs = [
            (SourceTab::Text, "Văn bản"),
            (SourceTab::Document, "Tài liệu"),
            (SourceTab::Image, "Hình ảnh"),
        ]
        .into_iter()
        .map(|(t, label)| {
            html! {
                <li class="nav-item">
                    <button
                        type="button"
                        class={ classes!("nav-link", (t == tab).then(|| "active")) }
                        onclick={ ctx.link().callback(move |_| WizardMsg::Tab(t)) }
                    >
                        { label }
                    </button>
                </li>
            }
        });
        let body = match tab {
            SourceTab::Text => html! {
                <textarea
                    class="form-control"
                    rows="8"
                    placeholder="Dán nội dung cần học vào đây..."
                    value={ String::from(self.input.text()) }
                    oninput={ ctx.link().callback(|e: InputEvent| {
                        let input: web_sys::HtmlTextAreaElement = e.target_unchecked_into();
                        WizardMsg::TextChanged(input.value())
                    }) }
                />
            },
            SourceTab::Document => html! {<>
                <input
                    type="file"
                    class="form-control"
                    accept=".pdf,.docx,.txt"
                    onchange={ ctx.link().callback(|e: web_sys::Event| {
                        WizardMsg::DocumentPicked(util::picked_files(&e))
                    }) }
                />
                if let Some(doc) = self.input.document() {
                    <p class="small text-muted mt-2">{ &doc.name }</p>
                }
            </>},
            SourceTab::Image => {
                let images = self.input.images().iter().enumerate().map(|(i, img)| {
                    html! {
                        <li class="list-group-item d-flex align-items-center">
                            <span class="flex-fill">{ &img.name }</span>
                            <button
                                type="button"
                                class="btn-close"
                                aria-label="Xóa"
                                onclick={ ctx.link().callback(move |_| WizardMsg::RemoveImage(i)) }
                            />
                        </li>
                    }
                });
                html! {<>
                    <input
                        type="file"
                        class="form-control"
                        accept="image/*"
                        multiple=true
                        disabled={ self.input.images().len() >= MAX_IMAGES }
                        onchange={ ctx.link().callback(|e: web_sys::Event| {
                            WizardMsg::ImagesPicked(util::picked_files(&e))
                        }) }
                    />
                    <ul class="list-group mt-2">{ for images }</ul>
                    <p class="small text-muted mt-1">
                        { format!("{}/{MAX_IMAGES} ảnh", self.input.images().len()) }
                    </p>
                </>}
            }
        };
        let title = match ctx.props().kind {
            EntityType::QuizSet => "Tạo bài kiểm tra bằng AI",
            _ => "Tạo bộ thẻ ghi nhớ bằng AI",
        };
        html! {
            <div class="generation-wizard my-3">
                <h2>{ title }</h2>
                <ul class="nav nav-tabs mb-3">{ for tabs }</ul>
                { body }
                <div class="input-group my-3">
                    <label class="input-group-text" for="item-count">{ "Số lượng" }</label>
                    <input
                        type="number"
                        class="form-control"
                        id="item-count"
                        min="1"
                        max={ MAX_ITEM_COUNT.to_string() }
                        value={ self.input.item_count().to_string() }
                        onchange={ ctx.link().callback(|e: web_sys::Event| {
                            let input: web_sys::HtmlInputElement = e.target_unchecked_into();
                            WizardMsg::CountChanged(input.value())
                        }) }
                    />
                </div>
                <button
                    class="btn btn-primary"
                    disabled={ self.is_generating }
                    onclick={ ctx.link().callback(|_| WizardMsg::Submit) }
                >
                    if self.is_generating {
                        <span class="spinner-border spinner-border-sm me-2" role="status"></span>
                    }
                    { "Tạo" }
                </button>
            </div>
        }
    }
}
