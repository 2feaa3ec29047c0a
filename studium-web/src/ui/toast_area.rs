use studium_client::{Toast, ToastKind};
use yew::prelude::*;

#[derive(Clone, PartialEq, Properties)]
pub struct ToastAreaProps {
    pub toasts: Vec<Toast>,
    pub on_dismiss: Callback<u64>,
}

#[function_component(ToastArea)]
pub fn toast_area(p: &ToastAreaProps) -> Html {
    html! {
        <div class="toast-container position-fixed bottom-0 end-0 p-3">
            { for p.toasts.iter().map(|t| {
                let bg = match t.kind {
                    ToastKind::Success => "text-bg-success",
                    ToastKind::Info => "text-bg-info",
                    ToastKind::Error => "text-bg-danger",
                };
                let id = t.id;
                html! {
                    <div class={ classes!("toast", "show", bg) } role="alert" key={ id }>
                        <div class="d-flex">
                            <div class="toast-body">{ &t.message }</div>
                            <button
                                type="button"
                                class="btn-close btn-close-white me-2 m-auto"
                                aria-label="Close"
                                onclick={ p.on_dismiss.reform(move |_| id) }
                            >
                            </button>
                        </div>
                    </div>
                }
            }) }
        </div>
    }
}
