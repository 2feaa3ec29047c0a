use std::time::Duration;

use chrono::Utc;
use studium_client::{
    api::{Error, OtpRequest, OtpVerification, PasswordReset},
    Countdown, CountdownState, OtpInput, RequestScope,
};
use yew::prelude::*;

use crate::{ui, util};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum OtpPurpose {
    Register,
    ResetPassword,
}

#[derive(Clone, PartialEq, Properties)]
pub struct OtpFormProps {
    pub email: String,
    pub purpose: OtpPurpose,
    pub on_done: Callback<()>,
}

pub enum OtpMsg {
    Input(usize, String),
    Backspace(usize),
    PassChanged(String),
    Tick,
    Resend,
    Resent(Result<(), Error>),
    Submit,
    Submitted(Result<(), Error>),
}

pub struct OtpForm {
    code: OtpInput,
    boxes: Vec<NodeRef>,
    new_password: String,
    countdown: Countdown,
    is_submitting: bool,
    ticking: bool,
    scope: RequestScope,
}

impl OtpForm {
    fn state(&self, ctx: &Context<Self>) -> CountdownState {
        self.countdown
            .state(&ui::services(ctx).settings, Utc::now())
    }

    /// Keeps one tick in flight while the countdown runs
    fn tick(&mut self, ctx: &Context<Self>) {
        if self.ticking || !self.state(ctx).is_counting() {
            return;
        }
        self.ticking = true;
        ui::spawn_scoped(ctx, &mut self.scope, async {
            util::sleep(Duration::from_secs(1)).await;
            OtpMsg::Tick
        });
    }

    /// Writes the digits back into the boxes, which may hold a whole pasted code
    fn sync_boxes(&self) {
        for (r, d) in self.boxes.iter().zip(self.code.digits()) {
            if let Some(input) = r.cast::<web_sys::HtmlInputElement>() {
                input.set_value(&d.map(String::from).unwrap_or_default());
            }
        }
    }

    fn focus(&self, index: usize) {
        if let Some(input) = self
            .boxes
            .get(index)
            .and_then(|r| r.cast::<web_sys::HtmlElement>())
        {
            let _ = input.focus();
        }
    }
}

impl Component for OtpForm {
    type Message = OtpMsg;
    type Properties = OtpFormProps;

    fn create(ctx: &Context<Self>) -> Self {
        let code = OtpInput::default();
        let mut this = Self {
            boxes: (0..code.len()).map(|_| NodeRef::default()).collect(),
            code,
            new_password: String::new(),
            countdown: Countdown::otp(format!("otp:{}", ctx.props().email)),
            is_submitting: false,
            ticking: false,
            scope: RequestScope::new(),
        };
        // the code was just sent by the previous step
        let settings = ui::services(ctx).settings;
        if this.countdown.state(&settings, Utc::now()) == CountdownState::Idle {
            this.countdown.start(&settings, Utc::now());
        }
        this.tick(ctx);
        this
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            OtpMsg::Input(i, value) => {
                let focus = self.code.input(i, &value);
                self.sync_boxes();
                self.focus(focus);
            }
            OtpMsg::Backspace(i) => {
                let focus = self.code.backspace(i);
                self.sync_boxes();
                self.focus(focus);
            }
            OtpMsg::PassChanged(p) => self.new_password = p,
            OtpMsg::Tick => {
                self.ticking = false;
                self.tick(ctx);
            }
            OtpMsg::Resend => {
                if self.state(ctx).is_counting() {
                    return false;
                }
                let client = ui::services(ctx).client;
                let req = OtpRequest {
                    email: ctx.props().email.clone(),
                };
                let purpose = ctx.props().purpose;
                ui::spawn_scoped(ctx, &mut self.scope, async move {
                    OtpMsg::Resent(match purpose {
                        OtpPurpose::Register => client.resend_otp(&req).await,
                        OtpPurpose::ResetPassword => client.forgot_password(&req).await,
                    })
                });
            }
            OtpMsg::Resent(res) => {
                let services = ui::services(ctx);
                match res {
                    Ok(()) => {
                        self.countdown.start(&services.settings, Utc::now());
                        self.code.clear();
                        self.sync_boxes();
                        self.tick(ctx);
                        services.success("Đã gửi lại mã OTP");
                    }
                    Err(e) => {
                        tracing::warn!(err = %e, "failed resending otp");
                        services.error(e.into());
                    }
                }
            }
            OtpMsg::Submit => {
                let code = match self.code.code() {
                    Some(c) if !self.is_submitting => c,
                    _ => return false,
                };
                let client = ui::services(ctx).client;
                let email = ctx.props().email.clone();
                let purpose = ctx.props().purpose;
                let new_password = self.new_password.clone();
                self.is_submitting = true;
                ui::spawn_scoped(ctx, &mut self.scope, async move {
                    OtpMsg::Submitted(match purpose {
                        OtpPurpose::Register => {
                            client
                                .verify_otp(&OtpVerification { email, otp: code })
                                .await
                        }
                        OtpPurpose::ResetPassword => {
                            client
                                .reset_password(&PasswordReset {
                                    email,
                                    otp: code,
                                    new_password,
                                })
                                .await
                        }
                    })
                });
            }
            OtpMsg::Submitted(res) => {
                self.is_submitting = false;
                let services = ui::services(ctx);
                match res {
                    Ok(()) => {
                        self.countdown.reset(&services.settings);
                        services.success(match ctx.props().purpose {
                            OtpPurpose::Register => "Xác thực thành công, vui lòng đăng nhập",
                            OtpPurpose::ResetPassword => "Đổi mật khẩu thành công",
                        });
                        ctx.props().on_done.emit(());
                    }
                    Err(e) => {
                        tracing::warn!(err = %e, "otp verification failed");
                        services.error(e.into());
                    }
                }
            }
        }
        true
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let state = self.state(ctx);
        let boxes = self.boxes.iter().enumerate().map(|(i, r)| {
            html! {
                <input
                    ref={ r.clone() }
                    type="text"
                    inputmode="numeric"
                    autocomplete="one-time-code"
                    class="form-control form-control-lg text-center otp-box mx-1"
                    oninput={ ctx.link().callback(move |e: InputEvent| {
                        let input: web_sys::HtmlInputElement = e.target_unchecked_into();
                        OtpMsg::Input(i, input.value())
                    }) }
                    onkeydown={ ctx.link().batch_callback(move |e: KeyboardEvent| {
                        (e.key() == "Backspace").then(|| {
                            e.prevent_default();
                            OtpMsg::Backspace(i)
                        })
                    }) }
                />
            }
        });
        html! {<>
            <div class="text-center my-4">
                <h1>{ "Nhập mã OTP" }</h1>
                <p>{ format!("Mã xác thực đã được gửi tới {}", ctx.props().email) }</p>
            </div>
            <form onsubmit={ ctx.link().callback(|e: SubmitEvent| {
                e.prevent_default();
                OtpMsg::Submit
            }) }>
                <div class="d-flex justify-content-center mb-3">
                    { for boxes }
                </div>
                if ctx.props().purpose == OtpPurpose::ResetPassword {
                    <div class="input-group mb-3">
                        <label class="input-group-text" for="new-pass">{ "Mật khẩu mới" }</label>
                        <input
                            type="password"
                            class="form-control"
                            id="new-pass"
                            value={ self.new_password.clone() }
                            onchange={ ctx.link().callback(|e: web_sys::Event| {
                                let input: web_sys::HtmlInputElement = e.target_unchecked_into();
                                OtpMsg::PassChanged(input.value())
                            }) }
                        />
                    </div>
                }
                <button
                    type="submit"
                    class="btn btn-primary"
                    disabled={ self.is_submitting || !self.code.is_complete() }
                >
                    { "Xác nhận" }
                </button>
                <button
                    type="button"
                    class="btn btn-link"
                    disabled={ state.is_counting() }
                    onclick={ ctx.link().callback(|_| OtpMsg::Resend) }
                >
                    { match state.label() {
                        Some(l) => format!("Gửi lại mã sau {l}"),
                        None => String::from("Gửi lại mã"),
                    } }
                </button>
            </form>
        </>}
    }
}
