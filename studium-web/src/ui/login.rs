use futures::future::{FutureExt, LocalBoxFuture};
use studium_client::{
    api::{AuthToken, Error, NewAccount, NewSession, OtpRequest},
    RequestScope,
};
use yew::prelude::*;

use crate::ui::{self, OtpPurpose};

#[derive(Clone, PartialEq, Properties)]
pub struct LoginProps {
    /// Token and display name
    pub on_logged_in: Callback<(AuthToken, String)>,
    pub on_needs_otp: Callback<(String, OtpPurpose)>,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Mode {
    Login,
    Register,
    Forgot,
}

pub enum Outcome {
    LoggedIn(AuthToken),
    Registered,
    ResetRequested,
}

pub struct Login {
    mode: Mode,
    username: String,
    email: String,
    pass: String,
    is_submitting: bool,
    scope: RequestScope,
}

pub enum LoginMsg {
    UsernameChanged(String),
    EmailChanged(String),
    PassChanged(String),
    SwitchMode(Mode),
    SubmitClicked,
    Done(Result<Outcome, Error>),
}

/// Name to display until the profile is known
fn name_from_email(email: &str) -> String {
    String::from(email.split('@').next().unwrap_or(email))
}

impl Component for Login {
    type Message = LoginMsg;
    type Properties = LoginProps;

    fn create(_ctx: &Context<Self>) -> Self {
        Self {
            mode: Mode::Login,
            username: String::new(),
            email: String::new(),
            pass: String::new(),
            is_submitting: false,
            scope: RequestScope::new(),
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            LoginMsg::UsernameChanged(u) => self.username = u,
            LoginMsg::EmailChanged(e) => self.email = String::from(e.trim()),
            LoginMsg::PassChanged(p) => self.pass = p,
            LoginMsg::SwitchMode(m) => {
                self.mode = m;
                self.pass = String::new();
            }
            LoginMsg::SubmitClicked => {
                if self.is_submitting {
                    return false;
                }
                let client = ui::services(ctx).client;
                let email = self.email.clone();
                let fut: LocalBoxFuture<'static, Result<Outcome, Error>> = match self.mode {
                    Mode::Login => {
                        let session = NewSession {
                            email,
                            password: self.pass.clone(),
                        };
                        async move { client.login(&session).await.map(Outcome::LoggedIn) }
                            .boxed_local()
                    }
                    Mode::Register => {
                        let account = NewAccount {
                            username: self.username.trim().to_string(),
                            email,
                            password: self.pass.clone(),
                        };
                        async move { client.register(&account).await.map(|()| Outcome::Registered) }
                            .boxed_local()
                    }
                    Mode::Forgot => {
                        let req = OtpRequest { email };
                        async move {
                            client
                                .forgot_password(&req)
                                .await
                                .map(|()| Outcome::ResetRequested)
                        }
                        .boxed_local()
                    }
                };
                self.is_submitting = true;
                ui::spawn_scoped(ctx, &mut self.scope, async move { LoginMsg::Done(fut.await) });
            }
            LoginMsg::Done(res) => {
                self.is_submitting = false;
                let services = ui::services(ctx);
                match res {
                    Ok(Outcome::LoggedIn(token)) => {
                        let name = match self.username.trim() {
                            "" => name_from_email(&self.email),
                            u => String::from(u),
                        };
                        ctx.props().on_logged_in.emit((token, name));
                    }
                    Ok(Outcome::Registered) => {
                        services.success("Đăng ký thành công, vui lòng kiểm tra email để nhận mã OTP");
                        ctx.props()
                            .on_needs_otp
                            .emit((self.email.clone(), OtpPurpose::Register));
                    }
                    Ok(Outcome::ResetRequested) => {
                        services.success("Mã OTP đã được gửi tới email của bạn");
                        ctx.props()
                            .on_needs_otp
                            .emit((self.email.clone(), OtpPurpose::ResetPassword));
                    }
                    Err(e) => {
                        tracing::warn!(mode = ?self.mode, err = %e, "authentication request failed");
                        services.error(e.into());
                    }
                }
            }
        }
        true
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        macro_rules! callback_for {
            ($msg:ident) => {
                ctx.link().callback(|e: web_sys::Event| {
                    let input: web_sys::HtmlInputElement = e.target_unchecked_into();
                    LoginMsg::$msg(input.value())
                })
            };
        }
        let (title, submit) = match self.mode {
            Mode::Login => ("Đăng nhập", "Đăng nhập"),
            Mode::Register => ("Đăng ký", "Tạo tài khoản"),
            Mode::Forgot => ("Quên mật khẩu", "Gửi mã OTP"),
        };
        let switch = |m: Mode| ctx.link().callback(move |_| LoginMsg::SwitchMode(m));
        html! {<>
            <div class="text-center my-4">
                <h1>{ title }</h1>
            </div>
            <form class="login-form" onsubmit={ ctx.link().callback(|e: SubmitEvent| {
                e.prevent_default();
                LoginMsg::SubmitClicked
            }) }>
                if self.mode == Mode::Register {
                    <div class="input-group mb-3">
                        <label class="input-group-text col-xl-2" for="username">{ "Tên người dùng" }</label>
                        <input
                            type="text"
                            class="form-control form-control-lg"
                            id="username"
                            value={ self.username.clone() }
                            onchange={ callback_for!(UsernameChanged) }
                        />
                    </div>
                }
                <div class="input-group mb-3">
                    <label class="input-group-text col-xl-2" for="email">{ "Email" }</label>
                    <input
                        type="email"
                        class="form-control form-control-lg"
                        id="email"
                        placeholder="ban@example.org"
                        value={ self.email.clone() }
                        onchange={ callback_for!(EmailChanged) }
                    />
                </div>
                if self.mode != Mode::Forgot {
                    <div class="input-group mb-3">
                        <label class="input-group-text col-xl-2" for="pass">{ "Mật khẩu" }</label>
                        <input
                            type="password"
                            class="form-control form-control-lg"
                            id="pass"
                            value={ self.pass.clone() }
                            onchange={ callback_for!(PassChanged) }
                        />
                    </div>
                }
                <button type="submit" class="btn btn-primary" disabled={ self.is_submitting }>
                    if self.is_submitting {
                        <span class="spinner-border spinner-border-sm me-2" role="status"></span>
                    }
                    { submit }
                </button>
            </form>
            <div class="mt-3">
                if self.mode != Mode::Login {
                    <button class="btn btn-link" onclick={ switch(Mode::Login) }>{ "Đã có tài khoản? Đăng nhập" }</button>
                }
                if self.mode != Mode::Register {
                    <button class="btn btn-link" onclick={ switch(Mode::Register) }>{ "Tạo tài khoản" }</button>
                }
                if self.mode != Mode::Forgot {
                    <button class="btn btn-link" onclick={ switch(Mode::Forgot) }>{ "Quên mật khẩu?" }</button>
                }
            </div>
        </>}
    }
}
