use crate::Error;

#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct NewSession {
    pub email: String,
    pub password: String,
}

impl NewSession {
    pub fn validate(&self) -> Result<(), Error> {
        crate::validate_string(&self.email)?;
        crate::validate_string(&self.password)?;
        if self.email.trim().is_empty() || self.password.is_empty() {
            return Err(Error::Invalid(String::from(
                "Vui lòng nhập email và mật khẩu",
            )));
        }
        Ok(())
    }
}

#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct NewAccount {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl NewAccount {
    pub fn validate(&self) -> Result<(), Error> {
        crate::validate_string(&self.username)?;
        crate::validate_string(&self.email)?;
        crate::validate_string(&self.password)?;
        if !self.email.contains('@') {
            return Err(Error::Invalid(String::from("Email không hợp lệ")));
        }
        if self.password.chars().count() < 6 {
            return Err(Error::Invalid(String::from(
                "Mật khẩu phải có ít nhất 6 ký tự",
            )));
        }
        Ok(())
    }
}

/// Bearer token handed out by the login endpoint
#[derive(Clone, Debug, Eq, Hash, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(transparent)]
pub struct AuthToken(pub String);

#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct OtpRequest {
    pub email: String,
}

#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct OtpVerification {
    pub email: String,
    pub otp: String,
}

#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct PasswordReset {
    pub email: String,
    pub otp: String,
    #[serde(rename = "newPassword")]
    pub new_password: String,
}
