use http::StatusCode;

const FALLBACK_MESSAGE: &str = "Đã xảy ra lỗi, vui lòng thử lại";
const NETWORK_MESSAGE: &str = "Không thể kết nối tới máy chủ";
const UNAUTHORIZED_MESSAGE: &str = "Phiên đăng nhập đã hết hạn, vui lòng đăng nhập lại";
const NOT_FOUND_MESSAGE: &str = "Không tìm thấy nội dung";

#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("Unauthorized")]
    Unauthorized,

    #[error("Not found")]
    NotFound,

    #[error("Request rejected with status {status}: {message:?}")]
    Rejected {
        status: u16,
        message: Option<String>,
    },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Failed decoding server response: {0}")]
    Decode(String),

    #[error("Invalid input: {0}")]
    Invalid(String),
}

impl Error {
    /// Builds an error out of a non-success response
    pub fn from_response(status: StatusCode, body: &[u8]) -> Error {
        match status {
            StatusCode::UNAUTHORIZED => return Error::Unauthorized,
            StatusCode::NOT_FOUND => return Error::NotFound,
            _ => (),
        }
        Error::Rejected {
            status: status.as_u16(),
            message: Self::parse_message(body),
        }
    }

    /// Extracts the human-readable message a server error body carries, if any
    pub fn parse_message(body: &[u8]) -> Option<String> {
        let data: serde_json::Value = match serde_json::from_slice(body) {
            Ok(data) => data,
            Err(_) => {
                let text = std::str::from_utf8(body).ok()?.trim();
                return (!text.is_empty() && text.len() < 200 && !text.starts_with('<'))
                    .then(|| String::from(text));
            }
        };
        ["message", "error", "detail"]
            .iter()
            .find_map(|k| data.get(k).and_then(|m| m.as_str()))
            .filter(|m| !m.trim().is_empty())
            .map(String::from)
    }

    pub fn status_code(&self) -> Option<StatusCode> {
        match self {
            Error::Unauthorized => Some(StatusCode::UNAUTHORIZED),
            Error::NotFound => Some(StatusCode::NOT_FOUND),
            Error::Rejected { status, .. } => StatusCode::from_u16(*status).ok(),
            Error::Network(_) | Error::Decode(_) | Error::Invalid(_) => None,
        }
    }

    /// Text to show the user in a toast
    pub fn user_message(&self) -> String {
        match self {
            Error::Unauthorized => String::from(UNAUTHORIZED_MESSAGE),
            Error::NotFound => String::from(NOT_FOUND_MESSAGE),
            Error::Rejected {
                message: Some(m), ..
            } => m.clone(),
            Error::Rejected { message: None, .. } | Error::Decode(_) => {
                String::from(FALLBACK_MESSAGE)
            }
            Error::Network(_) => String::from(NETWORK_MESSAGE),
            Error::Invalid(m) => m.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_message_wins() {
        let e = Error::from_response(
            StatusCode::BAD_REQUEST,
            br#"{"message":"Email already used","status":400}"#,
        );
        assert_eq!(e.user_message(), "Email already used");
        assert_eq!(e.status_code(), Some(StatusCode::BAD_REQUEST));
    }

    #[test]
    fn error_field_is_accepted() {
        assert_eq!(
            Error::parse_message(br#"{"error":"Bad OTP"}"#),
            Some(String::from("Bad OTP"))
        );
    }

    #[test]
    fn html_bodies_fall_back() {
        let e = Error::from_response(StatusCode::BAD_GATEWAY, b"<html>oops</html>");
        assert_eq!(e.user_message(), FALLBACK_MESSAGE);
    }

    #[test]
    fn plain_text_body_is_used() {
        let e = Error::from_response(StatusCode::CONFLICT, b"Already rated");
        assert_eq!(e.user_message(), "Already rated");
    }

    #[test]
    fn unauthorized_ignores_body() {
        let e = Error::from_response(StatusCode::UNAUTHORIZED, br#"{"message":"jwt expired"}"#);
        assert_eq!(e, Error::Unauthorized);
    }
}
