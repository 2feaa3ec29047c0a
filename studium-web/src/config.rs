//! Deployment settings, baked in at build time

use studium_client::ImageHost;

const DEFAULT_API_URL: &str = "http://localhost:8080/api";
const DEFAULT_UPLOAD_URL: &str = "https://api.cloudinary.com/v1_1";
const DEFAULT_UPLOAD_CLOUD: &str = "studium";
const DEFAULT_UPLOAD_PRESET: &str = "studium_unsigned";

pub fn api_url() -> &'static str {
    option_env!("STUDIUM_API_URL").unwrap_or(DEFAULT_API_URL)
}

pub fn image_host() -> ImageHost {
    ImageHost {
        base_url: String::from(option_env!("STUDIUM_UPLOAD_URL").unwrap_or(DEFAULT_UPLOAD_URL)),
        cloud_name: String::from(option_env!("STUDIUM_UPLOAD_CLOUD").unwrap_or(DEFAULT_UPLOAD_CLOUD)),
        upload_preset: String::from(
            option_env!("STUDIUM_UPLOAD_PRESET").unwrap_or(DEFAULT_UPLOAD_PRESET),
        ),
    }
}
