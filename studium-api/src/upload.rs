/// Response of the third-party image host
#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct UploadedImage {
    #[serde(alias = "url")]
    pub secure_url: String,
}
