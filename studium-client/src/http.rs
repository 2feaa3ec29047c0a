use async_trait::async_trait;
use reqwest::{
    multipart::{Form, Part},
    RequestBuilder, Response,
};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::{
    api::{
        AuthToken, CommentEdit, CommentId, EntityRef, Error, ListQuery, NewAccount, NewComment,
        NewRating, NewSession, OtpRequest, OtpVerification, Page, PasswordReset, Rating,
        RatingSummary, Resource, StudySet, UploadedImage,
    },
    Attachment, GenerationRequest, GenerationSource, InteractionsApi,
};

/// Unsigned-upload image host
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ImageHost {
    pub base_url: String,
    pub cloud_name: String,
    pub upload_preset: String,
}

impl ImageHost {
    fn upload_url(&self) -> String {
        format!(
            "{}/{}/image/upload",
            self.base_url.trim_end_matches('/'),
            self.cloud_name
        )
    }
}

#[derive(serde::Deserialize)]
struct TokenResponse {
    #[serde(alias = "accessToken", alias = "jwt")]
    token: String,
}

/// The one HTTP client of the application
///
/// Every request carries the bearer token, except the ones that exist to
/// obtain one.
#[derive(Clone, Debug)]
pub struct ApiClient {
    host: String,
    token: Option<AuthToken>,
    client: reqwest::Client,
}

impl ApiClient {
    pub fn new(host: impl Into<String>) -> ApiClient {
        let host: String = host.into();
        ApiClient {
            host: String::from(host.trim_end_matches('/')),
            token: None,
            client: reqwest::Client::new(),
        }
    }

    pub fn with_token(mut self, token: Option<AuthToken>) -> ApiClient {
        self.token = token;
        self
    }

    pub fn set_token(&mut self, token: Option<AuthToken>) {
        self.token = token;
    }

    pub fn token(&self) -> Option<&AuthToken> {
        self.token.as_ref()
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.host, path.trim_start_matches('/'))
    }

    fn authed(&self, req: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(t) => req.bearer_auth(&t.0),
            None => req,
        }
    }

    async fn send(req: RequestBuilder) -> Result<Response, Error> {
        let resp = req
            .send()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;
        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.bytes().await.unwrap_or_default();
            return Err(Error::from_response(status, &body));
        }
        Ok(resp)
    }

    async fn parse<T: DeserializeOwned>(resp: Response) -> Result<T, Error> {
        resp.json().await.map_err(|e| Error::Decode(e.to_string()))
    }

    /// Reads a body that may legitimately be empty
    async fn parse_value(resp: Response) -> Result<Value, Error> {
        let body = resp
            .bytes()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }
        serde_json::from_slice(&body).map_err(|e| Error::Decode(e.to_string()))
    }

    // Authentication

    pub async fn login(&self, session: &NewSession) -> Result<AuthToken, Error> {
        session.validate()?;
        let resp = Self::send(self.client.post(self.url("auth/login")).json(session)).await?;
        let TokenResponse { token } = Self::parse(resp).await?;
        Ok(AuthToken(token))
    }

    pub async fn register(&self, account: &NewAccount) -> Result<(), Error> {
        account.validate()?;
        Self::send(self.client.post(self.url("auth/register")).json(account)).await?;
        Ok(())
    }

    pub async fn verify_otp(&self, v: &OtpVerification) -> Result<(), Error> {
        Self::send(self.client.post(self.url("auth/verify-otp")).json(v)).await?;
        Ok(())
    }

    pub async fn resend_otp(&self, r: &OtpRequest) -> Result<(), Error> {
        Self::send(self.client.post(self.url("auth/resend-otp")).json(r)).await?;
        Ok(())
    }

    pub async fn forgot_password(&self, r: &OtpRequest) -> Result<(), Error> {
        Self::send(self.client.post(self.url("auth/forgot-password")).json(r)).await?;
        Ok(())
    }

    pub async fn reset_password(&self, r: &PasswordReset) -> Result<(), Error> {
        Self::send(self.client.post(self.url("auth/reset-password")).json(r)).await?;
        Ok(())
    }

    // Content

    pub async fn list<T: Resource>(&self, query: &ListQuery) -> Result<Page<T>, Error> {
        let req = self
            .authed(self.client.get(self.url(T::COLLECTION)))
            .query(&query.to_pairs());
        Self::parse(Self::send(req).await?).await
    }

    pub async fn get<T: Resource>(&self, id: i64) -> Result<T, Error> {
        let req = self.authed(self.client.get(self.url(&format!("{}/{id}", T::COLLECTION))));
        Self::parse(Self::send(req).await?).await
    }

    pub async fn delete<T: Resource>(&self, id: i64) -> Result<(), Error> {
        let req = self.authed(
            self.client
                .delete(self.url(&format!("{}/{id}", T::COLLECTION))),
        );
        Self::send(req).await?;
        Ok(())
    }

    pub async fn create_set<T: StudySet>(&self, set: &T, files: &[Attachment]) -> Result<T, Error> {
        set.validate()?;
        let req = self
            .authed(self.client.post(self.url(T::COLLECTION)))
            .multipart(set_form(set, files)?);
        Self::parse(Self::send(req).await?).await
    }

    pub async fn update_set<T: StudySet>(
        &self,
        id: i64,
        set: &T,
        files: &[Attachment],
    ) -> Result<T, Error> {
        set.validate()?;
        let req = self
            .authed(self.client.put(self.url(&format!("{}/{id}", T::COLLECTION))))
            .multipart(set_form(set, files)?);
        Self::parse(Self::send(req).await?).await
    }

    pub async fn generate<T: StudySet>(&self, request: &GenerationRequest) -> Result<T, Error> {
        let req = self
            .authed(self.client.post(self.url(&format!("{}/generate", T::COLLECTION))))
            .multipart(generation_form(request)?);
        Self::parse(Self::send(req).await?).await
    }

    /// Uploads to the third-party host, which must not see our token
    pub async fn upload_image(
        &self,
        host: &ImageHost,
        image: &Attachment,
    ) -> Result<UploadedImage, Error> {
        let form = Form::new()
            .part("file", file_part(image)?)
            .text("upload_preset", host.upload_preset.clone());
        let req = self.client.post(host.upload_url()).multipart(form);
        Self::parse(Self::send(req).await?).await
    }
}

fn file_part(a: &Attachment) -> Result<Part, Error> {
    Part::bytes(a.bytes.clone())
        .file_name(a.name.clone())
        .mime_str(&a.mime)
        .map_err(|e| Error::Invalid(format!("invalid mime type {:?}: {e}", a.mime)))
}

fn set_form<T: StudySet>(set: &T, files: &[Attachment]) -> Result<Form, Error> {
    let json = serde_json::to_string(set).map_err(|e| Error::Invalid(e.to_string()))?;
    let blob = Part::text(json)
        .mime_str("application/json")
        .map_err(|e| Error::Invalid(e.to_string()))?;
    let mut form = Form::new().part(T::FORM_PART, blob);
    for f in files {
        form = form.part("files", file_part(f)?);
    }
    Ok(form)
}

fn generation_form(request: &GenerationRequest) -> Result<Form, Error> {
    let form = Form::new().text("count", request.item_count.to_string());
    Ok(match &request.source {
        GenerationSource::Text(t) => form.text("text", t.clone()),
        GenerationSource::Document(d) => form.part("document", file_part(d)?),
        GenerationSource::Images(images) => {
            let mut form = form;
            for i in images {
                form = form.part("images", file_part(i)?);
            }
            form
        }
    })
}

#[async_trait(?Send)]
impl InteractionsApi for ApiClient {
    async fn list_comments(&self, entity: EntityRef) -> Result<Value, Error> {
        let req = self.authed(
            self.client
                .get(self.url(&format!("interactions/{}/comments", entity.path()))),
        );
        Self::parse_value(Self::send(req).await?).await
    }

    async fn post_comment(&self, entity: EntityRef, comment: &NewComment) -> Result<Value, Error> {
        let req = self
            .authed(
                self.client
                    .post(self.url(&format!("interactions/{}/comment", entity.path()))),
            )
            .json(comment);
        Self::parse_value(Self::send(req).await?).await
    }

    async fn edit_comment(&self, id: CommentId, edit: &CommentEdit) -> Result<(), Error> {
        let req = self
            .authed(self.client.put(self.url(&format!("interactions/comment/{id}"))))
            .json(edit);
        Self::send(req).await?;
        Ok(())
    }

    async fn delete_comment(&self, id: CommentId) -> Result<(), Error> {
        let req = self.authed(
            self.client
                .delete(self.url(&format!("interactions/comment/{id}"))),
        );
        Self::send(req).await?;
        Ok(())
    }

    async fn rating_summary(&self, entity: EntityRef) -> Result<RatingSummary, Error> {
        let req = self.authed(
            self.client
                .get(self.url(&format!("interactions/{}/rating", entity.path()))),
        );
        Self::parse(Self::send(req).await?).await
    }

    async fn my_rating(&self, entity: EntityRef) -> Result<Option<Rating>, Error> {
        let req = self.authed(
            self.client
                .get(self.url(&format!("interactions/{}/rating/my", entity.path()))),
        );
        match Self::send(req).await {
            Ok(resp) => {
                let v = Self::parse_value(resp).await?;
                if v.is_null() {
                    return Ok(None);
                }
                serde_json::from_value(v)
                    .map(Some)
                    .map_err(|e| Error::Decode(e.to_string()))
            }
            Err(Error::NotFound) => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn create_rating(&self, entity: EntityRef, rating: NewRating) -> Result<(), Error> {
        let req = self
            .authed(
                self.client
                    .post(self.url(&format!("interactions/{}/rating/my", entity.path()))),
            )
            .json(&rating);
        Self::send(req).await?;
        Ok(())
    }

    async fn update_rating(&self, entity: EntityRef, rating: NewRating) -> Result<(), Error> {
        let req = self
            .authed(
                self.client
                    .put(self.url(&format!("interactions/{}/rating/my", entity.path()))),
            )
            .json(&rating);
        Self::send(req).await?;
        Ok(())
    }

    async fn delete_rating(&self, entity: EntityRef) -> Result<(), Error> {
        let req = self.authed(
            self.client
                .delete(self.url(&format!("interactions/{}/rating/my", entity.path()))),
        );
        Self::send(req).await?;
        Ok(())
    }
}
