use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use uuid::Uuid;

use notehub_types::api::{
    Ack, AdminLoginRequest, AdminLoginResponse, ContactRequest, InquiriesResponse, LoginRequest,
    LoginResponse, NotesResponse, NotesWithOwnerResponse, RegisterRequest, SetTrashRequest,
    StatsResponse, UpdateProfileResponse, UploadNoteResponse, UsersResponse,
};
use notehub_types::models::{Category, Inquiry, Note, NoteWithOwner, Stats, UserWithNoteCount};

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// The server answered with its error envelope.
    #[error("server said ({status}): {message}")]
    Api { status: StatusCode, message: String },
}

/// Typed client for the NoteHub API. Holds the bearer token once a login
/// succeeds; logout is simply [`ApiClient::clear_token`].
pub struct ApiClient {
    http: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            http: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
        }
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn clear_token(&mut self) {
        self.token = None;
    }

    /// URL a stored blob is served from.
    pub fn upload_url(&self, file_name: &str) -> String {
        format!("{}/uploads/{}", self.base_url, file_name)
    }

    // -- Auth --

    pub async fn register(
        &self,
        first_name: &str,
        email: &str,
        password: &str,
    ) -> Result<Ack, ClientError> {
        let req = RegisterRequest {
            first_name: first_name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        };
        self.execute(self.post("/api/users/register").json(&req)).await
    }

    /// Log in and keep the returned token for subsequent calls.
    pub async fn login(&mut self, email: &str, password: &str) -> Result<LoginResponse, ClientError> {
        let req = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let resp: LoginResponse = self.execute(self.post("/api/users/login").json(&req)).await?;
        self.token = Some(resp.token.clone());
        Ok(resp)
    }

    pub async fn admin_login(
        &mut self,
        email: &str,
        password: &str,
    ) -> Result<AdminLoginResponse, ClientError> {
        let req = AdminLoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let resp: AdminLoginResponse =
            self.execute(self.post("/api/admin/login").json(&req)).await?;
        self.token = Some(resp.token.clone());
        Ok(resp)
    }

    // -- Notes --

    pub async fn user_notes(&self, user_id: Uuid) -> Result<Vec<Note>, ClientError> {
        let resp: NotesResponse = self
            .execute(self.get(&format!("/api/users/notes/user/{user_id}")))
            .await?;
        Ok(resp.notes)
    }

    pub async fn upload_note(
        &self,
        title: &str,
        category: Category,
        user_id: Uuid,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<UploadNoteResponse, ClientError> {
        let form = Form::new()
            .text("title", title.to_string())
            .text("category", category.as_str().to_string())
            .text("userId", user_id.to_string())
            .part("file", Part::bytes(bytes).file_name(file_name.to_string()));

        self.execute(self.post("/api/users/upload-note").multipart(form))
            .await
    }

    pub async fn set_trash_status(
        &self,
        note_id: Uuid,
        is_deleted: bool,
    ) -> Result<Ack, ClientError> {
        let req = SetTrashRequest { is_deleted };
        self.execute(
            self.request(reqwest::Method::PATCH, &format!("/api/users/notes/trash/{note_id}"))
                .json(&req),
        )
        .await
    }

    pub async fn delete_note(&self, note_id: Uuid) -> Result<Ack, ClientError> {
        self.execute(self.request(reqwest::Method::DELETE, &format!("/api/users/notes/{note_id}")))
            .await
    }

    pub async fn empty_trash(&self, user_id: Uuid) -> Result<Ack, ClientError> {
        self.execute(self.request(
            reqwest::Method::DELETE,
            &format!("/api/users/notes/trash/empty/{user_id}"),
        ))
        .await
    }

    pub async fn restore_all_trash(&self, user_id: Uuid) -> Result<Ack, ClientError> {
        self.execute(self.post(&format!("/api/users/notes/trash/restore-all/{user_id}")))
            .await
    }

    // -- Profile --

    pub async fn update_profile(
        &self,
        user_id: Uuid,
        first_name: Option<&str>,
        current_password: &str,
        new_password: Option<&str>,
        profile_image: Option<(&str, Vec<u8>)>,
    ) -> Result<UpdateProfileResponse, ClientError> {
        let mut form = Form::new()
            .text("userId", user_id.to_string())
            .text("currentPassword", current_password.to_string());
        if let Some(name) = first_name {
            form = form.text("firstName", name.to_string());
        }
        if let Some(password) = new_password {
            form = form.text("newPassword", password.to_string());
        }
        if let Some((name, bytes)) = profile_image {
            form = form.part("profileImage", Part::bytes(bytes).file_name(name.to_string()));
        }

        self.execute(self.post("/api/users/update-profile").multipart(form))
            .await
    }

    // -- Contact --

    pub async fn submit_inquiry(
        &self,
        name: &str,
        email: &str,
        subject: &str,
        message: &str,
    ) -> Result<Ack, ClientError> {
        let req = ContactRequest {
            name: name.to_string(),
            email: email.to_string(),
            subject: subject.to_string(),
            message: message.to_string(),
        };
        self.execute(self.post("/api/users/contact").json(&req)).await
    }

    // -- Public browse --

    pub async fn public_notes(&self) -> Result<Vec<NoteWithOwner>, ClientError> {
        let resp: NotesWithOwnerResponse = self.execute(self.get("/api/public/notes")).await?;
        Ok(resp.notes)
    }

    // -- Admin --

    pub async fn admin_users(&self) -> Result<Vec<UserWithNoteCount>, ClientError> {
        let resp: UsersResponse = self.execute(self.get("/api/admin/all-users")).await?;
        Ok(resp.users)
    }

    pub async fn admin_delete_user(&self, user_id: Uuid) -> Result<Ack, ClientError> {
        self.execute(self.request(reqwest::Method::DELETE, &format!("/api/admin/user/{user_id}")))
            .await
    }

    pub async fn admin_notes(&self) -> Result<Vec<NoteWithOwner>, ClientError> {
        let resp: NotesWithOwnerResponse = self.execute(self.get("/api/admin/all-notes")).await?;
        Ok(resp.notes)
    }

    pub async fn admin_trash_note(&self, note_id: Uuid) -> Result<Ack, ClientError> {
        self.execute(
            self.request(reqwest::Method::PATCH, &format!("/api/admin/trash-note/{note_id}")),
        )
        .await
    }

    pub async fn admin_restore_note(&self, note_id: Uuid) -> Result<Ack, ClientError> {
        self.execute(
            self.request(reqwest::Method::PATCH, &format!("/api/admin/restore-note/{note_id}")),
        )
        .await
    }

    pub async fn admin_delete_note(&self, note_id: Uuid) -> Result<Ack, ClientError> {
        self.execute(
            self.request(reqwest::Method::DELETE, &format!("/api/admin/note-delete/{note_id}")),
        )
        .await
    }

    pub async fn admin_stats(&self) -> Result<Stats, ClientError> {
        let resp: StatsResponse = self.execute(self.get("/api/admin/stats")).await?;
        Ok(resp.stats)
    }

    pub async fn admin_queries(&self) -> Result<Vec<Inquiry>, ClientError> {
        let resp: InquiriesResponse = self.execute(self.get("/api/admin/queries")).await?;
        Ok(resp.queries)
    }

    pub async fn admin_delete_query(&self, inquiry_id: Uuid) -> Result<Ack, ClientError> {
        self.execute(
            self.request(reqwest::Method::DELETE, &format!("/api/admin/query/{inquiry_id}")),
        )
        .await
    }

    pub async fn admin_trash_notes(&self) -> Result<Vec<NoteWithOwner>, ClientError> {
        let resp: NotesWithOwnerResponse = self.execute(self.get("/api/admin/trash-notes")).await?;
        Ok(resp.notes)
    }

    pub async fn admin_empty_trash(&self) -> Result<Ack, ClientError> {
        self.execute(self.request(reqwest::Method::DELETE, "/api/admin/empty-trash"))
            .await
    }

    pub async fn admin_restore_all_trash(&self) -> Result<Ack, ClientError> {
        self.execute(self.post("/api/admin/restore-all-trash")).await
    }

    // -- Plumbing --

    fn get(&self, path: &str) -> RequestBuilder {
        self.request(reqwest::Method::GET, path)
    }

    fn post(&self, path: &str) -> RequestBuilder {
        self.request(reqwest::Method::POST, path)
    }

    fn request(&self, method: reqwest::Method, path: &str) -> RequestBuilder {
        let mut builder = self.http.request(method, format!("{}{}", self.base_url, path));
        if let Some(token) = &self.token {
            builder = builder.bearer_auth(token);
        }
        builder
    }

    async fn execute<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, ClientError> {
        let resp = builder.send().await?;
        decode(resp).await
    }
}

async fn decode<T: DeserializeOwned>(resp: Response) -> Result<T, ClientError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp.json::<T>().await?);
    }

    // Pull the message out of the error envelope when there is one.
    let message = match resp.json::<Ack>().await {
        Ok(ack) => ack.message,
        Err(_) => status
            .canonical_reason()
            .unwrap_or("unexpected response")
            .to_string(),
    };
    Err(ClientError::Api { status, message })
}
