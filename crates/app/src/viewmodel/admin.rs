//! Admin panel view model
//!
//! Holds the login form, the status line, the fetched collections and one
//! draft form per editable collection. Every backend failure ends up as
//! status text; nothing is retried.

use std::future::Future;

use csquare_core::{
    Event, EventDraft, FacultyDraft, FacultyMember, GalleryDraft, GalleryItem, TeamMember,
    TeamMemberDraft, Toast, ToastDraft,
};
use csquare_net::{ApiClient, Error as NetError, ImageUpload, Resource};
use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};

pub const SESSION_EXPIRED: &str = "Session expired. Please login again.";
pub const AUTH_UNAVAILABLE: &str =
    "Authentication service unavailable. Please check if the backend server is running.";
pub const VERIFY_FAILED: &str =
    "Unable to verify session. Please check your connection and try again.";
pub const MISSING_CREDENTIALS: &str = "Please enter both username and password.";
pub const LOGIN_SUCCEEDED: &str = "Login successful!";
pub const LOGIN_FAILED: &str = "Login failed. Please try again.";
pub const LOAD_FAILED: &str = "Failed to load admin data. Please try again.";
pub const TOASTS_FAILED: &str = "Failed to fetch toasts";

/// Backend operations the admin panel needs
pub trait AdminApi: Send + Sync {
    fn has_token(&self) -> bool;
    fn verify(&self) -> impl Future<Output = csquare_net::Result<bool>> + Send;
    fn login(
        &self,
        username: &str,
        password: &str,
    ) -> impl Future<Output = csquare_net::Result<String>> + Send;
    fn logout(&self) -> csquare_net::Result<()>;
    /// Events, team, every gallery item and faculty, all or nothing
    fn fetch_all(&self) -> impl Future<Output = csquare_net::Result<AdminData>> + Send;
    fn toasts(&self) -> impl Future<Output = csquare_net::Result<Vec<Toast>>> + Send;
    fn create(
        &self,
        resource: Resource,
        body: Value,
    ) -> impl Future<Output = csquare_net::Result<Value>> + Send;
    fn update(
        &self,
        resource: Resource,
        id: &str,
        body: Value,
    ) -> impl Future<Output = csquare_net::Result<Value>> + Send;
    fn remove(
        &self,
        resource: Resource,
        id: &str,
    ) -> impl Future<Output = csquare_net::Result<Value>> + Send;
    fn upload_toast_photo(
        &self,
        image: ImageUpload,
    ) -> impl Future<Output = csquare_net::Result<String>> + Send;
}

impl AdminApi for ApiClient {
    fn has_token(&self) -> bool {
        ApiClient::has_token(self)
    }

    async fn verify(&self) -> csquare_net::Result<bool> {
        ApiClient::verify(self).await
    }

    async fn login(&self, username: &str, password: &str) -> csquare_net::Result<String> {
        ApiClient::login(self, username, password).await
    }

    fn logout(&self) -> csquare_net::Result<()> {
        ApiClient::logout(self)
    }

    async fn fetch_all(&self) -> csquare_net::Result<AdminData> {
        let (events, team, gallery, faculty) = tokio::try_join!(
            self.events(),
            self.team(),
            self.all_gallery(),
            self.faculty(),
        )?;
        Ok(AdminData {
            events,
            team,
            gallery,
            faculty,
        })
    }

    async fn toasts(&self) -> csquare_net::Result<Vec<Toast>> {
        ApiClient::toasts(self).await
    }

    async fn create(&self, resource: Resource, body: Value) -> csquare_net::Result<Value> {
        ApiClient::create(self, resource, &body).await
    }

    async fn update(&self, resource: Resource, id: &str, body: Value) -> csquare_net::Result<Value> {
        ApiClient::update(self, resource, id, &body).await
    }

    async fn remove(&self, resource: Resource, id: &str) -> csquare_net::Result<Value> {
        ApiClient::remove(self, resource, id).await
    }

    async fn upload_toast_photo(&self, image: ImageUpload) -> csquare_net::Result<String> {
        ApiClient::upload_toast_photo(self, image).await
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    pub kind: StatusKind,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AdminData {
    pub events: Vec<Event>,
    pub team: Vec<TeamMember>,
    pub gallery: Vec<GalleryItem>,
    pub faculty: Vec<FacultyMember>,
}

/// Kind of record an admin action targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    Event,
    TeamMember,
    FacultyMember,
    GalleryItem,
    Toast,
}

impl Entity {
    fn label(&self) -> &'static str {
        match self {
            Entity::Event => "Event",
            Entity::TeamMember => "Team member",
            Entity::FacultyMember => "Faculty member",
            Entity::GalleryItem => "Gallery item",
            Entity::Toast => "Toast",
        }
    }

    fn resource(&self) -> Resource {
        match self {
            Entity::Event => Resource::Events,
            Entity::TeamMember => Resource::Team,
            Entity::FacultyMember => Resource::Faculty,
            Entity::GalleryItem => Resource::Gallery,
            Entity::Toast => Resource::Toasts,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Verb {
    Add,
    Update,
    Delete,
}

impl Verb {
    fn present(&self) -> &'static str {
        match self {
            Verb::Add => "add",
            Verb::Update => "update",
            Verb::Delete => "delete",
        }
    }

    fn past(&self) -> &'static str {
        match self {
            Verb::Add => "added",
            Verb::Update => "updated",
            Verb::Delete => "deleted",
        }
    }
}

/// A draft plus the id of the record being edited, if any
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Form<D> {
    pub draft: D,
    editing: Option<String>,
}

impl<D: Default> Form<D> {
    pub fn editing(&self) -> Option<&str> {
        self.editing.as_deref()
    }

    pub fn reset(&mut self) {
        self.draft = D::default();
        self.editing = None;
    }

    fn start_edit(&mut self, id: &str, draft: D) {
        self.draft = draft;
        self.editing = Some(id.to_string());
    }
}

/// Admin panel state over an [`AdminApi`]
pub struct AdminSession<A> {
    api: A,
    authenticated: bool,
    status: Option<Status>,
    pub credentials: Credentials,
    data: AdminData,
    toasts: Vec<Toast>,
    pub event_form: Form<EventDraft>,
    pub member_form: Form<TeamMemberDraft>,
    pub faculty_form: Form<FacultyDraft>,
    pub gallery_form: Form<GalleryDraft>,
    pub toast_form: Form<ToastDraft>,
    pub toast_photo: Option<ImageUpload>,
}

impl<A: AdminApi> AdminSession<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            authenticated: false,
            status: None,
            credentials: Credentials::default(),
            data: AdminData::default(),
            toasts: Vec::new(),
            event_form: Form::default(),
            member_form: Form::default(),
            faculty_form: Form::default(),
            gallery_form: Form::default(),
            toast_form: Form::default(),
            toast_photo: None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    pub fn status(&self) -> Option<&Status> {
        self.status.as_ref()
    }

    pub fn data(&self) -> &AdminData {
        &self.data
    }

    pub fn toasts(&self) -> &[Toast] {
        &self.toasts
    }

    /// Resume a stored session, verifying the token with the backend
    pub async fn restore(&mut self) -> bool {
        if !self.api.has_token() {
            self.authenticated = false;
            return false;
        }

        match self.api.verify().await {
            Ok(true) => {
                info!("Restored admin session");
                self.authenticated = true;
                self.load().await;
                true
            }
            Ok(false) => {
                self.drop_session(SESSION_EXPIRED);
                false
            }
            Err(err) => {
                warn!(error = %err, "Token verification failed");
                let message = match err.status() {
                    Some(404) => AUTH_UNAVAILABLE,
                    Some(401) => SESSION_EXPIRED,
                    _ => VERIFY_FAILED,
                };
                self.drop_session(message);
                false
            }
        }
    }

    pub async fn login(&mut self) -> bool {
        let username = self.credentials.username.trim().to_lowercase();
        let password = self.credentials.password.trim().to_string();
        if username.is_empty() || password.is_empty() {
            self.set_error(MISSING_CREDENTIALS);
            return false;
        }

        self.status = None;
        match self.api.login(&username, &password).await {
            Ok(_) => {
                self.authenticated = true;
                self.credentials = Credentials::default();
                self.set_success(LOGIN_SUCCEEDED);
                self.load().await;
                true
            }
            Err(err) => {
                warn!(error = %err, "Login failed");
                let message = err.server_message().unwrap_or(LOGIN_FAILED).to_string();
                self.set_error(message);
                self.credentials.password.clear();
                false
            }
        }
    }

    pub fn logout(&mut self) {
        self.forget_token();
        self.authenticated = false;
        self.credentials = Credentials::default();
        self.data = AdminData::default();
        self.toasts.clear();
    }

    /// Fetch every collection the panel edits
    pub async fn load(&mut self) -> bool {
        if !self.authenticated {
            return false;
        }

        match self.api.fetch_all().await {
            Ok(data) => {
                self.data = data;
            }
            Err(NetError::Unauthorized) => {
                self.drop_session(SESSION_EXPIRED);
                return false;
            }
            Err(err) => {
                warn!(error = %err, "Failed to load admin data");
                self.set_error(LOAD_FAILED);
                return false;
            }
        }
        self.load_toasts().await
    }

    pub async fn load_toasts(&mut self) -> bool {
        match self.api.toasts().await {
            Ok(toasts) => {
                self.toasts = toasts;
                true
            }
            Err(err) => {
                warn!(error = %err, "Failed to fetch toasts");
                self.set_error(TOASTS_FAILED);
                false
            }
        }
    }

    /// Load a record into its form for editing; false when the id is unknown
    pub fn start_edit(&mut self, entity: Entity, id: &str) -> bool {
        match entity {
            Entity::Event => match self.data.events.iter().find(|e| e.id == id) {
                Some(event) => self.event_form.start_edit(id, event.into()),
                None => return false,
            },
            Entity::TeamMember => match self.data.team.iter().find(|m| m.id == id) {
                Some(member) => self.member_form.start_edit(id, member.into()),
                None => return false,
            },
            Entity::FacultyMember => match self.data.faculty.iter().find(|m| m.id == id) {
                Some(member) => self.faculty_form.start_edit(id, member.into()),
                None => return false,
            },
            Entity::GalleryItem => match self.data.gallery.iter().find(|g| g.id == id) {
                Some(item) => self.gallery_form.start_edit(id, item.into()),
                None => return false,
            },
            Entity::Toast => return false,
        }
        true
    }

    pub fn cancel_edit(&mut self, entity: Entity) {
        match entity {
            Entity::Event => self.event_form.reset(),
            Entity::TeamMember => self.member_form.reset(),
            Entity::FacultyMember => self.faculty_form.reset(),
            Entity::GalleryItem => self.gallery_form.reset(),
            Entity::Toast => {
                self.toast_form.reset();
                self.toast_photo = None;
            }
        }
    }

    pub async fn save_event(&mut self) -> bool {
        let body = to_body(&self.event_form.draft);
        let editing = self.event_form.editing.clone();
        let saved = self.save(Entity::Event, body, editing).await;
        if saved {
            self.event_form.reset();
        }
        saved
    }

    pub async fn save_member(&mut self) -> bool {
        let body = to_body(&self.member_form.draft);
        let editing = self.member_form.editing.clone();
        let saved = self.save(Entity::TeamMember, body, editing).await;
        if saved {
            self.member_form.reset();
        }
        saved
    }

    pub async fn save_faculty(&mut self) -> bool {
        let body = to_body(&self.faculty_form.draft);
        let editing = self.faculty_form.editing.clone();
        let saved = self.save(Entity::FacultyMember, body, editing).await;
        if saved {
            self.faculty_form.reset();
        }
        saved
    }

    /// Blank event ids are sent as absent and the description is trimmed
    pub async fn save_gallery_item(&mut self) -> bool {
        let draft = &self.gallery_form.draft;
        let normalized = GalleryDraft {
            title: draft.title.clone(),
            description: draft.description.trim().to_string(),
            image_url: draft.image_url.clone(),
            event_id: draft
                .event_id
                .as_deref()
                .map(str::trim)
                .filter(|id| !id.is_empty())
                .map(str::to_string),
        };
        let editing = self.gallery_form.editing.clone();
        let saved = self
            .save(Entity::GalleryItem, to_body(&normalized), editing)
            .await;
        if saved {
            self.gallery_form.reset();
        }
        saved
    }

    /// Upload the pending photo (if any), then create the toast
    pub async fn save_toast(&mut self) -> bool {
        let photo_url = match self.toast_photo.clone() {
            Some(image) => match self.api.upload_toast_photo(image).await {
                Ok(url) => Some(url),
                Err(err) => {
                    self.report_failure(Entity::Toast, Verb::Add, &err);
                    return false;
                }
            },
            None => None,
        };

        let payload = self.toast_form.draft.to_payload(photo_url.as_deref());
        let saved = self.save(Entity::Toast, to_body(&payload), None).await;
        if saved {
            self.toast_form.reset();
            self.toast_photo = None;
        }
        saved
    }

    pub async fn delete(&mut self, entity: Entity, id: &str) -> bool {
        let result = self.api.remove(entity.resource(), id).await;
        self.finish(entity, Verb::Delete, result).await
    }

    async fn save(&mut self, entity: Entity, body: Value, editing: Option<String>) -> bool {
        let (verb, result) = match editing {
            Some(id) => (
                Verb::Update,
                self.api.update(entity.resource(), &id, body).await,
            ),
            None => (Verb::Add, self.api.create(entity.resource(), body).await),
        };
        self.finish(entity, verb, result).await
    }

    async fn finish(&mut self, entity: Entity, verb: Verb, result: csquare_net::Result<Value>) -> bool {
        match result {
            Ok(_) => {
                info!(entity = entity.label(), action = verb.past(), "Admin change saved");
                let message = format!("{} {} successfully!", entity.label(), verb.past());
                self.set_success(message.clone());
                let reloaded = match entity {
                    Entity::Toast => self.load_toasts().await,
                    _ => self.load().await,
                };
                // Only the refresh failed; the write itself succeeded
                if !reloaded && self.authenticated {
                    warn!(entity = entity.label(), "Reload after admin change failed");
                    self.set_success(message);
                }
                true
            }
            Err(err) => {
                self.report_failure(entity, verb, &err);
                false
            }
        }
    }

    fn report_failure(&mut self, entity: Entity, verb: Verb, err: &NetError) {
        warn!(entity = entity.label(), action = verb.present(), error = %err, "Admin change failed");
        if matches!(err, NetError::Unauthorized) {
            self.drop_session(SESSION_EXPIRED);
            return;
        }

        let fallback = format!(
            "Failed to {} {}",
            verb.present(),
            entity.label().to_lowercase()
        );
        let message = match (verb, err.server_message()) {
            (Verb::Delete, Some(detail)) => format!("{}: {}", fallback, detail),
            _ => err.user_message(&fallback),
        };
        self.set_error(message);
    }

    fn drop_session(&mut self, message: &str) {
        self.forget_token();
        self.authenticated = false;
        self.set_error(message);
    }

    fn forget_token(&self) {
        if let Err(err) = self.api.logout() {
            warn!(error = %err, "Failed to clear stored token");
        }
    }

    fn set_success(&mut self, message: impl Into<String>) {
        self.status = Some(Status {
            kind: StatusKind::Success,
            message: message.into(),
        });
    }

    fn set_error(&mut self, message: impl Into<String>) {
        self.status = Some(Status {
            kind: StatusKind::Error,
            message: message.into(),
        });
    }
}

fn to_body<T: Serialize>(draft: &T) -> Value {
    serde_json::to_value(draft).unwrap_or(Value::Null)
}
