//! HTTP client for the deck backend's REST API.

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::{de::DeserializeOwned, Serialize};
use shared::{
    domain::{ProjectId, SlideId},
    protocol::{
        AddSlideRequest, AddSlideResponse, GenerateOutlineRequest, GeneratePresentationRequest,
        GeneratedPresentation, OutlineResponse, ProjectDetail, ProjectSummary,
        ProjectUpdateRequest, ReorderSlidesRequest, Slide, SlideImageUpdateRequest,
        SlideImageUpdateResponse, SuggestTitlesResponse,
    },
};
use tracing::{debug, warn};

use crate::{
    config::{normalize_backend_url, ClientSettings},
    error::{ClientError, ClientResult},
};

pub const MIN_PROMPT_CHARS: usize = 20;
pub const MIN_OUTLINE_PAGES: u32 = 5;
pub const MAX_OUTLINE_PAGES: u32 = 25;
pub const DEFAULT_OUTLINE_PAGES: u32 = 10;

/// Where a reorder is made durable. The coordinator only sees this seam.
#[async_trait]
pub trait SlidePersistence: Send + Sync {
    async fn persist_order(&self, project_id: ProjectId, new_order: &[SlideId]) -> ClientResult<()>;
}

#[derive(Clone)]
pub struct DeckApiClient {
    http: Client,
    backend_url: String,
    token: Option<String>,
}

impl DeckApiClient {
    pub fn new(backend_url: &str, token: Option<String>) -> ClientResult<Self> {
        Self::with_http(Client::new(), backend_url, token)
    }

    pub fn from_settings(settings: &ClientSettings) -> ClientResult<Self> {
        let http = Client::builder()
            .timeout(settings.request_timeout())
            .build()?;
        Self::with_http(http, &settings.backend_url, settings.token.clone())
    }

    fn with_http(http: Client, backend_url: &str, token: Option<String>) -> ClientResult<Self> {
        Ok(Self {
            http,
            backend_url: normalize_backend_url(backend_url)?,
            token,
        })
    }

    pub fn backend_url(&self) -> &str {
        &self.backend_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}/api/{}", self.backend_url, path.trim_start_matches('/'));
        debug!(%method, %url, "backend request");
        let builder = self.http.request(method, url);
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send(&self, builder: RequestBuilder) -> ClientResult<Response> {
        let res = builder.send().await.map_err(|err| {
            warn!(error = %err, "backend request failed to send");
            ClientError::Transport(err)
        })?;

        let status = res.status();
        if status.is_success() {
            return Ok(res);
        }

        let body = res.text().await.unwrap_or_default();
        let err = ClientError::status(status.as_u16(), &body);
        warn!(status = status.as_u16(), error = %err, "backend rejected request");
        Err(err)
    }

    async fn json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> ClientResult<T> {
        let res = self.send(builder).await?;
        let bytes = res.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|err| ClientError::Decode(err.to_string()))
    }

    async fn json_with<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        self.json(self.request(method, path).json(body)).await
    }

    pub async fn list_projects(&self) -> ClientResult<Vec<ProjectSummary>> {
        self.json(self.request(Method::GET, "projects/")).await
    }

    pub async fn fetch_project(&self, project_id: ProjectId) -> ClientResult<ProjectDetail> {
        self.json(self.request(Method::GET, &format!("project/{project_id}/")))
            .await
    }

    pub async fn update_project(
        &self,
        project_id: ProjectId,
        update: &ProjectUpdateRequest,
    ) -> ClientResult<ProjectSummary> {
        self.json_with(Method::PATCH, &format!("projects/{project_id}/"), update)
            .await
    }

    pub async fn toggle_favorite(
        &self,
        project_id: ProjectId,
        currently_favorite: bool,
    ) -> ClientResult<ProjectSummary> {
        let update = ProjectUpdateRequest {
            is_favorite: Some(!currently_favorite),
            ..ProjectUpdateRequest::default()
        };
        self.update_project(project_id, &update).await
    }

    pub async fn rename_project(
        &self,
        project_id: ProjectId,
        title: &str,
    ) -> ClientResult<ProjectSummary> {
        let title = title.trim();
        if title.is_empty() {
            return Err(ClientError::InvalidInput(
                "project title cannot be empty".to_string(),
            ));
        }
        let update = ProjectUpdateRequest {
            title: Some(title.to_string()),
            ..ProjectUpdateRequest::default()
        };
        self.update_project(project_id, &update).await
    }

    pub async fn delete_project(&self, project_id: ProjectId) -> ClientResult<()> {
        self.send(self.request(Method::DELETE, &format!("projects/{project_id}/")))
            .await?;
        Ok(())
    }

    /// `POST /api/project/{id}/reorder-slides/`; the response body is ignored.
    pub async fn reorder_slides(
        &self,
        project_id: ProjectId,
        new_order: &[SlideId],
    ) -> ClientResult<()> {
        let body = ReorderSlidesRequest {
            new_order: new_order.to_vec(),
        };
        self.send(
            self.request(Method::POST, &format!("project/{project_id}/reorder-slides/"))
                .json(&body),
        )
        .await?;
        Ok(())
    }

    pub async fn delete_slide(&self, slide_id: &SlideId) -> ClientResult<()> {
        self.send(self.request(Method::DELETE, &format!("slide-edit/{slide_id}/")))
            .await?;
        Ok(())
    }

    pub async fn change_slide_image(&self, slide_id: &SlideId, img_url: &str) -> ClientResult<Slide> {
        let body = SlideImageUpdateRequest {
            img_url: img_url.trim().to_string(),
        };
        let res: SlideImageUpdateResponse = self
            .json_with(Method::PATCH, &format!("slide-edit/{slide_id}/"), &body)
            .await?;
        Ok(res.slide)
    }

    pub async fn suggest_slide_titles(&self, project_id: ProjectId) -> ClientResult<Vec<String>> {
        let res: SuggestTitlesResponse = self
            .json_with(
                Method::POST,
                &format!("suggest-slide-title/{project_id}/"),
                &serde_json::json!({}),
            )
            .await?;
        Ok(res.slide_titles)
    }

    /// `POST /api/generate-outline/`: drafts a deck title and slide titles from a
    /// free-text description. Nothing is sent for a prompt shorter than
    /// [`MIN_PROMPT_CHARS`] or a page count outside 5..=25.
    pub async fn generate_outline(
        &self,
        project_id: ProjectId,
        prompt: &str,
        num_pages: u32,
    ) -> ClientResult<OutlineResponse> {
        let prompt = prompt.trim();
        if prompt.chars().count() < MIN_PROMPT_CHARS {
            return Err(ClientError::InvalidInput(format!(
                "description must be at least {MIN_PROMPT_CHARS} characters long"
            )));
        }
        if !(MIN_OUTLINE_PAGES..=MAX_OUTLINE_PAGES).contains(&num_pages) {
            return Err(ClientError::InvalidInput(format!(
                "page count must be between {MIN_OUTLINE_PAGES} and {MAX_OUTLINE_PAGES}"
            )));
        }

        let body = GenerateOutlineRequest {
            num_pages,
            prompt: prompt.to_string(),
            project_id,
        };
        self.json_with(Method::POST, "generate-outline/", &body).await
    }

    /// `POST /api/generate-xml-presentation/{id}/`: builds every slide from the
    /// outline titles and returns the new deck.
    pub async fn generate_presentation(
        &self,
        project_id: ProjectId,
        slide_titles: &[String],
    ) -> ClientResult<GeneratedPresentation> {
        if slide_titles.is_empty() {
            return Err(ClientError::InvalidInput(
                "at least one slide title is required".to_string(),
            ));
        }
        if slide_titles.iter().any(|title| title.trim().is_empty()) {
            return Err(ClientError::InvalidInput(
                "slide titles cannot be empty".to_string(),
            ));
        }

        let body = GeneratePresentationRequest {
            slide_titles: slide_titles.iter().map(|t| t.trim().to_string()).collect(),
        };
        self.json_with(
            Method::POST,
            &format!("generate-xml-presentation/{project_id}/"),
            &body,
        )
        .await
    }

    /// Generates a slide from `title` and returns the project's full slide list.
    pub async fn add_slide(&self, project_id: ProjectId, title: &str) -> ClientResult<Vec<Slide>> {
        let body = AddSlideRequest {
            title: title.trim().to_string(),
        };
        let res: AddSlideResponse = self
            .json_with(Method::POST, &format!("add-slide/{project_id}/"), &body)
            .await?;
        Ok(res.slides)
    }
}

#[async_trait]
impl SlidePersistence for DeckApiClient {
    async fn persist_order(&self, project_id: ProjectId, new_order: &[SlideId]) -> ClientResult<()> {
        self.reorder_slides(project_id, new_order).await
    }
}

#[cfg(test)]
#[path = "tests/api_tests.rs"]
mod tests;
