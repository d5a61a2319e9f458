//! Client core for the slide-deck backend. Each open project is a
//! [`ProjectSession`] over one shared slide list.

use std::sync::Arc;

use shared::domain::{ProjectId, SlideId};
use tracing::info;

pub mod api;
pub mod config;
pub mod error;
pub mod presenter;
pub mod render;
pub mod reorder;
pub mod slides;
pub mod time;

pub use api::{DeckApiClient, SlidePersistence};
pub use error::{ClientError, ClientResult};
pub use reorder::{ReorderCoordinator, ReorderEvent, ReorderOutcome};
pub use slides::{SlideListState, SlideStore};

/// One open project: its slide list plus the flows that mutate it.
pub struct ProjectSession {
    project_id: ProjectId,
    title: String,
    api: Arc<DeckApiClient>,
    store: SlideStore,
    reorder: ReorderCoordinator,
}

impl ProjectSession {
    pub async fn open(api: Arc<DeckApiClient>, project_id: ProjectId) -> ClientResult<Self> {
        let detail = api.fetch_project(project_id).await?;
        info!(%project_id, slides = detail.slides.len(), "project loaded");
        let store = SlideStore::new(detail.slides);
        let persistence: Arc<dyn SlidePersistence> = api.clone();
        Ok(Self {
            project_id,
            title: detail.title,
            reorder: ReorderCoordinator::new(project_id, store.clone(), persistence),
            api,
            store,
        })
    }

    pub fn project_id(&self) -> ProjectId {
        self.project_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn store(&self) -> &SlideStore {
        &self.store
    }

    pub fn coordinator(&self) -> &ReorderCoordinator {
        &self.reorder
    }

    pub async fn reorder(
        &self,
        source: usize,
        destination: Option<usize>,
    ) -> ClientResult<ReorderOutcome> {
        self.reorder.reorder(source, destination).await
    }

    /// Deletes on the backend first; the local list only changes once that succeeds.
    pub async fn delete_slide(&self, slide_id: &SlideId) -> ClientResult<()> {
        if self.store.lock().await.position_of(slide_id).is_none() {
            return Err(ClientError::UnknownSlide(slide_id.clone()));
        }
        self.api.delete_slide(slide_id).await?;
        self.store.lock().await.remove(slide_id)?;
        info!(project_id = %self.project_id, %slide_id, "slide deleted");
        Ok(())
    }

    pub async fn change_image(&self, slide_id: &SlideId, img_url: &str) -> ClientResult<()> {
        let updated = self.api.change_slide_image(slide_id, img_url).await?;
        self.store.lock().await.replace_slide(updated)?;
        info!(project_id = %self.project_id, %slide_id, "slide image updated");
        Ok(())
    }

    pub async fn suggest_titles(&self) -> ClientResult<Vec<String>> {
        self.api.suggest_slide_titles(self.project_id).await
    }

    pub async fn add_slide(&self, title: &str) -> ClientResult<()> {
        let slides = self.api.add_slide(self.project_id, title).await?;
        let count = slides.len();
        self.store.lock().await.replace_all(slides);
        info!(project_id = %self.project_id, slides = count, "slide added");
        Ok(())
    }

    /// Replaces the whole deck with one generated from `slide_titles`.
    pub async fn generate(&mut self, slide_titles: &[String]) -> ClientResult<()> {
        let generated = self
            .api
            .generate_presentation(self.project_id, slide_titles)
            .await?;
        if !generated.title.trim().is_empty() {
            self.title = generated.title;
        }
        let count = generated.slides.len();
        self.store.lock().await.load(generated.slides);
        info!(project_id = %self.project_id, slides = count, "presentation generated");
        Ok(())
    }

    pub async fn refresh(&mut self) -> ClientResult<()> {
        let detail = self.api.fetch_project(self.project_id).await?;
        self.title = detail.title;
        self.store.lock().await.replace_all(detail.slides);
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/mock_backend.rs"]
mod mock_backend;

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
