//! Ordered slide list and selection, shared between the view layer and the
//! reorder coordinator through an explicit handle.

use std::sync::Arc;

use shared::{domain::SlideId, protocol::Slide};
use tokio::sync::{Mutex, MutexGuard};

use crate::{
    error::{ClientError, ClientResult},
    reorder::move_item,
};

#[derive(Debug, Clone, Default)]
pub struct SlideListState {
    slides: Vec<Slide>,
    selected: Option<usize>,
    /// Bumped by every change to the set or order of slides. Record edits and
    /// selection changes leave it alone.
    revision: u64,
}

impl SlideListState {
    pub fn new(slides: Vec<Slide>) -> Self {
        let mut state = Self::default();
        state.load(slides);
        state
    }

    pub fn slides(&self) -> &[Slide] {
        &self.slides
    }

    pub fn len(&self) -> usize {
        self.slides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected_slide(&self) -> Option<&Slide> {
        self.selected.and_then(|index| self.slides.get(index))
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn order(&self) -> Vec<SlideId> {
        self.slides.iter().map(|slide| slide.id.clone()).collect()
    }

    pub fn position_of(&self, id: &SlideId) -> Option<usize> {
        self.slides.iter().position(|slide| &slide.id == id)
    }

    pub fn load(&mut self, slides: Vec<Slide>) {
        self.selected = if slides.is_empty() { None } else { Some(0) };
        self.slides = slides;
        self.revision += 1;
    }

    /// Replaces the list wholesale (the add-slide endpoint answers with every slide),
    /// keeping the previously selected slide selected when it still exists.
    pub fn replace_all(&mut self, slides: Vec<Slide>) {
        let selected_id = self.selected_slide().map(|slide| slide.id.clone());
        self.slides = slides;
        self.selected = match selected_id.and_then(|id| self.position_of(&id)) {
            Some(index) => Some(index),
            None => self.clamped_selection(),
        };
        self.revision += 1;
    }

    pub fn append(&mut self, slide: Slide) {
        self.slides.push(slide);
        if self.selected.is_none() {
            self.selected = Some(0);
        }
        self.revision += 1;
    }

    pub fn remove(&mut self, id: &SlideId) -> ClientResult<Slide> {
        let index = self
            .position_of(id)
            .ok_or_else(|| ClientError::UnknownSlide(id.clone()))?;
        let removed = self.slides.remove(index);

        self.selected = match self.selected {
            Some(selected) if selected > index => Some(selected - 1),
            _ => self.clamped_selection(),
        };
        self.revision += 1;
        Ok(removed)
    }

    pub fn replace_slide(&mut self, slide: Slide) -> ClientResult<()> {
        let index = self
            .position_of(&slide.id)
            .ok_or_else(|| ClientError::UnknownSlide(slide.id.clone()))?;
        self.slides[index] = slide;
        Ok(())
    }

    pub fn select(&mut self, index: usize) -> ClientResult<()> {
        self.check_index(index)?;
        self.selected = Some(index);
        Ok(())
    }

    pub(crate) fn check_index(&self, index: usize) -> ClientResult<()> {
        if index < self.slides.len() {
            Ok(())
        } else {
            Err(ClientError::IndexOutOfRange {
                index,
                len: self.slides.len(),
            })
        }
    }

    /// Moves one slide and sets the selection and revision in a single step.
    pub(crate) fn move_slide(
        &mut self,
        source: usize,
        destination: usize,
        selected: Option<usize>,
        revision: u64,
    ) {
        move_item(&mut self.slides, source, destination);
        self.selected = selected;
        self.revision = revision;
    }

    fn clamped_selection(&self) -> Option<usize> {
        match (self.selected, self.slides.len()) {
            (_, 0) => None,
            (Some(selected), len) => Some(selected.min(len - 1)),
            (None, _) => Some(0),
        }
    }
}

/// Cloneable handle to one slide list.
#[derive(Debug, Clone, Default)]
pub struct SlideStore {
    inner: Arc<Mutex<SlideListState>>,
}

impl SlideStore {
    pub fn new(slides: Vec<Slide>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(SlideListState::new(slides))),
        }
    }

    pub async fn lock(&self) -> MutexGuard<'_, SlideListState> {
        self.inner.lock().await
    }

    pub async fn snapshot(&self) -> SlideListState {
        self.inner.lock().await.clone()
    }

    pub async fn order(&self) -> Vec<SlideId> {
        self.inner.lock().await.order()
    }

    pub async fn selected(&self) -> Option<usize> {
        self.inner.lock().await.selected()
    }
}

#[cfg(test)]
#[path = "tests/slides_tests.rs"]
mod tests;
