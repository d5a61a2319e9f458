//! Slide-show navigation state.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresenterKey {
    Next,
    Previous,
    ToggleGrid,
    First,
    Last,
    /// Ends the slideshow. Running off the last slide never does.
    Quit,
}

impl PresenterKey {
    /// Terminal key binding: arrows via `h`/`l` or `p`/`n`, `g` for the grid.
    pub fn from_input(input: &str) -> Option<Self> {
        match input.trim() {
            "" | "n" | "l" | "right" => Some(Self::Next),
            "p" | "h" | "left" => Some(Self::Previous),
            "g" | "G" => Some(Self::ToggleGrid),
            "home" | "0" => Some(Self::First),
            "end" | "$" => Some(Self::Last),
            "q" | "esc" => Some(Self::Quit),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresentationCursor {
    index: usize,
    len: usize,
    show_grid: bool,
}

impl PresentationCursor {
    pub fn new(len: usize) -> Self {
        Self {
            index: 0,
            len,
            show_grid: false,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn show_grid(&self) -> bool {
        self.show_grid
    }

    pub fn is_last(&self) -> bool {
        self.len == 0 || self.index + 1 >= self.len
    }

    /// Keeps the cursor inside the deck after slides are added or removed.
    pub fn resize(&mut self, len: usize) {
        self.len = len;
        self.index = self.index.min(len.saturating_sub(1));
    }

    pub fn next(&mut self) -> bool {
        if self.is_last() {
            return false;
        }
        self.index += 1;
        true
    }

    pub fn previous(&mut self) -> bool {
        if self.index == 0 {
            return false;
        }
        self.index -= 1;
        true
    }

    pub fn go_to(&mut self, index: usize) -> bool {
        if index >= self.len || index == self.index {
            return false;
        }
        self.index = index;
        // Picking a slide from the grid closes it.
        self.show_grid = false;
        true
    }

    /// Returns whether the visible state changed.
    pub fn handle_key(&mut self, key: PresenterKey) -> bool {
        match key {
            PresenterKey::Next => self.next(),
            PresenterKey::Previous => self.previous(),
            PresenterKey::First => self.go_to(0),
            PresenterKey::Last => self.go_to(self.len.saturating_sub(1)),
            PresenterKey::ToggleGrid => {
                self.show_grid = !self.show_grid;
                true
            }
            PresenterKey::Quit => false,
        }
    }

    /// `"3 / 10"`, one-based.
    pub fn progress_label(&self) -> String {
        if self.len == 0 {
            return "0 / 0".to_string();
        }
        format!("{} / {}", self.index + 1, self.len)
    }
}

#[cfg(test)]
#[path = "tests/presenter_tests.rs"]
mod tests;
