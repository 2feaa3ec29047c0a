pub const COMMENT_PAGE_SIZE: usize = 6;

/// "Show more"-style incremental reveal over an already-fetched list
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Pager {
    page_size: usize,
    revealed: usize,
}

impl Pager {
    pub fn new(page_size: usize) -> Pager {
        Pager {
            page_size,
            revealed: page_size,
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Back to the first page
    pub fn reset(&mut self) {
        self.revealed = self.page_size;
    }

    pub fn visible(&self, total: usize) -> usize {
        self.revealed.min(total)
    }

    pub fn has_more(&self, total: usize) -> bool {
        self.revealed < total
    }

    pub fn show_more(&mut self, total: usize) {
        self.revealed = (self.revealed + self.page_size).min(total).max(self.revealed);
    }

    /// Keeps the current items on screen when `n` items are inserted in front
    pub fn grow(&mut self, n: usize) {
        self.revealed += n;
    }

    /// Undoes `grow`, never going below the first page
    pub fn shrink(&mut self, n: usize) {
        self.revealed = self.revealed.saturating_sub(n).max(self.page_size);
    }
}

impl Default for Pager {
    fn default() -> Pager {
        Pager::new(COMMENT_PAGE_SIZE)
    }
}
