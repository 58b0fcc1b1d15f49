/// Page cursor behind the transaction-history and inventory paginators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    page: usize,
    total_pages: usize,
}

impl Paginator {
    pub fn new(total_pages: usize) -> Self {
        Self { page: 0, total_pages }
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn total_pages(&self) -> usize {
        self.total_pages
    }

    /// Re-clamps after the underlying data shrank (a warn was removed, a
    /// card traded away).
    pub fn set_total_pages(&mut self, total_pages: usize) {
        self.total_pages = total_pages;
        if self.total_pages == 0 {
            self.page = 0;
        } else if self.page >= self.total_pages {
            self.page = self.total_pages - 1;
        }
    }

    pub fn next(&mut self) {
        if self.page + 1 < self.total_pages {
            self.page += 1;
        }
    }

    pub fn prev(&mut self) {
        self.page = self.page.saturating_sub(1);
    }

    /// The previous-page button is disabled on the first page.
    pub fn prev_disabled(&self) -> bool {
        self.page == 0
    }

    /// The next-page button is disabled on the last page.
    pub fn next_disabled(&self) -> bool {
        self.page + 1 >= self.total_pages
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn navigation_clamps_at_both_ends() {
        let mut p = Paginator::new(3);
        assert!(p.prev_disabled());

        p.prev();
        assert_eq!(p.page(), 0);

        p.next();
        p.next();
        assert_eq!(p.page(), 2);
        assert!(p.next_disabled());

        p.next();
        assert_eq!(p.page(), 2);
    }

    #[test]
    fn shrinking_data_pulls_the_cursor_back() {
        let mut p = Paginator::new(5);
        p.next();
        p.next();
        p.next();
        assert_eq!(p.page(), 3);

        p.set_total_pages(2);
        assert_eq!(p.page(), 1);

        p.set_total_pages(0);
        assert_eq!(p.page(), 0);
    }

    #[test]
    fn single_page_disables_everything() {
        let p = Paginator::new(1);
        assert!(p.prev_disabled());
        assert!(p.next_disabled());
    }
}
