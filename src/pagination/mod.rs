//! The page loop.
//!
//! [`PaginationDriver`] walks pages `1..=max_page` strictly in order:
//! fetch, extract, append, pace. A failed fetch ends the loop with
//! [`PaginationOutcome::Aborted`]; a malformed row only drops that row.

use tracing::{debug, error, info, warn};

use crate::extractor::Extractor;
use crate::models::{Listing, ScraperOptions};
use crate::pacing::Pacer;
use crate::traits::{PageFetcher, Sleeper};

/// How the page loop ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaginationOutcome {
    /// Every page up to the resolved bound was fetched.
    Completed { pages: u32 },
    /// Fetching `page` failed; later pages were not attempted.
    Aborted { page: u32, reason: String },
}

impl PaginationOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed { .. })
    }
}

/// Everything the loop produced, including the listing buffer.
#[derive(Debug)]
pub struct PaginationReport {
    pub listings: Vec<Listing>,
    pub outcome: PaginationOutcome,
    pub pages_fetched: u32,
    pub rows_skipped: usize,
    pub cooldowns: u32,
}

pub struct PaginationDriver<'a, F: PageFetcher + ?Sized, S: Sleeper + ?Sized> {
    fetcher: &'a F,
    extractor: &'a Extractor,
    listing_path: &'a str,
    options: ScraperOptions,
    pacer: Pacer<'a, S>,
    buffer: Vec<Listing>,
    rows_skipped: usize,
}

impl<'a, F: PageFetcher + ?Sized, S: Sleeper + ?Sized> PaginationDriver<'a, F, S> {
    pub fn new(
        fetcher: &'a F,
        extractor: &'a Extractor,
        listing_path: &'a str,
        options: ScraperOptions,
        pacer: Pacer<'a, S>,
    ) -> Self {
        Self {
            fetcher,
            extractor,
            listing_path,
            options,
            pacer,
            buffer: Vec::new(),
            rows_skipped: 0,
        }
    }

    /// Walk pages `1..=max_page` and hand back the accumulated listings.
    pub async fn run(mut self, max_page: u32) -> PaginationReport {
        let mut pages_fetched = 0;

        for page in 1..=max_page {
            let offset = self.options.paging_offset(page);
            let params = [("pagingOffset", offset.to_string())];

            let html = match self.fetcher.fetch(self.listing_path, &params).await {
                Ok(html) => html,
                Err(e) => {
                    error!("[ERROR] There was an error fetching page {}: {}", page, e);
                    let outcome = PaginationOutcome::Aborted {
                        page,
                        reason: e.to_string(),
                    };
                    return self.into_report(outcome, pages_fetched);
                }
            };

            debug!("Pulled page number {}.", page);
            pages_fetched += 1;

            let added = self.absorb_page(page, &html);
            debug!("Page {} yielded {} listings", page, added);

            self.pacer.page_completed(page).await;
        }

        info!(
            "Fetched {} pages, {} listings buffered",
            pages_fetched,
            self.buffer.len()
        );
        self.into_report(PaginationOutcome::Completed { pages: max_page }, pages_fetched)
    }

    // Kept synchronous so the parsed document never lives across an await.
    fn absorb_page(&mut self, page: u32, html: &str) -> usize {
        let extraction = self.extractor.extract_page(html);

        for failure in &extraction.failures {
            match failure.id() {
                Some(id) => warn!(
                    "[ERROR] Result id: {} could not be parsed properly: {}",
                    id, failure
                ),
                None => warn!("[ERROR] Unidentified result on page {}: {}", page, failure),
            }
        }
        self.rows_skipped += extraction.failures.len();

        let added = extraction.listings.len();
        self.buffer.extend(extraction.listings);
        added
    }

    fn into_report(self, outcome: PaginationOutcome, pages_fetched: u32) -> PaginationReport {
        PaginationReport {
            listings: self.buffer,
            outcome,
            pages_fetched,
            rows_skipped: self.rows_skipped,
            cooldowns: self.pacer.cooldowns(),
        }
    }
}
