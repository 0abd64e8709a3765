use std::path::PathBuf;

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::error::Result;
use crate::extractor::Extractor;
use crate::fetch::FetchClient;
use crate::metadata::resolve_metadata;
use crate::models::{RunMetadata, ScraperOptions};
use crate::pacing::{Pacer, PacingPolicy, TokioSleeper};
use crate::pagination::{PaginationDriver, PaginationOutcome};
use crate::sink::ResultSink;
use crate::traits::{PageFetcher, SiteConfig, Sleeper};

/// Directory the production harvester writes artifacts into.
pub const OUTPUT_DIR: &str = "output";

/// What a finished run did.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub metadata: RunMetadata,
    pub outcome: PaginationOutcome,
    pub records: usize,
    pub rows_skipped: usize,
    pub artifact: PathBuf,
}

impl RunSummary {
    pub fn elapsed(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }
}

/// Runs metadata resolution, the page loop and the result sink in sequence.
pub struct Harvester<F: PageFetcher = FetchClient, S: Sleeper = TokioSleeper> {
    options: ScraperOptions,
    site: SiteConfig,
    extractor: Extractor,
    fetcher: F,
    sleeper: S,
    pacing: PacingPolicy,
    sink: ResultSink,
    metadata: RunMetadata,
}

impl Harvester {
    /// Production harvester for the default site, writing to [`OUTPUT_DIR`].
    pub async fn new(options: ScraperOptions) -> Result<Self> {
        let site = SiteConfig::sahibinden();
        let fetcher = FetchClient::new(&site, &options)?;
        let sink = ResultSink::new(OUTPUT_DIR).await?;

        Self::with_parts(
            options,
            site,
            fetcher,
            TokioSleeper,
            PacingPolicy::default(),
            sink,
        )
    }
}

impl<F: PageFetcher, S: Sleeper> Harvester<F, S> {
    pub fn with_parts(
        options: ScraperOptions,
        site: SiteConfig,
        fetcher: F,
        sleeper: S,
        pacing: PacingPolicy,
        sink: ResultSink,
    ) -> Result<Self> {
        let extractor = Extractor::new(&site.selectors)?;

        Ok(Self {
            options,
            site,
            extractor,
            fetcher,
            sleeper,
            pacing,
            sink,
            metadata: RunMetadata::default(),
        })
    }

    /// Total page count from the last metadata resolution.
    pub fn page_count(&self) -> u32 {
        self.metadata.max_page
    }

    /// Total listing count from the last metadata resolution.
    pub fn listing_count(&self) -> u64 {
        self.metadata.listing_count
    }

    /// Harvest every page and write the artifact.
    ///
    /// Metadata and write failures are returned as errors. A failed page
    /// fetch only ends the loop early; whatever was collected up to that
    /// point is still written and the outcome is reported in the summary.
    pub async fn run(&mut self) -> Result<RunSummary> {
        let started_at = Utc::now();
        info!(
            "Starting harvest of {}{} (paging size {})",
            self.site.base_url,
            self.site.listing_path,
            self.options.paging_size.get()
        );

        self.metadata = resolve_metadata(&self.fetcher, &self.site).await?;

        let pacer = Pacer::new(self.pacing, &self.sleeper);
        let report = PaginationDriver::new(
            &self.fetcher,
            &self.extractor,
            &self.site.listing_path,
            self.options,
            pacer,
        )
        .run(self.metadata.max_page)
        .await;

        if let PaginationOutcome::Aborted { page, reason } = &report.outcome {
            warn!(
                "Stopped at page {} of {}: {}",
                page, self.metadata.max_page, reason
            );
        }
        if report.rows_skipped > 0 {
            warn!("Skipped {} malformed results", report.rows_skipped);
        }

        let artifact = self.sink.write(&report.listings, started_at).await?;
        let finished_at = Utc::now();

        let summary = RunSummary {
            started_at,
            finished_at,
            metadata: self.metadata,
            outcome: report.outcome,
            records: report.listings.len(),
            rows_skipped: report.rows_skipped,
            artifact,
        };

        info!(
            "Wrote {} of {} listings to {}",
            summary.records,
            self.metadata.listing_count,
            summary.artifact.display()
        );
        info!(
            "[FINISHED] Job done in {:.3} seconds.",
            summary.elapsed().num_milliseconds() as f64 / 1000.0
        );
        Ok(summary)
    }
}
