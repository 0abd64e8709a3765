//! Landing page metadata: total result count and total page count.

use scraper::{ElementRef, Html, Selector};
use tracing::info;

use crate::error::{HarvestError, Result};
use crate::models::RunMetadata;
use crate::traits::{PageFetcher, SiteConfig, SiteSelectors};

/// Fetch the landing page (no paging offset) and read its summary fields.
pub async fn resolve_metadata<F: PageFetcher + ?Sized>(
    fetcher: &F,
    site: &SiteConfig,
) -> Result<RunMetadata> {
    let html = fetcher.fetch(&site.listing_path, &[]).await?;
    let metadata = parse_metadata(&html, &site.selectors)?;

    info!(
        "Found {} listings across {} pages",
        metadata.listing_count, metadata.max_page
    );
    Ok(metadata)
}

/// Read both counts from landing page markup.
///
/// The listing count sits in the second child of the result summary, e.g.
/// `12.345 sonuç bulundu`. The page count comes from the pagination
/// summary, either `Sayfa 1 / 247` or `Toplam 247 sayfa içerisinde ...`.
pub fn parse_metadata(html: &str, selectors: &SiteSelectors) -> Result<RunMetadata> {
    let document = Html::parse_document(html);

    let summary = first_match(&document, &selectors.result_summary)?;
    let count_text = summary
        .children()
        .filter_map(ElementRef::wrap)
        .nth(1)
        .map(|el| el.text().collect::<String>())
        .ok_or_else(|| {
            HarvestError::metadata(format!(
                "{} has no count element",
                selectors.result_summary
            ))
        })?;

    let pagination = first_match(&document, &selectors.pagination_summary)?;
    let page_text = pagination.text().collect::<String>();

    Ok(RunMetadata {
        listing_count: parse_listing_count(&count_text)?,
        max_page: parse_page_count(&page_text)?,
    })
}

fn first_match<'a>(document: &'a Html, selector: &str) -> Result<ElementRef<'a>> {
    let parsed = Selector::parse(selector)
        .map_err(|e| HarvestError::selector(selector, format!("{e:?}")))?;

    document
        .select(&parsed)
        .next()
        .ok_or_else(|| HarvestError::metadata(format!("no element matches {selector}")))
}

fn parse_listing_count(text: &str) -> Result<u64> {
    let token = text
        .replace('.', "")
        .split_whitespace()
        .next()
        .map(str::to_string)
        .unwrap_or_default();

    token
        .parse()
        .map_err(|_| HarvestError::metadata(format!("listing count {text:?} is not a number")))
}

fn parse_page_count(text: &str) -> Result<u32> {
    let token = match text.split_once('/') {
        Some((_, total)) => total.split_whitespace().next(),
        None => text.split_whitespace().nth(1),
    };

    token
        .and_then(|t| t.parse().ok())
        .ok_or_else(|| HarvestError::metadata(format!("page count {text:?} is not a number")))
}
