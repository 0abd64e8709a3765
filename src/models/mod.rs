//! Data models for harvested listings and run configuration

use serde::{Deserialize, Serialize};

/// Lower bound of the year filter when none is configured.
pub const DEFAULT_YEAR_MIN: u32 = 1980;
/// Upper bound of the year filter when none is configured.
pub const DEFAULT_YEAR_MAX: u32 = 2021;

/// A single advertised item scraped from a result row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Listing {
    pub id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub brand: String,
    pub model: String,
    /// Reserved for output compatibility, never filled by extraction.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub year: i32,
    pub km: u64,
    pub color: String,
    pub price: Option<String>,
    pub date: Option<String>,
    pub area: Option<String>,
}

/// Number of results requested per page. The listing endpoint only
/// accepts these two tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PagingSize {
    Twenty,
    #[default]
    Fifty,
}

impl PagingSize {
    pub fn get(self) -> u32 {
        match self {
            Self::Twenty => 20,
            Self::Fifty => 50,
        }
    }
}

impl TryFrom<u32> for PagingSize {
    type Error = u32;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            20 => Ok(Self::Twenty),
            50 => Ok(Self::Fifty),
            other => Err(other),
        }
    }
}

/// Run configuration, fixed for the lifetime of a harvester.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScraperOptions {
    pub paging_size: PagingSize,
    pub year_min: Option<u32>,
    pub year_max: Option<u32>,
}

impl ScraperOptions {
    pub fn new(paging_size: PagingSize, year_min: u32, year_max: u32) -> Self {
        Self {
            paging_size,
            year_min: Some(year_min),
            year_max: Some(year_max),
        }
    }

    /// Inclusive year bounds sent as server-side filters. Unset or zero
    /// bounds fall back to the wide default range.
    pub fn year_bounds(&self) -> (u32, u32) {
        let min = self.year_min.filter(|y| *y != 0).unwrap_or(DEFAULT_YEAR_MIN);
        let max = self.year_max.filter(|y| *y != 0).unwrap_or(DEFAULT_YEAR_MAX);
        (min, max)
    }

    /// Zero-based index of the first result on a one-based `page`.
    /// The page bound is remote input, so the product is taken in `u64`.
    pub fn paging_offset(&self, page: u32) -> u64 {
        u64::from(page.saturating_sub(1)) * u64::from(self.paging_size.get())
    }

    /// Query parameters shared by every request of a run.
    pub fn base_params(&self) -> Vec<(&'static str, String)> {
        let (min, max) = self.year_bounds();
        vec![
            ("pagingSize", self.paging_size.get().to_string()),
            ("a269_min", min.to_string()),
            ("a269_max", max.to_string()),
        ]
    }
}

/// Totals discovered from the landing page before the page loop starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunMetadata {
    /// Informational only.
    pub listing_count: u64,
    /// Authoritative loop bound.
    pub max_page: u32,
}
