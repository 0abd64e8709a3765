//! Structured extraction of listings from result pages.
//!
//! Extraction happens in two layers. [`ResultPage`] parses a raw payload
//! and hands out one [`ResultRow`] per result row. [`ResultRow::extract`]
//! turns a single row into a [`Listing`] by walking its data cells against
//! [`LISTING_CELLS`], a declarative positional schema.
//!
//! Any failure in the row layer is a [`RecordParseError`] for that row
//! alone. Callers skip the row and keep going.

use scraper::{ElementRef, Html, Selector};

use crate::error::{HarvestError, RecordParseError, Result};
use crate::models::Listing;
use crate::traits::SiteSelectors;

/// Separator used for thousands in numeric cells (`45.230`).
const THOUSANDS_SEPARATOR: char = '.';

/// Joins the line segments of a multi-line cell.
const LINE_DELIMITER: &str = ", ";

/// Reads one cell into the draft, or explains why it could not.
pub type CellExtractor = for<'a> fn(ElementRef<'a>, &mut ListingDraft) -> CellResult;

pub type CellResult = std::result::Result<(), String>;

/// Positional layout of a result row's data cells, after ignorable cells
/// are dropped. Cells past the end of the schema are not read.
pub const LISTING_CELLS: [(&str, CellExtractor); 10] = [
    ("image", read_image),
    ("brand", read_brand),
    ("model", read_model),
    ("title", skip_cell),
    ("year", read_year),
    ("km", read_km),
    ("color", read_color),
    ("price", read_price),
    ("date", read_date),
    ("area", read_area),
];

/// Partially filled listing while a row's cells are being read.
#[derive(Debug, Default)]
pub struct ListingDraft {
    image: Option<String>,
    brand: Option<String>,
    model: Option<String>,
    year: Option<i32>,
    km: Option<u64>,
    color: Option<String>,
    price: Option<String>,
    date: Option<String>,
    area: Option<String>,
}

impl ListingDraft {
    fn finish(self, id: u64) -> std::result::Result<Listing, RecordParseError> {
        let missing = |field: &'static str| RecordParseError::Field {
            id,
            field,
            reason: "was not extracted".to_string(),
        };

        Ok(Listing {
            id,
            image: self.image,
            brand: self.brand.ok_or_else(|| missing("brand"))?,
            model: self.model.ok_or_else(|| missing("model"))?,
            title: None,
            year: self.year.ok_or_else(|| missing("year"))?,
            km: self.km.ok_or_else(|| missing("km"))?,
            color: self.color.ok_or_else(|| missing("color"))?,
            price: self.price,
            date: self.date,
            area: self.area,
        })
    }
}

/// Compiled selectors for one site's result markup.
#[derive(Debug, Clone)]
pub struct Extractor {
    row: Selector,
    cell: Selector,
    id_attribute: String,
}

impl Extractor {
    pub fn new(selectors: &SiteSelectors) -> Result<Self> {
        Ok(Self {
            row: parse_selector(&selectors.result_row)?,
            cell: parse_selector(&selectors.data_cell)?,
            id_attribute: selectors.id_attribute.clone(),
        })
    }

    /// Parse a raw page payload.
    pub fn parse_page(&self, html: &str) -> ResultPage<'_> {
        ResultPage {
            document: Html::parse_document(html),
            extractor: self,
        }
    }

    /// Extract every well-formed row of `html`, collecting row failures
    /// next to the listings instead of stopping on them.
    pub fn extract_page(&self, html: &str) -> PageExtraction {
        let page = self.parse_page(html);
        let mut extraction = PageExtraction::default();

        for row in page.rows() {
            match row.extract() {
                Ok(listing) => extraction.listings.push(listing),
                Err(e) => extraction.failures.push(e),
            }
        }

        extraction
    }
}

/// Listings and row failures from one page, both in row order.
#[derive(Debug, Default)]
pub struct PageExtraction {
    pub listings: Vec<Listing>,
    pub failures: Vec<RecordParseError>,
}

/// A parsed result page.
pub struct ResultPage<'a> {
    document: Html,
    extractor: &'a Extractor,
}

impl ResultPage<'_> {
    /// Result rows that carry an identifying attribute, in document order.
    pub fn rows(&self) -> impl Iterator<Item = ResultRow<'_>> {
        self.document
            .select(&self.extractor.row)
            .map(move |element| ResultRow {
                element,
                extractor: self.extractor,
            })
    }
}

/// Handle to one result row inside a [`ResultPage`].
pub struct ResultRow<'a> {
    element: ElementRef<'a>,
    extractor: &'a Extractor,
}

impl ResultRow<'_> {
    pub fn id(&self) -> std::result::Result<u64, RecordParseError> {
        let raw = self
            .element
            .value()
            .attr(&self.extractor.id_attribute)
            .ok_or(RecordParseError::MissingId)?;

        raw.trim()
            .parse()
            .map_err(|_| RecordParseError::InvalidId(raw.to_string()))
    }

    pub fn extract(&self) -> std::result::Result<Listing, RecordParseError> {
        let id = self.id()?;
        let cells: Vec<ElementRef<'_>> = self.element.select(&self.extractor.cell).collect();

        if cells.len() < LISTING_CELLS.len() {
            return Err(RecordParseError::Layout {
                id,
                expected: LISTING_CELLS.len(),
                found: cells.len(),
            });
        }

        let mut draft = ListingDraft::default();
        for ((field, read), cell) in LISTING_CELLS.iter().zip(cells) {
            read(cell, &mut draft).map_err(|reason| RecordParseError::Field {
                id,
                field: *field,
                reason,
            })?;
        }

        draft.finish(id)
    }
}

fn parse_selector(s: &str) -> Result<Selector> {
    Selector::parse(s).map_err(|e| HarvestError::selector(s, format!("{e:?}")))
}

fn trimmed_text(cell: ElementRef<'_>) -> String {
    cell.text().collect::<String>().trim().to_string()
}

fn parse_int<T: std::str::FromStr>(raw: &str) -> std::result::Result<T, String> {
    raw.parse()
        .map_err(|_| format!("is not an integer: {raw:?}"))
}

fn read_image(cell: ElementRef<'_>, draft: &mut ListingDraft) -> CellResult {
    draft.image = cell
        .descendants()
        .filter_map(ElementRef::wrap)
        .find(|el| el.value().name() == "img")
        .and_then(|img| img.value().attr("src"))
        .map(str::trim)
        .filter(|src| !src.is_empty())
        .map(str::to_string);
    Ok(())
}

fn read_brand(cell: ElementRef<'_>, draft: &mut ListingDraft) -> CellResult {
    draft.brand = Some(trimmed_text(cell));
    Ok(())
}

fn read_model(cell: ElementRef<'_>, draft: &mut ListingDraft) -> CellResult {
    draft.model = Some(trimmed_text(cell));
    Ok(())
}

fn skip_cell(_cell: ElementRef<'_>, _draft: &mut ListingDraft) -> CellResult {
    Ok(())
}

fn read_year(cell: ElementRef<'_>, draft: &mut ListingDraft) -> CellResult {
    draft.year = Some(parse_int(&trimmed_text(cell))?);
    Ok(())
}

fn read_km(cell: ElementRef<'_>, draft: &mut ListingDraft) -> CellResult {
    let digits: String = trimmed_text(cell)
        .chars()
        .filter(|c| *c != THOUSANDS_SEPARATOR)
        .collect();
    draft.km = Some(parse_int(&digits)?);
    Ok(())
}

fn read_color(cell: ElementRef<'_>, draft: &mut ListingDraft) -> CellResult {
    draft.color = Some(trimmed_text(cell));
    Ok(())
}

// Price sits in the cell's first child element; the currency suffix is kept.
fn read_price(cell: ElementRef<'_>, draft: &mut ListingDraft) -> CellResult {
    let price = cell
        .children()
        .find_map(ElementRef::wrap)
        .ok_or_else(|| "has no price element".to_string())?;
    draft.price = Some(trimmed_text(price));
    Ok(())
}

fn read_date(cell: ElementRef<'_>, draft: &mut ListingDraft) -> CellResult {
    let text = cell.text().collect::<String>();
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    draft.date = (!collapsed.is_empty()).then_some(collapsed);
    Ok(())
}

fn read_area(cell: ElementRef<'_>, draft: &mut ListingDraft) -> CellResult {
    let segments: Vec<&str> = cell
        .text()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();
    draft.area = (!segments.is_empty()).then(|| segments.join(LINE_DELIMITER));
    Ok(())
}
