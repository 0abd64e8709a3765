//! Test doubles and markup builders shared by unit tests.

use std::collections::HashMap;
use std::io;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;

use crate::error::{HarvestError, Result};
use crate::traits::{PageFetcher, Sleeper};

/// Builds one `tr.searchResultsItem` row in the listing site's layout.
pub struct RowBuilder {
    id: u64,
    cells: Vec<String>,
}

impl RowBuilder {
    pub fn new(id: u64) -> Self {
        let cells = vec![
            format!(
                r#"<td class="searchResultsLargeThumbnail"><a href="/ilan/{id}"><img src="https://img.example.com/{id}.jpg" alt=""></a></td>"#
            ),
            "<td class=\"searchResultsTagAttributeValue\">\n    Honda\n  </td>".to_string(),
            r#"<td class="searchResultsTagAttributeValue">CBR 600</td>"#.to_string(),
            format!(
                r#"<td class="searchResultsTitleValue"><a href="/ilan/{id}">Sahibinden temiz CBR</a></td>"#
            ),
            r#"<td class="searchResultsAttributeValue">2012</td>"#.to_string(),
            r#"<td class="searchResultsAttributeValue">45.230</td>"#.to_string(),
            r#"<td class="searchResultsAttributeValue">Kırmızı</td>"#.to_string(),
            r#"<td class="searchResultsPriceValue"><div> 45.000 TL </div></td>"#.to_string(),
            "<td class=\"searchResultsDateValue\"><span>12 Ocak</span>\n      <br>\n      <span>2021</span></td>"
                .to_string(),
            r#"<td class="searchResultsLocationValue">İstanbul<br>Kadıköy</td>"#.to_string(),
        ];
        Self { id, cells }
    }

    pub fn without_image(mut self) -> Self {
        self.cells[0] = r#"<td class="searchResultsLargeThumbnail"></td>"#.to_string();
        self
    }

    pub fn year(mut self, year: &str) -> Self {
        self.cells[4] = format!(r#"<td class="searchResultsAttributeValue">{year}</td>"#);
        self
    }

    pub fn km(mut self, km: &str) -> Self {
        self.cells[5] = format!(r#"<td class="searchResultsAttributeValue">{km}</td>"#);
        self
    }

    pub fn price_cell(mut self, inner: &str) -> Self {
        self.cells[7] = format!(r#"<td class="searchResultsPriceValue">{inner}</td>"#);
        self
    }

    pub fn area_cell(mut self, inner: &str) -> Self {
        self.cells[9] = format!(r#"<td class="searchResultsLocationValue">{inner}</td>"#);
        self
    }

    /// Keep only the first `len` data cells.
    pub fn truncated(mut self, len: usize) -> Self {
        self.cells.truncate(len);
        self
    }

    pub fn with_ignored_cell_at(mut self, index: usize) -> Self {
        self.cells.insert(
            index,
            r##"<td class="ignore-me"><a href="#">Favorilerime ekle</a></td>"##.to_string(),
        );
        self
    }

    pub fn build(self) -> String {
        format!(
            r#"<tr class="searchResultsItem" data-id="{}">{}</tr>"#,
            self.id,
            self.cells.concat()
        )
    }
}

/// Wrap rows into a full result page document.
pub fn results_page(rows: &[String]) -> String {
    format!(
        r#"<html><body><table id="searchResultsTable"><tbody>{}</tbody></table></body></html>"#,
        rows.concat()
    )
}

/// A result page holding consecutive ids `first..first + count`.
pub fn numbered_page(first: u64, count: u64) -> String {
    let rows: Vec<String> = (first..first + count)
        .map(|id| RowBuilder::new(id).build())
        .collect();
    results_page(&rows)
}

/// Landing page with the two summary elements the metadata resolver reads.
pub fn landing_page(count_text: &str, pagination_text: &str) -> String {
    format!(
        r#"<html><body>
<div class="result-text"><h1>Motosiklet İkinci El</h1><span>{count_text}</span></div>
<table id="searchResultsTable"><tbody></tbody></table>
<p class="mbdef">{pagination_text}</p>
</body></html>"#
    )
}

/// Serves canned payloads keyed by `pagingOffset`, and the landing page
/// for requests without one. Anything unscripted fails with a 503.
#[derive(Default)]
pub struct ScriptedFetcher {
    landing: Option<String>,
    pages: HashMap<u64, String>,
    requests: Arc<Mutex<Vec<Option<u64>>>>,
}

impl ScriptedFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn landing(mut self, html: String) -> Self {
        self.landing = Some(html);
        self
    }

    pub fn page(mut self, offset: u64, html: String) -> Self {
        self.pages.insert(offset, html);
        self
    }

    /// Offsets requested so far, `None` for the landing page.
    pub fn request_log(&self) -> Arc<Mutex<Vec<Option<u64>>>> {
        Arc::clone(&self.requests)
    }
}

#[async_trait]
impl PageFetcher for ScriptedFetcher {
    async fn fetch(&self, path: &str, params: &[(&'static str, String)]) -> Result<String> {
        let offset = params
            .iter()
            .find(|(k, _)| *k == "pagingOffset")
            .and_then(|(_, v)| v.parse::<u64>().ok());
        self.requests.lock().unwrap().push(offset);

        let body = match offset {
            None => self.landing.clone(),
            Some(o) => self.pages.get(&o).cloned(),
        };

        body.ok_or_else(|| HarvestError::Status {
            url: format!("{path}?pagingOffset={offset:?}"),
            status: StatusCode::SERVICE_UNAVAILABLE,
        })
    }
}

/// Records cooldowns instead of sleeping.
#[derive(Default)]
pub struct RecordingSleeper {
    calls: Arc<Mutex<Vec<Duration>>>,
}

impl RecordingSleeper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Arc<Mutex<Vec<Duration>>> {
        Arc::clone(&self.calls)
    }
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.calls.lock().unwrap().push(duration);
    }
}

/// Collects formatted log output in memory.
#[derive(Clone, Default)]
pub struct CapturedLogs {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl CapturedLogs {
    /// Writer factory for `tracing_subscriber::fmt().with_writer(..)`.
    pub fn writer(&self) -> impl Fn() -> CapturedLogs + Send + Sync + 'static {
        let logs = self.clone();
        move || logs.clone()
    }

    pub fn lines(&self) -> Vec<String> {
        let raw = self.buffer.lock().unwrap();
        String::from_utf8_lossy(&raw)
            .lines()
            .filter(|l| !l.trim().is_empty())
            .map(str::to_string)
            .collect()
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
