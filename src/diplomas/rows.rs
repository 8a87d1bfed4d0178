//! Label → value lookup over a panel's table rows.

use html_scraper::{ElementRef, Selector};
use std::sync::LazyLock;

static ROW: LazyLock<Selector> = LazyLock::new(|| Selector::parse("table tbody tr").unwrap());
static LABEL_CELL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("td:nth-child(1)").unwrap());
static VALUE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("td:nth-child(2) strong").unwrap());
static VALUE_LINK: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("td:nth-child(2) strong a").unwrap());

/// The rows of one panel. Each row is a label cell followed by a value cell
/// whose content sits inside `<strong>`.
pub struct LabeledRows<'a> {
    rows: Vec<ElementRef<'a>>,
}

impl<'a> LabeledRows<'a> {
    pub fn of(panel: ElementRef<'a>) -> Self {
        Self {
            rows: panel.select(&ROW).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// First row whose label cell contains `label`.
    fn find(&self, label: &str) -> Option<ElementRef<'a>> {
        self.rows.iter().copied().find(|row| {
            row.select(&LABEL_CELL)
                .next()
                .is_some_and(|cell| cell.text().collect::<String>().contains(label))
        })
    }

    /// Trimmed value text for `label`, or an empty string.
    pub fn text(&self, label: &str) -> String {
        self.find(label)
            .and_then(|row| row.select(&VALUE).next())
            .map(|value| value.text().collect::<String>().trim().to_string())
            .unwrap_or_default()
    }

    /// Link target for `label`. Missing anchors, empty hrefs and `inert` hrefs yield `None`.
    pub fn href(&self, label: &str, inert: &str) -> Option<String> {
        let row = self.find(label)?;
        let href = row.select(&VALUE_LINK).next()?.attr("href")?;
        (!href.is_empty() && href != inert).then(|| href.to_string())
    }
}
