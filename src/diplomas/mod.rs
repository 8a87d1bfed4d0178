//! Diploma records scraped from the portal's listing page.

pub mod labels;
pub mod mentors;
pub mod rows;

pub use labels::Labels;
pub use mentors::{MentorQuery, MentorReport, MentorStats, MentorSummary};

use html_scraper::{Html, Selector};
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

use rows::LabeledRows;

static PANEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("div.panel").unwrap());
static HEADING: LazyLock<Selector> = LazyLock::new(|| Selector::parse(".panel-heading").unwrap());

/// One thesis entry as shown in a listing panel.
///
/// Fields the panel lacks come back empty rather than failing the parse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diploma {
    pub title: String,
    pub student: String,
    pub mentor: String,
    pub member1: String,
    pub member2: String,
    pub date_of_submission: String,
    pub status: String,
    pub description: String,
    pub file_url: Option<String>,
}

/// Whether the page is the logged-in variant of the listing.
///
/// The portal answers 200 whether or not the session is valid, so this looks at
/// content: the submission-date label only appears when logged in, the
/// defense-date label only on the public page. A page with neither (an empty
/// listing) counts as authenticated.
pub fn is_authenticated(html: &str, labels: &Labels) -> bool {
    html.contains(&labels.date_of_submission) || !html.contains(&labels.defense_date)
}

/// Extract every diploma panel in document order. Never fails.
pub fn parse_diplomas(html: &str, labels: &Labels) -> Vec<Diploma> {
    let document = Html::parse_document(html);

    document
        .select(&PANEL)
        .map(|panel| {
            let title = panel
                .select(&HEADING)
                .next()
                .map(|h| h.text().collect::<String>().trim().to_string())
                .unwrap_or_default();
            let rows = LabeledRows::of(panel);

            Diploma {
                title,
                student: rows.text(&labels.student),
                mentor: rows.text(&labels.mentor),
                member1: rows.text(&labels.member1),
                member2: rows.text(&labels.member2),
                date_of_submission: rows.text(&labels.date_of_submission),
                status: rows.text(&labels.status),
                description: rows.text(&labels.description),
                file_url: rows.href(&labels.file, &labels.inert_href),
            }
        })
        .collect()
}

/// Parse the listing if it is the authenticated variant, `None` otherwise.
pub fn parse_listing(html: &str, labels: &Labels) -> Option<Vec<Diploma>> {
    is_authenticated(html, labels).then(|| parse_diplomas(html, labels))
}
