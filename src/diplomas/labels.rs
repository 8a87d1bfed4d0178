//! Row labels of the portal's diploma panels.
//!
//! The listing has no ids or classes per field; these Macedonian label strings are
//! the only anchors. They all live here so a markup change touches one place.

/// Label text matched (as a substring) against the first cell of each panel row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Labels {
    pub student: String,
    pub mentor: String,
    pub member1: String,
    pub member2: String,
    /// Only rendered for logged-in users.
    pub date_of_submission: String,
    pub status: String,
    pub description: String,
    pub file: String,
    /// Shown on the public variant of the page in place of the submission date.
    pub defense_date: String,
    /// Placeholder `href` the portal uses for disabled downloads.
    pub inert_href: String,
}

impl Default for Labels {
    fn default() -> Self {
        Self {
            student: "Студент".to_string(),
            mentor: "Ментор".to_string(),
            member1: "Член 1".to_string(),
            member2: "Член 2".to_string(),
            date_of_submission: "Датум на пријавување".to_string(),
            status: "Статус".to_string(),
            description: "Краток опис".to_string(),
            file: "Датотека".to_string(),
            defense_date: "Датум на одбрана".to_string(),
            inert_href: "javascript:void(0)".to_string(),
        }
    }
}
