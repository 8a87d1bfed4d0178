//! Diploma listing handlers.

use axum::extract::{Query, State};
use axum::{Extension, Json};

use crate::diplomas::{Diploma, MentorQuery, MentorReport};
use crate::state::AppState;
use crate::web::error::ApiError;
use crate::web::middleware::request_log::ListingOutcome;

fn served(records: usize) -> Extension<ListingOutcome> {
    Extension(ListingOutcome::Served { records })
}

/// `GET /diplomas`
pub(super) async fn list_diplomas(
    State(state): State<AppState>,
) -> Result<(Extension<ListingOutcome>, Json<Vec<Diploma>>), ApiError> {
    let diplomas = state.load_diplomas().await?;
    Ok((served(diplomas.len()), Json(diplomas)))
}

/// `GET /diplomas/mentors?search=&sort=mentor|totalDiplomas&direction=asc|desc`
pub(super) async fn list_mentors(
    State(state): State<AppState>,
    Query(query): Query<MentorQuery>,
) -> Result<(Extension<ListingOutcome>, Json<MentorReport>), ApiError> {
    let diplomas = state.load_diplomas().await?;
    let report = MentorReport::build(&diplomas, &query);
    tracing::debug!(mentors = report.mentors.len(), "Built mentor report");
    Ok((served(diplomas.len()), Json(report)))
}
