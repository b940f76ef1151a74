use axum::{
    Router,
    extract::Path,
    http::StatusCode,
    response::Json,
    routing::post,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::artifact::{ArtifactKind, display_value};
use crate::render::{
    DisplayBlock, render_hotel_packages, render_search_queries, render_search_results,
};
use crate::validation::{BudgetRange, validate_budget, validate_duration};
use crate::web::SharedConfig;

#[derive(Debug, Default, Deserialize)]
pub struct ValidateRequest {
    #[serde(default)]
    pub budget: Option<String>,
    /// Accepts either `"5"` or `5`
    #[serde(default)]
    pub duration: Option<Value>,
}

#[derive(Debug, Serialize)]
pub struct ValidateResponse {
    pub budget_valid: bool,
    pub duration_valid: bool,
    pub budget_range: Option<BudgetRange>,
}

pub fn router() -> Router<SharedConfig> {
    Router::new()
        .route("/validate", post(validate))
        .route("/render/{artifact}", post(render_artifact))
}

async fn validate(Json(request): Json<ValidateRequest>) -> Json<ValidateResponse> {
    let budget = request.budget.unwrap_or_default();
    let duration = request
        .duration
        .as_ref()
        .map(display_value)
        .unwrap_or_default();

    Json(ValidateResponse {
        budget_valid: validate_budget(&budget),
        duration_valid: validate_duration(&duration),
        budget_range: BudgetRange::parse(&budget),
    })
}

async fn render_artifact(
    Path(artifact): Path<String>,
    Json(payload): Json<Value>,
) -> Result<Json<Vec<DisplayBlock>>, StatusCode> {
    let kind = ArtifactKind::from_slug(&artifact).ok_or(StatusCode::NOT_FOUND)?;
    let Value::Object(data) = payload else {
        return Err(StatusCode::UNPROCESSABLE_ENTITY);
    };

    let blocks = match kind {
        ArtifactKind::SearchQueries => render_search_queries(&data),
        ArtifactKind::SearchResults => render_search_results(&data),
        ArtifactKind::HotelPackages => render_hotel_packages(Some(&data)),
        ArtifactKind::HtmlReport => return Err(StatusCode::NOT_FOUND),
    };
    debug!(artifact = kind.label(), blocks = blocks.len(), "Rendered artifact");

    Ok(Json(blocks))
}
