//! Prediction handlers

use axum::{extract::{rejection::JsonRejection, State}, Json};
use validator::Validate;

use cardio_core::{assess, population_comparison, what_if, FeatureRecord};

use crate::{AppState, AppResult};
use crate::handlers::with_history;
use crate::models::{PredictResponse, RawRecord, WhatIfRequest, WhatIfResponse};

/// Run the assessment pipeline and store the result
pub async fn predict(
    State(state): State<AppState>,
    payload: Result<Json<RawRecord>, JsonRejection>,
) -> AppResult<Json<PredictResponse>> {
    let Json(raw) = payload?;
    let record = FeatureRecord::from_map(raw)?;

    let (assessment, population) = with_history(&state, move |engine, history| {
        let assessment = assess(engine, history, &record)?;
        Ok((assessment, population_comparison(engine, &record)))
    })
    .await?;

    tracing::debug!(
        "Prediction {} stored: {:.1}%",
        assessment.entry.id,
        assessment.prediction.percent()
    );

    Ok(Json(PredictResponse::new(assessment, population)))
}

/// Re-score with adjusted cholesterol / blood pressure (not stored)
pub async fn what_if_analysis(
    State(state): State<AppState>,
    payload: Result<Json<WhatIfRequest>, JsonRejection>,
) -> AppResult<Json<WhatIfResponse>> {
    let Json(req) = payload?;
    req.validate()?;

    let adjustments = req.adjustments();
    let record = FeatureRecord::from_map(req.record)?;
    let outcome = what_if(&state.engine, &record, &adjustments)?;

    Ok(Json(outcome.into()))
}
