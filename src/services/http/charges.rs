use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use uuid::Uuid;

use super::{error_response, AppState};
use crate::models::pix::NewCharge;
use crate::services::{pix::PixServiceRequest, ServiceError};
use crate::utils;

pub(super) async fn create_charge(
    State(state): State<AppState>,
    Json(req): Json<NewCharge>,
) -> impl IntoResponse {
    let result = state
        .call(|response| PixServiceRequest::NewCharge {
            charge: req,
            response,
        })
        .await;

    match result {
        Ok(charge) => (StatusCode::CREATED, Json(json!(charge))),
        Err(e) => error_response(e),
    }
}

pub(super) async fn list_charges(State(state): State<AppState>) -> impl IntoResponse {
    match state
        .call(|response| PixServiceRequest::ListCharges { response })
        .await
    {
        Ok(charges) => (StatusCode::OK, Json(json!(charges))),
        Err(e) => error_response(e),
    }
}

pub(super) async fn get_charge(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    match state
        .call(|response| PixServiceRequest::GetCharge { id, response })
        .await
    {
        Ok(charge) => (StatusCode::OK, Json(json!(charge))),
        Err(e) => error_response(e),
    }
}

pub(super) async fn get_charge_qr(State(state): State<AppState>, Path(id): Path<Uuid>) -> Response {
    let charge = match state
        .call(|response| PixServiceRequest::GetCharge { id, response })
        .await
    {
        Ok(charge) => charge,
        Err(e) => return error_response(e).into_response(),
    };

    match utils::render_svg(&charge.payload) {
        Ok(svg) => ([(header::CONTENT_TYPE, "image/svg+xml")], svg).into_response(),
        Err(e) => error_response(ServiceError::Internal(e.to_string())).into_response(),
    }
}
