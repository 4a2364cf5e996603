use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tokio::sync::{mpsc, oneshot};
use tower_http::trace::TraceLayer;

use super::{pix::PixServiceRequest, ServiceError};
use crate::models::pix::DecodeRequest;

mod charges;

#[derive(Clone)]
struct AppState {
    pix_channel: mpsc::Sender<PixServiceRequest>,
}

impl AppState {
    /// Sends a request to the Pix service and waits for its reply.
    async fn call<T>(
        &self,
        request: impl FnOnce(oneshot::Sender<Result<T, ServiceError>>) -> PixServiceRequest,
    ) -> Result<T, ServiceError> {
        let (response_tx, response_rx) = oneshot::channel();

        self.pix_channel
            .send(request(response_tx))
            .await
            .map_err(|e| ServiceError::Communication("Http".to_string(), e.to_string()))?;

        response_rx
            .await
            .map_err(|e| ServiceError::Communication("Pix".to_string(), e.to_string()))?
    }
}

fn error_response(error: ServiceError) -> (StatusCode, Json<Value>) {
    let (status, kind) = match &error {
        ServiceError::Validation(_) | ServiceError::Decode(_) => {
            (StatusCode::UNPROCESSABLE_ENTITY, "Invalid request")
        }
        ServiceError::NotFound(_) => (StatusCode::NOT_FOUND, "Not found"),
        ServiceError::Communication(..) | ServiceError::Internal(_) => {
            log::error!("Request failed: {}", error);
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
        }
    };

    (
        status,
        Json(json!({
            "error": kind,
            "details": error.to_string()
        })),
    )
}

async fn decode_payload(
    State(state): State<AppState>,
    Json(req): Json<DecodeRequest>,
) -> impl IntoResponse {
    let result = state
        .call(|response| PixServiceRequest::Decode {
            payload: req.payload,
            response,
        })
        .await;

    match result {
        Ok(decoded) => (StatusCode::OK, Json(json!(decoded))),
        Err(e) => error_response(e),
    }
}

fn router(pix_channel: mpsc::Sender<PixServiceRequest>) -> Router {
    let app_state = AppState { pix_channel };

    Router::new()
        .route(
            "/pix/charges",
            post(charges::create_charge).get(charges::list_charges),
        )
        .route("/pix/charges/{id}", get(charges::get_charge))
        .route("/pix/charges/{id}/qr.svg", get(charges::get_charge_qr))
        .route("/pix/decode", post(decode_payload))
        .route("/health", get(|| async { "OK" }))
        .with_state(app_state)
        .layer(TraceLayer::new_for_http())
}

pub async fn start_http_server(
    listen: &str,
    pix_channel: mpsc::Sender<PixServiceRequest>,
) -> Result<(), anyhow::Error> {
    let app = router(pix_channel);

    let listener = tokio::net::TcpListener::bind(listen).await?;
    log::info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::pix::{PixRequestHandler, PixService};
    use crate::services::Service;
    use crate::settings::{Charges, Merchant};
    use rust_decimal::Decimal;

    const MARIA: &str = "00020126350014br.gov.bcb.pix0113teste@pix.com5204000053039865406150.505802BR5911Maria Doula6009Sao Paulo62100506ABC123630492D3";

    async fn spawn_app() -> String {
        let (pix_tx, mut pix_rx) = mpsc::channel(16);
        let handler = PixRequestHandler::new(
            Merchant {
                pix_key: "teste@pix.com".to_string(),
                beneficiary_name: "Maria Doula".to_string(),
                city: "Sao Paulo".to_string(),
            },
            Charges {
                max_amount: Some(Decimal::from(5000)),
                max_stored: None,
            },
        );
        tokio::spawn(async move {
            let mut service = PixService::new();
            service.run(handler, &mut pix_rx).await;
        });

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router(pix_tx)).await.unwrap();
        });

        format!("http://{}", addr)
    }

    async fn create(client: &reqwest::Client, base: &str, body: Value) -> reqwest::Response {
        client
            .post(format!("{}/pix/charges", base))
            .json(&body)
            .send()
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn health() {
        let base = spawn_app().await;
        let body = reqwest::get(format!("{}/health", base))
            .await
            .unwrap()
            .text()
            .await
            .unwrap();
        assert_eq!(body, "OK");
    }

    #[tokio::test]
    async fn create_and_fetch_charge() {
        let base = spawn_app().await;
        let client = reqwest::Client::new();

        let response = create(
            &client,
            &base,
            json!({"amount": 150.5, "tx_id": "ABC123", "description": "Consulta pré-natal"}),
        )
        .await;
        assert_eq!(response.status(), reqwest::StatusCode::CREATED);
        let created: Value = response.json().await.unwrap();
        assert_eq!(created["payload"], MARIA);
        assert_eq!(created["tx_id"], "ABC123");
        assert_eq!(created["description"], "Consulta pré-natal");

        let id = created["id"].as_str().unwrap();
        let fetched: Value = client
            .get(format!("{}/pix/charges/{}", base, id))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(fetched, created);

        let listed: Value = client
            .get(format!("{}/pix/charges", base))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(listed.as_array().unwrap().len(), 1);
        assert_eq!(listed[0]["id"], created["id"]);
    }

    #[tokio::test]
    async fn charge_qr_is_svg() {
        let base = spawn_app().await;
        let client = reqwest::Client::new();
        let created: Value = create(&client, &base, json!({"amount": "80.00"}))
            .await
            .json()
            .await
            .unwrap();

        let response = client
            .get(format!(
                "{}/pix/charges/{}/qr.svg",
                base,
                created["id"].as_str().unwrap()
            ))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::OK);
        assert_eq!(
            response.headers()[reqwest::header::CONTENT_TYPE],
            "image/svg+xml"
        );
        assert!(response.text().await.unwrap().contains("<svg"));
    }

    #[tokio::test]
    async fn unknown_charge_is_not_found() {
        let base = spawn_app().await;
        let id = uuid::Uuid::new_v4();

        for path in [format!("/pix/charges/{}", id), format!("/pix/charges/{}/qr.svg", id)] {
            let response = reqwest::get(format!("{}{}", base, path)).await.unwrap();
            assert_eq!(response.status(), reqwest::StatusCode::NOT_FOUND);
        }
    }

    #[tokio::test]
    async fn invalid_charges_are_rejected() {
        let base = spawn_app().await;
        let client = reqwest::Client::new();

        for body in [
            json!({"tx_id": "X".repeat(120)}),
            json!({"amount": 5000.01}),
            json!({"pix_key": ""}),
        ] {
            let response = create(&client, &base, body).await;
            assert_eq!(response.status(), reqwest::StatusCode::UNPROCESSABLE_ENTITY);
            let error: Value = response.json().await.unwrap();
            assert_eq!(error["error"], "Invalid request");
        }

        let listed: Value = reqwest::get(format!("{}/pix/charges", base))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(listed, json!([]));
    }

    #[tokio::test]
    async fn decode_endpoint() {
        let base = spawn_app().await;
        let client = reqwest::Client::new();

        let response = client
            .post(format!("{}/pix/decode", base))
            .json(&json!({ "payload": MARIA }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::OK);
        let decoded: Value = response.json().await.unwrap();
        assert_eq!(decoded["pix_key"], "teste@pix.com");
        assert_eq!(decoded["amount"], "150.50");
        assert_eq!(decoded["tx_id"], "ABC123");

        let tampered = MARIA.replace("Maria", "Mario");
        let response = client
            .post(format!("{}/pix/decode", base))
            .json(&json!({ "payload": tampered }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::UNPROCESSABLE_ENTITY);
    }
}
