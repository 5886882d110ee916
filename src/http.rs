//! HTTP transport: turns requests into [`Command`]s and renders
//! [`Outcome`]s and [`Error`]s as responses.
//!
//! | Method | Path                            | Command |
//! |--------|---------------------------------|---------|
//! | GET    | `/api/accounts?p=<page>`        | List    |
//! | POST   | `/api/accounts`                 | Create  |
//! | GET    | `/api/accounts/:account_number` | Get     |
//! | PUT    | `/api/accounts/:account_number` | Update  |
//! | DELETE | `/api/accounts/:account_number` | Delete  |
//! | GET    | `/api/accounts.csv`             | CSV export of the full list |

use std::net::SocketAddr;

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{OriginalUri, Path, Query, State};
use axum::http::{header, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::csv_utils::write_csv;
use crate::dto::AccountDto;
use crate::handler::{Command, Outcome};
use crate::stores::AccountNumber;
use crate::{Error, RequestHandler};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub p: Option<String>,
}

pub fn router(handler: RequestHandler) -> Router {
    Router::new()
        .route("/api/accounts", get(list_accounts).post(create_account))
        .route("/api/accounts.csv", get(export_accounts))
        .route(
            "/api/accounts/:account_number",
            get(get_account).put(update_account).delete(delete_account),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(handler)
}

/// Serves the API on `addr` until Ctrl-C is received.
pub async fn serve(addr: SocketAddr, handler: RequestHandler) -> std::io::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    info!(addr = %listener.local_addr()?, "listening");
    axum::serve(listener, router(handler))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}

async fn list_accounts(
    State(handler): State<RequestHandler>,
    OriginalUri(uri): OriginalUri,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<Response, Error> {
    let Query(query) = query.map_err(bad_query)?;
    let outcome = handler.handle(Command::List { page: query.p })?;
    Ok(render(outcome, &uri))
}

async fn get_account(
    State(handler): State<RequestHandler>,
    OriginalUri(uri): OriginalUri,
    account_number: Result<Path<AccountNumber>, PathRejection>,
) -> Result<Response, Error> {
    let Path(account_number) = account_number.map_err(bad_path)?;
    let outcome = handler.handle(Command::Get { account_number })?;
    Ok(render(outcome, &uri))
}

async fn create_account(
    State(handler): State<RequestHandler>,
    OriginalUri(uri): OriginalUri,
    body: Result<Json<AccountDto>, JsonRejection>,
) -> Result<Response, Error> {
    let Json(account) = body.map_err(bad_body)?;
    let outcome = handler.handle(Command::Create { account })?;
    Ok(render(outcome, &uri))
}

async fn update_account(
    State(handler): State<RequestHandler>,
    OriginalUri(uri): OriginalUri,
    account_number: Result<Path<AccountNumber>, PathRejection>,
    body: Result<Json<AccountDto>, JsonRejection>,
) -> Result<Response, Error> {
    let Path(account_number) = account_number.map_err(bad_path)?;
    let Json(account) = body.map_err(bad_body)?;
    let outcome = handler.handle(Command::Update {
        account_number,
        account,
    })?;
    Ok(render(outcome, &uri))
}

async fn delete_account(
    State(handler): State<RequestHandler>,
    OriginalUri(uri): OriginalUri,
    account_number: Result<Path<AccountNumber>, PathRejection>,
) -> Result<Response, Error> {
    let Path(account_number) = account_number.map_err(bad_path)?;
    let outcome = handler.handle(Command::Delete { account_number })?;
    Ok(render(outcome, &uri))
}

async fn export_accounts(State(handler): State<RequestHandler>) -> Result<Response, Error> {
    let accounts = handler.list(None)?;
    let mut body = Vec::new();
    if let Err(e) = write_csv(&mut body, accounts.iter()) {
        error!(error = %e, "failed to export accounts");
        return Ok(json_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "export_failed",
            e.to_string(),
        ));
    }
    Ok(([(header::CONTENT_TYPE, "text/csv")], body).into_response())
}

/// `uri` is the request URI; created accounts are located relative to it.
fn render(outcome: Outcome, uri: &Uri) -> Response {
    match outcome {
        Outcome::Accounts(accounts) => Json(accounts).into_response(),
        Outcome::Account(account) => Json(account).into_response(),
        Outcome::Created { account, location } => {
            let location = format!("{}/{}", uri.path().trim_end_matches('/'), location);
            (
                StatusCode::CREATED,
                [(header::LOCATION, location)],
                Json(account),
            )
                .into_response()
        }
        Outcome::Updated | Outcome::Deleted => StatusCode::OK.into_response(),
    }
}

fn bad_path(rejection: PathRejection) -> Error {
    Error::BadRequest(format!("invalid account number: {}", rejection.body_text()))
}

fn bad_query(rejection: QueryRejection) -> Error {
    Error::BadRequest(format!("invalid query: {}", rejection.body_text()))
}

fn bad_body(rejection: JsonRejection) -> Error {
    Error::BadRequest(format!("invalid account body: {}", rejection.body_text()))
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            Error::BadRequest(_) => (StatusCode::BAD_REQUEST, "bad_request"),
            Error::NotFound => (StatusCode::NOT_FOUND, "not_found"),
            Error::OutOfRange { .. } => (StatusCode::BAD_REQUEST, "out_of_range"),
        };
        json_error(status, code, self.to_string())
    }
}

fn json_error(status: StatusCode, code: &'static str, message: impl Into<String>) -> Response {
    (
        status,
        Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
