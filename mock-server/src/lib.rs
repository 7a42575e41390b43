use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
};

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use percent_encoding::percent_decode_str;
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::{debug, info};

pub const CSV_TYPE: &str = "text/csv";
pub const XLSX_TYPE: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Sheet {
    pub id: u64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "folderId")]
    pub folder_id: Option<u64>,
    #[serde(default)]
    pub rows: Vec<Vec<String>>,
}

#[derive(Deserialize)]
pub struct CreateSheet {
    pub name: String,
}

/// Envelope the API wraps around mutation results.
#[derive(Debug, Serialize, Deserialize)]
pub struct ResultEnvelope<T> {
    pub message: String,
    #[serde(rename = "resultCode")]
    pub result_code: u32,
    pub result: T,
}

impl<T> ResultEnvelope<T> {
    fn success(result: T) -> Self {
        Self {
            message: "SUCCESS".to_string(),
            result_code: 0,
            result,
        }
    }
}

/// What an import endpoint received, echoed back for inspection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ImportReceipt {
    pub sheet: Sheet,
    #[serde(rename = "contentType")]
    pub content_type: String,
    #[serde(rename = "contentLength")]
    pub content_length: Option<u64>,
    pub filename: Option<String>,
    pub bytes: usize,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct CurrentUser {
    pub email: String,
    #[serde(rename = "userAgent")]
    pub user_agent: Option<String>,
}

#[derive(Default)]
pub struct Store {
    next_id: AtomicU64,
    sheets: RwLock<HashMap<u64, Sheet>>,
}

impl Store {
    async fn insert(&self, name: String, folder_id: Option<u64>, rows: Vec<Vec<String>>) -> Sheet {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        let sheet = Sheet {
            id,
            name,
            folder_id,
            rows,
        };
        self.sheets.write().await.insert(id, sheet.clone());
        sheet
    }
}

pub type Db = Arc<Store>;

pub const OWNER_EMAIL: &str = "owner@example.com";

pub fn app() -> Router {
    let db: Db = Arc::new(Store::default());
    Router::new()
        .route("/2.0/sheets", get(list_sheets).post(create_sheet))
        .route("/2.0/sheets/import", post(import_sheet))
        .route("/2.0/sheets/{sheet_id}", get(get_sheet))
        .route("/2.0/folders/{folder_id}/sheets/import", post(import_sheet_into_folder))
        .route("/2.0/users/me", get(current_user))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "mock api listening");
    }
    axum::serve(listener, app()).await
}

fn authorize(headers: &HeaderMap) -> Result<(), StatusCode> {
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .unwrap_or_default();
    if token.is_empty() {
        debug!("rejecting request without bearer token");
        return Err(StatusCode::UNAUTHORIZED);
    }
    Ok(())
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

/// Pull `filename="..."` out of a `Content-Disposition` value.
fn disposition_filename(headers: &HeaderMap) -> Option<String> {
    let value = header_str(headers, "content-disposition")?;
    let raw = value.split("filename=").nth(1)?.trim().trim_matches('"');
    Some(percent_decode_str(raw).decode_utf8_lossy().into_owned())
}

fn parse_csv(body: &[u8]) -> Vec<Vec<String>> {
    String::from_utf8_lossy(body)
        .lines()
        .filter(|l| !l.is_empty())
        .map(|l| l.split(',').map(str::to_string).collect())
        .collect()
}

fn to_csv(sheet: &Sheet) -> String {
    sheet.rows.iter().map(|r| format!("{}\n", r.join(","))).collect()
}

async fn list_sheets(State(db): State<Db>, headers: HeaderMap) -> Result<Json<serde_json::Value>, StatusCode> {
    authorize(&headers)?;
    let sheets = db.sheets.read().await;
    let mut data: Vec<&Sheet> = sheets.values().collect();
    data.sort_by_key(|s| s.id);
    Ok(Json(serde_json::json!({ "totalCount": data.len(), "data": data })))
}

async fn create_sheet(
    State(db): State<Db>,
    headers: HeaderMap,
    Json(input): Json<CreateSheet>,
) -> Result<(StatusCode, Json<ResultEnvelope<Sheet>>), StatusCode> {
    authorize(&headers)?;
    let sheet = db.insert(input.name, None, Vec::new()).await;
    Ok((StatusCode::OK, Json(ResultEnvelope::success(sheet))))
}

async fn get_sheet(
    State(db): State<Db>,
    Path(sheet_id): Path<u64>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Result<Response, StatusCode> {
    authorize(&headers)?;
    let sheets = db.sheets.read().await;
    let sheet = sheets.get(&sheet_id).ok_or(StatusCode::NOT_FOUND)?;
    match header_str(&headers, "accept") {
        Some(CSV_TYPE) => Ok(([(header::CONTENT_TYPE, CSV_TYPE)], to_csv(sheet)).into_response()),
        Some(accept) if accept != "application/json" && accept != "*/*" => Err(StatusCode::NOT_ACCEPTABLE),
        _ => {
            let mut body = serde_json::to_value(sheet).map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
            if let Some(include) = query.get("include") {
                body["include"] = serde_json::Value::String(include.clone());
            }
            Ok(Json(body).into_response())
        }
    }
}

async fn import(
    db: &Store,
    folder_id: Option<u64>,
    query: &HashMap<String, String>,
    headers: &HeaderMap,
    body: Bytes,
) -> Result<Json<ResultEnvelope<ImportReceipt>>, StatusCode> {
    authorize(headers)?;
    let content_type = header_str(headers, "content-type")
        .ok_or(StatusCode::UNSUPPORTED_MEDIA_TYPE)?
        .to_string();
    if content_type != CSV_TYPE && content_type != XLSX_TYPE {
        return Err(StatusCode::UNSUPPORTED_MEDIA_TYPE);
    }
    let name = query.get("sheetName").cloned().ok_or(StatusCode::BAD_REQUEST)?;
    let rows = if content_type == CSV_TYPE { parse_csv(&body) } else { Vec::new() };
    let sheet = db.insert(name, folder_id, rows).await;
    Ok(Json(ResultEnvelope::success(ImportReceipt {
        sheet,
        content_type,
        content_length: header_str(headers, "content-length").and_then(|v| v.parse().ok()),
        filename: disposition_filename(headers),
        bytes: body.len(),
    })))
}

async fn import_sheet(
    State(db): State<Db>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<ResultEnvelope<ImportReceipt>>, StatusCode> {
    import(&db, None, &query, &headers, body).await
}

async fn import_sheet_into_folder(
    State(db): State<Db>,
    Path(folder_id): Path<u64>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<ResultEnvelope<ImportReceipt>>, StatusCode> {
    import(&db, Some(folder_id), &query, &headers, body).await
}

async fn current_user(headers: HeaderMap) -> Result<Json<CurrentUser>, StatusCode> {
    authorize(&headers)?;
    let email = match header_str(&headers, "assume-user") {
        Some(v) => percent_decode_str(v).decode_utf8_lossy().into_owned(),
        None => OWNER_EMAIL.to_string(),
    };
    Ok(Json(CurrentUser {
        email,
        user_agent: header_str(&headers, "user-agent").map(str::to_string),
    }))
}
