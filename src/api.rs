// 🌐 REST API - analysis and memo endpoints (axum)
//
// GET  /api/health          health check
// POST /api/analyze         TransactionInput JSON → AnalysisResult
// POST /api/analyze/form    form strings → { input, result }
// POST /api/memo            { input, result } → memo text
// POST /api/memo/download   TransactionInput JSON → memo as a text/plain attachment

use crate::analysis::AnalysisResult;
use crate::engine::evaluate;
use crate::input::{ParseMode, RawTransactionInput, TransactionInput};
use crate::memo::{memo_filename, MemoFormatter};
use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

/// Results kept per input fingerprint before the cache is cleared
const CACHE_CAPACITY: usize = 512;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    formatter: Arc<MemoFormatter>,
    cache: Arc<Mutex<HashMap<String, AnalysisResult>>>,
}

impl AppState {
    pub fn new(formatter: MemoFormatter) -> Self {
        Self {
            formatter: Arc::new(formatter),
            cache: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Evaluate, reusing a previous result for an identical input
    fn analyze(&self, input: &TransactionInput) -> AnalysisResult {
        let key = input.fingerprint();
        let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(result) = cache.get(&key) {
            return result.clone();
        }

        let result = evaluate(input);
        if cache.len() >= CACHE_CAPACITY {
            cache.clear();
        }
        cache.insert(key, result.clone());
        result
    }

    pub fn cached_results(&self) -> usize {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}

/// API Response wrapper
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    fn failure(error: impl ToString) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.to_string()),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FormAnalysis {
    pub input: TransactionInput,
    pub result: AnalysisResult,
}

#[derive(Debug, Default, Deserialize)]
pub struct FormOptions {
    /// Reject malformed numbers instead of treating them as zero
    #[serde(default)]
    pub strict: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MemoRequest {
    pub input: TransactionInput,
    #[serde(default)]
    pub result: Option<AnalysisResult>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MemoResponse {
    pub filename: String,
    pub memo: String,
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /api/health - Health check
async fn health_check() -> impl IntoResponse {
    Json(ApiResponse::ok("OK"))
}

/// POST /api/analyze - Evaluate a typed transaction
async fn analyze(State(state): State<AppState>, Json(input): Json<TransactionInput>) -> Response {
    if let Err(e) = input.validate() {
        warn!("Rejected transaction: {}", e);
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ApiResponse::<AnalysisResult>::failure(e)),
        )
            .into_response();
    }

    let result = state.analyze(&input);
    info!(treatment = result.accounting_treatment.as_str(), "transaction analyzed");
    (StatusCode::OK, Json(ApiResponse::ok(result))).into_response()
}

/// POST /api/analyze/form - Evaluate raw form values
async fn analyze_form(
    State(state): State<AppState>,
    Query(options): Query<FormOptions>,
    Json(raw): Json<RawTransactionInput>,
) -> Response {
    let mode = if options.strict {
        ParseMode::Strict
    } else {
        ParseMode::Lenient
    };

    match raw.parse(mode) {
        Ok(input) => {
            let result = state.analyze(&input);
            info!(treatment = result.accounting_treatment.as_str(), "form analyzed");
            (StatusCode::OK, Json(ApiResponse::ok(FormAnalysis { input, result }))).into_response()
        }
        Err(e) => {
            warn!("Rejected form: {}", e);
            (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(ApiResponse::<FormAnalysis>::failure(e)),
            )
                .into_response()
        }
    }
}

/// POST /api/memo - Render the memo for an analyzed transaction
async fn memo(State(state): State<AppState>, Json(request): Json<MemoRequest>) -> Response {
    match state.formatter.try_format(&request.input, request.result.as_ref()) {
        Ok(memo) => {
            let response = MemoResponse {
                filename: memo_filename(&request.input),
                memo,
            };
            (StatusCode::OK, Json(ApiResponse::ok(response))).into_response()
        }
        Err(e) => (
            StatusCode::PRECONDITION_FAILED,
            Json(ApiResponse::<MemoResponse>::failure(e)),
        )
            .into_response(),
    }
}

/// POST /api/memo/download - Evaluate and return the memo as a file
async fn download_memo(State(state): State<AppState>, Json(input): Json<TransactionInput>) -> Response {
    if let Err(e) = input.validate() {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ApiResponse::<MemoResponse>::failure(e)),
        )
            .into_response();
    }

    let result = state.analyze(&input);
    let memo = state.formatter.format(&input, &result);
    let filename = memo_filename(&input);
    let disposition = format!(
        "attachment; filename=\"{}\"; filename*=UTF-8''{}",
        filename.replace('"', ""),
        urlencoding::encode(&filename)
    );

    info!(%filename, "memo downloaded");
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        memo,
    )
        .into_response()
}

// ============================================================================
// Router
// ============================================================================

pub fn router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/analyze", post(analyze))
        .route("/analyze/form", post(analyze_form))
        .route("/memo", post(memo))
        .route("/memo/download", post(download_memo))
        .with_state(state);

    Router::new()
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn app() -> (AppState, Router) {
        let state = AppState::new(MemoFormatter::default());
        (state.clone(), router(state))
    }

    async fn post_json(app: Router, uri: &str, body: Value) -> (StatusCode, Vec<u8>, Option<String>) {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let disposition = response
            .headers()
            .get(header::CONTENT_DISPOSITION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, bytes.to_vec(), disposition)
    }

    fn employee_sale() -> Value {
        json!({
            "companyName": "Acme",
            "transactionDate": "2025-02-01",
            "transactionPrice": 15,
            "fairValue": 10,
            "numberOfShares": 1000,
            "sellerType": "current_employee",
            "buyerType": "entity"
        })
    }

    #[tokio::test]
    async fn test_health() {
        let (_, app) = app();
        let request = Request::builder().uri("/api/health").body(Body::empty()).unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_analyze_caches_result() {
        let (state, app) = app();

        let (status, body, _) = post_json(app.clone(), "/api/analyze", employee_sale()).await;
        assert_eq!(status, StatusCode::OK);

        let parsed: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(parsed["success"], true);
        assert_eq!(parsed["data"]["accountingTreatment"], "compensation");
        assert_eq!(parsed["data"]["isCompensatory"], true);

        post_json(app, "/api/analyze", employee_sale()).await;
        assert_eq!(state.cached_results(), 1);
    }

    #[tokio::test]
    async fn test_analyze_rejects_negative_price() {
        let (_, app) = app();
        let mut input = employee_sale();
        input["transactionPrice"] = json!(-1);

        let (status, body, _) = post_json(app, "/api/analyze", input).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        let parsed: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(parsed["success"], false);
    }

    #[tokio::test]
    async fn test_analyze_rejects_unrepresentable_total() {
        let (state, app) = app();
        let mut input = employee_sale();
        input["transactionPrice"] = json!("100000000000000000000");
        input["fairValue"] = json!(0);
        input["numberOfShares"] = json!(1_000_000_000u64);

        let (status, body, _) = post_json(app, "/api/analyze", input).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(state.cached_results(), 0);

        let parsed: Value = serde_json::from_slice(&body).unwrap();
        assert!(parsed["error"].as_str().unwrap().starts_with("transactionPrice"));
    }

    #[tokio::test]
    async fn test_analyze_form_modes() {
        let (_, app) = app();
        let form = json!({
            "transactionPrice": "15",
            "fairValue": "abc",
            "numberOfShares": "100",
            "sellerType": "investor",
            "buyerType": "entity"
        });

        let (status, body, _) = post_json(app.clone(), "/api/analyze/form", form.clone()).await;
        assert_eq!(status, StatusCode::OK);
        let parsed: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(parsed["data"]["result"]["accountingTreatment"], "distribution");

        let (status, _, _) = post_json(app, "/api/analyze/form?strict=true", form).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_memo_requires_result() {
        let (_, app) = app();

        let (status, _, _) = post_json(app.clone(), "/api/memo", json!({ "input": employee_sale() })).await;
        assert_eq!(status, StatusCode::PRECONDITION_FAILED);

        let input: TransactionInput = serde_json::from_value(employee_sale()).unwrap();
        let result = evaluate(&input);
        let (status, body, _) = post_json(
            app,
            "/api/memo",
            json!({ "input": employee_sale(), "result": result }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let parsed: ApiResponse<MemoResponse> = serde_json::from_slice(&body).unwrap();
        let memo = parsed.data.unwrap();
        assert_eq!(memo.filename, "Secondary_Market_Transaction_Memo_2025-02-01.txt");
        assert!(memo.memo.starts_with("MEMORANDUM"));
    }

    #[tokio::test]
    async fn test_download_sets_filename() {
        let (_, app) = app();

        let (status, body, disposition) = post_json(app, "/api/memo/download", employee_sale()).await;
        assert_eq!(status, StatusCode::OK);
        assert!(disposition
            .unwrap()
            .contains("filename=\"Secondary_Market_Transaction_Memo_2025-02-01.txt\""));
        assert!(String::from_utf8(body).unwrap().contains("COMPENSATORY"));
    }
}
