//! HTTP routes

use crate::error::{Result, WebError};
use crate::state::AppState;
use axum::extract::{Form, Path, Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use minijinja::context;
use serde::Deserialize;
use stockcheck_quote::panels::{analysis_panels, overview_panels, signal};
use stockcheck_quote::record::labels;
use stockcheck_quote::{
    ConnectionReport, DashboardData, TickerLookupResult, create_charts, normalize_ticker,
    validate_ticker,
};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

/// Tickers linked from the index page
pub const POPULAR_TICKERS: [&str; 4] = ["AAPL", "MSFT", "TSLA", "GOOGL"];

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/lookup", post(lookup_form))
        .route("/dashboard", post(dashboard_form))
        .route("/dashboard/:ticker", get(dashboard_page))
        .route("/api/dashboard/:ticker", get(api_dashboard))
        .route("/api/lookup", get(api_lookup))
        .route("/api/connection-test", get(api_connection_test))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(Debug, Deserialize)]
struct LookupForm {
    #[serde(default)]
    company_name: String,
}

#[derive(Debug, Deserialize)]
struct DashboardForm {
    ticker: Option<String>,
    /// Older form field name, taken as a ticker
    company_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LookupQuery {
    #[serde(default)]
    company: String,
}

async fn index(State(state): State<AppState>) -> Result<Html<String>> {
    render_index(&state, "", "", None)
}

async fn lookup_form(
    State(state): State<AppState>,
    Form(form): Form<LookupForm>,
) -> Result<Html<String>> {
    let result = state.lookup.find_ticker(&form.company_name).await;
    let ticker = result.ticker.clone().unwrap_or_default();
    render_index(&state, &form.company_name, &ticker, Some(&result))
}

async fn dashboard_form(
    State(state): State<AppState>,
    Form(form): Form<DashboardForm>,
) -> Result<Response> {
    let raw = form
        .ticker
        .filter(|t| !t.trim().is_empty())
        .or(form.company_name)
        .unwrap_or_default();

    let ticker = normalize_ticker(&raw);
    if ticker.is_empty() {
        return Err(WebError::MissingInput("Company name is required".to_string()));
    }

    render_dashboard(&state, &ticker).await
}

async fn dashboard_page(
    State(state): State<AppState>,
    Path(ticker): Path<String>,
) -> Result<Response> {
    render_dashboard(&state, &normalize_ticker(&ticker)).await
}

async fn api_dashboard(
    State(state): State<AppState>,
    Path(ticker): Path<String>,
) -> Json<DashboardData> {
    Json(state.service.get_dashboard_data(&normalize_ticker(&ticker)).await)
}

async fn api_lookup(
    State(state): State<AppState>,
    Query(query): Query<LookupQuery>,
) -> Json<TickerLookupResult> {
    Json(state.lookup.find_ticker(&query.company).await)
}

async fn api_connection_test(State(state): State<AppState>) -> Json<ConnectionReport> {
    Json(state.service.test_api_connection().await)
}

async fn health() -> &'static str {
    "ok"
}

fn render_index(
    state: &AppState,
    company_name: &str,
    ticker: &str,
    lookup: Option<&TickerLookupResult>,
) -> Result<Html<String>> {
    state.templates.render(
        "index.html",
        context! {
            popular => POPULAR_TICKERS,
            lookup_enabled => state.lookup.is_configured(),
            company_name => company_name,
            ticker => ticker,
            lookup => lookup,
        },
    )
}

async fn render_dashboard(state: &AppState, ticker: &str) -> Result<Response> {
    if let Err(e) = validate_ticker(ticker) {
        warn!("Rejected ticker {:?}: {}", ticker, e);
        let page = state.templates.render(
            "error.html",
            context! { error => e.to_string(), ticker => ticker },
        )?;
        return Ok((StatusCode::BAD_REQUEST, page).into_response());
    }

    let record = state.service.fetch_company_data(ticker).await;
    let chart_url = if record.is_fallback() {
        None
    } else {
        state.service.source().chart_url(ticker)
    };
    info!("Rendering dashboard for {} ({:?})", ticker, record.origin());

    let page = state.templates.render(
        "dashboard.html",
        context! {
            ticker => ticker,
            company => record.company(),
            is_fallback => record.is_fallback(),
            overview => overview_panels(&record),
            analysis => analysis_panels(&record),
            signal => signal(&record),
            fields => record.fields(),
            description => record.get(labels::DESCRIPTION),
            ratings => record.get(labels::RATINGS),
            chart_url => chart_url,
            charts => create_charts(ticker).figures(),
        },
    )?;
    Ok(page.into_response())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::{Body, to_bytes};
    use axum::http::Request;
    use mockall::mock;
    use std::sync::Arc;
    use stockcheck_quote::{DataOrigin, QuoteRecord, QuoteSource, StockError, TickerLookup};
    use tower::ServiceExt;

    mock! {
        Source {}

        #[async_trait]
        impl QuoteSource for Source {
            async fn fetch(&self, ticker: &str) -> stockcheck_quote::Result<QuoteRecord>;
            fn chart_url(&self, ticker: &str) -> Option<String>;
        }
    }

    fn apple(ticker: &str) -> QuoteRecord {
        let mut record = QuoteRecord::new(ticker, DataOrigin::Live);
        record.insert(labels::COMPANY, "Apple Inc");
        record.insert(labels::PRICE, "229.54");
        record.insert(labels::SIGNAL, "Buy");
        record
    }

    fn live_source() -> MockSource {
        let mut source = MockSource::new();
        source.expect_fetch().returning(|t| Ok(apple(t)));
        source
            .expect_chart_url()
            .returning(|t| Some(format!("https://charts.example/{t}.png")));
        source
    }

    fn failing_source() -> MockSource {
        let mut source = MockSource::new();
        source.expect_fetch().returning(|t| {
            Err(StockError::DataUnavailable {
                symbol: t.to_string(),
                reason: "HTTP 404 Not Found".to_string(),
            })
        });
        source
    }

    fn app(source: MockSource) -> Router {
        let state = AppState::new(Arc::new(source), TickerLookup::disabled()).unwrap();
        router(state)
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, String) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post_form(uri: &str, body: &'static str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = send(app(MockSource::new()), get_request("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "ok");
    }

    #[tokio::test]
    async fn test_index_lists_popular_tickers() {
        let (status, body) = send(app(MockSource::new()), get_request("/")).await;

        assert_eq!(status, StatusCode::OK);
        for ticker in POPULAR_TICKERS {
            assert!(body.contains(&format!("/dashboard/{ticker}")));
        }
    }

    #[tokio::test]
    async fn test_empty_dashboard_form_is_rejected() {
        let (status, body) = send(app(MockSource::new()), post_form("/dashboard", "ticker=")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "Company name is required");
    }

    #[tokio::test]
    async fn test_invalid_ticker_renders_error_page() {
        let (status, body) =
            send(app(MockSource::new()), post_form("/dashboard", "ticker=AA%24PL")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.contains("Ticker contains invalid characters"));
    }

    #[tokio::test]
    async fn test_dashboard_form_renders_live_record() {
        let (status, body) = send(app(live_source()), post_form("/dashboard", "ticker=aapl")).await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Apple Inc"));
        assert!(body.contains("$229.54"));
        assert!(body.contains("price_chart"));
        // Attribute values are HTML-escaped
        assert!(body.contains("charts.example"));
    }

    #[tokio::test]
    async fn test_dashboard_charts_in_display_order() {
        let (_, body) = send(app(live_source()), get_request("/dashboard/AAPL")).await;

        let positions: Vec<usize> = [
            "id=\"price_chart\"",
            "id=\"volume_chart\"",
            "id=\"valuation_chart\"",
            "id=\"performance_chart\"",
        ]
        .iter()
        .map(|id| body.find(id).unwrap())
        .collect();

        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[tokio::test]
    async fn test_legacy_company_name_field() {
        let (status, body) =
            send(app(live_source()), post_form("/dashboard", "company_name=msft")).await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("MSFT"));
    }

    #[tokio::test]
    async fn test_dashboard_link_falls_back() {
        let (status, body) = send(app(failing_source()), get_request("/dashboard/oracle")).await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Sample Company (ORACLE)"));
    }

    #[tokio::test]
    async fn test_api_dashboard_always_succeeds() {
        let (status, body) = send(app(failing_source()), get_request("/api/dashboard/ORACLE")).await;

        assert_eq!(status, StatusCode::OK);
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["source"], "fallback");
        assert_eq!(json["data"]["Company"], "Sample Company (ORACLE)");
        assert_eq!(json["charts"].as_object().unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_api_lookup_without_key() {
        let (status, body) = send(app(MockSource::new()), get_request("/api/lookup?company=Apple")).await;

        assert_eq!(status, StatusCode::OK);
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "API key not configured.");
    }

    #[tokio::test]
    async fn test_lookup_form_shows_error() {
        let (status, body) =
            send(app(MockSource::new()), post_form("/lookup", "company_name=Apple")).await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("API key not configured."));
    }

    #[tokio::test]
    async fn test_connection_test_report() {
        let (status, body) = send(app(live_source()), get_request("/api/connection-test")).await;

        assert_eq!(status, StatusCode::OK);
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        for ticker in ["AAPL", "MSFT", "GOOGL", "TSLA", "AMZN"] {
            assert_eq!(json[ticker]["status"], "success");
        }
        assert!(body.find("\"AAPL\"").unwrap() < body.find("\"AMZN\"").unwrap());
    }
}
