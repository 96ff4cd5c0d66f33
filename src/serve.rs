//! HTTP server for interactive mode
//!
//! `ratingscope serve games.csv` → loads once, opens the browser, and keeps
//! one [`Dashboard`] session alive. Requests are handled one at a time, so
//! each hover is applied to completion before the next is read.

use crate::dashboard::{Dashboard, PointerEvent};
use crate::error::{ScopeError, ScopeResult};
use crate::query::BucketKey;
use crate::report::html::{self, Mode};
use crate::report::json::CountReport;
use serde::{Deserialize, Serialize};
use tiny_http::{Header, Method, Request, Response, Server};
use tracing::{debug, info, warn};

#[derive(Serialize)]
struct ApiResponse<T> {
    ok: bool,
    data: Option<T>,
    error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    fn success(data: T) -> Self {
        Self { ok: true, data: Some(data), error: None }
    }
}

impl ApiResponse<()> {
    fn failure(error: impl Into<String>) -> Self {
        Self { ok: false, data: None, error: Some(error.into()) }
    }
}

#[derive(Deserialize, Debug, Clone, Copy)]
pub struct CellParams {
    pub year: i32,
    pub rating: i32,
}

/// `/api/leave` may omit the cell; the current selection is used instead.
#[derive(Deserialize, Debug, Clone, Copy, Default)]
pub struct LeaveParams {
    pub year: Option<i32>,
    pub rating: Option<i32>,
}

#[derive(Serialize, Debug)]
pub struct DetailPayload {
    pub selection: Option<BucketKey>,
    pub title: String,
    pub svg: String,
    /// Radius of the marker the event touched, if it exists
    pub marker_radius: Option<f64>,
}

/// A response not yet bound to a connection.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub status: u16,
    pub content_type: &'static str,
    pub body: String,
}

impl Reply {
    fn html(body: String) -> Self {
        Self { status: 200, content_type: "text/html; charset=utf-8", body }
    }

    fn json<T: Serialize>(status: u16, body: &ApiResponse<T>) -> Self {
        match serde_json::to_string(body) {
            Ok(body) => Self { status, content_type: "application/json", body },
            Err(e) => Self::error(500, e.to_string()),
        }
    }

    fn error(status: u16, message: impl Into<String>) -> Self {
        let body = serde_json::to_string(&ApiResponse::failure(message))
            .unwrap_or_else(|_| r#"{"ok":false,"data":null,"error":"internal error"}"#.to_string());
        Self { status, content_type: "application/json", body }
    }
}

/// Start server, open browser, serve the dashboard until the process exits
pub fn start(port: u16, mut dashboard: Dashboard, source: &str, open_browser: bool) -> ScopeResult<()> {
    let addr = format!("127.0.0.1:{}", port);
    let server = Server::http(&addr).map_err(|e| ScopeError::Server(e.to_string()))?;

    let url = format!("http://localhost:{}", port);
    eprintln!("\n\x1b[1;32mratingscope\x1b[0m");
    eprintln!("   {}", url);
    eprintln!("   Serving: {}\n", source);
    info!(%addr, "Listening");

    if open_browser {
        if let Err(e) = open::that(&url) {
            warn!("Could not open browser: {}", e);
        }
    }

    for request in server.incoming_requests() {
        if let Err(e) = handle_request(request, &mut dashboard, source) {
            warn!("Failed to respond: {}", e);
        }
    }

    Ok(())
}

fn handle_request(request: Request, dashboard: &mut Dashboard, source: &str) -> std::io::Result<()> {
    let url = request.url().to_string();
    let method = request.method().clone();
    debug!(%method, %url, "Request");

    let reply = route(dashboard, &method, &url, source);
    let mut response = Response::from_string(reply.body).with_status_code(reply.status);
    if let Ok(header) = Header::from_bytes(&b"Content-Type"[..], reply.content_type.as_bytes()) {
        response = response.with_header(header);
    }
    request.respond(response)
}

/// Dispatch one request against the session.
pub fn route(dashboard: &mut Dashboard, method: &Method, url: &str, source: &str) -> Reply {
    let mut parts = url.splitn(2, '?');
    let path = parts.next().unwrap_or("/");
    let query = parts.next().unwrap_or("");

    match (method, path) {
        (&Method::Get, "/") => match html::page(dashboard, Mode::Live, source) {
            Ok(page) => Reply::html(page),
            Err(e) => Reply::error(500, e.to_string()),
        },

        (&Method::Get, "/api/enter") => match serde_urlencoded::from_str::<CellParams>(query) {
            Ok(p) => {
                dashboard.handle(PointerEvent::Enter { year: p.year, bucket: p.rating });
                Reply::json(200, &ApiResponse::success(detail_payload(dashboard, Some((p.year, p.rating)))))
            }
            Err(e) => Reply::error(400, format!("expected year and rating: {}", e)),
        },

        (&Method::Get, "/api/leave") => match serde_urlencoded::from_str::<LeaveParams>(query) {
            Ok(p) => {
                let cell = match (p.year, p.rating) {
                    (Some(year), Some(rating)) => Some((year, rating)),
                    _ => dashboard.selection().map(|k| (k.year, k.bucket)),
                };
                if let Some((year, bucket)) = cell {
                    dashboard.handle(PointerEvent::Leave { year, bucket });
                }
                Reply::json(200, &ApiResponse::success(detail_payload(dashboard, cell)))
            }
            Err(e) => Reply::error(400, e.to_string()),
        },

        (&Method::Get, "/api/counts") => Reply::json(200, &ApiResponse::success(CountReport::new(dashboard))),

        (&Method::Get, "/api/top") => match serde_urlencoded::from_str::<CellParams>(query) {
            Ok(p) => Reply::json(200, &ApiResponse::success(dashboard.top(p.year, p.rating))),
            Err(e) => Reply::error(400, format!("expected year and rating: {}", e)),
        },

        _ => Reply::error(404, "Not found"),
    }
}

fn detail_payload(dashboard: &Dashboard, cell: Option<(i32, i32)>) -> DetailPayload {
    let title = dashboard
        .detail_scene()
        .text(crate::view::detail::TITLE)
        .unwrap_or("")
        .to_string();
    DetailPayload {
        selection: dashboard.selection(),
        title,
        svg: dashboard.detail_svg(),
        marker_radius: cell.and_then(|(y, b)| dashboard.marker_radius(y, b)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ChartConfig;
    use crate::data::{Dataset, RawRecord};
    use serde_json::Value;

    fn dashboard() -> Dashboard {
        Dashboard::new(
            Dataset::from_raw(vec![
                RawRecord::new("2016", "7.2", "500", "A"),
                RawRecord::new("2016", "7.8", "300", "B"),
                RawRecord::new("2016", "7.1", "100", "C"),
                RawRecord::new("2017", "6.4", "42", "D"),
            ]),
            ChartConfig::default(),
        )
        .unwrap()
    }

    fn get(d: &mut Dashboard, url: &str) -> (u16, Value) {
        let reply = route(d, &Method::Get, url, "games.csv");
        assert_eq!(reply.content_type, "application/json");
        (reply.status, serde_json::from_str(&reply.body).unwrap())
    }

    #[test]
    fn test_index_serves_live_page() {
        let mut d = dashboard();
        let reply = route(&mut d, &Method::Get, "/", "games.csv");
        assert_eq!(reply.status, 200);
        assert!(reply.content_type.starts_with("text/html"));
        assert!(reply.body.contains(r#"const MODE = "live";"#));
    }

    #[test]
    fn test_enter_then_leave() {
        let mut d = dashboard();

        let (status, v) = get(&mut d, "/api/enter?year=2016&rating=7");
        assert_eq!(status, 200);
        assert_eq!(v["ok"], true);
        assert_eq!(v["data"]["title"], "Top 5 Most Rated Games of 2016 with Rating 7");
        assert_eq!(v["data"]["selection"]["year"], 2016);
        assert_eq!(v["data"]["marker_radius"], 6.0);
        assert!(v["data"]["svg"].as_str().unwrap().contains(r#"data-name="A""#));

        let (status, v) = get(&mut d, "/api/leave?year=2016&rating=7");
        assert_eq!(status, 200);
        assert_eq!(v["data"]["title"], "");
        assert!(v["data"]["selection"].is_null());
        assert_eq!(v["data"]["marker_radius"], 4.0);
    }

    #[test]
    fn test_leave_without_params_clears_current_selection() {
        let mut d = dashboard();
        get(&mut d, "/api/enter?year=2017&rating=6");
        let (_, v) = get(&mut d, "/api/leave");

        assert!(v["data"]["selection"].is_null());
        assert_eq!(d.marker_radius(2017, 6), Some(4.0));
    }

    #[test]
    fn test_top_is_read_only() {
        let mut d = dashboard();
        let (status, v) = get(&mut d, "/api/top?year=2016&rating=7");

        assert_eq!(status, 200);
        let names: Vec<_> = v["data"]["items"].as_array().unwrap().iter().map(|i| i["name"].clone()).collect();
        assert_eq!(names, vec!["A", "B", "C"]);
        assert_eq!(d.selection(), None);
    }

    #[test]
    fn test_counts() {
        let mut d = dashboard();
        let (_, v) = get(&mut d, "/api/counts");
        assert_eq!(v["data"]["years"], serde_json::json!([2016, 2017]));
        assert_eq!(v["data"]["counts"], serde_json::json!([[0, 3], [1, 0]]));
    }

    #[test]
    fn test_bad_params_are_400() {
        let mut d = dashboard();
        let (status, v) = get(&mut d, "/api/enter?year=abc&rating=7");
        assert_eq!(status, 400);
        assert_eq!(v["ok"], false);
        assert!(v["error"].is_string());

        let (status, _) = get(&mut d, "/api/top?year=2016");
        assert_eq!(status, 400);
    }

    #[test]
    fn test_unknown_route_is_404() {
        let mut d = dashboard();
        let (status, v) = get(&mut d, "/api/nope");
        assert_eq!(status, 404);
        assert_eq!(v["error"], "Not found");

        let reply = route(&mut d, &Method::Post, "/api/enter?year=2016&rating=7", "x");
        assert_eq!(reply.status, 404);
    }
}
