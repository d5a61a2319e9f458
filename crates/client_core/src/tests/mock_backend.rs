//! In-process stand-in for the deck backend used by the HTTP tests.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    Json, Router,
};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::Mutex};

pub const PROJECT_ID: &str = "1b4e28ba-2fa1-11d2-883f-0016d3cca427";
pub const TOKEN: &str = "test-token";

#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: String,
    pub path: String,
    pub authorization: Option<String>,
    pub body: Value,
}

#[derive(Clone)]
struct MockState {
    requests: Arc<Mutex<Vec<Recorded>>>,
    slides: Arc<Mutex<Vec<Value>>>,
    fail_reorders: Arc<AtomicBool>,
}

pub struct MockBackend {
    pub url: String,
    state: MockState,
}

impl MockBackend {
    pub async fn start(slides: Vec<Value>) -> Self {
        let state = MockState {
            requests: Arc::new(Mutex::new(Vec::new())),
            slides: Arc::new(Mutex::new(slides)),
            fail_reorders: Arc::new(AtomicBool::new(false)),
        };
        let app = Router::new().fallback(handle).with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("addr");
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self {
            url: format!("http://{addr}"),
            state,
        }
    }

    pub fn fail_reorders(&self, fail: bool) {
        self.state.fail_reorders.store(fail, Ordering::SeqCst);
    }

    pub async fn requests(&self) -> Vec<Recorded> {
        self.state.requests.lock().await.clone()
    }
}

pub fn slide_json(id: i64, heading: &str) -> Value {
    json!({
        "id": id,
        "slide_number": id,
        "layout_type": "bullets",
        "dominant_color": "#112233",
        "content": {
            "heading": heading,
            "bullets": [{ "text": format!("{heading} detail") }]
        }
    })
}

fn project_json(id: &str, is_favorite: bool) -> Value {
    json!({
        "id": id,
        "title": "Quarterly review",
        "description": "Numbers and plans",
        "is_public": false,
        "is_favorite": is_favorite,
        "created_at": "2024-04-01T09:00:00Z",
        "updated_at": "2024-04-02T09:00:00Z"
    })
}

async fn handle(
    State(state): State<MockState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let body: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
    let path = uri.path().to_string();
    state.requests.lock().await.push(Recorded {
        method: method.to_string(),
        path: path.clone(),
        authorization: headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body: body.clone(),
    });

    let segments: Vec<&str> = path.trim_matches('/').split('/').collect();
    match (method.as_str(), segments.as_slice()) {
        ("GET", ["api", "projects"]) => Json(json!([project_json(PROJECT_ID, false)])).into_response(),
        ("PATCH", ["api", "projects", id]) => {
            let favorite = body
                .get("is_favorite")
                .and_then(Value::as_bool)
                .unwrap_or(false);
            Json(project_json(id, favorite)).into_response()
        }
        ("DELETE", ["api", "projects", _]) => StatusCode::NO_CONTENT.into_response(),
        ("GET", ["api", "project", _]) => {
            let slides = state.slides.lock().await.clone();
            Json(json!({ "title": "Quarterly review", "slides": slides })).into_response()
        }
        ("POST", ["api", "project", _, "reorder-slides"]) => {
            if state.fail_reorders.load(Ordering::SeqCst) {
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "could not save order" })),
                )
                    .into_response()
            } else {
                Json(json!({ "message": "Slides reordered successfully" })).into_response()
            }
        }
        ("DELETE", ["api", "slide-edit", id]) => {
            let mut slides = state.slides.lock().await;
            let before = slides.len();
            slides.retain(|slide| slide["id"].to_string() != *id);
            if slides.len() == before {
                (StatusCode::NOT_FOUND, Json(json!({ "detail": "Not found." }))).into_response()
            } else {
                StatusCode::NO_CONTENT.into_response()
            }
        }
        ("PATCH", ["api", "slide-edit", id]) => {
            let slides = state.slides.lock().await;
            let Some(mut slide) = slides.iter().find(|s| s["id"].to_string() == *id).cloned() else {
                return (StatusCode::NOT_FOUND, Json(json!({ "detail": "Not found." })))
                    .into_response();
            };
            slide["img_url"] = body["img_url"].clone();
            slide["section_layout"] = json!("right");
            Json(json!({ "slide": slide })).into_response()
        }
        ("POST", ["api", "suggest-slide-title", _]) => Json(json!({
            "slide_titles": ["Market size", "Go-to-market", "Risks"]
        }))
        .into_response(),
        ("POST", ["api", "add-slide", _]) => {
            let mut slides = state.slides.lock().await;
            let title = body["title"].as_str().unwrap_or_default().to_string();
            if title.is_empty() {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(json!({ "error": "title is required" })),
                )
                    .into_response();
            }
            let next_id = slides.len() as i64 + 100;
            slides.push(slide_json(next_id, &title));
            Json(json!({ "slides": slides.clone() })).into_response()
        }
        ("POST", ["api", "generate-outline"]) => {
            let pages = body["num_pages"].as_u64().unwrap_or(0);
            let titles: Vec<String> = (1..=pages).map(|n| format!("Section {n}")).collect();
            Json(json!({ "title": "Launch plan", "slide_titles": titles })).into_response()
        }
        ("POST", ["api", "generate-xml-presentation", id]) => {
            let titles: Vec<String> = body["slide_titles"]
                .as_array()
                .map(|titles| {
                    titles
                        .iter()
                        .filter_map(|t| t.as_str().map(str::to_string))
                        .collect()
                })
                .unwrap_or_default();
            let generated: Vec<Value> = titles
                .iter()
                .enumerate()
                .map(|(index, title)| slide_json(index as i64 + 200, title))
                .collect();
            *state.slides.lock().await = generated.clone();
            Json(json!({ "title": "Launch plan", "slides": generated, "project_id": id }))
                .into_response()
        }
        _ => (StatusCode::NOT_FOUND, Json(json!({ "detail": "Not found." }))).into_response(),
    }
}
