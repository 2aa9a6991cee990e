use std::sync::Arc;

use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    routing::{get, post},
    Json, Router,
};
use rand::{rngs::StdRng, SeedableRng};
use serde_json::json;
use tokio::sync::Mutex;
use tower_http::trace::TraceLayer;

use crate::{
    engine::{LeafAdvisory, LeafEngine, PalmAdvisory, PalmEngine, UploadedImage},
    error::AppError,
};

pub struct AppState {
    pub leaf: LeafEngine,
    pub palm: PalmEngine,
    pub min_images: usize,
}

pub type SharedState = Arc<Mutex<AppState>>;

pub fn router(state: SharedState, body_limit_bytes: usize) -> Router {
    Router::new()
        .route("/leaf-health", post(leaf_health_handler))
        .route("/leaf-health/", post(leaf_health_handler))
        .route("/areca-coconut", post(areca_coconut_handler))
        .route("/areca-coconut/", post(areca_coconut_handler))
        .layer(DefaultBodyLimit::max(body_limit_bytes))
        .with_state(state)
        .route("/health", get(health_check))
        .layer(TraceLayer::new_for_http())
}

#[derive(Debug, Default)]
struct UploadForm {
    crop: Option<String>,
    images: Vec<UploadedImage>,
}

async fn read_form(mut multipart: Multipart) -> Result<UploadForm, AppError> {
    let mut form = UploadForm::default();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some("crop") => form.crop = Some(field.text().await?),
            Some("images") => {
                let filename = field.file_name().unwrap_or("image").to_string();
                let data = field.bytes().await?.to_vec();
                form.images.push(UploadedImage::new(filename, data));
            }
            _ => {}
        }
    }

    Ok(form)
}

/// `"tOMATO "` becomes `"Tomato"`.
fn capitalize(crop: &str) -> String {
    let mut chars = crop.trim().chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

async fn leaf_health_handler(
    State(state): State<SharedState>,
    multipart: Multipart,
) -> Result<Json<LeafAdvisory>, AppError> {
    let form = read_form(multipart).await?;
    let state = state.lock().await;

    let crop = form
        .crop
        .as_deref()
        .map(capitalize)
        .filter(|crop| !crop.is_empty());
    let crop = match crop {
        Some(crop) if form.images.len() >= state.min_images => crop,
        _ => {
            return Err(AppError::BadRequest(format!(
                "Crop and minimum {} images required",
                state.min_images
            )))
        }
    };

    let mut rng = StdRng::from_entropy();
    let advisory = state.leaf.assess(&form.images, &crop, &mut rng);
    tracing::info!(%crop, images = form.images.len(), status = ?advisory.status(), "leaf advisory");
    Ok(Json(advisory))
}

async fn areca_coconut_handler(
    State(state): State<SharedState>,
    multipart: Multipart,
) -> Result<Json<PalmAdvisory>, AppError> {
    let form = read_form(multipart).await?;
    let state = state.lock().await;

    if form.images.len() < state.min_images {
        return Err(AppError::BadRequest(format!(
            "Minimum {} images required",
            state.min_images
        )));
    }

    let mut rng = StdRng::from_entropy();
    let advisory = state.palm.assess(&form.images, &mut rng);
    tracing::info!(images = form.images.len(), status = ?advisory.status(), "palm advisory");
    Ok(Json(advisory))
}

async fn health_check() -> Json<serde_json::Value> {
    Json(json!({ "status": "OK" }))
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{header::CONTENT_TYPE, Request, StatusCode},
    };
    use serde_json::Value;
    use tower::ServiceExt;

    use super::*;
    use crate::{
        engine::testing::{one_hot, StubClassifier},
        knowledge::{leaf::LEAF_CLASSES, palm::PALM_CLASSES},
        quality::tests::png,
    };

    const BOUNDARY: &str = "leafadvisorboundary";

    fn app(leaf_outputs: Vec<Option<Vec<f32>>>, palm_outputs: Vec<Option<Vec<f32>>>) -> Router {
        let state = AppState {
            leaf: LeafEngine::new(Box::new(StubClassifier::new(leaf_outputs))),
            palm: PalmEngine::new(Box::new(StubClassifier::new(palm_outputs))),
            min_images: 3,
        };
        router(Arc::new(Mutex::new(state)), 5 * 1024 * 1024)
    }

    fn multipart_request(uri: &str, crop: Option<&str>, images: usize) -> Request<Body> {
        let mut body = Vec::new();
        if let Some(crop) = crop {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"crop\"\r\n\r\n{crop}\r\n"
                )
                .as_bytes(),
            );
        }
        for i in 0..images {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"images\"; filename=\"leaf{i}.png\"\r\nContent-Type: image/png\r\n\r\n"
                )
                .as_bytes(),
            );
            body.extend_from_slice(&png(256, 256, 120));
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

        Request::builder()
            .method("POST")
            .uri(uri)
            .header(
                CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = hyper::body::to_bytes(response.into_body()).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn leaf_votes(label: &str) -> Vec<Option<Vec<f32>>> {
        let index = LEAF_CLASSES.iter().position(|c| *c == label).unwrap();
        vec![Some(one_hot(index, 0.875, LEAF_CLASSES.len())); 3]
    }

    #[test]
    fn capitalize_matches_crop_labels() {
        assert_eq!(capitalize("tOMATO "), "Tomato");
        assert_eq!(capitalize("corn"), "Corn");
        assert_eq!(capitalize("  "), "");
    }

    #[tokio::test]
    async fn leaf_health_returns_advisory() {
        let app = app(leaf_votes("Tomato__Late_blight"), vec![]);
        let (status, body) = send(app, multipart_request("/leaf-health/", Some("tomato"), 3)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "disease_confirmed");
        assert_eq!(body["crop"], "Tomato");
    }

    #[tokio::test]
    async fn leaf_health_requires_crop() {
        let app = app(vec![], vec![]);
        let (status, body) = send(app, multipart_request("/leaf-health/", None, 3)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Crop and minimum 3 images required");
    }

    #[tokio::test]
    async fn leaf_health_requires_enough_images() {
        let app = app(vec![], vec![]);
        let (status, body) = send(app, multipart_request("/leaf-health", Some("Apple"), 2)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Crop and minimum 3 images required");
    }

    #[tokio::test]
    async fn areca_coconut_returns_advisory() {
        let palm = vec![Some(one_hot(2, 0.875, PALM_CLASSES.len())); 3];
        let app = app(vec![], palm);
        let (status, body) = send(app, multipart_request("/areca-coconut/", None, 3)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["crop"], "Coconut");
    }

    #[tokio::test]
    async fn areca_coconut_requires_enough_images() {
        let app = app(vec![], vec![]);
        let (status, body) = send(app, multipart_request("/areca-coconut/", None, 1)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Minimum 3 images required");
    }

    #[tokio::test]
    async fn health_check_reports_ok() {
        let request = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(app(vec![], vec![]), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "OK");
    }
}
