use std::sync::Arc;
use std::time::Duration;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::sync::Mutex;

pub type Seen = Arc<Mutex<Vec<Value>>>;

async fn serve(app: Router) -> anyhow::Result<String> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok(format!("http://{}", addr))
}

fn echo(body: &Value) -> Value {
    let schedule = &body["temperatureSchedule"];
    json!({
        "costSavings": 1234.5,
        "percentSavings": 18,
        "co2Avoided": 2.345,
        "HourlyTemperature": [
            (0..48).collect::<Vec<u32>>(),
            schedule["highTemperatures"].clone(),
            schedule["lowTemperatures"].clone(),
        ],
        "bestTempActual": vec![body["homeTemperature"].clone(); 48],
    })
}

/// Optimizer stand-in that echoes the bounds back and records every request.
pub async fn recording_backend() -> anyhow::Result<(String, Seen)> {
    let seen: Seen = Arc::default();
    let app = Router::new()
        .route(
            "/generate_schedule",
            post(|State(seen): State<Seen>, Json(body): Json<Value>| async move {
                let result = echo(&body);
                seen.lock().await.push(body);
                Json(result)
            }),
        )
        .with_state(seen.clone());

    Ok((serve(app).await?, seen))
}

/// Optimizer stand-in that takes `delay` before answering like `recording_backend`.
pub async fn slow_backend(delay: Duration) -> anyhow::Result<String> {
    let app = Router::new().route(
        "/generate_schedule",
        post(move |Json(body): Json<Value>| async move {
            tokio::time::sleep(delay).await;
            Json(echo(&body))
        }),
    );
    serve(app).await
}

/// Optimizer stand-in that always fails.
pub async fn failing_backend() -> anyhow::Result<String> {
    let app = Router::new().route(
        "/generate_schedule",
        post(|| async { (StatusCode::SERVICE_UNAVAILABLE, "down for maintenance") }),
    );
    serve(app).await
}
