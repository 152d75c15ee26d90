//! Weather resolution through the real Open-Meteo client.

mod common;

use std::time::Duration;

use microgrid_sim::sim::SimulationInput;
use microgrid_sim::weather::{
    self, FALLBACK_CLOUD_COVER_PERCENT, Location, OpenMeteo, WeatherError, WeatherMode,
    WeatherResolution,
};

use common::{UNREACHABLE_BASE_URL, at, seeded_simulator};

fn unreachable_provider() -> OpenMeteo {
    OpenMeteo::new(UNREACHABLE_BASE_URL, "Asia/Kolkata", Duration::from_secs(2)).unwrap()
}

#[tokio::test]
async fn auto_falls_back_when_provider_is_unreachable() {
    let resolution = weather::resolve(
        &WeatherMode::Auto,
        Location::KURDUVADI,
        &unreachable_provider(),
    )
    .await;

    assert!(resolution.is_fallback());
    let snapshot = resolution.into_snapshot();
    assert_eq!(snapshot.cloud_cover_percent, FALLBACK_CLOUD_COVER_PERCENT);
    assert_eq!(snapshot.sunrise_time, "06:00");
    assert_eq!(snapshot.sunset_time, "18:00");
}

#[tokio::test]
async fn static_modes_never_call_the_provider() {
    for (mode, cover) in [("sunny", 10), ("cloudy", 60), ("rainy", 90), ("snow", 40)] {
        let resolution = weather::resolve(
            &WeatherMode::from(mode),
            Location::KURDUVADI,
            &unreachable_provider(),
        )
        .await;
        assert!(matches!(resolution, WeatherResolution::Static(_)), "{mode}");
        assert_eq!(resolution.snapshot().cloud_cover_percent, cover, "{mode}");
    }
}

#[tokio::test]
async fn auto_simulation_succeeds_offline() {
    let sim = seeded_simulator(unreachable_provider(), 5);
    let r = sim
        .run(&SimulationInput::new("auto", 20, 10.0, at(12, 0, 0)))
        .await;

    assert_eq!(r.weather, "auto");
    assert_eq!(r.cloud_cover_percent, 40);
    assert_eq!(r.sunrise_time, "06:00");
    assert_eq!(r.sunset_time, "18:00");
    assert_eq!(r.solar_power_kw, 6.0);
}

/// Serves canned forecast responses under three prefixes:
/// `/error` answers 500, `/partial` a body missing required fields,
/// `/live` a complete payload.
#[cfg(feature = "api")]
async fn spawn_forecast_server() -> String {
    use axum::Router;
    use axum::http::StatusCode;
    use axum::routing::get;
    use serde_json::json;

    let app = Router::new()
        .route(
            "/error/v1/forecast",
            get(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
        )
        .route(
            "/partial/v1/forecast",
            get(|| async { axum::Json(json!({"current": {}})) }),
        )
        .route(
            "/live/v1/forecast",
            get(|| async {
                axum::Json(json!({
                    "current": {"time": "2026-01-10T12:45", "cloud_cover": 23},
                    "daily": {
                        "time": ["2026-01-10"],
                        "sunrise": ["2026-01-10T06:55"],
                        "sunset": ["2026-01-10T18:14"]
                    }
                }))
            }),
        );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

#[cfg(feature = "api")]
fn provider_at(base_url: String) -> OpenMeteo {
    OpenMeteo::new(base_url, "Asia/Kolkata", Duration::from_secs(5)).unwrap()
}

#[cfg(feature = "api")]
#[tokio::test]
async fn auto_falls_back_on_server_error() {
    let base = spawn_forecast_server().await;
    let resolution = weather::resolve(
        &WeatherMode::Auto,
        Location::KURDUVADI,
        &provider_at(format!("{base}/error")),
    )
    .await;

    match &resolution {
        WeatherResolution::Fallback { error, .. } => {
            assert!(
                matches!(error, WeatherError::Status(s) if s.as_u16() == 500),
                "{error}"
            );
        }
        other => panic!("expected fallback, got {other:?}"),
    }
    let snapshot = resolution.into_snapshot();
    assert_eq!(snapshot.cloud_cover_percent, FALLBACK_CLOUD_COVER_PERCENT);
    assert_eq!(snapshot.sunrise_time, "06:00");
    assert_eq!(snapshot.sunset_time, "18:00");
}

#[cfg(feature = "api")]
#[tokio::test]
async fn auto_falls_back_on_malformed_payload() {
    let base = spawn_forecast_server().await;
    let resolution = weather::resolve(
        &WeatherMode::Auto,
        Location::KURDUVADI,
        &provider_at(format!("{base}/partial")),
    )
    .await;

    assert!(resolution.is_fallback());
    let snapshot = resolution.into_snapshot();
    assert_eq!(snapshot.cloud_cover_percent, FALLBACK_CLOUD_COVER_PERCENT);
    assert_eq!(snapshot.sunrise_time, "06:00");
    assert_eq!(snapshot.sunset_time, "18:00");
}

#[cfg(feature = "api")]
#[tokio::test]
async fn auto_uses_live_payload() {
    let base = spawn_forecast_server().await;
    let resolution = weather::resolve(
        &WeatherMode::Auto,
        Location::KURDUVADI,
        &provider_at(format!("{base}/live")),
    )
    .await;

    assert!(matches!(resolution, WeatherResolution::Live(_)));
    let snapshot = resolution.into_snapshot();
    assert_eq!(snapshot.cloud_cover_percent, 23);
    assert_eq!((snapshot.sunrise_hour, snapshot.sunset_hour), (6, 18));
    assert_eq!(snapshot.sunrise_time, "06:55");
    assert_eq!(snapshot.sunset_time, "18:14");
}
