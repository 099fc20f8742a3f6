//! 자산 인벤토리 API 서버.
//!
//! Axum 기반 REST API 서버를 시작합니다. JWT 인증, 역할 기반 접근
//! 제어, 엔드포인트 클래스별 요청 허용 제어를 제공합니다.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{http::StatusCode, Router};
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use asset_api::config::ServerConfig;
use asset_api::middleware::RateLimiter;
use asset_api::routes::create_api_router;
use asset_api::state::AppState;

/// 전체 라우터 생성.
fn create_router(state: Arc<AppState>, limiter: Arc<RateLimiter>) -> Router {
    create_api_router(limiter)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        // 전역 타임아웃 (30초) - 408 상태 코드 반환
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(30),
        ))
        .layer(CorsLayer::permissive())
}

/// 만료된 rate limit 윈도우 주기 정리 태스크.
fn spawn_limiter_cleanup(limiter: Arc<RateLimiter>, shutdown: CancellationToken) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(300));
        loop {
            tokio::select! {
                _ = interval.tick() => {
                    limiter.cleanup().await;
                }
                _ = shutdown.cancelled() => {
                    break;
                }
            }
        }
    });
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // .env 파일 로드 (있는 경우)
    let _ = dotenvy::dotenv();

    // tracing 초기화
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "asset_api=info,tower_http=debug".into()),
        )
        .init();

    info!("Starting Asset Inventory API server...");

    // 설정 로드
    let config = ServerConfig::from_env();
    let addr = config.socket_addr().map_err(|e| {
        error!(
            host = %config.host,
            port = config.port,
            error = %e,
            "소켓 주소 설정이 유효하지 않습니다. API_HOST, API_PORT 환경변수를 확인하세요."
        );
        e
    })?;

    // AppState 생성 및 초기 관리자 시드
    let state = Arc::new(AppState::new(config.auth_settings()));
    state
        .seed_admin(&config.admin_username, &config.admin_password)
        .await?;

    info!(version = %state.version, "Application state initialized");

    // 요청 허용 제어기 생성
    let limiter = if config.rate_limit_disabled {
        info!("Rate limiting DISABLED (RATE_LIMIT_DISABLED=true)");
        Arc::new(RateLimiter::disabled())
    } else {
        Arc::new(RateLimiter::new())
    };

    // 전역 종료 토큰 (백그라운드 태스크 종료 전파용)
    let shutdown_token = CancellationToken::new();
    spawn_limiter_cleanup(limiter.clone(), shutdown_token.clone());

    // 라우터 생성
    let app = create_router(state, limiter);

    // 서버 시작
    info!(%addr, "API server listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal(shutdown_token.clone()))
    .await?;

    // 종료 시그널 받은 후 정리 작업
    info!("Server shutdown initiated, cleaning up...");
    shutdown_token.cancel();

    info!("Server stopped gracefully");

    Ok(())
}

/// Graceful shutdown 시그널 대기.
///
/// Ctrl+C 또는 SIGTERM 시그널을 수신하면 종료 토큰을 취소합니다.
async fn shutdown_signal(shutdown_token: CancellationToken) {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            warn!("Received Ctrl+C, initiating graceful shutdown...");
        }
        _ = terminate => {
            warn!("Received SIGTERM, initiating graceful shutdown...");
        }
    }

    shutdown_token.cancel();
}
