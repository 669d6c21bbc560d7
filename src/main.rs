// region:    --- Imports
use auction_marketplace::config::AppConfig;
use auction_marketplace::database::DatabaseManager;
use auction_marketplace::handlers::{self, AppState};
use auction_marketplace::ledger::{Ledger, MemoryLedger, PostgresLedger};
use axum::extract::DefaultBodyLimit;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

// endregion: --- Imports

// region:    --- Main
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // logging 초기화
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .without_time()
        .with_target(false)
        .init();

    // 설정 로드
    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            error!("{:<12} --> 설정 로드 실패: {:?}", "Main", e);
            return Err(e.into());
        }
    };

    // 원장 생성 (DATABASE_URL이 없으면 메모리 저장소)
    let ledger: Arc<dyn Ledger> = match config.database.url.as_deref() {
        Some(url) => {
            let db_manager = match DatabaseManager::new(url, &config.database).await {
                Ok(db_manager) => Arc::new(db_manager),
                Err(e) => {
                    error!("{:<12} --> 데이터베이스 연결 실패: {:?}", "Main", e);
                    return Err(e.into());
                }
            };

            // 데이터베이스 초기화
            if let Err(e) = db_manager.initialize_database().await {
                error!("{:<12} --> 데이터베이스 초기화 실패: {:?}", "Main", e);
                return Err(e.into());
            }
            info!("{:<12} --> 데이터베이스 초기화 성공", "Main");

            Arc::new(PostgresLedger::new(db_manager))
        }
        None => {
            warn!(
                "{:<12} --> DATABASE_URL 없음: 메모리 저장소 사용 (재시작 시 데이터 삭제)",
                "Main"
            );
            Arc::new(MemoryLedger::new())
        }
    };

    if !config.auction.owner_only_close {
        warn!(
            "{:<12} --> 판매자가 아닌 사용자도 경매를 종료할 수 있습니다 (auction.owner_only_close = false)",
            "Main"
        );
    }

    // 테스트 페이지를 위한 cors 설정
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // 라우터 설정
    let routes_all = handlers::router(AppState::new(ledger, config.auction.clone()))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(1024 * 1024));

    // 리스너 생성
    let listener = TcpListener::bind(config.server.socket_addr()?).await?;
    info!(
        "{:<12} --> Web Server: Listening on {}",
        "Main",
        listener.local_addr()?
    );

    // 서버 실행
    if let Err(err) = axum::serve(listener, routes_all.into_make_service()).await {
        error!("{:<12} --> Server error: {}", "Main", err);
    }
    Ok(())
}
// endregion: --- Main
