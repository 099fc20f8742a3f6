//! 요청 허용 제어 (rate limiting) middleware.
//!
//! 고정 윈도우 카운터 기반으로 엔드포인트 클래스별 요청 한도를
//! 적용합니다. 신원 확립 이전에 동작하므로 키는 principal이 아니라
//! 클라이언트 IP입니다. 상태는 프로세스 로컬이며 재시작 시
//! 초기화됩니다 (단일 인스턴스 배포 전제).

use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tokio::sync::RwLock;

use crate::error::ApiError;

/// 엔드포인트 클래스.
///
/// 각 보호된 작업은 자신의 클래스와 정적 한도를 선언합니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EndpointClass {
    /// 로그인: 5회/분
    Login,
    /// 사용자 등록: 30회/시간
    Register,
    /// 자산 조회: 100회/분
    AssetRead,
    /// 자산 등록: 20회/분
    AssetCreate,
    /// 자산 수정: 30회/분
    AssetUpdate,
    /// 자산 삭제: 10회/분
    AssetDelete,
    /// 사용자 수정: 30회/분
    UserUpdate,
    /// 사용자 삭제: 10회/분
    UserDelete,
}

impl EndpointClass {
    /// 클래스별 정적 한도.
    pub fn quota(self) -> Quota {
        match self {
            EndpointClass::Login => Quota::per_minute(5),
            EndpointClass::Register => Quota::per_hour(30),
            EndpointClass::AssetRead => Quota::per_minute(100),
            EndpointClass::AssetCreate => Quota::per_minute(20),
            EndpointClass::AssetUpdate => Quota::per_minute(30),
            EndpointClass::AssetDelete => Quota::per_minute(10),
            EndpointClass::UserUpdate => Quota::per_minute(30),
            EndpointClass::UserDelete => Quota::per_minute(10),
        }
    }

    /// 로그 출력용 이름.
    pub fn as_str(self) -> &'static str {
        match self {
            EndpointClass::Login => "login",
            EndpointClass::Register => "register",
            EndpointClass::AssetRead => "asset_read",
            EndpointClass::AssetCreate => "asset_create",
            EndpointClass::AssetUpdate => "asset_update",
            EndpointClass::AssetDelete => "asset_delete",
            EndpointClass::UserUpdate => "user_update",
            EndpointClass::UserDelete => "user_delete",
        }
    }
}

/// 고정 한도: 윈도우당 최대 요청 수.
#[derive(Debug, Clone, Copy)]
pub struct Quota {
    pub limit: u32,
    pub window: Duration,
}

impl Quota {
    pub const fn per_minute(limit: u32) -> Self {
        Self {
            limit,
            window: Duration::from_secs(60),
        }
    }

    pub const fn per_hour(limit: u32) -> Self {
        Self {
            limit,
            window: Duration::from_secs(3600),
        }
    }
}

/// 고정 윈도우 카운터.
#[derive(Debug)]
struct FixedWindow {
    started: Instant,
    count: u32,
}

/// 허용 판정 결과.
#[derive(Debug, Clone)]
pub enum AdmissionResult {
    /// 요청 허용됨
    Admitted,
    /// 한도 초과
    Throttled {
        /// 재시도까지 대기 시간 (초)
        retry_after_secs: u64,
    },
}

/// 요청 허용 제어기.
///
/// (엔드포인트 클래스, 클라이언트 IP)별 고정 윈도우 카운터를
/// 유지합니다. 명시적으로 주입되는 컴포넌트이며 전역 싱글턴이
/// 아니므로 공유 카운터 저장소 구현으로 교체할 수 있습니다.
pub struct RateLimiter {
    enabled: bool,
    windows: RwLock<HashMap<(EndpointClass, IpAddr), FixedWindow>>,
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new()
    }
}

impl RateLimiter {
    /// 새 제어기 생성.
    pub fn new() -> Self {
        Self {
            enabled: true,
            windows: RwLock::new(HashMap::new()),
        }
    }

    /// 항상 허용하는 제어기 (개발/테스트용).
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            windows: RwLock::new(HashMap::new()),
        }
    }

    /// 클래스의 정적 한도로 허용 여부 판정.
    pub async fn admit(&self, class: EndpointClass, ip: IpAddr) -> AdmissionResult {
        self.admit_with_quota(class, class.quota(), ip).await
    }

    /// 지정한 한도로 허용 여부 판정.
    ///
    /// 윈도우 경계를 지나면 카운터가 리셋됩니다. 거부된 요청은
    /// 카운터를 소비하지 않으므로 제한 중에도 윈도우가 끝나면
    /// 즉시 복구됩니다.
    pub async fn admit_with_quota(
        &self,
        class: EndpointClass,
        quota: Quota,
        ip: IpAddr,
    ) -> AdmissionResult {
        if !self.enabled {
            return AdmissionResult::Admitted;
        }

        let now = Instant::now();
        let mut windows = self.windows.write().await;
        let window = windows
            .entry((class, ip))
            .or_insert_with(|| FixedWindow { started: now, count: 0 });

        if now.duration_since(window.started) >= quota.window {
            window.started = now;
            window.count = 0;
        }

        if window.count < quota.limit {
            window.count += 1;
            AdmissionResult::Admitted
        } else {
            let remaining = quota.window - now.duration_since(window.started);
            AdmissionResult::Throttled {
                retry_after_secs: remaining.as_secs().max(1),
            }
        }
    }

    /// 만료된 윈도우 정리.
    pub async fn cleanup(&self) {
        let mut windows = self.windows.write().await;
        windows.retain(|(class, _), window| window.started.elapsed() < class.quota().window);
    }

    /// 현재 추적 중인 (클래스, IP) 키 수.
    pub async fn tracked_keys(&self) -> usize {
        self.windows.read().await.len()
    }
}

/// 허용 제어 middleware 상태.
///
/// 라우트별로 제어기와 엔드포인트 클래스를 묶어 주입합니다.
#[derive(Clone)]
pub struct AdmissionState {
    pub limiter: Arc<RateLimiter>,
    pub class: EndpointClass,
}

impl AdmissionState {
    pub fn new(limiter: Arc<RateLimiter>, class: EndpointClass) -> Self {
        Self { limiter, class }
    }
}

/// 허용 제어 middleware 함수.
///
/// 신원 확인보다 먼저 실행되며, 한도 초과 시 429로 요청을
/// 차단합니다. 429는 인가 거부(403)와 구분되는 상태입니다.
pub async fn admission_middleware(
    State(state): State<AdmissionState>,
    request: Request,
    next: Next,
) -> Response {
    let ip = extract_client_ip(&request);

    match state.limiter.admit(state.class, ip).await {
        AdmissionResult::Admitted => next.run(request).await,
        AdmissionResult::Throttled { retry_after_secs } => {
            tracing::warn!(
                client_ip = %ip,
                endpoint_class = state.class.as_str(),
                retry_after = retry_after_secs,
                "Request throttled"
            );

            ApiError::Throttled { retry_after_secs }.into_response()
        }
    }
}

/// 요청에서 클라이언트 IP 추출.
///
/// 프록시/로드밸런서 뒤에 있을 경우를 위해 X-Forwarded-For,
/// X-Real-IP 헤더를 우선 확인하고, 없으면 연결 정보(ConnectInfo)를
/// 사용합니다.
fn extract_client_ip(request: &Request) -> IpAddr {
    if let Some(forwarded_for) = request.headers().get("x-forwarded-for") {
        if let Ok(value) = forwarded_for.to_str() {
            // 첫 번째 IP가 클라이언트 원본 IP
            if let Some(ip_str) = value.split(',').next() {
                if let Ok(ip) = ip_str.trim().parse() {
                    return ip;
                }
            }
        }
    }

    if let Some(real_ip) = request.headers().get("x-real-ip") {
        if let Ok(value) = real_ip.to_str() {
            if let Ok(ip) = value.trim().parse() {
                return ip;
            }
        }
    }

    request
        .extensions()
        .get::<ConnectInfo<std::net::SocketAddr>>()
        .map(|info| info.0.ip())
        .unwrap_or_else(|| IpAddr::from([127, 0, 0, 1]))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ip(last: u8) -> IpAddr {
        IpAddr::from([192, 168, 1, last])
    }

    #[tokio::test]
    async fn test_limit_plus_one_yields_exactly_one_throttle() {
        let limiter = RateLimiter::new();
        let quota = Quota {
            limit: 5,
            window: Duration::from_secs(60),
        };

        let mut throttled = 0;
        for i in 0..6 {
            match limiter
                .admit_with_quota(EndpointClass::Login, quota, ip(1))
                .await
            {
                AdmissionResult::Admitted => assert!(i < 5, "request {} should be throttled", i),
                AdmissionResult::Throttled { .. } => throttled += 1,
            }
        }

        assert_eq!(throttled, 1);
    }

    #[tokio::test]
    async fn test_window_reset_readmits() {
        let limiter = RateLimiter::new();
        let quota = Quota {
            limit: 2,
            window: Duration::from_millis(50),
        };

        for _ in 0..2 {
            assert!(matches!(
                limiter
                    .admit_with_quota(EndpointClass::Login, quota, ip(1))
                    .await,
                AdmissionResult::Admitted
            ));
        }
        assert!(matches!(
            limiter
                .admit_with_quota(EndpointClass::Login, quota, ip(1))
                .await,
            AdmissionResult::Throttled { .. }
        ));

        tokio::time::sleep(Duration::from_millis(60)).await;

        // 윈도우가 지나면 다시 허용
        assert!(matches!(
            limiter
                .admit_with_quota(EndpointClass::Login, quota, ip(1))
                .await,
            AdmissionResult::Admitted
        ));
    }

    #[tokio::test]
    async fn test_throttled_requests_do_not_consume_quota() {
        let limiter = RateLimiter::new();
        let quota = Quota {
            limit: 1,
            window: Duration::from_millis(50),
        };

        assert!(matches!(
            limiter
                .admit_with_quota(EndpointClass::Login, quota, ip(1))
                .await,
            AdmissionResult::Admitted
        ));

        // 제한 중 반복 요청이 윈도우를 연장하지 않아야 함
        for _ in 0..10 {
            assert!(matches!(
                limiter
                    .admit_with_quota(EndpointClass::Login, quota, ip(1))
                    .await,
                AdmissionResult::Throttled { .. }
            ));
        }

        tokio::time::sleep(Duration::from_millis(60)).await;
        assert!(matches!(
            limiter
                .admit_with_quota(EndpointClass::Login, quota, ip(1))
                .await,
            AdmissionResult::Admitted
        ));
    }

    #[tokio::test]
    async fn test_classes_have_independent_budgets() {
        let limiter = RateLimiter::new();
        let quota = Quota {
            limit: 1,
            window: Duration::from_secs(60),
        };

        assert!(matches!(
            limiter
                .admit_with_quota(EndpointClass::Login, quota, ip(1))
                .await,
            AdmissionResult::Admitted
        ));
        assert!(matches!(
            limiter
                .admit_with_quota(EndpointClass::Login, quota, ip(1))
                .await,
            AdmissionResult::Throttled { .. }
        ));

        // 다른 클래스는 별도 카운터
        assert!(matches!(
            limiter
                .admit_with_quota(EndpointClass::AssetRead, quota, ip(1))
                .await,
            AdmissionResult::Admitted
        ));
    }

    #[tokio::test]
    async fn test_ips_have_independent_budgets() {
        let limiter = RateLimiter::new();
        let quota = Quota {
            limit: 1,
            window: Duration::from_secs(60),
        };

        assert!(matches!(
            limiter
                .admit_with_quota(EndpointClass::Login, quota, ip(1))
                .await,
            AdmissionResult::Admitted
        ));
        assert!(matches!(
            limiter
                .admit_with_quota(EndpointClass::Login, quota, ip(1))
                .await,
            AdmissionResult::Throttled { .. }
        ));
        assert!(matches!(
            limiter
                .admit_with_quota(EndpointClass::Login, quota, ip(2))
                .await,
            AdmissionResult::Admitted
        ));
    }

    #[tokio::test]
    async fn test_disabled_limiter_always_admits() {
        let limiter = RateLimiter::disabled();
        for _ in 0..100 {
            assert!(matches!(
                limiter.admit(EndpointClass::Login, ip(1)).await,
                AdmissionResult::Admitted
            ));
        }
        assert_eq!(limiter.tracked_keys().await, 0);
    }

    #[tokio::test]
    async fn test_cleanup_evicts_expired_windows() {
        let limiter = RateLimiter::new();
        let quota = Quota {
            limit: 10,
            window: Duration::from_millis(10),
        };

        limiter
            .admit_with_quota(EndpointClass::Login, quota, ip(1))
            .await;
        assert_eq!(limiter.tracked_keys().await, 1);

        // Login 클래스의 실제 윈도우(1분)가 지나야 정리되므로 여기선
        // started를 과거로 돌릴 수 없음 - 만료 전에는 유지되는지만 확인
        limiter.cleanup().await;
        assert_eq!(limiter.tracked_keys().await, 1);
    }

    #[test]
    fn test_quota_declarations() {
        assert_eq!(EndpointClass::Login.quota().limit, 5);
        assert_eq!(EndpointClass::Login.quota().window, Duration::from_secs(60));
        assert_eq!(EndpointClass::Register.quota().limit, 30);
        assert_eq!(
            EndpointClass::Register.quota().window,
            Duration::from_secs(3600)
        );
        assert_eq!(EndpointClass::AssetRead.quota().limit, 100);
        assert_eq!(EndpointClass::AssetDelete.quota().limit, 10);
    }
}
