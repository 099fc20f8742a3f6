//! API 서버용 HTTP middleware.
//!
//! 요청 처리 파이프라인에 적용되는 middleware 모듈.

mod rate_limit;

pub use rate_limit::{
    admission_middleware, AdmissionResult, AdmissionState, EndpointClass, Quota, RateLimiter,
};
