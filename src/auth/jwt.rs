//! JWT 토큰 처리.
//!
//! Access Token 생성/검증 로직.
//!
//! 검증은 자체 완결적(stateless)입니다. 서명과 만료만 확인하며 어떤
//! 저장소도 조회하지 않으므로, 토큰은 발급 당시의 역할 스냅샷을
//! 만료 시점까지 유지합니다. 사용자가 이후 비활성화되거나 삭제되어도
//! 이미 발급된 토큰은 자연 만료 전까지 유효합니다 (알려진 한계,
//! 해결책은 제품 결정 사항).

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, TokenData, Validation};
use serde::{Deserialize, Serialize};

use super::Role;

/// JWT Access Token 페이로드.
///
/// 사용자 신원과 발급 시점의 역할을 포함합니다. 서명은 만료를 포함한
/// 모든 클레임을 커버하므로 비밀 키 없이는 만료를 늘리거나 제거할 수
/// 없습니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - 사용자 이름
    pub sub: String,
    /// 사용자 숫자 ID
    pub uid: i64,
    /// 발급 시점의 사용자 역할
    pub role: Role,
    /// Issued At - 토큰 발급 시간 (Unix timestamp)
    pub iat: i64,
    /// Expiration - 토큰 만료 시간 (Unix timestamp)
    pub exp: i64,
    /// JWT ID - 토큰 고유 식별자
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jti: Option<String>,
}

impl Claims {
    /// 새로운 Claims 생성.
    ///
    /// # Arguments
    ///
    /// * `user_id` - 사용자 숫자 ID
    /// * `username` - 사용자 이름
    /// * `role` - 사용자 역할
    /// * `expires_in_minutes` - 만료 시간 (분)
    pub fn new(
        user_id: i64,
        username: impl Into<String>,
        role: Role,
        expires_in_minutes: i64,
    ) -> Self {
        let now = Utc::now();
        Self {
            sub: username.into(),
            uid: user_id,
            role,
            iat: now.timestamp(),
            exp: (now + Duration::minutes(expires_in_minutes)).timestamp(),
            jti: Some(uuid::Uuid::new_v4().to_string()),
        }
    }
}

/// JWT 토큰 생성/검증 에러.
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("토큰 인코딩 실패: {0}")]
    EncodingError(#[from] jsonwebtoken::errors::Error),
    #[error("토큰 디코딩 실패")]
    DecodingError,
    #[error("토큰이 만료되었습니다")]
    TokenExpired,
    #[error("잘못된 토큰 형식")]
    InvalidToken,
}

/// Access Token 생성.
///
/// # Arguments
///
/// * `claims` - JWT 페이로드
/// * `secret` - 서버 비밀 키
pub fn create_token(claims: &Claims, secret: &str) -> Result<String, TokenError> {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(TokenError::from)
}

/// JWT 토큰 디코딩 및 검증.
///
/// 서명 확인 후 만료를 현재 시각과 비교합니다. 실패 원인은 타입으로
/// 구분되지만 (만료 / 형식 오류 / 기타), 외부 응답에서는 모두 동일한
/// Unauthenticated로 합쳐집니다.
pub fn decode_token(token: &str, secret: &str) -> Result<TokenData<Claims>, TokenError> {
    let mut validation = Validation::default();
    validation.validate_exp = true;
    validation.leeway = 0;

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::TokenExpired,
        jsonwebtoken::errors::ErrorKind::InvalidToken => TokenError::InvalidToken,
        _ => TokenError::DecodingError,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    const TEST_SECRET: &str = "test-secret-key-for-jwt-testing-minimum-32-chars";

    #[test]
    fn test_create_and_decode_token() {
        let claims = Claims::new(1, "alice", Role::Staff, 60);

        let token = create_token(&claims, TEST_SECRET).unwrap();
        assert!(!token.is_empty());
        // 헤더.페이로드.서명 3세그먼트 구조
        assert_eq!(token.split('.').count(), 3);

        let decoded = decode_token(&token, TEST_SECRET).unwrap();
        assert_eq!(decoded.claims.sub, "alice");
        assert_eq!(decoded.claims.uid, 1);
        assert_eq!(decoded.claims.role, Role::Staff);
        assert_eq!(decoded.claims.exp, claims.exp);
    }

    #[test]
    fn test_expired_token_fails_with_expiry_cause() {
        let now = Utc::now();
        let claims = Claims {
            sub: "alice".to_string(),
            uid: 1,
            role: Role::Viewer,
            iat: now.timestamp() - 3600,
            exp: now.timestamp() - 120,
            jti: None,
        };

        let token = create_token(&claims, TEST_SECRET).unwrap();
        let result = decode_token(&token, TEST_SECRET);
        assert!(matches!(result, Err(TokenError::TokenExpired)));
    }

    #[test]
    fn test_tampered_payload_fails() {
        let claims = Claims::new(1, "alice", Role::Viewer, 60);
        let token = create_token(&claims, TEST_SECRET).unwrap();

        let parts: Vec<&str> = token.split('.').collect();
        assert_eq!(parts.len(), 3);

        // 페이로드 중간의 한 글자를 변조
        let payload = parts[1];
        let mid = payload.len() / 2;
        let original = payload.as_bytes()[mid];
        let flipped = if original == b'A' { 'B' } else { 'A' };
        let mut tampered_payload = payload.to_string();
        tampered_payload.replace_range(mid..mid + 1, &flipped.to_string());

        let tampered = format!("{}.{}.{}", parts[0], tampered_payload, parts[2]);
        assert!(decode_token(&tampered, TEST_SECRET).is_err());
    }

    #[test]
    fn test_tampered_signature_fails() {
        let claims = Claims::new(1, "alice", Role::Viewer, 60);
        let token = create_token(&claims, TEST_SECRET).unwrap();

        let parts: Vec<&str> = token.split('.').collect();
        let sig = parts[2];
        let original = sig.as_bytes()[0];
        let flipped = if original == b'A' { 'B' } else { 'A' };
        let tampered = format!("{}.{}.{}{}", parts[0], parts[1], flipped, &sig[1..]);

        assert!(decode_token(&tampered, TEST_SECRET).is_err());
    }

    #[test]
    fn test_wrong_secret_fails() {
        let claims = Claims::new(1, "alice", Role::Admin, 60);
        let token = create_token(&claims, TEST_SECRET).unwrap();

        let result = decode_token(&token, "wrong-secret-key-for-testing-minimum-32-chars");
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_token_format() {
        assert!(decode_token("invalid.token.here", TEST_SECRET).is_err());
        assert!(decode_token("", TEST_SECRET).is_err());
    }

    #[test]
    fn test_role_is_snapshot_at_issuance() {
        // 토큰의 role은 발급 시점 값 그대로 유지됨
        let claims = Claims::new(7, "bob", Role::Manager, 60);
        let token = create_token(&claims, TEST_SECRET).unwrap();

        let decoded = decode_token(&token, TEST_SECRET).unwrap();
        assert_eq!(decoded.claims.role, Role::Manager);
    }
}
