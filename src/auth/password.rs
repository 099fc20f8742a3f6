//! 비밀번호 해싱 유틸리티.
//!
//! Argon2id 기반 비밀번호 해싱 및 검증.
//!
//! 입력은 해싱과 검증 양쪽에서 동일하게 [`MAX_PASSWORD_BYTES`]로
//! 잘립니다. 한쪽만 자르면 긴 비밀번호의 인증이 조용히 어긋나므로
//! 두 경로가 반드시 같은 절단을 거쳐야 합니다.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

/// 비밀번호 입력 바이트 상한.
pub const MAX_PASSWORD_BYTES: usize = 72;

/// 비밀번호 처리 에러.
#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    #[error("비밀번호 해싱 실패")]
    HashingFailed,
}

/// 상한을 초과하는 입력을 바이트 단위로 절단.
fn truncated(password: &str) -> &[u8] {
    let bytes = password.as_bytes();
    &bytes[..bytes.len().min(MAX_PASSWORD_BYTES)]
}

/// 비밀번호 해싱.
///
/// Argon2id 알고리즘을 사용하며 솔트는 호출마다 새로 생성됩니다.
/// 같은 입력이라도 호출마다 다른 해시가 나오지만 둘 다 검증 가능합니다.
///
/// # Returns
///
/// PHC 형식의 해시 문자열 (솔트 포함)
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    let hash = argon2
        .hash_password(truncated(password), &salt)
        .map_err(|_| PasswordError::HashingFailed)?;

    Ok(hash.to_string())
}

/// 비밀번호 검증.
///
/// 저장된 해시와 입력된 비밀번호를 비교합니다. 비교 자체는 해싱
/// 프리미티브에 위임됩니다.
///
/// 불일치, 잘못된 해시 형식, 내부 오류 모두 `false`를 반환하며
/// 절대 패닉하거나 에러를 전파하지 않습니다.
pub fn verify_password(password: &str, hash: &str) -> bool {
    let Ok(parsed_hash) = PasswordHash::new(hash) else {
        return false;
    };

    Argon2::default()
        .verify_password(truncated(password), &parsed_hash)
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify_password() {
        let password = "pw1234";
        let hash = hash_password(password).unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password(password, &hash));
        assert!(!verify_password("wrong", &hash));
    }

    #[test]
    fn test_same_password_different_hashes() {
        let hash1 = hash_password("Password1").unwrap();
        let hash2 = hash_password("Password1").unwrap();

        // 솔트가 다르므로 해시가 다름
        assert_ne!(hash1, hash2);

        // 하지만 둘 다 검증 가능
        assert!(verify_password("Password1", &hash1));
        assert!(verify_password("Password1", &hash2));
    }

    #[test]
    fn test_truncation_invariant() {
        // 72바이트를 넘는 비밀번호는 해싱/검증 모두 동일하게 절단
        let long: String = "a".repeat(100);
        let prefix: String = "a".repeat(MAX_PASSWORD_BYTES);

        let hash_long = hash_password(&long).unwrap();
        let hash_prefix = hash_password(&prefix).unwrap();

        assert!(verify_password(&long, &hash_long));
        assert!(verify_password(&prefix, &hash_long));
        assert!(verify_password(&long, &hash_prefix));
        assert!(verify_password(&prefix, &hash_prefix));

        // 절단 지점 이전이 다르면 불일치
        let different = format!("b{}", "a".repeat(99));
        assert!(!verify_password(&different, &hash_long));
    }

    #[test]
    fn test_verify_malformed_hash_returns_false() {
        assert!(!verify_password("password", "not-a-valid-hash"));
        assert!(!verify_password("password", ""));
    }

    #[test]
    fn test_unicode_password() {
        let password = "한글비밀번호123";
        let hash = hash_password(password).unwrap();
        assert!(verify_password(password, &hash));
    }
}
