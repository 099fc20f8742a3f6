//! 사용자 저장소.
//!
//! 인증 코어가 소비하는 사용자 조회 협력자와 인메모리 구현.

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use super::RepositoryError;
use crate::auth::Role;

/// 사용자 레코드 (Principal).
///
/// `password_hash`는 불투명 값으로 저장소 밖으로 직렬화되지 않습니다.
/// `username`은 생성 후 불변입니다.
#[derive(Debug, Clone)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub password_hash: String,
    pub role: Role,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 사용자 생성 입력.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub password_hash: String,
    pub role: Role,
    pub is_active: bool,
}

/// 사용자 부분 수정 입력 (모든 필드 선택적).
///
/// `username`은 불변이므로 수정 대상이 아닙니다.
#[derive(Debug, Clone, Default)]
pub struct UserUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role: Option<Role>,
    pub is_active: Option<bool>,
}

/// 사용자 조회 협력자.
///
/// Principal Resolver가 의존하는 유일한 I/O 지점입니다. 구현체의
/// 장애는 [`RepositoryError::Unavailable`]로 전파됩니다.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// 사용자 이름으로 조회.
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepositoryError>;

    /// ID로 조회.
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, RepositoryError>;

    /// 새 사용자 생성. 중복된 이름이면 `DuplicateUsername`.
    async fn insert(&self, new_user: NewUser) -> Result<User, RepositoryError>;

    /// 부분 수정. 대상이 없으면 `None`.
    async fn update(&self, id: i64, changes: UserUpdate) -> Result<Option<User>, RepositoryError>;

    /// 삭제. 삭제했으면 `true`, 대상이 없으면 `false`.
    async fn delete(&self, id: i64) -> Result<bool, RepositoryError>;

    /// 전체 목록 (id 오름차순).
    async fn list(&self) -> Result<Vec<User>, RepositoryError>;

    /// 저장된 사용자 수.
    async fn count(&self) -> Result<usize, RepositoryError>;
}

/// 인메모리 사용자 저장소.
///
/// 프로세스 로컬 상태이며 재시작 시 초기화됩니다.
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<i64, User>>,
    next_id: AtomicI64,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self {
            users: RwLock::new(HashMap::new()),
            next_id: AtomicI64::new(1),
        }
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepositoryError> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.username == username).cloned())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, RepositoryError> {
        let users = self.users.read().await;
        Ok(users.get(&id).cloned())
    }

    async fn insert(&self, new_user: NewUser) -> Result<User, RepositoryError> {
        let mut users = self.users.write().await;

        if users.values().any(|u| u.username == new_user.username) {
            return Err(RepositoryError::DuplicateUsername(new_user.username));
        }

        let now = Utc::now();
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let user = User {
            id,
            username: new_user.username,
            first_name: new_user.first_name,
            last_name: new_user.last_name,
            password_hash: new_user.password_hash,
            role: new_user.role,
            is_active: new_user.is_active,
            created_at: now,
            updated_at: now,
        };

        users.insert(id, user.clone());
        Ok(user)
    }

    async fn update(&self, id: i64, changes: UserUpdate) -> Result<Option<User>, RepositoryError> {
        let mut users = self.users.write().await;

        let Some(user) = users.get_mut(&id) else {
            return Ok(None);
        };

        if let Some(first_name) = changes.first_name {
            user.first_name = first_name;
        }
        if let Some(last_name) = changes.last_name {
            user.last_name = last_name;
        }
        if let Some(role) = changes.role {
            user.role = role;
        }
        if let Some(is_active) = changes.is_active {
            user.is_active = is_active;
        }
        user.updated_at = Utc::now();

        Ok(Some(user.clone()))
    }

    async fn delete(&self, id: i64) -> Result<bool, RepositoryError> {
        let mut users = self.users.write().await;
        Ok(users.remove(&id).is_some())
    }

    async fn list(&self) -> Result<Vec<User>, RepositoryError> {
        let users = self.users.read().await;
        let mut all: Vec<User> = users.values().cloned().collect();
        all.sort_by_key(|u| u.id);
        Ok(all)
    }

    async fn count(&self) -> Result<usize, RepositoryError> {
        let users = self.users.read().await;
        Ok(users.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(username: &str, role: Role) -> NewUser {
        NewUser {
            username: username.to_string(),
            first_name: "Test".to_string(),
            last_name: "User".to_string(),
            password_hash: "$argon2id$fake".to_string(),
            role,
            is_active: true,
        }
    }

    #[tokio::test]
    async fn test_insert_and_find() {
        let repo = InMemoryUserRepository::new();

        let user = repo.insert(new_user("alice", Role::Staff)).await.unwrap();
        assert_eq!(user.id, 1);
        assert_eq!(user.username, "alice");

        let by_name = repo.find_by_username("alice").await.unwrap().unwrap();
        assert_eq!(by_name.id, user.id);

        let by_id = repo.find_by_id(user.id).await.unwrap().unwrap();
        assert_eq!(by_id.username, "alice");

        assert!(repo.find_by_username("bob").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_username_rejected() {
        let repo = InMemoryUserRepository::new();
        repo.insert(new_user("alice", Role::Viewer)).await.unwrap();

        let result = repo.insert(new_user("alice", Role::Admin)).await;
        assert!(matches!(
            result,
            Err(RepositoryError::DuplicateUsername(name)) if name == "alice"
        ));
        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_partial_update() {
        let repo = InMemoryUserRepository::new();
        let user = repo.insert(new_user("alice", Role::Staff)).await.unwrap();

        let updated = repo
            .update(
                user.id,
                UserUpdate {
                    is_active: Some(false),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();

        // 지정한 필드만 바뀌어야 함
        assert!(!updated.is_active);
        assert_eq!(updated.role, Role::Staff);
        assert_eq!(updated.first_name, "Test");
        assert_eq!(updated.username, "alice");
    }

    #[tokio::test]
    async fn test_update_missing_returns_none() {
        let repo = InMemoryUserRepository::new();
        let result = repo.update(99, UserUpdate::default()).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_delete() {
        let repo = InMemoryUserRepository::new();
        let user = repo.insert(new_user("alice", Role::Admin)).await.unwrap();

        assert!(repo.delete(user.id).await.unwrap());
        assert!(!repo.delete(user.id).await.unwrap());
        assert!(repo.find_by_id(user.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_ordered_by_id() {
        let repo = InMemoryUserRepository::new();
        repo.insert(new_user("alice", Role::Admin)).await.unwrap();
        repo.insert(new_user("bob", Role::Viewer)).await.unwrap();
        repo.insert(new_user("carol", Role::Staff)).await.unwrap();

        let all = repo.list().await.unwrap();
        let names: Vec<&str> = all.iter().map(|u| u.username.as_str()).collect();
        assert_eq!(names, vec!["alice", "bob", "carol"]);
    }
}
