use std::sync::Arc;
use tokio::sync::RwLock;

use crate::db::models::{Profile, User};

/// Process-lifetime, append-only collection of users.
///
/// Clones share the same underlying list. Every lookup scans in insertion
/// order and returns the first match, so duplicate ids resolve to the
/// earliest record.
#[derive(Clone, Default)]
pub struct UserStore {
    users: Arc<RwLock<Vec<User>>>,
}

impl UserStore {
    pub fn new(users: Vec<User>) -> Self {
        Self {
            users: Arc::new(RwLock::new(users)),
        }
    }

    /// Store holding the two fixed records every process starts with.
    pub fn seeded() -> Self {
        Self::new(seed_users())
    }

    pub async fn find_by_id(&self, id: i64) -> Option<User> {
        let users = self.users.read().await;
        users.iter().find(|user| user.id == id).cloned()
    }

    pub async fn find_by_username(&self, username: &str) -> Option<User> {
        let users = self.users.read().await;
        users.iter().find(|user| user.username == username).cloned()
    }

    pub async fn append(&self, user: User) {
        let mut users = self.users.write().await;
        users.push(user);
    }

    pub async fn first(&self) -> Option<User> {
        let users = self.users.read().await;
        users.first().cloned()
    }

    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn snapshot(&self) -> Vec<User> {
        self.users.read().await.clone()
    }
}

pub fn seed_users() -> Vec<User> {
    vec![
        User {
            id: 99,
            username: "foo".to_string(),
            email: "foo@email.com".to_string(),
            level: 3,
            profile: Some(Profile {
                name: "Foo Bar".to_string(),
                age: 22,
            }),
        },
        User {
            id: 88,
            username: "bar".to_string(),
            email: "bar@email.com".to_string(),
            level: 4,
            profile: None,
        },
    ]
}
