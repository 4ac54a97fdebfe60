use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::RwLock;

use super::repo::{StoreError, UserStore};
use super::repo_types::{User, UserFields, UserId};

/// In-process store. Records are kept in insertion order, which is this store's native order.
#[derive(Default)]
pub struct MemoryUserStore {
    users: RwLock<Vec<User>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_name(&self, name: &str) -> Result<Vec<User>, StoreError> {
        let users = self.users.read().await;
        Ok(users.iter().filter(|u| u.name == name).cloned().collect())
    }

    async fn find_all(&self) -> Result<Vec<User>, StoreError> {
        Ok(self.users.read().await.clone())
    }

    async fn find_by_id(&self, id: &str) -> Result<Vec<User>, StoreError> {
        let id = UserId::parse(id)?;
        let users = self.users.read().await;
        Ok(users.iter().filter(|u| u.id == id).cloned().collect())
    }

    async fn insert(&self, fields: UserFields) -> Result<User, StoreError> {
        let now = OffsetDateTime::now_utc();
        let user = User {
            id: UserId::generate(),
            name: fields.name,
            email: fields.email,
            password: fields.password,
            age: fields.age,
            created_at: now,
            updated_at: now,
        };
        self.users.write().await.push(user.clone());
        Ok(user)
    }

    async fn update_by_id(&self, id: &str, fields: UserFields) -> Result<u64, StoreError> {
        let id = UserId::parse(id)?;
        let mut users = self.users.write().await;
        let Some(user) = users.iter_mut().find(|u| u.id == id) else {
            return Ok(0);
        };
        user.name = fields.name;
        user.email = fields.email;
        user.password = fields.password;
        user.age = fields.age;
        user.updated_at = OffsetDateTime::now_utc();
        Ok(1)
    }

    async fn delete_by_id(&self, id: &str) -> Result<u64, StoreError> {
        let id = UserId::parse(id)?;
        let mut users = self.users.write().await;
        let before = users.len();
        users.retain(|u| u.id != id);
        Ok((before - users.len()) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(name: &str, email: &str) -> UserFields {
        UserFields {
            name: name.into(),
            email: email.into(),
            password: "secret".into(),
            age: 30,
        }
    }

    #[tokio::test]
    async fn insert_then_lookup_by_name_and_id() {
        let store = MemoryUserStore::new();
        let created = store.insert(fields("Alex", "alex@gmail.com")).await.unwrap();

        let by_name = store.find_by_name("Alex").await.unwrap();
        assert_eq!(by_name, vec![created.clone()]);
        assert!(store.find_by_name("alex").await.unwrap().is_empty());

        let by_id = store.find_by_id(created.id.as_str()).await.unwrap();
        assert_eq!(by_id, vec![created]);
    }

    #[tokio::test]
    async fn find_all_keeps_insertion_order() {
        let store = MemoryUserStore::new();
        let a = store.insert(fields("A", "a@x.io")).await.unwrap();
        let b = store.insert(fields("B", "b@x.io")).await.unwrap();
        let ids: Vec<_> = store.find_all().await.unwrap().into_iter().map(|u| u.id).collect();
        assert_eq!(ids, vec![a.id, b.id]);
    }

    #[tokio::test]
    async fn update_replaces_fields_and_keeps_identity() {
        let store = MemoryUserStore::new();
        let created = store.insert(fields("Alex", "alex@gmail.com")).await.unwrap();

        let matched = store
            .update_by_id(created.id.as_str(), fields("Alexandre", "alexandre@gmail.com"))
            .await
            .unwrap();
        assert_eq!(matched, 1);

        let stored = store.find_by_id(created.id.as_str()).await.unwrap().remove(0);
        assert_eq!(stored.id, created.id);
        assert_eq!(stored.name, "Alexandre");
        assert_eq!(stored.email, "alexandre@gmail.com");
        assert_eq!(stored.created_at, created.created_at);
        assert!(stored.updated_at >= created.updated_at);
    }

    #[tokio::test]
    async fn missing_ids_match_nothing() {
        let store = MemoryUserStore::new();
        let missing = "000000000000000000000000";
        assert!(store.find_by_id(missing).await.unwrap().is_empty());
        assert_eq!(store.update_by_id(missing, fields("x", "x@x.io")).await.unwrap(), 0);
        assert_eq!(store.delete_by_id(missing).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn malformed_ids_are_driver_errors() {
        let store = MemoryUserStore::new();
        assert!(matches!(
            store.find_by_id("not-an-id").await,
            Err(StoreError::InvalidId(_))
        ));
        assert!(matches!(
            store.delete_by_id("not-an-id").await,
            Err(StoreError::InvalidId(_))
        ));
    }

    #[tokio::test]
    async fn delete_removes_only_the_target() {
        let store = MemoryUserStore::new();
        let a = store.insert(fields("A", "a@x.io")).await.unwrap();
        let b = store.insert(fields("B", "b@x.io")).await.unwrap();

        assert_eq!(store.delete_by_id(a.id.as_str()).await.unwrap(), 1);
        assert_eq!(store.find_all().await.unwrap(), vec![b]);
    }
}
