use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::error::ScanError;

/// User profile containing dietary preferences and health goals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub user_id: String,
    #[serde(default)]
    pub name: Option<String>,
    /// "lose", "maintain", or "gain"
    #[serde(default)]
    pub weight_goal: Option<String>,
    /// e.g., ["vegan", "gluten-free"]
    #[serde(default)]
    pub dietary_restrictions: Vec<String>,
    #[serde(default)]
    pub allergies: Vec<String>,
    /// e.g., ["diabetes", "hypertension"]
    #[serde(default)]
    pub health_conditions: Vec<String>,
    #[serde(default)]
    pub daily_calorie_target: Option<u32>,
    /// "sedentary", "moderate", "active", "very active"
    #[serde(default)]
    pub activity_level: Option<String>,
}

impl UserProfile {
    pub fn new(user_id: impl Into<String>) -> Self {
        UserProfile {
            user_id: user_id.into(),
            name: None,
            weight_goal: None,
            dietary_restrictions: Vec::new(),
            allergies: Vec::new(),
            health_conditions: Vec::new(),
            daily_calorie_target: None,
            activity_level: None,
        }
    }
}

/// Storage capability for user profiles.
///
/// The composing application owns the repository and injects it where needed;
/// nothing in the crate holds profile state at module scope.
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    async fn fetch(&self, user_id: &str) -> Result<Option<UserProfile>, ScanError>;
    async fn upsert(&self, profile: UserProfile) -> Result<(), ScanError>;
}

/// Map-backed repository for tests and single-process deployments.
#[derive(Default)]
pub struct InMemoryProfileRepository {
    profiles: RwLock<HashMap<String, UserProfile>>,
}

impl InMemoryProfileRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProfileRepository for InMemoryProfileRepository {
    async fn fetch(&self, user_id: &str) -> Result<Option<UserProfile>, ScanError> {
        Ok(self.profiles.read().await.get(user_id).cloned())
    }

    async fn upsert(&self, profile: UserProfile) -> Result<(), ScanError> {
        self.profiles
            .write()
            .await
            .insert(profile.user_id.clone(), profile);
        Ok(())
    }
}
