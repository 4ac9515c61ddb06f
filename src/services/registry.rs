use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;

use crate::models::{DonorProfile, OrganPledge, ProfileUpdateRequest};
use crate::services::postgres::{PostgresClient, PostgresError};

/// Errors that can occur in the pledge and profile registry
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Database error: {0}")]
    Database(#[from] PostgresError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Storage for organ pledges and donor profiles
pub enum Registry {
    Memory(MemoryRegistry),
    Postgres(Arc<PostgresClient>),
}

impl Registry {
    /// Record a pledge; pledging again with the same e-mail returns the first pledge
    pub async fn record_pledge(&self, full_name: &str, email: &str) -> Result<OrganPledge, RegistryError> {
        let pledge_id = uuid::Uuid::new_v4().to_string();
        match self {
            Registry::Memory(memory) => Ok(memory.record_pledge(pledge_id, full_name, email).await),
            Registry::Postgres(postgres) => Ok(postgres.record_pledge(&pledge_id, full_name, email).await?),
        }
    }

    pub async fn get_profile(&self, user_id: &str) -> Result<DonorProfile, RegistryError> {
        let profile = match self {
            Registry::Memory(memory) => memory.get_profile(user_id).await,
            Registry::Postgres(postgres) => postgres.get_profile(user_id).await?,
        };

        profile.ok_or_else(|| RegistryError::NotFound(format!("Profile not found for user {}", user_id)))
    }

    /// Merge an update into a profile, creating it if needed
    ///
    /// Creation requires both a name and a blood type.
    pub async fn update_profile(
        &self,
        user_id: &str,
        update: &ProfileUpdateRequest,
    ) -> Result<DonorProfile, RegistryError> {
        let existing = match self.get_profile(user_id).await {
            Ok(profile) => Some(profile),
            Err(RegistryError::NotFound(_)) => None,
            Err(e) => return Err(e),
        };

        let profile = merge_profile(user_id, existing, update)?;

        match self {
            Registry::Memory(memory) => memory.save_profile(profile.clone()).await,
            Registry::Postgres(postgres) => postgres.save_profile(&profile).await?,
        }

        Ok(profile)
    }
}

fn merge_profile(
    user_id: &str,
    existing: Option<DonorProfile>,
    update: &ProfileUpdateRequest,
) -> Result<DonorProfile, RegistryError> {
    let mut profile = match existing {
        Some(profile) => profile,
        None => {
            let (Some(name), Some(blood_type)) = (&update.name, update.blood_type) else {
                return Err(RegistryError::InvalidInput(
                    "name and bloodType are required to create a profile".to_string(),
                ));
            };
            DonorProfile {
                user_id: user_id.to_string(),
                name: name.clone(),
                blood_type,
                last_donation: None,
                donations: 0,
                avatar_url: None,
            }
        }
    };

    if let Some(name) = &update.name {
        profile.name = name.clone();
    }
    if let Some(blood_type) = update.blood_type {
        profile.blood_type = blood_type;
    }
    if let Some(last_donation) = update.last_donation {
        profile.last_donation = Some(last_donation);
    }
    if let Some(donations) = update.donations {
        profile.donations = donations;
    }
    if let Some(avatar_url) = &update.avatar_url {
        profile.avatar_url = Some(avatar_url.clone());
    }

    Ok(profile)
}

/// Process-local registry, lost on restart
#[derive(Default)]
pub struct MemoryRegistry {
    pledges: RwLock<HashMap<String, OrganPledge>>,
    profiles: RwLock<HashMap<String, DonorProfile>>,
}

impl MemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the demo profile
    pub fn seeded() -> Self {
        let demo = DonorProfile::demo();
        let mut profiles = HashMap::new();
        profiles.insert(demo.user_id.clone(), demo);

        Self {
            pledges: RwLock::new(HashMap::new()),
            profiles: RwLock::new(profiles),
        }
    }

    async fn record_pledge(&self, pledge_id: String, full_name: &str, email: &str) -> OrganPledge {
        let key = email.to_lowercase();
        let mut pledges = self.pledges.write().await;

        pledges
            .entry(key.clone())
            .or_insert_with(|| OrganPledge {
                pledge_id,
                full_name: full_name.to_string(),
                email: key,
                pledged_at: chrono::Utc::now(),
            })
            .clone()
    }

    async fn get_profile(&self, user_id: &str) -> Option<DonorProfile> {
        self.profiles.read().await.get(user_id).cloned()
    }

    async fn save_profile(&self, profile: DonorProfile) {
        self.profiles
            .write()
            .await
            .insert(profile.user_id.clone(), profile);
    }
}
