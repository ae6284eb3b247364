//! Dataset profiles: one implementation of the per-type roles per dataset type
//!
//! | Type | Axis column | Pre-filter |
//! |------|-------------|------------|
//! | contractors | `work_types` | - |
//! | risks | `project_name` | `project_type == risk_category` |
//! | errors | `project` | - |
//! | processes | `name` | - |

pub mod contractors;
pub mod errors;
pub mod processes;
pub mod risks;
pub mod text;
pub mod traits;

pub use contractors::ContractorsProfile;
pub use errors::ErrorsProfile;
pub use processes::ProcessesProfile;
pub use risks::RisksProfile;
pub use traits::{Compose, DatasetProfile, ExtractAxis, Normalize};

use crate::core::error::DomainError;
use crate::dataset::DatasetType;
use std::collections::HashMap;
use std::sync::Arc;

/// Profiles keyed by dataset type. Built once at startup.
#[derive(Clone, Default)]
pub struct ProfileRegistry {
    profiles: HashMap<DatasetType, Arc<dyn DatasetProfile>>,
}

impl ProfileRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The four built-in profiles.
    pub fn builtin() -> Self {
        Self::new()
            .with_profile(Arc::new(ContractorsProfile))
            .with_profile(Arc::new(RisksProfile))
            .with_profile(Arc::new(ErrorsProfile))
            .with_profile(Arc::new(ProcessesProfile))
    }

    /// Register a profile under its own dataset type, replacing any previous one.
    pub fn with_profile(mut self, profile: Arc<dyn DatasetProfile>) -> Self {
        self.profiles.insert(profile.dataset_type(), profile);
        self
    }

    pub fn get(&self, dataset: DatasetType) -> Result<Arc<dyn DatasetProfile>, DomainError> {
        self.profiles
            .get(&dataset)
            .cloned()
            .ok_or_else(|| DomainError::MissingProfile(dataset.to_string()))
    }
}

impl std::fmt::Debug for ProfileRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut types: Vec<_> = self.profiles.keys().collect();
        types.sort();
        f.debug_struct("ProfileRegistry").field("types", &types).finish()
    }
}
