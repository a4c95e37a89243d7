//! Round-robin placement of nodes across regions, providers and validator types.

use serde::{Deserialize, Serialize};

use aegis_types::ValidatorType;

use crate::RegistryError;

/// Cloud regions the default pool is spread across.
pub const DEFAULT_REGIONS: [&str; 20] = [
    "us-east-1",
    "us-west-2",
    "eu-west-1",
    "eu-central-1",
    "ap-southeast-1",
    "ap-northeast-1",
    "ca-central-1",
    "sa-east-1",
    "ap-south-1",
    "eu-north-1",
    "us-west-1",
    "eu-west-2",
    "eu-west-3",
    "ap-northeast-2",
    "ap-southeast-2",
    "ap-northeast-3",
    "eu-south-1",
    "me-south-1",
    "af-south-1",
    "ap-east-1",
];

/// Hosting provider labels of the default pool.
pub const DEFAULT_PROVIDERS: [&str; 6] = ["AWS", "Azure", "GCP", "DigitalOcean", "Vultr", "Linode"];

/// Lists the registry cycles through when creating nodes. Node `i` gets
/// `regions[i % len]`, `providers[i % len]` and `validator_types[i % len]`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RegistryLayout {
    pub regions: Vec<String>,
    pub providers: Vec<String>,
    pub validator_types: Vec<ValidatorType>,
}

impl Default for RegistryLayout {
    fn default() -> Self {
        Self {
            regions: DEFAULT_REGIONS.iter().map(|s| s.to_string()).collect(),
            providers: DEFAULT_PROVIDERS.iter().map(|s| s.to_string()).collect(),
            validator_types: ValidatorType::ALL.to_vec(),
        }
    }
}

impl RegistryLayout {
    pub fn validate(&self) -> Result<(), RegistryError> {
        if self.regions.is_empty() {
            return Err(RegistryError::EmptyLayout("regions"));
        }
        if self.providers.is_empty() {
            return Err(RegistryError::EmptyLayout("providers"));
        }
        if self.validator_types.is_empty() {
            return Err(RegistryError::EmptyLayout("validator types"));
        }
        Ok(())
    }

    /// Region, provider, validator type and location label for node `index`.
    ///
    /// The location is `<region>-<ordinal>`, where the ordinal counts how many
    /// times the region list has wrapped (starting at 1).
    pub(crate) fn placement(&self, index: usize) -> (String, String, ValidatorType, String) {
        let region = self.regions[index % self.regions.len()].clone();
        let provider = self.providers[index % self.providers.len()].clone();
        let validator_type = self.validator_types[index % self.validator_types.len()];
        let location = format!("{region}-{}", index / self.regions.len() + 1);
        (region, provider, validator_type, location)
    }
}
