//! Target list providers

use crate::{models::Config, types::Target};

/// Built-in AWS regions as (code, name)
pub const AWS_REGIONS: &[(&str, &str)] = &[
    ("us-east-1", "US East (N. Virginia)"),
    ("us-east-2", "US East (Ohio)"),
    ("us-west-1", "US West (N. California)"),
    ("us-west-2", "US West (Oregon)"),
    ("ca-central-1", "Canada (Central)"),
    ("ca-west-1", "Canada West (Calgary)"),
    ("sa-east-1", "South America (São Paulo)"),
    ("eu-west-1", "Europe (Ireland)"),
    ("eu-west-2", "Europe (London)"),
    ("eu-west-3", "Europe (Paris)"),
    ("eu-central-1", "Europe (Frankfurt)"),
    ("eu-central-2", "Europe (Zurich)"),
    ("eu-north-1", "Europe (Stockholm)"),
    ("eu-south-1", "Europe (Milan)"),
    ("eu-south-2", "Europe (Spain)"),
    ("me-south-1", "Middle East (Bahrain)"),
    ("me-central-1", "Middle East (UAE)"),
    ("il-central-1", "Israel (Tel Aviv)"),
    ("af-south-1", "Africa (Cape Town)"),
    ("ap-east-1", "Asia Pacific (Hong Kong)"),
    ("ap-south-1", "Asia Pacific (Mumbai)"),
    ("ap-south-2", "Asia Pacific (Hyderabad)"),
    ("ap-northeast-1", "Asia Pacific (Tokyo)"),
    ("ap-northeast-2", "Asia Pacific (Seoul)"),
    ("ap-northeast-3", "Asia Pacific (Osaka)"),
    ("ap-southeast-1", "Asia Pacific (Singapore)"),
    ("ap-southeast-2", "Asia Pacific (Sydney)"),
    ("ap-southeast-3", "Asia Pacific (Jakarta)"),
    ("ap-southeast-4", "Asia Pacific (Melbourne)"),
];

/// Supplies the ordered list of targets probed by every request
pub trait TargetProvider: Send + Sync {
    fn targets(&self) -> Vec<Target>;
}

/// A fixed, read-only target list
#[derive(Debug, Clone)]
pub struct StaticRegions {
    targets: Vec<Target>,
}

impl StaticRegions {
    pub fn new(targets: Vec<Target>) -> Self {
        Self { targets }
    }

    /// The built-in AWS region list
    pub fn aws() -> Self {
        Self::new(
            AWS_REGIONS
                .iter()
                .map(|&(code, name)| Target::new(name, code))
                .collect(),
        )
    }

    /// The configured override, or the AWS list when none is set
    pub fn from_config(config: &Config) -> Self {
        if config.regions.is_empty() {
            Self::aws()
        } else {
            Self::new(config.regions.clone())
        }
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

impl TargetProvider for StaticRegions {
    fn targets(&self) -> Vec<Target> {
        self.targets.clone()
    }
}
