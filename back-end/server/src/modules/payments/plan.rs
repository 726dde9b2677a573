use std::fmt;
use std::str::FromStr;

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::modules::error::ServiceError;

pub const CURRENCY: &str = "INR";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubscriptionPlan {
    Monthly,
    Semester,
    Yearly,
}

impl SubscriptionPlan {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionPlan::Monthly => "MONTHLY",
            SubscriptionPlan::Semester => "SEMESTER",
            SubscriptionPlan::Yearly => "YEARLY",
        }
    }

    /// Price in paise.
    pub fn amount(&self) -> i64 {
        match self {
            SubscriptionPlan::Monthly => 9900,
            SubscriptionPlan::Semester => 49900,
            SubscriptionPlan::Yearly => 99900,
        }
    }

    pub fn duration(&self) -> Duration {
        match self {
            SubscriptionPlan::Yearly => Duration::days(365),
            SubscriptionPlan::Monthly | SubscriptionPlan::Semester => Duration::days(180),
        }
    }
}

impl fmt::Display for SubscriptionPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SubscriptionPlan {
    type Err = ServiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "MONTHLY" => Ok(SubscriptionPlan::Monthly),
            "SEMESTER" => Ok(SubscriptionPlan::Semester),
            "YEARLY" => Ok(SubscriptionPlan::Yearly),
            other => Err(ServiceError::unprocessable(format!("Unknown plan '{other}'"))),
        }
    }
}
