use serde::Deserialize;

use crate::users::repo_types::{Preference, ProfileDetails};

/// Request body for the second signup step.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecondStepRequest {
    pub user_id: Option<String>,
    #[serde(flatten)]
    pub details: ProfileDetails,
}

/// Request body for the third signup step.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThirdStepRequest {
    pub user_id: Option<String>,
    #[serde(default)]
    pub preferences: Vec<Preference>,
}
