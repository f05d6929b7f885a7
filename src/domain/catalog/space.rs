use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateSpaceDto {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    pub owner_user_id: i32,
    /// Space kind, e.g. couple or family space
    #[serde(rename = "type")]
    #[validate(length(min = 1, max = 50))]
    pub kind: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateSpaceDto {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    pub owner_user_id: Option<i32>,
    #[serde(rename = "type")]
    #[validate(length(min = 1, max = 50))]
    pub kind: Option<String>,
    pub description: Option<String>,
}
