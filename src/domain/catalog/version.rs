use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

/// Game version, e.g. `4.2`
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateVersionDto {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateVersionDto {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
}
