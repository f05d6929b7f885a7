use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Artifact slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactType {
    Flower,
    Plume,
    Sands,
    Goblet,
    Circlet,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateArtifactSetDto {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateArtifactSetDto {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateArtifactDto {
    pub artifact_set_id: i32,
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ArtifactType,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub story: String,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateArtifactDto {
    pub artifact_set_id: Option<i32>,
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<ArtifactType>,
    pub description: Option<String>,
    pub story: Option<String>,
}
