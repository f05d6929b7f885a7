use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreatePersonDto {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(range(min = 0, max = 200))]
    pub age: i32,
    #[serde(default)]
    #[validate(length(max = 10))]
    pub gender: String,
    #[validate(email, length(max = 100))]
    pub email: Option<String>,
    #[serde(default)]
    #[validate(length(max = 20))]
    pub phone: String,
    #[serde(default)]
    #[validate(length(max = 255))]
    pub address: String,
    #[serde(default)]
    #[validate(length(max = 100))]
    pub company: String,
    #[serde(default)]
    #[validate(length(max = 50))]
    pub position: String,
    /// 1: employed, 0: left
    #[serde(default = "default_status")]
    #[validate(range(min = 0, max = 1))]
    pub status: i32,
}

fn default_status() -> i32 {
    1
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdatePersonDto {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[validate(range(min = 0, max = 200))]
    pub age: Option<i32>,
    #[validate(length(max = 10))]
    pub gender: Option<String>,
    #[validate(email, length(max = 100))]
    pub email: Option<String>,
    #[validate(length(max = 20))]
    pub phone: Option<String>,
    #[validate(length(max = 255))]
    pub address: Option<String>,
    #[validate(length(max = 100))]
    pub company: Option<String>,
    #[validate(length(max = 50))]
    pub position: Option<String>,
    #[validate(range(min = 0, max = 1))]
    pub status: Option<i32>,
}
