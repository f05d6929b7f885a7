//! Catalog resources
//!
//! Request payloads for the plain record-shaped resources. Each resource is
//! served by the generic CRUD stack; only its payload shapes live here.

mod artifact;
mod nation;
mod person;
mod space;
mod version;

pub use artifact::{
    ArtifactType, CreateArtifactDto, CreateArtifactSetDto, UpdateArtifactDto,
    UpdateArtifactSetDto,
};
pub use nation::{CreateNationDto, UpdateNationDto};
pub use person::{CreatePersonDto, UpdatePersonDto};
pub use space::{CreateSpaceDto, UpdateSpaceDto};
pub use version::{CreateVersionDto, UpdateVersionDto};
