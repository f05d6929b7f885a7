//! Database entities module

pub mod artifact;
pub mod artifact_set;
pub mod migration;
pub mod nation;
pub mod person;
pub mod space;
pub mod user;
pub mod version;

pub use artifact::Entity as Artifact;
pub use artifact_set::Entity as ArtifactSet;
pub use migration::Entity as MigrationRecord;
pub use nation::Entity as Nation;
pub use person::Entity as Person;
pub use space::Entity as Space;
pub use user::Entity as User;
pub use version::Entity as Version;
