//! Resource endpoints served by the generic CRUD stack

use crate::domain::catalog::{
    CreateArtifactDto, CreateArtifactSetDto, CreateNationDto, CreatePersonDto, CreateSpaceDto,
    CreateVersionDto, UpdateArtifactDto, UpdateArtifactSetDto, UpdateNationDto, UpdatePersonDto,
    UpdateSpaceDto, UpdateVersionDto,
};
use crate::domain::{CreateUserDto, UpdateUserDto};
use crate::interfaces::http::modules::resources::crud_endpoints;

crud_endpoints!(persons {
    entity: person,
    path: "/api/v1/persons",
    item_path: "/api/v1/persons/{id}",
    tag: "Persons",
    create: CreatePersonDto,
    update: UpdatePersonDto,
    security: [()],
});

crud_endpoints!(nations {
    entity: nation,
    path: "/api/v1/nations",
    item_path: "/api/v1/nations/{id}",
    tag: "Nations",
    create: CreateNationDto,
    update: UpdateNationDto,
    security: [()],
});

crud_endpoints!(versions {
    entity: version,
    path: "/api/v1/versions",
    item_path: "/api/v1/versions/{id}",
    tag: "Versions",
    create: CreateVersionDto,
    update: UpdateVersionDto,
    security: [()],
});

crud_endpoints!(artifact_sets {
    entity: artifact_set,
    path: "/api/v1/artifact-sets",
    item_path: "/api/v1/artifact-sets/{id}",
    tag: "Artifacts",
    create: CreateArtifactSetDto,
    update: UpdateArtifactSetDto,
    security: [()],
});

crud_endpoints!(artifacts {
    entity: artifact,
    path: "/api/v1/artifacts",
    item_path: "/api/v1/artifacts/{id}",
    tag: "Artifacts",
    create: CreateArtifactDto,
    update: UpdateArtifactDto,
    security: [()],
});

crud_endpoints!(spaces {
    entity: space,
    path: "/api/v1/spaces",
    item_path: "/api/v1/spaces/{id}",
    tag: "Spaces",
    create: CreateSpaceDto,
    update: UpdateSpaceDto,
    security: [()],
});

crud_endpoints!(users {
    entity: user,
    path: "/api/v1/users",
    item_path: "/api/v1/users/{id}",
    tag: "Users",
    create: CreateUserDto,
    update: UpdateUserDto,
    security: [("bearer_auth" = [])],
});
