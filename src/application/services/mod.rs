//! Application services

mod crud;

pub use crud::CrudService;
