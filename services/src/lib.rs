//! Business services that sit between the HTTP layer and the entities.

pub mod dashboard;
pub mod receipt;
