//! Project descriptor parsing

pub mod project_descriptor;

pub use project_descriptor::ProjectDescriptor;
