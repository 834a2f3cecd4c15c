pub mod fixtures;
pub mod registry_server;

// Re-export key testing utilities
pub use fixtures::{design_system, hostless_pair, marketing_site};
pub use registry_server::RegistryServer;
