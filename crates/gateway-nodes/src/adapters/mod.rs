//! # Adapters
//!
//! Concrete implementations of the registry's outbound ports.

pub mod memory;
pub mod tcp;

pub use memory::InMemoryNodeRepository;
pub use tcp::TcpEndpointChecker;
