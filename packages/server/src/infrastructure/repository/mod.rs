//! Concrete repository implementations (dependency inversion: the traits
//! live in the domain layer).

pub mod inmemory;

pub use inmemory::{InMemoryProjectRepository, InMemoryUserRepository};
