//! Infrastructure layer: auth, AI upstream, room registry, repositories,
//! and wire DTOs.

pub mod ai;
pub mod auth;
pub mod dto;
pub mod registry;
pub mod repository;
