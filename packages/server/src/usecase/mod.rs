//! UseCase layer.
//!
//! Business logic invoked from the UI layer, operating on the domain layer
//! through repository and infrastructure abstractions.

pub mod connect_session;
pub mod disconnect_session;
pub mod error;
pub mod route_message;

pub use connect_session::{ConnectSessionUseCase, HandshakeRequest};
pub use disconnect_session::DisconnectSessionUseCase;
pub use error::{ConnectError, RouteMessageError};
pub use route_message::RouteMessageUseCase;
