//! External service integrations

pub mod model_endpoint;

pub use model_endpoint::{ModelEndpointInvoker, ModelRequest};
