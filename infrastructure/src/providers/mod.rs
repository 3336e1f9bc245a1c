//! Model provider adapters

mod openrouter;

pub use openrouter::OpenRouterGateway;
