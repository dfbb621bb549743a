pub mod config;
pub mod domain;
pub mod errors;

pub use domain::{
    Balance, Category, ChatMessage, ContextSnapshot, Order, PipelineResult, Product, Role,
    Session, UserProfile,
};
pub use errors::{BackendError, GenerativeError};
