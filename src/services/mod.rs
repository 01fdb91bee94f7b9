pub mod analysis;
pub mod backend;
#[cfg(test)]
pub(crate) mod mock_backend;
pub mod mode_context;
pub mod openai_client;
pub mod tools;

pub use analysis::*;
pub use backend::*;
pub use mode_context::*;
pub use openai_client::*;
