pub mod config;
pub mod diagram;
pub mod error;
pub mod geometry;
pub mod naming;
pub mod selection;
pub mod session;

pub use config::EngineConfig;
pub use error::{EngineError, EngineResult};
pub use session::DiagramSession;
