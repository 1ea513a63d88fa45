//! imgrelay HTTP API
//!
//! Routes image requests through the URL parser and hands the result to the
//! configured [`pipeline::ImagePipeline`].

mod handlers;
mod middleware;
mod telemetry;

pub mod error;
pub mod pipeline;
pub mod setup;
pub mod signature;
pub mod state;

pub use error::{ErrorResponse, HttpAppError};
pub use middleware::RequestId;
pub use pipeline::{DescribePipeline, ImagePipeline};
pub use signature::HmacPathValidator;
pub use state::AppState;
