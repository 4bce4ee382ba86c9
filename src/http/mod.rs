//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware stack)
//!     → request.rs (request ID)
//!     → api handlers (extract.rs pulls body/path)
//!     → error.rs (failures rendered as {"message": ...})
//!     → Send to client
//! ```

pub mod error;
pub mod extract;
pub mod request;
pub mod server;

pub use error::{ApiError, ApiResult};
pub use extract::{JsonBody, PathKey};
pub use request::MakeRequestUuidV4;
pub use server::{build_router, ApiServer, AppState};
