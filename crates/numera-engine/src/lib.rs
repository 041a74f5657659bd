//! # Numera Engine
//!
//! Request/response layer over [`numera_math`].
//!
//! This crate provides:
//! - [`Request`] / [`Response`]: serializable shapes for every method family
//! - [`ComputeEngine`]: the backend trait, with [`SymbolicEngine`] and
//!   [`FiniteDifferenceEngine`]
//! - [`EngineRegistry`]: backend selection
//! - [`input`]: matrix and vector text parsing
//! - [`rounding`]: display rounding of reported values
//!
//! An engine never fails: malformed input, missing fields and solver
//! failures all come back as a response whose status says what happened.
//!
//! ```rust
//! use numera_engine::{Backend, EngineRegistry, Request};
//! use numera_math::Status;
//!
//! let request = Request::from_json(
//!     r#"{"kind": "direct", "method": "doolittle", "matrix": "2 1; 1 3", "vector": "3 4"}"#,
//! )
//! .unwrap();
//!
//! let response = EngineRegistry::new()
//!     .execute(Backend::Symbolic, &request)
//!     .unwrap();
//! assert_eq!(response.status(), Status::Solved);
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::float_cmp)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::uninlined_format_args)]

pub mod dto;
pub mod engine;
pub mod error;
pub mod input;
pub mod rounding;

mod dispatch;

// Re-exports
pub use dto::{
    DirectRequest, DirectResponse, InterpolationRequest, InterpolationResponse, IterativeRequest,
    IterativeResponse, Request, Response, RootRequest, RootResponse,
};
pub use engine::{Backend, ComputeEngine, EngineRegistry, FiniteDifferenceEngine, SymbolicEngine};
pub use error::{EngineError, EngineResult};
pub use rounding::Rounding;
