//! # Numera Math
//!
//! Numerical methods with full iteration history for the Numera engine.
//!
//! This crate provides:
//!
//! - **Expressions**: Parsing, evaluation and symbolic differentiation of
//!   real functions of one variable
//! - **Convergence**: One shared stop/continue policy with absolute or
//!   relative error and vector norms
//! - **Root Finding**: Bisection, false position, incremental search, fixed
//!   point, Newton-Raphson, secant and multiple roots
//! - **Linear Algebra**: Direct (LU, Cholesky, Gaussian elimination) and
//!   iterative (Jacobi, Gauss-Seidel, SOR) solvers
//! - **Interpolation**: Vandermonde and Newton divided differences
//!
//! ## Design Philosophy
//!
//! - **Results, not panics**: Every solver returns a result record with a
//!   [`Status`], a message and the steps taken so far
//! - **Stateless**: Each call owns its working copies and history
//! - **Traceable**: Per-iteration detail goes to the `log` facade at trace
//!   level
//!
//! ## Quick Start
//!
//! ```rust
//! use numera_math::prelude::*;
//!
//! let f = Expression::parse("x^2 - 2").unwrap();
//! let df = f.derivative(1);
//! let spec = ToleranceSpec::new(1e-10, 50).unwrap();
//!
//! let result = newton_raphson(|x| f.evaluate(x), |x| df.evaluate(x), 1.0, &spec);
//! assert_eq!(result.status, Status::Converged);
//! ```

#![warn(missing_docs)]
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
#![allow(clippy::similar_names)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::redundant_closure_for_method_calls)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::needless_range_loop)]

pub mod convergence;
pub mod error;
pub mod expression;
pub mod history;
pub mod interpolation;
pub mod linear_algebra;
pub mod roots;
pub mod status;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::convergence::{ErrorType, Norm, PrecisionType, ToleranceSpec};
    pub use crate::error::{EvalResult, ExprError, MathError, MathResult};
    pub use crate::expression::{Derivative, Expression};
    pub use crate::interpolation::{
        newton_divided_differences, vandermonde, InterpolationMethod, InterpolationResult,
    };
    pub use crate::linear_algebra::{
        cholesky, crout, doolittle, gauss_seidel, jacobi, lu_gaussian_elimination,
        pivot_gaussian_elimination, simple_gaussian_elimination, sor, DirectMethod,
        FactorizationResult, IterativeLinearResult, IterativeMethod,
    };
    pub use crate::roots::{
        bisection, false_position, fixed_point, incremental_search, multiple_roots,
        newton_raphson, secant, IterationStep, RootMethod, RootResult,
    };
    pub use crate::status::Status;
}

pub use error::{MathError, MathResult};
pub use status::Status;
