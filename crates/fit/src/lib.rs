//! # firn-fit
//!
//! Parametric curve fitting with parameter uncertainties.
//!
//! - [`fit_exponential`]: mass–height relation `mass(h) = a·exp(b·h) + c`,
//!   optionally anchored through the origin with a near-zero-variance sample.
//! - [`fit_noise_decay`]: aggregated noise versus solution count,
//!   `noise(n) = σ₀ / sqrt(n)`.
//! - [`fit_linear`]: straight line for sensor cross-comparison.
//!
//! Every fit returns an immutable [`FitResult`] holding the model, one-sigma
//! parameter errors and the curve sampled on a [`SampleGrid`]. Degenerate
//! input and optimizer failure are typed errors, never a zero model.
//!
//! ```mermaid
//! flowchart LR
//!     A[pairs] --> B[rate scan]
//!     B --> C[Nelder-Mead on b]
//!     C --> D["QR solve for (a, c)"]
//!     D --> E[covariance from Jacobian]
//!     E --> F[FitResult]
//! ```

mod config;
mod error;
mod exponential;
mod grid;
mod linear;
mod model;
mod noise;
mod pairs;
mod result;
mod small_linalg;

pub use config::ExponentialFitConfig;
pub use error::FitError;
pub use exponential::fit_exponential;
pub use grid::SampleGrid;
pub use linear::fit_linear;
pub use model::{CurveModel, ExponentialParams};
pub use noise::fit_noise_decay;
pub use pairs::pair_by_time;
pub use result::FitResult;
