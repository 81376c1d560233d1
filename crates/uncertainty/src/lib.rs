//! # firn-uncertainty
//!
//! First-order propagation of independent mass and height uncertainties into
//! bulk density uncertainty, as a function of snow height.
//!
//! The fitted relation `mass(h) = a·exp(b·h) + c` supplies the mass at each
//! height of a regular grid, independent of any observation. For every
//! `(σ_m, σ_h)` [`Uncertainty`] scenario:
//!
//! ```text
//! density(h) = mass(h) / h
//! rel_err(h) = sqrt((σ_m / mass(h))² + (σ_h / h)²)
//! abs_err(h) = rel_err(h) · density(h)
//! ```
//!
//! [`propagate_fixed_densities`] replaces `density(h)` with nominal values.
//! The zero-height row is singular and left non-finite in the
//! [`ErrorProfile`].

mod error;
mod profile;
mod propagate;
mod scenario;

pub use error::UncertaintyError;
pub use profile::ErrorProfile;
pub use propagate::{propagate, propagate_fixed_densities};
pub use scenario::{Uncertainty, relative_error};
