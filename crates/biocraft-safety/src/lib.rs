//! `biocraft-safety` – command admission for the BioCraft motion stack
//!
//! Nothing reaches the actuator without passing through this crate.  Each
//! proposed motion is checked against travel limits, paced by a rate limiter,
//! and, when its risk warrants it, held until a human operator confirms it.
//!
//! # Modules
//!
//! - [`range_validator`] – [`RangeValidator`][range_validator::RangeValidator]:
//!   per-axis inclusive bounds for translations (mm) and Euler rotations (deg).
//! - [`rate_limiter`] – [`RateLimiter`][rate_limiter::RateLimiter]:
//!   minimum spacing between accepted commands, atomic under concurrency.
//! - [`confirmation_gate`] – [`ConfirmationGate`][confirmation_gate::ConfirmationGate]:
//!   pending table for risky commands; silence past the deadline is a denial.
//! - [`safety_layer`] – [`SafetyLayer`][safety_layer::SafetyLayer]:
//!   the single interception point combining the three checks above.
//! - [`config`] – [`SafetyConfig`][config::SafetyConfig]: limits, interval,
//!   timeout and risk threshold, loadable from TOML.
//! - [`clock`] – [`MonotonicClock`][clock::MonotonicClock]: produces the
//!   `now` offsets every call expects.
//!
//! # Example
//!
//! ```
//! use biocraft_safety::{MonotonicClock, SafetyConfig, SafetyLayer};
//! use biocraft_types::{Admission, RiskLevel, Vec3};
//!
//! let clock = MonotonicClock::new();
//! let layer = SafetyLayer::new(SafetyConfig::default()).unwrap();
//!
//! let admission = layer
//!     .allow_command(
//!         Vec3::new(10.0, -200.0, -50.0),
//!         Vec3::new(0.0, 0.0, 45.0),
//!         clock.now(),
//!         RiskLevel::Critical,
//!     )
//!     .unwrap();
//!
//! let Admission::PendingConfirmation { handle } = admission else {
//!     panic!("critical commands wait for the operator");
//! };
//! let confirmed = layer.confirm(&handle, clock.now()).unwrap();
//! assert!(confirmed.is_accepted());
//! ```

pub mod clock;
pub mod config;
pub mod confirmation_gate;
pub mod range_validator;
pub mod rate_limiter;
pub mod safety_layer;

pub use clock::MonotonicClock;
pub use config::SafetyConfig;
pub use confirmation_gate::{ConfirmationGate, GateDecision};
pub use range_validator::RangeValidator;
pub use rate_limiter::RateLimiter;
pub use safety_layer::{OperatorDecision, SafetyLayer};
