//! [`SafetyLayer`] – single admission point between command sources and the
//! actuator.
//!
//! Every proposed motion passes through [`SafetyLayer::allow_command`], which
//! runs these checks in order and stops at the first failure:
//!
//! 1. **Translation range** ([`RangeValidator`], millimeters) →
//!    [`CraftError::OutOfRange`].
//! 2. **Rotation range** ([`RangeValidator`], degrees) →
//!    [`CraftError::OutOfRange`].
//! 3. **Rate limit** ([`RateLimiter`]) → [`CraftError::RateLimited`].
//! 4. **Human confirmation** ([`ConfirmationGate`]): low-risk commands are
//!    [`Admission::Accepted`]; risky ones come back as
//!    [`Admission::PendingConfirmation`] and are settled later through
//!    [`SafetyLayer::confirm`], [`SafetyLayer::deny`] or
//!    [`SafetyLayer::poll`].
//!
//! Only `Accepted` may be forwarded to the actuator.  Rejections are final
//! for that submission; resubmitting is the caller's decision.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use biocraft_safety::{SafetyConfig, SafetyLayer};
//! use biocraft_types::{Admission, CraftError, RiskLevel, Vec3};
//!
//! let layer = SafetyLayer::new(SafetyConfig::default()).unwrap();
//! let translation = Vec3::new(10.0, -200.0, -50.0);
//! let rotation = Vec3::new(0.0, 0.0, 45.0);
//!
//! let first = layer.allow_command(translation, rotation, Duration::ZERO, RiskLevel::Low);
//! assert!(matches!(first, Ok(Admission::Accepted { .. })));
//!
//! let later = Duration::from_millis(1);
//! let second = layer.allow_command(translation, rotation, later, RiskLevel::Low);
//! assert!(matches!(second, Err(CraftError::RateLimited { .. })));
//! ```

use std::time::Duration;

use biocraft_types::{
    Admission, ConfirmationHandle, CraftError, Quantity, RiskLevel, UnconfirmedReason, Vec3,
};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::config::SafetyConfig;
use crate::confirmation_gate::{ConfirmationGate, GateDecision};
use crate::range_validator::RangeValidator;
use crate::rate_limiter::RateLimiter;

/// An operator's answer to a pending confirmation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatorDecision {
    Confirm,
    Deny,
}

/// Range → rate → confirmation pipeline for motion commands.
///
/// Construct once at start-up and share behind an `Arc`; every method takes
/// `&self`.
#[derive(Debug)]
pub struct SafetyLayer {
    config: SafetyConfig,
    translation: RangeValidator,
    rotation: RangeValidator,
    rate_limiter: RateLimiter,
    confirmation: ConfirmationGate,
}

impl SafetyLayer {
    /// Build the pipeline from a validated configuration.
    ///
    /// # Errors
    ///
    /// [`CraftError::InvalidConfig`] when `config` fails
    /// [`SafetyConfig::validate`].
    pub fn new(config: SafetyConfig) -> Result<Self, CraftError> {
        config.validate()?;
        Ok(Self {
            translation: RangeValidator::new(Quantity::Translation, config.translational_limits_mm),
            rotation: RangeValidator::new(Quantity::Rotation, config.rotational_limits_deg),
            rate_limiter: RateLimiter::new(config.rate_interval),
            confirmation: ConfirmationGate::new(config.risk_threshold, config.confirmation_timeout),
            config,
        })
    }

    pub fn config(&self) -> &SafetyConfig {
        &self.config
    }

    pub fn rate_limiter(&self) -> &RateLimiter {
        &self.rate_limiter
    }

    pub fn confirmation_gate(&self) -> &ConfirmationGate {
        &self.confirmation
    }

    /// Decide whether a command may reach the actuator.
    ///
    /// `translation` is in millimeters and `rotation_euler_deg` is
    /// `(roll, pitch, yaw)` in degrees.  `now` must come from the same
    /// timeline for every call on this layer.
    ///
    /// # Errors
    ///
    /// - [`CraftError::OutOfRange`] – a translation or rotation limit was
    ///   violated.
    /// - [`CraftError::RateLimited`] – too soon after the last accepted
    ///   command.
    #[instrument(level = "debug", skip(self))]
    pub fn allow_command(
        &self,
        translation: Vec3,
        rotation_euler_deg: Vec3,
        now: Duration,
        risk: RiskLevel,
    ) -> Result<Admission, CraftError> {
        let outcome = self.admit(translation, rotation_euler_deg, now, risk);
        match &outcome {
            Ok(Admission::Accepted { command_id }) => {
                info!(%command_id, %risk, "command accepted");
            }
            Ok(Admission::PendingConfirmation { handle }) => {
                info!(
                    command_id = %handle.command_id,
                    %risk,
                    deadline = ?handle.deadline,
                    "command pending confirmation"
                );
            }
            Err(e) => warn!(error = %e, "command rejected"),
        }
        outcome
    }

    fn admit(
        &self,
        translation: Vec3,
        rotation_euler_deg: Vec3,
        now: Duration,
        risk: RiskLevel,
    ) -> Result<Admission, CraftError> {
        self.translation.validate(translation)?;
        self.rotation.validate(rotation_euler_deg)?;
        self.rate_limiter.allow(now)?;

        let command_id = Uuid::new_v4();
        Ok(match self.confirmation.request(command_id, risk, now) {
            GateDecision::AutoApproved => Admission::Accepted { command_id },
            GateDecision::Pending(handle) => Admission::PendingConfirmation { handle },
        })
    }

    /// Settle a pending command with the operator's `decision`.
    ///
    /// Returns the command's final outcome: `Ok(Accepted)` when confirmed,
    /// `Err(Unconfirmed { reason: Denied })` when denied.
    ///
    /// # Errors
    ///
    /// [`CraftError::UnknownOrExpiredConfirmation`] if the handle is not
    /// pending or its deadline has passed.
    pub fn resolve(
        &self,
        handle: &ConfirmationHandle,
        decision: OperatorDecision,
        now: Duration,
    ) -> Result<Admission, CraftError> {
        let command_id = handle.command_id;
        match decision {
            OperatorDecision::Confirm => {
                self.confirmation.confirm(command_id, now)?;
                Ok(Admission::Accepted { command_id })
            }
            OperatorDecision::Deny => {
                self.confirmation.deny(command_id, now)?;
                Err(CraftError::Unconfirmed {
                    command_id,
                    reason: UnconfirmedReason::Denied,
                })
            }
        }
    }

    /// Shorthand for [`resolve`](Self::resolve) with [`OperatorDecision::Confirm`].
    pub fn confirm(
        &self,
        handle: &ConfirmationHandle,
        now: Duration,
    ) -> Result<Admission, CraftError> {
        self.resolve(handle, OperatorDecision::Confirm, now)
    }

    /// Shorthand for [`resolve`](Self::resolve) with [`OperatorDecision::Deny`].
    pub fn deny(
        &self,
        handle: &ConfirmationHandle,
        now: Duration,
    ) -> Result<Admission, CraftError> {
        self.resolve(handle, OperatorDecision::Deny, now)
    }

    /// Current state of a pending command.
    ///
    /// `Ok(PendingConfirmation)` while the operator may still answer.
    ///
    /// # Errors
    ///
    /// - [`CraftError::Unconfirmed`] (`TimedOut`) once `handle.deadline`
    ///   passes, including after the entry has been swept.
    /// - [`CraftError::UnknownOrExpiredConfirmation`] if resolved before its
    ///   deadline.
    pub fn poll(
        &self,
        handle: &ConfirmationHandle,
        now: Duration,
    ) -> Result<Admission, CraftError> {
        match self.confirmation.poll(handle.command_id, now) {
            Ok(live) => Ok(Admission::PendingConfirmation { handle: live }),
            Err(CraftError::UnknownOrExpiredConfirmation(command_id))
                if now >= handle.deadline =>
            {
                Err(CraftError::Unconfirmed {
                    command_id,
                    reason: UnconfirmedReason::TimedOut,
                })
            }
            Err(e) => Err(e),
        }
    }

    /// Deny every pending command whose deadline has passed.
    pub fn expire_overdue(&self, now: Duration) -> Vec<Uuid> {
        self.confirmation.expire_overdue(now)
    }
}
