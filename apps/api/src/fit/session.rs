//! Per-attempt apply flow state machine.
//!
//! The flow is an explicit session value passed through the orchestration
//! call chain — no ambient globals. One attempt runs at a time per session
//! (busy-flag semantics); illegal transitions return a typed error.
//!
//! `Idle → FitScoring → (SkipWarning ⇄ confirm) → Personalizing →
//!  LetterGeneration → ReadyToSubmit`, any failure → `Failed`,
//! cancellation → `Idle`.

use serde::Serialize;
use thiserror::Error;

use super::SkipDecision;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplyPhase {
    Idle,
    FitScoring,
    SkipWarning,
    Personalizing,
    LetterGeneration,
    ReadyToSubmit,
    Failed,
}

#[derive(Debug, Error)]
pub enum TransitionError {
    #[error("an apply attempt is already in progress")]
    Busy,

    #[error("invalid transition from {from:?}")]
    Invalid { from: ApplyPhase },
}

#[derive(Debug, Clone)]
pub struct ApplySession {
    phase: ApplyPhase,
    skip_reason: Option<String>,
    failure: Option<String>,
}

impl Default for ApplySession {
    fn default() -> Self {
        Self::new()
    }
}

impl ApplySession {
    pub fn new() -> Self {
        Self {
            phase: ApplyPhase::Idle,
            skip_reason: None,
            failure: None,
        }
    }

    pub fn phase(&self) -> &ApplyPhase {
        &self.phase
    }

    pub fn skip_reason(&self) -> Option<&str> {
        self.skip_reason.as_deref()
    }

    pub fn failure(&self) -> Option<&str> {
        self.failure.as_deref()
    }

    pub fn is_busy(&self) -> bool {
        !matches!(
            self.phase,
            ApplyPhase::Idle | ApplyPhase::ReadyToSubmit | ApplyPhase::Failed
        )
    }

    /// Starts a new attempt. Only legal from `Idle`.
    pub fn begin(&mut self) -> Result<(), TransitionError> {
        match self.phase {
            ApplyPhase::Idle => {
                self.skip_reason = None;
                self.failure = None;
                self.phase = ApplyPhase::FitScoring;
                Ok(())
            }
            _ if self.is_busy() => Err(TransitionError::Busy),
            _ => Err(TransitionError::Invalid {
                from: self.phase.clone(),
            }),
        }
    }

    /// Applies the skip decision after fit scoring: a skip pauses at
    /// `SkipWarning` awaiting user confirmation, otherwise the flow moves
    /// straight to `Personalizing`.
    pub fn fit_scored(&mut self, decision: &SkipDecision) -> Result<(), TransitionError> {
        if self.phase != ApplyPhase::FitScoring {
            return Err(TransitionError::Invalid {
                from: self.phase.clone(),
            });
        }
        if decision.skip {
            self.skip_reason = decision.reason.clone();
            self.phase = ApplyPhase::SkipWarning;
        } else {
            self.phase = ApplyPhase::Personalizing;
        }
        Ok(())
    }

    /// User-initiated "proceed anyway" from the skip warning.
    pub fn confirm_proceed(&mut self) -> Result<(), TransitionError> {
        if self.phase != ApplyPhase::SkipWarning {
            return Err(TransitionError::Invalid {
                from: self.phase.clone(),
            });
        }
        self.phase = ApplyPhase::Personalizing;
        Ok(())
    }

    pub fn resume_ready(&mut self) -> Result<(), TransitionError> {
        if self.phase != ApplyPhase::Personalizing {
            return Err(TransitionError::Invalid {
                from: self.phase.clone(),
            });
        }
        self.phase = ApplyPhase::LetterGeneration;
        Ok(())
    }

    pub fn letter_ready(&mut self) -> Result<(), TransitionError> {
        if self.phase != ApplyPhase::LetterGeneration {
            return Err(TransitionError::Invalid {
                from: self.phase.clone(),
            });
        }
        self.phase = ApplyPhase::ReadyToSubmit;
        Ok(())
    }

    /// Any failure in any active phase terminates the attempt; the
    /// triggering error is kept verbatim for the caller.
    pub fn fail(&mut self, error: impl Into<String>) {
        self.failure = Some(error.into());
        self.phase = ApplyPhase::Failed;
    }

    /// User cancellation terminates the attempt back at `Idle`.
    pub fn cancel(&mut self) {
        self.phase = ApplyPhase::Idle;
        self.skip_reason = None;
        self.failure = None;
    }
}
