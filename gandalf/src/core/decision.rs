//! Risk-to-action mapping.

use crate::core::types::{Action, Decision, ReviewVerdict, RiskLevel};

pub fn action_for(risk: RiskLevel) -> Action {
    match risk {
        RiskLevel::Low => Action::Allow,
        RiskLevel::Medium => Action::Warn,
        RiskLevel::High => Action::Block,
    }
}

/// Turn a validated verdict into the final gate decision.
pub fn decide(verdict: ReviewVerdict) -> Decision {
    Decision {
        action: action_for(verdict.risk),
        risk: verdict.risk,
        summary: verdict.summary,
        issues: verdict.issues,
    }
}
