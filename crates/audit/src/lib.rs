//! Audit path: re-validate existing (ticket → intent) assignments.
//!
//! A cascade of three tiers, cheapest and most precise first: ordered regex
//! rules, embedding similarity, fuzzy label similarity. Each tier feeds a
//! pure classification decision table; every non-CORRECT finding carries a
//! concrete proposed fix. Intents no tier can match become promotion
//! candidates.

pub mod decision;
pub mod labels;
pub mod matcher;
pub mod promotion;
pub mod report;
pub mod rules;

pub use decision::{classify, DecisionInput};
pub use matcher::{audit_assignments, AssignedIntent, AuditFinding};
pub use promotion::{rank_candidates, PromotionAction, PromotionCandidate};
pub use report::{AuditReport, AuditSummary};
pub use rules::RuleTable;
