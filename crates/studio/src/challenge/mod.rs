//! Challenge mode: dataset, rule evaluation and per-attempt session state.

pub mod catalog;
pub mod rules;
pub mod session;
pub mod validator;

pub use catalog::{CategoryInfo, ChallengeCatalog};
pub use rules::ValidationRules;
pub use session::ChallengeSession;
pub use validator::check_progress;
