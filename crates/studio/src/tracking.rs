//! User progress: completed tutorials and challenges, XP, levels and badges.

use serde::{Deserialize, Serialize};
use shared::ChallengeId;

pub const CHALLENGE_XP: u64 = 100;
pub const TUTORIAL_XP: u64 = 50;
pub const XP_PER_LEVEL: u64 = 100;

/// Badge identifiers and their unlock thresholds
pub mod badges {
    pub const FIRST_STEPS: &str = "first-steps";
    pub const DEDICATED_LEARNER: &str = "dedicated-learner";
    pub const CHALLENGE_MASTER: &str = "challenge-master";
    pub const XP_COLLECTOR: &str = "xp-collector";

    pub const FIRST_STEPS_TUTORIALS: usize = 1;
    pub const DEDICATED_LEARNER_TUTORIALS: usize = 10;
    pub const CHALLENGE_MASTER_CHALLENGES: usize = 5;
    pub const XP_COLLECTOR_XP: u64 = 500;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Badge,
}

/// Message shown to the user after a tracked completion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub message: String,
    pub kind: NotificationKind,
}

impl Notification {
    fn success(message: String) -> Self {
        Self {
            message,
            kind: NotificationKind::Success,
        }
    }

    fn badge(name: &str) -> Self {
        Self {
            message: format!("Badge Unlocked: {name}!"),
            kind: NotificationKind::Badge,
        }
    }
}

/// Derived progress figures for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressStats {
    pub tutorials_completed: usize,
    pub challenges_completed: usize,
    #[serde(rename = "totalXP")]
    pub total_xp: u64,
    pub current_level: u64,
    pub xp_for_next_level: u64,
    pub level_progress: u64,
    pub badges: Vec<String>,
}

/// Progress record of one user
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProgress {
    pub user_id: String,
    pub completed_tutorials: Vec<String>,
    pub completed_challenges: Vec<ChallengeId>,
    #[serde(rename = "totalXP")]
    pub total_xp: u64,
    pub badges: Vec<String>,
}

impl UserProgress {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            ..Self::default()
        }
    }

    pub fn has_badge(&self, badge: &str) -> bool {
        self.badges.iter().any(|b| b == badge)
    }

    /// Record a completed challenge. Repeats are ignored and return no notifications.
    pub fn complete_challenge(&mut self, id: ChallengeId, name: &str) -> Vec<Notification> {
        if self.completed_challenges.contains(&id) {
            return Vec::new();
        }
        self.completed_challenges.push(id);
        self.total_xp += CHALLENGE_XP;

        let mut notifications = vec![Notification::success(format!(
            "{name} completed! +{CHALLENGE_XP} XP earned"
        ))];
        if self.completed_challenges.len() >= badges::CHALLENGE_MASTER_CHALLENGES {
            self.award(badges::CHALLENGE_MASTER, "Challenge Master", &mut notifications);
        }
        self.award_xp_badge(&mut notifications);
        tracing::info!(user = %self.user_id, challenge = id, xp = self.total_xp, "challenge tracked");
        notifications
    }

    /// Record a completed tutorial. Repeats are ignored and return no notifications.
    pub fn complete_tutorial(&mut self, id: &str, name: &str) -> Vec<Notification> {
        if self.completed_tutorials.iter().any(|t| t == id) {
            return Vec::new();
        }
        self.completed_tutorials.push(id.to_string());
        self.total_xp += TUTORIAL_XP;

        let mut notifications = vec![Notification::success(format!(
            "{name} completed! +{TUTORIAL_XP} XP earned"
        ))];
        let count = self.completed_tutorials.len();
        if count >= badges::FIRST_STEPS_TUTORIALS {
            self.award(badges::FIRST_STEPS, "First Steps", &mut notifications);
        }
        if count >= badges::DEDICATED_LEARNER_TUTORIALS {
            self.award(badges::DEDICATED_LEARNER, "Dedicated Learner", &mut notifications);
        }
        self.award_xp_badge(&mut notifications);
        tracing::info!(user = %self.user_id, tutorial = id, xp = self.total_xp, "tutorial tracked");
        notifications
    }

    pub fn stats(&self) -> ProgressStats {
        let current_level = self.total_xp / XP_PER_LEVEL + 1;
        ProgressStats {
            tutorials_completed: self.completed_tutorials.len(),
            challenges_completed: self.completed_challenges.len(),
            total_xp: self.total_xp,
            current_level,
            xp_for_next_level: current_level * XP_PER_LEVEL,
            level_progress: self.total_xp % XP_PER_LEVEL,
            badges: self.badges.clone(),
        }
    }

    fn award_xp_badge(&mut self, notifications: &mut Vec<Notification>) {
        if self.total_xp >= badges::XP_COLLECTOR_XP {
            self.award(badges::XP_COLLECTOR, "XP Collector", notifications);
        }
    }

    fn award(&mut self, badge: &str, name: &str, notifications: &mut Vec<Notification>) {
        if !self.has_badge(badge) {
            self.badges.push(badge.to_string());
            notifications.push(Notification::badge(name));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_user_stats() {
        let stats = UserProgress::new("u1").stats();
        assert_eq!(stats.current_level, 1);
        assert_eq!(stats.xp_for_next_level, 100);
        assert_eq!(stats.level_progress, 0);
        assert!(stats.badges.is_empty());
    }

    #[test]
    fn test_challenge_xp_and_duplicates() {
        let mut p = UserProgress::new("u1");
        let notes = p.complete_challenge(1, "Blue Cube");
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].message, "Blue Cube completed! +100 XP earned");
        assert_eq!(p.total_xp, 100);

        assert!(p.complete_challenge(1, "Blue Cube").is_empty());
        assert_eq!(p.total_xp, 100);
        assert_eq!(p.stats().current_level, 2);
    }

    #[test]
    fn test_challenge_master_and_xp_collector() {
        let mut p = UserProgress::new("u1");
        for id in 1..=4 {
            p.complete_challenge(id, "c");
        }
        assert!(!p.has_badge(badges::CHALLENGE_MASTER));
        let notes = p.complete_challenge(5, "c");
        assert!(p.has_badge(badges::CHALLENGE_MASTER));
        assert!(p.has_badge(badges::XP_COLLECTOR));
        assert_eq!(notes.iter().filter(|n| n.kind == NotificationKind::Badge).count(), 2);

        // badges are only awarded once
        let notes = p.complete_challenge(6, "c");
        assert_eq!(notes.len(), 1);
    }

    #[test]
    fn test_tutorial_badges() {
        let mut p = UserProgress::new("u1");
        let notes = p.complete_tutorial("intro", "Intro");
        assert!(p.has_badge(badges::FIRST_STEPS));
        assert_eq!(notes.len(), 2);
        assert_eq!(p.total_xp, 50);

        for i in 1..10 {
            p.complete_tutorial(&format!("t{i}"), "t");
        }
        assert!(p.has_badge(badges::DEDICATED_LEARNER));
        assert!(p.has_badge(badges::XP_COLLECTOR));
        assert_eq!(p.total_xp, 500);
    }

    #[test]
    fn test_level_progress() {
        let mut p = UserProgress::new("u1");
        p.complete_challenge(1, "c");
        p.complete_tutorial("t", "t");
        let stats = p.stats();
        assert_eq!(stats.total_xp, 150);
        assert_eq!(stats.current_level, 2);
        assert_eq!(stats.xp_for_next_level, 200);
        assert_eq!(stats.level_progress, 50);
    }

    #[test]
    fn test_serde_field_names() {
        let json = serde_json::to_value(UserProgress::new("u1")).unwrap();
        assert!(json.get("totalXP").is_some());
        assert!(json.get("completedChallenges").is_some());
    }
}
