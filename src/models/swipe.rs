use serde::Serialize;

use super::user_profile::UserProfile;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SwipeState {
    Browsing,
    Matching { matched: UserProfile },
    MatchPresented { matched: UserProfile },
}

#[derive(Debug, Clone)]
pub struct SwipeSession {
    queue: Vec<UserProfile>,
    index: usize,
    state: SwipeState,
}

impl SwipeSession {
    pub fn new(queue: Vec<UserProfile>) -> Self {
        Self {
            queue,
            index: 0,
            state: SwipeState::Browsing,
        }
    }

    pub fn state(&self) -> &SwipeState {
        &self.state
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn queue(&self) -> &[UserProfile] {
        &self.queue
    }

    pub fn current_candidate(&self) -> Option<&UserProfile> {
        self.queue.get(self.index)
    }

    pub fn is_exhausted(&self) -> bool {
        self.index >= self.queue.len()
    }

    pub fn is_browsing(&self) -> bool {
        matches!(self.state, SwipeState::Browsing)
    }

    pub fn advance(&mut self) {
        if !self.is_exhausted() {
            self.index += 1;
        }
    }

    pub fn record_like(&mut self, is_match: bool, matched: UserProfile) {
        if !self.is_browsing() {
            return;
        }
        if is_match {
            self.state = SwipeState::Matching { matched };
        } else {
            self.advance();
        }
    }

    pub fn record_pass(&mut self) {
        if self.is_browsing() {
            self.advance();
        }
    }

    pub fn finish_presentation(&mut self) {
        if let SwipeState::Matching { matched } = &self.state {
            self.state = SwipeState::MatchPresented {
                matched: matched.clone(),
            };
        }
    }

    pub fn dismiss_match(&mut self) -> Option<UserProfile> {
        match std::mem::replace(&mut self.state, SwipeState::Browsing) {
            SwipeState::MatchPresented { matched } => {
                self.advance();
                Some(matched)
            }
            other => {
                self.state = other;
                None
            }
        }
    }

    pub fn accept_match(&mut self) -> Option<UserProfile> {
        match std::mem::replace(&mut self.state, SwipeState::Browsing) {
            SwipeState::MatchPresented { matched } => Some(matched),
            other => {
                self.state = other;
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::seed::seed_profiles;

    #[test]
    fn test_pass_advances_until_exhausted() {
        let mut session = SwipeSession::new(seed_profiles().into_iter().take(2).collect());
        assert_eq!(session.current_candidate().map(|p| p.id), Some(1001));
        session.record_pass();
        session.record_pass();
        assert!(session.is_exhausted());
        assert!(session.current_candidate().is_none());
        session.record_pass();
        assert_eq!(session.index(), 2);
    }

    #[test]
    fn test_match_flow_through_presentation() {
        let seeds = seed_profiles();
        let mut session = SwipeSession::new(seeds.clone());
        session.record_like(true, seeds[0].clone());
        assert!(matches!(session.state(), SwipeState::Matching { .. }));

        // ignored while the animation runs
        session.record_pass();
        assert_eq!(session.index(), 0);
        assert!(session.dismiss_match().is_none());

        session.finish_presentation();
        assert!(matches!(session.state(), SwipeState::MatchPresented { .. }));
        let matched = session.dismiss_match().unwrap();
        assert_eq!(matched.id, 1001);
        assert!(session.is_browsing());
        assert_eq!(session.index(), 1);
    }

    #[test]
    fn test_accept_match_keeps_index() {
        let seeds = seed_profiles();
        let mut session = SwipeSession::new(seeds.clone());
        session.record_like(true, seeds[0].clone());
        session.finish_presentation();
        assert_eq!(session.accept_match().map(|p| p.id), Some(1001));
        assert_eq!(session.index(), 0);
        assert!(session.is_browsing());
    }

    #[test]
    fn test_empty_queue_is_terminal() {
        let session = SwipeSession::new(Vec::new());
        assert!(session.is_exhausted());
        assert!(session.is_browsing());
    }
}
