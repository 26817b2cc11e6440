use itertools::Itertools;
use std::collections::HashSet;

use crate::models::user_profile::UserProfile;
use crate::repository::profiles::replace_records;
use crate::utils::helpers::now_iso;

// Seed profiles sit below this id and always like back.
pub const SEED_ID_THRESHOLD: i64 = 10_000;

const BASE_COMPATIBILITY: u32 = 30;
const COMPATIBILITY_PER_INTEREST: u32 = 15;
const MAX_COMPATIBILITY: u32 = 99;

#[derive(Debug, Clone)]
pub struct LikeOutcome {
    pub current_user: UserProfile,
    pub target: UserProfile,
    pub is_match: bool,
    pub profiles: Vec<UserProfile>,
}

pub fn is_seed_profile(id: i64) -> bool {
    id < SEED_ID_THRESHOLD
}

pub fn compute_swipe_queue(current: &UserProfile, all: &[UserProfile]) -> Vec<UserProfile> {
    all.iter()
        .filter(|p| p.id != current.id && !current.has_decided(p.id))
        .cloned()
        .collect()
}

pub fn evaluate_like(
    current: &UserProfile,
    target: &UserProfile,
    all: &[UserProfile],
) -> LikeOutcome {
    evaluate_like_at(current, target, all, &now_iso())
}

pub fn evaluate_like_at(
    current: &UserProfile,
    target: &UserProfile,
    all: &[UserProfile],
    matched_at: &str,
) -> LikeOutcome {
    if current.id == target.id {
        return LikeOutcome {
            current_user: current.clone(),
            target: target.clone(),
            is_match: false,
            profiles: all.to_vec(),
        };
    }

    let mut current_user = current.clone();
    let mut target_profile = target.clone();

    current_user.add_like(target.id);

    let already_likes_back = target.likes_profile(current.id);
    let auto_match = is_seed_profile(target.id) && !already_likes_back;
    let is_match = already_likes_back || auto_match;

    if is_match {
        if auto_match {
            target_profile.add_like(current.id);
        }
        current_user.add_match(target.id, matched_at);
        target_profile.add_match(current.id, matched_at);
        tracing::info!("Profiles {} and {} matched", current.id, target.id);
    } else {
        tracing::debug!("Profile {} liked {}", current.id, target.id);
    }

    let profiles = if is_match {
        replace_records(all.to_vec(), &[&current_user, &target_profile])
    } else {
        replace_records(all.to_vec(), &[&current_user])
    };

    LikeOutcome {
        current_user,
        target: target_profile,
        is_match,
        profiles,
    }
}

pub fn evaluate_pass(current: &UserProfile, target: &UserProfile) -> UserProfile {
    let mut updated = current.clone();
    updated.add_dislike(target.id);
    tracing::debug!("Profile {} passed on {}", current.id, target.id);
    updated
}

pub fn evaluate_block(current: &UserProfile, target: &UserProfile) -> UserProfile {
    let mut updated = current.clone();
    updated.add_dislike(target.id);
    updated.remove_like(target.id);
    updated.remove_match(target.id);
    tracing::info!("Profile {} blocked {}", current.id, target.id);
    updated
}

pub fn derive_match_list(current: &UserProfile, all: &[UserProfile]) -> Vec<UserProfile> {
    all.iter()
        .filter(|p| current.is_matched_with(p.id))
        .sorted_by(|a, b| {
            current
                .match_timestamp(b.id)
                .cmp(current.match_timestamp(a.id))
        })
        .cloned()
        .collect()
}

pub fn compatibility_score(user: &UserProfile, candidate: &UserProfile) -> u8 {
    let normalize = |interests: &[String]| -> HashSet<String> {
        interests
            .iter()
            .map(|i| i.trim().to_lowercase())
            .filter(|i| !i.is_empty())
            .collect()
    };

    let mine = normalize(&user.interests);
    let theirs = normalize(&candidate.interests);
    let common = mine.intersection(&theirs).count() as u32;

    (BASE_COMPATIBILITY + common * COMPATIBILITY_PER_INTEREST).min(MAX_COMPATIBILITY) as u8
}
