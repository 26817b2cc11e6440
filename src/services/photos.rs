use crate::models::user_profile::UserProfile;
use crate::repository::profiles::replace_records;
use crate::services::accounts::{current_user, persist_current};
use crate::state::AppState;
use crate::utils::error::{AppError, AppResult};

pub fn visible_photos(profile: &UserProfile, viewer_id: i64) -> Vec<String> {
    let extra = if profile.id == viewer_id {
        profile.private_photos.as_slice()
    } else {
        profile
            .unlocked_photos
            .get(&viewer_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    };

    std::iter::once(profile.image_url.clone())
        .chain(extra.iter().cloned())
        .collect()
}

pub fn locked_photo_count(profile: &UserProfile, viewer_id: i64) -> usize {
    if profile.id == viewer_id {
        return 0;
    }
    let unlocked = profile
        .unlocked_photos
        .get(&viewer_id)
        .map(Vec::len)
        .unwrap_or(0);
    profile.private_photos.len().saturating_sub(unlocked)
}

pub async fn request_private_photos(state: &AppState, owner_id: i64) -> AppResult<()> {
    let me = current_user(state).await?;
    if me.id == owner_id {
        return Err(AppError::Validation(
            "You can already see your own photos".to_string(),
        ));
    }

    let _guard = state.write_lock.lock().await;
    let all = state.profiles.load_all().await;
    let mut owner = all
        .iter()
        .find(|p| p.id == owner_id)
        .cloned()
        .ok_or(AppError::ProfileNotFound(owner_id))?;

    if owner.private_photos.is_empty() {
        return Err(AppError::NotFound(format!(
            "{} has no private photos",
            owner.name
        )));
    }

    owner
        .photo_requests
        .insert(me.id, owner.private_photos.clone());
    let all = replace_records(all, &[&owner]);
    state.profiles.save_all(&all).await?;

    tracing::debug!("Profile {} requested photos from {}", me.id, owner_id);
    Ok(())
}

pub async fn approve_photo_request(state: &AppState, requester_id: i64) -> AppResult<UserProfile> {
    let _guard = state.write_lock.lock().await;
    let mut me = current_user(state).await?;

    let requested = me
        .photo_requests
        .remove(&requester_id)
        .ok_or_else(|| AppError::NotFound(format!("No photo request from {}", requester_id)))?;

    let granted: Vec<String> = requested
        .into_iter()
        .filter(|url| me.private_photos.contains(url))
        .collect();
    me.unlocked_photos.insert(requester_id, granted);

    let all = replace_records(state.profiles.load_all().await, &[&me]);
    persist_current(state, &all, &me).await?;

    tracing::info!("Profile {} unlocked photos for {}", me.id, requester_id);
    Ok(me)
}

pub async fn deny_photo_request(state: &AppState, requester_id: i64) -> AppResult<UserProfile> {
    let _guard = state.write_lock.lock().await;
    let mut me = current_user(state).await?;

    if me.photo_requests.remove(&requester_id).is_none() {
        return Err(AppError::NotFound(format!(
            "No photo request from {}",
            requester_id
        )));
    }

    let all = replace_records(state.profiles.load_all().await, &[&me]);
    persist_current(state, &all, &me).await?;
    Ok(me)
}
