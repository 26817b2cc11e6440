use crate::models::user_profile::{NewProfile, ProfileUpdate, UserProfile};
use crate::repository::profiles::replace_records;
use crate::services::seed::ensure_seeded;
use crate::state::AppState;
use crate::utils::error::{AppError, AppResult};
use crate::utils::validation::{validate_new_profile, validate_profile_update};

pub async fn signup(state: &AppState, profile: NewProfile) -> AppResult<UserProfile> {
    validate_new_profile(&profile)?;

    let _guard = state.write_lock.lock().await;
    let mut all = state.profiles.load_all().await;

    if all.iter().any(|p| p.email == profile.email) {
        return Err(AppError::DuplicateEmail(profile.email));
    }

    let user = UserProfile::new(profile);
    all.push(user.clone());
    persist_current(state, &all, &user).await?;

    tracing::info!("Profile {} created for {}", user.id, user.email);
    Ok(user)
}

pub async fn login(state: &AppState, email: &str) -> AppResult<UserProfile> {
    let email = email.trim();
    if email.is_empty() {
        return Err(AppError::Validation("Please enter your email.".to_string()));
    }

    let user = state.profiles.find_by_email(email).await.ok_or_else(|| {
        AppError::NotFound("No profile found with that email. Maybe you should sign up?".to_string())
    })?;

    state.session.save_current(&user).await?;
    tracing::info!("Profile {} signed in", user.id);

    Ok(user)
}

pub async fn logout(state: &AppState) -> AppResult<()> {
    state.replies.cancel_all().await;
    state.session.clear_current().await?;
    Ok(())
}

pub async fn current_user(state: &AppState) -> AppResult<UserProfile> {
    let session_user = state
        .session
        .load_current()
        .await
        .ok_or(AppError::NotSignedIn)?;

    Ok(state
        .profiles
        .find_by_id(session_user.id)
        .await
        .unwrap_or(session_user))
}

pub async fn update_profile(state: &AppState, update: ProfileUpdate) -> AppResult<UserProfile> {
    validate_profile_update(&update)?;

    let _guard = state.write_lock.lock().await;
    let current = current_user(state).await?;
    let all = state.profiles.load_all().await;

    let mut updated = all
        .iter()
        .find(|p| p.id == current.id)
        .cloned()
        .ok_or(AppError::ProfileNotFound(current.id))?;
    updated.apply_update(update);

    let all = replace_records(all, &[&updated]);
    persist_current(state, &all, &updated).await?;

    tracing::info!("Profile {} updated", updated.id);
    Ok(updated)
}

pub async fn reset_all_data(state: &AppState) -> AppResult<()> {
    state.replies.cancel_all().await;

    let _guard = state.write_lock.lock().await;
    state.profiles.clear().await?;
    state.conversations.clear().await?;
    state.session.clear_current().await?;
    tracing::info!("All stored data cleared");

    ensure_seeded(state.profiles.as_ref()).await?;
    Ok(())
}

// Writes the collection, then the session user. A failed session write puts
// the previous collection back so neither blob is left half-updated. Callers
// hold `write_lock`.
pub(crate) async fn persist_current(
    state: &AppState,
    all: &[UserProfile],
    user: &UserProfile,
) -> AppResult<()> {
    let previous = state.profiles.load_all().await;
    state.profiles.save_all(all).await?;

    if let Err(e) = state.session.save_current(user).await {
        tracing::error!("Failed to store session for profile {}: {}", user.id, e);
        if let Err(restore) = state.profiles.save_all(&previous).await {
            tracing::error!("Failed to restore profile collection: {}", restore);
        }
        return Err(e.into());
    }

    Ok(())
}
