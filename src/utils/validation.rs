use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::user_profile::{NewProfile, ProfileUpdate};
use crate::utils::error::{AppError, AppResult};

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\S+@\S+\.\S+$").expect("valid regex"));

pub const MIN_AGE: u32 = 18;
pub const MIN_BIO_LENGTH: usize = 20;

pub fn validate_email(email: &str) -> AppResult<()> {
    if email.trim().is_empty() || !EMAIL_RE.is_match(email) {
        return Err(AppError::Validation("A valid email is required.".to_string()));
    }

    Ok(())
}

pub fn validate_name(name: &str) -> AppResult<()> {
    if name.trim().is_empty() {
        return Err(AppError::Validation("Your name is required.".to_string()));
    }

    Ok(())
}

pub fn validate_age(age: u32) -> AppResult<()> {
    if age < MIN_AGE {
        return Err(AppError::Validation("You must be at least 18.".to_string()));
    }

    Ok(())
}

pub fn validate_bio(bio: &str) -> AppResult<()> {
    if bio.trim().is_empty() {
        return Err(AppError::Validation("A bio is required.".to_string()));
    }

    if bio.trim().chars().count() < MIN_BIO_LENGTH {
        return Err(AppError::Validation(
            "Bio must be at least 20 characters.".to_string(),
        ));
    }

    Ok(())
}

pub fn validate_interests(interests: &[String]) -> AppResult<()> {
    if interests.iter().all(|i| i.trim().is_empty()) {
        return Err(AppError::Validation(
            "Add at least one interest.".to_string(),
        ));
    }

    Ok(())
}

pub fn validate_image(image_url: &str) -> AppResult<()> {
    if image_url.trim().is_empty() {
        return Err(AppError::Validation(
            "A profile picture is required.".to_string(),
        ));
    }

    Ok(())
}

pub fn validate_new_profile(profile: &NewProfile) -> AppResult<()> {
    validate_email(&profile.email)?;
    validate_name(&profile.name)?;
    validate_age(profile.age)?;
    validate_bio(&profile.bio)?;
    validate_interests(&profile.interests)?;
    validate_image(&profile.image_url)?;
    Ok(())
}

pub fn validate_profile_update(update: &ProfileUpdate) -> AppResult<()> {
    let complete = !update.name.trim().is_empty()
        && update.age > 0
        && !update.bio.trim().is_empty()
        && !update.interests.is_empty()
        && !update.image_url.trim().is_empty();

    if !complete {
        return Err(AppError::Validation("All fields must be filled.".to_string()));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_profile() -> NewProfile {
        NewProfile {
            email: "sam@example.com".to_string(),
            name: "Sam".to_string(),
            age: 30,
            bio: "Amateur baker and weekend climber.".to_string(),
            interests: vec!["Baking".to_string()],
            image_url: "data:image/jpeg;base64,AAAA".to_string(),
        }
    }

    #[test]
    fn test_valid_profile_passes() {
        assert!(validate_new_profile(&valid_profile()).is_ok());
    }

    #[test]
    fn test_email_rules() {
        assert!(validate_email("a@b.co").is_ok());
        assert!(validate_email("").is_err());
        assert!(validate_email("no-at-sign.com").is_err());
        assert!(validate_email("a b@c.d").is_err());
    }

    #[test]
    fn test_underage_rejected() {
        let mut profile = valid_profile();
        profile.age = 17;
        assert!(matches!(
            validate_new_profile(&profile),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_short_bio_rejected() {
        let mut profile = valid_profile();
        profile.bio = "too short".to_string();
        assert!(validate_new_profile(&profile).is_err());
    }

    #[test]
    fn test_missing_interests_and_image_rejected() {
        let mut profile = valid_profile();
        profile.interests.clear();
        assert!(validate_new_profile(&profile).is_err());

        let mut profile = valid_profile();
        profile.image_url = String::new();
        assert!(validate_new_profile(&profile).is_err());
    }

    #[test]
    fn test_update_requires_all_fields() {
        let update = ProfileUpdate {
            name: "Sam".to_string(),
            age: 30,
            bio: "short".to_string(),
            interests: vec!["Baking".to_string()],
            image_url: "img".to_string(),
            private_photos: None,
        };
        assert!(validate_profile_update(&update).is_ok());

        let incomplete = ProfileUpdate {
            name: " ".to_string(),
            ..update
        };
        assert!(validate_profile_update(&incomplete).is_err());
    }
}
