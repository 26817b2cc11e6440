use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::utils::helpers::next_id;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: i64,
    pub email: String,
    pub name: String,
    pub age: u32,
    pub bio: String,
    pub interests: Vec<String>,
    pub image_url: String,
    #[serde(default)]
    pub view_count: u64,
    #[serde(default)]
    pub likes: Vec<i64>,
    #[serde(default)]
    pub dislikes: Vec<i64>,
    #[serde(default)]
    pub matches: Vec<i64>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub match_timestamps: BTreeMap<i64, String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub private_photos: Vec<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub unlocked_photos: BTreeMap<i64, Vec<String>>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub photo_requests: BTreeMap<i64, Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProfile {
    pub email: String,
    pub name: String,
    pub age: u32,
    pub bio: String,
    pub interests: Vec<String>,
    pub image_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    pub name: String,
    pub age: u32,
    pub bio: String,
    pub interests: Vec<String>,
    pub image_url: String,
    pub private_photos: Option<Vec<String>>,
}

impl UserProfile {
    pub fn new(profile: NewProfile) -> Self {
        Self {
            id: next_id(),
            email: profile.email,
            name: profile.name,
            age: profile.age,
            bio: profile.bio,
            interests: profile.interests,
            image_url: profile.image_url,
            view_count: 0,
            likes: Vec::new(),
            dislikes: Vec::new(),
            matches: Vec::new(),
            match_timestamps: BTreeMap::new(),
            private_photos: Vec::new(),
            unlocked_photos: BTreeMap::new(),
            photo_requests: BTreeMap::new(),
        }
    }

    pub fn apply_update(&mut self, update: ProfileUpdate) {
        self.name = update.name;
        self.age = update.age;
        self.bio = update.bio;
        self.interests = update.interests;
        self.image_url = update.image_url;
        if let Some(photos) = update.private_photos {
            self.private_photos = photos;
        }
    }

    pub fn likes_profile(&self, id: i64) -> bool {
        self.likes.contains(&id)
    }

    pub fn has_disliked(&self, id: i64) -> bool {
        self.dislikes.contains(&id)
    }

    pub fn is_matched_with(&self, id: i64) -> bool {
        self.matches.contains(&id)
    }

    pub fn has_decided(&self, id: i64) -> bool {
        self.likes_profile(id) || self.has_disliked(id)
    }

    pub fn add_like(&mut self, id: i64) {
        insert_unique(&mut self.likes, self.id, id);
    }

    pub fn add_dislike(&mut self, id: i64) {
        insert_unique(&mut self.dislikes, self.id, id);
    }

    pub fn add_match(&mut self, id: i64, matched_at: &str) {
        if id == self.id {
            return;
        }
        insert_unique(&mut self.matches, self.id, id);
        self.match_timestamps.insert(id, matched_at.to_string());
    }

    pub fn remove_like(&mut self, id: i64) {
        self.likes.retain(|&x| x != id);
    }

    pub fn remove_match(&mut self, id: i64) {
        self.matches.retain(|&x| x != id);
        self.match_timestamps.remove(&id);
    }

    pub fn match_timestamp(&self, id: i64) -> &str {
        self.match_timestamps
            .get(&id)
            .map(String::as_str)
            .unwrap_or("")
    }
}

fn insert_unique(set: &mut Vec<i64>, own_id: i64, id: i64) {
    if id != own_id && !set.contains(&id) {
        set.push(id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(id: i64) -> UserProfile {
        UserProfile {
            id,
            ..UserProfile::new(NewProfile {
                email: format!("user{}@example.com", id),
                name: format!("User {}", id),
                age: 30,
                bio: "Just here for the conversation.".to_string(),
                interests: vec!["Hiking".to_string()],
                image_url: "img".to_string(),
            })
        }
    }

    #[test]
    fn test_sets_reject_duplicates_and_self() {
        let mut user = profile(1);
        user.add_like(2);
        user.add_like(2);
        user.add_like(1);
        user.add_dislike(1);
        assert_eq!(user.likes, vec![2]);
        assert!(user.dislikes.is_empty());
    }

    #[test]
    fn test_remove_match_drops_timestamp() {
        let mut user = profile(1);
        user.add_match(2, "2024-01-01T00:00:00.000Z");
        assert_eq!(user.match_timestamp(2), "2024-01-01T00:00:00.000Z");
        user.remove_match(2);
        assert!(user.matches.is_empty());
        assert_eq!(user.match_timestamp(2), "");
    }

    #[test]
    fn test_serializes_camel_case_with_integer_keys() {
        let mut user = profile(7);
        user.add_match(1001, "2024-01-01T00:00:00.000Z");
        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["imageUrl"], "img");
        assert_eq!(json["matchTimestamps"]["1001"], "2024-01-01T00:00:00.000Z");

        let back: UserProfile = serde_json::from_value(json).unwrap();
        assert_eq!(back, user);
    }

    #[test]
    fn test_deserializes_minimal_record() {
        let json = r#"{"id":5,"email":"e@x.io","name":"E","age":22,"bio":"b",
            "interests":["Art"],"imageUrl":"u","likes":[],"dislikes":[],"matches":[]}"#;
        let user: UserProfile = serde_json::from_str(json).unwrap();
        assert_eq!(user.view_count, 0);
        assert!(user.match_timestamps.is_empty());
        assert!(user.unlocked_photos.is_empty());
    }
}
