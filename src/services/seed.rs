use std::collections::BTreeMap;

use crate::models::user_profile::UserProfile;
use crate::repository::ProfileRepository;
use crate::utils::error::AppResult;

struct SeedProfile {
    id: i64,
    email: &'static str,
    name: &'static str,
    age: u32,
    bio: &'static str,
    interests: &'static [&'static str],
    image_url: &'static str,
    view_count: u64,
}

const SEED_PROFILES: &[SeedProfile] = &[
    SeedProfile {
        id: 1001,
        email: "jessica@example.com",
        name: "Jessica",
        age: 28,
        bio: "Lover of art, long walks on the beach, and exploring new coffee shops. My dog is my best friend. Looking for a genuine connection and someone to share adventures with.",
        interests: &["Art", "Coffee", "Hiking", "Photography", "Dogs"],
        image_url: "https://images.unsplash.com/photo-1520813792240-56fc4a3765a7?q=80&w=800&auto=format&fit=crop",
        view_count: 204,
    },
    SeedProfile {
        id: 1002,
        email: "chloe@example.com",
        name: "Chloe",
        age: 25,
        bio: "Software developer by day, gamer by night. I love a good sci-fi movie and trying new recipes. Let's build something amazing together, in code or in life.",
        interests: &["Gaming", "Sci-Fi", "Cooking", "Technology", "Cats"],
        image_url: "https://images.unsplash.com/photo-1517841905240-472988babdf9?q=80&w=800&auto=format&fit=crop",
        view_count: 351,
    },
    SeedProfile {
        id: 1003,
        email: "sofia@example.com",
        name: "Sofia",
        age: 31,
        bio: "My passport has more stamps than I can count. I'm always planning my next trip and looking for a foodie to explore the world with. Tell me the best place you've ever eaten!",
        interests: &["Travel", "Foodie", "Languages", "Yoga", "Live Music"],
        image_url: "https://images.unsplash.com/photo-1534528741775-53994a69daeb?q=80&w=800&auto=format&fit=crop",
        view_count: 188,
    },
    SeedProfile {
        id: 1004,
        email: "emma@example.com",
        name: "Emma",
        age: 23,
        bio: "Fashion student with a passion for vintage clothing and indie music. Life's too short for boring conversations! Let's grab bubble tea and talk about our dreams.",
        interests: &["Fashion", "Indie Music", "Thrifting", "Art", "Photography"],
        image_url: "https://images.unsplash.com/photo-1494790108377-be9c29b29330?q=80&w=800&auto=format&fit=crop",
        view_count: 567,
    },
    SeedProfile {
        id: 1005,
        email: "isabella@example.com",
        name: "Isabella",
        age: 29,
        bio: "Yoga instructor and wellness coach. I believe in good vibes, green smoothies, and meaningful connections. Looking for someone who can match my energy!",
        interests: &["Yoga", "Meditation", "Healthy Living", "Nature", "Spirituality"],
        image_url: "https://images.unsplash.com/photo-1544005313-94ddf0286df2?q=80&w=800&auto=format&fit=crop",
        view_count: 423,
    },
    SeedProfile {
        id: 1006,
        email: "olivia@example.com",
        name: "Olivia",
        age: 35,
        bio: "Corporate lawyer who loves a good wine and deep conversation. I work hard and play harder. Looking for someone mature who knows what they want in life.",
        interests: &["Wine", "Fine Dining", "Reading", "Running", "Jazz"],
        image_url: "https://images.unsplash.com/photo-1438761681033-6461ffad8d80?q=80&w=800&auto=format&fit=crop",
        view_count: 289,
    },
    SeedProfile {
        id: 1007,
        email: "mia@example.com",
        name: "Mia",
        age: 26,
        bio: "Graphic designer and plant mom. I spend my weekends at farmers markets and trying new restaurants. If you can make me laugh, you're already winning.",
        interests: &["Design", "Plants", "Foodie", "Podcasts", "Sustainability"],
        image_url: "https://images.unsplash.com/photo-1524504388940-b1c1722653e1?q=80&w=800&auto=format&fit=crop",
        view_count: 612,
    },
    SeedProfile {
        id: 1008,
        email: "charlotte@example.com",
        name: "Charlotte",
        age: 38,
        bio: "Successful entrepreneur and single mom. I've learned that life is precious and I don't settle for less than I deserve. Seeking someone genuine, confident, and ready for something real.",
        interests: &["Business", "Travel", "Fitness", "Wine", "Theater"],
        image_url: "https://images.unsplash.com/photo-1487412720507-e7ab37603c6f?q=80&w=800&auto=format&fit=crop",
        view_count: 195,
    },
    SeedProfile {
        id: 1009,
        email: "ava@example.com",
        name: "Ava",
        age: 24,
        bio: "Psychology student and aspiring therapist. I love deep talks, stargazing, and finding hidden gems in the city. Bonus points if you have good taste in music!",
        interests: &["Psychology", "Music Festivals", "Reading", "Astrology", "Coffee"],
        image_url: "https://images.unsplash.com/photo-1529626455594-4ff0802cfb7e?q=80&w=800&auto=format&fit=crop",
        view_count: 741,
    },
    SeedProfile {
        id: 1010,
        email: "victoria@example.com",
        name: "Victoria",
        age: 42,
        bio: "Art curator and wine enthusiast. I've lived in Paris, Rome, and now here. Life experience has taught me what matters. Looking for intelligent conversation and genuine chemistry.",
        interests: &["Art", "Wine", "Culture", "Travel", "Fine Dining"],
        image_url: "https://images.unsplash.com/photo-1531123897727-8f129e1688ce?q=80&w=800&auto=format&fit=crop",
        view_count: 156,
    },
];

pub fn seed_profiles() -> Vec<UserProfile> {
    SEED_PROFILES
        .iter()
        .map(|seed| UserProfile {
            id: seed.id,
            email: seed.email.to_string(),
            name: seed.name.to_string(),
            age: seed.age,
            bio: seed.bio.to_string(),
            interests: seed.interests.iter().map(|i| i.to_string()).collect(),
            image_url: seed.image_url.to_string(),
            view_count: seed.view_count,
            likes: Vec::new(),
            dislikes: Vec::new(),
            matches: Vec::new(),
            match_timestamps: BTreeMap::new(),
            private_photos: Vec::new(),
            unlocked_photos: BTreeMap::new(),
            photo_requests: BTreeMap::new(),
        })
        .collect()
}

pub async fn ensure_seeded(profiles: &dyn ProfileRepository) -> AppResult<bool> {
    if !profiles.load_all().await.is_empty() {
        tracing::debug!("Profile store already populated");
        return Ok(false);
    }

    tracing::info!("Seeding profile store with {} profiles", SEED_PROFILES.len());
    profiles.save_all(&seed_profiles()).await?;

    Ok(true)
}
