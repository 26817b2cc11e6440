use std::time::Duration;

use swipematch::services::accounts::{login, signup};
use swipematch::services::chat::{self, OutgoingMessage};
use swipematch::services::match_engine::compatibility_score;
use swipematch::services::notifications::MessageWatcher;
use swipematch::services::swiping::{SwipeController, match_list};
use swipematch::models::user_profile::NewProfile;
use swipematch::{AppConfig, AppError, AppState};

const DEMO_EMAIL: &str = "demo@swipematch.local";

fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = AppConfig::from_env();
    let reply_wait = config.reply_delay_max + Duration::from_millis(250);
    let state = AppState::initialize(config).await?;

    let me = match login(&state, DEMO_EMAIL).await {
        Ok(user) => user,
        Err(AppError::NotFound(_)) => {
            signup(
                &state,
                NewProfile {
                    email: DEMO_EMAIL.to_string(),
                    name: "Demo".to_string(),
                    age: 28,
                    bio: "Just here to see how the swiping works.".to_string(),
                    interests: vec!["Travel".to_string(), "Music".to_string()],
                    image_url: "https://example.com/demo.jpg".to_string(),
                },
            )
            .await?
        }
        Err(e) => return Err(e.into()),
    };
    tracing::info!("Signed in as {} ({})", me.name, me.id);

    let swipes = SwipeController::open(state.clone()).await?;
    let mut liked = 0;
    while let Some(candidate) = swipes.current_candidate().await {
        let score = compatibility_score(&me, &candidate);
        if score >= 45 || liked == 0 {
            if let Some(outcome) = swipes.like().await? {
                liked += 1;
                tracing::info!(
                    "Liked {} ({}% compatible), match: {}",
                    candidate.name,
                    score,
                    outcome.is_match
                );
                swipes.dismiss_match().await;
            }
        } else {
            swipes.pass().await?;
            tracing::info!("Passed on {} ({}% compatible)", candidate.name, score);
        }
    }
    tracing::info!("No one new around you");

    let matches = match_list(&state).await?;
    for profile in &matches {
        tracing::info!("Match: {} ({})", profile.name, profile.id);
    }

    let mut watcher = MessageWatcher::new();
    watcher.observe(
        &state.conversations.load_all().await,
        &me,
        &state.profiles.load_all().await,
        None,
    );

    if let Some(partner) = matches.first() {
        chat::open_conversation(&state, partner.id, None).await?;
        chat::send_message(
            &state,
            partner.id,
            OutgoingMessage::text(format!("Hi {}! How is your week going?", partner.name)),
        )
        .await?;

        tokio::time::sleep(reply_wait).await;

        let notices = watcher.observe(
            &state.conversations.load_all().await,
            &me,
            &state.profiles.load_all().await,
            None,
        );
        for notice in notices {
            tracing::info!("{}: {}", notice.title, notice.body);
        }

        for preview in chat::conversation_previews(&state).await? {
            tracing::info!(
                "{} has {} unread message(s)",
                preview.name,
                preview.unread_count
            );
        }
    }

    state.replies.cancel_all().await;
    Ok(())
}
