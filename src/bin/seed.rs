use clap::Parser;
use fake::{
    faker::{lorem::en::{Paragraph, Sentence}, name::en::Name},
    Fake,
};
use noticeboard::domain::{
    Announcement, AnnouncementStatus, Comment, CreateAnnouncementRequest, CreateCommentRequest,
    CreateReactionRequest, ReactionType, UpdateAnnouncementStatusRequest,
};
use uuid::Uuid;

/// Fill a running noticeboard server with sample announcements.
#[derive(Debug, Parser)]
#[command(name = "seed", version)]
struct Args {
    /// Base URL of the server
    #[arg(long, default_value = "http://localhost:4000")]
    url: String,

    /// Number of announcements to create
    #[arg(long, default_value_t = 5)]
    announcements: usize,

    /// Comments per announcement
    #[arg(long, default_value_t = 12)]
    comments: usize,

    /// Distinct users reacting to each announcement
    #[arg(long, default_value_t = 4)]
    users: usize,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let client = reqwest::Client::new();
    let base = args.url.trim_end_matches('/');

    println!("🌱 Seeding {} ...", base);

    let reaction_types = [ReactionType::Up, ReactionType::Down, ReactionType::Heart];

    for n in 0..args.announcements {
        let title: String = Sentence(3..7).fake();
        let request = CreateAnnouncementRequest {
            title: title.trim_end_matches('.').to_string(),
            description: Some(Paragraph(1..3).fake()),
        };

        let announcement: Announcement = client
            .post(format!("{}/announcements", base))
            .json(&request)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        println!("  📌 {}", announcement.title);

        for _ in 0..args.comments {
            let comment = CreateCommentRequest {
                author_name: Name().fake(),
                text: Sentence(4..16).fake(),
            };
            let _: Comment = client
                .post(format!("{}/announcements/{}/comments", base, announcement.id))
                .json(&comment)
                .send()
                .await?
                .error_for_status()?
                .json()
                .await?;
        }

        for user in 0..args.users {
            let reaction = CreateReactionRequest {
                reaction_type: reaction_types[(n + user) % reaction_types.len()],
            };
            client
                .post(format!("{}/announcements/{}/reactions", base, announcement.id))
                .header("x-user-id", format!("seed-user-{}", user))
                .header("idempotency-key", Uuid::new_v4().to_string())
                .json(&reaction)
                .send()
                .await?
                .error_for_status()?;
        }

        // Close every third one so both states show up
        if n % 3 == 2 {
            client
                .patch(format!("{}/announcements/{}", base, announcement.id))
                .json(&UpdateAnnouncementStatusRequest { status: AnnouncementStatus::Closed })
                .send()
                .await?
                .error_for_status()?;
        }
    }

    println!(
        "✅ Created {} announcements with {} comments and {} reactions each",
        args.announcements, args.comments, args.users
    );

    Ok(())
}
