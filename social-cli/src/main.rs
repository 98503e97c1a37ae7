use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use social_client::error::SocialClientError;
use social_client::models::{FeedItem, LikeTarget, Page, RegisterRequest, Session};
use social_client::SocialClient;
use std::fs;
use std::path::PathBuf;
use uuid::Uuid;

const DEFAULT_SERVER: &str = "http://localhost:8000";

#[derive(Debug, Parser)]
#[command(author, version, about = "Command-line client for the social API", long_about = None)]
struct Cli {
    /// Server base URL (falls back to SOCIAL_SERVER_URL, then localhost:8000)
    #[arg(short, long)]
    server: Option<String>,

    /// Where the session tokens are kept (default: ~/.social_session.json)
    #[arg(long)]
    session_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    Register {
        #[arg(short, long)]
        fullname: String,

        #[arg(short, long)]
        email: String,

        #[arg(short, long)]
        username: String,

        #[arg(short, long)]
        password: String,

        /// Path to the avatar image
        #[arg(short, long)]
        avatar: PathBuf,

        #[arg(short, long)]
        cover_image: Option<PathBuf>,
    },

    /// Login by username or email
    Login {
        #[arg(short, long, required_unless_present = "email")]
        username: Option<String>,

        #[arg(short, long)]
        email: Option<String>,

        #[arg(short, long)]
        password: String,
    },

    Logout,

    /// Rotate the saved token pair
    Refresh,

    Whoami,

    #[command(subcommand)]
    Tweet(TweetCommand),

    #[command(subcommand)]
    Comment(CommentCommand),

    /// Like or unlike a tweet, comment or video
    Like {
        #[arg(value_enum)]
        kind: LikeKind,

        id: Uuid,
    },
}

#[derive(Debug, Subcommand)]
enum TweetCommand {
    Create {
        #[arg(short, long)]
        content: String,
    },
    /// Tweets of a user, newest first
    List {
        #[arg(short, long)]
        user_id: Uuid,

        #[arg(long)]
        page: Option<i64>,

        #[arg(short, long)]
        limit: Option<i64>,
    },
    Get {
        id: Uuid,
    },
    Update {
        id: Uuid,

        #[arg(short, long)]
        content: String,
    },
    Delete {
        id: Uuid,
    },
}

#[derive(Debug, Subcommand)]
enum CommentCommand {
    Create {
        #[arg(short, long)]
        video_id: Uuid,

        #[arg(short, long)]
        content: String,
    },
    /// Comments on a video, newest first
    List {
        #[arg(short, long)]
        video_id: Uuid,

        #[arg(long)]
        page: Option<i64>,

        #[arg(short, long)]
        limit: Option<i64>,
    },
    Get {
        id: Uuid,
    },
    Update {
        id: Uuid,

        #[arg(short, long)]
        content: String,
    },
    Delete {
        id: Uuid,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LikeKind {
    Tweet,
    Comment,
    Video,
}

impl From<LikeKind> for LikeTarget {
    fn from(kind: LikeKind) -> Self {
        match kind {
            LikeKind::Tweet => LikeTarget::Tweet,
            LikeKind::Comment => LikeTarget::Comment,
            LikeKind::Video => LikeTarget::Video,
        }
    }
}

/// Persists the access/refresh pair between invocations.
struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    fn new(custom_path: Option<PathBuf>) -> Result<Self> {
        let path = match custom_path {
            Some(path) => path,
            None => {
                let home = dirs::home_dir().context("Failed to get home directory")?;
                home.join(".social_session.json")
            }
        };

        Ok(Self { path })
    }

    fn save(&self, session: &Session) -> Result<()> {
        let json = serde_json::to_string_pretty(session)?;
        fs::write(&self.path, json)
            .with_context(|| format!("Failed to save session to {:?}", self.path))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = fs::metadata(&self.path)?.permissions();
            perms.set_mode(0o600);
            fs::set_permissions(&self.path, perms)?;
        }

        Ok(())
    }

    fn load(&self) -> Result<Option<Session>> {
        match fs::read_to_string(&self.path) {
            Ok(raw) if raw.trim().is_empty() => Ok(None),
            Ok(raw) => {
                let session = serde_json::from_str(&raw)
                    .with_context(|| format!("Session file {:?} is corrupted", self.path))?;
                Ok(Some(session))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).context("Failed to read session file"),
        }
    }

    fn clear(&self) -> Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path)
                .with_context(|| format!("Failed to remove session file {:?}", self.path))?;
        }
        Ok(())
    }
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("{} {:#}", "❌".red(), e);
        if let Some(client_err) = e.downcast_ref::<SocialClientError>() {
            if client_err.is_unauthorized() {
                eprintln!(
                    "   {}",
                    "Try `refresh`, or `login` again if the session has ended".yellow()
                );
            }
        }
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let server = cli
        .server
        .or_else(|| std::env::var("SOCIAL_SERVER_URL").ok())
        .unwrap_or_else(|| DEFAULT_SERVER.to_string());

    let client = SocialClient::new(server);
    let store = SessionStore::new(cli.session_file)?;
    if let Some(session) = store.load()? {
        client.set_session(session).await;
    }

    match cli.command {
        Commands::Register {
            fullname,
            email,
            username,
            password,
            avatar,
            cover_image,
        } => {
            println!("📝 Registering user: {}", username.bold());
            let user = client
                .register(RegisterRequest {
                    full_name: fullname,
                    email,
                    username,
                    password,
                    avatar,
                    cover_image,
                })
                .await?;

            println!("{}", "✅ Registration successful!".green());
            println!("   User ID: {}", user.id);
            println!("   Username: {}", user.username);
            println!("   Avatar: {}", user.avatar);
            println!("   Now login: social-cli login --username {} --password ...", user.username);
        }

        Commands::Login {
            username,
            email,
            password,
        } => {
            let login = client.login(username, email, password).await?;
            store.save(&login.session())?;

            println!("{}", "✅ Login successful!".green());
            println!("   User ID: {}", login.user.id);
            println!("   Username: {}", login.user.username);
            println!("   Session saved to {:?}", store.path);
        }

        Commands::Logout => {
            require_session(&client).await?;
            client.logout().await?;
            store.clear()?;
            println!("{}", "✅ Logged out".green());
        }

        Commands::Refresh => {
            require_session(&client).await?;
            let session = client.refresh().await?;
            store.save(&session)?;
            println!("{}", "✅ Session refreshed".green());
        }

        Commands::Whoami => {
            require_session(&client).await?;
            let user = client.current_user().await?;
            println!("👤 {} ({})", user.username.bold(), user.full_name);
            println!("   ID: {}", user.id);
            println!("   Email: {}", user.email);
            println!("   Member since: {}", user.created_at.format("%Y-%m-%d"));
        }

        Commands::Tweet(cmd) => run_tweet(&client, cmd).await?,
        Commands::Comment(cmd) => run_comment(&client, cmd).await?,

        Commands::Like { kind, id } => {
            require_session(&client).await?;
            let result = client.toggle_like(kind.into(), id).await?;
            if result.is_liked {
                println!("{} Liked {} {}", "❤".red(), result.target_kind.as_str(), id);
            } else {
                println!("💔 Unliked {} {}", result.target_kind.as_str(), id);
            }
        }
    }

    Ok(())
}

async fn run_tweet(client: &SocialClient, cmd: TweetCommand) -> Result<()> {
    match cmd {
        TweetCommand::Create { content } => {
            require_session(client).await?;
            let tweet = client.create_tweet(content).await?;
            println!("{}", "✅ Tweet created!".green());
            println!("   ID: {}", tweet.id);
            println!("   Content: {}", tweet.content);
        }
        TweetCommand::List {
            user_id,
            page,
            limit,
        } => {
            let feed = client.user_tweets(user_id, page, limit).await?;
            print_feed("tweets", &feed);
        }
        TweetCommand::Get { id } => {
            let tweet = client.get_tweet(id).await?;
            println!("🐦 [{}] {}", tweet.id, tweet.content);
            println!("   Owner: {}", tweet.owner_id);
            println!("   Created: {}", tweet.created_at);
            println!("   Updated: {}", tweet.updated_at);
        }
        TweetCommand::Update { id, content } => {
            require_session(client).await?;
            let tweet = client.update_tweet(id, content).await?;
            println!("{}", "✅ Tweet updated!".green());
            println!("   Content: {}", tweet.content);
        }
        TweetCommand::Delete { id } => {
            require_session(client).await?;
            client.delete_tweet(id).await?;
            println!("{}", "✅ Tweet deleted".green());
        }
    }
    Ok(())
}

async fn run_comment(client: &SocialClient, cmd: CommentCommand) -> Result<()> {
    match cmd {
        CommentCommand::Create { video_id, content } => {
            require_session(client).await?;
            let comment = client.create_comment(video_id, content).await?;
            println!("{}", "✅ Comment added!".green());
            println!("   ID: {}", comment.id);
        }
        CommentCommand::List {
            video_id,
            page,
            limit,
        } => {
            let feed = client.video_comments(video_id, page, limit).await?;
            print_feed("comments", &feed);
        }
        CommentCommand::Get { id } => {
            let comment = client.get_comment(id).await?;
            println!("💬 [{}] {}", comment.id, comment.content);
            println!("   Owner: {}", comment.owner_id);
            println!("   Video: {}", comment.video_id);
            println!("   Created: {}", comment.created_at);
        }
        CommentCommand::Update { id, content } => {
            require_session(client).await?;
            let comment = client.update_comment(id, content).await?;
            println!("{}", "✅ Comment updated!".green());
            println!("   Content: {}", comment.content);
        }
        CommentCommand::Delete { id } => {
            require_session(client).await?;
            client.delete_comment(id).await?;
            println!("{}", "✅ Comment deleted".green());
        }
    }
    Ok(())
}

async fn require_session(client: &SocialClient) -> Result<()> {
    if client.session().await.is_none() {
        return Err(SocialClientError::NotLoggedIn.into());
    }
    Ok(())
}

fn print_feed(what: &str, feed: &Page<FeedItem>) {
    println!(
        "📋 Page {}/{} ({} {} total)",
        feed.page,
        feed.total_pages.max(1),
        feed.total_docs,
        what
    );

    if feed.docs.is_empty() {
        println!("   Nothing here yet");
        return;
    }

    for item in &feed.docs {
        let heart = if item.is_liked { "❤" } else { "♡" };
        println!(
            "   [{}] {} {}",
            item.id,
            format!("@{}", item.owner.username).cyan(),
            truncate(&item.content, 60)
        );
        println!(
            "      {} {}  {}",
            heart,
            item.likes_count,
            item.created_at.format("%Y-%m-%d %H:%M")
        );
    }

    if let Some(next) = feed.next_page {
        println!("   More: --page {}", next);
    }
}

fn truncate(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &s[..idx]),
        None => s.to_string(),
    }
}
