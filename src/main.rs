use anyhow::Result;
use clap::{Parser, Subcommand};
use dotenvy::dotenv;
use sqlx::PgPool;

mod agg;
mod config;
mod feed;
mod follow;
mod init;
mod session;
mod telemetry;
mod user;
mod util;

#[derive(Parser)]
#[command(name = "gather", about = "personal feed aggregator CLI")]
struct Cli {
    #[arg(global = true, short, long)]
    dsn: Option<String>,
    /// Emit a single JSON envelope to stdout; logs go to stderr
    #[arg(global = true, long, default_value_t = false)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// create or update the database schema
    Init(init::InitCmd),
    /// create a user and select it
    Register(user::RegisterCmd),
    /// select an existing user
    Login(user::LoginCmd),
    /// list users
    Users,
    /// delete all users (their feeds, follows and posts cascade)
    Reset,
    /// add or list feeds
    Feed(feed::FeedCmd),
    /// follow a registered feed by url
    Follow(follow::FollowCmd),
    /// list the feeds the current user follows
    Following,
    /// stop following a feed by url
    Unfollow(follow::UnfollowCmd),
    /// run the aggregation loop
    Agg(agg::AggCmd),
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    let cli = Cli::parse();
    telemetry::config::set_json_mode(cli.json);

    // initialize logging/tracing (stderr). Respect RUST_LOG and GATHER_LOG_FORMAT
    telemetry::config::init_tracing();

    let mut config = config::Config::load()?;
    let dsn = config::resolve_dsn(cli.dsn, &config)?;
    let pool = PgPool::connect(&dsn).await?;

    match cli.command {
        Commands::Init(args) => init::run(&pool, args).await?,
        Commands::Register(args) => user::register(&pool, &mut config, args).await?,
        Commands::Login(args) => user::login(&pool, &mut config, args).await?,
        Commands::Users => user::users(&pool, &config).await?,
        Commands::Reset => user::reset(&pool).await?,
        Commands::Feed(args) => feed::run(&pool, &config, args).await?,
        Commands::Follow(args) => {
            let session = session::require_user(&pool, &config).await?;
            follow::follow(&pool, &session, args).await?
        }
        Commands::Following => {
            let session = session::require_user(&pool, &config).await?;
            follow::following(&pool, &session).await?
        }
        Commands::Unfollow(args) => {
            let session = session::require_user(&pool, &config).await?;
            follow::unfollow(&pool, &session, args).await?
        }
        Commands::Agg(args) => agg::run(&pool, args).await?,
    }

    Ok(())
}
