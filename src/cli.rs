use std::{path::PathBuf, pin::pin};

use clap::{Args, Parser, Subcommand};
use futures::TryStreamExt;
use log::info;
use serde_json::Value;
use spotifetch::{
    PlaylistConfig, PlaylistGenerator,
    auth::Authorizer,
    clients::{
        SpotifyClient,
        api::{ItemType, SpotifyApi, TimeRange},
        errors::{Error, Result},
    },
    feeds::{get_all_top, get_saved_tracks, get_top},
};

#[derive(Parser)]
#[command(name = "spotifetch")]
#[command(version, about = "Generate Spotify playlists from your listening history", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a playlist of recommendations seeded by your artists
    Generate(GenerateArgs),
    /// List your top artists or tracks
    Top {
        #[arg(long, value_enum, default_value = "artists")]
        kind: ItemType,
        /// Time window; all three windows when omitted
        #[arg(long, value_enum)]
        time_range: Option<TimeRange>,
    },
    /// List your saved tracks
    SavedTracks {},
    /// Show the authorized user
    Whoami {},
}

#[derive(Args)]
struct GenerateArgs {
    /// JSON file with playlist settings; flags override it
    #[arg(long)]
    config: Option<PathBuf>,
    /// Playlist name
    #[arg(long)]
    name: Option<String>,
    /// Create the playlist as private
    #[arg(long)]
    private: bool,
    /// Seed from top artists over this window (repeatable)
    #[arg(long, value_enum)]
    time_range: Vec<TimeRange>,
    /// Seed from followed artists
    #[arg(long)]
    followed: bool,
    /// Seed from artists of saved albums
    #[arg(long)]
    saved_albums: bool,
    /// Recommendation tuning parameter, e.g. target_energy=0.8 (repeatable)
    #[arg(long = "tune", value_name = "KEY=VALUE", value_parser = parse_tuneable)]
    tuneable: Vec<(String, Value)>,
    /// Maximum number of tracks in the playlist
    #[arg(long)]
    track_limit: Option<usize>,
}

impl GenerateArgs {
    async fn into_config(self) -> Result<PlaylistConfig> {
        let mut config = match &self.config {
            Some(path) => PlaylistConfig::from_file(path).await?,
            None => PlaylistConfig::default(),
        };
        if let Some(name) = self.name {
            config.playlist_name = name;
        }
        if self.private {
            config.public = false;
        }
        if !self.time_range.is_empty() {
            config.time_range = self.time_range;
        }
        config.use_followed_artists |= self.followed;
        config.saved_album_artists |= self.saved_albums;
        config.tuneable.extend(self.tuneable);
        if let Some(limit) = self.track_limit {
            config.track_limit = limit;
        }
        Ok(config)
    }
}

// Numbers and booleans are sent as such, anything else as a string
fn parse_tuneable(raw: &str) -> std::result::Result<(String, Value), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got `{raw}`"))?;
    if key.is_empty() {
        return Err(format!("empty key in `{raw}`"));
    }
    let value = match serde_json::from_str::<Value>(value) {
        Ok(v @ (Value::Number(_) | Value::Bool(_))) => v,
        _ => Value::String(value.to_string()),
    };
    Ok((key.to_string(), value))
}

pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Generate(args) => generate(args).await,
        Commands::Top { kind, time_range } => top(kind, time_range).await,
        Commands::SavedTracks {} => saved_tracks().await,
        Commands::Whoami {} => whoami().await,
    }
}

async fn authorized_client() -> Result<SpotifyClient> {
    info!("Authorizing client ...");
    let authorizer = Authorizer::try_default()?;
    // CLI prompt may be shown here
    authorizer.authorize().await?;
    Ok(SpotifyClient::new(authorizer.access_token().await?))
}

async fn generate(args: GenerateArgs) -> Result<()> {
    let config = args.into_config().await?;
    config.validate()?;
    if config.time_range.is_empty() && !config.use_followed_artists && !config.saved_album_artists
    {
        return Err(Error::ConfigurationError(
            "No seed source selected. Pass --time-range, --followed or --saved-albums.".into(),
        ));
    }
    let client = authorized_client().await?;
    let uri = PlaylistGenerator::new(client, config).generate().await?;
    println!("{uri}");
    Ok(())
}

async fn top(kind: ItemType, time_range: Option<TimeRange>) -> Result<()> {
    let client = authorized_client().await?;
    match time_range {
        Some(range) => print_names(get_top(&client, kind, range)).await,
        None => print_names(get_all_top(&client, kind)).await,
    }
}

async fn saved_tracks() -> Result<()> {
    let client = authorized_client().await?;
    let tracks = get_saved_tracks(&client).map_ok(|saved| saved["track"].clone());
    print_names(tracks).await
}

async fn whoami() -> Result<()> {
    let client = authorized_client().await?;
    let user = client.current_user().await?;
    println!(
        "{} ({})",
        user.id,
        user.display_name.as_deref().unwrap_or("no display name")
    );
    Ok(())
}

async fn print_names(items: impl futures::Stream<Item = Result<Value>>) -> Result<()> {
    let mut items = pin!(items);
    while let Some(item) = items.try_next().await? {
        match item.get("name").and_then(Value::as_str) {
            Some(name) => println!("{name}"),
            None => println!("{item}"),
        }
    }
    Ok(())
}
