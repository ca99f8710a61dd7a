use std::time::Duration;

use clap::{Parser, Subcommand, ValueEnum};
use serde_json::Value;

use remote_deck::remote::{RemoteClient, RemoteEndpoint, Repeat, SoundId};

#[derive(Parser)]
#[command(name = "remote-cli")]
#[command(about = "Diagnostics CLI for the remote playback server", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "127.0.0.1")]
    address: String,

    #[arg(short, long, default_value_t = 3333)]
    port: u16,

    #[arg(long, default_value = "v1")]
    api_version: String,

    #[arg(long, default_value_t = 5)]
    timeout_secs: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show playlist and soundboard playback
    Status,
    /// Play a playlist or track by id
    PlayPlaylist { id: String },
    /// Start a soundboard sound
    PlaySound { id: String },
    /// Stop a soundboard sound
    StopSound { id: String },
    /// Playlist transport controls
    Playback {
        #[command(subcommand)]
        command: PlaybackCommand,
    },
}

#[derive(Subcommand)]
enum PlaybackCommand {
    Play,
    Pause,
    Next,
    Previous,
    /// Set volume between 0 and 1
    Volume { level: f64 },
    Mute {
        #[arg(action = clap::ArgAction::Set)]
        on: bool,
    },
    Shuffle {
        #[arg(action = clap::ArgAction::Set)]
        on: bool,
    },
    Repeat { mode: RepeatArg },
}

#[derive(Clone, Copy, ValueEnum)]
enum RepeatArg {
    Off,
    Playlist,
    Track,
}

impl From<RepeatArg> for Repeat {
    fn from(arg: RepeatArg) -> Self {
        match arg {
            RepeatArg::Off => Repeat::Off,
            RepeatArg::Playlist => Repeat::Playlist,
            RepeatArg::Track => Repeat::Track,
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let endpoint = RemoteEndpoint::new(cli.address, cli.port, Some(cli.api_version.as_str()));
    let client = RemoteClient::new(endpoint, Duration::from_secs(cli.timeout_secs))?;

    match cli.command {
        Commands::Status => {
            let snapshot = client.fetch_snapshot().await?;
            let mut sounds: Vec<&str> = snapshot.soundboard.sounds.iter().map(SoundId::as_str).collect();
            sounds.sort_unstable();
            print_json(&serde_json::json!({
                "playlist": snapshot.playlist,
                "soundboard": { "playing": sounds },
            }))?;
        }
        Commands::PlayPlaylist { id } => client.play_playlist(&id).await?,
        Commands::PlaySound { id } => client.play_sound(&SoundId::from(id)).await?,
        Commands::StopSound { id } => client.stop_sound(&SoundId::from(id)).await?,
        Commands::Playback { command } => match command {
            PlaybackCommand::Play => client.play().await?,
            PlaybackCommand::Pause => client.pause().await?,
            PlaybackCommand::Next => client.next().await?,
            PlaybackCommand::Previous => client.previous().await?,
            PlaybackCommand::Volume { level } => client.set_volume(level.clamp(0.0, 1.0)).await?,
            PlaybackCommand::Mute { on } => client.set_mute(on).await?,
            PlaybackCommand::Shuffle { on } => client.set_shuffle(on).await?,
            PlaybackCommand::Repeat { mode } => client.set_repeat(mode.into()).await?,
        },
    }

    Ok(())
}

fn print_json(value: &Value) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
