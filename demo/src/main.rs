//! Gridwire demo binary: serve a game, or play one.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tokio::sync::Mutex;
use tracing::info;
use tracing_subscriber::EnvFilter;

use gridwire_demo::game::Game;
use gridwire_demo::player::{FirstOpenCell, GameClient};
use gridwire_demo::tools::game_registry;
use gridwire_server::{ServerConfig, WsServer};

#[derive(Parser)]
#[command(name = "gridwire-demo", about = "Tic-tac-toe over the Gridwire protocol")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the game server
    Serve {
        /// Address to listen on
        #[arg(long, env = "GRIDWIRE_ADDR", default_value = "127.0.0.1:8000")]
        addr: SocketAddr,
    },
    /// Play one scripted game against a running server
    Play {
        /// Server URL
        #[arg(long, env = "GRIDWIRE_URL", default_value = "ws://127.0.0.1:8000")]
        url: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    match Cli::parse().command {
        Command::Serve { addr } => serve(addr).await,
        Command::Play { url } => play(&url).await,
    }
}

async fn serve(addr: SocketAddr) -> Result<()> {
    let game = Arc::new(Mutex::new(Game::new()));
    let registry = game_registry(game);

    let server = WsServer::new(
        registry,
        ServerConfig::new("gridwire-tictactoe", env!("CARGO_PKG_VERSION")),
    );
    let handle = server.start(addr).await?;

    tokio::signal::ctrl_c().await?;
    info!("shutting down");
    handle.shutdown().await;
    Ok(())
}

/// Play both sides to a terminal state: X takes the first open cell,
/// O answers through the move picker.
async fn play(url: &str) -> Result<()> {
    let client = GameClient::connect(url, Box::new(FirstOpenCell)).await?;
    client.reset_game().await?;

    loop {
        let board = client.board().await?;
        if !board.contains("Game state: playing") {
            println!("{board}");
            break;
        }

        let moves = client.available_moves().await?;
        let Some((row, col)) = moves.first().copied() else {
            println!("{board}");
            break;
        };

        let outcome = client.make_human_move(row, col).await?;
        println!("{outcome}\n");
        let outcome = client.make_ai_move().await?;
        println!("{outcome}\n");
    }

    client.disconnect().await;
    Ok(())
}
