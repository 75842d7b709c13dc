//! Client-side players
//!
//! [`GameClient`] drives a game over the protocol client. The O player's
//! moves come from a [`MovePicker`] — the seam where a language-model
//! client would plug in; this crate ships only [`FirstOpenCell`], which
//! needs no model. A picker that proposes a cell that is not actually
//! available is overridden with the first available move, so a confused
//! picker can stall the O player but never corrupt the game.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_json::{json, Map, Value};

use gridwire_client::Client;

/// Chooses O's next move from the rendered board and the open cells.
#[async_trait]
pub trait MovePicker: Send + Sync {
    /// Propose a `(row, col)` move.
    async fn pick(&self, board: &str, available: &[(usize, usize)]) -> Result<(usize, usize)>;
}

/// Picker that always takes the first open cell.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstOpenCell;

#[async_trait]
impl MovePicker for FirstOpenCell {
    async fn pick(&self, _board: &str, available: &[(usize, usize)]) -> Result<(usize, usize)> {
        available.first().copied().context("no moves available")
    }
}

/// A game session over one protocol connection.
pub struct GameClient {
    client: Client,
    picker: Box<dyn MovePicker>,
}

impl GameClient {
    /// Connect to a game server.
    pub async fn connect(url: &str, picker: Box<dyn MovePicker>) -> Result<Self> {
        let client = Client::connect(url).await?;
        Ok(Self { client, picker })
    }

    /// The rendered board.
    pub async fn board(&self) -> Result<String> {
        Ok(self.client.call_tool("get_board", Map::new()).await?)
    }

    /// The open cells.
    pub async fn available_moves(&self) -> Result<Vec<(usize, usize)>> {
        let text = self
            .client
            .call_tool("get_available_moves", Map::new())
            .await?;
        serde_json::from_str(&text).context("available moves were not (row, col) pairs")
    }

    /// Place X at the given cell.
    pub async fn make_human_move(&self, row: usize, col: usize) -> Result<String> {
        self.make_move(row, col, "X").await
    }

    /// Let the picker place O.
    ///
    /// Checks the game is still running first, and falls back to the
    /// first available move if the picker proposes an unavailable cell.
    pub async fn make_ai_move(&self) -> Result<String> {
        let board = self.board().await?;
        if !board.contains("Game state: playing") {
            return Ok("Game over".to_string());
        }

        let moves = self.available_moves().await?;
        let Some(first) = moves.first().copied() else {
            return Ok("No moves available".to_string());
        };

        let choice = match self.picker.pick(&board, &moves).await {
            Ok(choice) if moves.contains(&choice) => choice,
            _ => first,
        };

        self.make_move(choice.0, choice.1, "O").await
    }

    /// Start a fresh game.
    pub async fn reset_game(&self) -> Result<String> {
        Ok(self.client.call_tool("reset_game", Map::new()).await?)
    }

    /// Close the connection.
    pub async fn disconnect(&self) {
        self.client.disconnect().await;
    }

    async fn make_move(&self, row: usize, col: usize, player: &str) -> Result<String> {
        let mut args = Map::new();
        args.insert("row".to_string(), json!(row));
        args.insert("col".to_string(), json!(col));
        args.insert("player".to_string(), Value::String(player.to_string()));
        Ok(self.client.call_tool("make_move", args).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn first_open_cell_takes_the_head_of_the_list() {
        let picker = FirstOpenCell;
        let choice = picker.pick("", &[(1, 2), (2, 0)]).await.unwrap();
        assert_eq!(choice, (1, 2));
    }

    #[tokio::test]
    async fn first_open_cell_fails_on_a_full_board() {
        let picker = FirstOpenCell;
        assert!(picker.pick("", &[]).await.is_err());
    }
}
