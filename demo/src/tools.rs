//! Tool and resource handlers for the game
//!
//! Builds the handler registry the server dispatches against. Every
//! closure captures the same `Arc<Mutex<Game>>` — the one shared state
//! object, handed over at registration time; the protocol layer never
//! sees it.
//!
//! An invalid move is not a failure: the handler returns a successful
//! text result saying so, and only argument-shape problems (a missing
//! field, a player that is neither "X" nor "O") surface as handler
//! errors.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::{json, Map, Value};
use tokio::sync::Mutex;

use gridwire_protocol::types::{Resource, Tool, ToolInputSchema};
use gridwire_server::{
    handlers::{FunctionResourceHandler, FunctionToolHandler},
    registry::HandlerRegistry,
    HandlerError,
};

use crate::game::{Game, Player};

/// URI of the game-state resource.
pub const GAME_RESOURCE_URI: &str = "game://current";

#[derive(Debug, Deserialize)]
struct MoveArgs {
    row: usize,
    col: usize,
    player: Player,
}

/// Build the registry for one shared game.
pub fn game_registry(game: Arc<Mutex<Game>>) -> Arc<HandlerRegistry> {
    let registry = Arc::new(HandlerRegistry::new());

    registry.register_tool(FunctionToolHandler::new(make_move_tool(), {
        let game = Arc::clone(&game);
        move |args| {
            let game = Arc::clone(&game);
            async move {
                let args: MoveArgs = serde_json::from_value(Value::Object(args))
                    .map_err(|err| HandlerError::new(format!("invalid move arguments: {err}")))?;
                let mut game = game.lock().await;
                if game.make_move(args.row, args.col, args.player) {
                    Ok(format!("Move successful. Board:\n{}", *game))
                } else {
                    Ok(format!("Invalid move. Board:\n{}", *game))
                }
            }
        }
    }));

    registry.register_tool(FunctionToolHandler::new(
        no_arg_tool("get_board", "Get the current board state"),
        {
            let game = Arc::clone(&game);
            move |_args| {
                let game = Arc::clone(&game);
                async move { Ok(game.lock().await.to_string()) }
            }
        },
    ));

    registry.register_tool(FunctionToolHandler::new(
        no_arg_tool("get_available_moves", "Get available moves on the board"),
        {
            let game = Arc::clone(&game);
            move |_args| {
                let game = Arc::clone(&game);
                async move {
                    let moves = game.lock().await.available_moves();
                    Ok(serde_json::to_string(&moves)?)
                }
            }
        },
    ));

    registry.register_tool(FunctionToolHandler::new(
        no_arg_tool("reset_game", "Reset the game board"),
        {
            let game = Arc::clone(&game);
            move |_args| {
                let game = Arc::clone(&game);
                async move {
                    game.lock().await.reset();
                    Ok("Game reset successfully".to_string())
                }
            }
        },
    ));

    registry.register_resource(FunctionResourceHandler::new(
        Resource {
            uri: GAME_RESOURCE_URI.to_string(),
            name: "Current Game State".to_string(),
            description: "The current state of the tic-tac-toe game".to_string(),
        },
        move || {
            let game = Arc::clone(&game);
            async move { Ok(game.lock().await.to_string()) }
        },
    ));

    registry
}

fn make_move_tool() -> Tool {
    let mut properties = Map::new();
    properties.insert(
        "row".to_string(),
        json!({"type": "integer", "minimum": 0, "maximum": 2}),
    );
    properties.insert(
        "col".to_string(),
        json!({"type": "integer", "minimum": 0, "maximum": 2}),
    );
    properties.insert(
        "player".to_string(),
        json!({"type": "string", "enum": ["X", "O"]}),
    );

    Tool {
        name: "make_move".to_string(),
        description: "Make a move on the tic-tac-toe board".to_string(),
        input_schema: ToolInputSchema::object(properties),
    }
}

fn no_arg_tool(name: &str, description: &str) -> Tool {
    Tool {
        name: name.to_string(),
        description: description.to_string(),
        input_schema: ToolInputSchema::empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fresh_registry() -> Arc<HandlerRegistry> {
        game_registry(Arc::new(Mutex::new(Game::new())))
    }

    fn move_args(row: u64, col: u64, player: &str) -> Map<String, Value> {
        let mut args = Map::new();
        args.insert("row".to_string(), json!(row));
        args.insert("col".to_string(), json!(col));
        args.insert("player".to_string(), json!(player));
        args
    }

    #[tokio::test]
    async fn all_tools_and_the_resource_are_registered() {
        let registry = fresh_registry();

        let mut names: Vec<String> = registry
            .list_tools()
            .into_iter()
            .map(|tool| tool.name)
            .collect();
        names.sort();
        assert_eq!(
            names,
            ["get_available_moves", "get_board", "make_move", "reset_game"]
        );

        let resources = registry.list_resources();
        assert_eq!(resources.len(), 1);
        assert_eq!(resources[0].uri, GAME_RESOURCE_URI);
    }

    #[tokio::test]
    async fn valid_and_invalid_moves_both_return_text() {
        let registry = fresh_registry();
        let handler = registry.tool("make_move").expect("registered");

        let reply = handler.call(move_args(0, 0, "X")).await.unwrap();
        assert!(reply.starts_with("Move successful."));
        assert!(reply.contains("X |   |  "));

        // Same cell again: a rejection, not a handler failure.
        let reply = handler.call(move_args(0, 0, "O")).await.unwrap();
        assert!(reply.starts_with("Invalid move."));
    }

    #[tokio::test]
    async fn malformed_arguments_are_a_handler_error() {
        let registry = fresh_registry();
        let handler = registry.tool("make_move").expect("registered");

        let mut args = Map::new();
        args.insert("row".to_string(), json!(0));
        // col missing, player not a player
        args.insert("player".to_string(), json!("Q"));

        let err = handler.call(args).await.unwrap_err();
        assert!(err.to_string().contains("invalid move arguments"));
    }

    #[tokio::test]
    async fn available_moves_are_json_pairs() {
        let registry = fresh_registry();

        let moves = registry
            .tool("get_available_moves")
            .expect("registered")
            .call(Map::new())
            .await
            .unwrap();
        let moves: Vec<(usize, usize)> = serde_json::from_str(&moves).unwrap();
        assert_eq!(moves.len(), 9);
        assert_eq!(moves[0], (0, 0));
    }

    #[tokio::test]
    async fn reset_returns_the_reference_text_and_clears_state() {
        let registry = fresh_registry();
        let make_move = registry.tool("make_move").expect("registered");
        make_move.call(move_args(1, 1, "X")).await.unwrap();

        let reply = registry
            .tool("reset_game")
            .expect("registered")
            .call(Map::new())
            .await
            .unwrap();
        assert_eq!(reply, "Game reset successfully");

        let board = registry
            .tool("get_board")
            .expect("registered")
            .call(Map::new())
            .await
            .unwrap();
        // Every cell row is empty again; only the status lines remain.
        assert_eq!(board.lines().next(), Some("  |   |  "));
        assert!(board.contains("Game state: playing"));
    }

    #[tokio::test]
    async fn resource_mirrors_the_board_tool() {
        let registry = fresh_registry();
        let board = registry
            .tool("get_board")
            .expect("registered")
            .call(Map::new())
            .await
            .unwrap();
        let resource = registry
            .resource(GAME_RESOURCE_URI)
            .expect("registered")
            .read()
            .await
            .unwrap();
        assert_eq!(board, resource);
    }
}
