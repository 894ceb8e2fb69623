use anyhow::{bail, Result};
use tastegraph_catalog::Config;
use tastegraph_core::model::canvas::BACKGROUND_CHOICES;
use tastegraph_core::model::{CanvasNode, Position};
use tastegraph_core::schema::Store;
use tastegraph_core::state::{CanvasAction, CanvasState};

use super::open_store;

#[derive(Debug, clap::Subcommand)]
pub enum CanvasCommand {
    /// List the nodes on the canvas
    Show,
    /// Place a coloured dot
    Dot { x: f64, y: f64 },
    /// Place a text label
    Text { x: f64, y: f64, text: String },
    /// Set the background colour (omit to list the predefined choices)
    Background { color: Option<String> },
    /// Remove every node (the background is kept)
    Clear,
}

pub fn run(config: &Config, command: CanvasCommand) -> Result<()> {
    let store = open_store(config)?;
    let state = store.load_canvas()?;

    let (action, done) = match command {
        CanvasCommand::Show => {
            show(&state);
            return Ok(());
        }
        CanvasCommand::Dot { x, y } => {
            let node = CanvasNode::dot(Position::new(x, y), &mut rand::thread_rng());
            let done = format!("Added {} dot at ({}, {})", node.color, x, y);
            (CanvasAction::AddNode(node), done)
        }
        CanvasCommand::Text { x, y, text } => {
            let Some(node) = CanvasNode::label(&text, Position::new(x, y)) else {
                bail!("Text must not be blank");
            };
            (CanvasAction::AddNode(node), format!("Added text at ({}, {})", x, y))
        }
        CanvasCommand::Background { color: None } => {
            println!("Current background: {}", state.background);
            println!("Choices: {}", BACKGROUND_CHOICES.join(" "));
            return Ok(());
        }
        CanvasCommand::Background { color: Some(color) } => {
            let done = format!("Background set to {}", color);
            (CanvasAction::SetBackground(color), done)
        }
        CanvasCommand::Clear => (CanvasAction::Clear, "Canvas cleared".to_string()),
    };

    apply(&store, &state, action)?;
    println!("✓ {}", done);
    Ok(())
}

/// Apply an action and persist the result.
fn apply(store: &Store, state: &CanvasState, action: CanvasAction) -> Result<CanvasState> {
    let next = state.apply(action);
    store.save_canvas(&next)?;
    Ok(next)
}

fn show(state: &CanvasState) {
    println!("\n🖌  Canvas\n");
    println!("  Background: {}", state.background);
    println!("  Nodes: {}", state.nodes.len());
    for node in &state.nodes {
        match &node.text {
            Some(text) => println!(
                "    text  ({:>7.1}, {:>7.1})  {:?}",
                node.position.x, node.position.y, text
            ),
            None => println!(
                "    dot   ({:>7.1}, {:>7.1})  {} size {}",
                node.position.x, node.position.y, node.color, node.size
            ),
        }
    }
}
