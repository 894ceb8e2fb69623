use crate::model::canvas::DEFAULT_BACKGROUND;
use crate::model::CanvasNode;

/// A state transition of the free-form canvas.
#[derive(Debug, Clone, PartialEq)]
pub enum CanvasAction {
    AddNode(CanvasNode),
    SetBackground(String),
    /// Remove every node; the background is kept.
    Clear,
}

/// Nodes and background of the free-form canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct CanvasState {
    pub nodes: Vec<CanvasNode>,
    pub background: String,
}

impl Default for CanvasState {
    fn default() -> Self {
        Self {
            nodes: Vec::new(),
            background: DEFAULT_BACKGROUND.to_string(),
        }
    }
}

impl CanvasState {
    #[must_use]
    pub fn apply(&self, action: CanvasAction) -> Self {
        let mut next = self.clone();
        match action {
            CanvasAction::AddNode(node) => next.nodes.push(node),
            CanvasAction::SetBackground(color) => next.background = color,
            CanvasAction::Clear => next.nodes.clear(),
        }
        next
    }
}
