use std::io;

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::prelude::*;
use tastegraph_catalog::Config;
use tastegraph_core::layout::Viewport;
use tastegraph_core::model::{FeatureType, SongNode};
use tastegraph_core::schema::Store;
use tastegraph_core::state::{EdgeFilter, GraphState};

pub mod graph_view;

/// Filters in the order the `f` key cycles through them.
const FILTER_CYCLE: [EdgeFilter; 7] = [
    EdgeFilter::All,
    EdgeFilter::Only(FeatureType::Overall),
    EdgeFilter::Only(FeatureType::Danceability),
    EdgeFilter::Only(FeatureType::Energy),
    EdgeFilter::Only(FeatureType::Valence),
    EdgeFilter::Only(FeatureType::Tempo),
    EdgeFilter::Only(FeatureType::Acousticness),
];

/// Application state for the graph viewer.
#[derive(Debug)]
pub struct App {
    pub state: GraphState,
    pub viewport: Viewport,
    pub filter: EdgeFilter,
    /// Index into `state.nodes()` of the highlighted node.
    pub selected: Option<usize>,
    pub should_quit: bool,
}

impl App {
    pub fn new(state: GraphState, viewport: Viewport, filter: EdgeFilter) -> Self {
        Self {
            state,
            viewport,
            filter,
            selected: None,
            should_quit: false,
        }
    }

    pub fn selected_node(&self) -> Option<&SongNode> {
        self.selected.and_then(|ix| self.state.nodes().get(ix))
    }

    fn handle_key(&mut self, key: KeyCode) {
        let count = self.state.node_count();
        match key {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Esc => {
                if self.selected.is_some() {
                    self.selected = None;
                } else {
                    self.should_quit = true;
                }
            }
            KeyCode::Char('j') | KeyCode::Down if count > 0 => {
                self.selected = Some(self.selected.map_or(0, |ix| (ix + 1) % count));
            }
            KeyCode::Char('k') | KeyCode::Up if count > 0 => {
                self.selected = Some(self.selected.map_or(count - 1, |ix| (ix + count - 1) % count));
            }
            KeyCode::Char('f') | KeyCode::Tab => self.filter = next_filter(self.filter),
            _ => {}
        }
    }
}

fn next_filter(current: EdgeFilter) -> EdgeFilter {
    let ix = FILTER_CYCLE.iter().position(|f| *f == current).unwrap_or(0);
    FILTER_CYCLE[(ix + 1) % FILTER_CYCLE.len()]
}

/// Run the graph viewer.
///
/// Sets up the terminal, runs the main event loop, and restores the terminal
/// on exit (including on error).
pub fn run_tui(config: &Config, filter: EdgeFilter) -> Result<()> {
    let state = Store::open(&config.store_path)
        .context("Failed to open store")?
        .load_graph()?;

    if state.is_empty() {
        println!("The song graph is empty.");
        println!("Run 'tastegraph search <query> --add' to add some tracks first.");
        return Ok(());
    }

    log::debug!(
        "Viewing {} nodes and {} edges",
        state.node_count(),
        state.edge_count()
    );
    let app = App::new(state, config.viewport, filter);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_event_loop(&mut terminal, app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    mut app: App,
) -> Result<()> {
    loop {
        terminal.draw(|frame| graph_view::render(frame, &app))?;

        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                app.handle_key(key.code);
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tastegraph_core::model::{FeatureVector, Position, TrackSummary};
    use tastegraph_core::{GraphAction, Thresholds};

    fn app_with(ids: &[&str]) -> App {
        let features = FeatureVector {
            danceability: 0.5,
            energy: 0.5,
            valence: 0.5,
            tempo: 120.0,
            acousticness: 0.5,
            instrumentalness: 0.0,
        };
        let state = ids.iter().fold(GraphState::new(), |s, id| {
            let node = SongNode::from_track(&TrackSummary::new(*id, *id), features, Position::new(100.0, 100.0));
            s.apply(GraphAction::AddNode(node), &Thresholds::DEFAULT)
        });
        App::new(state, Viewport::default(), EdgeFilter::All)
    }

    #[test]
    fn test_selection_wraps() {
        let mut app = app_with(&["a", "b"]);
        app.handle_key(KeyCode::Down);
        assert_eq!(app.selected, Some(0));
        app.handle_key(KeyCode::Down);
        app.handle_key(KeyCode::Down);
        assert_eq!(app.selected, Some(0));
        app.handle_key(KeyCode::Up);
        assert_eq!(app.selected_node().map(|n| n.id.as_str()), Some("b"));
    }

    #[test]
    fn test_escape_clears_selection_then_quits() {
        let mut app = app_with(&["a"]);
        app.handle_key(KeyCode::Char('j'));
        app.handle_key(KeyCode::Esc);
        assert!(app.selected.is_none());
        assert!(!app.should_quit);
        app.handle_key(KeyCode::Esc);
        assert!(app.should_quit);
    }

    #[test]
    fn test_filter_cycles_through_every_option() {
        let mut app = app_with(&["a"]);
        for expected in FILTER_CYCLE.iter().skip(1) {
            app.handle_key(KeyCode::Char('f'));
            assert_eq!(app.filter, *expected);
        }
        app.handle_key(KeyCode::Tab);
        assert_eq!(app.filter, EdgeFilter::All);
    }

    #[test]
    fn test_navigation_on_empty_graph_is_ignored() {
        let mut app = app_with(&[]);
        app.handle_key(KeyCode::Down);
        assert!(app.selected.is_none());
    }
}
