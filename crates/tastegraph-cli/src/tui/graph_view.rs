use ratatui::prelude::*;
use ratatui::widgets::canvas::{Canvas, Line as CanvasLine};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};
use tastegraph_core::layout::{EdgeStyle, Segment};
use tastegraph_core::model::{FeatureType, Position};

use super::App;

/// Parse `#RRGGBB`; anything else renders white.
fn hex_color(hex: &str) -> Color {
    let digits = hex.trim_start_matches('#');
    if digits.len() != 6 {
        return Color::White;
    }
    let channel = |range: std::ops::Range<usize>| {
        digits
            .get(range)
            .and_then(|part| u8::from_str_radix(part, 16).ok())
    };
    match (channel(0..2), channel(2..4), channel(4..6)) {
        (Some(r), Some(g), Some(b)) => Color::Rgb(r, g, b),
        _ => Color::White,
    }
}

/// Terminal colour for an edge. Overall edges are black on the web canvas,
/// which is invisible on a dark terminal, so they are drawn grey and dimmed
/// when weak.
fn edge_color(style: &EdgeStyle) -> Color {
    if style.color == "#000000" {
        if style.opacity >= 0.5 {
            Color::Gray
        } else {
            Color::DarkGray
        }
    } else {
        hex_color(style.color)
    }
}

/// Canvas y grows upwards; stored positions grow downwards.
fn to_canvas(position: Position, height: f64) -> Position {
    Position::new(position.x, height - position.y)
}

/// Render the graph view.
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title bar
            Constraint::Min(10),   // Graph + sidebar
            Constraint::Length(3), // Help bar
        ])
        .split(area);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(30), Constraint::Length(42)])
        .split(rows[1]);

    let sidebar = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(5),    // Track list
            Constraint::Length(10), // Selected track
            Constraint::Length(8), // Legend
        ])
        .split(columns[1]);

    render_title(frame, app, rows[0]);
    render_graph(frame, app, columns[0]);
    render_tracks(frame, app, sidebar[0]);
    render_details(frame, app, sidebar[1]);
    render_legend(frame, sidebar[2]);
    render_help(frame, rows[2]);
}

fn render_title(frame: &mut Frame, app: &App, area: Rect) {
    let shown = app.state.filtered_edges(app.filter).count();
    let title = Paragraph::new(format!(
        "Song Graph    {} tracks    {} of {} connections    filter: {}",
        app.state.node_count(),
        shown,
        app.state.edge_count(),
        app.filter
    ))
    .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
    .block(Block::default().borders(Borders::ALL));
    frame.render_widget(title, area);
}

fn render_graph(frame: &mut Frame, app: &App, area: Rect) {
    let width = app.viewport.width;
    let height = app.viewport.height;
    let selected = app.selected_node().map(|n| n.id.clone());

    let canvas = Canvas::default()
        .block(Block::default().borders(Borders::ALL).title("Graph"))
        .marker(symbols::Marker::Braille)
        .x_bounds([0.0, width])
        .y_bounds([0.0, height])
        .paint(|ctx| {
            for edge in app.state.filtered_edges(app.filter) {
                let (Some(source), Some(target)) =
                    (app.state.node(&edge.source), app.state.node(&edge.target))
                else {
                    continue;
                };
                let style = EdgeStyle::for_edge(edge);
                let segment = Segment::between(
                    to_canvas(source.position, height),
                    to_canvas(target.position, height),
                );
                let end = segment.end();
                ctx.draw(&CanvasLine::new(
                    segment.origin.x,
                    segment.origin.y,
                    end.x,
                    end.y,
                    edge_color(&style),
                ));
            }

            ctx.layer();

            for node in app.state.nodes() {
                let Position { x, y } = to_canvas(node.position, height);
                if selected.as_ref() == Some(&node.id) {
                    ctx.print(
                        x,
                        y,
                        Span::styled("◉", Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
                    );
                    ctx.print(x, y - height * 0.04, node.caption());
                } else {
                    ctx.print(x, y, Span::styled("●", Style::default().fg(Color::White)));
                }
            }
        });

    frame.render_widget(canvas, area);
}

fn render_tracks(frame: &mut Frame, app: &App, area: Rect) {
    let items: Vec<ListItem> = app
        .state
        .nodes()
        .iter()
        .map(|node| ListItem::new(node.caption()))
        .collect();

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title("Tracks"))
        .highlight_style(Style::default().bg(Color::DarkGray).fg(Color::White));

    let mut state = ListState::default();
    state.select(app.selected);
    frame.render_stateful_widget(list, area, &mut state);
}

fn render_details(frame: &mut Frame, app: &App, area: Rect) {
    let lines: Vec<Line> = match app.selected_node() {
        None => vec![Line::from("No track selected").style(Style::default().fg(Color::DarkGray))],
        Some(node) => {
            let mut lines = vec![
                Line::from(node.caption()).style(Style::default().add_modifier(Modifier::BOLD)),
                Line::from(format!("{} connections", app.state.edges_of(&node.id).count())),
            ];
            match &node.features {
                Some(f) => {
                    lines.push(Line::from(format!("danceability  {:.3}", f.danceability)));
                    lines.push(Line::from(format!("energy        {:.3}", f.energy)));
                    lines.push(Line::from(format!("valence       {:.3}", f.valence)));
                    lines.push(Line::from(format!("tempo         {:.1} bpm", f.tempo)));
                    lines.push(Line::from(format!("acousticness  {:.3}", f.acousticness)));
                    lines.push(Line::from(format!("instrumental  {:.3}", f.instrumentalness)));
                }
                None => lines.push(Line::from("no audio features")),
            }
            lines
        }
    };

    let details = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Selected"));
    frame.render_widget(details, area);
}

fn render_legend(frame: &mut Frame, area: Rect) {
    let lines: Vec<Line> = FeatureType::ATTRIBUTES
        .iter()
        .map(|feature| {
            let sample = tastegraph_core::model::SongEdge::new(&"a".into(), &"b".into(), *feature, 1.0);
            let color = edge_color(&EdgeStyle::for_edge(&sample));
            Line::from(vec![
                Span::styled("━━ ", Style::default().fg(color)),
                Span::raw(feature.label()),
            ])
        })
        .chain(std::iter::once(Line::from(vec![
            Span::styled("━━ ", Style::default().fg(Color::Gray)),
            Span::raw(FeatureType::Overall.label()),
        ])))
        .collect();

    let legend = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Legend"));
    frame.render_widget(legend, area);
}

fn render_help(frame: &mut Frame, area: Rect) {
    let help = Paragraph::new("  \u{2191}/k \u{2193}/j Select  f/Tab Filter  Esc Deselect  q Quit")
        .style(Style::default().fg(Color::DarkGray))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(help, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_color() {
        assert_eq!(hex_color("#FF1493"), Color::Rgb(0xFF, 0x14, 0x93));
        assert_eq!(hex_color("32CD32"), Color::Rgb(0x32, 0xCD, 0x32));
        assert_eq!(hex_color("#abc"), Color::White);
        assert_eq!(hex_color("#GGGGGG"), Color::White);
    }

    #[test]
    fn test_to_canvas_flips_y() {
        assert_eq!(to_canvas(Position::new(10.0, 100.0), 800.0), Position::new(10.0, 700.0));
    }

    #[test]
    fn test_overall_edges_are_visible() {
        let strong = tastegraph_core::model::SongEdge::new(&"a".into(), &"b".into(), FeatureType::Overall, 0.9);
        let weak = tastegraph_core::model::SongEdge::new(&"a".into(), &"b".into(), FeatureType::Overall, 0.2);
        assert_eq!(edge_color(&EdgeStyle::for_edge(&strong)), Color::Gray);
        assert_eq!(edge_color(&EdgeStyle::for_edge(&weak)), Color::DarkGray);
    }
}
