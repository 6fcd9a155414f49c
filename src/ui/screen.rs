use crate::session::Field;
use crate::ui::app::{App, FocusPanel, Mode};
use crate::ui::viewport::Viewport;
use ratatui::{
    layout::{Constraint, Flex, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{
        canvas::{Canvas, Rectangle},
        Block, Borders, Clear, List, ListItem, Paragraph, Row, Table,
    },
    Frame,
};

// Brand colors
const BRAND_DARK: Color = Color::Rgb(0x1F, 0x2F, 0x3C);
const BRAND_SELECT_BG: Color = Color::Rgb(0xC3, 0xD3, 0xE0);
const BRAND_GREEN: Color = Color::Rgb(0x82, 0x9A, 0x68);
const BRAND_ORANGE: Color = Color::Rgb(0x9E, 0x68, 0x3C);
const BRAND_MUTED: Color = Color::Rgb(0x71, 0x65, 0x65);
const ELEMENT_FILL: Color = Color::Rgb(0x46, 0x82, 0xB4); // steel blue

// Styles
const HEADER_STYLE: Style = Style::new().fg(BRAND_DARK).add_modifier(Modifier::BOLD);
const SELECTED_STYLE: Style = Style::new()
    .bg(BRAND_SELECT_BG)
    .fg(BRAND_DARK)
    .add_modifier(Modifier::BOLD);
const HIGHLIGHT_COLOR: Color = Color::Yellow;

/// Draws the whole editor and returns the inner canvas area, which mouse
/// handling maps back to layout coordinates.
pub fn draw_editor(frame: &mut Frame, app: &App) -> Rect {
    let chunks = Layout::vertical([
        Constraint::Length(3), // Header
        Constraint::Min(10),   // Panels
        Constraint::Length(3), // Footer / status
    ])
    .split(frame.area());

    draw_header(frame, chunks[0], app);

    let panels = Layout::horizontal([
        Constraint::Percentage(20), // Elements
        Constraint::Min(20),        // Canvas
        Constraint::Percentage(28), // Properties
    ])
    .split(chunks[1]);

    draw_element_list(frame, panels[0], app);
    let canvas_area = draw_canvas(frame, panels[1], app);
    draw_properties(frame, panels[2], app);

    let help = match app.mode {
        Mode::Editing { .. } => " Type value | Enter Apply | Esc Cancel ",
        Mode::ConfirmDelete => " y Delete | any other key Cancel ",
        Mode::Normal => match app.focus_panel {
            FocusPanel::Elements => {
                " ↑↓ Select | Tab Focus | a Add | d Delete | g Snap | +/- Grid | s Save | r Reload | q Quit "
            }
            FocusPanel::Canvas => {
                " ←→↑↓ Move | Shift Grid step | Mouse Drag | Tab Focus | a Add | d Delete | s Save | q Quit "
            }
            FocusPanel::Properties => {
                " ↑↓ Field | Enter Edit | Tab Focus | s Save | q Quit "
            }
        },
    };
    draw_footer(frame, chunks[2], help, app.status.as_deref());

    if app.mode == Mode::ConfirmDelete {
        draw_confirm_delete(frame, app);
    }

    canvas_area
}

fn draw_header(frame: &mut Frame, area: Rect, app: &App) {
    let session = &app.session;
    let file = session
        .file_path()
        .map_or_else(|| "(unsaved)".to_string(), |p| p.display().to_string());
    let dirty = if session.is_dirty() { " *" } else { "" };
    let snap = if session.settings().snap_to_grid {
        format!("snap {}", session.settings().grid_size)
    } else {
        "snap off".to_string()
    };

    let title = format!(
        " XUI Editor | {} | {file}{dirty} | {} elements | {snap} ",
        session.window_name(),
        session.len(),
    );

    let header = Paragraph::new(title)
        .style(HEADER_STYLE)
        .block(Block::default().borders(Borders::ALL));

    frame.render_widget(header, area);
}

fn focus_border(app: &App, panel: FocusPanel) -> Style {
    if app.focus_panel == panel {
        Style::default().fg(BRAND_ORANGE)
    } else {
        Style::default()
    }
}

fn draw_element_list(frame: &mut Frame, area: Rect, app: &App) {
    let is_focused = app.focus_panel == FocusPanel::Elements;
    let selected = app.session.selected();

    // Keep the selected row visible
    let visible_rows = (area.height as usize).saturating_sub(2);
    let selected_index = app.session.selected_index().unwrap_or(0);
    let scroll_offset = if selected_index >= visible_rows {
        selected_index - visible_rows + 1
    } else {
        0
    };

    let items: Vec<ListItem> = app
        .session
        .entries()
        .iter()
        .skip(scroll_offset)
        .take(visible_rows)
        .map(|entry| {
            let is_selected = selected == Some(entry.id);
            let style = if is_selected && is_focused {
                SELECTED_STYLE
            } else if is_selected {
                Style::default().add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };

            let content = Line::from(vec![
                Span::styled(entry.element.name.clone(), style),
                Span::raw(" "),
                Span::styled(
                    format!("<{}>", entry.element.kind),
                    Style::default().fg(BRAND_GREEN),
                ),
            ]);

            ListItem::new(content)
        })
        .collect();

    let title = format!(" Elements ({}) ", app.session.len());
    let list = List::new(items).block(
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(focus_border(app, FocusPanel::Elements)),
    );

    frame.render_widget(list, area);
}

fn draw_canvas(frame: &mut Frame, area: Rect, app: &App) -> Rect {
    let block = Block::default()
        .title(format!(" {} ", app.session.window_name()))
        .borders(Borders::ALL)
        .border_style(focus_border(app, FocusPanel::Canvas));
    let inner = block.inner(area);

    let entries = app.session.entries();
    let extent = crate::model::window::extent(entries.iter().map(|e| &e.element));
    let viewport = Viewport::new(inner, extent);
    let selected = app.session.selected();

    let canvas = Canvas::default()
        .block(block)
        .marker(Marker::Braille)
        .x_bounds([0.0, viewport.width])
        .y_bounds([0.0, viewport.height])
        .paint(move |ctx| {
            for entry in entries {
                let element = &entry.element;
                let is_selected = selected == Some(entry.id);
                let color = if is_selected {
                    HIGHLIGHT_COLOR
                } else {
                    ELEMENT_FILL
                };

                let bottom = viewport.canvas_y(element.position.y, element.size.height);
                ctx.draw(&Rectangle {
                    x: element.position.x,
                    y: bottom,
                    width: element.size.width,
                    height: element.size.height,
                    color,
                });

                let label_style = if is_selected {
                    Style::default()
                        .fg(HIGHLIGHT_COLOR)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(Color::White)
                };
                ctx.print(
                    element.position.x,
                    bottom + element.size.height,
                    Line::styled(element.name.clone(), label_style),
                );
            }
        });

    frame.render_widget(canvas, area);
    inner
}

fn draw_properties(frame: &mut Frame, area: Rect, app: &App) {
    let is_focused = app.focus_panel == FocusPanel::Properties;

    let Some(id) = app.session.selected() else {
        let empty = Paragraph::new(" No element selected")
            .style(Style::default().fg(BRAND_MUTED))
            .block(
                Block::default()
                    .title(" Properties ")
                    .borders(Borders::ALL)
                    .border_style(focus_border(app, FocusPanel::Properties)),
            );
        frame.render_widget(empty, area);
        return;
    };

    let mut rows: Vec<Row> = Field::ALL
        .iter()
        .enumerate()
        .map(|(i, field)| {
            let is_current = i == app.selected_field && is_focused;
            let value = match &app.mode {
                Mode::Editing { field: editing, buffer } if editing == field => {
                    format!("{buffer}▏")
                }
                _ => app.session.field_text(id, *field).unwrap_or_default(),
            };
            let style = if is_current {
                SELECTED_STYLE
            } else {
                Style::default()
            };
            Row::new(vec![field.label().to_string(), value]).style(style)
        })
        .collect();

    if let Some(element) = app.session.get(id) {
        if !element.custom_attributes.is_empty() {
            rows.push(
                Row::new(vec!["── Custom ──".to_string(), String::new()]).style(
                    Style::default()
                        .fg(BRAND_MUTED)
                        .add_modifier(Modifier::ITALIC),
                ),
            );
            rows.extend(
                element
                    .custom_attributes
                    .iter()
                    .map(|(k, v)| Row::new(vec![k.clone(), v.clone()])),
            );
        }
    }

    let widths = [Constraint::Percentage(40), Constraint::Percentage(60)];
    let header = Row::new(vec!["Property", "Value"]).style(HEADER_STYLE);
    let table = Table::new(rows, widths).header(header).block(
        Block::default()
            .title(format!(" Properties {id} "))
            .borders(Borders::ALL)
            .border_style(focus_border(app, FocusPanel::Properties)),
    );

    frame.render_widget(table, area);
}

fn draw_footer(frame: &mut Frame, area: Rect, help: &str, status: Option<&str>) {
    let line = match status {
        Some(status) => Line::from(vec![
            Span::styled(format!(" {status} "), Style::default().fg(BRAND_ORANGE)),
            Span::styled("|", Style::default().fg(BRAND_MUTED)),
            Span::styled(help.to_string(), Style::default().fg(BRAND_MUTED)),
        ]),
        None => Line::styled(help.to_string(), Style::default().fg(BRAND_MUTED)),
    };

    let footer = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
    frame.render_widget(footer, area);
}

fn draw_confirm_delete(frame: &mut Frame, app: &App) {
    let name = app
        .session
        .selected_element()
        .map(|e| e.name.clone())
        .unwrap_or_default();

    let [area] = Layout::horizontal([Constraint::Length(48)])
        .flex(Flex::Center)
        .areas(frame.area());
    let [area] = Layout::vertical([Constraint::Length(5)])
        .flex(Flex::Center)
        .areas(area);

    let dialog = Paragraph::new(vec![
        Line::from(format!("Really delete \"{name}\"?")),
        Line::from(""),
        Line::styled("y = delete, any other key = cancel", Style::default().fg(BRAND_MUTED)),
    ])
    .block(
        Block::default()
            .title(" Delete element ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(BRAND_ORANGE)),
    );

    frame.render_widget(Clear, area);
    frame.render_widget(dialog, area);
}
