#![warn(clippy::all, clippy::pedantic)]
#![allow(
    // Board coordinates are small and validated before casting
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use crate::app::Hud;
use crate::components::{CellColor, Piece};
use crate::game::{PREVIEW_OFFSET, PREVIEW_SIZE};
use crate::systems::Snapshot;

// Each cell is 2 characters wide and 1 tall so blocks look roughly square
const CELL_WIDTH: u16 = 2;
const INFO_WIDTH: u16 = 22;

/// Terminal size needed for a board of the given dimensions, borders and
/// side panel included.
#[must_use]
pub fn required_size(board_width: usize, board_height: usize) -> (u16, u16) {
    let (board_cols, board_rows) = board_area_size(board_width, board_height);
    (
        board_cols.saturating_add(INFO_WIDTH),
        board_rows.saturating_add(2),
    )
}

// Bordered board size; saturates so oversized boards just never fit
fn board_area_size(board_width: usize, board_height: usize) -> (u16, u16) {
    let cols = u16::try_from(board_width)
        .unwrap_or(u16::MAX)
        .saturating_mul(CELL_WIDTH)
        .saturating_add(2);
    let rows = u16::try_from(board_height)
        .unwrap_or(u16::MAX)
        .saturating_add(2);
    (cols, rows)
}

pub fn render(f: &mut Frame, snapshot: &Snapshot, hud: &Hud) {
    let (min_width, min_height) = required_size(snapshot.board.width, snapshot.board.height);

    // Check if the terminal is too small to render the game properly
    if f.area().width < min_width || f.area().height < min_height {
        let warning_text = Paragraph::new(format!(
            "Terminal too small!\nNeed {min_width}x{min_height}, have {}x{}.",
            f.area().width,
            f.area().height
        ))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title("Blockfall"));

        let warning_area = centered_rect(60, 40, f.area());
        f.render_widget(warning_text, warning_area);
        return;
    }

    let (board_cols, board_rows) = board_area_size(snapshot.board.width, snapshot.board.height);

    let main_layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(board_cols), Constraint::Min(INFO_WIDTH)])
        .split(f.area());

    let game_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),          // Title
            Constraint::Length(board_rows), // Game board
            Constraint::Min(0),
        ])
        .split(main_layout[0]);

    let info_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),                       // Title
            Constraint::Length(2),                       // Score
            Constraint::Length(PREVIEW_SIZE as u16 + 2), // Next piece
            Constraint::Min(6),                          // Controls
        ])
        .split(main_layout[1]);

    let title = Paragraph::new("BLOCKFALL")
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::BOTTOM));
    f.render_widget(title, game_layout[0]);

    render_board(f, snapshot, game_layout[1]);

    let info_title = Paragraph::new("INFO")
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::BOTTOM));
    f.render_widget(info_title, info_layout[0]);

    render_score(f, hud, info_layout[1]);
    render_next_piece(f, &snapshot.next, info_layout[2]);

    let controls = Paragraph::new(
        "Controls:\n\
        ←/→: Move left/right\n\
        ↓: Soft drop\n\
        ↑: Rotate\n\
        Space: Hard drop\n\
        Q: Quit\n\
        ",
    )
    .block(Block::default().borders(Borders::TOP))
    .wrap(Wrap { trim: true });
    f.render_widget(controls, info_layout[3]);

    if let Some(final_score) = hud.game_over_notice {
        render_game_over(f, final_score, game_layout[1]);
    }
}

/// The score display.
pub fn render_score(f: &mut Frame, hud: &Hud, area: Rect) {
    let score = Paragraph::new(format!("Score: {}", hud.score))
        .style(Style::default().add_modifier(Modifier::BOLD));
    f.render_widget(score, area);
}

fn render_board(f: &mut Frame, snapshot: &Snapshot, area: Rect) {
    let block = Block::default().borders(Borders::ALL);
    let inner_area = block.inner(area);
    f.render_widget(block, area);

    for (y, row) in snapshot.board.rows().enumerate() {
        for (x, cell) in row.iter().enumerate() {
            if let Some(color) = cell {
                draw_cell(f.buffer_mut(), inner_area, x as u16, y as u16, *color);
            }
        }
    }

    if let Some((piece, position)) = &snapshot.current {
        for (dx, dy) in piece.shape.occupied_cells() {
            let x = position.x + dx as i32;
            let y = position.y + dy as i32;
            if x >= 0 && y >= 0 {
                draw_cell(f.buffer_mut(), inner_area, x as u16, y as u16, piece.color);
            }
        }
    }
}

/// Next-piece preview: a 4x4 area with the piece one cell in from the corner.
pub fn render_next_piece(f: &mut Frame, piece: &Piece, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title("Next");
    let preview_area = Rect {
        x: area.x,
        y: area.y,
        width: (PREVIEW_SIZE as u16 * CELL_WIDTH + 2).min(area.width),
        height: (PREVIEW_SIZE as u16 + 2).min(area.height),
    };
    let inner_area = block.inner(preview_area);
    f.render_widget(block, preview_area);

    for (dx, dy) in piece.shape.occupied_cells() {
        draw_cell(
            f.buffer_mut(),
            inner_area,
            (dx + PREVIEW_OFFSET) as u16,
            (dy + PREVIEW_OFFSET) as u16,
            piece.color,
        );
    }
}

fn render_game_over(f: &mut Frame, final_score: u32, board_area: Rect) {
    let popup_area = centered_rect(90, 30, board_area);
    let popup = Paragraph::new(format!(
        "Game Over!\nScore: {final_score}\n\nEnter to play again"
    ))
    .alignment(Alignment::Center)
    .style(Style::default().fg(Color::Red).add_modifier(Modifier::BOLD))
    .block(Block::default().borders(Borders::ALL));

    f.render_widget(Clear, popup_area);
    f.render_widget(popup, popup_area);
}

// Cells outside `area` are skipped
fn draw_cell(buf: &mut Buffer, area: Rect, x: u16, y: u16, color: CellColor) {
    let block_x = area.left() + x * CELL_WIDTH;
    let block_y = area.top() + y;
    if block_y >= area.bottom() {
        return;
    }

    for offset in 0..CELL_WIDTH {
        let cell_x = block_x + offset;
        if cell_x >= area.right() {
            break;
        }
        if let Some(cell) = buf.cell_mut((cell_x, block_y)) {
            cell.set_symbol("█");
            cell.set_fg(color.to_color());
            cell.set_bg(Color::Black);
        }
    }
}

/// Helper function to create a centered rect using up certain percentage of the available rect
#[must_use]
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
