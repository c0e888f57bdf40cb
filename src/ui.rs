use crate::consts;
use crate::engine::{Cell, Direction, Phase, Snapshot};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Flex, Layout, Margin, Rect, Size},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Widget},
};

/// Width of the widest line of text that [`BoardView`] draws
const TEXT_WIDTH: u16 = 32;

/// Draws a [`Snapshot`]: a score bar, the board, and two lines of messages
/// below it
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct BoardView<'a>(pub(crate) &'a Snapshot);

impl BoardView<'_> {
    /// The size of the area the view needs in order to be drawn completely
    pub(crate) fn size(&self) -> Size {
        let board = board_size(self.0);
        Size {
            width: board.width.max(TEXT_WIDTH),
            height: board.height.saturating_add(3),
        }
    }

    /// Return a rectangle of [`BoardView::size()`] centered in `area`
    pub(crate) fn centered_in(&self, area: Rect) -> Rect {
        let size = self.size();
        let [area] = Layout::horizontal([size.width])
            .flex(Flex::Center)
            .areas(area);
        let [area] = Layout::vertical([size.height])
            .flex(Flex::Center)
            .areas(area);
        area
    }
}

fn board_size(snapshot: &Snapshot) -> Size {
    Size {
        width: snapshot.bounds.width.saturating_add(2),
        height: snapshot.bounds.height.saturating_add(2),
    }
}

impl Widget for BoardView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let snapshot = self.0;
        let board = board_size(snapshot);
        let [score_area, board_row, msg1_area, msg2_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(board.height),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .flex(Flex::Start)
        .areas(area);
        Line::styled(
            format!(
                " Score: {}  Highscore: {}",
                snapshot.score, snapshot.highscore
            ),
            consts::SCORE_BAR_STYLE,
        )
        .render(score_area, buf);

        let [block_area] = Layout::horizontal([Constraint::Length(board.width)])
            .flex(Flex::Start)
            .areas(board_row);
        Block::bordered().render(block_area, buf);
        let mut canvas = Canvas {
            area: block_area.inner(Margin::new(1, 1)),
            buf,
        };
        for row in 0..snapshot.bounds.height {
            for col in 0..snapshot.bounds.width {
                canvas.draw_char(Cell { row, col }, consts::EMPTY_SYMBOL);
            }
        }
        if let Some(food) = snapshot.food {
            canvas.draw_cell(food, consts::FOOD_SYMBOL, consts::FOOD_STYLE);
        }
        for seg in snapshot.segments.iter().skip(1) {
            canvas.draw_cell(seg.position, consts::WORM_BODY_SYMBOL, consts::WORM_STYLE);
        }
        // Draw the head last so that, if it's a collision, we overwrite
        // whatever it's colliding with
        if let Some(head) = snapshot.segments.first() {
            if snapshot.phase == Phase::GameOver {
                canvas.draw_cell(
                    head.position,
                    consts::COLLISION_SYMBOL,
                    consts::COLLISION_STYLE,
                );
            } else {
                canvas.draw_cell(
                    head.position,
                    head_symbol(head.last_direction),
                    consts::WORM_STYLE,
                );
            }
        }

        match snapshot.phase {
            Phase::Running => {
                Line::from(format!(
                    " Time: {:.1}s  Moves: {}",
                    snapshot.elapsed.as_secs_f64(),
                    snapshot.ticks
                ))
                .render(msg1_area, buf);
                Line::from(" Move with w/a/s/d or arrow keys").render(msg2_area, buf);
            }
            Phase::Paused => {
                Span::from(" — PAUSED: Quit the game? —").render(msg1_area, buf);
                key_prompt([("Quit", "y"), ("Keep playing", "n")]).render(msg2_area, buf);
            }
            Phase::Idle => key_prompt([("Start", "r"), ("Quit", "q")]).render(msg2_area, buf),
            Phase::GameOver | Phase::BoardFull => {
                let msg = if snapshot.phase == Phase::GameOver {
                    " — GAME OVER —"
                } else {
                    " — BOARD FULL: YOU WIN —"
                };
                Span::from(msg).render(msg1_area, buf);
                key_prompt([("Play again", "r"), ("Quit", "q")]).render(msg2_area, buf);
            }
        }
    }
}

/// A line offering two choices, each as a label followed by its key
fn key_prompt<'a>([(label1, key1), (label2, key2)]: [(&'a str, &'a str); 2]) -> Line<'a> {
    Line::from_iter([
        Span::raw(" "),
        Span::raw(label1),
        Span::raw(" ("),
        Span::styled(key1, consts::KEY_STYLE),
        Span::raw(") — "),
        Span::raw(label2),
        Span::raw(" ("),
        Span::styled(key2, consts::KEY_STYLE),
        Span::raw(")"),
    ])
}

fn head_symbol(direction: Direction) -> char {
    match direction {
        Direction::Up => consts::WORM_HEAD_UP_SYMBOL,
        Direction::Down => consts::WORM_HEAD_DOWN_SYMBOL,
        Direction::Left => consts::WORM_HEAD_LEFT_SYMBOL,
        Direction::Right => consts::WORM_HEAD_RIGHT_SYMBOL,
    }
}

/// Draws on the cells of the board inside `area`
#[derive(Debug, Eq, PartialEq)]
struct Canvas<'a> {
    area: Rect,
    buf: &'a mut Buffer,
}

impl Canvas<'_> {
    fn locate(&self, cell: Cell) -> Option<(u16, u16)> {
        if cell.col >= self.area.width || cell.row >= self.area.height {
            return None;
        }
        Some((self.area.x + cell.col, self.area.y + cell.row))
    }

    fn draw_char(&mut self, cell: Cell, symbol: char) {
        let Some(pos) = self.locate(cell) else {
            return;
        };
        if let Some(c) = self.buf.cell_mut(pos) {
            c.set_char(symbol);
        }
    }

    fn draw_cell(&mut self, cell: Cell, symbol: char, style: Style) {
        let Some(pos) = self.locate(cell) else {
            return;
        };
        if let Some(c) = self.buf.cell_mut(pos) {
            c.set_char(symbol);
            c.set_style(Style::reset().patch(style));
        }
    }
}
