//! Character-cell screen composition
//!
//! Every screen is first laid out on a `Canvas` (a clipped grid of chars),
//! then blitted row by row. Layout stays free of terminal I/O.

use crate::consts::LEADERBOARD_TOP_N;
use crate::leaderboard::{Leaderboard, format_age};
use crate::platform::MatchView;
use crate::settings::Settings;
use crate::sim::{MatchOutcome, Side};

pub const WALL: char = '─';
pub const CENTER_LINE: char = '┊';
pub const PADDLE: char = '█';
pub const BALL: char = '●';

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Canvas {
    width: u16,
    height: u16,
    cells: Vec<char>,
}

impl Canvas {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            cells: vec![' '; width as usize * height as usize],
        }
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    /// Set one cell; writes outside the canvas are dropped
    pub fn put(&mut self, x: i32, y: i32, c: char) {
        if let Some(i) = self.index(x, y) {
            self.cells[i] = c;
        }
    }

    pub fn get(&self, x: i32, y: i32) -> Option<char> {
        self.index(x, y).map(|i| self.cells[i])
    }

    pub fn text(&mut self, x: i32, y: i32, s: &str) {
        for (i, c) in s.chars().enumerate() {
            self.put(x + i as i32, y, c);
        }
    }

    /// Text horizontally centered on row `y`
    pub fn centered(&mut self, y: i32, s: &str) {
        let len = s.chars().count() as i32;
        self.text((self.width as i32 - len) / 2, y, s);
    }

    pub fn hline(&mut self, x0: i32, x1: i32, y: i32, c: char) {
        for x in x0..=x1 {
            self.put(x, y, c);
        }
    }

    pub fn row(&self, y: u16) -> String {
        let start = y as usize * self.width as usize;
        self.cells[start..start + self.width as usize].iter().collect()
    }

    pub fn rows(&self) -> impl Iterator<Item = String> + '_ {
        (0..self.height).map(|y| self.row(y))
    }
}

/// Field, paddles, ball, score line and the pause banner
pub fn match_frame(view: &MatchView<'_>, width: u16, height: u16) -> Canvas {
    let mut canvas = Canvas::new(width, height);
    let world = view.world;
    let field = &world.field;

    canvas.hline(field.left, field.right, field.top, WALL);
    canvas.hline(field.left, field.right, field.bottom, WALL);
    for y in (field.top + 1)..field.bottom {
        if y % 2 == 0 {
            canvas.put(field.mid_x, y, CENTER_LINE);
        }
    }

    for side in Side::BOTH {
        let paddle = world.paddle(side);
        let half = paddle.half_len as i32;
        let cy = paddle.cell_y();
        for y in (cy - half)..=(cy + half) {
            canvas.put(paddle.lane, y, PADDLE);
        }
    }
    canvas.put(world.ball.cell_x(), world.ball.cell_y(), BALL);

    let score = format!(
        "{}  {:>2} : {:<2}  {}",
        view.names[0], world.score.left, world.score.right, view.names[1]
    );
    canvas.centered(0, &score);
    canvas.centered(1, &format!("first to {}", view.win_score));
    canvas.text(field.left, field.bottom + 1, "P pause  Q menu");

    if view.paused {
        let y = (field.top + field.bottom) / 2;
        canvas.centered(y - 1, "          ");
        canvas.centered(y, "  PAUSED  ");
        canvas.centered(y + 1, "          ");
    }
    canvas
}

/// Title plus a vertical list with a `>` cursor
pub fn menu(title: &str, items: &[&str], selected: usize, width: u16, height: u16) -> Canvas {
    let mut canvas = Canvas::new(width, height);
    let top = (height as i32 - items.len() as i32 * 2 - 4) / 2;
    canvas.centered(top, title);
    for (i, item) in items.iter().enumerate() {
        let label = if i == selected {
            format!("> {} <", item)
        } else {
            format!("  {}  ", item)
        };
        canvas.centered(top + 3 + i as i32 * 2, &label);
    }
    canvas.centered(height as i32 - 2, "Up/Down select   Enter confirm   Q back");
    canvas
}

pub fn name_prompt(prompt: &str, typed: &str, width: u16, height: u16) -> Canvas {
    let mut canvas = Canvas::new(width, height);
    let y = height as i32 / 2;
    canvas.centered(y - 2, prompt);
    canvas.centered(y, &format!("{}_", typed));
    canvas.centered(height as i32 - 2, "Enter confirm   Esc back");
    canvas
}

pub fn instructions(settings: &Settings, width: u16, height: u16) -> Canvas {
    let lines = [
        "INSTRUCTIONS".to_string(),
        String::new(),
        format!("First player to {} points wins.", settings.win_score),
        "Miss the ball and your opponent scores.".to_string(),
        String::new(),
        "Left paddle:   W / S".to_string(),
        "Right paddle:  Up / Down".to_string(),
        "Single player: W / S or Up / Down".to_string(),
        "Pause: P      Menu: Q      Quit: Ctrl-C".to_string(),
        String::new(),
        format!("Paddle model: {}", settings.motion.as_str()),
        String::new(),
        "Press any key".to_string(),
    ];
    let mut canvas = Canvas::new(width, height);
    let top = (height as i32 - lines.len() as i32) / 2;
    for (i, line) in lines.iter().enumerate() {
        canvas.centered(top + i as i32, line);
    }
    canvas
}

pub fn leaderboard(board: &Leaderboard, now: i64, width: u16, height: u16) -> Canvas {
    let mut canvas = Canvas::new(width, height);
    let top = (height as i32 - LEADERBOARD_TOP_N as i32 - 6) / 2;
    canvas.centered(top.max(0), "LEADERBOARD");

    if board.is_empty() {
        canvas.centered(height as i32 / 2, "No matches played yet");
    } else {
        let header = format!(
            "{:>2}  {:<14} {:^7} {:<14} {:<12}",
            "#", "Winner", "Score", "Loser", "When"
        );
        canvas.centered(top + 2, &header);
        for (i, entry) in board.top().iter().enumerate() {
            let line = format!(
                "{:>2}  {:<14} {:^7} {:<14} {:<12}",
                i + 1,
                truncate(&entry.winner, 14),
                format!("{}-{}", entry.winner_score, entry.loser_score),
                truncate(&entry.loser, 14),
                format_age(now, entry.timestamp)
            );
            canvas.centered(top + 3 + i as i32, &line);
        }
    }
    canvas.centered(height as i32 - 2, "Press any key");
    canvas
}

pub fn result(outcome: &MatchOutcome, width: u16, height: u16) -> Canvas {
    let mut canvas = Canvas::new(width, height);
    let y = height as i32 / 2;
    canvas.centered(y - 2, "GAME OVER");
    canvas.centered(
        y,
        &format!(
            "{} beats {} {}-{}",
            outcome.winner_name, outcome.loser_name, outcome.winner_score, outcome.loser_score
        ),
    );
    canvas.centered(y + 2, "Enter play again   Q menu");
    canvas
}

fn truncate(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::leaderboard::LeaderboardEntry;
    use crate::sim::{FieldGeometry, GameMode, World};
    use glam::Vec2;

    fn view_world() -> World {
        let settings = Settings::default();
        let mut world = World::new(
            FieldGeometry::from_viewport(80, 24),
            GameMode::PlayerVsPlayer,
            &settings,
            1,
        );
        world.ball.pos = Vec2::new(30.0, 7.0);
        world.score.left = 3;
        world.score.right = 5;
        world
    }

    #[test]
    fn test_canvas_clips() {
        let mut canvas = Canvas::new(4, 2);
        canvas.text(2, 0, "abcd");
        canvas.put(-1, 1, 'x');
        canvas.put(1, 5, 'x');
        assert_eq!(canvas.row(0), "  ab");
        assert_eq!(canvas.row(1), "    ");
    }

    #[test]
    fn test_match_frame_places_objects() {
        let world = view_world();
        let names = ["Ana".to_string(), "Bo".to_string()];
        let view = MatchView {
            world: &world,
            names: &names,
            paused: false,
            win_score: 7,
        };
        let canvas = match_frame(&view, 80, 24);

        assert_eq!(canvas.get(30, 7), Some(BALL));
        let left = world.paddle(Side::Left);
        assert_eq!(canvas.get(left.lane, left.cell_y()), Some(PADDLE));
        assert_eq!(canvas.get(left.lane, left.cell_y() + 2), Some(PADDLE));
        assert_eq!(canvas.get(left.lane, left.cell_y() + 3), Some(' '));
        assert_eq!(canvas.get(world.field.left, world.field.top), Some(WALL));
        assert_eq!(canvas.get(world.field.right, world.field.bottom), Some(WALL));

        let score_line = canvas.row(0);
        assert!(score_line.contains("Ana"));
        assert!(score_line.contains("3 : 5"));
        assert!(!canvas.rows().any(|r| r.contains("PAUSED")));
    }

    #[test]
    fn test_pause_banner() {
        let world = view_world();
        let names = GameMode::CpuVsCpu.default_names();
        let view = MatchView {
            world: &world,
            names: &names,
            paused: true,
            win_score: 7,
        };
        let canvas = match_frame(&view, 80, 24);
        assert!(canvas.rows().any(|r| r.contains("PAUSED")));
    }

    #[test]
    fn test_menu_marks_selection() {
        let canvas = menu("PONG", &["PLAY", "QUIT"], 1, 40, 12);
        assert!(canvas.rows().any(|r| r.contains("> QUIT <")));
        assert!(!canvas.rows().any(|r| r.contains("> PLAY <")));
    }

    #[test]
    fn test_leaderboard_rows_and_empty_state() {
        let empty = leaderboard(&Leaderboard::default(), 0, 80, 24);
        assert!(empty.rows().any(|r| r.contains("No matches played yet")));

        let board = Leaderboard::new(vec![LeaderboardEntry {
            winner: "Ana".into(),
            loser: "CPU".into(),
            winner_score: 7,
            loser_score: 2,
            timestamp: 1000,
        }]);
        let canvas = leaderboard(&board, 1000 + 3 * 86_400, 80, 24);
        let row = canvas.rows().find(|r| r.contains("Ana")).unwrap();
        assert!(row.contains("7-2"));
        assert!(row.contains("CPU"));
        assert!(row.contains("3 days ago"));
    }
}
