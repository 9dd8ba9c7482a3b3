//! Adversarial search engine: tic-tac-toe board and a minimax opponent
//!
//! The search is a pure function over board values. The board is small
//! enough (9 cells) that the full tree is recomputed on every reply.

use serde::{Deserialize, Serialize};

use super::event::GameEvent;

pub const CELLS: usize = 9;

/// Value of a won terminal position for the searching side
pub const WIN_VALUE: i32 = 10;

/// All winning lines: rows, columns, diagonals
pub const LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mark {
    X,
    O,
}

impl Mark {
    pub fn opponent(self) -> Mark {
        match self {
            Mark::X => Mark::O,
            Mark::O => Mark::X,
        }
    }
}

/// Terminal board condition. A board holds at most one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Terminal {
    Win { mark: Mark, line: [usize; 3] },
    Draw,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Board {
    cells: [Option<Mark>; CELLS],
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cells(&self) -> &[Option<Mark>; CELLS] {
        &self.cells
    }

    pub fn get(&self, index: usize) -> Option<Mark> {
        self.cells.get(index).copied().flatten()
    }

    /// In range and empty
    pub fn is_legal(&self, index: usize) -> bool {
        index < CELLS && self.cells[index].is_none()
    }

    /// Empty cells in ascending index order
    pub fn legal_moves(&self) -> impl Iterator<Item = usize> + '_ {
        (0..CELLS).filter(|&i| self.cells[i].is_none())
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(Option::is_some)
    }

    /// Side to move when X always opens
    pub fn to_move(&self) -> Mark {
        let xs = self.cells.iter().filter(|c| **c == Some(Mark::X)).count();
        let os = self.cells.iter().filter(|c| **c == Some(Mark::O)).count();
        if xs > os { Mark::O } else { Mark::X }
    }

    /// Place `mark` at `index`. Returns false (board untouched) if the move
    /// is illegal.
    pub fn place(&mut self, index: usize, mark: Mark) -> bool {
        if !self.is_legal(index) {
            return false;
        }
        self.cells[index] = Some(mark);
        true
    }

    /// Copy of the board with one more mark; `index` must be legal
    pub fn with_move(&self, index: usize, mark: Mark) -> Board {
        let mut next = *self;
        next.cells[index] = Some(mark);
        next
    }

    /// First completed line in `LINES` order
    pub fn winner(&self) -> Option<(Mark, [usize; 3])> {
        LINES.iter().find_map(|&line| {
            let [a, b, c] = line;
            match self.cells[a] {
                Some(mark) if self.cells[b] == Some(mark) && self.cells[c] == Some(mark) => {
                    Some((mark, line))
                }
                _ => None,
            }
        })
    }

    /// A completed line wins even on a full board
    pub fn terminal(&self) -> Option<Terminal> {
        if let Some((mark, line)) = self.winner() {
            Some(Terminal::Win { mark, line })
        } else if self.is_full() {
            Some(Terminal::Draw)
        } else {
            None
        }
    }
}

/// Exhaustive minimax value of `board` for `me`, with `to_move` about to play.
/// `+WIN_VALUE` for a win, `-WIN_VALUE` for a loss, 0 for a draw.
pub fn minimax(board: &Board, to_move: Mark, me: Mark) -> i32 {
    match board.terminal() {
        Some(Terminal::Win { mark, .. }) => {
            return if mark == me { WIN_VALUE } else { -WIN_VALUE };
        }
        Some(Terminal::Draw) => return 0,
        None => {}
    }

    let values = board
        .legal_moves()
        .map(|i| minimax(&board.with_move(i, to_move), to_move.opponent(), me));
    let best = if to_move == me { values.max() } else { values.min() };
    best.unwrap_or(0)
}

/// Optimal move for `me`; ties go to the lowest index
pub fn best_move(board: &Board, me: Mark) -> Option<usize> {
    let mut best: Option<(usize, i32)> = None;
    for i in board.legal_moves() {
        let value = minimax(&board.with_move(i, me), me.opponent(), me);
        if best.is_none_or(|(_, v)| value > v) {
            best = Some((i, value));
        }
    }
    best.map(|(i, _)| i)
}

fn completes_line(board: &Board, index: usize, mark: Mark) -> bool {
    board
        .with_move(index, mark)
        .winner()
        .is_some_and(|(winner, _)| winner == mark)
}

/// Deliberately weak move for `me`: the first legal move that neither wins
/// nor blocks an immediate win of the opponent, else the first legal move
pub fn sandbag_move(board: &Board, me: Mark) -> Option<usize> {
    board
        .legal_moves()
        .find(|&i| !completes_line(board, i, me) && !completes_line(board, i, me.opponent()))
        .or_else(|| board.legal_moves().next())
}

/// Reply selection under the current policy
pub fn choose_move(board: &Board, me: Mark, privileged: bool) -> Option<usize> {
    if privileged {
        sandbag_move(board, me)
    } else {
        best_move(board, me)
    }
}

/// Tic-tac-toe tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TicTacToeConfig {
    /// Delay before the opponent replies (seconds)
    pub reply_delay_secs: f32,
    /// Points for a player win
    pub win_points: u32,
}

impl Default for TicTacToeConfig {
    fn default() -> Self {
        Self {
            reply_delay_secs: 0.5,
            win_points: 1,
        }
    }
}

/// Player (X) vs. search opponent (O)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicTacToeState {
    pub board: Board,
    /// Set after a player move until the opponent has replied
    pub awaiting_reply: bool,
    /// Winning line once the game is decided by a line
    pub winning_line: Option<[usize; 3]>,
}

impl TicTacToeState {
    pub const PLAYER: Mark = Mark::X;
    pub const OPPONENT: Mark = Mark::O;

    pub fn new() -> Self {
        Self {
            board: Board::new(),
            awaiting_reply: false,
            winning_line: None,
        }
    }

    pub fn is_over(&self) -> bool {
        self.board.terminal().is_some()
    }

    /// Player move at `index`. `None` when ignored (occupied, out of
    /// range, opponent to move, or game already decided).
    pub fn player_move(&mut self, index: usize, config: &TicTacToeConfig) -> Option<Vec<GameEvent>> {
        if self.awaiting_reply || self.is_over() || !self.board.place(index, Self::PLAYER) {
            return None;
        }
        let events = self.settle(config);
        if events.is_empty() {
            self.awaiting_reply = true;
        }
        Some(events)
    }

    /// Opponent reply; no-op unless a reply is pending
    pub fn opponent_reply(&mut self, config: &TicTacToeConfig, privileged: bool) -> Vec<GameEvent> {
        if !self.awaiting_reply {
            return Vec::new();
        }
        self.awaiting_reply = false;
        match choose_move(&self.board, Self::OPPONENT, privileged) {
            Some(index) => {
                self.board.place(index, Self::OPPONENT);
                self.settle(config)
            }
            None => Vec::new(),
        }
    }

    /// Events for the board's terminal condition, checked after every placement
    fn settle(&mut self, config: &TicTacToeConfig) -> Vec<GameEvent> {
        match self.board.terminal() {
            Some(Terminal::Win { mark, line }) => {
                self.winning_line = Some(line);
                if mark == Self::PLAYER {
                    vec![GameEvent::Scored(config.win_points), GameEvent::Won]
                } else {
                    vec![GameEvent::Lost]
                }
            }
            Some(Terminal::Draw) => vec![GameEvent::Draw],
            None => Vec::new(),
        }
    }
}

impl Default for TicTacToeState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn board(marks: &str) -> Board {
        let mut b = Board::new();
        for (i, c) in marks.chars().enumerate() {
            match c {
                'X' => b.cells[i] = Some(Mark::X),
                'O' => b.cells[i] = Some(Mark::O),
                _ => {}
            }
        }
        b
    }

    /// Every non-terminal position reachable from the empty board with X first
    fn reachable_open_positions() -> Vec<Board> {
        let mut seen = HashSet::new();
        let mut open = Vec::new();
        let mut stack = vec![Board::new()];
        while let Some(b) = stack.pop() {
            if !seen.insert(b) || b.terminal().is_some() {
                continue;
            }
            open.push(b);
            let side = b.to_move();
            for i in b.legal_moves() {
                stack.push(b.with_move(i, side));
            }
        }
        open
    }

    #[test]
    fn test_terminal_detection() {
        assert_eq!(board("XXX OO   ").terminal(), Some(Terminal::Win { mark: Mark::X, line: [0, 1, 2] }));
        assert_eq!(board("XOXXOOOXX").terminal(), Some(Terminal::Draw));
        assert_eq!(board("X O      ").terminal(), None);
        // Last move completes a line on a full board: win, not draw
        assert_eq!(
            board("XOXOXOOXX").terminal(),
            Some(Terminal::Win { mark: Mark::X, line: [0, 4, 8] })
        );
    }

    #[test]
    fn test_place_rejects_illegal() {
        let mut b = board("X        ");
        assert!(!b.place(0, Mark::O));
        assert!(!b.place(9, Mark::O));
        assert_eq!(b, board("X        "));
        assert!(b.place(4, Mark::O));
    }

    #[test]
    fn test_blocks_immediate_threat() {
        // X opened at 0, O took 2, X took 4: O must block the diagonal at 8
        let b = board("X O X    ");
        assert_eq!(b.to_move(), Mark::O);
        assert_eq!(best_move(&b, Mark::O), Some(8));
    }

    #[test]
    fn test_takes_immediate_win() {
        let b = board("OO XX X  ");
        assert_eq!(b.to_move(), Mark::O);
        assert_eq!(best_move(&b, Mark::O), Some(2));
    }

    #[test]
    fn test_lost_position_still_returns_legal_move() {
        // Both diagonal and fork threats: every reply loses
        let b = board("X   X    ");
        let m = best_move(&b, Mark::O).unwrap();
        assert!(b.is_legal(m));
        assert_eq!(minimax(&b, Mark::O, Mark::O), -WIN_VALUE);
    }

    #[test]
    fn test_empty_board_value_is_draw() {
        assert_eq!(minimax(&Board::new(), Mark::X, Mark::X), 0);
        // Ties break to the lowest index
        assert_eq!(best_move(&Board::new(), Mark::X), Some(0));
    }

    #[test]
    fn test_no_moves_on_terminal_board() {
        assert_eq!(best_move(&board("XOXXOOOXX"), Mark::X), None);
        assert_eq!(sandbag_move(&board("XOXXOOOXX"), Mark::X), None);
    }

    #[test]
    fn test_reachable_position_count() {
        assert_eq!(reachable_open_positions().len(), 4520);
    }

    #[test]
    fn test_self_play_never_loses_a_holdable_position() {
        for start in reachable_open_positions() {
            let mover = start.to_move();
            let value = minimax(&start, mover, mover);

            let mut b = start;
            let mut side = mover;
            while b.terminal().is_none() {
                let m = best_move(&b, side).unwrap();
                b = b.with_move(m, side);
                side = side.opponent();
            }
            let result = match b.terminal() {
                Some(Terminal::Win { mark, .. }) if mark == mover => WIN_VALUE,
                Some(Terminal::Win { .. }) => -WIN_VALUE,
                _ => 0,
            };
            if value >= 0 {
                assert!(result >= 0, "mover {mover:?} lost from {start:?}");
            }
            assert_eq!(result, value, "self-play from {start:?}");
        }
    }

    #[test]
    fn test_sandbag_avoids_win_and_block_when_possible() {
        for b in reachable_open_positions() {
            let me = b.to_move();
            let safe: Vec<usize> = b
                .legal_moves()
                .filter(|&i| !completes_line(&b, i, me) && !completes_line(&b, i, me.opponent()))
                .collect();
            let m = sandbag_move(&b, me).unwrap();
            match safe.first() {
                Some(&first) => assert_eq!(m, first),
                None => assert_eq!(Some(m), b.legal_moves().next()),
            }
        }
    }

    #[test]
    fn test_sandbag_ignores_threat() {
        // O could block at 8 but plays elsewhere
        let b = board("X O X    ");
        assert_eq!(best_move(&b, Mark::O), Some(8));
        let m = sandbag_move(&b, Mark::O).unwrap();
        assert_ne!(m, 8);
        assert_eq!(m, 1);
        assert_eq!(choose_move(&b, Mark::O, true), Some(1));
        assert_eq!(choose_move(&b, Mark::O, false), Some(8));
    }

    #[test]
    fn test_player_move_then_reply() {
        let config = TicTacToeConfig::default();
        let mut game = TicTacToeState::new();
        assert_eq!(game.player_move(4, &config), Some(vec![]));
        assert!(game.awaiting_reply);
        // Opponent to move: player input ignored
        assert_eq!(game.player_move(0, &config), None);
        assert!(game.opponent_reply(&config, false).is_empty());
        assert!(!game.awaiting_reply);
        assert_eq!(game.board.cells().iter().flatten().count(), 2);
        assert_eq!(game.player_move(4, &config), None);
    }

    #[test]
    fn test_player_win_scores() {
        let config = TicTacToeConfig::default();
        let mut game = TicTacToeState::new();
        game.board = board("XX OO    ");
        let events = game.player_move(2, &config).unwrap();
        assert_eq!(events, vec![GameEvent::Scored(1), GameEvent::Won]);
        assert_eq!(game.winning_line, Some([0, 1, 2]));
        assert!(!game.awaiting_reply);
        assert_eq!(game.player_move(8, &config), None);
    }

    #[test]
    fn test_opponent_win_and_draw() {
        let config = TicTacToeConfig::default();
        let mut game = TicTacToeState::new();
        game.board = board("OO XX    ");
        game.player_move(6, &config);
        assert_eq!(game.opponent_reply(&config, false), vec![GameEvent::Lost]);

        let mut game = TicTacToeState::new();
        game.board = board("XOXXOOOX ");
        assert_eq!(game.player_move(8, &config), Some(vec![GameEvent::Draw]));
    }
}
