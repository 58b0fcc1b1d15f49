//! Tic-tac-toe board carrier.
//!
//! Pure state: 3x3 grid, one sign per square, alternating turns. The
//! duel command keeps both players' `in_game` flags set while a board is
//! live and clears them on the terminal state.

/// A player's sign.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sign {
    X,
    O,
}

impl Sign {
    pub fn other(self) -> Self {
        match self {
            Sign::X => Sign::O,
            Sign::O => Sign::X,
        }
    }
}

/// Why a placement was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceError {
    OutOfBounds,
    Occupied,
    NotYourTurn,
    GameOver,
}

/// 3x3 board with alternating turns.
#[derive(Debug, Clone)]
pub struct Board {
    squares: [Option<Sign>; 9],
    turn: Sign,
}

impl Board {
    /// Fresh board; X moves first.
    pub fn new() -> Self {
        Self {
            squares: [None; 9],
            turn: Sign::X,
        }
    }

    pub fn turn(&self) -> Sign {
        self.turn
    }

    pub fn square(&self, row: usize, col: usize) -> Option<Sign> {
        self.squares.get(row * 3 + col).copied().flatten()
    }

    /// Places `sign` at `(row, col)`.
    ///
    /// The turn alternates only after a successful placement.
    pub fn place(&mut self, sign: Sign, row: usize, col: usize) -> Result<(), PlaceError> {
        if self.is_gameover() {
            return Err(PlaceError::GameOver);
        }
        if sign != self.turn {
            return Err(PlaceError::NotYourTurn);
        }
        if row > 2 || col > 2 {
            return Err(PlaceError::OutOfBounds);
        }

        let idx = row * 3 + col;
        if self.squares[idx].is_some() {
            return Err(PlaceError::Occupied);
        }

        self.squares[idx] = Some(sign);
        self.turn = self.turn.other();
        Ok(())
    }

    /// True iff some line holds three identical non-empty signs, or all
    /// squares are filled.
    pub fn is_gameover(&self) -> bool {
        self.winner().is_some() || self.squares.iter().all(|s| s.is_some())
    }

    /// The sign filling any complete row, column, or diagonal.
    pub fn winner(&self) -> Option<Sign> {
        const LINES: [[usize; 3]; 8] = [
            [0, 1, 2],
            [3, 4, 5],
            [6, 7, 8],
            [0, 3, 6],
            [1, 4, 7],
            [2, 5, 8],
            [0, 4, 8],
            [2, 4, 6],
        ];

        for line in LINES {
            if let Some(sign) = self.squares[line[0]] {
                if self.squares[line[1]] == Some(sign) && self.squares[line[2]] == Some(sign) {
                    return Some(sign);
                }
            }
        }
        None
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_win_is_detected() {
        let mut board = Board::new();
        board.place(Sign::X, 0, 0).unwrap();
        board.place(Sign::O, 1, 0).unwrap();
        board.place(Sign::X, 0, 1).unwrap();
        board.place(Sign::O, 1, 1).unwrap();
        board.place(Sign::X, 0, 2).unwrap();

        assert!(board.is_gameover());
        assert_eq!(board.winner(), Some(Sign::X));
    }

    #[test]
    fn diagonal_win_is_detected() {
        let mut board = Board::new();
        board.place(Sign::X, 0, 0).unwrap();
        board.place(Sign::O, 0, 1).unwrap();
        board.place(Sign::X, 1, 1).unwrap();
        board.place(Sign::O, 0, 2).unwrap();
        board.place(Sign::X, 2, 2).unwrap();

        assert_eq!(board.winner(), Some(Sign::X));
    }

    #[test]
    fn column_win_is_detected() {
        let mut board = Board::new();
        board.place(Sign::X, 0, 1).unwrap();
        board.place(Sign::O, 0, 0).unwrap();
        board.place(Sign::X, 1, 1).unwrap();
        board.place(Sign::O, 1, 0).unwrap();
        board.place(Sign::X, 2, 1).unwrap();

        assert_eq!(board.winner(), Some(Sign::X));
    }

    #[test]
    fn full_board_without_winner_is_a_draw() {
        let mut board = Board::new();
        // X O X / X O O / O X X leaves no complete line.
        let moves = [
            (Sign::X, 0, 0),
            (Sign::O, 0, 1),
            (Sign::X, 0, 2),
            (Sign::O, 1, 1),
            (Sign::X, 1, 0),
            (Sign::O, 1, 2),
            (Sign::X, 2, 1),
            (Sign::O, 2, 0),
            (Sign::X, 2, 2),
        ];
        for (sign, row, col) in moves {
            board.place(sign, row, col).unwrap();
        }

        assert!(board.is_gameover());
        assert_eq!(board.winner(), None);
    }

    #[test]
    fn in_progress_board_is_not_over() {
        let mut board = Board::new();
        board.place(Sign::X, 0, 0).unwrap();
        assert!(!board.is_gameover());
    }

    #[test]
    fn turn_alternates_only_on_success() {
        let mut board = Board::new();
        assert_eq!(board.turn(), Sign::X);

        board.place(Sign::X, 0, 0).unwrap();
        assert_eq!(board.turn(), Sign::O);

        // Occupied square: turn unchanged.
        assert_eq!(board.place(Sign::O, 0, 0), Err(PlaceError::Occupied));
        assert_eq!(board.turn(), Sign::O);

        // Out of turn: rejected.
        assert_eq!(board.place(Sign::X, 1, 1), Err(PlaceError::NotYourTurn));
    }

    #[test]
    fn no_placement_after_gameover() {
        let mut board = Board::new();
        board.place(Sign::X, 0, 0).unwrap();
        board.place(Sign::O, 1, 0).unwrap();
        board.place(Sign::X, 0, 1).unwrap();
        board.place(Sign::O, 1, 1).unwrap();
        board.place(Sign::X, 0, 2).unwrap();

        assert_eq!(board.place(Sign::O, 2, 2), Err(PlaceError::GameOver));
    }

    #[test]
    fn out_of_bounds_is_rejected() {
        let mut board = Board::new();
        assert_eq!(board.place(Sign::X, 3, 0), Err(PlaceError::OutOfBounds));
    }
}
