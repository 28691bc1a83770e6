//! Static board evaluation.
//!
//! Each side has its own heuristic and each is optimistic about its own
//! prospects, so the two scores are not negations of each other. Both
//! return a score where positive favors the side asked about.

use crate::board::{Board, Cell, Position, Side};
use crate::constants::*;

/// Score `board` from `side`'s point of view.
pub fn evaluate(board: &Board, side: Side) -> i32 {
    match side {
        Side::Officer => evaluate_officer(board),
        Side::Rebel => evaluate_rebel(board),
    }
}

/// Officer heuristic: captures first, then fortress defense, centralization
/// and mobility.
pub fn evaluate_officer(board: &Board) -> i32 {
    let rebels = board.rebel_count();
    if rebels < MIN_REBELS {
        return WIN_SCORE;
    }

    let mut score = (REBELS_AT_START - rebels) as i32 * OFFICER_CAPTURE_REWARD;
    score -= board.rebels_in_fortress() as i32 * OFFICER_FORTRESS_PENALTY;

    let anchor = Position::from(OFFICER_ANCHOR);
    for officer in board.positions(Cell::Officer) {
        if DEFENSE_CELLS.contains(&(officer.row, officer.col)) {
            score += OFFICER_DEFENSE_REWARD;
        }
        score -= officer.manhattan(anchor) * OFFICER_DISTANCE_PENALTY;
        score += board.empty_neighbors(officer) as i32 * OFFICER_MOBILITY_REWARD;
    }
    score
}

/// Rebel heuristic: fortress occupation weighted by depth, approach to the
/// target cell, mutual support, Officer confinement, and head count.
pub fn evaluate_rebel(board: &Board) -> i32 {
    let rebels = board.rebel_count();
    if rebels < MIN_REBELS {
        return -WIN_SCORE;
    }

    let target = Position::from(REBEL_TARGET);
    let mut score = 0;
    for (pos, cell) in board.cells() {
        match cell {
            Cell::Rebel => {
                if pos.in_fortress() {
                    score += REBEL_FORTRESS_REWARD
                        + (FORTRESS_ROWS.1 - pos.row) * REBEL_FORTRESS_DEPTH_REWARD;
                }
                score -= pos.manhattan(target) * REBEL_DISTANCE_PENALTY;
                let support = ORTHOGONAL
                    .iter()
                    .filter(|&&(dr, dc)| board.get(pos.offset(dr, dc)) == Some(Cell::Rebel))
                    .count();
                score += support as i32 * REBEL_SUPPORT_REWARD;
            }
            Cell::Officer => {
                score -= REBEL_OFFICER_PENALTY;
                score -= board.empty_neighbors(pos) as i32 * REBEL_OFFICER_MOBILITY_PENALTY;
            }
            _ => {}
        }
    }
    score + rebels as i32 * REBEL_COUNT_REWARD
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(rows: [&str; 7]) -> Board {
        Board::from_rows(&rows).unwrap()
    }

    #[test]
    fn test_officer_prefers_captures() {
        let start = Board::new();
        let mut fewer = start;
        fewer.set(Position::new(6, 3), Cell::Empty);
        assert_eq!(
            evaluate_officer(&fewer) - evaluate_officer(&start),
            OFFICER_CAPTURE_REWARD
        );
    }

    #[test]
    fn test_officer_start_score() {
        // Two officers at (1,2),(1,4): distance 2 from (2,3) each; (1,2) has
        // empty neighbors (0,2),(0,3),(1,3),(2,2),(2,3) = 5, same for (1,4).
        let score = evaluate_officer(&Board::new());
        assert_eq!(score, 2 * (-20 + 5 * OFFICER_MOBILITY_REWARD));
    }

    #[test]
    fn test_rebel_fortress_depth() {
        let shallow = board([
            "  ...  ",
            "  ...  ",
            "...R...",
            "RRRRRRR",
            "RRRRRRR",
            "  O..  ",
            "  ...  ",
        ]);
        let deep = board([
            "  ...  ",
            "  .R.  ",
            ".......",
            "RRRRRRR",
            "RRRRRRR",
            "  O..  ",
            "  ...  ",
        ]);
        assert!(evaluate_rebel(&deep) > evaluate_rebel(&shallow));
    }

    #[test]
    fn test_decided_scores() {
        let eight = board([
            "  RRR  ",
            "  RRR  ",
            "..RR...",
            "...O...",
            ".......",
            "  ...  ",
            "  ...  ",
        ]);
        assert_eq!(evaluate(&eight, Side::Officer), WIN_SCORE);
        assert_eq!(evaluate(&eight, Side::Rebel), -WIN_SCORE);
    }

    #[test]
    fn test_rebel_likes_confined_officers() {
        let free = board([
            "  ...  ",
            "  ...  ",
            "...O...",
            ".......",
            "RRRRRRR",
            "  RRR  ",
            "  ...  ",
        ]);
        let boxed = board([
            "  ...  ",
            "  ...  ",
            ".......",
            ".......",
            "RRRRRRR",
            "  RRR  ",
            "  .O.  ",
        ]);
        assert!(evaluate_rebel(&boxed) > evaluate_rebel(&free));
    }
}
