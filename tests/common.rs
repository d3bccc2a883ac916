//! Shared helpers for the integration tests.

use bandit_ttt::{Board, Player, StateKey};
use rand::{Rng, prelude::IndexedRandom, rngs::StdRng};

/// Play uniformly random legal moves until the game is decided.
///
/// Returns the board and the `(player, position)` sequence played.
pub fn random_game(rng: &mut StdRng, starter: Player) -> (Board, Vec<(Player, usize)>) {
    let mut board = Board::new();
    let mut to_move = starter;
    let mut moves = Vec::new();
    while !board.result().is_decided() {
        let empty = board.empty_positions();
        let &pos = empty.choose(rng).expect("undecided board has an empty cell");
        let status = board
            .apply_move(to_move, pos / 3, pos % 3)
            .expect("random legal move should apply");
        assert!(status.is_applied());
        moves.push((to_move, pos));
        to_move = to_move.opponent();
    }
    (board, moves)
}

/// Encode cells by hand: '0'/'1' for owners, '2' for empty.
pub fn direct_encoding(board: &Board) -> String {
    (0..3)
        .flat_map(|row| (0..3).map(move |col| (row, col)))
        .map(|(row, col)| {
            match board.cell(row, col).expect("in-bounds cell").to_player() {
                Some(Player::Zero) => '0',
                Some(Player::One) => '1',
                None => '2',
            }
        })
        .collect()
}

/// A random key, not necessarily reachable in play.
pub fn random_key(rng: &mut StdRng) -> StateKey {
    let text: String = (0..9)
        .map(|_| char::from(b'0' + rng.random_range(0..3u8)))
        .collect();
    StateKey::parse(&text).expect("digits 0-2 form a valid key")
}
