// tests/random_playout.rs
// Plays seeded random games through the click protocol and checks that the
// bookkeeping never drifts from the board.

use click_chess::attacks::is_checked;
use click_chess::{handle_click, legal_targets, ClickOutcome, Color, GameState, PieceKind, Square};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const MAX_PLIES: usize = 200;

fn kings(state: &GameState, color: Color) -> usize {
    state.board.pieces_of(color).filter(|(_, p)| p.kind == PieceKind::King).count()
}

fn playable(state: &GameState) -> Vec<(Square, Vec<Square>)> {
    state
        .board
        .pieces_of(state.active_color())
        .map(|(from, _)| (from, legal_targets(state, from).allowed()))
        .filter(|(_, targets)| !targets.is_empty())
        .collect()
}

fn play_random_game(seed: u64) {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut state = GameState::new();

    for ply in 0..MAX_PLIES {
        let before = state.board.clone();
        let choices = playable(&state);
        assert_eq!(state.board, before, "seed {} ply {}: probing changed the board", seed, ply);

        if state.is_over() {
            assert!(state.selectable_pieces().is_empty());
            return;
        }
        assert!(!choices.is_empty(), "seed {} ply {}: ongoing game without a legal move", seed, ply);

        let (from, targets) = &choices[rng.random_range(0..choices.len())];
        let to = targets[rng.random_range(0..targets.len())];
        let mover = state.active_color();

        handle_click(&mut state, *from).unwrap();
        let outcome = handle_click(&mut state, to).unwrap();
        assert!(matches!(outcome, ClickOutcome::Moved { .. }), "seed {}: {}-{} did not move", seed, from, to);

        for color in [Color::White, Color::Black] {
            assert_eq!(kings(&state, color), 1, "seed {} ply {}: {:?} king count", seed, ply, color);
            assert_eq!(
                state.player(color).pieces as usize,
                state.board.count(color),
                "seed {} ply {}: {:?} piece counter",
                seed,
                ply,
                color
            );
        }
        assert!(!is_checked(&state.board, mover), "seed {} ply {}: {:?} left its king attacked", seed, ply, mover);
        assert!(!state.player(mover).check);
        assert!(!state.player(mover).checkmate);
        assert_eq!(state.active_color(), mover.opponent());
        assert_eq!(state.player(mover.opponent()).check, is_checked(&state.board, mover.opponent()) && !state.player(mover.opponent()).checkmate);
    }
}

#[test]
fn random_games_keep_the_books_straight() {
    for seed in 0..8 {
        play_random_game(seed);
    }
}
