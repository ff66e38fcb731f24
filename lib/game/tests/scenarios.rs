//! # scenarios.rs
//!
//! End to end games on small hand-built boards.
//!
//! # Author
//! Alden Luthfi
//!
//! # Date
//! 18/10/2026

use game::{
    pos, seeded, Board, Bounds, Catalog, Game, GameStatus, LogEntry,
    MoveRequest, Orientation, ScriptedRolls,
};
use ntest::{assert_about_eq, timeout};

fn catalog(rules: &[(&str, &str)]) -> Catalog {
    let mut catalog = Catalog::default();
    for (piece_type, notation) in rules {
        catalog.register_notation(piece_type, notation).unwrap();
    }
    catalog
}

#[test]
#[timeout(1000)]
fn single_quiet_step() {
    let mut game = Game::new(
        Board::new(Bounds::default()),
        catalog(&[("pawn", "forward[1]=0.25")]),
        seeded(None),
    );
    let pawn = game.add_piece("pawn", pos!(3, 3), Orientation::Up);

    assert!(game.is_legal(pawn, pos!(3, 4)));
    let destinations = game.legal_destinations(pawn);
    assert_eq!(destinations.len(), 1);
    assert_eq!(destinations[0].position, pos!(3, 4));
    assert_about_eq!(destinations[0].probability, 0.25);

    assert!(game.move_piece(pawn, pos!(3, 4), None));
    assert_eq!(game.log().to_string(), "3,3:3,4::;");
    assert_eq!(game.board().tile_of(pawn), Some(pos!(3, 4)));
    assert_eq!(game.turn(), Orientation::Down);
}

#[test]
#[timeout(1000)]
fn knight_leg_through_an_intermediate_tile() {
    let mut game = Game::new(
        Board::new(Bounds::default()),
        catalog(&[("knight", "forward[2]:disabled>right[1]")]),
        seeded(None),
    );
    let knight = game.add_piece("knight", pos!(3, 0), Orientation::Up);
    game.add_piece("knight", pos!(3, 1), Orientation::Up);

    assert!(game.is_legal(knight, pos!(4, 2)));

    let piece = game.board().piece_by_id(knight);
    let rule = &game.catalog().rules_for("knight")[0];
    let walk = rule.trace(game.board(), piece, pos!(4, 2)).unwrap();
    assert!(walk.tiles().iter().any(|tile| tile.position == pos!(3, 2)));

    assert!(game.execute_token("3,0:4,2"));
    assert_eq!(game.board().tile_of(knight), Some(pos!(4, 2)));
}

#[test]
#[timeout(1000)]
fn charge_through_a_column() {
    let mut game = Game::new(
        Board::new(Bounds::default()),
        catalog(&[("lancer", "forward:all=1.0"), ("pawn", "forward[1]")]),
        seeded(Some(42)),
    );
    let lancer = game.add_piece("lancer", pos!(3, 0), Orientation::Up);
    let victims: Vec<_> = (1..=3)
        .map(|y| game.add_piece("pawn", pos!(3, y), Orientation::Down))
        .collect();

    assert!(game.execute_token("3,0:3,4"));

    let Some(LogEntry::Move(record)) = game.log().last() else {
        panic!("expected a move record");
    };
    assert_eq!(record.casualties, victims);
    assert_eq!(game.board().tile_of(lancer), Some(pos!(3, 4)));
    for victim in victims {
        assert!(game.board().piece_by_id(victim).is_dead());
    }
    game.board().verify();
}

fn shuffling_rooks() -> Game<ScriptedRolls> {
    let mut game = Game::new(
        Board::new(Bounds::default()),
        catalog(&[("rook", "forward[1]|backward[1]")]),
        ScriptedRolls::new([0.0]),
    );
    game.add_piece("rook", pos!(0, 0), Orientation::Up);
    game.add_piece("rook", pos!(7, 7), Orientation::Down);
    game
}

fn shuffle(game: &mut Game<ScriptedRolls>, half_moves: usize) {
    let tokens = ["0,0:0,1", "7,7:7,6", "0,1:0,0", "7,6:7,7"];
    for token in tokens.iter().cycle().take(half_moves) {
        assert!(game.execute_token(token), "{token} was refused");
    }
}

#[test]
#[timeout(5000)]
fn seventy_quiet_moves_end_in_a_draw() {
    let mut game = shuffling_rooks();
    shuffle(&mut game, 140);
    assert_eq!(game.log().quiet_moves(), 140);

    assert!(game.execute(MoveRequest::OfferDraw));
    assert_eq!(game.status(), GameStatus::Drawn);
    assert!(!game.draw_pending());
    assert_eq!(game.log().last(), Some(&LogEntry::Draw));
    assert!(game.log().to_string().ends_with(";draw;"));

    assert!(!game.execute(MoveRequest::AcceptDraw));
    assert!(!game.execute(MoveRequest::RejectDraw));
    assert!(!game.execute_token("0,0:0,1"));
    assert_eq!(game.winner(), 0);
}

#[test]
#[timeout(5000)]
fn a_shorter_quiet_run_only_offers() {
    let mut game = shuffling_rooks();
    shuffle(&mut game, 139);

    assert!(game.execute(MoveRequest::OfferDraw));
    assert!(game.draw_pending());
    assert!(game.execute(MoveRequest::AcceptDraw));
    assert_eq!(game.status(), GameStatus::Drawn);
}

#[test]
#[timeout(1000)]
fn killing_the_king_ends_the_game() {
    let mut game = Game::new(
        Board::new(Bounds::default()),
        catalog(&[
            ("queen", "forward|backward|left|right"),
            ("king", "forward[1]|backward[1]|left[1]|right[1]"),
        ]),
        ScriptedRolls::new([0.0]),
    );
    game.add_piece("queen", pos!(4, 0), Orientation::Up);
    let king = game.add_piece("king", pos!(4, 5), Orientation::Down);
    game.add_piece("king", pos!(0, 0), Orientation::Up);
    let rook = game.add_piece("queen", pos!(7, 7), Orientation::Down);

    assert!(game.execute_token("4,0:4,5"));
    assert!(game.board().piece_by_id(king).is_dead());
    assert_eq!(game.log().to_string(), "4,0:4,5:1:won;");
    assert_eq!(game.winner(), 1);

    assert!(!game.move_piece(rook, pos!(7, 6), None));
    assert!(!game.execute_token("0,0:0,1"));
    assert!(!game.execute(MoveRequest::OfferDraw));
    assert_eq!(game.log().len(), 1);
}
