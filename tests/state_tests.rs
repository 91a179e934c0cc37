use solo_chess::board::{aligned_diagonal, aligned_horizontal, aligned_vertical};
use solo_chess::{
    Capture, Heuristic, Piece, PieceKind, Placement, Square, State, DEFAULT_CAPTURE_BUDGET,
};

fn sq(x: i32, y: i32) -> Square {
    Square::new(x, y)
}

fn pawn(id: u32) -> Piece {
    Piece::new(id, PieceKind::Pawn)
}

#[test]
fn test_vertical_alignment() {
    let occupied = [sq(1, 1), sq(1, 2), sq(1, 3)];

    // Adjacent on the same column, symmetric.
    assert!(aligned_vertical(sq(1, 1), sq(1, 2), &occupied));
    assert!(aligned_vertical(sq(1, 2), sq(1, 1), &occupied));

    // Piece in between.
    assert!(!aligned_vertical(sq(1, 1), sq(1, 3), &occupied));
    assert!(!aligned_vertical(sq(1, 3), sq(1, 1), &occupied));

    // Different columns.
    assert!(!aligned_vertical(sq(1, 1), sq(2, 2), &occupied));
}

#[test]
fn test_horizontal_alignment() {
    let occupied = [sq(1, 1), sq(2, 1), sq(3, 1)];

    assert!(aligned_horizontal(sq(1, 1), sq(2, 1), &occupied));
    assert!(aligned_horizontal(sq(2, 1), sq(1, 1), &occupied));

    assert!(!aligned_horizontal(sq(1, 1), sq(3, 1), &occupied));

    assert!(!aligned_horizontal(sq(1, 1), sq(2, 2), &occupied));
}

#[test]
fn test_diagonal_alignment_down_sloping() {
    let occupied = [sq(1, 3), sq(2, 2), sq(3, 1)];

    assert!(aligned_diagonal(sq(1, 3), sq(2, 2), &occupied));
    assert!(aligned_diagonal(sq(2, 2), sq(1, 3), &occupied));

    // Piece in between on the same diagonal.
    assert!(!aligned_diagonal(sq(1, 3), sq(3, 1), &occupied));
}

#[test]
fn test_diagonal_alignment_up_sloping() {
    let occupied = [sq(1, 1), sq(2, 2), sq(3, 3)];

    assert!(aligned_diagonal(sq(1, 1), sq(2, 2), &occupied));
    assert!(aligned_diagonal(sq(2, 2), sq(1, 1), &occupied));

    assert!(!aligned_diagonal(sq(1, 1), sq(3, 3), &occupied));
}

#[test]
fn test_diagonal_families_do_not_block_each_other() {
    // (2,2) sits on one diagonal with (1,3) and on the other with (3,3);
    // the endpoints of one family must not see the other as a blocker.
    let occupied = [sq(1, 3), sq(2, 2), sq(3, 3)];

    assert!(aligned_diagonal(sq(1, 3), sq(2, 2), &occupied));
    assert!(aligned_diagonal(sq(2, 2), sq(1, 3), &occupied));
    assert!(aligned_diagonal(sq(3, 3), sq(2, 2), &occupied));
    assert!(aligned_diagonal(sq(2, 2), sq(3, 3), &occupied));

    // (1,3) and (3,3) share no diagonal at all.
    assert!(!aligned_diagonal(sq(1, 3), sq(3, 3), &occupied));
}

#[test]
fn test_king_is_never_a_target() {
    let queen = Piece::new(0, PieceKind::Queen);
    let king = Piece::new(1, PieceKind::King);
    let state = State::setup([(queen, sq(3, 3)), (king, sq(4, 3))], None).unwrap();

    // No self-capture, no capturing the King.
    assert!(!state.is_legal_capture(queen.id, queen.id));
    assert!(!state.is_legal_capture(queen.id, king.id));
}

#[test]
fn test_queen_captures() {
    let queen = Piece::new(0, PieceKind::Queen);
    let p1 = pawn(1);
    let p2 = pawn(2);
    let p3 = pawn(3);
    let p4 = pawn(4);
    let p5 = pawn(5);
    let state = State::setup(
        [
            (queen, sq(3, 3)),
            (p1, sq(5, 3)),
            (p2, sq(3, 5)),
            (p3, sq(1, 5)),
            (p4, sq(2, 1)),
            (p5, sq(4, 3)),
        ],
        None,
    )
    .unwrap();

    // Unobstructed line captures: horizontal, vertical, diagonal.
    assert!(state.is_legal_capture(queen.id, p5.id));
    assert!(state.is_legal_capture(queen.id, p2.id));
    assert!(state.is_legal_capture(queen.id, p3.id));

    // p5 blocks the line to p1.
    assert!(!state.is_legal_capture(queen.id, p1.id));

    // Not on any shared line.
    assert!(!state.is_legal_capture(queen.id, p4.id));
}

#[test]
fn test_rook_and_bishop_captures() {
    let rook = Piece::new(0, PieceKind::Rook);
    let bishop = Piece::new(1, PieceKind::Bishop);
    let p1 = pawn(2);
    let p2 = pawn(3);
    let state = State::setup(
        [
            (rook, sq(0, 0)),
            (bishop, sq(4, 1)),
            (p1, sq(0, 4)),
            (p2, sq(2, 3)),
        ],
        None,
    )
    .unwrap();

    // Rook takes along the column, not the diagonal.
    assert!(state.is_legal_capture(rook.id, p1.id));
    assert!(!state.is_legal_capture(rook.id, p2.id));

    // Bishop takes along the diagonal, not the row.
    assert!(state.is_legal_capture(bishop.id, p2.id));
    assert!(!state.is_legal_capture(bishop.id, p1.id));
}

#[test]
fn test_knight_captures() {
    let knight = Piece::new(0, PieceKind::Knight);
    let mut pieces = vec![(knight, sq(3, 3))];
    let reachable = [
        sq(1, 4),
        sq(2, 5),
        sq(4, 5),
        sq(5, 4),
        sq(5, 2),
        sq(4, 1),
        sq(2, 1),
        sq(1, 2),
    ];
    for (i, &square) in reachable.iter().enumerate() {
        pieces.push((pawn(i as u32 + 1), square));
    }
    let blocked_in = pawn(9);
    let too_far = pawn(10);
    pieces.push((blocked_in, sq(2, 3)));
    pieces.push((too_far, sq(5, 5)));
    let state = State::setup(pieces, None).unwrap();

    // All eight knight squares, regardless of the crowd in between.
    for i in 1..=8 {
        assert!(state.is_legal_capture(knight.id, solo_chess::PieceId(i)));
    }

    assert!(!state.is_legal_capture(knight.id, blocked_in.id));
    assert!(!state.is_legal_capture(knight.id, too_far.id));
}

#[test]
fn test_pawn_captures() {
    let p = pawn(0);
    let left = pawn(1);
    let right = pawn(2);
    let ahead = pawn(3);
    let behind = pawn(4);
    let state = State::setup(
        [
            (p, sq(3, 3)),
            (left, sq(2, 2)),
            (right, sq(4, 2)),
            (ahead, sq(3, 2)),
            (behind, sq(2, 4)),
        ],
        None,
    )
    .unwrap();

    // One square diagonally forward only.
    assert!(state.is_legal_capture(p.id, left.id));
    assert!(state.is_legal_capture(p.id, right.id));
    assert!(!state.is_legal_capture(p.id, ahead.id));
    assert!(!state.is_legal_capture(p.id, behind.id));
}

#[test]
fn test_king_captures() {
    let king = Piece::new(0, PieceKind::King);
    let near = pawn(1);
    let far = pawn(2);
    let state = State::setup([(king, sq(3, 3)), (near, sq(4, 3)), (far, sq(4, 5))], None).unwrap();

    assert!(state.is_legal_capture(king.id, near.id));
    assert!(!state.is_legal_capture(king.id, far.id));
}

#[test]
fn test_spent_budget_forbids_capture() {
    let queen = Piece::new(0, PieceKind::Queen);
    let target = pawn(1);
    let state = State::new(
        vec![
            Placement {
                piece: queen,
                square: sq(3, 3),
                captures_left: 0,
            },
            Placement {
                piece: target,
                square: sq(4, 3),
                captures_left: DEFAULT_CAPTURE_BUDGET,
            },
        ],
        None,
    )
    .unwrap();

    assert!(!state.is_legal_capture(queen.id, target.id));
    assert!(state
        .legal_captures()
        .iter()
        .all(|capture| capture.capturer != queen.id));
}

#[test]
fn test_apply_capture_postconditions() {
    let queen = Piece::new(0, PieceKind::Queen);
    let target = pawn(1);
    let bystander = pawn(2);
    let center = sq(4, 4);
    let state = State::setup(
        [(queen, sq(0, 0)), (target, sq(0, 3)), (bystander, sq(5, 5))],
        Some(center),
    )
    .unwrap();

    let capture = Capture {
        capturer: queen.id,
        captured: target.id,
    };
    assert!(state.is_legal_capture(capture.capturer, capture.captured));

    let next = state.apply_capture(&capture);

    assert_eq!(next.piece_count(), state.piece_count() - 1);
    assert!(next.placement(target.id).is_none());

    let moved = next.placement(queen.id).unwrap();
    assert_eq!(moved.square, sq(0, 3));
    assert_eq!(moved.captures_left, DEFAULT_CAPTURE_BUDGET - 1);

    // Untouched pieces and the center carry over.
    assert_eq!(next.placement(bystander.id).unwrap().square, sq(5, 5));
    assert_eq!(next.center(), Some(center));
}

#[test]
fn test_goal_implies_terminal() {
    let king_only = State::setup([(Piece::new(0, PieceKind::King), sq(2, 2))], None).unwrap();
    assert!(king_only.is_goal());
    assert!(king_only.is_terminal());

    // A lone non-King piece is terminal but no goal.
    let pawn_only = State::setup([(pawn(0), sq(2, 2))], None).unwrap();
    assert!(!pawn_only.is_goal());
    assert!(pawn_only.is_terminal());

    // A dead end: two pieces, no possible capture.
    let stuck = State::setup(
        [
            (Piece::new(0, PieceKind::King), sq(0, 0)),
            (Piece::new(1, PieceKind::Knight), sq(5, 5)),
        ],
        None,
    )
    .unwrap();
    assert!(!stuck.is_goal());
    assert!(stuck.is_terminal());

    // A solvable two-piece puzzle is not terminal.
    let live = State::setup(
        [
            (Piece::new(0, PieceKind::King), sq(3, 3)),
            (pawn(1), sq(4, 4)),
        ],
        None,
    )
    .unwrap();
    assert!(!live.is_terminal());
}

#[test]
fn test_transpositions_compare_equal() {
    let r1 = Piece::new(0, PieceKind::Rook);
    let r2 = Piece::new(1, PieceKind::Rook);
    let p1 = pawn(2);
    let p2 = pawn(3);
    let state = State::setup(
        [(r1, sq(0, 0)), (r2, sq(3, 0)), (p1, sq(0, 2)), (p2, sq(3, 2))],
        None,
    )
    .unwrap();

    let take_p1 = Capture {
        capturer: r1.id,
        captured: p1.id,
    };
    let take_p2 = Capture {
        capturer: r2.id,
        captured: p2.id,
    };

    // The two independent captures commute into the same position.
    let via_p1 = state.apply_capture(&take_p1).apply_capture(&take_p2);
    let via_p2 = state.apply_capture(&take_p2).apply_capture(&take_p1);
    assert_eq!(via_p1, via_p2);
}

#[test]
fn test_invalid_positions_are_rejected() {
    // Two pieces on one square.
    let shared = State::setup([(pawn(0), sq(1, 1)), (pawn(1), sq(1, 1))], None);
    assert!(shared.is_err());

    // Two placements with one identity.
    let duplicated = State::setup([(pawn(0), sq(1, 1)), (pawn(0), sq(2, 2))], None);
    assert!(duplicated.is_err());
}

#[test]
fn test_rank_heuristic() {
    let queen = Piece::new(0, PieceKind::Queen);
    let target = pawn(1);
    let state = State::setup([(queen, sq(0, 0)), (target, sq(0, 1))], None).unwrap();

    let capture = Capture {
        capturer: queen.id,
        captured: target.id,
    };

    // 1 / (rank(Q) + budget(P) * rank(P)) = 1 / (9 + 2 * 1)
    let score = state.score(Heuristic::Rank, &capture);
    assert!((score - 1.0 / 11.0).abs() < 1e-12);
}

#[test]
fn test_center_heuristic() {
    let queen = Piece::new(0, PieceKind::Queen);
    let target = pawn(1);
    let center = sq(4, 4);
    let state = State::setup([(queen, sq(0, 0)), (target, sq(0, 3))], Some(center)).unwrap();

    let capture = Capture {
        capturer: queen.id,
        captured: target.id,
    };

    // Capture distance plus distance from the capturer to the center.
    let expected = 3.0 + 32.0f64.sqrt();
    let score = state.score(Heuristic::Center, &capture);
    assert!((score - expected).abs() < 1e-12);

    // Without a center square only the capture distance counts.
    let no_center = State::setup([(queen, sq(0, 0)), (target, sq(0, 3))], None).unwrap();
    let score = no_center.score(Heuristic::Center, &capture);
    assert!((score - 3.0).abs() < 1e-12);
}

#[test]
fn test_transitions_cover_every_legal_capture() {
    let king = Piece::new(0, PieceKind::King);
    let n1 = Piece::new(1, PieceKind::Knight);
    let n2 = Piece::new(2, PieceKind::Knight);
    let state = State::setup([(king, sq(0, 0)), (n1, sq(0, 1)), (n2, sq(2, 2))], None).unwrap();

    let captures = state.legal_captures();
    let transitions = state.transitions();
    assert_eq!(captures.len(), transitions.len());

    for (capture, next) in &transitions {
        assert!(captures.contains(capture));
        assert_eq!(*next, state.apply_capture(capture));
    }
}
