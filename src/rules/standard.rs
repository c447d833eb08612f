//! Standard chess rules backed by `cozy-chess`.

use cozy_chess::{
    get_bishop_moves, get_king_moves, get_knight_moves, get_pawn_attacks, get_rook_moves, BitBoard,
    Board,
};

use super::Rules;
use crate::error::{FenError, MoveParseError};
use crate::types::{Color, Move, Piece, PieceKind, Square};

/// FEN of the initial position.
pub const STARTPOS_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Rules of standard chess. Positions are `cozy_chess::Board` values.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardRules;

impl StandardRules {
    #[must_use]
    pub fn startpos(&self) -> Board {
        Board::default()
    }

    pub fn from_fen(&self, fen: &str) -> Result<Board, FenError> {
        Board::from_fen(fen.trim(), false).map_err(|e| FenError {
            fen: fen.trim().to_string(),
            reason: format!("{e:?}"),
        })
    }

    pub fn parse_move(&self, board: &Board, notation: &str) -> Result<Move, MoveParseError> {
        super::parse_legal_move(self, board, notation)
    }

    /// Translate a cozy-chess move into UCI form. cozy-chess encodes castling
    /// as "king takes own rook"; the king's destination is the g- or c-file.
    fn from_cozy_move(board: &Board, mv: cozy_chess::Move) -> Move {
        let from = from_cozy_square(mv.from);
        let to = from_cozy_square(mv.to);
        let castles = board.piece_on(mv.from) == Some(cozy_chess::Piece::King)
            && board.color_on(mv.to) == Some(board.side_to_move());
        if castles {
            let king_file = if to.file() > from.file() { 6 } else { 2 };
            let king_to = Square::new(king_file, from.rank()).unwrap_or(to);
            return Move::new(from, king_to);
        }
        Move {
            from,
            to,
            promotion: mv.promotion.map(from_cozy_piece),
        }
    }

    fn find_cozy_move(board: &Board, mv: Move) -> Option<cozy_chess::Move> {
        let mut found = None;
        let origin = to_cozy_square(mv.from).bitboard();
        board.generate_moves_for(origin, |piece_moves| {
            found = piece_moves
                .into_iter()
                .find(|&candidate| Self::from_cozy_move(board, candidate) == mv);
            found.is_some()
        });
        found
    }

    fn has_legal_move(board: &Board) -> bool {
        board.generate_moves(|piece_moves| !piece_moves.is_empty())
    }
}

impl Rules for StandardRules {
    type Position = Board;

    fn legal_moves(&self, board: &Board) -> Vec<Move> {
        let mut moves = Vec::with_capacity(64);
        board.generate_moves(|piece_moves| {
            moves.extend(
                piece_moves
                    .into_iter()
                    .map(|mv| Self::from_cozy_move(board, mv)),
            );
            false
        });
        moves
    }

    fn apply_move(&self, board: &Board, mv: Move) -> Option<Board> {
        let cozy_move = Self::find_cozy_move(board, mv)?;
        let mut next = board.clone();
        next.play_unchecked(cozy_move);
        Some(next)
    }

    fn side_to_move(&self, board: &Board) -> Color {
        from_cozy_color(board.side_to_move())
    }

    fn is_checkmate(&self, board: &Board) -> bool {
        !board.checkers().is_empty() && !Self::has_legal_move(board)
    }

    fn is_stalemate(&self, board: &Board) -> bool {
        board.checkers().is_empty() && !Self::has_legal_move(board)
    }

    /// Bare kings, kings plus a single minor piece, or kings plus bishops
    /// that all stand on squares of one color.
    fn is_insufficient_material(&self, board: &Board) -> bool {
        use cozy_chess::Piece as P;

        let heavy = board.pieces(P::Pawn) | board.pieces(P::Rook) | board.pieces(P::Queen);
        if !heavy.is_empty() {
            return false;
        }
        let knights = board.pieces(P::Knight);
        let bishops = board.pieces(P::Bishop);
        if (knights | bishops).len() <= 1 {
            return true;
        }
        if !knights.is_empty() {
            return false;
        }
        let shade = |sq: cozy_chess::Square| {
            let sq = from_cozy_square(sq);
            (sq.file() + sq.rank()) % 2
        };
        let mut shades = bishops.into_iter().map(shade);
        let first = shades.next();
        shades.all(|s| Some(s) == first)
    }

    fn is_in_check(&self, board: &Board) -> bool {
        !board.checkers().is_empty()
    }

    fn piece_at(&self, board: &Board, square: Square) -> Option<Piece> {
        let sq = to_cozy_square(square);
        let kind = board.piece_on(sq)?;
        let color = board.color_on(sq)?;
        Some(Piece::new(from_cozy_piece(kind), from_cozy_color(color)))
    }

    fn attacker_count(&self, board: &Board, by: Color, square: Square) -> u32 {
        use cozy_chess::Piece as P;

        let sq = to_cozy_square(square);
        let color = to_cozy_color(by);
        let occupied = board.occupied();
        let ours = |piece: P| board.colored_pieces(color, piece);
        let diagonal = ours(P::Bishop) | ours(P::Queen);
        let straight = ours(P::Rook) | ours(P::Queen);

        // A pawn of `color` attacks `sq` exactly when a pawn of the other
        // color standing on `sq` would attack it.
        let attackers: BitBoard = (get_pawn_attacks(sq, to_cozy_color(by.opponent())) & ours(P::Pawn))
            | (get_knight_moves(sq) & ours(P::Knight))
            | (get_king_moves(sq) & ours(P::King))
            | (get_bishop_moves(sq, occupied) & diagonal)
            | (get_rook_moves(sq, occupied) & straight);
        attackers.len()
    }

    fn fen(&self, board: &Board) -> String {
        board.to_string()
    }
}

fn to_cozy_square(sq: Square) -> cozy_chess::Square {
    cozy_chess::Square::index(usize::from(sq.index()))
}

fn from_cozy_square(sq: cozy_chess::Square) -> Square {
    Square::ALL[sq as usize]
}

fn to_cozy_color(color: Color) -> cozy_chess::Color {
    match color {
        Color::White => cozy_chess::Color::White,
        Color::Black => cozy_chess::Color::Black,
    }
}

fn from_cozy_color(color: cozy_chess::Color) -> Color {
    match color {
        cozy_chess::Color::White => Color::White,
        cozy_chess::Color::Black => Color::Black,
    }
}

fn from_cozy_piece(piece: cozy_chess::Piece) -> PieceKind {
    match piece {
        cozy_chess::Piece::Pawn => PieceKind::Pawn,
        cozy_chess::Piece::Knight => PieceKind::Knight,
        cozy_chess::Piece::Bishop => PieceKind::Bishop,
        cozy_chess::Piece::Rook => PieceKind::Rook,
        cozy_chess::Piece::Queen => PieceKind::Queen,
        cozy_chess::Piece::King => PieceKind::King,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::{canonical_moves, game_outcome, king_square, GameOutcome};

    fn sq(s: &str) -> Square {
        s.parse().unwrap()
    }

    fn mv(s: &str) -> Move {
        s.parse().unwrap()
    }

    #[test]
    fn startpos_has_twenty_moves() {
        let rules = StandardRules;
        let board = rules.startpos();
        assert_eq!(rules.legal_moves(&board).len(), 20);
        assert_eq!(rules.fen(&board), STARTPOS_FEN);
        assert_eq!(rules.side_to_move(&board), Color::White);
    }

    #[test]
    fn castling_uses_king_destination() {
        let rules = StandardRules;
        let board = rules
            .from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1")
            .unwrap();
        let moves = rules.legal_moves(&board);
        assert!(moves.contains(&mv("e1g1")));
        assert!(moves.contains(&mv("e1c1")));
        assert!(!moves.contains(&mv("e1h1")));

        let castled = rules.apply_move(&board, mv("e1g1")).unwrap();
        assert_eq!(
            rules.piece_at(&castled, sq("g1")),
            Some(Piece::new(PieceKind::King, Color::White))
        );
        assert_eq!(
            rules.piece_at(&castled, sq("f1")),
            Some(Piece::new(PieceKind::Rook, Color::White))
        );
    }

    #[test]
    fn apply_move_forks_and_rejects_illegal() {
        let rules = StandardRules;
        let board = rules.startpos();
        let next = rules.apply_move(&board, mv("e2e4")).unwrap();
        assert_eq!(rules.side_to_move(&next), Color::Black);
        assert_eq!(rules.side_to_move(&board), Color::White);
        assert!(rules.piece_at(&board, sq("e4")).is_none());
        assert!(rules.apply_move(&board, mv("e2e5")).is_none());
    }

    #[test]
    fn parse_move_checks_legality() {
        let rules = StandardRules;
        let board = rules.startpos();
        assert_eq!(rules.parse_move(&board, "g1f3"), Ok(mv("g1f3")));
        assert!(matches!(
            rules.parse_move(&board, "g1g3"),
            Err(MoveParseError::NotLegal(_))
        ));
    }

    #[test]
    fn promotions_are_distinct_moves() {
        let rules = StandardRules;
        let board = rules.from_fen("8/4P3/8/8/8/8/k7/4K3 w - - 0 1").unwrap();
        let promotions: Vec<Move> = canonical_moves(&rules, &board)
            .into_iter()
            .filter(|m| m.from == sq("e7"))
            .collect();
        assert_eq!(promotions.len(), 4);
        assert!(promotions.contains(&mv("e7e8q")));
        assert!(promotions.contains(&mv("e7e8n")));
    }

    #[test]
    fn attacker_count_sees_every_piece_type() {
        let rules = StandardRules;
        // e5 is hit by the d6 pawn and the f7 knight, defended by the d4 pawn.
        let board = rules
            .from_fen("4k3/5n2/3p4/4N3/3P4/8/8/4K3 w - - 0 1")
            .unwrap();
        assert_eq!(rules.attacker_count(&board, Color::Black, sq("e5")), 2);
        assert_eq!(rules.attacker_count(&board, Color::White, sq("e5")), 1);

        // Sliders are blocked by occupancy.
        let board = rules.from_fen("3rk3/8/8/3p4/8/8/8/3QK3 w - - 0 1").unwrap();
        assert_eq!(rules.attacker_count(&board, Color::White, sq("d5")), 1);
        assert_eq!(rules.attacker_count(&board, Color::White, sq("d8")), 0);
    }

    #[test]
    fn detects_terminal_positions() {
        let rules = StandardRules;

        let mated = rules
            .from_fen("rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3")
            .unwrap();
        assert!(rules.is_checkmate(&mated));
        assert!(rules.is_in_check(&mated));
        assert_eq!(
            game_outcome(&rules, &mated),
            Some(GameOutcome::Checkmate {
                winner: Color::Black
            })
        );

        let stalemate = rules.from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").unwrap();
        assert!(rules.is_stalemate(&stalemate));
        assert!(!rules.is_checkmate(&stalemate));

        let bare = rules.from_fen("8/8/8/4k3/8/8/8/4K3 w - - 0 1").unwrap();
        assert!(rules.is_insufficient_material(&bare));
        let knight = rules.from_fen("8/8/8/4k3/8/8/8/4KN2 w - - 0 1").unwrap();
        assert!(rules.is_insufficient_material(&knight));
        let same_bishops = rules.from_fen("8/8/8/4k3/2b5/8/8/3BK3 w - - 0 1").unwrap();
        assert!(rules.is_insufficient_material(&same_bishops));
        assert_eq!(
            game_outcome(&rules, &same_bishops),
            Some(GameOutcome::InsufficientMaterial)
        );
        let split_bishops = rules.from_fen("8/8/8/2b1k3/8/8/8/3BK3 w - - 0 1").unwrap();
        assert!(!rules.is_insufficient_material(&split_bishops));
        let bishop_and_knight = rules.from_fen("8/8/8/4k3/2n5/8/8/3BK3 w - - 0 1").unwrap();
        assert!(!rules.is_insufficient_material(&bishop_and_knight));
        let rook = rules.from_fen("8/8/8/4k3/8/8/8/4KR2 w - - 0 1").unwrap();
        assert!(!rules.is_insufficient_material(&rook));
        assert_eq!(game_outcome(&rules, &rook), None);
    }

    #[test]
    fn finds_kings() {
        let rules = StandardRules;
        let board = rules.startpos();
        assert_eq!(king_square(&rules, &board, Color::White), Some(sq("e1")));
        assert_eq!(king_square(&rules, &board, Color::Black), Some(sq("e8")));
    }

    #[test]
    fn rejects_bad_fen() {
        let rules = StandardRules;
        assert!(rules.from_fen("not a fen").is_err());
    }
}
