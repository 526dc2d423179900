use crate::blocking::CandidateSet;
use crate::model::{MatchScore, NormalizedRecord};
use crate::similarity::score;

/// Every candidate sharing the top score, in candidate order.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub winners: Vec<usize>,
    pub score: MatchScore,
}

impl Selection {
    /// The chosen broker position: the first winner, which is the lowest
    /// original position because candidate sets are ascending.
    pub fn best(&self) -> usize {
        self.winners[0]
    }
}

/// Score all candidates and keep those whose total equals the maximum; the
/// chosen position is `Selection::best`.
///
/// Totals are compared with exact `==`; there is no epsilon. Returns `None`
/// only for an empty candidate set.
pub fn select(
    query: &NormalizedRecord,
    candidates: CandidateSet<'_>,
    broker: &[NormalizedRecord],
) -> Option<Selection> {
    let mut best: Option<Selection> = None;

    for &pos in candidates.positions {
        let s = score(query, &broker[pos]);
        match best.as_mut() {
            Some(sel) if s.total > sel.score.total => {
                sel.winners.clear();
                sel.winners.push(pos);
                sel.score = s;
            }
            Some(sel) if s.total == sel.score.total => sel.winners.push(pos),
            Some(_) => {}
            None => {
                best = Some(Selection {
                    winners: vec![pos],
                    score: s,
                })
            }
        }
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RowIndex;

    fn rec(pos: usize, name: &str, address: &str) -> NormalizedRecord {
        NormalizedRecord {
            index: RowIndex(pos),
            name_norm: name.into(),
            address_norm: address.into(),
            postcode_norm: "ab12cd".into(),
        }
    }

    fn all(positions: &[usize]) -> CandidateSet<'_> {
        CandidateSet {
            positions,
            fallback: false,
        }
    }

    #[test]
    fn highest_score_wins() {
        let broker = vec![
            rec(0, "other ltd", "9 oak ave"),
            rec(1, "acme corp", "1 main st"),
            rec(2, "acme corporation", "1 main st"),
        ];
        let query = rec(0, "acme corp", "1 main st");
        let sel = select(&query, all(&[0, 1, 2]), &broker).unwrap();
        assert_eq!(sel.winners, vec![1]);
        assert_eq!(sel.score.total, 100.0);
        assert_eq!(sel.best(), 1);
    }

    #[test]
    fn ties_return_all_winners_and_pick_lowest_position() {
        let broker = vec![
            rec(0, "beta", "x"),
            rec(1, "acme corp", "1 main st"),
            rec(2, "beta", "x"),
            rec(3, "acme corp", "1 main st"),
        ];
        let query = rec(0, "acme corp", "1 main st");
        let sel = select(&query, all(&[0, 1, 2, 3]), &broker).unwrap();
        assert_eq!(sel.winners, vec![1, 3]);
        assert_eq!(sel.best(), 1);
    }

    #[test]
    fn subset_names_tie_with_exact_match() {
        // Token-set scoring rates a word subset as 100, so both rows tie.
        let broker = vec![
            rec(0, "acme corp ltd", "1 main st"),
            rec(1, "acme corp", "1 main st"),
        ];
        let query = rec(0, "acme corp", "1 main st");
        let sel = select(&query, all(&[0, 1]), &broker).unwrap();
        assert_eq!(sel.winners, vec![0, 1]);
        assert_eq!(sel.best(), 0);
    }

    #[test]
    fn only_candidate_positions_are_scored() {
        let broker = vec![
            rec(0, "acme corp", "1 main st"),
            rec(1, "other ltd", "9 oak ave"),
        ];
        let query = rec(0, "acme corp", "1 main st");
        let sel = select(&query, all(&[1]), &broker).unwrap();
        assert_eq!(sel.winners, vec![1]);
    }

    #[test]
    fn empty_candidate_set_selects_nothing() {
        let query = rec(0, "acme corp", "1 main st");
        assert_eq!(select(&query, all(&[]), &[]), None);
    }
}
