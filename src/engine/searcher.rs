//! Iterative-deepening MTD-bi search.
//!
//! Each depth narrows a null-window `bound` search until the true score is
//! pinned down, then reports the best move found so far. The caller decides
//! when to stop pulling depths.

use super::SearchReport;
use super::position::{Move, Position};
use super::tables::{EVAL_ROUGHNESS, MATE_LOWER, MATE_UPPER, QS_LIMIT};
use std::collections::{HashMap, HashSet};
use tracing::{debug, instrument};

/// Deepest iteration the search will attempt.
pub const MAX_DEPTH: i32 = 64;

/// Transposition tables are cleared once they grow past this many entries.
const TABLE_SIZE: usize = 1_000_000;

#[derive(Debug, Clone, Copy)]
struct Bounds {
    lower: i32,
    upper: i32,
}

impl Default for Bounds {
    fn default() -> Self {
        Self {
            lower: -MATE_UPPER,
            upper: MATE_UPPER,
        }
    }
}

/// Search state kept between moves of one game.
#[derive(Debug, Default)]
pub struct Searcher {
    scores: HashMap<(Position, i32, bool), Bounds>,
    killers: HashMap<Position, Option<Move>>,
    history: HashSet<Position>,
    nodes: u64,
}

impl Searcher {
    /// Creates a searcher with empty tables.
    pub fn new() -> Self {
        Self::default()
    }

    /// Nodes visited by the most recent search.
    pub fn nodes(&self) -> u64 {
        self.nodes
    }

    /// Starts a search of `position`; positions in `history` score as draws when repeated.
    #[instrument(skip_all, fields(history = history.len()))]
    pub fn search<'a>(&'a mut self, position: &Position, history: &[Position]) -> SearchIter<'a> {
        self.nodes = 0;
        self.history = history.iter().cloned().collect();
        self.scores.clear();
        SearchIter {
            searcher: self,
            position: position.clone(),
            depth: 0,
        }
    }

    fn killer(&self, position: &Position) -> Option<Move> {
        self.killers.get(position).copied().flatten()
    }

    fn remember_cutoff(&mut self, position: &Position, mv: Option<Move>) {
        if self.killers.len() > TABLE_SIZE {
            self.killers.clear();
        }
        self.killers.insert(position.clone(), mv);
    }

    /// Null-window search: returns a score `>= gamma` if the position is at least
    /// that good for the mover, otherwise an upper bound below `gamma`.
    fn bound(&mut self, position: &Position, gamma: i32, depth: i32, root: bool) -> i32 {
        self.nodes += 1;
        let depth = depth.max(0);

        // general already captured
        if position.score() <= -MATE_LOWER {
            return -MATE_UPPER;
        }
        if !root && self.history.contains(position) {
            return 0;
        }

        let key = (position.clone(), depth, root);
        let entry = self.scores.get(&key).copied().unwrap_or_default();
        if entry.lower >= gamma && (!root || self.killer(position).is_some()) {
            return entry.lower;
        }
        if entry.upper < gamma {
            return entry.upper;
        }

        let mut best = -MATE_UPPER;
        'moves: {
            if depth > 0 && !root && position.has_any(b"RNC") {
                let score = -self.bound(&position.null_move(), 1 - gamma, depth - 3, false);
                best = best.max(score);
                if best >= gamma {
                    self.remember_cutoff(position, None);
                    break 'moves;
                }
            }
            if depth == 0 {
                best = best.max(position.score());
                if best >= gamma {
                    self.remember_cutoff(position, None);
                    break 'moves;
                }
            }
            if let Some(killer) = self.killer(position) {
                if depth > 0 || position.value(killer) >= QS_LIMIT {
                    let score = -self.bound(&position.apply(killer), 1 - gamma, depth - 1, false);
                    best = best.max(score);
                    if best >= gamma {
                        self.remember_cutoff(position, Some(killer));
                        break 'moves;
                    }
                }
            }
            let mut moves = position.moves();
            moves.sort_by_cached_key(|&mv| std::cmp::Reverse(position.value(mv)));
            for mv in moves {
                if depth == 0 && position.value(mv) < QS_LIMIT {
                    continue;
                }
                let score = -self.bound(&position.apply(mv), 1 - gamma, depth - 1, false);
                best = best.max(score);
                if best >= gamma {
                    self.remember_cutoff(position, Some(mv));
                    break 'moves;
                }
            }
        }

        // Every move loses the general: mated if in check, otherwise stalemated.
        if best < gamma && best < 0 && depth > 0 {
            let is_dead = |p: &Position| p.moves().into_iter().any(|m| p.value(m) >= MATE_LOWER);
            if position.moves().into_iter().all(|m| is_dead(&position.apply(m))) {
                let in_check = is_dead(&position.null_move());
                best = if in_check { -MATE_UPPER } else { 0 };
            }
        }

        if self.scores.len() > TABLE_SIZE {
            self.scores.clear();
        }
        let stored = if best >= gamma {
            Bounds {
                lower: best,
                upper: entry.upper,
            }
        } else {
            Bounds {
                lower: entry.lower,
                upper: best,
            }
        };
        self.scores.insert(key, stored);
        best
    }
}

/// Lazy sequence of ever deeper search results.
pub struct SearchIter<'a> {
    searcher: &'a mut Searcher,
    position: Position,
    depth: i32,
}

impl Iterator for SearchIter<'_> {
    type Item = SearchReport;

    fn next(&mut self) -> Option<Self::Item> {
        while self.depth < MAX_DEPTH {
            self.depth += 1;
            let depth = self.depth;
            let searcher = &mut *self.searcher;

            let (mut lower, mut upper) = (-MATE_UPPER, MATE_UPPER);
            while lower < upper - EVAL_ROUGHNESS {
                let gamma = (lower + upper + 1).div_euclid(2);
                let score = searcher.bound(&self.position, gamma, depth, true);
                if score >= gamma {
                    lower = score;
                } else {
                    upper = score;
                }
            }
            searcher.bound(&self.position, lower, depth, true);

            let score = searcher
                .scores
                .get(&(self.position.clone(), depth, true))
                .copied()
                .unwrap_or_default()
                .lower;
            match searcher.killer(&self.position) {
                Some(best_move) => {
                    debug!(depth, score, nodes = searcher.nodes, "Search depth complete");
                    return Some(SearchReport::new(depth, best_move, score));
                }
                None => debug!(depth, "No best move at this depth"),
            }
        }
        None
    }
}
