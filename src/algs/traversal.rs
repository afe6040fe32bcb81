//! DFS/BFS traversal helpers over resolved drainage links.
//!
//! Points are input positions of the owning network. "Downstream" follows the
//! chosen downstream link; "upstream" follows every arc whose chosen
//! downstream is the current one ([`Links::inflows`]), so an upstream walk
//! sees all tributaries, not only the dominant one.

use crate::algs::resolve::Links;
use std::collections::{HashSet, VecDeque};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Dir {
    Downstream,
    Upstream,
    Both,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Strategy {
    DFS,
    BFS,
}

pub struct TraversalBuilder<'a> {
    links: &'a Links,
    seeds: Vec<usize>,
    dir: Dir,
    strat: Strategy,
    max_depth: Option<u32>,
}

impl<'a> TraversalBuilder<'a> {
    pub fn new(links: &'a Links) -> Self {
        Self {
            links,
            seeds: Vec::new(),
            dir: Dir::Upstream,
            strat: Strategy::DFS,
            max_depth: None,
        }
    }
    pub fn seeds<I: IntoIterator<Item = usize>>(mut self, it: I) -> Self {
        self.seeds = it.into_iter().collect();
        self
    }
    pub fn dir(mut self, d: Dir) -> Self {
        self.dir = d;
        self
    }
    pub fn dfs(mut self) -> Self {
        self.strat = Strategy::DFS;
        self
    }
    pub fn bfs(mut self) -> Self {
        self.strat = Strategy::BFS;
        self
    }
    pub fn max_depth(mut self, d: Option<u32>) -> Self {
        self.max_depth = d;
        self
    }

    /// Visited positions (seeds included), sorted ascending.
    pub fn run(self) -> Vec<usize> {
        let TraversalBuilder {
            links,
            seeds,
            dir,
            strat,
            max_depth,
        } = self;
        let mut seen: HashSet<usize> = seeds.iter().copied().collect();
        let mut work: VecDeque<(usize, u32)> = seeds.into_iter().map(|p| (p, 0)).collect();

        loop {
            let next = match strat {
                Strategy::DFS => work.pop_back(),
                Strategy::BFS => work.pop_front(),
            };
            let Some((p, d)) = next else { break };
            if max_depth.is_some_and(|md| d >= md) {
                continue;
            }
            for q in step_neighbors(links, dir, p) {
                if seen.insert(q) {
                    work.push_back((q, d + 1));
                }
            }
        }
        let mut out: Vec<_> = seen.into_iter().collect();
        out.sort_unstable();
        out
    }
}

fn step_neighbors(links: &Links, dir: Dir, p: usize) -> Vec<usize> {
    let down = links.down[p].into_iter();
    let up = links.inflows[p].iter().copied();
    match dir {
        Dir::Downstream => down.collect(),
        Dir::Upstream => up.collect(),
        Dir::Both => down.chain(up).collect(),
    }
}

/// Every arc draining (directly or transitively) into the seeds, seeds included.
pub fn upstream_closure<I: IntoIterator<Item = usize>>(links: &Links, seeds: I) -> Vec<usize> {
    TraversalBuilder::new(links)
        .dir(Dir::Upstream)
        .dfs()
        .seeds(seeds)
        .run()
}

/// Positions from `start` to its outlet, in flow order.
///
/// Returns `None` when the walk revisits an arc, i.e. `start` drains into a
/// cycle.
pub fn path_to_outlet(links: &Links, start: usize) -> Option<Vec<usize>> {
    let mut seen = HashSet::new();
    let mut path = vec![start];
    seen.insert(start);
    let mut cur = start;
    while let Some(next) = links.down[cur] {
        if !seen.insert(next) {
            return None;
        }
        path.push(next);
        cur = next;
    }
    Some(path)
}

/// One cycle of downstream links, in flow order starting from its lowest
/// arc id, or `None` if the links are acyclic.
///
/// Every arc has at most one downstream link, so each walk either reaches an
/// outlet, joins an earlier walk, or closes a cycle on itself: O(n) overall.
pub fn find_cycle(links: &Links) -> Option<Vec<usize>> {
    const UNSEEN: usize = usize::MAX;
    let n = links.len();
    let mut stamp = vec![UNSEEN; n];
    for start in 0..n {
        if stamp[start] != UNSEEN {
            continue;
        }
        let mut cur = start;
        loop {
            stamp[cur] = start;
            match links.down[cur] {
                None => break,
                Some(next) if stamp[next] == UNSEEN => cur = next,
                Some(next) if stamp[next] == start => {
                    return Some(rotate_to_lowest_id(links, collect_cycle(links, next)));
                }
                Some(_) => break,
            }
        }
    }
    None
}

fn collect_cycle(links: &Links, entry: usize) -> Vec<usize> {
    let mut cycle = vec![entry];
    let mut cur = entry;
    while let Some(next) = links.down[cur] {
        if next == entry {
            break;
        }
        cycle.push(next);
        cur = next;
    }
    cycle
}

fn rotate_to_lowest_id(links: &Links, mut cycle: Vec<usize>) -> Vec<usize> {
    if let Some(pos) = (0..cycle.len()).min_by_key(|&k| links.ids[cycle[k]]) {
        cycle.rotate_left(pos);
    }
    cycle
}
