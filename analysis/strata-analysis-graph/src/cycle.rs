//! Depth-first cycle search.
//!
//! The search is written against a neighbor function rather than a concrete
//! graph type so the module graph and its layer projection share one
//! implementation. Recursion is replaced by an explicit stack of neighbor
//! iterators; the visiting order, and therefore the witness returned, is the
//! same as that of the textbook recursive formulation.

use std::collections::HashSet;
use std::hash::Hash;

/// Finds a cycle reachable from `start`, if any.
///
/// A node is reported as closing a cycle the first time an edge leads back
/// onto the current DFS stack. The cycle is the stack suffix beginning at that
/// node, followed by the node again; a self-edge therefore yields `[n, n]`.
pub fn find_cycle<N, F, I>(start: N, mut neighbors: F) -> Option<Vec<N>>
where
    N: Copy + Eq + Hash,
    F: FnMut(N) -> I,
    I: IntoIterator<Item = N>,
{
    let mut visited = HashSet::new();
    let mut on_stack = HashSet::new();
    let mut stack = vec![start];
    let mut frames = vec![neighbors(start).into_iter()];
    visited.insert(start);
    on_stack.insert(start);

    while let Some(frame) = frames.last_mut() {
        match frame.next() {
            Some(next) if visited.insert(next) => {
                on_stack.insert(next);
                stack.push(next);
                frames.push(neighbors(next).into_iter());
            }
            Some(next) if on_stack.contains(&next) => {
                let pos = stack.iter().position(|&n| n == next).unwrap_or(0);
                let mut cycle = stack.split_off(pos);
                cycle.push(next);
                return Some(cycle);
            }
            Some(_) => {}
            None => {
                frames.pop();
                if let Some(done) = stack.pop() {
                    on_stack.remove(&done);
                }
            }
        }
    }

    None
}

/// Finds a cycle that passes through `start`, if one exists.
///
/// Only an edge back to `start` closes a cycle here, so the result always
/// begins and ends with `start`. Every node is expanded at most once, which
/// keeps the search linear while still finding a cycle whenever `start` can
/// reach itself.
pub fn find_cycle_through<N, F, I>(start: N, mut neighbors: F) -> Option<Vec<N>>
where
    N: Copy + Eq + Hash,
    F: FnMut(N) -> I,
    I: IntoIterator<Item = N>,
{
    let mut visited = HashSet::new();
    let mut stack = vec![start];
    let mut frames = vec![neighbors(start).into_iter()];
    visited.insert(start);

    while let Some(frame) = frames.last_mut() {
        match frame.next() {
            Some(next) if next == start => {
                stack.push(start);
                return Some(stack);
            }
            Some(next) if visited.insert(next) => {
                stack.push(next);
                frames.push(neighbors(next).into_iter());
            }
            Some(_) => {}
            None => {
                frames.pop();
                stack.pop();
            }
        }
    }

    None
}
