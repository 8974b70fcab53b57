//! Myers diff in linear space
//!
//! Each step looks for the *middle snake* of the edit graph by running the
//! greedy search forward from the start and backward from the end at the same
//! time, then splits the problem there and solves both halves recursively.
//! Only the two frontiers of the current step are kept, so memory grows with
//! the input length and not with the number of edits.

use derive_new::new;
use std::ops::{Index, IndexMut, Range};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Edit<T> {
    Delete { value: T },
    Insert { value: T },
    Equal { value: T },
}

/// A maximal stretch of the edit script: either shared elements, or a change
/// where every deletion is listed before every insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block<T> {
    Equal(Vec<T>),
    Change { deleted: Vec<T>, inserted: Vec<T> },
}

/// Furthest `x` reached on every diagonal `k = x - y` in `-bound..=bound`.
#[derive(Debug)]
struct Frontier {
    bound: isize,
    xs: Vec<isize>,
}

impl Frontier {
    fn new(bound: isize) -> Self {
        Self {
            bound,
            xs: vec![0; (2 * bound + 1) as usize],
        }
    }
}

impl Index<isize> for Frontier {
    type Output = isize;

    fn index(&self, k: isize) -> &isize {
        &self.xs[(self.bound + k) as usize]
    }
}

impl IndexMut<isize> for Frontier {
    fn index_mut(&mut self, k: isize) -> &mut isize {
        &mut self.xs[(self.bound + k) as usize]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct MyersDiff<'d, T> {
    a: &'d [T],
    b: &'d [T],
}

impl<'d, T: Eq + Clone> MyersDiff<'d, T> {
    /// A shortest edit script turning `a` into `b`.
    pub fn diff(&self) -> Vec<Edit<T>> {
        let mut edits = Vec::with_capacity(self.a.len().max(self.b.len()));
        self.conquer(0..self.a.len(), 0..self.b.len(), &mut edits);
        edits
    }

    fn conquer(&self, mut old: Range<usize>, mut new: Range<usize>, edits: &mut Vec<Edit<T>>) {
        let prefix = self.a[old.clone()]
            .iter()
            .zip(&self.b[new.clone()])
            .take_while(|(x, y)| x == y)
            .count();
        edits.extend(
            self.a[old.start..old.start + prefix]
                .iter()
                .map(|value| Edit::Equal {
                    value: value.clone(),
                }),
        );
        old.start += prefix;
        new.start += prefix;

        let suffix = self.a[old.clone()]
            .iter()
            .rev()
            .zip(self.b[new.clone()].iter().rev())
            .take_while(|(x, y)| x == y)
            .count();
        old.end -= suffix;
        new.end -= suffix;

        if old.is_empty() || new.is_empty() {
            self.replace(old.clone(), new.clone(), edits);
        } else {
            match self.middle_snake(old.clone(), new.clone()) {
                Some((x, y)) => {
                    self.conquer(old.start..x, new.start..y, edits);
                    self.conquer(x..old.end, y..new.end, edits);
                }
                None => self.replace(old.clone(), new.clone(), edits),
            }
        }

        edits.extend(
            self.a[old.end..old.end + suffix]
                .iter()
                .map(|value| Edit::Equal {
                    value: value.clone(),
                }),
        );
    }

    fn replace(&self, old: Range<usize>, new: Range<usize>, edits: &mut Vec<Edit<T>>) {
        edits.extend(self.a[old].iter().map(|value| Edit::Delete {
            value: value.clone(),
        }));
        edits.extend(self.b[new].iter().map(|value| Edit::Insert {
            value: value.clone(),
        }));
    }

    /// Top-left corner of a snake lying on some shortest path through the
    /// given sub-grid, in absolute coordinates.
    fn middle_snake(&self, old: Range<usize>, new: Range<usize>) -> Option<(usize, usize)> {
        let a = &self.a[old.clone()];
        let b = &self.b[new.clone()];
        let (n, m) = (a.len() as isize, b.len() as isize);
        let delta = n - m;
        let odd = delta & 1 == 1;
        let max_d = (n + m + 1) / 2;

        let mut forward = Frontier::new(max_d + 1);
        let mut backward = Frontier::new(max_d + 1);

        for d in 0..=max_d {
            for k in (-d..=d).rev().step_by(2) {
                let mut x = if k == -d || (k != d && forward[k - 1] < forward[k + 1]) {
                    // insertion
                    forward[k + 1]
                } else {
                    // deletion
                    forward[k - 1] + 1
                };
                let (x0, y0) = (x, x - k);
                let mut y = y0;
                while x < n && y < m && a[x as usize] == b[y as usize] {
                    x += 1;
                    y += 1;
                }
                forward[k] = x;

                if odd && (k - delta).abs() < d && x + backward[delta - k] >= n {
                    return Some((old.start + x0 as usize, new.start + y0 as usize));
                }
            }

            for k in (-d..=d).rev().step_by(2) {
                let mut x = if k == -d || (k != d && backward[k - 1] < backward[k + 1]) {
                    backward[k + 1]
                } else {
                    backward[k - 1] + 1
                };
                let mut y = x - k;
                while x < n && y < m && a[(n - x - 1) as usize] == b[(m - y - 1) as usize] {
                    x += 1;
                    y += 1;
                }
                backward[k] = x;

                if !odd && (k - delta).abs() <= d && x + forward[delta - k] >= n {
                    return Some((old.start + (n - x) as usize, new.start + (m - y) as usize));
                }
            }
        }

        None
    }

    /// Groups the edit script into blocks, reordering each change so that its
    /// deletions come first. Adjacent blocks never share a variant.
    pub fn blocks(&self) -> Vec<Block<T>> {
        let mut blocks = Vec::new();
        let mut equal = Vec::new();
        let mut deleted = Vec::new();
        let mut inserted = Vec::new();

        for edit in self.diff() {
            match edit {
                Edit::Equal { value } => {
                    flush_change(&mut blocks, &mut deleted, &mut inserted);
                    equal.push(value);
                }
                Edit::Delete { value } => {
                    flush_equal(&mut blocks, &mut equal);
                    deleted.push(value);
                }
                Edit::Insert { value } => {
                    flush_equal(&mut blocks, &mut equal);
                    inserted.push(value);
                }
            }
        }

        flush_change(&mut blocks, &mut deleted, &mut inserted);
        flush_equal(&mut blocks, &mut equal);

        blocks
    }
}

fn flush_equal<T>(blocks: &mut Vec<Block<T>>, equal: &mut Vec<T>) {
    if !equal.is_empty() {
        blocks.push(Block::Equal(std::mem::take(equal)));
    }
}

fn flush_change<T>(blocks: &mut Vec<Block<T>>, deleted: &mut Vec<T>, inserted: &mut Vec<T>) {
    if !deleted.is_empty() || !inserted.is_empty() {
        blocks.push(Block::Change {
            deleted: std::mem::take(deleted),
            inserted: std::mem::take(inserted),
        });
    }
}

/// Diffs two sequences into blocks of shared and changed elements.
pub fn diff_blocks<T: Eq + Clone>(a: &[T], b: &[T]) -> Vec<Block<T>> {
    MyersDiff::new(a, b).blocks()
}
