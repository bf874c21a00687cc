//! Line diff engine.
//!
//! [`diff`] finds a shortest edit script with Myers' O(ND) greedy search
//! over the longest common subsequence, after trimming the common prefix
//! and suffix. Consecutive non-matching lines are merged into hunks that
//! are maximal: two hunks are always separated by at least one matching
//! line.

use std::sync::Arc;

use tracing::debug;

use docflow_core::result::AppResult;
use docflow_core::traits::ContentExtractor;
use docflow_entity::Difference;

/// One step of an alignment between two sequences.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Edit {
    Equal,
    Delete,
    Insert,
}

/// A non-empty run of differing lines, in positions of the full inputs.
#[derive(Debug, Clone, Copy)]
struct Hunk {
    previous_start: usize,
    previous_size: usize,
    new_start: usize,
    new_size: usize,
}

impl Hunk {
    fn into_difference(self) -> Difference {
        Difference::hunk(
            self.previous_start,
            self.previous_size,
            self.new_start,
            self.new_size,
        )
    }
}

/// Computes the hunks turning `old` into `new`, in ascending order.
///
/// Total for all inputs: `diff(&[], &[])` and `diff(l, l)` are empty,
/// `diff(&[], l)` is a single insert and `diff(l, &[])` a single delete.
pub fn diff<S: PartialEq>(old: &[S], new: &[S]) -> Vec<Difference> {
    let prefix = old
        .iter()
        .zip(new.iter())
        .take_while(|(a, b)| a == b)
        .count();
    let suffix = old[prefix..]
        .iter()
        .rev()
        .zip(new[prefix..].iter().rev())
        .take_while(|(a, b)| a == b)
        .count();

    let old_mid = &old[prefix..old.len() - suffix];
    let new_mid = &new[prefix..new.len() - suffix];

    let edits = if old_mid.is_empty() || new_mid.is_empty() {
        let mut edits = vec![Edit::Delete; old_mid.len()];
        edits.extend(std::iter::repeat_n(Edit::Insert, new_mid.len()));
        edits
    } else {
        shortest_edit_script(old_mid, new_mid)
    };

    hunks(&edits, prefix)
        .into_iter()
        .map(Hunk::into_difference)
        .collect()
}

/// Myers' greedy forward search, keeping every frontier so the path can be
/// walked back.
fn shortest_edit_script<S: PartialEq>(a: &[S], b: &[S]) -> Vec<Edit> {
    let n = a.len() as isize;
    let m = b.len() as isize;
    let max = n + m;
    let offset = max;
    let index = |k: isize| (k + offset) as usize;

    let mut v = vec![0isize; 2 * max as usize + 2];
    let mut trace: Vec<Vec<isize>> = Vec::new();

    'search: for d in 0..=max {
        trace.push(v.clone());
        let mut k = -d;
        while k <= d {
            let mut x = if k == -d || (k != d && v[index(k - 1)] < v[index(k + 1)]) {
                v[index(k + 1)]
            } else {
                v[index(k - 1)] + 1
            };
            let mut y = x - k;
            while x < n && y < m && a[x as usize] == b[y as usize] {
                x += 1;
                y += 1;
            }
            v[index(k)] = x;
            if x >= n && y >= m {
                break 'search;
            }
            k += 2;
        }
    }

    let mut edits = Vec::with_capacity((n + m) as usize);
    let (mut x, mut y) = (n, m);
    for (d, frontier) in trace.iter().enumerate().rev() {
        let d = d as isize;
        let k = x - y;
        let prev_k = if k == -d || (k != d && frontier[index(k - 1)] < frontier[index(k + 1)]) {
            k + 1
        } else {
            k - 1
        };
        let prev_x = frontier[index(prev_k)];
        let prev_y = prev_x - prev_k;

        while x > prev_x && y > prev_y {
            edits.push(Edit::Equal);
            x -= 1;
            y -= 1;
        }
        if d > 0 {
            edits.push(if x == prev_x { Edit::Insert } else { Edit::Delete });
        }
        x = prev_x;
        y = prev_y;
    }
    edits.reverse();
    edits
}

/// Groups an alignment into maximal hunks, shifted by `base` lines of common
/// prefix on both sides.
fn hunks(edits: &[Edit], base: usize) -> Vec<Hunk> {
    let mut hunks = Vec::new();
    let mut open: Option<Hunk> = None;
    let (mut i, mut j) = (base, base);

    for edit in edits {
        match edit {
            Edit::Equal => {
                hunks.extend(open.take());
                i += 1;
                j += 1;
            }
            Edit::Delete => {
                open.get_or_insert(Hunk {
                    previous_start: i,
                    previous_size: 0,
                    new_start: j,
                    new_size: 0,
                })
                .previous_size += 1;
                i += 1;
            }
            Edit::Insert => {
                open.get_or_insert(Hunk {
                    previous_start: i,
                    previous_size: 0,
                    new_start: j,
                    new_size: 0,
                })
                .new_size += 1;
                j += 1;
            }
        }
    }
    hunks.extend(open);
    hunks
}

/// Extraction followed by diffing, over raw file contents.
#[derive(Debug, Clone)]
pub struct DiffEngine {
    extractor: Arc<dyn ContentExtractor>,
}

impl DiffEngine {
    /// Create an engine using `extractor` to read contents.
    pub fn new(extractor: Arc<dyn ContentExtractor>) -> Self {
        Self { extractor }
    }

    /// The extractor used to read contents.
    pub fn extractor(&self) -> &Arc<dyn ContentExtractor> {
        &self.extractor
    }

    /// Differences describing a brand new file: everything is inserted.
    pub fn differences_for_new_file(&self, content: &[u8]) -> AppResult<Vec<Difference>> {
        let lines = self.extractor.extract_lines(content)?;
        Ok(diff::<String>(&[], &lines))
    }

    /// Differences turning `old_content` into `new_content`.
    pub fn differences_between(
        &self,
        old_content: &[u8],
        new_content: &[u8],
    ) -> AppResult<Vec<Difference>> {
        let old_lines = self.extractor.extract_lines(old_content)?;
        let new_lines = self.extractor.extract_lines(new_content)?;
        let differences = diff(&old_lines, &new_lines);

        debug!(
            old_lines = old_lines.len(),
            new_lines = new_lines.len(),
            hunks = differences.len(),
            "Computed differences"
        );

        Ok(differences)
    }
}
