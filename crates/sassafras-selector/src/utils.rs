//! Small sequence helpers shared by the selector algorithms: cartesian
//! paths, longest common subsequence with a custom merge, column-major
//! flattening, and order-insensitive comparison.

use std::cmp::Ordering;
use std::collections::VecDeque;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Hash a single value with the standard hasher using fixed keys, so the
/// result is stable within a process run.
pub(crate) fn hash_one<T: Hash>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

/// Compare two sequences as multisets: sort both and compare
/// lexicographically (length included). Two sequences compare equal here
/// exactly when they contain the same elements with the same
/// multiplicities.
pub(crate) fn cmp_unordered<T: Ord>(a: &[T], b: &[T]) -> Ordering {
    let mut lhs: Vec<&T> = a.iter().collect();
    let mut rhs: Vec<&T> = b.iter().collect();
    lhs.sort();
    rhs.sort();
    lhs.cmp(&rhs)
}

/// Returns a list of all possible paths through the given lists.
///
/// For example, given `[[1, 2], [3, 4]]`, this returns
/// `[[1, 3], [2, 3], [1, 4], [2, 4]]`.
///
/// An empty choice anywhere collapses the whole product to nothing.
pub(crate) fn paths<T: Clone>(choices: &[Vec<T>]) -> Vec<Vec<T>> {
    let mut result: Vec<Vec<T>> = vec![Vec::new()];
    for choice in choices {
        if choice.is_empty() {
            return Vec::new();
        }
        let mut next = Vec::with_capacity(result.len() * choice.len());
        for option in choice {
            for path in &result {
                let mut extended = path.clone();
                extended.push(option.clone());
                next.push(extended);
            }
        }
        result = next;
    }
    result
}

/// Flattens a two-dimensional list column-major: the first element of every
/// row, then the second of every row, and so on until all rows are
/// exhausted.
pub(crate) fn flatten_vertically<T>(rows: Vec<Vec<T>>) -> Vec<T> {
    let mut queues: Vec<VecDeque<T>> = rows.into_iter().map(VecDeque::from).collect();
    let mut result = Vec::new();
    while !queues.is_empty() {
        for queue in &mut queues {
            if let Some(item) = queue.pop_front() {
                result.push(item);
            }
        }
        queues.retain(|queue| !queue.is_empty());
    }
    result
}

/// Longest common subsequence of `x` and `y` under a custom merge: `select`
/// returns the representative of two matching elements, or `None` when they
/// don't match. The default identity behaviour is [`lcs`].
pub(crate) fn lcs_with<T: Clone>(
    x: &[T],
    y: &[T],
    select: impl Fn(&T, &T) -> Option<T>,
) -> Vec<T> {
    let m = x.len();
    let n = y.len();
    if m == 0 || n == 0 {
        return Vec::new();
    }

    // lengths[i][j] is the LCS length of x[..i] and y[..j].
    let mut lengths = vec![vec![0_usize; n + 1]; m + 1];
    let mut selections: Vec<Vec<Option<T>>> = vec![vec![None; n]; m];

    for i in 0..m {
        for j in 0..n {
            let selection = select(&x[i], &y[j]);
            lengths[i + 1][j + 1] = if selection.is_some() {
                lengths[i][j] + 1
            } else {
                lengths[i + 1][j].max(lengths[i][j + 1])
            };
            selections[i][j] = selection;
        }
    }

    let mut result = Vec::new();
    let mut i = m;
    let mut j = n;
    while i > 0 && j > 0 {
        if let Some(selection) = selections[i - 1][j - 1].take() {
            result.push(selection);
            i -= 1;
            j -= 1;
        } else if lengths[i - 1][j] > lengths[i][j - 1] {
            i -= 1;
        } else {
            j -= 1;
        }
    }
    result.reverse();
    result
}

/// Longest common subsequence under plain equality.
pub(crate) fn lcs<T: Clone + PartialEq>(x: &[T], y: &[T]) -> Vec<T> {
    lcs_with(x, y, |a, b| if a == b { Some(a.clone()) } else { None })
}

/// Returns all orderings of initial subsequences of `queue1` and `queue2`.
///
/// The `done` callback determines the extent of the initial subsequences;
/// it's called with each queue until it returns `true`. Destructively
/// removes the initial subsequences from both queues.
///
/// For example, given `(A B C | D E)` and `(1 2 | 3 4 5)` (with `|`
/// denoting the boundary of the initial subsequence), this returns
/// `[(A B C 1 2), (1 2 A B C)]` and leaves `(D E)` and `(3 4 5)`.
pub(crate) fn chunks<T: Clone>(
    queue1: &mut VecDeque<T>,
    queue2: &mut VecDeque<T>,
    done: impl Fn(&VecDeque<T>) -> bool,
) -> Vec<Vec<T>> {
    let mut chunk1 = Vec::new();
    while !done(queue1) {
        if let Some(item) = queue1.pop_front() {
            chunk1.push(item);
        } else {
            break;
        }
    }
    let mut chunk2 = Vec::new();
    while !done(queue2) {
        if let Some(item) = queue2.pop_front() {
            chunk2.push(item);
        } else {
            break;
        }
    }

    match (chunk1.is_empty(), chunk2.is_empty()) {
        (true, true) => Vec::new(),
        (true, false) => vec![chunk2],
        (false, true) => vec![chunk1],
        (false, false) => {
            let mut first = chunk1.clone();
            first.extend(chunk2.iter().cloned());
            let mut second = chunk2;
            second.extend(chunk1);
            vec![first, second]
        }
    }
}

/// Returns `name` without its vendor prefix; names without one (including
/// `--custom` names) are returned as-is.
pub(crate) fn unvendor(name: &str) -> &str {
    let bytes = name.as_bytes();
    if bytes.len() < 2 || bytes[0] != b'-' || bytes[1] == b'-' {
        return name;
    }
    for i in 2..bytes.len() {
        if bytes[i] == b'-' {
            return &name[i + 1..];
        }
    }
    name
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_order() {
        let result = paths(&[vec![1, 2], vec![3, 4]]);
        assert_eq!(result, vec![vec![1, 3], vec![2, 3], vec![1, 4], vec![2, 4]]);
    }

    #[test]
    fn test_paths_empty_choice() {
        let result: Vec<Vec<i32>> = paths(&[vec![1], vec![]]);
        assert!(result.is_empty());
    }

    #[test]
    fn test_flatten_vertically() {
        let result = flatten_vertically(vec![vec![1, 2], vec![3], vec![4, 5, 6]]);
        assert_eq!(result, vec![1, 3, 4, 2, 5, 6]);
    }

    #[test]
    fn test_lcs_plain() {
        assert_eq!(lcs(&[1, 2, 3, 4], &[2, 4, 5]), vec![2, 4]);
        assert_eq!(lcs::<i32>(&[], &[1]), Vec::<i32>::new());
    }

    #[test]
    fn test_chunks_both_sides() {
        let mut q1: VecDeque<i32> = VecDeque::from(vec![1, 2, 9]);
        let mut q2: VecDeque<i32> = VecDeque::from(vec![3, 9]);
        let result = chunks(&mut q1, &mut q2, |queue| {
            queue.front().is_none_or(|&front| front == 9)
        });
        assert_eq!(result, vec![vec![1, 2, 3], vec![3, 1, 2]]);
        assert_eq!(q1, VecDeque::from(vec![9]));
        assert_eq!(q2, VecDeque::from(vec![9]));
    }

    #[test]
    fn test_unvendor() {
        assert_eq!(unvendor("-webkit-matches"), "matches");
        assert_eq!(unvendor("matches"), "matches");
        assert_eq!(unvendor("--custom"), "--custom");
        assert_eq!(unvendor("-x"), "-x");
    }
}
