#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! Longest common subsequence over two ordered sequences.
//!
//! The grid is the classic `(m + 1) × (n + 1)` table. Row and column zero stand
//! for the empty prefixes and carry no move, which is where backtracking stops.
//!
//! ```text
//!    T  A  R  O  T
//! A 0< 1\ 1< 1< 1<
//! R 0< 1^ 2\ 2< 2<
//! T 1\ 1< 2^ 2< 3\
//! ```

/// The move that produced a grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    /// Both elements matched.
    Diagonal,
    /// Skip an element of `xs`.
    Left,
    /// Skip an element of `ys`.
    Up,
    /// Empty prefix; nothing precedes this cell.
    End,
}

/// One entry of the LCS grid.
#[derive(Debug, Clone, Copy)]
struct Cell {
    /// Length of the LCS of the two prefixes ending here.
    length: usize,
    /// How this cell was reached.
    step:   Step,
}

/// Cell for the empty-prefix border.
const BORDER: Cell = Cell {
    length: 0,
    step:   Step::End,
};

/// Fills the LCS grid; `grid[j + 1][i + 1]` describes `xs[..=i]` against
/// `ys[..=j]`.
fn lcs_grid<X, Y, F>(xs: &[X], ys: &[Y], mut eq: F) -> Vec<Vec<Cell>>
where
    F: FnMut(&X, &Y) -> bool,
{
    let mut grid = vec![vec![BORDER; xs.len() + 1]; ys.len() + 1];

    for (j, y) in ys.iter().enumerate() {
        for (i, x) in xs.iter().enumerate() {
            let cell = if eq(x, y) {
                Cell {
                    length: grid[j][i].length + 1,
                    step:   Step::Diagonal,
                }
            } else {
                let left = grid[j + 1][i].length;
                let up = grid[j][i + 1].length;
                // ties consume from xs
                if left < up {
                    Cell {
                        length: up,
                        step:   Step::Up,
                    }
                } else {
                    Cell {
                        length: left,
                        step:   Step::Left,
                    }
                }
            };
            grid[j + 1][i + 1] = cell;
        }
    }

    grid
}

/// Returns the index pairs `(i, j)` of one longest common subsequence of `xs`
/// and `ys` under `eq`, ascending in both coordinates.
///
/// When several subsequences have the same length, unmatched elements of `xs`
/// are skipped before unmatched elements of `ys`. Runs in `O(n·m)` time and
/// space.
pub fn lcs<X, Y, F>(xs: &[X], ys: &[Y], eq: F) -> Vec<(usize, usize)>
where
    F: FnMut(&X, &Y) -> bool,
{
    let grid = lcs_grid(xs, ys, eq);

    let (mut i, mut j) = (xs.len(), ys.len());
    let mut matches = Vec::with_capacity(grid[j][i].length);
    loop {
        match grid[j][i].step {
            Step::Diagonal => {
                matches.push((i - 1, j - 1));
                i -= 1;
                j -= 1;
            }
            Step::Left => i -= 1,
            Step::Up => j -= 1,
            Step::End => break,
        }
    }

    matches.reverse();
    matches
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eq(x: &i32, y: &i32) -> bool {
        x == y
    }

    #[test]
    fn prefers_xs_on_ties_with_trailing_match() {
        let xs = [1, 2, 3, 4, 5, 6, 7];
        let ys = [1, 0, 2, 4, 3, 4, 7, 5, 6, 7];
        assert_eq!(lcs(&xs, &ys, eq), vec![
            (0, 0),
            (1, 2),
            (2, 4),
            (3, 5),
            (4, 7),
            (5, 8),
            (6, 9)
        ]);
    }

    #[test]
    fn prefers_xs_on_ties_without_trailing_match() {
        let xs = [1, 2, 3, 4, 5, 6, 7];
        let ys = [1, 0, 2, 4, 3, 4, 7, 5, 6];
        assert_eq!(lcs(&xs, &ys, eq), vec![(0, 0), (1, 2), (2, 4), (3, 5), (4, 7), (5, 8)]);
    }

    #[test]
    fn empty_sides_match_nothing() {
        let empty: [i32; 0] = [];
        assert!(lcs(&empty, &[1, 2], eq).is_empty());
        assert!(lcs(&[1, 2], &empty, eq).is_empty());
        assert!(lcs(&empty, &empty, eq).is_empty());
    }

    #[test]
    fn tarot_against_art() {
        let xs: Vec<char> = "TAROT".chars().collect();
        let ys: Vec<char> = "ART".chars().collect();
        let grid = lcs_grid(&xs, &ys, |x, y| x == y);
        assert_eq!(grid[3][5].length, 3);
        assert_eq!(lcs(&xs, &ys, |x, y| x == y), vec![(1, 0), (2, 1), (4, 2)]);
    }

    #[test]
    fn predicate_may_compare_different_types() {
        let xs = ["a", "bb", "ccc"];
        let ys = [3usize, 1];
        // (0, 1) and (2, 0) tie; skipping xs first keeps (0, 1)
        assert_eq!(lcs(&xs, &ys, |x, y| x.len() == *y), vec![(0, 1)]);
    }

    #[test]
    fn disjoint_sequences_match_nothing() {
        assert!(lcs(&[1, 2, 3], &[4, 5], eq).is_empty());
    }
}
