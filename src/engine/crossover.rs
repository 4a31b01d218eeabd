use crate::engine::genome::Genome;
use crate::error::{EvoSearchError, Result};
use rand::seq::index;
use rand::Rng;

/// Bound on the per-stripe parent-assignment search. Exceeding it means the
/// no-repeat constraint was unsatisfiable, which is an internal invariant
/// violation rather than bad luck.
const MAX_ASSIGNMENT_ATTEMPTS: usize = 100_000;

/// Multi-parent stripe crossover.
///
/// Picks `num_slices` distinct cut points (clamped to `L - 1`), partitioning
/// the columns into contiguous stripes. Each stripe is assigned to the
/// children via a fresh permutation of the parent indices, constrained so
/// that no child draws two consecutive stripes from the same parent. Every
/// output column is copied verbatim from exactly one parent's matching
/// column.
///
/// Zero parents yield no children; a single parent passes through unchanged.
pub fn crossover<T: Clone, R: Rng>(
    parents: &[Genome<T>],
    num_slices: usize,
    rng: &mut R,
) -> Result<Vec<Genome<T>>> {
    if parents.is_empty() {
        return Ok(Vec::new());
    }
    if parents.len() == 1 {
        return Ok(vec![parents[0].clone()]);
    }

    let len = parents[0].len();
    if len == 0 {
        return Err(EvoSearchError::Contract(
            "Crossover parents must have at least one element".to_string(),
        ));
    }
    for parent in &parents[1..] {
        if parent.len() != len {
            return Err(EvoSearchError::Contract(format!(
                "Mismatched parent genome lengths: {} vs {}",
                len,
                parent.len()
            )));
        }
    }

    // Cut point p splits between column p and p + 1, so the candidate pool
    // has L - 1 positions and at least one full stripe always survives.
    let num_slices = num_slices.min(len - 1);
    let mut cuts: Vec<usize> = index::sample(rng, len - 1, num_slices).into_vec();
    cuts.sort_unstable();

    let n = parents.len();
    let mut children: Vec<Genome<T>> = (0..n).map(|_| Vec::with_capacity(len)).collect();

    let mut prev: Option<Vec<usize>> = None;
    let mut start = 0usize;
    for stripe in 0..=num_slices {
        let end = if stripe < cuts.len() { cuts[stripe] + 1 } else { len };
        let assignment = stripe_assignment(n, prev.as_deref(), rng)?;
        for (child, &parent_idx) in children.iter_mut().zip(&assignment) {
            child.extend_from_slice(&parents[parent_idx][start..end]);
        }
        prev = Some(assignment);
        start = end;
    }

    Ok(children)
}

/// Permutation of `0..n` assigning one parent per child for a single stripe.
///
/// When `prev` is given, the result must differ from it at every position.
/// Draws without replacement, redrawing any pick that matches `prev`; with
/// two values left, swaps the current pick for the leftover when the
/// leftover would otherwise collide at the final position and the swap is
/// itself legal. A full dead end restarts the whole permutation, bounded by
/// `MAX_ASSIGNMENT_ATTEMPTS`.
fn stripe_assignment<R: Rng>(n: usize, prev: Option<&[usize]>, rng: &mut R) -> Result<Vec<usize>> {
    let mut attempts = 0usize;
    'search: loop {
        attempts += 1;
        if attempts > MAX_ASSIGNMENT_ATTEMPTS {
            return Err(EvoSearchError::Internal(format!(
                "Parent assignment search exceeded {} attempts",
                MAX_ASSIGNMENT_ATTEMPTS
            )));
        }

        let mut remaining: Vec<usize> = (0..n).collect();
        let mut assignment = Vec::with_capacity(n);
        for pos in 0..n {
            let banned = prev.map(|p| p[pos]);
            let mut pick_at = rng.gen_range(0..remaining.len());
            if Some(remaining[pick_at]) == banned {
                if remaining.len() == 1 {
                    // last value is exactly the banned one
                    continue 'search;
                }
                let offset = rng.gen_range(1..remaining.len());
                pick_at = (pick_at + offset) % remaining.len();
            }

            if remaining.len() == 2 {
                // The value not taken here lands on the final position; take
                // it now instead when it would collide there and the swap
                // leaves both positions legal.
                let other_at = 1 - pick_at;
                let leftover = remaining[other_at];
                let next_banned = prev.map(|p| p[pos + 1]);
                if next_banned.is_some()
                    && Some(leftover) == next_banned
                    && Some(remaining[pick_at]) != next_banned
                    && Some(leftover) != banned
                {
                    pick_at = other_at;
                }
            }

            assignment.push(remaining.swap_remove(pick_at));
        }
        return Ok(assignment);
    }
}
