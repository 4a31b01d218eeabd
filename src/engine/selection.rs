//! Per-dimension parent selection.
//!
//! Each generation step rebuilds a recursive tree of winners: dimension 0
//! filters the whole generation, and every kept group is filtered again by
//! the next score dimension, one tree level per objective. Groups reference
//! generation items by index, so the tree lives no longer than the step that
//! built it.

use crate::engine::genome::SolutionItem;
use crate::error::{EvoSearchError, Result};
use std::collections::BTreeSet;

/// Winners at one score dimension. `members` index into the generation the
/// tree was built from, ordered best first. `groups` holds the selection at
/// the next dimension; only the deepest level is childless.
#[derive(Debug, Clone)]
pub struct ParentGroup {
    pub members: Vec<usize>,
    pub groups: Vec<ParentGroup>,
}

/// Top-level groups for one generation step.
pub type Parents = Vec<ParentGroup>;

/// Build the selection tree for one generation.
///
/// At each dimension the pool is sorted best first, then trimmed to the
/// items clearing a mean-relative threshold, with the first
/// `min_best_count` kept unconditionally so the pool never collapses under
/// a degenerate score distribution. Without speciation every level holds
/// exactly one group; requesting speciation is a fatal error while the
/// clustering hook remains unimplemented.
pub fn build_parents<T>(
    generation: &[SolutionItem<T>],
    directions: &[bool],
    min_best_count: usize,
    std_dev_multiplier: f64,
    speciate: bool,
) -> Result<Parents> {
    if directions.is_empty() {
        return Err(EvoSearchError::Contract(
            "At least one score dimension is required".to_string(),
        ));
    }
    for item in generation {
        if item.score.len() != directions.len() {
            return Err(EvoSearchError::Contract(format!(
                "Score vector length {} does not match {} declared dimensions",
                item.score.len(),
                directions.len()
            )));
        }
    }

    let pool: Vec<usize> = (0..generation.len()).collect();
    build_dimension(
        generation,
        directions,
        0,
        &pool,
        min_best_count,
        std_dev_multiplier,
        speciate,
    )
}

fn build_dimension<T>(
    generation: &[SolutionItem<T>],
    directions: &[bool],
    dim: usize,
    pool: &[usize],
    min_best_count: usize,
    std_dev_multiplier: f64,
    speciate: bool,
) -> Result<Vec<ParentGroup>> {
    let ascend = directions[dim];

    let mut sorted = pool.to_vec();
    sorted.sort_by(|&a, &b| {
        let lhs = generation[a].score[dim];
        let rhs = generation[b].score[dim];
        let ord = lhs.partial_cmp(&rhs).unwrap_or(std::cmp::Ordering::Equal);
        if ascend {
            ord.reverse()
        } else {
            ord
        }
    });

    let threshold = keep_threshold(generation, dim, &sorted, ascend, std_dev_multiplier);

    let mut kept = Vec::new();
    for (rank, &idx) in sorted.iter().enumerate() {
        if rank < min_best_count {
            kept.push(idx);
            continue;
        }
        let value = generation[idx].score[dim];
        let clears = if ascend {
            value >= threshold
        } else {
            value <= threshold
        };
        if !clears {
            break;
        }
        kept.push(idx);
    }

    if speciate {
        return Err(EvoSearchError::SpeciationUnimplemented);
    }

    // Without speciation the kept pool is a single group.
    let groups = if dim + 1 < directions.len() {
        build_dimension(
            generation,
            directions,
            dim + 1,
            &kept,
            min_best_count,
            std_dev_multiplier,
            speciate,
        )?
    } else {
        Vec::new()
    };

    Ok(vec![ParentGroup {
        members: kept,
        groups,
    }])
}

fn keep_threshold<T>(
    generation: &[SolutionItem<T>],
    dim: usize,
    pool: &[usize],
    ascend: bool,
    std_dev_multiplier: f64,
) -> f64 {
    let n = pool.len() as f64;
    if pool.is_empty() {
        return 0.0;
    }
    let mean = pool.iter().map(|&i| generation[i].score[dim]).sum::<f64>() / n;
    let variance = pool
        .iter()
        .map(|&i| {
            let d = generation[i].score[dim] - mean;
            d * d
        })
        .sum::<f64>()
        / n;
    let std_dev = variance.sqrt();
    if ascend {
        mean + std_dev_multiplier * std_dev
    } else {
        mean - std_dev_multiplier * std_dev
    }
}

/// Every node of the tree, all levels, pre-order. Breeding samples from this
/// flat view, so intermediate levels are deliberately included even though
/// their member sets are supersets of the deeper ones.
pub fn collect_nodes(parents: &[ParentGroup]) -> Vec<&ParentGroup> {
    let mut nodes = Vec::new();
    for group in parents {
        push_nodes(group, &mut nodes);
    }
    nodes
}

fn push_nodes<'a>(group: &'a ParentGroup, out: &mut Vec<&'a ParentGroup>) {
    out.push(group);
    for child in &group.groups {
        push_nodes(child, out);
    }
}

/// Union of all member indices referenced anywhere in the tree, deduplicated.
/// These are the elites carried over into the next generation unchanged.
pub fn referenced_members(parents: &[ParentGroup]) -> Vec<usize> {
    let mut seen = BTreeSet::new();
    for node in collect_nodes(parents) {
        for &idx in &node.members {
            seen.insert(idx);
        }
    }
    seen.into_iter().collect()
}

/// Generation winner: follow the first group at every level down to the
/// deepest leaf and take its first member. Equivalent to the lexicographic
/// best across dimensions in declared order while each level holds a single
/// group.
pub fn winner(parents: &[ParentGroup]) -> Option<usize> {
    let mut group = parents.first()?;
    while let Some(child) = group.groups.first() {
        group = child;
    }
    group.members.first().copied()
}

/// Strict dominance used for new-best reporting: `a` must beat `b` in every
/// dimension simultaneously, direction-aware.
pub fn strictly_better(a: &[f64], b: &[f64], directions: &[bool]) -> bool {
    if a.len() != b.len() || a.len() != directions.len() {
        return false;
    }
    a.iter()
        .zip(b)
        .zip(directions)
        .all(|((&av, &bv), &ascend)| if ascend { av > bv } else { av < bv })
}
