//! Multicast split calculator.
//!
//! A multicast frame's receiver paths form a distribution tree rooted at
//! the sender. Wherever two receiver paths stop sharing a link, the switch
//! at that hop must replicate the frame onto several ports. This module
//! derives those branch points as groups of link indices.

/// Compute the branch groups for one frame's receiver paths.
///
/// Walks positions 0,1,2,... across all paths simultaneously. A path is
/// alive while the position is inside its length; at each position the
/// distinct link indices of the alive paths are collected, and a position
/// holding two or more distinct values contributes one branch group (each
/// value once, in first-seen order). A path merely ending never triggers a
/// group on its own. The scan stops as soon as fewer than two paths remain
/// alive, since no further disagreement is possible.
///
/// A single path, or no path at all, yields no groups.
pub fn compute_splits(paths: &[&[usize]]) -> Vec<Vec<usize>> {
    let mut groups = Vec::new();
    let mut position = 0;
    loop {
        let alive: Vec<&[usize]> = paths
            .iter()
            .copied()
            .filter(|path| position < path.len())
            .collect();
        if alive.len() < 2 {
            break;
        }
        let mut distinct: Vec<usize> = Vec::new();
        for path in &alive {
            if !distinct.contains(&path[position]) {
                distinct.push(path[position]);
            }
        }
        if distinct.len() >= 2 {
            groups.push(distinct);
        }
        position += 1;
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_receiver_has_no_splits() {
        let path: &[usize] = &[0, 2, 4];
        assert!(compute_splits(&[path]).is_empty());
        assert!(compute_splits(&[]).is_empty());
    }

    #[test]
    fn identical_paths_never_split() {
        let a: &[usize] = &[0, 2, 4];
        let b: &[usize] = &[0, 2, 4];
        assert!(compute_splits(&[a, b]).is_empty());
    }

    #[test]
    fn disjoint_paths_split_at_first_hop() {
        let a: &[usize] = &[0, 2];
        let b: &[usize] = &[6, 8];
        assert_eq!(compute_splits(&[a, b]), vec![vec![0, 6]]);
    }

    #[test]
    fn shared_prefix_splits_after_it() {
        let a: &[usize] = &[0, 2, 4];
        let b: &[usize] = &[0, 2, 6];
        assert_eq!(compute_splits(&[a, b]), vec![vec![4, 6]]);
    }

    #[test]
    fn duplicate_values_appear_once_per_group() {
        let a: &[usize] = &[0, 2];
        let b: &[usize] = &[0, 2];
        let c: &[usize] = &[0, 6];
        assert_eq!(compute_splits(&[a, b, c]), vec![vec![2, 6]]);
    }

    #[test]
    fn ended_path_does_not_split() {
        // The short path ends before the others diverge; only the two
        // survivors can disagree.
        let a: &[usize] = &[0];
        let b: &[usize] = &[0, 2, 4];
        let c: &[usize] = &[0, 2, 6];
        assert_eq!(compute_splits(&[a, b, c]), vec![vec![4, 6]]);
    }

    #[test]
    fn scan_stops_below_two_alive() {
        // After position 1 only one path is alive, so its tail is ignored
        let a: &[usize] = &[0, 2];
        let b: &[usize] = &[0, 4, 6, 8];
        assert_eq!(compute_splits(&[a, b]), vec![vec![2, 4]]);
    }

    #[test]
    fn groups_keep_discovery_order() {
        let a: &[usize] = &[0, 2, 4];
        let b: &[usize] = &[0, 6, 8];
        let c: &[usize] = &[0, 6, 10];
        assert_eq!(
            compute_splits(&[a, b, c]),
            vec![vec![2, 6], vec![4, 8, 10]]
        );
    }
}
