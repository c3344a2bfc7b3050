//! Ranking with averaged ties.

/// Assign 1-based ranks to `data`; tied values share the mean of the ranks
/// they span (`[3, 1, 2, 2]` → `[4, 1, 2.5, 2.5]`).
pub fn average_ranks(data: &[f64]) -> Vec<f64> {
    let mut order: Vec<usize> = (0..data.len()).collect();
    order.sort_by(|&a, &b| data[a].total_cmp(&data[b]));

    let mut ranks = vec![0.0; data.len()];
    let mut start = 0;
    while start < order.len() {
        let value = data[order[start]];
        // `total_cmp` keeps -0.0 and 0.0 adjacent; `==` merges them into one tie.
        let end = order[start + 1..]
            .iter()
            .position(|&i| data[i] != value)
            .map_or(order.len(), |offset| start + 1 + offset);

        // Positions start..end hold ranks start+1..=end; their mean:
        let shared = (start + 1 + end) as f64 / 2.0;
        for &i in &order[start..end] {
            ranks[i] = shared;
        }
        start = end;
    }
    ranks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_ties() {
        assert_eq!(average_ranks(&[3.0, 1.0, 2.0]), vec![3.0, 1.0, 2.0]);
    }

    #[test]
    fn ties_share_mean_rank() {
        assert_eq!(average_ranks(&[3.0, 1.0, 2.0, 2.0]), vec![4.0, 1.0, 2.5, 2.5]);
        assert_eq!(average_ranks(&[5.0, 5.0, 5.0]), vec![2.0, 2.0, 2.0]);
        assert_eq!(
            average_ranks(&[1.0, 0.5, 0.5, 0.5, 0.2]),
            vec![5.0, 3.0, 3.0, 3.0, 1.0]
        );
    }

    #[test]
    fn signed_zeros_tie() {
        assert_eq!(average_ranks(&[0.0, -0.0, 0.0]), vec![2.0, 2.0, 2.0]);
        assert_eq!(
            average_ranks(&[1.0, -0.0, 0.0, -1.0]),
            vec![4.0, 2.5, 2.5, 1.0]
        );
    }

    #[test]
    fn nan_ranks_alone() {
        let ranks = average_ranks(&[f64::NAN, 1.0, f64::NAN]);
        assert_eq!(ranks[1], 1.0);
        assert!(ranks[0] > 1.0 && ranks[2] > 1.0);
        assert_ne!(ranks[0], ranks[2]);
    }

    #[test]
    fn empty() {
        assert!(average_ranks(&[]).is_empty());
    }
}
