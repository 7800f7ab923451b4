use std::cmp::Ordering;

/// Assigns competition ranks over arbitrary entries, ranking by the
/// value the closure extracts (raw score for a single round, cumulative
/// final score for a session summary).
///
/// Ordering is descending. Equal values share a rank; the entry after a
/// tie takes its 1-based sorted position, so ranks skip ahead past the
/// tied group (`[30000, 30000, 20000, 20000]` ranks as `[1, 1, 3, 3]`).
/// The returned ranks are aligned with the input order.
pub fn resolve_ranks<T, F>(entries: &[T], value: F) -> Vec<u32>
where
    F: Fn(&T) -> f64,
{
    let mut order: Vec<usize> = (0..entries.len()).collect();
    // Stable sort: tied entries keep their declaration order.
    order.sort_by(|&a, &b| {
        value(&entries[b])
            .partial_cmp(&value(&entries[a]))
            .unwrap_or(Ordering::Equal)
    });

    let mut ranks = vec![0u32; entries.len()];
    let mut current_rank = 1u32;
    for (position, &index) in order.iter().enumerate() {
        if position > 0 {
            let previous = order[position - 1];
            if value(&entries[index]) < value(&entries[previous]) {
                current_rank = position as u32 + 1;
            }
        }
        ranks[index] = current_rank;
    }
    ranks
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(vec![45000.0, 30000.0, 15000.0, 10000.0], vec![1, 2, 3, 4])]
    #[case(vec![30000.0, 30000.0, 20000.0, 20000.0], vec![1, 1, 3, 3])]
    #[case(vec![25000.0, 25000.0, 25000.0, 25000.0], vec![1, 1, 1, 1])]
    #[case(vec![10000.0, 20000.0, 30000.0, 40000.0], vec![4, 3, 2, 1])]
    #[case(vec![30000.0, 40000.0, 30000.0, 0.0], vec![2, 1, 2, 4])]
    fn ranks_are_shared_on_ties_and_skip_after(
        #[case] values: Vec<f64>,
        #[case] expected: Vec<u32>,
    ) {
        let ranks = resolve_ranks(&values, |v| *v);
        assert_eq!(ranks, expected);
    }

    #[test]
    fn empty_input_yields_empty_output() {
        let ranks = resolve_ranks::<f64, _>(&[], |v| *v);
        assert!(ranks.is_empty());
    }

    #[test]
    fn higher_value_never_ranks_worse() {
        let values = [12.5, -3.0, 40.0, 12.5, 0.0];
        let ranks = resolve_ranks(&values, |v| *v);
        for i in 0..values.len() {
            for j in 0..values.len() {
                if values[i] > values[j] {
                    assert!(ranks[i] < ranks[j]);
                }
                if values[i] == values[j] {
                    assert_eq!(ranks[i], ranks[j]);
                }
            }
        }
    }
}
