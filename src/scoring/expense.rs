use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

use super::settlement::RoundSettlement;

/// Default conversion rate from final-score points to yen
pub const DEFAULT_YEN_PER_POINT: f64 = 100.0;

/// Residual balance below this threshold counts as settled
const SETTLED_EPSILON: f64 = 1e-9;

/// How a shared expense is charged across the table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PaymentMethod {
    /// Equal share for every player
    Split,
    /// The rank-1 finisher bears the full amount
    Winner,
    /// The bottom-ranked finisher bears the full amount
    Loser,
}

/// A shared expense attached to a game record (table fee, food, ...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameExpense {
    pub label: String,
    pub amount: f64,
    pub payment_method: PaymentMethod,
}

/// Net monetary position of one player. Positive means they owe money
/// overall, negative means they are owed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetBalance {
    pub name: String,
    pub amount: f64,
}

/// One pairwise payment instruction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    pub from: String,
    pub to: String,
    pub amount: f64,
}

/// Derives each player's net monetary position from a round's settled
/// scores plus any shared expenses. Winning points translate into being
/// owed money at `yen_per_point`.
pub fn build_balances(
    results: &[RoundSettlement],
    expenses: &[GameExpense],
    yen_per_point: f64,
) -> Vec<NetBalance> {
    let mut balances: Vec<NetBalance> = results
        .iter()
        .map(|r| NetBalance {
            name: r.name.clone(),
            amount: -r.final_score * yen_per_point,
        })
        .collect();

    let bottom_rank = results.iter().map(|r| r.rank).max().unwrap_or(0);

    for expense in expenses {
        match expense.payment_method {
            PaymentMethod::Split => {
                let share = expense.amount / results.len() as f64;
                for balance in balances.iter_mut() {
                    balance.amount += share;
                }
            }
            PaymentMethod::Winner => {
                if let Some(position) = results.iter().position(|r| r.rank == 1) {
                    balances[position].amount += expense.amount;
                }
            }
            PaymentMethod::Loser => {
                if let Some(position) = results.iter().position(|r| r.rank == bottom_rank) {
                    balances[position].amount += expense.amount;
                }
            }
        }
    }

    balances
}

/// Greedy debt settlement: repeatedly matches the largest debtor
/// against the largest creditor until one side is exhausted. For
/// zero-sum input this needs at most `participants - 1` payments.
/// Leftover balance from non-zero-sum input is dropped; the loop still
/// terminates because each match removes at least one party.
pub fn settle_debts(balances: &[NetBalance]) -> Vec<Payment> {
    let mut debtors: Vec<(String, f64)> = Vec::new();
    let mut creditors: Vec<(String, f64)> = Vec::new();

    for balance in balances {
        if balance.amount > SETTLED_EPSILON {
            debtors.push((balance.name.clone(), balance.amount));
        } else if balance.amount < -SETTLED_EPSILON {
            creditors.push((balance.name.clone(), -balance.amount));
        }
    }

    debtors.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    creditors.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    let mut payments = Vec::new();
    while !debtors.is_empty() && !creditors.is_empty() {
        let transfer = debtors[0].1.min(creditors[0].1);

        payments.push(Payment {
            from: debtors[0].0.clone(),
            to: creditors[0].0.clone(),
            amount: transfer,
        });

        debtors[0].1 -= transfer;
        creditors[0].1 -= transfer;

        if debtors[0].1 <= SETTLED_EPSILON {
            debtors.remove(0);
        }
        if creditors[0].1 <= SETTLED_EPSILON {
            creditors.remove(0);
        }
    }

    payments
}

#[cfg(test)]
mod tests {
    use super::*;

    fn balances(entries: &[(&str, f64)]) -> Vec<NetBalance> {
        entries
            .iter()
            .map(|(name, amount)| NetBalance {
                name: name.to_string(),
                amount: *amount,
            })
            .collect()
    }

    fn settled(rank: u32, name: &str, final_score: f64) -> RoundSettlement {
        RoundSettlement {
            player_id: format!("id-{}", name),
            name: name.to_string(),
            raw_score: 0,
            rank,
            placement_bonus: 0.0,
            pot_bonus: 0.0,
            final_score,
        }
    }

    #[test]
    fn settles_reference_balances_with_minimal_transactions() {
        let input = balances(&[("A", 30.0), ("B", 10.0), ("C", -20.0), ("D", -20.0)]);
        let payments = settle_debts(&input);

        // At most participants - 1 instructions.
        assert!(payments.len() <= 3);

        // Every creditor receives exactly their credit.
        for (creditor, credit) in [("C", 20.0), ("D", 20.0)] {
            let received: f64 = payments
                .iter()
                .filter(|p| p.to == creditor)
                .map(|p| p.amount)
                .sum();
            assert!((received - credit).abs() < 1e-9);
        }

        // Every debtor pays out exactly their debt.
        for (debtor, debt) in [("A", 30.0), ("B", 10.0)] {
            let paid: f64 = payments
                .iter()
                .filter(|p| p.from == debtor)
                .map(|p| p.amount)
                .sum();
            assert!((paid - debt).abs() < 1e-9);
        }
    }

    #[test]
    fn zero_balances_need_no_payments() {
        let input = balances(&[("A", 0.0), ("B", 0.0)]);
        assert!(settle_debts(&input).is_empty());
    }

    #[test]
    fn terminates_on_unbalanced_caller_input() {
        // Balances that do not sum to zero still terminate; the
        // unmatched remainder simply never produces an instruction.
        let input = balances(&[("A", 50.0), ("B", -20.0)]);
        let payments = settle_debts(&input);
        assert_eq!(payments.len(), 1);
        assert_eq!(payments[0].from, "A");
        assert_eq!(payments[0].to, "B");
        assert!((payments[0].amount - 20.0).abs() < 1e-9);
    }

    #[test]
    fn split_expense_is_shared_equally() {
        let results = vec![
            settled(1, "A", 40.0),
            settled(2, "B", 10.0),
            settled(3, "C", -20.0),
            settled(4, "D", -30.0),
        ];
        let expenses = vec![GameExpense {
            label: "table fee".to_string(),
            amount: 2000.0,
            payment_method: PaymentMethod::Split,
        }];

        let result = build_balances(&results, &expenses, DEFAULT_YEN_PER_POINT);
        assert_eq!(result[0].amount, -40.0 * 100.0 + 500.0);
        assert_eq!(result[3].amount, 30.0 * 100.0 + 500.0);
    }

    #[test]
    fn winner_and_loser_expenses_target_the_right_ranks() {
        let results = vec![
            settled(2, "B", 10.0),
            settled(1, "A", 40.0),
            settled(4, "D", -30.0),
            settled(3, "C", -20.0),
        ];
        let expenses = vec![
            GameExpense {
                label: "drinks".to_string(),
                amount: 1200.0,
                payment_method: PaymentMethod::Winner,
            },
            GameExpense {
                label: "dinner".to_string(),
                amount: 800.0,
                payment_method: PaymentMethod::Loser,
            },
        ];

        let result = build_balances(&results, &expenses, DEFAULT_YEN_PER_POINT);
        let by_name = |n: &str| result.iter().find(|b| b.name == n).unwrap().amount;
        assert_eq!(by_name("A"), -4000.0 + 1200.0);
        assert_eq!(by_name("D"), 3000.0 + 800.0);
        assert_eq!(by_name("B"), -1000.0);
    }

    #[test]
    fn round_balances_settle_back_to_zero() {
        let results = vec![
            settled(1, "A", 65.0),
            settled(2, "B", 10.0),
            settled(3, "C", -25.0),
            settled(4, "D", -50.0),
        ];
        let input = build_balances(&results, &[], DEFAULT_YEN_PER_POINT);
        let payments = settle_debts(&input);

        assert!(payments.len() <= 3);
        let transferred: f64 = payments.iter().map(|p| p.amount).sum();
        assert!((transferred - 7500.0).abs() < 1e-9);
    }
}
