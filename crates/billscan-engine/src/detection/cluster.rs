use crate::types::Transaction;

/// A group of one merchant's debits sharing near-equal amounts.
#[derive(Debug, Clone)]
pub struct AmountCluster {
    /// Absolute amount of the first transaction seen for this cluster.
    pub representative_amount: f64,
    pub rows: Vec<Transaction>,
}

impl AmountCluster {
    pub fn mean_amount(&self) -> f64 {
        if self.rows.is_empty() {
            return 0.0;
        }
        let total: f64 = self.rows.iter().map(Transaction::abs_amount).sum();
        total / (self.rows.len() as f64)
    }
}

/// Single-linkage online clustering over one merchant's debit transactions.
///
/// Rows are processed in input order; each joins the first existing cluster
/// whose representative amount is within `tolerance` relative difference,
/// otherwise it seeds a new cluster. Clusters smaller than `min_occurrences`
/// are discarded.
pub fn cluster_by_amount(
    rows: &[Transaction],
    tolerance: f64,
    min_occurrences: usize,
) -> Vec<AmountCluster> {
    let mut clusters: Vec<AmountCluster> = Vec::new();
    for row in rows {
        let amount = row.abs_amount();
        let joined = clusters.iter_mut().find(|cluster| {
            relative_difference(amount, cluster.representative_amount) <= tolerance
        });
        match joined {
            Some(cluster) => cluster.rows.push(row.clone()),
            None => clusters.push(AmountCluster {
                representative_amount: amount,
                rows: vec![row.clone()],
            }),
        }
    }

    clusters
        .into_iter()
        .filter(|cluster| cluster.rows.len() >= min_occurrences)
        .collect()
}

fn relative_difference(amount: f64, representative: f64) -> f64 {
    if representative.abs() <= f64::EPSILON {
        if amount.abs() <= f64::EPSILON {
            return 0.0;
        }
        return f64::INFINITY;
    }
    (amount - representative).abs() / representative.abs()
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use crate::types::{Transaction, TransactionKind};

    use super::cluster_by_amount;

    fn row(id: &str, amount: f64) -> Transaction {
        Transaction {
            id: id.to_string(),
            amount,
            description: "DD".to_string(),
            date: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap_or(NaiveDate::MIN),
            merchant: "Grid Co".to_string(),
            category: None,
            account_id: "acct_1".to_string(),
            bank_name: None,
            kind: TransactionKind::Debit,
        }
    }

    #[test]
    fn near_equal_amounts_share_one_cluster() {
        let rows = vec![row("t1", -45.0), row("t2", -45.9), row("t3", -44.2)];
        let clusters = cluster_by_amount(&rows, 0.05, 2);
        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].rows.len(), 3);
        assert_eq!(clusters[0].representative_amount, 45.0);
    }

    #[test]
    fn amounts_outside_tolerance_seed_new_clusters() {
        let rows = vec![row("t1", -45.0), row("t2", -90.0), row("t3", -45.5)];
        let clusters = cluster_by_amount(&rows, 0.05, 1);
        assert_eq!(clusters.len(), 2);
        assert_eq!(clusters[0].rows.len(), 2);
    }

    #[test]
    fn clusters_below_min_occurrences_are_discarded() {
        let rows = vec![row("t1", -45.0), row("t2", -90.0)];
        let clusters = cluster_by_amount(&rows, 0.05, 2);
        assert!(clusters.is_empty());
    }

    #[test]
    fn unbounded_tolerance_collapses_everything_into_one_cluster() {
        let rows = vec![row("t1", -12.0), row("t2", -95.0), row("t3", -33.0)];
        let clusters = cluster_by_amount(&rows, f64::INFINITY, 2);
        assert_eq!(clusters.len(), 1);
    }

    #[test]
    fn mean_amount_averages_absolute_values() {
        let rows = vec![row("t1", -40.0), row("t2", -50.0)];
        let clusters = cluster_by_amount(&rows, 0.5, 2);
        assert_eq!(clusters.len(), 1);
        assert!((clusters[0].mean_amount() - 45.0).abs() < f64::EPSILON);
    }
}
