//! Timing check for a full recompute pass.

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use std::time::{Duration, Instant};

    use crate::aggregate::Aggregator;
    use crate::goals::Goals;
    use crate::period::YearMonth;
    use crate::transaction::{Transaction, TransactionType};
    use crate::view::{StatusMode, ViewConfig};

    /// A month-sized snapshot with a realistic mix of labels.
    fn generate_snapshot(count: usize) -> Vec<Transaction> {
        let categories = ["food", "rent", "transport", "health", "fun", ""];
        let parties = ["primary", "partner", "shared", ""];

        (0..count)
            .map(|i| {
                let kind = if i % 7 == 0 {
                    TransactionType::Income
                } else {
                    TransactionType::Expense
                };
                let day = i % 28 + 1;
                let mut tx = Transaction::new(
                    format!("tx-{i:06}"),
                    format!("2026-01-{day:02}"),
                    kind,
                    Decimal::new(i64::try_from(i * 137 % 100_000).unwrap_or(0), 2),
                )
                .with_category(categories[i % categories.len()])
                .with_responsibility(parties[i % parties.len()]);
                tx.status = i % 5 != 0;
                tx
            })
            .collect()
    }

    #[test]
    fn benchmark_aggregate_5000_records() {
        let snapshot = generate_snapshot(5000);
        let mut goals = Goals::new();
        goals.insert("food", Decimal::from(3000)).unwrap();
        goals.insert("fun", Decimal::from(500)).unwrap();
        let view = ViewConfig::for_months(YearMonth::new(2026, 1).unwrap(), None)
            .unwrap()
            .with_status_mode(StatusMode::All);
        let aggregator = Aggregator::default();

        let start = Instant::now();
        let (rows, result) = aggregator.run(&snapshot, &goals, &view);
        let duration = start.elapsed();

        println!("\n=== BENCHMARK: 5000 records, one month ===");
        println!("Duration: {duration:?}");
        println!("Rows: {}, buckets: {}", rows.len(), result.period_buckets.len());

        assert_eq!(rows.len(), 5000);
        // Generous bound for unoptimized test builds; well under a frame in release.
        assert!(
            duration < Duration::from_millis(500),
            "aggregation took {duration:?}"
        );
    }
}
