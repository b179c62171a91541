use core_types::{PriceTable, ReturnTable};

/// Derives period-over-period returns for every column of a price table.
///
/// Each value is `(p[t] - p[t-1]) / p[t-1]`, where `t - 1` is the previous row of the
/// table. When either price is missing, or the prior price is zero, the return is `None`.
/// The first row has no prior price, so it never carries a value; rows without a value in
/// any column are removed while partially covered rows are kept.
///
/// An empty price table yields an empty return table.
pub fn compute_returns(prices: &PriceTable) -> ReturnTable {
    if prices.is_empty() {
        return ReturnTable::new();
    }
    prices.map_columns(period_returns).drop_empty_rows()
}

/// Returns for a single price column, aligned with the input (first entry is `None`).
pub fn period_returns(prices: &[Option<f64>]) -> Vec<Option<f64>> {
    let mut returns = Vec::with_capacity(prices.len());
    if prices.is_empty() {
        return returns;
    }

    returns.push(None);
    returns.extend(prices.windows(2).map(|pair| match (pair[0], pair[1]) {
        (Some(prev), Some(curr)) if prev != 0.0 => Some((curr - prev) / prev),
        _ => None,
    }));
    returns
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    fn dates(n: usize) -> Vec<NaiveDate> {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        start.iter_days().take(n).collect()
    }

    #[test]
    fn empty_prices_give_empty_returns() {
        assert!(compute_returns(&PriceTable::new()).is_empty());
    }

    #[test]
    fn first_row_is_dropped() {
        let prices = PriceTable::from_columns(
            dates(3),
            vec![("AAPL", vec![Some(100.0), Some(110.0), Some(99.0)])],
        )
        .unwrap();

        let returns = compute_returns(&prices);
        assert_eq!(returns.len(), 2);
        assert_eq!(returns.dates(), &prices.dates()[1..]);

        let column = returns.column("AAPL").unwrap();
        assert_relative_eq!(column[0].unwrap(), 0.1, epsilon = 1e-12);
        assert_relative_eq!(column[1].unwrap(), -0.1, epsilon = 1e-12);
    }

    #[test]
    fn gaps_and_zero_prices_yield_missing_returns() {
        let prices = PriceTable::from_columns(
            dates(5),
            vec![("AAPL", vec![Some(10.0), None, Some(12.0), Some(0.0), Some(5.0)])],
        )
        .unwrap();

        assert_eq!(
            period_returns(prices.column("AAPL").unwrap()),
            vec![None, None, None, Some(-1.0), None]
        );
    }

    #[test]
    fn partial_rows_are_kept_and_empty_rows_dropped() {
        let prices = PriceTable::from_columns(
            dates(4),
            vec![
                ("AAPL", vec![Some(10.0), Some(11.0), None, None]),
                ("SPY", vec![Some(100.0), Some(100.0), Some(101.0), None]),
            ],
        )
        .unwrap();

        let returns = compute_returns(&prices);
        // Row 1 has both, row 2 only SPY, row 3 neither.
        assert_eq!(returns.dates(), &prices.dates()[1..3]);
        assert_eq!(returns.column("AAPL").unwrap()[1], None);
        assert_eq!(returns.column("SPY").unwrap()[0], Some(0.0));
    }

    proptest::proptest! {
        #[test]
        fn never_more_rows_than_prices_and_first_date_never_defined(
            values in proptest::collection::vec(proptest::option::of(1.0f64..1000.0), 0..30)
        ) {
            let prices = PriceTable::from_columns(dates(values.len()), vec![("X", values)]).unwrap();
            let returns = compute_returns(&prices);

            proptest::prop_assert!(returns.len() <= prices.len());
            if let Some(first) = prices.dates().first() {
                proptest::prop_assert_eq!(returns.value(*first, "X"), None);
            }
        }
    }
}
