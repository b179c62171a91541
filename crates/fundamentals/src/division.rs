use rust_decimal::prelude::ToPrimitive;

/// Divides two optional figures, returning `None` instead of failing.
///
/// The result is `None` when either operand is missing or cannot be represented as an
/// `f64`, when the denominator is zero or NaN, or when the quotient is not finite.
/// A zero numerator is a valid input and yields `Some(0.0)`.
pub fn safe_divide<N, D>(numerator: Option<N>, denominator: Option<D>) -> Option<f64>
where
    N: ToPrimitive,
    D: ToPrimitive,
{
    let denominator = denominator?.to_f64()?;
    if denominator == 0.0 || denominator.is_nan() {
        return None;
    }
    let numerator = numerator?.to_f64()?;

    let quotient = numerator / denominator;
    quotient.is_finite().then_some(quotient)
}
