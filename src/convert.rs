//! Cadence conversion through an annualized pivot.
//!
//! Every conversion multiplies up to an annual total and divides once by the
//! target rate. Aggregations sum the annual totals first so a whole list of
//! obligations incurs a single division.

use rust_decimal::Decimal;
use tracing::debug;

use crate::{
    cadence::{Cadence, ReportingCadence},
    errors::Result,
    obligation::{Obligation, ObligationKind},
};

/// Converts `amount` expressed per `from` into the equivalent amount per `to`.
///
/// Fails with [`EngineError::UnsupportedFrequency`](crate::EngineError) when
/// either side is one-time. The result is unrounded; round once for display
/// with [`crate::currency::round_to_minor`].
pub fn normalize<F: Cadence, T: Cadence>(amount: Decimal, from: F, to: T) -> Result<Decimal> {
    let annual_total = annualize(amount, from)?;
    Ok(annual_total / to.occurrences_per_year()?)
}

/// Annual total of an amount repeating at `from`.
pub fn annualize<F: Cadence>(amount: Decimal, from: F) -> Result<Decimal> {
    Ok(amount * from.occurrences_per_year()?)
}

/// Income needed per `cadence` to cover every recurring bill.
///
/// One-time items and income obligations never contribute. Bills count by
/// magnitude whatever sign they were stored with.
pub fn required_income(obligations: &[Obligation], cadence: ReportingCadence) -> Decimal {
    let mut counted = 0usize;
    let annual_total: Decimal = obligations
        .iter()
        .filter(|obligation| obligation.kind == ObligationKind::Bill)
        .filter_map(|obligation| {
            let annual = annualize(obligation.amount.abs(), obligation.frequency).ok()?;
            counted += 1;
            Some(annual)
        })
        .sum();
    let rate = cadence.annual_rate();
    debug!(
        counted,
        skipped = obligations.len() - counted,
        %cadence,
        "aggregated required income"
    );
    annual_total / rate
}

/// Share of required income already spent, as a percentage.
///
/// Returns `None` when nothing recurring is owed.
pub fn spending_progress(
    spent: Decimal,
    obligations: &[Obligation],
    cadence: ReportingCadence,
) -> Option<Decimal> {
    let required = required_income(obligations, cadence);
    if required.is_zero() {
        return None;
    }
    Some(spent.abs() / required * Decimal::ONE_HUNDRED)
}
