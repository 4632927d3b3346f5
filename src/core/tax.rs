use crate::core::resolver;
use crate::domain::ports::RateRepository;
use crate::utils::error::{Result, VatError};
use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TaxedAmount {
    pub net: Decimal,
    pub gross: Decimal,
    pub tax: Decimal,
}

/// Applies a flat percentage rate to `amount`.
///
/// With `keep_gross` the amount is treated as already including tax and the net is derived
/// from it; otherwise the amount is the net and tax is added on top.
///
/// Fails instead of panicking when the result does not fit a `Decimal` or the rate is -100%.
pub fn flat_tax(amount: Decimal, rate_percent: Decimal, keep_gross: bool) -> Result<TaxedAmount> {
    let overflow = || {
        VatError::arithmetic(format!(
            "cannot apply {}% to {} (keep_gross = {})",
            rate_percent, amount, keep_gross
        ))
    };

    let multiplier = rate_percent
        .checked_div(Decimal::ONE_HUNDRED)
        .and_then(|fraction| Decimal::ONE.checked_add(fraction))
        .ok_or_else(overflow)?;

    let (net, gross) = if keep_gross {
        (amount.checked_div(multiplier).ok_or_else(overflow)?, amount)
    } else {
        (amount, amount.checked_mul(multiplier).ok_or_else(overflow)?)
    };

    Ok(TaxedAmount {
        net,
        gross,
        tax: gross.checked_sub(net).ok_or_else(overflow)?,
    })
}

/// Resolves the country's rate and applies it to `amount`.
pub fn tax_for_country<R>(
    repository: &R,
    country_code: &str,
    rate_name: Option<&str>,
    amount: Decimal,
    keep_gross: bool,
) -> Result<Option<TaxedAmount>>
where
    R: RateRepository + ?Sized,
{
    match resolver::resolve(repository, country_code, rate_name)? {
        Some(rate) => flat_tax(amount, rate, keep_gross).map(Some),
        None => Ok(None),
    }
}
