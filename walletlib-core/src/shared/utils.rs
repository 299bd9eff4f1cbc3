//! Balance helpers shared by the local repositories

use crate::shared::types::{Amount, Balances};

/// Build a wallet holding every listed currency at zero
pub fn zeroed_balances<S: AsRef<str>>(currencies: &[S]) -> Balances {
    currencies
        .iter()
        .map(|currency| (currency.as_ref().to_string(), 0))
        .collect()
}

/// Bring a persisted wallet in line with the configured currency list.
///
/// With `create_clean` every existing entry is reset to zero. Listed
/// currencies missing from the wallet are added at zero. Returns whether the
/// wallet changed and needs to be written back.
pub fn reconcile_currencies<S: AsRef<str>>(
    balances: &mut Balances,
    currencies: &[S],
    create_clean: bool,
) -> bool {
    let mut changed = false;

    if create_clean {
        for value in balances.values_mut() {
            *value = 0;
        }
        changed = true;
    }

    for currency in currencies {
        if !balances.contains_key(currency.as_ref()) {
            balances.insert(currency.as_ref().to_string(), 0);
            changed = true;
        }
    }

    changed
}

/// First currency holding a negative amount, if any
pub fn first_negative(balances: &Balances) -> Option<(&str, Amount)> {
    balances
        .iter()
        .find(|(_, value)| **value < 0)
        .map(|(currency, value)| (currency.as_str(), *value))
}
