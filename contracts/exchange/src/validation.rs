use crate::error::Error;
use crate::types::{BillingParams, SubscriptionTerm, SwapPair, SwapSide};

/// Structural checks on a pair before it is stored
///
/// Token existence is checked against the registry by the caller.
pub fn validate_pair(pair: &SwapPair) -> Result<(), Error> {
    if pair.source_token == pair.destination_token {
        return Err(Error::InvalidPair);
    }
    if pair.rate_num <= 0 || pair.rate_den <= 0 {
        return Err(Error::InvalidPair);
    }
    if pair.fee < 0 || pair.min_amount < 0 {
        return Err(Error::InvalidPair);
    }
    if pair.buy_only && pair.sell_only {
        return Err(Error::InvalidPair);
    }
    Ok(())
}

/// Direction flags and minimum size for a swap request
pub fn check_swap_request(pair: &SwapPair, amount: i128, side: SwapSide) -> Result<(), Error> {
    if !pair.active {
        return Err(Error::PairInactive);
    }

    let allowed = match side {
        SwapSide::Buy => !pair.sell_only,
        SwapSide::Sell => !pair.buy_only,
    };
    if !allowed {
        return Err(Error::DirectionNotAllowed);
    }

    if amount < pair.min_amount {
        return Err(Error::BelowMinimum);
    }
    Ok(())
}

pub fn validate_term(term: &SubscriptionTerm) -> Result<(), Error> {
    if term.interval == 0 || term.amount <= 0 {
        return Err(Error::InvalidTerm);
    }
    Ok(())
}

/// The per-event ceiling must at least cover one nominal cycle
pub fn validate_billing(billing: &BillingParams, term: &SubscriptionTerm) -> Result<(), Error> {
    if billing.max_amount < term.amount {
        return Err(Error::InvalidBillingParams);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::BillingPeriod;

    fn pair() -> SwapPair {
        SwapPair {
            pair_id: 1,
            source_token: 1,
            destination_token: 2,
            rate_num: 1,
            rate_den: 1,
            min_amount: 10,
            fee: 0,
            oracle: None,
            oracle_decimals: 0,
            oracle_inverse: false,
            merchant_only: false,
            buy_only: false,
            sell_only: false,
            active: true,
        }
    }

    fn term() -> SubscriptionTerm {
        SubscriptionTerm {
            term_id: 1,
            token_id: 1,
            interval: 30 * 86_400,
            amount: 50,
            trial_period: 0,
            grace_period: 0,
            max_cycles: 0,
        }
    }

    #[test]
    fn test_validate_pair() {
        assert_eq!(validate_pair(&pair()), Ok(()));

        let mut same_token = pair();
        same_token.destination_token = 1;
        assert_eq!(validate_pair(&same_token), Err(Error::InvalidPair));

        let mut zero_rate = pair();
        zero_rate.rate_den = 0;
        assert_eq!(validate_pair(&zero_rate), Err(Error::InvalidPair));

        let mut negative_fee = pair();
        negative_fee.fee = -1;
        assert_eq!(validate_pair(&negative_fee), Err(Error::InvalidPair));

        let mut both_directions = pair();
        both_directions.buy_only = true;
        both_directions.sell_only = true;
        assert_eq!(validate_pair(&both_directions), Err(Error::InvalidPair));
    }

    #[test]
    fn test_check_swap_request() {
        assert_eq!(check_swap_request(&pair(), 10, SwapSide::Buy), Ok(()));
        assert_eq!(
            check_swap_request(&pair(), 9, SwapSide::Buy),
            Err(Error::BelowMinimum)
        );

        let mut buy_only = pair();
        buy_only.buy_only = true;
        assert_eq!(check_swap_request(&buy_only, 10, SwapSide::Buy), Ok(()));
        assert_eq!(
            check_swap_request(&buy_only, 10, SwapSide::Sell),
            Err(Error::DirectionNotAllowed)
        );

        let mut inactive = pair();
        inactive.active = false;
        assert_eq!(
            check_swap_request(&inactive, 10, SwapSide::Buy),
            Err(Error::PairInactive)
        );
    }

    #[test]
    fn test_validate_term_and_billing() {
        assert_eq!(validate_term(&term()), Ok(()));

        let mut no_interval = term();
        no_interval.interval = 0;
        assert_eq!(validate_term(&no_interval), Err(Error::InvalidTerm));

        let billing = BillingParams {
            granularity: BillingPeriod::Month,
            max_amount: 49,
        };
        assert_eq!(
            validate_billing(&billing, &term()),
            Err(Error::InvalidBillingParams)
        );
    }
}
