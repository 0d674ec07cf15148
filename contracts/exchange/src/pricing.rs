use crate::types::{SwapPair, SwapSide};

/// Exchange rate expressed as output units per input unit, `num / den`.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Rate {
    pub num: i128,
    pub den: i128,
}

impl Rate {
    pub fn inverse(self) -> Rate {
        Rate {
            num: self.den,
            den: self.num,
        }
    }

    /// Orient a destination-per-source rate for the given side.
    pub fn for_side(self, side: SwapSide) -> Rate {
        match side {
            SwapSide::Buy => self,
            SwapSide::Sell => self.inverse(),
        }
    }
}

/// Rate configured on the pair itself
pub fn static_rate(pair: &SwapPair) -> Rate {
    Rate {
        num: pair.rate_num,
        den: pair.rate_den,
    }
}

/// Rate derived from an oracle answer
///
/// Formula: rate = price / 10^decimals, or its reciprocal when the feed
/// quotes the pair the other way round.
///
/// Example:
/// - price: 2000_00000000, decimals: 8
/// - rate: 2000 (one source unit buys 2000 destination units)
pub fn oracle_rate(price: i128, decimals: u32, inverse: bool) -> Option<Rate> {
    if price <= 0 {
        return None;
    }
    let rate = Rate {
        num: price,
        den: 10i128.checked_pow(decimals)?,
    };
    Some(if inverse { rate.inverse() } else { rate })
}

/// Convert an input amount at `rate`, rescaling between token decimals
///
/// Formula: out = amount × num × 10^(dec_out − dec_in) / den
///
/// Example:
/// - amount: 100 (18 decimals), rate: 9/10, output token with 6 decimals
/// - out: 90 (6 decimals)
pub fn convert(amount: i128, rate: Rate, decimals_in: u32, decimals_out: u32) -> Option<i128> {
    if rate.num <= 0 || rate.den <= 0 {
        return None;
    }

    let scaled = amount.checked_mul(rate.num)?;
    if decimals_out >= decimals_in {
        let factor = 10i128.checked_pow(decimals_out - decimals_in)?;
        scaled.checked_mul(factor)?.checked_div(rate.den)
    } else {
        let factor = 10i128.checked_pow(decimals_in - decimals_out)?;
        scaled.checked_div(rate.den.checked_mul(factor)?)
    }
}

/// Output left after the flat fee, `None` when the fee consumes it all
pub fn net_of_fee(gross: i128, fee: i128) -> Option<i128> {
    let net = gross.checked_sub(fee)?;
    if net <= 0 {
        return None;
    }
    Some(net)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCALE: i128 = 1_000_000_000_000_000_000;

    #[test]
    fn test_par_rate() {
        let rate = Rate { num: 1, den: 1 };
        assert_eq!(convert(100 * SCALE, rate, 18, 18), Some(100 * SCALE));
    }

    #[test]
    fn test_discounted_rate_and_fee() {
        let rate = Rate { num: 9, den: 10 };
        let gross = convert(100 * SCALE, rate, 18, 18).unwrap();
        assert_eq!(gross, 90 * SCALE);

        let fee = 25 * SCALE / 1000; // 0.025
        assert_eq!(net_of_fee(gross, fee), Some(89_975 * SCALE / 1000));
    }

    #[test]
    fn test_sell_side_uses_reciprocal() {
        let rate = Rate { num: 1, den: 100 }.for_side(SwapSide::Sell);
        assert_eq!(convert(2 * SCALE, rate, 18, 18), Some(200 * SCALE));
    }

    #[test]
    fn test_oracle_rate() {
        let rate = oracle_rate(2_000_00000000, 8, false).unwrap();
        assert_eq!(convert(SCALE / 2, rate, 18, 18), Some(1_000 * SCALE));

        let inverse = oracle_rate(2_000_00000000, 8, true).unwrap();
        assert_eq!(convert(1_000 * SCALE, inverse, 18, 18), Some(SCALE / 2));

        assert_eq!(oracle_rate(0, 8, false), None);
    }

    #[test]
    fn test_decimal_rescaling() {
        let rate = Rate { num: 1, den: 1 };
        assert_eq!(convert(5 * SCALE, rate, 18, 6), Some(5_000_000));
        assert_eq!(convert(5_000_000, rate, 6, 18), Some(5 * SCALE));
    }

    #[test]
    fn test_fee_consuming_output() {
        assert_eq!(net_of_fee(10, 10), None);
        assert_eq!(net_of_fee(10, 11), None);
        assert_eq!(net_of_fee(10, 0), Some(10));
    }

    #[test]
    fn test_overflow_is_reported() {
        let rate = Rate {
            num: i128::MAX,
            den: 1,
        };
        assert_eq!(convert(2, rate, 18, 18), None);
    }
}
