use crate::custody::Custody;
use crate::error::Error;
use crate::events::{DepositEvent, PairStatusEvent, PairsRegisteredEvent, SwapEvent, WithdrawEvent};
use crate::interfaces::AccessControlClient;
use crate::pricing::{convert, net_of_fee, oracle_rate, static_rate, Rate};
use crate::registry::Registry;
use crate::storage::Storage;
use crate::types::{SwapPair, SwapQuote, SwapSide};
use crate::validation::{check_swap_request, validate_pair};
use soroban_sdk::{log, Address, Env, Symbol, Vec};

pub struct SwapEngine;

impl SwapEngine {
    // ============================================
    // PAIRS
    // ============================================

    /// Validate every pair, then store them all; existing ids are replaced.
    pub fn register_pairs(env: &Env, pairs: &Vec<SwapPair>) -> Result<(), Error> {
        let admin = Storage::get_admin(env)?;
        admin.require_auth();

        for pair in pairs.iter() {
            if let Err(err) = validate_pair(&pair) {
                log!(env, "invalid swap pair", pair.pair_id);
                return Err(err);
            }
            Registry::resolve(env, pair.source_token)?;
            Registry::resolve(env, pair.destination_token)?;
        }

        for pair in pairs.iter() {
            Storage::set_pair(env, &pair);
        }
        Storage::bump_instance(env);

        env.events().publish(
            (Symbol::new(env, "pairs_registered"),),
            PairsRegisteredEvent { count: pairs.len() },
        );

        Ok(())
    }

    pub fn set_pair_active(env: &Env, pair_id: u32, active: bool) -> Result<(), Error> {
        let admin = Storage::get_admin(env)?;
        admin.require_auth();

        let mut pair = Self::load_pair(env, pair_id)?;
        pair.active = active;
        Storage::set_pair(env, &pair);

        env.events().publish(
            (Symbol::new(env, "pair_status"), pair_id),
            PairStatusEvent { pair_id, active },
        );

        Ok(())
    }

    // ============================================
    // ESCROW
    // ============================================

    /// Pull liquidity from `provider` into escrow. No fee.
    pub fn deposit(
        env: &Env,
        token_id: u32,
        provider: &Address,
        amount: i128,
    ) -> Result<(), Error> {
        if amount <= 0 {
            return Err(Error::InvalidAmount);
        }

        let token = Registry::resolve(env, token_id)?;
        Custody::pull(env, &token, provider, &env.current_contract_address(), amount)?;

        env.events().publish(
            (Symbol::new(env, "deposit"), token_id),
            DepositEvent {
                token_id,
                provider: provider.clone(),
                amount,
            },
        );

        Ok(())
    }

    /// Release escrowed liquidity to `recipient` (admin only). No fee.
    pub fn withdraw(
        env: &Env,
        token_id: u32,
        recipient: &Address,
        amount: i128,
    ) -> Result<(), Error> {
        let admin = Storage::get_admin(env)?;
        admin.require_auth();

        if amount <= 0 {
            return Err(Error::InvalidAmount);
        }

        let token = Registry::resolve(env, token_id)?;
        if Custody::escrow_balance(env, &token) < amount {
            log!(env, "escrow short for withdrawal", token_id, amount);
            return Err(Error::SlippageOrCapExceeded);
        }
        Custody::push(env, &token, recipient, amount)?;

        env.events().publish(
            (Symbol::new(env, "withdraw"), token_id),
            WithdrawEvent {
                token_id,
                recipient: recipient.clone(),
                amount,
            },
        );

        Ok(())
    }

    // ============================================
    // SWAPS
    // ============================================

    /// Price a swap without moving funds.
    pub fn quote(
        env: &Env,
        pair_id: u32,
        amount: i128,
        side: SwapSide,
    ) -> Result<SwapQuote, Error> {
        let pair = Self::load_pair(env, pair_id)?;
        Self::check_request(env, &pair, amount, side)?;
        Self::price(env, &pair, amount, side)
    }

    /// Run a swap for `trader`. The caller is responsible for the trader's
    /// authorization.
    pub fn execute(
        env: &Env,
        trader: &Address,
        pair_id: u32,
        amount: i128,
        side: SwapSide,
    ) -> Result<SwapQuote, Error> {
        Storage::check_not_paused(env)?;

        let pair = Self::load_pair(env, pair_id)?;
        Self::check_request(env, &pair, amount, side)?;

        if pair.merchant_only {
            let access = AccessControlClient::new(env, &Storage::get_access_control(env)?);
            if !access.is_valid_merchant(trader) {
                log!(env, "pair restricted to merchants", pair_id);
                return Err(Error::NotAuthorizedMerchant);
            }
        }

        let quote = Self::price(env, &pair, amount, side)?;

        let token_in = Registry::resolve(env, quote.token_in)?;
        let token_out = Registry::resolve(env, quote.token_out)?;
        if Custody::escrow_balance(env, &token_out) < quote.amount_out {
            log!(env, "escrow cannot cover swap", pair_id, quote.amount_out);
            return Err(Error::SlippageOrCapExceeded);
        }

        Custody::pull(env, &token_in, trader, &env.current_contract_address(), amount)?;
        Custody::push(env, &token_out, trader, quote.amount_out)?;

        env.events().publish(
            (Symbol::new(env, "swap"), pair_id),
            SwapEvent {
                pair_id,
                trader: trader.clone(),
                side,
                amount_in: amount,
                amount_out: quote.amount_out,
                fee: quote.fee,
            },
        );

        Ok(quote)
    }

    fn load_pair(env: &Env, pair_id: u32) -> Result<SwapPair, Error> {
        Storage::get_pair(env, pair_id).map_err(|err| {
            log!(env, "swap pair not found", pair_id);
            err
        })
    }

    fn check_request(
        env: &Env,
        pair: &SwapPair,
        amount: i128,
        side: SwapSide,
    ) -> Result<(), Error> {
        check_swap_request(pair, amount, side).map_err(|err| {
            log!(env, "swap request rejected", pair.pair_id, err as u32);
            err
        })
    }

    fn price(env: &Env, pair: &SwapPair, amount: i128, side: SwapSide) -> Result<SwapQuote, Error> {
        let rate = Self::rate(env, pair)?.for_side(side);

        let (token_in, token_out) = match side {
            SwapSide::Buy => (pair.source_token, pair.destination_token),
            SwapSide::Sell => (pair.destination_token, pair.source_token),
        };
        let decimals_in = Registry::resolve(env, token_in)?.decimals;
        let decimals_out = Registry::resolve(env, token_out)?.decimals;

        let gross_out =
            convert(amount, rate, decimals_in, decimals_out).ok_or(Error::ArithmeticOverflow)?;
        let amount_out = net_of_fee(gross_out, pair.fee).ok_or_else(|| {
            log!(env, "swap output not positive", pair.pair_id, gross_out);
            Error::InvalidAmount
        })?;

        Ok(SwapQuote {
            pair_id: pair.pair_id,
            side,
            token_in,
            token_out,
            amount_in: amount,
            gross_out,
            fee: pair.fee,
            amount_out,
        })
    }

    /// Destination-per-source rate, from the pair's oracle when it has one
    fn rate(env: &Env, pair: &SwapPair) -> Result<Rate, Error> {
        let Some(oracle) = &pair.oracle else {
            return Ok(static_rate(pair));
        };

        let answer = Registry::read_oracle(env, oracle).map_err(|err| {
            log!(env, "oracle rejected for pair", pair.pair_id);
            err
        })?;
        if answer.decimals != pair.oracle_decimals {
            log!(env, "oracle decimals mismatch", pair.pair_id, answer.decimals);
            return Err(Error::InvalidOracleAnswer);
        }

        oracle_rate(answer.price, answer.decimals, pair.oracle_inverse)
            .ok_or(Error::InvalidOracleAnswer)
    }
}
