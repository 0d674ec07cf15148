use crate::error::Error;
use crate::interfaces::{LedgerClient, LedgerError};
use crate::types::TokenInfo;
use soroban_sdk::{log, Address, Env};

/// Ledger movements performed with the exchange's own address as escrow.
pub struct Custody;

impl Custody {
    /// Pull `amount` from `from` into `to`, spending the allowance `from`
    /// granted to the exchange.
    pub fn pull(
        env: &Env,
        token: &TokenInfo,
        from: &Address,
        to: &Address,
        amount: i128,
    ) -> Result<(), Error> {
        let client = LedgerClient::new(env, &token.ledger);
        let result = client.try_transfer_from(
            &token.token_id,
            &env.current_contract_address(),
            from,
            to,
            &amount,
        );

        match result {
            Ok(Ok(())) => Ok(()),
            Err(Ok(err)) => {
                log!(env, "ledger rejected pull", token.token_id, err as u32);
                Err(map_ledger_error(err))
            }
            _ => Err(Error::LedgerFailure),
        }
    }

    /// Pay `amount` out of escrow to `to`.
    pub fn push(env: &Env, token: &TokenInfo, to: &Address, amount: i128) -> Result<(), Error> {
        let client = LedgerClient::new(env, &token.ledger);
        let result = client.try_transfer(
            &token.token_id,
            &env.current_contract_address(),
            to,
            &amount,
        );

        match result {
            Ok(Ok(())) => Ok(()),
            Err(Ok(err)) => {
                log!(env, "ledger rejected payout", token.token_id, err as u32);
                Err(map_ledger_error(err))
            }
            _ => Err(Error::LedgerFailure),
        }
    }

    pub fn escrow_balance(env: &Env, token: &TokenInfo) -> i128 {
        LedgerClient::new(env, &token.ledger)
            .balance_of(&token.token_id, &env.current_contract_address())
    }
}

fn map_ledger_error(err: LedgerError) -> Error {
    match err {
        LedgerError::InsufficientBalance => Error::InsufficientBalance,
        LedgerError::InsufficientAllowance => Error::InsufficientAllowance,
        LedgerError::Banned => Error::AccountBanned,
        LedgerError::CapExceeded => Error::CapExceeded,
        LedgerError::InvalidAmount => Error::InvalidAmount,
        LedgerError::TokenNotFound => Error::TokenNotRegistered,
        _ => Error::LedgerFailure,
    }
}
