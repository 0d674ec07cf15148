use crate::error::Error;
use crate::events::TokenRegisteredEvent;
use crate::interfaces::{OracleClient, PriceData};
use crate::storage::Storage;
use crate::types::TokenInfo;
use soroban_sdk::{log, Address, Env, String, Symbol};

pub struct Registry;

impl Registry {
    /// Map a token id to its ledger and metadata (admin only)
    pub fn register_token(
        env: &Env,
        token_id: u32,
        ledger: Address,
        symbol: String,
        decimals: u32,
        oracle: Option<Address>,
    ) -> Result<(), Error> {
        let admin = Storage::get_admin(env)?;
        admin.require_auth();

        if Storage::has_token(env, token_id) {
            log!(env, "token already registered", token_id);
            return Err(Error::DuplicateToken);
        }

        let info = TokenInfo {
            token_id,
            ledger,
            symbol,
            decimals,
            oracle,
        };
        Storage::set_token(env, &info);
        Storage::bump_instance(env);

        env.events().publish(
            (Symbol::new(env, "token_registered"), token_id),
            TokenRegisteredEvent {
                token_id,
                ledger: info.ledger,
                symbol: info.symbol,
                decimals,
            },
        );

        Ok(())
    }

    pub fn resolve(env: &Env, token_id: u32) -> Result<TokenInfo, Error> {
        Storage::get_token(env, token_id).map_err(|err| {
            log!(env, "token not registered", token_id);
            err
        })
    }

    /// Latest oracle answer for a registered token
    pub fn token_price(env: &Env, token_id: u32) -> Result<PriceData, Error> {
        let info = Self::resolve(env, token_id)?;
        let oracle = info.oracle.ok_or(Error::OracleUnavailable)?;
        Self::read_oracle(env, &oracle)
    }

    pub fn read_oracle(env: &Env, oracle: &Address) -> Result<PriceData, Error> {
        let answer = match OracleClient::new(env, oracle).try_latest_answer() {
            Ok(Ok(answer)) => answer,
            _ => return Err(Error::OracleUnavailable),
        };

        if answer.price <= 0 {
            return Err(Error::InvalidOracleAnswer);
        }
        Ok(answer)
    }
}
