use soroban_sdk::{contracttype, Address, Env, String};

use crate::error::Error;

pub(crate) const INSTANCE_BUMP_AMOUNT: u32 = 34_560; // ~2 days
pub(crate) const INSTANCE_LIFETIME_THRESHOLD: u32 = INSTANCE_BUMP_AMOUNT - 17_280;
pub(crate) const BALANCE_BUMP_AMOUNT: u32 = 518_400; // ~30 days
pub(crate) const BALANCE_LIFETIME_THRESHOLD: u32 = BALANCE_BUMP_AMOUNT - 17_280;

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TokenConfig {
    pub token_id: u32,
    pub symbol: String,
    pub decimals: u32,
    pub total_supply: i128,
    /// Upper bound on total supply, `None` means uncapped
    pub hard_cap: Option<i128>,
    /// May mint, burn and maintain the ban-list
    pub authority: Address,
}

#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    Admin,
    Initialized,
    Token(u32),
    Balance(u32, Address),            // (token_id, holder)
    Allowance(u32, Address, Address), // (token_id, owner, spender)
    Banned(u32, Address),             // (token_id, account)
}

pub struct Storage;

impl Storage {
    pub fn bump_instance(env: &Env) {
        env.storage()
            .instance()
            .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
    }

    pub fn get_admin(env: &Env) -> Result<Address, Error> {
        env.storage()
            .instance()
            .get(&DataKey::Admin)
            .ok_or(Error::NotInitialized)
    }

    pub fn get_token(env: &Env, token_id: u32) -> Result<TokenConfig, Error> {
        env.storage()
            .instance()
            .get(&DataKey::Token(token_id))
            .ok_or(Error::TokenNotFound)
    }

    pub fn set_token(env: &Env, token: &TokenConfig) {
        env.storage()
            .instance()
            .set(&DataKey::Token(token.token_id), token);
    }

    pub fn balance(env: &Env, token_id: u32, holder: &Address) -> i128 {
        let key = DataKey::Balance(token_id, holder.clone());
        env.storage().persistent().get(&key).unwrap_or(0)
    }

    pub fn set_balance(env: &Env, token_id: u32, holder: &Address, amount: i128) {
        let key = DataKey::Balance(token_id, holder.clone());
        if amount == 0 {
            env.storage().persistent().remove(&key);
        } else {
            env.storage().persistent().set(&key, &amount);
            env.storage().persistent().extend_ttl(
                &key,
                BALANCE_LIFETIME_THRESHOLD,
                BALANCE_BUMP_AMOUNT,
            );
        }
    }

    pub fn allowance(env: &Env, token_id: u32, owner: &Address, spender: &Address) -> i128 {
        let key = DataKey::Allowance(token_id, owner.clone(), spender.clone());
        env.storage().persistent().get(&key).unwrap_or(0)
    }

    pub fn set_allowance(
        env: &Env,
        token_id: u32,
        owner: &Address,
        spender: &Address,
        amount: i128,
    ) {
        let key = DataKey::Allowance(token_id, owner.clone(), spender.clone());
        if amount == 0 {
            env.storage().persistent().remove(&key);
        } else {
            env.storage().persistent().set(&key, &amount);
            env.storage().persistent().extend_ttl(
                &key,
                BALANCE_LIFETIME_THRESHOLD,
                BALANCE_BUMP_AMOUNT,
            );
        }
    }

    pub fn is_banned(env: &Env, token_id: u32, account: &Address) -> bool {
        env.storage()
            .persistent()
            .get(&DataKey::Banned(token_id, account.clone()))
            .unwrap_or(false)
    }

    pub fn set_banned(env: &Env, token_id: u32, account: &Address, banned: bool) {
        let key = DataKey::Banned(token_id, account.clone());
        if banned {
            env.storage().persistent().set(&key, &true);
            env.storage().persistent().extend_ttl(
                &key,
                BALANCE_LIFETIME_THRESHOLD,
                BALANCE_BUMP_AMOUNT,
            );
        } else {
            env.storage().persistent().remove(&key);
        }
    }
}
