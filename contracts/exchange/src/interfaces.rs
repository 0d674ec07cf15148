//! Clients for the contracts the exchange consumes as capabilities.

use soroban_sdk::{contractclient, contracterror, contracttype, Address, Bytes, BytesN, Env};

/// Error codes returned by the ledger contract.
#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum LedgerError {
    AlreadyInitialized = 1,
    NotInitialized = 2,
    InsufficientBalance = 4,
    InvalidAmount = 5,
    TokenNotFound = 10,
    TokenAlreadyExists = 11,
    CapExceeded = 12,
    InvalidCap = 13,
    Banned = 20,
    InsufficientAllowance = 21,
}

#[allow(dead_code)]
#[contractclient(name = "LedgerClient")]
pub trait LedgerInterface {
    fn transfer(
        env: Env,
        token_id: u32,
        from: Address,
        to: Address,
        amount: i128,
    ) -> Result<(), LedgerError>;

    fn transfer_from(
        env: Env,
        token_id: u32,
        spender: Address,
        from: Address,
        to: Address,
        amount: i128,
    ) -> Result<(), LedgerError>;

    fn balance_of(env: Env, token_id: u32, holder: Address) -> i128;
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PriceData {
    pub price: i128,
    pub decimals: u32,
}

#[allow(dead_code)]
#[contractclient(name = "OracleClient")]
pub trait OracleInterface {
    fn latest_answer(env: Env) -> PriceData;
}

#[allow(dead_code)]
#[contractclient(name = "AccessControlClient")]
pub trait AccessControlInterface {
    fn is_valid_merchant(env: Env, account: Address) -> bool;
    fn is_revenue_account(env: Env, account: Address) -> bool;
    fn is_subscription_admin(env: Env, account: Address) -> bool;
}

#[allow(dead_code)]
#[contractclient(name = "SignatureVerifierClient")]
pub trait SignatureVerifierInterface {
    fn verify(env: Env, public_key: BytesN<32>, message: Bytes, signature: BytesN<64>);
}
