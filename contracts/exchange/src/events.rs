use soroban_sdk::{contracttype, Address, BytesN, String};

use crate::types::{SubscriptionStatus, SwapSide};

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TokenRegisteredEvent {
    pub token_id: u32,
    pub ledger: Address,
    pub symbol: String,
    pub decimals: u32,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PairsRegisteredEvent {
    pub count: u32,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PairStatusEvent {
    pub pair_id: u32,
    pub active: bool,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DepositEvent {
    pub token_id: u32,
    pub provider: Address,
    pub amount: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct WithdrawEvent {
    pub token_id: u32,
    pub recipient: Address,
    pub amount: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SwapEvent {
    pub pair_id: u32,
    pub trader: Address,
    pub side: SwapSide,
    pub amount_in: i128,
    pub amount_out: i128,
    pub fee: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TermRegisteredEvent {
    pub term_id: u32,
    pub interval: u64,
    pub amount: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SubscriptionStartedEvent {
    pub subscription_id: BytesN<16>,
    pub subscriber: Address,
    pub merchant: Address,
    pub term_id: u32,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SubscriptionProcessedEvent {
    pub subscription_id: BytesN<16>,
    pub event_id: BytesN<16>,
    pub period: u32,
    /// Amount transferred, 0 when the event was only journaled
    pub charged: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SubscriptionStatusEvent {
    pub subscription_id: BytesN<16>,
    pub status: SubscriptionStatus,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SignerDeclaredEvent {
    pub actor: Address,
    pub public_key: BytesN<32>,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BatchExecutedEvent {
    pub actor: Address,
    pub actions: u32,
    /// Nonce consumed when the batch was signed off-chain
    pub nonce: Option<u128>,
}
