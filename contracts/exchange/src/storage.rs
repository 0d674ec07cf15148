use soroban_sdk::{contracttype, Address, BytesN, Env};

use crate::error::Error;
use crate::types::{BillingPeriod, Subscription, SubscriptionTerm, SwapPair, TokenInfo};

// Constants
pub const MAX_BATCH_ACTIONS: u32 = 16;
pub const BATCH_DOMAIN: &[u8] = b"exchange.batch.v1";

pub(crate) const INSTANCE_BUMP_AMOUNT: u32 = 34_560; // ~2 days
pub(crate) const INSTANCE_LIFETIME_THRESHOLD: u32 = INSTANCE_BUMP_AMOUNT - 17_280;
pub(crate) const RECORD_BUMP_AMOUNT: u32 = 518_400; // ~30 days
pub(crate) const RECORD_LIFETIME_THRESHOLD: u32 = RECORD_BUMP_AMOUNT - 17_280;

#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    Admin,
    Initialized,
    Paused,
    AccessControl,
    SignatureVerifier,
    Token(u32),
    Pair(u32),
    Term(u32),
    Subscription(BytesN<16>),
    ProcessedPeriod(BytesN<16>, BillingPeriod, u32), // (subscription_id, granularity, bucket key)
    ProcessedEvent(BytesN<16>, BytesN<16>),          // (subscription_id, event_id)
    Signer(Address),
    UsedNonce(Address, u128),
}

pub struct Storage;

impl Storage {
    // ============================================
    // CONFIGURATION
    // ============================================

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

    pub fn get_access_control(env: &Env) -> Result<Address, Error> {
        env.storage()
            .instance()
            .get(&DataKey::AccessControl)
            .ok_or(Error::NotInitialized)
    }

    pub fn get_signature_verifier(env: &Env) -> Result<Address, Error> {
        env.storage()
            .instance()
            .get(&DataKey::SignatureVerifier)
            .ok_or(Error::NotInitialized)
    }

    pub fn check_not_paused(env: &Env) -> Result<(), Error> {
        let paused = env
            .storage()
            .instance()
            .get::<DataKey, bool>(&DataKey::Paused)
            .unwrap_or(false);

        if paused {
            return Err(Error::ContractPaused);
        }
        Ok(())
    }

    // ============================================
    // REGISTRY & PAIRS
    // ============================================

    pub fn get_token(env: &Env, token_id: u32) -> Result<TokenInfo, Error> {
        env.storage()
            .instance()
            .get(&DataKey::Token(token_id))
            .ok_or(Error::TokenNotRegistered)
    }

    pub fn has_token(env: &Env, token_id: u32) -> bool {
        env.storage().instance().has(&DataKey::Token(token_id))
    }

    pub fn set_token(env: &Env, token: &TokenInfo) {
        env.storage()
            .instance()
            .set(&DataKey::Token(token.token_id), token);
    }

    pub fn get_pair(env: &Env, pair_id: u32) -> Result<SwapPair, Error> {
        env.storage()
            .persistent()
            .get(&DataKey::Pair(pair_id))
            .ok_or(Error::PairNotFound)
    }

    pub fn set_pair(env: &Env, pair: &SwapPair) {
        Self::set_record(env, &DataKey::Pair(pair.pair_id), pair);
    }

    // ============================================
    // SUBSCRIPTIONS
    // ============================================

    pub fn get_term(env: &Env, term_id: u32) -> Result<SubscriptionTerm, Error> {
        env.storage()
            .persistent()
            .get(&DataKey::Term(term_id))
            .ok_or(Error::TermNotFound)
    }

    pub fn set_term(env: &Env, term: &SubscriptionTerm) {
        Self::set_record(env, &DataKey::Term(term.term_id), term);
    }

    pub fn get_subscription(env: &Env, id: &BytesN<16>) -> Result<Subscription, Error> {
        env.storage()
            .persistent()
            .get(&DataKey::Subscription(id.clone()))
            .ok_or(Error::SubscriptionNotFound)
    }

    pub fn has_subscription(env: &Env, id: &BytesN<16>) -> bool {
        env.storage()
            .persistent()
            .has(&DataKey::Subscription(id.clone()))
    }

    pub fn set_subscription(env: &Env, subscription: &Subscription) {
        Self::set_record(
            env,
            &DataKey::Subscription(subscription.subscription_id.clone()),
            subscription,
        );
    }

    pub fn is_period_processed(
        env: &Env,
        id: &BytesN<16>,
        granularity: BillingPeriod,
        key: u32,
    ) -> bool {
        env.storage()
            .persistent()
            .has(&DataKey::ProcessedPeriod(id.clone(), granularity, key))
    }

    pub fn mark_period_processed(env: &Env, id: &BytesN<16>, granularity: BillingPeriod, key: u32) {
        Self::set_record(
            env,
            &DataKey::ProcessedPeriod(id.clone(), granularity, key),
            &true,
        );
    }

    pub fn is_event_processed(env: &Env, id: &BytesN<16>, event_id: &BytesN<16>) -> bool {
        env.storage()
            .persistent()
            .has(&DataKey::ProcessedEvent(id.clone(), event_id.clone()))
    }

    pub fn mark_event_processed(env: &Env, id: &BytesN<16>, event_id: &BytesN<16>) {
        Self::set_record(
            env,
            &DataKey::ProcessedEvent(id.clone(), event_id.clone()),
            &true,
        );
    }

    // ============================================
    // BATCH AUTHORIZATION
    // ============================================

    pub fn get_signer(env: &Env, actor: &Address) -> Option<BytesN<32>> {
        env.storage()
            .persistent()
            .get(&DataKey::Signer(actor.clone()))
    }

    pub fn set_signer(env: &Env, actor: &Address, public_key: &BytesN<32>) {
        Self::set_record(env, &DataKey::Signer(actor.clone()), public_key);
    }

    pub fn is_nonce_used(env: &Env, actor: &Address, nonce: u128) -> bool {
        env.storage()
            .persistent()
            .has(&DataKey::UsedNonce(actor.clone(), nonce))
    }

    pub fn consume_nonce(env: &Env, actor: &Address, nonce: u128) {
        Self::set_record(env, &DataKey::UsedNonce(actor.clone(), nonce), &true);
    }

    fn set_record<V>(env: &Env, key: &DataKey, value: &V)
    where
        V: soroban_sdk::IntoVal<Env, soroban_sdk::Val>,
    {
        env.storage().persistent().set(key, value);
        env.storage()
            .persistent()
            .extend_ttl(key, RECORD_LIFETIME_THRESHOLD, RECORD_BUMP_AMOUNT);
    }
}
