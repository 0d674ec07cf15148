#![no_std]

mod batch;
mod calendar;
mod custody;
mod error;
mod events;
mod interfaces;
mod pricing;
mod registry;
mod storage;
mod subscription;
mod swap;
mod types;
mod validation;

pub use calendar::bucket_for;
pub use error::{Error, ErrorCategory};
pub use interfaces::PriceData;
pub use types::*;

use batch::BatchDispatcher;
use custody::Custody;
use registry::Registry;
use storage::{DataKey, Storage};
use subscription::SubscriptionEngine;
use swap::SwapEngine;

use soroban_sdk::{contract, contractimpl, Address, BytesN, Env, String, Vec};

#[contract]
pub struct Exchange;

#[contractimpl]
impl Exchange {
    // ============================================
    // INITIALIZATION & ADMIN
    // ============================================

    /// Initialize the exchange
    ///
    /// # Arguments
    /// * `admin` - Registers tokens, pairs and terms; manages escrow
    /// * `access_control` - Role registry answering merchant and revenue checks
    /// * `signature_verifier` - Checks off-chain batch signatures
    ///
    /// # Errors
    /// - `AlreadyInitialized`: Contract already initialized
    pub fn initialize(
        env: Env,
        admin: Address,
        access_control: Address,
        signature_verifier: Address,
    ) -> Result<(), Error> {
        if env.storage().instance().has(&DataKey::Initialized) {
            return Err(Error::AlreadyInitialized);
        }

        admin.require_auth();

        env.storage().instance().set(&DataKey::Initialized, &true);
        env.storage().instance().set(&DataKey::Admin, &admin);
        env.storage()
            .instance()
            .set(&DataKey::AccessControl, &access_control);
        env.storage()
            .instance()
            .set(&DataKey::SignatureVerifier, &signature_verifier);
        env.storage().instance().set(&DataKey::Paused, &false);
        Storage::bump_instance(&env);

        Ok(())
    }

    pub fn pause(env: Env) -> Result<(), Error> {
        let admin = Storage::get_admin(&env)?;
        admin.require_auth();

        env.storage().instance().set(&DataKey::Paused, &true);
        Ok(())
    }

    pub fn unpause(env: Env) -> Result<(), Error> {
        let admin = Storage::get_admin(&env)?;
        admin.require_auth();

        env.storage().instance().set(&DataKey::Paused, &false);
        Ok(())
    }

    // ============================================
    // REGISTRY
    // ============================================

    /// Map a token id to the ledger holding it
    ///
    /// # Errors
    /// - `DuplicateToken`: Token id already registered
    pub fn register_token(
        env: Env,
        token_id: u32,
        ledger: Address,
        symbol: String,
        decimals: u32,
        oracle: Option<Address>,
    ) -> Result<(), Error> {
        Registry::register_token(&env, token_id, ledger, symbol, decimals, oracle)
    }

    pub fn token_info(env: Env, token_id: u32) -> Result<TokenInfo, Error> {
        Registry::resolve(&env, token_id)
    }

    /// Latest answer from the token's price feed
    ///
    /// # Errors
    /// - `TokenNotRegistered`: Unknown token
    /// - `OracleUnavailable`: Token has no feed or the feed failed
    /// - `InvalidOracleAnswer`: Feed returned a non-positive price
    pub fn token_price(env: Env, token_id: u32) -> Result<PriceData, Error> {
        Registry::token_price(&env, token_id)
    }

    // ============================================
    // SWAP ENGINE
    // ============================================

    /// Register or replace swap pairs (admin only)
    ///
    /// Every pair is validated before any is stored.
    ///
    /// # Errors
    /// - `InvalidPair`: Same token on both sides, non-positive rate, negative
    ///   fee or minimum, or both direction flags set
    /// - `TokenNotRegistered`: Pair names an unknown token
    pub fn register_swap_pairs(env: Env, pairs: Vec<SwapPair>) -> Result<(), Error> {
        SwapEngine::register_pairs(&env, &pairs)
    }

    pub fn set_pair_active(env: Env, pair_id: u32, active: bool) -> Result<(), Error> {
        SwapEngine::set_pair_active(&env, pair_id, active)
    }

    pub fn get_pair(env: Env, pair_id: u32) -> Result<SwapPair, Error> {
        Storage::get_pair(&env, pair_id)
    }

    /// Add liquidity to escrow from `provider`'s allowance
    pub fn deposit_tokens(
        env: Env,
        token_id: u32,
        provider: Address,
        amount: i128,
    ) -> Result<(), Error> {
        provider.require_auth();
        Storage::check_not_paused(&env)?;
        SwapEngine::deposit(&env, token_id, &provider, amount)
    }

    /// Pay escrowed liquidity out to `recipient` (admin only)
    ///
    /// # Errors
    /// - `SlippageOrCapExceeded`: Escrow holds less than `amount`
    pub fn withdraw_tokens(
        env: Env,
        token_id: u32,
        recipient: Address,
        amount: i128,
    ) -> Result<(), Error> {
        SwapEngine::withdraw(&env, token_id, &recipient, amount)
    }

    pub fn escrow_balance(env: Env, token_id: u32) -> Result<i128, Error> {
        let token = Registry::resolve(&env, token_id)?;
        Ok(Custody::escrow_balance(&env, &token))
    }

    /// Pay the source token, receive the destination token
    ///
    /// Returns the amount received after the pair fee.
    ///
    /// # Errors
    /// - `PairNotFound`, `PairInactive`, `DirectionNotAllowed`, `BelowMinimum`
    /// - `NotAuthorizedMerchant`: Merchant-only pair, trader lacks the role
    /// - `OracleUnavailable`, `InvalidOracleAnswer`: Price feed unusable
    /// - `InvalidAmount`: Output not positive after the fee
    /// - `SlippageOrCapExceeded`: Escrow cannot cover the output
    /// - `InsufficientBalance`, `InsufficientAllowance`, `AccountBanned`
    pub fn swap_tokens(
        env: Env,
        pair_id: u32,
        trader: Address,
        amount: i128,
    ) -> Result<i128, Error> {
        trader.require_auth();
        let quote = SwapEngine::execute(&env, &trader, pair_id, amount, SwapSide::Buy)?;
        Ok(quote.amount_out)
    }

    /// Pay the destination token, receive the source token at the reciprocal
    /// rate. Same errors as `swap_tokens`.
    pub fn sell_tokens(
        env: Env,
        pair_id: u32,
        trader: Address,
        amount: i128,
    ) -> Result<i128, Error> {
        trader.require_auth();
        let quote = SwapEngine::execute(&env, &trader, pair_id, amount, SwapSide::Sell)?;
        Ok(quote.amount_out)
    }

    pub fn quote_swap(
        env: Env,
        pair_id: u32,
        amount: i128,
        side: SwapSide,
    ) -> Result<SwapQuote, Error> {
        SwapEngine::quote(&env, pair_id, amount, side)
    }

    // ============================================
    // SUBSCRIPTION ENGINE
    // ============================================

    /// # Errors
    /// - `InvalidTerm`: Zero interval or non-positive amount
    /// - `TokenNotRegistered`: Unknown charge token
    pub fn register_term(env: Env, term: SubscriptionTerm) -> Result<(), Error> {
        SubscriptionEngine::register_term(&env, &term)
    }

    pub fn get_term(env: Env, term_id: u32) -> Result<SubscriptionTerm, Error> {
        Storage::get_term(&env, term_id)
    }

    /// Open a subscription paying `merchant`
    ///
    /// # Errors
    /// - `DuplicateSubscription`: Id already used
    /// - `TermNotFound`: Unknown term
    /// - `NotRevenueAccount`: Merchant holds neither the merchant nor the
    ///   revenue role
    /// - `InvalidBillingParams`: Ceiling below the term amount, or subscriber
    ///   and merchant are the same account
    pub fn begin_subscription(
        env: Env,
        subscription_id: BytesN<16>,
        subscriber: Address,
        merchant: Address,
        term_id: u32,
        auto_renew: bool,
        billing: BillingParams,
    ) -> Result<(), Error> {
        subscriber.require_auth();
        SubscriptionEngine::begin(
            &env,
            &subscription_id,
            &subscriber,
            &merchant,
            term_id,
            auto_renew,
            &billing,
        )?;
        Ok(())
    }

    /// Bill (or, with `charge_now = false`, journal) one subscription event
    ///
    /// Returns the amount transferred.
    ///
    /// # Errors
    /// - `Unauthorized`: Operator is neither the merchant nor a subscription admin
    /// - `SubscriptionNotFound`, `SubscriptionCancelled`, `SubscriptionExpired`
    /// - `GracePeriodExceeded`: Payment later than interval plus grace
    /// - `InvalidTimestamp`: Bucket keys disagree with the timestamp
    /// - `InTrialPeriod`, `DuplicateEvent`, `PeriodAlreadyProcessed`
    /// - `InvalidAmount`, `AmountExceedsLimit`
    /// - `InsufficientBalance`, `InsufficientAllowance`, `AccountBanned`
    pub fn process_subscription(
        env: Env,
        operator: Address,
        event: SubscriptionEvent,
        charge_now: bool,
    ) -> Result<i128, Error> {
        SubscriptionEngine::process_as_operator(&env, &operator, &event, charge_now)
    }

    /// Process events independently; a failing item is reported in its
    /// result and never affects the others.
    pub fn process_subscription_batch(
        env: Env,
        operator: Address,
        events: Vec<SubscriptionEvent>,
        charge_now: bool,
    ) -> Result<Vec<EventResult>, Error> {
        SubscriptionEngine::process_batch(&env, &operator, &events, charge_now)
    }

    pub fn cancel_subscription(
        env: Env,
        subscription_id: BytesN<16>,
        caller: Address,
    ) -> Result<(), Error> {
        SubscriptionEngine::cancel(&env, &subscription_id, &caller)
    }

    /// Settle a subscription that missed its grace window or ran out of cycles
    ///
    /// # Errors
    /// - `SubscriptionNotLapsed`: Subscription is still in good standing
    pub fn lapse_subscription(
        env: Env,
        subscription_id: BytesN<16>,
    ) -> Result<SubscriptionStatus, Error> {
        SubscriptionEngine::lapse(&env, &subscription_id)
    }

    pub fn get_subscription(env: Env, subscription_id: BytesN<16>) -> Result<Subscription, Error> {
        Storage::get_subscription(&env, &subscription_id)
    }

    pub fn is_period_processed(
        env: Env,
        subscription_id: BytesN<16>,
        granularity: BillingPeriod,
        key: u32,
    ) -> bool {
        Storage::is_period_processed(&env, &subscription_id, granularity, key)
    }

    // ============================================
    // BATCH DISPATCHER
    // ============================================

    pub fn declare_signer(env: Env, actor: Address, public_key: BytesN<32>) {
        BatchDispatcher::declare_signer(&env, &actor, &public_key)
    }

    /// Message an actor's declared key signs to authorize a relayed batch.
    /// It commits to the exact actions, so a relayer cannot alter them.
    pub fn batch_authorization_digest(
        env: Env,
        actor: Address,
        order: Vec<ActionKind>,
        swaps: Vec<SwapAction>,
        subscriptions: Vec<SubscribeAction>,
        transfers: Vec<TransferAction>,
        nonce: u128,
        expiry: u64,
    ) -> BytesN<32> {
        BatchDispatcher::authorization_digest(
            &env,
            &actor,
            &order,
            &swaps,
            &subscriptions,
            &transfers,
            nonce,
            expiry,
        )
    }

    /// Execute swap, subscribe and transfer actions for `actor` atomically
    ///
    /// Without `authorization` the actor signs the invocation itself; with it,
    /// anyone may relay the batch.
    ///
    /// # Errors
    /// - `EmptyBatch`, `BatchTooLarge`, `BatchMismatch`: Malformed batch, or a
    ///   subscribe action with more than one first charge
    /// - `AuthorizationExpired`, `NonceReplayed`, `SignatureInvalid`
    /// - Any error of the underlying action; nothing is applied
    pub fn action_batch(
        env: Env,
        actor: Address,
        order: Vec<ActionKind>,
        swaps: Vec<SwapAction>,
        subscriptions: Vec<SubscribeAction>,
        transfers: Vec<TransferAction>,
        authorization: Option<BatchAuthorization>,
    ) -> Result<u32, Error> {
        BatchDispatcher::execute(
            &env,
            &actor,
            &order,
            &swaps,
            &subscriptions,
            &transfers,
            &authorization,
        )
    }
}
