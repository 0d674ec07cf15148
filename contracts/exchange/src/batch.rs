use crate::custody::Custody;
use crate::error::Error;
use crate::events::{BatchExecutedEvent, SignerDeclaredEvent};
use crate::interfaces::SignatureVerifierClient;
use crate::registry::Registry;
use crate::storage::{Storage, BATCH_DOMAIN, MAX_BATCH_ACTIONS};
use crate::subscription::SubscriptionEngine;
use crate::swap::SwapEngine;
use crate::types::{
    ActionKind, BatchAuthorization, SubscribeAction, SubscriptionEvent, SwapAction,
    TransferAction,
};
use soroban_sdk::{log, xdr::ToXdr, Address, Bytes, BytesN, Env, Symbol, Vec};

pub struct BatchDispatcher;

impl BatchDispatcher {
    /// Register the ed25519 key that signs `actor`'s off-chain batches.
    pub fn declare_signer(env: &Env, actor: &Address, public_key: &BytesN<32>) {
        actor.require_auth();
        Storage::set_signer(env, actor, public_key);

        env.events().publish(
            (Symbol::new(env, "signer_declared"),),
            SignerDeclaredEvent {
                actor: actor.clone(),
                public_key: public_key.clone(),
            },
        );
    }

    /// SHA-256 over domain tag, network id, this contract, actor, the action
    /// payload hash, nonce and expiry. Nonce and expiry are big-endian.
    pub fn authorization_digest(
        env: &Env,
        actor: &Address,
        order: &Vec<ActionKind>,
        swaps: &Vec<SwapAction>,
        subscriptions: &Vec<SubscribeAction>,
        transfers: &Vec<TransferAction>,
        nonce: u128,
        expiry: u64,
    ) -> BytesN<32> {
        let actions = Self::actions_hash(env, order, swaps, subscriptions, transfers);

        let mut payload = Bytes::from_slice(env, BATCH_DOMAIN);
        payload.extend_from_array(&env.ledger().network_id().to_array());
        payload.append(&env.current_contract_address().to_xdr(env));
        payload.append(&actor.clone().to_xdr(env));
        payload.extend_from_array(&actions.to_array());
        payload.extend_from_array(&nonce.to_be_bytes());
        payload.extend_from_array(&expiry.to_be_bytes());

        env.crypto().sha256(&payload).to_bytes()
    }

    /// SHA-256 over the XDR of the order and each payload list.
    fn actions_hash(
        env: &Env,
        order: &Vec<ActionKind>,
        swaps: &Vec<SwapAction>,
        subscriptions: &Vec<SubscribeAction>,
        transfers: &Vec<TransferAction>,
    ) -> BytesN<32> {
        let mut payload = order.clone().to_xdr(env);
        payload.append(&swaps.clone().to_xdr(env));
        payload.append(&subscriptions.clone().to_xdr(env));
        payload.append(&transfers.clone().to_xdr(env));

        env.crypto().sha256(&payload).to_bytes()
    }

    /// Run every action in `order` as one unit. The n-th occurrence of a kind
    /// consumes the n-th payload of that kind.
    pub fn execute(
        env: &Env,
        actor: &Address,
        order: &Vec<ActionKind>,
        swaps: &Vec<SwapAction>,
        subscriptions: &Vec<SubscribeAction>,
        transfers: &Vec<TransferAction>,
        authorization: &Option<BatchAuthorization>,
    ) -> Result<u32, Error> {
        Storage::check_not_paused(env)?;
        Self::check_shape(order, swaps, subscriptions, transfers)?;

        let nonce = match authorization {
            None => {
                actor.require_auth();
                None
            }
            Some(auth) => {
                let digest = Self::authorization_digest(
                    env,
                    actor,
                    order,
                    swaps,
                    subscriptions,
                    transfers,
                    auth.nonce,
                    auth.expiry,
                );
                Self::consume_authorization(env, actor, auth, &digest)?;
                Some(auth.nonce)
            }
        };

        let (mut next_swap, mut next_subscription, mut next_transfer) = (0u32, 0u32, 0u32);
        for kind in order.iter() {
            match kind {
                ActionKind::Swap => {
                    let action = swaps.get(next_swap).ok_or(Error::BatchMismatch)?;
                    next_swap += 1;
                    SwapEngine::execute(env, actor, action.pair_id, action.amount, action.side)?;
                }
                ActionKind::Subscribe => {
                    let action = subscriptions
                        .get(next_subscription)
                        .ok_or(Error::BatchMismatch)?;
                    next_subscription += 1;
                    Self::subscribe(env, actor, &action)?;
                }
                ActionKind::Transfer => {
                    let action = transfers.get(next_transfer).ok_or(Error::BatchMismatch)?;
                    next_transfer += 1;
                    Self::transfer(env, actor, &action)?;
                }
            }
        }

        env.events().publish(
            (Symbol::new(env, "batch_executed"),),
            BatchExecutedEvent {
                actor: actor.clone(),
                actions: order.len(),
                nonce,
            },
        );

        Ok(order.len())
    }

    /// Reject empty, oversized or miscounted batches before anything runs.
    fn check_shape(
        order: &Vec<ActionKind>,
        swaps: &Vec<SwapAction>,
        subscriptions: &Vec<SubscribeAction>,
        transfers: &Vec<TransferAction>,
    ) -> Result<(), Error> {
        if order.is_empty() {
            return Err(Error::EmptyBatch);
        }
        if order.len() > MAX_BATCH_ACTIONS {
            return Err(Error::BatchTooLarge);
        }

        let (mut swap_count, mut subscribe_count, mut transfer_count) = (0u32, 0u32, 0u32);
        for kind in order.iter() {
            match kind {
                ActionKind::Swap => swap_count += 1,
                ActionKind::Subscribe => subscribe_count += 1,
                ActionKind::Transfer => transfer_count += 1,
            }
        }

        if swap_count != swaps.len()
            || subscribe_count != subscriptions.len()
            || transfer_count != transfers.len()
        {
            return Err(Error::BatchMismatch);
        }
        Ok(())
    }

    fn consume_authorization(
        env: &Env,
        actor: &Address,
        auth: &BatchAuthorization,
        digest: &BytesN<32>,
    ) -> Result<(), Error> {
        if env.ledger().timestamp() > auth.expiry {
            return Err(Error::AuthorizationExpired);
        }
        if Storage::is_nonce_used(env, actor, auth.nonce) {
            log!(env, "batch nonce replayed", auth.nonce);
            return Err(Error::NonceReplayed);
        }

        let Some(public_key) = Storage::get_signer(env, actor) else {
            log!(env, "no signer declared for actor", actor.clone());
            return Err(Error::SignatureInvalid);
        };

        let message = Bytes::from_array(env, &digest.to_array());
        let verifier = SignatureVerifierClient::new(env, &Storage::get_signature_verifier(env)?);
        match verifier.try_verify(&public_key, &message, &auth.signature) {
            Ok(Ok(())) => {}
            _ => {
                log!(env, "batch signature rejected", actor.clone());
                return Err(Error::SignatureInvalid);
            }
        }

        Storage::consume_nonce(env, actor, auth.nonce);
        Ok(())
    }

    fn subscribe(env: &Env, actor: &Address, action: &SubscribeAction) -> Result<(), Error> {
        SubscriptionEngine::begin(
            env,
            &action.subscription_id,
            actor,
            &action.merchant,
            action.term_id,
            action.auto_renew,
            &action.billing,
        )?;

        if action.first_charge.len() > 1 {
            return Err(Error::BatchMismatch);
        }
        if let Some(charge) = action.first_charge.get(0) {
            let event = SubscriptionEvent {
                subscription_id: action.subscription_id.clone(),
                event_id: charge.event_id.clone(),
                amount: charge.amount,
                timestamp: charge.timestamp.clone(),
            };
            SubscriptionEngine::process(env, &event, true)?;
        }
        Ok(())
    }

    fn transfer(env: &Env, actor: &Address, action: &TransferAction) -> Result<(), Error> {
        if action.amount <= 0 {
            return Err(Error::InvalidAmount);
        }
        let token = Registry::resolve(env, action.token_id)?;
        Custody::pull(env, &token, actor, &action.to, action.amount)
    }
}
