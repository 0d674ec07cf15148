use crate::calendar::validate_bucket;
use crate::custody::Custody;
use crate::error::Error;
use crate::events::{
    SubscriptionProcessedEvent, SubscriptionStartedEvent, SubscriptionStatusEvent,
    TermRegisteredEvent,
};
use crate::interfaces::AccessControlClient;
use crate::registry::Registry;
use crate::storage::Storage;
use crate::types::{
    BillingParams, BillingPeriod, EventResult, Subscription, SubscriptionEvent, SubscriptionStatus,
    SubscriptionTerm,
};
use crate::validation::{validate_billing, validate_term};
use soroban_sdk::{log, Address, BytesN, Env, Symbol, Vec};

const ALL_PERIODS: [BillingPeriod; 5] = [
    BillingPeriod::Year,
    BillingPeriod::Quarter,
    BillingPeriod::Month,
    BillingPeriod::Week,
    BillingPeriod::Day,
];

pub struct SubscriptionEngine;

impl SubscriptionEngine {
    // ============================================
    // TERMS
    // ============================================

    pub fn register_term(env: &Env, term: &SubscriptionTerm) -> Result<(), Error> {
        let admin = Storage::get_admin(env)?;
        admin.require_auth();

        if let Err(err) = validate_term(term) {
            log!(env, "invalid subscription term", term.term_id);
            return Err(err);
        }
        Registry::resolve(env, term.token_id)?;

        Storage::set_term(env, term);

        env.events().publish(
            (Symbol::new(env, "term_registered"), term.term_id),
            TermRegisteredEvent {
                term_id: term.term_id,
                interval: term.interval,
                amount: term.amount,
            },
        );

        Ok(())
    }

    // ============================================
    // LIFECYCLE
    // ============================================

    /// Open a subscription. The caller is responsible for the subscriber's
    /// authorization.
    pub fn begin(
        env: &Env,
        subscription_id: &BytesN<16>,
        subscriber: &Address,
        merchant: &Address,
        term_id: u32,
        auto_renew: bool,
        billing: &BillingParams,
    ) -> Result<Subscription, Error> {
        Storage::check_not_paused(env)?;

        if Storage::has_subscription(env, subscription_id) {
            log!(env, "subscription id taken", subscription_id.clone());
            return Err(Error::DuplicateSubscription);
        }

        let term = Storage::get_term(env, term_id)?;

        let access = AccessControlClient::new(env, &Storage::get_access_control(env)?);
        if !access.is_valid_merchant(merchant) && !access.is_revenue_account(merchant) {
            log!(env, "payee is neither merchant nor revenue account", subscription_id.clone());
            return Err(Error::NotRevenueAccount);
        }

        if subscriber == merchant {
            return Err(Error::InvalidBillingParams);
        }
        validate_billing(billing, &term)?;

        let subscription = Subscription {
            subscription_id: subscription_id.clone(),
            subscriber: subscriber.clone(),
            merchant: merchant.clone(),
            term_id,
            auto_renew,
            status: SubscriptionStatus::Active,
            billing: billing.clone(),
            started_at: env.ledger().timestamp(),
            last_processed_at: 0,
            last_processed_period: 0,
            cycles: 0,
            total_billed: 0,
        };
        Storage::set_subscription(env, &subscription);

        env.events().publish(
            (Symbol::new(env, "subscription_started"), subscription_id.clone()),
            SubscriptionStartedEvent {
                subscription_id: subscription_id.clone(),
                subscriber: subscriber.clone(),
                merchant: merchant.clone(),
                term_id,
            },
        );

        Ok(subscription)
    }

    /// Subscriber or merchant ends the subscription.
    pub fn cancel(env: &Env, subscription_id: &BytesN<16>, caller: &Address) -> Result<(), Error> {
        caller.require_auth();

        let mut subscription = Storage::get_subscription(env, subscription_id)?;
        if *caller != subscription.subscriber && *caller != subscription.merchant {
            return Err(Error::Unauthorized);
        }
        Self::ensure_active(env, &subscription)?;

        subscription.status = SubscriptionStatus::Cancelled;
        Self::store_status(env, &subscription);

        Ok(())
    }

    /// Close a subscription whose grace window was missed or whose term ran
    /// out. Callable by anyone.
    pub fn lapse(env: &Env, subscription_id: &BytesN<16>) -> Result<SubscriptionStatus, Error> {
        let mut subscription = Storage::get_subscription(env, subscription_id)?;
        Self::ensure_active(env, &subscription)?;
        let term = Storage::get_term(env, subscription.term_id)?;

        subscription.status = if Self::term_exhausted(&subscription, &term) {
            SubscriptionStatus::Expired
        } else if Self::grace_missed(&subscription, &term, env.ledger().timestamp()) {
            SubscriptionStatus::Cancelled
        } else {
            return Err(Error::SubscriptionNotLapsed);
        };
        Self::store_status(env, &subscription);

        Ok(subscription.status)
    }

    // ============================================
    // BILLING
    // ============================================

    /// Operator-facing single event. The operator must be the merchant or
    /// hold the subscription-admin role.
    pub fn process_as_operator(
        env: &Env,
        operator: &Address,
        event: &SubscriptionEvent,
        charge_now: bool,
    ) -> Result<i128, Error> {
        operator.require_auth();
        Storage::check_not_paused(env)?;

        let subscription = Storage::get_subscription(env, &event.subscription_id)?;
        let is_admin = Self::is_subscription_admin(env, operator)?;
        if !is_admin && *operator != subscription.merchant {
            log!(env, "operator may not bill subscription", event.subscription_id.clone());
            return Err(Error::Unauthorized);
        }

        Self::process(env, event, charge_now)
    }

    /// Process each event independently and report a result per item.
    pub fn process_batch(
        env: &Env,
        operator: &Address,
        events: &Vec<SubscriptionEvent>,
        charge_now: bool,
    ) -> Result<Vec<EventResult>, Error> {
        operator.require_auth();
        Storage::check_not_paused(env)?;

        let is_admin = Self::is_subscription_admin(env, operator)?;
        let mut results = Vec::new(env);

        for event in events.iter() {
            let outcome = Storage::get_subscription(env, &event.subscription_id).and_then(|sub| {
                if !is_admin && *operator != sub.merchant {
                    return Err(Error::Unauthorized);
                }
                Self::process(env, &event, charge_now)
            });

            let result = match outcome {
                Ok(charged) => EventResult {
                    subscription_id: event.subscription_id.clone(),
                    event_id: event.event_id.clone(),
                    success: true,
                    amount: charged,
                    error: 0,
                },
                Err(err) => {
                    log!(
                        env,
                        "subscription event failed",
                        event.subscription_id.clone(),
                        err as u32
                    );
                    EventResult {
                        subscription_id: event.subscription_id.clone(),
                        event_id: event.event_id.clone(),
                        success: false,
                        amount: 0,
                        error: err as u32,
                    }
                }
            };
            results.push_back(result);
        }

        Ok(results)
    }

    /// Validate, optionally charge, then record one billing event. Returns the
    /// amount transferred. Every check runs before the first write.
    pub fn process(env: &Env, event: &SubscriptionEvent, charge_now: bool) -> Result<i128, Error> {
        let id = &event.subscription_id;
        let mut subscription = Storage::get_subscription(env, id)?;
        Self::ensure_active(env, &subscription)?;
        let term = Storage::get_term(env, subscription.term_id)?;

        if Self::term_exhausted(&subscription, &term) {
            log!(env, "subscription term exhausted", id.clone());
            return Err(Error::SubscriptionExpired);
        }
        if Self::grace_missed(&subscription, &term, env.ledger().timestamp()) {
            log!(env, "subscription grace period exceeded", id.clone());
            return Err(Error::GracePeriodExceeded);
        }

        let bucket = &event.timestamp;
        validate_bucket(bucket)?;
        let trial_end = subscription.started_at.saturating_add(term.trial_period);
        if bucket.unix_seconds < trial_end {
            return Err(Error::InTrialPeriod);
        }
        if Storage::is_event_processed(env, id, &event.event_id) {
            log!(env, "billing event already seen", id.clone());
            return Err(Error::DuplicateEvent);
        }
        let granularity = subscription.billing.granularity;
        let period = bucket.key(granularity);
        if Storage::is_period_processed(env, id, granularity, period) {
            log!(env, "billing period already processed", id.clone(), period);
            return Err(Error::PeriodAlreadyProcessed);
        }

        if event.amount <= 0 {
            return Err(Error::InvalidAmount);
        }
        if event.amount > subscription.billing.max_amount {
            log!(env, "charge above subscription limit", id.clone(), event.amount);
            return Err(Error::AmountExceedsLimit);
        }

        let total_billed = if charge_now {
            subscription
                .total_billed
                .checked_add(event.amount)
                .ok_or(Error::ArithmeticOverflow)?
        } else {
            subscription.total_billed
        };
        let cycles = subscription
            .cycles
            .checked_add(1)
            .ok_or(Error::ArithmeticOverflow)?;

        let charged = if charge_now {
            let token = Registry::resolve(env, term.token_id)?;
            Custody::pull(
                env,
                &token,
                &subscription.subscriber,
                &subscription.merchant,
                event.amount,
            )?;
            event.amount
        } else {
            0
        };

        for level in ALL_PERIODS {
            Storage::mark_period_processed(env, id, level, bucket.key(level));
        }
        Storage::mark_event_processed(env, id, &event.event_id);

        subscription.last_processed_at = subscription.last_processed_at.max(bucket.unix_seconds);
        subscription.last_processed_period = period;
        subscription.cycles = cycles;
        subscription.total_billed = total_billed;
        Storage::set_subscription(env, &subscription);

        env.events().publish(
            (Symbol::new(env, "subscription_processed"), id.clone()),
            SubscriptionProcessedEvent {
                subscription_id: id.clone(),
                event_id: event.event_id.clone(),
                period,
                charged,
            },
        );

        Ok(charged)
    }

    // ============================================
    // HELPERS
    // ============================================

    fn ensure_active(env: &Env, subscription: &Subscription) -> Result<(), Error> {
        match subscription.status {
            SubscriptionStatus::Active => Ok(()),
            SubscriptionStatus::Cancelled => {
                log!(env, "subscription cancelled", subscription.subscription_id.clone());
                Err(Error::SubscriptionCancelled)
            }
            SubscriptionStatus::Expired => {
                log!(env, "subscription expired", subscription.subscription_id.clone());
                Err(Error::SubscriptionExpired)
            }
        }
    }

    fn term_exhausted(subscription: &Subscription, term: &SubscriptionTerm) -> bool {
        term.max_cycles > 0 && subscription.cycles >= term.max_cycles && !subscription.auto_renew
    }

    /// True once the next payment is later than one interval plus grace.
    /// A zero grace period disables the check.
    fn grace_missed(subscription: &Subscription, term: &SubscriptionTerm, now: u64) -> bool {
        if term.grace_period == 0 || subscription.last_processed_at == 0 {
            return false;
        }
        let deadline = subscription
            .last_processed_at
            .saturating_add(term.interval)
            .saturating_add(term.grace_period);
        now > deadline
    }

    fn is_subscription_admin(env: &Env, account: &Address) -> Result<bool, Error> {
        let access = AccessControlClient::new(env, &Storage::get_access_control(env)?);
        Ok(access.is_subscription_admin(account))
    }

    fn store_status(env: &Env, subscription: &Subscription) {
        Storage::set_subscription(env, subscription);

        env.events().publish(
            (
                Symbol::new(env, "subscription_status"),
                subscription.subscription_id.clone(),
            ),
            SubscriptionStatusEvent {
                subscription_id: subscription.subscription_id.clone(),
                status: subscription.status,
            },
        );
    }
}
