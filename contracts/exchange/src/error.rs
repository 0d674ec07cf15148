use soroban_sdk::contracterror;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    // ============================================
    // INITIALIZATION ERRORS (1-5)
    // ============================================
    /// Contract already initialized
    AlreadyInitialized = 1,
    /// Contract not initialized
    NotInitialized = 2,

    // ============================================
    // AUTHORIZATION ERRORS (10-19)
    // ============================================
    /// Caller may not perform this operation
    Unauthorized = 10,
    /// Merchant-only pair used by an account without merchant status
    NotAuthorizedMerchant = 11,
    /// Subscription merchant is not a revenue account
    NotRevenueAccount = 12,
    /// Batch signature does not match the actor's declared signer
    SignatureInvalid = 13,
    /// Batch nonce already consumed
    NonceReplayed = 14,
    /// Batch authorization used after its expiry
    AuthorizationExpired = 15,

    // ============================================
    // REGISTRY ERRORS (20-29)
    // ============================================
    /// Token id already registered
    DuplicateToken = 20,
    /// Token id not registered
    TokenNotRegistered = 21,

    // ============================================
    // SWAP ERRORS (30-39)
    // ============================================
    /// Pair definition is malformed
    InvalidPair = 30,
    /// Pair id not registered
    PairNotFound = 31,
    /// Pair is switched off
    PairInactive = 32,
    /// Pair does not allow this swap direction
    DirectionNotAllowed = 33,
    /// Input amount below the pair minimum
    BelowMinimum = 34,
    /// Escrow cannot cover the swap output
    SlippageOrCapExceeded = 35,
    /// Oracle call failed
    OracleUnavailable = 36,
    /// Oracle returned a non-positive price or unexpected decimals
    InvalidOracleAnswer = 37,

    // ============================================
    // SUBSCRIPTION ERRORS (40-59)
    // ============================================
    /// Term id not registered
    TermNotFound = 40,
    /// Term definition is malformed
    InvalidTerm = 41,
    /// Subscription id already used
    DuplicateSubscription = 42,
    /// Subscription id not found
    SubscriptionNotFound = 43,
    /// Subscription was cancelled
    SubscriptionCancelled = 44,
    /// Subscription term ran out
    SubscriptionExpired = 45,
    /// Billing bucket already applied to this subscription
    PeriodAlreadyProcessed = 46,
    /// Event id already applied to this subscription
    DuplicateEvent = 47,
    /// Bucket keys do not match the unix timestamp
    InvalidTimestamp = 48,
    /// Event falls inside the trial period
    InTrialPeriod = 49,
    /// Event amount above the billing ceiling
    AmountExceedsLimit = 50,
    /// Payment due date plus grace period has passed
    GracePeriodExceeded = 51,
    /// Billing parameters are malformed
    InvalidBillingParams = 52,
    /// Subscription is still in good standing
    SubscriptionNotLapsed = 53,

    // ============================================
    // FUNDS ERRORS (60-69)
    // ============================================
    /// Amount must be positive
    InvalidAmount = 60,
    /// Account balance too small
    InsufficientBalance = 61,
    /// Allowance granted to the exchange too small
    InsufficientAllowance = 62,
    /// Account is on the token's ban-list
    AccountBanned = 63,
    /// Mint would pass the token's hard cap
    CapExceeded = 64,
    /// Ledger call failed for another reason
    LedgerFailure = 65,
    /// Intermediate value overflowed
    ArithmeticOverflow = 66,

    // ============================================
    // BATCH ERRORS (70-79)
    // ============================================
    /// Batch has no actions
    EmptyBatch = 70,
    /// Action order does not match the payload lists
    BatchMismatch = 71,
    /// Batch has more actions than allowed
    BatchTooLarge = 72,

    // ============================================
    // OPERATIONAL ERRORS (80-89)
    // ============================================
    /// Contract is paused
    ContractPaused = 80,
}

/// Coarse error taxonomy used by callers deciding how to react to a failure.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ErrorCategory {
    Validation,
    Authorization,
    InsufficientFunds,
    State,
    Capacity,
    Operational,
}

impl Error {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::InvalidPair
            | Error::InvalidTerm
            | Error::InvalidBillingParams
            | Error::InvalidTimestamp
            | Error::InvalidAmount
            | Error::BelowMinimum
            | Error::AmountExceedsLimit
            | Error::DirectionNotAllowed
            | Error::EmptyBatch
            | Error::BatchMismatch
            | Error::BatchTooLarge
            | Error::ArithmeticOverflow => ErrorCategory::Validation,

            Error::Unauthorized
            | Error::NotAuthorizedMerchant
            | Error::NotRevenueAccount
            | Error::SignatureInvalid
            | Error::NonceReplayed
            | Error::AuthorizationExpired
            | Error::AccountBanned => ErrorCategory::Authorization,

            Error::InsufficientBalance
            | Error::InsufficientAllowance
            | Error::SlippageOrCapExceeded => ErrorCategory::InsufficientFunds,

            Error::DuplicateToken
            | Error::TokenNotRegistered
            | Error::PairNotFound
            | Error::PairInactive
            | Error::TermNotFound
            | Error::DuplicateSubscription
            | Error::SubscriptionNotFound
            | Error::SubscriptionCancelled
            | Error::SubscriptionExpired
            | Error::PeriodAlreadyProcessed
            | Error::DuplicateEvent
            | Error::InTrialPeriod
            | Error::GracePeriodExceeded
            | Error::SubscriptionNotLapsed
            | Error::AlreadyInitialized
            | Error::NotInitialized => ErrorCategory::State,

            Error::CapExceeded => ErrorCategory::Capacity,

            Error::OracleUnavailable
            | Error::InvalidOracleAnswer
            | Error::LedgerFailure
            | Error::ContractPaused => ErrorCategory::Operational,
        }
    }
}
