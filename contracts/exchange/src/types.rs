use soroban_sdk::{contracttype, Address, BytesN, String, Vec};

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TokenInfo {
    pub token_id: u32,
    /// Ledger contract holding the token's balances
    pub ledger: Address,
    pub symbol: String,
    pub decimals: u32,
    pub oracle: Option<Address>,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SwapPair {
    pub pair_id: u32,
    pub source_token: u32,
    pub destination_token: u32,
    /// Static rate numerator (destination per source)
    pub rate_num: i128,
    /// Static rate denominator
    pub rate_den: i128,
    /// Smallest accepted input amount
    pub min_amount: i128,
    /// Flat fee deducted from the output, in output units
    pub fee: i128,
    /// Price feed overriding the static rate when set
    pub oracle: Option<Address>,
    pub oracle_decimals: u32,
    /// Oracle quotes source per destination instead of destination per source
    pub oracle_inverse: bool,
    pub merchant_only: bool,
    pub buy_only: bool,
    pub sell_only: bool,
    pub active: bool,
}

#[contracttype]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum SwapSide {
    /// Pay the source token, receive the destination token
    Buy = 0,
    /// Pay the destination token, receive the source token
    Sell = 1,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SwapQuote {
    pub pair_id: u32,
    pub side: SwapSide,
    pub token_in: u32,
    pub token_out: u32,
    pub amount_in: i128,
    pub gross_out: i128,
    pub fee: i128,
    pub amount_out: i128,
}

#[contracttype]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum BillingPeriod {
    Year = 0,
    Quarter = 1,
    Month = 2,
    Week = 3,
    Day = 4,
}

/// Multi-granularity UTC time key used to dedupe billing events.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TimestampBucket {
    pub unix_seconds: u64,
    /// YYYY
    pub year: u32,
    /// YYYYQ
    pub quarter: u32,
    /// YYYYMM
    pub month: u32,
    /// ISO week-year and week, YYYYWW
    pub week: u32,
    /// YYYYMMDD
    pub day: u32,
}

impl TimestampBucket {
    pub fn key(&self, period: BillingPeriod) -> u32 {
        match period {
            BillingPeriod::Year => self.year,
            BillingPeriod::Quarter => self.quarter,
            BillingPeriod::Month => self.month,
            BillingPeriod::Week => self.week,
            BillingPeriod::Day => self.day,
        }
    }
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SubscriptionTerm {
    pub term_id: u32,
    /// Registered token the charges are paid in
    pub token_id: u32,
    /// Seconds between billing cycles
    pub interval: u64,
    /// Nominal charge per cycle
    pub amount: i128,
    /// Seconds after start during which no charge is taken
    pub trial_period: u64,
    /// Seconds a payment may run late before the subscription lapses
    pub grace_period: u64,
    /// Number of cycles in the term, 0 for open-ended
    pub max_cycles: u32,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BillingParams {
    /// Bucket granularity used for dedup
    pub granularity: BillingPeriod,
    /// Ceiling for a single event's amount
    pub max_amount: i128,
}

#[contracttype]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum SubscriptionStatus {
    Active = 0,
    Cancelled = 1,
    Expired = 2,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Subscription {
    pub subscription_id: BytesN<16>,
    pub subscriber: Address,
    /// Revenue account receiving the charges
    pub merchant: Address,
    pub term_id: u32,
    pub auto_renew: bool,
    pub status: SubscriptionStatus,
    pub billing: BillingParams,
    pub started_at: u64,
    /// Unix time of the latest processed event, 0 before the first
    pub last_processed_at: u64,
    /// Bucket key of the latest processed event at `billing.granularity`
    pub last_processed_period: u32,
    pub cycles: u32,
    pub total_billed: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SubscriptionEvent {
    pub subscription_id: BytesN<16>,
    pub event_id: BytesN<16>,
    pub amount: i128,
    pub timestamp: TimestampBucket,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EventResult {
    pub subscription_id: BytesN<16>,
    pub event_id: BytesN<16>,
    pub success: bool,
    /// Amount transferred, 0 when journaled or failed
    pub amount: i128,
    /// Error code on failure, 0 on success
    pub error: u32,
}

#[contracttype]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ActionKind {
    Swap = 0,
    Subscribe = 1,
    Transfer = 2,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SwapAction {
    pub pair_id: u32,
    pub amount: i128,
    pub side: SwapSide,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ChargeRequest {
    pub event_id: BytesN<16>,
    pub amount: i128,
    pub timestamp: TimestampBucket,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SubscribeAction {
    pub subscription_id: BytesN<16>,
    pub merchant: Address,
    pub term_id: u32,
    pub auto_renew: bool,
    pub billing: BillingParams,
    /// Charge taken immediately after the subscription is created; at most
    /// one entry
    pub first_charge: Vec<ChargeRequest>,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TransferAction {
    pub token_id: u32,
    pub to: Address,
    pub amount: i128,
}

/// Off-chain consent for a batch, signed by the actor's declared key.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BatchAuthorization {
    pub nonce: u128,
    pub expiry: u64,
    pub signature: BytesN<64>,
}
