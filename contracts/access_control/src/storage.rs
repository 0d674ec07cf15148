use soroban_sdk::{contracttype, Address};

pub(crate) const MEMBER_BUMP_AMOUNT: u32 = 518_400; // ~30 days
pub(crate) const MEMBER_LIFETIME_THRESHOLD: u32 = MEMBER_BUMP_AMOUNT - 17_280;

#[contracttype]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Role {
    /// May use merchant-only swap pairs and receive subscriptions
    Merchant = 0,
    /// May receive subscription revenue
    Revenue = 1,
    /// May process subscription events for any merchant
    SubscriptionAdmin = 2,
}

#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    Admin,
    Initialized,
    Member(Role, Address), // -> position in the role's member list
    MemberAt(Role, u32),   // -> account
    MemberCount(Role),
}
