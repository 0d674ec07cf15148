use soroban_sdk::contracterror;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    // Initialization errors
    AlreadyInitialized = 1,
    NotInitialized = 2,

    // Balance errors
    InsufficientBalance = 4,
    InvalidAmount = 5,

    // Token errors
    TokenNotFound = 10,
    TokenAlreadyExists = 11,
    CapExceeded = 12,
    InvalidCap = 13,

    // Transfer restrictions
    Banned = 20,
    InsufficientAllowance = 21,
}
