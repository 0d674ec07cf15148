use soroban_sdk::contracterror;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    // Initialization errors
    AlreadyInitialized = 1,
    NotInitialized = 2,

    // Role errors
    RoleAlreadyGranted = 10,
    RoleNotHeld = 11,
    MemberIndexOutOfRange = 12,
}
