use soroban_sdk::{contracttype, Address};

use crate::storage::Role;

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RoleChangedEvent {
    pub role: Role,
    pub account: Address,
    pub granted: bool,
}
