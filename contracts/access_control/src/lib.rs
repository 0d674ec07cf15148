#![no_std]

mod error;
mod events;
mod storage;

pub use error::Error;
pub use storage::Role;

use events::RoleChangedEvent;
use storage::{DataKey, MEMBER_BUMP_AMOUNT, MEMBER_LIFETIME_THRESHOLD};

use soroban_sdk::{contract, contractimpl, Address, Env, Symbol};

/// Role store consumed by the exchange as a capability check.
#[contract]
pub struct AccessControl;

#[contractimpl]
impl AccessControl {
    /// Initialize with the role administrator
    ///
    /// # Errors
    /// - `AlreadyInitialized`: Contract already initialized
    pub fn initialize(env: Env, admin: Address) -> Result<(), Error> {
        if env.storage().instance().has(&DataKey::Initialized) {
            return Err(Error::AlreadyInitialized);
        }

        admin.require_auth();

        env.storage().instance().set(&DataKey::Initialized, &true);
        env.storage().instance().set(&DataKey::Admin, &admin);

        Ok(())
    }

    /// Grant `role` to `account` (admin only)
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    /// - `RoleAlreadyGranted`: Account already holds the role
    pub fn grant_role(env: Env, role: Role, account: Address) -> Result<(), Error> {
        let admin: Address = env
            .storage()
            .instance()
            .get(&DataKey::Admin)
            .ok_or(Error::NotInitialized)?;
        admin.require_auth();

        if Self::has_role(env.clone(), role, account.clone()) {
            return Err(Error::RoleAlreadyGranted);
        }

        Self::write_membership(&env, role, &account, true);
        Ok(())
    }

    /// Revoke `role` from `account` (admin only)
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    /// - `RoleNotHeld`: Account does not hold the role
    pub fn revoke_role(env: Env, role: Role, account: Address) -> Result<(), Error> {
        let admin: Address = env
            .storage()
            .instance()
            .get(&DataKey::Admin)
            .ok_or(Error::NotInitialized)?;
        admin.require_auth();

        if !Self::has_role(env.clone(), role, account.clone()) {
            return Err(Error::RoleNotHeld);
        }

        Self::write_membership(&env, role, &account, false);
        Ok(())
    }

    /// Give up a role held by the caller
    pub fn renounce_role(env: Env, role: Role, account: Address) -> Result<(), Error> {
        account.require_auth();

        if !Self::has_role(env.clone(), role, account.clone()) {
            return Err(Error::RoleNotHeld);
        }

        Self::write_membership(&env, role, &account, false);
        Ok(())
    }

    // ============================================
    // VIEW FUNCTIONS
    // ============================================

    pub fn has_role(env: Env, role: Role, account: Address) -> bool {
        env.storage()
            .persistent()
            .has(&DataKey::Member(role, account))
    }

    pub fn role_member_count(env: Env, role: Role) -> u32 {
        env.storage()
            .instance()
            .get(&DataKey::MemberCount(role))
            .unwrap_or(0)
    }

    /// Member at `index`; order changes when a member is removed
    ///
    /// # Errors
    /// - `MemberIndexOutOfRange`: `index` not below `role_member_count`
    pub fn role_member(env: Env, role: Role, index: u32) -> Result<Address, Error> {
        env.storage()
            .persistent()
            .get(&DataKey::MemberAt(role, index))
            .ok_or(Error::MemberIndexOutOfRange)
    }

    /// Account allowed to grant and revoke `role`; one admin governs every role
    pub fn role_admin(env: Env, _role: Role) -> Result<Address, Error> {
        env.storage()
            .instance()
            .get(&DataKey::Admin)
            .ok_or(Error::NotInitialized)
    }

    pub fn is_valid_merchant(env: Env, account: Address) -> bool {
        Self::has_role(env, Role::Merchant, account)
    }

    pub fn is_revenue_account(env: Env, account: Address) -> bool {
        Self::has_role(env, Role::Revenue, account)
    }

    pub fn is_subscription_admin(env: Env, account: Address) -> bool {
        Self::has_role(env, Role::SubscriptionAdmin, account)
    }

    /// Keep `Member` and `MemberAt` in step; removal moves the last member
    /// into the freed slot.
    fn write_membership(env: &Env, role: Role, account: &Address, granted: bool) {
        let store = env.storage().persistent();
        let key = DataKey::Member(role, account.clone());
        let count = Self::role_member_count(env.clone(), role);

        if granted {
            let slot = DataKey::MemberAt(role, count);
            store.set(&key, &count);
            store.set(&slot, account);
            store.extend_ttl(&key, MEMBER_LIFETIME_THRESHOLD, MEMBER_BUMP_AMOUNT);
            store.extend_ttl(&slot, MEMBER_LIFETIME_THRESHOLD, MEMBER_BUMP_AMOUNT);
            env.storage()
                .instance()
                .set(&DataKey::MemberCount(role), &(count + 1));
        } else {
            let index: u32 = store.get(&key).unwrap_or(0);
            let last = count.saturating_sub(1);
            if index != last {
                if let Some(moved) = store.get::<_, Address>(&DataKey::MemberAt(role, last)) {
                    let slot = DataKey::MemberAt(role, index);
                    let moved_key = DataKey::Member(role, moved.clone());
                    store.set(&slot, &moved);
                    store.set(&moved_key, &index);
                    store.extend_ttl(&slot, MEMBER_LIFETIME_THRESHOLD, MEMBER_BUMP_AMOUNT);
                    store.extend_ttl(&moved_key, MEMBER_LIFETIME_THRESHOLD, MEMBER_BUMP_AMOUNT);
                }
            }
            store.remove(&DataKey::MemberAt(role, last));
            store.remove(&key);
            env.storage()
                .instance()
                .set(&DataKey::MemberCount(role), &last);
        }

        env.events().publish(
            (Symbol::new(env, "role_changed"), role),
            RoleChangedEvent {
                role,
                account: account.clone(),
                granted,
            },
        );
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use soroban_sdk::{testutils::Address as _, Address, Env};

    fn setup() -> (Env, AccessControlClient<'static>) {
        let env = Env::default();
        env.mock_all_auths();

        let contract_id = env.register(AccessControl, ());
        let client = AccessControlClient::new(&env, &contract_id);

        let admin = Address::generate(&env);
        client.initialize(&admin);

        (env, client)
    }

    #[test]
    fn test_grant_and_revoke() {
        let (env, client) = setup();
        let merchant = Address::generate(&env);

        assert!(!client.is_valid_merchant(&merchant));

        client.grant_role(&Role::Merchant, &merchant);
        assert!(client.is_valid_merchant(&merchant));
        assert!(!client.is_revenue_account(&merchant));
        assert_eq!(client.role_member_count(&Role::Merchant), 1);

        client.revoke_role(&Role::Merchant, &merchant);
        assert!(!client.is_valid_merchant(&merchant));
        assert_eq!(client.role_member_count(&Role::Merchant), 0);
    }

    #[test]
    fn test_double_grant_rejected() {
        let (env, client) = setup();
        let account = Address::generate(&env);

        client.grant_role(&Role::Revenue, &account);
        let result = client.try_grant_role(&Role::Revenue, &account);
        assert_eq!(result, Err(Ok(Error::RoleAlreadyGranted)));
    }

    #[test]
    fn test_renounce() {
        let (env, client) = setup();
        let account = Address::generate(&env);

        client.grant_role(&Role::SubscriptionAdmin, &account);
        client.renounce_role(&Role::SubscriptionAdmin, &account);
        assert!(!client.is_subscription_admin(&account));

        let result = client.try_renounce_role(&Role::SubscriptionAdmin, &account);
        assert_eq!(result, Err(Ok(Error::RoleNotHeld)));
    }

    #[test]
    fn test_role_members_are_enumerable() {
        let (env, client) = setup();
        let first = Address::generate(&env);
        let second = Address::generate(&env);
        let third = Address::generate(&env);

        for account in [&first, &second, &third] {
            client.grant_role(&Role::Merchant, account);
        }
        assert_eq!(client.role_member(&Role::Merchant, &0), first);
        assert_eq!(client.role_member(&Role::Merchant, &2), third);

        client.revoke_role(&Role::Merchant, &first);
        assert_eq!(client.role_member_count(&Role::Merchant), 2);
        assert_eq!(client.role_member(&Role::Merchant, &0), third);
        assert_eq!(client.role_member(&Role::Merchant, &1), second);
        assert_eq!(
            client.try_role_member(&Role::Merchant, &2),
            Err(Ok(Error::MemberIndexOutOfRange))
        );

        client.grant_role(&Role::Merchant, &first);
        assert_eq!(client.role_member(&Role::Merchant, &2), first);
        assert!(client.has_role(&Role::Merchant, &first));
    }

    #[test]
    fn test_role_admin_is_the_contract_admin() {
        let env = Env::default();
        env.mock_all_auths();
        let client = AccessControlClient::new(&env, &env.register(AccessControl, ()));

        assert_eq!(
            client.try_role_admin(&Role::Revenue),
            Err(Ok(Error::NotInitialized))
        );

        let admin = Address::generate(&env);
        client.initialize(&admin);
        assert_eq!(client.role_admin(&Role::Revenue), admin);
        assert_eq!(client.role_admin(&Role::SubscriptionAdmin), admin);
    }
}
