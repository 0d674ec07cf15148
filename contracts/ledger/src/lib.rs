#![no_std]

mod error;
mod events;
mod storage;

pub use error::Error;
pub use storage::TokenConfig;

use events::{ApprovalEvent, BanEvent, BurnEvent, MintEvent, TransferEvent};
use storage::{DataKey, Storage};

use soroban_sdk::{contract, contractimpl, Address, Env, String, Symbol};

#[contract]
pub struct MultiTokenLedger;

#[contractimpl]
impl MultiTokenLedger {
    // ============================================
    // INITIALIZATION & ADMIN
    // ============================================

    /// Initialize the ledger
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
        Storage::bump_instance(&env);

        Ok(())
    }

    /// Create a token. The initial supply is credited to `authority`.
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    /// - `TokenAlreadyExists`: Token id already used
    /// - `InvalidCap`: Hard cap is not positive
    /// - `InvalidAmount`: Initial supply is negative
    /// - `CapExceeded`: Initial supply above the hard cap
    pub fn create_token(
        env: Env,
        token_id: u32,
        symbol: String,
        decimals: u32,
        hard_cap: Option<i128>,
        authority: Address,
        initial_supply: i128,
    ) -> Result<(), Error> {
        let admin = Storage::get_admin(&env)?;
        admin.require_auth();

        if env.storage().instance().has(&DataKey::Token(token_id)) {
            return Err(Error::TokenAlreadyExists);
        }
        if let Some(cap) = hard_cap {
            if cap <= 0 {
                return Err(Error::InvalidCap);
            }
            if initial_supply > cap {
                return Err(Error::CapExceeded);
            }
        }
        if initial_supply < 0 {
            return Err(Error::InvalidAmount);
        }

        Storage::set_token(
            &env,
            &TokenConfig {
                token_id,
                symbol,
                decimals,
                total_supply: initial_supply,
                hard_cap,
                authority: authority.clone(),
            },
        );
        Storage::bump_instance(&env);

        if initial_supply > 0 {
            Storage::set_balance(&env, token_id, &authority, initial_supply);
            env.events().publish(
                (Symbol::new(&env, "mint"), token_id),
                MintEvent {
                    token_id,
                    to: authority,
                    amount: initial_supply,
                    total_supply: initial_supply,
                },
            );
        }

        Ok(())
    }

    /// Add an account to the token's ban-list (authority only)
    pub fn ban(env: Env, token_id: u32, account: Address) -> Result<(), Error> {
        Self::set_ban(&env, token_id, account, true)
    }

    /// Remove an account from the token's ban-list (authority only)
    pub fn unban(env: Env, token_id: u32, account: Address) -> Result<(), Error> {
        Self::set_ban(&env, token_id, account, false)
    }

    // ============================================
    // SUPPLY
    // ============================================

    /// Mint tokens (authority only)
    ///
    /// # Errors
    /// - `TokenNotFound`: Unknown token id
    /// - `InvalidAmount`: Amount <= 0
    /// - `Banned`: Recipient is banned
    /// - `CapExceeded`: Supply would pass the hard cap
    pub fn mint(env: Env, token_id: u32, to: Address, amount: i128) -> Result<(), Error> {
        let mut token = Storage::get_token(&env, token_id)?;
        token.authority.require_auth();

        if amount <= 0 {
            return Err(Error::InvalidAmount);
        }
        if Storage::is_banned(&env, token_id, &to) {
            return Err(Error::Banned);
        }

        let new_supply = token
            .total_supply
            .checked_add(amount)
            .ok_or(Error::CapExceeded)?;
        if let Some(cap) = token.hard_cap {
            if new_supply > cap {
                return Err(Error::CapExceeded);
            }
        }
        let new_balance = Storage::balance(&env, token_id, &to)
            .checked_add(amount)
            .ok_or(Error::InvalidAmount)?;

        token.total_supply = new_supply;
        Storage::set_token(&env, &token);
        Storage::set_balance(&env, token_id, &to, new_balance);

        env.events().publish(
            (Symbol::new(&env, "mint"), token_id),
            MintEvent {
                token_id,
                to,
                amount,
                total_supply: new_supply,
            },
        );

        Ok(())
    }

    /// Burn tokens (authority only)
    ///
    /// # Errors
    /// - `TokenNotFound`: Unknown token id
    /// - `InvalidAmount`: Amount <= 0
    /// - `InsufficientBalance`: Not enough balance
    pub fn burn(env: Env, token_id: u32, from: Address, amount: i128) -> Result<(), Error> {
        let mut token = Storage::get_token(&env, token_id)?;
        token.authority.require_auth();

        if amount <= 0 {
            return Err(Error::InvalidAmount);
        }

        let balance = Storage::balance(&env, token_id, &from);
        if balance < amount {
            return Err(Error::InsufficientBalance);
        }

        token.total_supply -= amount;
        Storage::set_token(&env, &token);
        Storage::set_balance(&env, token_id, &from, balance - amount);

        env.events().publish(
            (Symbol::new(&env, "burn"), token_id),
            BurnEvent {
                token_id,
                from,
                amount,
                total_supply: token.total_supply,
            },
        );

        Ok(())
    }

    // ============================================
    // TRANSFERS & ALLOWANCES
    // ============================================

    /// Transfer tokens between accounts
    ///
    /// # Errors
    /// - `TokenNotFound`: Unknown token id
    /// - `InvalidAmount`: Amount <= 0
    /// - `Banned`: Either party is banned
    /// - `InsufficientBalance`: Not enough balance
    pub fn transfer(
        env: Env,
        token_id: u32,
        from: Address,
        to: Address,
        amount: i128,
    ) -> Result<(), Error> {
        from.require_auth();

        Self::move_balance(&env, token_id, &from, &to, amount)
    }

    /// Set the allowance of `spender` over `owner`'s tokens
    pub fn approve(
        env: Env,
        token_id: u32,
        owner: Address,
        spender: Address,
        amount: i128,
    ) -> Result<(), Error> {
        owner.require_auth();
        Storage::get_token(&env, token_id)?;

        if amount < 0 {
            return Err(Error::InvalidAmount);
        }

        Self::write_allowance(&env, token_id, &owner, &spender, amount);
        Ok(())
    }

    /// Raise an allowance by `amount`
    pub fn increase_allowance(
        env: Env,
        token_id: u32,
        owner: Address,
        spender: Address,
        amount: i128,
    ) -> Result<(), Error> {
        owner.require_auth();
        Storage::get_token(&env, token_id)?;

        if amount <= 0 {
            return Err(Error::InvalidAmount);
        }

        let current = Storage::allowance(&env, token_id, &owner, &spender);
        let updated = current.checked_add(amount).ok_or(Error::InvalidAmount)?;
        Self::write_allowance(&env, token_id, &owner, &spender, updated);
        Ok(())
    }

    /// Lower an allowance by `amount`
    ///
    /// # Errors
    /// - `InsufficientAllowance`: Allowance is smaller than `amount`
    pub fn decrease_allowance(
        env: Env,
        token_id: u32,
        owner: Address,
        spender: Address,
        amount: i128,
    ) -> Result<(), Error> {
        owner.require_auth();
        Storage::get_token(&env, token_id)?;

        if amount <= 0 {
            return Err(Error::InvalidAmount);
        }

        let current = Storage::allowance(&env, token_id, &owner, &spender);
        if current < amount {
            return Err(Error::InsufficientAllowance);
        }
        Self::write_allowance(&env, token_id, &owner, &spender, current - amount);
        Ok(())
    }

    /// Move tokens on behalf of `from`, spending `spender`'s allowance
    ///
    /// # Errors
    /// - `InsufficientAllowance`: Allowance is smaller than `amount`
    /// - Any error of `transfer`
    pub fn transfer_from(
        env: Env,
        token_id: u32,
        spender: Address,
        from: Address,
        to: Address,
        amount: i128,
    ) -> Result<(), Error> {
        spender.require_auth();

        let allowance = Storage::allowance(&env, token_id, &from, &spender);
        if allowance < amount {
            return Err(Error::InsufficientAllowance);
        }

        Self::move_balance(&env, token_id, &from, &to, amount)?;
        Storage::set_allowance(&env, token_id, &from, &spender, allowance - amount);

        Ok(())
    }

    // ============================================
    // VIEW FUNCTIONS
    // ============================================

    pub fn balance_of(env: Env, token_id: u32, holder: Address) -> i128 {
        Storage::balance(&env, token_id, &holder)
    }

    pub fn allowance(env: Env, token_id: u32, owner: Address, spender: Address) -> i128 {
        Storage::allowance(&env, token_id, &owner, &spender)
    }

    pub fn total_supply(env: Env, token_id: u32) -> Result<i128, Error> {
        Ok(Storage::get_token(&env, token_id)?.total_supply)
    }

    pub fn token(env: Env, token_id: u32) -> Result<TokenConfig, Error> {
        Storage::get_token(&env, token_id)
    }

    pub fn is_banned(env: Env, token_id: u32, account: Address) -> bool {
        Storage::is_banned(&env, token_id, &account)
    }

    // ============================================
    // INTERNAL HELPERS
    // ============================================

    /// Debit `from` and credit `to`. Every check runs before the first write.
    fn move_balance(
        env: &Env,
        token_id: u32,
        from: &Address,
        to: &Address,
        amount: i128,
    ) -> Result<(), Error> {
        Storage::get_token(env, token_id)?;

        if amount <= 0 {
            return Err(Error::InvalidAmount);
        }
        if Storage::is_banned(env, token_id, from) || Storage::is_banned(env, token_id, to) {
            return Err(Error::Banned);
        }

        let from_balance = Storage::balance(env, token_id, from);
        if from_balance < amount {
            return Err(Error::InsufficientBalance);
        }

        if from != to {
            let new_to_balance = Storage::balance(env, token_id, to)
                .checked_add(amount)
                .ok_or(Error::InvalidAmount)?;

            Storage::set_balance(env, token_id, from, from_balance - amount);
            Storage::set_balance(env, token_id, to, new_to_balance);
        }

        env.events().publish(
            (Symbol::new(env, "transfer"), token_id),
            TransferEvent {
                token_id,
                from: from.clone(),
                to: to.clone(),
                amount,
            },
        );

        Ok(())
    }

    fn write_allowance(
        env: &Env,
        token_id: u32,
        owner: &Address,
        spender: &Address,
        amount: i128,
    ) {
        Storage::set_allowance(env, token_id, owner, spender, amount);

        env.events().publish(
            (Symbol::new(env, "approve"), token_id),
            ApprovalEvent {
                token_id,
                owner: owner.clone(),
                spender: spender.clone(),
                amount,
            },
        );
    }

    fn set_ban(env: &Env, token_id: u32, account: Address, banned: bool) -> Result<(), Error> {
        let token = Storage::get_token(env, token_id)?;
        token.authority.require_auth();

        Storage::set_banned(env, token_id, &account, banned);

        env.events().publish(
            (Symbol::new(env, "ban"), token_id),
            BanEvent {
                token_id,
                account,
                banned,
            },
        );

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use soroban_sdk::{testutils::Address as _, Address, Env, String};

    const SCALE: i128 = 1_000_000_000_000_000_000;
    const TOKEN: u32 = 1;

    struct Setup {
        env: Env,
        client: MultiTokenLedgerClient<'static>,
        authority: Address,
    }

    fn setup(hard_cap: Option<i128>, initial_supply: i128) -> Setup {
        let env = Env::default();
        env.mock_all_auths();

        let contract_id = env.register(MultiTokenLedger, ());
        let client = MultiTokenLedgerClient::new(&env, &contract_id);

        let admin = Address::generate(&env);
        let authority = Address::generate(&env);

        client.initialize(&admin);
        client.create_token(
            &TOKEN,
            &String::from_str(&env, "vtUSD"),
            &18u32,
            &hard_cap,
            &authority,
            &initial_supply,
        );

        Setup {
            env,
            client,
            authority,
        }
    }

    #[test]
    fn test_initialize_twice() {
        let s = setup(None, 0);
        let admin = Address::generate(&s.env);

        let result = s.client.try_initialize(&admin);
        assert_eq!(result, Err(Ok(Error::AlreadyInitialized)));
    }

    #[test]
    fn test_create_token_credits_initial_supply() {
        let s = setup(None, 1000 * SCALE);

        assert_eq!(s.client.balance_of(&TOKEN, &s.authority), 1000 * SCALE);
        assert_eq!(s.client.total_supply(&TOKEN), 1000 * SCALE);

        let duplicate = s.client.try_create_token(
            &TOKEN,
            &String::from_str(&s.env, "dup"),
            &18u32,
            &None,
            &s.authority,
            &0,
        );
        assert_eq!(duplicate, Err(Ok(Error::TokenAlreadyExists)));
    }

    #[test]
    fn test_mint_respects_hard_cap() {
        let s = setup(Some(100 * SCALE), 0);
        let user = Address::generate(&s.env);

        s.client.mint(&TOKEN, &user, &(60 * SCALE));
        let result = s.client.try_mint(&TOKEN, &user, &(41 * SCALE));
        assert_eq!(result, Err(Ok(Error::CapExceeded)));

        s.client.mint(&TOKEN, &user, &(40 * SCALE));
        assert_eq!(s.client.total_supply(&TOKEN), 100 * SCALE);
    }

    #[test]
    fn test_transfer_and_supply_conservation() {
        let s = setup(None, 0);
        let alice = Address::generate(&s.env);
        let bob = Address::generate(&s.env);

        s.client.mint(&TOKEN, &alice, &(1000 * SCALE));
        s.client.transfer(&TOKEN, &alice, &bob, &(300 * SCALE));

        let alice_balance = s.client.balance_of(&TOKEN, &alice);
        let bob_balance = s.client.balance_of(&TOKEN, &bob);
        assert_eq!(alice_balance, 700 * SCALE);
        assert_eq!(bob_balance, 300 * SCALE);
        assert_eq!(alice_balance + bob_balance, s.client.total_supply(&TOKEN));
    }

    #[test]
    fn test_insufficient_balance_leaves_balances() {
        let s = setup(None, 0);
        let alice = Address::generate(&s.env);
        let bob = Address::generate(&s.env);

        s.client.mint(&TOKEN, &alice, &(10 * SCALE));

        let result = s.client.try_transfer(&TOKEN, &alice, &bob, &(11 * SCALE));
        assert_eq!(result, Err(Ok(Error::InsufficientBalance)));
        assert_eq!(s.client.balance_of(&TOKEN, &alice), 10 * SCALE);
        assert_eq!(s.client.balance_of(&TOKEN, &bob), 0);
    }

    #[test]
    fn test_banned_parties_cannot_transfer() {
        let s = setup(None, 0);
        let alice = Address::generate(&s.env);
        let bob = Address::generate(&s.env);

        s.client.mint(&TOKEN, &alice, &(10 * SCALE));
        s.client.ban(&TOKEN, &bob);
        assert!(s.client.is_banned(&TOKEN, &bob));

        let to_banned = s.client.try_transfer(&TOKEN, &alice, &bob, &SCALE);
        assert_eq!(to_banned, Err(Ok(Error::Banned)));

        s.client.ban(&TOKEN, &alice);
        s.client.unban(&TOKEN, &bob);
        let from_banned = s.client.try_transfer(&TOKEN, &alice, &bob, &SCALE);
        assert_eq!(from_banned, Err(Ok(Error::Banned)));

        let mint_banned = s.client.try_mint(&TOKEN, &alice, &SCALE);
        assert_eq!(mint_banned, Err(Ok(Error::Banned)));
    }

    #[test]
    fn test_transfer_from_spends_allowance() {
        let s = setup(None, 0);
        let owner = Address::generate(&s.env);
        let spender = Address::generate(&s.env);
        let recipient = Address::generate(&s.env);

        s.client.mint(&TOKEN, &owner, &(100 * SCALE));
        s.client.approve(&TOKEN, &owner, &spender, &(30 * SCALE));

        s.client
            .transfer_from(&TOKEN, &spender, &owner, &recipient, &(20 * SCALE));
        assert_eq!(s.client.allowance(&TOKEN, &owner, &spender), 10 * SCALE);
        assert_eq!(s.client.balance_of(&TOKEN, &recipient), 20 * SCALE);

        let result = s
            .client
            .try_transfer_from(&TOKEN, &spender, &owner, &recipient, &(11 * SCALE));
        assert_eq!(result, Err(Ok(Error::InsufficientAllowance)));
        assert_eq!(s.client.allowance(&TOKEN, &owner, &spender), 10 * SCALE);
    }

    #[test]
    fn test_allowance_adjustments() {
        let s = setup(None, 0);
        let owner = Address::generate(&s.env);
        let spender = Address::generate(&s.env);

        s.client.increase_allowance(&TOKEN, &owner, &spender, &(5 * SCALE));
        s.client.increase_allowance(&TOKEN, &owner, &spender, &(5 * SCALE));
        s.client.decrease_allowance(&TOKEN, &owner, &spender, &(3 * SCALE));
        assert_eq!(s.client.allowance(&TOKEN, &owner, &spender), 7 * SCALE);

        let result = s
            .client
            .try_decrease_allowance(&TOKEN, &owner, &spender, &(8 * SCALE));
        assert_eq!(result, Err(Ok(Error::InsufficientAllowance)));
    }

    #[test]
    fn test_burn_reduces_supply() {
        let s = setup(None, 0);
        let user = Address::generate(&s.env);

        s.client.mint(&TOKEN, &user, &(1000 * SCALE));
        s.client.burn(&TOKEN, &user, &(400 * SCALE));

        assert_eq!(s.client.balance_of(&TOKEN, &user), 600 * SCALE);
        assert_eq!(s.client.total_supply(&TOKEN), 600 * SCALE);

        let result = s.client.try_burn(&TOKEN, &user, &(601 * SCALE));
        assert_eq!(result, Err(Ok(Error::InsufficientBalance)));
    }

    #[test]
    fn test_unknown_token() {
        let s = setup(None, 0);
        let user = Address::generate(&s.env);

        let result = s.client.try_mint(&99u32, &user, &SCALE);
        assert_eq!(result, Err(Ok(Error::TokenNotFound)));
    }
}
