//! "Buy me a coffee" tipping contract.
//!
//! [`CoffeeShop`] is the persistent, public-facing half of a two-contract
//! pair. It owns every piece of durable state: the upgrade admin, the
//! business owner, the price-feed registry and the per-asset pools of
//! accepted funds. The arithmetic that turns "3 coffees" into an amount of
//! wei or tokens lives behind [`CoffeePricerInterface`], so the admin can
//! replace the deployed [`crate::payments::pricer::CoffeePricer`] without
//! moving funds or re-registering tokens.
//!
//! Purchases are priced in USD and converted through Chainlink-style feeds:
//! the native asset uses the feed fixed at initialization, ERC-20 tokens use
//! the feed registered by the owner. A zero feed entry marks a token as
//! unsupported. Accepted funds accumulate in explicit pool ledgers until the
//! owner withdraws them.

use alloc::{string::String, vec::Vec};

use alloy_primitives::{Address, I256, U256};
pub use sol::*;
pub use strategy::CoffeePricerInterface;
use stylus_sdk::{
    call::{call, Call, MethodError},
    contract, evm, msg,
    prelude::*,
    storage::{StorageAddress, StorageBool, StorageMap, StorageU256},
};

use crate::{
    token::erc20::Erc20Interface, utils::math::storage::AddAssignChecked,
};

mod sol {
    use alloy_sol_macro::sol;

    sol! {
        /// Emitted when a coffee purchase is paid in the native asset.
        ///
        /// * `buyer` - Account that paid for the coffees.
        /// * `amount` - Native value accepted, in wei.
        /// * `message` - Note left by the buyer.
        #[derive(Debug)]
        #[allow(missing_docs)]
        event CoffeeBought(address indexed buyer, uint256 amount, string message);

        /// Emitted when a coffee purchase is paid in a registered ERC-20
        /// token.
        ///
        /// * `token` - Token the purchase was paid in.
        /// * `buyer` - Account that paid for the coffees.
        /// * `amount` - Amount of the token pulled from the buyer.
        /// * `message` - Note left by the buyer.
        #[derive(Debug)]
        #[allow(missing_docs)]
        event CoffeeBoughtERC20(address indexed token, address indexed buyer, uint256 amount, string message);

        /// Emitted when the pricing strategy behind this contract is
        /// replaced.
        ///
        /// * `implementation` - Address of the new strategy contract.
        #[derive(Debug)]
        #[allow(missing_docs)]
        event Upgraded(address indexed implementation);

        /// Emitted when the accumulated native pool is paid out.
        ///
        /// * `to` - Recipient of the funds.
        /// * `amount` - Paid out amount, in wei.
        #[derive(Debug)]
        #[allow(missing_docs)]
        event EthWithdrawn(address indexed to, uint256 amount);

        /// Emitted when an accumulated ERC-20 pool is paid out.
        ///
        /// * `token` - Token that was paid out.
        /// * `to` - Recipient of the funds.
        /// * `amount` - Paid out amount of the token.
        #[derive(Debug)]
        #[allow(missing_docs)]
        event Erc20Withdrawn(address indexed token, address indexed to, uint256 amount);
    }

    sol! {
        /// The caller is not the upgrade admin.
        ///
        /// * `account` - Account that attempted the operation.
        #[derive(Debug)]
        #[allow(missing_docs)]
        error NotAdmin(address account);

        /// The caller is not the business owner.
        ///
        /// * `account` - Account that attempted the operation.
        #[derive(Debug)]
        #[allow(missing_docs)]
        error NotOwner(address account);

        /// The contract has already been initialized.
        #[derive(Debug)]
        #[allow(missing_docs)]
        error AlreadyInitialized();

        /// No pricing strategy has been configured yet.
        #[derive(Debug)]
        #[allow(missing_docs)]
        error NoImplementationSet();

        /// The zero address was supplied where a real address is required.
        #[derive(Debug)]
        #[allow(missing_docs)]
        error ZeroAddress();

        /// A purchase of zero coffees was attempted.
        #[derive(Debug)]
        #[allow(missing_docs)]
        error ZeroUnits();

        /// Token and price feed sequences differ in length.
        ///
        /// * `tokens` - Number of token addresses supplied.
        /// * `price_feeds` - Number of price feed addresses supplied.
        #[derive(Debug)]
        #[allow(missing_docs)]
        error ArrayLengthMismatch(uint256 tokens, uint256 price_feeds);

        /// The token has no registered price feed.
        ///
        /// * `token` - Token that was offered as payment.
        #[derive(Debug)]
        #[allow(missing_docs)]
        error UnsupportedToken(address token);

        /// The attached value does not cover the price of the purchase.
        ///
        /// * `provided` - Value attached to the call.
        /// * `required` - Value the purchase costs.
        #[derive(Debug)]
        #[allow(missing_docs)]
        error InsufficientPayment(uint256 provided, uint256 required);

        /// A native or ERC-20 transfer was rejected.
        #[derive(Debug)]
        #[allow(missing_docs)]
        error TransferFailed();
    }
}

mod strategy {
    #![allow(missing_docs)]

    use alloc::vec;

    use stylus_sdk::prelude::sol_interface;
    sol_interface! {
        interface CoffeePricerInterface {
            function quote(address feed, uint8 assetDecimals, uint256 units) external view returns (uint256);
            function latestPrice(address feed) external view returns (int256);
        }
    }
}

/// An error that occurred in the [`CoffeeShop`] contract.
#[derive(SolidityError, Debug)]
pub enum Error {
    /// The caller is not the upgrade admin.
    NotAdmin(NotAdmin),
    /// The caller is not the business owner.
    NotOwner(NotOwner),
    /// The contract has already been initialized.
    AlreadyInitialized(AlreadyInitialized),
    /// No pricing strategy has been configured yet.
    NoImplementationSet(NoImplementationSet),
    /// The zero address was supplied where a real address is required.
    ZeroAddress(ZeroAddress),
    /// A purchase of zero coffees was attempted.
    ZeroUnits(ZeroUnits),
    /// Token and price feed sequences differ in length.
    ArrayLengthMismatch(ArrayLengthMismatch),
    /// The token has no registered price feed.
    UnsupportedToken(UnsupportedToken),
    /// The attached value does not cover the price of the purchase.
    InsufficientPayment(InsufficientPayment),
    /// A native or ERC-20 transfer was rejected.
    TransferFailed(TransferFailed),
}

impl MethodError for Error {
    fn encode(self) -> alloc::vec::Vec<u8> {
        self.into()
    }
}

/// Decimals of the chain's native asset.
const NATIVE_ASSET_DECIMALS: u8 = 18;

/// State of a [`CoffeeShop`] contract.
#[storage]
pub struct CoffeeShop {
    /// Account allowed to replace the pricing strategy.
    pub(crate) admin: StorageAddress,
    /// Address of the active pricing strategy.
    pub(crate) implementation: StorageAddress,
    /// Account allowed to manage the token registry and withdraw funds.
    pub(crate) owner: StorageAddress,
    /// Aggregator pricing the native asset in USD.
    pub(crate) native_price_feed: StorageAddress,
    /// Price feed of each registered token; zero means unsupported.
    pub(crate) erc20_price_feeds: StorageMap<Address, StorageAddress>,
    /// Accepted native funds awaiting withdrawal.
    pub(crate) native_pool: StorageU256,
    /// Accepted funds of each token awaiting withdrawal.
    pub(crate) erc20_pools: StorageMap<Address, StorageU256>,
    /// Whether [`ICoffeeShop::init`] has already run.
    pub(crate) initialized: StorageBool,
}

/// NOTE: Implementation of [`TopLevelStorage`] to be able use `&mut self` when
/// calling other contracts and not `&mut (impl TopLevelStorage +
/// BorrowMut<Self>)`. Should be fixed in the future by the Stylus team.
unsafe impl TopLevelStorage for CoffeeShop {}

/// Interface of the coffee shop.
pub trait ICoffeeShop {
    /// The error type associated to the trait implementation.
    type Error: Into<alloc::vec::Vec<u8>>;

    /// Initializes the contract, making the caller both the upgrade admin and
    /// the business owner and fixing the price feed of the native asset.
    ///
    /// Runs at most once over the lifetime of the contract; the roles it
    /// assigns cannot be transferred afterwards.
    ///
    /// # Arguments
    ///
    /// * `&mut self` - Write access to the contract's state.
    /// * `native_price_feed` - Aggregator pricing the native asset in USD.
    ///
    /// # Errors
    ///
    /// * [`Error::AlreadyInitialized`] - If the contract has been initialized
    ///   before. The stored roles are left untouched.
    /// * [`Error::ZeroAddress`] - If `native_price_feed` is [`Address::ZERO`].
    fn init(&mut self, native_price_feed: Address) -> Result<(), Self::Error>;

    /// Points the contract at a new pricing strategy.
    ///
    /// Only the strategy address changes; the roles, the feed registry and
    /// the pools survive the swap.
    ///
    /// # Arguments
    ///
    /// * `&mut self` - Write access to the contract's state.
    /// * `new_implementation` - Address of the strategy to use from now on.
    ///
    /// # Errors
    ///
    /// * [`Error::NotAdmin`] - If called by any account other than the admin.
    /// * [`Error::ZeroAddress`] - If `new_implementation` is
    ///   [`Address::ZERO`].
    ///
    /// # Events
    ///
    /// * [`Upgraded`].
    fn set_implementation(
        &mut self,
        new_implementation: Address,
    ) -> Result<(), Self::Error>;

    /// Returns the address of the active pricing strategy, or
    /// [`Address::ZERO`] if none has been configured.
    ///
    /// # Arguments
    ///
    /// * `&self` - Read access to the contract's state.
    fn get_implementation(&self) -> Address;

    /// Returns the account holding the admin and owner roles.
    ///
    /// # Arguments
    ///
    /// * `&self` - Read access to the contract's state.
    fn owner(&self) -> Address;

    /// Returns the price feed of the native asset.
    ///
    /// # Arguments
    ///
    /// * `&self` - Read access to the contract's state.
    fn get_price_feed(&self) -> Address;

    /// Returns the price feed registered for `token`, or [`Address::ZERO`]
    /// if the token is not supported.
    ///
    /// # Arguments
    ///
    /// * `&self` - Read access to the contract's state.
    /// * `token` - Token to look up.
    fn erc20_price_feed(&self, token: Address) -> Address;

    /// Returns the accepted native funds awaiting withdrawal, in wei.
    ///
    /// # Arguments
    ///
    /// * `&self` - Read access to the contract's state.
    fn native_pool(&self) -> U256;

    /// Returns the accepted funds of `token` awaiting withdrawal.
    ///
    /// # Arguments
    ///
    /// * `&self` - Read access to the contract's state.
    /// * `token` - Token whose pool to read.
    fn erc20_pool(&self, token: Address) -> U256;

    /// Registers, replaces or removes the price feeds of ERC-20 tokens.
    ///
    /// The sequences are consumed pairwise: `tokens[i]` is mapped to
    /// `price_feeds[i]`, overwriting any prior entry. Registering a token
    /// with [`Address::ZERO`] as its feed marks it unsupported again.
    ///
    /// # Arguments
    ///
    /// * `&mut self` - Write access to the contract's state.
    /// * `tokens` - Tokens to configure.
    /// * `price_feeds` - Aggregator pricing each token in USD.
    ///
    /// # Errors
    ///
    /// * [`Error::NotOwner`] - If called by any account other than the owner.
    /// * [`Error::ArrayLengthMismatch`] - If the sequences differ in length.
    ///   The registry is left untouched.
    fn set_erc20_token(
        &mut self,
        tokens: Vec<Address>,
        price_feeds: Vec<Address>,
    ) -> Result<(), Self::Error>;

    /// Returns the raw answer of `feed`, read through the pricing strategy.
    ///
    /// The answer is not validated in any way; a negative or stale value is
    /// returned as-is.
    ///
    /// # Arguments
    ///
    /// * `&self` - Read access to the contract's state.
    /// * `feed` - Aggregator to consult.
    ///
    /// # Errors
    ///
    /// * [`NoImplementationSet`] - If no pricing strategy is configured.
    /// * The feed's own revert, relayed unmodified, if the oracle read fails.
    fn get_latest_price(&self, feed: Address) -> Result<I256, Vec<u8>>;

    /// Sells `units` coffees against the attached native value.
    ///
    /// The price is quoted by the strategy from the native asset's feed. The
    /// full attached value is accepted and credited to the native pool, even
    /// when it exceeds the quoted price; no change is returned.
    ///
    /// # Arguments
    ///
    /// * `&mut self` - Write access to the contract's state.
    /// * `units` - Number of coffees to buy.
    /// * `message` - Note to attach to the purchase.
    ///
    /// # Errors
    ///
    /// * [`ZeroUnits`] - If `units` is zero.
    /// * [`NoImplementationSet`] - If no pricing strategy is configured.
    /// * [`InsufficientPayment`] - If the attached value is less than the
    ///   quoted price.
    /// * The oracle's own revert, relayed unmodified, if the price read
    ///   fails.
    ///
    /// # Events
    ///
    /// * [`CoffeeBought`].
    ///
    /// # Panics
    ///
    /// * If the native pool exceeds [`U256::MAX`].
    fn buy_coffee(
        &mut self,
        units: U256,
        message: String,
    ) -> Result<(), Vec<u8>>;

    /// Sells `units` coffees against `token`, pulling exactly the quoted
    /// amount from the caller.
    ///
    /// The token must have a registered price feed. The caller must have
    /// approved this contract for at least the quoted amount.
    ///
    /// # Arguments
    ///
    /// * `&mut self` - Write access to the contract's state.
    /// * `token` - Registered token to pay in.
    /// * `units` - Number of coffees to buy.
    /// * `message` - Note to attach to the purchase.
    ///
    /// # Errors
    ///
    /// * [`ZeroUnits`] - If `units` is zero.
    /// * [`UnsupportedToken`] - If `token` has no registered feed.
    /// * [`NoImplementationSet`] - If no pricing strategy is configured.
    /// * [`TransferFailed`] - If the token pull reverts or returns `false`.
    /// * The oracle's or the token's own revert, relayed unmodified, if the
    ///   price or decimals read fails.
    ///
    /// # Events
    ///
    /// * [`CoffeeBoughtERC20`].
    ///
    /// # Panics
    ///
    /// * If the token's pool exceeds [`U256::MAX`].
    fn buy_coffee_erc20(
        &mut self,
        token: Address,
        units: U256,
        message: String,
    ) -> Result<(), Vec<u8>>;

    /// Pays the entire native pool out to `to` and zeroes the pool.
    ///
    /// # Arguments
    ///
    /// * `&mut self` - Write access to the contract's state.
    /// * `to` - Recipient of the funds.
    ///
    /// # Errors
    ///
    /// * [`Error::NotOwner`] - If called by any account other than the owner.
    /// * [`Error::TransferFailed`] - If `to` rejects the transfer. The pool
    ///   is left untouched.
    ///
    /// # Events
    ///
    /// * [`EthWithdrawn`].
    fn withdraw_eth(&mut self, to: Address) -> Result<(), Self::Error>;

    /// Pays the entire pool of `token` out to `to` and zeroes the pool.
    ///
    /// # Arguments
    ///
    /// * `&mut self` - Write access to the contract's state.
    /// * `token` - Token whose pool to pay out.
    /// * `to` - Recipient of the funds.
    ///
    /// # Errors
    ///
    /// * [`Error::NotOwner`] - If called by any account other than the owner.
    /// * [`Error::TransferFailed`] - If the token transfer reverts or returns
    ///   `false`. The pool is left untouched.
    ///
    /// # Events
    ///
    /// * [`Erc20Withdrawn`].
    fn withdraw_erc20(
        &mut self,
        token: Address,
        to: Address,
    ) -> Result<(), Self::Error>;
}

#[public]
#[implements(ICoffeeShop<Error = Error>)]
impl CoffeeShop {
    /// Accepts a plain native transfer, crediting it to the pool available
    /// for withdrawal.
    ///
    /// # Arguments
    ///
    /// * `&mut self` - Write access to the contract's state.
    ///
    /// # Panics
    ///
    /// * If the native pool exceeds [`U256::MAX`].
    #[receive]
    pub fn receive(&mut self) -> Result<(), Vec<u8>> {
        self.native_pool.add_assign_checked(
            msg::value(),
            "native pool should not exceed `U256::MAX`",
        );
        Ok(())
    }
}

#[public]
impl ICoffeeShop for CoffeeShop {
    type Error = Error;

    fn init(&mut self, native_price_feed: Address) -> Result<(), Self::Error> {
        if self.initialized.get() {
            return Err(Error::AlreadyInitialized(AlreadyInitialized {}));
        }
        if native_price_feed.is_zero() {
            return Err(Error::ZeroAddress(ZeroAddress {}));
        }

        self.initialized.set(true);
        self.admin.set(msg::sender());
        self.owner.set(msg::sender());
        self.native_price_feed.set(native_price_feed);

        Ok(())
    }

    fn set_implementation(
        &mut self,
        new_implementation: Address,
    ) -> Result<(), Self::Error> {
        self.only_admin()?;

        if new_implementation.is_zero() {
            return Err(Error::ZeroAddress(ZeroAddress {}));
        }

        self.implementation.set(new_implementation);

        evm::log(Upgraded { implementation: new_implementation });

        Ok(())
    }

    fn get_implementation(&self) -> Address {
        self.implementation.get()
    }

    fn owner(&self) -> Address {
        self.owner.get()
    }

    fn get_price_feed(&self) -> Address {
        self.native_price_feed.get()
    }

    fn erc20_price_feed(&self, token: Address) -> Address {
        self.erc20_price_feeds.get(token)
    }

    fn native_pool(&self) -> U256 {
        self.native_pool.get()
    }

    fn erc20_pool(&self, token: Address) -> U256 {
        self.erc20_pools.get(token)
    }

    #[selector(name = "setERC20Token")]
    fn set_erc20_token(
        &mut self,
        tokens: Vec<Address>,
        price_feeds: Vec<Address>,
    ) -> Result<(), Self::Error> {
        self.only_owner()?;

        if tokens.len() != price_feeds.len() {
            return Err(Error::ArrayLengthMismatch(ArrayLengthMismatch {
                tokens: U256::from(tokens.len()),
                price_feeds: U256::from(price_feeds.len()),
            }));
        }

        for (token, feed) in tokens.into_iter().zip(price_feeds) {
            self.erc20_price_feeds.setter(token).set(feed);
        }

        Ok(())
    }

    fn get_latest_price(&self, feed: Address) -> Result<I256, Vec<u8>> {
        let pricer = self.pricer()?;
        Ok(pricer.latest_price(self, feed)?)
    }

    #[payable]
    fn buy_coffee(
        &mut self,
        units: U256,
        message: String,
    ) -> Result<(), Vec<u8>> {
        if units.is_zero() {
            return Err(Error::ZeroUnits(ZeroUnits {}).into());
        }

        let pricer = self.pricer()?;
        let feed = self.native_price_feed.get();
        let required = pricer.quote(
            Call::new_in(self),
            feed,
            NATIVE_ASSET_DECIMALS,
            units,
        )?;

        let provided = msg::value();
        if provided < required {
            return Err(Error::InsufficientPayment(InsufficientPayment {
                provided,
                required,
            })
            .into());
        }

        self.native_pool.add_assign_checked(
            provided,
            "native pool should not exceed `U256::MAX`",
        );

        evm::log(CoffeeBought {
            buyer: msg::sender(),
            amount: provided,
            message,
        });

        Ok(())
    }

    #[selector(name = "buyCoffeeERC20")]
    fn buy_coffee_erc20(
        &mut self,
        token: Address,
        units: U256,
        message: String,
    ) -> Result<(), Vec<u8>> {
        if units.is_zero() {
            return Err(Error::ZeroUnits(ZeroUnits {}).into());
        }

        let feed = self.erc20_price_feeds.get(token);
        if feed.is_zero() {
            return Err(
                Error::UnsupportedToken(UnsupportedToken { token }).into()
            );
        }

        let pricer = self.pricer()?;
        let erc20 = Erc20Interface::new(token);
        let asset_decimals = erc20.decimals(Call::new_in(self))?;
        let required =
            pricer.quote(Call::new_in(self), feed, asset_decimals, units)?;

        let buyer = msg::sender();
        self.erc20_pools.setter(token).add_assign_checked(
            required,
            "token pool should not exceed `U256::MAX`",
        );

        self.pull_erc20(token, buyer, required)?;

        evm::log(CoffeeBoughtERC20 {
            token,
            buyer,
            amount: required,
            message,
        });

        Ok(())
    }

    fn withdraw_eth(&mut self, to: Address) -> Result<(), Self::Error> {
        self.only_owner()?;

        let amount = self.native_pool.get();
        self.native_pool.set(U256::ZERO);

        call(Call::new_in(self).value(amount), to, &[])
            .map_err(|_| Error::TransferFailed(TransferFailed {}))?;

        evm::log(EthWithdrawn { to, amount });

        Ok(())
    }

    fn withdraw_erc20(
        &mut self,
        token: Address,
        to: Address,
    ) -> Result<(), Self::Error> {
        self.only_owner()?;

        let amount = self.erc20_pools.get(token);
        self.erc20_pools.setter(token).set(U256::ZERO);

        self.transfer_erc20(token, to, amount)?;

        evm::log(Erc20Withdrawn { token, to, amount });

        Ok(())
    }
}

impl CoffeeShop {
    /// Checks that [`msg::sender`] is the upgrade admin.
    ///
    /// # Errors
    ///
    /// * [`Error::NotAdmin`] - If called by any account other than the admin.
    fn only_admin(&self) -> Result<(), Error> {
        let account = msg::sender();
        if self.admin.get() != account {
            return Err(Error::NotAdmin(NotAdmin { account }));
        }
        Ok(())
    }

    /// Checks that [`msg::sender`] is the business owner.
    ///
    /// # Errors
    ///
    /// * [`Error::NotOwner`] - If called by any account other than the owner.
    fn only_owner(&self) -> Result<(), Error> {
        let account = msg::sender();
        if self.owner.get() != account {
            return Err(Error::NotOwner(NotOwner { account }));
        }
        Ok(())
    }

    /// Returns the configured pricing strategy.
    ///
    /// # Errors
    ///
    /// * [`Error::NoImplementationSet`] - If no strategy is configured.
    fn pricer(&self) -> Result<CoffeePricerInterface, Error> {
        let implementation = self.implementation.get();
        if implementation.is_zero() {
            return Err(Error::NoImplementationSet(NoImplementationSet {}));
        }
        Ok(CoffeePricerInterface::new(implementation))
    }

    /// Pulls `value` of `token` from `from` into this contract, normalizing
    /// a revert or a `false` return to [`Error::TransferFailed`].
    fn pull_erc20(
        &mut self,
        token: Address,
        from: Address,
        value: U256,
    ) -> Result<(), Error> {
        let erc20 = Erc20Interface::new(token);
        let ok = erc20
            .transfer_from(
                Call::new_in(self),
                from,
                contract::address(),
                value,
            )
            .map_err(|_| Error::TransferFailed(TransferFailed {}))?;
        if !ok {
            return Err(Error::TransferFailed(TransferFailed {}));
        }
        Ok(())
    }

    /// Sends `value` of `token` to `to`, normalizing a revert or a `false`
    /// return to [`Error::TransferFailed`].
    fn transfer_erc20(
        &mut self,
        token: Address,
        to: Address,
        value: U256,
    ) -> Result<(), Error> {
        let erc20 = Erc20Interface::new(token);
        let ok = erc20
            .transfer(Call::new_in(self), to, value)
            .map_err(|_| Error::TransferFailed(TransferFailed {}))?;
        if !ok {
            return Err(Error::TransferFailed(TransferFailed {}));
        }
        Ok(())
    }
}
