//! Stateless coffee-pricing strategy.
//!
//! [`CoffeePricer`] converts "`units` coffees at [`COFFEE_PRICE_USD`] dollars
//! each" into an amount of the paying asset, quoting a Chainlink-style
//! aggregator for the asset's USD price. The component keeps no storage of
//! its own; a router contract stores this contract's address and may replace
//! it with a different deployment to change pricing behavior while funds and
//! configuration stay where they are.
//!
//! The conversion multiplies before it divides and floors the result, so a
//! buyer can be charged fractionally less than the theoretical USD price but
//! never more.

use alloc::vec::Vec;

use alloy_primitives::{uint, Address, I256, U256};
use chainlink::AggregatorInterface;
pub use sol::*;
use stylus_sdk::{call::MethodError, prelude::*};

mod sol {
    use alloy_sol_macro::sol;

    sol! {
        /// The price feed reported an answer that cannot price an asset
        /// (zero or negative).
        ///
        /// * `answer` - Raw answer reported by the feed.
        #[derive(Debug)]
        #[allow(missing_docs)]
        error InvalidPrice(int256 answer);
    }
}

mod chainlink {
    #![allow(missing_docs)]

    use alloc::vec;

    use stylus_sdk::prelude::sol_interface;
    sol_interface! {
        interface AggregatorInterface {
            function decimals() external view returns (uint8);
            function latestAnswer() external view returns (int256);
            function latestTimestamp() external view returns (uint256);
        }
    }
}

/// An error that occurred in the [`CoffeePricer`] contract.
#[derive(SolidityError, Debug)]
pub enum Error {
    /// The price feed reported a zero or negative answer.
    InvalidPrice(InvalidPrice),
}

impl MethodError for Error {
    fn encode(self) -> alloc::vec::Vec<u8> {
        self.into()
    }
}

/// USD price of a single coffee.
pub const COFFEE_PRICE_USD: U256 = uint!(5_U256);

/// State of a [`CoffeePricer`] contract. Deliberately empty: quoting is pure
/// computation over oracle reads, which is what makes the strategy safe to
/// swap out from under a router holding funds.
#[storage]
pub struct CoffeePricer {}

/// NOTE: Implementation of [`TopLevelStorage`] to be able use `&mut self` when
/// calling other contracts and not `&mut (impl TopLevelStorage +
/// BorrowMut<Self>)`. Should be fixed in the future by the Stylus team.
unsafe impl TopLevelStorage for CoffeePricer {}

/// Interface of a pricing strategy a coffee-shop router can be pointed at.
pub trait ICoffeePricer {
    /// Returns the amount of the paying asset required for `units` coffees,
    /// reading the current price and decimal scale from `feed`.
    ///
    /// # Arguments
    ///
    /// * `&self` - Read access to the contract's state.
    /// * `feed` - Aggregator pricing the paying asset in USD.
    /// * `asset_decimals` - Decimals of the paying asset (18 for the native
    ///   asset, the token's own value otherwise).
    /// * `units` - Number of coffees.
    ///
    /// # Errors
    ///
    /// * [`InvalidPrice`] - If the feed answers zero or a negative price.
    /// * The feed's own revert, relayed unmodified, if the oracle read fails.
    ///
    /// # Panics
    ///
    /// * If scaling `units` by the price and decimal factors exceeds
    ///   [`U256::MAX`].
    fn quote(
        &self,
        feed: Address,
        asset_decimals: u8,
        units: U256,
    ) -> Result<U256, Vec<u8>>;

    /// Returns the raw `latestAnswer` of `feed`, without validation.
    ///
    /// # Arguments
    ///
    /// * `&self` - Read access to the contract's state.
    /// * `feed` - Aggregator to consult.
    ///
    /// # Errors
    ///
    /// * The feed's own revert, relayed unmodified, if the oracle read fails.
    fn latest_price(&self, feed: Address) -> Result<I256, Vec<u8>>;
}

#[public]
#[implements(ICoffeePricer)]
impl CoffeePricer {}

#[public]
impl ICoffeePricer for CoffeePricer {
    fn quote(
        &self,
        feed: Address,
        asset_decimals: u8,
        units: U256,
    ) -> Result<U256, Vec<u8>> {
        self.quote(feed, asset_decimals, units)
    }

    fn latest_price(&self, feed: Address) -> Result<I256, Vec<u8>> {
        self.latest_price(feed)
    }
}

impl CoffeePricer {
    /// Returns the amount of the paying asset required for `units` coffees.
    ///
    /// See [`ICoffeePricer::quote`].
    pub fn quote(
        &self,
        feed: Address,
        asset_decimals: u8,
        units: U256,
    ) -> Result<U256, Vec<u8>> {
        let oracle = AggregatorInterface::new(feed);
        let answer = oracle.latest_answer(self)?;
        let feed_decimals = oracle.decimals(self)?;
        Ok(Self::convert(units, asset_decimals, feed_decimals, answer)?)
    }

    /// Returns the raw `latestAnswer` of `feed`.
    ///
    /// See [`ICoffeePricer::latest_price`].
    pub fn latest_price(&self, feed: Address) -> Result<I256, Vec<u8>> {
        Ok(AggregatorInterface::new(feed).latest_answer(self)?)
    }

    /// Converts `units` coffees into the paying asset's smallest denomination
    /// given the feed's `answer` scaled by `feed_decimals`.
    ///
    /// All multiplications happen before the single division; integer
    /// division truncates toward zero.
    ///
    /// # Errors
    ///
    /// * [`Error::InvalidPrice`] - If `answer` is zero or negative.
    ///
    /// # Panics
    ///
    /// * If the scaled total exceeds [`U256::MAX`].
    fn convert(
        units: U256,
        asset_decimals: u8,
        feed_decimals: u8,
        answer: I256,
    ) -> Result<U256, Error> {
        if answer <= I256::ZERO {
            return Err(InvalidPrice { answer }.into());
        }
        let price = answer.unsigned_abs();

        let scaled = units
            .checked_mul(COFFEE_PRICE_USD)
            .expect("should not exceed `U256::MAX` in `convert`")
            .checked_mul(pow10(asset_decimals))
            .expect("should not exceed `U256::MAX` in `convert`")
            .checked_mul(pow10(feed_decimals))
            .expect("should not exceed `U256::MAX` in `convert`");

        Ok(scaled / price)
    }
}

/// Returns `10^decimals`, panicking if it exceeds [`U256::MAX`].
fn pow10(decimals: u8) -> U256 {
    U256::from(10)
        .checked_pow(U256::from(decimals))
        .expect("should not exceed `U256::MAX` in `pow10`")
}

#[cfg(test)]
mod tests {
    use alloy_sol_types::SolError;
    use motsu::prelude::*;
    use stylus_sdk::{
        alloy_primitives::{Address, I256, U256},
        prelude::*,
        storage::{StorageI256, StorageU8},
    };

    use super::{CoffeePricer, ICoffeePricer, InvalidPrice, COFFEE_PRICE_USD};

    /// Feed answer meaning "$2000.00000000" on an 8-decimal aggregator.
    const ETH_USD_ANSWER: i64 = 200_000_000_000;

    #[storage]
    struct FeedMock {
        answer: StorageI256,
        decimals: StorageU8,
    }

    #[public]
    impl FeedMock {
        fn set_answer(&mut self, answer: I256) {
            self.answer.set(answer);
        }

        fn set_decimals(&mut self, decimals: u8) {
            self.decimals.set(stylus_sdk::alloy_primitives::U8::from(decimals));
        }

        fn decimals(&self) -> u8 {
            self.decimals.get().to::<u8>()
        }

        fn latest_answer(&self) -> I256 {
            self.answer.get()
        }

        fn latest_timestamp(&self) -> U256 {
            U256::ZERO
        }
    }

    unsafe impl TopLevelStorage for FeedMock {}

    fn set_feed(
        feed: &Contract<FeedMock>,
        owner: Address,
        answer: i64,
        decimals: u8,
    ) {
        feed.sender(owner).set_answer(I256::try_from(answer).unwrap());
        feed.sender(owner).set_decimals(decimals);
    }

    #[motsu::test]
    fn quotes_one_coffee_at_the_feed_price(
        pricer: Contract<CoffeePricer>,
        feed: Contract<FeedMock>,
        alice: Address,
    ) {
        set_feed(&feed, alice, ETH_USD_ANSWER, 8);

        let quoted = pricer
            .sender(alice)
            .quote(feed.address(), 18, U256::from(1))
            .motsu_unwrap();

        // $5 at $2000/ETH is 0.0025 ETH.
        assert_eq!(U256::from(2_500_000_000_000_000_u64), quoted);
    }

    #[motsu::test]
    fn scales_by_token_decimals(
        pricer: Contract<CoffeePricer>,
        feed: Contract<FeedMock>,
        alice: Address,
    ) {
        // A $1 stablecoin on an 8-decimal feed.
        set_feed(&feed, alice, 100_000_000, 8);

        let quoted = pricer
            .sender(alice)
            .quote(feed.address(), 18, U256::from(5))
            .motsu_unwrap();

        // 5 coffees at $5 in a $1 token with 18 decimals.
        assert_eq!(U256::from(25) * U256::from(10).pow(U256::from(18)), quoted);

        let six_decimals = pricer
            .sender(alice)
            .quote(feed.address(), 6, U256::from(5))
            .motsu_unwrap();

        assert_eq!(U256::from(25_000_000), six_decimals);
    }

    #[motsu::test]
    fn floors_toward_zero(
        pricer: Contract<CoffeePricer>,
        feed: Contract<FeedMock>,
        alice: Address,
    ) {
        // $3.00000000 per asset; one $5 coffee in a zero-decimal asset is
        // 1.66.. units, floored to 1.
        set_feed(&feed, alice, 300_000_000, 8);

        let quoted = pricer
            .sender(alice)
            .quote(feed.address(), 0, U256::from(1))
            .motsu_unwrap();

        assert_eq!(U256::from(1), quoted);
    }

    #[motsu::test]
    fn rejects_non_positive_answers(
        pricer: Contract<CoffeePricer>,
        feed: Contract<FeedMock>,
        alice: Address,
    ) {
        for answer in [0, -1] {
            set_feed(&feed, alice, answer, 8);

            let err = pricer
                .sender(alice)
                .quote(feed.address(), 18, U256::from(1))
                .motsu_unwrap_err();

            assert_eq!(
                InvalidPrice { answer: I256::try_from(answer).unwrap() }
                    .abi_encode(),
                err
            );
        }
    }

    #[motsu::test]
    fn reads_the_raw_answer(
        pricer: Contract<CoffeePricer>,
        feed: Contract<FeedMock>,
        alice: Address,
    ) {
        for answer in [ETH_USD_ANSWER, 0, -42] {
            feed.sender(alice).set_answer(I256::try_from(answer).unwrap());

            let latest = pricer
                .sender(alice)
                .latest_price(feed.address())
                .motsu_unwrap();

            assert_eq!(I256::try_from(answer).unwrap(), latest);
        }
    }

    mod convert {
        use proptest::prelude::*;

        use super::*;

        fn convert(
            units: u64,
            asset_decimals: u8,
            feed_decimals: u8,
            answer: i64,
        ) -> U256 {
            CoffeePricer::convert(
                U256::from(units),
                asset_decimals,
                feed_decimals,
                I256::try_from(answer).unwrap(),
            )
            .expect("answer should be positive")
        }

        proptest! {
            /// Flooring can only ever favor the buyer, and by less than one
            /// price unit.
            #[test]
            fn floors_within_one_price_unit(
                units in 1u64..=1_000_000,
                asset_decimals in 0u8..=18,
                feed_decimals in 0u8..=18,
                answer in 1i64..=i64::MAX,
            ) {
                let amount =
                    convert(units, asset_decimals, feed_decimals, answer);
                let price = U256::from(answer.unsigned_abs());
                let total = U256::from(units)
                    * COFFEE_PRICE_USD
                    * U256::from(10).pow(U256::from(asset_decimals))
                    * U256::from(10).pow(U256::from(feed_decimals));

                prop_assert!(amount * price <= total);
                prop_assert!(total < (amount + U256::from(1)) * price);
            }

            /// More coffees never cost less.
            #[test]
            fn is_monotone_in_units(
                units in 0u64..1_000_000,
                asset_decimals in 0u8..=18,
                feed_decimals in 0u8..=18,
                answer in 1i64..=i64::MAX,
            ) {
                let smaller =
                    convert(units, asset_decimals, feed_decimals, answer);
                let larger =
                    convert(units + 1, asset_decimals, feed_decimals, answer);
                prop_assert!(smaller <= larger);
            }
        }
    }
}
