#![cfg_attr(not(any(test, feature = "export-abi")), no_main)]
extern crate alloc;

use buymeacoffee_stylus::payments::pricer::{CoffeePricer, ICoffeePricer};
use stylus_sdk::{
    alloy_primitives::{Address, I256, U256},
    prelude::*,
};

#[entrypoint]
#[storage]
struct CoffeePricerExample {
    coffee_pricer: CoffeePricer,
}

#[public]
#[implements(ICoffeePricer)]
impl CoffeePricerExample {}

#[public]
impl ICoffeePricer for CoffeePricerExample {
    fn quote(
        &self,
        feed: Address,
        asset_decimals: u8,
        units: U256,
    ) -> Result<U256, Vec<u8>> {
        self.coffee_pricer.quote(feed, asset_decimals, units)
    }

    fn latest_price(&self, feed: Address) -> Result<I256, Vec<u8>> {
        self.coffee_pricer.latest_price(feed)
    }
}
