#![cfg_attr(not(any(test, feature = "export-abi")), no_main)]
extern crate alloc;

use buymeacoffee_stylus::payments::coffee_shop::{
    self, CoffeeShop, ICoffeeShop,
};
use stylus_sdk::{
    alloy_primitives::{Address, I256, U256},
    prelude::*,
};

#[entrypoint]
#[storage]
struct CoffeeShopExample {
    coffee_shop: CoffeeShop,
}

#[public]
#[implements(ICoffeeShop<Error = coffee_shop::Error>)]
impl CoffeeShopExample {
    #[receive]
    fn receive(&mut self) -> Result<(), Vec<u8>> {
        self.coffee_shop.receive()
    }
}

#[public]
impl ICoffeeShop for CoffeeShopExample {
    type Error = coffee_shop::Error;

    fn init(&mut self, native_price_feed: Address) -> Result<(), Self::Error> {
        self.coffee_shop.init(native_price_feed)
    }

    fn set_implementation(
        &mut self,
        new_implementation: Address,
    ) -> Result<(), Self::Error> {
        self.coffee_shop.set_implementation(new_implementation)
    }

    fn get_implementation(&self) -> Address {
        self.coffee_shop.get_implementation()
    }

    fn owner(&self) -> Address {
        self.coffee_shop.owner()
    }

    fn get_price_feed(&self) -> Address {
        self.coffee_shop.get_price_feed()
    }

    fn erc20_price_feed(&self, token: Address) -> Address {
        self.coffee_shop.erc20_price_feed(token)
    }

    fn native_pool(&self) -> U256 {
        self.coffee_shop.native_pool()
    }

    fn erc20_pool(&self, token: Address) -> U256 {
        self.coffee_shop.erc20_pool(token)
    }

    #[selector(name = "setERC20Token")]
    fn set_erc20_token(
        &mut self,
        tokens: Vec<Address>,
        price_feeds: Vec<Address>,
    ) -> Result<(), Self::Error> {
        self.coffee_shop.set_erc20_token(tokens, price_feeds)
    }

    fn get_latest_price(&self, feed: Address) -> Result<I256, Vec<u8>> {
        self.coffee_shop.get_latest_price(feed)
    }

    #[payable]
    fn buy_coffee(
        &mut self,
        units: U256,
        message: String,
    ) -> Result<(), Vec<u8>> {
        self.coffee_shop.buy_coffee(units, message)
    }

    #[selector(name = "buyCoffeeERC20")]
    fn buy_coffee_erc20(
        &mut self,
        token: Address,
        units: U256,
        message: String,
    ) -> Result<(), Vec<u8>> {
        self.coffee_shop.buy_coffee_erc20(token, units, message)
    }

    fn withdraw_eth(&mut self, to: Address) -> Result<(), Self::Error> {
        self.coffee_shop.withdraw_eth(to)
    }

    fn withdraw_erc20(
        &mut self,
        token: Address,
        to: Address,
    ) -> Result<(), Self::Error> {
        self.coffee_shop.withdraw_erc20(token, to)
    }
}
