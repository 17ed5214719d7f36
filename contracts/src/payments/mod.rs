//! Payment processing components.
//!
//! [`coffee_shop::CoffeeShop`] is the durable router that accepts purchases
//! and keeps the funds; [`pricer::CoffeePricer`] is the stateless,
//! hot-swappable strategy it consults for USD-to-asset conversion.
pub mod coffee_shop;
pub mod pricer;
