/*!
# BuyMeACoffee Contracts for Stylus

A coffee-tipping contract suite written in Rust for
[Arbitrum Stylus](https://docs.arbitrum.io/stylus/stylus-gentle-introduction).
Supporters buy coffees priced at a fixed USD amount, paying in the chain's
native asset or in registered ERC-20 tokens; Chainlink-style price feeds
convert the USD price into the paying asset at purchase time.

The suite is split into two components so the pricing logic stays replaceable
behind a stable address:

- [`payments::coffee_shop::CoffeeShop`] - the router. It owns every durable
  piece of state (roles, feed registry, collected pools) and the public
  payment surface.
- [`payments::pricer::CoffeePricer`] - the strategy. A stateless quoting
  contract the router consults through a typed interface. The router's admin
  can point the router at a new strategy at any time without touching stored
  funds or configuration.

> This project has never been audited nor thoroughly reviewed for security
> vulnerabilities. Do not use in production.

## Usage

Add `buymeacoffee-stylus` to your `Cargo.toml`:

```toml
[dependencies]
buymeacoffee-stylus = "0.1.0"
```

Then wrap a component in your entrypoint contract:

```ignore
use buymeacoffee_stylus::payments::coffee_shop::{self, CoffeeShop, ICoffeeShop};

#[entrypoint]
#[storage]
struct MyCoffeeShop {
    shop: CoffeeShop,
}

#[public]
#[implements(ICoffeeShop<Error = coffee_shop::Error>)]
impl MyCoffeeShop {
    // ...
}
```
*/

#![allow(clippy::module_name_repetitions)]
#![cfg_attr(not(test), no_std)]
#![deny(rustdoc::broken_intra_doc_links)]
extern crate alloc;

pub mod payments;
pub mod token;
pub mod utils;
