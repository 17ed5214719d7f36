//! Solidity interface of the ERC-20 standard, as consumed by the payment
//! paths of the coffee shop.
pub use token::*;

mod token {
    #![allow(missing_docs)]

    use alloc::vec;

    use stylus_sdk::prelude::sol_interface;
    sol_interface! {
        interface Erc20Interface {
            function totalSupply() external view returns (uint256);
            function balanceOf(address account) external view returns (uint256);
            function transfer(address to, uint256 value) external returns (bool);
            function allowance(address owner, address spender) external view returns (uint256);
            function approve(address spender, uint256 value) external returns (bool);
            function transferFrom(address from, address to, uint256 value) external returns (bool);
            function decimals() external view returns (uint8);
        }
    }
}
