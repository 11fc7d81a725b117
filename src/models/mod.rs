mod cart;
mod order;
mod product;

pub use cart::*;
pub use order::*;
pub use product::*;
