pub mod account;
pub mod category;
pub mod object_id;
pub mod order;
pub mod product;

pub use account::*;
pub use category::*;
pub use object_id::*;
pub use order::*;
pub use product::*;
