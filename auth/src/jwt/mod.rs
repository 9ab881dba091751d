pub mod claims;
pub mod codec;
pub mod errors;
pub mod pair;

pub use claims::Claims;
pub use claims::TokenKind;
pub use codec::TokenCodec;
pub use codec::TokenLifetimes;
pub use errors::LifetimeError;
pub use errors::TokenError;
pub use pair::TokenPair;
