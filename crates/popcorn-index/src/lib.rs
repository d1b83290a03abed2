pub mod error;
pub mod omdb;
pub mod traits;

pub use error::IndexError;
pub use omdb::OmdbClient;
pub use traits::MovieIndex;
