pub mod feature;
pub mod keyword;
pub mod search_result;

pub use feature::*;
pub use keyword::*;
pub use search_result::*;
