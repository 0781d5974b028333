pub mod hash;
pub mod path;
pub mod token;
pub mod validation;
