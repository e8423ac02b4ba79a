//! Command implementations.

pub mod evaluate;
pub mod extract;
pub mod resolve;
pub mod run;

pub use self::evaluate::execute_evaluate;
pub use self::extract::execute_extract;
pub use self::resolve::execute_resolve;
pub use self::run::execute_run;
