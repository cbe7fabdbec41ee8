//! # CLI Command Implementations
//!
//! One file per subcommand of `addon-repo`. Each module contains:
//! - An `Args` struct deriving `clap::Args`.
//! - An `execute` function taking the parsed args and the global `--color`
//!   value, calling into the `addon_repo` library.

pub mod build;
pub mod validate;
