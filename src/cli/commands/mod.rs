//! One module per subcommand; each exposes an `execute` function.

pub mod add;
pub mod audit_cmd;
pub mod change;
pub mod get;
pub mod import_cmd;
pub mod init;
pub mod list;
pub mod section;
