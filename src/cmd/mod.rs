//! CLI command implementations.
//!
//! | Module   | Commands handled                       |
//! |----------|----------------------------------------|
//! | `board`  | `Stages`, `Board`, `Move`, `Detail`    |
//! | `config` | `Config`                               |

pub mod board;
pub mod config;

pub use board::{cmd_board, cmd_detail, cmd_move, cmd_stages};
pub use config::cmd_config;
