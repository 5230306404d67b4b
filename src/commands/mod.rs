pub mod config;
pub mod mesh;
pub mod net;
pub mod suma;

use crate::Context;
use crate::ui;

/// Print a success line unless `--quiet` was given. Returns whether it printed.
pub fn notify(ctx: &Context, msg: &str) -> bool {
    if ctx.quiet {
        return false;
    }
    ui::success(msg);
    true
}
