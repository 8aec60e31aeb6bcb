pub mod eval;
pub mod parse;

use ce_engine::Engine;

use crate::format::diagnostic_line;

/// Print and clear the engine's diagnostics on stderr.
pub(crate) fn flush_diagnostics(engine: &Engine) {
    for d in engine.take_diagnostics() {
        eprintln!("{}", diagnostic_line(&d));
    }
}
