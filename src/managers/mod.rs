// minibrowser state managers
// Managers handle stateful collections: the tab registry and the history ledger.

pub mod history_manager;
pub mod tab_manager;
