pub mod task;

pub use task::{
    check_for_updates, initial_action, report, run_install, InstallOutcome, Stage, StageError,
};
