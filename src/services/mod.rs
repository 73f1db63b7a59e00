pub mod batch;
pub mod output;
pub mod progress;

pub use batch::{process_file, BatchRunner, BatchSettings, Job, JobOutcome};
pub use output::{output_file_name, resolve_output_dir};
pub use progress::ProgressTicker;
