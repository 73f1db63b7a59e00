use crate::codec::{decode_file, encode, EncodeOptions};
use crate::error::ProcessError;
use colorquant_core::{CancelToken, KernelTable, Palette, QuantizeOptions, Quantizer};
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;

/// One input file and where its result goes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    pub input: PathBuf,
    pub output: PathBuf,
}

/// Result of one job
#[derive(Debug)]
pub struct JobOutcome {
    pub job: Job,
    pub result: Result<(), ProcessError>,
}

/// Settings shared by every job of a batch
#[derive(Debug, Clone)]
pub struct BatchSettings {
    pub palette: Palette,
    pub quantize: QuantizeOptions,
    pub encode: EncodeOptions,
}

/// Decode, quantize, encode and write one file.
///
/// Runs synchronously; the batch runner calls it on the blocking pool.
pub fn process_file(
    job: &Job,
    kernels: &KernelTable,
    settings: &BatchSettings,
    cancel: Option<&CancelToken>,
) -> Result<(), ProcessError> {
    let source = decode_file(&job.input)?;
    let quantizer = Quantizer::new(kernels, settings.palette.clone());
    let quantized = quantizer.quantize_with(&source, &settings.quantize, cancel)?;
    let bytes = encode(&quantized, &settings.encode)?;
    write_output(&job.output, &bytes)
}

fn write_output(path: &Path, bytes: &[u8]) -> Result<(), ProcessError> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)?;
    }
    std::fs::write(path, bytes)?;
    Ok(())
}

/// Processes a batch of images on a bounded worker pool.
///
/// Each image is an independent pass on its own blocking worker; at most
/// `workers` run at once. The kernel table is shared read-only.
pub struct BatchRunner {
    kernels: Arc<KernelTable>,
    settings: Arc<BatchSettings>,
    workers: usize,
    cancel: CancelToken,
}

impl BatchRunner {
    pub fn new(kernels: Arc<KernelTable>, settings: BatchSettings, workers: usize) -> Self {
        Self {
            kernels,
            settings: Arc::new(settings),
            workers: workers.max(1),
            cancel: CancelToken::new(),
        }
    }

    /// Token that cancels every pass still running or queued
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Cancel the batch once `signal` resolves, e.g. `tokio::signal::ctrl_c()`.
    ///
    /// A signal that resolves to an error leaves the batch running.
    pub fn cancel_on<F, E>(&self, signal: F) -> JoinHandle<()>
    where
        F: Future<Output = Result<(), E>> + Send + 'static,
        E: std::fmt::Display + Send + 'static,
    {
        let cancel = self.cancel.clone();
        tokio::spawn(async move {
            match signal.await {
                Ok(()) => {
                    tracing::warn!("Interrupted, canceling remaining images");
                    cancel.cancel();
                }
                Err(e) => tracing::debug!(%e, "Cancel signal unavailable"),
            }
        })
    }

    /// Run all jobs and report outcomes in input order.
    ///
    /// A failed job does not stop the others.
    pub async fn run(&self, jobs: Vec<Job>) -> Vec<JobOutcome> {
        let semaphore = Arc::new(Semaphore::new(self.workers));
        let mut handles = Vec::with_capacity(jobs.len());

        tracing::debug!(jobs = jobs.len(), workers = self.workers, "Starting batch");

        for job in jobs {
            let semaphore = semaphore.clone();
            let kernels = self.kernels.clone();
            let settings = self.settings.clone();
            let cancel = self.cancel.clone();
            let task_job = job.clone();

            let handle = tokio::spawn(async move {
                let _permit = semaphore
                    .acquire_owned()
                    .await
                    .map_err(|e| ProcessError::Worker(e.to_string()))?;

                tokio::task::spawn_blocking(move || {
                    let start = Instant::now();
                    let result = process_file(&task_job, &kernels, &settings, Some(&cancel));
                    match &result {
                        Ok(()) => tracing::info!(
                            input = %task_job.input.display(),
                            output = %task_job.output.display(),
                            elapsed_ms = start.elapsed().as_millis() as u64,
                            "Quantized image"
                        ),
                        Err(e) => tracing::warn!(
                            input = %task_job.input.display(),
                            error = %e,
                            "Failed to quantize image"
                        ),
                    }
                    result
                })
                .await
                .map_err(|e| ProcessError::Worker(format!("Quantize task failed: {e}")))?
            });
            handles.push((job, handle));
        }

        let mut outcomes = Vec::with_capacity(handles.len());
        for (job, handle) in handles {
            let result = match handle.await {
                Ok(result) => result,
                Err(e) => Err(ProcessError::Worker(e.to_string())),
            };
            outcomes.push(JobOutcome { job, result });
        }
        outcomes
    }
}
