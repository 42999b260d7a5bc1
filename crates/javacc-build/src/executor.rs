//! Worker pool running generation requests concurrently.

use std::thread;

use crossbeam_channel::{Receiver, Sender, unbounded};

use crate::error::GenerateError;
use crate::generator::Generator;
use crate::runner::{self, GenerationOutcome, GenerationRequest};

pub type RunResult = Result<GenerationOutcome, GenerateError>;

struct Job {
    index: usize,
    request: GenerationRequest,
}

struct Done {
    index: usize,
    result: RunResult,
}

/// Number of workers used when the caller does not choose one.
pub fn default_parallelism() -> usize {
    thread::available_parallelism().map_or(1, |n| n.get())
}

/// Run every request on up to `workers` threads.
///
/// Results are returned in request order. A request's two stages always run
/// on the same worker, one after the other.
pub fn execute(
    requests: Vec<GenerationRequest>,
    generator: &dyn Generator,
    workers: usize,
) -> std::io::Result<Vec<RunResult>> {
    let total = requests.len();
    if total == 0 {
        return Ok(Vec::new());
    }
    let workers = workers.clamp(1, total);

    let (job_tx, job_rx) = unbounded::<Job>();
    let (done_tx, done_rx) = unbounded::<Done>();

    for (index, request) in requests.into_iter().enumerate() {
        // The receiver is alive until the scope below ends.
        let _ = job_tx.send(Job { index, request });
    }
    drop(job_tx);

    let mut results: Vec<Option<RunResult>> = (0..total).map(|_| None).collect();

    thread::scope(|scope| -> std::io::Result<()> {
        for i in 0..workers {
            let job_rx = job_rx.clone();
            let done_tx = done_tx.clone();
            thread::Builder::new()
                .name(format!("javacc-worker-{i}"))
                .spawn_scoped(scope, move || worker_loop(job_rx, done_tx, generator))?;
        }
        drop(done_tx);

        for done in done_rx.iter() {
            results[done.index] = Some(done.result);
        }
        Ok(())
    })?;

    Ok(results
        .into_iter()
        .map(|result| {
            result.unwrap_or_else(|| {
                Err(GenerateError::Io(std::io::Error::other(
                    "generation worker exited without a result",
                )))
            })
        })
        .collect())
}

fn worker_loop(job_rx: Receiver<Job>, done_tx: Sender<Done>, generator: &dyn Generator) {
    for job in job_rx {
        let _span = tracing::info_span!("unit", name = %job.request.name).entered();
        let result = runner::run(&job.request, generator);
        if done_tx
            .send(Done {
                index: job.index,
                result,
            })
            .is_err()
        {
            break;
        }
    }
}
