//! Tests for the concurrent batch runner.

mod common;

use colorquant::error::ProcessError;
use colorquant::services::{output_file_name, resolve_output_dir, BatchRunner, Job};
use colorquant_core::{Color, KernelTable, QuantizeError, QuantizeOptions};
use common::fixtures::{self, palettes};
use pretty_assertions::assert_eq;
use std::path::Path;
use std::sync::Arc;

fn jobs_for(inputs: &[std::path::PathBuf], out_dir: &Path, kernel: Option<&str>) -> Vec<Job> {
    inputs
        .iter()
        .map(|input| Job {
            input: input.clone(),
            output: out_dir.join(output_file_name(input, kernel, "png", inputs.len() > 1)),
        })
        .collect()
}

#[tokio::test]
async fn test_batch_processes_every_image() {
    let dir = tempfile::tempdir().unwrap();
    let inputs: Vec<_> = (0..5)
        .map(|i| fixtures::write_gradient(dir.path(), &format!("img{i}.png"), 12 + i, 9))
        .collect();
    let out_dir = dir.path().join("output");
    let jobs = jobs_for(&inputs, &out_dir, Some("Sierra-2"));

    let runner = BatchRunner::new(
        Arc::new(KernelTable::builtin()),
        fixtures::png_settings(palettes::primaries(), QuantizeOptions::new().kernel("Sierra-2")),
        2,
    );
    let outcomes = runner.run(jobs.clone()).await;

    assert_eq!(outcomes.len(), 5);
    for (i, (outcome, job)) in outcomes.iter().zip(&jobs).enumerate() {
        assert_eq!(&outcome.job, job, "outcomes must keep input order");
        assert!(outcome.result.is_ok(), "job {i} failed: {:?}", outcome.result);

        let pixels = common::assert_indexed_png(&job.output);
        common::assert_dimensions(&pixels, 12 + i as u32, 9);
        common::assert_only_palette_colors(&pixels, &palettes::primaries());
    }
    assert!(out_dir.join("img3-Sierra-2.png").exists());
}

#[tokio::test]
async fn test_failed_job_does_not_stop_others() {
    let dir = tempfile::tempdir().unwrap();
    let inputs = vec![
        fixtures::write_solid(dir.path(), "white.png", 4, 4, Color::WHITE),
        fixtures::write_garbage(dir.path(), "broken.png"),
        fixtures::write_solid(dir.path(), "black.png", 4, 4, Color::BLACK),
    ];
    let out_dir = dir.path().join("output");
    let jobs = jobs_for(&inputs, &out_dir, None);

    let runner = BatchRunner::new(
        Arc::new(KernelTable::builtin()),
        fixtures::png_settings(palettes::black_white(), QuantizeOptions::new().dither(false)),
        3,
    );
    let outcomes = runner.run(jobs).await;

    assert!(outcomes[0].result.is_ok());
    assert!(matches!(outcomes[1].result, Err(ProcessError::ImageDecode(_))));
    assert!(outcomes[2].result.is_ok());

    let white = common::assert_indexed_png(&out_dir.join("white-output.png"));
    assert!(white.pixels().all(|p| p.0 == [255, 255, 255, 255]));
    let black = common::assert_indexed_png(&out_dir.join("black-output.png"));
    assert!(black.pixels().all(|p| p.0 == [0, 0, 0, 255]));
    assert!(!out_dir.join("broken-output.png").exists());
}

#[tokio::test]
async fn test_cancel_before_run_fails_every_job() {
    let dir = tempfile::tempdir().unwrap();
    let inputs: Vec<_> = (0..3)
        .map(|i| fixtures::write_gradient(dir.path(), &format!("img{i}.png"), 8, 8))
        .collect();
    let jobs = jobs_for(&inputs, &dir.path().join("output"), Some("FloydSteinberg"));

    let runner = BatchRunner::new(
        Arc::new(KernelTable::builtin()),
        fixtures::png_settings(palettes::black_white(), QuantizeOptions::new()),
        1,
    );
    runner.cancel_token().cancel();
    let outcomes = runner.run(jobs).await;

    for outcome in outcomes {
        assert!(matches!(
            outcome.result,
            Err(ProcessError::Quantize(QuantizeError::Canceled))
        ));
        assert!(!outcome.job.output.exists());
    }
}

#[tokio::test]
async fn test_extra_kernel_from_table() {
    let dir = tempfile::tempdir().unwrap();
    let input = fixtures::write_gradient(dir.path(), "ramp.png", 10, 4);
    let mut table = KernelTable::builtin();
    table.register("Right", &[[0.0f32, 1.0]]).unwrap();

    let out_dir = resolve_output_dir(dir.path(), Path::new("inputs/ramp.png"), Path::new("results"));
    assert_eq!(out_dir, dir.path().join("results"));
    let jobs = jobs_for(std::slice::from_ref(&input), &out_dir, Some("Right"));

    let runner = BatchRunner::new(
        Arc::new(table),
        fixtures::png_settings(palettes::black_white(), QuantizeOptions::new().kernel("Right")),
        1,
    );
    let outcomes = runner.run(jobs).await;

    assert!(outcomes[0].result.is_ok(), "{:?}", outcomes[0].result);
    let pixels = common::assert_indexed_png(&out_dir.join("Right.png"));
    common::assert_only_palette_colors(&pixels, &palettes::black_white());
}

#[tokio::test]
async fn test_cancel_signal_stops_batch() {
    let dir = tempfile::tempdir().unwrap();
    let inputs: Vec<_> = (0..3)
        .map(|i| fixtures::write_gradient(dir.path(), &format!("img{i}.png"), 8, 8))
        .collect();
    let jobs = jobs_for(&inputs, &dir.path().join("output"), Some("Atkinson"));

    let runner = BatchRunner::new(
        Arc::new(KernelTable::builtin()),
        fixtures::png_settings(palettes::black_white(), QuantizeOptions::new().kernel("Atkinson")),
        1,
    );
    let token = runner.cancel_token();
    let (tx, rx) = tokio::sync::oneshot::channel::<()>();
    let watcher = runner.cancel_on(rx);

    tx.send(()).unwrap();
    watcher.await.unwrap();
    assert!(token.is_canceled());

    let outcomes = runner.run(jobs).await;
    assert!(outcomes.iter().all(|o| matches!(
        o.result,
        Err(ProcessError::Quantize(QuantizeError::Canceled))
    )));
}

#[tokio::test]
async fn test_failed_cancel_signal_leaves_batch_running() {
    let runner = BatchRunner::new(
        Arc::new(KernelTable::builtin()),
        fixtures::png_settings(palettes::black_white(), QuantizeOptions::new()),
        1,
    );
    let (tx, rx) = tokio::sync::oneshot::channel::<()>();
    drop(tx);

    runner.cancel_on(rx).await.unwrap();
    assert!(!runner.cancel_token().is_canceled());
}
