//! Progress protocol under real concurrency: many producer threads, one
//! consumer.

use std::thread;

use lio::domain::models::{ProgressKind, ProgressMessage};
use lio::services::{ProgressReporter, ProgressTracker};
use lio::DomainError;
use tokio::sync::mpsc;

#[test]
fn test_interleaved_producers_are_demultiplexed() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let iterations = [5usize, 0, 17, 3];

    let producers: Vec<_> = iterations
        .iter()
        .enumerate()
        .map(|(trial_id, &count)| {
            let mut reporter = ProgressReporter::new(trial_id, tx.clone());
            thread::spawn(move || {
                for i in 0..count {
                    reporter.iteration(100.0 - i as f64);
                }
                reporter.completion(1.0, 0.5, 2.5);
                reporter.finish();
            })
        })
        .collect();
    drop(tx);
    for producer in producers {
        producer.join().unwrap();
    }

    let mut tracker = ProgressTracker::new(iterations.len());
    let mut per_trial: Vec<Vec<ProgressKind>> = vec![Vec::new(); iterations.len()];
    while let Ok(message) = rx.try_recv() {
        tracker.accept(&message).unwrap();
        per_trial[message.trial_id].push(message.kind());
    }

    assert!(tracker.is_done());
    for (trial_id, kinds) in per_trial.iter().enumerate() {
        assert_eq!(kinds.len(), iterations[trial_id] + 2);
        assert_eq!(kinds[kinds.len() - 2], ProgressKind::Completion);
        assert_eq!(kinds.last(), Some(&ProgressKind::Sentinel));
        assert_eq!(tracker.trial(trial_id).unwrap().iterations, iterations[trial_id]);
    }
}

#[test]
fn test_panicking_producer_still_terminates_stream() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let reporter = ProgressReporter::new(0, tx);

    let outcome = thread::spawn(move || {
        reporter.iteration(3.0);
        panic!("benchmark singularity");
    })
    .join();
    assert!(outcome.is_err());

    let mut tracker = ProgressTracker::new(1);
    while let Ok(message) = rx.try_recv() {
        tracker.accept(&message).unwrap();
    }
    assert!(tracker.is_done());
    let trial = tracker.trial(0).unwrap();
    assert_eq!(trial.iterations, 1);
    assert!(trial.fine_fitness.is_none());
}

#[test]
fn test_tracker_reports_missing_trials() {
    let mut tracker = ProgressTracker::new(3);
    tracker.accept(&ProgressMessage::sentinel(2)).unwrap();

    assert_eq!(tracker.finished(), 1);
    assert_eq!(tracker.missing(), 2);
    assert!(matches!(
        tracker.accept(&ProgressMessage::completion(2, 1.0, 1.0, 1.0)),
        Err(DomainError::ProtocolViolation(_))
    ));
}
