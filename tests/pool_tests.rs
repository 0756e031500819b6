#[cfg(test)]
mod tests {
    use batch_imaging::JobResult;
    use batch_imaging::pool::WorkerPool;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    type Job = Box<dyn FnOnce() -> JobResult + Send>;

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_join_preserves_submission_order() {
        let jobs: Vec<_> = (0..6u64)
            .map(|i| {
                move || {
                    std::thread::sleep(Duration::from_millis(30 - i * 5));
                    JobResult::ok(format!("job {i}"))
                }
            })
            .collect();

        let results = WorkerPool::new(3).submit_all(jobs).join().await;
        let messages: Vec<_> = results.iter().map(|r| r.message.as_str()).collect();
        assert_eq!(
            messages,
            vec!["job 0", "job 1", "job 2", "job 3", "job 4", "job 5"]
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_progress_reaches_total() {
        let jobs: Vec<Job> = vec![
            Box::new(|| JobResult::ok("a")),
            Box::new(|| JobResult::failed("b")),
            Box::new(|| JobResult::ok("c")),
        ];
        let handle = WorkerPool::new(2).submit_all(jobs);

        let mut ticks = 0;
        let progress = handle
            .poll_until_done(Duration::from_millis(5), |_| ticks += 1)
            .await;

        assert!(ticks >= 1);
        assert_eq!(progress.total, 3);
        assert_eq!(progress.completed, 2);
        assert_eq!(progress.failed, 1);
        assert!(handle.is_done());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_panicking_job_counts_as_failure() {
        let jobs: Vec<Job> = vec![
            Box::new(|| JobResult::ok("fine")),
            Box::new(|| -> JobResult { panic!("decoder exploded") }),
        ];
        let handle = WorkerPool::new(2).submit_all(jobs);
        let results = handle.join().await;

        assert!(results[0].success);
        assert!(!results[1].success);
        assert!(results[1].message.contains("panicked"));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrency_is_bounded() {
        let running = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        let jobs: Vec<_> = (0..8)
            .map(|_| {
                let running = Arc::clone(&running);
                let peak = Arc::clone(&peak);
                move || {
                    let now = running.fetch_add(1, Ordering::SeqCst) + 1;
                    peak.fetch_max(now, Ordering::SeqCst);
                    std::thread::sleep(Duration::from_millis(20));
                    running.fetch_sub(1, Ordering::SeqCst);
                    JobResult::ok("done")
                }
            })
            .collect();

        let handle = WorkerPool::new(2).submit_all(jobs);
        let progress = handle
            .poll_until_done(Duration::from_millis(5), |_| {})
            .await;

        assert_eq!(progress.completed, 8);
        assert!(peak.load(Ordering::SeqCst) <= 2);
        assert_eq!(handle.join().await.len(), 8);
    }
}
