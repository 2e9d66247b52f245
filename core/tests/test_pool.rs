#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Barrier};
    use std::thread;
    use std::time::Duration;

    use mtc_core::pool::{PoolError, WorkerPool};
    use mtc_core::types::ErrorKind;
    use rand::Rng;

    #[test]
    fn zero_workers_rejected() {
        let err = WorkerPool::new(0).err().unwrap();
        assert_eq!(err.kind(), ErrorKind::Argument);
    }

    #[test]
    fn results_match_their_handles_under_random_delays() {
        let pool = WorkerPool::new(4).unwrap();
        let mut rng = rand::thread_rng();

        let handles: Vec<_> = (0..64u64)
            .map(|i| {
                let delay = rng.gen_range(0..5);
                pool.submit(move || {
                    thread::sleep(Duration::from_millis(delay));
                    i * i
                })
                .unwrap()
            })
            .collect();

        // Await newest first to prove handles are independent of order.
        for (i, h) in handles.into_iter().enumerate().rev() {
            assert_eq!(h.wait().unwrap(), (i as u64) * (i as u64));
        }
    }

    #[test]
    fn tasks_run_concurrently() {
        let pool = WorkerPool::new(3).unwrap();
        let barrier = Arc::new(Barrier::new(3));
        let handles: Vec<_> = (0..3)
            .map(|_| {
                let b = barrier.clone();
                pool.submit(move || {
                    b.wait();
                })
                .unwrap()
            })
            .collect();
        for h in handles {
            h.wait().unwrap();
        }
    }

    #[test]
    fn task_error_is_delivered_through_handle() {
        let pool = WorkerPool::new(2).unwrap();
        let bad = pool.submit(|| -> Result<u8, String> { Err("no good".into()) }).unwrap();
        let good = pool.submit(|| -> Result<u8, String> { Ok(1) }).unwrap();
        assert_eq!(bad.wait().unwrap(), Err("no good".to_string()));
        assert_eq!(good.wait().unwrap(), Ok(1));
    }

    #[test]
    fn panic_is_isolated_to_its_task() {
        let pool = WorkerPool::new(1).unwrap();
        let boom = pool.submit(|| -> u32 { panic!("kaboom") }).unwrap();
        let after = pool.submit(|| 7u32).unwrap();

        match boom.wait() {
            Err(PoolError::TaskPanicked(msg)) => assert!(msg.contains("kaboom")),
            other => panic!("expected panic error, got {other:?}"),
        }
        // The single worker survived and kept serving.
        assert_eq!(after.wait().unwrap(), 7);
    }

    #[test]
    fn shutdown_drains_queue_then_rejects() {
        let mut pool = WorkerPool::new(2).unwrap();
        let ran = Arc::new(AtomicUsize::new(0));
        let handles: Vec<_> = (0..20)
            .map(|_| {
                let ran = ran.clone();
                pool.submit(move || {
                    thread::sleep(Duration::from_millis(1));
                    ran.fetch_add(1, Ordering::SeqCst);
                })
                .unwrap()
            })
            .collect();

        pool.shutdown();
        assert_eq!(ran.load(Ordering::SeqCst), 20);
        for h in handles {
            assert!(h.wait().is_ok());
        }

        let err = pool.submit(|| ()).err().unwrap();
        assert_eq!(err, PoolError::ShutDown);
        pool.shutdown();
    }

    #[test]
    fn try_wait_polls_without_blocking() {
        let pool = WorkerPool::new(1).unwrap();
        let gate = Arc::new(Barrier::new(2));
        let g = gate.clone();
        let h = pool.submit(move || {
            g.wait();
            5
        })
        .unwrap();

        assert!(h.try_wait().is_none());
        gate.wait();

        let res = loop {
            if let Some(r) = h.try_wait() {
                break r;
            }
            thread::yield_now();
        };
        assert_eq!(res, Ok(5));
    }
}
