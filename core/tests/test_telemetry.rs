#[cfg(test)]
mod telemetry_snapshot_tests {
    use std::time::Duration;

    use mtc_core::compression::EncodeStats;
    use mtc_core::telemetry::{Stage, StageTimes, TelemetryCounters, TelemetrySnapshot, TelemetryTimer};

    fn make_counters() -> TelemetryCounters {
        let mut c = TelemetryCounters::default();
        c.add_overhead(8);
        c.add_chunk(100, 40);
        c.add_overhead(16);
        c.add_chunk(60, 30);
        c.add_overhead(16);
        c.add_tokens(EncodeStats { literals: 50, matches: 5 });
        c
    }

    fn make_timer() -> TelemetryTimer {
        let mut timer = TelemetryTimer::new();
        std::thread::sleep(Duration::from_millis(20));
        timer.add_stage_time(Stage::Read, Duration::from_millis(5));
        timer.add_stage_time(Stage::Compress, Duration::from_millis(3));
        timer.add_stage_time(Stage::Compress, Duration::from_millis(4));
        timer.finish();
        timer
    }

    #[test]
    fn counters_accumulate() {
        let c = make_counters();
        assert_eq!(c.chunks, 2);
        assert_eq!(c.bytes_original, 160);
        assert_eq!(c.bytes_compressed, 70);
        assert_eq!(c.bytes_overhead, 40);
        assert_eq!(c.container_bytes(), 110);
    }

    #[test]
    fn merge_sums_fields() {
        let mut a = make_counters();
        let mut b = TelemetryCounters::default();
        b.add_size_mismatch();
        a += b;
        assert_eq!(a.size_mismatches, 1);
        assert_eq!(a.chunks, 2);
    }

    #[test]
    fn stage_times_accumulate() {
        let timer = make_timer();
        assert_eq!(timer.stage_times().get(Stage::Compress), Duration::from_millis(7));
        assert_eq!(timer.stage_times().get(Stage::Write), Duration::ZERO);
        assert_eq!(timer.stage_times().total(), Duration::from_millis(12));
        assert!(timer.elapsed() >= Duration::from_millis(20));
    }

    #[test]
    fn snapshot_ratio_and_throughput() {
        let snap = TelemetrySnapshot::from(&make_counters(), &make_timer(), 3);
        assert_eq!(snap.workers, 3);
        assert!((snap.compression_ratio - 110.0 / 160.0).abs() < 1e-9);
        assert!(snap.throughput_bytes_per_sec > 0.0);
        assert!(snap.has_all_stages(&[Stage::Read, Stage::Compress]));
        assert!(!snap.has_all_stages(&[Stage::Write]));
    }

    #[test]
    fn ratio_may_exceed_one() {
        let mut c = TelemetryCounters::default();
        c.add_overhead(24);
        c.add_chunk(1, 2);
        let snap = TelemetrySnapshot::from(&c, &TelemetryTimer::new(), 1);
        assert!((snap.compression_ratio - 26.0).abs() < 1e-9);
    }

    #[test]
    fn empty_run_has_zero_ratio() {
        let snap = TelemetrySnapshot::from(&TelemetryCounters::default(), &TelemetryTimer::new(), 1);
        assert_eq!(snap.compression_ratio, 0.0);
    }

    #[test]
    fn snapshot_serializes_to_json() {
        let snap = TelemetrySnapshot::from(&make_counters(), &make_timer(), 2);
        let json = snap.to_json().unwrap();
        let back: TelemetrySnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back.chunks, 2);
        assert_eq!(back.stage_times.get(Stage::Read), Duration::from_millis(5));
    }

    #[test]
    fn timer_closure_charges_stage() {
        let mut timer = TelemetryTimer::new();
        let v = timer.time(Stage::Write, || {
            std::thread::sleep(Duration::from_millis(2));
            42
        });
        assert_eq!(v, 42);
        assert!(timer.stage_times().get(Stage::Write) >= Duration::from_millis(2));
        let mut st = StageTimes::default();
        st.add(Stage::Read, Duration::from_millis(1));
        assert!(st.has_all(&[Stage::Read]));
    }
}
