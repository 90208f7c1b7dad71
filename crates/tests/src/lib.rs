//! # Integration Tests
//!
//! 集成测试与端到端测试。
//!
//! 负责：
//! - 配置 -> logger -> 输出文件 的端到端验证
//! - host 生命周期钩子序列 (无需真实 host)

#[cfg(test)]
mod e2e_tests {
    use std::fs;
    use std::path::Path;

    use config_loader::{ConfigFormat, ConfigLoader};
    use contracts::{
        CycleState, EgoState, NoTraffic, Orientation, SimState, TrackedObject, TrafficRegistry,
        Vector3,
    };
    use telemetry::rows::{ACCEL_LIMIT, OBJECT_HEADER, VEHICLE_HEADER};
    use telemetry::{PluginHooks, TelemetryLogger, WriteOutcome};
    use tempfile::tempdir;

    fn rows(path: &Path) -> Vec<Vec<String>> {
        fs::read_to_string(path)
            .unwrap()
            .lines()
            .skip(1)
            .map(|l| l.split(", ").map(str::to_string).collect())
            .collect()
    }

    fn cycle(time: f64, acceleration: Vector3, objects: Vec<TrackedObject>) -> CycleState {
        CycleState {
            time,
            state: SimState::Simulate,
            ego: EgoState {
                position: Vector3::new(time * 10.0, 0.0, 0.0),
                velocity: Vector3::new(10.0, 0.0, 0.0),
                acceleration,
                yaw_rate: 0.0,
                gear: 4,
            },
            objects,
            radars: Vec::new(),
        }
    }

    /// End-to-end: config -> start -> cycles -> stop, checking both tables
    #[test]
    fn test_e2e_configured_run() {
        let dir = tempdir().unwrap();
        let config = ConfigLoader::load_from_str(
            r#"
[output]
env_var = "ODOLOG_E2E_UNUSED"
run_subdir = "odo"
extension = "csv"
"#,
            ConfigFormat::Toml,
        )
        .unwrap();
        let mut logger = TelemetryLogger::from_config(&config).with_base_dir(dir.path());

        let mut traffic = TrafficRegistry::new();
        traffic.spawn(16_000_010, 2);

        let lead = TrackedObject {
            obj_id: 16_000_010,
            rel_position: Vector3::new(30.0, 0.0, 0.0),
            rel_velocity: Vector3::new(-2.0, 0.0, 0.0),
            orientation: Orientation::default(),
            height: 1.4,
            length: 4.6,
            width: 1.9,
        };
        let pedestrian = TrackedObject {
            obj_id: 900,
            ..Default::default()
        };

        logger.start().unwrap();
        let (car_path, obj_path) = logger
            .session_paths()
            .map(|(c, o)| (c.to_path_buf(), o.to_path_buf()))
            .unwrap();
        assert_eq!(car_path.parent().unwrap(), dir.path().join("odo"));
        assert_eq!(car_path.extension().unwrap(), "csv");

        let cycles = [
            cycle(0.01, Vector3::new(1.0, 0.0, 0.0), vec![lead]),
            cycle(0.02, Vector3::new(50.0, -0.5, -100.0), vec![lead, pedestrian]),
            cycle(0.03, Vector3::default(), vec![]),
        ];
        for c in &cycles {
            assert!(matches!(
                logger.write(c, &traffic),
                WriteOutcome::Written { .. }
            ));
        }
        let summary = logger.stop().unwrap();
        assert_eq!(summary.vehicle.rows, 3);
        assert_eq!(summary.objects.rows, 3);

        let car_text = fs::read_to_string(&car_path).unwrap();
        assert_eq!(car_text.lines().next(), Some(VEHICLE_HEADER));
        let car_rows = rows(&car_path);
        assert_eq!(car_rows.len(), 3);
        assert_eq!(car_rows[1][7], ACCEL_LIMIT.to_string());
        assert_eq!(car_rows[1][8], "-0.5");
        assert_eq!(car_rows[1][9], (-ACCEL_LIMIT).to_string());
        assert_eq!(car_rows[1][11], "4");

        let obj_text = fs::read_to_string(&obj_path).unwrap();
        assert_eq!(obj_text.lines().next(), Some(OBJECT_HEADER));
        let obj_rows = rows(&obj_path);
        assert_eq!(obj_rows.len(), 3);
        assert_eq!(obj_rows[0][0], "0.01");
        assert_eq!(&obj_rows[1][..3], &["0.02", "16000010", "2"]);
        assert_eq!(&obj_rows[2][..3], &["0.02", "900", "-1"]);
        assert_eq!(obj_rows[2].len(), 15);
    }

    /// Host lifecycle sequence: two runs, cleanup after the last end
    #[test]
    fn test_e2e_hook_sequence_two_runs() {
        let dir = tempdir().unwrap();
        let mut plugin = TelemetryLogger::default().with_base_dir(dir.path());

        for run in 0..2 {
            plugin.testrun_start_at_end().unwrap();
            plugin.calc(
                &CycleState {
                    state: SimState::Preprocessing,
                    time: 0.0,
                    ..Default::default()
                },
                &NoTraffic,
            );
            for i in 1..=5 {
                plugin.calc(&cycle(i as f64 * 0.01, Vector3::default(), vec![]), &NoTraffic);
            }
            let (car, _) = plugin
                .session_paths()
                .map(|(c, o)| (c.to_path_buf(), o.to_path_buf()))
                .unwrap();
            plugin.testrun_end_first();
            assert_eq!(rows(&car).len(), 5, "run {run}");
        }

        plugin.cleanup();
        plugin.cleanup();
        assert!(!plugin.is_open());
    }

    /// Calc outside a session never touches the filesystem
    #[test]
    fn test_e2e_calc_before_start_creates_nothing() {
        let dir = tempdir().unwrap();
        let base = dir.path().join("base");
        let mut plugin = TelemetryLogger::default().with_base_dir(&base);
        plugin.calc(&cycle(1.0, Vector3::default(), vec![]), &NoTraffic);
        plugin.testrun_end_first();
        plugin.cleanup();
        assert!(!base.exists());
    }

    #[cfg(feature = "detection-log")]
    #[test]
    fn test_e2e_detection_stream() {
        use contracts::{LoggerConfig, RadarDetection, RadarScan};
        use telemetry::detection::DETECTION_HEADER;

        let dir = tempdir().unwrap();
        let mut config = LoggerConfig::default();
        config.detection.enabled = true;
        let mut logger = TelemetryLogger::from_config(&config).with_base_dir(dir.path());
        logger.start().unwrap();

        let mut c = cycle(0.1, Vector3::default(), vec![]);
        c.radars = vec![RadarScan {
            time_fired: 0.1,
            detections: vec![RadarDetection::default(); 2],
        }];
        logger.write(&c, &NoTraffic);
        logger.write(&c, &NoTraffic);
        let summary = logger.stop().unwrap();

        let detections = summary.detections.unwrap();
        assert_eq!(detections.rows, 2);
        assert_eq!(detections.path, dir.path().join("RSI_Detections.txt"));
        let text = fs::read_to_string(detections.path).unwrap();
        assert_eq!(text.lines().next(), Some(DETECTION_HEADER));
    }
}
