//! Pipeline lifecycle integration tests.
//!
//! These tests drive discovery, planning and the pipeline processor together
//! with the mock converter:
//! - Split and combined planning over a realistic disc layout
//! - Per-unit outcomes (converted, skipped, failed)
//! - Temp file cleanup on every path

use std::path::PathBuf;

use tempfile::TempDir;

use dvd2mp4_core::{
    converter::ConverterError,
    discover_groups, plan_units,
    testing::{fixtures, MockConverter},
    FailurePolicy, OutputMode, PipelineProcessor, ProcessorConfig, UnitOutcome,
};

/// Input disc, temp and output folders for one test.
struct TestHarness {
    input_dir: TempDir,
    temp_dir: TempDir,
    output_dir: TempDir,
}

impl TestHarness {
    fn new() -> Self {
        let harness = Self {
            input_dir: TempDir::new().expect("Failed to create input dir"),
            temp_dir: TempDir::new().expect("Failed to create temp dir"),
            output_dir: TempDir::new().expect("Failed to create output dir"),
        };
        fixtures::sample_disc(harness.input_dir.path());
        harness
    }

    fn config(&self) -> ProcessorConfig {
        ProcessorConfig::default()
            .with_temp_dir(self.temp_dir.path().to_path_buf())
            .with_output_dir(self.output_dir.path().to_path_buf())
    }

    fn split_mode(&self) -> OutputMode {
        OutputMode::Split {
            output_dir: self.output_dir.path().to_path_buf(),
        }
    }

    fn output(&self, name: &str) -> PathBuf {
        self.output_dir.path().join(name)
    }

    fn assert_temp_empty(&self) {
        assert!(
            fixtures::dir_entries(self.temp_dir.path()).is_empty(),
            "temp dir not empty: {:?}",
            fixtures::dir_entries(self.temp_dir.path())
        );
    }
}

#[tokio::test]
async fn test_split_run_converts_every_title_set() {
    let harness = TestHarness::new();
    let groups = discover_groups(harness.input_dir.path()).await.unwrap();
    let units = plan_units(&groups, &harness.split_mode());

    let processor = PipelineProcessor::new(harness.config(), MockConverter::new());
    let report = processor.run(&units, None).await;

    assert!(report.is_success());
    assert_eq!(report.converted_count(), 2);
    assert_eq!(
        fixtures::dir_entries(harness.output_dir.path()),
        ["VTS_01.mp4", "VTS_02.mp4"]
    );
    // Mock output is the transcoder's input, so this is the concatenation
    assert_eq!(
        std::fs::read(harness.output("VTS_01.mp4")).unwrap(),
        b"title-menu-one-two"
    );
    assert_eq!(std::fs::read(harness.output("VTS_02.mp4")).unwrap(), b"extra");
    harness.assert_temp_empty();
}

#[tokio::test]
async fn test_combined_run_writes_single_file() {
    let harness = TestHarness::new();
    let groups = discover_groups(harness.input_dir.path()).await.unwrap();
    let mode = OutputMode::Combined {
        output_path: harness.output("Feature.mp4"),
    };
    let units = plan_units(&groups, &mode);
    assert_eq!(units.len(), 1);

    let processor = PipelineProcessor::new(harness.config(), MockConverter::new());
    let report = processor.run(&units, None).await;

    assert!(report.is_success());
    assert_eq!(
        fixtures::dir_entries(harness.output_dir.path()),
        ["Feature.mp4"]
    );
    assert_eq!(
        std::fs::read(harness.output("Feature.mp4")).unwrap(),
        b"title-menu-one-twoextra"
    );
    harness.assert_temp_empty();
}

#[tokio::test]
async fn test_mixed_outcomes_are_aggregated() {
    let harness = TestHarness::new();
    fixtures::write_vob_files(
        harness.input_dir.path(),
        &[("VTS_03_1.VOB", b"silent".as_slice())],
    );

    let groups = discover_groups(harness.input_dir.path()).await.unwrap();
    let units = plan_units(&groups, &harness.split_mode());
    assert_eq!(units.len(), 3);

    let converter = MockConverter::new();
    converter
        .fail_transcode(
            "VTS_01",
            ConverterError::transcode_failed("exit 1", Some("boom".to_string())),
        )
        .await;
    converter.set_audio_stream("VTS_03", None).await;

    let processor = PipelineProcessor::new(harness.config(), converter);
    let report = processor.run(&units, None).await;

    assert_eq!(report.failed_count(), 1);
    assert_eq!(report.converted_count(), 1);
    assert_eq!(report.skipped_count(), 1);
    assert!(!report.is_success());
    assert_eq!(report.units[2].outcome, UnitOutcome::SkippedNoAudio);
    assert_eq!(
        fixtures::dir_entries(harness.output_dir.path()),
        ["VTS_02.mp4"]
    );
    harness.assert_temp_empty();
}

#[tokio::test]
async fn test_abort_policy_leaves_later_units_untouched() {
    let harness = TestHarness::new();
    let groups = discover_groups(harness.input_dir.path()).await.unwrap();
    let units = plan_units(&groups, &harness.split_mode());

    let converter = MockConverter::new();
    converter
        .fail_transcode("VTS_01", ConverterError::transcode_failed("exit 1", None))
        .await;

    let processor = PipelineProcessor::new(
        harness.config().with_failure_policy(FailurePolicy::Abort),
        converter,
    );
    let report = processor.run(&units, None).await;

    assert!(report.aborted);
    assert_eq!(report.units.len(), 1);
    assert!(fixtures::dir_entries(harness.output_dir.path()).is_empty());
    harness.assert_temp_empty();
}

#[tokio::test]
async fn test_empty_disc_plans_nothing() {
    let input = TempDir::new().unwrap();
    fixtures::write_vob_files(input.path(), &[("VIDEO_TS.VOB", b"menu".as_slice())]);

    let groups = discover_groups(input.path()).await.unwrap();
    let units = plan_units(
        &groups,
        &OutputMode::Split {
            output_dir: PathBuf::from("."),
        },
    );

    assert!(groups.is_empty());
    assert!(units.is_empty());
}
