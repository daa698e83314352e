//! End-to-end tests of the `dvd2mp4` binary against fake ffmpeg/ffprobe scripts.

#![cfg(unix)]

mod common;

use predicates::prelude::*;
use serial_test::serial;

use common::{FakeTools, TestFixture};

fn sample_vobs(fixture: &TestFixture) {
    fixture.write_vobs(&[
        ("VTS_01_1.VOB", b"one-".as_slice()),
        ("VTS_01_2.VOB", b"two-".as_slice()),
        ("VTS_02_1.VOB", b"three".as_slice()),
        ("VTS_01_0.IFO", b"ifo".as_slice()),
    ]);
}

#[test]
#[serial]
fn test_split_creates_one_file_per_prefix() {
    let fixture = TestFixture::new(FakeTools::default());
    sample_vobs(&fixture);

    fixture
        .command()
        .arg("--split")
        .assert()
        .success()
        .stderr(predicate::str::contains("Done: 2 converted, 0 skipped, 0 failed"));

    assert_eq!(fixture.out_entries(), ["VTS_01.mp4", "VTS_02.mp4"]);
    assert_eq!(
        std::fs::read(fixture.out.join("VTS_01.mp4")).unwrap(),
        b"one-two-"
    );
    assert_eq!(std::fs::read(fixture.out.join("VTS_02.mp4")).unwrap(), b"three");
    assert!(fixture.temp_entries().is_empty());
}

#[test]
#[serial]
fn test_split_output_dir() {
    let fixture = TestFixture::new(FakeTools::default());
    sample_vobs(&fixture);
    let target = fixture.out.join("videos");

    fixture
        .command()
        .arg("-s")
        .arg("--output-dir")
        .arg(&target)
        .assert()
        .success();

    assert!(target.join("VTS_01.mp4").exists());
    assert!(target.join("VTS_02.mp4").exists());
}

#[test]
#[serial]
fn test_combined_default_name_and_order() {
    let fixture = TestFixture::new(FakeTools::default());
    sample_vobs(&fixture);

    fixture.command().assert().success();

    assert_eq!(fixture.out_entries(), ["MOVIE.mp4"]);
    assert_eq!(
        std::fs::read(fixture.out.join("MOVIE.mp4")).unwrap(),
        b"one-two-three"
    );
    assert_eq!(fixture.ffmpeg_calls().len(), 1);
    assert!(fixture.temp_entries().is_empty());
}

#[test]
#[serial]
fn test_combined_explicit_output() {
    let fixture = TestFixture::new(FakeTools::default());
    sample_vobs(&fixture);

    fixture
        .command()
        .arg("-o")
        .arg("feature.mp4")
        .assert()
        .success();

    assert_eq!(fixture.out_entries(), ["feature.mp4"]);
}

#[test]
#[serial]
fn test_transcode_uses_first_audio_stream_and_detected_aspect() {
    let fixture = TestFixture::new(FakeTools {
        audio_streams: "2\n3\n",
        aspect: "4:3",
        ..FakeTools::default()
    });
    sample_vobs(&fixture);

    fixture.command().arg("-s").assert().success();

    let calls = fixture.ffmpeg_calls();
    assert_eq!(calls.len(), 2);
    for call in &calls {
        assert!(call.contains("-map 0:v:0 -map 0:2"), "{call}");
        assert!(call.contains("-aspect 4:3"), "{call}");
        assert!(call.contains("-c:v libx264 -c:a aac"), "{call}");
    }
}

#[test]
#[serial]
fn test_aspect_override() {
    let fixture = TestFixture::new(FakeTools {
        aspect: "N/A",
        ..FakeTools::default()
    });
    sample_vobs(&fixture);

    fixture.command().arg("-a").arg("16:9").assert().success();

    let calls = fixture.ffmpeg_calls();
    assert!(calls[0].contains("-aspect 16:9"), "{}", calls[0]);
}

#[test]
#[serial]
fn test_unknown_aspect_is_omitted() {
    let fixture = TestFixture::new(FakeTools {
        aspect: "N/A",
        ..FakeTools::default()
    });
    sample_vobs(&fixture);

    fixture.command().assert().success();

    let calls = fixture.ffmpeg_calls();
    assert!(!calls[0].contains("-aspect"), "{}", calls[0]);
}

#[test]
#[serial]
fn test_split_ignores_output_file() {
    let fixture = TestFixture::new(FakeTools::default());
    sample_vobs(&fixture);

    fixture
        .command()
        .args(["-s", "-o", "feature.mp4"])
        .assert()
        .success()
        .stderr(predicate::str::contains("is ignored in split mode"));

    assert_eq!(fixture.out_entries(), ["VTS_01.mp4", "VTS_02.mp4"]);
}

#[test]
#[serial]
fn test_verbose_echoes_external_commands() {
    let fixture = TestFixture::new(FakeTools::default());
    sample_vobs(&fixture);
    let ffprobe_line = format!("▶ {} -v error -select_streams a", fixture.ffprobe.display());
    let ffmpeg_line = format!("▶ {} -y -i ", fixture.ffmpeg.display());

    fixture
        .command()
        .env_remove("RUST_LOG")
        .args(["-v", "-s"])
        .assert()
        .success()
        .stderr(predicate::str::contains(ffprobe_line))
        .stderr(predicate::str::contains(ffmpeg_line));
}

#[test]
#[serial]
fn test_commands_not_echoed_without_verbose() {
    let fixture = TestFixture::new(FakeTools::default());
    sample_vobs(&fixture);

    fixture
        .command()
        .env_remove("RUST_LOG")
        .arg("-s")
        .assert()
        .success()
        .stderr(predicate::str::contains("▶").not());
}

#[test]
#[serial]
fn test_empty_directory_is_not_an_error() {
    let fixture = TestFixture::new(FakeTools::default());
    fixture.write_vobs(&[("VIDEO_TS.VOB", b"menu".as_slice())]);

    fixture
        .command()
        .assert()
        .success()
        .stderr(predicate::str::contains("No VOB groups found"));

    assert!(fixture.out_entries().is_empty());
}

#[test]
#[serial]
fn test_missing_input_fails() {
    let fixture = TestFixture::new(FakeTools::default());
    std::fs::remove_dir(&fixture.input).unwrap();

    fixture
        .command()
        .assert()
        .code(1)
        .stderr(predicate::str::contains("not found"));
}

#[test]
#[serial]
fn test_transcode_failure_reports_stderr() {
    let fixture = TestFixture::new(FakeTools {
        fail_transcode: true,
        ..FakeTools::default()
    });
    sample_vobs(&fixture);

    fixture
        .command()
        .arg("-s")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("boom: encoder exploded"))
        .stderr(predicate::str::contains("0 converted, 0 skipped, 2 failed"));

    assert!(fixture.temp_entries().is_empty());
}

#[test]
#[serial]
fn test_fail_fast_stops_after_first_failure() {
    let fixture = TestFixture::new(FakeTools {
        fail_transcode: true,
        ..FakeTools::default()
    });
    sample_vobs(&fixture);

    fixture
        .command()
        .args(["-s", "--fail-fast"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Aborted: 0 converted, 0 skipped, 1 failed"));
}

#[test]
#[serial]
fn test_no_audio_is_skipped() {
    let fixture = TestFixture::new(FakeTools {
        audio_streams: "",
        ..FakeTools::default()
    });
    sample_vobs(&fixture);

    fixture
        .command()
        .arg("-s")
        .assert()
        .success()
        .stderr(predicate::str::contains("No audio streams found"));

    assert!(fixture.out_entries().is_empty());
    assert!(fixture.ffmpeg_calls().is_empty());
    assert!(fixture.temp_entries().is_empty());
}

#[test]
#[serial]
fn test_missing_ffmpeg_fails() {
    let fixture = TestFixture::new(FakeTools::default());
    sample_vobs(&fixture);

    fixture
        .command()
        .arg("--ffmpeg")
        .arg(fixture.out.join("no-such-ffmpeg"))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("FFmpeg not found"));

    assert!(fixture.out_entries().is_empty());
}

#[test]
#[serial]
fn test_config_file_is_applied() {
    let fixture = TestFixture::new(FakeTools::default());
    sample_vobs(&fixture);
    let config = fixture.input.with_file_name("dvd2mp4.toml");
    std::fs::write(
        &config,
        "[converter.encoding]\nvideo_codec = \"libx265\"\naudio_bitrate_kbps = 128\n",
    )
    .unwrap();

    fixture.command().arg("-c").arg(&config).assert().success();

    let calls = fixture.ffmpeg_calls();
    assert!(calls[0].contains("-c:v libx265"), "{}", calls[0]);
    assert!(calls[0].contains("-b:a 128k"), "{}", calls[0]);
}

#[test]
#[serial]
fn test_missing_config_file_fails() {
    let fixture = TestFixture::new(FakeTools::default());
    sample_vobs(&fixture);

    fixture
        .command()
        .arg("--config")
        .arg("/nonexistent/dvd2mp4.toml")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Configuration file not found"));
}

#[test]
#[serial]
fn test_invalid_aspect_argument_fails() {
    let fixture = TestFixture::new(FakeTools::default());

    fixture.command().args(["-a", "wide"]).assert().code(1);
}
