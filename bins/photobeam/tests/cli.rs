//! Command-line behaviour of the `photobeam` binary.

use assert_cmd::Command;
use image::{DynamicImage, ImageBuffer, ImageOutputFormat, Rgb};
use predicates::prelude::*;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Command isolated from the user's config and environment.
fn photobeam(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("photobeam").unwrap();
    cmd.current_dir(home)
        .env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join(".config"))
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .env_remove("PHOTOBEAM_PROVIDER")
        .env_remove("PHOTOBEAM_ENDPOINT")
        .env_remove("PHOTOBEAM_TIMEOUT_SECS");
    cmd
}

fn jpeg_with_exif(dir: &Path, name: &str) -> PathBuf {
    let img = DynamicImage::ImageRgb8(ImageBuffer::from_fn(40, 30, |x, y| {
        Rgb([(x * 6) as u8, (y * 8) as u8, 64])
    }));
    let mut buffer = Cursor::new(Vec::new());
    img.write_to(&mut buffer, ImageOutputFormat::Jpeg(90)).unwrap();
    let plain = buffer.into_inner();

    let exif = b"Exif\0\0MM\0*\0\0\0\x08\0\0";
    let mut data = plain[..2].to_vec();
    data.extend_from_slice(&[0xFF, 0xE1]);
    data.extend_from_slice(&((exif.len() + 2) as u16).to_be_bytes());
    data.extend_from_slice(exif);
    data.extend_from_slice(&plain[2..]);

    let path = dir.join(name);
    std::fs::write(&path, data).unwrap();
    path
}

#[test]
fn help_lists_commands() {
    let home = TempDir::new().unwrap();
    photobeam(home.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("share"))
        .stdout(predicate::str::contains("sanitize"))
        .stdout(predicate::str::contains("inspect"));
}

#[test]
fn inspect_reports_exif() {
    let home = TempDir::new().unwrap();
    let photo = jpeg_with_exif(home.path(), "beach.jpg");

    photobeam(home.path())
        .args(["--format", "json", "inspect"])
        .arg(&photo)
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""hasExif": true"#))
        .stdout(predicate::str::contains(r#""width": 40"#))
        .stdout(predicate::str::contains(r#""height": 30"#));
}

#[test]
fn sanitize_writes_clean_copy() {
    let home = TempDir::new().unwrap();
    let photo = jpeg_with_exif(home.path(), "beach.jpg");

    photobeam(home.path())
        .arg("sanitize")
        .arg(&photo)
        .assert()
        .success()
        .stdout(predicate::str::contains("beach-clean.jpg"));

    let clean = std::fs::read(home.path().join("beach-clean.jpg")).unwrap();
    assert!(!photobeam_image::has_exif(&clean));
    assert_eq!(photobeam_image::dimensions(&clean).unwrap(), (40, 30));
}

#[test]
fn sanitize_rejects_unknown_data() {
    let home = TempDir::new().unwrap();
    let path = home.path().join("notes.jpg");
    std::fs::write(&path, "not an image at all").unwrap();

    photobeam(home.path())
        .arg("sanitize")
        .arg(&path)
        .assert()
        .code(4)
        .stderr(predicate::str::contains("E4001"));
}

#[test]
fn qr_saves_svg_into_directory() {
    let home = TempDir::new().unwrap();

    photobeam(home.path())
        .args(["qr", "https://host/abc123", "--output"])
        .arg(home.path())
        .assert()
        .success();

    let svg = std::fs::read_to_string(home.path().join("photobeam-qr.svg")).unwrap();
    assert!(svg.contains(r#"width="220" height="220""#));
}

#[test]
fn qr_json_names_media_type() {
    let home = TempDir::new().unwrap();

    photobeam(home.path())
        .args(["--format", "json", "qr", "https://host/abc123", "-o"])
        .arg(home.path())
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""mediaType": "image/svg+xml;charset=utf-8""#));
}

#[test]
fn qr_rejects_zero_size() {
    let home = TempDir::new().unwrap();
    photobeam(home.path())
        .args(["qr", "https://host/abc123", "--size", "0"])
        .assert()
        .code(2);
}

#[test]
fn zero_qr_size_in_config_fails() {
    let home = TempDir::new().unwrap();
    std::fs::write(home.path().join(".photobeam.toml"), "[qr]\nsize = 0\n").unwrap();

    photobeam(home.path())
        .arg("config")
        .assert()
        .code(3)
        .stderr(predicate::str::contains("qr.size"));
}

#[test]
fn qr_rejects_empty_link() {
    let home = TempDir::new().unwrap();
    photobeam(home.path()).args(["qr", ""]).assert().code(2);
}

#[test]
fn share_missing_file_fails() {
    let home = TempDir::new().unwrap();
    photobeam(home.path())
        .args(["share", "does-not-exist.jpg"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("E2001"));
}

#[test]
fn share_rejects_unknown_expiry() {
    let home = TempDir::new().unwrap();
    let photo = jpeg_with_exif(home.path(), "beach.jpg");

    photobeam(home.path())
        .args(["share", "--expires", "2d"])
        .arg(&photo)
        .assert()
        .failure()
        .stderr(predicate::str::contains("2d"));
}

#[test]
fn share_prints_link_as_json() {
    let home = TempDir::new().unwrap();
    let photo = jpeg_with_exif(home.path(), "beach.jpg");

    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/")
        .match_query(mockito::Matcher::AllOf(vec![
            mockito::Matcher::UrlEncoded("expires".into(), "1h".into()),
            mockito::Matcher::UrlEncoded("maxDownloads".into(), "20".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"success":true,"link":"https://host/abc123"}"#)
        .create();

    photobeam(home.path())
        .env("PHOTOBEAM_ENDPOINT", server.url())
        .args(["--format", "json", "share", "--expires", "1h", "--max-downloads", "20"])
        .arg(&photo)
        .arg("--qr-out")
        .arg(home.path())
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""link": "https://host/abc123""#))
        .stdout(predicate::str::contains(r#""stripped": true"#));

    mock.assert();
    assert!(home.path().join("photobeam-qr.svg").exists());
}

#[test]
fn share_without_link_exits_with_upload_error() {
    let home = TempDir::new().unwrap();
    let photo = jpeg_with_exif(home.path(), "beach.jpg");

    let mut server = mockito::Server::new();
    server
        .mock("POST", mockito::Matcher::Any)
        .with_status(200)
        .with_body(r#"{"success":true}"#)
        .create();

    photobeam(home.path())
        .args(["share", "--no-qr", "--endpoint"])
        .arg(server.url())
        .arg(&photo)
        .assert()
        .code(5)
        .stderr(predicate::str::contains("E5005"));
}

#[test]
fn config_file_is_honoured() {
    let home = TempDir::new().unwrap();
    std::fs::write(
        home.path().join(".photobeam.toml"),
        "[upload]\nprovider = \"tmpfiles\"\ntimeout_secs = 7\n",
    )
    .unwrap();

    photobeam(home.path())
        .args(["--format", "json", "config"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""provider": "tmpfiles""#))
        .stdout(predicate::str::contains(r#""timeout": 7"#));
}

#[test]
fn explicit_missing_config_fails() {
    let home = TempDir::new().unwrap();
    photobeam(home.path())
        .args(["--config", "nope.toml", "config"])
        .assert()
        .code(3);
}
