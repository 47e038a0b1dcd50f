//! Unit tests for the install pipeline.

use super::*;
use crate::test_utils::{Method, StubClient, StubResponse, listing_html};
use rstest::{fixture, rstest};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

const BASE: &str = "http://repo.test/go-agent-release";
const BINARY: &[u8] = b"contrast-go binary";

fn artifact_url(platform: &str) -> String {
    format!("{BASE}/1.2.3/{platform}/contrast-go")
}

struct Workspace {
    _dir: TempDir,
    temp: Utf8PathBuf,
    destination: Utf8PathBuf,
}

impl Workspace {
    fn request(&self, os: &str, arch: &str) -> InstallRequest {
        InstallRequest::new(BASE, "1.2.3", Platform::new(os, arch), self.destination.clone())
            .with_temp_dir(self.temp.clone())
    }

    fn lookup(&self) -> impl Fn(&str) -> io::Result<PathBuf> {
        let destination = self.destination.clone().into_std_path_buf();
        move |_: &str| Ok(destination.clone())
    }
}

#[fixture]
fn workspace() -> Workspace {
    let dir = TempDir::new().expect("temp dir");
    let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 temp dir");
    let temp = root.join("tmp");
    fs::create_dir(&temp).expect("create temp dir");
    Workspace {
        _dir: dir,
        temp,
        destination: root.join("bin").join("contrast-go"),
    }
}

#[rstest]
fn install_places_verified_binary(workspace: Workspace) {
    let client =
        StubClient::new().route_both(&artifact_url("linux-amd64"), &StubResponse::artifact(BINARY));

    install_with(&workspace.request("linux", "amd64"), &client, &workspace.lookup())
        .expect("install succeeds");

    assert_eq!(fs::read(&workspace.destination).expect("read install"), BINARY);
    assert_eq!(
        fs::read_dir(&workspace.temp).expect("read temp dir").count(),
        0,
        "temp file is renamed away"
    );
}

#[rstest]
fn corrupted_download_is_never_installed(workspace: Workspace) {
    let url = artifact_url("linux-amd64");
    let client = StubClient::new()
        .route(Method::Head, url.clone(), StubResponse::artifact(BINARY))
        .route(Method::Get, url, StubResponse::artifact(b"corrupted"));

    let err = install_with(&workspace.request("linux", "amd64"), &client, &workspace.lookup())
        .expect_err("checksum mismatch");

    assert!(err.is_integrity_failure(), "unexpected error: {err:?}");
    assert!(!workspace.destination.exists());
}

#[rstest]
fn shadowed_install_keeps_destination(workspace: Workspace) {
    let client =
        StubClient::new().route_both(&artifact_url("linux-amd64"), &StubResponse::artifact(BINARY));
    let shadow = |_: &str| -> io::Result<PathBuf> { Ok(PathBuf::from("/usr/local/bin/contrast-go")) };

    let err = install_with(&workspace.request("linux", "amd64"), &client, &shadow)
        .expect_err("shadowed");

    let message = err.to_string();
    assert!(message.contains(workspace.destination.as_str()), "{message}");
    assert!(message.contains("shadowed in path by /usr/local/bin/contrast-go"), "{message}");
    assert!(workspace.destination.exists());
}

fn platform_listing() -> StubResponse {
    StubResponse::ok(listing_html(&["darwin-amd64/", "linux-amd64/", "linux-arm64/"]))
}

#[rstest]
fn darwin_arm64_falls_back_to_amd64(workspace: Workspace) {
    let client = StubClient::new()
        .route(Method::Get, format!("{BASE}/1.2.3"), platform_listing())
        .route_both(&artifact_url("darwin-amd64"), &StubResponse::artifact(BINARY));
    let mut stderr = Vec::new();

    let installed = install_for_host(
        &workspace.request("darwin", "arm64"),
        &client,
        &workspace.lookup(),
        &mut stderr,
    )
    .expect("fallback install succeeds");

    assert_eq!(installed, Platform::new("darwin", "amd64"));
    assert_eq!(fs::read(&workspace.destination).expect("read install"), BINARY);
    let notice = String::from_utf8(stderr).expect("utf-8 notice");
    assert!(notice.contains("darwin/arm64 is not a release target"), "{notice}");
}

#[rstest]
fn linux_arm64_never_falls_back(workspace: Workspace) {
    let client = StubClient::new()
        .route(Method::Get, format!("{BASE}/1.2.3"), platform_listing())
        .route_both(&artifact_url("linux-amd64"), &StubResponse::artifact(BINARY));
    let mut stderr = Vec::new();

    let err = install_for_host(
        &workspace.request("linux", "arm64"),
        &client,
        &workspace.lookup(),
        &mut stderr,
    )
    .expect_err("no fallback");

    assert!(err.is_bad_platform(), "unexpected error: {err:?}");
    assert!(stderr.is_empty());
    assert!(!workspace.destination.exists());
}

#[rstest]
fn darwin_arm64_bad_version_does_not_fall_back(workspace: Workspace) {
    let client = StubClient::new().route(
        Method::Get,
        BASE,
        StubResponse::ok(listing_html(&["1.0.0/", "latest/"])),
    );
    let mut stderr = Vec::new();

    let err = install_for_host(
        &workspace.request("darwin", "arm64"),
        &client,
        &workspace.lookup(),
        &mut stderr,
    )
    .expect_err("bad version");

    assert!(matches!(err, InstallError::BadVersion { .. }), "unexpected error: {err:?}");
    let heads = client
        .requests()
        .into_iter()
        .filter(|(method, _)| *method == Method::Head)
        .count();
    assert_eq!(heads, 1, "only the requested platform is tried");
}

#[rstest]
#[case::apple_silicon("darwin", "arm64", Some(Platform::new("darwin", "amd64")))]
#[case::intel_mac("darwin", "amd64", None)]
#[case::linux_arm("linux", "arm64", None)]
fn compatibility_fallback_is_darwin_arm64_only(
    #[case] os: &str,
    #[case] arch: &str,
    #[case] expected: Option<Platform>,
) {
    assert_eq!(Platform::new(os, arch).compatibility_fallback(), expected);
}

#[test]
fn request_location_uses_platform() {
    let request = InstallRequest::new(BASE, "latest", Platform::new("linux", "amd64"), "/bin/x");
    assert_eq!(
        request.location().artifact_url(),
        format!("{BASE}/latest/linux-amd64/contrast-go")
    );
    assert!(request.temp_dir.is_none());
}
