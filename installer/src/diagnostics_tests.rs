//! Unit tests for missing-artifact diagnostics.

use super::*;
use crate::artefact::download::{ArtifactResponse, MockArtifactClient, TransportError};
use crate::test_utils::{Method, StubClient, StubResponse, listing_html};
use rstest::rstest;

const BASE: &str = "http://repo.test/go-agent-release";
const VERSION_URL: &str = "http://repo.test/go-agent-release/v";

fn location() -> ArtifactLocation<'static> {
    ArtifactLocation::new(BASE, "v", "os", "arch")
}

#[test]
fn missing_version_lists_root_versions() {
    let client = StubClient::new().route(
        Method::Get,
        BASE,
        StubResponse::ok(listing_html(&["0.1.2/", "1.2.3/", "latest/"])),
    );

    let err = not_found_error(&client, &location());

    assert!(
        matches!(&err, InstallError::BadVersion { requested, available }
            if requested == "v" && available.len() == 3),
        "unexpected error: {err:?}"
    );
    assert!(
        err.to_string()
            .contains("Available versions include\n\tlatest, 1.2.3, 0.1.2"),
        "unexpected message: {err}"
    );
    assert_eq!(
        client.requests(),
        [
            (Method::Get, VERSION_URL.to_owned()),
            (Method::Get, BASE.to_owned()),
        ]
    );
}

#[test]
fn existing_version_lists_platforms() {
    let client = StubClient::new().route(
        Method::Get,
        VERSION_URL,
        StubResponse::ok(listing_html(&[
            "darwin-amd64/",
            "linux-amd64/",
            "dependencies.csv",
        ])),
    );

    let err = not_found_error(&client, &location());

    match err {
        InstallError::BadPlatform {
            available,
            os,
            arch,
        } => {
            assert_eq!(available, ["darwin-amd64", "linux-amd64"]);
            assert_eq!((os.as_str(), arch.as_str()), ("os", "arch"));
        }
        other => panic!("expected BadPlatform, got {other:?}"),
    }
    assert_eq!(client.requests().len(), 1, "root must not be probed");
}

#[rstest]
#[case::single_platform(listing_html(&["linux-amd64/"]))]
#[case::no_platforms(listing_html(&["dependencies.csv"]))]
#[case::not_a_listing("plain text".to_owned())]
fn ambiguous_version_listing_is_unknown(#[case] body: String) {
    let client = StubClient::new().route(Method::Get, VERSION_URL, StubResponse::ok(body));

    let err = not_found_error(&client, &location());

    assert!(matches!(err, InstallError::Unknown), "unexpected error: {err:?}");
}

#[test]
fn unreadable_version_listing_is_unknown() {
    let client = StubClient::new().route(
        Method::Get,
        VERSION_URL,
        StubResponse::ok(vec![0xff, 0xfe, 0xfd]),
    );

    let err = not_found_error(&client, &location());

    assert!(matches!(err, InstallError::Unknown), "unexpected error: {err:?}");
}

#[rstest]
#[case::root_missing(StubResponse::status(404))]
#[case::root_error(StubResponse::status(503))]
#[case::root_unreachable(StubResponse::unreachable("connection reset"))]
#[case::root_not_utf8(StubResponse::ok(vec![0xff, 0xfe]))]
fn root_probe_failures_degrade_to_generic_message(#[case] root: StubResponse) {
    let client = StubClient::new().route(Method::Get, BASE, root);

    let err = not_found_error(&client, &location());

    assert!(
        matches!(&err, InstallError::VersionNotFound { requested } if requested == "v"),
        "unexpected error: {err:?}"
    );
}

#[test]
fn version_probe_transport_failure_stops_diagnostics() {
    let mut client = MockArtifactClient::new();
    client
        .expect_get()
        .withf(|url| url == VERSION_URL)
        .times(1)
        .returning(|url| {
            Err(TransportError {
                url: url.to_owned(),
                reason: "connection refused".to_owned(),
            })
        });
    client.expect_head().never();

    let err = not_found_error(&client, &location());

    assert!(
        matches!(err, InstallError::VersionNotFound { .. }),
        "unexpected error: {err:?}"
    );
}

#[test]
fn non_200_version_probe_checks_root_once() {
    let mut client = MockArtifactClient::new();
    client
        .expect_get()
        .withf(|url| url == VERSION_URL)
        .times(1)
        .returning(|_| Ok(ArtifactResponse::new(403, std::io::empty())));
    client
        .expect_get()
        .withf(|url| url == BASE)
        .times(1)
        .returning(|_| {
            Ok(ArtifactResponse::new(
                200,
                std::io::Cursor::new(listing_html(&["3.0.0/"])),
            ))
        });

    let err = not_found_error(&client, &location());

    assert!(
        matches!(err, InstallError::BadVersion { .. }),
        "unexpected error: {err:?}"
    );
}
