//! End-to-end command runs against a mock server.
//!
//! Output is captured from the injected writers; colors are disabled.

use clap::Parser;
use htprobe::{run_command, Cli, ExitCode};
use httptest::{matchers::*, responders::*, Expectation, Server};
use tempfile::TempDir;

struct Captured {
    code: ExitCode,
    out: String,
    err: String,
}

async fn run(args: &[&str]) -> Captured {
    colored::control::set_override(false);
    htprobe::initialization::init_crypto_provider();
    let cli = Cli::try_parse_from(args).expect("arguments should parse");
    let mut out = Vec::new();
    let mut err = Vec::new();
    let code = run_command(&cli, &mut out, &mut err)
        .await
        .expect("run should not fail");
    Captured {
        code,
        out: String::from_utf8(out).unwrap(),
        err: String::from_utf8(err).unwrap(),
    }
}

fn redirecting_server() -> Server {
    let server = Server::run();
    server.expect(
        Expectation::matching(request::method_path("GET", "/start"))
            .times(..)
            .respond_with(status_code(301).append_header("Location", "/final")),
    );
    server.expect(
        Expectation::matching(request::method_path("GET", "/final"))
            .times(..)
            .respond_with(
                status_code(200)
                    .append_header("Server", "mock")
                    .append_header("Set-Cookie", "session=abc; Path=/")
                    .body("<h1>final</h1>"),
            ),
    );
    server
}

#[tokio::test]
async fn test_redirects_command_draws_chain() {
    let server = redirecting_server();
    let start = server.url_str("/start");

    let result = run(&["htprobe", "--ascii", "redirects", &start, "-S", "Server"]).await;

    assert_eq!(result.code, ExitCode::Ok);
    assert!(result.out.contains(&format!("URL: {start}  [GET]")));
    assert!(result.out.contains(&format!("+-- (301) ->  [GET] {}", server.url_str("/final"))));
    assert!(result.out.contains("`-- (200) ->  200 OK"));
    assert!(result.out.contains("Selected Headers:"));
    assert!(result.out.contains("* Server: mock"));
    assert!(result.err.is_empty());
}

#[tokio::test]
async fn test_headers_command_without_follow_shows_one_hop() {
    let server = redirecting_server();
    let start = server.url_str("/start");

    let result = run(&["htprobe", "--ascii", "headers", &start]).await;

    assert_eq!(result.code, ExitCode::Ok);
    assert!(result.out.contains(&format!("1:  URL: {start}  [GET] (301)")));
    assert!(!result.out.contains("2:  Redirect to:"));
}

#[tokio::test]
async fn test_content_command_writes_outfile() {
    let server = redirecting_server();
    let start = server.url_str("/start");
    let dir = TempDir::new().unwrap();
    let outfile = dir.path().join("content.txt");

    let result = run(&[
        "htprobe",
        "content",
        &start,
        "-f",
        "-o",
        outfile.to_str().unwrap(),
    ])
    .await;

    assert_eq!(result.code, ExitCode::Ok);
    let written = std::fs::read_to_string(&outfile).unwrap();
    assert!(written.contains("<h1>final</h1>"));
    assert!(!result.out.contains("<h1>final</h1>"));
}

#[tokio::test]
async fn test_cookies_command_saves_jar() {
    let server = redirecting_server();
    let start = server.url_str("/start");
    let dir = TempDir::new().unwrap();
    let cookie_file = dir.path().join("cookies.txt");

    let result = run(&[
        "htprobe",
        "-a",
        "cookies",
        &start,
        "-f",
        "-S",
        cookie_file.to_str().unwrap(),
    ])
    .await;

    assert_eq!(result.code, ExitCode::Ok);
    assert!(result.out.contains("Cookie Store Request Detected:"));
    assert!(result.out.contains("Done"));
    assert_eq!(std::fs::read_to_string(&cookie_file).unwrap(), "session=abc\n");
}

#[tokio::test]
async fn test_certificate_command_on_plain_http() {
    let server = redirecting_server();
    let target = server.url_str("/final");

    let result = run(&["htprobe", "certificate", &target]).await;

    assert_eq!(result.code, ExitCode::Ok);
    assert!(result.out.contains("Certificate(s):"));
    assert!(result.out.contains("(None)"));
}

#[tokio::test]
async fn test_failed_url_does_not_stop_the_run() {
    let server = redirecting_server();
    let target = server.url_str("/final");

    let result = run(&["htprobe", "headers", "http://127.0.0.1:9/", &target]).await;

    assert_eq!(result.code, ExitCode::Request);
    assert!(result.err.contains("*** Error: request to http://127.0.0.1:9/ failed"));
    assert!(result.out.contains("Server: mock"));
}
