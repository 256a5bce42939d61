use std::error::Error;
use std::fs;
use std::net::SocketAddr;
use std::path::Path;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

type TestResult = Result<(), Box<dyn Error>>;

async fn get(addr: SocketAddr, path: &str) -> Result<String, Box<dyn Error>> {
    let mut stream = TcpStream::connect(addr).await?;
    let request = format!(
        "GET {path} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n"
    );
    stream.write_all(request.as_bytes()).await?;

    let mut response = Vec::new();
    stream.read_to_end(&mut response).await?;
    Ok(String::from_utf8_lossy(&response).into_owned())
}

fn write_page(root: &Path, rel: &str, body: &str) -> TestResult {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().expect("parent"))?;
    fs::write(path, body)?;
    Ok(())
}

#[tokio::test]
async fn html_responses_carry_the_reload_listener() -> TestResult {
    let tmp = tempfile::tempdir()?;
    write_page(
        tmp.path(),
        "index.html",
        "<html><body><h1>hi</h1></body></html>",
    )?;

    let server = assetpipe::serve::start(
        tmp.path().to_path_buf(),
        "127.0.0.1:0".parse()?,
    )
    .await?;

    let response = get(server.addr(), "/").await?;
    assert!(response.starts_with("HTTP/1.1 200"));
    assert!(response.contains("text/html"));
    assert!(response.contains("new EventSource(\"/__reload\")"));
    // The listener lands inside the body, before the closing tag.
    let script = response.find("new EventSource").expect("snippet");
    let body_end = response.rfind("</body>").expect("body tag");
    assert!(script < body_end);
    Ok(())
}

#[tokio::test]
async fn non_html_assets_are_served_untouched() -> TestResult {
    let tmp = tempfile::tempdir()?;
    write_page(tmp.path(), "css/main.min.css", "body{color:red}")?;

    let server = assetpipe::serve::start(
        tmp.path().to_path_buf(),
        "127.0.0.1:0".parse()?,
    )
    .await?;

    let response = get(server.addr(), "/css/main.min.css").await?;
    assert!(response.starts_with("HTTP/1.1 200"));
    assert!(response.contains("text/css"));
    assert!(response.contains("body{color:red}"));
    assert!(!response.contains("EventSource"));
    Ok(())
}

#[tokio::test]
async fn missing_files_get_a_404() -> TestResult {
    let tmp = tempfile::tempdir()?;

    let server = assetpipe::serve::start(
        tmp.path().to_path_buf(),
        "127.0.0.1:0".parse()?,
    )
    .await?;

    let response = get(server.addr(), "/nope.js").await?;
    assert!(response.starts_with("HTTP/1.1 404"));
    Ok(())
}

#[tokio::test]
async fn path_traversal_is_rejected() -> TestResult {
    let tmp = tempfile::tempdir()?;
    fs::write(tmp.path().join("secret.txt"), "top secret")?;

    let public = tmp.path().join("public");
    fs::create_dir_all(&public)?;

    let server = assetpipe::serve::start(public, "127.0.0.1:0".parse()?).await?;

    let response = get(server.addr(), "/../secret.txt").await?;
    assert!(response.starts_with("HTTP/1.1 404"));
    Ok(())
}

#[tokio::test]
async fn disabled_reload_handle_is_a_no_op() {
    // `--once` runs hold a disabled handle; reload must not panic.
    assetpipe::serve::ReloadHandle::disabled().reload();
}
