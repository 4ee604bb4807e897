use std::{
    io::{Read, Write},
    path::Path,
};

use anyhow::{anyhow, Context, Result};
use reqwest::blocking::Client;
use tempfile::NamedTempFile;
use tracing::debug;

/// Streams `url` into `dest`, returning the number of bytes written.
///
/// The body lands in a temporary file beside `dest` and is only moved into
/// place once complete, so a failed transfer never leaves a partial archive.
pub(crate) fn download_to(client: &Client, url: &str, dest: &Path) -> Result<u64> {
    let parent = dest
        .parent()
        .ok_or_else(|| anyhow!("{} has no parent directory", dest.display()))?;
    let mut response = client
        .get(url)
        .send()
        .with_context(|| format!("failed to fetch {url}"))?
        .error_for_status()
        .with_context(|| format!("unexpected response for {url}"))?;

    let mut tmp = NamedTempFile::new_in(parent)?;
    let mut written: u64 = 0;
    let mut buffer = [0u8; 64 * 1024];
    loop {
        let read = response
            .read(&mut buffer)
            .with_context(|| format!("stream error for {url}"))?;
        if read == 0 {
            break;
        }
        tmp.write_all(&buffer[..read])?;
        written += read as u64;
    }
    tmp.persist(dest)
        .map_err(|err| anyhow!("unable to persist download: {err}"))?;
    debug!(%url, bytes = written, dest = %dest.display(), "download complete");
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    use httptest::{matchers::*, responders::*, Expectation, Server};

    use crate::index::direct_client;

    #[test]
    fn writes_the_body_to_dest() -> Result<()> {
        let server = Server::run();
        server.expect(
            Expectation::matching(request::method_path("GET", "/files/demo-1.0.zip"))
                .respond_with(status_code(200).body("archive-bytes")),
        );
        let temp = tempfile::tempdir()?;
        let dest = temp.path().join("demo-1.0.zip");
        let client = direct_client();

        let written = download_to(&client, &server.url_str("/files/demo-1.0.zip"), &dest)?;
        assert_eq!(written, 13);
        assert_eq!(fs::read_to_string(&dest)?, "archive-bytes");
        Ok(())
    }

    #[test]
    fn http_errors_leave_nothing_behind() -> Result<()> {
        let server = Server::run();
        server.expect(
            Expectation::matching(request::method_path("GET", "/files/missing.zip"))
                .respond_with(status_code(404)),
        );
        let temp = tempfile::tempdir()?;
        let dest = temp.path().join("missing.zip");
        let client = direct_client();

        let err = download_to(&client, &server.url_str("/files/missing.zip"), &dest).unwrap_err();
        assert!(err.to_string().contains("unexpected response"));
        assert!(!dest.exists());
        assert_eq!(fs::read_dir(temp.path())?.count(), 0);
        Ok(())
    }
}
