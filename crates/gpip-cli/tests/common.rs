#![allow(dead_code)]

use std::io::{Cursor, Write};

use assert_cmd::{assert::Assert, cargo::cargo_bin_cmd, Command};
use serde_json::Value;
use zip::write::FileOptions;

/// Index URL nothing listens on; any request against it fails fast.
pub const UNREACHABLE_INDEX: &str = "http://127.0.0.1:9/pypi";

pub fn gpip() -> Command {
    let mut cmd = cargo_bin_cmd!("gpip");
    for key in [
        "GPIP_INDEX_URL",
        "GPIP_PYTHON",
        "GPIP_PATCH",
        "GPIP_KEEP_WORKDIR",
        "GPIP_HTTP_TIMEOUT",
        "GPIP_MAX_CAPTURE_BYTES",
        "RUST_LOG",
        "http_proxy",
        "HTTP_PROXY",
        "https_proxy",
        "HTTPS_PROXY",
        "all_proxy",
        "ALL_PROXY",
        "no_proxy",
        "NO_PROXY",
    ] {
        cmd.env_remove(key);
    }
    cmd.env("GPIP_INDEX_URL", UNREACHABLE_INDEX)
        .env("GPIP_HTTP_TIMEOUT", "5")
        .env("NO_COLOR", "1");
    cmd
}

pub fn parse_json(assert: &Assert) -> Value {
    serde_json::from_slice(&assert.get_output().stdout).expect("valid json")
}

pub fn stdout_of(assert: &Assert) -> String {
    String::from_utf8_lossy(&assert.get_output().stdout).into_owned()
}

pub fn stderr_of(assert: &Assert) -> String {
    String::from_utf8_lossy(&assert.get_output().stderr).into_owned()
}

/// Zip with a single `<root>/setup.py`.
pub fn sdist_zip(root: &str, setup_py: &str) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options = FileOptions::default();
    writer
        .add_directory(format!("{root}/"), options)
        .expect("add dir");
    writer
        .start_file(format!("{root}/setup.py"), options)
        .expect("start file");
    writer.write_all(setup_py.as_bytes()).expect("write setup.py");
    writer.finish().expect("finish zip").into_inner()
}

pub fn index_metadata(files: &[(&str, &str)]) -> Value {
    let urls = files
        .iter()
        .map(|(url, python_version)| {
            let filename = url.rsplit('/').next().unwrap_or(url);
            serde_json::json!({
                "url": url,
                "filename": filename,
                "python_version": python_version,
            })
        })
        .collect::<Vec<_>>();
    serde_json::json!({ "info": { "name": "demo" }, "urls": urls })
}
