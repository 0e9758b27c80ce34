// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Docscan — multi-page document scanner
//
// Entry point. Initialises logging, reads the host request, runs the session
// with desktop file dialogs, and prints the payload as JSON on stdout.
//
//   docscan [--name NAME] [REQUEST_JSON | -]
//
// Without a request a camera-first `getPictures` session is started; `-`
// reads the request from stdin.

mod services;

use std::io::Read;
use std::process::ExitCode;
use std::sync::Arc;

use docscan_core::error::Result;
use docscan_document::ScratchDir;
use docscan_session::request::GetPicturesArgs;
use docscan_session::{MethodCall, ResultAssembler, ScanResponse};

use services::autopilot::{self, RunOptions};
use services::data_dir;
use services::desktop_bridge::DesktopBridge;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("Docscan starting");

    let response = match scan().await {
        Ok(response) => response,
        Err(err) => ResultAssembler::failure(&err),
    };
    match response.to_json() {
        Ok(json) => println!("{json}"),
        Err(err) => {
            tracing::error!(error = %err, "failed to encode response");
            return ExitCode::FAILURE;
        }
    }
    if response.is_failure() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

async fn scan() -> Result<ScanResponse> {
    let (call, options) = parse_args(std::env::args().skip(1))?;
    let config = data_dir::load_config()?;
    let store = ScratchDir::from_config(config.scratch_dir.as_deref())?;
    let bridge = Arc::new(DesktopBridge::new(store));
    Ok(autopilot::run(&call, &config, bridge, &options).await)
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<(MethodCall, RunOptions)> {
    let mut options = RunOptions::default();
    let mut request = None;
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--name" => options.name = args.next(),
            "-" => {
                let mut json = String::new();
                std::io::stdin().read_to_string(&mut json)?;
                request = Some(json);
            }
            _ => request = Some(arg),
        }
    }
    let call = match request {
        Some(json) => MethodCall::from_json(&json)?,
        None => MethodCall::GetPictures(GetPicturesArgs::default()),
    };
    Ok((call, options))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> impl Iterator<Item = String> {
        list.iter()
            .map(|arg| arg.to_string())
            .collect::<Vec<_>>()
            .into_iter()
    }

    #[test]
    fn no_arguments_starts_a_camera_session() {
        let (call, options) = parse_args(args(&[])).expect("parse");
        assert_eq!(call, MethodCall::GetPictures(GetPicturesArgs::default()));
        assert!(options.name.is_none());
    }

    #[test]
    fn name_and_request_are_read() {
        let (call, options) = parse_args(args(&[
            "--name",
            "Lease",
            r#"{"method":"selectDocuments","arguments":{"noOfPages":2}}"#,
        ]))
        .expect("parse");
        assert_eq!(options.name.as_deref(), Some("Lease"));
        assert!(matches!(call, MethodCall::SelectDocuments(select) if select.no_of_pages == 2));
    }

    #[test]
    fn malformed_request_is_an_error() {
        assert!(parse_args(args(&["{oops"])).is_err());
    }
}
