/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */
use std::path::PathBuf;
use std::process::ExitCode;

use aws_batch_transfer::error::Error;
use aws_batch_transfer::metrics::unit::parse_byte_count;
use aws_batch_transfer::operation::TransferOutput;
use aws_batch_transfer::types::{Direction, TransferJob};
use aws_batch_transfer::Client;
use aws_sdk_s3::error::DisplayErrorContext;
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[cfg(not(target_env = "msvc"))]
use jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

#[derive(Debug, Clone, clap::Parser)]
#[command(name = "transfer-runner")]
#[command(
    about = "Moves a generated payload to or from Amazon S3 or an FSx mount, logging throughput."
)]
struct Args {
    /// Bucket to transfer to or from
    #[arg(required = true)]
    bucket: String,

    /// Object key, also used as the file path below the FSx mount
    #[arg(required = true)]
    key: String,

    /// Transfer direction <upload | download | fsx-write | fsx-read>
    #[arg(default_value = "upload")]
    direction: Direction,

    /// Mount point of the FSx filesystem
    #[arg(long, env = "FSX_DIRECTORY")]
    fsx_directory: Option<PathBuf>,

    /// Size of the generated payload, e.g. `5MiB` or `3.5GiB`
    #[arg(long, env = "TRANSFER_PAYLOAD_SIZE", value_parser = parse_byte_count)]
    payload_size: Option<u64>,

    /// Seed for the payload generator
    #[arg(long, env = "TRANSFER_SEED")]
    seed: Option<u64>,

    /// Size of the random block the payload is built from, must be a power of two
    #[arg(long, env = "TRANSFER_BLOCK_SIZE")]
    block_size: Option<usize>,

    /// Number of bytes between progress log lines
    #[arg(long, env = "TRANSFER_REPORT_THRESHOLD", value_parser = parse_byte_count)]
    report_threshold: Option<u64>,

    /// Size of each read from the FSx mount
    #[arg(long, env = "TRANSFER_READ_BUFFER_SIZE")]
    read_buffer_size: Option<usize>,
}

async fn load_client(args: &Args) -> Client {
    let mut loader =
        aws_batch_transfer::from_env().object_store(args.direction.uses_object_store());
    if let Some(dir) = &args.fsx_directory {
        loader = loader.fsx_directory(dir);
    }
    if let Some(size) = args.payload_size {
        loader = loader.payload_size(size);
    }
    if let Some(seed) = args.seed {
        loader = loader.seed(seed);
    }
    if let Some(block_size) = args.block_size {
        loader = loader.block_size(block_size);
    }
    if let Some(threshold) = args.report_threshold {
        loader = loader.report_threshold(threshold);
    }
    if let Some(size) = args.read_buffer_size {
        loader = loader.read_buffer_size(size);
    }
    Client::new(loader.load().await)
}

fn install_panic_hook() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        tracing::error!("panic: {info}");
        default_hook(info);
    }));
}

/// Run `job`, logging the outcome
async fn run(client: &Client, job: &TransferJob) -> Result<TransferOutput, Error> {
    let result = client.run(job).await;
    match &result {
        Ok(output) => tracing::info!(
            direction = %output.direction(),
            location = output.target(),
            bytes = output.bytes_transferred(),
            sha256 = %output.sha256(),
            "transfer complete"
        ),
        Err(err) => tracing::error!("transfer failed: {}", DisplayErrorContext(err)),
    }
    result
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = Args::parse();
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
    install_panic_hook();

    let client = load_client(&args).await;
    let job = TransferJob::new(args.bucket, args.key, args.direction);
    match run(&client, &job).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(_) => ExitCode::FAILURE,
    }
}

#[cfg(test)]
mod tests {
    use aws_batch_transfer::error::ErrorKind;
    use aws_batch_transfer::store::InMemoryStore;
    use aws_batch_transfer::types::{Direction, TransferJob};
    use aws_batch_transfer::{Client, Config};
    use aws_smithy_runtime::test_util::capture_test_logs::capture_test_logs;
    use clap::Parser;

    use super::{run, Args};

    #[test]
    fn test_positional_args() {
        let args = Args::try_parse_from(["transfer-runner", "my-bucket", "data/key1"]).unwrap();
        assert_eq!("my-bucket", args.bucket);
        assert_eq!("data/key1", args.key);
        assert_eq!(Direction::Upload, args.direction);

        let args =
            Args::try_parse_from(["transfer-runner", "my-bucket", "missing/key", "download"])
                .unwrap();
        assert_eq!(Direction::Download, args.direction);

        let args = Args::try_parse_from(["transfer-runner", "b", "k", "FSX_READ"]).unwrap();
        assert_eq!(Direction::FsxRead, args.direction);
    }

    #[test]
    fn test_invalid_args() {
        assert!(Args::try_parse_from(["transfer-runner", "my-bucket"]).is_err());
        assert!(Args::try_parse_from(["transfer-runner", "b", "k", "sideways"]).is_err());
        assert!(
            Args::try_parse_from(["transfer-runner", "b", "k", "--payload-size", "12 parsecs"])
                .is_err()
        );
    }

    #[test]
    fn test_byte_count_flags() {
        let args = Args::try_parse_from([
            "transfer-runner",
            "b",
            "k",
            "--payload-size",
            "3.5GiB",
            "--report-threshold",
            "64MiB",
            "--seed",
            "42",
        ])
        .unwrap();
        assert_eq!(Some(3584 * 1024 * 1024), args.payload_size);
        assert_eq!(Some(64 * 1024 * 1024), args.report_threshold);
        assert_eq!(Some(42), args.seed);
    }

    #[tokio::test]
    async fn test_download_missing_key_fails() {
        let (_guard, rx) = capture_test_logs();
        let client = Client::new(Config::builder().store(InMemoryStore::new()).build());
        let job = TransferJob::new("my-bucket", "missing/key", Direction::Download);

        let err = run(&client, &job).await.unwrap_err();
        assert_eq!(&ErrorKind::NotFound, err.kind());
        let logs = rx.contents();
        assert!(logs.contains("transfer failed"), "{logs}");
    }
}
