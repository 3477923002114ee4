use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use iowa::{AccessOptions, Content, Encoding, Iowa};
use serde_json::Value;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// iowa - read and write files with transparent JSON handling
#[derive(Parser, Debug)]
#[command(name = "iowa")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Resolve relative paths against this directory
    #[arg(long, global = true, env = "IOWA_ROOT", value_name = "DIR")]
    root: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Read a file, decoding JSON and creating it when missing
    Read {
        path: PathBuf,
        #[command(flatten)]
        options: OptionArgs,
    },
    /// Read a file as text, creating it when missing
    ReadText {
        path: PathBuf,
        #[command(flatten)]
        options: OptionArgs,
    },
    /// Copy a file's bytes to stdout
    ReadBinary { path: PathBuf },
    /// Write JSON to a file (stdin when DATA is omitted)
    Write {
        path: PathBuf,
        data: Option<String>,
        #[command(flatten)]
        options: OptionArgs,
    },
    /// Write text to a file (stdin when DATA is omitted)
    WriteText {
        path: PathBuf,
        data: Option<String>,
        #[command(flatten)]
        options: OptionArgs,
    },
    /// Write stdin to a file unchanged
    WriteBinary { path: PathBuf },
    /// Report whether a path exists
    Exists { path: PathBuf },
    /// Show metadata for a path
    Stat { path: PathBuf },
    /// Create a file from a seed unless it already exists
    Create {
        path: PathBuf,
        /// Initial content
        #[arg(long, default_value = "")]
        seed: String,
        /// Write the seed as text instead of JSON
        #[arg(long)]
        raw: bool,
    },
    /// List the paths that do not exist
    Missing {
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
    /// List the visible subdirectories of a directory
    Dirs { root: PathBuf },
}

#[derive(Args, Debug)]
struct OptionArgs {
    /// Treat content as text instead of JSON
    #[arg(long)]
    raw: bool,

    /// Fail instead of creating a missing file
    #[arg(long)]
    no_create: bool,

    /// Text encoding: utf8, latin1, base64 or hex
    #[arg(long)]
    encoding: Option<Encoding>,

    /// Content for missing or blank files
    #[arg(long)]
    seed: Option<String>,

    /// JSON file with default access options
    #[arg(long, value_name = "FILE")]
    options: Option<PathBuf>,
}

impl OptionArgs {
    /// Options from `--options`, overridden by the explicit flags.
    async fn load(self) -> Result<AccessOptions> {
        let base = match &self.options {
            Some(file) => Iowa::local()
                .read_json::<AccessOptions>(
                    file,
                    &AccessOptions::new().with_create_if_not_exists(false),
                )
                .await
                .with_context(|| format!("Failed to load options from {}", file.display()))?,
            None => AccessOptions::new(),
        };

        let flags = AccessOptions {
            json: self.raw.then_some(false),
            create_if_not_exists: self.no_create.then_some(false),
            encoding: self.encoding,
            seed: self.seed.map(Content::Text),
        };

        Ok(base.overlay(flags))
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    tracing::debug!("Arguments: {:?}", cli);

    let iowa = match &cli.root {
        Some(root) => Iowa::rooted(root),
        None => Iowa::local(),
    };

    if let Err(err) = run(&iowa, cli.command).await {
        eprintln!("error: {}", err);
        for cause in err.chain().skip(1) {
            eprintln!("  caused by: {}", cause);
        }
        process::exit(exit_code(&err));
    }
}

fn init_logging(verbose: bool) {
    use std::sync::Once;
    static INIT: Once = Once::new();

    INIT.call_once(|| {
        let mut filter = EnvFilter::from_default_env();

        if std::env::var("RUST_LOG").is_err() {
            let level = if verbose { "debug" } else { "warn" };
            for target in ["iowa", "iowa_storage"] {
                if let Ok(directive) = format!("{}={}", target, level).parse() {
                    filter = filter.add_directive(directive);
                }
            }
        }

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .init();
    });
}

fn exit_code(err: &anyhow::Error) -> i32 {
    let not_found = err
        .chain()
        .filter_map(|cause| cause.downcast_ref::<iowa::Error>())
        .any(|cause| cause.is_not_found());

    if not_found {
        2
    } else {
        1
    }
}

async fn run(iowa: &Iowa, command: Command) -> Result<()> {
    match command {
        Command::Read { path, options } => {
            let options = options.load().await?;
            print_content(&iowa.read_file(&path, &options).await?)
        }
        Command::ReadText { path, options } => {
            let options = options.load().await?;
            print_content(&iowa.read_text_file(&path, &options).await?)
        }
        Command::ReadBinary { path } => {
            let data = iowa.read_binary(&path).await?;
            let mut stdout = tokio::io::stdout();
            stdout.write_all(&data).await?;
            stdout.flush().await?;
            Ok(())
        }
        Command::Write {
            path,
            data,
            options,
        } => {
            let options = options.load().await?;
            let data = data_or_stdin(data).await?;
            print_content(&iowa.write_file(&path, data, &options).await?)
        }
        Command::WriteText {
            path,
            data,
            options,
        } => {
            let options = options.load().await?;
            let data = data_or_stdin(data).await?;
            print_content(&iowa.write_text_file(&path, data, &options).await?)
        }
        Command::WriteBinary { path } => {
            let mut data = Vec::new();
            tokio::io::stdin()
                .read_to_end(&mut data)
                .await
                .context("Failed to read stdin")?;
            let written = iowa.write_binary(&path, data).await?;
            tracing::info!("Wrote {} bytes to {}", written.len(), path.display());
            Ok(())
        }
        Command::Exists { path } => print_json(&iowa.exists(&path).await?),
        Command::Stat { path } => print_json(&iowa.stat(&path).await?),
        Command::Create { path, seed, raw } => {
            print_json(&iowa.create_if_not_exists(&path, seed, !raw).await?)
        }
        Command::Missing { paths } => print_json(&iowa.missing_files(&paths).await),
        Command::Dirs { root } => print_json(&iowa.directories(&root).await?),
    }
}

async fn data_or_stdin(data: Option<String>) -> Result<String> {
    if let Some(data) = data {
        return Ok(data);
    }

    let mut buffer = String::new();
    tokio::io::stdin()
        .read_to_string(&mut buffer)
        .await
        .context("Failed to read stdin")?;
    Ok(buffer)
}

fn print_content(content: &Content) -> Result<()> {
    match content {
        Content::Text(text) => {
            println!("{}", text);
            Ok(())
        }
        Content::Json(value) => print_value(value),
    }
}

fn print_value(value: &Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<()> {
    print_value(&serde_json::to_value(value)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use iowa::InMemoryStorage;
    use std::path::Path;

    #[test]
    fn parses_read_with_flags() {
        let cli = Cli::try_parse_from([
            "iowa",
            "--root",
            "/tmp/data",
            "read",
            "config.json",
            "--no-create",
            "--encoding",
            "latin1",
        ])
        .unwrap();

        assert_eq!(cli.root, Some(PathBuf::from("/tmp/data")));
        match cli.command {
            Command::Read { path, options } => {
                assert_eq!(path, Path::new("config.json"));
                assert!(options.no_create);
                assert!(!options.raw);
                assert_eq!(options.encoding, Some(Encoding::Latin1));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn rejects_unknown_encoding() {
        let result = Cli::try_parse_from(["iowa", "read", "a.json", "--encoding", "ebcdic"]);
        assert!(result.is_err());
    }

    #[test]
    fn missing_requires_paths() {
        assert!(Cli::try_parse_from(["iowa", "missing"]).is_err());
    }

    #[tokio::test]
    async fn flags_override_options_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("options.json");
        Iowa::local()
            .write_text_file(
                &file,
                r#"{"json": true, "encoding": "hex", "seed": "{}"}"#,
                &AccessOptions::new(),
            )
            .await
            .unwrap();

        let args = OptionArgs {
            raw: true,
            no_create: false,
            encoding: None,
            seed: Some("fallback".to_string()),
            options: Some(file),
        };
        let options = args.load().await.unwrap();

        assert_eq!(options.json, Some(false));
        assert_eq!(options.create_if_not_exists, None);
        assert_eq!(options.encoding, Some(Encoding::Hex));
        assert_eq!(options.seed, Some(Content::Text("fallback".to_string())));
    }

    #[tokio::test]
    async fn missing_options_file_is_reported() {
        let args = OptionArgs {
            raw: false,
            no_create: false,
            encoding: None,
            seed: None,
            options: Some(PathBuf::from("/nonexistent/iowa/options.json")),
        };

        let err = args.load().await.unwrap_err();
        assert!(err.to_string().contains("options.json"));
        assert_eq!(exit_code(&err), 2);
    }

    #[tokio::test]
    async fn exit_codes_follow_error_kind() {
        let iowa = Iowa::new(InMemoryStorage::new());

        let not_found = iowa.read_binary("absent.dat").await.unwrap_err();
        assert_eq!(exit_code(&anyhow::Error::new(not_found)), 2);

        let invalid = iowa.read_binary("").await.unwrap_err();
        assert_eq!(exit_code(&anyhow::Error::new(invalid)), 1);
    }
}
