use clap::Parser;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use polyfs::{ExecutionSession, FileSystemOps, Language, PathClass, SessionOptions};

#[derive(Serialize)]
struct ModuleReport<'a> {
    path: &'a str,
    language: Option<String>,
    size: usize,
}

#[derive(Parser)]
#[command(name = "polyfs")]
#[command(about = "Resolve module imports through the virtual filesystem")]
#[command(version)]
struct Cli {
    /// Module specifier: a filesystem path, a URI, or a reserved-prefix path
    specifier: String,

    /// Print the routing decision instead of the module bytes
    #[arg(long = "classify")]
    classify: bool,

    /// Reserved virtual-path prefix
    #[arg(long = "prefix")]
    prefix: Option<String>,

    /// Output as JSON (path, kind, language, size)
    #[arg(long = "json")]
    json: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let session = ExecutionSession::new(SessionOptions {
        reserved_prefix: cli.prefix.clone(),
        ..Default::default()
    });

    if cli.classify {
        run_classify(&session, &cli);
        return;
    }

    let module = match session.load_module(&cli.specifier) {
        Ok(module) => module,
        Err(e) => {
            eprintln!("polyfs: {}: {}", cli.specifier, e);
            std::process::exit(1);
        }
    };

    if cli.json {
        let report = ModuleReport {
            path: &module.path,
            language: module.language.map(|l| l.to_string()),
            size: module.bytes.len(),
        };
        println!("{}", serde_json::to_string(&report).unwrap_or_default());
    } else {
        use std::io::Write;
        if std::io::stdout().write_all(&module.bytes).is_err() {
            std::process::exit(1);
        }
    }
}

fn run_classify(session: &ExecutionSession, cli: &Cli) {
    let fs = session.fs();
    let path = if cli.specifier.contains("://") {
        match fs.parse_path_from_uri(&cli.specifier) {
            Ok(p) => p,
            Err(e) => {
                eprintln!("polyfs: {}: {}", cli.specifier, e);
                std::process::exit(1);
            }
        }
    } else {
        fs.parse_path_from_string(&cli.specifier)
    };

    match fs.codec().classify(&path) {
        Ok(PathClass::Local(local)) => {
            if cli.json {
                println!(
                    "{}",
                    serde_json::json!({
                        "kind": "local",
                        "path": local,
                        "language": Language::from_path(&local).map(|l| l.to_string()),
                    })
                );
            } else {
                println!("local {}", local);
            }
        }
        Ok(PathClass::Remote(uri)) => {
            if cli.json {
                println!(
                    "{}",
                    serde_json::json!({
                        "kind": "remote",
                        "path": path,
                        "uri": uri.to_string(),
                        "language": Language::from_path(&path).map(|l| l.to_string()),
                    })
                );
            } else {
                println!("remote {} -> {}", path, uri);
            }
        }
        Err(e) => {
            eprintln!("polyfs: {}: {}", cli.specifier, e);
            std::process::exit(1);
        }
    }
}
