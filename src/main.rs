use anyhow::Result;
use clap::Parser;
use dbporter::cli::commands::generate::{GenerateCommand, GenerateCommandHandler};
use dbporter::cli::commands::resolve_type::{ResolveTypeCommand, ResolveTypeCommandHandler};
use dbporter::cli::{Cli, Commands};
use dbporter::core::config::DialectKind;
use dbporter::core::type_code::TypeSpecifiers;
use std::process;
use tracing_subscriber::EnvFilter;

fn main() {
    // CLIをパースして実行
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // sqlx::Any で使用するドライバーを登録
    sqlx::any::install_default_drivers();

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Error: Failed to create Tokio runtime: {}", e);
            process::exit(1);
        }
    };

    let result = runtime.block_on(run_command(cli));

    match result {
        Ok(output) => {
            if !output.is_empty() {
                println!("{}", output);
            }
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            process::exit(1);
        }
    }
}

/// ログ出力を初期化する
///
/// RUST_LOG が設定されていればそれに従い、なければ warn（--verbose 指定時は debug）。
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// コマンドを実行する
async fn run_command(cli: Cli) -> Result<String> {
    match cli.command {
        Commands::Generate {
            config,
            metadata,
            output,
            execute,
            table,
            schema,
        } => {
            let handler = GenerateCommandHandler::new();
            let command = GenerateCommand {
                config_path: config,
                metadata_path: metadata,
                output,
                execute,
                table,
                schema,
            };
            handler.execute(&command).await
        }

        Commands::ResolveType {
            dialect,
            code,
            size,
            precision,
            scale,
            name,
            source,
        } => {
            let handler = ResolveTypeCommandHandler::new();
            let command = ResolveTypeCommand {
                dialect: dialect.parse::<DialectKind>()?,
                source: source.as_deref().map(str::parse::<DialectKind>).transpose()?,
                code,
                name,
                specifiers: TypeSpecifiers {
                    size,
                    precision,
                    scale,
                },
            };
            handler.execute(&command)
        }
    }
}
