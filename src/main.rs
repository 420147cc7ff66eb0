use clap::Parser;
use minmax::cli::commands::execute_command;
use minmax::cli::{output, Cli};
use minmax::exitcode;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, Layer};

fn main() {
    let cli = Cli::parse();

    setup_logging(cli.debug);

    if let Err(e) = execute_command(&cli) {
        match e.as_domain() {
            // The rejected expression gets its bare message and nothing else
            Some(rejection) => {
                tracing::info!("rejected: {}", rejection);
                output::bare(rejection.user_message());
            }
            None => output::error(&e),
        }
        std::process::exit(e.exit_code());
    }
    std::process::exit(exitcode::OK);
}

fn setup_logging(verbosity: u8) {
    let filter = match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        3 => LevelFilter::TRACE,
        _ => {
            eprintln!("Don't be crazy, max is -d -d -d");
            LevelFilter::TRACE
        }
    };

    // Create a subscriber with formatted output directed to stderr
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_names(false)
        .with_span_events(FmtSpan::CLOSE);

    tracing_subscriber::registry()
        .with(fmt_layer.with_filter(filter))
        .init();

    match filter {
        LevelFilter::INFO => tracing::info!("Debug mode: info"),
        LevelFilter::DEBUG => tracing::debug!("Debug mode: debug"),
        LevelFilter::TRACE => tracing::debug!("Debug mode: trace"),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // https://docs.rs/clap/latest/clap/_derive/_tutorial/index.html#testing
    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn given_subcommand_and_global_flags_when_parsing_then_collects_both() {
        let cli = Cli::try_parse_from(["minmax", "-dd", "eval", "1&2", "--tree", "--max-depth", "8"])
            .expect("parse");
        assert_eq!(cli.debug, 2);
        assert_eq!(cli.max_depth, Some(8));
        assert!(matches!(
            cli.command,
            Some(minmax::cli::Commands::Eval { ref expression, tree: true }) if expression.as_deref() == Some("1&2")
        ));
    }
}
