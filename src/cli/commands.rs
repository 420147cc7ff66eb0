use std::io::{self, BufRead};

use clap::CommandFactory;
use clap_complete::generate;
use tracing::{debug, instrument};

use crate::application::{ExpressionService, IoResultExt};
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::{global_config_path, Settings};
use crate::domain::TreeNodeConvert;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    match &cli.command {
        None => _eval(cli, None, false),
        Some(Commands::Eval { expression, tree }) => _eval(cli, expression.as_deref(), *tree),
        Some(Commands::Tree { expression }) => _tree(cli, expression.as_deref()),
        Some(Commands::Config { command }) => _config(cli, command),
        Some(Commands::Completion { shell }) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(*shell, &mut cmd, name, &mut io::stdout());
            Ok(())
        }
    }
}

/// Effective settings: config layers first, then command line flags.
pub fn load_settings(cli: &Cli) -> CliResult<Settings> {
    let mut settings = Settings::load(cli.config.as_deref())?;
    if let Some(max_depth) = cli.max_depth {
        settings.max_depth = max_depth;
        settings.validate()?;
    }
    debug!("settings: {:?}", settings);
    Ok(settings)
}

/// Take the expression from the argument, else the first line of `reader`.
///
/// The line terminator is removed; nothing else is trimmed. Bytes that are
/// not UTF-8 become U+FFFD, which the character check rejects.
pub fn read_expression(expression: Option<&str>, reader: &mut impl BufRead) -> CliResult<String> {
    if let Some(expression) = expression {
        return Ok(expression.to_string());
    }
    let mut line = Vec::new();
    let read = reader.read_until(b'\n', &mut line).with_context("read stdin")?;
    if read == 0 {
        return Err(CliError::Usage("no expression given".to_string()));
    }
    if line.last() == Some(&b'\n') {
        line.pop();
        if line.last() == Some(&b'\r') {
            line.pop();
        }
    }
    Ok(String::from_utf8_lossy(&line).into_owned())
}

#[instrument(skip(cli))]
fn _eval(cli: &Cli, expression: Option<&str>, show_tree: bool) -> CliResult<()> {
    let settings = load_settings(cli)?;
    let input = read_expression(expression, &mut io::stdin().lock())?;
    let evaluation = ExpressionService::new(&settings).evaluate(&input)?;

    if show_tree || settings.show_tree {
        output::header(&evaluation.tree);
        output::detail(&evaluation.tree.to_tree_string());
    }
    output::bare(&evaluation.value);
    Ok(())
}

#[instrument(skip(cli))]
fn _tree(cli: &Cli, expression: Option<&str>) -> CliResult<()> {
    let settings = load_settings(cli)?;
    let input = read_expression(expression, &mut io::stdin().lock())?;
    let tree = ExpressionService::new(&settings).parse(&input)?;
    debug!("tree height {}, {} operands", tree.height(), tree.leaf_count());
    output::info(&tree);
    print!("{}", tree.to_tree_string());
    Ok(())
}

#[instrument(skip(cli))]
fn _config(cli: &Cli, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            let settings = load_settings(cli)?;
            print!("{}", settings.to_toml()?);
        }
        ConfigCommands::Path => match config_path(cli) {
            Some(path) => output::info(&path.display()),
            None => return Err(CliError::Usage("no config directory available".to_string())),
        },
        ConfigCommands::Init => {
            let path = config_path(cli)
                .ok_or_else(|| CliError::Usage("no config directory available".to_string()))?;
            Settings::write_template(&path)?;
            output::info(&format!("Created {}", path.display()));
        }
    }
    Ok(())
}

fn config_path(cli: &Cli) -> Option<std::path::PathBuf> {
    cli.config.clone().or_else(global_config_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn given_argument_when_reading_then_ignores_stdin() {
        let mut stdin = Cursor::new("9@9\n");
        let expr = read_expression(Some("1&2"), &mut stdin).unwrap();
        assert_eq!(expr, "1&2");
    }

    #[test]
    fn given_stdin_line_when_reading_then_strips_line_terminator_only() {
        let mut stdin = Cursor::new("(1&2)@3\r\nsecond line\n");
        assert_eq!(read_expression(None, &mut stdin).unwrap(), "(1&2)@3");

        let mut stdin = Cursor::new(" 1&2");
        assert_eq!(read_expression(None, &mut stdin).unwrap(), " 1&2");
    }

    #[test]
    fn given_empty_stdin_when_reading_then_fails_with_usage() {
        let mut stdin = Cursor::new("");
        assert!(matches!(
            read_expression(None, &mut stdin),
            Err(CliError::Usage(_))
        ));
    }

    #[test]
    fn given_blank_line_when_reading_then_returns_empty_expression() {
        let mut stdin = Cursor::new("\n");
        assert_eq!(read_expression(None, &mut stdin).unwrap(), "");
    }

    #[test]
    fn given_invalid_utf8_line_when_reading_then_rejects_characters() {
        let mut stdin = Cursor::new(vec![b'1', 0xFF, b'2', b'\n']);
        let expr = read_expression(None, &mut stdin).unwrap();
        assert_eq!(expr, "1\u{FFFD}2");

        let err = ExpressionService::default().evaluate(&expr).unwrap_err();
        assert_eq!(
            err.as_domain().map(|e| e.user_message()),
            Some(crate::domain::INVALID_CHARACTERS)
        );
    }
}
