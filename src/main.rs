use hangman::cli::{Cli, CliInterface, parse_cli};
use hangman::logging::{default_log_path, init_logging};
use hangman::tui::TuiInterface;
use hangman::{Result, RoundController, Rules, TickMode, WordBank, game_loop};
use std::io;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = parse_cli();

    if let Some(path) = cli.log_file.clone().or_else(default_log_path)
        && let Err(e) = init_logging(&path)
    {
        eprintln!("Logging disabled ({}): {e}", path.display());
    }

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("Fatal: {e}");
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let bank = match &cli.wordbank_path {
        Some(path) => WordBank::from_file(path).inspect_err(|e| {
            eprintln!("Failed to load word bank from '{}': {e}", path.display());
        })?,
        None => WordBank::embedded(),
    };
    log::info!("Loaded {} words.", bank.len());

    let rules = Rules::default().with_time_budget(cli.time_limit);
    let mut controller = match cli.seed {
        Some(seed) => RoundController::seeded(bank, rules, TickMode::default(), seed),
        None => RoundController::new(bank, rules, TickMode::default()),
    };

    if cli.plain {
        let mut interface = CliInterface::new(io::stdin().lock());
        game_loop(&mut controller, &mut interface, cli.difficulty)
    } else {
        let mut interface = TuiInterface::new()?;
        game_loop(&mut controller, &mut interface, cli.difficulty)
    }
}
