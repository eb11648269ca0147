use anyhow::{bail, Context, Result};
use crossterm::style::Stylize;
use energyvis::app_state::AppState;
use energyvis::catalog::FilterCheckbox;
use energyvis::config::config::Config;
use energyvis::data::data_source::open_source;
use energyvis::table_display::{display_catalog, display_task_table};
use energyvis::tasks::filter::Facet;
use energyvis::tasks::viewer::ViewMode;
use energyvis::ui::run_tui_app;
use energyvis::utils::app_paths::AppPaths;
use energyvis::utils::logging::init_tracing;
use tracing::{info, warn};

fn print_help() {
    println!(
        "{}",
        "energyvis - Energy network visualisation catalog browser".blue().bold()
    );
    println!();
    println!("{}", "Usage:".yellow());
    println!("  energyvis [OPTIONS] [DATA_LOCATION]");
    println!();
    println!("  DATA_LOCATION is a directory or an http(s) base URL holding");
    println!("  energynetworks.csv, literature_tasks.csv and field_tasks.csv");
    println!();
    println!("{}", "Options:".yellow());
    println!("  {}      - Write a commented default config", "--generate-config".green());
    println!(
        "  {} - Print a view instead of starting the UI",
        "--print catalog|literature|field".green()
    );
    println!("  {}            - Search all task columns", "--search TEXT".green());
    println!(
        "  {}       - Task facet filter, e.g. archetype=A (repeatable)",
        "--facet NAME=VALUE".green()
    );
    println!(
        "  {}             - Catalog filter, e.g. identify:mapped or VR (repeatable)",
        "--check NAME".green()
    );
    println!("  {}            - Show every task column", "--all-columns".green());
    println!("  {}                  - ASCII glyphs for visual channels", "--ascii".green());
    println!("  {}                   - Show this help", "--help".green());
    println!();
}

#[derive(Debug, Default)]
struct CliArgs {
    generate_config: bool,
    help: bool,
    print: Option<ViewMode>,
    search: Option<String>,
    facets: Vec<(Facet, String)>,
    checks: Vec<FilterCheckbox>,
    all_columns: bool,
    ascii: bool,
    location: Option<String>,
}

fn parse_args(args: &[String]) -> Result<CliArgs> {
    let mut parsed = CliArgs::default();
    let mut iter = args.iter().skip(1);

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--help" | "-h" => parsed.help = true,
            "--generate-config" => parsed.generate_config = true,
            "--all-columns" => parsed.all_columns = true,
            "--ascii" => parsed.ascii = true,
            "--print" => {
                let value = iter.next().context("--print needs catalog, literature or field")?;
                parsed.print = Some(
                    ViewMode::parse(value).with_context(|| format!("Unknown view '{}'", value))?,
                );
            }
            "--search" => {
                parsed.search = Some(iter.next().context("--search needs a value")?.clone());
            }
            "--facet" => {
                let value = iter.next().context("--facet needs NAME=VALUE")?;
                let Some((name, v)) = value.split_once('=') else {
                    bail!("--facet expects NAME=VALUE, got '{}'", value);
                };
                match Facet::parse(name) {
                    Some(facet) => parsed.facets.push((facet, v.to_string())),
                    None => warn!(target: "cli", "Unknown facet '{}', ignored", name),
                }
            }
            "--check" => {
                let value = iter.next().context("--check needs a filter name")?;
                match FilterCheckbox::parse(value) {
                    Some(checkbox) => parsed.checks.push(checkbox),
                    None => warn!(target: "cli", "Unknown catalog filter '{}', ignored", value),
                }
            }
            other if other.starts_with("--") => bail!("Unknown option '{}'", other),
            other => parsed.location = Some(other.to_string()),
        }
    }
    Ok(parsed)
}

fn generate_config() -> Result<()> {
    let path = Config::get_config_path()?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).context("Error creating config directory")?;
    }
    std::fs::write(&path, Config::create_default_with_comments())
        .with_context(|| format!("Error writing config file {:?}", path))?;
    println!("Configuration file created at: {:?}", path);
    Ok(())
}

fn run_print(mut state: AppState, mode: ViewMode, args: &CliArgs) {
    state.start(None);
    for checkbox in &args.checks {
        state.catalog.set_checked(*checkbox, true, None);
    }

    if mode == ViewMode::Catalog {
        report_notices(&mut state);
        display_catalog(&state.catalog);
        return;
    }

    state.select_tab(mode);
    if args.all_columns {
        state.viewer.select_all_columns();
    }
    if let Some(search) = &args.search {
        state.viewer.search_now(search);
    }
    for (facet, value) in &args.facets {
        if let Err(e) = state.viewer.set_facet(*facet, Some(value.clone())) {
            eprintln!("{}", format!("{:#}", e).yellow());
        }
    }

    report_notices(&mut state);
    if let (Some(title), Some(model)) = (state.viewer.title(), state.viewer.table_model()) {
        display_task_table(&title, &model);
    }
}

fn report_notices(state: &mut AppState) {
    for notice in state.drain_notices() {
        eprintln!("{}", notice.to_string().red());
    }
}

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let logging = init_tracing(AppPaths::log_dir());

    match (&logging.log_path, &logging.log_error) {
        (Some(path), _) => {
            eprintln!("Debug logs will be written to:");
            eprintln!("   {}", path.display());
        }
        (None, Some(e)) => eprintln!("{}", format!("File logging disabled: {}", e).yellow()),
        (None, None) => {}
    }

    let cli = match parse_args(&args) {
        Ok(cli) => cli,
        Err(e) => {
            eprintln!("{}", format!("Error: {:#}", e).red());
            print_help();
            std::process::exit(2);
        }
    };

    if cli.help {
        print_help();
        return Ok(());
    }
    if cli.generate_config {
        return generate_config();
    }

    let mut config = Config::load().context("Error loading configuration")?;
    if cli.ascii {
        config.use_ascii();
    }
    if let Some(location) = &cli.location {
        config.data.location = location.clone();
    }
    info!(target: "cli", "Data location: {}", config.data.location);

    let source = open_source(&config.data.location);
    let state = AppState::new(config, source);

    match cli.print {
        Some(mode) => {
            run_print(state, mode, &cli);
            Ok(())
        }
        None => run_tui_app(state, logging.buffer),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        std::iter::once("energyvis")
            .chain(list.iter().copied())
            .map(String::from)
            .collect()
    }

    #[test]
    fn test_parse_print_options() {
        let cli = parse_args(&args(&[
            "--print",
            "literature",
            "--facet",
            "archetype=A",
            "--search",
            "p2",
            "--check",
            "VR",
            "data",
        ]))
        .unwrap();
        assert_eq!(cli.print, Some(ViewMode::Literature));
        assert_eq!(cli.facets, vec![(Facet::Archetype, "A".to_string())]);
        assert_eq!(cli.search.as_deref(), Some("p2"));
        assert_eq!(cli.checks, vec![FilterCheckbox::DataType("VR")]);
        assert_eq!(cli.location.as_deref(), Some("data"));
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(parse_args(&args(&["--print", "everything"])).is_err());
        assert!(parse_args(&args(&["--facet", "archetype"])).is_err());
        assert!(parse_args(&args(&["--verbose"])).is_err());
        let cli = parse_args(&args(&["--facet", "colour=1"])).unwrap();
        assert!(cli.facets.is_empty());
    }
}
