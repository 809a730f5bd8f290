use std::io::{self, Read};
use std::process;

use clap::Parser;
use serde_json::Value;
use tracing_subscriber::EnvFilter;

use iamlens::codec::{encode_with, TaggedScheme};
use iamlens::data::{load_actions_from_path, load_policies_from_path, load_roles_from_path};
use iamlens::search::field_segments;
use iamlens::types::{FIELD_ID, FIELD_NAME};
use iamlens::{
    compare, Accessors, Action, AppState, Dataset, EncodeError, EngineConfig, Policy, Result,
    Role, SearchFilters, SearchResult, Searcher, StateCodec,
};

mod cli;
use cli::display::{self, GRAY};
use cli::{Cli, Commands, Kind};

fn main() {
    init_tracing();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("❌ {}", e);
        process::exit(1);
    }
}

/// Log to stderr, filtered by `IAMLENS_LOG` (default `warn`).
fn init_tracing() {
    let filter = EnvFilter::try_from_env("IAMLENS_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => EngineConfig::from_path(path)?,
        None => EngineConfig::default(),
    };

    match cli.command {
        Commands::Search {
            dataset,
            kind,
            id,
            name,
            attribute,
            limit,
        } => {
            let filters = SearchFilters {
                id,
                name,
                attribute,
            };
            match kind {
                Kind::Roles => run_search(
                    load_roles_from_path(&dataset)?,
                    Role::accessors(),
                    &filters,
                    limit,
                    &config,
                ),
                Kind::Policies => run_search(
                    load_policies_from_path(&dataset)?,
                    Policy::accessors(),
                    &filters,
                    limit,
                    &config,
                ),
                Kind::Actions => run_search(
                    load_actions_from_path(&dataset)?,
                    Action::accessors(),
                    &filters,
                    limit,
                    &config,
                ),
            }
            Ok(())
        }
        Commands::Encode { json, legacy } => run_encode(json, legacy, &config),
        Commands::Decode { token } => {
            let value: Value = StateCodec::new(&config).decode_any(&token)?;
            println!("{}", pretty(&value)?);
            Ok(())
        }
        Commands::Compare {
            dataset,
            token,
            kind,
            prefix,
        } => {
            let state = AppState::from_token(&token, &StateCodec::new(&config), &config)?;
            let prefix = prefix.as_deref().unwrap_or(kind.state_prefix());
            let json = match kind {
                Kind::Roles => run_compare(
                    load_roles_from_path(&dataset)?,
                    Role::accessors(),
                    &state,
                    prefix,
                )?,
                Kind::Policies => run_compare(
                    load_policies_from_path(&dataset)?,
                    Policy::accessors(),
                    &state,
                    prefix,
                )?,
                Kind::Actions => run_compare(
                    load_actions_from_path(&dataset)?,
                    Action::accessors(),
                    &state,
                    prefix,
                )?,
            };
            println!("{}", json);
            Ok(())
        }
    }
}

fn pretty(value: &impl serde::Serialize) -> Result<String> {
    Ok(serde_json::to_string_pretty(value).map_err(EncodeError::from)?)
}

fn warn_skipped<T>(data: &Dataset<T>) {
    if data.report.skipped > 0 {
        eprintln!(
            "⚠️  Skipped {} malformed record(s) in dataset",
            data.report.skipped
        );
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// SEARCH
// ═══════════════════════════════════════════════════════════════════════════

/// Highlighted value of `key` if the result matched on it, plain otherwise.
fn render_field<T>(result: &SearchResult<&T>, key: &str, value: &str, min_len: usize) -> String {
    match result.first_match(key) {
        Some(field_match) => display::highlighted(&field_segments(field_match, min_len)),
        None => display::truncate(value, display::BOX_WIDTH - 8),
    }
}

fn run_search<T>(
    data: Dataset<T>,
    accessors: Accessors<T>,
    filters: &SearchFilters,
    limit: usize,
    config: &EngineConfig,
) {
    warn_skipped(&data);
    let searcher = Searcher::new(data.items, accessors);
    let outcome = searcher.search(filters);

    println!(
        "{}",
        display::summary(outcome.len(), searcher.len(), outcome.is_filtered)
    );

    for (position, result) in outcome.results.iter().enumerate().take(limit) {
        let id = render_field(
            result,
            FIELD_ID,
            (accessors.id)(result.item),
            config.min_highlight_len,
        );
        let name = render_field(
            result,
            FIELD_NAME,
            (accessors.name)(result.item),
            config.min_highlight_len,
        );

        display::section_top(&format!("#{}", result.original_index));
        display::row(&format!(" {} {}", display::themed(GRAY, &[], "id  "), id));
        display::row(&format!(" {} {}", display::themed(GRAY, &[], "name"), name));

        if let Some(preview) = outcome.preview(position, config.max_attribute_matches) {
            for field_match in preview.shown {
                let segments = field_segments(field_match, config.min_highlight_len);
                display::row(&format!("   • {}", display::highlighted(&segments)));
            }
            if preview.hidden() > 0 {
                display::row(&format!("   {}", display::more(preview.hidden())));
            }
        }
        display::section_bot();
    }

    if outcome.len() > limit {
        println!("{}", display::more(outcome.len() - limit));
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// STATE TOKENS
// ═══════════════════════════════════════════════════════════════════════════

fn run_encode(json: Option<String>, legacy: bool, config: &EngineConfig) -> Result<()> {
    let json = match json {
        Some(json) => json,
        None => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
    };
    let value: Value = serde_json::from_str(&json).map_err(EncodeError::from)?;

    let token = if legacy {
        encode_with(&TaggedScheme, &value)?
    } else {
        StateCodec::new(config).encode(&value)?
    };
    println!("{}", token);
    Ok(())
}

fn run_compare<T>(
    data: Dataset<T>,
    accessors: Accessors<T>,
    state: &AppState,
    prefix: &str,
) -> Result<String> {
    warn_skipped(&data);
    let searcher = Searcher::new(data.items, accessors);

    let mut selection = state.selection(prefix);
    let dropped = selection.restrict(state.available_groups, |key| searcher.contains(key));
    if dropped > 0 {
        tracing::warn!(dropped, prefix, "ignoring selections outside the dataset");
    }

    let comparison = compare(&selection, |key| searcher.get(key), searcher.accessors());
    for group in 0..state.available_groups {
        let unique = comparison
            .items
            .keys()
            .filter(|item| comparison.sole_group(item) == Some(group))
            .count();
        eprintln!("{} {} unique", display::group_badge(group), unique);
    }
    pretty(&comparison)
}
