//! Interactive session over stdin.
//!
//! A plain line is a search. Lines starting with `:` edit settings or control
//! the session; every edit is persisted and the current results re-rendered.

use hypeprice_client::run_search;
use hypeprice_core::{
    AppConfig, KeyValueStore, Origin, SettingsStore, SortOption, StoreFilter, ViewState,
};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::render;
use crate::search::build_search_client;
use crate::settings::{apply_edit, parse_finite, SettingsEdit};

const HELP: &str = "\
<query>              search for a product
:sort <recommended|low|high>
:store <name>        filter by retailer (\"All Stores\" clears)
:ship <twd>          manual shipping amount
:weight <lb>         parcel weight (derives shipping)
:origin <code>       US, GB, JP, HK, AU, EU (derives shipping)
:tax <on|off>
:threshold <twd>     tax only at or above this base price
:show                re-print current results
:settings            print settings
:quit
";

#[derive(Debug, PartialEq)]
pub(crate) enum ShellInput {
    Empty,
    Search(String),
    Edit(SettingsEdit),
    Show,
    ShowSettings,
    Help,
    Quit,
}

pub(crate) fn parse_shell_line(line: &str) -> Result<ShellInput, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(ShellInput::Empty);
    }
    let Some(command) = line.strip_prefix(':') else {
        return Ok(ShellInput::Search(line.to_string()));
    };

    let (name, arg) = match command.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (command, ""),
    };
    let need_arg = || {
        if arg.is_empty() {
            Err(format!(":{name} needs an argument"))
        } else {
            Ok(arg)
        }
    };
    let number = || -> Result<f64, String> {
        parse_finite(need_arg()?).map_err(|e| format!(":{name} {e}"))
    };

    let edit = match name {
        "quit" | "exit" | "q" => return Ok(ShellInput::Quit),
        "help" | "h" => return Ok(ShellInput::Help),
        "show" => return Ok(ShellInput::Show),
        "settings" => return Ok(ShellInput::ShowSettings),
        "sort" => SettingsEdit::Sort(need_arg()?.parse::<SortOption>()?),
        "store" => SettingsEdit::Store(StoreFilter::from(need_arg()?)),
        "ship" | "shipping" => SettingsEdit::Shipping(number()?),
        "weight" => SettingsEdit::Weight(number()?),
        "origin" => SettingsEdit::Origin(need_arg()?.parse::<Origin>()?),
        "threshold" => SettingsEdit::Threshold(number()?),
        "tax" => match need_arg()?.to_ascii_lowercase().as_str() {
            "on" | "true" => SettingsEdit::ApplyTax(true),
            "off" | "false" => SettingsEdit::ApplyTax(false),
            other => return Err(format!(":tax expects on or off, got \"{other}\"")),
        },
        other => return Err(format!("unknown command :{other}; try :help")),
    };
    Ok(ShellInput::Edit(edit))
}

/// Reads lines from stdin until EOF or `:quit`.
///
/// # Errors
///
/// Returns an error if the search client cannot be built or stdin fails.
pub(crate) async fn run_shell<S: KeyValueStore>(
    config: &AppConfig,
    store: &mut SettingsStore<S>,
) -> anyhow::Result<()> {
    let client = build_search_client(config)?;
    let mut settings = store.load();
    let mut view = ViewState::from_settings(&settings);

    println!("hypeprice shell; :help for commands");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match parse_shell_line(&line) {
            Ok(ShellInput::Empty) => {}
            Ok(ShellInput::Quit) => break,
            Ok(ShellInput::Help) => print!("{HELP}"),
            Ok(ShellInput::ShowSettings) => print!("{}", render::render_settings(&settings)),
            Ok(ShellInput::Show) => print!("{}", render::render_view(&view, &settings.cost_model)),
            Ok(ShellInput::Search(query)) => {
                println!("Searching...");
                run_search(&client, &mut view, &query).await;
                print!("{}", render::render_view(&view, &settings.cost_model));
            }
            Ok(ShellInput::Edit(edit)) => {
                apply_edit(store, &mut settings, edit);
                view.sort_option = settings.sort_option;
                view.store_filter = settings.store_filter.clone();
                print!("{}", render::render_view(&view, &settings.cost_model));
            }
            Err(message) => eprintln!("{message}"),
        }
    }
    Ok(())
}
