use std::process;

use autoboot::diagnostics::{self, dump_log, init_logger};
use autoboot::domain::boot_config::CONFIG_KEYS;
use autoboot::infrastructure::SimulatedConsole;
use autoboot::utils::CmdLine;
use autoboot::{BootConfig, BootOrchestrator, BootTarget};
use autoboot_api::{LegacyCandidate, SlotNo};

const FLAGS: [&str; 5] = [
    "--config",
    "--unmountable",
    "--no-accounts",
    "--fail-titles",
    "--help",
];
const CONSOLE_KEYS: [&str; 5] = ["accounts", "default", "current", "choose", "legacy-titles"];

fn main() {
    let cmdline = CmdLine::from_args(std::env::args().skip(1));
    if cmdline.has_flag("--help") {
        print_help();
        return;
    }

    let config = match load_config(&cmdline) {
        Ok(config) => config,
        Err(message) => {
            eprintln!("[autoboot] {}", message);
            process::exit(2);
        }
    };

    if let Err(e) = init_logger(config.log_level) {
        eprintln!("[autoboot] {}", e);
    }
    diagnostics::set_sink(|line| eprintln!("{}", line));

    let known = cmdline.filter_known(&FLAGS, &[&CONSOLE_KEYS[..], &CONFIG_KEYS[..]].concat());
    log::debug!("Recognized arguments: {:?}", known);

    let console = match build_console(&cmdline, &config) {
        Ok(console) => console,
        Err(message) => {
            eprintln!("[autoboot] {}", message);
            process::exit(2);
        }
    };

    let intent = cmdline
        .positional(&["--config"])
        .first()
        .copied()
        .unwrap_or("native-menu");
    let target = BootTarget::parse(intent).unwrap_or_else(|e| {
        log::error!("{}, booting the native menu", e);
        BootTarget::NativeMenu
    });

    let mut orchestrator = BootOrchestrator::new(console, config);
    let outcome = orchestrator.boot(target);
    let console = orchestrator.into_platform();

    println!("target:   {}", outcome.target);
    match outcome.launched {
        Some(launch) => println!("launched: {}", launch),
        None => println!("launched: nothing"),
    }
    if let Some(slot) = outcome.selected_slot {
        println!("account:  slot {}", slot);
    }
    for error in &outcome.errors {
        println!("error:    {}", error);
    }
    println!("events:");
    for event in console.events() {
        println!("  {:?}", event);
    }
    println!("log: {} entries", dump_log().len());

    if !outcome.is_launched() {
        process::exit(1);
    }
}

fn load_config(cmdline: &CmdLine) -> Result<BootConfig, String> {
    let mut config = match cmdline.get_option("--config") {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .map_err(|e| format!("cannot read {}: {}", path, e))?;
            serde_json::from_str::<BootConfig>(&text)
                .map_err(|e| format!("invalid config {}: {}", path, e))?
        }
        None => BootConfig::default(),
    };
    config.apply_cmdline(cmdline).map_err(|e| e.to_string())?;
    Ok(config)
}

fn parse_slot(text: &str) -> Result<SlotNo, String> {
    text.parse::<SlotNo>()
        .map_err(|_| format!("invalid slot {:?}", text))
}

fn build_console(cmdline: &CmdLine, config: &BootConfig) -> Result<SimulatedConsole, String> {
    let mut console = SimulatedConsole::new();

    // accounts=<slot>[:<name>],...
    if let Some(list) = cmdline.get_key_value("accounts") {
        for entry in list.split(',').filter(|entry| !entry.is_empty()) {
            console = match entry.split_once(':') {
                Some((slot, name)) => console.with_account(parse_slot(slot)?, name),
                None => console.with_unnamed_account(parse_slot(entry)?),
            };
        }
    }
    if let Some(slot) = cmdline.get_key_value("default") {
        console = console.with_default_account(parse_slot(slot)?);
    }
    if let Some(slot) = cmdline.get_key_value("current") {
        console = console.with_current_slot(parse_slot(slot)?);
    }
    if let Some(slot) = cmdline.get_key_value("choose") {
        console = console.with_choice(parse_slot(slot)?);
    }
    if let Some(list) = cmdline.get_key_value("legacy-titles") {
        for entry in list.split(',').filter(|entry| !entry.is_empty()) {
            let candidate = LegacyCandidate::parse(entry).map_err(|e| e.to_string())?;
            console = console.with_legacy_title(config, candidate);
        }
    }

    if cmdline.has_flag("--unmountable") {
        console = console.with_unmountable_volume();
    }
    if cmdline.has_flag("--no-accounts") {
        console = console.with_account_subsystem_unavailable();
    }
    if cmdline.has_flag("--fail-titles") {
        console = console.with_failing_title_launches();
    }
    Ok(console)
}

fn print_help() {
    println!(
        "autoboot usage:\n  autoboot [native-menu|homebrew-launcher|legacy-menu|legacy-loader|title:<hex>]\n           [--config boot.json] [legacy.candidates=<hex>,..] [legacy.prefix=<hex>]\n           [legacy.device=<dev>] [legacy.mount=<path>] [log=<level>]\n           [accounts=<slot>[:<name>],..] [default=<slot>] [current=<slot>] [choose=<slot>]\n           [legacy-titles=<hex>,..] [--unmountable] [--no-accounts] [--fail-titles]"
    );
}
