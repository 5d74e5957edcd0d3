//! textspot
//!
//! Looks up the text under the mouse pointer on a GNOME desktop: captures the
//! screen around the pointer, finds the word, line, paragraph or dialog block
//! there, runs Tesseract on it and hands the text to the LightDict shell
//! extension.

mod capture;
mod config;
mod detect;
mod error;
mod geometry;
mod ocr;
mod paths;
mod pipeline;

use anyhow::Result;
use chrono::Local;
use clap::Parser;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

use capture::GnomeShell;
use config::{Config, load_config};
use detect::{DumpInspector, Inspect};
use error::LookupError;
use ocr::Tesseract;
use pipeline::{Delivery, EXIT_CANCELLED, Lookup, Mode, Options, Services, Style};

/// Logs a message to both stderr and the log file with timestamp.
pub fn log(msg: &str) {
    let timestamp = Local::now().format("%H:%M:%S%.3f");
    let line = format!("[{}] {}\n", timestamp, msg);
    eprint!("{}", line);
    let log_path = paths::get_logs_dir().join("textspot.log");
    if let Ok(mut file) = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
    {
        let _ = file.write_all(line.as_bytes());
    }
}

#[derive(Parser, Debug)]
#[command(name = "textspot", version, about = "Look up the text under the pointer")]
struct Cli {
    /// Work mode
    #[arg(short, long, value_enum)]
    mode: Option<Mode>,

    /// LightDict trigger style
    #[arg(short, long, value_enum)]
    style: Option<Style>,

    /// Tesseract language(s), e.g. `eng` or `chi_sim+eng`
    #[arg(short, long)]
    lang: Option<String>,

    /// Swift style name
    #[arg(short, long)]
    name: Option<String>,

    /// Show the result at the cursor instead of over the detected area
    #[arg(short, long)]
    cursor: bool,

    /// Flash the detected area
    #[arg(short, long)]
    flash: bool,

    /// Suppress error messages
    #[arg(short, long)]
    quiet: bool,

    /// Config file (default: <config_dir>/textspot/config.json)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write detection snapshots to this directory
    #[arg(long)]
    debug_dir: Option<PathBuf>,
}

impl Cli {
    /// Flags given on the command line take precedence over the file.
    fn apply(self, mut config: Config) -> Config {
        if let Some(mode) = self.mode {
            config.mode = mode;
        }
        if let Some(style) = self.style {
            config.style = style;
        }
        if let Some(lang) = self.lang {
            config.lang = lang;
        }
        if let Some(name) = self.name {
            config.name = name;
        }
        config.cursor |= self.cursor;
        config.flash |= self.flash;
        config.quiet |= self.quiet;
        if self.debug_dir.is_some() {
            config.debug_dir = self.debug_dir;
        }
        config
    }
}

fn main() -> Result<()> {
    // Set up panic hook to log panics
    std::panic::set_hook(Box::new(|panic_info| {
        let msg = if let Some(s) = panic_info.payload().downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = panic_info.payload().downcast_ref::<String>() {
            s.clone()
        } else {
            "Unknown panic".to_string()
        };
        let location = panic_info
            .location()
            .map(|loc| format!(" at {}:{}:{}", loc.file(), loc.line(), loc.column()))
            .unwrap_or_default();
        log(&format!("[PANIC]{} {}", location, msg));
    }));

    if let Err(e) = paths::ensure_directories() {
        eprintln!("Failed to create log directory: {}", e);
    }

    let cli = Cli::parse();
    let config_path = cli.config.clone().unwrap_or_else(paths::get_config_path);
    let config = cli.apply(load_config(&config_path));

    let shell = GnomeShell::connect()?;
    let dump = config.debug_dir.clone().map(DumpInspector::new);
    let options = Options {
        lang: config.lang.clone(),
        reflow: config.reflow,
        word_area: config.word_area,
        capture: config.capture,
        inspector: dump.as_ref().map(|d| d as &dyn Inspect),
    };

    let mut lookup = match Tesseract::locate(config.tesseract.as_deref(), config.tessdata.as_deref())
    {
        Ok(tesseract) => {
            let services = Services {
                capture: &shell,
                selector: &shell,
                info: &shell,
                ocr: &tesseract,
            };
            pipeline::run(config.mode, &services, &options)
        }
        Err(e) => Lookup::from(LookupError::Engine(e)),
    };
    lookup.set_style(config.style, &config.name);
    lookup.set_quiet(config.quiet);

    match pipeline::deliver(lookup, &shell, config.flash, config.cursor)? {
        Delivery::Signalled => Ok(()),
        Delivery::Cancelled => {
            log("Exiting without signal");
            std::process::exit(EXIT_CANCELLED);
        }
    }
}
