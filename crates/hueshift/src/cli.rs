//! The `hueshift` command-line front end.
//!
//! Every settings command goes through a [`ThemeStateManager`] backed by a
//! [`FileStore`], so the CLI reads and writes exactly what an embedding
//! application would.
//!
//! ```rust
//! use clap::Parser;
//! use hueshift::cli::{run, Cli};
//!
//! let cli = Cli::try_parse_from(["hueshift", "adjust", "#10b981", "-15"]).unwrap();
//! let mut out = Vec::new();
//! run(&cli, &mut out).unwrap();
//! assert_eq!(String::from_utf8(out).unwrap(), "#0a7350\n");
//! ```

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use console::Style;
use tracing_subscriber::EnvFilter;

use hueshift_color::terminal::to_ansi256;
use hueshift_color::{adjust, preset, presets, Color, ThemePalette};
use hueshift_theme::{
    AmbientPreference, CssVariables, FileStore, ManualAmbient, Persistence, RenderTarget,
    SystemAmbient, ThemeConfig, ThemeStateManager,
};

/// Environment variable holding a `tracing` filter directive.
pub const LOG_ENV: &str = "HUESHIFT_LOG";

#[derive(Debug, Parser)]
#[command(name = "hueshift", version, about = "Accent palettes and theme settings")]
pub struct Cli {
    /// Settings file
    #[arg(long, global = true, env = "HUESHIFT_STORE", default_value = "hueshift.json")]
    pub store: PathBuf,

    /// YAML file overriding keys, defaults and property names
    #[arg(long, global = true, env = "HUESHIFT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Where `auto` mode takes its light/dark preference from
    #[arg(long, global = true, env = "HUESHIFT_AMBIENT", value_enum, default_value = "system")]
    pub ambient: AmbientSource,

    /// More log output (repeatable)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Shift a color's lightness by PERCENT points
    Adjust {
        color: String,
        #[arg(allow_negative_numbers = true, value_parser = parse_percent)]
        percent: f64,
    },
    /// Print the palette derived from an accent color
    Palette {
        color: String,
        #[arg(long, value_enum, default_value = "text")]
        format: PaletteFormat,
    },
    /// List the built-in accent presets
    Presets,
    /// Show or set the theme mode
    Mode {
        /// light, dark or auto
        mode: Option<String>,
    },
    /// Show or set the accent color
    Accent {
        /// A #rrggbb color or a preset name
        value: Option<String>,
    },
    /// Print the CSS rule for the stored settings
    Css,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PaletteFormat {
    Text,
    Css,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum AmbientSource {
    /// Ask the operating system
    System,
    Light,
    Dark,
}

impl AmbientSource {
    pub fn preference(self) -> Box<dyn AmbientPreference> {
        match self {
            AmbientSource::System => Box::new(SystemAmbient::new()),
            AmbientSource::Light => Box::new(ManualAmbient::light()),
            AmbientSource::Dark => Box::new(ManualAmbient::dark()),
        }
    }
}

type CliManager = ThemeStateManager<FileStore, CssVariables, Box<dyn AmbientPreference>>;

impl Cli {
    fn load_config(&self) -> Result<ThemeConfig> {
        match &self.config {
            Some(path) => ThemeConfig::from_file(path)
                .with_context(|| format!("loading config from {}", path.display())),
            None => Ok(ThemeConfig::default()),
        }
    }

    fn open_manager(&self) -> Result<CliManager> {
        let config = self.load_config()?;
        let store = FileStore::open(&self.store);
        let mut manager = ThemeStateManager::with_config(
            store,
            CssVariables::new(),
            self.ambient.preference(),
            config,
        )?;
        manager.initialize();
        Ok(manager)
    }
}

fn parse_percent(raw: &str) -> std::result::Result<f64, String> {
    let percent: f64 = raw.parse().map_err(|e| format!("{e}"))?;
    if percent.is_finite() {
        Ok(percent)
    } else {
        Err(format!("'{raw}' is not a finite number"))
    }
}

/// Installs the stderr log subscriber.
///
/// [`LOG_ENV`] wins when set; otherwise `verbose` picks the level.
pub fn init_logging(verbose: u8) {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| {
        EnvFilter::new(match verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        })
    });
    // A second install (tests, embedding) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Executes `cli`, writing command output to `out`.
pub fn run<W: Write>(cli: &Cli, out: &mut W) -> Result<()> {
    match &cli.command {
        Command::Adjust { color, percent } => {
            let color = Color::parse(color)?;
            writeln!(out, "{}", adjust(color, *percent))?;
        }
        Command::Palette { color, format } => {
            let config = cli.load_config()?;
            let palette = ThemePalette::derive(Color::parse(color)?, &config.offsets);
            write_palette(out, &palette, &config, *format)?;
        }
        Command::Presets => {
            for preset in presets() {
                let (from, to) = preset.preview();
                writeln!(
                    out,
                    "{}{} {:<8} {}  {}",
                    swatch(from),
                    swatch(to),
                    preset.name,
                    preset.color,
                    preset.description
                )?;
            }
        }
        Command::Mode { mode } => {
            let mut manager = cli.open_manager()?;
            if let Some(mode) = mode {
                let saved = manager.set_mode_str(mode)?;
                ensure_saved(saved, &cli.store)?;
            }
            let resolved = manager.resolved_mode();
            writeln!(out, "{} {} ({})", resolved.icon(), manager.mode(), resolved)?;
        }
        Command::Accent { value } => {
            let mut manager = cli.open_manager()?;
            if let Some(value) = value {
                let saved = match preset(value) {
                    Some(preset) => manager.set_accent_color(preset.color),
                    None => manager.set_accent_str(value)?,
                };
                ensure_saved(saved, &cli.store)?;
            }
            let accent = manager.accent();
            let name = presets()
                .iter()
                .find(|p| p.color == accent)
                .map(|p| format!(" ({})", p.name))
                .unwrap_or_default();
            writeln!(out, "{} {}{}", swatch(accent), accent, name)?;
        }
        Command::Css => {
            let manager = cli.open_manager()?;
            write!(out, "{}", manager.target().to_css())?;
        }
    }
    Ok(())
}

fn write_palette<W: Write>(
    out: &mut W,
    palette: &ThemePalette,
    config: &ThemeConfig,
    format: PaletteFormat,
) -> Result<()> {
    let names = config.properties.names();
    match format {
        PaletteFormat::Text => {
            for (name, color) in names.iter().zip(palette.entries()) {
                writeln!(out, "{} {:<18} {}", swatch(color), name, color)?;
            }
        }
        PaletteFormat::Css => {
            let mut css = CssVariables::new();
            for (name, color) in names.iter().zip(palette.entries()) {
                css.set_property(name, &color.to_hex());
            }
            write!(out, "{}", css.to_css())?;
        }
        PaletteFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, palette)?;
            writeln!(out)?;
        }
    }
    Ok(())
}

fn swatch(color: Color) -> String {
    Style::new()
        .color256(to_ansi256(color))
        .apply_to("██")
        .to_string()
}

fn ensure_saved(persistence: Persistence, store: &Path) -> Result<()> {
    if !persistence.is_saved() {
        bail!("setting applied but could not be saved to {}", store.display());
    }
    Ok(())
}
