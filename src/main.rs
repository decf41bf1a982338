// SPDX-License-Identifier: MPL-2.0
use qrx::app::{paths, Session};
use qrx::application::ExportError;
use qrx::config;
use qrx::domain::color::Color;
use qrx::domain::qr::{CustomizationPatch, ErrorCorrectionLevel, ImageKind, QrFormat};
use qrx::domain::theme::{Mode, PaletteId};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

const HELP: &str = "\
qrx - themed QR code generator

USAGE:
  qrx [OPTIONS] [CONTENT]

OPTIONS:
  --palette ID          dragon-ball | attack-titan | demon-slayer | one-piece
  --mode MODE           dark | light
  --format FORMAT       url | text | email | contact
  --fg COLOR            foreground color (#rrggbb or #rrggbbaa)
  --bg COLOR            background color
  --size N              image width in pixels (200-800, step 50)
  --margin N            quiet zone in modules (0-10)
  --ecl LEVEL           error correction: L | M | Q | H
  --theme-colors        use the theme's primary and background colors
  --export KIND         png | svg
  --output-dir DIR      directory receiving exports
  --data-dir DIR        preference storage directory
  --config-dir DIR      settings.toml directory
  --list-palettes       print the available palettes
  --css                 print the theme as CSS custom properties
  -h, --help            print this help
";

#[derive(Debug)]
struct Flags {
    palette: Option<String>,
    mode: Option<Mode>,
    format: Option<QrFormat>,
    foreground: Option<Color>,
    background: Option<Color>,
    size: Option<u32>,
    margin: Option<u32>,
    error_correction: Option<ErrorCorrectionLevel>,
    theme_colors: bool,
    export: Option<ImageKind>,
    output_dir: Option<PathBuf>,
    data_dir: Option<PathBuf>,
    config_dir: Option<PathBuf>,
    list_palettes: bool,
    css: bool,
    content: Option<String>,
}

impl Flags {
    fn parse() -> Result<Option<Self>, pico_args::Error> {
        let mut args = pico_args::Arguments::from_env();
        if args.contains(["-h", "--help"]) {
            return Ok(None);
        }

        let flags = Flags {
            palette: args.opt_value_from_str("--palette")?,
            mode: args.opt_value_from_str("--mode")?,
            format: args.opt_value_from_str("--format")?,
            foreground: args.opt_value_from_str("--fg")?,
            background: args.opt_value_from_str("--bg")?,
            size: args.opt_value_from_str("--size")?,
            margin: args.opt_value_from_str("--margin")?,
            error_correction: args.opt_value_from_str("--ecl")?,
            theme_colors: args.contains("--theme-colors"),
            export: args.opt_value_from_str("--export")?,
            output_dir: args.opt_value_from_str("--output-dir")?,
            data_dir: args.opt_value_from_str("--data-dir")?,
            config_dir: args.opt_value_from_str("--config-dir")?,
            list_palettes: args.contains("--list-palettes"),
            css: args.contains("--css"),
            content: args.opt_free_from_str()?,
        };

        let rest = args.finish();
        if !rest.is_empty() {
            return Err(pico_args::Error::ArgumentParsingFailed {
                cause: format!("unexpected arguments: {rest:?}"),
            });
        }
        Ok(Some(flags))
    }

    fn customization_patch(&self) -> CustomizationPatch {
        let mut patch = CustomizationPatch::default();
        if let Some(color) = self.foreground {
            patch = patch.foreground(color);
        }
        if let Some(color) = self.background {
            patch = patch.background(color);
        }
        if let Some(size) = self.size {
            patch = patch.size(size);
        }
        if let Some(margin) = self.margin {
            patch = patch.margin(margin);
        }
        if let Some(level) = self.error_correction {
            patch = patch.error_correction(level);
        }
        patch
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("qrx=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let flags = match Flags::parse() {
        Ok(Some(flags)) => flags,
        Ok(None) => {
            print!("{HELP}");
            return ExitCode::SUCCESS;
        }
        Err(error) => {
            eprintln!("qrx: {error}\n\n{HELP}");
            return ExitCode::from(2);
        }
    };

    if flags.list_palettes {
        for id in PaletteId::ALL {
            println!("{:<14} {}", id.as_str(), id.palette().display_name);
        }
        return ExitCode::SUCCESS;
    }

    paths::init_cli_overrides(flags.data_dir.clone(), flags.config_dir.clone());

    let (mut settings, warning) = config::load();
    if let Some(warning) = warning {
        tracing::warn!("{warning}");
    }
    if let Some(dir) = flags.output_dir.clone() {
        settings.export.output_dir = Some(dir);
    }

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
    {
        Ok(runtime) => runtime,
        Err(error) => {
            tracing::error!(%error, "failed to start runtime");
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(run(flags, &settings)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("qrx: {message}");
            ExitCode::FAILURE
        }
    }
}

async fn run(flags: Flags, settings: &config::Config) -> Result<(), String> {
    let (mut session, warning) = Session::open(settings, None).map_err(|e| e.to_string())?;
    if let Some(warning) = warning {
        tracing::warn!("preferences reset: {warning}");
    }

    if let Some(id) = &flags.palette {
        session
            .theme_mut()
            .select_palette(id)
            .map_err(|e| e.to_string())?;
    }
    if let Some(mode) = flags.mode {
        session.theme_mut().select_mode(mode);
    }

    if flags.css {
        let palette = session.theme().effective_palette();
        println!(":root {{");
        for (name, color) in palette.css_variables() {
            println!("  {name}: {color};");
        }
        println!("}}");
    }

    let patch = flags.customization_patch();
    if !patch.is_empty() {
        session.controller_mut().update_customization(&patch);
    }
    if flags.theme_colors {
        session.reset_colors_to_theme();
    }
    if let Some(format) = flags.format {
        session.controller_mut().set_format(format);
    }

    let Some(content) = flags.content else {
        if flags.export.is_some() {
            return Err(ExportError::NothingToExport.user_message().to_string());
        }
        return Ok(());
    };

    session.controller_mut().set_content(content);
    let snapshot = session.controller().settled().await;
    if snapshot.encoded_image.is_none() {
        return Err(ExportError::NothingToExport.user_message().to_string());
    }
    tracing::info!(
        format = %snapshot.input.format(),
        size = snapshot.customization.size.value(),
        "QR code generated"
    );

    if let Some(kind) = flags.export {
        let path = session.controller().export_image(kind).map_err(|error| {
            tracing::error!(%error, "export failed");
            error.user_message().to_string()
        })?;
        println!("{}", path.display());
    }
    Ok(())
}
