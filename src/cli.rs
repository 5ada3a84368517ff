//! Command-line surface: window listing, single-shot and long capture.

use crate::capture::{self, FrameSource, Region, WindowSelector, XcapFrameSource};
use crate::config::{ConfigError, SessionConfig};
use crate::scroll;
use crate::session::{CaptureSession, SessionError};
use clap::{Args, Parser, Subcommand};
use image::RgbaImage;
use regex::Regex;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "long-capture")]
#[command(version, about = "Scroll a window and stitch its pages into one tall screenshot")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// JSON config file (defaults to <config dir>/long-capture/config.json)
    #[arg(long, global = true, env = "LONG_CAPTURE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Debug-level progress output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List capturable windows
    List {
        /// Print as JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Capture a window once
    Shot {
        #[command(flatten)]
        target: TargetArgs,

        /// Only keep x,y,width,height of the window
        #[arg(long)]
        crop: Option<Region>,

        #[command(flatten)]
        output: OutputArgs,
    },
    /// Scroll through a window and stitch the pages
    Long {
        #[command(flatten)]
        target: TargetArgs,

        #[command(flatten)]
        tuning: TuningArgs,

        #[command(flatten)]
        output: OutputArgs,

        /// Print the session report as JSON
        #[arg(long)]
        report: bool,
    },
}

#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
pub struct TargetArgs {
    /// Window id as shown by `list`
    #[arg(long)]
    pub id: Option<u32>,

    /// Regular expression matched against window titles
    #[arg(long)]
    pub title: Option<String>,

    /// Application / process name (case-insensitive)
    #[arg(long)]
    pub app: Option<String>,
}

impl TargetArgs {
    pub fn selector(&self) -> Result<WindowSelector, CliError> {
        match (&self.id, &self.title, &self.app) {
            (Some(id), _, _) => Ok(WindowSelector::Id(*id)),
            (_, Some(title), _) => Ok(WindowSelector::Title(Regex::new(title)?)),
            (_, _, Some(app)) => Ok(WindowSelector::App(app.clone())),
            _ => Err(CliError::NoTarget),
        }
    }
}

#[derive(Args, Debug, Default)]
pub struct TuningArgs {
    /// Milliseconds to wait after each scroll
    #[arg(long)]
    pub delay_ms: Option<u64>,

    /// Maximum number of scroll gestures
    #[arg(long)]
    pub max_scrolls: Option<u32>,

    /// Expected overlap between pages, in pixels
    #[arg(long)]
    pub overlap_hint: Option<u32>,

    /// macOS: arrow presses per gesture instead of Page Down
    #[arg(long)]
    pub gesture_amount: Option<u32>,

    /// Give up on a single gesture after this many milliseconds
    #[arg(long)]
    pub gesture_timeout_ms: Option<u64>,
}

impl TuningArgs {
    /// Command-line flags win over every other config source.
    pub fn apply(&self, config: &mut SessionConfig) {
        if let Some(v) = self.delay_ms {
            config.scroll_delay_ms = v;
        }
        if let Some(v) = self.max_scrolls {
            config.max_scrolls = v;
        }
        if let Some(v) = self.overlap_hint {
            config.overlap_hint_pixels = v;
        }
        if let Some(v) = self.gesture_amount {
            config.gesture_amount = Some(v);
        }
        if let Some(v) = self.gesture_timeout_ms {
            config.gesture_timeout_ms = v;
        }
    }
}

#[derive(Args, Debug, Default)]
pub struct OutputArgs {
    /// Output file; the format follows the extension
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    /// Print the PNG as base64 on stdout
    #[arg(long)]
    pub base64: bool,

    /// Copy the image to the clipboard
    #[arg(long)]
    pub clipboard: bool,
}

impl OutputArgs {
    /// Hands the finished frame to every requested sink. Without any flag
    /// the image is written to the default output path.
    pub fn deliver(&self, image: &RgbaImage) -> Result<(), CliError> {
        if self.base64 {
            println!("{}", capture::encode_png_base64(image)?);
        }
        if self.clipboard {
            capture::copy_to_clipboard(image)?;
        }
        if self.out.is_some() || (!self.base64 && !self.clipboard) {
            let path = self.out.clone().unwrap_or_else(capture::default_output_path);
            let written = capture::save_frame(image, &path)?;
            if !self.base64 {
                println!("{}", written.display());
            }
        }
        Ok(())
    }
}

impl Cli {
    pub async fn execute(self) -> Result<(), CliError> {
        match self.command {
            Command::List { json } => list(json),
            Command::Shot {
                target,
                crop,
                output,
            } => {
                let window = capture::find_window(&target.selector()?)?;
                log::info!("[CAPTURE] Single shot of '{}' ({})", window.title, window.app_name);
                let frame = XcapFrameSource::new().capture_window_raw(window.handle())?;
                let frame = match crop {
                    Some(region) => capture::crop_frame(&frame, region)?,
                    None => frame,
                };
                output.deliver(&frame)
            }
            Command::Long {
                target,
                tuning,
                output,
                report,
            } => {
                let mut config = SessionConfig::load(self.config.as_deref())?;
                tuning.apply(&mut config);
                config.validate()?;

                let window = capture::find_window(&target.selector()?)?;
                log::info!("[SESSION] Target '{}' ({})", window.title, window.app_name);

                let actuator = scroll::platform_actuator(&config);
                let mut session = CaptureSession::new(XcapFrameSource::new(), actuator, config);
                let capture = session.run(window.handle()).await?;

                output.deliver(&capture.image)?;
                if report {
                    println!("{}", serde_json::to_string_pretty(&capture.report)?);
                }
                Ok(())
            }
        }
    }
}

fn list(json: bool) -> Result<(), CliError> {
    let windows = capture::list_windows()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&windows)?);
        return Ok(());
    }

    println!("{:>10}  {:>7}  {:<24}  TITLE", "ID", "PID", "APP");
    for w in &windows {
        println!("{:>10}  {:>7}  {:<24}  {}", w.id, w.pid, w.app_name, w.title);
    }
    Ok(())
}

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("Pick a window with --id, --title or --app")]
    NoTarget,

    #[error("Invalid --title pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Capture(#[from] capture::CaptureError),

    #[error(transparent)]
    Crop(#[from] capture::CropError),

    #[error(transparent)]
    Encode(#[from] capture::EncodeError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error("Failed to serialize output: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to start async runtime: {0}")]
    Runtime(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_long_capture_flags() {
        let cli = Cli::try_parse_from([
            "long-capture",
            "long",
            "--title",
            "Firefox$",
            "--delay-ms",
            "300",
            "--max-scrolls",
            "8",
            "--out",
            "page.png",
            "--report",
        ])
        .unwrap();

        let Command::Long {
            target,
            tuning,
            output,
            report,
        } = cli.command
        else {
            panic!("expected long subcommand");
        };

        assert!(matches!(target.selector().unwrap(), WindowSelector::Title(_)));
        assert!(report);
        assert_eq!(output.out, Some(PathBuf::from("page.png")));

        let mut config = SessionConfig::default();
        tuning.apply(&mut config);
        assert_eq!(config.scroll_delay_ms, 300);
        assert_eq!(config.max_scrolls, 8);
        assert_eq!(config.overlap_hint_pixels, 50);
    }

    #[test]
    fn target_is_required_and_exclusive() {
        assert!(Cli::try_parse_from(["long-capture", "long"]).is_err());
        assert!(
            Cli::try_parse_from(["long-capture", "shot", "--id", "3", "--app", "mail"]).is_err()
        );
    }

    #[test]
    fn parses_crop_region() {
        let cli =
            Cli::try_parse_from(["long-capture", "shot", "--id", "3", "--crop", "0,10,200,100"])
                .unwrap();
        let Command::Shot { crop, .. } = cli.command else {
            panic!("expected shot subcommand");
        };
        assert_eq!(
            crop,
            Some(Region {
                x: 0,
                y: 10,
                width: 200,
                height: 100
            })
        );
    }

    #[test]
    fn bad_title_pattern_is_reported() {
        let target = TargetArgs {
            id: None,
            title: Some("(unclosed".into()),
            app: None,
        };
        assert!(matches!(target.selector(), Err(CliError::InvalidPattern(_))));
    }
}
