//! Command-line argument parsing for imgc.
//!
//! This module provides a hand-rolled argument parser without external dependencies.

use std::path::PathBuf;

use image_compressor::{CompressorError, CompressorResult, ImageFormat};

/// Application version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name.
pub const NAME: &str = "imgc";

/// CLI configuration parsed from command-line arguments.
#[derive(Debug, Clone)]
pub struct Config {
    /// Input paths (files or directories).
    pub paths: Vec<PathBuf>,
    /// Output directory for compressed images.
    pub output_dir: PathBuf,
    /// Target format; `None` keeps each source format.
    pub format: Option<ImageFormat>,
    /// Quality on the 1-100 scale.
    pub quality: u32,
    /// Number of concurrent workers.
    pub jobs: Option<usize>,
    /// Ceiling on output width/height in pixels; 0 disables resizing.
    pub max_dimension: u32,
    /// Ceiling on output size in whole megabytes; 0 disables the cap.
    pub max_size_mb: u32,
    /// Pause between exported files, in milliseconds.
    pub delay_ms: u64,
    /// Print the summary as JSON instead of the report.
    pub json: bool,
    /// Show help message.
    pub help: bool,
    /// Show version.
    pub version: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            paths: Vec::new(),
            output_dir: PathBuf::from("compressed"),
            format: None,
            quality: 92,
            jobs: None,
            max_dimension: 4096,
            max_size_mb: 10,
            delay_ms: 0,
            json: false,
            help: false,
            version: false,
        }
    }
}

impl Config {
    /// Parse configuration from command-line arguments.
    pub fn parse<I, S>(args: I) -> CompressorResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut config = Config::default();
        let mut args = args.into_iter().peekable();

        // Skip the program name if present.
        args.next();

        while let Some(arg) = args.next() {
            let arg = arg.as_ref();

            if arg.starts_with("--") {
                // Long option.
                let opt = &arg[2..];

                if let Some((key, value)) = opt.split_once('=') {
                    // --option=value format.
                    config.handle_long_option_with_value(key, value)?;
                } else {
                    // --option or --option value format.
                    config.handle_long_option(opt, &mut args)?;
                }
            } else if arg.starts_with('-') && arg.len() > 1 {
                // Short option(s).
                let chars: Vec<char> = arg[1..].chars().collect();

                for (i, c) in chars.iter().enumerate() {
                    let is_last = i == chars.len() - 1;
                    config.handle_short_option(*c, is_last, &mut args)?;
                }
            } else {
                // Positional argument (path).
                config.paths.push(PathBuf::from(arg));
            }
        }

        if !config.help && !config.version && config.paths.is_empty() {
            return Err(CompressorError::validation("Missing argument: <PATHS>"));
        }

        Ok(config)
    }

    fn handle_long_option<I, S>(
        &mut self,
        opt: &str,
        args: &mut std::iter::Peekable<I>,
    ) -> CompressorResult<()>
    where
        I: Iterator<Item = S>,
        S: AsRef<str>,
    {
        match opt {
            "help" => self.help = true,
            "version" => self.version = true,
            "json" => self.json = true,
            "output-dir" => self.output_dir = PathBuf::from(take_value(args, "--output-dir <DIR>")?),
            "format" => self.format = Some(parse_format(&take_value(args, "--format <FORMAT>")?)?),
            "quality" => self.quality = parse_quality(&take_value(args, "--quality <N>")?)?,
            "jobs" => self.jobs = Some(parse_jobs(&take_value(args, "--jobs <N>")?)?),
            "max-dimension" => {
                self.max_dimension = parse_number(&take_value(args, "--max-dimension <PIXELS>")?, "--max-dimension")?
            }
            "max-size-mb" => {
                self.max_size_mb = parse_number(&take_value(args, "--max-size-mb <MB>")?, "--max-size-mb")?
            }
            "delay-ms" => {
                self.delay_ms = parse_number(&take_value(args, "--delay-ms <MS>")?, "--delay-ms")?
            }
            _ => {
                return Err(CompressorError::validation(format!("Unknown option: --{}", opt)));
            }
        }
        Ok(())
    }

    fn handle_long_option_with_value(&mut self, key: &str, value: &str) -> CompressorResult<()> {
        match key {
            "output-dir" => self.output_dir = PathBuf::from(value),
            "format" => self.format = Some(parse_format(value)?),
            "quality" => self.quality = parse_quality(value)?,
            "jobs" => self.jobs = Some(parse_jobs(value)?),
            "max-dimension" => self.max_dimension = parse_number(value, "--max-dimension")?,
            "max-size-mb" => self.max_size_mb = parse_number(value, "--max-size-mb")?,
            "delay-ms" => self.delay_ms = parse_number(value, "--delay-ms")?,
            _ => {
                return Err(CompressorError::validation(format!(
                    "Unknown option or option does not take a value: --{}",
                    key
                )));
            }
        }
        Ok(())
    }

    fn handle_short_option<I, S>(
        &mut self,
        c: char,
        is_last: bool,
        args: &mut std::iter::Peekable<I>,
    ) -> CompressorResult<()>
    where
        I: Iterator<Item = S>,
        S: AsRef<str>,
    {
        match c {
            'h' => self.help = true,
            'V' => self.version = true,
            'o' => {
                require_last(c, is_last)?;
                self.output_dir = PathBuf::from(take_value(args, "-o <DIR>")?);
            }
            'f' => {
                require_last(c, is_last)?;
                self.format = Some(parse_format(&take_value(args, "-f <FORMAT>")?)?);
            }
            'q' => {
                require_last(c, is_last)?;
                self.quality = parse_quality(&take_value(args, "-q <N>")?)?;
            }
            'j' => {
                require_last(c, is_last)?;
                self.jobs = Some(parse_jobs(&take_value(args, "-j <N>")?)?);
            }
            _ => {
                return Err(CompressorError::validation(format!("Unknown option: -{}", c)));
            }
        }
        Ok(())
    }
}

fn take_value<I, S>(args: &mut std::iter::Peekable<I>, usage: &str) -> CompressorResult<String>
where
    I: Iterator<Item = S>,
    S: AsRef<str>,
{
    args.next()
        .map(|value| value.as_ref().to_string())
        .ok_or_else(|| CompressorError::validation(format!("Missing value for {usage}")))
}

fn require_last(c: char, is_last: bool) -> CompressorResult<()> {
    if is_last {
        Ok(())
    } else {
        Err(CompressorError::validation(format!(
            "-{c} must be the last option in a combined flag"
        )))
    }
}

fn parse_format(value: &str) -> CompressorResult<ImageFormat> {
    value.parse()
}

/// Parse a quality value (1-100).
fn parse_quality(value: &str) -> CompressorResult<u32> {
    let quality: u32 = value.parse().map_err(|_| {
        CompressorError::validation(format!("'{}' is not a valid quality", value))
    })?;
    if (1..=100).contains(&quality) {
        Ok(quality)
    } else {
        Err(CompressorError::validation("Quality must be between 1 and 100"))
    }
}

/// Parse a jobs value (positive integer).
fn parse_jobs(value: &str) -> CompressorResult<usize> {
    let jobs: usize = value.parse().map_err(|_| {
        CompressorError::validation(format!("'{}' is not a valid number", value))
    })?;
    if jobs == 0 {
        Err(CompressorError::validation("Number of jobs must be at least 1"))
    } else {
        Ok(jobs)
    }
}

fn parse_number<T: std::str::FromStr>(value: &str, option: &str) -> CompressorResult<T> {
    value.parse().map_err(|_| {
        CompressorError::validation(format!("'{}' is not a valid value for {}", value, option))
    })
}

/// Generate the help message.
pub fn help_message() -> String {
    format!(
        r#"{} {} - Image Compressor

Compress images, convert their format and shrink oversized dimensions.

USAGE:
    {} [OPTIONS] <PATHS>...

ARGUMENTS:
    <PATHS>...    Image files or directories to process (at most 20 images per run)

OPTIONS:
    -o, --output-dir <DIR>      Directory for compressed images (default: compressed)
    -f, --format <FORMAT>       Convert to jpeg, png or webp (default: keep source format)
    -q, --quality <N>           Quality from 1 to 100 (default: 92)
    -j, --jobs <N>              Number of concurrent workers (default: 90% of CPU cores)
        --max-dimension <PIXELS>  Resize ceiling on width/height, 0 disables (default: 4096)
        --max-size-mb <MB>      Output size cap in megabytes, 0 disables (default: 10)
        --delay-ms <MS>         Pause between exported files (default: 0)
        --json                  Print the run summary as JSON
    -h, --help                  Print this help message
    -V, --version               Print version information

EXAMPLES:
    {} photo.jpg                      Compress one image into ./compressed/
    {} -q 70 ./photos/                Compress a directory at quality 70
    {} -f webp -o out/ *.png          Convert PNGs to WebP
    {} --max-dimension 1920 pic.jpg   Downscale anything larger than 1920px

SUPPORTED FORMATS:
    JPEG (.jpg, .jpeg)
    PNG  (.png)
    GIF  (.gif)
    BMP  (.bmp)
    WebP (.webp)
"#,
        NAME, VERSION, NAME, NAME, NAME, NAME, NAME
    )
}

/// Generate the version message.
pub fn version_message() -> String {
    format!("{} {}", NAME, VERSION)
}
