use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use lsconvert::{
    resolve_and_convert, Conversion, ConversionRequest, ConvertOptions, Converter,
    DocumentResolver, IdGenerator, ImageDimensions, InputFormat, Level, Resolved, ResolvedImage,
    SequentialIdGenerator, SourceResolver, UuidIdGenerator, DEFAULT_ID_LENGTH,
};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(
    name = "lsconvert",
    about = "Convert OCR output into Label Studio tasks",
    version,
    author
)]
struct Cli {
    /// Show debug logs
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert one OCR document
    Convert {
        /// Input format (tesseract, abbyy, transkribus, or tabular, hierarchical, alto)
        #[arg(short, long)]
        format: String,

        /// Image the OCR ran on (path or URL)
        #[arg(short, long, required_unless_present = "size", conflicts_with = "size")]
        image: Option<String>,

        /// Image size as WIDTHxHEIGHT, instead of reading an image
        #[arg(short, long)]
        size: Option<String>,

        /// OCR output (path or URL; .json, .xml or .tsv)
        #[arg(short = 'n', long)]
        input: String,

        /// URL recorded as the task's image
        #[arg(short, long)]
        url: Option<String>,

        /// Tesseract level to convert (1-5 or page, block, paragraph, line, word)
        #[arg(short, long)]
        level: Option<Level>,

        #[command(flatten)]
        output: OutputArgs,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output_file: Option<PathBuf>,
    },

    /// Convert every request of a JSON manifest
    Batch {
        /// JSON array of {format, image, input, url?, options?}
        manifest: PathBuf,

        /// Directory receiving one <index>.json task per request
        #[arg(short = 'd', long)]
        output_dir: PathBuf,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// List Tesseract levels
    Levels,

    /// List supported input formats
    Formats,
}

#[derive(clap::Args)]
struct OutputArgs {
    /// Pretty-print the task JSON
    #[arg(short, long)]
    pretty: bool,

    /// Length of generated region identifiers
    #[arg(long, default_value_t = DEFAULT_ID_LENGTH)]
    id_length: usize,

    /// Number regions (region-0, region-1, ...) instead of random identifiers
    #[arg(long)]
    sequential_ids: bool,
}

impl OutputArgs {
    fn id_generator(&self) -> Box<dyn IdGenerator> {
        if self.sequential_ids {
            Box::new(SequentialIdGenerator::default())
        } else {
            Box::new(UuidIdGenerator::with_length(self.id_length))
        }
    }

    fn render(&self, conversion: &Conversion) -> Result<String> {
        let text = if self.pretty {
            serde_json::to_string_pretty(&conversion.result)
        } else {
            serde_json::to_string(&conversion.result)
        };
        text.context("Failed to serialize task")
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Convert {
            format,
            image,
            size,
            input,
            url,
            level,
            output,
            output_file,
        } => {
            let mut options = ConvertOptions::default();
            if let Some(level) = level {
                options = options.with_target_level(level);
            }
            let converter = Converter::from_tag(&format)?
                .with_options(options)
                .with_id_generator(output.id_generator());
            let resolver = SourceResolver::new()?;

            let conversion = match (image, size) {
                (Some(image), _) => {
                    resolve_and_convert(&converter, &resolver, &image, &input, url.as_deref())
                        .with_context(|| format!("Failed to convert {input}"))?
                }
                (None, Some(size)) => {
                    let image = Resolved::Parsed(ResolvedImage::in_memory(parse_size(&size)?));
                    let document = resolver.resolve_document(&input)?;
                    converter
                        .convert(&image, &document, url.as_deref())
                        .with_context(|| format!("Failed to convert {input}"))?
                }
                (None, None) => bail!("Either --image or --size is required"),
            };

            report(&conversion);
            let json = output.render(&conversion)?;
            match output_file {
                Some(path) => {
                    write_task(&path, &json)?;
                    println!("✓ Task written to: {}", path.display());
                }
                None => println!("{json}"),
            }
        }

        Commands::Batch {
            manifest,
            output_dir,
            output,
        } => {
            let text = fs::read_to_string(&manifest)
                .with_context(|| format!("Failed to read manifest {}", manifest.display()))?;
            let requests: Vec<ConversionRequest> = serde_json::from_str(&text)
                .with_context(|| format!("Invalid manifest {}", manifest.display()))?;
            fs::create_dir_all(&output_dir).with_context(|| {
                format!("Failed to create output directory {}", output_dir.display())
            })?;

            let resolver = SourceResolver::new()?;
            let mut failed = 0;
            for (index, request) in requests.iter().enumerate() {
                debug!("Request {index}: {} {}", request.format, request.input);
                match request.execute_with_ids(&resolver, output.id_generator()) {
                    Ok(conversion) => {
                        report(&conversion);
                        let path = output_dir.join(format!("{index}.json"));
                        write_task(&path, &output.render(&conversion)?)?;
                    }
                    Err(e) => {
                        error!("Request {index} failed: {e}");
                        failed += 1;
                    }
                }
            }

            let converted = requests.len() - failed;
            println!(
                "✓ Converted {converted} of {} requests into {}",
                requests.len(),
                output_dir.display()
            );
            if failed > 0 {
                bail!("{failed} of {} conversions failed", requests.len());
            }
        }

        Commands::Levels => {
            for level in Level::ALL {
                println!("{}\t{}\t{}", level.ordinal(), level.name(), level.column());
            }
        }

        Commands::Formats => {
            for format in InputFormat::ALL {
                println!("{}\t{}", format.tag(), format.engine_name());
            }
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "lsconvert=debug"
    } else {
        "lsconvert=info"
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn report(conversion: &Conversion) {
    for diagnostic in &conversion.diagnostics {
        warn!("{diagnostic}");
    }
    info!(
        "Converted {} regions (score {:.3})",
        conversion.result.regions.len(),
        conversion.result.document_score
    );
}

fn parse_size(size: &str) -> Result<ImageDimensions> {
    let (width, height) = size
        .split_once(['x', 'X'])
        .with_context(|| format!("Invalid size '{size}', expected WIDTHxHEIGHT"))?;
    let width = width
        .trim()
        .parse()
        .with_context(|| format!("Invalid width in '{size}'"))?;
    let height = height
        .trim()
        .parse()
        .with_context(|| format!("Invalid height in '{size}'"))?;
    Ok(ImageDimensions::new(width, height)?)
}

fn write_task(path: &Path, json: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }
    fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))
}
