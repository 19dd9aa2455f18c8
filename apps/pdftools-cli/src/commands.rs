//! Subcommands

use crate::client::{BackendClient, Download};
use crate::config::Config;
use anyhow::{bail, Context};
use clap::{Args, Subcommand};
use pdftools_core::{
    format_page_spec, inspect_pdf, page_rotations, parse_page_spec, FileList, ImageFit,
    ImageLayout, Margins, Orientation, PageSize, PdfInfo, PdfStatus, RotationState, SplitMethod,
    SplitState, ToolRequest, Upload, ValidationError,
};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Resolve a page specification and show its preview groups (offline)
    Pages {
        file: PathBuf,
        /// e.g. "1-3, 5, 8-10"
        spec: String,
    },
    /// Split a PDF on the backend
    Split {
        file: PathBuf,
        #[command(flatten)]
        mode: SplitMode,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Merge two or more PDFs, in the given order. Repeated files are skipped.
    Merge {
        #[arg(required = true, num_args = 2..)]
        files: Vec<PathBuf>,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Compress a PDF
    Compress {
        file: PathBuf,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Remove the password from a PDF
    Unlock {
        file: PathBuf,
        #[arg(long)]
        password: String,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Rotate pages clockwise by quarter turns
    Rotate {
        file: PathBuf,
        /// Pages and angle, e.g. "1-3:90" or "all:-90". Repeatable.
        #[arg(long = "rotate", value_name = "PAGES:DEGREES", required = true)]
        rotations: Vec<String>,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Convert images to a PDF, one page per image in the given order
    Images {
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// A4, Letter, Legal or fit
        #[arg(long, default_value = "A4")]
        page_size: PageSize,
        #[arg(long, default_value = "portrait")]
        orientation: Orientation,
        /// none, small, medium, large or TOP,BOTTOM,LEFT,RIGHT in millimetres
        #[arg(long, default_value = "medium")]
        margins: Margins,
        /// fit, fill or center
        #[arg(long = "fit", default_value = "fit")]
        image_fit: ImageFit,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Report whether a PDF is password protected
    Status { file: PathBuf },
}

/// Exactly one split method
#[derive(Args, Debug, Clone, Default)]
#[group(required = true, multiple = false)]
pub struct SplitMode {
    /// Chunks of N pages, returned as a zip
    #[arg(long, value_name = "N")]
    pub per_file: Option<u32>,
    /// One inclusive range
    #[arg(long, value_name = "START-END")]
    pub range: Option<String>,
    /// Arbitrary pages as a page specification
    #[arg(long, value_name = "SPEC")]
    pub extract: Option<String>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct OutputArgs {
    /// Write the result to this path
    #[arg(short, long)]
    pub output: Option<PathBuf>,
    /// Directory for the server-suggested filename
    #[arg(long, default_value = ".")]
    pub out_dir: PathBuf,
}

/// Resolved specification and its preview groups
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PagesReport {
    pub specification: String,
    pub total_pages: u32,
    pub selected: usize,
    pub groups: Vec<Vec<u32>>,
}

impl fmt::Display for PagesReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Pages: {} ({} of {})",
            self.specification, self.selected, self.total_pages
        )?;
        let total = self.groups.len();
        for (index, group) in self.groups.iter().enumerate() {
            writeln!(f, "Group {}/{}: {}", index + 1, total, format_page_spec(group))?;
        }
        Ok(())
    }
}

/// Walk the working groups of a specification
pub fn pages_report(
    name: &str,
    info: &PdfInfo,
    spec: &str,
    group_size: usize,
) -> anyhow::Result<PagesReport> {
    let mut state = SplitState::<()>::new(group_size);
    state.load_document(name, info.clone());
    state.apply_specification(spec)?;

    let mut groups = vec![state.visible_pages()];
    while state.navigate(1) {
        groups.push(state.visible_pages());
    }

    Ok(PagesReport {
        specification: state.selection().to_spec(),
        total_pages: info.page_count,
        selected: state.selection().len(),
        groups,
    })
}

/// Build the split method, validating page numbers against the document
pub fn split_method(mode: &SplitMode, total_pages: u32) -> anyhow::Result<SplitMethod> {
    if let Some(n) = mode.per_file {
        return Ok(SplitMethod::PagesPerFile(n));
    }

    if let Some(range) = &mode.range {
        let (start, end) = range
            .split_once('-')
            .with_context(|| format!("Expected START-END, got '{}'", range))?;
        let start: u32 = start
            .trim()
            .parse()
            .with_context(|| format!("Invalid start page in '{}'", range))?;
        let end: u32 = end
            .trim()
            .parse()
            .with_context(|| format!("Invalid end page in '{}'", range))?;
        if end > total_pages {
            return Err(ValidationError::OutOfRange {
                page: i64::from(end),
                total_pages,
            }
            .into());
        }
        return Ok(SplitMethod::PageRange { start, end });
    }

    match &mode.extract {
        Some(spec) => Ok(SplitMethod::extract(spec, total_pages)?),
        None => bail!("Choose one of --per-file, --range or --extract"),
    }
}

/// Parse `PAGES:DEGREES` into the pages and a multiple of 90
pub fn parse_rotation(arg: &str, total_pages: u32) -> anyhow::Result<(Vec<u32>, i64)> {
    let (pages, degrees) = arg
        .rsplit_once(':')
        .with_context(|| format!("Expected PAGES:DEGREES, got '{}'", arg))?;
    let degrees: i64 = degrees
        .trim()
        .parse()
        .with_context(|| format!("Invalid angle in '{}'", arg))?;
    if degrees % 90 != 0 {
        bail!("Rotation must be a multiple of 90 degrees, got {}", degrees);
    }

    let pages = match pages.trim() {
        "all" => (1..=total_pages).collect(),
        spec => parse_page_spec(spec, total_pages)?,
    };
    Ok((pages, degrees))
}

/// Apply every `--rotate` argument on top of the stored rotations
pub fn rotation_plan(base: Vec<u32>, args: &[String]) -> anyhow::Result<RotationState> {
    let mut state = RotationState::new(base);
    for arg in args {
        let (pages, degrees) = parse_rotation(arg, state.page_count())?;
        state.rotate_pages(&pages, degrees)?;
    }
    Ok(state)
}

/// Read files into `list`, warning about the ones it skips
pub fn collect_files(mut list: FileList, paths: &[PathBuf]) -> anyhow::Result<FileList> {
    let uploads = paths
        .iter()
        .map(|path| read_upload(path))
        .collect::<anyhow::Result<Vec<_>>>()?;

    let report = list.add(uploads)?;
    for name in &report.duplicates {
        warn!(%name, "Skipping file already in the list");
    }
    for (name, reason) in &report.rejected {
        warn!(%name, %reason, "Skipping file");
    }
    Ok(list)
}

pub fn read_upload(path: &Path) -> anyhow::Result<Upload> {
    let bytes = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .with_context(|| format!("Not a file: {}", path.display()))?;
    Ok(Upload::new(name, bytes))
}

/// Where a download ends up
///
/// An explicit `--output` wins; otherwise the suggested name is reduced to
/// its last path component and placed in `--out-dir`.
pub fn output_path(download: &Download, output: &OutputArgs) -> anyhow::Result<PathBuf> {
    if let Some(path) = &output.output {
        return Ok(path.clone());
    }
    let name = Path::new(&download.filename)
        .file_name()
        .with_context(|| format!("Unusable filename '{}'", download.filename))?;
    Ok(output.out_dir.join(name))
}

fn save(download: &Download, output: &OutputArgs) -> anyhow::Result<PathBuf> {
    let path = output_path(download, output)?;
    fs::write(&path, &download.bytes)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    info!(path = %path.display(), "Saved");
    Ok(path)
}

async fn transform(
    config: &Config,
    request: ToolRequest,
    output: &OutputArgs,
) -> anyhow::Result<()> {
    let client = BackendClient::new(&config.backend)?;
    let download = client.submit(&request).await?;
    let path = save(&download, output)?;
    println!("{}", path.display());
    Ok(())
}

pub async fn run(command: Command, config: &Config) -> anyhow::Result<()> {
    match command {
        Command::Pages { file, spec } => {
            let upload = read_upload(&file)?;
            let info = inspect_pdf(&upload.bytes)?;
            let report = pages_report(&upload.name, &info, &spec, config.preview.group_size)?;
            print!("{}", report);
        }
        Command::Split { file, mode, output } => {
            let upload = read_upload(&file)?;
            let info = inspect_pdf(&upload.bytes)?;
            let method = split_method(&mode, info.page_count)?;
            info!(method = method.name(), pages = info.page_count, "Splitting {}", upload.name);
            let request = ToolRequest::Split {
                file: upload,
                method,
            };
            transform(config, request, &output).await?;
        }
        Command::Merge { files, output } => {
            let files = collect_files(FileList::pdfs(), &files)?.into_files();
            info!(count = files.len(), "Merging");
            transform(config, ToolRequest::Merge { files }, &output).await?;
        }
        Command::Compress { file, output } => {
            let request = ToolRequest::Compress {
                file: read_upload(&file)?,
            };
            transform(config, request, &output).await?;
        }
        Command::Unlock {
            file,
            password,
            output,
        } => {
            let request = ToolRequest::Unlock {
                file: read_upload(&file)?,
                password,
            };
            transform(config, request, &output).await?;
        }
        Command::Rotate {
            file,
            rotations,
            output,
        } => {
            let upload = read_upload(&file)?;
            let state = rotation_plan(page_rotations(&upload.bytes)?, &rotations)?;
            if !state.is_modified() {
                warn!("Rotations cancel out, the pages keep their orientation");
            }
            let request = ToolRequest::Rotate {
                file: upload,
                rotations: state.final_rotations(),
            };
            transform(config, request, &output).await?;
        }
        Command::Images {
            files,
            page_size,
            orientation,
            margins,
            image_fit,
            output,
        } => {
            let layout = ImageLayout {
                page_size,
                orientation,
                margins,
                image_fit,
            };
            let images = collect_files(FileList::images(), &files)?.into_files();
            info!(count = images.len(), %layout, "Converting images");
            transform(config, ToolRequest::ImagesToPdf { images, layout }, &output).await?;
        }
        Command::Status { file } => {
            let client = BackendClient::new(&config.backend)?;
            match client.check_status(read_upload(&file)?).await? {
                PdfStatus::Protected => println!("protected"),
                PdfStatus::Unprotected => println!("unprotected"),
                PdfStatus::Unreadable(reason) => println!("unreadable: {}", reason),
            }
        }
    }
    Ok(())
}
