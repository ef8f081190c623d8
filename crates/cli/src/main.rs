use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
    sync::{
        Arc, Mutex,
        atomic::{AtomicU32, Ordering},
    },
    time::Instant,
};

use clap::{
    ArgAction, Args, ColorChoice, CommandFactory, FromArgMatches, Parser, Subcommand,
    builder::styling::{AnsiColor, Color, Style, Styles},
};
use rayon::{ThreadPoolBuilder, prelude::*};
use regex::Regex;
use serde::Serialize;

use stimage::{
    Curve, DataField, MetadataMap, Page, PageKind, Sm3Page, SpmFile, sm3, sm4,
    sm4::structs::DataType,
};

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

const VERSION: &str = "0.1.0";

const ANSI_RESET: &str = "\x1b[0m";
const ANSI_GREEN: &str = "\x1b[1;32m";
const ANSI_RED: &str = "\x1b[1;31m";

const AFTER_HELP: &str = "
\x1b[1;33mQUICK REFERENCE\x1b[0m

\x1b[1;32mUSAGE:\x1b[0m
  \x1b[96mstimage list\x1b[0m PATHS...
  \x1b[96mstimage meta\x1b[0m PATHS... [--pattern REGEX]
  \x1b[96mstimage export\x1b[0m PATHS... -o, --output-path DIR [--data] [--cores N]

\x1b[1;32mEXAMPLES:\x1b[0m
  \x1b[96mstimage list\x1b[0m scan_0042.sm4
  \x1b[96mstimage meta\x1b[0m scan_0042.sm4 --pattern 'PLLPro'
  \x1b[96mstimage export\x1b[0m data/*.sm4 -o out --data --cores 8
";

fn cli_styles() -> Styles {
    Styles::styled().literal(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Cyan))))
}

#[derive(Parser)]
#[command(
    name = "stimage",
    version = VERSION,
    arg_required_else_help = true,
    disable_help_subcommand = true,
    disable_version_flag = true
)]
struct Cli {
    #[arg(short = 'v', long = "version", action = ArgAction::SetTrue, global = true)]
    version: bool,

    #[command(subcommand)]
    cmd: Option<Cmd>,
}

#[derive(Subcommand)]
enum Cmd {
    /// One table row per page of each input file
    List(ListArgs),
    /// Flattened page and PRM metadata
    Meta(MetaArgs),
    /// JSON documents, one per input file
    Export(ExportArgs),
}

#[derive(Args)]
struct ListArgs {
    #[arg(value_name = "PATHS", required = true)]
    paths: Vec<PathBuf>,
}

#[derive(Args)]
struct MetaArgs {
    #[arg(value_name = "PATHS", required = true)]
    paths: Vec<PathBuf>,

    /// Only keys matching this regex
    #[arg(long = "pattern")]
    pattern: Option<String>,
}

#[derive(Args)]
struct ExportArgs {
    #[arg(value_name = "PATHS", required = true)]
    paths: Vec<PathBuf>,

    #[arg(short = 'o', long = "output-path", required = true)]
    output_path: PathBuf,

    /// Include calibrated samples (image grids and curves)
    #[arg(long, default_value_t = false, action = ArgAction::SetTrue)]
    data: bool,

    #[arg(
        long = "cores",
        default_value_t = 1u16,
        value_parser = clap::value_parser!(u16).range(1..=1024)
    )]
    cores: u16,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let mut cmd = Cli::command();
    cmd = cmd
        .styles(cli_styles())
        .color(ColorChoice::Auto)
        .after_help(AFTER_HELP);

    let matches = cmd.get_matches();
    let cli = Cli::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());

    if cli.version {
        println!("{VERSION}");
        return Ok(());
    }

    match cli.cmd {
        Some(Cmd::List(cmd)) => list(cmd).map_err(|e| e.into()),
        Some(Cmd::Meta(cmd)) => meta(cmd).map_err(|e| e.into()),
        Some(Cmd::Export(cmd)) => export(cmd).map_err(|e| e.into()),
        None => Ok(()),
    }
}

fn basename(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn format_name(file: &SpmFile) -> &'static str {
    match file {
        SpmFile::Sm3(_) => "SM3",
        SpmFile::Sm4(_) => "SM4",
    }
}

fn page_count(file: &SpmFile) -> usize {
    match file {
        SpmFile::Sm4(f) => f.pages.len(),
        SpmFile::Sm3(f) => f.pages.len(),
    }
}

struct PageRow {
    index: usize,
    kind: String,
    page_type: String,
    x_size: u32,
    y_size: u32,
    scan_dir: String,
    label: String,
}

fn page_rows(file: &SpmFile) -> Vec<PageRow> {
    match file {
        SpmFile::Sm4(f) => f
            .pages
            .iter()
            .enumerate()
            .map(|(index, p)| PageRow {
                index,
                kind: format!("{:?}", p.data_type),
                page_type: p.header.page_type.name().unwrap_or("?").to_string(),
                x_size: p.header.x_size,
                y_size: p.header.y_size,
                scan_dir: p.header.scan_dir.name().unwrap_or("?").to_string(),
                label: p.label().unwrap_or("").to_string(),
            })
            .collect(),
        SpmFile::Sm3(f) => f
            .pages
            .iter()
            .enumerate()
            .map(|(index, p)| PageRow {
                index,
                kind: format!("{:?}", p.kind),
                page_type: p.page_type.name().unwrap_or("?").to_string(),
                x_size: p.x_size,
                y_size: p.y_size,
                scan_dir: p.scan_dir.name().unwrap_or("?").to_string(),
                label: p.label().unwrap_or("").to_string(),
            })
            .collect(),
    }
}

fn list(cmd: ListArgs) -> Result<(), String> {
    let mut failed = 0u32;
    for path in &cmd.paths {
        let name = basename(path);
        let bytes = match fs::read(path) {
            Ok(v) => v,
            Err(e) => {
                failed += 1;
                eprintln!("{ANSI_RED}[error]{ANSI_RESET} {name}: read failed: {e}");
                continue;
            }
        };
        let file = match stimage::parse(&bytes) {
            Ok(f) => f,
            Err(e) => {
                failed += 1;
                eprintln!("{ANSI_RED}[error]{ANSI_RESET} {name}: {e}");
                continue;
            }
        };

        println!(
            "{ANSI_GREEN}{name}{ANSI_RESET} ({}, {} pages)",
            format_name(&file),
            page_count(&file)
        );
        println!(
            "  {:<5} {:<10} {:<28} {:>9} {:<6} label",
            "page", "kind", "type", "size", "dir"
        );
        for row in page_rows(&file) {
            println!(
                "  {:<5} {:<10} {:<28} {:>4}x{:<4} {:<6} {}",
                row.index, row.kind, row.page_type, row.x_size, row.y_size, row.scan_dir, row.label
            );
        }
    }
    finish(failed)
}

fn page_meta_sorted(file: &SpmFile, index: usize) -> BTreeMap<String, String> {
    let map: MetadataMap = match file {
        SpmFile::Sm4(f) => sm4::utilities::metadata::page_metadata(&f.pages[index], f.prm.as_ref()),
        SpmFile::Sm3(f) => sm3::metadata::page_metadata(&f.pages[index]),
    };
    map.into_iter().collect()
}

fn meta(cmd: MetaArgs) -> Result<(), String> {
    let filter = match cmd.pattern.as_deref() {
        Some(p) => Some(Regex::new(p).map_err(|e| format!("invalid regex: {e}"))?),
        None => None,
    };

    let mut failed = 0u32;
    for path in &cmd.paths {
        let name = basename(path);
        let parsed = fs::read(path).map_err(|e| format!("read failed: {e}"));
        let bytes = match parsed {
            Ok(v) => v,
            Err(e) => {
                failed += 1;
                eprintln!("{ANSI_RED}[error]{ANSI_RESET} {name}: {e}");
                continue;
            }
        };
        let file = match stimage::parse(&bytes) {
            Ok(f) => f,
            Err(e) => {
                failed += 1;
                eprintln!("{ANSI_RED}[error]{ANSI_RESET} {name}: {e}");
                continue;
            }
        };

        println!("{ANSI_GREEN}{name}{ANSI_RESET}");
        for index in 0..page_count(&file) {
            for (key, value) in page_meta_sorted(&file, index) {
                if filter.as_ref().is_some_and(|re| !re.is_match(&key)) {
                    continue;
                }
                println!("  page {index}::{key} = {value}");
            }
        }
    }
    finish(failed)
}

#[derive(Serialize)]
struct ExportDoc {
    source: String,
    format: &'static str,
    page_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    prm: Option<BTreeMap<String, String>>,
    pages: Vec<PageDoc>,
}

#[derive(Serialize)]
struct PageDoc {
    index: usize,
    id: String,
    kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    page_type: Option<&'static str>,
    x_size: u32,
    y_size: u32,
    x_scale: f64,
    y_scale: f64,
    z_scale: f64,
    z_offset: f64,
    metadata: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    field: Option<DataField>,
    #[serde(skip_serializing_if = "Option::is_none")]
    curves: Option<Vec<Curve>>,
}

fn hex_id(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

fn sm4_page_doc(page: &Page, index: usize, prm: Option<&MetadataMap>, with_data: bool) -> PageDoc {
    let is_image = page.data_type == DataType::Image;
    PageDoc {
        index,
        id: hex_id(&page.id),
        kind: format!("{:?}", page.data_type),
        page_type: page.header.page_type.name(),
        x_size: page.header.x_size,
        y_size: page.header.y_size,
        x_scale: page.header.x_scale,
        y_scale: page.header.y_scale,
        z_scale: page.header.z_scale,
        z_offset: page.header.z_offset,
        metadata: sm4::utilities::metadata::page_metadata(page, prm)
            .into_iter()
            .collect(),
        field: (with_data && is_image).then(|| page.to_field()),
        curves: (with_data && !is_image).then(|| page.to_curves()),
    }
}

fn sm3_page_doc(page: &Sm3Page, index: usize, with_data: bool) -> PageDoc {
    let is_image = page.kind == PageKind::Image;
    PageDoc {
        index,
        id: hex_id(&page.page_id),
        kind: format!("{:?}", page.kind),
        page_type: page.page_type.name(),
        x_size: page.x_size,
        y_size: page.y_size,
        x_scale: page.x_scale,
        y_scale: page.y_scale,
        z_scale: page.z_scale,
        z_offset: page.z_offset,
        metadata: sm3::metadata::page_metadata(page).into_iter().collect(),
        field: (with_data && is_image).then(|| page.to_field()),
        curves: (with_data && !is_image).then(|| page.to_curves()),
    }
}

fn export_doc(file: &SpmFile, source: &str, with_data: bool) -> ExportDoc {
    let pages = match file {
        SpmFile::Sm4(f) => f
            .pages
            .iter()
            .enumerate()
            .map(|(i, p)| sm4_page_doc(p, i, f.prm.as_ref(), with_data))
            .collect(),
        SpmFile::Sm3(f) => f
            .pages
            .iter()
            .enumerate()
            .map(|(i, p)| sm3_page_doc(p, i, with_data))
            .collect(),
    };
    ExportDoc {
        source: source.to_string(),
        format: format_name(file),
        page_count: page_count(file),
        prm: match file {
            SpmFile::Sm4(f) => f.prm.as_ref().map(|m| m.clone().into_iter().collect()),
            SpmFile::Sm3(_) => None,
        },
        pages,
    }
}

fn export(cmd: ExportArgs) -> Result<(), String> {
    fs::create_dir_all(&cmd.output_path).map_err(|e| format!("create output dir failed: {e}"))?;

    let pool = ThreadPoolBuilder::new()
        .num_threads(cmd.cores as usize)
        .build()
        .map_err(|e| format!("rayon thread pool init failed: {e}"))?;

    let t_all = Instant::now();
    let ok = Arc::new(AtomicU32::new(0));
    let failed = Arc::new(AtomicU32::new(0));
    let print_lock = Arc::new(Mutex::new(()));

    pool.install(|| {
        cmd.paths.par_iter().for_each(|path| {
            match export_one(path, &cmd.output_path, cmd.data) {
                Ok(out) => {
                    ok.fetch_add(1, Ordering::Relaxed);
                    let _g = print_lock.lock().unwrap_or_else(|e| e.into_inner());
                    println!(
                        "{ANSI_GREEN}[ok]{ANSI_RESET} {} -> {}",
                        basename(path),
                        out.display()
                    );
                }
                Err(e) => {
                    failed.fetch_add(1, Ordering::Relaxed);
                    let _g = print_lock.lock().unwrap_or_else(|e| e.into_inner());
                    eprintln!("{ANSI_RED}[error]{ANSI_RESET} {e}");
                }
            }
        });
    });

    let ok = ok.load(Ordering::Relaxed);
    let failed = failed.load(Ordering::Relaxed);
    println!(
        "exported {ok} file(s), {failed} failed in {:.2}s",
        t_all.elapsed().as_secs_f64()
    );
    finish(failed)
}

fn export_one(path: &Path, output_root: &Path, with_data: bool) -> Result<PathBuf, String> {
    let name = basename(path);
    let bytes = fs::read(path).map_err(|e| format!("{name}: read failed: {e}"))?;
    let file = stimage::parse(&bytes).map_err(|e| format!("{name}: {e}"))?;
    let doc = export_doc(&file, &name, with_data);

    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "out".to_string());
    let out_path = output_root.join(format!("{stem}.json"));
    let json = serde_json::to_string_pretty(&doc).map_err(|e| format!("json failed: {e}"))?;
    fs::write(&out_path, json).map_err(|e| format!("write {} failed: {e}", out_path.display()))?;
    Ok(out_path)
}

fn finish(failed: u32) -> Result<(), String> {
    if failed > 0 {
        Err(format!("{failed} input file(s) failed"))
    } else {
        Ok(())
    }
}
