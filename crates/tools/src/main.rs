use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use chrono::{SecondsFormat, Utc};
use clap::Parser;
use starmap_core::{
    DistributionMode, GeneratedSector, GenerationRequest, GridSize, ReferenceTables, SectorDocument,
    generate_sector, generate_sector_block,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Seed string shared by every sector of one galaxy
    #[arg(short, long, default_value = "SMOKESEED")]
    seed: String,
    #[arg(long, default_value_t = 10)]
    width: u32,
    #[arg(long, default_value_t = 10)]
    height: u32,
    /// Density preset name (ignored with --count or --min/--max)
    #[arg(short, long, default_value = "standard")]
    preset: String,
    /// Exact number of standard systems
    #[arg(short, long, conflicts_with_all = ["min", "max"])]
    count: Option<u32>,
    #[arg(long, requires = "max")]
    min: Option<u32>,
    #[arg(long, requires = "min")]
    max: Option<u32>,
    /// Cluster systems around density centers instead of spreading them
    #[arg(long)]
    clustered: bool,
    #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
    sector_q: i32,
    #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
    sector_r: i32,
    /// TOML generation request; replaces every request flag above
    #[arg(long)]
    config: Option<PathBuf>,
    /// Directory of reference table overrides
    #[arg(long)]
    tables: Option<PathBuf>,
    /// Output file; stdout when omitted
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// Also generate every sector within this many steps of the requested one
    #[arg(long, default_value_t = 0)]
    span: u32,
    /// Document timestamp; defaults to the current UTC time
    #[arg(long)]
    timestamp: Option<String>,
}

impl Args {
    fn request(&self) -> Result<GenerationRequest> {
        if let Some(path) = &self.config {
            let text = fs::read_to_string(path)
                .with_context(|| format!("Failed to read request file: {}", path.display()))?;
            return toml::from_str(&text)
                .with_context(|| format!("Failed to parse request file: {}", path.display()));
        }

        let grid = GridSize::new(self.width, self.height);
        let request = match (self.count, self.min, self.max) {
            (Some(count), _, _) => GenerationRequest::manual(&self.seed, grid, count),
            (None, Some(min), Some(max)) => GenerationRequest::range(&self.seed, grid, min, max),
            _ => GenerationRequest::preset(&self.seed, grid, &self.preset),
        };
        let distribution = if self.clustered { DistributionMode::Clustered } else { DistributionMode::Uniform };
        Ok(request.with_distribution(distribution).with_sector(self.sector_q, self.sector_r))
    }
}

fn load_tables(dir: Option<&Path>) -> Result<ReferenceTables> {
    match dir {
        Some(dir) => ReferenceTables::from_dir(dir)
            .with_context(|| format!("Failed to load reference tables from {}", dir.display())),
        None => Ok(ReferenceTables::builtin()),
    }
}

/// Generates the requested sector, plus its neighbors out to `span`, q-major.
fn generate(request: &GenerationRequest, tables: &ReferenceTables, span: u32) -> Result<Vec<GeneratedSector>> {
    if span == 0 {
        return Ok(vec![generate_sector(request, tables)]);
    }
    let span = i32::try_from(span).context("Span is too large")?;
    let center = request.sector();
    Ok(generate_sector_block(
        request,
        tables,
        center.q - span..=center.q + span,
        center.r - span..=center.r + span,
    ))
}

/// A single document, or an array of documents when more than one sector was
/// generated.
fn render(sectors: &[GeneratedSector], request: &GenerationRequest, timestamp: &str) -> Result<String> {
    let mut documents: Vec<SectorDocument> = sectors
        .iter()
        .map(|sector| SectorDocument::from_sector(sector, request, timestamp))
        .collect();
    if documents.len() == 1 {
        if let Some(document) = documents.pop() {
            return document.to_json_string().context("Failed to serialize sector document");
        }
    }
    serde_json::to_string_pretty(&documents).context("Failed to serialize sector documents")
}

/// Writes through a sibling temp file so readers never see a partial document.
fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, contents).with_context(|| format!("Failed to write {}", tmp.display()))?;
    fs::rename(&tmp, path).with_context(|| format!("Failed to move output into {}", path.display()))?;
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let tables = load_tables(args.tables.as_deref())?;
    let request = args.request()?;
    if let Err(error) = request.validate(&tables) {
        bail!("Invalid generation request: {error}");
    }

    let timestamp =
        args.timestamp.clone().unwrap_or_else(|| Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true));
    let sectors = generate(&request, &tables, args.span)?;
    for sector in &sectors {
        info!(sector = %sector.sector, systems = sector.system_count(), "generated");
        eprintln!("Sector {} fingerprint: {:016x}", sector.sector, sector.fingerprint());
    }
    let json = render(&sectors, &request, &timestamp)?;

    match &args.output {
        Some(path) => {
            write_atomic(path, &json)?;
            eprintln!("Wrote {}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use starmap_core::SectorCoord;

    use super::*;

    fn args(extra: &[&str]) -> Args {
        let mut argv = vec!["sectorgen"];
        argv.extend_from_slice(extra);
        Args::parse_from(argv)
    }

    #[test]
    fn flags_build_each_density_mode() {
        let manual = args(&["--count", "12"]).request().expect("manual request");
        assert_eq!(manual.manual_count, Some(12));

        let range = args(&["--min", "4", "--max", "9", "--clustered"]).request().expect("range request");
        assert_eq!(range.range_limits.map(|limits| (limits.min, limits.max)), Some((4, 9)));
        assert_eq!(range.distribution_mode, DistributionMode::Clustered);

        let preset = args(&["--preset", "dense", "--sector-q", "-3"]).request().expect("preset request");
        assert_eq!(preset.density_preset.as_deref(), Some("dense"));
        assert_eq!(preset.sector_q, -3);
    }

    #[test]
    fn config_file_replaces_flags() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("request.toml");
        fs::write(
            &path,
            "seed = \"FROMFILE\"\ndensityMode = \"manual\"\nmanualCount = 5\nsectorR = 2\n\n[gridSize]\nwidth = 6\nheight = 4\n",
        )
        .expect("write request");

        let request = args(&["--config", path.to_str().expect("utf-8 path"), "--count", "40"])
            .request()
            .expect("request from file");
        assert_eq!(request, GenerationRequest::manual("FROMFILE", GridSize::new(6, 4), 5).with_sector(0, 2));
    }

    #[test]
    fn atomic_write_leaves_only_the_final_document() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("sector.json");
        let tables = ReferenceTables::builtin();
        let request = GenerationRequest::preset("ATOMIC", GridSize::new(6, 6), "standard");

        let sectors = generate(&request, &tables, 0).expect("generate");
        let json = render(&sectors, &request, "2026-01-01T00:00:00Z").expect("render");
        write_atomic(&path, &json).expect("write");

        assert!(!path.with_extension("json.tmp").exists());
        let written = fs::read_to_string(&path).expect("read back");
        let document = SectorDocument::from_json_str(&written).expect("parse document");
        assert_eq!(document.generator_settings, request);
        assert_eq!(document.timestamp, "2026-01-01T00:00:00Z");
    }

    #[test]
    fn span_renders_one_document_per_sector() {
        let tables = ReferenceTables::builtin();
        let request = GenerationRequest::preset("SPAN", GridSize::new(5, 5), "sparse").with_sector(-1, 1);
        let sectors = generate(&request, &tables, 1).expect("generate");
        let json = render(&sectors, &request, "2026-01-01T00:00:00Z").expect("render");
        let documents: Vec<SectorDocument> = serde_json::from_str(&json).expect("document array");

        assert_eq!(documents.len(), 9);
        assert_eq!(documents[0].generator_settings.sector(), SectorCoord::new(-2, 0));
    }
}
