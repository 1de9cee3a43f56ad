use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::{ArgAction, Parser, Subcommand};
use handlebars::Handlebars;
use serde::{Deserialize, Serialize};
use sheet_packer_core::config::{RotationPolicy, ScoreWeights, SortOrder};
use sheet_packer_core::{Meta, PackResult, PackerConfig, SheetRequest, pack_sheets};
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(
    name = "sheet-packer",
    about = "Lay out rectangular sheets in a fixed-width strip cut into sections",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action=ArgAction::Count, global=true, help_heading = "Logging")]
    verbose: u8,
    /// Quiet mode (overrides verbose)
    #[arg(
        short,
        long,
        default_value_t = false,
        global = true,
        help_heading = "Logging"
    )]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Pack sheets and export the layout
    Pack(PackArgs),
    /// Render only template output (forces --metadata template)
    Template(PackArgs),
    /// Simple timing bench (packs once per rotation policy, prints height + occupancy)
    Bench(BenchArgs),
}

#[derive(Parser, Debug, Clone)]
struct PackArgs {
    // Input/Output
    /// Job file (JSON or YAML): a list of sheets or `{ sheets, config }`
    #[arg(help_heading = "Input/Output")]
    input: PathBuf,
    /// Output directory
    #[arg(short, long, default_value = "out", help_heading = "Input/Output")]
    out_dir: PathBuf,
    /// Layout base name (files will be name.json/.txt)
    #[arg(short, long, default_value = "layout", help_heading = "Input/Output")]
    name: String,
    /// YAML config file path (overrides layout-related options)
    #[arg(long, help_heading = "Input/Output")]
    config: Option<PathBuf>,

    // Layout
    /// Strip width
    #[arg(long, default_value_t = 60.0, help_heading = "Layout")]
    container_width: f64,
    /// Maximum length of one section
    #[arg(long, default_value_t = 96.0, help_heading = "Layout")]
    max_section_height: f64,
    /// Sort order: width_then_area|area_desc|height_desc|max_side_desc|id_asc|none
    #[arg(long, default_value = "width_then_area", help_heading = "Layout")]
    sort_order: String,
    /// Widths closer than this are sorted as equal (width_then_area)
    #[arg(long, default_value_t = 1.0, help_heading = "Layout")]
    width_tolerance: f64,

    // Rotation
    /// Rotation policy: trial | fixed | long_side_vertical | auto
    #[arg(long, default_value = "trial", help_heading = "Rotation")]
    rotation: String,
    /// Lay tall sheets on their side before sorting
    #[arg(long, default_value_t = false, help_heading = "Rotation")]
    pre_rotate: bool,
    /// Time budget for auto rotation (ms)
    #[arg(long, help_heading = "Rotation")]
    time_budget: Option<u64>,
    /// Evaluate auto candidates in parallel (requires core feature `parallel`)
    #[arg(long, default_value_t = false, help_heading = "Rotation")]
    parallel: bool,

    // Export
    /// Metadata format: json | json-hash | template
    #[arg(long, default_value = "json", help_heading = "Export")]
    metadata: String,
    /// External template file (handlebars), used when --metadata template.
    /// A plain-text cut list is rendered when omitted.
    #[arg(long, help_heading = "Export")]
    template: Option<PathBuf>,
    /// Export packing stats (JSON) to this file
    #[arg(long, help_heading = "Export")]
    export_stats: Option<PathBuf>,
    /// Print the merged configuration (after CLI/YAML) and exit
    #[arg(long, default_value_t = false, help_heading = "Export")]
    print_config: bool,
    /// Output format for --print-config: json|yaml
    #[arg(long, default_value = "json", value_parser = ["json", "yaml"], help_heading = "Export")]
    print_config_format: String,
    /// Dry run: compute layout and stats but do not write files
    #[arg(long, default_value_t = false, help_heading = "Export")]
    dry_run: bool,
}

#[derive(Parser, Debug, Clone)]
struct BenchArgs {
    /// Job file (JSON or YAML)
    input: PathBuf,
    /// Strip width
    #[arg(long, default_value_t = 60.0)]
    container_width: f64,
    /// Maximum length of one section
    #[arg(long, default_value_t = 96.0)]
    max_section_height: f64,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing_with_level(cli.quiet, cli.verbose);
    match &cli.command {
        Commands::Pack(args) => run_pack(args),
        Commands::Template(args) => {
            let mut a = args.clone();
            a.metadata = "template".into();
            run_pack(&a)
        }
        Commands::Bench(b) => run_bench(b),
    }
}

fn run_pack(cli: &PackArgs) -> anyhow::Result<()> {
    let job = load_job(&cli.input)?;

    let base = PackerConfig {
        container_width: cli.container_width,
        max_section_height: cli.max_section_height,
        rotation: parse_rotation(&cli.rotation)?,
        pre_rotate: cli.pre_rotate,
        sort_order: parse_sort_order(&cli.sort_order)?,
        width_tolerance: cli.width_tolerance,
        time_budget_ms: cli.time_budget,
        parallel: cli.parallel,
        ..Default::default()
    };
    // Job-embedded config first, then the --config file; both override flags field by field.
    let mut cfg = match job.config {
        Some(y) => y.into_packer_config(base)?,
        None => base,
    };
    if let Some(path) = &cli.config {
        let file =
            fs::read_to_string(path).with_context(|| format!("read config {}", path.display()))?;
        let y: YamlConfig = serde_yaml::from_str(&file)
            .with_context(|| format!("parse config {}", path.display()))?;
        cfg = y.into_packer_config(cfg)?;
    }

    if cli.print_config {
        match cli.print_config_format.as_str() {
            "yaml" => println!("{}", serde_yaml::to_string(&cfg)?),
            _ => println!("{}", serde_json::to_string_pretty(&cfg)?),
        }
        return Ok(());
    }
    cfg.validate()?;

    let sheets = job.sheets;
    info!(count = sheets.len(), "loaded sheets");

    let start = Instant::now();
    let out = pack_sheets(&sheets, &cfg)?;
    let stats = out.stats(cfg.container_width);
    info!(
        sections = stats.num_sections,
        placed = stats.num_placed,
        total_height = stats.total_height,
        occupancy = %format!("{:.2}%", stats.occupancy * 100.0),
        time = %fmt_dur(start.elapsed()),
        "layout computed"
    );
    for u in &out.unplaced {
        warn!("{}", u.message(cfg.container_width, cfg.max_section_height));
    }

    if cli.dry_run {
        println!("{}", stats.summary());
        return Ok(());
    }

    fs::create_dir_all(&cli.out_dir)
        .with_context(|| format!("create out_dir {}", cli.out_dir.display()))?;

    match cli.metadata.as_str() {
        "json" | "json-array" => {
            let json_path = cli.out_dir.join(format!("{}.json", cli.name));
            let json_value = sheet_packer_core::to_json(&out, &cfg);
            let json = serde_json::to_string_pretty(&json_value)?;
            fs::write(&json_path, json)
                .with_context(|| format!("write {}", json_path.display()))?;
            info!(?json_path, sections = out.section_count(), "layout written");
        }
        "json-hash" => {
            let json_path = cli.out_dir.join(format!("{}.json", cli.name));
            let json_value = sheet_packer_core::to_json_hash(&out, &cfg);
            let json = serde_json::to_string_pretty(&json_value)?;
            fs::write(&json_path, json)
                .with_context(|| format!("write {}", json_path.display()))?;
            info!(?json_path, sections = out.section_count(), "layout written");
        }
        "template" => {
            let mut hb = Handlebars::new();
            hb.register_escape_fn(handlebars::no_escape);
            let (source, ext) = match &cli.template {
                Some(path) => {
                    let src = fs::read_to_string(path)
                        .with_context(|| format!("read template {}", path.display()))?;
                    let ext = path
                        .extension()
                        .and_then(|e| e.to_str())
                        .unwrap_or("txt")
                        .to_string();
                    (src, ext)
                }
                None => (CUT_LIST_TEMPLATE.to_string(), "txt".to_string()),
            };
            hb.register_template_string("layout", source)
                .context("register template")?;
            let ctx = build_template_context(&out, &cfg);
            let rendered = hb.render("layout", &ctx).context("render template")?;
            let out_path = cli.out_dir.join(format!("{}.{}", cli.name, ext));
            fs::write(&out_path, rendered)
                .with_context(|| format!("write {}", out_path.display()))?;
            info!(?out_path, sections = out.section_count(), "template written");
        }
        other => anyhow::bail!("unknown metadata format: {}", other),
    }

    if let Some(stats_path) = &cli.export_stats {
        fs::write(stats_path, serde_json::to_string_pretty(&stats)?)
            .with_context(|| format!("write {}", stats_path.display()))?;
        info!(?stats_path, "stats exported");
    }
    Ok(())
}

fn run_bench(b: &BenchArgs) -> anyhow::Result<()> {
    let job = load_job(&b.input)?;
    for rotation in [
        RotationPolicy::PerPlacementTrial,
        RotationPolicy::Fixed,
        RotationPolicy::LongSideVertical,
        RotationPolicy::Auto,
    ] {
        let cfg = PackerConfig {
            container_width: b.container_width,
            max_section_height: b.max_section_height,
            rotation,
            ..Default::default()
        };
        let start = Instant::now();
        let out = pack_sheets(&job.sheets, &cfg)?;
        let dur = start.elapsed();
        let stats = out.stats(cfg.container_width);
        println!(
            "rotation={:?} sections={} height={:.2} occupancy={:.2}% unplaced={} time={}",
            rotation,
            stats.num_sections,
            stats.total_height,
            stats.occupancy * 100.0,
            stats.num_unplaced,
            fmt_dur(dur)
        );
    }
    Ok(())
}

fn fmt_dur(d: Duration) -> String {
    let ms = d.as_secs_f64() * 1000.0;
    if ms >= 1.0 {
        format!("{:.1}ms", ms)
    } else {
        format!("{}us", d.as_micros())
    }
}

fn init_tracing_with_level(quiet: bool, verbose: u8) {
    let level = if quiet {
        "error".to_string()
    } else {
        match verbose {
            0 => "info".into(),
            1 => "debug".into(),
            _ => "trace".into(),
        }
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

// ---------- job file ----------

#[derive(Deserialize, Debug)]
struct SheetEntry {
    #[serde(alias = "name")]
    id: Option<String>,
    width: f64,
    height: f64,
}

#[derive(Deserialize, Debug)]
#[serde(untagged)]
enum JobFile {
    List(Vec<SheetEntry>),
    Job {
        sheets: Vec<SheetEntry>,
        #[serde(default)]
        config: Option<YamlConfig>,
    },
}

struct Job {
    sheets: Vec<SheetRequest<String>>,
    config: Option<YamlConfig>,
}

fn load_job(path: &Path) -> anyhow::Result<Job> {
    let text = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let is_yaml = matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml" | "yml")
    );
    let file: JobFile = if is_yaml {
        serde_yaml::from_str(&text).with_context(|| format!("parse {}", path.display()))?
    } else {
        serde_json::from_str(&text).with_context(|| format!("parse {}", path.display()))?
    };
    let (entries, config) = match file {
        JobFile::List(entries) => (entries, None),
        JobFile::Job { sheets, config } => (sheets, config),
    };
    let sheets = entries
        .into_iter()
        .enumerate()
        .map(|(i, e)| {
            let id = e.id.unwrap_or_else(|| format!("sheet-{}", i + 1));
            SheetRequest::new(id, e.width, e.height)
        })
        .collect();
    Ok(Job { sheets, config })
}

#[derive(Deserialize, Debug, Default)]
struct YamlConfig {
    container_width: Option<f64>,
    max_section_height: Option<f64>,
    rotation: Option<String>,
    pre_rotate: Option<bool>,
    pre_rotate_aspect: Option<f64>,
    pre_rotate_width_fraction: Option<f64>,
    sort_order: Option<String>,
    width_tolerance: Option<f64>,
    weights: Option<ScoreWeights>,
    max_requests: Option<usize>,
    time_budget_ms: Option<u64>,
    parallel: Option<bool>,
}

impl YamlConfig {
    fn into_packer_config(self, mut cfg: PackerConfig) -> anyhow::Result<PackerConfig> {
        if let Some(v) = self.container_width {
            cfg.container_width = v;
        }
        if let Some(v) = self.max_section_height {
            cfg.max_section_height = v;
        }
        if let Some(v) = self.rotation {
            cfg.rotation = parse_rotation(&v)?;
        }
        if let Some(v) = self.pre_rotate {
            cfg.pre_rotate = v;
        }
        if let Some(v) = self.pre_rotate_aspect {
            cfg.pre_rotate_aspect = v;
        }
        if let Some(v) = self.pre_rotate_width_fraction {
            cfg.pre_rotate_width_fraction = v;
        }
        if let Some(v) = self.sort_order {
            cfg.sort_order = parse_sort_order(&v)?;
        }
        if let Some(v) = self.width_tolerance {
            cfg.width_tolerance = v;
        }
        if let Some(v) = self.weights {
            cfg.weights = v;
        }
        if let Some(v) = self.max_requests {
            cfg.max_requests = Some(v);
        }
        if let Some(v) = self.time_budget_ms {
            cfg.time_budget_ms = Some(v);
        }
        if let Some(v) = self.parallel {
            cfg.parallel = v;
        }
        Ok(cfg)
    }
}

fn parse_rotation(s: &str) -> anyhow::Result<RotationPolicy> {
    s.parse()
        .map_err(|_| anyhow::anyhow!("unknown rotation policy: {}", s))
}

fn parse_sort_order(s: &str) -> anyhow::Result<SortOrder> {
    s.parse()
        .map_err(|_| anyhow::anyhow!("unknown sort order: {}", s))
}

// ---------- templates ----------

const CUT_LIST_TEMPLATE: &str = "\
Strip {{container_width}} wide, sections up to {{max_section_height}} long
Total length: {{total_height}} in {{section_count}} section(s)
{{#each sections}}
Section {{index}} ({{start}} - {{end}})
{{#each placements}}  {{id}}: {{w}} x {{h}} at ({{x}}, {{y}}){{#if rotated}} [rotated]{{/if}}
{{/each}}{{/each}}{{#if unplaced}}
Not placed:
{{#each unplaced}}  {{this}}
{{/each}}{{/if}}";

#[derive(Serialize)]
struct TemplatePlacement {
    id: String,
    x: f64,
    y: f64,
    w: f64,
    h: f64,
    rotated: bool,
}

#[derive(Serialize)]
struct TemplateSection {
    index: usize,
    start: f64,
    end: f64,
    placements: Vec<TemplatePlacement>,
}

#[derive(Serialize)]
struct TemplateContext {
    container_width: f64,
    max_section_height: f64,
    total_height: f64,
    section_count: usize,
    sections: Vec<TemplateSection>,
    /// Pre-rendered messages for sheets that did not fit.
    unplaced: Vec<String>,
    meta: Meta,
}

fn build_template_context(out: &PackResult<String>, cfg: &PackerConfig) -> TemplateContext {
    let sections = out
        .sections()
        .iter()
        .map(|s| TemplateSection {
            index: s.index + 1,
            start: s.start,
            end: s.end,
            placements: out
                .placements_in(s.index)
                .map(|p| TemplatePlacement {
                    id: p.id.clone(),
                    x: p.x,
                    y: p.y,
                    w: p.width,
                    h: p.height,
                    rotated: p.rotated,
                })
                .collect(),
        })
        .collect();
    let unplaced = out
        .unplaced
        .iter()
        .map(|u| u.message(cfg.container_width, cfg.max_section_height))
        .collect();
    let meta = Meta::from_config(cfg);
    TemplateContext {
        container_width: cfg.container_width,
        max_section_height: cfg.max_section_height,
        total_height: out.total_height,
        section_count: out.section_count(),
        sections,
        unplaced,
        meta,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn template_context_carries_meta_and_messages() {
        let cfg = PackerConfig {
            rotation: RotationPolicy::Fixed,
            ..Default::default()
        };
        let sheets = vec![
            SheetRequest::new("door".to_string(), 48.0, 24.0),
            SheetRequest::new("slab".to_string(), 80.0, 40.0),
        ];
        let out = pack_sheets(&sheets, &cfg).expect("pack");
        let ctx = build_template_context(&out, &cfg);

        let value = serde_json::to_value(&ctx).expect("serialize");
        assert_eq!(value["meta"]["app"], "sheet-packer");
        assert_eq!(value["meta"]["rotation"], "fixed");
        assert_eq!(value["sections"][0]["index"], 1);

        let mut hb = Handlebars::new();
        hb.register_escape_fn(handlebars::no_escape);
        hb.register_template_string("layout", CUT_LIST_TEMPLATE)
            .expect("template");
        let text = hb.render("layout", &ctx).expect("render");
        assert!(text.contains("door: 48"), "{text}");
        assert!(text.contains("Not placed:"), "{text}");
        assert!(text.contains("80\" wide"), "{text}");
    }
}
