//! Headless pager simulator.
//!
//! Builds a [`VerticalPager`] over synthetic pages, attaches it to an
//! in-memory host and replays a swipe script, printing the events, the bound
//! page and the indicator layout after every step.

mod script;

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, bail};
use clap::Parser;
use env_logger::{Builder, Target};
use log::LevelFilter;
use serde_json::{Value, json};

use vpager_config::{ConfigLoader, IndicatorConfig, PagerSettings};
use vpager_core::testing::{BasicVisual, MemoryHost, MemorySlot, RecordingSink};
use vpager_core::{
    BindOutcome, LazyPage, Page, PageRef, Size, VerticalPager,
};

use script::Step;

#[derive(Parser, Debug)]
#[command(name = "vpager-sim")]
#[command(about = "Drive a vertical pager through scripted swipes")]
struct Cli {
    /// Number of pages to start with
    #[arg(short = 'n', long, default_value_t = 12)]
    pages: usize,

    /// Pager options file (.json or .toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the cache window from the options file
    #[arg(long)]
    cache_size: Option<i64>,

    /// Indicator orientation when the options file configures none (0 or 1)
    #[arg(long)]
    indicator_type: Option<i64>,

    /// Pager bounds as WIDTHxHEIGHT
    #[arg(long, default_value = "400x800")]
    viewport: String,

    /// Comma separated steps, e.g. "f,f,b,w300,r"
    #[arg(short, long, default_value = "f,f,f,b,h")]
    script: String,

    /// Time given to preloading after each swipe (ms)
    #[arg(long, default_value_t = 400)]
    settle_wait: u64,

    /// Page indices whose content fails to load
    #[arg(long = "broken", value_delimiter = ',')]
    broken: Vec<usize>,

    /// Print one JSON object per step instead of text
    #[arg(long, default_value_t = false)]
    json: bool,
}

fn init_logger() {
    Builder::new()
        .target(Target::Stdout)
        .filter_level(LevelFilter::Warn)
        .filter_module("vpager_core", LevelFilter::Debug)
        .filter_module("vpager_sim", LevelFilter::Debug)
        .init();
}

fn parse_viewport(raw: &str) -> anyhow::Result<Size> {
    let Some((w, h)) = raw.split_once(['x', 'X']) else {
        bail!("viewport must look like 400x800, got '{raw}'");
    };
    let width: f32 = w.trim().parse().context("viewport width")?;
    let height: f32 = h.trim().parse().context("viewport height")?;
    if !(width > 0.0 && height > 0.0) {
        bail!("viewport must be positive, got {width}x{height}");
    }
    Ok(Size::new(width, height))
}

fn make_page(index: usize, broken: &HashSet<usize>) -> PageRef {
    let fails = broken.contains(&index);
    LazyPage::new(format!("page-{index}"), move || {
        if fails {
            anyhow::bail!("content for page {index} is unavailable");
        }
        Ok(BasicVisual::shared(index as u64))
    })
    .shared()
}

fn load_settings(cli: &Cli) -> anyhow::Result<PagerSettings> {
    let mut settings = match &cli.config {
        Some(path) => {
            let load = ConfigLoader::new().load_path(path)?;
            for warning in &load.warnings {
                log::warn!("{}: {}", path.display(), warning);
            }
            load.settings
        }
        None => PagerSettings::default(),
    };

    if let Some(size) = cli.cache_size {
        settings.cache_size = vpager_config::models::clamp_cache_size(size);
    }
    if settings.indicator.is_none() {
        let config = IndicatorConfig {
            kind: Some(cli.indicator_type.unwrap_or(1)),
            ..Default::default()
        };
        let (style, mount) = config.resolve(&settings.style)?;
        settings.style = style;
        settings.indicator = Some(mount);
    }
    Ok(settings)
}

struct Simulation {
    pager: VerticalPager,
    host: Arc<MemoryHost>,
    sink: Arc<RecordingSink>,
    slot: MemorySlot,
    next_page: usize,
    broken: HashSet<usize>,
    bounds: Size,
    settle_wait: Duration,
}

impl Simulation {
    fn new(cli: &Cli, settings: PagerSettings, bounds: Size) -> Self {
        let broken: HashSet<usize> = cli.broken.iter().copied().collect();
        let pages: Vec<PageRef> =
            (0..cli.pages).map(|i| make_page(i, &broken)).collect();

        let pager = VerticalPager::with_pages(pages, settings);
        let host = MemoryHost::new();
        let sink = RecordingSink::new();
        pager.add_listener(sink.clone());
        pager.attach_host(host.clone());

        Self {
            pager,
            host,
            sink,
            slot: MemorySlot::new(0),
            next_page: cli.pages,
            broken,
            bounds,
            settle_wait: Duration::from_millis(cli.settle_wait),
        }
    }

    async fn run(&mut self, step: Step) {
        match step {
            Step::Forward | Step::Backward | Step::Hold => {
                let (path, target) = script::gesture(
                    step,
                    self.pager.current_page(),
                    self.pager.page_count(),
                );
                self.pager.on_drag_begin();
                for (position, fraction) in path {
                    self.pager.on_position_changed(
                        position,
                        fraction,
                        fraction * self.bounds.height,
                    );
                }
                self.host.settle_on(target);
                self.pager.on_settle();
                tokio::time::sleep(self.settle_wait).await;
            }
            Step::Goto(index) => self.pager.scroll_to_page(index, true),
            Step::Append => {
                let page = make_page(self.next_page, &self.broken);
                self.next_page += 1;
                self.pager.add_view(page);
            }
            Step::Remove(index) => {
                self.pager.remove_view(index);
            }
            Step::Release => self.pager.release_from_memory(),
            Step::Wait(ms) => tokio::time::sleep(Duration::from_millis(ms)).await,
        }
    }

    /// Bind the current page like the host would after a layout pass.
    fn bind(&mut self) -> Value {
        match self.host.bind_current(&mut self.slot) {
            Some(BindOutcome::Bound(visual)) => {
                json!({ "bound": visual.native_handle().0 })
            }
            Some(BindOutcome::Placeholder(placeholder)) => {
                json!({ "placeholder": placeholder.message })
            }
            Some(BindOutcome::Skipped) | None => Value::Null,
        }
    }

    /// Indices, in the current page list, of pages whose visual exists.
    fn materialized(&self) -> Vec<usize> {
        self.pager
            .pages()
            .iter()
            .enumerate()
            .filter(|(_, page)| page.is_materialized())
            .map(|(i, _)| i)
            .collect()
    }

    fn report(&mut self, step: Step) -> Value {
        let events: Vec<Value> = self
            .sink
            .take()
            .iter()
            .map(|event| json!({ "event": event.name(), "data": event.to_json() }))
            .collect();
        let binding = self.bind();
        json!({
            "step": step.label(),
            "currentPage": self.pager.current_page(),
            "pageCount": self.pager.page_count(),
            "events": events,
            "binding": binding,
            "materialized": self.materialized(),
            "offscreenLimit": self.host.offscreen_limit(),
            "indicator": self.pager.indicator_frame(self.bounds),
        })
    }
}

fn print_text(report: &Value) {
    println!(
        "== {} -> page {}/{}",
        report["step"].as_str().unwrap_or("?"),
        report["currentPage"],
        report["pageCount"]
    );
    if let Some(events) = report["events"].as_array() {
        for event in events {
            println!("   {:<12} {}", event["event"].as_str().unwrap_or("?"), event["data"]);
        }
    }
    println!("   binding      {}", report["binding"]);
    println!("   warm pages   {}", report["materialized"]);
    println!("   offscreen    {}", report["offscreenLimit"]);
    if let Some(dots) = report["indicator"]["dots"].as_array() {
        let strip: String = dots
            .iter()
            .map(|dot| if dot["active"].as_bool() == Some(true) { '●' } else { '·' })
            .collect();
        println!("   indicator    {strip}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn viewport_parses_both_separators() {
        assert_eq!(parse_viewport("400x800").unwrap(), Size::new(400.0, 800.0));
        assert_eq!(parse_viewport(" 320 X 640 ").unwrap(), Size::new(320.0, 640.0));
    }

    #[test]
    fn bad_viewport_is_rejected() {
        for raw in ["400", "0x800", "-1x2", "widexhigh", "NaNx10"] {
            assert!(parse_viewport(raw).is_err(), "{raw} accepted");
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    if std::env::var("RUST_LOG").is_err() {
        init_logger();
    } else {
        env_logger::init();
    }

    let cli = Cli::parse();
    let steps = script::parse(&cli.script)?;
    let bounds = parse_viewport(&cli.viewport)?;
    let settings = load_settings(&cli)?;
    log::debug!(
        "simulating {} pages, cache window {}, {} steps",
        cli.pages,
        settings.cache_size,
        steps.len()
    );

    let mut sim = Simulation::new(&cli, settings, bounds);

    let initial = sim.report(Step::Wait(0));
    if cli.json {
        println!("{initial}");
    } else {
        print_text(&initial);
    }

    for step in steps {
        sim.run(step).await;
        let report = sim.report(step);
        if cli.json {
            println!("{report}");
        } else {
            print_text(&report);
        }
    }

    sim.pager.teardown();
    Ok(())
}
