//! LevelBubble: host entry point
//!
//! Runs the orientation sampler against the simulated motion facility and
//! logs the readout a level-bubble screen would show.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  SimulatedMotion   SoftTimer    LogEventSink   JsonConfigFile  │
//! │  (MotionPort)      (TimerPort)  (EventSink)    (ConfigPort)    │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │        OrientationSampler (single writer)              │    │
//! │  │  FSM · sessions · SamplerState                         │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! │                   ▲                                            │
//! │          SPSC event queue (owner loop drains)                  │
//! └────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Usage:
//!
//! ```text
//! levelbubble [--config PATH] [--seconds N] [--unavailable | --stalled]
//!             [--fault-after-ms N] [--write-default-config]
//! ```

#![deny(unused_must_use)]

use std::thread;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use log::{info, warn};

use levelbubble::OrientationSampler;
use levelbubble::adapters::config_file::JsonConfigFile;
use levelbubble::adapters::log_sink::LogEventSink;
use levelbubble::adapters::sim_motion::SimulatedMotion;
use levelbubble::adapters::time::MonotonicClock;
use levelbubble::adapters::timer::SoftTimer;
use levelbubble::app::commands::SamplerCommand;
use levelbubble::app::ports::ConfigPort;
use levelbubble::config::SamplerConfig;
use levelbubble::events::{SamplerEvent, new_queue, push_event};
use levelbubble::readout::toggle_label;

/// How often the readout is logged.
const READOUT_INTERVAL_US: u64 = 250_000;

#[derive(Debug)]
struct Options {
    config_path: Option<String>,
    seconds: f64,
    facility: Facility,
    fault_after: Option<Duration>,
    write_default_config: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Facility {
    Normal,
    Unavailable,
    Stalled,
}

fn parse_args() -> Result<Options> {
    let mut opts = Options {
        config_path: None,
        seconds: 3.0,
        facility: Facility::Normal,
        fault_after: None,
        write_default_config: false,
    };

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => {
                opts.config_path = Some(args.next().context("--config needs a path")?);
            }
            "--seconds" => {
                let v = args.next().context("--seconds needs a value")?;
                opts.seconds = v.parse().with_context(|| format!("bad --seconds {v:?}"))?;
            }
            "--fault-after-ms" => {
                let v = args.next().context("--fault-after-ms needs a value")?;
                let ms: u64 = v
                    .parse()
                    .with_context(|| format!("bad --fault-after-ms {v:?}"))?;
                opts.fault_after = Some(Duration::from_millis(ms));
            }
            "--unavailable" => opts.facility = Facility::Unavailable,
            "--stalled" => opts.facility = Facility::Stalled,
            "--write-default-config" => opts.write_default_config = true,
            other => bail!("unknown argument {other:?}"),
        }
    }
    Ok(opts)
}

fn load_config(opts: &Options) -> Result<SamplerConfig> {
    let Some(path) = &opts.config_path else {
        return Ok(SamplerConfig::default());
    };
    let store = JsonConfigFile::new(path);
    if opts.write_default_config {
        store
            .save(&SamplerConfig::default())
            .with_context(|| format!("writing default config to {path}"))?;
        info!("Wrote default config to {}", path);
    }
    store
        .load()
        .with_context(|| format!("loading config from {path}"))
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    info!("LevelBubble v{}", env!("CARGO_PKG_VERSION"));

    let opts = parse_args()?;
    let config = load_config(&opts)?;

    let mut motion = match opts.facility {
        Facility::Normal => SimulatedMotion::new(),
        Facility::Unavailable => SimulatedMotion::unavailable(),
        Facility::Stalled => SimulatedMotion::stalled(),
    };
    if let Some(after) = opts.fault_after {
        motion = motion.with_fault_after(after);
    }

    let tick = config.update_interval();
    let mut sampler = OrientationSampler::new(motion, config);
    let mut timer = SoftTimer::new();
    let mut sink = LogEventSink::new();
    let clock = MonotonicClock::new();

    let mut queue = new_queue();
    let (mut producer, mut consumer) = queue.split();

    // Screen appeared.
    push_event(&mut producer, SamplerEvent::Command(SamplerCommand::Start))?;

    let mut next_readout_us = 0;
    while clock.uptime_secs_f64() < opts.seconds {
        let now = clock.uptime_us();

        sampler.motion_mut().poll(now, &mut producer)?;
        timer.poll(now, &mut producer)?;
        sampler.drain(&mut consumer, &mut timer, &mut sink);

        if now >= next_readout_us {
            info!(
                "{} [{:?}, button: {}]",
                sampler.readout(),
                sampler.phase(),
                toggle_label(sampler.is_active())
            );
            next_readout_us = now + READOUT_INTERVAL_US;
        }

        thread::sleep(tick);
    }

    // Screen disappeared.
    push_event(&mut producer, SamplerEvent::Command(SamplerCommand::Stop))?;
    sampler.drain(&mut consumer, &mut timer, &mut sink);

    if let Some(cause) = sampler.last_failure() {
        warn!("Last session failure: {}", cause);
    }
    info!(
        "Done: {} events observed, final phase {:?}",
        sink.emitted(),
        sampler.phase()
    );
    Ok(())
}
