//! # Watch Simulator Entry Point
//!
//! This binary runs the watch firmware core against the host: the segment
//! LCD becomes ASCII art on stdout, the RTC is either the system clock or a
//! scripted virtual clock, and button presses arrive as command-line
//! scripting options. The same faces and dispatcher run unmodified on
//! hardware builds.

// Test modules
#[cfg(test)]
mod tests;

use std::env;
use std::thread;
use std::time::Duration;

use watch_core_lib::analog_face::AnalogFace;
use watch_core_lib::config::Settings;
use watch_core_lib::dispatcher::{Dispatcher, Face, Watch};
use watch_core_lib::entropy_face::EntropyFace;
use watch_core_lib::inverse_face::InverseFace;
use watch_core_lib::rtc::{DateTime, Rtc, SystemRtc, VirtualRtc};
use watch_core_lib::scan_face::ScanFace;
use watch_core_lib::storage::Storage;
use watch_core_lib::timeline_face::TimelineFace;
use watch_core_lib::workday_face::WorkdayFace;
use watch_core_lib::{Event, EventType};

/// Simulator options parsed from the command line.
struct Options {
    /// Start the virtual clock here instead of following the host clock.
    start_time: Option<DateTime>,
    /// How many simulated seconds to run.
    run_seconds: u32,
    /// Press the mode button every this many seconds (0 = never).
    switch_every: u32,
    /// Pace the virtual clock at one wall-clock second per simulated second.
    realtime: bool,
    /// Persist face state under this directory.
    storage_dir: Option<String>,
}

fn parse_time(text: &str) -> anyhow::Result<DateTime> {
    let parts: Vec<&str> = text.split(':').collect();
    if parts.len() != 3 {
        anyhow::bail!("expected HH:MM:SS, got {:?}", text);
    }
    let hour: u8 = parts[0].parse()?;
    let minute: u8 = parts[1].parse()?;
    let second: u8 = parts[2].parse()?;
    if hour > 23 || minute > 59 || second > 59 {
        anyhow::bail!("time out of range: {:?}", text);
    }
    // Seed the calendar from the host so weekday and date lines are real.
    let today = SystemRtc.now();
    Ok(DateTime { hour, minute, second, ..today })
}

fn parse_options() -> anyhow::Result<Options> {
    let mut options = Options {
        start_time: None,
        run_seconds: 10,
        switch_every: 0,
        realtime: false,
        storage_dir: None,
    };
    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--time" => {
                let value = args.next().ok_or_else(|| anyhow::anyhow!("--time needs HH:MM:SS"))?;
                options.start_time = Some(parse_time(&value)?);
            }
            "--seconds" => {
                let value = args.next().ok_or_else(|| anyhow::anyhow!("--seconds needs a count"))?;
                options.run_seconds = value.parse()?;
            }
            "--switch-every" => {
                let value = args
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--switch-every needs a count"))?;
                options.switch_every = value.parse()?;
            }
            "--realtime" => options.realtime = true,
            "--storage" => {
                let value = args.next().ok_or_else(|| anyhow::anyhow!("--storage needs a path"))?;
                options.storage_dir = Some(value);
            }
            "--help" | "-h" => {
                println!(
                    "usage: segment-watch [--time HH:MM:SS] [--seconds N] \
                     [--switch-every N] [--realtime] [--storage DIR]"
                );
                std::process::exit(0);
            }
            other => anyhow::bail!("unknown option {:?}", other),
        }
    }
    Ok(options)
}

/// The face lineup, in mode-button order.
fn build_faces() -> Vec<Box<dyn Face>> {
    vec![
        Box::new(WorkdayFace::new()),
        Box::new(InverseFace::new()),
        Box::new(EntropyFace::new()),
        Box::new(TimelineFace::new()),
        Box::new(AnalogFace::new()),
        Box::new(ScanFace::new()),
    ]
}

fn main() -> anyhow::Result<()> {
    let options = parse_options()?;

    // Virtual clock when scripted, host clock otherwise.
    let virtual_rtc = options
        .start_time
        .map(VirtualRtc::new);
    let rtc: Box<dyn Rtc> = match &virtual_rtc {
        Some(v) => Box::new(v.clone()),
        None => Box::new(SystemRtc),
    };

    let mut watch = Watch::new(rtc);
    watch.settings = Settings::load();
    if let Some(dir) = &options.storage_dir {
        watch.storage = Some(Storage::open(dir)?);
    }

    let mut dispatcher = Dispatcher::new(build_faces());
    dispatcher.start(&mut watch);

    let mut last_minute = watch.rtc.now().minute;
    for elapsed in 0..options.run_seconds {
        // One simulated second: deliver every subsecond tick the active
        // face asked for.
        let hz = watch.scheduler.frequency().hz();
        for subsecond in 0..hz {
            dispatcher.dispatch(Event::tick(subsecond), &mut watch);
        }

        let now = watch.rtc.now();
        if now.minute != last_minute {
            last_minute = now.minute;
            dispatcher.poll_background_tasks(&mut watch);
        }

        println!(
            "[{}] {:02}:{:02}:{:02} ({} Hz{})",
            dispatcher.active_face_name(),
            now.hour,
            now.minute,
            now.second,
            hz,
            if watch.scheduler.tick_animation_running() {
                ", sleeping"
            } else {
                ""
            }
        );
        print!("{}", watch.display.render_ascii());

        if options.switch_every > 0 && elapsed > 0 && elapsed % options.switch_every == 0 {
            dispatcher.dispatch(Event::of(EventType::ModeButtonUp, 0), &mut watch);
            eprintln!("mode button: now showing {}", dispatcher.active_face_name());
        }

        match &virtual_rtc {
            Some(v) => {
                v.advance_seconds(1);
                if options.realtime {
                    thread::sleep(Duration::from_secs(1));
                }
            }
            None => thread::sleep(Duration::from_secs(1)),
        }
    }

    Ok(())
}
