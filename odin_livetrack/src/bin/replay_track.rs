/*
 * Copyright © 2025, United States Government, as represented by the Administrator of
 * the National Aeronautics and Space Administration. All rights reserved.
 *
 * The “ODIN” software is licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License. You may obtain a copy
 * of the License at http://www.apache.org/licenses/LICENSE-2.0.
 *
 * Unless required by applicable law or agreed to in writing, software distributed under
 * the License is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND,
 * either express or implied. See the License for the specific language governing permissions
 * and limitations under the License.
 */
#![allow(unused)]

use std::{fs, path::PathBuf};
use anyhow::{anyhow, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use odin_livetrack::{format_epoch_secs, LiveTrackMessage, LiveTrackStore, MergeOutcome, PlaybackClock, DEFAULT_OFFSET_SECS};

#[derive(Parser, Debug)]
#[command(version, about, long_about = "merge live track messages from a JSON file and print the resulting playback frames")]
pub struct Args {
    /// playback offset in seconds (-900..0)
    #[arg(short,long, default_value_t = DEFAULT_OFFSET_SECS, allow_negative_numbers = true)]
    pub offset: f64,

    /// degree of interpolation polynomial
    #[arg(short,long, default_value_t = 1)]
    pub degree: usize,

    /// seconds between printed frames
    #[arg(short,long, default_value_t = 30.0)]
    pub step: f64,

    /// number of frames to print
    #[arg(short,long, default_value_t = 20)]
    pub frames: usize,

    /// wall clock start time in epoch seconds (default: first display time is at the earliest sample)
    #[arg(long, allow_negative_numbers = true)]
    pub start: Option<f64>,

    /// JSON file with an array of live track messages, in arrival order
    pub path: PathBuf,
}

fn main()->Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();

    let args = Args::parse();

    let contents = fs::read_to_string( &args.path)?;
    let msgs: Vec<LiveTrackMessage> = serde_json::from_str( &contents)?;

    let mut store = LiveTrackStore::with_degree( args.degree);
    for msg in &msgs {
        match store.ingest( msg)? {
            MergeOutcome::Merged { discarded, appended } => println!("{}: +{} -{}", msg.id, appended, discarded),
            MergeOutcome::Rejected(reason) => println!("{}: rejected ({})", msg.id, reason)
        }
    }

    let mut clock = PlaybackClock::new();
    clock.set_offset( args.offset);

    let t_first = store.tracks().filter_map( |t| t.first_time()).fold( f64::INFINITY, f64::min);
    let start = match args.start {
        Some(start) => start,
        None if t_first.is_finite() => t_first - clock.offset_seconds(),
        None => return Err( anyhow!("no live track data in {:?}", args.path))
    };

    println!("render mode: {:?}", store.render_mode());
    for i in 0..args.frames {
        let now = start + i as f64 * args.step;
        println!("------- {} (display {})", format_epoch_secs( now), format_epoch_secs( clock.display_time( now)));
        for e in store.render_frame( &clock, now) {
            match e.position {
                Some(p) => println!("  {}: {} [{}]", e.id, p, e.freshness),
                None => println!("  {}: - [{}]", e.id, e.freshness)
            }
        }
    }

    Ok(())
}
