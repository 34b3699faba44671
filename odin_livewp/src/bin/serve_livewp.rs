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

use std::{path::PathBuf, sync::Arc, time::Duration};
use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use odin_livewp::{
    create_providers, load_config, web::{build_router, spawn_server_task},
    Clock, LiveWaypointCache, LiveWpConfig, SystemClock
};

#[derive(Parser, Debug)]
#[command(version, about, long_about = "serve live waypoints from rate limited satellite messenger feeds")]
pub struct Args {
    /// path of RON config file (built-in defaults if not set)
    #[arg(short,long)]
    pub config: Option<PathBuf>,

    /// interval in seconds at which cache statistics are logged (0: never)
    #[arg(long, default_value_t = 0)]
    pub stats_interval: u64,
}

#[tokio::main]
async fn main()->Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())  // use RUST_LOG to set max level
        .try_init();

    let args = Args::parse();

    let config: LiveWpConfig = match &args.config {
        Some(path) => load_config( path)?,
        None => LiveWpConfig::default()
    };

    let clock: Arc<dyn Clock> = Arc::new( SystemClock);
    let providers = create_providers( &config, clock.clone())?;
    let cache = Arc::new( LiveWaypointCache::new( providers, clock, config.cache.clone()));

    if args.stats_interval > 0 {
        let cache = cache.clone();
        let interval = Duration::from_secs( args.stats_interval);
        tokio::spawn( async move {
            loop {
                tokio::time::sleep( interval).await;
                cache.log_stats();
            }
        });
    }

    println!("serving live waypoints on {}/livewaypoint?id=..", config.server.url());
    let server_task = spawn_server_task( &config.server, build_router( cache));
    Ok( server_task.await?? )
}
