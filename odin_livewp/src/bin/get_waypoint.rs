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

use std::{path::PathBuf, sync::Arc};
use anyhow::{anyhow, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use odin_livewp::{create_providers, load_config, Clock, LiveWaypointId, LiveWaypointProvider, LiveWpConfig, SystemClock};

#[derive(Parser, Debug)]
#[command(version, about, long_about = "retrieve current positions for a list of live waypoint ids straight from their providers")]
pub struct Args {
    /// path of RON config file (built-in defaults if not set)
    #[arg(short,long)]
    pub config: Option<PathBuf>,

    /// ids in 'livewp://<provider>/<payload>' form
    #[arg(num_args=1..)]
    pub ids: Vec<String>
}

#[tokio::main]
async fn main()->Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();

    let args = Args::parse();

    let config: LiveWpConfig = match &args.config {
        Some(path) => load_config( path)?,
        None => LiveWpConfig::default()
    };
    let clock: Arc<dyn Clock> = Arc::new( SystemClock);
    let providers = create_providers( &config, clock)?;

    for raw_id in &args.ids {
        println!("------- {}", raw_id);
        let id = LiveWaypointId::parse( raw_id)?;
        let provider = providers.get( &id.provider_type()).ok_or_else( || anyhow!("no provider for {}", id.provider_type()))?;
        match provider.fetch( &id).await {
            Ok(record) => println!("{}", serde_json::to_string_pretty( &record)?),
            Err(e) => eprintln!("error: {e}")
        }
    }

    Ok(())
}
