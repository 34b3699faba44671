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

use std::{net::SocketAddr, path::Path, time::Duration, fs};
use chrono::{DateTime,Utc};
use serde::{Serialize,Deserialize};

/// crate to poll live waypoints (current positions of satellite messenger devices) from rate limited
/// third party services. The [`LiveWaypointCache`] makes sure we never query a provider more often than it allows
/// while still answering each client request with the latest data we have and the date at which new data can be expected.

pub mod errors;
use errors::Result;

pub mod clock;
pub use clock::{Clock,SystemClock,ManualClock};

pub mod waypoint_id;
pub use waypoint_id::{LiveWaypointId,ProviderType,LIVE_WAYPOINT_SCHEME};

pub mod polling;
pub use polling::PollingState;

pub mod provider;
pub use provider::{LiveWaypointProvider,ProviderMap,create_providers};

pub mod cache;
pub use cache::{LiveWaypointCache,CacheStats};

pub mod web;

/* #region types  **********************************************************************************/

/// immutable snapshot of a live waypoint as we got it from its provider
#[derive(Serialize,Deserialize,Debug,Clone,PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LiveWaypointRecord {
    pub id: LiveWaypointId,
    pub name: String,
    pub description: String, // might contain simple markup
    pub details_link: String, // might be empty
    pub latitude: f64,  // degrees
    pub longitude: f64, // degrees
    pub altitude: f64,  // meters
    pub timestamp: DateTime<Utc>,
}

/// what we return for a live waypoint query
#[derive(Serialize,Deserialize,Debug,Clone,PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LiveWaypointData {
    pub record: LiveWaypointRecord,
    pub next_request_date: DateTime<Utc>,
}

/* #endregion types */

/* #region config  *********************************************************************************/

#[derive(Deserialize,Serialize,Debug,Clone)]
pub struct LiveWpConfig {
    pub server: ServerConfig,
    pub cache: CacheConfig,
    pub request_timeout: Duration, // for each upstream round trip
    pub garmin_inreach: FeedConfig,
    pub find_me_spot: FeedConfig,
    pub test_pos: TestPosConfig,
}

#[derive(Deserialize,Serialize,Debug,Clone)]
pub struct ServerConfig {
    pub sock_addr: SocketAddr,
}

impl ServerConfig {
    pub fn url(&self) -> String {
        format!("http://{}", self.sock_addr)
    }
}

#[derive(Deserialize,Serialize,Debug,Clone)]
pub struct CacheConfig {
    pub max_entries: usize,
    pub max_age: Duration, // entries fetched longer ago are dropped
}

/// settings for a remote feed provider
#[derive(Deserialize,Serialize,Debug,Clone)]
pub struct FeedConfig {
    pub base_url: String,
    pub min_interval: Duration, // the minimum time between two requests for the same id
}

#[derive(Deserialize,Serialize,Debug,Clone)]
pub struct TestPosConfig {
    pub latitude: f64,  // center of test circle in degrees
    pub longitude: f64,
    pub altitude: f64,  // meters
    pub radius: f64,    // meters
    pub nominal_interval: Duration, // what we report as next request date (test positions are always available)
}

impl Default for LiveWpConfig {
    fn default()->Self {
        LiveWpConfig {
            server: ServerConfig { sock_addr: SocketAddr::from( ([127,0,0,1], 9016)) },
            cache: CacheConfig { max_entries: 10_000, max_age: Duration::from_secs( 24*3600) },
            request_timeout: Duration::from_secs(20),
            garmin_inreach: FeedConfig {
                base_url: "https://share.garmin.com".to_string(),
                min_interval: Duration::from_secs(60)
            },
            find_me_spot: FeedConfig {
                base_url: "https://api.findmespot.com".to_string(),
                min_interval: Duration::from_secs(150)
            },
            test_pos: TestPosConfig {
                latitude: 47.6764,
                longitude: 11.8710,
                altitude: 1500.0,
                radius: 2000.0,
                nominal_interval: Duration::from_secs(60)
            }
        }
    }
}

/// load a RON config file
pub fn load_config<C> (path: impl AsRef<Path>)->Result<C> where C: for <'a> Deserialize<'a> {
    let data = fs::read_to_string( path)?;
    Ok( ron::from_str( &data)? )
}

/* #endregion config */
