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

use std::sync::Arc;
use chrono::{DateTime,Utc};
use async_trait::async_trait;
use serde::Deserialize;
use reqwest::Client;
use tracing::debug;

use crate::{
    clock::Clock, errors::{fetch_error, parse_error, Result},
    polling::PollingState, waypoint_id::{LiveWaypointId,ProviderType},
    FeedConfig, LiveWaypointRecord
};
use super::{check_provider_type, format_description, get_text, LiveWaypointProvider};

/// FindMeSpot public feeds. The id payload is the feed id, the response is the JSON `latest.json` message list.
/// SPOT asks clients not to poll a feed more often than every 2.5 min
pub struct FindMeSpotProvider {
    config: FeedConfig,
    client: Client,
    clock: Arc<dyn Clock>,
    polling_state: PollingState,
}

impl FindMeSpotProvider {
    pub fn new (config: FeedConfig, client: Client, clock: Arc<dyn Clock>)->Self {
        let polling_state = PollingState::new( config.min_interval);
        FindMeSpotProvider { config, client, clock, polling_state }
    }

    pub fn feed_url (&self, feed_id: &str)->String {
        format!("{}/spot-main-web/consumer/rest-api/2.0/public/feed/{}/latest.json", self.config.base_url.trim_end_matches('/'), feed_id)
    }
}

#[async_trait]
impl LiveWaypointProvider for FindMeSpotProvider {
    fn provider_type (&self)->ProviderType { ProviderType::FindMeSpot }

    fn polling_state (&self)->&PollingState { &self.polling_state }

    async fn fetch (&self, id: &LiveWaypointId)->Result<LiveWaypointRecord> {
        check_provider_type( id, ProviderType::FindMeSpot)?;

        let url = self.feed_url( id.payload());
        debug!("requesting {}", url);
        let json = get_text( &self.client, &url, "application/json").await?;
        let record = parse_spot_feed( id, &json)?;

        self.polling_state.record_request( &id.to_string(), self.clock.now());
        Ok(record)
    }
}

/* #region SPOT feed types **************************************************************************/

#[derive(Deserialize,Debug)]
pub struct SpotRoot {
    pub response: SpotResponse,
}

#[derive(Deserialize,Debug)]
#[serde(rename_all = "camelCase")]
pub struct SpotResponse {
    pub feed_message_response: Option<FeedMessageResponse>,
    pub errors: Option<SpotErrors>,
}

#[derive(Deserialize,Debug)]
pub struct FeedMessageResponse {
    pub feed: Option<SpotFeed>,
    pub messages: SpotMessages,
}

#[derive(Deserialize,Debug)]
pub struct SpotFeed {
    pub name: Option<String>,
}

#[derive(Deserialize,Debug)]
pub struct SpotMessages {
    pub message: OneOrMany<SpotMessage>,
}

/// SPOT returns a single object instead of an array if there is only one message
#[derive(Deserialize,Debug)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    pub fn into_vec (self)->Vec<T> {
        match self {
            OneOrMany::One(t) => vec![t],
            OneOrMany::Many(v) => v
        }
    }
}

#[derive(Deserialize,Debug)]
pub struct SpotErrors {
    pub error: SpotError,
}

#[derive(Deserialize,Debug)]
pub struct SpotError {
    pub code: String,
    pub text: String,
    pub description: Option<String>,
}

#[derive(Deserialize,Debug)]
#[serde(rename_all = "camelCase")]
pub struct SpotMessage {
    pub messenger_name: Option<String>,
    pub unix_time: Option<i64>,
    pub message_type: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub altitude: Option<f64>,
    pub battery_state: Option<String>,
    pub model_id: Option<String>,
    pub message_content: Option<String>,
}

/* #endregion SPOT feed types */

/// turn a SPOT `latest.json` response into the record of its most recent message
pub fn parse_spot_feed (id: &LiveWaypointId, json: &str)->Result<LiveWaypointRecord> {
    let root: SpotRoot = serde_json::from_str( json)?;

    if let Some(errors) = root.response.errors {
        let e = errors.error;
        return Err( fetch_error!("SPOT feed {} error {}: {} {}", id.payload(), e.code, e.text, e.description.unwrap_or_default()))
    }

    let fmr = root.response.feed_message_response.ok_or_else( || fetch_error!("no feed message response for {}", id))?;
    let feed_name = fmr.feed.and_then( |f| f.name);

    let msg = fmr.messages.message.into_vec().into_iter()
        .filter( |m| m.unix_time.is_some() && m.latitude.is_some() && m.longitude.is_some())
        .max_by_key( |m| m.unix_time.unwrap_or_default())
        .ok_or_else( || fetch_error!("no timestamped position in SPOT feed for {}", id))?;

    let (Some(unix_time),Some(latitude),Some(longitude)) = (msg.unix_time, msg.latitude, msg.longitude) else {
        return Err( fetch_error!("incomplete SPOT message for {}", id))
    };
    let timestamp = DateTime::<Utc>::from_timestamp( unix_time, 0).ok_or_else( || parse_error!("invalid SPOT unixTime {}", unix_time))?;

    let name = msg.messenger_name.clone()
        .filter( |s| !s.trim().is_empty())
        .or( feed_name)
        .unwrap_or_else( || id.payload().to_string());

    let description = format_description( &[
        ("Message type", msg.message_type.as_deref()),
        ("Battery", msg.battery_state.as_deref()),
        ("Model", msg.model_id.as_deref()),
        ("Message", msg.message_content.as_deref()),
    ]);

    Ok( LiveWaypointRecord {
        id: id.clone(),
        name,
        description,
        details_link: String::new(), // SPOT has no public page per feed
        latitude,
        longitude,
        altitude: msg.altitude.unwrap_or_default(),
        timestamp
    })
}
