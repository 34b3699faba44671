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

use std::{collections::HashMap, sync::Arc};
use chrono::{DateTime,Utc};
use async_trait::async_trait;
use http::header::ACCEPT;
use reqwest::{Client,header::HeaderValue};

use crate::{
    clock::Clock, errors::{fetch_error, op_failed, Result},
    polling::PollingState, waypoint_id::{LiveWaypointId,ProviderType},
    LiveWaypointRecord, LiveWpConfig
};

pub mod garmin_inreach;
pub use garmin_inreach::GarminInreachProvider;

pub mod find_me_spot;
pub use find_me_spot::FindMeSpotProvider;

pub mod test_pos;
pub use test_pos::TestPosProvider;

/// what we show for extended provider fields that were not reported
pub const NOT_AVAILABLE: &str = "N/A";

/// the adapter interface for upstream live waypoint services.
/// Implementors translate the native provider format into [`LiveWaypointRecord`]s and own the [`PollingState`]
/// that decides when the next upstream request for a given id is allowed
#[async_trait]
pub trait LiveWaypointProvider: Send + Sync {
    fn provider_type (&self)->ProviderType;

    fn polling_state (&self)->&PollingState;

    /// the date we report to clients as the earliest time new data can be expected
    fn next_request_date (&self, id: &LiveWaypointId, now: DateTime<Utc>)->DateTime<Utc> {
        self.polling_state().next_request_date( &id.to_string(), now)
    }

    /// are we allowed to make an upstream request for `id` at `now`
    fn can_request (&self, id: &LiveWaypointId, now: DateTime<Utc>)->bool {
        now >= self.next_request_date( id, now)
    }

    /// one upstream round trip. Implementations have to record the request in their polling state on success
    async fn fetch (&self, id: &LiveWaypointId)->Result<LiveWaypointRecord>;

    fn prune_polling_state (&self, cutoff: DateTime<Utc>)->usize {
        self.polling_state().prune( cutoff)
    }
}

pub type ProviderMap = HashMap<ProviderType,Arc<dyn LiveWaypointProvider>>;

/// create the configured set of providers, all sharing the same http client and clock
pub fn create_providers (config: &LiveWpConfig, clock: Arc<dyn Clock>)->Result<ProviderMap> {
    let client = Client::builder()
        .timeout( config.request_timeout)
        .build()?;

    let mut map: ProviderMap = HashMap::new();
    map.insert( ProviderType::GarminInreach, Arc::new( GarminInreachProvider::new( config.garmin_inreach.clone(), client.clone(), clock.clone())));
    map.insert( ProviderType::FindMeSpot, Arc::new( FindMeSpotProvider::new( config.find_me_spot.clone(), client, clock.clone())));
    map.insert( ProviderType::TestPos, Arc::new( TestPosProvider::new( config.test_pos.clone(), clock)));

    Ok(map)
}

pub(crate) fn check_provider_type (id: &LiveWaypointId, expected: ProviderType)->Result<()> {
    if id.provider_type() == expected {
        Ok(())
    } else {
        Err( op_failed!("{} is not a {} id", id, expected))
    }
}

/// GET the text body of `url`. Non-success status codes are fetch errors
pub(crate) async fn get_text (client: &Client, url: &str, accept: &'static str)->Result<String> {
    let response = client.get( url)
        .header( ACCEPT, HeaderValue::from_static( accept))
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        return Err( fetch_error!("{} returned status {}", url, status))
    }

    Ok( response.text().await? )
}

/// build a simple markup description from (label, optional value) pairs
pub(crate) fn format_description (fields: &[(&str, Option<&str>)])->String {
    let mut lines: Vec<String> = Vec::with_capacity( fields.len());
    for (label,value) in fields {
        let value = value.map( str::trim).filter( |v| !v.is_empty()).unwrap_or( NOT_AVAILABLE);
        lines.push( format!("{label}: {value}"));
    }
    lines.join("<br/>")
}
